use crate::routes::{Route, landing_route};
use crate::models::app_state::AppState;
use yew::{Html, function_component, html};
use yew_router::prelude::Link;
use yewdux::prelude::use_selector;

/// `ErrorPage` page component
#[function_component(ErrorPage)]
pub fn error_page() -> Html {
    let role = use_selector(|state: &AppState| state.session.role());
    let home = if role.is_some() { landing_route(*role) } else { Route::Home };

    html! {
        <div class="p-4 space-y-6">
            <h1 class="text-2xl font-bold">{ Route::NotFound.title() }</h1>
            <p>{ "The page you requested does not exist." }</p>
            <Link<Route> to={home} classes="btn btn-primary">{ "Go back" }</Link<Route>>
        </div>
    }
}
