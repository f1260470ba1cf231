use crate::{
    components::{header_nav_item::HeaderNavItem, user_dropdown::UserDropdown},
    models::app_state::AppState,
    routes::Route,
};
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_selector;

const PUBLIC_MENU: [Route; 3] = [Route::Home, Route::About, Route::Contact];

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    #[prop_or_default]
    pub current_route: Option<Route>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let role = use_selector(|state: &AppState| state.session.role());
    let routes = (*role).map_or_else(|| PUBLIC_MENU.to_vec(), Route::menu_for);

    let render_routes = |routes: &[Route]| -> Html {
        html! {
            { for routes.iter().map(|route| html! {
                <HeaderNavItem current_route={props.current_route} route={*route} />
            }) }
        }
    };

    html! {
        <nav class="navbar justify-between bg-base-300">
            <Link<Route> to={Route::Home} classes="btn btn-ghost text-lg">
                {"VisaDesk"}
            </Link<Route>>
            <div class="dropdown dropdown-end sm:hidden">
                <button class="btn btn-soft">
                <i class="fa-solid fa-bars text-lg"></i>
                </button>
                <ul
                tabindex="0"
                class="dropdown-content menu z-[1] bg-base-200 p-6 rounded-box shadow w-56 gap-2"
                >
                { render_routes(&routes) }
                </ul>
            </div>
            <ul class="hidden menu sm:menu-horizontal">
                { render_routes(&routes) }
            </ul>
            {
                if role.is_some() {
                    html! { <UserDropdown /> }
                } else {
                    html! {
                        <Link<Route> to={Route::Login} classes="btn btn-primary btn-sm">
                            {Route::Login.title()}
                        </Link<Route>>
                    }
                }
            }
        </nav>
    }
}
