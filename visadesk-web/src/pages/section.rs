use crate::{models::app_state::AppState, routes::Route};
use yew::prelude::*;
use yewdux::prelude::use_selector;

#[derive(Properties, PartialEq)]
pub struct SectionPageProps {
    pub route: Route,
}

/// Placeholder shell for public and dashboard pages.
#[function_component(SectionPage)]
pub fn section_page(props: &SectionPageProps) -> Html {
    let user = use_selector(|state: &AppState| state.session.current_user().cloned());

    html! {
        <div class="p-4 space-y-6">
            <h1 class="text-2xl font-bold">{ props.route.title() }</h1>
            {
                (*user).as_ref().map_or_else(
                    || html! { <p>{ "Apply for your visa online and follow every step of your request." }</p> },
                    |user| html! { <p class="text-base-content/70">{ format!("Signed in as {} ({})", user.name, user.role) }</p> },
                )
            }
        </div>
    }
}
