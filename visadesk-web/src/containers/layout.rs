use crate::components::loading::Loading;
use crate::containers::header::Header;
use crate::models::app_state::AppState;
use crate::routes::Route;
use yew::{Children, Html, Properties, classes, function_component, html};
use yewdux::prelude::use_selector;

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    #[prop_or_default]
    pub current_route: Option<Route>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    let loading = use_selector(|state: &AppState| state.session.loading());

    html! {
    <>
        <Header current_route={props.current_route} />
        <div class="min-h-screen bg-base-100 flex flex-col">
            <main class={classes!(
                "flex-grow",
                "p-4",
                "transition-all",
                "duration-300"
            )}>
                if *loading {
                    <Loading />
                }
                {props.children.clone()}
            </main>
            <footer class="footer footer-center p-4 border-t border-base-300 text-base-content">
                <div>
                    <p>{"© 2025 VisaDesk · Visa applications made simple"}</p>
                </div>
            </footer>
        </div>
    </>
    }
}
