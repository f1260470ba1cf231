use crate::api::VisaDeskClient;
use crate::config::FrontendConfig;
use crate::models::app_state::AppState;
use crate::routes::{Route, switch};
use crate::session::{
    BrowserStorage, DurableStorage, MemoryStorage, RouteNavigator, SessionStore,
};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::{YewduxRoot, prelude::use_dispatch};

/// Stand-in used only if the shell is rendered outside a router.
struct Unrouted;

impl RouteNavigator for Unrouted {
    fn navigate(&self, route: Route) {
        log::warn!("no router mounted; dropping navigation to {route:?}");
    }
}

/// Session store from context. Present everywhere below [`App`].
#[hook]
pub fn use_session_store() -> Option<SessionStore> {
    use_context::<SessionStore>()
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <YewduxRoot>
            <BrowserRouter>
                <Shell />
            </BrowserRouter>
        </YewduxRoot>
    }
}

/// Owns the session store and registers the guarded route switch.
#[function_component(Shell)]
fn shell() -> Html {
    let navigator = use_navigator();
    let dispatch = use_dispatch::<AppState>();

    let store = use_memo((), move |_| {
        let config = FrontendConfig::new();
        let storage: Rc<dyn DurableStorage> = match BrowserStorage::detect() {
            Some(browser) => Rc::new(browser),
            None => {
                log::warn!("localStorage unavailable; the session will not survive a reload");
                Rc::new(MemoryStorage::new())
            }
        };
        let navigator: Rc<dyn RouteNavigator> = match navigator {
            Some(navigator) => Rc::new(navigator),
            None => Rc::new(Unrouted),
        };

        let store = SessionStore::new(
            Rc::new(VisaDeskClient::from_config(&config)),
            storage,
            navigator,
            config.registration_mode,
        );
        dispatch.set(AppState {
            session: store.snapshot(),
        });
        store.on_change(move |session| {
            dispatch.set(AppState {
                session: session.clone(),
            });
        });
        store
    });

    {
        let store = (*store).clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                if let Err(err) = store.validate().await {
                    log::warn!("stored session could not be confirmed: {err}");
                }
            });
            || ()
        });
    }

    html! {
        <ContextProvider<SessionStore> context={(*store).clone()}>
            <Switch<Route> render={switch} />
        </ContextProvider<SessionStore>>
    }
}
