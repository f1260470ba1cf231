use crate::{
    app::use_session_store,
    models::app_state::AppState,
    routes::Route,
};
use shared::models::Role;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::hooks::use_navigator;
use yewdux::prelude::use_selector;

fn profile_route(role: Role) -> Option<Route> {
    match role {
        Role::Admin => Some(Route::AdminProfile),
        Role::Custom => Some(Route::CustomProfile),
        Role::Agent => None,
    }
}

#[function_component(UserDropdown)]
pub fn user_dropdown() -> Html {
    let navigator = use_navigator();
    let store = use_session_store();
    let user_state = use_selector(|state: &AppState| state.session.current_user().cloned());
    let Some(user) = (*user_state).clone() else {
        return html! {};
    };

    let profile_button = match (profile_route(user.role), navigator) {
        (Some(route), Some(navigator)) => {
            let onclick = Callback::from(move |event: yew::MouseEvent| {
                event.prevent_default();
                navigator.push(&route);
            });
            html! {
                <>
                    <li><a {onclick}>{route.title()}</a></li>
                    <div class="divider my-0"></div>
                </>
            }
        }
        _ => html! {},
    };

    let logout_button = {
        let onclick = Callback::from(move |event: yew::MouseEvent| {
            event.prevent_default();
            let Some(store) = store.clone() else {
                log::error!("logout requested without a session store");
                return;
            };
            // Teardown and the redirect to login happen inside the store.
            spawn_local(async move { store.logout().await });
        });
        html! {
            <li><a {onclick}>{"Sign out"}</a></li>
        }
    };

    html! {
        <div class="dropdown dropdown-end">
            <div tabindex="0" role="button" class="btn btn-ghost btn-circle mb-1">
                <i class="fa-solid fa-user text-lg"></i>
            </div>
            <ul tabIndex={0} class="dropdown-content z-[1] menu p-2 shadow bg-base-200 rounded-box w-52">
                <li class="px-2 py-1 text-left">
                    <div class="text-sm font-semibold text-base-content">{ user.name.clone() }</div>
                    <div class="text-xs text-base-content/70">{ &user.email }</div>
                </li>
                <div class="divider my-0"></div>
                {profile_button}
                {logout_button}
            </ul>
        </div>
    }
}
