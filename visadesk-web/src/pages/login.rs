use crate::{app::use_session_store, models::app_state::AppState, routes::Route};
use shared::models::LoginRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_selector;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let store = use_session_store();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let loading = use_selector(|state: &AppState| state.session.loading());
    let error = use_selector(|state: &AppState| state.session.last_error().map(str::to_string));

    let onsubmit = {
        let email_handle = email.clone();
        let password_handle = password.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(store) = store.clone() else {
                log::error!("login submitted without a session store");
                return;
            };
            let request = LoginRequest {
                email: (*email_handle).clone(),
                password: (*password_handle).clone(),
            };
            // The store records the failure and navigates on success.
            spawn_local(async move {
                let _ = store.login(request).await;
            });
        })
    };

    let on_email_change = {
        let email = email.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                email.set(input.value());
            }
        })
    };

    let on_password_change = {
        let password = password.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                password.set(input.value());
            }
        })
    };

    let is_busy = *loading;
    let disable_submit = (*email).is_empty() || (*password).is_empty() || is_busy;

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" onsubmit={onsubmit}>
                    <h2 class="card-title text-2xl">{Route::Login.title()}</h2>
                    if let Some(message) = &*error {
                        <div class="alert alert-error">
                            <span>{message.clone()}</span>
                        </div>
                    }
                    <div class="form-control">
                        <label class="label" for="email">
                            <span class="label-text">{"Email"}</span>
                        </label>
                        <input
                            id="email"
                            class="input input-bordered"
                            type="email"
                            required=true
                            value={(*email).clone()}
                            oninput={on_email_change}
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="password">
                            <span class="label-text">{"Password"}</span>
                        </label>
                        <input
                            id="password"
                            class="input input-bordered"
                            type="password"
                            required=true
                            value={(*password).clone()}
                            oninput={on_password_change}
                        />
                    </div>
                    <div class="flex justify-between text-sm">
                        <Link<Route> to={Route::ForgotPassword} classes="link">
                            {"Forgot password?"}
                        </Link<Route>>
                        <Link<Route> to={Route::Register} classes="link">
                            {"Create an account"}
                        </Link<Route>>
                    </div>
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" type="submit" disabled={disable_submit}>
                            {if is_busy { "Signing in..." } else { "Sign in" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
