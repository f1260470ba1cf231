use crate::{app::use_session_store, models::app_state::AppState, routes::Route};
use shared::models::{RegisterRequest, Role};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_selector;

#[derive(Clone, Default, PartialEq)]
struct RegisterForm {
    name: String,
    email: String,
    phone: String,
    password: String,
    password_confirmation: String,
}

impl RegisterForm {
    fn mismatch(&self) -> bool {
        !self.password_confirmation.is_empty() && self.password != self.password_confirmation
    }

    fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.email.is_empty()
            && !self.password.is_empty()
            && !self.mismatch()
    }

    /// Self-registration always creates an applicant account.
    fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            name: self.name,
            email: self.email,
            phone: self.phone,
            password: self.password,
            role: Role::Custom,
        }
    }
}

fn field_input(
    form: &UseStateHandle<RegisterForm>,
    update: fn(&mut RegisterForm, String),
) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |event: InputEvent| {
        if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
            let mut next = (*form).clone();
            update(&mut next, input.value());
            form.set(next);
        }
    })
}

#[function_component(RegisterPage)]
pub fn register_page() -> Html {
    let store = use_session_store();
    let form = use_state(RegisterForm::default);
    let loading = use_selector(|state: &AppState| state.session.loading());
    let error = use_selector(|state: &AppState| state.session.last_error().map(str::to_string));

    let onsubmit = {
        let form = form.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(store) = store.clone() else {
                log::error!("registration submitted without a session store");
                return;
            };
            if !form.is_complete() {
                return;
            }
            let request = (*form).clone().into_request();
            spawn_local(async move {
                if let Ok(response) = store.register(request).await {
                    if let Some(message) = response.message() {
                        log::info!("registration: {message}");
                    }
                }
            });
        })
    };

    let is_busy = *loading;
    let disable_submit = !form.is_complete() || is_busy;

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" onsubmit={onsubmit}>
                    <h2 class="card-title text-2xl">{Route::Register.title()}</h2>
                    if let Some(message) = &*error {
                        <div class="alert alert-error">
                            <span>{message.clone()}</span>
                        </div>
                    }
                    <div class="form-control">
                        <label class="label" for="name">
                            <span class="label-text">{"Full name"}</span>
                        </label>
                        <input id="name" class="input input-bordered" type="text" required=true
                            value={form.name.clone()}
                            oninput={field_input(&form, |f, v| f.name = v)} />
                    </div>
                    <div class="form-control">
                        <label class="label" for="email">
                            <span class="label-text">{"Email"}</span>
                        </label>
                        <input id="email" class="input input-bordered" type="email" required=true
                            value={form.email.clone()}
                            oninput={field_input(&form, |f, v| f.email = v)} />
                    </div>
                    <div class="form-control">
                        <label class="label" for="phone">
                            <span class="label-text">{"Phone"}</span>
                        </label>
                        <input id="phone" class="input input-bordered" type="tel"
                            value={form.phone.clone()}
                            oninput={field_input(&form, |f, v| f.phone = v)} />
                    </div>
                    <div class="form-control">
                        <label class="label" for="password">
                            <span class="label-text">{"Password"}</span>
                        </label>
                        <input id="password" class="input input-bordered" type="password" required=true
                            value={form.password.clone()}
                            oninput={field_input(&form, |f, v| f.password = v)} />
                    </div>
                    <div class="form-control">
                        <label class="label" for="password_confirmation">
                            <span class="label-text">{"Confirm password"}</span>
                        </label>
                        <input id="password_confirmation" class="input input-bordered" type="password" required=true
                            value={form.password_confirmation.clone()}
                            oninput={field_input(&form, |f, v| f.password_confirmation = v)} />
                        if form.mismatch() {
                            <span class="label-text-alt text-error">{"Passwords do not match"}</span>
                        }
                    </div>
                    <div class="text-sm">
                        <Link<Route> to={Route::Login} classes="link">
                            {"Already have an account? Sign in"}
                        </Link<Route>>
                    </div>
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" type="submit" disabled={disable_submit}>
                            {if is_busy { "Creating account..." } else { "Create account" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
