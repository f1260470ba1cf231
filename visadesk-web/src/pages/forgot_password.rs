use crate::routes::Route;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::Link;

/// Collects the account email. No reset endpoint exists yet, so submitting
/// only acknowledges the request.
#[function_component(ForgotPasswordPage)]
pub fn forgot_password_page() -> Html {
    let email = use_state(String::new);
    let submitted = use_state(|| false);

    let onsubmit = {
        let email = email.clone();
        let submitted = submitted.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            log::info!("password reset requested for {}", *email);
            submitted.set(true);
        })
    };

    let oninput = {
        let email = email.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                email.set(input.value());
            }
        })
    };

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" {onsubmit}>
                    <h2 class="card-title text-2xl">{Route::ForgotPassword.title()}</h2>
                    if *submitted {
                        <div class="alert alert-info">
                            <span>{"If an account exists for this email, you will receive reset instructions."}</span>
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
                            {oninput}
                        />
                    </div>
                    <div class="text-sm">
                        <Link<Route> to={Route::Login} classes="link">{"Back to sign in"}</Link<Route>>
                    </div>
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" type="submit" disabled={email.is_empty()}>
                            {"Send reset link"}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
