use yew::{Html, function_component, html};

#[function_component(Loading)]
pub fn loading() -> Html {
    html! {
        <div class="flex items-center justify-center gap-2 py-2 animate-fadeIn">
            <span class="loading loading-dots loading-sm text-primary"></span>
            <span class="text-sm">{"Please wait"}</span>
        </div>
    }
}
