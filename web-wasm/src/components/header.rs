//! ヘッダーコンポーネント

use leptos::prelude::*;
use portfolio_common::Theme;

#[component]
pub fn Header<F>(theme: RwSignal<Theme>, on_toggle_theme: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    view! {
        <header class="header">
            <h1>"~/portfolio"</h1>
            <button
                class="btn btn-small btn-secondary theme-toggle"
                aria-label="toggle theme"
                on:click={
                    let on_toggle_theme = on_toggle_theme.clone();
                    move |_| on_toggle_theme(())
                }
            >
                {move || match theme.get() {
                    Theme::Dark => "$ theme --light",
                    Theme::Light => "$ theme --dark",
                }}
            </button>
        </header>
    }
}
