//! メインアプリケーションコンポーネント

use crate::api::content::{load_section, CONTENT_URL};
use crate::components::{
    grid_background::GridBackground,
    header::Header,
    projects_section::ProjectsSection,
};
use gloo::storage::{LocalStorage, Storage};
use leptos::prelude::*;
use portfolio_common::{ProjectsSection as Section, Theme};

/// コンテンツの読み込み状態
#[derive(Clone, Default)]
pub enum ContentState {
    #[default]
    Loading,
    Ready(Section),
    Failed(String),
}

const THEME_STORAGE_KEY: &str = "portfolio-theme";

fn prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|m| m.matches())
        .unwrap_or(true)
}

/// 保存済みの選択、無ければOSの設定
fn initial_theme() -> Theme {
    LocalStorage::get::<Theme>(THEME_STORAGE_KEY)
        .unwrap_or_else(|_| Theme::from_prefers_dark(prefers_dark()))
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let theme = RwSignal::new(initial_theme());
    let content = RwSignal::new(ContentState::Loading);

    wasm_bindgen_futures::spawn_local(async move {
        let state = match load_section(CONTENT_URL).await {
            Ok(section) => ContentState::Ready(section),
            Err(e) => {
                gloo::console::error!(format!("content load failed: {}", e));
                ContentState::Failed(e)
            }
        };
        content.set(state);
    });

    let on_toggle_theme = move |_| {
        theme.update(|t| *t = t.toggled());
        if let Err(e) = LocalStorage::set(THEME_STORAGE_KEY, theme.get_untracked()) {
            gloo::console::warn!(format!("theme not saved: {}", e));
        }
    };

    view! {
        <div class=move || format!("app theme-{}", theme.get().as_str())>
            <GridBackground theme=theme>
                <div class="container">
                    <Header theme=theme on_toggle_theme=on_toggle_theme />

                    {move || match content.get() {
                        ContentState::Loading => {
                            view! { <p class="text-muted">"loading projects..."</p> }.into_any()
                        }
                        ContentState::Ready(section) => {
                            view! { <ProjectsSection section=section /> }.into_any()
                        }
                        ContentState::Failed(message) => {
                            view! { <p class="text-muted">{format!("error: {}", message)}</p> }.into_any()
                        }
                    }}
                </div>
            </GridBackground>
        </div>
    }
}
