//! 背景グリッド
//!
//! 線の色はテーマ値から決める。

use leptos::prelude::*;
use portfolio_common::Theme;

const GRID_CELL_PX: u32 = 40;

#[component]
pub fn GridBackground(theme: RwSignal<Theme>, children: Children) -> impl IntoView {
    view! {
        <div class="grid-background">
            <div
                class="grid-lines"
                aria-hidden="true"
                style=move || theme.get().grid_background_css(GRID_CELL_PX)
            />
            <div
                class="grid-mask"
                aria-hidden="true"
                style=move || format!(
                    "background: radial-gradient(ellipse at center, transparent 20%, {} 80%);",
                    theme.get().backdrop_color()
                )
            />
            <div class="grid-content">{children()}</div>
        </div>
    }
}
