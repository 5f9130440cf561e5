//! 配色テーマ
//!
//! テーマは描画時に引数として渡す。DOMのクラスを読んで判定しない。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// 背景グリッドの線の色
    pub fn grid_line_color(&self) -> &'static str {
        match self {
            Theme::Light => "#e4e4e7",
            Theme::Dark => "#262626",
        }
    }

    /// グリッドを覆うマスクの下地色
    pub fn backdrop_color(&self) -> &'static str {
        match self {
            Theme::Light => "#ffffff",
            Theme::Dark => "#000000",
        }
    }

    /// 背景グリッドの CSS（`background-image`）
    pub fn grid_background_css(&self, cell_px: u32) -> String {
        let color = self.grid_line_color();
        format!(
            "background-size: {cell}px {cell}px; background-image: linear-gradient(to right, {color} 1px, transparent 1px), linear-gradient(to bottom, {color} 1px, transparent 1px);",
            cell = cell_px,
            color = color
        )
    }
}
