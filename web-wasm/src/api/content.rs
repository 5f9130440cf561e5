//! 静的コンテンツJSONの取得
//!
//! `portfolio fetch` で保存した正規化JSONのほか、
//! Prismic のレスポンスをそのまま置いた場合も読める。

use portfolio_common::content::section_from_value;
use portfolio_common::ProjectsSection;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

pub const CONTENT_URL: &str = "content/projects.json";

async fn fetch_json(url: &str) -> Result<serde_json::Value, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Accept", "application/json")?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }

    let json = JsFuture::from(resp.json()?).await?;
    Ok(serde_wasm_bindgen::from_value(json)?)
}

/// コンテンツを取得して正規化する
pub async fn load_section(url: &str) -> Result<ProjectsSection, String> {
    let value = fetch_json(url)
        .await
        .map_err(|e| format!("取得失敗: {:?}", e))?;
    section_from_value(value).map_err(|e| format!("読込失敗: {}", e))
}
