//! 技術スタックのバッジ

use leptos::prelude::*;
use portfolio_common::ProjectRecord;

/// `limit` 指定時は先頭だけ表示して残りを "+N" にまとめる
#[component]
pub fn TechStackBadges(record: ProjectRecord, #[prop(optional)] limit: Option<usize>) -> impl IntoView {
    let (shown, overflow) = match limit {
        Some(max) => match record.tech_stack_preview(max) {
            Some(preview) => (preview.shown, preview.overflow),
            None => (Vec::new(), 0),
        },
        None => (record.tech_stack_items(), 0),
    };

    (!shown.is_empty()).then(|| {
        view! {
            <ul class="tech-badges">
                {shown
                    .into_iter()
                    .map(|item| view! { <li class="tech-badge">{item}</li> })
                    .collect_view()}
                {(overflow > 0).then(|| view! { <li class="tech-badge tech-more">{format!("+{}", overflow)}</li> })}
            </ul>
        }
    })
}
