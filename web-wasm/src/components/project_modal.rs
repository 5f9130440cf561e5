//! プロジェクト詳細モーダル
//!
//! 表示中のインデックスはモーダル自身が持ち、移動は `on_navigate` で
//! カルーセルへ通知する。カルーセルの状態には直接触れない。

use crate::components::tech_stack::TechStackBadges;
use crate::driver::{OverlayDriver, OverlayView, PreviewView};
use leptos::prelude::*;
use portfolio_common::modal::{EMBED_FRAME_SCALE, EMBED_FRAME_SIZE_PX, EMBED_SANDBOX};
use portfolio_common::{EmbedState, OverlayCommand, ProjectRecord, SlideDirection};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

pub const OVERLAY_ID: &str = "project-modal-overlay";

type DriverCell = StoredValue<Option<Rc<OverlayDriver>>, LocalStorage>;

fn with_driver(driver: DriverCell, f: impl FnOnce(&Rc<OverlayDriver>)) {
    if let Some(driver) = driver.get_value() {
        f(&driver);
    }
}

fn is_backdrop(ev: &MouseEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .map(|el| el.id() == OVERLAY_ID)
        .unwrap_or(false)
}

#[component]
pub fn ProjectModal<FN, FC>(
    projects: StoredValue<Vec<ProjectRecord>>,
    index: usize,
    on_navigate: FN,
    on_close: FC,
) -> impl IntoView
where
    FN: Fn(usize) + 'static + Clone + Send + Sync,
    FC: Fn() + 'static + Clone + Send + Sync,
{
    let selected = RwSignal::new(index);
    let direction = RwSignal::new(SlideDirection::Forward);
    let embed = RwSignal::new(EmbedState::Absent);
    let signals = OverlayView {
        selected,
        direction,
        embed,
    };

    let on_command: Rc<dyn Fn(OverlayCommand)> = Rc::new(move |command: OverlayCommand| match command {
        OverlayCommand::Close => on_close(),
        OverlayCommand::Navigate(i) => on_navigate(i),
    });
    let driver: DriverCell = StoredValue::new_local(OverlayDriver::open(
        projects.get_value(),
        index,
        signals,
        on_command,
    ));

    on_cleanup(move || {
        driver.try_update_value(|d| {
            if let Some(d) = d.take() {
                d.close();
            }
        });
    });

    let panel_ref = NodeRef::<leptos::html::Div>::new();
    Effect::new(move |_| {
        if let Some(panel) = panel_ref.get() {
            with_driver(driver, |d| d.attach_panel(panel.into()));
        }
    });

    let len = projects.with_value(|p| p.len());
    let has_navigation = len > 1;
    let record = move || projects.with_value(|p| p.get(selected.get()).cloned());

    // 埋め込みの要素は読み込み完了で作り直さない
    let embed_failed = Memo::new(move |_| embed.get() == EmbedState::Failed);
    let preview = move || {
        embed_failed.track();
        let index = selected.get();
        driver.with_value(|d| d.as_ref().and_then(|d| d.preview(index)))
    };
    let loading = move || embed.get() == EmbedState::Loading;

    view! {
        <div
            id=OVERLAY_ID
            class="modal-backdrop"
            role="dialog"
            aria-modal="true"
            on:click=move |ev: MouseEvent| {
                let target_is_backdrop = is_backdrop(&ev);
                with_driver(driver, |d| d.on_backdrop_click(target_is_backdrop));
            }
        >
            <div
                node_ref=panel_ref
                class="modal-panel"
                tabindex="-1"
                on:click=|ev: MouseEvent| ev.stop_propagation()
            >
                <div class="modal-titlebar">
                    <span class="modal-title">
                        {move || record().map(|r| format!("{}.md", r.slug())).unwrap_or_default()}
                    </span>
                    {has_navigation.then(|| {
                        view! {
                            <span class="modal-counter">
                                {move || format!("{} / {}", selected.get() + 1, len)}
                            </span>
                        }
                    })}
                    <button
                        class="btn btn-small btn-tertiary"
                        aria-label="close"
                        on:click=move |_| with_driver(driver, |d| d.request_close())
                    >
                        "[x]"
                    </button>
                </div>

                {move || {
                    let dir = direction.get();
                    record().map(|record| {
                        view! {
                            <div
                                class=format!("modal-body slide-{}", dir.as_str())
                                style=format!("--slide-from: {}px;", dir.enter_offset_px())
                            >
                                <ModalDetails record=record />
                            </div>
                        }
                    })
                }}

                {move || {
                    preview().filter(|p| p.embed_url.is_some() || p.fallback_image.is_some() || p.warning).map(|p| {
                        view! {
                            <PreviewPanel
                                preview=p
                                loading=Signal::derive(loading)
                                on_load=move || with_driver(driver, |d| d.on_embed_load())
                                on_error=move || with_driver(driver, |d| d.on_embed_error())
                            />
                        }
                    })
                }}

                {move || {
                    record().filter(|r| !r.tech_stack_items().is_empty()).map(|record| view! {
                        <section class="modal-section">
                            <h3>"# Tech Stack"</h3>
                            <TechStackBadges record=record />
                        </section>
                    })
                }}

                {has_navigation.then(|| {
                    view! {
                        <div class="modal-nav">
                            <button
                                class="btn btn-small btn-secondary"
                                on:click=move |_| with_driver(driver, |d| d.prev())
                            >
                                "< prev"
                            </button>
                            <button
                                class="btn btn-small btn-secondary"
                                on:click=move |_| with_driver(driver, |d| d.next())
                            >
                                "next >"
                            </button>
                        </div>
                    }
                })}
            </div>
        </div>
    }
}

#[component]
fn ModalDetails(record: ProjectRecord) -> impl IntoView {
    let description = record.description().cloned();
    let links: Vec<(String, String)> = record
        .links()
        .map(|l| (l.kind.label().to_string(), l.url.clone()))
        .collect();

    view! {
        <h2 class="modal-heading">{record.display_name().to_string()}</h2>
        {description.map(|d| {
            view! {
                <section class="modal-section">
                    <h3>"# About"</h3>
                    {d.paragraphs().map(|p| view! { <p>{p.to_string()}</p> }).collect_view()}
                </section>
            }
        })}
        {(!links.is_empty()).then(|| {
            view! {
                <section class="modal-section">
                    <h3>"# Links"</h3>
                    <ul class="modal-links">
                        {links
                            .into_iter()
                            .map(|(label, url)| {
                                view! {
                                    <li>
                                        <a href=url target="_blank" rel="noopener noreferrer">
                                            {format!("$ open {}", label)}
                                        </a>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </section>
            }
        })}
    }
}

#[component]
fn PreviewPanel<FL, FE>(
    preview: PreviewView,
    loading: Signal<bool>,
    on_load: FL,
    on_error: FE,
) -> impl IntoView
where
    FL: Fn() + 'static + Clone + Send + Sync,
    FE: Fn() + 'static + Clone + Send + Sync,
{
    let (frame_w, frame_h) = EMBED_FRAME_SIZE_PX;
    let scaled_w = frame_w as f64 * EMBED_FRAME_SCALE;
    let scaled_h = frame_h as f64 * EMBED_FRAME_SCALE;

    view! {
        <section class="modal-section">
            <h3>"# Preview"</h3>
            {preview.embed_url.map(|url| {
                view! {
                    <div
                        class="embed-frame"
                        style=format!("width: {}px; height: {}px;", scaled_w, scaled_h)
                    >
                        <iframe
                            src=url.clone()
                            title=url
                            sandbox=EMBED_SANDBOX
                            width=frame_w.to_string()
                            height=frame_h.to_string()
                            style=format!("transform: scale({}); transform-origin: 0 0;", EMBED_FRAME_SCALE)
                            on:load={
                                let on_load = on_load.clone();
                                move |_| on_load()
                            }
                            on:error={
                                let on_error = on_error.clone();
                                move |_| on_error()
                            }
                        />
                        <Show when=move || loading.get()>
                            <div class="embed-loading">"loading..."</div>
                        </Show>
                    </div>
                }
            })}
            {preview.fallback_image.map(|img| {
                view! { <img class="preview-image" src=img.url.clone() alt=img.alt_text().to_string() /> }
            })}
            {preview.warning.then(|| {
                view! { <p class="embed-warning">"warn: iframe blocked, use link to view directly"</p> }
            })}
        </section>
    }
}
