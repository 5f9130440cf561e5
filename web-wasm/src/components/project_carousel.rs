//! 3Dカルーセル
//!
//! ホイール・スワイプ・矢印キーはドライバーが window / ステージ要素に
//! 直接登録する。ここでは描画とボタン操作だけを扱う。

use crate::components::project_modal::ProjectModal;
use crate::components::tech_stack::TechStackBadges;
use crate::driver::{current_viewport, CarouselDriver, CarouselView};
use leptos::prelude::*;
use portfolio_common::{CarouselState, Key, Placement, ProjectRecord, Viewport};
use std::rc::Rc;

const CARD_TECH_PREVIEW: usize = 2;

type DriverCell = StoredValue<Option<Rc<CarouselDriver>>, LocalStorage>;

fn with_driver(driver: DriverCell, f: impl FnOnce(&Rc<CarouselDriver>)) {
    if let Some(driver) = driver.get_value() {
        f(&driver);
    }
}

#[component]
pub fn ProjectCarousel(projects: StoredValue<Vec<ProjectRecord>>) -> impl IntoView {
    let len = projects.with_value(|p| p.len());
    let current_index = RwSignal::new(0usize);
    let viewport = RwSignal::new(current_viewport());
    let transitioning = RwSignal::new(false);
    let selected = RwSignal::new(None::<usize>);
    let signals = CarouselView {
        current_index,
        viewport,
        transitioning,
    };

    let stage_ref = NodeRef::<leptos::html::Div>::new();
    let driver: DriverCell = StoredValue::new_local(None);

    Effect::new(move |_| {
        let Some(stage) = stage_ref.get() else {
            return;
        };
        if driver.with_value(|d| d.is_none()) {
            driver.set_value(CarouselDriver::mount(len, stage.into(), signals));
        }
    });

    on_cleanup(move || {
        driver.try_update_value(|d| {
            if let Some(d) = d.take() {
                d.unmount();
            }
        });
    });

    // 現在位置から見た配置（描画用の純粋計算）
    let placement = move |index: usize| -> Option<Placement> {
        let mut state = CarouselState::new(len)?;
        state.jump_to(current_index.get());
        Some(state.placement_of(index, viewport.get())).filter(|p| p.is_visible())
    };
    let visible = move || -> Vec<usize> {
        (0..len).filter(|&i| placement(i).is_some()).collect()
    };

    // 中央と両隣のカードだけ開ける
    let activate = move |index: usize| {
        let opened = driver
            .get_value()
            .is_some_and(|d| d.activate(index));
        if opened {
            selected.set(Some(index));
        }
    };

    let on_navigate = move |index: usize| with_driver(driver, |d| d.jump_to(index));
    let on_close = move || {
        selected.set(None);
        with_driver(driver, |d| d.set_overlay_open(false));
    };

    view! {
        <div class="carousel">
            <div class="carousel-status">
                <span>{move || format!("showing {} of {}", current_index.get() + 1, len)}</span>
                <span class="text-muted">"← → / scroll / swipe"</span>
            </div>

            <div
                node_ref=stage_ref
                class="carousel-stage"
                class:transitioning=move || transitioning.get()
                tabindex="0"
                aria-roledescription="carousel"
            >
                <For
                    each=visible
                    key=|index| *index
                    children=move |index| {
                        let record = projects.with_value(|p| p.get(index).cloned()).unwrap_or_default();
                        view! {
                            <CarouselCard
                                index=index
                                record=record
                                placement=Signal::derive(move || placement(index))
                                viewport=viewport
                                on_activate=activate
                            />
                        }
                    }
                />
            </div>

            <div class="carousel-controls">
                <button
                    class="btn btn-small btn-secondary"
                    aria-label="previous project"
                    disabled=move || transitioning.get()
                    on:click=move |_| with_driver(driver, |d| {
                        d.retreat();
                    })
                >
                    "< prev"
                </button>
                <div class="carousel-dots">
                    {(0..len)
                        .map(|i| {
                            view! {
                                <button
                                    class="carousel-dot"
                                    class:active=move || current_index.get() == i
                                    aria-label=format!("go to project {}", i + 1)
                                    on:click=move |_| with_driver(driver, |d| d.jump_to(i))
                                />
                            }
                        })
                        .collect_view()}
                </div>
                <button
                    class="btn btn-small btn-secondary"
                    aria-label="next project"
                    disabled=move || transitioning.get()
                    on:click=move |_| with_driver(driver, |d| {
                        d.advance();
                    })
                >
                    "next >"
                </button>
            </div>

            {move || {
                selected.get().map(|index| {
                    view! {
                        <ProjectModal
                            projects=projects
                            index=index
                            on_navigate=on_navigate
                            on_close=on_close
                        />
                    }
                })
            }}
        </div>
    }
}

#[component]
fn CarouselCard<F>(
    index: usize,
    record: ProjectRecord,
    placement: Signal<Option<Placement>>,
    viewport: RwSignal<Viewport>,
    on_activate: F,
) -> impl IntoView
where
    F: Fn(usize) + 'static + Clone + Send + Sync,
{
    let title = format!("{}.md", record.slug());
    let image = record.image().cloned();
    let summary = record.summary().map(|s| s.as_text());

    let style = move || {
        let Some(p) = placement.get() else {
            return "display: none;".to_string();
        };
        let (width, height) = viewport.get().card_size_px();
        format!(
            "width: {w}px; height: {h}px; margin-left: {ml}px; margin-top: {mt}px; transform: {t} scale({s:.2}); opacity: {o:.2}; z-index: {z}; pointer-events: {pe};",
            w = width,
            h = height,
            ml = -width / 2.0,
            mt = -height / 2.0,
            t = p.transform_css(),
            s = p.scale,
            o = p.opacity,
            z = p.z_index,
            pe = if p.is_interactive() { "auto" } else { "none" },
        )
    };
    let is_centered = move || placement.get().map(|p| p.is_centered()).unwrap_or(false);
    let tab_index = move || {
        if placement.get().map(|p| p.is_interactive()).unwrap_or(false) {
            "0"
        } else {
            "-1"
        }
    };

    view! {
        <article
            class="carousel-card"
            class:centered=is_centered
            style=style
            tabindex=tab_index
            on:click={
                let on_activate = on_activate.clone();
                move |_| on_activate(index)
            }
            on:keydown={
                let on_activate = on_activate.clone();
                move |ev: web_sys::KeyboardEvent| {
                    if Key::from_dom(&ev.key()).activates() {
                        ev.prevent_default();
                        on_activate(index);
                    }
                }
            }
        >
            <div class="card-titlebar">
                <span class="card-dot" />
                <span class="card-dot" />
                <span class="card-dot" />
                <span class="card-title">{title}</span>
            </div>
            {image.map(|img| {
                view! {
                    <img class="card-image" src=img.url.clone() alt=img.alt_text().to_string() loading="lazy" />
                }
            })}
            <div class="card-body">
                <h3>{record.display_name().to_string()}</h3>
                {summary.map(|s| view! { <p class="card-summary">{s}</p> })}
                <TechStackBadges record=record.clone() limit=CARD_TECH_PREVIEW />
            </div>
        </article>
    }
}
