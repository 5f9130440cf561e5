//! 状態機械とブラウザをつなぐドライバー
//!
//! [`CarouselDriver`] は `CarouselSession`、[`OverlayDriver`] は `DetailOverlay` を
//! 所有し、操作のたびに副作用を [`EffectRuntime`] へ流してシグナルを同期する。

use crate::runtime::{listen_on, EffectHost, EffectRuntime};
use gloo::events::EventListener;
use leptos::prelude::*;
use portfolio_common::{
    CarouselSession, DetailOverlay, EmbedState, ImageRef, Key, ListenerKind, OverlayCommand,
    ProjectRecord, SlideDirection, TimerKind, Viewport,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, KeyboardEvent, TouchEvent, WheelEvent};

pub fn window_width() -> Option<f64> {
    web_sys::window()?.inner_width().ok()?.as_f64()
}

pub fn current_viewport() -> Viewport {
    window_width().map(Viewport::from_width).unwrap_or_default()
}

/// モーダル内でTab移動の対象にする要素
const FOCUSABLE_SELECTOR: &str = "a[href], button:not([disabled]), [tabindex]:not([tabindex='-1'])";

fn active_element() -> Option<web_sys::Element> {
    web_sys::window()?.document()?.active_element()
}

fn focusable_in(panel: &HtmlElement) -> Vec<HtmlElement> {
    let Ok(nodes) = panel.query_selector_all(FOCUSABLE_SELECTOR) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn first_touch(event: &Event) -> Option<(f64, f64)> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some((touch.client_x() as f64, touch.client_y() as f64))
}

/// カルーセル側で描画に使うシグナル
#[derive(Clone, Copy)]
pub struct CarouselView {
    pub current_index: RwSignal<usize>,
    pub viewport: RwSignal<Viewport>,
    pub transitioning: RwSignal<bool>,
}

pub struct CarouselDriver {
    session: RefCell<CarouselSession>,
    runtime: EffectRuntime,
    stage: web_sys::HtmlElement,
    view: CarouselView,
}

impl CarouselDriver {
    /// 0件なら None
    pub fn mount(len: usize, stage: web_sys::HtmlElement, view: CarouselView) -> Option<Rc<Self>> {
        let session = CarouselSession::mount(len, current_viewport())?;
        let driver = Rc::new(Self {
            session: RefCell::new(session),
            runtime: EffectRuntime::new(),
            stage,
            view,
        });
        driver.flush();
        Some(driver)
    }

    fn flush(self: &Rc<Self>) {
        let effects = self.session.borrow_mut().drain_effects();
        self.runtime.apply(self, effects);
        self.sync();
    }

    fn sync(&self) {
        let session = self.session.borrow();
        let view = self.view;
        if view.current_index.get_untracked() != session.current_index() {
            view.current_index.set(session.current_index());
        }
        if view.viewport.get_untracked() != session.viewport() {
            view.viewport.set(session.viewport());
        }
        if view.transitioning.get_untracked() != session.is_transitioning() {
            view.transitioning.set(session.is_transitioning());
        }
    }

    fn with_session<R>(self: &Rc<Self>, f: impl FnOnce(&mut CarouselSession) -> R) -> R {
        let result = f(&mut self.session.borrow_mut());
        self.flush();
        result
    }

    /// リスナーから呼ぶ。アンマウント後は何もしない
    fn handle<R>(weak: &Weak<Self>, f: impl FnOnce(&mut CarouselSession) -> R) -> Option<R> {
        weak.upgrade().map(|driver| driver.with_session(f))
    }

    pub fn advance(self: &Rc<Self>) -> bool {
        self.with_session(|s| s.advance())
    }

    pub fn retreat(self: &Rc<Self>) -> bool {
        self.with_session(|s| s.retreat())
    }

    pub fn jump_to(self: &Rc<Self>, index: usize) {
        self.with_session(|s| s.jump_to(index))
    }

    pub fn set_overlay_open(&self, open: bool) {
        self.session.borrow_mut().set_overlay_open(open);
    }

    /// カードを開く。開けたら true
    pub fn activate(self: &Rc<Self>, index: usize) -> bool {
        self.with_session(|s| s.activate(index))
    }

    pub fn unmount(self: &Rc<Self>) {
        self.with_session(|s| s.unmount());
        if self.runtime.timer_count() > 0 || self.runtime.listener_count() > 0 {
            gloo::console::warn!("carousel unmounted with live resources");
        }
    }

    fn listen_stage<F>(self: &Rc<Self>, kind: ListenerKind, on_event: F) -> EventListener
    where
        F: Fn(&Weak<Self>, &Event) + 'static,
    {
        let weak = Rc::downgrade(self);
        listen_on(&self.stage, kind, move |event| on_event(&weak, event))
    }

    fn listen_window<F>(self: &Rc<Self>, kind: ListenerKind, on_event: F) -> Option<EventListener>
    where
        F: Fn(&Weak<Self>, &Event) + 'static,
    {
        let window = web_sys::window()?;
        let weak = Rc::downgrade(self);
        Some(listen_on(&window, kind, move |event| on_event(&weak, event)))
    }
}

impl EffectHost for CarouselDriver {
    fn fire_timer(self: &Rc<Self>, timer: TimerKind) {
        self.runtime.take_fired(timer);
        self.with_session(|s| s.on_timer(timer));
    }

    fn listen(self: &Rc<Self>, kind: ListenerKind) -> Option<EventListener> {
        match kind {
            ListenerKind::Wheel => Some(self.listen_stage(kind, |weak, event| {
                let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                    return;
                };
                let (dx, dy) = (wheel.delta_x(), wheel.delta_y());
                if Self::handle(weak, |s| s.on_wheel(dx, dy)).unwrap_or(false) {
                    event.prevent_default();
                }
            })),
            ListenerKind::TouchStart => Some(self.listen_stage(kind, |weak, event| {
                if let Some((x, y)) = first_touch(event) {
                    Self::handle(weak, |s| s.on_touch_start(x, y));
                }
            })),
            ListenerKind::TouchMove => Some(self.listen_stage(kind, |weak, event| {
                let Some((x, y)) = first_touch(event) else {
                    return;
                };
                if Self::handle(weak, |s| s.on_touch_move(x, y)).unwrap_or(false) {
                    event.prevent_default();
                }
            })),
            ListenerKind::TouchEnd => Some(self.listen_stage(kind, |weak, _| {
                Self::handle(weak, |s| s.on_touch_end());
            })),
            ListenerKind::CarouselKeydown => self.listen_window(kind, |weak, event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) else {
                    return;
                };
                if Self::handle(weak, |s| s.on_key(&key)).unwrap_or(false) {
                    event.prevent_default();
                }
            }),
            ListenerKind::Resize | ListenerKind::OrientationChange => {
                self.listen_window(kind, |weak, _| {
                    if let Some(width) = window_width() {
                        Self::handle(weak, |s| s.on_resize(width));
                    }
                })
            }
            ListenerKind::OverlayKeydown => None,
        }
    }
}

/// モーダル側で描画に使うシグナル
#[derive(Clone, Copy)]
pub struct OverlayView {
    pub selected: RwSignal<usize>,
    pub direction: RwSignal<SlideDirection>,
    pub embed: RwSignal<EmbedState>,
}

/// プレビュー欄の表示内容
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewView {
    pub embed_url: Option<String>,
    pub loading: bool,
    pub fallback_image: Option<ImageRef>,
    pub warning: bool,
}

pub struct OverlayDriver {
    overlay: RefCell<DetailOverlay>,
    projects: Vec<ProjectRecord>,
    runtime: EffectRuntime,
    view: OverlayView,
    on_command: Rc<dyn Fn(OverlayCommand)>,
    panel: RefCell<Option<HtmlElement>>,
    restore_focus: RefCell<Option<HtmlElement>>,
}

impl OverlayDriver {
    pub fn open(
        projects: Vec<ProjectRecord>,
        index: usize,
        view: OverlayView,
        on_command: Rc<dyn Fn(OverlayCommand)>,
    ) -> Option<Rc<Self>> {
        let overlay = DetailOverlay::open(&projects, index)?;
        let driver = Rc::new(Self {
            overlay: RefCell::new(overlay),
            projects,
            runtime: EffectRuntime::new(),
            view,
            on_command,
            panel: RefCell::new(None),
            restore_focus: RefCell::new(None),
        });
        driver.flush();
        Some(driver)
    }

    fn flush(self: &Rc<Self>) {
        let effects = self.overlay.borrow_mut().drain_effects();
        self.runtime.apply(self, effects);
        self.sync();
    }

    fn sync(&self) {
        let overlay = self.overlay.borrow();
        let state = overlay.state();
        let view = self.view;
        if view.selected.get_untracked() != state.selected_index() {
            view.selected.set(state.selected_index());
        }
        if view.direction.get_untracked() != state.slide_direction() {
            view.direction.set(state.slide_direction());
        }
        if view.embed.get_untracked() != state.embed_state() {
            view.embed.set(state.embed_state());
        }
    }

    /// 呼び出し側への通知はイベント処理が終わってから
    fn dispatch(&self, command: Option<OverlayCommand>) {
        if let Some(command) = command {
            let on_command = Rc::clone(&self.on_command);
            wasm_bindgen_futures::spawn_local(async move { on_command(command) });
        }
    }

    fn run(self: &Rc<Self>, f: impl FnOnce(&mut DetailOverlay, &[ProjectRecord]) -> Option<OverlayCommand>) -> bool {
        let command = f(&mut self.overlay.borrow_mut(), &self.projects);
        self.flush();
        let handled = command.is_some();
        self.dispatch(command);
        handled
    }

    pub fn next(self: &Rc<Self>) {
        self.run(|o, p| o.next(p));
    }

    pub fn prev(self: &Rc<Self>) {
        self.run(|o, p| o.prev(p));
    }

    pub fn request_close(self: &Rc<Self>) {
        self.run(|_, _| Some(OverlayCommand::Close));
    }

    pub fn on_backdrop_click(self: &Rc<Self>, target_is_backdrop: bool) {
        self.run(|o, _| o.on_backdrop_click(target_is_backdrop));
    }

    pub fn on_embed_load(self: &Rc<Self>) {
        self.run(|o, _| {
            o.on_embed_load();
            None
        });
    }

    pub fn on_embed_error(self: &Rc<Self>) {
        self.run(|o, _| {
            o.on_embed_error();
            None
        });
    }

    pub fn has_navigation(&self) -> bool {
        self.overlay.borrow().state().has_navigation()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn record(&self, index: usize) -> Option<ProjectRecord> {
        self.projects.get(index).cloned()
    }

    pub fn preview(&self, index: usize) -> Option<PreviewView> {
        let record = self.projects.get(index)?;
        let overlay = self.overlay.borrow();
        let preview = overlay.state().preview(record);
        Some(PreviewView {
            embed_url: preview.embed_url.map(str::to_string),
            loading: preview.loading,
            fallback_image: preview.fallback_image.cloned(),
            warning: preview.warning,
        })
    }

    /// パネルへフォーカスを移す。閉じたときは開く前の要素へ戻す
    pub fn attach_panel(&self, panel: HtmlElement) {
        let previous = active_element().and_then(|el| el.dyn_into::<HtmlElement>().ok());
        panel.focus().ok();
        *self.restore_focus.borrow_mut() = previous;
        *self.panel.borrow_mut() = Some(panel);
    }

    /// Tab / Shift+Tab をパネル内で循環させる
    fn cycle_focus(&self, backwards: bool) {
        let Some(panel) = self.panel.borrow().clone() else {
            return;
        };
        let targets = focusable_in(&panel);
        let focused = active_element().and_then(|active| {
            targets.iter().position(|el| {
                let node: &web_sys::Node = el;
                active.is_same_node(Some(node))
            })
        });
        let next = self
            .overlay
            .borrow()
            .on_tab(backwards, focused, targets.len());
        if let Some(target) = next.and_then(|i| targets.get(i)) {
            target.focus().ok();
        }
    }

    /// ロック解除・リスナー解除・タイマー取り消し
    pub fn close(self: &Rc<Self>) {
        self.overlay.borrow_mut().close();
        self.flush();
        self.panel.borrow_mut().take();
        if let Some(previous) = self.restore_focus.borrow_mut().take() {
            previous.focus().ok();
        }
    }
}

impl EffectHost for OverlayDriver {
    fn fire_timer(self: &Rc<Self>, timer: TimerKind) {
        self.runtime.take_fired(timer);
        self.run(|o, _| {
            o.on_timer(timer);
            None
        });
    }

    fn listen(self: &Rc<Self>, kind: ListenerKind) -> Option<EventListener> {
        if kind != ListenerKind::OverlayKeydown {
            return None;
        }
        let document = web_sys::window()?.document()?;
        let weak = Rc::downgrade(self);
        Some(listen_on(&document, kind, move |event| {
            let (Some(driver), Some(keyboard)) = (weak.upgrade(), event.dyn_ref::<KeyboardEvent>())
            else {
                return;
            };
            let key = keyboard.key();
            if Key::from_dom(&key) == Key::Tab {
                // 背面のカルーセルへは抜けさせない
                event.prevent_default();
                driver.cycle_focus(keyboard.shift_key());
                return;
            }
            if driver.run(|o, p| o.on_key(&key, p)) {
                event.prevent_default();
            }
        }))
    }
}
