//! 状態機械が出力した副作用をブラウザへ適用する
//!
//! タイマーは gloo の `Timeout`、リスナーは `EventListener` として保持し、
//! どちらも drop で取り消し・解除される。

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use portfolio_common::{Effect, ListenerKind, TimerKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use web_sys::EventTarget;

const SCROLL_LOCK_CLASS: &str = "overflow-hidden";

/// 副作用の持ち主（カルーセル / モーダル）
pub trait EffectHost: 'static {
    fn fire_timer(self: &Rc<Self>, timer: TimerKind);

    /// 要求されたリスナーを生成する。対象要素が無ければ None
    fn listen(self: &Rc<Self>, listener: ListenerKind) -> Option<EventListener>;
}

/// body の `overflow-hidden` クラス。drop で外す
pub struct ScrollLock {
    body: web_sys::HtmlElement,
}

impl ScrollLock {
    pub fn acquire() -> Option<Self> {
        let body = web_sys::window()?.document()?.body()?;
        body.class_list().add_1(SCROLL_LOCK_CLASS).ok()?;
        Some(Self { body })
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        let _ = self.body.class_list().remove_1(SCROLL_LOCK_CLASS);
    }
}

#[derive(Default)]
pub struct EffectRuntime {
    timers: RefCell<HashMap<TimerKind, Timeout>>,
    listeners: RefCell<HashMap<ListenerKind, EventListener>>,
    scroll_lock: RefCell<Option<ScrollLock>>,
}

impl EffectRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply<H: EffectHost>(&self, host: &Rc<H>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Schedule { timer, delay_ms } => {
                    let weak = Rc::downgrade(host);
                    let timeout = Timeout::new(delay_ms, move || {
                        if let Some(host) = weak.upgrade() {
                            host.fire_timer(timer);
                        }
                    });
                    // 古い同種タイマーは drop で取り消される
                    self.timers.borrow_mut().insert(timer, timeout);
                }
                Effect::Cancel(timer) => {
                    self.timers.borrow_mut().remove(&timer);
                }
                Effect::Attach(kind) => match host.listen(kind) {
                    Some(listener) => {
                        self.listeners.borrow_mut().insert(kind, listener);
                    }
                    None => gloo::console::warn!(format!(
                        "listener target missing: {}",
                        kind.event_name()
                    )),
                },
                Effect::Detach(kind) => {
                    self.listeners.borrow_mut().remove(&kind);
                }
                Effect::LockScroll => {
                    let lock = ScrollLock::acquire();
                    if lock.is_none() {
                        gloo::console::warn!("scroll lock unavailable");
                    }
                    *self.scroll_lock.borrow_mut() = lock;
                }
                Effect::UnlockScroll => {
                    self.scroll_lock.borrow_mut().take();
                }
            }
        }
    }

    /// 満了したタイマーを手放す（コールバック内から呼ぶ）
    pub fn take_fired(&self, timer: TimerKind) {
        self.timers.borrow_mut().remove(&timer);
    }

    pub fn timer_count(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.borrow().is_some()
    }
}

/// preventDefault する可能性があるものは passive: false で登録する
pub fn listen_on<F>(target: &EventTarget, kind: ListenerKind, callback: F) -> EventListener
where
    F: FnMut(&web_sys::Event) + 'static,
{
    let options = EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: !kind.may_prevent_default(),
    };
    EventListener::new_with_options(target, kind.event_name(), options, callback)
}
