//! ブラウザ上での副作用適用テスト（wasm-pack test --headless --firefox）

use gloo::events::EventListener;
use portfolio_common::{Effect, ListenerKind, TimerKind};
use portfolio_wasm::runtime::{listen_on, EffectHost, EffectRuntime, ScrollLock};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[derive(Default)]
struct CountingHost {
    fired: Cell<u32>,
}

impl EffectHost for CountingHost {
    fn fire_timer(self: &Rc<Self>, _timer: TimerKind) {
        self.fired.set(self.fired.get() + 1);
    }

    fn listen(self: &Rc<Self>, kind: ListenerKind) -> Option<EventListener> {
        let window = web_sys::window()?;
        Some(listen_on(&window, kind, |_| {}))
    }
}

fn body_locked() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .map(|b| b.class_list().contains("overflow-hidden"))
        .unwrap_or(false)
}

#[wasm_bindgen_test]
fn test_scroll_lock_released_on_drop() {
    let lock = ScrollLock::acquire().expect("body available");
    assert!(body_locked());
    drop(lock);
    assert!(!body_locked());
}

#[wasm_bindgen_test]
fn test_runtime_tracks_and_releases() {
    let host = Rc::new(CountingHost::default());
    let runtime = EffectRuntime::new();

    runtime.apply(
        &host,
        vec![
            Effect::Attach(ListenerKind::Resize),
            Effect::Schedule {
                timer: TimerKind::WheelIdle,
                delay_ms: 10_000,
            },
            Effect::Schedule {
                timer: TimerKind::WheelIdle,
                delay_ms: 10_000,
            },
            Effect::LockScroll,
        ],
    );
    assert_eq!(runtime.listener_count(), 1);
    assert_eq!(runtime.timer_count(), 1);
    assert!(runtime.is_scroll_locked());

    runtime.apply(
        &host,
        vec![
            Effect::Cancel(TimerKind::WheelIdle),
            Effect::Detach(ListenerKind::Resize),
            Effect::UnlockScroll,
        ],
    );
    assert_eq!(runtime.listener_count(), 0);
    assert_eq!(runtime.timer_count(), 0);
    assert!(!body_locked());
    assert_eq!(host.fired.get(), 0);
}
