//! マウント中のカルーセル1つ分のセッション
//!
//! ジェスチャー正規化と状態機械をまとめ、タイマー・リスナーを
//! [`Effect`] として出力する。出力した副作用は台帳に記録され、
//! [`CarouselSession::unmount`] で残りがすべて解放される。

use crate::carousel::{CarouselState, Placement, Viewport, TRANSITION_COOLDOWN_MS};
use crate::effects::{Effect, ListenerKind, ResourceLedger, TimerKind};
use crate::gesture::{GestureNormalizer, Intent, Key, Point, WheelOutcome, WHEEL_IDLE_RESET_MS};

/// マウント時に登録するリスナー
const MOUNT_LISTENERS: [ListenerKind; 7] = [
    ListenerKind::Wheel,
    ListenerKind::TouchStart,
    ListenerKind::TouchMove,
    ListenerKind::TouchEnd,
    ListenerKind::CarouselKeydown,
    ListenerKind::Resize,
    ListenerKind::OrientationChange,
];

#[derive(Debug)]
pub struct CarouselSession {
    carousel: CarouselState,
    gestures: GestureNormalizer,
    viewport: Viewport,
    overlay_open: bool,
    mounted: bool,
    ledger: ResourceLedger,
    outbox: Vec<Effect>,
}

impl CarouselSession {
    /// 0件ならマウントしない
    pub fn mount(len: usize, viewport: Viewport) -> Option<Self> {
        let carousel = CarouselState::new(len)?;
        let mut session = Self {
            carousel,
            gestures: GestureNormalizer::new(),
            viewport,
            overlay_open: false,
            mounted: true,
            ledger: ResourceLedger::new(),
            outbox: Vec::new(),
        };
        for listener in MOUNT_LISTENERS {
            session.emit(Effect::Attach(listener));
        }
        Some(session)
    }

    fn emit(&mut self, effect: Effect) {
        self.ledger.record(&effect);
        self.outbox.push(effect);
    }

    /// 未適用の副作用を取り出す
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.outbox)
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn state(&self) -> &CarouselState {
        &self.carousel
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn len(&self) -> usize {
        self.carousel.len()
    }

    pub fn current_index(&self) -> usize {
        self.carousel.current_index()
    }

    pub fn is_transitioning(&self) -> bool {
        self.carousel.is_transitioning()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_overlay_open(&self) -> bool {
        self.overlay_open
    }

    pub fn placement_of(&self, index: usize) -> Placement {
        self.carousel.placement_of(index, self.viewport)
    }

    pub fn visible_placements(&self) -> Vec<(usize, Placement)> {
        self.carousel.visible_placements(self.viewport)
    }

    pub fn advance(&mut self) -> bool {
        self.apply(Intent::Advance)
    }

    pub fn retreat(&mut self) -> bool {
        self.apply(Intent::Retreat)
    }

    fn apply(&mut self, intent: Intent) -> bool {
        if !self.mounted || !self.carousel.step(intent) {
            return false;
        }
        self.emit(Effect::Schedule {
            timer: TimerKind::TransitionCooldown,
            delay_ms: TRANSITION_COOLDOWN_MS,
        });
        true
    }

    /// インジケーター・モーダルからの直接指定
    pub fn jump_to(&mut self, index: usize) {
        if self.mounted {
            self.carousel.jump_to(index);
        }
    }

    /// 戻り値が true なら preventDefault する
    pub fn on_wheel(&mut self, delta_x: f64, delta_y: f64) -> bool {
        if !self.mounted {
            return false;
        }
        let outcome = self
            .gestures
            .wheel(delta_x, delta_y, self.carousel.is_transitioning());
        if let WheelOutcome::Accumulated(intent) = outcome {
            if let Some(intent) = intent {
                self.apply(intent);
            }
            self.emit(Effect::Schedule {
                timer: TimerKind::WheelIdle,
                delay_ms: WHEEL_IDLE_RESET_MS,
            });
        }
        outcome.prevents_default()
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64) {
        if self.mounted {
            let locked = self.carousel.is_transitioning();
            self.gestures.touch_start(Point::new(x, y), locked);
        }
    }

    /// 戻り値が true なら preventDefault する
    pub fn on_touch_move(&mut self, x: f64, y: f64) -> bool {
        if !self.mounted {
            return false;
        }
        let locked = self.carousel.is_transitioning();
        self.gestures.touch_move(Point::new(x, y), locked)
    }

    pub fn on_touch_end(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        match self.gestures.touch_end(self.carousel.is_transitioning()) {
            Some(intent) => self.apply(intent),
            None => false,
        }
    }

    /// 矢印キー。移動したら true
    pub fn on_key(&mut self, key: &str) -> bool {
        if !self.mounted {
            return false;
        }
        let intent = self.gestures.key(
            Key::from_dom(key),
            self.overlay_open,
            self.carousel.is_transitioning(),
        );
        match intent {
            Some(intent) => self.apply(intent),
            None => false,
        }
    }

    /// 画面幅の変化。区分が変わったら true
    pub fn on_resize(&mut self, width_px: f64) -> bool {
        let viewport = Viewport::from_width(width_px);
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        true
    }

    pub fn set_overlay_open(&mut self, open: bool) {
        self.overlay_open = open;
    }

    /// 操作可能な距離のカードか
    pub fn can_activate(&self, index: usize) -> bool {
        self.mounted && index < self.len() && self.placement_of(index).is_interactive()
    }

    /// カードのクリック / Enter。開けたら中央へ寄せてオーバーレイ表示中にする
    pub fn activate(&mut self, index: usize) -> bool {
        if self.overlay_open || !self.can_activate(index) {
            return false;
        }
        self.carousel.jump_to(index);
        self.overlay_open = true;
        true
    }

    /// ホストからのタイマー満了通知。取り消し済みのものは無視
    pub fn on_timer(&mut self, timer: TimerKind) {
        if !self.ledger.fire(timer) {
            return;
        }
        match timer {
            TimerKind::TransitionCooldown => self.carousel.finish_transition(),
            TimerKind::WheelIdle => self.gestures.wheel_idle(),
            TimerKind::EmbedTimeout => {}
        }
    }

    /// タイマーを取り消し、リスナーを外す
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        for effect in self.ledger.release_all() {
            self.emit(effect);
        }
        self.gestures.reset();
        self.carousel.finish_transition();
        self.mounted = false;
    }
}
