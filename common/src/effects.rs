//! タイマー・リスナー・スクロールロックの副作用
//!
//! 状態機械は副作用を直接実行せず [`Effect`] として出力する。
//! ホスト（ブラウザ側ランタイムやテスト）がそれを適用し、
//! タイマー満了時に状態機械へ通知する。
//! [`ResourceLedger`] は未解放のリソースを数えるための台帳。

use std::collections::BTreeSet;

/// タイマー種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// 遷移ロック解除
    TransitionCooldown,
    /// ホイール蓄積量のリセット
    WheelIdle,
    /// 埋め込みプレビューの読み込み打ち切り
    EmbedTimeout,
}

/// イベントリスナー種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerKind {
    Wheel,
    TouchStart,
    TouchMove,
    TouchEnd,
    /// カルーセルの矢印キー（window）
    CarouselKeydown,
    Resize,
    OrientationChange,
    /// モーダルの Escape / 矢印キー（document）
    OverlayKeydown,
}

impl ListenerKind {
    /// DOMイベント名
    pub fn event_name(&self) -> &'static str {
        match self {
            ListenerKind::Wheel => "wheel",
            ListenerKind::TouchStart => "touchstart",
            ListenerKind::TouchMove => "touchmove",
            ListenerKind::TouchEnd => "touchend",
            ListenerKind::CarouselKeydown | ListenerKind::OverlayKeydown => "keydown",
            ListenerKind::Resize => "resize",
            ListenerKind::OrientationChange => "orientationchange",
        }
    }

    /// preventDefault を呼ぶ可能性があるか（passive: false が必要）
    pub fn may_prevent_default(&self) -> bool {
        matches!(self, ListenerKind::Wheel | ListenerKind::TouchMove)
    }
}

/// ホストに適用してもらう副作用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// 同種のタイマーが残っていれば置き換える
    Schedule { timer: TimerKind, delay_ms: u32 },
    Cancel(TimerKind),
    Attach(ListenerKind),
    Detach(ListenerKind),
    LockScroll,
    UnlockScroll,
}

/// 未解放リソースの台帳
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLedger {
    timers: BTreeSet<TimerKind>,
    listeners: BTreeSet<ListenerKind>,
    scroll_locked: bool,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, effect: &Effect) {
        match *effect {
            Effect::Schedule { timer, .. } => {
                self.timers.insert(timer);
            }
            Effect::Cancel(timer) => {
                self.timers.remove(&timer);
            }
            Effect::Attach(listener) => {
                self.listeners.insert(listener);
            }
            Effect::Detach(listener) => {
                self.listeners.remove(&listener);
            }
            Effect::LockScroll => self.scroll_locked = true,
            Effect::UnlockScroll => self.scroll_locked = false,
        }
    }

    /// タイマー満了で台帳から外す。保持していなければ false（古い通知）
    pub fn fire(&mut self, timer: TimerKind) -> bool {
        self.timers.remove(&timer)
    }

    pub fn has_timer(&self, timer: TimerKind) -> bool {
        self.timers.contains(&timer)
    }

    pub fn has_listener(&self, listener: ListenerKind) -> bool {
        self.listeners.contains(&listener)
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn is_clear(&self) -> bool {
        self.timers.is_empty() && self.listeners.is_empty() && !self.scroll_locked
    }

    /// 残っているものをすべて解放する副作用列
    pub fn release_all(&self) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self.timers.iter().map(|&t| Effect::Cancel(t)).collect();
        effects.extend(self.listeners.iter().map(|&l| Effect::Detach(l)));
        if self.scroll_locked {
            effects.push(Effect::UnlockScroll);
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_tracks_effects() {
        let mut ledger = ResourceLedger::new();
        ledger.record(&Effect::Attach(ListenerKind::Wheel));
        ledger.record(&Effect::Schedule {
            timer: TimerKind::WheelIdle,
            delay_ms: 150,
        });
        ledger.record(&Effect::LockScroll);
        assert_eq!(ledger.timer_count(), 1);
        assert_eq!(ledger.listener_count(), 1);
        assert!(ledger.is_scroll_locked());

        for effect in ledger.clone().release_all() {
            ledger.record(&effect);
        }
        assert!(ledger.is_clear());
    }

    #[test]
    fn test_rescheduling_same_timer_counts_once() {
        let mut ledger = ResourceLedger::new();
        for _ in 0..3 {
            ledger.record(&Effect::Schedule {
                timer: TimerKind::WheelIdle,
                delay_ms: 150,
            });
        }
        assert_eq!(ledger.timer_count(), 1);
    }

    #[test]
    fn test_fire_stale_timer() {
        let mut ledger = ResourceLedger::new();
        assert!(!ledger.fire(TimerKind::TransitionCooldown));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ListenerKind::OverlayKeydown.event_name(), "keydown");
        assert_eq!(ListenerKind::OrientationChange.event_name(), "orientationchange");
        assert!(ListenerKind::TouchMove.may_prevent_default());
        assert!(!ListenerKind::TouchStart.may_prevent_default());
    }
}
