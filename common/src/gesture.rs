//! 入力ジェスチャーの正規化
//!
//! ホイール・タッチ・キー入力を「次へ / 前へ」の離散的な意図に変換する。
//! 蓄積量やタッチ開始点はすべてこの構造体のフィールドとして持つ。

/// ホイール横方向の発火しきい値
pub const WHEEL_THRESHOLD: f64 = 60.0;
/// 最後のホイール入力からこの時間で蓄積量をリセット
pub const WHEEL_IDLE_RESET_MS: u32 = 150;
/// スワイプと判定する横移動量
pub const SWIPE_THRESHOLD: f64 = 50.0;
/// この横移動量を超えたらページスクロールを抑止
pub const TOUCH_SCROLL_LOCK_THRESHOLD: f64 = 10.0;

/// ナビゲーション意図
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Advance,
    Retreat,
}

/// ホイールイベントの処理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    /// 縦スクロール優位、または横成分なし。ブラウザに任せる
    Ignored,
    /// 既定動作は止めるが、遷移中のため蓄積しない
    Suppressed,
    /// 蓄積した（しきい値を超えたら意図付き）。アイドルタイマーを張り直す
    Accumulated(Option<Intent>),
}

impl WheelOutcome {
    pub fn prevents_default(&self) -> bool {
        !matches!(self, WheelOutcome::Ignored)
    }
}

/// 認識するキー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Enter,
    Space,
    Tab,
    Other,
}

impl Key {
    /// `KeyboardEvent.key` の文字列から変換
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Tab" => Key::Tab,
            _ => Key::Other,
        }
    }

    /// カードを開くキー
    pub fn activates(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GestureNormalizer {
    scroll_accumulator: f64,
    touch_start: Option<Point>,
    touch_last: Option<Point>,
}

impl GestureNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_accumulator(&self) -> f64 {
        self.scroll_accumulator
    }

    /// ホイール入力
    ///
    /// `locked` は遷移中フラグ。遷移中も横スクロールの既定動作は止める。
    pub fn wheel(&mut self, delta_x: f64, delta_y: f64, locked: bool) -> WheelOutcome {
        if delta_y.abs() > delta_x.abs() || delta_x == 0.0 {
            return WheelOutcome::Ignored;
        }
        if locked {
            return WheelOutcome::Suppressed;
        }

        self.scroll_accumulator += delta_x;
        if self.scroll_accumulator.abs() >= WHEEL_THRESHOLD {
            let intent = if self.scroll_accumulator > 0.0 {
                Intent::Advance
            } else {
                Intent::Retreat
            };
            self.scroll_accumulator = 0.0;
            return WheelOutcome::Accumulated(Some(intent));
        }
        WheelOutcome::Accumulated(None)
    }

    /// アイドルタイマー満了
    pub fn wheel_idle(&mut self) {
        self.scroll_accumulator = 0.0;
    }

    pub fn touch_start(&mut self, point: Point, locked: bool) {
        if locked {
            return;
        }
        self.touch_start = Some(point);
        self.touch_last = None;
    }

    /// 横方向が優位なら true（ページスクロールを止める）
    pub fn touch_move(&mut self, point: Point, locked: bool) -> bool {
        let Some(start) = self.touch_start else {
            return false;
        };
        if locked {
            return false;
        }
        self.touch_last = Some(point);

        let dx = point.x - start.x;
        let dy = point.y - start.y;
        dx.abs() > dy.abs() && dx.abs() > TOUCH_SCROLL_LOCK_THRESHOLD
    }

    /// 右へドラッグ → 前へ、左へドラッグ → 次へ
    pub fn touch_end(&mut self, locked: bool) -> Option<Intent> {
        let start = self.touch_start.take();
        let last = self.touch_last.take();
        if locked {
            return None;
        }
        let (start, last) = (start?, last?);

        let dx = last.x - start.x;
        let dy = last.y - start.y;
        if dx.abs() > dy.abs() && dx.abs() > SWIPE_THRESHOLD {
            if dx > 0.0 {
                Some(Intent::Retreat)
            } else {
                Some(Intent::Advance)
            }
        } else {
            None
        }
    }

    /// 矢印キー。モーダル表示中は二重送りを防ぐため無視
    pub fn key(&self, key: Key, overlay_open: bool, locked: bool) -> Option<Intent> {
        if overlay_open || locked {
            return None;
        }
        match key {
            Key::ArrowLeft => Some(Intent::Retreat),
            Key::ArrowRight => Some(Intent::Advance),
            _ => None,
        }
    }

    /// アンマウント時の全消去
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
