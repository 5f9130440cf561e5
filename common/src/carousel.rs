//! カルーセル状態機械
//!
//! 状態は Idle / Transitioning の2つ。遷移中の advance / retreat は
//! キューせずに捨てる。jump_to だけはロックを無視する（インジケーター操作用）。
//! クールダウンの計時はこのモジュールでは行わず、呼び出し側が
//! [`TRANSITION_COOLDOWN_MS`] 後に [`CarouselState::finish_transition`] を呼ぶ。

use crate::gesture::Intent;
use crate::ring::Ring;

/// 遷移アニメーションと同じ長さのクールダウン
pub const TRANSITION_COOLDOWN_MS: u32 = 700;
/// これより遠いカードは描画しない
pub const VISIBILITY_CUTOFF: usize = 2;
/// クリック・キー操作を受け付ける距離
pub const INTERACTIVE_CUTOFF: usize = 1;
/// モバイル判定の画面幅
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

const MIN_OPACITY: f64 = 0.3;
const OPACITY_STEP: f64 = 0.3;
const MIN_SCALE: f64 = 0.7;
const SCALE_STEP: f64 = 0.15;
const DEPTH_STEP_PX: f64 = -40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning,
}

/// 画面サイズ区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewport {
    Mobile,
    #[default]
    Desktop,
}

impl Viewport {
    pub fn from_width(width_px: f64) -> Self {
        if width_px < MOBILE_BREAKPOINT_PX {
            Viewport::Mobile
        } else {
            Viewport::Desktop
        }
    }

    /// 1枚あたりの回転角（度）
    pub fn angle_step_deg(&self) -> f64 {
        match self {
            Viewport::Mobile => 35.0,
            Viewport::Desktop => 45.0,
        }
    }

    pub fn radius_px(&self) -> f64 {
        match self {
            Viewport::Mobile => 160.0,
            Viewport::Desktop => 240.0,
        }
    }

    /// カードの (幅, 高さ)
    pub fn card_size_px(&self) -> (f64, f64) {
        match self {
            Viewport::Mobile => (180.0, 260.0),
            Viewport::Desktop => (220.0, 300.0),
        }
    }
}

/// カード1枚の3D配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// 現在位置からの符号付き距離
    pub offset: isize,
    pub angle_deg: f64,
    pub translate_x_px: f64,
    pub translate_z_px: f64,
    pub opacity: f64,
    pub scale: f64,
    pub z_index: i32,
}

impl Placement {
    fn for_offset(offset: isize, len: usize, viewport: Viewport) -> Self {
        let distance = offset.unsigned_abs() as f64;
        let angle_deg = offset as f64 * viewport.angle_step_deg();
        let radians = angle_deg.to_radians();
        let radius = viewport.radius_px();

        let (opacity, scale) = if offset == 0 {
            (1.0, 1.0)
        } else {
            (
                (1.0 - distance * OPACITY_STEP).max(MIN_OPACITY),
                (1.0 - distance * SCALE_STEP).max(MIN_SCALE),
            )
        };

        Self {
            offset,
            angle_deg,
            translate_x_px: radians.sin() * radius,
            translate_z_px: radians.cos() * radius + distance * DEPTH_STEP_PX,
            opacity,
            scale,
            z_index: len as i32 - offset.unsigned_abs() as i32,
        }
    }

    pub fn distance(&self) -> usize {
        self.offset.unsigned_abs()
    }

    pub fn is_centered(&self) -> bool {
        self.offset == 0
    }

    pub fn is_visible(&self) -> bool {
        self.distance() <= VISIBILITY_CUTOFF
    }

    pub fn is_interactive(&self) -> bool {
        self.distance() <= INTERACTIVE_CUTOFF
    }

    /// CSS `transform` の値
    pub fn transform_css(&self) -> String {
        // -0.0 を "-0.00" と出さないため減算で反転
        let rotate_y = 0.0 - self.angle_deg;
        format!(
            "translateX({:.2}px) translateZ({:.2}px) rotateY({:.2}deg)",
            self.translate_x_px, self.translate_z_px, rotate_y
        )
    }
}

/// カルーセルの状態
#[derive(Debug, Clone)]
pub struct CarouselState {
    ring: Ring,
    current_index: usize,
    phase: Phase,
}

impl CarouselState {
    /// 空のリストでは作れない
    pub fn new(len: usize) -> Option<Self> {
        Ring::new(len).map(|ring| Self {
            ring,
            current_index: 0,
            phase: Phase::Idle,
        })
    }

    pub fn ring(&self) -> Ring {
        self.ring
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase == Phase::Transitioning
    }

    /// 次へ。遷移を開始したら true
    pub fn advance(&mut self) -> bool {
        self.step(Intent::Advance)
    }

    /// 前へ。遷移を開始したら true
    pub fn retreat(&mut self) -> bool {
        self.step(Intent::Retreat)
    }

    pub fn step(&mut self, intent: Intent) -> bool {
        if self.is_transitioning() {
            return false;
        }
        self.current_index = match intent {
            Intent::Advance => self.ring.next(self.current_index),
            Intent::Retreat => self.ring.prev(self.current_index),
        };
        self.phase = Phase::Transitioning;
        true
    }

    /// 直接指定。ロック中でも反映し、フェーズは変えない
    pub fn jump_to(&mut self, index: usize) {
        self.current_index = self.ring.wrap(index);
    }

    /// クールダウン満了
    pub fn finish_transition(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn placement_of(&self, index: usize, viewport: Viewport) -> Placement {
        let offset = self.ring.distance(self.current_index, index);
        Placement::for_offset(offset, self.len(), viewport)
    }

    /// 描画対象のカード（インデックス順）
    pub fn visible_placements(&self, viewport: Viewport) -> Vec<(usize, Placement)> {
        (0..self.len())
            .map(|i| (i, self.placement_of(i, viewport)))
            .filter(|(_, p)| p.is_visible())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_refused() {
        assert!(CarouselState::new(0).is_none());
    }

    #[test]
    fn test_advance_locks_until_finished() {
        let mut c = CarouselState::new(4).unwrap();
        assert!(c.advance());
        assert!(c.is_transitioning());
        assert!(!c.advance());
        assert!(!c.retreat());
        assert_eq!(c.current_index(), 1);

        c.finish_transition();
        assert!(c.retreat());
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn test_retreat_wraps() {
        let mut c = CarouselState::new(3).unwrap();
        c.retreat();
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn test_jump_to_bypasses_lock() {
        let mut c = CarouselState::new(5).unwrap();
        c.advance();
        c.jump_to(3);
        assert_eq!(c.current_index(), 3);
        assert!(c.is_transitioning());
    }

    #[test]
    fn test_jump_to_normalizes() {
        let mut c = CarouselState::new(5).unwrap();
        c.jump_to(12);
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn test_centered_placement() {
        for len in 1..8 {
            let mut c = CarouselState::new(len).unwrap();
            c.jump_to(len / 2);
            let p = c.placement_of(c.current_index(), Viewport::Desktop);
            assert!(p.is_centered());
            assert_eq!(p.angle_deg, 0.0);
            assert_eq!(p.translate_x_px, 0.0);
            assert_eq!(p.opacity, 1.0);
            assert_eq!(p.scale, 1.0);
            assert_eq!(p.z_index, len as i32);
        }
    }

    #[test]
    fn test_placement_decay_and_floor() {
        let c = CarouselState::new(9).unwrap();
        let one = c.placement_of(1, Viewport::Desktop);
        let two = c.placement_of(2, Viewport::Desktop);
        let four = c.placement_of(4, Viewport::Desktop);

        assert!((one.opacity - 0.7).abs() < 1e-9);
        assert!((one.scale - 0.85).abs() < 1e-9);
        assert!(two.opacity < one.opacity);
        assert!(two.scale < one.scale);
        assert_eq!(four.opacity, 0.3);
        assert_eq!(four.scale, 0.7);
    }

    #[test]
    fn test_visibility_and_interactivity() {
        let c = CarouselState::new(7).unwrap();
        let visible: Vec<usize> = c
            .visible_placements(Viewport::Desktop)
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        assert_eq!(visible, vec![0, 1, 2, 5, 6]);

        assert!(c.placement_of(1, Viewport::Desktop).is_interactive());
        assert!(c.placement_of(6, Viewport::Desktop).is_interactive());
        assert!(!c.placement_of(2, Viewport::Desktop).is_interactive());
    }

    #[test]
    fn test_side_cards_mirror() {
        let c = CarouselState::new(5).unwrap();
        let right = c.placement_of(1, Viewport::Mobile);
        let left = c.placement_of(4, Viewport::Mobile);
        assert!((right.translate_x_px + left.translate_x_px).abs() < 1e-9);
        assert!((right.translate_z_px - left.translate_z_px).abs() < 1e-9);
        assert_eq!(right.angle_deg, 35.0);
    }

    #[test]
    fn test_transform_css() {
        let c = CarouselState::new(3).unwrap();
        assert_eq!(
            c.placement_of(0, Viewport::Desktop).transform_css(),
            "translateX(0.00px) translateZ(240.00px) rotateY(0.00deg)"
        );
    }

    #[test]
    fn test_viewport_breakpoint() {
        assert_eq!(Viewport::from_width(767.0), Viewport::Mobile);
        assert_eq!(Viewport::from_width(768.0), Viewport::Desktop);
        assert_eq!(Viewport::Mobile.card_size_px(), (180.0, 260.0));
    }
}
