//! 詳細モーダル
//!
//! [`ModalState`] は表示中のインデックスとスライド方向、埋め込みプレビューの
//! 読み込み状態だけを持ち、レコード本体は共有リストから毎回引く。
//! [`DetailOverlay`] はモーダルが開いている間のスクロールロック・キー
//! リスナー・読み込みタイムアウトを台帳で管理する。
//! 移動先のインデックスは [`OverlayCommand::Navigate`] で呼び出し側へ返し、
//! カルーセル側の状態には直接触れない。

use crate::effects::{Effect, ListenerKind, ResourceLedger, TimerKind};
use crate::gesture::Key;
use crate::ring::Ring;
use crate::types::{ImageRef, ProjectRecord};

/// 埋め込みプレビューの読み込み打ち切り時間
pub const EMBED_TIMEOUT_MS: u32 = 10_000;
/// 埋め込みプレビューの sandbox 属性
pub const EMBED_SANDBOX: &str = "allow-same-origin allow-scripts allow-popups allow-forms";
/// 埋め込みページの描画サイズと縮小率
pub const EMBED_FRAME_SIZE_PX: (u32, u32) = (1366, 768);
pub const EMBED_FRAME_SCALE: f64 = 0.25;
/// スライドアニメーションの移動量
pub const SLIDE_DISTANCE_PX: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideDirection {
    #[default]
    Forward,
    Backward,
}

impl SlideDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideDirection::Forward => "forward",
            SlideDirection::Backward => "backward",
        }
    }

    /// 入ってくる内容の開始位置
    pub fn enter_offset_px(&self) -> f64 {
        match self {
            SlideDirection::Forward => SLIDE_DISTANCE_PX,
            SlideDirection::Backward => -SLIDE_DISTANCE_PX,
        }
    }

    /// 出ていく内容の終了位置
    pub fn exit_offset_px(&self) -> f64 {
        -self.enter_offset_px()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedState {
    /// Webサイトのリンクが無い
    Absent,
    Loading,
    Loaded,
    Failed,
}

impl EmbedState {
    fn for_record(record: Option<&ProjectRecord>) -> Self {
        match record.and_then(|r| r.website_url()) {
            Some(_) => EmbedState::Loading,
            None => EmbedState::Absent,
        }
    }
}

/// プレビュー欄に何を出すか
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preview<'a> {
    pub embed_url: Option<&'a str>,
    /// 読み込み中インジケーターを重ねる
    pub loading: bool,
    pub fallback_image: Option<&'a ImageRef>,
    /// "iframe blocked" の注意書き
    pub warning: bool,
}

impl Preview<'_> {
    pub fn is_empty(&self) -> bool {
        self.embed_url.is_none() && self.fallback_image.is_none() && !self.warning
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalState {
    ring: Ring,
    selected_index: usize,
    slide_direction: SlideDirection,
    embed: EmbedState,
}

impl ModalState {
    pub fn open(records: &[ProjectRecord], index: usize) -> Option<Self> {
        let ring = Ring::new(records.len())?;
        let selected_index = ring.wrap(index);
        Some(Self {
            ring,
            selected_index,
            slide_direction: SlideDirection::Forward,
            embed: EmbedState::for_record(records.get(selected_index)),
        })
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn slide_direction(&self) -> SlideDirection {
        self.slide_direction
    }

    pub fn embed_state(&self) -> EmbedState {
        self.embed
    }

    /// 2件以上あるときだけ前後移動できる
    pub fn has_navigation(&self) -> bool {
        self.ring.len() > 1
    }

    pub fn next(&mut self, records: &[ProjectRecord]) -> Option<usize> {
        if !self.has_navigation() {
            return None;
        }
        let index = self.ring.next(self.selected_index);
        self.select(records, index, SlideDirection::Forward);
        Some(index)
    }

    pub fn prev(&mut self, records: &[ProjectRecord]) -> Option<usize> {
        if !self.has_navigation() {
            return None;
        }
        let index = self.ring.prev(self.selected_index);
        self.select(records, index, SlideDirection::Backward);
        Some(index)
    }

    fn select(&mut self, records: &[ProjectRecord], index: usize, direction: SlideDirection) {
        self.selected_index = index;
        self.slide_direction = direction;
        self.embed = EmbedState::for_record(records.get(index));
    }

    /// 読み込み中だった場合のみ反映
    pub fn embed_loaded(&mut self) -> bool {
        if self.embed != EmbedState::Loading {
            return false;
        }
        self.embed = EmbedState::Loaded;
        true
    }

    pub fn embed_failed(&mut self) -> bool {
        if !matches!(self.embed, EmbedState::Loading | EmbedState::Loaded) {
            return false;
        }
        self.embed = EmbedState::Failed;
        true
    }

    pub fn preview<'a>(&self, record: &'a ProjectRecord) -> Preview<'a> {
        let url = record.website_url();
        let failed = self.embed == EmbedState::Failed;
        let embed_url = url.filter(|_| !failed);

        Preview {
            embed_url,
            loading: embed_url.is_some() && self.embed == EmbedState::Loading,
            fallback_image: record.image().filter(|_| url.is_none() || failed),
            warning: failed && url.is_some(),
        }
    }
}

/// モーダルから呼び出し側への要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayCommand {
    Close,
    /// 表示が移動した。カルーセルをこのインデックスに合わせる
    Navigate(usize),
}

#[derive(Debug)]
pub struct DetailOverlay {
    state: ModalState,
    open: bool,
    ledger: ResourceLedger,
    outbox: Vec<Effect>,
}

impl DetailOverlay {
    /// スクロールをロックし、キーリスナーを登録する
    pub fn open(records: &[ProjectRecord], index: usize) -> Option<Self> {
        let state = ModalState::open(records, index)?;
        let mut overlay = Self {
            state,
            open: true,
            ledger: ResourceLedger::new(),
            outbox: Vec::new(),
        };
        overlay.emit(Effect::LockScroll);
        overlay.emit(Effect::Attach(ListenerKind::OverlayKeydown));
        overlay.arm_embed_timeout();
        Some(overlay)
    }

    fn emit(&mut self, effect: Effect) {
        self.ledger.record(&effect);
        self.outbox.push(effect);
    }

    fn arm_embed_timeout(&mut self) {
        if self.state.embed_state() == EmbedState::Loading {
            self.emit(Effect::Schedule {
                timer: TimerKind::EmbedTimeout,
                delay_ms: EMBED_TIMEOUT_MS,
            });
        } else if self.ledger.has_timer(TimerKind::EmbedTimeout) {
            self.emit(Effect::Cancel(TimerKind::EmbedTimeout));
        }
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.outbox)
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected_index(&self) -> usize {
        self.state.selected_index()
    }

    pub fn next(&mut self, records: &[ProjectRecord]) -> Option<OverlayCommand> {
        if !self.open {
            return None;
        }
        let index = self.state.next(records)?;
        self.arm_embed_timeout();
        Some(OverlayCommand::Navigate(index))
    }

    pub fn prev(&mut self, records: &[ProjectRecord]) -> Option<OverlayCommand> {
        if !self.open {
            return None;
        }
        let index = self.state.prev(records)?;
        self.arm_embed_timeout();
        Some(OverlayCommand::Navigate(index))
    }

    pub fn on_key(&mut self, key: &str, records: &[ProjectRecord]) -> Option<OverlayCommand> {
        if !self.open {
            return None;
        }
        match Key::from_dom(key) {
            Key::Escape => Some(OverlayCommand::Close),
            Key::ArrowLeft => self.prev(records),
            Key::ArrowRight => self.next(records),
            _ => None,
        }
    }

    /// Tab / Shift+Tab。フォーカスをパネル内で循環させる
    ///
    /// `focused` はパネル内の操作可能要素のうち現在フォーカスのある位置
    /// （パネル本体やパネル外なら None）。戻り値は次にフォーカスする位置
    pub fn on_tab(&self, backwards: bool, focused: Option<usize>, focusable: usize) -> Option<usize> {
        if !self.open {
            return None;
        }
        let ring = Ring::new(focusable)?;
        Some(match focused.filter(|&i| i < focusable) {
            Some(i) if backwards => ring.prev(i),
            Some(i) => ring.next(i),
            None if backwards => focusable - 1,
            None => 0,
        })
    }

    /// 背景そのものがクリックされたときだけ閉じる
    pub fn on_backdrop_click(&self, target_is_backdrop: bool) -> Option<OverlayCommand> {
        (self.open && target_is_backdrop).then_some(OverlayCommand::Close)
    }

    pub fn on_embed_load(&mut self) {
        if self.state.embed_loaded() && self.ledger.has_timer(TimerKind::EmbedTimeout) {
            self.emit(Effect::Cancel(TimerKind::EmbedTimeout));
        }
    }

    pub fn on_embed_error(&mut self) {
        if self.state.embed_failed() && self.ledger.has_timer(TimerKind::EmbedTimeout) {
            self.emit(Effect::Cancel(TimerKind::EmbedTimeout));
        }
    }

    pub fn on_timer(&mut self, timer: TimerKind) {
        if self.ledger.fire(timer) && timer == TimerKind::EmbedTimeout {
            self.state.embed_failed();
        }
    }

    /// ロック解除・リスナー解除・タイマー取り消し
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        for effect in self.ledger.release_all() {
            self.emit(effect);
        }
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::ProjectLink;

    fn records() -> Vec<ProjectRecord> {
        vec![
            ProjectRecord {
                name: "with site".into(),
                image: Some(ImageRef {
                    url: "https://img/a.png".into(),
                    ..Default::default()
                }),
                links: vec![
                    ProjectLink::new("https://github.com/me/a"),
                    ProjectLink::new("https://a.example.dev"),
                ],
                ..Default::default()
            },
            ProjectRecord {
                name: "image only".into(),
                image: Some(ImageRef {
                    url: "https://img/b.png".into(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ProjectRecord {
                name: "bare".into(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_open_empty_refused() {
        assert!(ModalState::open(&[], 0).is_none());
        assert!(DetailOverlay::open(&[], 0).is_none());
    }

    #[test]
    fn test_next_prev_directions() {
        let records = records();
        let mut state = ModalState::open(&records, 0).unwrap();
        assert_eq!(state.prev(&records), Some(2));
        assert_eq!(state.slide_direction(), SlideDirection::Backward);
        assert_eq!(state.next(&records), Some(0));
        assert_eq!(state.slide_direction(), SlideDirection::Forward);
    }

    #[test]
    fn test_single_record_has_no_navigation() {
        let records = vec![ProjectRecord::default()];
        let mut state = ModalState::open(&records, 0).unwrap();
        assert!(!state.has_navigation());
        assert_eq!(state.next(&records), None);
    }

    #[test]
    fn test_preview_embed_then_fallback() {
        let records = records();
        let mut state = ModalState::open(&records, 0).unwrap();

        let loading = state.preview(&records[0]);
        assert_eq!(loading.embed_url, Some("https://a.example.dev"));
        assert!(loading.loading);
        assert!(loading.fallback_image.is_none());

        assert!(state.embed_failed());
        let failed = state.preview(&records[0]);
        assert!(failed.embed_url.is_none());
        assert_eq!(failed.fallback_image.unwrap().url, "https://img/a.png");
        assert!(failed.warning);
    }

    #[test]
    fn test_preview_image_only_and_bare() {
        let records = records();
        let state = ModalState::open(&records, 1).unwrap();
        assert_eq!(state.embed_state(), EmbedState::Absent);
        let preview = state.preview(&records[1]);
        assert!(preview.fallback_image.is_some());
        assert!(!preview.warning);

        let bare = ModalState::open(&records, 2).unwrap();
        assert!(bare.preview(&records[2]).is_empty());
    }

    #[test]
    fn test_navigation_resets_embed_loading() {
        let records = records();
        let mut state = ModalState::open(&records, 0).unwrap();
        state.embed_loaded();
        state.next(&records);
        state.prev(&records);
        assert_eq!(state.embed_state(), EmbedState::Loading);
    }

    #[test]
    fn test_overlay_open_locks_and_listens() {
        let records = records();
        let mut overlay = DetailOverlay::open(&records, 0).unwrap();
        let effects = overlay.drain_effects();
        assert!(effects.contains(&Effect::LockScroll));
        assert!(effects.contains(&Effect::Attach(ListenerKind::OverlayKeydown)));
        assert!(overlay.ledger().has_timer(TimerKind::EmbedTimeout));
    }

    #[test]
    fn test_embed_timeout_falls_back() {
        let records = records();
        let mut overlay = DetailOverlay::open(&records, 0).unwrap();
        overlay.on_timer(TimerKind::EmbedTimeout);
        assert_eq!(overlay.state().embed_state(), EmbedState::Failed);
        assert!(overlay.state().preview(&records[0]).warning);
    }

    #[test]
    fn test_embed_load_cancels_timeout() {
        let records = records();
        let mut overlay = DetailOverlay::open(&records, 0).unwrap();
        overlay.drain_effects();
        overlay.on_embed_load();
        assert_eq!(
            overlay.drain_effects(),
            vec![Effect::Cancel(TimerKind::EmbedTimeout)]
        );
        overlay.on_timer(TimerKind::EmbedTimeout);
        assert_eq!(overlay.state().embed_state(), EmbedState::Loaded);
    }

    #[test]
    fn test_navigate_to_record_without_site_cancels_timeout() {
        let records = records();
        let mut overlay = DetailOverlay::open(&records, 0).unwrap();
        assert_eq!(overlay.next(&records), Some(OverlayCommand::Navigate(1)));
        assert!(!overlay.ledger().has_timer(TimerKind::EmbedTimeout));
    }

    #[test]
    fn test_keys_and_backdrop() {
        let records = records();
        let mut overlay = DetailOverlay::open(&records, 1).unwrap();
        assert_eq!(overlay.on_key("Escape", &records), Some(OverlayCommand::Close));
        assert_eq!(
            overlay.on_key("ArrowLeft", &records),
            Some(OverlayCommand::Navigate(0))
        );
        assert_eq!(overlay.on_key("Tab", &records), None);
        assert_eq!(overlay.on_backdrop_click(false), None);
        assert_eq!(overlay.on_backdrop_click(true), Some(OverlayCommand::Close));
    }

    #[test]
    fn test_tab_cycles_inside_panel() {
        let records = records();
        let overlay = DetailOverlay::open(&records, 0).unwrap();
        // パネル本体から入る
        assert_eq!(overlay.on_tab(false, None, 4), Some(0));
        assert_eq!(overlay.on_tab(true, None, 4), Some(3));
        assert_eq!(overlay.on_tab(false, Some(1), 4), Some(2));
        // 端で折り返す
        assert_eq!(overlay.on_tab(false, Some(3), 4), Some(0));
        assert_eq!(overlay.on_tab(true, Some(0), 4), Some(3));
        assert_eq!(overlay.on_tab(false, Some(9), 4), Some(0));
        assert_eq!(overlay.on_tab(false, None, 0), None);
    }

    #[test]
    fn test_tab_ignored_after_close() {
        let records = records();
        let mut overlay = DetailOverlay::open(&records, 0).unwrap();
        overlay.close();
        assert_eq!(overlay.on_tab(false, Some(0), 3), None);
    }

    #[test]
    fn test_close_releases_everything() {
        let records = records();
        let mut overlay = DetailOverlay::open(&records, 0).unwrap();
        overlay.close();
        assert!(overlay.ledger().is_clear());
        assert!(overlay.drain_effects().contains(&Effect::UnlockScroll));
        assert_eq!(overlay.next(&records), None);
        assert_eq!(overlay.on_backdrop_click(true), None);
    }
}
