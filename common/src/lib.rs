//! Portfolio Common Library
//!
//! CLIとWeb(WASM)で共有される型とカルーセルのナビゲーション処理

pub mod error;
pub mod types;
pub mod links;
pub mod prismic;
pub mod content;
pub mod ring;
pub mod gesture;
pub mod carousel;
pub mod effects;
pub mod session;
pub mod modal;
pub mod theme;

pub use error::{Error, Result};
pub use types::{ImageRef, ProjectRecord, RichText, TechPreview, TextBlock};
pub use links::{LinkKind, ProjectLink};
pub use content::{parse_projects, parse_section, ProjectsSection};
pub use ring::Ring;
pub use gesture::{GestureNormalizer, Intent, Key, WheelOutcome};
pub use carousel::{CarouselState, Phase, Placement, Viewport};
pub use effects::{Effect, ListenerKind, ResourceLedger, TimerKind};
pub use session::CarouselSession;
pub use modal::{DetailOverlay, EmbedState, ModalState, OverlayCommand, Preview, SlideDirection};
pub use theme::Theme;
