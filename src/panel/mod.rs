//! # Panel Module
//!
//! The sidebar panel: a controller that turns front-end messages and settings
//! changes into state updates and host actions, plus the HTML renderer.
//!
//! ## Components
//!
//! - [`Panel`] - owns the state store and the current settings
//! - [`Host`] - the editor operations the panel calls out to
//! - [`mod@render`] - document rendering
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ Info banner (optional)       │
//! ├──────────────────────────────┤
//! │ ▼ Recently Used      Clear   │
//! │   [→] [©] [TODO]             │
//! ├──────────────────────────────┤
//! │ ▼ Symbols                    │
//! │   [©] [®] [™] [°] ...        │
//! ├──────────────────────────────┤
//! │ ▶ Arrows                     │
//! └──────────────────────────────┘
//! ```

pub mod app;
pub mod render;

pub use app::{Host, Panel};
pub use render::{load_styles, render_html, PanelView, SectionView};
