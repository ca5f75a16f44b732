//! Presentation layer.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render_viewmodel → String
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready rows, header and footer
//! - [`renderer`]: Plain-text table rendering with match highlighting

pub mod renderer;
pub mod viewmodel;

pub use renderer::{highlight, render, render_viewmodel};
pub use viewmodel::{compute_viewmodel, DisplayItem, EmptyState, FooterInfo, HeaderInfo, UIViewModel};
