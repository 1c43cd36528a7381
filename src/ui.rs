//! Terminal UI for kaser.
//!
//! [render] draws one frame from an [crate::app::AppState]. Everything in here
//! reads state; key handling lives in [crate::app].

pub mod icons;
pub mod overlays;
pub mod panes;
pub mod render;
pub mod widgets;

pub use render::render;
