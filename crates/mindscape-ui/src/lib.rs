//! egui pages for MindScape.
//!
//! Pages render from `UiState` and hand user intent back to the app as
//! action values; they never call the controllers themselves.

pub mod state;
pub mod theme;
pub mod panels;
