//! Reusable widgets.

pub mod status_bar;
pub mod text_input;

pub use status_bar::{KeyHint, StatusBar};
pub use text_input::TextInputState;
