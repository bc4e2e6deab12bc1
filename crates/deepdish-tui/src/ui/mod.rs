//! UI building blocks for the `DeepDish` TUI.

pub mod layout;
pub mod text;
pub mod theme;
pub mod widgets;

pub use layout::*;
