//! Page view models and their Markdown/JSON rendering.

pub mod generator;
pub mod views;

pub use generator::*;
pub use views::*;
