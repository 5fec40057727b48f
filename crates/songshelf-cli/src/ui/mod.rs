//! Terminal output for the pages.
//!
//! - `terminal`: the `View` implementation and input prompts
//! - `styles`: color scheme and text styling

pub mod styles;
pub mod terminal;
