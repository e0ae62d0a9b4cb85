//! Template rendering
//!
//! Templates use Handlebars syntax with HTML escaping turned off and the
//! function library from [`helpers`] registered:
//!
//! ```text
//! {{key}}  {{abbrev 40 fields.summary}}  ({{age fields.created}} ago)
//! {{color "red+b"}}{{fields.status.name}}{{color "reset"}}
//! ```

pub mod color;
pub mod helpers;
mod renderer;
pub mod time;

pub use renderer::{Renderer, render};
