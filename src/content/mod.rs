//! Content module - posts, normalization, and body rendering

mod highlight;
pub mod loader;
mod normalize;
mod post;
mod render;

pub use highlight::CodeHighlighter;
pub(crate) use highlight::html_escape;
pub use normalize::{normalize_pages, Normalizer};
pub use post::{ContentBlock, Post};
pub use render::ContentRenderer;
