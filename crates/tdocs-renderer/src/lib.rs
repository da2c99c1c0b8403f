//! Markdown to HTML conversion for tdocs pages.
//!
//! [`MarkdownRenderer`] wraps `pulldown-cmark` with the options the site
//! uses: GitHub Flavored Markdown on, heading anchors off. Rendering is pure
//! and deterministic, so the same markdown always yields the same HTML.
//!
//! # Example
//!
//! ```
//! use tdocs_renderer::MarkdownRenderer;
//!
//! let html = MarkdownRenderer::new().render("# Hi\n");
//! assert_eq!(html.trim_end(), "<h1>Hi</h1>");
//! ```

mod escape;
mod renderer;

pub use escape::escape_html;
pub use renderer::MarkdownRenderer;
