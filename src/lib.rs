//! # Newsletter HTML compiler
//!
//! Turns the block list saved by a drag-and-drop newsletter editor into a
//! single email-safe HTML document: nested presentation tables, inline
//! styles and a small shared stylesheet with Outlook resets.
//!
//! ## Features
//! - Typed block model decoded leniently from editor JSON
//! - One style resolver applying theme defaults, background precedence and opacity
//! - Per-block renderers for headers, articles, events, quizzes, products and more
//! - Document assembly with title, preheader and configurable container width
//! - Authoring linter for problems rendering silently tolerates
//!
//! ## Example
//! ```ignore
//! use newsletter_html::{parse_template, RenderOptions};
//!
//! let json = r#"{
//!   "theme": { "globalLinkColor": "#ff0000" },
//!   "blocks": [
//!     { "id": "h", "type": "heading", "content": { "text": "Hello", "level": "h1" } }
//!   ]
//! }"#;
//!
//! let template = parse_template(json).expect("Failed to parse template");
//! let html = template.render(&RenderOptions::default());
//! ```

pub mod blocks;
pub mod color;
pub mod config;
pub mod document;
pub mod error;
mod lenient;
pub mod render;
pub mod style;
pub mod stylesheet;
pub mod template;
pub mod theme;
pub mod validator;

// --- Core types ---
pub use blocks::{Block, BlockKind};
pub use config::RenderOptions;
pub use error::{NewsletterError, NewsletterResult};
pub use render::{render_block, render_blocks, RenderContext};
pub use style::{resolve, Align, BlockDefaults, ResolvedStyle, StyleSpec};
pub use template::{parse_template, Template};
pub use theme::Theme;

// --- Assembly and checks ---
pub use document::{assemble, assemble_with};
pub use validator::{validate_blocks, Diagnostic, Severity};

/// Render blocks into a complete HTML document with default options.
pub fn render_newsletter(blocks: &[Block], theme: &Theme) -> String {
    render_newsletter_with(blocks, theme, &RenderOptions::default())
}

/// Render blocks into a complete HTML document.
///
/// Fragments appear in input order. Unknown block types contribute nothing.
pub fn render_newsletter_with(blocks: &[Block], theme: &Theme, options: &RenderOptions) -> String {
    let ctx = RenderContext::from_options(options);
    let fragments = render_blocks(blocks, theme, &ctx);
    tracing::debug!(
        blocks = blocks.len(),
        rendered = fragments.iter().filter(|f| !f.is_empty()).count(),
        "rendered newsletter"
    );
    assemble_with(&fragments, theme, options)
}
