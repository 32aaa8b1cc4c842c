//! Per-block HTML fragments.
//!
//! Every fragment is a full-width presentation table whose single cell carries
//! the block's resolved container style. Nested layout uses tables only.

mod articles;
mod basic;
mod events;
mod promo;
mod quiz;

pub(crate) use promo::MAX_PRODUCTS;

use std::collections::HashSet;
use std::fmt::{self, Write};

use crate::blocks::{Block, BlockKind};
use crate::config::RenderOptions;
use crate::style::{resolve, Align, ResolvedStyle};
use crate::theme::Theme;

/// Per-call values shared by every block of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub copyright_year: i32,
    pub include_scripts: bool,
}

impl RenderContext {
    pub fn from_options(options: &RenderOptions) -> Self {
        Self {
            copyright_year: options.year(),
            include_scripts: options.include_scripts,
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::from_options(&RenderOptions::default())
    }
}

/// Render one block to its fragment. Unknown block types render to an empty
/// string; nothing here can fail.
pub fn render_block(block: &Block, theme: &Theme, ctx: &RenderContext) -> String {
    render_scoped(block, theme, ctx, &quiz::script_id(&block.id))
}

/// Render every block of one newsletter, in order.
///
/// Quiz input names and scoring functions are scoped per render: a quiz whose
/// sanitized id was already taken gets a `_2`, `_3`, ... suffix, so duplicate
/// or colliding ids never share a radio group.
pub fn render_blocks(blocks: &[Block], theme: &Theme, ctx: &RenderContext) -> Vec<String> {
    let mut quiz_scopes = HashSet::new();
    blocks
        .iter()
        .map(|block| {
            let scope = if matches!(block.kind, BlockKind::Quiz(_)) {
                unique_scope(&quiz::script_id(&block.id), &mut quiz_scopes)
            } else {
                String::new()
            };
            render_scoped(block, theme, ctx, &scope)
        })
        .collect()
}

fn unique_scope(base: &str, taken: &mut HashSet<String>) -> String {
    let mut scope = base.to_string();
    let mut n = 1;
    while !taken.insert(scope.clone()) {
        n += 1;
        scope = format!("{}_{}", base, n);
    }
    scope
}

fn render_scoped(block: &Block, theme: &Theme, ctx: &RenderContext, quiz_scope: &str) -> String {
    let mut out = String::new();
    if let Err(err) = write_block(block, theme, ctx, quiz_scope, &mut out) {
        tracing::warn!(id = %block.id, block_type = block.kind.tag(), error = %err, "failed to render block");
        return String::new();
    }
    tracing::trace!(id = %block.id, block_type = block.kind.tag(), bytes = out.len(), "rendered block");
    out
}

fn write_block(
    block: &Block,
    theme: &Theme,
    ctx: &RenderContext,
    quiz_scope: &str,
    out: &mut String,
) -> fmt::Result {
    let style = block.style.as_ref();
    match &block.kind {
        BlockKind::Header(c) => {
            let s = resolve(style, c.align.as_deref(), theme, basic::HEADER);
            basic::header(c, &s, out)
        }
        BlockKind::Footer(c) => {
            let s = resolve(style, c.align.as_deref(), theme, basic::FOOTER);
            basic::footer(c, &s, ctx.copyright_year, out)
        }
        BlockKind::Heading(c) => {
            let s = resolve(style, c.align.as_deref(), theme, basic::HEADING);
            basic::heading(c, &s, out)
        }
        BlockKind::Paragraph(c) => {
            let s = resolve(style, c.align.as_deref(), theme, basic::PARAGRAPH);
            basic::paragraph(c, &s, out)
        }
        BlockKind::Image(c) => {
            let s = resolve(style, c.align.as_deref(), theme, basic::IMAGE);
            basic::image(c, &s, out)
        }
        BlockKind::Button(c) => {
            let s = resolve(style, c.align.as_deref(), theme, basic::BUTTON);
            basic::button(c, &s, out)
        }
        BlockKind::Divider => {
            let s = resolve(style, None, theme, basic::DIVIDER);
            basic::divider(&s, out)
        }
        BlockKind::Spacer(c) => {
            let s = resolve(style, None, theme, basic::SPACER);
            basic::spacer(c, &s, out)
        }
        BlockKind::Compartment(c) => {
            let s = resolve(style, None, theme, basic::COMPARTMENT);
            basic::compartment(c, &s, out)
        }
        BlockKind::FeaturedArticle(c) => {
            let s = resolve(style, None, theme, articles::FEATURED_ARTICLE);
            articles::featured_article(c, &s, out)
        }
        BlockKind::ArticleGrid(c) => {
            let s = resolve(style, None, theme, articles::ARTICLE_GRID);
            articles::article_grid(c, &s, out)
        }
        BlockKind::EventCalendar(c) => {
            let s = resolve(style, None, theme, events::EVENT_CALENDAR);
            events::event_calendar(c, &s, out)
        }
        BlockKind::Quiz(c) => {
            let s = resolve(style, None, theme, quiz::QUIZ);
            quiz::quiz(quiz_scope, c, &s, ctx.include_scripts, out)
        }
        BlockKind::SubscribeNow(c) => {
            let s = resolve(style, c.align.as_deref(), theme, promo::SUBSCRIBE_NOW);
            promo::subscribe_now(c, &s, out)
        }
        BlockKind::Testimonial(c) => {
            let s = resolve(style, c.align.as_deref(), theme, promo::TESTIMONIAL);
            promo::testimonial(c, &s, out)
        }
        BlockKind::CtaBanner(c) => {
            let s = resolve(style, c.align.as_deref(), theme, promo::CTA_BANNER);
            promo::cta_banner(c, &s, out)
        }
        BlockKind::ProductRecommendation(c) => {
            let s = resolve(style, None, theme, promo::PRODUCT_RECOMMENDATION);
            promo::product_recommendation(c, &s, out)
        }
        BlockKind::SocialLinks(c) => {
            let s = resolve(style, c.align.as_deref(), theme, basic::SOCIAL_LINKS);
            basic::social_links(c, &s, out)
        }
        BlockKind::Video(c) => {
            let s = resolve(style, c.align.as_deref(), theme, basic::VIDEO);
            basic::video(c, &s, out)
        }
        BlockKind::Unknown(tag) => {
            tracing::debug!(id = %block.id, block_type = %tag, "unknown block type, rendering nothing");
            Ok(())
        }
    }
}

// ─── Shared markup helpers ───────────────────────────────────────────────────

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape text and keep the author's line breaks.
pub(crate) fn escape_multiline(s: &str) -> String {
    escape_html(s).replace("\r\n", "\n").replace('\n', "<br>")
}

/// Field text, or empty when absent.
pub(crate) fn text(value: &Option<String>) -> String {
    value.as_deref().map(escape_html).unwrap_or_default()
}

/// Field text when present and non-blank.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

pub(crate) fn open_block(out: &mut String, class: &str, style: &ResolvedStyle) -> fmt::Result {
    write!(
        out,
        "<table role=\"presentation\" class=\"nl-block {}\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"><tr><td align=\"{}\" style=\"{}\">",
        class,
        style.align.cell_attr(),
        escape_html(&style.container)
    )
}

pub(crate) fn close_block(out: &mut String) -> fmt::Result {
    out.write_str("</td></tr></table>")
}

/// Open a nested full-width presentation table.
pub(crate) fn open_table(out: &mut String, class: &str, css: &str) -> fmt::Result {
    write!(
        out,
        "<table role=\"presentation\" class=\"{}\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"",
        class
    )?;
    if !css.is_empty() {
        write!(out, " style=\"{}\"", escape_html(css))?;
    }
    out.write_char('>')
}

/// Button as a colored cell wrapping a styled anchor.
pub(crate) fn write_button(
    out: &mut String,
    style: &ResolvedStyle,
    align: Align,
    label: &str,
    url: Option<&str>,
) -> fmt::Result {
    let href = url.filter(|u| !u.trim().is_empty()).unwrap_or("#");
    // `align="left|right"` on a table floats it.
    let align_attr = if align == Align::Center { " align=\"center\"" } else { "" };
    write!(
        out,
        "<table role=\"presentation\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"{align_attr}><tr><td class=\"button-td\" align=\"center\" bgcolor=\"{bg}\" style=\"border-radius: 4px; background-color: {bg};\">",
        bg = escape_html(&style.button_background),
    )?;
    write!(
        out,
        "<a class=\"button\" href=\"{}\" target=\"_blank\" style=\"{}\">{}</a>",
        escape_html(href),
        escape_html(&style.button_css()),
        escape_html(label)
    )?;
    out.write_str("</td></tr></table>")
}

/// Inline `margin` that positions a block-level image within its cell.
pub(crate) fn image_margin(align: Align) -> &'static str {
    match align {
        Align::Center => "0 auto",
        Align::Right => "0 0 0 auto",
        Align::Left | Align::Justify => "0",
    }
}

/// Small italic sentence shown in place of an empty collection.
pub(crate) fn write_placeholder(out: &mut String, message: &str) -> fmt::Result {
    write!(
        out,
        "<p class=\"nl-empty\" style=\"margin: 0; text-align: center; font-style: italic; opacity: 0.7;\">{}</p>",
        message
    )
}
