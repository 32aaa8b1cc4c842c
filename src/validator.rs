//! Authoring checks over a block list.
//!
//! Rendering never fails, so problems an author would want to know about
//! (a button going nowhere, a footer without an unsubscribe link) are
//! reported here instead.

use std::collections::HashSet;
use std::fmt;

use crate::blocks::{Block, BlockKind};
use crate::color::Rgb;
use crate::render::{present, MAX_PRODUCTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Position of the block in the input list.
    pub index: usize,
    pub block_id: String,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.block_id.is_empty() {
            write!(f, "{} [block #{}]: {}", self.severity, self.index, self.message)
        } else {
            write!(
                f,
                "{} [block #{} '{}']: {}",
                self.severity, self.index, self.block_id, self.message
            )
        }
    }
}

/// Lint a block list. Diagnostics come back in block order.
pub fn validate_blocks(blocks: &[Block]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen_ids = HashSet::new();

    for (index, block) in blocks.iter().enumerate() {
        let mut report = |severity: Severity, message: String| {
            diagnostics.push(Diagnostic {
                index,
                block_id: block.id.clone(),
                severity,
                message,
            });
        };

        if block.id.trim().is_empty() {
            report(Severity::Warning, "block has no id".to_string());
        } else if !seen_ids.insert(block.id.as_str()) {
            report(Severity::Error, format!("duplicate block id '{}'", block.id));
        }

        validate_kind(&block.kind, &mut report);
        validate_style(block, &mut report);
    }

    diagnostics
}

fn validate_kind(kind: &BlockKind, report: &mut impl FnMut(Severity, String)) {
    match kind {
        BlockKind::Unknown(tag) if tag.is_empty() => {
            report(Severity::Error, "block has no type".to_string())
        }
        BlockKind::Unknown(tag) => report(
            Severity::Error,
            format!("unknown block type '{}' renders nothing", tag),
        ),
        BlockKind::Image(c) if present(&c.url).is_none() => {
            report(Severity::Warning, "image has no url".to_string())
        }
        BlockKind::Button(c) if present(&c.url).is_none() => {
            report(Severity::Warning, "button has no url and links to '#'".to_string())
        }
        BlockKind::Footer(c) if present(&c.unsubscribe_url).is_none() => report(
            Severity::Warning,
            "footer has no unsubscribe link".to_string(),
        ),
        BlockKind::ArticleGrid(c) if c.articles.is_empty() => {
            report(Severity::Warning, "article grid has no articles".to_string())
        }
        BlockKind::EventCalendar(c) if c.events.is_empty() => {
            report(Severity::Warning, "event calendar has no events".to_string())
        }
        BlockKind::ProductRecommendation(c) if c.products.is_empty() => {
            report(Severity::Warning, "product recommendation has no products".to_string())
        }
        BlockKind::ProductRecommendation(c) if c.products.len() > MAX_PRODUCTS => report(
            Severity::Warning,
            format!(
                "only the first {} of {} products are rendered",
                MAX_PRODUCTS,
                c.products.len()
            ),
        ),
        BlockKind::Quiz(c) if c.questions.is_empty() => {
            report(Severity::Warning, "quiz has no questions".to_string())
        }
        BlockKind::Quiz(c) => {
            report(
                Severity::Warning,
                "quiz scoring relies on a script most mail clients strip".to_string(),
            );
            for (i, question) in c.questions.iter().enumerate() {
                if question.options.is_empty() {
                    report(
                        Severity::Warning,
                        format!("quiz question {} has no options", i + 1),
                    );
                }
            }
        }
        _ => {}
    }
}

fn validate_style(block: &Block, report: &mut impl FnMut(Severity, String)) {
    let Some(style) = &block.style else {
        return;
    };
    let Some(opacity) = style.background_opacity else {
        return;
    };
    if !(0.0..=1.0).contains(&opacity) {
        report(
            Severity::Warning,
            format!("background opacity {} is outside 0..=1", opacity),
        );
    }
    if let Some(color) = present(&style.background_color) {
        if opacity < 1.0 && Rgb::parse(color).is_none() {
            report(
                Severity::Warning,
                format!("background opacity ignored for color '{}'", color),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(json: &str) -> Vec<Block> {
        serde_json::from_str(json).unwrap()
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_clean_blocks() {
        let list = blocks(
            r#"[
                {"id":"h","type":"heading","content":{"text":"Hi"}},
                {"id":"b","type":"button","content":{"text":"Go","url":"https://x.test"}},
                {"id":"f","type":"footer","content":{"unsubscribeUrl":"https://x.test/u"}}
            ]"#,
        );
        assert!(validate_blocks(&list).is_empty());
    }

    #[test]
    fn test_unknown_type_and_duplicate_id() {
        let list = blocks(
            r#"[
                {"id":"a","type":"heading","content":{}},
                {"id":"a","type":"mystery"}
            ]"#,
        );
        let diagnostics = validate_blocks(&list);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.index == 1 && d.severity == Severity::Error));
        assert_eq!(
            messages(&diagnostics),
            vec!["duplicate block id 'a'", "unknown block type 'mystery' renders nothing"]
        );
    }

    #[test]
    fn test_missing_targets() {
        let list = blocks(
            r#"[
                {"id":"i","type":"image","content":{}},
                {"id":"b","type":"button","content":{"text":"Go"}},
                {"id":"f","type":"footer","content":{}},
                {"type":"divider"}
            ]"#,
        );
        let diagnostics = validate_blocks(&list);
        assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));
        assert_eq!(
            messages(&diagnostics),
            vec![
                "image has no url",
                "button has no url and links to '#'",
                "footer has no unsubscribe link",
                "block has no id",
            ]
        );
    }

    #[test]
    fn test_collections() {
        let list = blocks(
            r#"[
                {"id":"g","type":"article-grid","content":{"articles":[]}},
                {"id":"p","type":"product-recommendation","content":{"products":[{"name":"a"},{"name":"b"},{"name":"c"}]}},
                {"id":"q","type":"quiz","content":{"questions":[{"question":"?","options":[]}]}}
            ]"#,
        );
        let diagnostics = validate_blocks(&list);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "article grid has no articles",
                "only the first 2 of 3 products are rendered",
                "quiz scoring relies on a script most mail clients strip",
                "quiz question 1 has no options",
            ]
        );
    }

    #[test]
    fn test_opacity_checks() {
        let list = blocks(
            r#"[
                {"id":"a","type":"divider","style":{"backgroundColor":"tomato","backgroundOpacity":0.5}},
                {"id":"b","type":"divider","style":{"backgroundColor":"rgb(1,2,3)","backgroundOpacity":1.5}}
            ]"#,
        );
        let diagnostics = validate_blocks(&list);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "background opacity ignored for color 'tomato'",
                "background opacity 1.5 is outside 0..=1",
            ]
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic {
            index: 3,
            block_id: "hero".to_string(),
            severity: Severity::Error,
            message: "boom".to_string(),
        };
        assert_eq!(d.to_string(), "error [block #3 'hero']: boom");
    }
}
