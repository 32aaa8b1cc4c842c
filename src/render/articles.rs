use std::fmt::{self, Write};

use super::{
    close_block, escape_html, open_block, open_table, present, text, write_button,
    write_placeholder,
};
use crate::blocks::{Article, ArticleGridContent, FeaturedArticleContent};
use crate::style::{Align, BlockDefaults, ResolvedStyle};

pub(super) const FEATURED_ARTICLE: BlockDefaults = BlockDefaults::new("20px", Align::Left);
pub(super) const ARTICLE_GRID: BlockDefaults = BlockDefaults::new("20px", Align::Left);

const GRID_GUTTER_PX: u32 = 10;

pub(super) fn featured_article(
    c: &FeaturedArticleContent,
    s: &ResolvedStyle,
    out: &mut String,
) -> fmt::Result {
    open_block(out, "nl-featured-article", s)?;
    open_table(out, "featured-article", "")?;

    if let Some(image) = present(&c.image_url) {
        write!(
            out,
            "<tr><td style=\"padding-bottom: 15px;\"><img src=\"{}\" alt=\"{}\" width=\"560\" style=\"display: block; width: 100%; max-width: 560px; height: auto; border: 0;\"></td></tr>",
            escape_html(image),
            text(&c.title)
        )?;
    }

    out.write_str("<tr><td>")?;
    if let Some(title) = present(&c.title) {
        write!(
            out,
            "<h2 style=\"margin: 0 0 8px 0; font-size: 22px; line-height: 1.3; color: {};\">{}</h2>",
            escape_html(&s.text_color),
            escape_html(title)
        )?;
    }

    write!(
        out,
        "<p class=\"article-meta\" style=\"margin: 0 0 10px 0; font-size: 13px; opacity: 0.7;\"><span>{}</span> &bull; <span>{}</span></p>",
        text(&c.author),
        text(&c.date)
    )?;

    write!(
        out,
        "<p style=\"margin: 0 0 15px 0; font-size: 16px; line-height: 1.6;\">{}</p>",
        text(&c.excerpt)
    )?;
    let label = present(&c.cta_text).unwrap_or("Read More");
    write_button(out, s, Align::Left, label, c.cta_url.as_deref())?;
    out.write_str("</td></tr></table>")?;
    close_block(out)
}

pub(super) fn article_grid(
    c: &ArticleGridContent,
    s: &ResolvedStyle,
    out: &mut String,
) -> fmt::Result {
    open_block(out, "nl-article-grid", s)?;
    if c.articles.is_empty() {
        write_placeholder(out, "No articles available")?;
        return close_block(out);
    }

    let width = cell_width_percent(c.articles.len());
    open_table(out, "article-grid", "")?;
    out.write_str("<tr>")?;
    for (i, article) in c.articles.iter().enumerate() {
        if i > 0 {
            write!(
                out,
                "<td class=\"grid-spacer\" width=\"{g}\" style=\"width: {g}px; font-size: 0; line-height: 0;\">&nbsp;</td>",
                g = GRID_GUTTER_PX
            )?;
        }
        write!(
            out,
            "<td class=\"article-cell\" width=\"{w}%\" valign=\"top\" style=\"width: {w}%; vertical-align: top;\">",
            w = width
        )?;
        article_card(article, s, out)?;
        out.write_str("</td>")?;
    }
    out.write_str("</tr></table>")?;
    close_block(out)
}

/// Even share of the row for each of `count` articles, rounded down.
fn cell_width_percent(count: usize) -> usize {
    100 / count.max(1)
}

fn article_card(article: &Article, s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    open_table(out, "article-card", "")?;
    if let Some(image) = present(&article.image_url) {
        write!(
            out,
            "<tr><td style=\"padding-bottom: 10px;\"><img src=\"{}\" alt=\"{}\" style=\"display: block; width: 100%; height: auto; border: 0;\"></td></tr>",
            escape_html(image),
            text(&article.title)
        )?;
    }
    out.write_str("<tr><td>")?;
    write!(
        out,
        "<h3 style=\"margin: 0 0 6px 0; font-size: 17px; line-height: 1.3; color: {};\">{}</h3>",
        escape_html(&s.text_color),
        text(&article.title)
    )?;
    if let Some(excerpt) = present(&article.excerpt) {
        write!(
            out,
            "<p style=\"margin: 0 0 8px 0; font-size: 14px; line-height: 1.5;\">{}</p>",
            escape_html(excerpt)
        )?;
    }
    if let Some(url) = present(&article.url) {
        write!(
            out,
            "<a href=\"{}\" target=\"_blank\" style=\"{}\">{}</a>",
            escape_html(url),
            escape_html(&s.link_css()),
            escape_html(present(&article.link_text).unwrap_or("Read more"))
        )?;
    }
    out.write_str("</td></tr></table>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;
    use crate::render::{render_block, RenderContext};
    use crate::theme::Theme;

    fn render_json(json: &str) -> String {
        let block: Block = serde_json::from_str(json).unwrap();
        render_block(&block, &Theme::default(), &RenderContext::default())
    }

    #[test]
    fn test_cell_width() {
        assert_eq!(cell_width_percent(1), 100);
        assert_eq!(cell_width_percent(2), 50);
        assert_eq!(cell_width_percent(3), 33);
        assert_eq!(cell_width_percent(0), 100);
    }

    #[test]
    fn test_empty_grid_placeholder() {
        for json in [
            r#"{"id":"g","type":"article-grid","content":{"articles":[]}}"#,
            r#"{"id":"g","type":"article-grid","content":{}}"#,
            r#"{"id":"g","type":"article-grid"}"#,
        ] {
            let html = render_json(json);
            assert!(html.contains("No articles available"), "Failed: {}", json);
            assert!(!html.contains("class=\"article-grid\""), "Failed: {}", json);
        }
    }

    #[test]
    fn test_grid_cells_and_spacers() {
        let html = render_json(
            r#"{"id":"g","type":"article-grid","content":{"articles":[
                {"title":"One","url":"https://a.test/1"},
                {"title":"Two"},
                {"title":"Three","linkText":"More"}
            ]}}"#,
        );
        assert_eq!(html.matches("class=\"article-cell\"").count(), 3);
        assert_eq!(html.matches("class=\"grid-spacer\"").count(), 2);
        assert!(html.contains("width=\"33%\""));
        assert!(html.contains(">One</h3>"));
        assert!(html.contains("href=\"https://a.test/1\""));
        assert!(html.contains(">Read more</a>"));
    }

    #[test]
    fn test_featured_article_meta() {
        let html = render_json(
            r#"{"id":"f","type":"featured-article","content":{"title":"Big news","author":"Ada","date":"May 1"}}"#,
        );
        assert!(html.contains("<span>Ada</span> &bull; <span>May 1</span>"));
        assert!(html.contains(">Read More</a>"));
        assert!(html.contains("href=\"#\""));

        let html = render_json(r#"{"id":"f","type":"featured-article","content":{"date":"May 1"}}"#);
        assert!(html.contains("<span></span> &bull; <span>May 1</span></p>"));
    }

    #[test]
    fn test_featured_article_meta_kept_when_empty() {
        let html = render_json(r#"{"id":"f","type":"featured-article","content":{"title":"T"}}"#);
        assert_eq!(html.matches("class=\"article-meta\"").count(), 1);
        assert!(html.contains("><span></span> &bull; <span></span></p>"));
    }

    #[test]
    fn test_featured_article_missing_excerpt_renders_empty() {
        let html = render_json(r#"{"id":"f","type":"featured-article","content":{}}"#);
        assert!(html.contains("line-height: 1.6;\"></p>"));
        assert!(!html.contains("<img"));
    }
}
