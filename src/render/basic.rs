use std::fmt::{self, Write};

use super::{
    close_block, escape_html, escape_multiline, image_margin, open_block, present, text,
    write_button,
};
use crate::blocks::{
    ButtonContent, CompartmentContent, FooterContent, HeaderContent, HeadingContent,
    ImageContent, ParagraphContent, SocialLink, SocialLinksContent, SpacerContent, VideoContent,
};
use crate::style::{Align, BlockDefaults, ResolvedStyle};

pub(super) const HEADER: BlockDefaults = BlockDefaults::new("20px", Align::Center);
pub(super) const FOOTER: BlockDefaults = BlockDefaults::new("20px", Align::Center);
pub(super) const HEADING: BlockDefaults = BlockDefaults::new("10px 20px", Align::Center);
pub(super) const PARAGRAPH: BlockDefaults = BlockDefaults::new("10px 20px", Align::Left);
pub(super) const IMAGE: BlockDefaults = BlockDefaults::new("10px 20px", Align::Center);
pub(super) const BUTTON: BlockDefaults = BlockDefaults::new("10px 20px", Align::Center);
pub(super) const DIVIDER: BlockDefaults =
    BlockDefaults::new("10px 20px", Align::Center).without_container_border();
pub(super) const SPACER: BlockDefaults = BlockDefaults::unpadded(Align::Left);
pub(super) const COMPARTMENT: BlockDefaults = BlockDefaults::new("20px", Align::Left);
pub(super) const SOCIAL_LINKS: BlockDefaults = BlockDefaults::new("15px 20px", Align::Center);
pub(super) const VIDEO: BlockDefaults = BlockDefaults::new("10px 20px", Align::Center);

pub(super) const DEFAULT_SPACER_HEIGHT: f64 = 20.0;
const CONTENT_WIDTH: u32 = 560;

pub(super) fn header(c: &HeaderContent, s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    open_block(out, "nl-header", s)?;
    if let Some(logo) = present(&c.logo_url) {
        let alt = present(&c.company_name).unwrap_or("Logo");
        write!(
            out,
            "<img src=\"{}\" alt=\"{}\" width=\"150\" style=\"display: block; max-width: 150px; height: auto; border: 0; margin: {}; padding-bottom: 10px;\">",
            escape_html(logo),
            escape_html(alt),
            image_margin(s.align)
        )?;
    }
    if let Some(name) = present(&c.company_name) {
        write!(
            out,
            "<h1 class=\"nl-company\" style=\"margin: 0; font-size: 28px; line-height: 1.2; color: {};\">{}</h1>",
            escape_html(&s.text_color),
            escape_html(name)
        )?;
    }
    if let Some(tagline) = present(&c.tagline) {
        write!(
            out,
            "<p class=\"nl-tagline\" style=\"margin: 6px 0 0 0; font-size: 14px; opacity: 0.8;\">{}</p>",
            escape_html(tagline)
        )?;
    }
    close_block(out)
}

pub(super) fn footer(
    c: &FooterContent,
    s: &ResolvedStyle,
    year: i32,
    out: &mut String,
) -> fmt::Result {
    open_block(out, "nl-footer", s)?;
    let company = present(&c.company_name);
    if let Some(name) = company {
        write!(
            out,
            "<p style=\"margin: 0 0 5px 0; font-size: 14px; font-weight: bold;\">{}</p>",
            escape_html(name)
        )?;
    }
    if let Some(address) = present(&c.address) {
        write!(
            out,
            "<p class=\"nl-address\" style=\"margin: 0 0 10px 0; font-size: 12px; line-height: 1.5;\">{}</p>",
            escape_multiline(address)
        )?;
    }

    let social: Vec<String> = c
        .social_links
        .iter()
        .filter_map(|link| social_anchor(link, s, "font-size: 12px;"))
        .collect();
    if !social.is_empty() {
        write!(
            out,
            "<p class=\"nl-social\" style=\"margin: 0 0 10px 0; font-size: 12px;\">{}</p>",
            social.join(" | ")
        )?;
    }

    let mut links = Vec::new();
    if let Some(contact) = present(&c.contact_url) {
        links.push(footer_anchor(&contact_href(contact), "Contact Us", s));
    }
    if let Some(website) = present(&c.website_url) {
        links.push(footer_anchor(website, "Visit our website", s));
    }
    if let Some(unsubscribe) = present(&c.unsubscribe_url) {
        links.push(footer_anchor(unsubscribe, "Unsubscribe", s));
    }
    if !links.is_empty() {
        write!(
            out,
            "<p class=\"nl-footer-links\" style=\"margin: 0 0 10px 0; font-size: 12px;\">{}</p>",
            links.join(" | ")
        )?;
    }

    let owner = company
        .map(|name| format!(" {}", escape_html(name)))
        .unwrap_or_default();
    write!(
        out,
        "<p class=\"nl-copyright\" style=\"margin: 0; font-size: 12px; opacity: 0.7;\">&copy; {}{}. All rights reserved.</p>",
        year, owner
    )?;
    close_block(out)
}

/// Bare addresses become `mailto:` links.
fn contact_href(contact: &str) -> String {
    if contact.contains('@') && !contact.contains(':') {
        format!("mailto:{}", contact.trim())
    } else {
        contact.to_string()
    }
}

fn footer_anchor(href: &str, label: &str, s: &ResolvedStyle) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\" style=\"{}\">{}</a>",
        escape_html(href),
        escape_html(&s.link_css()),
        label
    )
}

fn social_anchor(link: &SocialLink, s: &ResolvedStyle, extra_css: &str) -> Option<String> {
    let label = present(&link.platform).or(present(&link.url))?;
    let href = present(&link.url).unwrap_or("#");
    Some(format!(
        "<a href=\"{}\" target=\"_blank\" style=\"{} {}\">{}</a>",
        escape_html(href),
        escape_html(&s.link_css()),
        extra_css,
        escape_html(label)
    ))
}

/// Heading level tag; anything other than 1 or 3 is an `h2`.
fn heading_tag(level: Option<&str>) -> &'static str {
    let level = level.map(|l| l.trim().trim_start_matches(['h', 'H']));
    match level {
        Some("1") => "h1",
        Some("3") => "h3",
        _ => "h2",
    }
}

pub(super) fn heading(c: &HeadingContent, s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    let tag = heading_tag(c.level.as_deref());
    open_block(out, "nl-heading", s)?;
    write!(out, "<{tag}>{}</{tag}>", text(&c.text))?;
    close_block(out)
}

pub(super) fn paragraph(c: &ParagraphContent, s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    open_block(out, "nl-paragraph", s)?;
    write!(
        out,
        "<p style=\"margin: 0; font-size: 16px; line-height: 1.6;\">{}</p>",
        c.text.as_deref().map(escape_multiline).unwrap_or_default()
    )?;
    close_block(out)
}

pub(super) fn image(c: &ImageContent, s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    open_block(out, "nl-image", s)?;
    let img = format!(
        "<img src=\"{}\" alt=\"{}\" width=\"{w}\" style=\"display: block; width: 100%; max-width: {w}px; height: auto; border: 0; margin: {};\">",
        text(&c.url),
        text(&c.alt),
        image_margin(s.align),
        w = CONTENT_WIDTH,
    );
    match present(&c.link_url) {
        Some(link) => write!(out, "<a href=\"{}\" target=\"_blank\">{}</a>", escape_html(link), img)?,
        None => out.write_str(&img)?,
    }
    if let Some(caption) = present(&c.caption) {
        write!(
            out,
            "<p class=\"nl-caption\" style=\"margin: 8px 0 0 0; font-size: 13px; font-style: italic; color: {};\">{}</p>",
            escape_html(&s.text_color),
            escape_html(caption)
        )?;
    }
    close_block(out)
}

pub(super) fn button(c: &ButtonContent, s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    open_block(out, "nl-button", s)?;
    let label = present(&c.text).unwrap_or("Click Here");
    write_button(out, s, s.align, label, c.url.as_deref())?;
    close_block(out)
}

pub(super) fn divider(s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    open_block(out, "nl-divider", s)?;
    write!(
        out,
        "<hr class=\"divider\" style=\"border: 0; border-top: {} solid {}; height: 0; margin: 0;\">",
        escape_html(&s.border_width),
        escape_html(&s.border_color)
    )?;
    close_block(out)
}

pub(super) fn spacer(c: &SpacerContent, s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    let height = c.height.unwrap_or(DEFAULT_SPACER_HEIGHT).max(0.0);
    open_block(out, "nl-spacer", s)?;
    write!(
        out,
        "<div class=\"spacer\" style=\"height: {h}px; line-height: {h}px; font-size: 1px;\">&nbsp;</div>",
        h = height
    )?;
    close_block(out)
}

pub(super) fn compartment(
    c: &CompartmentContent,
    s: &ResolvedStyle,
    out: &mut String,
) -> fmt::Result {
    open_block(out, "nl-compartment", s)?;
    write!(
        out,
        "<table role=\"presentation\" class=\"compartment\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\" style=\"border: 1px solid {}; border-radius: 6px;\"><tr><td style=\"padding: 15px;\">",
        escape_html(&s.border_color)
    )?;
    if let Some(title) = present(&c.title) {
        write!(
            out,
            "<h3 style=\"margin: 0 0 10px 0; font-size: 18px;\">{}</h3>",
            escape_multiline(title)
        )?;
    }
    // Raw HTML by contract; see `CompartmentContent::content`.
    write!(
        out,
        "<div class=\"compartment-content\">{}</div>",
        c.content.as_deref().unwrap_or_default()
    )?;
    out.write_str("</td></tr></table>")?;
    close_block(out)
}

const SOCIAL_SPACER: &str = "<td class=\"social-spacer\" width=\"16\" style=\"width: 16px; font-size: 0; line-height: 0;\">&nbsp;</td>";

pub(super) fn social_links(
    c: &SocialLinksContent,
    s: &ResolvedStyle,
    out: &mut String,
) -> fmt::Result {
    open_block(out, "nl-social-links", s)?;
    let anchors: Vec<String> = c
        .links
        .iter()
        .filter_map(|link| social_anchor(link, s, "font-size: 14px;"))
        .collect();
    if !anchors.is_empty() {
        let align_attr = if s.align == Align::Center { " align=\"center\"" } else { "" };
        write!(
            out,
            "<table role=\"presentation\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"{}><tr>",
            align_attr
        )?;
        for (index, anchor) in anchors.iter().enumerate() {
            if index > 0 {
                out.write_str(SOCIAL_SPACER)?;
            }
            write!(out, "<td class=\"social-link\">{}</td>", anchor)?;
        }
        out.write_str("</tr></table>")?;
    }
    close_block(out)
}

pub(super) fn video(c: &VideoContent, s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    let href = escape_html(present(&c.video_url).unwrap_or("#"));
    let title = present(&c.title).unwrap_or("Watch the video");
    open_block(out, "nl-video", s)?;
    if let Some(thumbnail) = present(&c.thumbnail_url) {
        write!(
            out,
            "<a href=\"{href}\" target=\"_blank\"><img src=\"{}\" alt=\"{}\" width=\"{w}\" style=\"display: block; width: 100%; max-width: {w}px; height: auto; border: 0; margin: {};\"></a>",
            escape_html(thumbnail),
            escape_html(title),
            image_margin(s.align),
            w = CONTENT_WIDTH,
        )?;
    }
    write!(
        out,
        "<p style=\"margin: 8px 0 0 0; font-size: 14px;\"><a href=\"{href}\" target=\"_blank\" style=\"{}\">&#9654; {}</a></p>",
        escape_html(&s.link_css()),
        escape_html(title)
    )?;
    close_block(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;
    use crate::render::{render_block, RenderContext};
    use crate::theme::Theme;

    fn render_json(json: &str) -> String {
        let block: Block = serde_json::from_str(json).unwrap();
        let ctx = RenderContext {
            copyright_year: 2031,
            include_scripts: true,
        };
        render_block(&block, &Theme::default(), &ctx)
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(heading_tag(Some("h1")), "h1");
        assert_eq!(heading_tag(Some("3")), "h3");
        assert_eq!(heading_tag(Some("H3")), "h3");
        assert_eq!(heading_tag(Some("h6")), "h2");
        assert_eq!(heading_tag(None), "h2");
    }

    #[test]
    fn test_heading_defaults_to_centered_h2() {
        let html = render_json(r#"{"id":"h","type":"heading","content":{"text":"Title"}}"#);
        assert!(html.contains("<h2>Title</h2>"));
        assert!(html.contains("align=\"center\""));
        assert!(html.contains("text-align: center;"));
    }

    #[test]
    fn test_header_omits_missing_fields() {
        let html = render_json(r#"{"id":"hd","type":"header","content":{"companyName":"Acme"}}"#);
        assert!(html.contains(">Acme</h1>"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("nl-tagline"));
    }

    #[test]
    fn test_footer_copyright_and_links() {
        let html = render_json(
            r#"{"id":"f","type":"footer","content":{
                "companyName":"Acme","address":"1 Main St\nSpringfield",
                "socialLinks":[],"contactUrl":"hello@acme.test","unsubscribeUrl":"https://acme.test/u"
            }}"#,
        );
        assert!(html.contains("&copy; 2031 Acme. All rights reserved."));
        assert!(html.contains("1 Main St<br>Springfield"));
        assert!(html.contains("href=\"mailto:hello@acme.test\""));
        assert!(html.contains(">Unsubscribe</a>"));
        assert!(!html.contains("nl-social\""));
        assert!(!html.contains("Visit our website"));
    }

    #[test]
    fn test_footer_social_links() {
        let html = render_json(
            r#"{"id":"f","type":"footer","content":{"socialLinks":[
                {"platform":"Twitter","url":"https://twitter.test/acme"},
                {"platform":"","url":""}
            ]}}"#,
        );
        assert!(html.contains("nl-social"));
        assert!(html.contains(">Twitter</a>"));
        assert!(html.contains("&copy; 2031. All rights reserved."));
    }

    #[test]
    fn test_image_without_url_is_not_suppressed() {
        let html = render_json(r#"{"id":"i","type":"image","content":{"alt":"Missing"}}"#);
        assert!(html.contains("<img src=\"\" alt=\"Missing\""));
    }

    #[test]
    fn test_image_caption_and_link() {
        let html = render_json(
            r#"{"id":"i","type":"image","content":{"url":"https://x.test/a.png","caption":"A cat","linkUrl":"https://x.test"}}"#,
        );
        assert!(html.contains("<a href=\"https://x.test\" target=\"_blank\"><img src=\"https://x.test/a.png\""));
        assert!(html.contains(">A cat</p>"));
    }

    #[test]
    fn test_empty_paragraph() {
        let html = render_json(r#"{"id":"p","type":"paragraph","content":{}}"#);
        assert!(html.contains("line-height: 1.6;\"></p>"));
    }

    #[test]
    fn test_divider_uses_border_overrides() {
        let html = render_json(
            r##"{"id":"d","type":"divider","style":{"borderColor":"#ff0000","borderWidth":"3px"}}"##,
        );
        assert!(html.contains("border-top: 3px solid #ff0000;"));

        let html = render_json(r#"{"id":"d","type":"divider"}"#);
        assert!(html.contains("border-top: 1px solid #dddddd;"));
    }

    #[test]
    fn test_spacer_height() {
        let html = render_json(r#"{"id":"s","type":"spacer","content":{"height":40}}"#);
        assert!(html.contains("height: 40px;"));

        let html = render_json(r#"{"id":"s","type":"spacer","content":{}}"#);
        assert!(html.contains("height: 20px;"));
    }

    #[test]
    fn test_compartment_content_is_raw() {
        let html = render_json(
            r#"{"id":"c","type":"compartment","content":{"title":"Note","content":"<b>bold</b> & more"}}"#,
        );
        assert!(html.contains("<div class=\"compartment-content\"><b>bold</b> & more</div>"));
        assert!(html.contains(">Note</h3>"));

        let html = render_json(r#"{"id":"c","type":"compartment","content":{}}"#);
        assert!(html.contains("<div class=\"compartment-content\"></div>"));
    }

    #[test]
    fn test_social_links_block() {
        let html = render_json(
            r#"{"id":"s","type":"social-links","content":{"links":[{"platform":"GitHub","url":"https://github.test"}]}}"#,
        );
        assert!(html.contains("href=\"https://github.test\""));
        assert!(html.contains(">GitHub</a></td>"));
        assert!(!html.contains("social-spacer"));

        let html = render_json(r#"{"id":"s","type":"social-links","content":{"links":[]}}"#);
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_social_links_separated_by_spacer_cells() {
        let html = render_json(
            r#"{"id":"s","type":"social-links","content":{"links":[
                {"platform":"GitHub","url":"https://github.test"},
                {"platform":"Mastodon","url":"https://mastodon.test"},
                {"platform":"RSS","url":"https://rss.test"}
            ]}}"#,
        );
        assert_eq!(html.matches("class=\"social-link\"").count(), 3);
        assert_eq!(html.matches("class=\"social-spacer\"").count(), 2);
        assert!(html.contains(">GitHub</a></td><td class=\"social-spacer\""));
        assert!(html.contains("&nbsp;</td><td class=\"social-link\"><a href=\"https://mastodon.test\""));
        assert!(html.contains(">RSS</a></td></tr></table>"));
    }

    #[test]
    fn test_video_without_thumbnail() {
        let html = render_json(r#"{"id":"v","type":"video","content":{"videoUrl":"https://v.test/1"}}"#);
        assert!(!html.contains("<img"));
        assert!(html.contains("href=\"https://v.test/1\""));
        assert!(html.contains("&#9654; Watch the video</a>"));
    }
}
