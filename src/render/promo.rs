use std::fmt::{self, Write};

use super::{
    close_block, escape_html, escape_multiline, image_margin, open_block, open_table, present,
    text, write_button, write_placeholder,
};
use crate::blocks::{
    CtaBannerContent, Product, ProductRecommendationContent, SubscribeNowContent,
    TestimonialContent,
};
use crate::style::{Align, BlockDefaults, ResolvedStyle};

pub(super) const SUBSCRIBE_NOW: BlockDefaults = BlockDefaults::new("30px 20px", Align::Center);
pub(super) const TESTIMONIAL: BlockDefaults = BlockDefaults::new("30px 20px", Align::Center);
pub(super) const CTA_BANNER: BlockDefaults = BlockDefaults::new("40px 20px", Align::Center);
pub(super) const PRODUCT_RECOMMENDATION: BlockDefaults = BlockDefaults::new("20px", Align::Left);

/// Products beyond this many are not rendered.
pub(crate) const MAX_PRODUCTS: usize = 2;

pub(super) fn subscribe_now(
    c: &SubscribeNowContent,
    s: &ResolvedStyle,
    out: &mut String,
) -> fmt::Result {
    let title = present(&c.title).unwrap_or("Subscribe to Our Newsletter");
    let message = present(&c.message).unwrap_or("Stay updated with our latest news and offers.");
    let placeholder = present(&c.placeholder).unwrap_or("Enter your email address");
    let button_text = present(&c.button_text).unwrap_or("Subscribe");

    open_block(out, "nl-subscribe-now", s)?;
    write!(
        out,
        "<h2 style=\"margin: 0 0 10px 0; font-size: 24px; color: {};\">{}</h2>",
        escape_html(&s.text_color),
        escape_html(title)
    )?;
    write!(
        out,
        "<p style=\"margin: 0 0 20px 0; font-size: 16px; line-height: 1.5;\">{}</p>",
        escape_multiline(message)
    )?;
    let align_attr = if s.align == Align::Center { " align=\"center\"" } else { "" };
    write!(
        out,
        "<table role=\"presentation\" class=\"subscribe-form\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"{}><tr>",
        align_attr
    )?;
    write!(
        out,
        "<td style=\"padding-right: 8px;\"><input type=\"email\" name=\"email\" placeholder=\"{}\" style=\"padding: 11px 12px; width: 220px; border: 1px solid {}; border-radius: 4px; font-size: 14px;\"></td>",
        escape_html(placeholder),
        escape_html(&s.border_color)
    )?;
    out.write_str("<td>")?;
    write_button(out, s, Align::Left, button_text, c.button_action.as_deref())?;
    out.write_str("</td></tr></table>")?;
    close_block(out)
}

pub(super) fn testimonial(
    c: &TestimonialContent,
    s: &ResolvedStyle,
    out: &mut String,
) -> fmt::Result {
    open_block(out, "nl-testimonial", s)?;
    if let Some(image) = present(&c.image_url) {
        write!(
            out,
            "<img src=\"{}\" alt=\"{}\" width=\"80\" height=\"80\" style=\"display: block; width: 80px; height: 80px; border: 0; border-radius: 40px; margin: {}; margin-bottom: 15px;\">",
            escape_html(image),
            text(&c.attribution),
            image_margin(s.align)
        )?;
    }
    write!(
        out,
        "<p class=\"testimonial-quote\" style=\"margin: 0 0 15px 0; font-size: 18px; line-height: 1.6; font-style: italic;\">&ldquo;{}&rdquo;</p>",
        text(&c.quote)
    )?;
    write!(
        out,
        "<p style=\"margin: 0; font-size: 15px; font-weight: bold;\">{}</p>",
        text(&c.attribution)
    )?;
    let affiliation = [present(&c.role), present(&c.company)]
        .into_iter()
        .flatten()
        .map(escape_html)
        .collect::<Vec<_>>()
        .join(", ");
    write!(
        out,
        "<p style=\"margin: 4px 0 0 0; font-size: 13px; opacity: 0.8;\">{}</p>",
        affiliation
    )?;
    close_block(out)
}

pub(super) fn cta_banner(c: &CtaBannerContent, s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    open_block(out, "nl-cta-banner", s)?;
    if let Some(title) = present(&c.title) {
        write!(
            out,
            "<h2 style=\"margin: 0 0 10px 0; font-size: 26px; color: {};\">{}</h2>",
            escape_html(&s.text_color),
            escape_html(title)
        )?;
    }
    if let Some(content) = present(&c.content) {
        write!(
            out,
            "<p style=\"margin: 0 0 20px 0; font-size: 16px; line-height: 1.5;\">{}</p>",
            escape_multiline(content)
        )?;
    }
    if let Some(label) = present(&c.button_text) {
        write_button(out, s, s.align, label, c.button_url.as_deref())?;
    }
    close_block(out)
}

pub(super) fn product_recommendation(
    c: &ProductRecommendationContent,
    s: &ResolvedStyle,
    out: &mut String,
) -> fmt::Result {
    open_block(out, "nl-product-recommendation", s)?;
    if let Some(title) = present(&c.title) {
        write!(
            out,
            "<h2 style=\"margin: 0 0 15px 0; font-size: 22px; color: {};\">{}</h2>",
            escape_html(&s.text_color),
            escape_html(title)
        )?;
    }
    if c.products.is_empty() {
        write_placeholder(out, "No products available")?;
        return close_block(out);
    }
    if c.products.len() > MAX_PRODUCTS {
        tracing::debug!(
            count = c.products.len(),
            shown = MAX_PRODUCTS,
            "product recommendation truncated"
        );
    }

    open_table(out, "product-grid", "")?;
    out.write_str("<tr>")?;
    for slot in 0..MAX_PRODUCTS {
        if slot > 0 {
            out.write_str("<td class=\"grid-spacer\" width=\"10\" style=\"width: 10px; font-size: 0; line-height: 0;\">&nbsp;</td>")?;
        }
        out.write_str("<td class=\"product-cell\" width=\"50%\" valign=\"top\" style=\"width: 50%; vertical-align: top;\">")?;
        if let Some(product) = c.products.get(slot) {
            product_card(product, s, out)?;
        }
        out.write_str("</td>")?;
    }
    out.write_str("</tr></table>")?;
    close_block(out)
}

fn product_card(p: &Product, s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    let css = format!("border: 1px solid {}; border-radius: 4px;", s.border_color);
    open_table(out, "product-card", &css)?;
    if let Some(image) = present(&p.image_url) {
        write!(
            out,
            "<tr><td><img src=\"{}\" alt=\"{}\" style=\"display: block; width: 100%; height: auto; border: 0;\"></td></tr>",
            escape_html(image),
            text(&p.name)
        )?;
    }
    out.write_str("<tr><td style=\"padding: 12px;\">")?;
    write!(
        out,
        "<h3 style=\"margin: 0 0 6px 0; font-size: 16px; color: {};\">{}</h3>",
        escape_html(&s.text_color),
        text(&p.name)
    )?;
    if let Some(description) = present(&p.description) {
        write!(
            out,
            "<p style=\"margin: 0 0 8px 0; font-size: 13px; line-height: 1.5;\">{}</p>",
            escape_html(description)
        )?;
    }
    if let Some(price) = present(&p.price) {
        write!(
            out,
            "<p class=\"product-price\" style=\"margin: 0 0 10px 0; font-size: 16px; font-weight: bold;\">{}",
            escape_html(price)
        )?;
        if let Some(discount) = present(&p.discount) {
            write!(
                out,
                " <span class=\"product-discount\" style=\"font-size: 13px; font-weight: normal; color: #d9534f;\">{}</span>",
                escape_html(discount)
            )?;
        }
        out.write_str("</p>")?;
    }
    if let Some(link) = present(&p.link) {
        write_button(out, s, Align::Left, "Shop Now", Some(link))?;
    }
    out.write_str("</td></tr></table>")
}

#[cfg(test)]
mod tests {
    use crate::blocks::Block;
    use crate::render::{render_block, RenderContext};
    use crate::theme::Theme;

    fn render_json(json: &str) -> String {
        let block: Block = serde_json::from_str(json).unwrap();
        render_block(&block, &Theme::default(), &RenderContext::default())
    }

    #[test]
    fn test_subscribe_defaults() {
        let html = render_json(r#"{"id":"s","type":"subscribe-now","content":{}}"#);
        assert!(html.contains(">Subscribe to Our Newsletter</h2>"));
        assert!(html.contains("Stay updated with our latest news and offers."));
        assert!(html.contains("placeholder=\"Enter your email address\""));
        assert!(html.contains(">Subscribe</a>"));
        assert!(html.contains("href=\"#\""));
    }

    #[test]
    fn test_subscribe_custom_action() {
        let html = render_json(
            r#"{"id":"s","type":"subscribe-now","content":{"buttonText":"Join","buttonAction":"https://x.test/join"}}"#,
        );
        assert!(html.contains("href=\"https://x.test/join\""));
        assert!(html.contains(">Join</a>"));
    }

    #[test]
    fn test_testimonial_affiliation() {
        let html = render_json(
            r#"{"id":"t","type":"testimonial","content":{"quote":"Great","author":"Sam","role":"CTO","company":"Acme"}}"#,
        );
        assert!(html.contains("&ldquo;Great&rdquo;"));
        assert!(html.contains(">Sam</p>"));
        assert!(html.contains(">CTO, Acme</p>"));
        assert!(!html.contains("<img"));

        let html = render_json(r#"{"id":"t","type":"testimonial","content":{"company":"Acme"}}"#);
        assert!(html.contains("&ldquo;&rdquo;"));
        assert!(html.contains("opacity: 0.8;\">Acme</p>"));
    }

    #[test]
    fn test_cta_banner_button_optional() {
        let html = render_json(r#"{"id":"c","type":"cta-banner","content":{"title":"Sale"}}"#);
        assert!(html.contains(">Sale</h2>"));
        assert!(!html.contains("class=\"button\""));

        let html = render_json(
            r#"{"id":"c","type":"cta-banner","content":{"title":"Sale","buttonText":"Shop","buttonUrl":"https://x.test"}}"#,
        );
        assert!(html.contains("href=\"https://x.test\""));
        assert!(html.contains(">Shop</a>"));
    }

    #[test]
    fn test_products_limited_to_two() {
        let html = render_json(
            r#"{"id":"p","type":"product-recommendation","content":{"products":[
                {"name":"Mug","price":12.5,"discount":"-10%","link":"https://x.test/mug"},
                {"name":"Cap"},
                {"name":"Shirt"}
            ]}}"#,
        );
        assert_eq!(html.matches("class=\"product-cell\"").count(), 2);
        assert_eq!(html.matches("class=\"product-card\"").count(), 2);
        assert!(html.contains(">Mug</h3>"));
        assert!(html.contains(">Cap</h3>"));
        assert!(!html.contains("Shirt"));
        assert!(html.contains("12.5 <span class=\"product-discount\""));
        assert_eq!(html.matches(">Shop Now</a>").count(), 1);
    }

    #[test]
    fn test_single_product_keeps_second_column() {
        let html = render_json(
            r#"{"id":"p","type":"product-recommendation","content":{"products":[{"name":"Mug"}]}}"#,
        );
        assert_eq!(html.matches("class=\"product-cell\"").count(), 2);
        assert_eq!(html.matches("class=\"product-card\"").count(), 1);
    }

    #[test]
    fn test_empty_products() {
        let html = render_json(r#"{"id":"p","type":"product-recommendation","content":{"products":[]}}"#);
        assert!(html.contains("No products available"));
        assert!(!html.contains("product-grid"));
    }
}
