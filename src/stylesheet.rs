use crate::render::escape_html;
use crate::theme::Theme;

/// Class rules shared by every fragment. Colors that depend on the theme are
/// appended by [`stylesheet`].
const BASE_STYLES: &str = "body,table,td,a{-webkit-text-size-adjust:100%;-ms-text-size-adjust:100%;}\
table,td{mso-table-lspace:0pt;mso-table-rspace:0pt;border-collapse:collapse;}\
img{-ms-interpolation-mode:bicubic;border:0;outline:none;text-decoration:none;height:auto;line-height:100%;}\
body{margin:0;padding:0;width:100%!important;font-family:Arial,Helvetica,sans-serif;}\
.email-container{margin:0 auto;}\
.nl-block{width:100%;}\
.nl-heading h1,.nl-heading h2,.nl-heading h3{margin:0;font-weight:bold;line-height:1.3;}\
.nl-heading h1{font-size:32px;}\
.nl-heading h2{font-size:24px;}\
.nl-heading h3{font-size:20px;}\
.button-td{border-radius:4px;}\
.button{display:inline-block;text-decoration:none;mso-padding-alt:0;}\
.divider{border:0;margin:0;}\
.spacer{mso-line-height-rule:exactly;}\
.compartment-content p{margin:0 0 10px 0;}\
.article-grid,.product-grid{table-layout:fixed;}\
.grid-spacer{font-size:0;line-height:0;}\
.nl-empty{margin:0;font-style:italic;}\
.preheader{display:none!important;visibility:hidden;opacity:0;color:transparent;height:0;width:0;max-height:0;max-width:0;overflow:hidden;mso-hide:all;}";

/// Full contents of the document's `<style>` element.
pub fn stylesheet(theme: &Theme, container_width: u32) -> String {
    let link = escape_html(&theme.global_link_color);
    let mut css = String::from(BASE_STYLES);
    css.push_str(&format!(".nl-block a{{color:{};}}", link));
    css.push_str(&format!(".nl-heading h1,.nl-heading h2,.nl-heading h3{{color:{};}}", escape_html(&theme.container_text_color)));
    css.push_str(&format!(
        "@media screen and (max-width:{}px){{\
.email-container{{width:100%!important;}}\
.article-cell,.product-cell{{display:block!important;width:100%!important;}}\
.grid-spacer{{display:none!important;}}\
}}",
        container_width
    ));
    css
}
