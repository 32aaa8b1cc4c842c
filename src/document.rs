//! Wraps block fragments in the full email document skeleton.

use std::fmt::{self, Write};

use crate::config::RenderOptions;
use crate::render::escape_html;
use crate::stylesheet::stylesheet;
use crate::theme::Theme;

/// Assemble fragments into a complete document with default options.
pub fn assemble<S: AsRef<str>>(fragments: &[S], theme: &Theme) -> String {
    assemble_with(fragments, theme, &RenderOptions::default())
}

/// Assemble fragments, in order, into the single content cell of a
/// fixed-width container table.
pub fn assemble_with<S: AsRef<str>>(
    fragments: &[S],
    theme: &Theme,
    options: &RenderOptions,
) -> String {
    let capacity = fragments.iter().map(|f| f.as_ref().len()).sum::<usize>() + 4096;
    let mut html = String::with_capacity(capacity);
    if let Err(err) = write_document(fragments, theme, options, &mut html) {
        tracing::warn!(error = %err, "failed to write newsletter document");
        return String::new();
    }
    html
}

fn write_document<S: AsRef<str>>(
    fragments: &[S],
    theme: &Theme,
    options: &RenderOptions,
    out: &mut String,
) -> fmt::Result {
    let width = options.width();
    let background = escape_html(&theme.container_background);
    let text_color = escape_html(&theme.container_text_color);

    write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en" xmlns="http://www.w3.org/1999/xhtml" xmlns:v="urn:schemas-microsoft-com:vml" xmlns:o="urn:schemas-microsoft-com:office:office">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta http-equiv="X-UA-Compatible" content="IE=edge">
<meta name="x-apple-disable-message-reformatting">
<title>{title}</title>
<!--[if mso]><xml><o:OfficeDocumentSettings><o:AllowPNG/><o:PixelsPerInch>96</o:PixelsPerInch></o:OfficeDocumentSettings></xml><![endif]-->
<style>{css}</style>
</head>
<body style="margin: 0; padding: 0; background-color: {background};">
"#,
        title = escape_html(&options.title),
        css = stylesheet(theme, width),
    )?;
    if let Some(preheader) = options.preheader.as_deref().filter(|p| !p.trim().is_empty()) {
        writeln!(
            out,
            "<div class=\"preheader\" style=\"display: none; max-height: 0; overflow: hidden; mso-hide: all;\">{}</div>",
            escape_html(preheader)
        )?;
    }
    write!(
        out,
        r#"<table role="presentation" width="100%" cellpadding="0" cellspacing="0" border="0" style="background-color: {background};"><tr><td align="center">
<table role="presentation" class="email-container" width="{width}" cellpadding="0" cellspacing="0" border="0" style="width: 100%; max-width: {width}px; background-color: {background}; color: {text_color};"><tr><td>
"#
    )?;
    for fragment in fragments {
        out.write_str(fragment.as_ref())?;
    }
    out.write_str(
        "
</td></tr></table>
</td></tr></table>
</body>
</html>
",
    )
}
