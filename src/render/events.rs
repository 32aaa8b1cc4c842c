use std::fmt::{self, Write};

use super::{
    close_block, escape_html, escape_multiline, open_block, open_table, present, write_placeholder,
};
use crate::blocks::{Event, EventCalendarContent};
use crate::style::{Align, BlockDefaults, ResolvedStyle};

pub(super) const EVENT_CALENDAR: BlockDefaults = BlockDefaults::new("20px", Align::Left);

pub(super) fn event_calendar(
    c: &EventCalendarContent,
    s: &ResolvedStyle,
    out: &mut String,
) -> fmt::Result {
    open_block(out, "nl-event-calendar", s)?;
    if let Some(title) = present(&c.title) {
        write!(
            out,
            "<h2 style=\"margin: 0 0 15px 0; font-size: 22px; color: {};\">{}</h2>",
            escape_html(&s.text_color),
            escape_html(title)
        )?;
    }
    if c.events.is_empty() {
        write_placeholder(out, "No events available")?;
        return close_block(out);
    }
    for event in &c.events {
        event_item(event, s, out)?;
    }
    close_block(out)
}

fn event_item(event: &Event, s: &ResolvedStyle, out: &mut String) -> fmt::Result {
    let css = format!(
        "margin-bottom: 15px; border-left: 3px solid {};",
        s.button_background
    );
    open_table(out, "event-item", &css)?;
    if let Some(title) = present(&event.title) {
        write!(
            out,
            "<tr><td colspan=\"2\" style=\"padding: 0 0 6px 12px; font-size: 17px; font-weight: bold;\">{}</td></tr>",
            escape_html(title)
        )?;
    }
    for (label, value) in [
        ("Date", &event.date),
        ("Time", &event.time),
        ("Location", &event.location),
    ] {
        if let Some(value) = present(value) {
            write!(
                out,
                "<tr><td width=\"80\" style=\"padding: 2px 0 2px 12px; font-size: 13px; font-weight: bold; width: 80px;\">{}:</td><td style=\"padding: 2px 0; font-size: 13px;\">{}</td></tr>",
                label,
                escape_html(value)
            )?;
        }
    }
    if let Some(description) = present(&event.description) {
        write!(
            out,
            "<tr><td colspan=\"2\" style=\"padding: 6px 0 0 12px; font-size: 14px; line-height: 1.5;\">{}</td></tr>",
            escape_multiline(description)
        )?;
    }
    if let Some(url) = present(&event.url) {
        write!(
            out,
            "<tr><td colspan=\"2\" style=\"padding: 6px 0 0 12px; font-size: 14px;\"><a href=\"{}\" target=\"_blank\" style=\"{}\">Event details</a></td></tr>",
            escape_html(url),
            escape_html(&s.link_css())
        )?;
    }
    out.write_str("</table>")
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
    fn test_empty_calendar_keeps_title() {
        let html = render_json(
            r#"{"id":"e","type":"event-calendar","content":{"title":"Upcoming","events":[]}}"#,
        );
        assert!(html.contains(">Upcoming</h2>"));
        assert!(html.contains("No events available"));
        assert!(!html.contains("event-item"));
    }

    #[test]
    fn test_event_rows_skip_missing_fields() {
        let html = render_json(
            r#"{"id":"e","type":"event-calendar","content":{"events":[
                {"title":"Meetup","date":"2024-06-01","location":"Hall B","url":"https://e.test"},
                {"title":"Webinar","time":"10:00"}
            ]}}"#,
        );
        assert_eq!(html.matches("class=\"event-item\"").count(), 2);
        assert!(html.contains(">Date:</td><td style=\"padding: 2px 0; font-size: 13px;\">2024-06-01</td>"));
        assert_eq!(html.matches(">Time:</td>").count(), 1);
        assert_eq!(html.matches(">Location:</td>").count(), 1);
        assert!(html.contains("href=\"https://e.test\""));
        assert!(!html.contains("<h2"));
    }
}
