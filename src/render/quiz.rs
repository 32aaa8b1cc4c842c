use std::fmt::{self, Write};

use super::{close_block, escape_html, open_block, present, text, write_placeholder};
use crate::blocks::{QuizContent, QuizQuestion};
use crate::style::{Align, BlockDefaults, ResolvedStyle};

pub(super) const QUIZ: BlockDefaults = BlockDefaults::new("20px", Align::Left);

/// Scoring script; `__ID__` and `__TOTAL__` are substituted per quiz.
const SCORE_SCRIPT: &str = "<script>\
function scoreQuiz___ID__() {\
var score = 0;\
for (var i = 0; i < __TOTAL__; i++) {\
var picked = document.querySelector('input[name=\"quiz-__ID__-q' + i + '\"]:checked');\
if (picked && picked.getAttribute('data-correct') === 'true') { score++; }\
}\
alert('You scored ' + score + ' out of __TOTAL__!');\
return false;\
}\
</script>";

/// Identifier-safe form of a block id, used in input names and the script.
pub(crate) fn script_id(block_id: &str) -> String {
    let id: String = block_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if id.is_empty() {
        "quiz".to_string()
    } else {
        id
    }
}

/// `scope` is an identifier-safe name unique within the document; it keys the
/// radio groups and the scoring function.
pub(super) fn quiz(
    scope: &str,
    c: &QuizContent,
    s: &ResolvedStyle,
    include_scripts: bool,
    out: &mut String,
) -> fmt::Result {
    open_block(out, "nl-quiz", s)?;
    if let Some(title) = present(&c.title) {
        write!(
            out,
            "<h2 style=\"margin: 0 0 15px 0; font-size: 22px; color: {};\">{}</h2>",
            escape_html(&s.text_color),
            escape_html(title)
        )?;
    }
    if c.questions.is_empty() {
        write_placeholder(out, "No quiz questions available")?;
        return close_block(out);
    }

    for (index, question) in c.questions.iter().enumerate() {
        write_question(scope, index, question, out)?;
    }

    if include_scripts {
        write!(
            out,
            "<p style=\"margin: 10px 0 0 0;\"><a href=\"#\" class=\"button\" onclick=\"return scoreQuiz_{scope}();\" style=\"{}\">Check Answers</a></p>",
            escape_html(&s.button_css())
        )?;
        out.push_str(
            &SCORE_SCRIPT
                .replace("__ID__", scope)
                .replace("__TOTAL__", &c.questions.len().to_string()),
        );
    }
    close_block(out)
}

fn write_question(sid: &str, index: usize, q: &QuizQuestion, out: &mut String) -> fmt::Result {
    out.write_str("<div class=\"quiz-question\" style=\"margin-bottom: 15px;\">")?;
    write!(
        out,
        "<p style=\"margin: 0 0 8px 0; font-size: 16px; font-weight: bold;\">{}. {}</p>",
        index + 1,
        text(&q.question)
    )?;
    if let Some(image) = present(&q.image) {
        write!(
            out,
            "<img src=\"{}\" alt=\"\" style=\"display: block; max-width: 100%; height: auto; border: 0; margin: 0 0 8px 0;\">",
            escape_html(image)
        )?;
    }
    for (option_index, option) in q.options.iter().enumerate() {
        let correct = if q.is_correct(option_index) {
            " data-correct=\"true\""
        } else {
            ""
        };
        write!(
            out,
            "<label style=\"display: block; margin: 4px 0; font-size: 15px;\"><input type=\"radio\" name=\"quiz-{sid}-q{index}\" value=\"{option_index}\"{correct}> {}</label>",
            escape_html(&option.text)
        )?;
    }
    out.write_str("</div>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;
    use crate::render::{render_block, RenderContext};
    use crate::theme::Theme;

    const QUIZ_JSON: &str = r#"{"id":"quiz-1","type":"quiz","content":{"title":"Trivia","questions":[
        {"question":"2+2?","options":["3",{"text":"4","correct":true}]},
        {"question":"Sky?","options":["green","blue"],"correctAnswer":1}
    ]}}"#;

    fn render(json: &str, include_scripts: bool) -> String {
        let block: Block = serde_json::from_str(json).unwrap();
        let ctx = RenderContext {
            copyright_year: 2024,
            include_scripts,
        };
        render_block(&block, &Theme::default(), &ctx)
    }

    #[test]
    fn test_script_id() {
        assert_eq!(script_id("quiz-1"), "quiz_1");
        assert_eq!(script_id("a.b c"), "a_b_c");
        assert_eq!(script_id(""), "quiz");
    }

    #[test]
    fn test_radio_groups_per_question() {
        let html = render(QUIZ_JSON, true);
        assert_eq!(html.matches("name=\"quiz-quiz_1-q0\"").count(), 2);
        assert_eq!(html.matches("name=\"quiz-quiz_1-q1\"").count(), 2);
        assert!(html.contains("value=\"1\" data-correct=\"true\"> 4</label>"));
        assert_eq!(html.matches("data-correct=\"true\"").count(), 2);
        assert!(html.contains(">1. 2+2?</p>"));
    }

    #[test]
    fn test_script_included_by_default() {
        let html = render(QUIZ_JSON, true);
        assert!(html.contains("onclick=\"return scoreQuiz_quiz_1();\""));
        assert!(html.contains("function scoreQuiz_quiz_1()"));
        assert!(html.contains("i < 2;"));
        assert!(html.contains("out of 2!"));
        assert!(!html.contains("__ID__"));
    }

    #[test]
    fn test_script_can_be_omitted() {
        let html = render(QUIZ_JSON, false);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("Check Answers"));
        assert!(html.contains("type=\"radio\""));
    }

    #[test]
    fn test_empty_quiz() {
        let html = render(r#"{"id":"q","type":"quiz","content":{"questions":[]}}"#, true);
        assert!(html.contains("No quiz questions available"));
        assert!(!html.contains("<script>"));
    }
}
