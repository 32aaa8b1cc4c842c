use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::lenient;
use crate::style::StyleSpec;

/// One typed unit of newsletter content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
    pub style: Option<StyleSpec>,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            style: None,
        }
    }

    pub fn with_style(mut self, style: StyleSpec) -> Self {
        self.style = Some(style);
        self
    }
}

/// The closed set of block types, with their content.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Header(HeaderContent),
    Footer(FooterContent),
    Heading(HeadingContent),
    Paragraph(ParagraphContent),
    Image(ImageContent),
    Button(ButtonContent),
    Divider,
    Spacer(SpacerContent),
    Compartment(CompartmentContent),
    FeaturedArticle(FeaturedArticleContent),
    ArticleGrid(ArticleGridContent),
    EventCalendar(EventCalendarContent),
    Quiz(QuizContent),
    SubscribeNow(SubscribeNowContent),
    Testimonial(TestimonialContent),
    CtaBanner(CtaBannerContent),
    ProductRecommendation(ProductRecommendationContent),
    SocialLinks(SocialLinksContent),
    Video(VideoContent),
    /// A tag outside the known set; renders nothing.
    Unknown(String),
}

impl BlockKind {
    /// Build a block kind from its wire tag and raw content. Content that does
    /// not fit the variant's shape decodes as the variant's empty content.
    pub fn from_parts(tag: &str, content: Value) -> BlockKind {
        match tag {
            "header" => BlockKind::Header(decode(tag, content)),
            "footer" => BlockKind::Footer(decode(tag, content)),
            "heading" => BlockKind::Heading(decode(tag, content)),
            "paragraph" => BlockKind::Paragraph(decode(tag, content)),
            "image" => BlockKind::Image(decode(tag, content)),
            "button" => BlockKind::Button(decode(tag, content)),
            "divider" => BlockKind::Divider,
            "spacer" => BlockKind::Spacer(decode(tag, content)),
            "compartment" => BlockKind::Compartment(decode(tag, content)),
            "featured-article" => BlockKind::FeaturedArticle(decode(tag, content)),
            "article-grid" => BlockKind::ArticleGrid(decode(tag, content)),
            "event-calendar" => BlockKind::EventCalendar(decode(tag, content)),
            "quiz" => BlockKind::Quiz(decode(tag, content)),
            "subscribe-now" => BlockKind::SubscribeNow(decode(tag, content)),
            "testimonial" => BlockKind::Testimonial(decode(tag, content)),
            "cta-banner" => BlockKind::CtaBanner(decode(tag, content)),
            "product-recommendation" => BlockKind::ProductRecommendation(decode(tag, content)),
            "social-links" => BlockKind::SocialLinks(decode(tag, content)),
            "video" => BlockKind::Video(decode(tag, content)),
            other => BlockKind::Unknown(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            BlockKind::Header(_) => "header",
            BlockKind::Footer(_) => "footer",
            BlockKind::Heading(_) => "heading",
            BlockKind::Paragraph(_) => "paragraph",
            BlockKind::Image(_) => "image",
            BlockKind::Button(_) => "button",
            BlockKind::Divider => "divider",
            BlockKind::Spacer(_) => "spacer",
            BlockKind::Compartment(_) => "compartment",
            BlockKind::FeaturedArticle(_) => "featured-article",
            BlockKind::ArticleGrid(_) => "article-grid",
            BlockKind::EventCalendar(_) => "event-calendar",
            BlockKind::Quiz(_) => "quiz",
            BlockKind::SubscribeNow(_) => "subscribe-now",
            BlockKind::Testimonial(_) => "testimonial",
            BlockKind::CtaBanner(_) => "cta-banner",
            BlockKind::ProductRecommendation(_) => "product-recommendation",
            BlockKind::SocialLinks(_) => "social-links",
            BlockKind::Video(_) => "video",
            BlockKind::Unknown(tag) => tag,
        }
    }
}

fn decode<T: DeserializeOwned + Default>(tag: &str, mut content: Value) -> T {
    if content.is_null() {
        return T::default();
    }
    fold_aliases(&mut content, field_aliases(tag));
    serde_json::from_value(content).unwrap_or_else(|err| {
        tracing::warn!(block_type = tag, error = %err, "block content has an unexpected shape, rendering it empty");
        T::default()
    })
}

/// `(alias, canonical)` key pairs the editor has used for a block type's
/// fields, nested records included.
fn field_aliases(tag: &str) -> &'static [(&'static str, &'static str)] {
    match tag {
        "header" => &[("logo", "logoUrl")],
        "footer" => &[("contactEmail", "contactUrl")],
        "image" => &[("src", "url")],
        "featured-article" => &[("image", "imageUrl")],
        "article-grid" => &[("image", "imageUrl"), ("link", "url")],
        "event-calendar" => &[("link", "url")],
        "quiz" => &[("imageUrl", "image"), ("label", "text"), ("isCorrect", "correct")],
        "subscribe-now" => &[("action", "buttonAction")],
        "testimonial" => &[("image", "imageUrl"), ("author", "attribution")],
        "product-recommendation" => &[("image", "imageUrl"), ("url", "link")],
        "video" => &[("thumbnail", "thumbnailUrl"), ("url", "videoUrl")],
        _ => &[],
    }
}

/// Rewrite alias keys to their canonical name in every object of the tree.
/// When both spellings are present the canonical one wins and the alias is
/// dropped, so a record never carries the same field twice.
fn fold_aliases(value: &mut Value, aliases: &[(&str, &str)]) {
    if aliases.is_empty() {
        return;
    }
    match value {
        Value::Object(map) => {
            for (alias, canonical) in aliases {
                let Some(aliased) = map.remove(*alias) else {
                    continue;
                };
                let canonical_set = map.get(*canonical).is_some_and(|v| !v.is_null());
                if !canonical_set {
                    map.insert((*canonical).to_string(), aliased);
                }
            }
            for child in map.values_mut() {
                fold_aliases(child, aliases);
            }
        }
        Value::Array(items) => {
            for item in items {
                fold_aliases(item, aliases);
            }
        }
        _ => {}
    }
}

/// Wire shape of a block as the editor stores it.
#[derive(Deserialize)]
struct RawBlock {
    #[serde(default, deserialize_with = "lenient::text")]
    id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    tag: Option<String>,
    #[serde(default)]
    content: Value,
    #[serde(default, deserialize_with = "lenient::record")]
    style: Option<StyleSpec>,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Block {
            id: raw.id.unwrap_or_default(),
            kind: BlockKind::from_parts(raw.tag.as_deref().unwrap_or_default(), raw.content),
            style: raw.style,
        }
    }
}

// ─── Content records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderContent {
    #[serde(deserialize_with = "lenient::text")]
    pub logo_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub tagline: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterContent {
    #[serde(deserialize_with = "lenient::text")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub social_links: Vec<SocialLink>,
    #[serde(deserialize_with = "lenient::text")]
    pub contact_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub website_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub unsubscribe_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLink {
    #[serde(deserialize_with = "lenient::text")]
    pub platform: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingContent {
    #[serde(deserialize_with = "lenient::text")]
    pub text: Option<String>,
    /// `h1`, `h2` or `h3`; bare digits are accepted too.
    #[serde(deserialize_with = "lenient::text")]
    pub level: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphContent {
    #[serde(deserialize_with = "lenient::text")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageContent {
    #[serde(deserialize_with = "lenient::text")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub alt: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub caption: Option<String>,
    /// Optional link wrapping the image.
    #[serde(deserialize_with = "lenient::text")]
    pub link_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonContent {
    #[serde(deserialize_with = "lenient::text")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpacerContent {
    /// Height in pixels.
    #[serde(deserialize_with = "lenient::number")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompartmentContent {
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    /// Raw HTML, inserted without escaping. Callers accepting untrusted input
    /// must sanitize before rendering.
    #[serde(deserialize_with = "lenient::text")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeaturedArticleContent {
    #[serde(deserialize_with = "lenient::text")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub author: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub cta_text: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub cta_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleGridContent {
    #[serde(deserialize_with = "lenient::list")]
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    #[serde(deserialize_with = "lenient::text")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub link_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventCalendarContent {
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub time: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizContent {
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizQuestion {
    #[serde(deserialize_with = "lenient::text")]
    pub question: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub options: Vec<QuizOption>,
    /// Index of the correct option, as an alternative to per-option flags.
    #[serde(deserialize_with = "lenient::number")]
    pub correct_answer: Option<f64>,
}

impl QuizQuestion {
    pub fn is_correct(&self, index: usize) -> bool {
        let by_index = self
            .correct_answer
            .map(|answer| answer >= 0.0 && answer as usize == index)
            .unwrap_or(false);
        let by_flag = self.options.get(index).map(|o| o.correct).unwrap_or(false);
        by_index || by_flag
    }
}

/// A quiz answer; the editor stores either a bare string or `{ text, correct }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawQuizOption")]
pub struct QuizOption {
    pub text: String,
    pub correct: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuizOption {
    Text(String),
    Record {
        #[serde(default, deserialize_with = "lenient::text")]
        text: Option<String>,
        #[serde(default)]
        correct: Option<bool>,
    },
}

impl From<RawQuizOption> for QuizOption {
    fn from(raw: RawQuizOption) -> Self {
        match raw {
            RawQuizOption::Text(text) => QuizOption {
                text,
                correct: false,
            },
            RawQuizOption::Record { text, correct } => QuizOption {
                text: text.unwrap_or_default(),
                correct: correct.unwrap_or(false),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscribeNowContent {
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub placeholder: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub button_text: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub button_action: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestimonialContent {
    #[serde(deserialize_with = "lenient::text")]
    pub quote: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub attribution: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CtaBannerContent {
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub button_text: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub button_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRecommendationContent {
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub price: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub discount: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinksContent {
    #[serde(deserialize_with = "lenient::list")]
    pub links: Vec<SocialLink>,
    #[serde(deserialize_with = "lenient::text")]
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoContent {
    #[serde(deserialize_with = "lenient::text")]
    pub thumbnail_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub video_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub align: Option<String>,
}
