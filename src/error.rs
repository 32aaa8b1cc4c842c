use thiserror::Error;

pub type NewsletterResult<T> = Result<T, NewsletterError>;

/// Errors raised at the edges of the compiler: loading templates, themes and
/// render options. Rendering itself never fails.
#[derive(Error, Debug)]
pub enum NewsletterError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
}

impl NewsletterError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        NewsletterError::Io {
            path: path.into(),
            source,
        }
    }
}
