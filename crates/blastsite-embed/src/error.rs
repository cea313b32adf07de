use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("form host rejected create call: {0}")]
    FormHost(String),

    #[error("map API error: {0}")]
    Map(String),
}
