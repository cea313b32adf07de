use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeadError {
    #[error("JSON-LD serialization error for {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid structured data id prefix \"{prefix}\": {reason}")]
    InvalidPrefix { prefix: String, reason: String },
}
