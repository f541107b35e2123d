// src/error.rs

use thiserror::Error;

/// Page-structure violations. Any of these aborts the running pipeline;
/// transport failures never show up here (see `fetch::get_response`).
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("required node <{tag}> {attrs} not found")]
    MissingNode { tag: String, attrs: String },

    #[error("node <{tag}> has no `{attr}` attribute")]
    MissingAttr { tag: String, attr: String },

    #[error("status code {0:?} is not in the expected-status table")]
    UnknownStatusCode(String),

    #[error("no sidebar list containing \"All versions\"")]
    VersionListNotFound,
}
