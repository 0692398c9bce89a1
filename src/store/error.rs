use thiserror::Error;

/// Failures talking to the note store. None of these are recoverable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("can't connect to note store for request {endpoint}")]
    Connection {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("can't read response body for request {endpoint}")]
    Read {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("note store error {status} for request {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("malformed note list returned by {endpoint}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid note store url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("note store is still empty after {attempts} seeding attempt(s)")]
    Seeding { attempts: u32 },
}
