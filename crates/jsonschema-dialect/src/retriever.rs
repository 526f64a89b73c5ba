use core::fmt;

use serde_json::Value;
use url::Url;

/// Retrieves documents that are not embedded or registered up front.
///
/// Used for custom meta-schemas and remote `$ref` targets alike.
pub trait Retrieve: Send + Sync {
    /// Attempt to retrieve the document identified by `iri`.
    ///
    /// # Errors
    ///
    /// If the document could not be retrieved or is not valid JSON.
    fn retrieve(&self, iri: &Url) -> Result<Value, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone)]
struct NoRetrievalError(String);

impl fmt::Display for NoRetrievalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Retrieval of '{}' is not configured", self.0)
    }
}

impl std::error::Error for NoRetrievalError {}

/// A retriever that never fetches anything.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoRetrieve;

impl Retrieve for NoRetrieve {
    fn retrieve(&self, iri: &Url) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(NoRetrievalError(iri.to_string())))
    }
}
