//! Logic for retrieving external resources.
use std::error::Error as StdError;

use ahash::AHashMap;
use jsonschema_dialect::Retrieve;
use serde_json::Value;
use url::Url;

/// Retrieves `file://` documents (feature `resolve-file`) and `http(s)://` documents through
/// blocking `reqwest` (feature `resolve-http`).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRetriever;

impl Retrieve for DefaultRetriever {
    fn retrieve(&self, iri: &Url) -> Result<Value, Box<dyn StdError + Send + Sync>> {
        tracing::debug!(iri = %iri, "retrieving external document");
        match iri.scheme() {
            "http" | "https" => {
                #[cfg(feature = "resolve-http")]
                {
                    let response = reqwest::blocking::get(iri.as_str())?.error_for_status()?;
                    Ok(response.json()?)
                }
                #[cfg(not(feature = "resolve-http"))]
                Err(anyhow::anyhow!(
                    "`resolve-http` feature or a custom retriever is required to retrieve '{iri}'"
                )
                .into())
            }
            "file" => {
                #[cfg(feature = "resolve-file")]
                {
                    let path = iri
                        .to_file_path()
                        .map_err(|()| anyhow::anyhow!("'{iri}' is not a valid file path"))?;
                    let file = std::fs::File::open(path)?;
                    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
                }
                #[cfg(not(feature = "resolve-file"))]
                Err(anyhow::anyhow!(
                    "`resolve-file` feature or a custom retriever is required to retrieve '{iri}'"
                )
                .into())
            }
            "json-schema" => Err(anyhow::anyhow!(
                "'{iri}' is relative to a schema without an identifier and can not be retrieved"
            )
            .into()),
            scheme => Err(anyhow::anyhow!("Unknown scheme {scheme}").into()),
        }
    }
}

/// Serves documents registered with [`crate::ValidationOptions::with_resource`] before falling
/// back to the configured retriever.
pub(crate) struct WithResources<'a> {
    pub(crate) resources: &'a AHashMap<String, Value>,
    pub(crate) inner: &'a dyn Retrieve,
}

impl Retrieve for WithResources<'_> {
    fn retrieve(&self, iri: &Url) -> Result<Value, Box<dyn StdError + Send + Sync>> {
        let key = jsonschema_dialect::iri::normalize(iri.as_str());
        match self.resources.get(key) {
            Some(document) => Ok(document.clone()),
            None => self.inner.retrieve(iri),
        }
    }
}
