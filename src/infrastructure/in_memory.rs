use crate::domain::merchant::MerchantResource;
use crate::domain::ports::MerchantGateway;
use crate::error::{ExtractorError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A gateway that serves recorded responses from memory.
///
/// Can be built up programmatically or loaded from a replay fixture of the
/// form `{"merchants": [...], "resources": {"<id>": {"<resource>": ...}}}`.
/// A resource with no recorded response answers like an HTTP 404.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct InMemoryMerchantGateway {
    #[serde(default)]
    merchants: Vec<Value>,
    #[serde(default)]
    resources: HashMap<String, HashMap<MerchantResource, Value>>,
}

impl InMemoryMerchantGateway {
    /// Creates a new gateway with no merchants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a replay fixture from any `Read` source.
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    /// Loads a replay fixture file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn with_merchant(mut self, row: Value) -> Self {
        self.merchants.push(row);
        self
    }

    pub fn with_resource(
        mut self,
        merchant_id: &str,
        resource: MerchantResource,
        payload: Value,
    ) -> Self {
        self.resources
            .entry(merchant_id.to_string())
            .or_default()
            .insert(resource, payload);
        self
    }
}

#[async_trait]
impl MerchantGateway for InMemoryMerchantGateway {
    async fn list_merchants(&self) -> Result<Vec<Value>> {
        Ok(self.merchants.clone())
    }

    async fn fetch_resource(
        &self,
        merchant_id: &str,
        resource: MerchantResource,
    ) -> Result<Value> {
        self.resources
            .get(merchant_id)
            .and_then(|recorded| recorded.get(&resource))
            .cloned()
            .ok_or_else(|| ExtractorError::Status {
                status: 404,
                body: format!("no recorded {} for merchant {}", resource, merchant_id),
            })
    }
}
