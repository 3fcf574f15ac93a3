use crate::config::GatewayConfig;
use crate::domain::merchant::MerchantResource;
use crate::domain::ports::MerchantGateway;
use crate::error::{ExtractorError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Path of the merchant listing endpoint.
pub const MERCHANTS_PATH: &str = "/api/merchant";

/// A gateway backed by the merchant REST API.
///
/// Every request carries JSON `Accept`/`Content-Type` headers and, when an API
/// key is configured, `Authorization: Basic <key>`. Only `200 OK` counts as
/// success.
pub struct HttpMerchantGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpMerchantGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Basic {api_key}"))
                .map_err(|e| ExtractorError::Config(format!("invalid API key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.normalized_base_url(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Request to {} failed: {}", url, body);
            return Err(ExtractorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MerchantGateway for HttpMerchantGateway {
    async fn list_merchants(&self) -> Result<Vec<Value>> {
        let body = self.get_json(&self.url(MERCHANTS_PATH)).await?;

        match merchant_rows(body) {
            Ok(rows) => {
                info!("Successfully retrieved {} merchants", rows.len());
                Ok(rows)
            }
            Err(e) => {
                warn!("{}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn fetch_resource(
        &self,
        merchant_id: &str,
        resource: MerchantResource,
    ) -> Result<Value> {
        self.get_json(&self.url(&resource.path(merchant_id))).await
    }
}

/// Pulls the `data` array out of a merchant listing body.
fn merchant_rows(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Object(mut fields) => match fields.remove("data") {
            Some(Value::Array(rows)) => Ok(rows),
            data => {
                let rendered = data.map(|d| d.to_string()).unwrap_or_else(|| "missing".into());
                Err(ExtractorError::UnexpectedShape(format!(
                    "merchant listing `data` is not a list: {rendered}"
                )))
            }
        },
        other => Err(ExtractorError::UnexpectedShape(format!(
            "merchant listing is not an object: {other}"
        ))),
    }
}
