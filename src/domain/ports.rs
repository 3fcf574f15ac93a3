use super::merchant::{ExtractionReport, MerchantResource};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Source of raw merchant data.
#[async_trait]
pub trait MerchantGateway: Send + Sync {
    /// Returns the merchant listing rows.
    async fn list_merchants(&self) -> Result<Vec<Value>>;
    /// Returns the raw payload of one resource of one merchant.
    async fn fetch_resource(&self, merchant_id: &str, resource: MerchantResource)
    -> Result<Value>;
}

pub type MerchantGatewayBox = Box<dyn MerchantGateway>;

/// Destination of a finished extraction report.
pub trait ReportSink {
    fn write_report(&mut self, report: &ExtractionReport) -> Result<()>;
}
