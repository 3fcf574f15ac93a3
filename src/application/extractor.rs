use super::aggregator::aggregate;
use crate::domain::merchant::{
    ExtractionReport, FetchFailure, MerchantRecord, MerchantResource, ResourcePayload,
};
use crate::domain::ports::MerchantGatewayBox;
use chrono::Local;
use serde_json::Value;
use tracing::{error, info, warn};

/// Drives an extraction run over every merchant a gateway lists.
///
/// Merchants are processed one after another, and so are the resource
/// requests of each merchant. A failed request never aborts the run; it is
/// recorded as a tagged error object in the merchant's record.
pub struct MerchantExtractor {
    gateway: MerchantGatewayBox,
}

impl MerchantExtractor {
    pub fn new(gateway: MerchantGatewayBox) -> Self {
        Self { gateway }
    }

    /// Runs a full extraction and returns the assembled report.
    pub async fn run(&self) -> ExtractionReport {
        let extraction_time = Local::now();
        info!("Starting merchant data extraction");

        let merchants = match self.gateway.list_merchants().await {
            Ok(merchants) => merchants,
            Err(e) => {
                error!("Failed to list merchants: {}", e);
                Vec::new()
            }
        };

        if merchants.is_empty() {
            warn!("No merchants to extract");
            return ExtractionReport::empty(extraction_time);
        }

        let total = merchants.len();
        let mut records = Vec::with_capacity(total);
        for (index, row) in merchants.into_iter().enumerate() {
            records.push(self.extract_merchant(index + 1, total, row).await);
        }

        info!("Completed data extraction for {} merchants", total);
        ExtractionReport::completed(extraction_time, records)
    }

    async fn extract_merchant(&self, position: usize, total: usize, row: Value) -> MerchantRecord {
        let mut record = MerchantRecord::new(row);
        let Some(merchant_id) = record.merchant_id.clone() else {
            warn!("Processing merchant {}/{}: listing row has no id", position, total);
            return record;
        };
        info!("Processing merchant {}/{}: {}", position, total, merchant_id);

        for resource in MerchantResource::FETCH_ORDER {
            let payload = self.fetch(&merchant_id, resource).await;
            record.set_slot(resource, payload);
        }
        record
    }

    async fn fetch(&self, merchant_id: &str, resource: MerchantResource) -> ResourcePayload {
        match self.gateway.fetch_resource(merchant_id, resource).await {
            Ok(body) => {
                info!("Retrieved {} for merchant {}", resource, merchant_id);
                match resource {
                    MerchantResource::Transactions => {
                        let summary = aggregate(merchant_id, &body);
                        info!(
                            "Processed {} successful payments for merchant {}",
                            summary.successful_payments_summary.total_transactions, merchant_id
                        );
                        ResourcePayload::Summary(summary)
                    }
                    _ => ResourcePayload::Raw(body),
                }
            }
            Err(e) => {
                error!("Error getting {} for merchant {}: {}", resource, merchant_id, e);
                ResourcePayload::Failed(FetchFailure {
                    error: e.to_string(),
                    merchant_id: merchant_id.to_string(),
                })
            }
        }
    }
}
