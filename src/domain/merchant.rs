use super::summary::AggregationResult;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The per-merchant sub-resources exposed by the merchant API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MerchantResource {
    Details,
    Documents,
    BankAccounts,
    Devices,
    PaymentLinks,
    RecurringPaymentPlans,
    Gateways,
    Transactions,
}

impl MerchantResource {
    /// Order in which resources are requested for each merchant.
    pub const FETCH_ORDER: [Self; 8] = [
        Self::Documents,
        Self::BankAccounts,
        Self::Devices,
        Self::PaymentLinks,
        Self::RecurringPaymentPlans,
        Self::Gateways,
        Self::Transactions,
        Self::Details,
    ];

    /// API path of this resource for a merchant, relative to the base URL.
    pub fn path(&self, merchant_id: &str) -> String {
        match self {
            Self::Details => format!("/api/merchant/{merchant_id}"),
            Self::Documents => format!("/api/merchant/{merchant_id}/document"),
            Self::BankAccounts => format!("/api/v2/merchant/{merchant_id}/bank-accounts"),
            Self::Devices => format!("/api/merchant/{merchant_id}/devices"),
            Self::PaymentLinks => format!("/api/merchant/{merchant_id}/payment-link"),
            Self::RecurringPaymentPlans => {
                format!("/api/merchant/{merchant_id}/recurring-payments/plans")
            }
            Self::Gateways => format!("/api/merchant/{merchant_id}/gateways"),
            Self::Transactions => format!("/api/merchant/{merchant_id}/transaction"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Details => "details",
            Self::Documents => "documents",
            Self::BankAccounts => "bank accounts",
            Self::Devices => "devices",
            Self::PaymentLinks => "payment links",
            Self::RecurringPaymentPlans => "recurring payment plans",
            Self::Gateways => "gateways",
            Self::Transactions => "transactions",
        }
    }
}

impl fmt::Display for MerchantResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tagged error object stored in place of a payload that could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub error: String,
    pub merchant_id: String,
}

/// What ends up in a resource slot of a [`MerchantRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourcePayload {
    Raw(Value),
    Summary(AggregationResult),
    Failed(FetchFailure),
}

impl ResourcePayload {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Everything extracted for one merchant listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantRecord {
    pub merchant_id: Option<String>,
    pub merchant_data: Value,
    pub details: Option<ResourcePayload>,
    pub documents: Option<ResourcePayload>,
    pub bank_accounts: Option<ResourcePayload>,
    pub devices: Option<ResourcePayload>,
    pub payment_links: Option<ResourcePayload>,
    pub recurring_payment_plans: Option<ResourcePayload>,
    pub gateways: Option<ResourcePayload>,
    pub transactions: Option<ResourcePayload>,
}

impl MerchantRecord {
    /// Starts a record from a listing row, with every resource slot empty.
    pub fn new(merchant_data: Value) -> Self {
        Self {
            merchant_id: merchant_id_of(&merchant_data),
            merchant_data,
            details: None,
            documents: None,
            bank_accounts: None,
            devices: None,
            payment_links: None,
            recurring_payment_plans: None,
            gateways: None,
            transactions: None,
        }
    }

    pub fn slot(&self, resource: MerchantResource) -> Option<&ResourcePayload> {
        match resource {
            MerchantResource::Details => self.details.as_ref(),
            MerchantResource::Documents => self.documents.as_ref(),
            MerchantResource::BankAccounts => self.bank_accounts.as_ref(),
            MerchantResource::Devices => self.devices.as_ref(),
            MerchantResource::PaymentLinks => self.payment_links.as_ref(),
            MerchantResource::RecurringPaymentPlans => self.recurring_payment_plans.as_ref(),
            MerchantResource::Gateways => self.gateways.as_ref(),
            MerchantResource::Transactions => self.transactions.as_ref(),
        }
    }

    pub fn set_slot(&mut self, resource: MerchantResource, payload: ResourcePayload) {
        let slot = match resource {
            MerchantResource::Details => &mut self.details,
            MerchantResource::Documents => &mut self.documents,
            MerchantResource::BankAccounts => &mut self.bank_accounts,
            MerchantResource::Devices => &mut self.devices,
            MerchantResource::PaymentLinks => &mut self.payment_links,
            MerchantResource::RecurringPaymentPlans => &mut self.recurring_payment_plans,
            MerchantResource::Gateways => &mut self.gateways,
            MerchantResource::Transactions => &mut self.transactions,
        };
        *slot = Some(payload);
    }

    /// Resources whose slot holds a payload rather than nothing or an error.
    pub fn fetched_resources(&self) -> Vec<MerchantResource> {
        MerchantResource::FETCH_ORDER
            .into_iter()
            .filter(|resource| {
                self.slot(*resource)
                    .is_some_and(|payload| !payload.is_failure())
            })
            .collect()
    }
}

/// Reads the `id` of a listing row; strings and numbers are accepted.
fn merchant_id_of(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Success,
    Error,
}

/// The top-level document handed to a report sink.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub extraction_time: DateTime<Local>,
    pub status: ExtractionStatus,
    pub message: String,
    pub total_merchants: usize,
    pub merchants: Vec<MerchantRecord>,
}

impl ExtractionReport {
    /// Report for a run that found no merchants to extract.
    pub fn empty(extraction_time: DateTime<Local>) -> Self {
        Self {
            extraction_time,
            status: ExtractionStatus::Error,
            message: "No merchants found or error occurred".to_string(),
            total_merchants: 0,
            merchants: Vec::new(),
        }
    }

    pub fn completed(extraction_time: DateTime<Local>, merchants: Vec<MerchantRecord>) -> Self {
        Self {
            extraction_time,
            status: ExtractionStatus::Success,
            message: format!(
                "Successfully extracted data for {} merchants",
                merchants.len()
            ),
            total_merchants: merchants.len(),
            merchants,
        }
    }
}
