use crate::domain::summary::{
    AggregationResult, MonthBucket, MonthKey, MonthlySummary, Money, PaymentsSummary,
};
use crate::domain::transaction::RawTransaction;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Reduces a merchant's raw transaction-list response into payment totals and
/// a chronological monthly breakdown.
///
/// Only successful payments count. A response that is not an object with a
/// `data` array yields an empty result. Records whose `amount` or `fee` cannot
/// be read as a number are skipped entirely, as are records that would push a
/// running sum past the `Decimal` range. Records with an unreadable
/// `created_at` still count toward the totals but not toward any month.
///
/// The input is never modified and the same input always produces the same
/// result.
pub fn aggregate(merchant_id: &str, raw_response: &Value) -> AggregationResult {
    let Some(items) = transaction_items(merchant_id, raw_response) else {
        return AggregationResult::empty(merchant_id);
    };

    let mut totals = PaymentsSummary::default();
    let mut months: BTreeMap<MonthKey, MonthBucket> = BTreeMap::new();

    for tx in items.iter().filter_map(RawTransaction::from_value) {
        if !tx.is_successful_payment() {
            continue;
        }

        let (amount, fee) = match (tx.amount(), tx.fee()) {
            (Ok(amount), Ok(fee)) => (Money::new(amount), Money::new(fee)),
            (Err(e), _) | (_, Err(e)) => {
                warn!(merchant_id, "Skipping transaction: {}", e);
                continue;
            }
        };

        let month = match tx.created_month() {
            Some(Ok(month)) => Some(month),
            Some(Err(e)) => {
                warn!(merchant_id, "Transaction left out of monthly totals: {}", e);
                None
            }
            None => None,
        };

        // Nothing is committed unless every running sum stays in range.
        let Some(next_totals) = totals.with_payment(amount, fee) else {
            warn!(merchant_id, "Skipping transaction: totals would overflow");
            continue;
        };
        let next_bucket = match month {
            Some(month) => {
                let bucket = months.get(&month).copied().unwrap_or_else(MonthBucket::new);
                match bucket.with_payment(amount, fee) {
                    Some(next) => Some((month, next)),
                    None => {
                        warn!(merchant_id, %month, "Skipping transaction: monthly totals would overflow");
                        continue;
                    }
                }
            }
            None => None,
        };

        totals = next_totals;
        if let Some((month, bucket)) = next_bucket {
            months.insert(month, bucket);
        }
    }

    totals.total_amount = totals.total_amount.rounded();
    totals.total_fees = totals.total_fees.rounded();

    debug!(
        merchant_id,
        payments = totals.total_transactions,
        months = months.len(),
        "Aggregated successful payments"
    );

    AggregationResult {
        merchant_id: merchant_id.to_string(),
        successful_payments_summary: totals,
        monthly_transactions: months
            .iter()
            .map(|(month, bucket)| MonthlySummary::from_bucket(*month, bucket))
            .collect(),
    }
}

fn transaction_items<'a>(merchant_id: &str, raw_response: &'a Value) -> Option<&'a Vec<Value>> {
    let Some(data) = raw_response.as_object().and_then(|body| body.get("data")) else {
        warn!(merchant_id, "Unexpected transaction data structure");
        return None;
    };
    let items = data.as_array();
    if items.is_none() {
        warn!(merchant_id, "Transaction data is not a list");
    }
    items
}
