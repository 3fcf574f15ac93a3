use serde_json::{Value, json};

pub fn transaction(kind: &str, status: &str, amount: Value, fee: Value, created_at: Option<&str>) -> Value {
    let mut tx = json!({
        "type": kind,
        "status": status,
        "amount": amount,
        "fee": fee,
    });
    if let Some(created_at) = created_at {
        tx["created_at"] = json!(created_at);
    }
    tx
}

pub fn payment(amount: Value, fee: Value, created_at: Option<&str>) -> Value {
    transaction("payment", "succeeded", amount, fee, created_at)
}

/// Builds a deterministic mix of transactions: every seventh is a refund,
/// every fifth failed, every third undated, the rest spread over 2023-2024.
pub fn generate_transactions(rows: usize) -> Value {
    let mut data = Vec::with_capacity(rows);
    for i in 0..rows {
        let kind = if i % 7 == 0 { "refund" } else { "Payment" };
        let status = if i % 5 == 0 { "failed" } else { "SUCCEEDED" };
        let created_at = (i % 3 != 0).then(|| {
            format!("{}-{:02}-15T08:30:00Z", 2023 + (i % 2), (i % 12) + 1)
        });
        data.push(transaction(
            kind,
            status,
            json!(i as f64 + 0.25),
            json!(0.1),
            created_at.as_deref(),
        ));
    }
    json!({ "data": data })
}
