use merchant_extract::application::aggregator::aggregate;
use merchant_extract::domain::summary::Money;
use rust_decimal_macros::dec;
use serde_json::json;

mod common;

#[test]
fn test_scenario_single_successful_payment() {
    let raw = json!({"data": [
        {"type": "Payment", "status": "Succeeded", "amount": 100, "fee": 2.5, "created_at": "2024-03-15T10:00:00Z"},
        {"type": "payment", "status": "failed", "amount": 50, "fee": 1, "created_at": "2024-03-16T10:00:00Z"}
    ]});

    let result = serde_json::to_value(aggregate("m_1", &raw)).unwrap();
    assert_eq!(
        result,
        json!({
            "merchant_id": "m_1",
            "successful_payments_summary": {
                "total_amount": 100.0,
                "total_fees": 2.5,
                "total_transactions": 1
            },
            "monthly_transactions": [
                {"month": "03/2024", "total_successful_volume": 100.0, "fees": 2.5, "transaction_count": 1}
            ]
        })
    );
}

#[test]
fn test_missing_or_non_list_data_yields_zero_totals() {
    for raw in [json!({}), json!({"data": null}), json!({"data": 3}), json!("data")] {
        let result = aggregate("m_1", &raw);
        assert_eq!(result.successful_payments_summary.total_amount, Money::ZERO);
        assert_eq!(result.successful_payments_summary.total_fees, Money::ZERO);
        assert_eq!(result.successful_payments_summary.total_transactions, 0);
        assert!(result.monthly_transactions.is_empty());
    }
}

#[test]
fn test_empty_data_yields_zero_totals() {
    let result = aggregate("m_1", &json!({"data": []}));
    assert_eq!(result.successful_payments_summary.total_transactions, 0);
    assert!(result.monthly_transactions.is_empty());
}

#[test]
fn test_qualification_is_case_insensitive_and_exclusive() {
    let raw = json!({"data": [
        common::transaction("PAYMENT", "succeeded", json!(1), json!(0), None),
        common::transaction("payment", "SuCcEeDeD", json!(1), json!(0), None),
        common::transaction("refund", "succeeded", json!(1), json!(0), None),
        common::transaction("payment", "pending", json!(1), json!(0), None),
        common::transaction("", "", json!(1), json!(0), None),
        {"type": "payment", "amount": 1}
    ]});

    let result = aggregate("m_1", &raw);
    assert_eq!(result.successful_payments_summary.total_transactions, 2);
    assert_eq!(result.successful_payments_summary.total_amount, Money::new(dec!(2)));
}

#[test]
fn test_undated_payment_counts_toward_totals_only() {
    let raw = json!({"data": [
        common::payment(json!(40), json!(1.2), None),
        common::payment(json!(60), json!(1.8), Some("2024-07-04T00:00:00Z")),
    ]});

    let result = aggregate("m_1", &raw);
    assert_eq!(result.successful_payments_summary.total_transactions, 2);
    assert_eq!(result.successful_payments_summary.total_amount, Money::new(dec!(100)));
    assert_eq!(result.successful_payments_summary.total_fees, Money::new(dec!(3)));
    assert_eq!(result.monthly_transactions.len(), 1);
    assert_eq!(result.monthly_transactions[0].transaction_count, 1);
}

#[test]
fn test_missing_amount_and_fee_default_to_zero() {
    let raw = json!({"data": [
        {"type": "payment", "status": "succeeded", "created_at": "2024-01-01T00:00:00Z"}
    ]});

    let result = aggregate("m_1", &raw);
    assert_eq!(result.successful_payments_summary.total_transactions, 1);
    assert_eq!(result.successful_payments_summary.total_amount, Money::ZERO);
    assert_eq!(result.monthly_transactions[0].transaction_count, 1);
}

#[test]
fn test_rounding_happens_after_summing() {
    let raw = json!({"data": [
        common::payment(json!(10.005), json!(0.004), Some("2024-09-01T00:00:00Z")),
        common::payment(json!(10.004), json!(0.004), Some("2024-09-30T23:59:59Z")),
    ]});

    let result = aggregate("m_1", &raw);
    let september = &result.monthly_transactions[0];
    assert_eq!(september.total_successful_volume, Money::new(dec!(20.01)));
    assert_eq!(september.fees, Money::new(dec!(0.01)));
}

#[test]
fn test_month_counts_never_exceed_total() {
    let raw = common::generate_transactions(500);
    let result = aggregate("m_1", &raw);

    let dated = result.dated_transactions();
    let total = result.successful_payments_summary.total_transactions;
    assert!(total > 0);
    assert!(dated < total, "undated payments must only show up in the total");

    let months: Vec<_> = result.monthly_transactions.iter().map(|m| m.month).collect();
    let mut sorted = months.clone();
    sorted.sort();
    assert_eq!(months, sorted);
}

#[test]
fn test_month_counts_equal_total_when_all_dated() {
    let raw = json!({"data": [
        common::payment(json!(1), json!(0), Some("2022-12-31T23:59:59+02:00")),
        common::payment(json!(2), json!(0), Some("2023-01-01")),
        common::payment(json!(3), json!(0), Some("2023-01-01T00:00:00")),
    ]});

    let result = aggregate("m_1", &raw);
    assert_eq!(
        result.dated_transactions(),
        result.successful_payments_summary.total_transactions
    );
    let months: Vec<String> = result
        .monthly_transactions
        .iter()
        .map(|m| m.month.to_string())
        .collect();
    assert_eq!(months, vec!["12/2022", "01/2023"]);
}

#[test]
fn test_aggregation_is_idempotent() {
    let raw = common::generate_transactions(200);
    let first = serde_json::to_string(&aggregate("m_1", &raw)).unwrap();
    let second = serde_json::to_string(&aggregate("m_1", &raw)).unwrap();
    assert_eq!(first, second);
}
