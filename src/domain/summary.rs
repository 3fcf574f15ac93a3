use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;

/// Number of decimal places reported for every monetary total.
pub const REPORTED_DECIMALS: u32 = 2;

/// A monetary value in merchant-currency units.
///
/// Sums are exact; rounding only happens when a value is reported through
/// [`Money::rounded`]. Serializes as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Money(pub Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Rounds to [`REPORTED_DECIMALS`] places, ties to even.
    pub fn rounded(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(REPORTED_DECIMALS, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// `None` when the sum leaves the representable `Decimal` range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}


impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

/// Calendar month a transaction belongs to, rendered as `MM/YYYY`.
///
/// Orders chronologically: by year, then by month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Running sums for one month of qualifying transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthBucket {
    pub amount: Money,
    pub fees: Money,
    pub count: u64,
}

impl MonthBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bucket with one more payment recorded, or `None` on overflow.
    pub fn with_payment(&self, amount: Money, fee: Money) -> Option<Self> {
        Some(Self {
            amount: self.amount.checked_add(amount)?,
            fees: self.fees.checked_add(fee)?,
            count: self.count + 1,
        })
    }
}

/// Totals over every successful payment of a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct PaymentsSummary {
    pub total_amount: Money,
    pub total_fees: Money,
    pub total_transactions: u64,
}

impl PaymentsSummary {
    /// The totals with one more payment counted, or `None` on overflow.
    pub fn with_payment(&self, amount: Money, fee: Money) -> Option<Self> {
        Some(Self {
            total_amount: self.total_amount.checked_add(amount)?,
            total_fees: self.total_fees.checked_add(fee)?,
            total_transactions: self.total_transactions + 1,
        })
    }
}

/// One reported month of successful payments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub total_successful_volume: Money,
    pub fees: Money,
    pub transaction_count: u64,
}

impl MonthlySummary {
    /// Builds the reported form of a bucket, rounding its sums.
    pub fn from_bucket(month: MonthKey, bucket: &MonthBucket) -> Self {
        Self {
            month,
            total_successful_volume: bucket.amount.rounded(),
            fees: bucket.fees.rounded(),
            transaction_count: bucket.count,
        }
    }
}

/// The reduced form of a merchant's transaction list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub merchant_id: String,
    pub successful_payments_summary: PaymentsSummary,
    pub monthly_transactions: Vec<MonthlySummary>,
}

impl AggregationResult {
    /// A result with zero totals and no months.
    pub fn empty(merchant_id: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            successful_payments_summary: PaymentsSummary::default(),
            monthly_transactions: Vec::new(),
        }
    }

    /// Sum of `transaction_count` over all reported months.
    pub fn dated_transactions(&self) -> u64 {
        self.monthly_transactions
            .iter()
            .map(|month| month.transaction_count)
            .sum()
    }
}
