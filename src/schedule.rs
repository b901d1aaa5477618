use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::BillingConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{BillingError, Result};
use crate::types::{Installment, Loan, LoanId, LoanStatus, LoanWithInstallments};

/// what a borrower asks for
#[derive(Debug, Clone, PartialEq)]
pub struct LoanTerms {
    /// caller supplied id, generated when absent
    pub id: Option<LoanId>,
    pub customer_id: String,
    pub name: String,
    pub principal: Money,
    /// flat rate in percent
    pub interest_rate: Decimal,
    /// number of installments; kept signed so bad input can be rejected, not wrapped
    pub period: i64,
}

impl LoanTerms {
    pub fn builder() -> LoanTermsBuilder {
        LoanTermsBuilder::new()
    }

    pub fn validate(&self) -> Result<u32> {
        if self.period <= 0 {
            return Err(BillingError::invalid_input(format!(
                "period must be a positive integer, got {}",
                self.period
            )));
        }
        let period = u32::try_from(self.period).map_err(|_| {
            BillingError::invalid_input(format!("period {} is too large", self.period))
        })?;
        if !self.principal.is_positive() {
            return Err(BillingError::invalid_input(format!(
                "amount must be positive, got {}",
                self.principal
            )));
        }
        if self.interest_rate < Decimal::ZERO {
            return Err(BillingError::invalid_input(format!(
                "interest_rate must not be negative, got {}",
                self.interest_rate
            )));
        }
        if self.customer_id.trim().is_empty() {
            return Err(BillingError::invalid_input("customer_id is required"));
        }
        Ok(period)
    }
}

/// builder for loan terms
#[derive(Debug, Default)]
pub struct LoanTermsBuilder {
    id: Option<LoanId>,
    customer_id: Option<String>,
    name: Option<String>,
    principal: Option<Money>,
    interest_rate: Option<Decimal>,
    period: Option<i64>,
}

impl LoanTermsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<LoanId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    /// flat rate in percent (10 for 10%)
    pub fn interest_rate(mut self, percent: Decimal) -> Self {
        self.interest_rate = Some(percent);
        self
    }

    pub fn period(mut self, period: i64) -> Self {
        self.period = Some(period);
        self
    }

    pub fn build(self) -> Result<LoanTerms> {
        let terms = LoanTerms {
            id: self.id,
            customer_id: self
                .customer_id
                .ok_or_else(|| BillingError::invalid_input("customer_id is required"))?,
            name: self.name.unwrap_or_default(),
            principal: self
                .principal
                .ok_or_else(|| BillingError::invalid_input("amount is required"))?,
            interest_rate: self.interest_rate.unwrap_or(Decimal::ZERO),
            period: self
                .period
                .ok_or_else(|| BillingError::invalid_input("period is required"))?,
        };
        terms.validate()?;
        Ok(terms)
    }
}

/// total payable under flat interest, settled at `scale` decimal places
pub fn flat_total(principal: Money, rate: Rate, scale: u32) -> Money {
    (principal + principal.flat_interest(rate)).round_dp(scale)
}

/// split `total` into `period` installments one minor unit apart at most.
///
/// every installment starts at `total / period` truncated to `scale`; the
/// leftover minor units go one each to the latest installments, so the parts
/// always add up to `total`. a split that would leave a zero installment is
/// rejected.
pub fn split_installments(total: Money, period: u32, scale: u32) -> Result<Vec<Money>> {
    if period == 0 {
        return Err(BillingError::invalid_input("period must be a positive integer, got 0"));
    }
    let base = (total / Decimal::from(period)).truncate_dp(scale);
    if !base.is_positive() {
        return Err(BillingError::invalid_input(format!(
            "total {} cannot be split into {} installments of at least one minor unit",
            total, period
        )));
    }

    let unit = Money::from_decimal(Decimal::new(1, scale));
    let mut remainder = total - base * Decimal::from(period);
    let mut amounts = vec![base; period as usize];
    for amount in amounts.iter_mut().rev() {
        if !remainder.is_positive() {
            break;
        }
        *amount += unit;
        remainder -= unit;
    }
    Ok(amounts)
}

/// builds a loan and its weekly schedule from loan terms
#[derive(Debug, Clone)]
pub struct ScheduleGenerator {
    config: BillingConfig,
}

impl ScheduleGenerator {
    pub fn new(config: BillingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// generate the loan and its installments as of `created_at`
    pub fn generate(&self, terms: &LoanTerms, created_at: DateTime<Utc>) -> Result<LoanWithInstallments> {
        let period = terms.validate()?;
        let scale = self.config.currency_scale;

        let rate = Rate::from_percentage_decimal(terms.interest_rate);
        let total = flat_total(terms.principal, rate, scale);
        if !total.is_positive() {
            return Err(BillingError::invalid_input(format!(
                "amount {} rounds to a total payable of {}",
                terms.principal, total
            )));
        }
        let loan_id = terms.id.clone().unwrap_or_else(LoanId::generate);

        let loan = Loan {
            id: loan_id.clone(),
            customer_id: terms.customer_id.clone(),
            name: terms.name.clone(),
            period,
            amount: terms.principal,
            interest_rate: terms.interest_rate,
            total_amount: total,
            outstanding: total,
            status: LoanStatus::InProgress,
            created_at,
        };

        let interval = self.config.installment_interval();
        let mut due_date = created_at + interval;
        let installments = split_installments(total, period, scale)?
            .into_iter()
            .zip(1..=period)
            .map(|(amount, sequence)| {
                let installment = Installment {
                    id: Uuid::new_v4(),
                    loan_id: loan_id.clone(),
                    sequence,
                    date: created_at,
                    due_date,
                    payment_date: None,
                    amount,
                    created_at,
                };
                due_date += interval;
                installment
            })
            .collect();

        Ok(LoanWithInstallments { loan, installments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 15, 0).unwrap()
    }

    fn terms(principal: i64, rate: Decimal, period: i64) -> LoanTerms {
        LoanTerms {
            id: None,
            customer_id: "cust123".to_string(),
            name: "Test Loan".to_string(),
            principal: Money::from_major(principal),
            interest_rate: rate,
            period,
        }
    }

    #[test]
    fn test_reference_schedule() {
        let generator = ScheduleGenerator::new(BillingConfig::weekly_flat());
        let schedule = generator.generate(&terms(5_000_000, dec!(10), 50), created_at()).unwrap();

        assert_eq!(schedule.loan.total_amount, Money::from_major(5_500_000));
        assert_eq!(schedule.loan.outstanding, Money::from_major(5_500_000));
        assert_eq!(schedule.loan.status, LoanStatus::InProgress);
        assert_eq!(schedule.loan.period, 50);
        assert_eq!(schedule.installments.len(), 50);

        for (idx, installment) in schedule.installments.iter().enumerate() {
            assert_eq!(installment.sequence, idx as u32 + 1);
            assert_eq!(installment.amount, Money::from_major(110_000));
            assert_eq!(installment.date, created_at());
            assert_eq!(installment.due_date, created_at() + Duration::days(7 * (idx as i64 + 1)));
            assert!(!installment.is_paid());
            assert_eq!(installment.loan_id, schedule.loan.id);
        }
    }

    #[test]
    fn test_due_dates_step_by_a_week() {
        let generator = ScheduleGenerator::new(BillingConfig::weekly_flat());
        let schedule = generator.generate(&terms(1_000, dec!(0), 5), created_at()).unwrap();

        assert_eq!(schedule.installments[0].due_date, created_at() + Duration::days(7));
        for pair in schedule.installments.windows(2) {
            assert_eq!(pair[1].due_date - pair[0].due_date, Duration::days(7));
        }
    }

    #[test]
    fn test_remainder_goes_to_last_installment() {
        let amounts = split_installments(Money::from_major(100), 3, 2).unwrap();
        assert_eq!(amounts[0], Money::from_str_exact("33.33").unwrap());
        assert_eq!(amounts[1], Money::from_str_exact("33.33").unwrap());
        assert_eq!(amounts[2], Money::from_str_exact("33.34").unwrap());
    }

    #[test]
    fn test_remainder_is_spread_one_cent_at_a_time() {
        let amounts = split_installments(Money::from_major(1), 7, 2).unwrap();
        let cents: Vec<String> = amounts.iter().map(|a| a.to_string()).collect();
        assert_eq!(cents, ["0.14", "0.14", "0.14", "0.14", "0.14", "0.15", "0.15"]);
    }

    #[test]
    fn test_sub_cent_total_rejected() {
        let generator = ScheduleGenerator::new(BillingConfig::weekly_flat());
        let mut t = terms(1, dec!(0), 2);
        t.principal = Money::from_str_exact("0.004").unwrap();

        let err = generator.generate(&t, created_at()).unwrap_err();
        assert!(matches!(err, BillingError::InvalidInput { .. }));
    }

    #[test]
    fn test_installment_below_one_cent_rejected() {
        let generator = ScheduleGenerator::new(BillingConfig::weekly_flat());
        let err = generator.generate(&terms(1, dec!(0), 200), created_at()).unwrap_err();
        assert!(matches!(err, BillingError::InvalidInput { .. }));

        let schedule = generator.generate(&terms(2, dec!(0), 200), created_at()).unwrap();
        assert!(schedule.installments.iter().all(|i| i.amount == Money::from_str_exact("0.01").unwrap()));
    }

    #[test]
    fn test_non_positive_period_rejected() {
        let generator = ScheduleGenerator::new(BillingConfig::weekly_flat());
        for period in [0, -50] {
            let err = generator.generate(&terms(5_000_000, dec!(10), period), created_at()).unwrap_err();
            assert!(matches!(err, BillingError::InvalidInput { .. }));
        }
    }

    #[test]
    fn test_negative_values_rejected() {
        let generator = ScheduleGenerator::new(BillingConfig::weekly_flat());
        assert!(generator.generate(&terms(-1, dec!(10), 5), created_at()).is_err());
        assert!(generator.generate(&terms(1_000, dec!(-1), 5), created_at()).is_err());
    }

    #[test]
    fn test_caller_supplied_id_is_kept() {
        let generator = ScheduleGenerator::new(BillingConfig::weekly_flat());
        let mut t = terms(1_000, dec!(10), 2);
        t.id = Some(LoanId::from("loan123"));
        let schedule = generator.generate(&t, created_at()).unwrap();
        assert_eq!(schedule.loan.id.as_str(), "loan123");
        assert!(schedule.installments.iter().all(|i| i.loan_id.as_str() == "loan123"));
    }

    #[test]
    fn test_builder_requires_customer() {
        let err = LoanTerms::builder()
            .principal(Money::from_major(1_000))
            .period(4)
            .build()
            .unwrap_err();
        assert!(matches!(err, BillingError::InvalidInput { .. }));

        let built = LoanTerms::builder()
            .customer_id("cust-9")
            .principal(Money::from_major(1_000))
            .interest_rate(dec!(5))
            .period(4)
            .build()
            .unwrap();
        assert_eq!(built.period, 4);
        assert_eq!(built.interest_rate, dec!(5));
    }

    proptest! {
        #[test]
        fn prop_installments_sum_to_total(
            principal in 100i64..1_000_000_000,
            rate_bps in 0u32..10_000,
            period in 1i64..260,
        ) {
            let rate = Decimal::new(i64::from(rate_bps), 2);
            let generator = ScheduleGenerator::new(BillingConfig::weekly_flat());
            let schedule = generator.generate(&terms(principal, rate, period), created_at()).unwrap();

            let expected = flat_total(Money::from_major(principal), Rate::from_percentage_decimal(rate), 2);
            let sum: Money = schedule.installments.iter().map(|i| i.amount).sum();
            prop_assert_eq!(sum, expected);
            prop_assert_eq!(schedule.installments.len() as i64, period);
            prop_assert!(schedule.installments.iter().all(|i| i.amount.is_positive()));

            let smallest = schedule.installments.iter().map(|i| i.amount).min().unwrap();
            let largest = schedule.installments.iter().map(|i| i.amount).max().unwrap();
            prop_assert!(largest - smallest <= Money::from_str_exact("0.01").unwrap());
        }
    }
}
