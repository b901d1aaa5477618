//! request shapes a transport decodes before calling the ledger
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::schedule::LoanTerms;
use crate::types::LoanId;

/// body of a loan creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CreateLoanRequest {
    pub id: Option<String>,
    pub customer_id: String,
    pub name: String,
    pub period: i64,
    pub amount: Money,
    /// flat rate in percent
    pub interest_rate: Decimal,
}

impl CreateLoanRequest {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| BillingError::invalid_input(e.to_string()))
    }

    /// check the fields a transport must reject before any domain work
    pub fn validate(&self) -> Result<()> {
        let customer_id = self.customer_id.trim();
        if customer_id.is_empty() || customer_id == "0" {
            return Err(BillingError::invalid_input("customer_id is required"));
        }
        Ok(())
    }

    pub fn into_terms(self) -> Result<LoanTerms> {
        self.validate()?;
        let id = self
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(LoanId::from);
        let terms = LoanTerms {
            id,
            customer_id: self.customer_id.trim().to_string(),
            name: self.name,
            principal: self.amount,
            interest_rate: self.interest_rate,
            period: self.period,
        };
        terms.validate()?;
        Ok(terms)
    }
}

/// body of a payment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakePaymentRequest {
    pub payment_amount: Money,
    pub payment_date: DateTime<Utc>,
}

impl MakePaymentRequest {
    pub fn from_json(raw: &str) -> Result<Self> {
        let request: MakePaymentRequest =
            serde_json::from_str(raw).map_err(|e| BillingError::invalid_input(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.payment_amount.is_negative() {
            return Err(BillingError::invalid_input("payment amount less than 0"));
        }
        Ok(())
    }
}

/// loan id from a path segment; empty and "0" are treated as missing
pub fn parse_loan_id(raw: &str) -> Result<LoanId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "0" {
        return Err(BillingError::invalid_input("loan_id is required"));
    }
    Ok(LoanId::from(trimmed))
}
