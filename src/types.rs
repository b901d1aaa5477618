use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a loan
///
/// callers may bring their own id; otherwise a v4 uuid is generated
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(String);

impl LoanId {
    pub fn generate() -> Self {
        LoanId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LoanId {
    fn from(s: &str) -> Self {
        LoanId(s.to_string())
    }
}

impl From<String> for LoanId {
    fn from(s: String) -> Self {
        LoanId(s)
    }
}

/// unique identifier for an installment
pub type InstallmentId = Uuid;

/// loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// at least one installment still unpaid
    InProgress,
    /// outstanding reached zero
    Completed,
}

/// a borrowing with flat interest and a fixed number of weekly installments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub customer_id: String,
    pub name: String,
    pub period: u32,
    /// principal
    pub amount: Money,
    /// flat rate in percent, as requested
    pub interest_rate: Decimal,
    pub total_amount: Money,
    pub outstanding: Money,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    pub fn is_completed(&self) -> bool {
        self.status == LoanStatus::Completed
    }

    /// apply a settled installment amount to the loan balance
    pub(crate) fn record_settlement(&mut self, amount: Money) {
        self.outstanding -= amount;
        self.status = if self.outstanding <= Money::ZERO {
            LoanStatus::Completed
        } else {
            LoanStatus::InProgress
        };
    }
}

/// one scheduled repayment (a bill)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    pub loan_id: LoanId,
    pub sequence: u32,
    /// issue date, equal to the loan creation timestamp
    pub date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

impl Installment {
    pub fn is_paid(&self) -> bool {
        self.payment_date.is_some()
    }
}

/// a loan together with its full schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanWithInstallments {
    pub loan: Loan,
    #[serde(rename = "bills")]
    pub installments: Vec<Installment>,
}

impl LoanWithInstallments {
    pub fn loan_id(&self) -> &LoanId {
        &self.loan.id
    }

    /// unpaid installments ordered by due date
    pub fn unpaid(&self) -> impl Iterator<Item = &Installment> {
        let mut unpaid: Vec<&Installment> = self.installments.iter().filter(|i| !i.is_paid()).collect();
        unpaid.sort_by_key(|i| (i.due_date, i.sequence));
        unpaid.into_iter()
    }
}

/// record of money applied against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub loan_id: LoanId,
    pub amount: Money,
    pub date: DateTime<Utc>,
}

/// delinquency answer for a loan at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelinquencyStatus {
    pub loan_id: LoanId,
    pub is_delinquent: bool,
    /// due date of the second missed installment
    pub delinquent_at: Option<DateTime<Utc>>,
}
