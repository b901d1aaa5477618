//! serializable summary views over a loan and its schedule
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::delinquency;
use crate::types::{LoanId, LoanStatus, LoanWithInstallments};

/// repayment progress of one loan as of a given day
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanSummaryView {
    pub loan_id: LoanId,
    pub customer_id: String,
    pub status: LoanStatus,
    pub total_amount: Money,
    pub outstanding: Money,
    pub paid_amount: Money,
    pub installments: InstallmentProgressView,
    pub next_due: Option<NextDueView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallmentProgressView {
    pub total: usize,
    pub paid: usize,
    pub unpaid: usize,
    pub missed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NextDueView {
    pub sequence: u32,
    pub due_date: DateTime<Utc>,
    pub amount: Money,
}

impl LoanSummaryView {
    pub fn from_record(record: &LoanWithInstallments, today: NaiveDate) -> Self {
        let paid: Vec<_> = record.installments.iter().filter(|i| i.is_paid()).collect();
        let missed = delinquency::missed_installments(&record.installments, today).len();
        let next_due = record.unpaid().next().map(|i| NextDueView {
            sequence: i.sequence,
            due_date: i.due_date,
            amount: i.amount,
        });

        LoanSummaryView {
            loan_id: record.loan.id.clone(),
            customer_id: record.loan.customer_id.clone(),
            status: record.loan.status,
            total_amount: record.loan.total_amount,
            outstanding: record.loan.outstanding,
            paid_amount: paid.iter().map(|i| i.amount).sum(),
            installments: InstallmentProgressView {
                total: record.installments.len(),
                paid: paid.len(),
                unpaid: record.installments.len() - paid.len(),
                missed,
            },
            next_due,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
