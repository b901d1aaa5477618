use thiserror::Error;

use crate::decimal::Money;
use crate::types::LoanId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    #[error("loan_id {loan_id} not found")]
    LoanNotFound {
        loan_id: LoanId,
    },

    #[error("loan_id {loan_id} already exists")]
    DuplicateLoan {
        loan_id: LoanId,
    },

    #[error("no pending bills for specified payment_date")]
    NoPendingBill,

    #[error("insufficient payment amount: expected {expected}, provided {provided}")]
    InsufficientAmount {
        expected: Money,
        provided: Money,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("storage failure: {message}")]
    Storage {
        message: String,
    },
}

/// coarse classification used at the request boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// malformed or out-of-range request fields
    InvalidInput,
    /// referenced loan does not exist
    NotFound,
    /// business rule rejected the operation
    DomainRuleViolation,
    /// persistence or setup failure
    Infrastructure,
}

impl BillingError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        BillingError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        BillingError::Storage {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BillingError::InvalidInput { .. } | BillingError::DuplicateLoan { .. } => {
                ErrorKind::InvalidInput
            }
            BillingError::LoanNotFound { .. } => ErrorKind::NotFound,
            BillingError::NoPendingBill | BillingError::InsufficientAmount { .. } => {
                ErrorKind::DomainRuleViolation
            }
            BillingError::InvalidConfiguration { .. } | BillingError::Storage { .. } => {
                ErrorKind::Infrastructure
            }
        }
    }

    /// http status a transport should answer with.
    ///
    /// a missing loan is reported as 400, not 404; existing clients assert on it.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidInput | ErrorKind::NotFound | ErrorKind::DomainRuleViolation => 400,
            ErrorKind::Infrastructure => 500,
        }
    }

    /// message safe to hand back to a caller; infrastructure detail stays in the logs
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Infrastructure => "Internal Server Error".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;
