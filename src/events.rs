use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::LoanId;

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    LoanCreated {
        loan_id: LoanId,
        customer_id: String,
        total_amount: Money,
        installments: u32,
        timestamp: DateTime<Utc>,
    },
    PaymentApplied {
        loan_id: LoanId,
        sequence: u32,
        amount: Money,
        payment_date: DateTime<Utc>,
        outstanding: Money,
    },
    LoanCompleted {
        loan_id: LoanId,
        final_payment: Money,
        payment_date: DateTime<Utc>,
    },
}

impl LedgerEvent {
    pub fn loan_id(&self) -> &LoanId {
        match self {
            LedgerEvent::LoanCreated { loan_id, .. }
            | LedgerEvent::PaymentApplied { loan_id, .. }
            | LedgerEvent::LoanCompleted { loan_id, .. } => loan_id,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<LedgerEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }
}
