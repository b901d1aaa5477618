pub mod clock;
pub mod config;
pub mod decimal;
pub mod delinquency;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod requests;
pub mod schedule;
pub mod serialization;
pub mod store;
pub mod types;

// re-export key types
pub use clock::{system_clock, Clock, FixedClock};
pub use config::BillingConfig;
pub use decimal::{Money, Rate};
pub use errors::{BillingError, ErrorKind, Result};
pub use events::{EventStore, LedgerEvent};
pub use ledger::LoanLedger;
pub use requests::{parse_loan_id, CreateLoanRequest, MakePaymentRequest};
pub use schedule::{LoanTerms, LoanTermsBuilder, ScheduleGenerator};
pub use serialization::LoanSummaryView;
pub use store::{InMemoryLoanStore, LoanStore};
pub use types::{
    DelinquencyStatus, Installment, InstallmentId, Loan, LoanId, LoanStatus, LoanWithInstallments,
    Payment,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
