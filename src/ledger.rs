use std::sync::Mutex;

use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::config::BillingConfig;
use crate::decimal::Money;
use crate::delinquency;
use crate::errors::{BillingError, ErrorKind, Result};
use crate::events::{EventStore, LedgerEvent};
use crate::schedule::{LoanTerms, ScheduleGenerator};
use crate::store::LoanStore;
use crate::types::{DelinquencyStatus, LoanId, LoanWithInstallments, Payment};

/// owns loans after creation: answers status and settles installments
pub struct LoanLedger<S, C = SafeTimeProvider> {
    store: S,
    clock: C,
    generator: ScheduleGenerator,
    events: Mutex<EventStore>,
}

impl<S: LoanStore, C: Clock> LoanLedger<S, C> {
    pub fn new(store: S, clock: C, config: BillingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            clock,
            generator: ScheduleGenerator::new(config),
            events: Mutex::new(EventStore::new()),
        })
    }

    pub fn config(&self) -> &BillingConfig {
        self.generator.config()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// create a loan and persist its schedule, stamped with the clock's now
    pub fn create_loan(&self, terms: &LoanTerms) -> Result<LoanWithInstallments> {
        let now = self.clock.now();
        let record = self.generator.generate(terms, now)?;

        self.store
            .insert(record.clone())
            .map_err(|e| log_failure("create_loan", record.loan_id(), e))?;

        info!(
            loan_id = %record.loan.id,
            customer_id = %record.loan.customer_id,
            total = %record.loan.total_amount,
            installments = record.loan.period,
            "loan created"
        );
        self.emit(LedgerEvent::LoanCreated {
            loan_id: record.loan.id.clone(),
            customer_id: record.loan.customer_id.clone(),
            total_amount: record.loan.total_amount,
            installments: record.loan.period,
            timestamp: now,
        });

        Ok(record)
    }

    /// the loan with its installments in sequence order
    pub fn get_loan(&self, loan_id: &LoanId) -> Result<LoanWithInstallments> {
        let mut record = self.load_existing(loan_id)?;
        record.installments.sort_by_key(|i| i.sequence);
        Ok(record)
    }

    /// delinquency as of the clock's current day
    pub fn status(&self, loan_id: &LoanId) -> Result<DelinquencyStatus> {
        let record = self.load_existing(loan_id)?;
        let today = self.clock.today();

        let delinquent_at = delinquency::delinquent_since(
            &record.installments,
            today,
            self.config().delinquency_threshold,
        );
        if let Some(at) = delinquent_at {
            debug!(loan_id = %loan_id, %today, delinquent_at = %at, "loan is delinquent");
        }

        Ok(DelinquencyStatus {
            loan_id: loan_id.clone(),
            is_delinquent: delinquent_at.is_some(),
            delinquent_at,
        })
    }

    /// settle the oldest eligible unpaid installment with an exact-amount payment.
    ///
    /// an installment is eligible when its due day is on or before the payment day.
    /// selection, the installment update and the loan balance update run inside a
    /// single store transaction.
    pub fn apply_payment(
        &self,
        loan_id: &LoanId,
        amount: Money,
        payment_date: DateTime<Utc>,
    ) -> Result<Payment> {
        if amount.is_negative() {
            return Err(BillingError::invalid_input(format!(
                "payment amount less than 0: {}",
                amount
            )));
        }

        let settled = self
            .store
            .update(loan_id, |record| {
                let payment_day = payment_date.date_naive();
                let target = record
                    .installments
                    .iter_mut()
                    .filter(|i| !i.is_paid() && i.due_date.date_naive() <= payment_day)
                    .min_by_key(|i| (i.due_date, i.sequence))
                    .ok_or(BillingError::NoPendingBill)?;

                if target.amount != amount {
                    return Err(BillingError::InsufficientAmount {
                        expected: target.amount,
                        provided: amount,
                    });
                }

                target.payment_date = Some(payment_date);
                let sequence = target.sequence;
                let installment_amount = target.amount;

                record.loan.record_settlement(installment_amount);
                Ok((sequence, record.loan.outstanding, record.loan.is_completed()))
            })
            .map_err(|e| log_failure("apply_payment", loan_id, e))?;

        let (sequence, outstanding, completed) = settled;
        info!(loan_id = %loan_id, sequence, %amount, %outstanding, "payment applied");
        self.emit(LedgerEvent::PaymentApplied {
            loan_id: loan_id.clone(),
            sequence,
            amount,
            payment_date,
            outstanding,
        });
        if completed {
            info!(loan_id = %loan_id, "loan completed");
            self.emit(LedgerEvent::LoanCompleted {
                loan_id: loan_id.clone(),
                final_payment: amount,
                payment_date,
            });
        }

        Ok(Payment {
            loan_id: loan_id.clone(),
            amount,
            date: payment_date,
        })
    }

    /// drain recorded events
    pub fn take_events(&self) -> Vec<LedgerEvent> {
        match self.events.lock() {
            Ok(mut events) => events.take_events(),
            Err(poisoned) => poisoned.into_inner().take_events(),
        }
    }

    fn load_existing(&self, loan_id: &LoanId) -> Result<LoanWithInstallments> {
        self.store
            .load(loan_id)
            .map_err(|e| log_failure("load", loan_id, e))?
            .ok_or_else(|| BillingError::LoanNotFound {
                loan_id: loan_id.clone(),
            })
    }

    fn emit(&self, event: LedgerEvent) {
        match self.events.lock() {
            Ok(mut events) => events.emit(event),
            Err(poisoned) => poisoned.into_inner().emit(event),
        }
    }
}

fn log_failure(operation: &'static str, loan_id: &LoanId, err: BillingError) -> BillingError {
    match err.kind() {
        ErrorKind::Infrastructure => {
            error!(operation, loan_id = %loan_id, error = %err, "ledger storage failure");
        }
        _ => {
            debug!(operation, loan_id = %loan_id, error = %err, "ledger rejected request");
        }
    }
    err
}
