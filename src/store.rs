use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::errors::{BillingError, Result};
use crate::types::{LoanId, LoanWithInstallments};

/// persistence boundary for loans and their installments.
///
/// `update` is the transaction: the closure works on a copy of the stored record
/// and the copy replaces the original only when the closure returns `Ok`.
/// implementations must serialize concurrent updates of the same loan.
pub trait LoanStore {
    /// insert a new loan with its schedule; fails on a duplicate id
    fn insert(&self, record: LoanWithInstallments) -> Result<()>;

    fn load(&self, loan_id: &LoanId) -> Result<Option<LoanWithInstallments>>;

    fn update<T, F>(&self, loan_id: &LoanId, apply: F) -> Result<T>
    where
        F: FnOnce(&mut LoanWithInstallments) -> Result<T>;
}

impl<S: LoanStore> LoanStore for Arc<S> {
    fn insert(&self, record: LoanWithInstallments) -> Result<()> {
        (**self).insert(record)
    }

    fn load(&self, loan_id: &LoanId) -> Result<Option<LoanWithInstallments>> {
        (**self).load(loan_id)
    }

    fn update<T, F>(&self, loan_id: &LoanId, apply: F) -> Result<T>
    where
        F: FnOnce(&mut LoanWithInstallments) -> Result<T>,
    {
        (**self).update(loan_id, apply)
    }
}

type Slot = Arc<Mutex<LoanWithInstallments>>;

/// in-process store; one mutex per loan, an rwlock around the index
#[derive(Debug, Default)]
pub struct InMemoryLoanStore {
    loans: RwLock<HashMap<LoanId, Slot>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        let loans = self
            .loans
            .read()
            .map_err(|_| BillingError::storage("loan index lock poisoned"))?;
        Ok(loans.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn slot(&self, loan_id: &LoanId) -> Result<Option<Slot>> {
        let loans = self
            .loans
            .read()
            .map_err(|_| BillingError::storage("loan index lock poisoned"))?;
        Ok(loans.get(loan_id).cloned())
    }
}

impl LoanStore for InMemoryLoanStore {
    fn insert(&self, record: LoanWithInstallments) -> Result<()> {
        let mut loans = self
            .loans
            .write()
            .map_err(|_| BillingError::storage("loan index lock poisoned"))?;
        let loan_id = record.loan.id.clone();
        if loans.contains_key(&loan_id) {
            return Err(BillingError::DuplicateLoan { loan_id });
        }
        loans.insert(loan_id, Arc::new(Mutex::new(record)));
        Ok(())
    }

    fn load(&self, loan_id: &LoanId) -> Result<Option<LoanWithInstallments>> {
        match self.slot(loan_id)? {
            Some(slot) => {
                let record = slot
                    .lock()
                    .map_err(|_| BillingError::storage(format!("loan {} lock poisoned", loan_id)))?;
                Ok(Some((*record).clone()))
            }
            None => Ok(None),
        }
    }

    fn update<T, F>(&self, loan_id: &LoanId, apply: F) -> Result<T>
    where
        F: FnOnce(&mut LoanWithInstallments) -> Result<T>,
    {
        let slot = self.slot(loan_id)?.ok_or_else(|| BillingError::LoanNotFound {
            loan_id: loan_id.clone(),
        })?;
        let mut stored = slot
            .lock()
            .map_err(|_| BillingError::storage(format!("loan {} lock poisoned", loan_id)))?;

        let mut working = (*stored).clone();
        let outcome = apply(&mut working)?;
        *stored = working;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BillingConfig;
    use crate::decimal::Money;
    use crate::schedule::{LoanTerms, ScheduleGenerator};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn record(id: &str) -> LoanWithInstallments {
        let terms = LoanTerms::builder()
            .id(id)
            .customer_id("cust-1")
            .principal(Money::from_major(1_000))
            .interest_rate(dec!(10))
            .period(2)
            .build()
            .unwrap();
        ScheduleGenerator::new(BillingConfig::weekly_flat())
            .generate(&terms, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .unwrap()
    }

    #[test]
    fn test_insert_and_load() {
        let store = InMemoryLoanStore::new();
        store.insert(record("loan-1")).unwrap();

        let loaded = store.load(&LoanId::from("loan-1")).unwrap().unwrap();
        assert_eq!(loaded.installments.len(), 2);
        assert!(store.load(&LoanId::from("loan-2")).unwrap().is_none());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let store = InMemoryLoanStore::new();
        store.insert(record("loan-1")).unwrap();
        let err = store.insert(record("loan-1")).unwrap_err();
        assert!(matches!(err, BillingError::DuplicateLoan { .. }));
    }

    #[test]
    fn test_failed_update_is_rolled_back() {
        let store = InMemoryLoanStore::new();
        store.insert(record("loan-1")).unwrap();
        let id = LoanId::from("loan-1");

        let result: Result<()> = store.update(&id, |r| {
            r.installments[0].payment_date = Some(r.loan.created_at);
            r.loan.outstanding = Money::ZERO;
            Err(BillingError::NoPendingBill)
        });
        assert_eq!(result, Err(BillingError::NoPendingBill));

        let loaded = store.load(&id).unwrap().unwrap();
        assert!(loaded.installments[0].payment_date.is_none());
        assert_eq!(loaded.loan.outstanding, Money::from_major(1_100));
    }

    #[test]
    fn test_update_missing_loan() {
        let store = InMemoryLoanStore::new();
        let err = store.update(&LoanId::from("nope"), |_| Ok(())).unwrap_err();
        assert!(matches!(err, BillingError::LoanNotFound { .. }));
    }
}
