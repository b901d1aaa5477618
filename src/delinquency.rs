use chrono::{DateTime, NaiveDate, Utc};

use crate::types::Installment;

/// missed = unpaid and due on a day strictly before `today`
pub fn is_missed(installment: &Installment, today: NaiveDate) -> bool {
    !installment.is_paid() && installment.due_date.date_naive() < today
}

/// missed installments ordered by due date
pub fn missed_installments(installments: &[Installment], today: NaiveDate) -> Vec<&Installment> {
    let mut missed: Vec<&Installment> = installments
        .iter()
        .filter(|i| is_missed(i, today))
        .collect();
    missed.sort_by_key(|i| (i.due_date, i.sequence));
    missed
}

/// due date at which the loan became delinquent, if it has.
///
/// with a threshold of 2 this is the due date of the second missed installment.
pub fn delinquent_since(
    installments: &[Installment],
    today: NaiveDate,
    threshold: usize,
) -> Option<DateTime<Utc>> {
    if threshold == 0 {
        return None;
    }
    missed_installments(installments, today)
        .get(threshold - 1)
        .map(|i| i.due_date)
}
