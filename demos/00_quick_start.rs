/// quick start - create a loan, pay the first bill
use installment_billing_rs::{
    system_clock, BillingConfig, InMemoryLoanStore, LoanLedger, LoanTerms, Money,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ledger = LoanLedger::new(InMemoryLoanStore::new(), system_clock(), BillingConfig::weekly_flat())?;

    // 5,000,000 at 10% flat over 50 weeks
    let terms = LoanTerms::builder()
        .customer_id("cust123")
        .name("Working capital")
        .principal(Money::from_major(5_000_000))
        .interest_rate(dec!(10))
        .period(50)
        .build()?;
    let loan = ledger.create_loan(&terms)?;

    let first = &loan.installments[0];
    ledger.apply_payment(&loan.loan.id, first.amount, first.due_date)?;

    println!("{}", serde_json::to_string_pretty(&ledger.get_loan(&loan.loan.id)?.loan)?);

    Ok(())
}
