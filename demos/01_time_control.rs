/// time control - watch a loan slip into delinquency and recover
use installment_billing_rs::{
    BillingConfig, InMemoryLoanStore, LoanLedger, LoanTerms, Money, SafeTimeProvider, TimeSource,
};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let ledger = LoanLedger::new(InMemoryLoanStore::new(), &time, BillingConfig::weekly_flat())?;
    let terms = LoanTerms::builder()
        .customer_id("cust-42")
        .principal(Money::from_major(1_000_000))
        .interest_rate(dec!(10))
        .period(10)
        .build()?;
    let loan = ledger.create_loan(&terms)?;
    let id = loan.loan.id.clone();
    println!("loan {} created on {}", id, time.now().format("%Y-%m-%d"));

    for week in 1..=3 {
        controller.advance(Duration::weeks(1));
        let status = ledger.status(&id)?;
        println!(
            "week {}: {} delinquent={} since={:?}",
            week,
            time.now().format("%Y-%m-%d"),
            status.is_delinquent,
            status.delinquent_at.map(|d| d.format("%Y-%m-%d").to_string()),
        );
    }

    // catch up one bill at a time
    while ledger.status(&id)?.is_delinquent {
        let record = ledger.get_loan(&id)?;
        let Some(next) = record.unpaid().next() else { break };
        ledger.apply_payment(&id, next.amount, time.now())?;
        println!("paid installment #{} ({})", next.sequence, next.amount);
    }

    let record = ledger.get_loan(&id)?;
    println!("\noutstanding: {}", record.loan.outstanding);
    for event in ledger.take_events() {
        println!("event: {:?}", event);
    }

    Ok(())
}
