/// json boundary - decode requests the way a transport would and map errors to status codes
use installment_billing_rs::{
    parse_loan_id, system_clock, BillingConfig, BillingError, CreateLoanRequest, InMemoryLoanStore,
    LoanLedger, LoanSummaryView, MakePaymentRequest,
};

fn status_of<T>(result: &Result<T, BillingError>, ok: u16) -> u16 {
    match result {
        Ok(_) => ok,
        Err(err) => err.status_code(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ledger = LoanLedger::new(InMemoryLoanStore::new(), system_clock(), BillingConfig::weekly_flat())?;

    let body = r#"{"id":"loan123","customer_id":"cust123","name":"Test Loan","period":50,"amount":5000000,"interest_rate":10}"#;
    let created = CreateLoanRequest::from_json(body)
        .and_then(CreateLoanRequest::into_terms)
        .and_then(|terms| ledger.create_loan(&terms));
    println!("POST /bills -> {}", status_of(&created, 201));
    let loan = created?;

    let bad = CreateLoanRequest::from_json(r#"{"customer_id":"cust123","period":-50,"amount":5000000}"#)
        .and_then(CreateLoanRequest::into_terms);
    println!("POST /bills (period -50) -> {}", status_of(&bad, 201));

    let id = parse_loan_id("loan123")?;
    let due = loan.installments[0].due_date;
    for amount in [55_000, 120_000, 110_000] {
        let body = format!(r#"{{"payment_amount":{},"payment_date":"{}"}}"#, amount, due.to_rfc3339());
        let paid = MakePaymentRequest::from_json(&body)
            .and_then(|req| ledger.apply_payment(&id, req.payment_amount, req.payment_date));
        match &paid {
            Ok(payment) => println!("POST /bills/{}/payments {} -> 200 {:?}", id, amount, payment),
            Err(err) => println!("POST /bills/{}/payments {} -> {} {}", id, amount, err.status_code(), err.public_message()),
        }
    }

    let missing = parse_loan_id("0");
    println!("GET /bills/0/status -> {}", status_of(&missing, 200));

    let record = ledger.get_loan(&id)?;
    let summary = LoanSummaryView::from_record(&record, due.date_naive());
    println!("{}", summary.to_json_pretty()?);

    Ok(())
}
