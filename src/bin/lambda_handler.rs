//! AWS Lambda handler for batch quotation runs
//!
//! Accepts the full input tables as JSON and returns the quotations, the
//! failure report, and the updated ledger rows. The caller owns object
//! storage on both sides; this function is pure computation.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use quotation_system::ledger::LedgerRow;
use quotation_system::rates::RateRow;
use quotation_system::{
    BatchRunner, HistoricalLedger, InsuredRecord, InsuredRoster, IssuanceTable, PolicyParameters,
    Quotation, RateTable,
};
use serde::{Deserialize, Serialize};

/// One rate-table entry in the request payload
#[derive(Debug, Deserialize)]
struct RateEntry {
    age: i32,
    death: f64,
    accidental_death: f64,
    disability: f64,
}

/// One issuance record in the request payload
#[derive(Debug, Deserialize)]
struct IssuanceEntry {
    policy_number: String,
    loss_ratio: f64,
}

/// Input tables for one quotation run
#[derive(Debug, Deserialize)]
struct QuoteRequest {
    parameters: Vec<PolicyParameters>,
    roster: Vec<InsuredRecord>,
    rates: Vec<RateEntry>,

    /// Needed only when the run contains renewals
    #[serde(default)]
    issuances: Vec<IssuanceEntry>,

    /// Existing ledger rows; seeds the ticket sequence
    #[serde(default)]
    ledger: Vec<LedgerRow>,
}

/// One skipped policyholder in the response
#[derive(Debug, Serialize)]
struct FailureReport {
    contractor: String,
    error: String,
}

/// Output of one quotation run
#[derive(Debug, Serialize)]
struct QuoteResponse {
    quotations: Vec<Quotation>,
    failures: Vec<FailureReport>,
    ledger: Vec<LedgerRow>,
    next_ticket: u64,
}

async fn handler(event: LambdaEvent<QuoteRequest>) -> Result<QuoteResponse, Error> {
    let request = event.payload;

    let rates = RateTable::from_rows(request.rates.iter().map(|r| {
        (
            r.age,
            RateRow {
                death: r.death,
                accidental_death: r.accidental_death,
                disability: r.disability,
            },
        )
    }));
    let issuances = IssuanceTable::from_records(
        request
            .issuances
            .into_iter()
            .map(|e| (e.policy_number, e.loss_ratio)),
    );
    let roster = InsuredRoster::new(request.roster);
    let history = HistoricalLedger::new(request.ledger);

    let runner = BatchRunner::new(rates, issuances);
    let outcome = runner.run_parallel(&request.parameters, &roster, &history);

    Ok(QuoteResponse {
        quotations: outcome.quotes.iter().map(|q| q.quotation.clone()).collect(),
        failures: outcome
            .failures
            .iter()
            .map(|f| FailureReport {
                contractor: f.contractor.clone(),
                error: f.error.to_string(),
            })
            .collect(),
        next_ticket: outcome.ledger.next_ticket(),
        ledger: outcome.ledger.rows().to_vec(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    lambda_runtime::run(service_fn(handler)).await
}
