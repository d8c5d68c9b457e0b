//! Batch orchestration across a full parameter table
//!
//! Pre-loads the reference tables once, then quotes every policyholder in
//! table order, isolating per-policyholder failures and folding the results
//! into the historical ledger.

use crate::ledger::HistoricalLedger;
use crate::policy::{InsuredRoster, PolicyParameters};
use crate::quote::{assemble, AssemblyError, Quotation, RateBreakdown};
use crate::rates::{IssuanceTable, RateTable};
use log::{info, warn};
use rayon::prelude::*;

/// One successfully quoted policyholder with its audit trail
#[derive(Debug, Clone)]
pub struct AssembledQuote {
    pub quotation: Quotation,
    pub breakdown: RateBreakdown,
}

/// One skipped policyholder and the reason
#[derive(Debug)]
pub struct QuoteFailure {
    pub contractor: String,
    pub error: AssemblyError,
}

/// Result of one batch run
#[derive(Debug)]
pub struct BatchOutcome {
    /// Quotations in processing (table) order
    pub quotes: Vec<AssembledQuote>,

    /// Input ledger plus this run's rows
    pub ledger: HistoricalLedger,

    /// Policyholders skipped this run; they consumed no ticket
    pub failures: Vec<QuoteFailure>,
}

impl BatchOutcome {
    /// The quotation for one policyholder, if it was produced this run
    pub fn quotation_for(&self, contractor: &str) -> Option<&Quotation> {
        self.quotes
            .iter()
            .map(|q| &q.quotation)
            .find(|q| q.contractor == contractor)
    }
}

/// Batch runner holding the run-invariant reference tables
#[derive(Debug, Clone)]
pub struct BatchRunner {
    rates: RateTable,
    issuance: IssuanceTable,
}

impl BatchRunner {
    pub fn new(rates: RateTable, issuance: IssuanceTable) -> Self {
        Self { rates, issuance }
    }

    /// Quote every policyholder in the parameter table, in table order
    ///
    /// Tickets start at `ledger.next_ticket()` and advance once per
    /// successful assembly; a failed policyholder consumes no ticket and is
    /// recorded in the outcome's failure report.
    pub fn run(
        &self,
        params: &[PolicyParameters],
        roster: &InsuredRoster,
        ledger: &HistoricalLedger,
    ) -> BatchOutcome {
        let mut ticket = ledger.next_ticket();
        let mut quotes = Vec::with_capacity(params.len());
        let mut failures = Vec::new();

        for p in params {
            match assemble(p, ticket, roster, &self.issuance, &self.rates) {
                Ok((quotation, breakdown)) => {
                    ticket += 1;
                    quotes.push(AssembledQuote { quotation, breakdown });
                }
                Err(error) => {
                    warn!("Skipping {}: {}", p.contractor, error);
                    failures.push(QuoteFailure {
                        contractor: p.contractor.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            "Batch complete: {} quoted, {} skipped",
            quotes.len(),
            failures.len()
        );

        self.fold_outcome(quotes, failures, ledger)
    }

    /// Parallel variant of [`run`](Self::run)
    ///
    /// Policyholders carry no cross dependencies, so assembly fans out
    /// across threads; tickets are then assigned serially in table order,
    /// which keeps the outcome byte-identical to the serial run.
    pub fn run_parallel(
        &self,
        params: &[PolicyParameters],
        roster: &InsuredRoster,
        ledger: &HistoricalLedger,
    ) -> BatchOutcome {
        let results: Vec<_> = params
            .par_iter()
            .map(|p| assemble(p, 0, roster, &self.issuance, &self.rates))
            .collect();

        let mut ticket = ledger.next_ticket();
        let mut quotes = Vec::with_capacity(params.len());
        let mut failures = Vec::new();

        for (p, result) in params.iter().zip(results) {
            match result {
                Ok((mut quotation, breakdown)) => {
                    quotation.ticket = ticket;
                    ticket += 1;
                    quotes.push(AssembledQuote { quotation, breakdown });
                }
                Err(error) => {
                    warn!("Skipping {}: {}", p.contractor, error);
                    failures.push(QuoteFailure {
                        contractor: p.contractor.clone(),
                        error,
                    });
                }
            }
        }

        self.fold_outcome(quotes, failures, ledger)
    }

    fn fold_outcome(
        &self,
        quotes: Vec<AssembledQuote>,
        failures: Vec<QuoteFailure>,
        ledger: &HistoricalLedger,
    ) -> BatchOutcome {
        let mut updated = ledger.clone();
        updated.append_run(quotes.iter().map(|q| &q.quotation));

        BatchOutcome {
            quotes,
            ledger: updated,
            failures,
        }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn issuance(&self) -> &IssuanceTable {
        &self.issuance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Coverage, InsuredRecord};
    use crate::quote::{Event, Premium};
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn params(contractor: &str, renewal: bool, policy_number: &str) -> PolicyParameters {
        PolicyParameters {
            contractor: contractor.into(),
            coverage: Coverage::F,
            insured_sum: 100_000.0,
            administration: "Propia".into(),
            agent: "Juan Perez".into(),
            commission: 0.12,
            payment_frequency: "mensual".into(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            renewal,
            policy_number: policy_number.into(),
            office: "Centro".into(),
        }
    }

    fn roster_for(contractors: &[&str]) -> InsuredRoster {
        InsuredRoster::new(
            contractors
                .iter()
                .map(|c| InsuredRecord {
                    contractor: (*c).into(),
                    birth_date: "1983-06-15".into(),
                })
                .collect(),
        )
    }

    fn runner() -> BatchRunner {
        BatchRunner::new(
            RateTable::sample(),
            IssuanceTable::from_records(vec![
                ("POL-OK".to_string(), 0.30),
                ("POL-HOT".to_string(), 0.80),
            ]),
        )
    }

    #[test]
    fn test_end_to_end_single_policyholder() {
        let outcome = runner().run(
            &[params("Acme", false, "POL-001")],
            &roster_for(&["Acme"]),
            &HistoricalLedger::default(),
        );

        let quote = outcome.quotation_for("Acme").unwrap();
        assert_eq!(quote.ticket, 1);
        assert_abs_diff_eq!(quote.premium.amount().unwrap(), 93.72, epsilon = 1e-9);
        assert_eq!(quote.event, Event::Na);
        assert_eq!(outcome.ledger.len(), 1);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_tickets_skip_failures_and_stay_contiguous() {
        // Beta is a renewal with no issuance record; Gamma has no roster
        let table = vec![
            params("Alfa", false, "POL-001"),
            params("Beta", true, "POL-MISSING"),
            params("Gamma", false, "POL-003"),
            params("Delta", true, "POL-OK"),
        ];
        let roster = roster_for(&["Alfa", "Beta", "Delta"]);

        let outcome = runner().run(&table, &roster, &HistoricalLedger::default());

        assert_eq!(outcome.quotes.len(), 2);
        assert_eq!(outcome.failures.len(), 2);

        let tickets: Vec<u64> = outcome.quotes.iter().map(|q| q.quotation.ticket).collect();
        assert_eq!(tickets, vec![1, 2]);
        assert_eq!(outcome.quotation_for("Alfa").unwrap().ticket, 1);
        assert_eq!(outcome.quotation_for("Delta").unwrap().ticket, 2);

        let failed: Vec<&str> = outcome.failures.iter().map(|f| f.contractor.as_str()).collect();
        assert_eq!(failed, vec!["Beta", "Gamma"]);
    }

    #[test]
    fn test_tickets_seed_from_existing_ledger() {
        let bootstrap = runner().run(
            &[params("Acme", false, "POL-001")],
            &roster_for(&["Acme"]),
            &HistoricalLedger::default(),
        );
        let seeded = bootstrap.ledger;
        assert_eq!(seeded.next_ticket(), 2);

        let outcome = runner().run(
            &[params("Globex", false, "POL-002")],
            &roster_for(&["Globex"]),
            &seeded,
        );

        assert_eq!(outcome.quotation_for("Globex").unwrap().ticket, 2);
        assert_eq!(outcome.ledger.len(), 2);
        assert_eq!(outcome.ledger.next_ticket(), 3);
    }

    #[test]
    fn test_ledger_rows_carry_tipo_classification() {
        let table = vec![
            params("Alfa", false, "POL-001"),
            params("Delta", true, "POL-OK"),
        ];
        let outcome = runner().run(&table, &roster_for(&["Alfa", "Delta"]), &HistoricalLedger::default());

        let rows = outcome.ledger.rows();
        assert_eq!(rows[0].kind, "nuevo");
        assert_eq!(rows[1].kind, "renovación");
    }

    #[test]
    fn test_gated_renewal_lands_in_ledger_as_referral() {
        let outcome = runner().run(
            &[params("Hot", true, "POL-HOT")],
            &roster_for(&["Hot"]),
            &HistoricalLedger::default(),
        );

        let quote = outcome.quotation_for("Hot").unwrap();
        assert_eq!(quote.premium, Premium::Referral);
        assert_eq!(outcome.ledger.rows()[0].event, "out of policy");
        // A gated quotation still consumes its ticket
        assert_eq!(quote.ticket, 1);
    }

    #[test]
    fn test_parallel_run_matches_serial() {
        let table = vec![
            params("Alfa", false, "POL-001"),
            params("Beta", true, "POL-MISSING"),
            params("Gamma", false, "POL-003"),
            params("Delta", true, "POL-OK"),
            params("Hot", true, "POL-HOT"),
        ];
        let roster = roster_for(&["Alfa", "Beta", "Delta", "Hot"]);
        let runner = runner();

        let serial = runner.run(&table, &roster, &HistoricalLedger::default());
        let parallel = runner.run_parallel(&table, &roster, &HistoricalLedger::default());

        assert_eq!(serial.quotes.len(), parallel.quotes.len());
        assert_eq!(serial.failures.len(), parallel.failures.len());

        for (s, p) in serial.quotes.iter().zip(&parallel.quotes) {
            assert_eq!(s.quotation.contractor, p.quotation.contractor);
            assert_eq!(s.quotation.ticket, p.quotation.ticket);
            assert_eq!(s.quotation.premium, p.quotation.premium);
            assert_eq!(s.quotation.event, p.quotation.event);
        }

        for (s, p) in serial.ledger.rows().iter().zip(parallel.ledger.rows()) {
            assert_eq!(s.ticket, p.ticket);
            assert_eq!(s.contractor, p.contractor);
            assert_eq!(s.premium, p.premium);
        }
    }
}
