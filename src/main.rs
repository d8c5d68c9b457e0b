//! Quotation System CLI
//!
//! Demo run over an in-memory portfolio: quotes a handful of policyholders
//! against the sample rate table and writes the updated ledger plus one
//! memoria de cálculo per contractor.

use chrono::NaiveDate;
use quotation_system::policy::Coverage;
use quotation_system::{
    BatchRunner, HistoricalLedger, InsuredRecord, InsuredRoster, IssuanceTable, PolicyParameters,
    RateTable,
};
use std::fs::File;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid demo date")
}

fn demo_parameters() -> Vec<PolicyParameters> {
    vec![
        PolicyParameters {
            contractor: "Acme Industrial".into(),
            coverage: Coverage::F,
            insured_sum: 100_000.0,
            administration: "Propia".into(),
            agent: "Juan Perez".into(),
            commission: 0.12,
            payment_frequency: "Mensual".into(),
            start: date(2024, 1, 1),
            end: date(2025, 1, 1),
            renewal: false,
            policy_number: "POL-1001".into(),
            office: "Centro".into(),
        },
        PolicyParameters {
            contractor: "Globex Comercial".into(),
            coverage: Coverage::Fmabpai,
            insured_sum: 250_000.0,
            administration: "Externa".into(),
            agent: "Ana Ruiz".into(),
            commission: 0.20,
            payment_frequency: "Anual".into(),
            start: date(2024, 3, 15),
            end: date(2025, 3, 15),
            renewal: true,
            policy_number: "POL-0877".into(),
            office: "Norte".into(),
        },
        PolicyParameters {
            contractor: "Initech Servicios".into(),
            coverage: Coverage::Fma,
            insured_sum: 150_000.0,
            administration: "Propia".into(),
            agent: "Carlos Diaz".into(),
            commission: 0.08,
            payment_frequency: "Trimestral".into(),
            start: date(2024, 6, 1),
            end: date(2025, 6, 1),
            renewal: true,
            policy_number: "POL-0912".into(),
            office: "Sur".into(),
        },
    ]
}

fn demo_roster() -> InsuredRoster {
    let mut rows = Vec::new();

    let births = [
        ("Acme Industrial", vec!["1983-06-15", "1990-02-10", "1975-11-30"]),
        ("Globex Comercial", vec!["1968-04-22", "1985-09-03"]),
        ("Initech Servicios", vec!["1992-01-17", "1988-07-08", "1979-03-25", "1995-12-01"]),
    ];

    for (contractor, dates) in births {
        for birth in dates {
            rows.push(InsuredRecord {
                contractor: contractor.into(),
                birth_date: birth.into(),
            });
        }
    }

    InsuredRoster::new(rows)
}

fn main() {
    env_logger::init();

    println!("Quotation System v0.1.0");
    println!("=======================\n");

    let parameters = demo_parameters();
    let roster = demo_roster();

    // Globex renews clean; Initech trips the loss-ratio gate
    let issuance = IssuanceTable::from_records(vec![
        ("POL-0877".to_string(), 0.31),
        ("POL-0912".to_string(), 0.73),
    ]);

    let runner = BatchRunner::new(RateTable::sample(), issuance);
    let outcome = runner.run(&parameters, &roster, &HistoricalLedger::default());

    println!(
        "{:>6} {:<20} {:>9} {:>12} {:>14} {:>9} {:>11} {:<14}",
        "Ticket", "Contratante", "Cobert.", "SumaAseg", "Prima", "EdadProm", "Asegurados", "Evento"
    );
    println!("{}", "-".repeat(102));

    for quote in outcome.quotes.iter().map(|q| &q.quotation) {
        let prima = match quote.premium.amount() {
            Some(v) => format!("{:.2}", v),
            None => "REFERIR".to_string(),
        };
        println!(
            "{:>6} {:<20} {:>9} {:>12.0} {:>14} {:>9.1} {:>11} {:<14}",
            quote.ticket,
            quote.contractor,
            quote.coverage.code(),
            quote.insured_sum,
            prima,
            quote.average_age,
            quote.insured_count,
            quote.event.as_str(),
        );
    }

    for failure in &outcome.failures {
        println!("  !! {} omitido: {}", failure.contractor, failure.error);
    }

    // Persist the run the way the pipeline does: updated ledger plus one
    // memoria de cálculo per contractor
    let ledger_path = "historial_cotizaciones_actualizado.csv";
    outcome.ledger.write(ledger_path).expect("Unable to write ledger CSV");
    println!("\nLedger written to: {}", ledger_path);

    for quote in &outcome.quotes {
        let memoria_path = format!("memoria_{}.csv", quote.quotation.contractor.replace(' ', "_"));
        let file = File::create(&memoria_path).expect("Unable to create memoria CSV");
        quote.breakdown.write_csv(file).expect("Unable to write memoria CSV");
        println!("Memoria written to: {}", memoria_path);
    }

    println!("\nSummary:");
    println!("  Policyholders quoted: {}", outcome.quotes.len());
    println!("  Policyholders skipped: {}", outcome.failures.len());
    println!("  Ledger rows: {}", outcome.ledger.len());
    println!("  Next ticket: {}", outcome.ledger.next_ticket());
}
