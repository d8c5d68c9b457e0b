//! Historical quotation ledger with monotonically increasing tickets

use crate::quote::Quotation;
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::io::{Read, Write};
use std::path::Path;

/// One persisted ledger line - the reduced column set kept across runs
///
/// Prima is heterogeneous by contract (a number or the referral sentinel),
/// so the ledger keeps it in display form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    #[serde(rename = "Ticket")]
    pub ticket: u64,

    #[serde(rename = "Fecha de Inicio")]
    pub start_date: String,

    #[serde(rename = "Mes")]
    pub month: String,

    #[serde(rename = "Oficina")]
    pub office: String,

    #[serde(rename = "Contratante")]
    pub contractor: String,

    #[serde(rename = "Agente")]
    pub agent: String,

    #[serde(rename = "Prima")]
    pub premium: String,

    #[serde(rename = "Evento")]
    pub event: String,

    #[serde(rename = "Tipo")]
    pub kind: String,
}

impl LedgerRow {
    /// Reduce a quotation to its ledger columns
    pub fn from_quotation(quote: &Quotation) -> Self {
        Self {
            ticket: quote.ticket,
            start_date: quote.start.to_string(),
            month: quote.month.to_string(),
            office: quote.office.clone(),
            contractor: quote.contractor.clone(),
            agent: quote.agent.clone(),
            premium: quote.premium.to_string(),
            event: quote.event.as_str().to_string(),
            kind: quote.kind().as_str().to_string(),
        }
    }
}

/// Append-only table of past quotations
///
/// Read once per run to seed the next ticket number, appended once at the
/// end. Tickets are never reused: the next one is always `len + 1`.
#[derive(Debug, Clone, Default)]
pub struct HistoricalLedger {
    rows: Vec<LedgerRow>,
}

impl HistoricalLedger {
    pub fn new(rows: Vec<LedgerRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ticket number for the next quotation created
    pub fn next_ticket(&self) -> u64 {
        self.rows.len() as u64 + 1
    }

    /// Append one run's quotations, reduced to ledger columns
    pub fn append_run<'a>(&mut self, quotations: impl IntoIterator<Item = &'a Quotation>) {
        self.rows
            .extend(quotations.into_iter().map(LedgerRow::from_quotation));
    }

    /// Load the ledger from CSV; a missing file is an empty ledger
    ///
    /// The first run of a fresh installation has no history yet, which must
    /// seed ticket 1 rather than fail.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        if !path.as_ref().exists() {
            return Ok(Self::default());
        }
        Self::from_csv_reader(Reader::from_path(path)?)
    }

    /// Load from any reader
    pub fn load_from_reader<R: Read>(rdr: R) -> Result<Self, Box<dyn Error>> {
        Self::from_csv_reader(Reader::from_reader(rdr))
    }

    fn from_csv_reader<R: Read>(mut reader: Reader<R>) -> Result<Self, Box<dyn Error>> {
        let mut rows = Vec::new();
        for result in reader.deserialize() {
            rows.push(result?);
        }
        Ok(Self { rows })
    }

    /// Persist the whole table, replacing any previous contents
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        let mut writer = Writer::from_path(path)?;
        self.write_rows(&mut writer)
    }

    /// Write to any writer
    pub fn write_to<W: Write>(&self, wtr: W) -> Result<(), Box<dyn Error>> {
        let mut writer = Writer::from_writer(wtr);
        self.write_rows(&mut writer)
    }

    fn write_rows<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Box<dyn Error>> {
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEDGER_CSV: &str = "\
Ticket,Fecha de Inicio,Mes,Oficina,Contratante,Agente,Prima,Evento,Tipo
1,2023-11-01,Noviembre,Centro,Acme,Juan Perez,84210.55,na,nuevo
2,2023-12-01,Diciembre,Norte,Globex,Ana Ruiz,\"La siniestralidad está desviada, consulte a un suscriptor\",out of policy,renovación
";

    fn sample_ledger() -> HistoricalLedger {
        HistoricalLedger::load_from_reader(LEDGER_CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_next_ticket_seeds_from_length() {
        assert_eq!(HistoricalLedger::default().next_ticket(), 1);
        assert_eq!(sample_ledger().next_ticket(), 3);
    }

    #[test]
    fn test_csv_round_trip() {
        let ledger = sample_ledger();

        let mut buf = Vec::new();
        ledger.write_to(&mut buf).unwrap();
        let reloaded = HistoricalLedger::load_from_reader(buf.as_slice()).unwrap();

        assert_eq!(reloaded.len(), ledger.len());
        assert_eq!(reloaded.rows()[1].contractor, "Globex");
        assert_eq!(reloaded.rows()[1].event, "out of policy");
        assert_eq!(reloaded.rows()[1].kind, "renovación");
        assert_eq!(reloaded.next_ticket(), 3);
    }

    #[test]
    fn test_missing_file_is_empty_ledger() {
        let ledger = HistoricalLedger::load("does/not/exist.csv").unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.next_ticket(), 1);
    }
}
