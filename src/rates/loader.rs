//! CSV loaders for rate and issuance reference tables

use super::{IssuanceTable, RateRow, RateTable};
use csv::Reader;
use std::collections::HashMap;
use std::error::Error;
use std::io::Read;
use std::path::Path;

/// Raw CSV row of the experience rate table
#[derive(Debug, serde::Deserialize)]
struct RateCsvRow {
    #[serde(rename = "Edad")]
    age: i32,
    #[serde(rename = "Fallecimiento")]
    death: f64,
    #[serde(rename = "MA")]
    accidental_death: f64,
    #[serde(rename = "BPAI")]
    disability: f64,
}

/// Raw CSV row of the issuance table
#[derive(Debug, serde::Deserialize)]
struct IssuanceCsvRow {
    #[serde(rename = "Poliza")]
    policy_number: String,
    #[serde(rename = "Siniestralidad")]
    loss_ratio: f64,
}

/// Load the age-banded rate table from CSV
pub fn load_rate_table<P: AsRef<Path>>(path: P) -> Result<RateTable, Box<dyn Error>> {
    rate_table_from_reader(Reader::from_path(path)?)
}

/// Load the rate table from any reader
pub fn load_rate_table_from_reader<R: Read>(rdr: R) -> Result<RateTable, Box<dyn Error>> {
    rate_table_from_reader(Reader::from_reader(rdr))
}

fn rate_table_from_reader<R: Read>(mut reader: Reader<R>) -> Result<RateTable, Box<dyn Error>> {
    let mut rows = HashMap::new();

    for result in reader.deserialize() {
        let row: RateCsvRow = result?;
        rows.insert(
            row.age,
            RateRow {
                death: row.death,
                accidental_death: row.accidental_death,
                disability: row.disability,
            },
        );
    }

    Ok(RateTable::new(rows))
}

/// Load the issuance loss-ratio table from CSV
pub fn load_issuances<P: AsRef<Path>>(path: P) -> Result<IssuanceTable, Box<dyn Error>> {
    issuances_from_reader(Reader::from_path(path)?)
}

/// Load the issuance table from any reader
pub fn load_issuances_from_reader<R: Read>(rdr: R) -> Result<IssuanceTable, Box<dyn Error>> {
    issuances_from_reader(Reader::from_reader(rdr))
}

fn issuances_from_reader<R: Read>(mut reader: Reader<R>) -> Result<IssuanceTable, Box<dyn Error>> {
    let mut records = HashMap::new();

    for result in reader.deserialize() {
        let row: IssuanceCsvRow = result?;
        records.insert(row.policy_number, row.loss_ratio);
    }

    Ok(IssuanceTable::new(records))
}
