//! Load policyholder parameters and insured rosters from CSV

use super::{parse_renewal_flag, Coverage, InsuredRecord, InsuredRoster, PolicyParameters};
use crate::quote::age::parse_date;
use csv::Reader;
use std::error::Error;
use std::io::Read;
use std::path::Path;

/// Raw CSV row matching the parameter table columns
#[derive(Debug, serde::Deserialize)]
struct ParameterRow {
    #[serde(rename = "Contratante")]
    contractor: String,
    #[serde(rename = "Coberturas")]
    coverage: String,
    #[serde(rename = "SumaAsegurada")]
    insured_sum: f64,
    #[serde(rename = "Administracion")]
    administration: String,
    #[serde(rename = "Agente")]
    agent: String,
    #[serde(rename = "Comision")]
    commission: f64,
    #[serde(rename = "FormaPago")]
    payment_frequency: String,
    #[serde(rename = "Inicio")]
    start: String,
    #[serde(rename = "Fin")]
    end: String,
    #[serde(rename = "Renovacion")]
    renewal: String,
    #[serde(rename = "Poliza")]
    policy_number: String,
    #[serde(rename = "Oficina")]
    office: String,
}

impl ParameterRow {
    fn to_parameters(self) -> Result<PolicyParameters, Box<dyn Error>> {
        let coverage = Coverage::from_code(&self.coverage)?;
        let renewal = parse_renewal_flag(&self.renewal)?;

        // Parameter dates are a hard contract: a row with a garbled start
        // date cannot anchor the age computation for its whole roster.
        let start = parse_date(&self.start)
            .ok_or_else(|| format!("Unparseable start date for {}: {}", self.contractor, self.start))?;
        let end = parse_date(&self.end)
            .ok_or_else(|| format!("Unparseable end date for {}: {}", self.contractor, self.end))?;

        Ok(PolicyParameters {
            contractor: self.contractor,
            coverage,
            insured_sum: self.insured_sum,
            administration: self.administration,
            agent: self.agent,
            commission: self.commission,
            payment_frequency: self.payment_frequency,
            start,
            end,
            renewal,
            policy_number: self.policy_number,
            office: self.office,
        })
    }
}

/// Raw CSV row matching the insured roster columns
#[derive(Debug, serde::Deserialize)]
struct RosterRow {
    #[serde(rename = "Contratante")]
    contractor: String,
    #[serde(rename = "Fecha de Nacimiento")]
    birth_date: String,
}

/// Load the parameter table from a CSV file
pub fn load_parameters<P: AsRef<Path>>(path: P) -> Result<Vec<PolicyParameters>, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    parameters_from_reader(reader)
}

/// Load the parameter table from any reader (for testing and in-memory use)
pub fn load_parameters_from_reader<R: Read>(rdr: R) -> Result<Vec<PolicyParameters>, Box<dyn Error>> {
    parameters_from_reader(Reader::from_reader(rdr))
}

fn parameters_from_reader<R: Read>(mut reader: Reader<R>) -> Result<Vec<PolicyParameters>, Box<dyn Error>> {
    let mut parameters = Vec::new();

    for result in reader.deserialize() {
        let row: ParameterRow = result?;
        parameters.push(row.to_parameters()?);
    }

    Ok(parameters)
}

/// Load the insured roster from a CSV file
///
/// Birth dates are not validated here: the age calculator owns the lenient
/// handling of malformed values.
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<InsuredRoster, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    roster_from_reader(reader)
}

/// Load the insured roster from any reader
pub fn load_roster_from_reader<R: Read>(rdr: R) -> Result<InsuredRoster, Box<dyn Error>> {
    roster_from_reader(Reader::from_reader(rdr))
}

fn roster_from_reader<R: Read>(mut reader: Reader<R>) -> Result<InsuredRoster, Box<dyn Error>> {
    let mut rows = Vec::new();

    for result in reader.deserialize() {
        let row: RosterRow = result?;
        rows.push(InsuredRecord {
            contractor: row.contractor,
            birth_date: row.birth_date,
        });
    }

    Ok(InsuredRoster::new(rows))
}
