//! Policyholder data structures matching the quotation parameter format

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Coverage combination contracted by a policyholder
///
/// Codes follow the source rate sheets: F = death only, MA = accidental
/// death, BPAI = total disability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coverage {
    /// Death only (F)
    #[serde(rename = "F")]
    F,
    /// Death + accidental death (FMA)
    #[serde(rename = "FMA")]
    Fma,
    /// Death + total disability (FBPAI)
    #[serde(rename = "FBPAI")]
    Fbpai,
    /// Death + accidental death + total disability (FMABPAI)
    #[serde(rename = "FMABPAI")]
    Fmabpai,
}

impl Coverage {
    /// Parse a coverage code as it appears in the parameter table
    ///
    /// Unknown codes are a validation error: a quotation computed against an
    /// unrecognized combination would silently sum to zero.
    pub fn from_code(code: &str) -> Result<Self, String> {
        match code.trim() {
            "F" => Ok(Coverage::F),
            "FMA" => Ok(Coverage::Fma),
            "FBPAI" => Ok(Coverage::Fbpai),
            "FMABPAI" => Ok(Coverage::Fmabpai),
            other => Err(format!("Unknown coverage code: {}", other)),
        }
    }

    /// The code as written in the parameter table
    pub fn code(&self) -> &'static str {
        match self {
            Coverage::F => "F",
            Coverage::Fma => "FMA",
            Coverage::Fbpai => "FBPAI",
            Coverage::Fmabpai => "FMABPAI",
        }
    }

    /// Full display name used on quotation documents
    pub fn display_name(&self) -> &'static str {
        match self {
            Coverage::F => "FALLECIMIENTO",
            Coverage::Fma => "FALLECIMIENTO Y MUERTE ACCIDENTAL",
            Coverage::Fbpai => "FALLECIMIENTO E INVALIDEZ TOTAL",
            Coverage::Fmabpai => "FALLECIMIENTO, MUERTE ACCIDENTAL E INVALIDEZ TOTAL",
        }
    }

    /// Whether the accidental-death peril is part of this combination
    pub fn includes_accidental_death(&self) -> bool {
        matches!(self, Coverage::Fma | Coverage::Fmabpai)
    }

    /// Whether the total-disability peril is part of this combination
    pub fn includes_disability(&self) -> bool {
        matches!(self, Coverage::Fbpai | Coverage::Fmabpai)
    }
}

/// One row of the quotation parameter table (one per policyholder)
///
/// Immutable once loaded; one row is consumed per quotation assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyParameters {
    /// Contractor name - unique key linking to the insured roster
    pub contractor: String,

    /// Contracted coverage combination
    pub coverage: Coverage,

    /// Insured sum per individual
    pub insured_sum: f64,

    /// Administration label
    pub administration: String,

    /// Agent name
    pub agent: String,

    /// Commission rate as a fraction (e.g. 0.12 for 12%)
    pub commission: f64,

    /// Payment-frequency label, kept raw; resolved at assembly time
    pub payment_frequency: String,

    /// Policy start date - also the age reference (cutoff) date
    pub start: NaiveDate,

    /// Policy end date
    pub end: NaiveDate,

    /// Renewal flag, normalized to a boolean at load time
    pub renewal: bool,

    /// Policy number linking renewals to the issuance table
    pub policy_number: String,

    /// Office label
    pub office: String,
}

/// One insured individual on a policyholder's roster
///
/// The birth date is kept as the raw loaded value: rosters arrive from
/// uncontrolled spreadsheets, and a malformed date must degrade to age 0 at
/// computation time rather than fail the load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuredRecord {
    /// Contractor name this individual belongs to
    pub contractor: String,

    /// Raw birth date value as loaded (date, datetime, or epoch forms)
    pub birth_date: String,
}

/// The full insured roster across all policyholders
#[derive(Debug, Clone, Default)]
pub struct InsuredRoster {
    rows: Vec<InsuredRecord>,
}

impl InsuredRoster {
    pub fn new(rows: Vec<InsuredRecord>) -> Self {
        Self { rows }
    }

    /// All roster rows
    pub fn rows(&self) -> &[InsuredRecord] {
        &self.rows
    }

    /// Rows belonging to one policyholder
    pub fn for_contractor(&self, contractor: &str) -> Vec<&InsuredRecord> {
        self.rows
            .iter()
            .filter(|r| r.contractor == contractor)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Normalize the renewal flag as it appears upstream
///
/// Source extracts disagree on the convention ("Si" vs a boolean); the
/// canonical in-memory representation is a bool.
pub fn parse_renewal_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "si" | "sí" | "true" | "1" => Ok(true),
        "no" | "false" | "0" | "" => Ok(false),
        other => Err(format!("Unknown renewal flag: {}", other)),
    }
}
