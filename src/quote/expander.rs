//! Coverage rate expansion - the memoria de cálculo behind each quotation

use super::age::age_of;
use crate::policy::{Coverage, InsuredRecord, PolicyParameters};
use crate::rates::RateTable;
use serde::Serialize;

/// One insured's line in the memoria de cálculo
///
/// Monetary contributions are per selected peril. Every coverage
/// combination includes the death peril, so `death == None` marks an age
/// with no row in the rate table; the other columns are `None` when the
/// peril is not part of the contracted combination or the age is unmatched.
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownRow {
    /// Raw birth date as loaded
    #[serde(rename = "Fecha de Nacimiento")]
    pub birth_date: String,

    /// Derived age at the policy start date
    #[serde(rename = "Edad")]
    pub age: i32,

    /// Death contribution (Fallecimiento)
    #[serde(rename = "Fallecimiento")]
    pub death: Option<f64>,

    /// Accidental death contribution (MA)
    #[serde(rename = "MA")]
    pub accidental_death: Option<f64>,

    /// Total disability contribution (BPAI)
    #[serde(rename = "BPAI")]
    pub disability: Option<f64>,
}

/// Expanded per-insured rate breakdown for one policyholder
#[derive(Debug, Clone, Serialize)]
pub struct RateBreakdown {
    pub coverage: Coverage,
    pub rows: Vec<BreakdownRow>,
}

impl RateBreakdown {
    /// Raw total premium: the sum of every scaled contribution
    ///
    /// Unmatched ages contribute nothing. That choice is deliberate and
    /// visible: the gaps stay as empty cells in the exported memoria and
    /// are reported through [`unmatched_ages`](Self::unmatched_ages).
    pub fn total_premium(&self) -> f64 {
        self.rows
            .iter()
            .map(|row| {
                row.death.unwrap_or(0.0)
                    + row.accidental_death.unwrap_or(0.0)
                    + row.disability.unwrap_or(0.0)
            })
            .sum()
    }

    /// Ages on the roster with no row in the rate table
    pub fn unmatched_ages(&self) -> Vec<i32> {
        self.rows
            .iter()
            .filter(|row| row.death.is_none())
            .map(|row| row.age)
            .collect()
    }

    /// Mean derived age across the roster
    ///
    /// Includes the 0 / -1 sentinel ages, matching how the average appears
    /// on quotation documents.
    pub fn average_age(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        self.rows.iter().map(|row| row.age as f64).sum::<f64>() / self.rows.len() as f64
    }

    /// Number of insured individuals expanded
    pub fn insured_count(&self) -> usize {
        self.rows.len()
    }

    /// Export the memoria as CSV; unmatched rates stay as empty cells
    pub fn write_csv<W: std::io::Write>(&self, wtr: W) -> Result<(), Box<dyn std::error::Error>> {
        let mut writer = csv::Writer::from_writer(wtr);
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Expand a policyholder's roster against the rate table
///
/// One output row per insured individual: derive the age at the policy
/// start date, left-join the rate table on age, and scale each selected
/// peril rate by `(1 - discount) * (1 + surcharge) * insured_sum / 1000`.
pub fn expand(
    params: &PolicyParameters,
    roster: &[&InsuredRecord],
    rates: &RateTable,
    discount: f64,
    surcharge: f64,
) -> RateBreakdown {
    let scale = (1.0 - discount) * (1.0 + surcharge) * params.insured_sum / 1000.0;
    let coverage = params.coverage;

    let rows = roster
        .iter()
        .map(|insured| {
            let age = age_of(&insured.birth_date, params.start);
            let rate_row = rates.lookup(age);

            BreakdownRow {
                birth_date: insured.birth_date.clone(),
                age,
                death: rate_row.map(|r| r.death * scale),
                accidental_death: rate_row
                    .filter(|_| coverage.includes_accidental_death())
                    .map(|r| r.accidental_death * scale),
                disability: rate_row
                    .filter(|_| coverage.includes_disability())
                    .map(|r| r.disability * scale),
            }
        })
        .collect();

    RateBreakdown { coverage, rows }
}
