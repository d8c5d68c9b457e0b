//! Age-banded premium rate table

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-mille rates for one age band, one column per peril
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    /// Death rate (Fallecimiento)
    pub death: f64,
    /// Accidental death rate (MA)
    pub accidental_death: f64,
    /// Total disability rate (BPAI)
    pub disability: f64,
}

/// Static reference rate table keyed by integer age
///
/// Every age appearing on a roster should have a row; a missing age is not
/// an error here - the lookup returns `None` and the expander records the
/// gap in the memoria de cálculo.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rows: HashMap<i32, RateRow>,
}

impl RateTable {
    pub fn new(rows: HashMap<i32, RateRow>) -> Self {
        Self { rows }
    }

    /// Build from (age, row) pairs
    pub fn from_rows(rows: impl IntoIterator<Item = (i32, RateRow)>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    /// Rates for one age, if the table has that band
    pub fn lookup(&self, age: i32) -> Option<&RateRow> {
        self.rows.get(&age)
    }

    /// Number of age bands
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Compact demo table covering ages 15-85
    ///
    /// Used by the demo binary and tests; production rates are loaded from
    /// the experience CSV. Death and disability grade linearly with age,
    /// accidental death is flat.
    pub fn sample() -> Self {
        let mut rows = HashMap::new();

        for age in 15..=85 {
            rows.insert(
                age,
                RateRow {
                    death: age as f64 * 0.025,
                    accidental_death: 0.18,
                    disability: age as f64 * 0.012,
                },
            );
        }

        Self { rows }
    }
}
