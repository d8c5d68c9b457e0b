//! Commission-to-discount lookup

use log::warn;

/// Fixed discount table by commission level in whole percent
///
/// Discounts grow as the agent gives up commission points.
const COMMISSION_DISCOUNTS: [(i64, f64); 16] = [
    (20, 0.00),
    (19, 0.02),
    (18, 0.03),
    (17, 0.04),
    (16, 0.06),
    (15, 0.07),
    (14, 0.09),
    (13, 0.10),
    (12, 0.12),
    (11, 0.13),
    (10, 0.15),
    (9, 0.16),
    (8, 0.18),
    (7, 0.19),
    (6, 0.21),
    (5, 0.22),
];

/// Resolve a whole-percent commission level to its discount rate
///
/// The lookup is exact: no interpolation between table points. Input must
/// already be scaled to whole percent (12.0, not 0.12). Values off the
/// table yield 0.0 and a log entry - a quotation never aborts because the
/// commission is out of band.
pub fn resolve_commission_discount(commission_percent: f64) -> f64 {
    if commission_percent.fract().abs() < 1e-9 {
        let key = commission_percent.round() as i64;
        for &(level, discount) in &COMMISSION_DISCOUNTS {
            if level == key {
                return discount;
            }
        }
    }

    warn!(
        "Commission {}% not in discount table, applying no discount",
        commission_percent
    );
    0.0
}

/// Convert a commission fraction from the parameter table to whole percent
///
/// Rounded to the nearest point: 0.12 stored as binary floating point
/// multiplies out to 12.000000000000002, which an exact lookup would miss.
pub fn commission_to_percent(commission_fraction: f64) -> f64 {
    (commission_fraction * 100.0).round()
}
