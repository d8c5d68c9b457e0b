//! Quotation assembly: one policyholder in, one quotation record out

use super::expander::{expand, RateBreakdown};
use super::quotation::{spanish_month, Event, Premium, Quotation};
use crate::policy::{InsuredRoster, PolicyParameters};
use crate::rates::{
    commission_to_percent, resolve_commission_discount, resolve_payment_terms, IssuanceTable,
    RateTable,
};
use log::warn;
use thiserror::Error;

/// Loss ratio at or above which a renewal is referred instead of quoted
pub const LOSS_RATIO_REFERRAL_THRESHOLD: f64 = 0.50;

/// Per-policyholder assembly failure
///
/// These are fatal for the policyholder only: the batch orchestrator
/// catches them, skips the policyholder without consuming a ticket, and
/// records them in the run report.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A renewal must have issuance history to evaluate the loss-ratio gate
    #[error("renewal policy {policy_number} of {contractor} has no issuance record")]
    MissingIssuanceRecord {
        contractor: String,
        policy_number: String,
    },

    /// No roster rows were found for the policyholder
    #[error("{contractor} has no insured roster rows")]
    EmptyRoster { contractor: String },
}

/// Assemble one policyholder's quotation
///
/// Resolves payment terms and commission discount, expands the roster
/// against the rate table, sums the scaled contributions, and applies the
/// renewal loss-ratio gate. Returns the quotation together with its memoria
/// de cálculo so callers can persist the audit trail.
///
/// The average age and insured count are populated even when the gate
/// overrides the premium with the referral sentinel.
pub fn assemble(
    params: &PolicyParameters,
    ticket: u64,
    roster: &InsuredRoster,
    issuance: &IssuanceTable,
    rates: &RateTable,
) -> Result<(Quotation, RateBreakdown), AssemblyError> {
    let insured = roster.for_contractor(&params.contractor);
    if insured.is_empty() {
        return Err(AssemblyError::EmptyRoster {
            contractor: params.contractor.clone(),
        });
    }

    // Renewals need issuance history before any premium work: a missing
    // record is a typed failure, never a silent zero.
    let loss_ratio = if params.renewal {
        let ratio = issuance.loss_ratio(&params.policy_number).ok_or_else(|| {
            AssemblyError::MissingIssuanceRecord {
                contractor: params.contractor.clone(),
                policy_number: params.policy_number.clone(),
            }
        })?;
        Some(ratio)
    } else {
        None
    };

    let terms = resolve_payment_terms(&params.payment_frequency);
    let commission_percent = commission_to_percent(params.commission);
    let discount = resolve_commission_discount(commission_percent);

    let breakdown = expand(params, &insured, rates, discount, terms.surcharge);

    let unmatched = breakdown.unmatched_ages();
    if !unmatched.is_empty() {
        warn!(
            "{}: ages {:?} missing from the rate table, contributing nothing to the premium",
            params.contractor, unmatched
        );
    }

    let raw_premium = breakdown.total_premium();

    // Renewal gate: at or above threshold the premium is referred.
    let (premium, event) = match loss_ratio {
        Some(ratio) if ratio >= LOSS_RATIO_REFERRAL_THRESHOLD => {
            (Premium::Referral, Event::OutOfPolicy)
        }
        _ => (Premium::Amount(raw_premium), Event::Na),
    };

    let quotation = Quotation {
        contractor: params.contractor.clone(),
        coverage: params.coverage,
        insured_sum: params.insured_sum,
        administration: params.administration.clone(),
        agent: params.agent.clone(),
        commission_percent,
        payment_frequency: params.payment_frequency.clone(),
        start: params.start,
        end: params.end,
        renewal: params.renewal,
        policy_number: params.policy_number.clone(),
        ticket,
        office: params.office.clone(),
        surcharge: terms.surcharge,
        installments: terms.installments,
        discount,
        premium,
        average_age: breakdown.average_age(),
        sami: params.insured_sum,
        insured_count: breakdown.insured_count(),
        month: spanish_month(params.start),
        event,
    };

    Ok((quotation, breakdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Coverage, InsuredRecord};
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn params(renewal: bool) -> PolicyParameters {
        PolicyParameters {
            contractor: "Acme".into(),
            coverage: Coverage::F,
            insured_sum: 100_000.0,
            administration: "Propia".into(),
            agent: "Juan Perez".into(),
            commission: 0.12,
            payment_frequency: "mensual".into(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            renewal,
            policy_number: "POL-001".into(),
            office: "Centro".into(),
        }
    }

    fn roster() -> InsuredRoster {
        // One insured aged 40 at the 2024-01-01 start
        InsuredRoster::new(vec![InsuredRecord {
            contractor: "Acme".into(),
            birth_date: "1983-06-15".into(),
        }])
    }

    fn issuance(loss_ratio: f64) -> IssuanceTable {
        IssuanceTable::from_records(vec![("POL-001".to_string(), loss_ratio)])
    }

    #[test]
    fn test_new_business_end_to_end() {
        // Death rate 1.0 per mille at age 40, 12% commission discount,
        // monthly surcharge: 1.0 * (1-0.12) * (1+0.065) * 100000/1000
        let (quote, breakdown) = assemble(
            &params(false),
            7,
            &roster(),
            &IssuanceTable::default(),
            &RateTable::sample(),
        )
        .unwrap();

        assert_eq!(quote.ticket, 7);
        assert_eq!(quote.commission_percent, 12.0);
        assert_eq!(quote.discount, 0.12);
        assert_eq!(quote.surcharge, 0.065);
        assert_eq!(quote.installments, 12);
        assert_abs_diff_eq!(quote.premium.amount().unwrap(), 93.72, epsilon = 1e-9);
        assert_eq!(quote.event, Event::Na);
        assert_eq!(quote.insured_count, 1);
        assert_abs_diff_eq!(quote.average_age, 40.0, epsilon = 1e-9);
        assert_eq!(quote.month, "Enero");
        assert_eq!(quote.sami, 100_000.0);
        assert_eq!(breakdown.rows.len(), 1);
    }

    #[test]
    fn test_renewal_gate_below_threshold_keeps_premium() {
        let (quote, _) = assemble(
            &params(true),
            1,
            &roster(),
            &issuance(0.49),
            &RateTable::sample(),
        )
        .unwrap();

        assert_abs_diff_eq!(quote.premium.amount().unwrap(), 93.72, epsilon = 1e-9);
        assert_eq!(quote.event, Event::Na);
    }

    #[test]
    fn test_renewal_gate_boundary_is_inclusive() {
        // The gate trips at exactly 0.50, not above it
        let (quote, _) = assemble(
            &params(true),
            1,
            &roster(),
            &issuance(0.50),
            &RateTable::sample(),
        )
        .unwrap();

        assert!(quote.premium.is_referral());
        assert_eq!(quote.event, Event::OutOfPolicy);
        // Derived roster fields survive the override
        assert_eq!(quote.insured_count, 1);
        assert_abs_diff_eq!(quote.average_age, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_renewal_gate_is_idempotent() {
        for _ in 0..3 {
            let (quote, _) = assemble(
                &params(true),
                1,
                &roster(),
                &issuance(0.49),
                &RateTable::sample(),
            )
            .unwrap();
            assert_abs_diff_eq!(quote.premium.amount().unwrap(), 93.72, epsilon = 1e-9);
            assert_eq!(quote.event, Event::Na);
        }
    }

    #[test]
    fn test_premium_and_event_always_agree() {
        for ratio in [0.0, 0.2, 0.499, 0.5, 0.51, 1.8] {
            let (quote, _) = assemble(
                &params(true),
                1,
                &roster(),
                &issuance(ratio),
                &RateTable::sample(),
            )
            .unwrap();
            assert_eq!(quote.premium.is_referral(), quote.event == Event::OutOfPolicy);
        }
    }

    #[test]
    fn test_renewal_without_issuance_record_is_typed_error() {
        let err = assemble(
            &params(true),
            1,
            &roster(),
            &IssuanceTable::default(),
            &RateTable::sample(),
        )
        .unwrap_err();

        match err {
            AssemblyError::MissingIssuanceRecord { contractor, policy_number } => {
                assert_eq!(contractor, "Acme");
                assert_eq!(policy_number, "POL-001");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_new_business_never_consults_issuance() {
        // No issuance record exists, but the policyholder is not a renewal
        let result = assemble(
            &params(false),
            1,
            &roster(),
            &IssuanceTable::default(),
            &RateTable::sample(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_roster_is_typed_error() {
        let err = assemble(
            &params(false),
            1,
            &InsuredRoster::default(),
            &IssuanceTable::default(),
            &RateTable::sample(),
        )
        .unwrap_err();

        assert!(matches!(err, AssemblyError::EmptyRoster { .. }));
    }

    #[test]
    fn test_unknown_payment_frequency_defaults_to_annual() {
        let mut p = params(false);
        p.payment_frequency = "quincenal".into();

        let (quote, _) = assemble(
            &p,
            1,
            &roster(),
            &IssuanceTable::default(),
            &RateTable::sample(),
        )
        .unwrap();

        assert_eq!(quote.surcharge, 0.0);
        assert_eq!(quote.installments, 1);
        // 1.0 * (1-0.12) * 1.0 * 100
        assert_abs_diff_eq!(quote.premium.amount().unwrap(), 88.0, epsilon = 1e-9);
    }

    #[test]
    fn test_off_table_commission_quotes_without_discount() {
        let mut p = params(false);
        p.commission = 0.35;

        let (quote, _) = assemble(
            &p,
            1,
            &roster(),
            &IssuanceTable::default(),
            &RateTable::sample(),
        )
        .unwrap();

        assert_eq!(quote.discount, 0.0);
        assert_eq!(quote.commission_percent, 35.0);
        // Quotation still assembles: 1.0 * 1.065 * 100
        assert_abs_diff_eq!(quote.premium.amount().unwrap(), 106.5, epsilon = 1e-9);
    }
}
