//! Quotation output record for one policyholder

use crate::policy::Coverage;
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// Referral message written in place of a numeric premium when the renewal
/// gate trips
pub const REFERRAL_SENTINEL: &str = "La siniestralidad está desviada, consulte a un suscriptor";

/// Quoted premium: a number, or the referral sentinel for gated renewals
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Premium {
    /// Computed total premium
    Amount(f64),
    /// Loss ratio out of tolerance - refer to an underwriter
    Referral,
}

impl Premium {
    /// Numeric amount, if not referred
    pub fn amount(&self) -> Option<f64> {
        match self {
            Premium::Amount(v) => Some(*v),
            Premium::Referral => None,
        }
    }

    pub fn is_referral(&self) -> bool {
        matches!(self, Premium::Referral)
    }
}

impl std::fmt::Display for Premium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Premium::Amount(v) => write!(f, "{:.2}", v),
            Premium::Referral => f.write_str(REFERRAL_SENTINEL),
        }
    }
}

// The Prima column is heterogeneous by contract: a number for quotable
// policyholders, the sentinel string otherwise.
impl Serialize for Premium {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Premium::Amount(v) => serializer.serialize_f64(*v),
            Premium::Referral => serializer.serialize_str(REFERRAL_SENTINEL),
        }
    }
}

/// Quotation event flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Event {
    /// Nothing notable - the computed premium stands
    #[serde(rename = "na")]
    Na,
    /// Renewal loss ratio at or above threshold - manual referral
    #[serde(rename = "out of policy")]
    OutOfPolicy,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Na => "na",
            Event::OutOfPolicy => "out of policy",
        }
    }
}

/// Ledger classification of a quotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuoteKind {
    #[serde(rename = "renovación")]
    Renovacion,
    #[serde(rename = "nuevo")]
    Nuevo,
}

impl QuoteKind {
    pub fn from_renewal_flag(renewal: bool) -> Self {
        if renewal {
            QuoteKind::Renovacion
        } else {
            QuoteKind::Nuevo
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteKind::Renovacion => "renovación",
            QuoteKind::Nuevo => "nuevo",
        }
    }
}

/// Spanish month name as printed on quotation documents
pub fn spanish_month(date: NaiveDate) -> &'static str {
    match date.month() {
        1 => "Enero",
        2 => "Febrero",
        3 => "Marzo",
        4 => "Abril",
        5 => "Mayo",
        6 => "Junio",
        7 => "Julio",
        8 => "Agosto",
        9 => "Septiembre",
        10 => "Octubre",
        11 => "Noviembre",
        _ => "Diciembre",
    }
}

/// One policyholder-level quotation
///
/// Field names serialize to the source column headers so the JSON records
/// feed the downstream document renderer unchanged.
///
/// Invariant: `event` is [`Event::OutOfPolicy`] if and only if `premium` is
/// [`Premium::Referral`]. Both are produced by a single gate decision in
/// the assembler.
#[derive(Debug, Clone, Serialize)]
pub struct Quotation {
    #[serde(rename = "Contratante")]
    pub contractor: String,

    #[serde(rename = "Coberturas")]
    pub coverage: Coverage,

    #[serde(rename = "SumaAsegurada")]
    pub insured_sum: f64,

    #[serde(rename = "Administracion")]
    pub administration: String,

    #[serde(rename = "Agente")]
    pub agent: String,

    /// Commission in whole percent, as shown on documents
    #[serde(rename = "Comision")]
    pub commission_percent: f64,

    #[serde(rename = "FormaPago")]
    pub payment_frequency: String,

    #[serde(rename = "Inicio")]
    pub start: NaiveDate,

    #[serde(rename = "Fin")]
    pub end: NaiveDate,

    #[serde(rename = "Renovacion")]
    pub renewal: bool,

    #[serde(rename = "Poliza")]
    pub policy_number: String,

    #[serde(rename = "Ticket")]
    pub ticket: u64,

    #[serde(rename = "Oficina")]
    pub office: String,

    /// Payment-frequency surcharge rate
    #[serde(rename = "RPF")]
    pub surcharge: f64,

    #[serde(rename = "NumRecibos")]
    pub installments: u32,

    #[serde(rename = "Descuento")]
    pub discount: f64,

    #[serde(rename = "Prima")]
    pub premium: Premium,

    #[serde(rename = "EdadPromedio")]
    pub average_age: f64,

    /// Insured-sum reference figure shown on documents; numerically the
    /// insured sum in this product
    #[serde(rename = "SAMI")]
    pub sami: f64,

    #[serde(rename = "Asegurados")]
    pub insured_count: usize,

    #[serde(rename = "Mes")]
    pub month: &'static str,

    #[serde(rename = "Evento")]
    pub event: Event,
}

impl Quotation {
    /// Full coverage display name for document rendering
    pub fn coverage_name(&self) -> &'static str {
        self.coverage.display_name()
    }

    /// Ledger classification derived from the renewal flag
    pub fn kind(&self) -> QuoteKind {
        QuoteKind::from_renewal_flag(self.renewal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_display() {
        assert_eq!(Premium::Amount(93.72).to_string(), "93.72");
        assert_eq!(Premium::Referral.to_string(), REFERRAL_SENTINEL);
    }

    #[test]
    fn test_premium_serializes_as_number_or_sentinel() {
        assert_eq!(serde_json::to_string(&Premium::Amount(93.72)).unwrap(), "93.72");
        assert_eq!(
            serde_json::to_string(&Premium::Referral).unwrap(),
            format!("\"{}\"", REFERRAL_SENTINEL)
        );
    }

    #[test]
    fn test_event_strings() {
        assert_eq!(Event::Na.as_str(), "na");
        assert_eq!(Event::OutOfPolicy.as_str(), "out of policy");
        assert_eq!(serde_json::to_string(&Event::OutOfPolicy).unwrap(), "\"out of policy\"");
    }

    #[test]
    fn test_quote_kind() {
        assert_eq!(QuoteKind::from_renewal_flag(true).as_str(), "renovación");
        assert_eq!(QuoteKind::from_renewal_flag(false).as_str(), "nuevo");
    }

    #[test]
    fn test_spanish_months() {
        let d = |m| NaiveDate::from_ymd_opt(2024, m, 15).unwrap();
        assert_eq!(spanish_month(d(1)), "Enero");
        assert_eq!(spanish_month(d(6)), "Junio");
        assert_eq!(spanish_month(d(12)), "Diciembre");
    }
}
