//! Payment-frequency surcharge (RPF) and installment count lookup

use log::warn;

/// Surcharge and installment terms for one payment frequency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentTerms {
    /// Fractional surcharge applied to the premium (RPF)
    pub surcharge: f64,
    /// Number of receipts issued over the policy year
    pub installments: u32,
}

/// Fixed surcharge table by payment-frequency label
const PAYMENT_TERMS: [(&str, f64, u32); 4] = [
    ("anual", 0.0, 1),
    ("semestral", 0.037, 2),
    ("trimestral", 0.055, 4),
    ("mensual", 0.065, 12),
];

/// Terms applied when the label is missing from the table
pub const DEFAULT_PAYMENT_TERMS: PaymentTerms = PaymentTerms {
    surcharge: 0.0,
    installments: 1,
};

/// Resolve a payment-frequency label to its surcharge terms
///
/// Matching is case-insensitive and whitespace-trimmed. Unrecognized labels
/// fall back to the annual terms so a quotation is never blocked on a label
/// typo; the miss is logged.
pub fn resolve_payment_terms(label: &str) -> PaymentTerms {
    let normalized = label.trim().to_lowercase();

    for &(name, surcharge, installments) in &PAYMENT_TERMS {
        if normalized == name {
            return PaymentTerms { surcharge, installments };
        }
    }

    warn!("Unknown payment frequency '{}', defaulting to anual", label);
    DEFAULT_PAYMENT_TERMS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(resolve_payment_terms("anual"), PaymentTerms { surcharge: 0.0, installments: 1 });
        assert_eq!(resolve_payment_terms("semestral"), PaymentTerms { surcharge: 0.037, installments: 2 });
        assert_eq!(resolve_payment_terms("trimestral"), PaymentTerms { surcharge: 0.055, installments: 4 });
        assert_eq!(resolve_payment_terms("mensual"), PaymentTerms { surcharge: 0.065, installments: 12 });
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let terms = resolve_payment_terms(" MENSUAL ");
        assert_eq!(terms.surcharge, 0.065);
        assert_eq!(terms.installments, 12);
    }

    #[test]
    fn test_unknown_label_defaults_to_anual() {
        assert_eq!(resolve_payment_terms("quincenal"), resolve_payment_terms("anual"));
        assert_eq!(resolve_payment_terms(""), DEFAULT_PAYMENT_TERMS);
    }
}
