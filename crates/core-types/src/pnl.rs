use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Coerces a P&L-like cell into a decimal.
///
/// This is the only place a P&L value is parsed. Surrounding whitespace, a
/// leading `+`, thousands separators and scientific notation are accepted.
/// `None` means the cell was missing or non-numeric: it contributes zero to
/// every sum and is classified as [`Outcome::Breakeven`].
pub fn coerce_pnl(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let unsigned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if unsigned.is_empty() {
        return None;
    }

    if let Ok(value) = Decimal::from_str(unsigned) {
        return Some(value);
    }
    if let Ok(value) = Decimal::from_scientific(unsigned) {
        return Some(value);
    }

    unsigned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .and_then(Decimal::from_f64)
}

/// The class a trade falls into by the strict sign of its P&L.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Breakeven,
}

impl Outcome {
    pub fn classify(pnl: Option<Decimal>) -> Self {
        match pnl {
            Some(value) if value > Decimal::ZERO => Outcome::Win,
            Some(value) if value < Decimal::ZERO => Outcome::Loss,
            _ => Outcome::Breakeven,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_coerce_plain_numbers() {
        assert_eq!(coerce_pnl("100"), Some(dec!(100)));
        assert_eq!(coerce_pnl(" -40.5 "), Some(dec!(-40.5)));
        assert_eq!(coerce_pnl("+12.25"), Some(dec!(12.25)));
        assert_eq!(coerce_pnl("0"), Some(dec!(0)));
    }

    #[test]
    fn test_coerce_separators_and_exponents() {
        assert_eq!(coerce_pnl("1,250.75"), Some(dec!(1250.75)));
        assert_eq!(coerce_pnl("1e3"), Some(dec!(1000)));
        assert_eq!(coerce_pnl("-2.5e-1"), Some(dec!(-0.25)));
    }

    #[test]
    fn test_coerce_non_numeric_is_none() {
        assert_eq!(coerce_pnl(""), None);
        assert_eq!(coerce_pnl("   "), None);
        assert_eq!(coerce_pnl("n/a"), None);
        assert_eq!(coerce_pnl("NaN"), None);
        assert_eq!(coerce_pnl("inf"), None);
        assert_eq!(coerce_pnl("--5"), None);
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(Outcome::classify(Some(dec!(0.01))), Outcome::Win);
        assert_eq!(Outcome::classify(Some(dec!(-0.01))), Outcome::Loss);
        assert_eq!(Outcome::classify(Some(dec!(0))), Outcome::Breakeven);
        assert_eq!(Outcome::classify(None), Outcome::Breakeven);
    }
}
