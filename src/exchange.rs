//! Direct-rate currency conversion.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One directed conversion: `amount * rate` of `to` per `amount` of `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub from_currency_id: String,
    pub to_currency_id: String,
    pub rate: Decimal,
}

/// First rate defined for the exact `from -> to` direction.
///
/// Rates are not inverted or chained.
pub fn find_direct_rate<'a>(
    rates: &'a [ExchangeRate],
    from: &str,
    to: &str,
) -> Option<&'a ExchangeRate> {
    rates
        .iter()
        .find(|r| r.from_currency_id == from && r.to_currency_id == to)
}

pub fn convert_by_direct_rate(
    rates: &[ExchangeRate],
    amount: Decimal,
    from: &str,
    to: &str,
) -> Option<Decimal> {
    if from == to {
        return Some(amount);
    }
    find_direct_rate(rates, from, to).map(|r| amount * r.rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> Vec<ExchangeRate> {
        vec![
            ExchangeRate {
                from_currency_id: "crystal".to_string(),
                to_currency_id: "primogem".to_string(),
                rate: Decimal::ONE,
            },
            ExchangeRate {
                from_currency_id: "gold".to_string(),
                to_currency_id: "primogem".to_string(),
                rate: Decimal::new(25, 1),
            },
        ]
    }

    #[test]
    fn test_identity_converts_without_rate() {
        assert_eq!(
            convert_by_direct_rate(&[], Decimal::from(42), "gem", "gem"),
            Some(Decimal::from(42))
        );
    }

    #[test]
    fn test_direct_rate_multiplies() {
        assert_eq!(
            convert_by_direct_rate(&rates(), Decimal::from(10), "gold", "primogem"),
            Some(Decimal::from(25))
        );
    }

    #[test]
    fn test_rates_are_directional() {
        assert!(find_direct_rate(&rates(), "primogem", "gold").is_none());
        assert_eq!(
            convert_by_direct_rate(&rates(), Decimal::from(10), "primogem", "crystal"),
            None
        );
    }

    #[test]
    fn test_rate_json_shape() {
        let rate: ExchangeRate = serde_json::from_str(
            r#"{"fromCurrencyId":"a","toCurrencyId":"b","rate":"0.5"}"#,
        )
        .unwrap();
        assert_eq!(rate.rate, Decimal::new(5, 1));
    }
}
