//! Profit figures and currency display

/// Profit for one sale line.
///
/// A missing purchase price counts as 0 and a missing quantity as 1, so
/// incomplete legacy sales still show up instead of failing the listing.
pub fn profit(sale_price: f64, purchase_price: Option<f64>, quantity: Option<u32>) -> f64 {
    let purchase = purchase_price.unwrap_or(0.0);
    let quantity = quantity.unwrap_or(1);
    (sale_price - purchase) * f64::from(quantity)
}

/// Format a value as Brazilian reais, e.g. `R$ 1.234,56`
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, group_thousands(cents / 100), cents % 100)
}

/// Format a percentage with a comma decimal separator, e.g. `40,02%`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value).replace('.', ",")
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push('.');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_defaults() {
        assert_eq!(profit(10.0, None, None), 10.0);
    }

    #[test]
    fn test_profit_full_record() {
        assert_eq!(profit(12.5, Some(7.5), Some(4)), 20.0);
    }

    #[test]
    fn test_profit_can_be_negative() {
        assert_eq!(profit(5.0, Some(8.0), Some(2)), -6.0);
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(6.9), "R$ 6,90");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(-45.5), "-R$ 45,50");
    }

    #[test]
    fn test_format_brl_rounds_to_cents() {
        assert_eq!(format_brl(0.005), "R$ 0,01");
        assert_eq!(format_brl(-0.001), "R$ 0,00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(40.0166), "40,02%");
    }
}
