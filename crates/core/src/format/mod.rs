//! Fixed-precision number formatting shared by the view-model builders

/// Fixed-point formatting that never renders negative zero
pub fn fixed(value: f64, places: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    let text = format!("{:.*}", places, value);
    // -0.001 rounds to "-0.00"; keep the sign only when a non-zero digit survives
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

/// Ratio with three decimals (sharpe, alpha, beta)
pub fn ratio(value: f64) -> String {
    fixed(value, 3)
}

/// Percentage with two decimals, no sign prefix
pub fn percent(value: f64) -> String {
    format!("{}%", fixed(value, 2))
}

/// Percentage with two decimals and an explicit `+` unless the rendered
/// value is negative; values that round to zero read `+0.00%`
pub fn signed_percent(value: f64) -> String {
    with_sign(fixed(value, 2)) + "%"
}

/// Prefix `+` when the rendered text carries no minus sign
fn with_sign(text: String) -> String {
    if text.starts_with('-') {
        text
    } else {
        format!("+{}", text)
    }
}

/// Health score rounded half away from zero, as `N/100`
pub fn health_label(score: f64) -> String {
    format!("{}/100", score.round() as i64)
}

/// Indian rupee amount with en-IN digit grouping, e.g. `₹1,23,456.78`
pub fn currency(value: f64) -> String {
    let text = fixed(value, 2);
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    let grouped = group_indian(int_part);
    if negative {
        format!("-₹{}.{}", grouped, frac_part)
    } else {
        format!("₹{}.{}", grouped, frac_part)
    }
}

/// Currency with an explicit `+` unless the rendered amount is negative
pub fn signed_currency(value: f64) -> String {
    with_sign(currency(value))
}

/// Last three digits, then groups of two
fn group_indian(int_part: &str) -> String {
    if int_part.len() <= 3 {
        return int_part.to_string();
    }
    let (head, tail) = int_part.split_at(int_part.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_drops_negative_zero() {
        assert_eq!(fixed(-0.0, 2), "0.00");
        assert_eq!(fixed(-0.001, 2), "0.00");
        assert_eq!(fixed(-0.5, 2), "-0.50");
        assert_eq!(fixed(0.0, 3), "0.000");
    }

    #[test]
    fn test_signed_percent() {
        assert_eq!(signed_percent(0.0), "+0.00%");
        assert_eq!(signed_percent(12.346), "+12.35%");
        assert_eq!(signed_percent(-3.2), "-3.20%");
    }

    #[test]
    fn test_sign_follows_rounded_value() {
        assert_eq!(signed_percent(-0.001), "+0.00%");
        assert_eq!(signed_percent(-0.004), "+0.00%");
        assert_eq!(signed_percent(-0.006), "-0.01%");
        assert_eq!(signed_currency(-0.001), "+₹0.00");
    }

    #[test]
    fn test_health_label_rounds() {
        assert_eq!(health_label(72.5), "73/100");
        assert_eq!(health_label(0.0), "0/100");
        assert_eq!(health_label(39.4), "39/100");
    }

    #[test]
    fn test_currency_grouping() {
        assert_eq!(currency(0.0), "₹0.00");
        assert_eq!(currency(999.5), "₹999.50");
        assert_eq!(currency(1500.0), "₹1,500.00");
        assert_eq!(currency(123456.789), "₹1,23,456.79");
        assert_eq!(currency(12345678.0), "₹1,23,45,678.00");
        assert_eq!(currency(-200.0), "-₹200.00");
    }

    #[test]
    fn test_signed_currency() {
        assert_eq!(signed_currency(200.0), "+₹200.00");
        assert_eq!(signed_currency(0.0), "+₹0.00");
        assert_eq!(signed_currency(-1234.5), "-₹1,234.50");
    }
}
