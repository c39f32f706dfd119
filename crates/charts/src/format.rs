// In crates/charts/src/format.rs

/// Formats a number with en-US thousands grouping and exactly two decimals.
///
/// `1234.5` becomes `1,234.50`, `-1000000` becomes `-1,000,000.00`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Two decimals without grouping, as metric tiles show them.
pub fn format_fixed(value: f64) -> String {
    format!("{:.2}", value)
}

/// A fraction shown as a percentage with two decimals: `0.5234` → `52.34%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Tooltip text for a line or bar point: `Balance: 10,250.00`.
pub fn tooltip_label(dataset_label: &str, value: f64) -> String {
    if dataset_label.is_empty() {
        format_amount(value)
    } else {
        format!("{}: {}", dataset_label, format_amount(value))
    }
}

/// Tooltip text for a distribution wedge: `Wins: 12 (60.0%)`.
pub fn distribution_tooltip(label: &str, count: usize, total: usize) -> String {
    let pct = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    };
    format!("{}: {} ({:.1}%)", label, count, pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.994), "999.99");
        assert_eq!(format_amount(1234.5), "1,234.50");
        assert_eq!(format_amount(-1_000_000.0), "-1,000,000.00");
        assert_eq!(format_amount(123456.789), "123,456.79");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn test_tooltips() {
        assert_eq!(tooltip_label("Balance", 10250.0), "Balance: 10,250.00");
        assert_eq!(tooltip_label("", -3.5), "-3.50");
        assert_eq!(distribution_tooltip("Wins", 12, 20), "Wins: 12 (60.0%)");
        assert_eq!(distribution_tooltip("Losses", 0, 0), "Losses: 0 (0.0%)");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(0.5234), "52.34%");
        assert_eq!(format_percent(0.0), "0.00%");
    }
}
