//! Utility functions and helpers

/// Format a USD amount with thousands grouping and two decimals, e.g. `$1,234.50`
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

/// Format a percentage change with an explicit sign, e.g. `+3.21%` / `-2.57%`
pub fn format_percent_change(change: f64) -> String {
    // -0.0 would otherwise print as "+-0.00%"
    let change = if change == 0.0 { 0.0 } else { change };
    if change >= 0.0 {
        format!("+{:.2}%", change)
    } else {
        format!("{:.2}%", change)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(67000.5), "$67,000.50");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_usd(-42.1), "-$42.10");
    }

    #[test]
    fn test_format_percent_change() {
        assert_eq!(format_percent_change(-2.567), "-2.57%");
        assert_eq!(format_percent_change(3.21), "+3.21%");
        assert_eq!(format_percent_change(0.0), "+0.00%");
        assert_eq!(format_percent_change(-0.0), "+0.00%");
    }
}
