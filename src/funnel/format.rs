//! Display helpers: Brazilian real, whole units, `.` as thousands separator.

/// Format a currency amount as "R$ 240.500" (zero decimal places).
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "R$ 0".to_string();
    }
    let rounded = value.round();
    let grouped = group_digits(&format!("{:.0}", rounded.abs()));
    if rounded < 0.0 {
        format!("-R$ {grouped}")
    } else {
        format!("R$ {grouped}")
    }
}

/// Group an integer count, e.g. 12325232 → "12.325.232".
pub fn format_number(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Percent with one decimal, e.g. "66,3%".
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0,0%".to_string();
    }
    format!("{value:.1}%").replace('.', ",")
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
