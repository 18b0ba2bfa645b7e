//! Cell value coercion helpers.

/// Parses boolean-like text. Returns `None` for text that is neither.
///
/// Empty text is `false`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "1.0" | "si" | "sí" | "s" | "yes" | "y" | "verdadero" | "x" => Some(true),
        "false" | "0" | "0.0" | "no" | "n" | "falso" | "" => Some(false),
        _ => None,
    }
}

/// Parses numeric text. Invalid, empty or non-finite values become zero.
pub fn parse_number(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Converts a coerced number to a non-negative count.
pub(crate) fn to_count(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
