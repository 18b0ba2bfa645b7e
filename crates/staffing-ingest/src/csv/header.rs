//! CSV header normalization.

/// Normalizes a header value: trims it, drops a stray byte-order mark and
/// joins internal whitespace runs with a single underscore.
///
/// `"Camas Utiles"` becomes `"Camas_Utiles"`.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Normalizes a data cell by trimming whitespace and any byte-order mark.
pub(crate) fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}
