//! Text normalization ahead of pattern matching: lowercase,
//! collapse whitespace, expand a small fixed table of abbreviations that are
//! safe to expand without disturbing a pattern's own keyword list.

/// Abbreviations expanded unconditionally. Deliberately conservative: none of
/// these collide with a pattern keyword (e.g. "iot" and "v2x" are left alone
/// because they are themselves keywords).
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("w/", "with"),
    ("e.g.", "for example"),
    ("i.e.", "that is"),
    (" & ", " and "),
];

pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut expanded = lower;
    for (abbr, full) in ABBREVIATIONS {
        expanded = expanded.replace(abbr, full);
    }
    expanded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_lowercases() {
        assert_eq!(normalize("  Emergency   Ambulance\tDispatch "), "emergency ambulance dispatch");
    }

    #[test]
    fn expands_known_abbreviations() {
        assert_eq!(normalize("connect w/ 5 sensors"), "connect with 5 sensors");
    }

    #[test]
    fn leaves_pattern_keywords_untouched() {
        let n = normalize("IoT sensors and V2X platooning");
        assert!(n.contains("iot"));
        assert!(n.contains("v2x"));
    }
}
