//! Priority extraction by keyword precedence. Checked in
//! order: low-priority phrasing first (some of it embeds the word "critical",
//! e.g. "non-critical", so it must be excluded before the critical check
//! runs), then critical, then high, defaulting to medium.

use mano_types::Priority;

const LOW_KEYWORDS: &[&str] = &["non-critical", "low priority", "background", "best-effort", "best effort"];
const CRITICAL_KEYWORDS: &[&str] = &["critical", "emergency", "911", "life-threatening", "urgent"];
const HIGH_KEYWORDS: &[&str] = &["high priority", "asap", "important", "priority"];

pub fn extract_priority(normalized_text: &str) -> Priority {
    if LOW_KEYWORDS.iter().any(|k| normalized_text.contains(k)) {
        return Priority::Low;
    }
    if CRITICAL_KEYWORDS.iter().any(|k| normalized_text.contains(k)) {
        return Priority::Critical;
    }
    if HIGH_KEYWORDS.iter().any(|k| normalized_text.contains(k)) {
        return Priority::High;
    }
    Priority::Medium
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_text_is_critical() {
        assert_eq!(extract_priority("emergency ambulance dispatch"), Priority::Critical);
    }

    #[test]
    fn non_critical_phrase_is_not_critical() {
        assert_eq!(extract_priority("a non-critical background sync job"), Priority::Low);
    }

    #[test]
    fn unmarked_text_defaults_to_medium() {
        assert_eq!(extract_priority("connect ten sensors to the gateway"), Priority::Medium);
    }

    #[test]
    fn asap_is_high() {
        assert_eq!(extract_priority("deploy this asap please"), Priority::High);
    }
}
