//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.
//! `tracing` takes field names as literal identifiers, so emit sites spell
//! the key out and readers of captured events look it up through these
//! constants. Every key listed here is emitted by at least one operation.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Snapshot identifiers
pub const FIELD_DIR: &str = "dir";
pub const FIELD_PACKAGE: &str = "package";
pub const FIELD_FILE_COUNT: &str = "file_count";

// Report and filter sizes
pub const FIELD_BREAKING_COUNT: &str = "breaking_count";
pub const FIELD_ADDITIVE_COUNT: &str = "additive_count";
pub const FIELD_FILTER: &str = "filter";
pub const FIELD_REMOVED: &str = "removed";

// Version classification
pub const FIELD_PREVIOUS_VERSION: &str = "previous_version";
pub const FIELD_NEW_VERSION: &str = "new_version";
pub const FIELD_LABEL: &str = "label";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_PASS: &str = "pass";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        let events = [EVENT_START, EVENT_END, EVENT_END_ERROR, EVENT_PASS];
        for (i, a) in events.iter().enumerate() {
            for b in &events[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
