//! crates/logging/src/record.rs
//! Line rendering for emitted records.

use serde::Serialize;

use crate::severity::Severity;

#[derive(Serialize)]
struct JsonRecord<'a> {
    level: Severity,
    category: &'a str,
    message: &'a str,
}

/// Renders one line without a trailing newline.
///
/// JSON lines are objects with `level`, `category` and `message` keys. Text
/// lines are tab separated: `LEVEL`, the category when non-empty, then the
/// message.
///
/// ```
/// use logging::{render_line, Severity};
///
/// assert_eq!(render_line(false, Severity::Warning, "net", "slow"), "WARN\tnet\tslow");
/// assert_eq!(render_line(false, Severity::Info, "", "ready"), "INFO\tready");
/// assert_eq!(
///     render_line(true, Severity::Info, "main", "ready"),
///     r#"{"level":"info","category":"main","message":"ready"}"#
/// );
/// ```
#[must_use]
pub fn render_line(json: bool, severity: Severity, category: &str, message: &str) -> String {
    if json {
        let record = JsonRecord {
            level: severity,
            category,
            message,
        };
        if let Ok(line) = serde_json::to_string(&record) {
            return line;
        }
    }

    if category.is_empty() {
        format!("{}\t{message}", severity.label())
    } else {
        format!("{}\t{category}\t{message}", severity.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_line_uses_short_labels() {
        assert_eq!(
            render_line(false, Severity::Critical, "disk", "full"),
            "CRIT\tdisk\tfull"
        );
        assert_eq!(
            render_line(false, Severity::Debug, "net", "dial"),
            "DBG\tnet\tdial"
        );
    }

    #[test]
    fn json_line_escapes_message() {
        let line = render_line(true, Severity::Error, "auth", "bad \"token\"\n");
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["category"], "auth");
        assert_eq!(value["message"], "bad \"token\"\n");
        assert!(!line.contains('\n'));
    }
}
