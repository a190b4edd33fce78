//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output. Results go to stdout,
//! diagnostics to stderr, so piping a digest into another tool stays clean.

use owo_colors::OwoColorize;
use shopify_guards_core::validation::ValidationResult;
use shopify_guards_core::Error;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `key: value` line
    pub fn field(key: &str, value: &str) {
        println!("  {:<20} {}", format!("{}:", key).dimmed(), value);
    }
}

/// Print an error with its code, context and suggestion to stderr
pub fn report_error(err: &Error) {
    Status::error(&format!("{} {}", err.code.to_string().dimmed(), err.message));
    if let Some(context) = &err.context {
        eprintln!("  {}", context.dimmed());
    }
    if let Some(suggestion) = &err.suggestion {
        eprintln!("  {} {}", "hint:".cyan(), suggestion);
    }
}

/// Print every error and warning in a validation result
pub fn report_validation(result: &ValidationResult) {
    for error in result.errors() {
        Status::error(&error.to_string());
    }
    for warning in result.warnings() {
        Status::warning(&warning.to_string());
    }
}

/// One-line verdict for a validation result
pub fn validation_summary(result: &ValidationResult) -> String {
    format!(
        "{}, {}",
        format_count(result.errors().len(), "error", "errors"),
        format_count(result.warnings().len(), "warning", "warnings")
    )
}

/// Describe a secret without revealing it
pub fn describe_secret(len: usize) -> String {
    if len == 0 {
        "not set".to_string()
    } else {
        format!("set ({})", format_count(len, "byte", "bytes"))
    }
}

/// Format a leeway in seconds for display
pub fn format_leeway(secs: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = MINUTE * 60;
    const DAY: u64 = HOUR * 24;

    if secs >= DAY && secs % DAY == 0 {
        format_count((secs / DAY) as usize, "day", "days")
    } else if secs >= HOUR && secs % HOUR == 0 {
        format_count((secs / HOUR) as usize, "hour", "hours")
    } else if secs >= MINUTE && secs % MINUTE == 0 {
        format_count((secs / MINUTE) as usize, "minute", "minutes")
    } else {
        format_count(secs as usize, "second", "seconds")
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopify_guards_core::config::SettingsOverrides;
    use shopify_guards_core::validation::validate_settings;

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "error", "errors"), "1 error");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(0, "error", "errors"), "0 errors");
        assert_eq!(format_count(5, "error", "errors"), "5 errors");
    }

    #[test]
    fn test_format_leeway() {
        assert_eq!(format_leeway(86_400), "1 day");
        assert_eq!(format_leeway(172_800), "2 days");
        assert_eq!(format_leeway(3_600), "1 hour");
        assert_eq!(format_leeway(300), "5 minutes");
        assert_eq!(format_leeway(90), "90 seconds");
        assert_eq!(format_leeway(0), "0 seconds");
    }

    #[test]
    fn test_describe_secret() {
        assert_eq!(describe_secret(0), "not set");
        assert_eq!(describe_secret(32), "set (32 bytes)");
    }

    #[test]
    fn test_validation_summary() {
        let settings = SettingsOverrides::new().api_secret_key("").resolve();
        let result = validate_settings(&settings);
        assert_eq!(validation_summary(&result), "1 error, 0 warnings");
    }
}
