use chrono::{Local, NaiveDate};

/// Today's local date as `YYYY-MM-DD`
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Case-insensitive substring test. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive equality, folded the same way as `contains_ignore_case`.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        d.format("%b %d, %Y").to_string()
    } else {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Joanna", "ANN"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("Bob", "ann"));
    }

    #[test]
    fn test_eq_ignore_case_folds_unicode() {
        assert!(eq_ignore_case("ÅSA@Hostel.test", "åsa@hostel.test"));
        assert!(contains_ignore_case("ÅSA@Hostel.test", "åsa"));
        assert!(!eq_ignore_case("asa@hostel.test", "åsa@hostel.test"));
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-01"), "Jan 01, 2024");
        assert_eq!(format_date("2024-03-05T10:00:00Z"), "Mar 05, 2024");
        assert_eq!(format_date("1/1/2024"), "1/1/2024");
    }

    #[test]
    fn test_today_is_iso_date() {
        let t = today();
        assert!(NaiveDate::parse_from_str(&t, "%Y-%m-%d").is_ok());
    }
}
