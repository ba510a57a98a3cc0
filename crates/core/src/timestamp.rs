//! Conversion between a time position and its two representations: a second
//! count and a clock string (`MM:SS` or `HH:MM:SS`).

use serde::{Deserialize, Serialize};

/// A time position as it arrives from a payload or from the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeInput {
    Seconds(f64),
    Text(String),
}

impl TimeInput {
    /// Seconds this input denotes, or `None` when it cannot be read as a position.
    pub fn seconds(&self) -> Option<f64> {
        match self {
            TimeInput::Seconds(value) => parse_number(*value),
            TimeInput::Text(text) => parse_text(text),
        }
    }

    /// Clock form of this input. Unparsable text is returned as-is.
    pub fn display(&self) -> String {
        match self.seconds() {
            Some(seconds) => format_timestamp(seconds),
            None => match self {
                TimeInput::Text(text) => text.trim().to_string(),
                TimeInput::Seconds(_) => String::new(),
            },
        }
    }
}

impl From<f64> for TimeInput {
    fn from(value: f64) -> Self {
        TimeInput::Seconds(value)
    }
}

impl From<i32> for TimeInput {
    fn from(value: i32) -> Self {
        TimeInput::Seconds(value as f64)
    }
}

impl From<i64> for TimeInput {
    fn from(value: i64) -> Self {
        TimeInput::Seconds(value as f64)
    }
}

impl From<u32> for TimeInput {
    fn from(value: u32) -> Self {
        TimeInput::Seconds(value as f64)
    }
}

impl From<u64> for TimeInput {
    fn from(value: u64) -> Self {
        TimeInput::Seconds(value as f64)
    }
}

impl From<&str> for TimeInput {
    fn from(value: &str) -> Self {
        TimeInput::Text(value.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(value: String) -> Self {
        TimeInput::Text(value)
    }
}

impl From<&TimeInput> for TimeInput {
    fn from(value: &TimeInput) -> Self {
        value.clone()
    }
}

/// Parse a time position into seconds.
///
/// Numbers pass through unchanged (fractions included). Text is either a bare
/// second count or `[hours:]minutes:seconds`, folded left to right as
/// `acc * 60 + part`. Anything else yields `None`, never zero.
pub fn parse_timestamp(input: impl Into<TimeInput>) -> Option<f64> {
    input.into().seconds()
}

fn parse_number(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn parse_text(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let groups: Vec<&str> = text.split(':').collect();
    if groups.len() > 3 {
        return None;
    }

    groups
        .iter()
        .try_fold(0u64, |acc, group| {
            let part = parse_group(group)?;
            acc.checked_mul(60)?.checked_add(part)
        })
        .map(|total| total as f64)
}

fn parse_group(group: &str) -> Option<u64> {
    if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    group.parse().ok()
}

/// Format seconds as `MM:SS`, or `HH:MM:SS` once an hour is reached.
/// Negative or non-finite input formats as the empty string.
pub fn format_timestamp(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return String::new();
    }

    let total = seconds.floor() as u64;
    let minutes = total / 60;
    let secs = total % 60;
    let hours = minutes / 60;
    let mm = minutes % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mm, secs)
    } else {
        format!("{:02}:{:02}", mm, secs)
    }
}

/// Format an optional position; `None` formats as the empty string.
pub fn format_position(position: Option<f64>) -> String {
    position.map(format_timestamp).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_forms() {
        assert_eq!(parse_timestamp("1:02:03"), Some(3723.0));
        assert_eq!(parse_timestamp("02:05"), Some(125.0));
        assert_eq!(parse_timestamp("125"), Some(125.0));
        assert_eq!(parse_timestamp(" 7:00 "), Some(420.0));
    }

    #[test]
    fn test_parse_numbers_pass_through() {
        assert_eq!(parse_timestamp(125), Some(125.0));
        assert_eq!(parse_timestamp(12.75), Some(12.75));
        assert_eq!(parse_timestamp(f64::NAN), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp("abc"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("1:xx"), None);
        assert_eq!(parse_timestamp("1::2"), None);
        assert_eq!(parse_timestamp("1:2:3:4"), None);
        assert_eq!(parse_timestamp("-5"), None);
        assert_eq!(parse_timestamp("1.5"), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(65.0), "01:05");
        assert_eq!(format_timestamp(65.9), "01:05");
        assert_eq!(format_timestamp(3723.0), "01:02:03");
        assert_eq!(format_timestamp(-1.0), "");
        assert_eq!(format_position(None), "");
        assert_eq!(format_position(Some(59.0)), "00:59");
    }

    #[test]
    fn test_round_trip() {
        let samples = (0..20_000u64).chain([86_399, 86_400, 359_999, 360_000, 1_000_000]);
        for n in samples {
            let formatted = format_timestamp(n as f64);
            assert_eq!(parse_timestamp(formatted.as_str()), Some(n as f64), "{formatted}");
        }
    }

    #[test]
    fn test_time_input_display() {
        assert_eq!(TimeInput::from(90).display(), "01:30");
        assert_eq!(TimeInput::from("1:30").display(), "01:30");
        assert_eq!(TimeInput::from("intro").display(), "intro");
    }

    #[test]
    fn test_time_input_deserializes_untagged() {
        let number: TimeInput = serde_json::from_str("42").unwrap();
        let text: TimeInput = serde_json::from_str("\"0:42\"").unwrap();
        assert_eq!(number.seconds(), Some(42.0));
        assert_eq!(text.seconds(), Some(42.0));
    }
}
