//! Grouping transcripts into readable time windows.
//!
//! Timed lines are bucketed by a width that scales with the content length.
//! Free text is either split on bracketed `[MM:SS]` markers into fixed
//! three-minute windows, or chunked a few lines at a time when it has none.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    timestamp::{format_timestamp, parse_timestamp},
    types::TranscriptLine,
};

pub const FALLBACK_BUCKET_SECONDS: u64 = 120;
pub const MIN_BUCKET_SECONDS: u64 = 30;
pub const TEXT_WINDOW_SECONDS: u64 = 180;
pub const LINES_PER_SECTION: usize = 4;
pub const SECTION_WORD_LIMIT: usize = 50;

const ELLIPSIS: &str = "…";

/// Bucket width in seconds: 5% of the duration, at least 30s, 120s when the
/// duration is unknown.
pub fn compute_bucket_size(duration: f64) -> u64 {
    if duration.is_nan() || duration <= 0.0 {
        return FALLBACK_BUCKET_SECONDS;
    }
    // duration * 0.05, written as a division to stay exact on whole seconds
    ((duration / 20.0).floor() as u64).max(MIN_BUCKET_SECONDS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketItem {
    pub start: f64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub formatted_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucket {
    pub start: u64,
    pub end: u64,
    pub items: Vec<BucketItem>,
}

impl TimeBucket {
    pub fn label(&self) -> String {
        format!(
            "{}–{}",
            format_timestamp(self.start as f64),
            format_timestamp(self.end as f64)
        )
    }
}

/// Group timed lines into buckets ordered by start. Input order is kept
/// within a bucket.
pub fn bucket_transcript(lines: &[TranscriptLine], duration: f64) -> Vec<TimeBucket> {
    let size = compute_bucket_size(duration);
    let mut grouped: BTreeMap<u64, Vec<BucketItem>> = BTreeMap::new();

    for line in lines {
        let start = if line.start.is_finite() && line.start > 0.0 {
            line.start
        } else {
            0.0
        };
        let bucket_start = (start as u64 / size) * size;

        grouped.entry(bucket_start).or_default().push(BucketItem {
            start: line.start,
            text: line.text.clone(),
            duration: line.duration,
            formatted_timestamp: format_timestamp(start),
        });
    }

    tracing::debug!(
        lines = lines.len(),
        bucket_size = size,
        buckets = grouped.len(),
        "Bucketed transcript"
    );

    grouped
        .into_iter()
        .map(|(start, items)| TimeBucket {
            start,
            end: start.saturating_add(size),
            items,
        })
        .collect()
}

/// One displayable block of free-text transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSegment {
    pub label: String,
    /// Window start in seconds; `None` for untimed sections.
    pub start: Option<u64>,
    pub text: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextSegments {
    /// Lines seen before the first time marker.
    pub preamble: Option<String>,
    pub segments: Vec<TextSegment>,
}

/// Split a `[MM:SS] text` or `[H:MM:SS] text` line into seconds and text.
fn split_marker(line: &str) -> Option<(f64, &str)> {
    let rest = line.strip_prefix('[')?;
    let (marker, text) = rest.split_once(']')?;
    let seconds = parse_timestamp(marker)?;
    Some((seconds, text.trim()))
}

fn push_text(target: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

/// Segment raw transcript text that carries no structured timing.
pub fn segment_text(raw: &str) -> TextSegments {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.iter().any(|line| split_marker(line).is_some()) {
        segment_marked(&lines)
    } else {
        segment_unmarked(&lines)
    }
}

fn segment_marked(lines: &[&str]) -> TextSegments {
    let mut preamble = String::new();
    let mut windows: BTreeMap<u64, String> = BTreeMap::new();
    let mut current: Option<u64> = None;

    for line in lines {
        match split_marker(line) {
            Some((seconds, text)) => {
                let window = seconds.max(0.0) as u64 / TEXT_WINDOW_SECONDS;
                push_text(windows.entry(window).or_default(), text);
                current = Some(window);
            }
            None => match current {
                Some(window) => push_text(windows.entry(window).or_default(), line),
                None => push_text(&mut preamble, line),
            },
        }
    }

    let segments = windows
        .into_iter()
        .map(|(window, text)| {
            let start = window * TEXT_WINDOW_SECONDS;
            TextSegment {
                label: format!(
                    "{}–{}",
                    format_timestamp(start as f64),
                    format_timestamp(start.saturating_add(TEXT_WINDOW_SECONDS - 1) as f64)
                ),
                start: Some(start),
                text,
                truncated: false,
            }
        })
        .collect();

    TextSegments {
        preamble: (!preamble.is_empty()).then_some(preamble),
        segments,
    }
}

fn segment_unmarked(lines: &[&str]) -> TextSegments {
    let segments = lines
        .chunks(LINES_PER_SECTION)
        .enumerate()
        .map(|(i, chunk)| {
            let (text, truncated) = cap_words(&chunk.join(" "), SECTION_WORD_LIMIT);
            TextSegment {
                label: format!("Section {}", i + 1),
                start: None,
                text,
                truncated,
            }
        })
        .collect();

    TextSegments {
        preamble: None,
        segments,
    }
}

/// Keep at most `limit` whole words, marking the cut with an ellipsis.
pub fn cap_words(text: &str, limit: usize) -> (String, bool) {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return (words.join(" "), false);
    }
    (format!("{}{}", words[..limit].join(" "), ELLIPSIS), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(start: f64, text: &str) -> TranscriptLine {
        TranscriptLine {
            start,
            text: text.to_string(),
            duration: None,
        }
    }

    #[test]
    fn test_compute_bucket_size() {
        assert_eq!(compute_bucket_size(0.0), 120);
        assert_eq!(compute_bucket_size(-5.0), 120);
        assert_eq!(compute_bucket_size(f64::NAN), 120);
        assert_eq!(compute_bucket_size(100.0), 30);
        assert_eq!(compute_bucket_size(600.0), 30);
        assert_eq!(compute_bucket_size(1000.0), 50);
        assert_eq!(compute_bucket_size(10000.0), 500);
    }

    #[test]
    fn test_bucket_transcript() {
        let lines = vec![line(0.0, "Hello"), line(125.0, "World")];
        let buckets = bucket_transcript(&lines, 1000.0);

        assert_eq!(buckets.len(), 2);
        assert_eq!((buckets[0].start, buckets[0].end), (0, 50));
        assert_eq!((buckets[1].start, buckets[1].end), (100, 150));
        assert_eq!(buckets[0].items.len(), 1);
        assert_eq!(buckets[0].items[0].text, "Hello");
        assert_eq!(buckets[1].items[0].text, "World");
        assert_eq!(buckets[1].items[0].formatted_timestamp, "02:05");
        assert_eq!(buckets[1].label(), "01:40–02:30");
    }

    #[test]
    fn test_buckets_sorted_and_grouped() {
        let lines = vec![
            line(250.0, "late"),
            line(5.0, "early"),
            line(20.0, "early again"),
        ];
        let buckets = bucket_transcript(&lines, 0.0);

        let starts: Vec<u64> = buckets.iter().map(|b| b.start).collect();
        assert_eq!(starts, [0, 240]);
        let texts: Vec<&str> = buckets[0].items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, ["early", "early again"]);
        assert!(bucket_transcript(&[], 100.0).is_empty());
    }

    #[test]
    fn test_segment_marked_text() {
        let raw = "Welcome everyone\n\n[00:10] First point\nstill first\n[02:59] end of window\n[03:00] second window\n[1:00:00] an hour in";
        let result = segment_text(raw);

        assert_eq!(result.preamble.as_deref(), Some("Welcome everyone"));
        assert_eq!(result.segments.len(), 3);
        assert_eq!(result.segments[0].label, "00:00–02:59");
        assert_eq!(
            result.segments[0].text,
            "First point still first end of window"
        );
        assert_eq!(result.segments[1].label, "03:00–05:59");
        assert_eq!(result.segments[1].start, Some(180));
        assert_eq!(result.segments[2].label, "01:00:00–01:02:59");
    }

    #[test]
    fn test_unparsable_marker_is_plain_text() {
        let result = segment_text("[intro] hello\nworld");
        assert_eq!(result.preamble, None);
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].label, "Section 1");
        assert_eq!(result.segments[0].text, "[intro] hello world");
    }

    #[test]
    fn test_segment_unmarked_text() {
        let raw = "one\ntwo\nthree\nfour\nfive\n";
        let result = segment_text(raw);

        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[0].label, "Section 1");
        assert_eq!(result.segments[0].text, "one two three four");
        assert_eq!(result.segments[1].label, "Section 2");
        assert_eq!(result.segments[1].text, "five");
        assert!(segment_text("  \n\n").segments.is_empty());
    }

    #[test]
    fn test_section_text_capped_at_word_boundary() {
        let long_line = (1..=60).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let result = segment_text(&long_line);
        let segment = &result.segments[0];

        assert!(segment.truncated);
        assert!(segment.text.ends_with("word50…"));
        assert_eq!(segment.text.split_whitespace().count(), 50);
    }

    #[test]
    fn test_huge_start_saturates_bucket_end() {
        let buckets = bucket_transcript(&[line(1e20, "far out")], 600.0);

        assert_eq!(buckets.len(), 1);
        assert!(buckets[0].end >= buckets[0].start);
        assert_eq!(buckets[0].end, u64::MAX);
        assert_eq!(buckets[0].items[0].text, "far out");
        assert!(!buckets[0].label().is_empty());
    }

    #[test]
    fn test_huge_marker_saturates_window_label() {
        let result = segment_text("[18446744073709551615] hi");

        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].text, "hi");
        assert!(result.segments[0].start.is_some());
    }

    #[test]
    fn test_cap_words_short_text() {
        assert_eq!(cap_words("a  b c", 5), ("a b c".to_string(), false));
    }
}
