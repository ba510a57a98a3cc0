use crate::{
    timestamp::format_timestamp,
    types::{ContentResult, Point, TranscriptLine},
};

/// Format transcript lines with timestamps, one per line
pub fn format_transcript_with_timestamps(lines: &[TranscriptLine]) -> String {
    lines
        .iter()
        .map(|line| format!("[{}] {}", format_timestamp(line.start.max(0.0)), line.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn point_heading(point: &Point) -> String {
    let stamp = point
        .timestamp
        .as_ref()
        .map(|t| t.display())
        .filter(|t| !t.is_empty());
    match stamp {
        Some(stamp) => format!("[{}] {}", stamp, point.title),
        None => point.title.clone(),
    }
}

/// Format a content result as human-readable markdown
pub fn format_report_readable(result: &ContentResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", result.title));

    let mut meta = vec![format!("**Source:** {}", result.source)];
    if !result.channel.is_empty() {
        meta.push(format!("**Channel:** {}", result.channel));
    }
    if let Some(duration) = result.duration {
        meta.push(format!("**Duration:** {}", format_timestamp(duration)));
    }
    output.push_str(&meta.join(" | "));
    output.push_str("\n\n");

    if !result.tags.is_empty() {
        output.push_str(&format!("{}\n\n", result.tags.join(", ")));
    }

    output.push_str("## Overview\n\n");
    output.push_str(&result.overview);
    output.push_str("\n\n");

    let points = if result.chapters.is_empty() {
        &result.major_points
    } else {
        &result.chapters
    };
    if !points.is_empty() {
        output.push_str("## Chapters\n\n");
        for point in points {
            output.push_str(&format!("### {}\n\n", point_heading(point)));
            output.push_str(&format!("{}\n\n", point.summary));
        }
    }

    if !result.terminologies.is_empty() {
        output.push_str("## Key Terms\n\n");
        for term in &result.terminologies {
            if term.term.is_empty() {
                output.push_str(&format!("• {}\n", term.definition));
            } else {
                output.push_str(&format!("• **{}**: {}\n", term.term, term.definition));
            }
        }
        output.push('\n');
    }

    if let Some(lyrics) = &result.lyrics {
        output.push_str("## Lyrics\n\n");
        output.push_str(lyrics);
        output.push_str("\n\n");
    }

    if let Some(analysis) = &result.song_analysis {
        output.push_str("## Analysis\n\n");
        output.push_str(analysis);
        output.push('\n');
    }

    output
}
