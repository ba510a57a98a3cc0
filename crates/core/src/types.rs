use serde::{Deserialize, Serialize};

use crate::{
    mindmap::MindmapNode,
    source::{Origin, SourceKind},
    timestamp::TimeInput,
};

/// Canonical view-model of one analysis. Every container field is always a
/// container after normalization, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentResult {
    pub title: String,
    pub channel: String,
    pub overview: String,
    #[serde(rename = "type")]
    pub source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub tags: Vec<String>,
    pub terminologies: Vec<Term>,
    pub major_points: Vec<Point>,
    pub chapters: Vec<Point>,
    pub mindmap: Vec<MindmapNode>,
    pub flashcards: Vec<Flashcard>,
    pub quiz: Vec<QuizItem>,
    pub transcript: Vec<TranscriptLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl ContentResult {
    /// Whether this result was produced for the currently selected source kind.
    pub fn matches(&self, selected: SourceKind) -> bool {
        self.origin.as_ref().is_some_and(|origin| origin.kind == selected)
    }

    /// Known content length in seconds, or `0.0` when the payload did not say.
    pub fn duration_seconds(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub term: String,
    pub definition: String,
}

/// A chapter or major point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimeInput>,
}

impl Point {
    pub fn seconds(&self) -> Option<f64> {
        self.timestamp.as_ref().and_then(TimeInput::seconds)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub choices: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub start: f64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}
