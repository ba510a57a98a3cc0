//! The single boundary where loosely shaped service JSON becomes a
//! [`ContentResult`]. Every function here is total: absent, null, scalar or
//! already-correct input all produce a value, never an error.

use serde_json::{Map, Value, json};

use crate::{
    mindmap::MindmapNode,
    source::{Origin, SourceKind, extract_video_id},
    timestamp::{TimeInput, parse_timestamp},
    types::{ContentResult, Flashcard, Point, QuizItem, Term, TranscriptLine},
};

static NULL: Value = Value::Null;

/// Arrays pass through, null becomes empty, any other value is wrapped.
pub fn to_sequence(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// Like [`to_sequence`], but a bare scalar becomes a synthetic term whose
/// definition is the scalar's text.
pub fn to_term_sequence(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(_) => vec![value.clone()],
        Value::Null => Vec::new(),
        Value::String(text) if text.trim().is_empty() => Vec::new(),
        other => vec![json!({ "term": "", "definition": string_of(other) })],
    }
}

/// Arrays are already a forest, a single object is a one-tree forest, and
/// every other shape is an empty forest.
pub fn to_forest(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(_) => vec![value.clone()],
        _ => Vec::new(),
    }
}

/// Points given as bare text keep the text as their summary.
fn to_point_sequence(value: &Value) -> Vec<Value> {
    match value {
        Value::String(text) if text.trim().is_empty() => Vec::new(),
        Value::String(text) => vec![json!({ "title": "", "summary": text })],
        other => to_sequence(other),
    }
}

fn string_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// First present, non-null field among `keys`.
fn field<'a>(object: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter()
        .filter_map(|key| object.get(key))
        .find(|value| !value.is_null())
        .unwrap_or(&NULL)
}

fn text_field(object: &Value, keys: &[&str]) -> String {
    string_of(field(object, keys)).trim().to_string()
}

fn optional_text(object: &Value, keys: &[&str]) -> Option<String> {
    Some(text_field(object, keys)).filter(|text| !text.is_empty())
}

fn time_field(object: &Value, keys: &[&str]) -> Option<TimeInput> {
    match field(object, keys) {
        Value::Number(n) => n.as_f64().map(TimeInput::Seconds),
        Value::String(text) if !text.trim().is_empty() => Some(TimeInput::Text(text.clone())),
        _ => None,
    }
}

fn number_field(object: &Value, keys: &[&str]) -> Option<f64> {
    match field(object, keys) {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => parse_timestamp(text.as_str()),
        _ => None,
    }
}

fn decode_tags(value: &Value) -> Vec<String> {
    to_sequence(value)
        .iter()
        .filter(|item| !item.is_object() && !item.is_array())
        .map(|item| string_of(item).trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn decode_terms(value: &Value) -> Vec<Term> {
    to_term_sequence(value)
        .iter()
        .filter_map(|item| match item {
            Value::Object(_) => Some(Term {
                term: text_field(item, &["term", "name", "title"]),
                definition: text_field(item, &["definition", "meaning", "description"]),
            }),
            Value::Null => None,
            other => Some(Term {
                term: String::new(),
                definition: string_of(other),
            }),
        })
        .collect()
}

fn decode_points(value: &Value) -> Vec<Point> {
    to_point_sequence(value)
        .iter()
        .filter_map(|item| match item {
            Value::Object(_) => Some(Point {
                title: text_field(item, &["title", "name", "heading"]),
                summary: text_field(item, &["summary", "description", "content"]),
                timestamp: time_field(item, &["timestamp", "time", "start"]),
            }),
            Value::Null => None,
            other => Some(Point {
                summary: string_of(other),
                ..Point::default()
            }),
        })
        .collect()
}

fn decode_flashcards(value: &Value) -> Vec<Flashcard> {
    to_sequence(value)
        .iter()
        .filter(|item| item.is_object())
        .map(|item| Flashcard {
            question: text_field(item, &["question", "front", "q"]),
            answer: text_field(item, &["answer", "back", "a"]),
        })
        .collect()
}

fn decode_quiz(value: &Value) -> Vec<QuizItem> {
    to_sequence(value)
        .iter()
        .filter(|item| item.is_object())
        .map(|item| {
            let choices: Vec<String> = to_sequence(field(item, &["choices", "options"]))
                .iter()
                .map(string_of)
                .collect();
            // an integer answer is read as an index into the choices
            let answer = match field(item, &["answer", "correct", "correct_answer"]) {
                Value::Number(n) => n
                    .as_u64()
                    .and_then(|index| choices.get(index as usize).cloned())
                    .unwrap_or_else(|| n.to_string()),
                other => string_of(other),
            };
            QuizItem {
                question: text_field(item, &["question", "q"]),
                choices,
                answer,
            }
        })
        .collect()
}

fn decode_transcript(value: &Value) -> Vec<TranscriptLine> {
    to_sequence(value)
        .iter()
        .filter_map(|item| match item {
            Value::Object(_) => Some(TranscriptLine {
                start: number_field(item, &["start", "offset", "time"]).unwrap_or(0.0),
                text: text_field(item, &["text", "content"]),
                duration: number_field(item, &["duration", "dur"]),
            }),
            Value::Null => None,
            other => Some(TranscriptLine {
                start: 0.0,
                text: string_of(other),
                duration: None,
            }),
        })
        .collect()
}

fn decode_node(value: &Value) -> Option<MindmapNode> {
    match value {
        Value::Object(_) => {
            let children = field(value, &["children", "subtopics", "nodes"]);
            let children = match children {
                Value::String(_) => to_sequence(children),
                other => to_forest(other),
            };
            Some(MindmapNode::new(
                text_field(value, &["title", "name", "label", "topic", "text"]),
                children.iter().filter_map(decode_node).collect(),
            ))
        }
        Value::String(text) if !text.trim().is_empty() => Some(MindmapNode::leaf(text.trim())),
        _ => None,
    }
}

fn decode_mindmap(value: &Value) -> Vec<MindmapNode> {
    to_forest(value)
        .iter()
        .filter(|item| item.is_object())
        .filter_map(decode_node)
        .collect()
}

/// Normalize a payload with no knowledge of the request that produced it.
pub fn normalize(payload: &Value) -> ContentResult {
    normalize_payload(payload, None)
}

/// Normalize a payload and tag it with the request's source kind and raw input.
pub fn normalize_tagged(payload: &Value, origin: Origin) -> ContentResult {
    normalize_payload(payload, Some(origin))
}

fn normalize_payload(payload: &Value, origin: Option<Origin>) -> ContentResult {
    let empty = Value::Object(Map::new());
    let payload = if payload.is_object() { payload } else { &empty };

    let declared_type = text_field(payload, &["type"]);
    let declared = SourceKind::from_label(&text_field(payload, &["source"]))
        .or_else(|| SourceKind::from_label(&declared_type));
    let source = declared
        .or_else(|| origin.as_ref().map(|origin| origin.kind))
        .unwrap_or_default();

    // `type` of educational|song|other describes the content, not the source
    let category = optional_text(payload, &["category"]).or_else(|| {
        (!declared_type.is_empty() && SourceKind::from_label(&declared_type).is_none())
            .then_some(declared_type)
    });

    let video_id = match source {
        SourceKind::Youtube => optional_text(payload, &["videoId", "video_id"]).or_else(|| {
            origin
                .as_ref()
                .and_then(|origin| extract_video_id(&origin.input))
        }),
        SourceKind::Web | SourceKind::Text => None,
    };

    let result = ContentResult {
        title: text_field(payload, &["title"]),
        channel: text_field(payload, &["channel", "author", "uploader"]),
        overview: text_field(payload, &["overview", "summary"]),
        source,
        video_id,
        category,
        duration: number_field(payload, &["duration"]).filter(|d| *d > 0.0),
        tags: decode_tags(field(payload, &["tags"])),
        terminologies: decode_terms(field(payload, &["terminologies", "terms"])),
        major_points: decode_points(field(payload, &["majorPoints", "major_points"])),
        chapters: decode_points(field(payload, &["chapters"])),
        mindmap: decode_mindmap(field(payload, &["mindmap", "mind_map", "mindMap"])),
        flashcards: decode_flashcards(field(payload, &["flashcards"])),
        quiz: decode_quiz(field(payload, &["quiz"])),
        transcript: decode_transcript(field(payload, &["transcript"])),
        lyrics: optional_text(payload, &["lyrics"]),
        song_analysis: optional_text(payload, &["song_analysis", "songAnalysis"]),
        origin,
    };

    tracing::debug!(
        title = %result.title,
        source = %result.source,
        chapters = result.chapters.len(),
        transcript_lines = result.transcript.len(),
        "Normalized content result"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_sequence() {
        assert_eq!(to_sequence(&Value::Null), Vec::<Value>::new());
        assert_eq!(to_sequence(&json!("x")), vec![json!("x")]);
        assert_eq!(to_sequence(&json!([1, 2])), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_to_term_sequence() {
        assert_eq!(
            to_term_sequence(&json!("foo")),
            vec![json!({ "term": "", "definition": "foo" })]
        );
        assert_eq!(
            to_term_sequence(&json!({ "term": "a", "definition": "b" })),
            vec![json!({ "term": "a", "definition": "b" })]
        );
        assert_eq!(to_term_sequence(&json!(7)), vec![json!({ "term": "", "definition": "7" })]);
        assert!(to_term_sequence(&Value::Null).is_empty());
    }

    #[test]
    fn test_to_forest() {
        assert_eq!(to_forest(&json!({ "title": "t" })).len(), 1);
        assert_eq!(to_forest(&json!([{}, {}])).len(), 2);
        assert!(to_forest(&json!("root")).is_empty());
        assert!(to_forest(&json!(3)).is_empty());
        assert!(to_forest(&Value::Null).is_empty());
    }

    #[test]
    fn test_empty_payload_yields_empty_containers() {
        for payload in [json!({}), Value::Null, json!("oops"), json!([1, 2])] {
            let result = normalize(&payload);
            assert_eq!(result.title, "");
            assert_eq!(result.overview, "");
            assert!(result.tags.is_empty());
            assert!(result.terminologies.is_empty());
            assert!(result.major_points.is_empty());
            assert!(result.chapters.is_empty());
            assert!(result.mindmap.is_empty());
            assert!(result.flashcards.is_empty());
            assert!(result.quiz.is_empty());
            assert!(result.transcript.is_empty());
            assert_eq!(result.video_id, None);
        }
    }

    #[test]
    fn test_scalar_fields_are_wrapped() {
        let result = normalize(&json!({
            "title": "Rust ownership",
            "tags": "rust",
            "terminologies": "Borrowing lets you reference data without owning it",
            "major_points": "Only one mutable borrow at a time",
            "mindmap": { "title": "Ownership", "children": ["Move", { "name": "Borrow" }] },
        }));

        assert_eq!(result.tags, vec!["rust"]);
        assert_eq!(result.terminologies[0].term, "");
        assert_eq!(
            result.terminologies[0].definition,
            "Borrowing lets you reference data without owning it"
        );
        assert_eq!(result.major_points[0].summary, "Only one mutable borrow at a time");
        assert_eq!(result.mindmap.len(), 1);
        let titles: Vec<&str> = result.mindmap[0]
            .children
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(titles, ["Move", "Borrow"]);
    }

    #[test]
    fn test_full_payload() {
        let result = normalize_tagged(
            &json!({
                "type": "educational",
                "title": "Lifetimes",
                "channel": "Rustacean Station",
                "overview": "How lifetimes work.",
                "duration": 1000,
                "chapters": [{ "title": "Intro", "summary": "Why", "timestamp": "02:05" }],
                "flashcards": [{ "question": "What is 'static?", "answer": "A lifetime" }, "stray"],
                "quiz": [{ "question": "Pick", "choices": ["a", "b"], "answer": 1 }],
                "transcript": [{ "start": 0, "text": "Hello" }, { "start": "2:05", "text": "World" }],
            }),
            Origin::new(SourceKind::Youtube, "https://youtu.be/dQw4w9WgXcQ"),
        );

        assert_eq!(result.source, SourceKind::Youtube);
        assert_eq!(result.category.as_deref(), Some("educational"));
        assert_eq!(result.video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(result.duration, Some(1000.0));
        assert_eq!(result.chapters[0].seconds(), Some(125.0));
        assert_eq!(result.flashcards.len(), 1);
        assert_eq!(result.quiz[0].answer, "b");
        assert_eq!(result.transcript[1].start, 125.0);
        assert!(result.matches(SourceKind::Youtube));
        assert!(!result.matches(SourceKind::Text));
    }

    #[test]
    fn test_video_id_only_for_youtube() {
        let result = normalize_tagged(
            &json!({ "videoId": "dQw4w9WgXcQ" }),
            Origin::new(SourceKind::Web, "https://example.com"),
        );
        assert_eq!(result.source, SourceKind::Web);
        assert_eq!(result.video_id, None);

        let declared = normalize(&json!({ "source": "text", "videoId": "dQw4w9WgXcQ" }));
        assert_eq!(declared.source, SourceKind::Text);
        assert_eq!(declared.video_id, None);
    }

    #[test]
    fn test_untagged_result_matches_nothing() {
        let result = normalize(&json!({ "title": "t" }));
        assert!(SourceKind::ALL.iter().all(|kind| !result.matches(*kind)));
    }
}
