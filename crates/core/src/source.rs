use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the analyzed content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Youtube,
    Web,
    Text,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Youtube, SourceKind::Web, SourceKind::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Youtube => "youtube",
            SourceKind::Web => "web",
            SourceKind::Text => "text",
        }
    }

    /// Case-insensitive lookup of a payload label such as `"YouTube"`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The request that produced a result: selected source kind and the raw URL or text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Origin {
    pub kind: SourceKind,
    pub input: String,
}

impl Origin {
    pub fn new(kind: SourceKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }
}

const VIDEO_ID_LEN: usize = 11;

fn is_id_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn id_after(input: &str, marker: &str) -> Option<String> {
    input.match_indices(marker).find_map(|(at, _)| {
        let rest = &input.as_bytes()[at + marker.len()..];
        (rest.len() >= VIDEO_ID_LEN && rest[..VIDEO_ID_LEN].iter().all(|b| is_id_byte(*b)))
            .then(|| String::from_utf8_lossy(&rest[..VIDEO_ID_LEN]).into_owned())
    })
}

/// Extract the 11-character YouTube video id from a watch URL, a short link,
/// an embed/shorts URL, or a bare id.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    ["v=", "youtu.be/", "/embed/", "/shorts/"]
        .iter()
        .find_map(|marker| id_after(input, marker))
        .or_else(|| {
            (input.len() == VIDEO_ID_LEN && input.bytes().all(is_id_byte))
                .then(|| input.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(extract_video_id("dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(extract_video_id("https://example.com/article"), None);
        assert_eq!(extract_video_id("watch?v=short"), None);
    }

    #[test]
    fn test_source_kind_labels() {
        assert_eq!(SourceKind::from_label("YouTube"), Some(SourceKind::Youtube));
        assert_eq!(SourceKind::from_label(" text "), Some(SourceKind::Text));
        assert_eq!(SourceKind::from_label("educational"), None);
        assert_eq!(serde_json::to_string(&SourceKind::Web).unwrap(), "\"web\"");
    }
}
