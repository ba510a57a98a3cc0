use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{error::Result, types::ContentResult};

pub const MAX_EXPORT_STEM: usize = 60;
const FALLBACK_STEM: &str = "summary";

/// File name for the JSON export, derived from the title.
pub fn export_file_name(title: &str) -> String {
    let mut stem = String::new();
    for c in title.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            stem.push(c);
        } else if !stem.is_empty() && !stem.ends_with('-') {
            stem.push('-');
        }
    }

    let mut stem: String = stem.chars().take(MAX_EXPORT_STEM).collect();
    while stem.ends_with('-') {
        stem.pop();
    }
    if stem.is_empty() {
        stem.push_str(FALLBACK_STEM);
    }

    format!("{stem}.json")
}

pub fn export_json(result: &ContentResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write the export into `dir` and return the written path.
pub async fn save_export(result: &ContentResult, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let path = dir.join(export_file_name(&result.title));
    fs::write(&path, export_json(result)?).await?;
    tracing::debug!(path = %path.display(), "Wrote export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        normalize::normalize_tagged,
        source::{Origin, SourceKind},
    };

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Rust: Ownership & Borrowing!"), "rust-ownership-borrowing.json");
        assert_eq!(export_file_name("  "), "summary.json");
        assert_eq!(export_file_name("???"), "summary.json");
        assert_eq!(export_file_name("Ünïcode Tïtle"), "ünïcode-tïtle.json");

        let long = "a".repeat(100);
        assert_eq!(export_file_name(&long), format!("{}.json", "a".repeat(MAX_EXPORT_STEM)));
    }

    #[tokio::test]
    async fn test_save_export_includes_origin() {
        let dir = tempfile::tempdir().unwrap();
        let result = normalize_tagged(
            &json!({ "title": "Notes", "overview": "o" }),
            Origin::new(SourceKind::Text, "some pasted text"),
        );

        let path = save_export(&result, dir.path()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "notes.json");

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["title"], "Notes");
        assert_eq!(written["type"], "text");
        assert_eq!(written["origin"]["kind"], "text");
        assert_eq!(written["origin"]["input"], "some pasted text");
        assert_eq!(written["tags"], json!([]));
    }
}
