//! Prompt input document loading.
//!
//! The input document is produced by the upstream prompt-generation stage
//! and read exactly once at worker startup. Unlike the results document, a
//! missing or malformed input is always fatal: there is nothing useful a
//! worker can do without its work list.

use std::fs;
use std::path::Path;

use tracing::info;

use vidforge_models::PromptSet;

use crate::error::{StoreError, StoreResult};

/// Load the prompt document at `path`.
pub fn load_prompt_set(path: &Path) -> StoreResult<PromptSet> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::InputMissing(path.to_path_buf()));
        }
        Err(e) => return Err(StoreError::Io(e)),
    };

    let set: PromptSet = serde_json::from_str(&contents).map_err(|e| StoreError::InputMalformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!(
        path = %path.display(),
        assignments = set.len(),
        "Loaded prompt document"
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_input_is_typed_error() {
        let dir = TempDir::new().unwrap();
        let result = load_prompt_set(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(StoreError::InputMissing(_))));
    }

    #[test]
    fn test_malformed_input_is_typed_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prompts.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let result = load_prompt_set(&path);
        assert!(matches!(result, Err(StoreError::InputMalformed { .. })));
    }

    #[test]
    fn test_loads_assignments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prompts.json");
        fs::write(
            &path,
            r#"{"0": {"image_prompt": "a.jpg", "text_prompt": "p0"},
                "1": {"image_prompt": "b.jpg", "text_prompt": "p1"}}"#,
        )
        .unwrap();

        let set = load_prompt_set(&path).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("1").unwrap().text_prompt, "p1");
    }
}
