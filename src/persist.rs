//! Recording persistence.
//!
//! JSON encoding of the [`Recording`] schema plus the validation applied
//! on every load. A malformed document, a structurally invalid recording,
//! and an unreadable file are three distinct failures; none of them is
//! ever coerced into an empty recording.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::model::Recording;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed recording document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("recording failed validation")]
    Invalid,
}

/// Apply the structural invariants: non-empty version tag, every action
/// valid. Identical to what `load_from_file` enforces.
pub fn validate(recording: &Recording) -> bool {
    recording.is_valid()
}

/// Pretty-printed JSON for a recording.
pub fn to_json(recording: &Recording) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(recording)?)
}

/// Parse and validate a recording document.
pub fn from_json(json: &str) -> Result<Recording, PersistError> {
    let recording: Recording = serde_json::from_str(json)?;
    if !recording.is_valid() {
        return Err(PersistError::Invalid);
    }
    Ok(recording)
}

/// Write a recording to disk, creating parent directories as needed.
pub fn save_to_file<P: AsRef<Path>>(recording: &Recording, path: P) -> Result<(), PersistError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = to_json(recording)?;
    fs::write(path, json)?;
    tracing::debug!("recording saved to {}", path.display());
    Ok(())
}

/// Read and validate a recording from disk.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Recording, PersistError> {
    let json = fs::read_to_string(path.as_ref())?;
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, ActionKind};

    fn sample() -> Recording {
        let mut recording = Recording::new();
        recording.name = Some("roundtrip".to_string());
        recording.screen_width = 1920;
        recording.screen_height = 1080;
        recording.os_version = Some("linux x86_64".to_string());
        recording.actions = vec![
            Action::mouse(ActionKind::MouseMove, 100, 100, 0),
            Action::mouse(ActionKind::MouseLeftDown, 100, 100, 150),
            Action::mouse(ActionKind::MouseLeftUp, 100, 100, 90),
            Action::wheel(100, 100, -120, 200),
            Action::key(ActionKind::KeyDown, 65, 30, 75),
            Action::key(ActionKind::KeyUp, 65, 30, 40),
            Action::wait(500),
        ];
        recording
    }

    #[test]
    fn test_roundtrip_is_fully_equal() {
        let original = sample();
        let restored = from_json(&to_json(&original).unwrap()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_missing_version_rejected() {
        let mut doc: serde_json::Value =
            serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();
        doc.as_object_mut().unwrap().remove("version");

        let result = from_json(&doc.to_string());
        assert!(matches!(result, Err(PersistError::Parse(_))));
    }

    #[test]
    fn test_empty_version_rejected_as_invalid() {
        let mut recording = sample();
        recording.version.clear();

        let json = to_json(&recording).unwrap();
        assert!(matches!(from_json(&json), Err(PersistError::Invalid)));
    }

    #[test]
    fn test_invalid_action_rejected_as_invalid() {
        let mut recording = sample();
        recording.actions[0].x = 50_000;

        let json = to_json(&recording).unwrap();
        assert!(matches!(from_json(&json), Err(PersistError::Invalid)));
    }

    #[test]
    fn test_garbage_rejected_as_parse_error() {
        assert!(matches!(from_json("not json"), Err(PersistError::Parse(_))));
        assert!(matches!(from_json("{}"), Err(PersistError::Parse(_))));
    }

    #[test]
    fn test_validate_matches_loader() {
        let mut recording = sample();
        assert!(validate(&recording));
        recording.actions[0].delay_ms = -1;
        assert!(!validate(&recording));
    }

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let mut recording = sample();
        recording.description = None;
        recording.os_version = None;

        let json = to_json(&recording).unwrap();
        assert!(!json.contains("\"description\""));
        assert!(!json.contains("\"osVersion\""));
    }
}
