use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StageError, StageResult};

/// A branching story: named passages linked by choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Name of the first passage.
    pub start: String,
    /// Every passage, by name.
    pub passages: BTreeMap<String, Passage>,
}

/// One page of the story.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Passage {
    /// Lines revealed one after another, each waiting for continue.
    #[serde(default)]
    pub lines: Vec<String>,
    /// What the music does when the passage is shown. Absent leaves it alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<MusicCue>,
    /// Choices offered once every line is revealed.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// A passage's music instruction.
///
/// In JSON: a track path, `true` for the configured default track, or
/// `false` to fade the music out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MusicCue {
    /// `true` plays the default track, `false` stops.
    Toggle(bool),
    /// Play this track.
    Track(String),
}

/// A link to another passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown to the player.
    pub label: String,
    /// Name of the passage it leads to.
    pub target: String,
}

impl Script {
    /// Parse a script from JSON text and validate it.
    pub fn from_json_str(text: &str) -> StageResult<Self> {
        let script: Self =
            serde_json::from_str(text).map_err(|e| StageError::Script(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    /// Load and validate a script file.
    pub fn load(path: &Path) -> StageResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| StageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check that the start passage and every choice target exist.
    pub fn validate(&self) -> StageResult<()> {
        if self.passages.is_empty() {
            return Err(StageError::Script("script has no passages".into()));
        }
        if !self.passages.contains_key(&self.start) {
            return Err(StageError::UnknownPassage(self.start.clone()));
        }
        for (name, passage) in &self.passages {
            for (i, choice) in passage.choices.iter().enumerate() {
                if !self.passages.contains_key(&choice.target) {
                    return Err(StageError::Script(format!(
                        "passage '{name}' choice {i} leads to unknown passage '{}'",
                        choice.target
                    )));
                }
            }
        }
        Ok(())
    }

    /// Look up a passage by name.
    pub fn passage(&self, name: &str) -> Option<&Passage> {
        self.passages.get(name)
    }

    /// Passages no choice leads to, other than the start.
    pub fn unreachable(&self) -> Vec<&str> {
        let targets: std::collections::HashSet<&str> = self
            .passages
            .values()
            .flat_map(|p| p.choices.iter().map(|c| c.target.as_str()))
            .collect();
        self.passages
            .keys()
            .map(String::as_str)
            .filter(|name| *name != self.start && !targets.contains(name))
            .collect()
    }

    /// Passages without choices.
    pub fn endings(&self) -> Vec<&str> {
        self.passages
            .iter()
            .filter(|(_, p)| p.choices.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "title": "Harbor",
        "start": "dock",
        "passages": {
            "dock": {
                "lines": ["The fog rolls in.", "A bell rings."],
                "music": "music/harbor.ogg",
                "choices": [
                    { "label": "Board", "target": "ship" },
                    { "label": "Wait", "target": "end" }
                ]
            },
            "ship": { "lines": ["You board."], "music": false, "choices": [
                { "label": "Sail", "target": "end" }
            ] },
            "end": { "lines": ["The end."], "music": true }
        }
    }"#;

    #[test]
    fn parse_sample() {
        let script = Script::from_json_str(SAMPLE).unwrap();
        assert_eq!(script.title, "Harbor");
        assert_eq!(script.passages.len(), 3);
        let dock = script.passage("dock").unwrap();
        assert_eq!(dock.lines.len(), 2);
        assert_eq!(
            dock.music,
            Some(MusicCue::Track("music/harbor.ogg".into()))
        );
        assert_eq!(
            script.passage("ship").unwrap().music,
            Some(MusicCue::Toggle(false))
        );
        assert_eq!(script.endings(), vec!["end"]);
        assert!(script.unreachable().is_empty());
    }

    #[test]
    fn missing_start_is_rejected() {
        let err = Script::from_json_str(r#"{"start": "nope", "passages": {"a": {}}}"#).unwrap_err();
        assert!(matches!(err, StageError::UnknownPassage(ref name) if name == "nope"));
    }

    #[test]
    fn dangling_choice_is_rejected() {
        let text = r#"{"start": "a", "passages": {
            "a": {"choices": [{"label": "go", "target": "b"}]}
        }}"#;
        let err = Script::from_json_str(text).unwrap_err();
        assert!(err.to_string().contains("unknown passage 'b'"), "{err}");
    }

    #[test]
    fn empty_script_is_rejected() {
        let err = Script::from_json_str(r#"{"start": "a", "passages": {}}"#).unwrap_err();
        assert!(matches!(err, StageError::Script(_)));
    }

    #[test]
    fn malformed_json_is_a_script_error() {
        let err = Script::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, StageError::Script(_)));
    }

    #[test]
    fn unreachable_passages_are_listed() {
        let text = r#"{"start": "a", "passages": {"a": {}, "orphan": {}}}"#;
        let script = Script::from_json_str(text).unwrap();
        assert_eq!(script.unreachable(), vec!["orphan"]);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.json");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(Script::load(&path).unwrap().start, "dock");

        let err = Script::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, StageError::Io { .. }));
    }
}
