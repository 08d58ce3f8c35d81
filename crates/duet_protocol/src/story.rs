//! Story-graph data model and JSON loading.
//!
//! The graph is external, read-only authored content: an ordered set of
//! scenes, each with descriptive text and either branching choices or an
//! ending marker. The server loads it once at startup, keeps the raw
//! document for the `/game-data.json` endpoint, and uses the indexed form
//! to resolve choice effects authoritatively.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Key into the story graph. The authoring format uses small numeric ids;
/// player 1's thread conventionally starts at 1 and player 2's at 50.
pub type SceneId = u32;

/// Errors raised while loading the story document. Callers decide how
/// far a bad graph propagates; dangling references inside a parseable
/// graph are authoring errors surfaced by [`StoryGraph::validate`]
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("failed to read story data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse story data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("story data defines scene {0} twice")]
    DuplicateScene(SceneId),
}

/// Effects applied when a choice is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effects {
    pub next_scene_id: SceneId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A scene-local option with a display label and an effects record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub text: String,
    pub effects: Effects,
}

/// A node in the story graph. A scene carrying `endings` is terminal;
/// its entries name records in the top-level endings list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub description: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endings: Option<Vec<String>>,
}

impl Scene {
    /// True when this scene terminates the player's branch.
    pub fn is_terminal(&self) -> bool {
        self.endings.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// A terminal outcome with a display name and text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    pub name: String,
    pub text: String,
}

/// On-disk shape of `game-data.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoryDocument {
    #[serde(default)]
    scenes: Vec<Scene>,
    #[serde(default)]
    endings: Vec<Ending>,
}

/// The loaded, indexed story graph.
#[derive(Debug, Clone)]
pub struct StoryGraph {
    scenes: HashMap<SceneId, Scene>,
    endings: HashMap<String, String>,
    raw: String,
}

impl StoryGraph {
    /// Load and index the authored JSON document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoryError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(raw)
    }

    /// Parse a story document held in memory.
    pub fn from_json(raw: String) -> Result<Self, StoryError> {
        let doc: StoryDocument = serde_json::from_str(&raw)?;
        let mut scenes = HashMap::with_capacity(doc.scenes.len());
        for scene in doc.scenes {
            let id = scene.id;
            if scenes.insert(id, scene).is_some() {
                return Err(StoryError::DuplicateScene(id));
            }
        }
        let endings = doc
            .endings
            .into_iter()
            .map(|e| (e.name, e.text))
            .collect();
        Ok(Self {
            scenes,
            endings,
            raw,
        })
    }

    /// An empty graph. Used when the server runs without authored content;
    /// choice resolution then always falls back to client-supplied effects.
    pub fn empty() -> Self {
        Self {
            scenes: HashMap::new(),
            endings: HashMap::new(),
            raw: r#"{"scenes":[],"endings":[]}"#.to_string(),
        }
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(&id)
    }

    pub fn ending_text(&self, name: &str) -> Option<&str> {
        self.endings.get(name).map(String::as_str)
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// The document exactly as authored, for serving to clients.
    pub fn raw_json(&self) -> &str {
        &self.raw
    }

    /// Authoritative lookup of a choice by `(scene, index)`. The index is
    /// the authored `choice.index` field, not the list position.
    pub fn resolve(&self, scene_id: SceneId, choice_index: u32) -> Option<&Choice> {
        self.scenes
            .get(&scene_id)?
            .choices
            .iter()
            .find(|c| c.index == choice_index)
    }

    /// Walk every choice and log dangling `nextSceneId` references.
    /// Returns the number of dangling references found. Violations are a
    /// data-authoring error, not a runtime fault: play continues, the
    /// affected branch simply dead-ends on the client.
    pub fn validate(&self) -> usize {
        let mut dangling = 0;
        for scene in self.scenes.values() {
            for choice in &scene.choices {
                let target = choice.effects.next_scene_id;
                if !self.scenes.contains_key(&target) {
                    warn!(
                        scene = scene.id,
                        choice = choice.index,
                        target,
                        "choice references undefined scene"
                    );
                    dangling += 1;
                }
            }
            if let Some(endings) = &scene.endings {
                for name in endings {
                    if !self.endings.contains_key(name) {
                        warn!(scene = scene.id, ending = %name, "scene references undefined ending");
                        dangling += 1;
                    }
                }
            }
        }
        dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> StoryGraph {
        StoryGraph::from_json(
            r#"{
                "scenes": [
                    {
                        "id": 1,
                        "description": "A corridor splits in two.",
                        "choices": [
                            {"index": 1, "text": "Go left", "effects": {"nextSceneId": 2}},
                            {"index": 2, "text": "Go right", "effects": {"nextSceneId": 3, "status": "hiding"}}
                        ]
                    },
                    {"id": 2, "description": "A locked door.", "choices": []},
                    {"id": 3, "description": "The end.", "endings": ["vanished"]}
                ],
                "endings": [
                    {"name": "vanished", "text": "You vanished without a trace."}
                ]
            }"#
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn load_indexes_scenes_and_endings() {
        let graph = sample_graph();
        assert_eq!(graph.scene_count(), 3);
        assert_eq!(graph.scene(1).unwrap().choices.len(), 2);
        assert_eq!(
            graph.ending_text("vanished"),
            Some("You vanished without a trace.")
        );
    }

    #[test]
    fn resolve_uses_authored_index() {
        let graph = sample_graph();
        let choice = graph.resolve(1, 2).unwrap();
        assert_eq!(choice.effects.next_scene_id, 3);
        assert_eq!(choice.effects.status.as_deref(), Some("hiding"));
        assert!(graph.resolve(1, 9).is_none());
        assert!(graph.resolve(99, 1).is_none());
    }

    #[test]
    fn terminal_scene_detection() {
        let graph = sample_graph();
        assert!(graph.scene(3).unwrap().is_terminal());
        assert!(!graph.scene(2).unwrap().is_terminal());
    }

    #[test]
    fn validate_counts_dangling_references() {
        let graph = sample_graph();
        assert_eq!(graph.validate(), 0);

        let broken = StoryGraph::from_json(
            r#"{
                "scenes": [
                    {"id": 1, "description": "x", "choices": [
                        {"index": 1, "text": "y", "effects": {"nextSceneId": 42}}
                    ]},
                    {"id": 2, "description": "z", "endings": ["missing"]}
                ],
                "endings": []
            }"#
            .to_string(),
        )
        .unwrap();
        assert_eq!(broken.validate(), 2);
    }

    #[test]
    fn duplicate_scene_rejected() {
        let err = StoryGraph::from_json(
            r#"{"scenes":[{"id":1,"description":"a"},{"id":1,"description":"b"}],"endings":[]}"#
                .to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, StoryError::DuplicateScene(1)));
    }

    #[test]
    fn raw_json_preserved_verbatim() {
        let raw = r#"{"scenes": [], "endings": []}"#.to_string();
        let graph = StoryGraph::from_json(raw.clone()).unwrap();
        assert_eq!(graph.raw_json(), raw);
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{"scenes":[{"id":7,"description":"on disk"}],"endings":[]}"#,
        )
        .unwrap();
        let graph = StoryGraph::load(file.path()).unwrap();
        assert_eq!(graph.scene(7).unwrap().description, "on disk");
    }
}
