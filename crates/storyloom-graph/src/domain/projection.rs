//! Projection of a scenario document onto a directed graph.
//!
//! # Rules
//!
//! 1. One node per scene, in document order.
//! 2. One edge per choice whose `next_scene` resolves, in scene then choice
//!    order. Parallel edges are kept.
//! 3. Choices pointing at missing scenes are listed in `dangling_edges`
//!    instead of failing, so unfinished drafts can still be drawn.
//! 4. Choices with an empty `next_scene` end the story; they are neither
//!    edges nor dangling.

use serde::Serialize;
use storyloom_scenario::domain::document::{Choice, ScenarioDocument, SceneId};

/// Switches for [`project`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Append a summary of the effect to edge labels, e.g. `Fight (health: -10)`.
    pub label_effects: bool,
}

/// A resolvable transition between two scenes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    /// Scene owning the choice.
    pub from: SceneId,
    /// Scene the choice leads to.
    pub to: SceneId,
    /// Position of the choice within `from`.
    pub choice_index: usize,
    /// Choice text, optionally with its effect.
    pub label: String,
}

/// A choice whose target does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingEdge {
    /// Scene owning the choice.
    pub from: SceneId,
    /// The unresolved `next_scene`.
    pub target: String,
    /// Position of the choice within `from`.
    pub choice_index: usize,
    /// Choice text, optionally with its effect.
    pub label: String,
}

/// Nodes and edges of a scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScenarioGraph {
    /// Scene ids in document order.
    pub nodes: Vec<SceneId>,
    /// Resolvable transitions.
    pub edges: Vec<GraphEdge>,
    /// Transitions to scenes that do not exist.
    pub dangling_edges: Vec<DanglingEdge>,
}

impl ScenarioGraph {
    /// Entry node, if the graph has any.
    #[must_use]
    pub fn entry(&self) -> Option<&str> {
        self.nodes.first().map(String::as_str)
    }

    /// Nodes with no outgoing edge, resolved or dangling. Reaching one ends
    /// the story.
    pub fn sinks(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter(|id| {
                !self.edges.iter().any(|e| &e.from == *id)
                    && !self.dangling_edges.iter().any(|e| &e.from == *id)
            })
            .map(String::as_str)
    }
}

/// Projects `document` onto a graph. Never fails; the same document always
/// yields the same graph.
#[must_use]
pub fn project(document: &ScenarioDocument, options: ProjectionOptions) -> ScenarioGraph {
    let mut graph = ScenarioGraph {
        nodes: document.scenes.keys().cloned().collect(),
        ..ScenarioGraph::default()
    };

    for (scene_id, scene) in &document.scenes {
        for (choice_index, choice) in scene.choices.iter().enumerate() {
            if choice.ends_story() {
                continue;
            }
            let label = label(choice, options);
            if document.scenes.contains_key(&choice.next_scene) {
                graph.edges.push(GraphEdge {
                    from: scene_id.clone(),
                    to: choice.next_scene.clone(),
                    choice_index,
                    label,
                });
            } else {
                graph.dangling_edges.push(DanglingEdge {
                    from: scene_id.clone(),
                    target: choice.next_scene.clone(),
                    choice_index,
                    label,
                });
            }
        }
    }

    graph
}

fn label(choice: &Choice, options: ProjectionOptions) -> String {
    if options.label_effects && !choice.effect.is_empty() {
        format!("{} ({})", choice.text, choice.effect)
    } else {
        choice.text.clone()
    }
}
