//! Typed scenario document: character attributes plus the scene graph.
//!
//! Scene order is significant. The first scene in the map is the entry point
//! for playback, so the map is an [`IndexMap`] and every authoring operation
//! below keeps the relative order of untouched scenes.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use storyloom_core::error::DomainError;

/// Scene identifier. Human-authored, unique within a document, and also the
/// label shown for the scene.
pub type SceneId = String;

/// Attribute names shipped with a freshly created scenario.
const DEFAULT_CHARACTER: [(&str, i64); 3] = [("health", 100), ("strength", 10), ("money", 50)];

/// Named integer attributes of the player character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterProfile(IndexMap<String, i64>);

impl CharacterProfile {
    /// Creates a profile with no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `attribute`, if the character has it.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<i64> {
        self.0.get(attribute).copied()
    }

    /// Whether the character has `attribute`.
    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.0.contains_key(attribute)
    }

    /// Adds `attribute` or overwrites its value.
    pub fn set(&mut self, attribute: impl Into<String>, value: i64) {
        self.0.insert(attribute.into(), value);
    }

    /// Adds `delta` to an existing attribute. Returns `false` and leaves the
    /// profile untouched when the attribute is absent.
    pub fn adjust(&mut self, attribute: &str, delta: i64) -> bool {
        match self.0.get_mut(attribute) {
            Some(value) => {
                *value = value.saturating_add(delta);
                true
            }
            None => false,
        }
    }

    /// Iterates attributes in their authored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the profile has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for CharacterProfile {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One `attribute += delta` instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDelta {
    /// Attribute to change.
    pub attribute: String,
    /// Signed amount to add.
    pub delta: i64,
}

/// The attribute changes a choice applies, in authored order.
///
/// Persisted as a JSON object (`{"health": -10}`); an attribute appears at
/// most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, i64>", into = "IndexMap<String, i64>")]
pub struct Effect {
    deltas: Vec<AttributeDelta>,
}

impl Effect {
    /// An effect that changes nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder form of [`Effect::push`].
    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, delta: i64) -> Self {
        self.push(attribute, delta);
        self
    }

    /// Adds a delta. A second delta for the same attribute is summed into
    /// the first so the JSON object form stays lossless.
    pub fn push(&mut self, attribute: impl Into<String>, delta: i64) {
        let attribute = attribute.into();
        match self.deltas.iter_mut().find(|d| d.attribute == attribute) {
            Some(existing) => existing.delta = existing.delta.saturating_add(delta),
            None => self.deltas.push(AttributeDelta { attribute, delta }),
        }
    }

    /// Iterates deltas in authored order.
    pub fn iter(&self) -> std::slice::Iter<'_, AttributeDelta> {
        self.deltas.iter()
    }

    /// Whether the effect changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

impl<'a> IntoIterator for &'a Effect {
    type Item = &'a AttributeDelta;
    type IntoIter = std::slice::Iter<'a, AttributeDelta>;

    fn into_iter(self) -> Self::IntoIter {
        self.deltas.iter()
    }
}

impl From<IndexMap<String, i64>> for Effect {
    fn from(map: IndexMap<String, i64>) -> Self {
        let deltas = map
            .into_iter()
            .map(|(attribute, delta)| AttributeDelta { attribute, delta })
            .collect();
        Self { deltas }
    }
}

impl From<Effect> for IndexMap<String, i64> {
    fn from(effect: Effect) -> Self {
        effect
            .deltas
            .into_iter()
            .map(|d| (d.attribute, d.delta))
            .collect()
    }
}

/// Renders as `health: -10, money: +5`.
impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.deltas.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {:+}", d.attribute, d.delta)?;
        }
        Ok(())
    }
}

/// An option offered to the player in a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Button label.
    pub text: String,
    /// Destination scene; empty means the story ends on the current scene.
    pub next_scene: SceneId,
    /// Attribute changes applied when the choice is taken.
    #[serde(default)]
    pub effect: Effect,
}

impl Choice {
    /// A choice with no effect.
    #[must_use]
    pub fn new(text: impl Into<String>, next_scene: impl Into<SceneId>) -> Self {
        Self {
            text: text.into(),
            next_scene: next_scene.into(),
            effect: Effect::none(),
        }
    }

    /// Replaces the effect.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    /// Whether taking this choice ends the story instead of moving on.
    #[must_use]
    pub fn ends_story(&self) -> bool {
        self.next_scene.is_empty()
    }
}

/// A node of the narrative graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Narration shown to the player.
    pub text: String,
    /// Choices in presentation order. Empty marks an ending.
    pub choices: Vec<Choice>,
}

impl Scene {
    /// A scene with narration and no choices yet.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    /// Builder helper appending a choice.
    #[must_use]
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Whether reaching this scene ends the story.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }
}

/// A complete authored scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDocument {
    /// Starting attributes of the player character.
    pub character: CharacterProfile,
    /// Scenes in authored order; the first one is the entry scene.
    pub scenes: IndexMap<SceneId, Scene>,
}

impl ScenarioDocument {
    /// An empty document with no attributes and no scenes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty document whose character starts with `health`, `strength`
    /// and `money`.
    #[must_use]
    pub fn with_default_character() -> Self {
        Self {
            character: DEFAULT_CHARACTER.into_iter().collect(),
            scenes: IndexMap::new(),
        }
    }

    /// The scene playback starts in: the first one in document order.
    #[must_use]
    pub fn entry_scene(&self) -> Option<(&SceneId, &Scene)> {
        self.scenes.first()
    }

    /// Looks up a scene by id.
    #[must_use]
    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.get(scene_id)
    }

    /// Adds an empty scene. Without a name, picks the first free `Scene N`
    /// starting from the current scene count plus one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a blank name and
    /// `DomainError::DuplicateScene` if the name is taken.
    pub fn create_scene(&mut self, name: Option<&str>) -> Result<SceneId, DomainError> {
        let scene_id = match name {
            Some(name) => {
                let name = non_blank(name, "scene name")?;
                if self.scenes.contains_key(name) {
                    return Err(DomainError::DuplicateScene(name.to_owned()));
                }
                name.to_owned()
            }
            None => {
                let mut n = self.scenes.len() + 1;
                loop {
                    let candidate = format!("Scene {n}");
                    if !self.scenes.contains_key(&candidate) {
                        break candidate;
                    }
                    n += 1;
                }
            }
        };
        self.scenes.insert(scene_id.clone(), Scene::default());
        Ok(scene_id)
    }

    /// Renames a scene in place and repoints every choice that targeted it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a blank name,
    /// `DomainError::SceneNotFound` if `from` does not exist, and
    /// `DomainError::DuplicateScene` if `to` is already taken.
    pub fn rename_scene(&mut self, from: &str, to: &str) -> Result<(), DomainError> {
        let to = non_blank(to, "scene name")?;
        let Some(index) = self.scenes.get_index_of(from) else {
            return Err(DomainError::SceneNotFound(from.to_owned()));
        };
        if from == to {
            return Ok(());
        }
        if self.scenes.contains_key(to) {
            return Err(DomainError::DuplicateScene(to.to_owned()));
        }

        let Some((_, scene)) = self.scenes.shift_remove_index(index) else {
            return Err(DomainError::SceneNotFound(from.to_owned()));
        };
        self.scenes.shift_insert(index, to.to_owned(), scene);

        for choice in self.scenes.values_mut().flat_map(|s| s.choices.iter_mut()) {
            if choice.next_scene == from {
                to.clone_into(&mut choice.next_scene);
            }
        }
        Ok(())
    }

    /// Removes a scene. Choices that pointed at it are left as they are and
    /// show up as dangling references on the next validation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the scene does not exist.
    pub fn delete_scene(&mut self, scene_id: &str) -> Result<Scene, DomainError> {
        self.scenes
            .shift_remove(scene_id)
            .ok_or_else(|| DomainError::SceneNotFound(scene_id.to_owned()))
    }

    /// Replaces a scene's narration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the scene does not exist.
    pub fn set_scene_text(&mut self, scene_id: &str, text: &str) -> Result<(), DomainError> {
        let scene = self.scene_mut(scene_id)?;
        text.trim().clone_into(&mut scene.text);
        Ok(())
    }

    /// Appends a choice and returns its index.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the scene does not exist.
    pub fn add_choice(&mut self, scene_id: &str, choice: Choice) -> Result<usize, DomainError> {
        let scene = self.scene_mut(scene_id)?;
        scene.choices.push(choice);
        Ok(scene.choices.len() - 1)
    }

    /// Replaces the choice at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the scene does not exist and
    /// `DomainError::Validation` if `index` is out of range.
    pub fn edit_choice(
        &mut self,
        scene_id: &str,
        index: usize,
        choice: Choice,
    ) -> Result<Choice, DomainError> {
        let scene = self.scene_mut(scene_id)?;
        let slot = scene
            .choices
            .get_mut(index)
            .ok_or_else(|| choice_out_of_range(scene_id, index))?;
        Ok(std::mem::replace(slot, choice))
    }

    /// Removes the choice at `index`, shifting later choices up.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the scene does not exist and
    /// `DomainError::Validation` if `index` is out of range.
    pub fn remove_choice(&mut self, scene_id: &str, index: usize) -> Result<Choice, DomainError> {
        let scene = self.scene_mut(scene_id)?;
        if index >= scene.choices.len() {
            return Err(choice_out_of_range(scene_id, index));
        }
        Ok(scene.choices.remove(index))
    }

    /// Adds a character attribute or changes its starting value. Attributes
    /// cannot be removed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a blank attribute name.
    pub fn set_attribute(&mut self, attribute: &str, value: i64) -> Result<(), DomainError> {
        let attribute = non_blank(attribute, "attribute name")?;
        self.character.set(attribute, value);
        Ok(())
    }

    fn scene_mut(&mut self, scene_id: &str) -> Result<&mut Scene, DomainError> {
        self.scenes
            .get_mut(scene_id)
            .ok_or_else(|| DomainError::SceneNotFound(scene_id.to_owned()))
    }
}

fn non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

fn choice_out_of_range(scene_id: &str, index: usize) -> DomainError {
    DomainError::Validation(format!(
        "choice index {index} is out of range for scene '{scene_id}'"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_scenes() -> ScenarioDocument {
        let mut doc = ScenarioDocument::with_default_character();
        doc.scenes.insert(
            "a".to_owned(),
            Scene::new("A").with_choice(Choice::new("to b", "b")),
        );
        doc.scenes.insert(
            "b".to_owned(),
            Scene::new("B").with_choice(Choice::new("to c", "c")),
        );
        doc.scenes.insert("c".to_owned(), Scene::new("C"));
        doc
    }

    fn scene_order(doc: &ScenarioDocument) -> Vec<&str> {
        doc.scenes.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_default_character_matches_editor_defaults() {
        let doc = ScenarioDocument::with_default_character();

        let attrs: Vec<(&str, i64)> = doc.character.iter().collect();

        assert_eq!(attrs, vec![("health", 100), ("strength", 10), ("money", 50)]);
        assert!(doc.scenes.is_empty());
        assert!(doc.entry_scene().is_none());
    }

    #[test]
    fn test_entry_scene_is_first_inserted() {
        let mut doc = ScenarioDocument::new();
        doc.scenes.insert("zeta".to_owned(), Scene::new("Z"));
        doc.scenes.insert("alpha".to_owned(), Scene::new("A"));

        let (entry, _) = doc.entry_scene().unwrap();

        assert_eq!(entry, "zeta");
    }

    #[test]
    fn test_create_scene_auto_names_past_collisions() {
        let mut doc = ScenarioDocument::new();
        doc.create_scene(Some("Scene 2")).unwrap();

        let first = doc.create_scene(None).unwrap();
        let second = doc.create_scene(None).unwrap();

        assert_eq!(first, "Scene 3");
        assert_eq!(second, "Scene 4");
    }

    #[test]
    fn test_create_scene_rejects_duplicate_and_blank_names() {
        let mut doc = three_scenes();

        assert!(matches!(
            doc.create_scene(Some("a")),
            Err(DomainError::DuplicateScene(name)) if name == "a"
        ));
        assert!(matches!(
            doc.create_scene(Some("   ")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_rename_scene_keeps_position_and_repoints_choices() {
        let mut doc = three_scenes();

        doc.rename_scene("b", "bridge").unwrap();

        assert_eq!(scene_order(&doc), vec!["a", "bridge", "c"]);
        assert_eq!(doc.scenes["a"].choices[0].next_scene, "bridge");
        assert_eq!(doc.scenes["bridge"].text, "B");
    }

    #[test]
    fn test_rename_entry_scene_keeps_it_as_entry() {
        let mut doc = three_scenes();

        doc.rename_scene("a", "prologue").unwrap();

        assert_eq!(doc.entry_scene().unwrap().0, "prologue");
    }

    #[test]
    fn test_rename_scene_rejects_collision_without_changes() {
        let mut doc = three_scenes();
        let before = doc.clone();

        let result = doc.rename_scene("a", "c");

        assert!(matches!(result, Err(DomainError::DuplicateScene(name)) if name == "c"));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_rename_missing_scene_fails() {
        let mut doc = three_scenes();

        let result = doc.rename_scene("nope", "x");

        assert!(matches!(result, Err(DomainError::SceneNotFound(name)) if name == "nope"));
    }

    #[test]
    fn test_delete_scene_preserves_order_and_leaves_references() {
        let mut doc = three_scenes();

        let removed = doc.delete_scene("b").unwrap();

        assert_eq!(removed.text, "B");
        assert_eq!(scene_order(&doc), vec!["a", "c"]);
        assert_eq!(doc.scenes["a"].choices[0].next_scene, "b");
    }

    #[test]
    fn test_choice_editing_round() {
        let mut doc = three_scenes();

        let index = doc
            .add_choice("c", Choice::new("again", "a").with_effect(Effect::none().with("money", 5)))
            .unwrap();
        let old = doc.edit_choice("c", index, Choice::new("restart", "a")).unwrap();
        let removed = doc.remove_choice("c", 0).unwrap();

        assert_eq!(index, 0);
        assert_eq!(old.text, "again");
        assert_eq!(removed.text, "restart");
        assert!(doc.scenes["c"].is_terminal());
    }

    #[test]
    fn test_choice_index_out_of_range_is_rejected() {
        let mut doc = three_scenes();

        assert!(matches!(
            doc.remove_choice("a", 3),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            doc.edit_choice("a", 1, Choice::new("x", "a")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_set_attribute_adds_and_updates() {
        let mut doc = ScenarioDocument::with_default_character();

        doc.set_attribute("health", 80).unwrap();
        doc.set_attribute(" luck ", 3).unwrap();

        assert_eq!(doc.character.get("health"), Some(80));
        assert_eq!(doc.character.get("luck"), Some(3));
        assert_eq!(doc.character.len(), 4);
    }

    #[test]
    fn test_effect_push_merges_same_attribute() {
        let effect = Effect::none().with("health", -5).with("money", 2).with("health", -5);

        let deltas: Vec<(&str, i64)> = effect
            .iter()
            .map(|d| (d.attribute.as_str(), d.delta))
            .collect();

        assert_eq!(deltas, vec![("health", -10), ("money", 2)]);
        assert_eq!(effect.to_string(), "health: -10, money: +2");
    }

    #[test]
    fn test_effect_serializes_as_object_in_order() {
        let effect = Effect::none().with("strength", 1).with("health", -3);

        let json = serde_json::to_string(&effect).unwrap();

        assert_eq!(json, r#"{"strength":1,"health":-3}"#);
    }

    #[test]
    fn test_choice_without_effect_deserializes_to_empty_effect() {
        let choice: Choice =
            serde_json::from_str(r#"{"text": "Leave", "next_scene": ""}"#).unwrap();

        assert!(choice.effect.is_empty());
        assert!(choice.ends_story());
    }

    #[test]
    fn test_adjust_ignores_missing_attribute() {
        let mut profile: CharacterProfile = [("health", 10)].into_iter().collect();

        assert!(profile.adjust("health", -3));
        assert!(!profile.adjust("mana", 5));
        assert_eq!(profile.get("health"), Some(7));
        assert!(!profile.contains("mana"));
    }
}
