//! Commands for the scenario authoring context.

use storyloom_core::command::Command;
use uuid::Uuid;

use super::document::Choice;

/// Implements [`Command`] for a struct with a `correlation_id` field.
macro_rules! impl_command {
    ($command:ty, $name:literal) => {
        impl Command for $command {
            fn command_type(&self) -> &'static str {
                $name
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }
        }
    };
}

/// Command to start a new, empty scenario with the default character.
#[derive(Debug, Clone)]
pub struct CreateScenario {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// Command to load a scenario from its JSON form.
#[derive(Debug, Clone)]
pub struct ImportScenario {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Raw JSON text in the persisted scenario shape.
    pub source: String,
}

/// Command to add a scene.
#[derive(Debug, Clone)]
pub struct CreateScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The scenario being edited.
    pub scenario_id: Uuid,
    /// Explicit scene id; `None` picks `Scene N`.
    pub name: Option<String>,
}

/// Command to rename a scene.
#[derive(Debug, Clone)]
pub struct RenameScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The scenario being edited.
    pub scenario_id: Uuid,
    /// Current scene id.
    pub from: String,
    /// New scene id.
    pub to: String,
}

/// Command to delete a scene.
#[derive(Debug, Clone)]
pub struct DeleteScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The scenario being edited.
    pub scenario_id: Uuid,
    /// Scene to remove.
    pub scene_id: String,
}

/// Command to replace a scene's narration.
#[derive(Debug, Clone)]
pub struct SetSceneText {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The scenario being edited.
    pub scenario_id: Uuid,
    /// Scene to edit.
    pub scene_id: String,
    /// New narration.
    pub text: String,
}

/// Command to append a choice to a scene.
#[derive(Debug, Clone)]
pub struct AddChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The scenario being edited.
    pub scenario_id: Uuid,
    /// Scene receiving the choice.
    pub scene_id: String,
    /// The new choice.
    pub choice: Choice,
}

/// Command to replace an existing choice.
#[derive(Debug, Clone)]
pub struct EditChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The scenario being edited.
    pub scenario_id: Uuid,
    /// Scene owning the choice.
    pub scene_id: String,
    /// Position of the choice.
    pub choice_index: usize,
    /// Replacement choice.
    pub choice: Choice,
}

/// Command to remove a choice.
#[derive(Debug, Clone)]
pub struct RemoveChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The scenario being edited.
    pub scenario_id: Uuid,
    /// Scene owning the choice.
    pub scene_id: String,
    /// Position of the choice.
    pub choice_index: usize,
}

/// Command to add or change a starting character attribute.
#[derive(Debug, Clone)]
pub struct SetAttribute {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The scenario being edited.
    pub scenario_id: Uuid,
    /// Attribute name.
    pub attribute: String,
    /// Starting value.
    pub value: i64,
}

impl_command!(CreateScenario, "scenario.create_scenario");
impl_command!(ImportScenario, "scenario.import_scenario");
impl_command!(CreateScene, "scenario.create_scene");
impl_command!(RenameScene, "scenario.rename_scene");
impl_command!(DeleteScene, "scenario.delete_scene");
impl_command!(SetSceneText, "scenario.set_scene_text");
impl_command!(AddChoice, "scenario.add_choice");
impl_command!(EditChoice, "scenario.edit_choice");
impl_command!(RemoveChoice, "scenario.remove_choice");
impl_command!(SetAttribute, "scenario.set_attribute");
