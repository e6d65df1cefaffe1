//! Structural validation of scenario documents.
//!
//! Two entry points share the same rules. [`validate_value`] runs on raw
//! JSON at the load boundary, where keys can be absent and values can have the
//! wrong type. [`validate`] runs on a typed document produced by authoring,
//! where only the cross-reference rules can still fail. Both collect every
//! problem instead of stopping at the first.

use std::collections::HashSet;

use serde_json::{Map, Value};
use storyloom_core::error::ValidationError;

use super::document::ScenarioDocument;

/// Checks a typed document.
///
/// # Errors
///
/// Returns every `MissingField`, `DanglingReference` and `UnknownAttribute`
/// problem found.
pub fn validate(document: &ScenarioDocument) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (scene_id, scene) in &document.scenes {
        for (index, choice) in scene.choices.iter().enumerate() {
            if choice.text.trim().is_empty() {
                errors.push(missing(choice_path(scene_id, index, "text")));
            }
            check_target(
                scene_id,
                index,
                &choice.next_scene,
                |target| document.scenes.contains_key(target),
                &mut errors,
            );
            for delta in &choice.effect {
                if !document.character.contains(&delta.attribute) {
                    errors.push(unknown_attribute(scene_id, index, &delta.attribute));
                }
            }
        }
    }

    finish(errors)
}

/// Checks raw JSON in the persisted scenario shape.
///
/// # Errors
///
/// Returns every problem found, of all four kinds.
pub fn validate_value(value: &Value) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let Some(root) = value.as_object() else {
        return Err(vec![mismatch("$".to_owned(), "object")]);
    };

    let attributes = match root.get("character") {
        None => {
            errors.push(missing("character".to_owned()));
            None
        }
        Some(Value::Object(character)) => {
            for (name, value) in character {
                if !is_integer(value) {
                    errors.push(mismatch(format!("character.{name}"), "integer"));
                }
            }
            Some(character.keys().map(String::as_str).collect::<HashSet<_>>())
        }
        Some(_) => {
            errors.push(mismatch("character".to_owned(), "object"));
            None
        }
    };

    match root.get("scenes") {
        None => errors.push(missing("scenes".to_owned())),
        Some(Value::Object(scenes)) => {
            for (scene_id, scene) in scenes {
                check_raw_scene(scene_id, scene, scenes, attributes.as_ref(), &mut errors);
            }
        }
        Some(_) => errors.push(mismatch("scenes".to_owned(), "object")),
    }

    finish(errors)
}

fn check_raw_scene(
    scene_id: &str,
    scene: &Value,
    scenes: &Map<String, Value>,
    attributes: Option<&HashSet<&str>>,
    errors: &mut Vec<ValidationError>,
) {
    let Some(scene) = scene.as_object() else {
        errors.push(mismatch(format!("scenes.{scene_id}"), "object"));
        return;
    };

    match scene.get("text") {
        None => errors.push(missing(format!("scenes.{scene_id}.text"))),
        Some(Value::String(_)) => {}
        Some(_) => errors.push(mismatch(format!("scenes.{scene_id}.text"), "string")),
    }

    let choices = match scene.get("choices") {
        None => {
            errors.push(missing(format!("scenes.{scene_id}.choices")));
            return;
        }
        Some(Value::Array(choices)) => choices,
        Some(_) => {
            errors.push(mismatch(format!("scenes.{scene_id}.choices"), "array"));
            return;
        }
    };

    for (index, choice) in choices.iter().enumerate() {
        let Some(choice) = choice.as_object() else {
            errors.push(mismatch(format!("scenes.{scene_id}.choices[{index}]"), "object"));
            continue;
        };

        match choice.get("text") {
            None => errors.push(missing(choice_path(scene_id, index, "text"))),
            Some(Value::String(text)) if text.trim().is_empty() => {
                errors.push(missing(choice_path(scene_id, index, "text")));
            }
            Some(Value::String(_)) => {}
            Some(_) => errors.push(mismatch(choice_path(scene_id, index, "text"), "string")),
        }

        match choice.get("next_scene") {
            None => errors.push(missing(choice_path(scene_id, index, "next_scene"))),
            Some(Value::String(target)) => check_target(
                scene_id,
                index,
                target,
                |target| scenes.contains_key(target),
                errors,
            ),
            Some(_) => errors.push(mismatch(
                choice_path(scene_id, index, "next_scene"),
                "string",
            )),
        }

        match choice.get("effect") {
            None => {}
            Some(Value::Object(effect)) => {
                for (attribute, delta) in effect {
                    if !is_integer(delta) {
                        errors.push(mismatch(
                            format!("{}.{attribute}", choice_path(scene_id, index, "effect")),
                            "integer",
                        ));
                    }
                    if attributes.is_some_and(|known| !known.contains(attribute.as_str())) {
                        errors.push(unknown_attribute(scene_id, index, attribute));
                    }
                }
            }
            Some(_) => errors.push(mismatch(choice_path(scene_id, index, "effect"), "object")),
        }
    }
}

/// An empty target is the documented "end here" marker, not a reference.
fn check_target(
    scene_id: &str,
    index: usize,
    target: &str,
    resolves: impl Fn(&str) -> bool,
    errors: &mut Vec<ValidationError>,
) {
    if !target.is_empty() && !resolves(target) {
        errors.push(ValidationError::DanglingReference {
            scene_id: scene_id.to_owned(),
            choice_index: index,
            target: target.to_owned(),
        });
    }
}

fn is_integer(value: &Value) -> bool {
    value.as_i64().is_some()
}

fn choice_path(scene_id: &str, index: usize, field: &str) -> String {
    format!("scenes.{scene_id}.choices[{index}].{field}")
}

fn missing(path: String) -> ValidationError {
    ValidationError::MissingField { path }
}

fn mismatch(path: String, expected: &'static str) -> ValidationError {
    ValidationError::TypeMismatch { path, expected }
}

fn unknown_attribute(scene_id: &str, index: usize, attribute: &str) -> ValidationError {
    ValidationError::UnknownAttribute {
        scene_id: scene_id.to_owned(),
        choice_index: index,
        attribute: attribute.to_owned(),
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
