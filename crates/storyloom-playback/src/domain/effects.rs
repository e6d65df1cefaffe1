//! Effect engine: applies a choice's attribute deltas to a character.

use storyloom_core::error::DomainError;
use storyloom_scenario::domain::document::{CharacterProfile, Effect};

/// Returns a new profile with every delta in `effect` applied, in order.
///
/// The input is never modified. Sums saturate at the `i64` bounds.
///
/// # Errors
///
/// Returns `DomainError::UnknownAttributeEffect` if the effect names an
/// attribute the profile does not have. Nothing is applied in that case.
pub fn apply_effect(
    profile: &CharacterProfile,
    effect: &Effect,
) -> Result<CharacterProfile, DomainError> {
    let mut next = profile.clone();
    for delta in effect {
        if !next.adjust(&delta.attribute, delta.delta) {
            return Err(DomainError::UnknownAttributeEffect(delta.attribute.clone()));
        }
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CharacterProfile {
        [("health", 100), ("money", 50)].into_iter().collect()
    }

    #[test]
    fn test_apply_effect_adds_deltas() {
        // Arrange
        let effect = Effect::none().with("health", -30).with("money", 5);

        // Act
        let next = apply_effect(&profile(), &effect).unwrap();

        // Assert
        assert_eq!(next.get("health"), Some(70));
        assert_eq!(next.get("money"), Some(55));
    }

    #[test]
    fn test_apply_effect_leaves_input_untouched() {
        // Arrange
        let original = profile();

        // Act
        let _ = apply_effect(&original, &Effect::none().with("health", -100)).unwrap();

        // Assert
        assert_eq!(original.get("health"), Some(100));
    }

    #[test]
    fn test_empty_effect_is_identity() {
        let next = apply_effect(&profile(), &Effect::none()).unwrap();

        assert_eq!(next, profile());
    }

    #[test]
    fn test_unknown_attribute_fails_without_partial_update() {
        // Arrange
        let effect = Effect::none().with("health", -10).with("luck", 1);

        // Act
        let result = apply_effect(&profile(), &effect);

        // Assert
        match result {
            Err(DomainError::UnknownAttributeEffect(attribute)) => assert_eq!(attribute, "luck"),
            other => panic!("expected UnknownAttributeEffect, got {other:?}"),
        }
    }

    #[test]
    fn test_overflow_saturates() {
        let profile: CharacterProfile = [("money", i64::MAX - 1)].into_iter().collect();

        let next = apply_effect(&profile, &Effect::none().with("money", 10)).unwrap();

        assert_eq!(next.get("money"), Some(i64::MAX));
    }
}
