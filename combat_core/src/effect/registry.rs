//! Effect database - Lookup of effect definitions by id

use super::definition::EffectDefinition;
use crate::types::EffectId;
use std::collections::HashMap;

/// Read access to effect definitions
pub trait EffectDatabase {
    fn get_by_id(&self, id: &EffectId) -> Option<&EffectDefinition>;
}

/// In-memory effect database
#[derive(Debug, Clone, Default)]
pub struct EffectRegistry {
    definitions: HashMap<EffectId, EffectDefinition>,
}

impl EffectRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        EffectRegistry {
            definitions: HashMap::new(),
        }
    }

    /// Register a definition, replacing any previous one with the same id
    pub fn register(&mut self, definition: EffectDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    pub fn get(&self, id: &str) -> Option<&EffectDefinition> {
        self.definitions.get(&EffectId::from(id))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectDefinition> {
        self.definitions.values()
    }
}

impl EffectDatabase for EffectRegistry {
    fn get_by_id(&self, id: &EffectId) -> Option<&EffectDefinition> {
        self.definitions.get(id)
    }
}

impl FromIterator<EffectDefinition> for EffectRegistry {
    fn from_iter<I: IntoIterator<Item = EffectDefinition>>(iter: I) -> Self {
        let mut registry = EffectRegistry::new();
        for definition in iter {
            registry.register(definition);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::definition::EffectKind;

    #[test]
    fn test_register_and_lookup() {
        let registry: EffectRegistry = [
            EffectDefinition::new("burn", "Burn", EffectKind::DamageOverTime),
            EffectDefinition::new("stun", "Stun", EffectKind::Stun),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("burn").map(|d| d.kind), Some(EffectKind::DamageOverTime));
        assert!(registry.get_by_id(&EffectId::from("stun")).is_some());
        assert!(registry.get_by_id(&EffectId::from("missing")).is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = EffectRegistry::new();
        registry.register(EffectDefinition::new("burn", "Burn", EffectKind::DamageOverTime));
        registry.register(EffectDefinition::new("burn", "Scorch", EffectKind::DamageOverTime));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("burn").map(|d| d.name.as_str()), Some("Scorch"));
    }
}
