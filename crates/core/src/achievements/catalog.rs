//! Static achievement catalog.
//!
//! The catalog is an immutable, versioned configuration object loaded once
//! at startup and passed explicitly (`Arc`) to the rule engine. It is never
//! mutated and never read from ambient state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::achievements::achievements_errors::AchievementError;
use crate::achievements::achievements_model::AchievementDefinition;
use crate::errors::Result;

const DEFAULT_CATALOG_JSON: &str = include_str!("default_catalog.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementCatalog {
    pub version: u32,
    definitions: Vec<AchievementDefinition>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl AchievementCatalog {
    /// Parses and validates a catalog from its JSON representation.
    ///
    /// Rejected at load time: duplicate ids, definitions with zero
    /// requirements, non-positive requirement targets, negative rewards.
    pub fn load_json(json: &str) -> Result<Self> {
        let mut catalog: AchievementCatalog = serde_json::from_str(json)
            .map_err(|e| AchievementError::InvalidCatalog(e.to_string()))?;
        catalog.validate()?;
        catalog.rebuild_index();
        Ok(catalog)
    }

    /// The catalog shipped with the engine.
    pub fn builtin() -> Result<Self> {
        Self::load_json(DEFAULT_CATALOG_JSON)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashMap::new();
        for def in &self.definitions {
            if seen.insert(def.id.as_str(), ()).is_some() {
                return Err(
                    AchievementError::InvalidCatalog(format!("duplicate id '{}'", def.id)).into(),
                );
            }
            if def.requirements.is_empty() {
                return Err(AchievementError::InvalidDefinition(format!(
                    "'{}' has no requirements",
                    def.id
                ))
                .into());
            }
            if def.requirements.iter().any(|r| r.target <= 0) {
                return Err(AchievementError::InvalidDefinition(format!(
                    "'{}' has a non-positive requirement target",
                    def.id
                ))
                .into());
            }
            if def.reward_points < 0 {
                return Err(AchievementError::InvalidDefinition(format!(
                    "'{}' has negative reward points",
                    def.id
                ))
                .into());
            }
        }
        Ok(())
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .definitions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();
    }

    pub fn definitions(&self) -> &[AchievementDefinition] {
        &self.definitions
    }

    pub fn get(&self, id: &str) -> Option<&AchievementDefinition> {
        self.index.get(id).map(|&i| &self.definitions[i])
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn builtin_catalog_loads_and_indexes() {
        let catalog = AchievementCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        let def = catalog.get("first-checkin").unwrap();
        assert_eq!(def.name, "Showing Up");
        assert_eq!(def.reward_points, 25);
    }

    #[test]
    fn zero_requirement_definition_is_rejected() {
        let json = r#"{
            "version": 1,
            "definitions": [{
                "id": "empty", "name": "Empty", "category": "X", "icon": "x",
                "rewardPoints": 10, "rarity": "COMMON", "requirements": []
            }]
        }"#;
        let err = AchievementCatalog::load_json(json).unwrap_err();
        assert!(matches!(
            err,
            Error::Achievement(AchievementError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{
            "version": 1,
            "definitions": [
                {"id": "a", "name": "A", "category": "X", "icon": "x",
                 "rewardPoints": 1, "rarity": "COMMON",
                 "requirements": [{"metric": "REGISTERED", "target": 1}]},
                {"id": "a", "name": "A2", "category": "X", "icon": "x",
                 "rewardPoints": 1, "rarity": "COMMON",
                 "requirements": [{"metric": "REGISTERED", "target": 1}]}
            ]
        }"#;
        assert!(AchievementCatalog::load_json(json).is_err());
    }
}
