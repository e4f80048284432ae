//! The catalog of AI models a prompt can be sent to.

use std::collections::HashSet;

use twilight_model::application::command::{CommandOptionChoice, CommandOptionChoiceValue};

/// Discord rejects string options with more choices than this.
const MAX_CHOICES: usize = 25;

const BUILTIN_MODELS: &[(&str, &str)] = &[("Gemini 2.5 flash lite", "gemini-2.5-flash-lite")];

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOption {
    /// Name shown in the Discord client
    pub name: String,
    /// Identifier sent with the interaction
    pub value: String,
}

impl ModelOption {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("The model catalog is empty")]
    Empty,
    #[error("The model catalog has {0} models, at most 25 are supported")]
    TooMany(usize),
    #[error("Duplicate model value: {0}")]
    DuplicateValue(String),
    #[error("Default model {0} is not in the catalog")]
    UnknownDefault(String),
}

#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelOption>,
    default: String,
}

impl ModelCatalog {
    pub fn new(models: Vec<ModelOption>, default: &str) -> Result<Self, CatalogError> {
        if models.is_empty() {
            return Err(CatalogError::Empty);
        }
        if models.len() > MAX_CHOICES {
            return Err(CatalogError::TooMany(models.len()));
        }
        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.value.as_str()) {
                return Err(CatalogError::DuplicateValue(model.value.clone()));
            }
        }
        if !seen.contains(default) {
            return Err(CatalogError::UnknownDefault(default.to_string()));
        }

        Ok(Self {
            models,
            default: default.to_string(),
        })
    }

    pub fn list_available(&self) -> Vec<ModelOption> {
        self.models.clone()
    }

    pub fn default_identifier(&self) -> &str {
        &self.default
    }

    pub fn is_valid(&self, identifier: &str) -> bool {
        self.models.iter().any(|model| model.value == identifier)
    }

    /// The catalog as the fixed choices of a string option.
    pub fn choices(&self) -> Vec<CommandOptionChoice> {
        self.models
            .iter()
            .map(|model| CommandOptionChoice {
                name: model.name.clone(),
                value: CommandOptionChoiceValue::String(model.value.clone()),
                name_localizations: None,
            })
            .collect()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            models: BUILTIN_MODELS
                .iter()
                .map(|(name, value)| ModelOption::new(name, value))
                .collect(),
            default: DEFAULT_MODEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn options(values: &[&str]) -> Vec<ModelOption> {
        values.iter().map(|v| ModelOption::new(v, v)).collect()
    }

    #[test]
    fn builtin_catalog_is_consistent() {
        let catalog = ModelCatalog::default();
        let rebuilt = ModelCatalog::new(catalog.list_available(), catalog.default_identifier());

        assert!(rebuilt.is_ok());
        assert_eq!(catalog.default_identifier(), DEFAULT_MODEL);
        assert!(catalog.is_valid(DEFAULT_MODEL));
    }

    #[rstest]
    #[case("gemini-2.5-flash-lite", true)]
    #[case("gpt-4", false)]
    #[case("", false)]
    #[case("GEMINI-2.5-FLASH-LITE", false)]
    fn validates_identifiers(#[case] identifier: &str, #[case] valid: bool) {
        assert_eq!(ModelCatalog::default().is_valid(identifier), valid);
    }

    #[test]
    fn listing_returns_a_copy() {
        let catalog = ModelCatalog::default();
        let mut listed = catalog.list_available();
        listed.push(ModelOption::new("Other", "other"));

        assert_eq!(catalog.list_available().len(), 1);
        assert!(!catalog.is_valid("other"));
    }

    #[test]
    fn choices_mirror_models() {
        let catalog = ModelCatalog::new(options(&["a", "b"]), "b").unwrap();
        let values = catalog
            .choices()
            .into_iter()
            .map(|choice| choice.value)
            .collect::<Vec<_>>();

        assert_eq!(
            values,
            [
                CommandOptionChoiceValue::String("a".into()),
                CommandOptionChoiceValue::String("b".into())
            ]
        );
    }

    #[rstest]
    #[case(options(&[]), "a", CatalogError::Empty)]
    #[case(options(&["a", "a"]), "a", CatalogError::DuplicateValue("a".into()))]
    #[case(options(&["a"]), "b", CatalogError::UnknownDefault("b".into()))]
    fn rejects_invalid_catalogs(
        #[case] models: Vec<ModelOption>,
        #[case] default: &str,
        #[case] expected: CatalogError,
    ) {
        assert_eq!(ModelCatalog::new(models, default).unwrap_err(), expected);
    }

    #[test]
    fn rejects_more_choices_than_discord_allows() {
        let models = (0..=MAX_CHOICES)
            .map(|i| ModelOption::new("m", &format!("model-{i}")))
            .collect();
        assert_eq!(
            ModelCatalog::new(models, "model-0").unwrap_err(),
            CatalogError::TooMany(MAX_CHOICES + 1)
        );
    }
}
