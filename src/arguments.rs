use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use twilight_model::application::{
    command::{CommandOptionChoice, CommandOptionType},
    interaction::application_command::CommandOptionValue,
};

/// Option values supplied with an interaction, keyed by option name.
pub type OptionValues = HashMap<String, CommandOptionValue>;

#[derive(Debug, Clone)]
pub struct CommandOption {
    pub choices: Option<Vec<CommandOptionChoice>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: CommandOptionType,
    pub max_length: Option<u16>,
    pub min_length: Option<u16>,
    pub required: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid type for command argument")]
    InvalidType,
    #[error("Missing required command argument")]
    Missing,
}

pub trait ToOption {
    fn to_option() -> CommandOption;
}

pub trait OptionalArgumentConverter: Sized {
    fn convert(data: Option<&CommandOptionValue>) -> Result<Self>;
}

pub trait ArgumentConverter: Sized {
    fn convert(data: &CommandOptionValue) -> Result<Self>;
}

impl<T: OptionalArgumentConverter> OptionalArgumentConverter for Option<T> {
    fn convert(data: Option<&CommandOptionValue>) -> Result<Self> {
        match data {
            Some(_) => Ok(Some(T::convert(data)?)),
            None => Ok(None),
        }
    }
}

impl<T: ArgumentConverter> OptionalArgumentConverter for T {
    fn convert(data: Option<&CommandOptionValue>) -> Result<Self> {
        match data {
            Some(value) => T::convert(value),
            None => Err(anyhow!(Error::Missing)),
        }
    }
}

impl CommandOption {
    pub fn new(kind: CommandOptionType) -> Self {
        CommandOption {
            choices: None,
            name: None,
            description: None,
            kind,
            max_length: None,
            min_length: None,
            required: true,
        }
    }

    pub fn max_length(mut self, max_length: u16) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn min_length(mut self, min_length: u16) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Reads the option called `name` out of `options` and converts it.
pub fn parse<T: OptionalArgumentConverter>(options: &OptionValues, name: &str) -> Result<T> {
    T::convert(options.get(name)).with_context(|| format!("option `{name}`"))
}

impl<T: ToOption> ToOption for Option<T> {
    fn to_option() -> CommandOption {
        T::to_option().required(false)
    }
}

impl ArgumentConverter for String {
    fn convert(data: &CommandOptionValue) -> Result<Self> {
        if let CommandOptionValue::String(value) = data {
            Ok(value.clone())
        } else {
            Err(anyhow!(Error::InvalidType))
        }
    }
}

impl ToOption for String {
    fn to_option() -> CommandOption {
        CommandOption::new(CommandOptionType::String)
    }
}

impl From<CommandOption> for twilight_model::application::command::CommandOption {
    fn from(option: CommandOption) -> Self {
        twilight_model::application::command::CommandOption {
            autocomplete: None,
            channel_types: None,
            choices: option.choices,
            name: option.name.unwrap_or_default(),
            description: option.description.unwrap_or_default(),
            kind: option.kind,
            max_length: option.max_length,
            max_value: None,
            min_length: option.min_length,
            min_value: None,
            required: Some(option.required),
            description_localizations: None,
            name_localizations: None,
            options: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(entries: &[(&str, CommandOptionValue)]) -> OptionValues {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn parses_present_string() {
        let options = values(&[("prompt", CommandOptionValue::String("hi".into()))]);
        let prompt: String = parse(&options, "prompt").unwrap();
        assert_eq!(prompt, "hi");
    }

    #[test]
    fn missing_required_string_is_an_error() {
        let err = parse::<String>(&OptionValues::new(), "prompt").unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Missing)));
        assert!(format!("{err:#}").contains("option `prompt`"));
    }

    #[test]
    fn missing_optional_string_is_none() {
        let model: Option<String> = parse(&OptionValues::new(), "model").unwrap();
        assert_eq!(model, None);
    }

    #[test]
    fn wrong_type_is_rejected() {
        let options = values(&[("prompt", CommandOptionValue::Boolean(true))]);
        let err = parse::<Option<String>>(&options, "prompt").unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidType)));
    }

    #[test]
    fn optional_options_are_not_required_on_the_wire() {
        let option: twilight_model::application::command::CommandOption =
            <Option<String>>::to_option()
                .name("model")
                .description("Model")
                .into();
        assert_eq!(option.name, "model");
        assert_eq!(option.kind, CommandOptionType::String);
        assert_eq!(option.required, Some(false));
    }
}
