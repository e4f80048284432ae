use anyhow::Result;
use async_trait::async_trait;
use twilight_model::application::{
    command::{Command, CommandOptionChoice, CommandType},
    interaction::InteractionContextType,
};
use twilight_util::builder::command::CommandBuilder;

use crate::{
    arguments::{CommandOption, OptionValues},
    executor::context::InteractionContext,
};

pub mod prompt;
pub mod sumar;

/// A struct that can be built from the options of a slash command.
///
/// Usually implemented with `#[derive(Command)]`.
pub trait CommandArgs: Send + Sync + 'static + Sized {
    /// Gets a list of options for this command
    fn options() -> Vec<CommandOption>;
    /// Converts the option values of an interaction into this command
    fn from_options(options: &OptionValues) -> Result<Self>;

    /// The command description as rendered in the discord client
    fn description() -> &'static str;
    /// The command's name
    fn name() -> &'static str;
}

/// The schema of a slash command as it is deployed to Discord.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    name: String,
    description: String,
    options: Vec<CommandOption>,
}

impl CommandDescriptor {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            options: Vec::new(),
        }
    }

    pub fn from_args<C: CommandArgs>() -> Self {
        Self {
            name: C::name().to_string(),
            description: C::description().to_string(),
            options: C::options(),
        }
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Restricts the option called `option` to a fixed set of choices.
    pub fn with_choices(mut self, option: &str, choices: Vec<CommandOptionChoice>) -> Self {
        if let Some(target) = self
            .options
            .iter_mut()
            .find(|o| o.name.as_deref() == Some(option))
        {
            target.choices = Some(choices);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    /// Converts the descriptor into the wire model accepted by the bulk command endpoints.
    pub fn to_command(&self) -> Command {
        let mut command = CommandBuilder::new(&self.name, &self.description, CommandType::ChatInput)
            .contexts(vec![
                InteractionContextType::Guild,
                InteractionContextType::BotDm,
                InteractionContextType::PrivateChannel,
            ]);
        for option in &self.options {
            command = command.option(option.clone());
        }
        command.build()
    }
}

/// A slash command that can be registered and dispatched.
#[async_trait]
pub trait SlashCommand: Send + Sync {
    fn descriptor(&self) -> &CommandDescriptor;

    async fn execute(&self, ctx: &mut InteractionContext) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use twilight_model::application::command::{CommandOptionChoiceValue, CommandOptionType};

    use super::*;
    use crate::arguments::ToOption;

    fn choice(value: &str) -> CommandOptionChoice {
        CommandOptionChoice {
            name: value.to_uppercase(),
            value: CommandOptionChoiceValue::String(value.to_string()),
            name_localizations: None,
        }
    }

    fn descriptor() -> CommandDescriptor {
        CommandDescriptor::new("ask", "Ask something")
            .option(String::to_option().name("question").description("Question"))
            .option(<Option<String>>::to_option().name("tone").description("Tone"))
    }

    #[test]
    fn choices_only_touch_the_named_option() {
        let descriptor = descriptor().with_choices("tone", vec![choice("dry"), choice("warm")]);

        assert!(descriptor.options()[0].choices.is_none());
        assert_eq!(descriptor.options()[1].choices.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn unknown_option_leaves_descriptor_unchanged() {
        let descriptor = descriptor().with_choices("missing", vec![choice("x")]);
        assert!(descriptor.options().iter().all(|o| o.choices.is_none()));
    }

    #[test]
    fn converts_to_chat_input_command() {
        let command = descriptor().to_command();

        assert_eq!(command.name, "ask");
        assert_eq!(command.description, "Ask something");
        assert_eq!(command.kind, CommandType::ChatInput);
        let names = command
            .options
            .iter()
            .map(|o| o.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["question", "tone"]);
        assert_eq!(command.options[0].kind, CommandOptionType::String);
        assert_eq!(command.options[0].required, Some(true));
        assert_eq!(command.options[1].required, Some(false));
    }
}
