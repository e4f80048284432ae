use std::collections::HashMap;

use tracing::debug;

use crate::commands::sumar;

/// Handles a prefix command: receives the active prefix and the arguments,
/// returns the text to reply with.
pub type PrefixHandler = fn(&str, &[&str]) -> Option<String>;

/// Legacy text commands such as `!sumar 1 2`.
pub struct PrefixCommands {
    prefix: String,
    commands: HashMap<String, PrefixHandler>,
}

impl PrefixCommands {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            commands: HashMap::new(),
        }
    }

    /// The commands the bot ships with.
    pub fn with_defaults(prefix: &str) -> Self {
        let mut commands = Self::new(prefix);
        commands.register("sumar", sumar::execute);
        commands
    }

    /// Registers a prefix command. Names are case-insensitive.
    pub fn register(&mut self, name: &str, handler: PrefixHandler) {
        self.commands.insert(name.to_lowercase(), handler);
    }

    /// Gets a registered prefix command.
    pub fn get(&self, name: &str) -> Option<&PrefixHandler> {
        self.commands.get(&name.to_lowercase())
    }

    /// Executes the command in `content` if it is addressed to the bot.
    ///
    /// Messages from bots, messages without the prefix and unknown commands
    /// yield `None`.
    pub fn execute(&self, author_is_bot: bool, content: &str) -> Option<String> {
        if author_is_bot {
            return None;
        }
        let rest = content.strip_prefix(self.prefix.as_str())?;
        let mut tokens = rest.split_whitespace();
        let name = tokens.next()?;
        let handler = self.get(name)?;
        let args = tokens.collect::<Vec<_>>();

        debug!(command = name, args = args.len(), "Executing prefix command");
        handler(&self.prefix, &args)
    }
}
