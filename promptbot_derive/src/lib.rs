use proc_macro::TokenStream;

mod command;

/// Derives `promptbot::commands::CommandArgs` for a struct whose fields are the
/// options of a slash command.
#[proc_macro_derive(Command, attributes(option, command))]
pub fn command_derive(input: TokenStream) -> TokenStream {
    command::derive(input)
}
