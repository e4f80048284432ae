//! Routing of inbound Discord events to command handlers.

pub mod context;
pub mod prefix;
pub mod slash;

pub use context::{InteractionContext, InteractionHandle, Responder};
pub use prefix::PrefixCommands;
pub use slash::{DispatchOutcome, SlashDispatcher};
