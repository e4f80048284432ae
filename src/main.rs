use std::{process::ExitCode, sync::Arc};

use promptbot::{
    bot::{self, Bot},
    config::BotConfig,
    generator::SimulatedGenerator,
    logging,
};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine, the variables may come from the environment.
    dotenv::dotenv().ok();
    logging::init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration, create .env from .env.example");
            return ExitCode::FAILURE;
        }
    };

    let bot = match Bot::new(config, Arc::new(SimulatedGenerator)) {
        Ok(bot) => bot,
        Err(e) => {
            error!(error = %e, "Unable to register commands");
            return ExitCode::FAILURE;
        }
    };

    match bot.start(bot::shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "Error starting bot");
            ExitCode::FAILURE
        }
    }
}
