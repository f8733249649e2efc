mod commands;
mod error;
mod models;

use commands::Command;
use error::DashboardError;
use models::config::{Config, DEFAULT_CONFIG_PATH};
use models::context::Context;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::env;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    let config = Config::load(Path::new(DEFAULT_CONFIG_PATH))?;
    TermLogger::init(
        config.level_filter()?,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let args: Vec<String> = env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let context = Context::new(config)?;
    let result = match command {
        Command::Summary(period) => commands::summary::run(&context, period).await,
        Command::Search(text) => commands::search::run(&context, &text).await,
    };
    context.dispose();

    result
}
