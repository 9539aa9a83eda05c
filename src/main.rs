use anyhow::Result;
use clap::Parser;

use vocab_bot::cli::commands::{chat, config, providers, translate};
use vocab_bot::cli::{Args, Command, ConfigProblem, exit_code};
use vocab_bot::config::{ConfigManager, resolve_config};
use vocab_bot::logging;
use vocab_bot::translation::print_languages;
use vocab_bot::ui::Style;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(err) = run(args).await {
        eprintln!("{} {err:#}", Style::error("Error:"));
        std::process::exit(exit_code(&err));
    }
}

async fn run(args: Args) -> Result<()> {
    let manager = ConfigManager::new().map_err(ConfigProblem)?;
    let options = args.resolve_options();

    // These need no resolved configuration, so they work even when it is broken.
    match args.command {
        Some(Command::Languages) => {
            print_languages();
            Ok(())
        }
        Some(Command::Config { init: true, force }) => config::init_config(&manager, force),
        command => {
            let file = manager.load_or_default().map_err(ConfigProblem)?;
            let resolved = resolve_config(&options, &file).map_err(ConfigProblem)?;
            logging::init(&resolved.log_level);

            match command {
                Some(Command::Config { .. }) => config::print_config(&manager, &resolved),
                Some(Command::Providers) => providers::print_providers(&resolved)?,
                Some(Command::Translate { word }) => {
                    translate::run_translate(&resolved, &word).await?;
                }
                Some(Command::Languages) => print_languages(),
                Some(Command::Chat) | None => chat::run_chat(&resolved).await?,
            }
            Ok(())
        }
    }
}
