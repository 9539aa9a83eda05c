use clap::{Parser, Subcommand};

use crate::config::{ResolveOptions, StorageBackend};

#[derive(Parser, Debug)]
#[command(name = "vocab")]
#[command(about = "Conversational vocabulary assistant with multi-provider translation")]
#[command(version)]
pub struct Args {
    /// Identity to chat as (defaults to bot.user, then $USER)
    #[arg(short = 'u', long, global = true)]
    pub user: Option<String>,

    /// Source language code (ISO 639-1, e.g., en, de)
    #[arg(short = 'f', long = "from", global = true)]
    pub from: Option<String>,

    /// Target language code (ISO 639-1, e.g., ru, ja)
    #[arg(short = 't', long = "to", global = true)]
    pub to: Option<String>,

    /// Translation provider, repeat to set the fallback order (google, mymemory)
    #[arg(short = 'p', long = "provider", global = true)]
    pub providers: Vec<String>,

    /// Where words are stored
    #[arg(short = 's', long, value_enum, global = true)]
    pub storage: Option<StorageBackend>,

    /// Log verbosity (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// CLI values that override the config file.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            user: self.user.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            providers: self.providers.clone(),
            storage: self.storage,
            log_level: self.log_level.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Talk to the assistant in the terminal (default)
    Chat,
    /// Translate a single word through the provider chain
    Translate {
        /// Word to translate
        word: String,
    },
    /// List translation providers in priority order
    Providers,
    /// List supported language codes
    Languages,
    /// Show the effective configuration
    Config {
        /// Write a starter config file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}
