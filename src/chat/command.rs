use inquire::autocompletion::{Autocomplete, Replacement};

use crate::dialogue::Command;

// Available slash commands: (command, description)
const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/start", "Register and show the welcome message"),
    ("/add", "Add a word to your dictionary"),
    ("/dictionary", "Show your words"),
    ("/translate", "Translate a word"),
    ("/cancel", "Abandon the current step"),
    ("/help", "Show available commands"),
    ("/quit", "Exit chat mode"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

/// One line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Empty,
    /// A command forwarded to the dialogue engine.
    Command(Command),
    /// `#<n>`: press the button numbered `n`.
    Press(usize),
    Quit,
    Unknown(String),
    Text(String),
}

pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    if let Some(number) = input.strip_prefix('#')
        && let Ok(n) = number.trim().parse()
    {
        return Input::Press(n);
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Input::Text(input.to_string()), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> Input {
    let name = cmd.split_whitespace().next().unwrap_or_default();

    match name {
        "start" => Input::Command(Command::Start),
        "add" => Input::Command(Command::AddWord),
        "dictionary" | "dict" => Input::Command(Command::Dictionary),
        "translate" => Input::Command(Command::Translate),
        "help" => Input::Command(Command::Help),
        "cancel" => Input::Command(Command::Cancel),
        "quit" | "exit" | "q" => Input::Quit,
        _ => Input::Unknown(cmd.to_string()),
    }
}
