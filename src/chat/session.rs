use anyhow::Result;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use std::sync::Arc;
use tracing::debug;

use super::command::{Input, SlashCommandCompleter, parse_input};
use super::transcript::Transcript;
use super::ui;
use crate::dialogue::{Command, DialogueEngine, Inbound};
use crate::records::UserId;
use crate::translation::LanguagePair;
use crate::ui::{cancellable, while_spinning};

/// An interactive terminal conversation with the dialogue engine, as one user.
pub struct ChatSession {
    engine: Arc<DialogueEngine>,
    user: UserId,
    languages: LanguagePair,
    transcript: Transcript,
}

impl ChatSession {
    pub fn new(engine: Arc<DialogueEngine>, user: UserId, languages: LanguagePair) -> Self {
        Self {
            engine,
            user,
            languages,
            transcript: Transcript::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header(
            &self.user,
            &self.languages,
            &self.engine.resolver().provider_names(),
        );

        // Greets the user and registers them with the user store.
        self.deliver(Inbound::Command(Command::Start)).await;

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let line = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .prompt();

            let Some(line) = cancellable(line)? else {
                println!(); // Clear line before goodbye message
                break;
            };

            let inbound = match parse_input(&line) {
                Input::Empty => continue,
                Input::Quit => break,
                Input::Command(command) => Inbound::Command(command),
                Input::Text(text) => Inbound::Text(text),
                Input::Press(number) => {
                    let Some(inbound) = self.transcript.press(number) else {
                        ui::print_error(&format!("There is no button #{number} on screen"));
                        continue;
                    };
                    inbound
                }
                Input::Unknown(cmd) => {
                    ui::print_error(&format!("Unknown command: /{cmd}"));
                    continue;
                }
            };

            self.deliver(inbound).await;
        }

        ui::print_goodbye();
        Ok(())
    }

    async fn deliver(&mut self, inbound: Inbound) {
        debug!(user = %self.user, ?inbound, "delivering message");
        let outbound = while_spinning("Thinking...", self.engine.handle(&self.user, inbound)).await;

        for instruction in outbound {
            let rendered = self.transcript.apply(instruction);
            ui::print_rendered(&rendered);
        }
        println!();
    }
}
