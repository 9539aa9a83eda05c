//! Chat mode UI components.

use crate::records::UserId;
use crate::translation::LanguagePair;
use crate::ui::Style;

use super::transcript::{NumberedButton, Rendered};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(user: &UserId, languages: &LanguagePair, providers: &[&str]) {
    println!(
        "{} {} - Vocabulary chat",
        Style::header("vocab"),
        Style::version(format!("v{VERSION}"))
    );
    println!(
        "  {}       {}",
        Style::label("user"),
        Style::value(user)
    );
    println!(
        "  {}  {}",
        Style::label("languages"),
        Style::value(languages)
    );
    println!(
        "  {}  {}",
        Style::label("providers"),
        Style::secondary(providers.join(" → "))
    );
    println!(
        "{}",
        Style::hint("Type /help for commands, #<n> to press a button, /quit to leave")
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_rendered(rendered: &Rendered) {
    match rendered {
        Rendered::Sent { id, text, buttons } => {
            println!("{} {text}", Style::secondary(format!("[{}]", id.0)));
            print_buttons(buttons);
        }
        Rendered::Edited { id, before, text } => {
            println!(
                "{} {} {text}",
                Style::secondary(format!("[{}]", id.0)),
                Style::struck(before.replace('\n', " "))
            );
        }
        Rendered::Removed { id, text } => {
            println!(
                "{} {}",
                Style::secondary(format!("[{}]", id.0)),
                Style::struck(text.replace('\n', " "))
            );
        }
        Rendered::Unknown(id) => {
            println!(
                "{}",
                Style::hint(format!("(message {} is no longer on screen)", id.0))
            );
        }
    }
}

fn print_buttons(buttons: &[NumberedButton]) {
    if buttons.is_empty() {
        return;
    }
    let shown: Vec<String> = buttons
        .iter()
        .map(|b| format!("{} {}", Style::command(format!("#{}", b.number)), b.label))
        .collect();
    println!("    {}", shown.join("   "));
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
