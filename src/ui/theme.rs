//! Colors for terminal output, via owo-colors.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Styles for different semantic elements.
pub struct Style;

impl Style {
    /// Section headers ("Configuration", "Supported languages")
    pub fn header<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    /// Keys in key/value listings
    pub fn label<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Primary values such as provider names and the current user
    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    /// Endpoints, descriptions and other supplementary info
    pub fn secondary<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    pub fn success<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    pub fn error<T: Display>(text: T) -> String {
        format!("{}", text.red().bold())
    }

    /// Slash commands and button numbers
    pub fn command<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    pub fn code<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    pub fn hint<T: Display>(text: T) -> String {
        format!("{}", text.dimmed().italic())
    }

    pub fn version<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Text of a message that was later changed or withdrawn
    pub fn struck<T: Display>(text: T) -> String {
        format!("{}", text.strikethrough().dimmed())
    }
}
