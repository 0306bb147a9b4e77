//! Color theme.
//!
//! Colors are stored as opaque strings; the frontend decides how to parse
//! them. Saved themes live in the key-value store as one name-indexed map.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use shello_core::CommandError;

/// Name-indexed saved themes, stored under [`shello_core::store::THEMES_KEY`].
pub type SavedThemes = BTreeMap<String, Theme>;

/// Themeable colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Body text.
    pub text: String,
    /// Background.
    pub background: String,
    /// Borders.
    pub border: String,
    /// The local user's own messages.
    pub own_message: String,
    /// Highlights and the sender column.
    pub highlight: String,
    /// Info and system entries.
    pub system: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: "white".into(),
            background: "black".into(),
            border: "gray".into(),
            own_message: "cyan".into(),
            highlight: "yellow".into(),
            system: "darkgray".into(),
        }
    }
}

impl Theme {
    /// Apply `-flag value` pairs.
    ///
    /// Flags: `-tc` text, `-bg` background, `-bc` border, `-ob` own message,
    /// `-hv` highlight, `-sc` system. Nothing is applied unless every pair is
    /// valid.
    ///
    /// # Errors
    ///
    /// - `CommandError::BadArguments` for an unknown flag or a flag without a
    ///   value
    pub fn apply_flags(&mut self, args: &[String]) -> Result<(), CommandError> {
        let mut updated = self.clone();

        for pair in args.chunks(2) {
            let [flag, value] = pair else {
                return Err(CommandError::bad_args(format!("missing value for {}", pair[0])));
            };

            let slot = match flag.as_str() {
                "-tc" => &mut updated.text,
                "-bg" => &mut updated.background,
                "-bc" => &mut updated.border,
                "-ob" => &mut updated.own_message,
                "-hv" => &mut updated.highlight,
                "-sc" => &mut updated.system,
                other => {
                    return Err(CommandError::bad_args(format!(
                        "unknown theme flag {other} (expected -tc, -bg, -bc, -ob, -hv or -sc)"
                    )));
                },
            };
            slot.clone_from(value);
        }

        *self = updated;
        Ok(())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "text {} | background {} | border {} | own {} | highlight {} | system {}",
            self.text, self.background, self.border, self.own_message, self.highlight, self.system
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_string()).collect()
    }

    #[test]
    fn flags_set_colors() {
        let mut theme = Theme::default();
        theme.apply_flags(&args(&["-tc", "green", "-ob", "#ff8800"])).unwrap();

        assert_eq!(theme.text, "green");
        assert_eq!(theme.own_message, "#ff8800");
        assert_eq!(theme.background, "black");
    }

    #[test]
    fn bad_flag_changes_nothing() {
        let mut theme = Theme::default();
        let result = theme.apply_flags(&args(&["-tc", "green", "-zz", "red"]));

        assert!(matches!(result, Err(CommandError::BadArguments(_))));
        assert_eq!(theme, Theme::default());
    }

    #[test]
    fn dangling_flag_is_rejected() {
        let mut theme = Theme::default();
        let result = theme.apply_flags(&args(&["-bg"]));

        assert!(matches!(result, Err(CommandError::BadArguments(message)) if message.contains("-bg")));
    }
}
