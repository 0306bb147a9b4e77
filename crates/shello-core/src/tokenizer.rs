//! Command-line tokenizer.
//!
//! Splits an input line into a command name and arguments. Unicode whitespace
//! separates tokens outside quotes. A `"` or `'` opens a span that only the
//! same character closes; everything inside is kept verbatim, whitespace
//! included. There are no escapes and quotes do not nest.
//!
//! Quotes glue to adjacent text (`a"b c"` is the single token `ab c`), and a
//! quote pair with nothing inside adds nothing: `''` alone yields no token.

use crate::error::ParseError;

/// A tokenized input line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    /// First token. Empty for a blank line.
    pub command: String,
    /// Remaining tokens in input order.
    pub args: Vec<String>,
}

impl CommandLine {
    /// Line held no tokens.
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }
}

/// Tokenize `line`.
///
/// # Errors
///
/// - `ParseError::UnterminatedQuote` if the line ends inside a quoted span.
///   Nothing is returned in that case, so no partial command can run.
pub fn parse(line: &str) -> Result<CommandLine, ParseError> {
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut open_quote: Option<(char, usize)> = None;

    for (column, ch) in line.chars().enumerate() {
        match open_quote {
            Some((quote, _)) if ch == quote => open_quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => open_quote = Some((ch, column)),
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            },
            None => current.push(ch),
        }
    }

    if let Some((quote, column)) = open_quote {
        return Err(ParseError::UnterminatedQuote { quote, column });
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    let mut tokens = tokens.into_iter();
    let command = tokens.next().unwrap_or_default();
    Ok(CommandLine { command, args: tokens.collect() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> (String, Vec<String>) {
        let parsed = parse(line).unwrap();
        (parsed.command, parsed.args)
    }

    #[test]
    fn double_quotes_group_words() {
        assert_eq!(tokens(r#"send "a b" c"#), ("send".into(), vec!["a b".into(), "c".into()]));
    }

    #[test]
    fn single_quotes_keep_double_quotes_verbatim() {
        assert_eq!(tokens(r#"send 'say "hi"'"#), ("send".into(), vec![r#"say "hi""#.into()]));
    }

    #[test]
    fn unterminated_quote_aborts() {
        assert_eq!(
            parse("send 'x"),
            Err(ParseError::UnterminatedQuote { quote: '\'', column: 5 })
        );
    }

    #[test]
    fn blank_line_is_empty() {
        let parsed = parse("   \t ").unwrap();
        assert!(parsed.is_empty());
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn empty_quotes_contribute_nothing() {
        assert_eq!(tokens(r#"theme "" save"#), ("theme".into(), vec!["save".into()]));
    }

    #[test]
    fn quote_glues_to_adjacent_text() {
        assert_eq!(tokens(r#"create room a"b c"d"#), ("create".into(), vec![
            "room".into(),
            "ab cd".into()
        ]));
    }

    #[test]
    fn unicode_whitespace_separates() {
        assert_eq!(tokens("send\u{3000}hi\u{00a0}there"), ("send".into(), vec![
            "hi".into(),
            "there".into()
        ]));
    }
}
