use std::num::ParseFloatError;

pub(super) const HELP: &str = "
Commands:
quit: Exit the application.
new: Start a new conversation.
settemperature <value>: Set the temperature for the current conversation.
setprompt <alias> <prompt>: Set a custom prompt with an alias.
<alias>: Use a custom prompt.
If a shell script is detected in the AI's response, you will be asked if you want to execute it.
";

#[derive(Debug, PartialEq)]
pub(super) enum Command<'a> {
    Quit,
    New,
    Help,
    SetTemperature(f64),
    SetPrompt { alias: &'a str, text: &'a str },
    /// Anything else; may still be a prompt alias.
    Message(&'a str),
}

#[derive(Debug, thiserror::Error)]
pub(super) enum CommandError {
    #[error("invalid temperature `{value}`")]
    InvalidTemperature {
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("usage: setprompt <alias> <prompt>")]
    MissingPromptText,
}

pub(super) fn parse_temperature(value: &str) -> Result<f64, CommandError> {
    value
        .parse()
        .map_err(|source| CommandError::InvalidTemperature {
            value: value.to_string(),
            source,
        })
}

/// Strips a case-insensitive `prefix` from `line`.
fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}

impl<'a> Command<'a> {
    pub(super) fn parse(line: &'a str) -> Result<Self, CommandError> {
        if line.eq_ignore_ascii_case("quit") {
            return Ok(Command::Quit);
        }
        if line.eq_ignore_ascii_case("new") {
            return Ok(Command::New);
        }
        if line.eq_ignore_ascii_case("help") {
            return Ok(Command::Help);
        }
        if let Some(rest) = strip_prefix_ignore_case(line, "settemperature ") {
            let value = rest.split(' ').next().unwrap_or_default();
            return parse_temperature(value).map(Command::SetTemperature);
        }
        if let Some(rest) = strip_prefix_ignore_case(line, "setprompt ") {
            let (alias, text) = rest
                .split_once(' ')
                .ok_or(CommandError::MissingPromptText)?;
            return Ok(Command::SetPrompt { alias, text });
        }
        Ok(Command::Message(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(Command::parse("QUIT").unwrap(), Command::Quit);
        assert_eq!(Command::parse("New").unwrap(), Command::New);
        assert_eq!(Command::parse("help").unwrap(), Command::Help);
    }

    #[test]
    fn settemperature_parses_exactly() {
        assert_eq!(
            Command::parse("settemperature 0.9").unwrap(),
            Command::SetTemperature(0.9)
        );
        assert_eq!(
            Command::parse("SetTemperature 1 ignored").unwrap(),
            Command::SetTemperature(1.0)
        );
    }

    #[test]
    fn settemperature_rejects_non_numbers() {
        let err = Command::parse("settemperature abc").unwrap_err();
        assert!(matches!(err, CommandError::InvalidTemperature { ref value, .. } if value == "abc"));
    }

    #[test]
    fn setprompt_keeps_the_rest_of_the_line_as_text() {
        assert_eq!(
            Command::parse("setprompt Review Please review this code.").unwrap(),
            Command::SetPrompt {
                alias: "Review",
                text: "Please review this code."
            }
        );
    }

    #[test]
    fn setprompt_without_text_is_an_error() {
        assert!(matches!(
            Command::parse("setprompt review"),
            Err(CommandError::MissingPromptText)
        ));
    }

    #[test]
    fn bare_command_words_are_messages() {
        assert_eq!(
            Command::parse("settemperature").unwrap(),
            Command::Message("settemperature")
        );
        assert_eq!(
            Command::parse("quit now").unwrap(),
            Command::Message("quit now")
        );
    }

    #[test]
    fn non_ascii_input_is_a_message() {
        assert_eq!(Command::parse("héllo").unwrap(), Command::Message("héllo"));
    }
}
