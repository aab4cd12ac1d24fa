use anyhow::Result;

/// Returned by [`Console::read_line`] once input is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("end of input")]
pub struct EndOfInput;

/// Line-based operator I/O. The CLI backs it with stdin/stdout.
pub trait Console {
    /// Prints `prompt` without a newline and returns the next input line,
    /// with the trailing newline removed. Fails with [`EndOfInput`] at EOF.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    fn print(&mut self, text: &str);

    /// `true` only for a `y`/`Y` answer. End of input counts as "no".
    fn confirm(&mut self, question: &str) -> Result<bool> {
        match self.read_line(question) {
            Ok(answer) => Ok(answer.trim().eq_ignore_ascii_case("y")),
            Err(e) if e.is::<EndOfInput>() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Console, EndOfInput};
    use anyhow::Result;
    use std::collections::VecDeque;

    /// Replays canned answers and records everything shown to the operator.
    #[derive(Default)]
    pub struct ScriptedConsole {
        pub answers: VecDeque<String>,
        pub transcript: Vec<String>,
    }

    impl ScriptedConsole {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                transcript: Vec::new(),
            }
        }
    }

    impl Console for ScriptedConsole {
        fn read_line(&mut self, prompt: &str) -> Result<String> {
            self.transcript.push(prompt.to_string());
            self.answers.pop_front().ok_or_else(|| EndOfInput.into())
        }

        fn print(&mut self, text: &str) {
            self.transcript.push(text.to_string());
        }
    }

    #[test]
    fn confirm_accepts_only_y() {
        let mut console = ScriptedConsole::new(&["Y", "yes", " y "]);
        assert!(console.confirm("go? ").unwrap());
        assert!(!console.confirm("go? ").unwrap());
        assert!(console.confirm("go? ").unwrap());
    }

    #[test]
    fn confirm_at_end_of_input_is_no() {
        let mut console = ScriptedConsole::default();
        assert!(!console.confirm("go? ").unwrap());
    }
}
