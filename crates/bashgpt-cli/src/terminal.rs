use anyhow::Result;
use bashgpt_core::{Console, EndOfInput};
use std::io::{self, BufRead, Write};

pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(EndOfInput.into());
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn print(&mut self, text: &str) {
        println!("{text}");
    }
}
