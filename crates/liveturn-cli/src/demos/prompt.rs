//! Line-oriented stdin prompt for the interactive demos.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `> ` and read the next non-empty line, trimmed. `None` on EOF.
    pub async fn next(&mut self) -> std::io::Result<Option<String>> {
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            let line = line.trim();
            if !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
        }
    }
}

/// Case-insensitive keyword match for REPL commands.
pub fn is_command(input: &str, command: &str) -> bool {
    input.eq_ignore_ascii_case(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_ignore_case() {
        assert!(is_command("QUIT", "quit"));
        assert!(is_command("Show", "show"));
        assert!(!is_command("quit now", "quit"));
    }
}
