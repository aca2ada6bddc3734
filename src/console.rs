use console::{Emoji, Term};
use std::io::{self, BufRead, Write};

// Emojis with text fallbacks
pub static CHECKMARK: Emoji = Emoji("✅ ", "[ok] ");
pub static CROSS: Emoji = Emoji("❌ ", "[x] ");
pub static INFO: Emoji = Emoji("ℹ️ ", "i ");
pub static WARNING: Emoji = Emoji("⚠️ ", "! ");
pub static ROCKET: Emoji = Emoji("🚀 ", "> ");
pub static ARROW: Emoji = Emoji("➡️ ", "-> ");
pub static MEMO: Emoji = Emoji("📝 ", "");

/// Terminal operations the tool needs. Kept behind a trait so the prompt
/// and the report can be driven from tests.
pub trait Console {
    fn print_line(&mut self, line: &str);

    /// Print `marker` without a newline and read one line.
    /// Returns `Ok(None)` once input is closed.
    fn prompt(&mut self, marker: &str) -> io::Result<Option<String>>;

    fn clear(&mut self);

    fn set_title(&mut self, title: &str);
}

/// Console backed by the process stdin/stdout
pub struct StdConsole {
    term: Term,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn print_line(&mut self, line: &str) {
        println!("{line}");
    }

    fn prompt(&mut self, marker: &str) -> io::Result<Option<String>> {
        print!("{marker}");
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn clear(&mut self) {
        if self.term.is_term() {
            let _ = self.term.clear_screen();
        }
    }

    fn set_title(&mut self, title: &str) {
        if self.term.is_term() {
            // OSC 0: window and icon title
            print!("\x1B]0;{title}\x07");
            let _ = io::stdout().flush();
        }
    }
}

/// Console replaying canned input and recording everything printed
#[cfg(test)]
#[derive(Default)]
pub(crate) struct ScriptedConsole {
    pub inputs: std::collections::VecDeque<String>,
    pub output: Vec<String>,
    pub prompts: usize,
    pub clears: usize,
    pub title: Option<String>,
}

#[cfg(test)]
impl ScriptedConsole {
    pub fn with_inputs(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn printed(&self) -> String {
        self.output.join("\n")
    }
}

#[cfg(test)]
impl Console for ScriptedConsole {
    fn print_line(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn prompt(&mut self, _marker: &str) -> io::Result<Option<String>> {
        self.prompts += 1;
        Ok(self.inputs.pop_front())
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }
}
