//! Terminal confirmation prompt.

use std::io::{self, BufRead};

use archiver::ConfirmationGate;
use async_trait::async_trait;
use console::{Term, style};

/// Asks on stdout and reads one line from stdin.
///
/// Stdin is read directly rather than through the terminal so that an
/// answer can be piped in. A closed stdin reads as an empty answer.
pub struct TerminalGate;

#[async_trait]
impl ConfirmationGate for TerminalGate {
    async fn ask(&self, prompt: &str) -> io::Result<String> {
        let prompt = format!("{}", style(prompt).bold());
        tokio::task::spawn_blocking(move || {
            let term = Term::stdout();
            term.write_str(&prompt)?;
            term.flush()?;

            let mut answer = String::new();
            io::stdin().lock().read_line(&mut answer)?;
            Ok(answer)
        })
        .await
        .map_err(io::Error::other)?
    }
}
