use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;

use crate::{BIN_NAME, Cli};

fn write_completions(shell: clap_complete::Shell, sink: &mut impl Write) {
    clap_complete::generate(shell, &mut Cli::command(), BIN_NAME, sink);
}

fn write_man_page(sink: &mut impl Write) -> io::Result<()> {
    clap_mangen::Man::new(Cli::command()).render(sink)
}

/// Pages for the top-level command and each subcommand land in `dir`.
fn write_man_pages(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    clap_mangen::generate_to(Cli::command(), dir)
}

pub(crate) fn handle_completions(
    shell: clap_complete::Shell,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout().lock();
    write_completions(shell, &mut stdout);
    stdout.flush()?;
    Ok(())
}

pub(crate) fn handle_man(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = output {
        write_man_pages(&dir)?;
        println!("Wrote man pages to {}", dir.display());
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    write_man_page(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completions_for(shell: clap_complete::Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_completions_cover_both_profiles() {
        for shell in [clap_complete::Shell::Bash, clap_complete::Shell::Zsh] {
            let script = completions_for(shell);
            assert!(script.contains(BIN_NAME), "{shell}: missing binary name");
            assert!(script.contains("archive"), "{shell}: missing archive");
            assert!(script.contains("scheduled"), "{shell}: missing scheduled");
        }
    }

    #[test]
    fn test_man_page_title() {
        let mut buf = Vec::new();
        write_man_page(&mut buf).unwrap();
        let page = String::from_utf8(buf).unwrap();
        assert!(page.to_lowercase().contains(".th gh-archiver"));
    }

    #[test]
    fn test_man_pages_written_per_subcommand() {
        let dir = std::env::temp_dir().join(format!(
            "gh-archiver-man-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));

        write_man_pages(&dir).unwrap();

        assert!(dir.join("gh-archiver.1").exists());
        assert!(dir.join("gh-archiver-scheduled.1").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
