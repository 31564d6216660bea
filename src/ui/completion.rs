//! Shell completion generation and installation

use crate::core::{MarkdashError, Result};
use crate::ui::cli::Cli;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const BIN_NAME: &str = "markdash";

/// Write the completion script for `shell` to `out`
pub fn write_completions<W: Write>(shell: Shell, out: &mut W) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

/// Render the completion script for `shell` as a string
pub fn completion_script(shell: Shell) -> Result<String> {
    let mut buf = Vec::new();
    write_completions(shell, &mut buf);
    String::from_utf8(buf).map_err(|e| {
        MarkdashError::InvalidArgument(format!("Completion script is not UTF-8: {e}"))
    })
}

/// Install the completion script under the user's home directory.
///
/// Returns the setup instructions to show the user.
pub fn install_completion(shell: Shell) -> Result<String> {
    let home = std::env::var("HOME")
        .map_err(|_| MarkdashError::Config("HOME environment variable not set".to_string()))?;

    let dir = completion_directory(shell, Path::new(&home))?;
    let path = dir.join(completion_filename(shell));
    fs::write(&path, completion_script(shell)?)?;

    Ok(format!(
        "Shell completion installed to {}\n\n{}",
        path.display(),
        setup_instructions(shell)
    ))
}

fn candidate_directories(shell: Shell, home: &Path) -> Result<Vec<PathBuf>> {
    let candidates = match shell {
        Shell::Bash => vec![
            home.join(".local/share/bash-completion/completions"),
            home.join(".bash_completion.d"),
        ],
        Shell::Zsh => vec![
            home.join(".local/share/zsh/site-functions"),
            home.join(".zsh/completions"),
        ],
        Shell::Fish => vec![home.join(".config/fish/completions")],
        other => {
            return Err(MarkdashError::InvalidArgument(format!(
                "Installing completions for {other} is not supported; run '{BIN_NAME} completion-generate {other}' and load the script from your shell profile"
            )));
        }
    };
    Ok(candidates)
}

/// First candidate whose parent already exists, otherwise the preferred one
fn completion_directory(shell: Shell, home: &Path) -> Result<PathBuf> {
    let candidates = candidate_directories(shell, home)?;

    let chosen = candidates
        .iter()
        .find(|dir| dir.parent().is_some_and(Path::exists))
        .or_else(|| candidates.first())
        .cloned()
        .ok_or_else(|| MarkdashError::Config(format!("No completion directory for {shell}")))?;

    fs::create_dir_all(&chosen)?;
    Ok(chosen)
}

fn completion_filename(shell: Shell) -> String {
    match shell {
        Shell::Zsh => format!("_{BIN_NAME}"),
        Shell::Fish => format!("{BIN_NAME}.fish"),
        _ => BIN_NAME.to_string(),
    }
}

fn setup_instructions(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => {
            "Make sure bash-completion is loaded from ~/.bashrc, then restart your shell."
        }
        Shell::Zsh => {
            "Add the directory to fpath in ~/.zshrc before compinit:\n  fpath=(~/.local/share/zsh/site-functions $fpath)\n  autoload -U compinit && compinit"
        }
        Shell::Fish => "Fish loads completions automatically; open a new shell to use them.",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_completion_script__mentions_subcommands() {
        let script = completion_script(Shell::Bash).unwrap();
        assert!(script.contains(BIN_NAME));
        assert!(script.contains("compare"));
        assert!(script.contains("summary"));
    }

    #[test]
    fn test_completion_script__every_shell_renders() {
        for shell in [
            Shell::Bash,
            Shell::Zsh,
            Shell::Fish,
            Shell::PowerShell,
            Shell::Elvish,
        ] {
            assert!(!completion_script(shell).unwrap().is_empty(), "{shell}");
        }
    }

    #[test]
    fn test_completion_filename() {
        assert_eq!(completion_filename(Shell::Bash), "markdash");
        assert_eq!(completion_filename(Shell::Zsh), "_markdash");
        assert_eq!(completion_filename(Shell::Fish), "markdash.fish");
    }

    #[test]
    fn test_completion_directory__prefers_existing_parent() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".zsh")).unwrap();

        let dir = completion_directory(Shell::Zsh, home.path()).unwrap();
        assert_eq!(dir, home.path().join(".zsh/completions"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_completion_directory__falls_back_to_preferred() {
        let home = TempDir::new().unwrap();

        let dir = completion_directory(Shell::Bash, home.path()).unwrap();
        assert_eq!(dir, home.path().join(".local/share/bash-completion/completions"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_completion_directory__unsupported_shell() {
        let home = TempDir::new().unwrap();
        let err = completion_directory(Shell::PowerShell, home.path()).unwrap_err();
        assert!(matches!(err, MarkdashError::InvalidArgument(_)));
    }

    #[test]
    #[serial]
    fn test_install_completion__writes_fish_script() {
        let home = TempDir::new().unwrap();
        let original = std::env::var("HOME").ok();
        unsafe { std::env::set_var("HOME", home.path()) };

        let result = install_completion(Shell::Fish);

        match original {
            Some(value) => unsafe { std::env::set_var("HOME", value) },
            None => unsafe { std::env::remove_var("HOME") },
        }

        let message = result.unwrap();
        let installed = home.path().join(".config/fish/completions/markdash.fish");
        assert!(installed.exists());
        assert!(message.contains("markdash.fish"));
    }
}
