//! Command handlers.

use crate::state::AppState;
use anyhow::{Context, anyhow};
use clap::Subcommand;
use std::io::Write;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the names of all available character options
    List,
    /// Print one set of character options as JSON
    Show {
        /// Name of the character options
        name: String,
    },
    /// Load every descriptor and report whether loading succeeded
    Check,
}

/// Run a command, writing its output to `out`.
pub async fn run(command: Command, state: &AppState, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::List => list(state, out).await,
        Command::Show { name } => show(state, &name, out).await,
        Command::Check => check(state, out).await,
    }
}

async fn list(state: &AppState, out: &mut impl Write) -> anyhow::Result<()> {
    let options = state.options().await?;
    for name in options.sorted_keys() {
        if let Some(entry) = options.get(name) {
            writeln!(out, "{}\t{}", name, entry.build_method)?;
        }
    }
    Ok(())
}

async fn show(state: &AppState, name: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let options = state.options().await?;
    let entry = options
        .get(name)
        .ok_or_else(|| anyhow!("no character options named {name:?}"))?;
    let json = serde_json::to_string_pretty(entry.as_ref())
        .context("failed to serialize character options")?;
    writeln!(out, "{json}")?;
    Ok(())
}

async fn check(state: &AppState, out: &mut impl Write) -> anyhow::Result<()> {
    let options = state
        .options()
        .await
        .context("character options failed to load")?;
    writeln!(
        out,
        "{} character options loaded ({})",
        options.len(),
        state.status()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadedConfig;
    use charopt_core::FanOut;
    use std::time::Duration;

    fn state(overrides_dir: Option<std::path::PathBuf>, modules: &[&str]) -> AppState {
        AppState::new(&LoadedConfig {
            overrides_dir,
            enabled_modules: modules.iter().map(|m| m.to_string()).collect(),
            fan_out: FanOut::Parallel,
            wait_timeout: Duration::from_secs(5),
        })
    }

    async fn output(command: Command, state: &AppState) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run(command, state, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let listing = output(Command::List, &state(None, &[])).await.unwrap();
        let names: Vec<&str> = listing
            .lines()
            .map(|line| line.split('\t').next().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["Karma Build", "Prime Runner", "Standard", "Street Level"]
        );
    }

    #[tokio::test]
    async fn test_show_prints_json() {
        let json = output(
            Command::Show {
                name: "Life Modules".to_string(),
            },
            &state(None, &["run-faster"]),
        )
        .await
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["build_method"], "life_module");
        assert_eq!(value["module"], "run-faster");
    }

    #[tokio::test]
    async fn test_show_unknown_name_fails() {
        let result = output(
            Command::Show {
                name: "Life Modules".to_string(),
            },
            &state(None, &[]),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_check_fails_on_unreadable_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("settings");
        std::fs::write(&not_a_dir, "").unwrap();
        let state = state(Some(not_a_dir), &[]);

        assert!(output(Command::Check, &state).await.is_err());

        // Later callers see the built-in entries that loaded before the fault.
        let report = output(Command::Check, &state).await.unwrap();
        assert_eq!(report.trim(), "4 character options loaded (ready)");
    }
}
