use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for castlefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run a short headless match and a replay check through the CLI
    Smoke {
        /// RNG seed passed to the CLI
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Doc => run_doc()?,
        Commands::Build => cargo("build", &["build", "--workspace"])?,
        Commands::Smoke { seed } => run_smoke(seed)?,
    }

    Ok(())
}

/// Run `cargo <args>`, failing with `what` in the message on a non-zero exit.
fn cargo(what: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {what}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {what} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo("fmt --check", &["fmt", "--all", "--", "--check"])
}

fn run_clippy() -> Result<()> {
    cargo(
        "clippy",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )
}

fn run_tests() -> Result<()> {
    cargo("test", &["test", "--workspace"])
}

fn run_doc() -> Result<()> {
    cargo("doc", &["doc", "--workspace", "--no-deps"])
}

fn run_smoke(seed: u64) -> Result<()> {
    let seed = seed.to_string();
    let cli = ["run", "-p", "castlefront-cli", "--"];

    let simulate = [
        "simulate",
        "--seconds",
        "20",
        "--seed",
        seed.as_str(),
        "--player-every",
        "2",
    ];
    cargo("run (headless simulate)", &[&cli[..], &simulate[..]].concat())?;

    let replay = ["replay", "--seed", seed.as_str(), "--seconds", "20"];
    cargo("run (replay check)", &[&cli[..], &replay[..]].concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_runs_without_cargo_deny() {
        assert!(Cli::try_parse_from(["xtask", "deny"]).is_err());
        assert!(matches!(
            Cli::try_parse_from(["xtask", "check"]).unwrap().command,
            Commands::Check
        ));
    }

    #[test]
    fn smoke_defaults_to_seed_42() {
        let cli = Cli::try_parse_from(["xtask", "smoke"]).unwrap();
        assert!(matches!(cli.command, Commands::Smoke { seed: 42 }));
    }
}
