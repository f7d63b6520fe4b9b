#![forbid(unsafe_code)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use orbit_layout::{Placement, layout};
use orbit_web::{OrbitConfig, Roster, SessionTrace, replay};
use serde_json::json;
use tracing::info;

use crate::error::{CliError, Result};

#[derive(Debug, Parser)]
#[command(
    name = "orbit",
    about = "Lay out member rosters and replay gesture traces for the Orbit canvas",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Place a roster and print the placements as JSON.
    Layout(LayoutArgs),

    /// Replay a recorded gesture trace and report the final view.
    Replay(ReplayArgs),

    /// Validate a configuration file.
    #[command(name = "check-config")]
    CheckConfig(CheckConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct LayoutArgs {
    /// JSON array of member records.
    #[arg(long)]
    pub members: PathBuf,

    /// Configuration file (defaults apply when omitted).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Exit with code 3 if any member fell back past the probe budget.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// JSON-lines gesture trace.
    #[arg(long)]
    pub trace: PathBuf,

    /// Roster the trace was recorded against (only affects selections).
    #[arg(long)]
    pub members: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct CheckConfigArgs {
    pub path: PathBuf,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    run(cli, &mut stdout.lock())
}

pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Layout(args) => run_layout(&args, out),
        Commands::Replay(args) => run_replay(&args, out),
        Commands::CheckConfig(args) => run_check_config(&args, out),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(path: Option<&Path>) -> Result<OrbitConfig> {
    let Some(path) = path else {
        return Ok(OrbitConfig::default());
    };
    OrbitConfig::from_json(&read(path)?).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn load_roster(path: &Path) -> Result<Roster> {
    let roster = Roster::from_json(&read(path)?).map_err(|source| CliError::Roster {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(roster.ordered_by_join_time())
}

fn write_json(out: &mut impl Write, value: &serde_json::Value, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn placement_json(p: &Placement) -> serde_json::Value {
    json!({
        "id": p.id,
        "x": p.position.x,
        "y": p.position.y,
        "origin": p.origin,
    })
}

pub fn run_layout(args: &LayoutArgs, out: &mut impl Write) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let roster = load_roster(&args.members)?;
    let placed = layout(roster.members(), &config.layout);
    let report = placed.report();
    info!(
        members = report.members,
        fallback = report.fallback_count(),
        outermost_ring = report.outermost_ring,
        "layout complete"
    );

    let placements: Vec<_> = placed.iter().map(placement_json).collect();
    write_json(
        out,
        &json!({ "placements": placements, "report": report }),
        args.pretty,
    )?;

    if args.strict && !report.is_strict() {
        let ids: Vec<&str> = report.fallback.iter().map(|id| id.as_str()).collect();
        return Err(CliError::Fallback {
            count: ids.len(),
            ids: ids.join(", "),
        });
    }
    Ok(())
}

pub fn run_replay(args: &ReplayArgs, out: &mut impl Write) -> Result<()> {
    let trace_error = |source| CliError::Trace {
        path: args.trace.clone(),
        source,
    };
    let trace = SessionTrace::from_jsonl(&read(&args.trace)?).map_err(trace_error)?;
    let roster = match &args.members {
        Some(path) => load_roster(path)?,
        None => Roster::default(),
    };
    let result = replay(roster, &trace).map_err(trace_error)?;

    write_json(
        out,
        &json!({
            "ok": result.ok(),
            "checkpoints": result.total_checkpoints,
            "final_view": result.final_view,
            "first_mismatch": result.first_mismatch,
        }),
        false,
    )?;

    match result.first_mismatch {
        Some(mismatch) => Err(CliError::Diverged { seq: mismatch.seq }),
        None => Ok(()),
    }
}

pub fn run_check_config(args: &CheckConfigArgs, out: &mut impl Write) -> Result<()> {
    let config = load_config(Some(&args.path))?;
    write_json(out, &json!({ "status": "ok", "config": config }), true)
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn layout_flags_parse() {
        let cli = Cli::try_parse_from([
            "orbit", "layout", "--members", "m.json", "--strict", "--pretty",
        ])
        .expect("parse");
        let Commands::Layout(args) = cli.command else {
            panic!("expected layout");
        };
        assert!(args.strict && args.pretty);
        assert_eq!(args.config, None);
    }

    #[test]
    fn check_config_takes_positional_path() {
        let cli = Cli::try_parse_from(["orbit", "check-config", "c.json"]).expect("parse");
        assert!(matches!(cli.command, Commands::CheckConfig(_)));
    }

    #[test]
    fn layout_requires_members() {
        assert!(Cli::try_parse_from(["orbit", "layout"]).is_err());
    }
}
