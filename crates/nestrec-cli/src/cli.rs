use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nestrec",
    about = "Inspect and resolve flat record dumps produced by nestrec",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the records in a dump
    Inspect(InspectArgs),
    /// Report references that point outside the dump
    Check(CheckArgs),
    /// Collect everything reachable from a root record
    Closure(ClosureArgs),
    /// Delete a record and everything it owns
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct InspectArgs {
    /// JSON array of records
    pub dump: PathBuf,
    /// Only show records of this type
    #[arg(short = 't', long)]
    pub record_type: Option<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    pub dump: PathBuf,
}

#[derive(Args)]
pub struct ClosureArgs {
    pub dump: PathBuf,
    /// Root record, as `name` or `owner:zone/name`
    pub root: String,
    /// Codec config (TOML) supplying the zone and resolver limits
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Write the closed record set here as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub dump: PathBuf,
    pub root: String,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Write the remaining records here as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
