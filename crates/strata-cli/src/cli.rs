use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Strata — content-addressable snapshot store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

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
    /// Initialize a new Strata repository
    Init(InitArgs),
    /// Compute the blob digest of a file, optionally storing it
    HashObject(HashObjectArgs),
    /// Print the payload of a stored object
    CatFile(CatFileArgs),
    /// List the entries of a stored tree
    LsTree(LsTreeArgs),
    /// Snapshot the working directory into a tree object
    WriteTree(WriteTreeArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct HashObjectArgs {
    /// Persist the blob into the object store
    #[arg(short = 'w')]
    pub write: bool,
    pub file: PathBuf,
}

#[derive(Args)]
pub struct CatFileArgs {
    /// Pretty-print the object payload
    #[arg(short = 'p')]
    pub pretty: bool,
    /// 40-character hex digest
    pub object: String,
}

#[derive(Args)]
pub struct LsTreeArgs {
    /// Print entry names only
    #[arg(long)]
    pub name_only: bool,
    /// 40-character hex digest
    pub object: String,
}

#[derive(Args)]
pub struct WriteTreeArgs {}
