//! Command line definitions.

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "workflow")]
#[command(version, about = "Scripted conversational workflows in the terminal")]
#[command(long_about = "Plays scripted, chat-style research workflows defined in .workflow-kit/. \
                        Run without a subcommand to open the default workflow interactively.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a .workflow-kit directory with demo workflows
    Init {
        /// Overwrite an existing .workflow-kit directory
        #[arg(long)]
        force: bool,
        /// Only write the peer comparison workflow
        #[arg(long)]
        minimal: bool,
    },
    /// List the available workflows
    List,
    /// Play a workflow headlessly, printing the transcript
    Run(RunArgs),
    /// Open a workflow in the interactive terminal UI
    Open {
        /// Workflow name (defaults to `default-workflow` or the first one found)
        name: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Workflow name
    pub name: String,

    /// Answer for the next step; repeat once per step
    #[arg(short, long = "input", value_name = "TEXT")]
    pub inputs: Vec<String>,

    /// Skip all processing delays
    #[arg(long)]
    pub instant: bool,

    /// Print the final conversation as JSON instead of a live transcript
    #[arg(long)]
    pub json: bool,
}
