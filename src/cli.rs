//! CLI definition

use clap::Parser;
use std::path::PathBuf;

/// opsagent - operator-approved LLM agent for shell, background processes,
/// and packet capture
#[derive(Parser)]
#[command(
    name = "oa",
    about = "Conversational agent that proposes tool calls; you approve each one before it runs",
    after_help = "Interactive input accepts free text, or exit/quit/q to end the session."
)]
pub struct Cli {
    /// Initial prompt for the agent
    #[arg(value_name = "PROMPT")]
    pub prompt: String,

    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}
