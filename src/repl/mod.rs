//! Interactive agent session
//!
//! Wires the model client, tool registry, approval gate, and dispatcher
//! into one session and runs it.

mod session;

pub use session::{ChatSession, TokenAccountant};

use eyre::{Context, Result};

use crate::approval::ConsoleApproval;
use crate::config::Config;
use crate::prompts;
use crate::tools::{Dispatcher, ToolRegistry};

/// Run an interactive session starting from the initial prompt
///
/// This is the main entry point for `oa <PROMPT>`.
pub async fn run_interactive(config: &Config, initial_prompt: &str) -> Result<()> {
    // Validate API key early
    config.validate()?;

    let llm = crate::llm::create_client(&config.llm).context("Failed to create LLM client")?;

    let registry = ToolRegistry::standard(config).context("Failed to build tool registry")?;
    let dispatcher = Dispatcher::new(registry, Box::new(ConsoleApproval));

    let system_prompt = config
        .session
        .system_prompt
        .clone()
        .unwrap_or_else(|| prompts::SYSTEM.to_string());

    let mut session = ChatSession::new(llm, dispatcher, &system_prompt);
    session.run(initial_prompt).await
}
