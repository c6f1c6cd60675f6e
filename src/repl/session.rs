//! Interactive session - the tool-calling orchestration loop
//!
//! One session spans process start to the exit sentinel. Each user turn
//! triggers one or more rounds: a model request over the full conversation
//! snapshot, then resolution of every tool call that response proposed, in
//! order, until a response arrives with no tool calls and its text is
//! surfaced to the operator.

use std::sync::Arc;

use colored::Colorize;
use eyre::{Result, WrapErr};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use crate::conversation::Conversation;
use crate::llm::{ChatMessage, CompletionRequest, LlmClient};
use crate::tools::{DispatchResult, Dispatcher};

/// Inputs that end the session, matched case-insensitively
const EXIT_SENTINELS: [&str; 3] = ["exit", "quit", "q"];

/// Longest tool output echoed to the terminal before truncation
const MAX_DISPLAY_CHARS: usize = 2000;

/// Running total of model-reported token usage for the session
#[derive(Debug, Default)]
pub struct TokenAccountant {
    total: u64,
}

impl TokenAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one response's reported usage
    pub fn add(&mut self, tokens: u64) {
        self.total += tokens;
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Interactive agent session
pub struct ChatSession {
    llm: Arc<dyn LlmClient>,
    dispatcher: Dispatcher,
    conversation: Conversation,
    accountant: TokenAccountant,
}

impl ChatSession {
    /// Create a session seeded with the system prompt
    pub fn new(llm: Arc<dyn LlmClient>, dispatcher: Dispatcher, system_prompt: &str) -> Self {
        Self {
            llm,
            dispatcher,
            conversation: Conversation::new(system_prompt),
            accountant: TokenAccountant::new(),
        }
    }

    /// Check an input line against the exit sentinels
    pub fn is_exit_sentinel(input: &str) -> bool {
        let lowered = input.trim().to_lowercase();
        EXIT_SENTINELS.contains(&lowered.as_str())
    }

    /// Run the session: process the initial prompt, then read user turns
    /// until an exit sentinel or end of input
    pub async fn run(&mut self, initial_prompt: &str) -> Result<()> {
        info!("session starting");
        println!("{} {}", ">".bright_green(), initial_prompt);
        self.submit(initial_prompt).await?;

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let prompt = format!("[{}] > ", self.accountant.total());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if Self::is_exit_sentinel(input) {
                        break;
                    }

                    self.submit(input).await?;
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show a new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit like a sentinel
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        info!(total_tokens = self.accountant.total(), "session terminated");
        println!("Goodbye!");
        Ok(())
    }

    /// Append one user message and run rounds until the model answers in
    /// plain text
    pub async fn submit(&mut self, input: &str) -> Result<()> {
        self.conversation.append(ChatMessage::user(input));
        self.run_rounds().await
    }

    /// The round loop: model request, then resolve every proposed tool call
    /// before the next request
    ///
    /// Tool failures never leave this loop - they come back as tool results.
    /// A model-service failure does: it propagates and ends the session.
    async fn run_rounds(&mut self) -> Result<()> {
        loop {
            let request = CompletionRequest {
                messages: self.conversation.snapshot().to_vec(),
                tools: self.dispatcher.descriptors(),
            };

            let response = self
                .llm
                .complete(request)
                .await
                .wrap_err("model service request failed")?;

            // Usage counts whether or not the round proposed tools
            self.accountant.add(response.usage.total_tokens);
            debug!(
                tool_call_count = %response.tool_calls.len(),
                total_tokens = self.accountant.total(),
                "run_rounds: response received"
            );

            self.conversation
                .append(ChatMessage::assistant(response.content.clone(), response.tool_calls.clone()));

            if response.tool_calls.is_empty() {
                if let Some(content) = &response.content {
                    println!("{} {}", "Assistant:".bright_blue().bold(), content.trim());
                }
                return Ok(());
            }

            // Answer every request of this turn, in the order proposed
            for call in &response.tool_calls {
                println!();
                println!("{} {}", "Tool:".bright_yellow(), call.name.bright_white());

                let result = self.dispatcher.dispatch(call).await;
                print_result(&result);

                self.conversation
                    .append(ChatMessage::tool(&call.id, &call.name, result.to_content()));
            }
            println!();
        }
    }
}

/// Echo a dispatch result to the terminal, truncating long output
fn print_result(result: &DispatchResult) {
    let content = result.to_content();
    if result.is_error() {
        println!("{} {}", "Error:".red(), content);
    } else {
        let display = if content.chars().count() > MAX_DISPLAY_CHARS {
            let preview: String = content.chars().take(MAX_DISPLAY_CHARS).collect();
            format!("{}... ({} chars total)", preview, content.len())
        } else {
            content
        };
        println!("{}", display.dimmed());
    }
}
