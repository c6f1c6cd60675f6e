//! Approval gate - human confirmation before any tool executes
//!
//! Tools have irreversible real-world side effects (process spawn, file
//! write, packet capture), so every proposed invocation passes through an
//! `ApprovalPort` before dispatch. The port is injectable: the interactive
//! console implementation is used in production, and tests substitute a
//! scripted one.

use std::io::{self, Write};

use colored::Colorize;
use serde_json::{Map, Value};
use tracing::debug;

/// Blocking human-confirmation checkpoint
///
/// `confirm` returns true only on an explicit affirmative; any other input,
/// including a read failure, is a denial.
pub trait ApprovalPort: Send {
    fn confirm(&mut self, tool: &str, arguments: &Map<String, Value>) -> bool;
}

/// Interactive approval prompt on the controlling terminal
pub struct ConsoleApproval;

impl ApprovalPort for ConsoleApproval {
    fn confirm(&mut self, tool: &str, arguments: &Map<String, Value>) -> bool {
        let rendered = serde_json::to_string(arguments).unwrap_or_else(|_| "{}".to_string());
        print!("{} ", format!("{}({})? (y/n)", tool, rendered).blue().bold());
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            debug!("ConsoleApproval::confirm: stdin read failed, denying");
            return false;
        }

        is_affirmative(&line)
    }
}

/// Fail-closed parse of the operator's answer
fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
pub mod scripted {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted approval for deterministic tests
    ///
    /// Answers are consumed in order; once exhausted, every further call is
    /// denied (the fail-closed default). Each prompt is recorded.
    pub struct ScriptedApproval {
        answers: VecDeque<bool>,
        pub prompts: Vec<(String, Value)>,
    }

    impl ScriptedApproval {
        pub fn new(answers: &[bool]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                prompts: Vec::new(),
            }
        }
    }

    impl ApprovalPort for ScriptedApproval {
        fn confirm(&mut self, tool: &str, arguments: &Map<String, Value>) -> bool {
            self.prompts.push((tool.to_string(), Value::Object(arguments.clone())));
            self.answers.pop_front().unwrap_or(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scripted::ScriptedApproval;
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y\n"));
        assert!(is_affirmative("  yes  "));
        assert!(is_affirmative("YES"));

        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("yeah"));
        assert!(!is_affirmative("ok"));
    }

    #[test]
    fn test_scripted_approval_consumes_answers_then_denies() {
        let mut approval = ScriptedApproval::new(&[true, false]);
        let args = Map::new();

        assert!(approval.confirm("shell_tool", &args));
        assert!(!approval.confirm("shell_tool", &args));
        // Exhausted: fail closed
        assert!(!approval.confirm("shell_tool", &args));
    }

    #[test]
    fn test_scripted_approval_records_prompts() {
        let mut approval = ScriptedApproval::new(&[true]);
        let mut args = Map::new();
        args.insert("command".to_string(), Value::String("pwd".to_string()));

        approval.confirm("shell_tool", &args);

        assert_eq!(approval.prompts.len(), 1);
        assert_eq!(approval.prompts[0].0, "shell_tool");
        assert_eq!(approval.prompts[0].1["command"], "pwd");
    }
}
