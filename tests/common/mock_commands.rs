/// Scripted command execution for integration tests
///
/// Responses are keyed by the full command line (`diskutil info disk2s1`).
/// Elevated invocations use the key prefix `[elevated] `. Each key holds a
/// queue; the last response repeats once the queue is drained. Commands with
/// no script fail with `command not scripted`.
use efimount::{CommandOutput, CommandPort};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const ELEVATED_PREFIX: &str = "[elevated] ";

/// One recorded invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: String,
    pub elevated: bool,
}

/// Mock command registry
#[derive(Clone, Default)]
pub struct MockCommandRegistry {
    commands: Arc<Mutex<HashMap<String, VecDeque<CommandOutput>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

#[allow(dead_code)]
impl MockCommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for an unprivileged command line
    pub fn register(&self, command_key: &str, output: CommandOutput) -> &Self {
        self.push(command_key.to_string(), output);
        self
    }

    /// Queue a response for an elevated command line
    pub fn register_elevated(&self, command_key: &str, output: CommandOutput) -> &Self {
        self.push(format!("{}{}", ELEVATED_PREFIX, command_key), output);
        self
    }

    fn push(&self, key: String, output: CommandOutput) {
        self.commands
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .push_back(output);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn elevated_calls(&self) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.elevated).collect()
    }

    /// Number of invocations whose command line starts with `prefix`
    pub fn count_matching(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.command.starts_with(prefix))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn next_response(&self, key: &str) -> Option<CommandOutput> {
        let mut commands = self.commands.lock().unwrap();
        let queue = commands.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl CommandPort for MockCommandRegistry {
    fn run(&self, args: &[String], elevated: bool) -> CommandOutput {
        let command = args.join(" ");
        self.calls.lock().unwrap().push(RecordedCall {
            command: command.clone(),
            elevated,
        });

        let key = if elevated {
            format!("{}{}", ELEVATED_PREFIX, command)
        } else {
            command
        };

        self.next_response(&key)
            .unwrap_or_else(|| CommandOutput::failure("command not scripted"))
    }
}
