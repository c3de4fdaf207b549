//! Built-in demo commands
//!
//! A small command set used by the `cmdshell` binary:
//! - `echo` prints its arguments
//! - `sleep` waits and honors cancellation
//! - `exit` / `quit` end the session
//! - `task` manages an in-memory task list through verbs
//! - `time` runs a forwarded command and reports how long it took

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{debug, info};

use super::context::{DispatchOutcome, ExecutionContext};
use super::router::{VerbInvocation, VerbRouter};
use super::schema::{ArityPolicy, OptionSpec, VerbSchema};
use super::{Command, ForwardingRouter, GeneralOperation};
use crate::error::{ExecutionError, Result, ShellError};
use crate::parser::tokenize_simple;
use crate::repl::completion::{FilePathSuggestions, SuggestionProvider};

/// All demo commands, forwarders splitting at `separator`
pub fn demo_commands(separator: &str) -> Result<Vec<Arc<dyn Command>>> {
    Ok(vec![
        Arc::new(EchoCommand::default()),
        Arc::new(SleepCommand),
        Arc::new(ExitCommand::new("exit")),
        Arc::new(ExitCommand::new("quit")),
        Arc::new(task_command()?),
        Arc::new(time_command(separator)?),
    ])
}

/// Prints its arguments after quote processing
#[derive(Default)]
pub struct EchoCommand {
    paths: Arc<FilePathSuggestions>,
}

#[async_trait]
impl Command for EchoCommand {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Print the arguments"
    }

    fn usage(&self) -> String {
        "echo [ARG]...\n\nPrint each argument after quote processing, separated by spaces.".into()
    }

    async fn execute(&self, args: &str, ctx: &ExecutionContext) -> Result<()> {
        ctx.console().write_line(&tokenize_simple(args).join(" "));
        Ok(())
    }

    fn suggestions(&self) -> Option<Arc<dyn SuggestionProvider>> {
        Some(self.paths.clone())
    }
}

/// Waits for a number of seconds unless cancelled
pub struct SleepCommand;

#[async_trait]
impl Command for SleepCommand {
    fn name(&self) -> &str {
        "sleep"
    }

    fn description(&self) -> &str {
        "Wait for the given number of seconds"
    }

    fn usage(&self) -> String {
        "sleep <SECONDS>\n\nFractions are allowed. Interrupting cancels the wait.".into()
    }

    async fn execute(&self, args: &str, ctx: &ExecutionContext) -> Result<()> {
        let secs: f64 = args.trim().parse().map_err(|_| {
            ExecutionError::InvalidArguments(format!("sleep: '{}' is not a number", args.trim()))
        })?;
        let duration = Duration::try_from_secs_f64(secs).map_err(|e| {
            ExecutionError::InvalidArguments(format!("sleep: {e}"))
        })?;

        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = ctx.cancellation().cancelled() => Err(ShellError::Cancelled),
        }
    }
}

/// Ends the session
pub struct ExitCommand {
    name: &'static str,
}

impl ExitCommand {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl Command for ExitCommand {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Leave the shell"
    }

    async fn execute(&self, _args: &str, ctx: &ExecutionContext) -> Result<()> {
        ctx.request_shutdown();
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Task {
    id: u32,
    title: String,
    priority: u8,
    tags: Vec<String>,
}

#[derive(Debug, Default)]
struct TaskList {
    next_id: u32,
    tasks: Vec<Task>,
}

type SharedTasks = Arc<Mutex<TaskList>>;

fn lock(tasks: &SharedTasks) -> Result<std::sync::MutexGuard<'_, TaskList>> {
    tasks
        .lock()
        .map_err(|_| ShellError::Generic("task list is poisoned".to_string()))
}

/// `task` command: add, list and remove in-memory tasks
pub fn task_command() -> Result<VerbRouter> {
    let tasks = SharedTasks::default();
    let (add, list, remove) = (tasks.clone(), tasks.clone(), tasks);

    VerbRouter::builder("task", "Manage an in-memory task list")
        .verb(
            VerbSchema::new("add")
                .alias("a")
                .about("Add a task")
                .option(OptionSpec::positional("title").required().help("Task title"))
                .option(
                    OptionSpec::value("priority")
                        .short('p')
                        .long("priority")
                        .value_name("N")
                        .help("Priority, 0 is highest"),
                )
                .option(
                    OptionSpec::values("tag")
                        .short('t')
                        .long("tag")
                        .help("Tag, repeatable"),
                ),
            move |inv| add_task(add.clone(), inv),
        )
        .verb(
            VerbSchema::new("list")
                .alias("ls")
                .default_verb()
                .about("List tasks")
                .option(
                    OptionSpec::value("tag")
                        .short('t')
                        .long("tag")
                        .help("Only tasks with this tag"),
                ),
            move |inv| list_tasks(list.clone(), inv),
        )
        .verb(
            VerbSchema::new("remove")
                .alias("rm")
                .about("Remove a task")
                .option(OptionSpec::positional("id").required().help("Task id")),
            move |inv| remove_task(remove.clone(), inv),
        )
        .build()
}

async fn add_task(tasks: SharedTasks, inv: VerbInvocation) -> Result<()> {
    let title = inv.options.value("title").unwrap_or_default().to_string();
    let priority = inv.options.parse::<u8>("priority")?.unwrap_or(2);
    let tags = inv
        .options
        .values("tag")
        .into_iter()
        .map(str::to_string)
        .collect();

    let id = {
        let mut list = lock(&tasks)?;
        list.next_id += 1;
        let id = list.next_id;
        list.tasks.push(Task {
            id,
            title,
            priority,
            tags,
        });
        id
    };

    debug!(task = id, "Task added");
    inv.context.console().write_line(&format!("Added task {id}"));
    Ok(())
}

async fn list_tasks(tasks: SharedTasks, inv: VerbInvocation) -> Result<()> {
    let tag = inv.options.value("tag");
    let mut selected: Vec<Task> = lock(&tasks)?
        .tasks
        .iter()
        .filter(|task| tag.is_none_or(|tag| task.tags.iter().any(|t| t == tag)))
        .cloned()
        .collect();

    if selected.is_empty() {
        inv.context.console().write_line("No tasks");
        return Ok(());
    }
    selected.sort_by_key(|task| (task.priority, task.id));

    let mut builder = Builder::default();
    builder.push_record(["ID", "PRIORITY", "TITLE", "TAGS"].map(String::from));
    for task in selected {
        builder.push_record([
            task.id.to_string(),
            task.priority.to_string(),
            task.title,
            task.tags.join(","),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::psql());
    inv.context.console().write_line(&table.to_string());
    Ok(())
}

async fn remove_task(tasks: SharedTasks, inv: VerbInvocation) -> Result<()> {
    let id = inv.options.parse::<u32>("id")?.unwrap_or_default();
    let removed = {
        let mut list = lock(&tasks)?;
        let before = list.tasks.len();
        list.tasks.retain(|task| task.id != id);
        before != list.tasks.len()
    };

    if removed {
        inv.context.console().write_line(&format!("Removed task {id}"));
        Ok(())
    } else {
        Err(ExecutionError::Failed(format!("no task with id {id}")).into())
    }
}

type LastTiming = Arc<Mutex<Option<(String, Duration)>>>;

/// `time` forwarder: `time [run] [-r N] -- <command>` and `time last`
pub fn time_command(separator: &str) -> Result<ForwardingRouter> {
    let timing = LastTiming::default();
    let (run, last) = (timing.clone(), timing);

    VerbRouter::builder("time", "Time a command")
        .verb(
            VerbSchema::new("run")
                .default_verb()
                .about("Run the command after the separator and time it")
                .option(
                    OptionSpec::value("repeat")
                        .short('r')
                        .long("repeat")
                        .value_name("N")
                        .help("Run the command N times"),
                )
                .forwarding(ArityPolicy::Required),
            move |inv| time_run(run.clone(), inv),
        )
        .verb(
            VerbSchema::new("last")
                .about("Show the previous timing")
                .forwarding(ArityPolicy::Disallowed),
            move |inv| time_last(last.clone(), inv),
        )
        .build_forwarding(separator)
}

async fn time_run(timing: LastTiming, inv: VerbInvocation) -> Result<()> {
    let repeat = inv.options.parse::<u32>("repeat")?.unwrap_or(1).max(1);
    let Some(forwarded) = inv.forwarded else {
        return Err(ExecutionError::ForwardRequired {
            command: "time".to_string(),
            verb: inv.verb,
        }
        .into());
    };

    let started = Instant::now();
    for _ in 0..repeat {
        if inv.context.is_cancelled() {
            return Err(ShellError::Cancelled);
        }
        let outcome = inv.context.dispatch(&forwarded).await;
        if matches!(outcome, DispatchOutcome::Failed | DispatchOutcome::Rejected) {
            return Err(ExecutionError::Failed(format!("'{forwarded}' did not complete")).into());
        }
    }
    let elapsed = started.elapsed();

    info!(command = %forwarded, repeat, elapsed_ms = elapsed.as_millis() as u64, "Timed command");
    inv.context
        .console()
        .write_line(&format!("{repeat} run(s) of '{forwarded}' took {elapsed:.3?}"));

    if let Ok(mut last) = timing.lock() {
        *last = Some((forwarded, elapsed));
    }
    Ok(())
}

async fn time_last(timing: LastTiming, inv: VerbInvocation) -> Result<()> {
    let last = timing
        .lock()
        .map_err(|_| ShellError::Generic("timing is poisoned".to_string()))?
        .clone();

    let message = match last {
        Some((command, elapsed)) => format!("'{command}' took {elapsed:.3?}"),
        None => "Nothing timed yet".to_string(),
    };
    inv.context.console().write_line(&message);
    Ok(())
}

/// Fallback pointing at registered commands with a similar name
pub struct SuggestingFallback;

#[async_trait]
impl GeneralOperation for SuggestingFallback {
    async fn execute(&self, name: &str, _args: &str, ctx: &ExecutionContext) -> Result<()> {
        let first = name.chars().next();
        let similar: Vec<&str> = ctx
            .registry()
            .names()
            .filter(|candidate| candidate.chars().next() == first)
            .collect();

        let message = if similar.is_empty() {
            format!("Unknown command '{name}'. Type 'help' to list commands.")
        } else {
            format!("Unknown command '{name}'. Did you mean: {}?", similar.join(", "))
        };
        ctx.console().write_line(&message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::CommandRegistry;
    use crate::repl::BufferConsole;
    use tokio_util::sync::CancellationToken;

    fn context(console: Arc<BufferConsole>) -> ExecutionContext {
        let registry = CommandRegistry::from_commands(demo_commands("--").unwrap()).unwrap();
        ExecutionContext::new(
            Arc::new(registry),
            Some(Arc::new(SuggestingFallback)),
            console,
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn test_echo_dequotes() {
        let console = Arc::new(BufferConsole::new());
        let ctx = context(console.clone());

        assert_eq!(ctx.dispatch("echo \"a b\" c").await, DispatchOutcome::Executed);
        assert_eq!(console.lines(), vec!["a b c"]);
    }

    #[tokio::test]
    async fn test_task_lifecycle() {
        let console = Arc::new(BufferConsole::new());
        let ctx = context(console.clone());

        ctx.dispatch("task add \"write docs\" -p 1 -t work").await;
        ctx.dispatch("task a groceries -t home").await;
        ctx.dispatch("task ls --tag work").await;
        let listing = console.contents();
        assert!(listing.contains("write docs"));
        assert!(!listing.contains("groceries"));

        assert_eq!(ctx.dispatch("task rm 1").await, DispatchOutcome::Executed);
        assert_eq!(ctx.dispatch("task rm 1").await, DispatchOutcome::Failed);
    }

    #[tokio::test]
    async fn test_time_forwards_and_remembers() {
        let console = Arc::new(BufferConsole::new());
        let ctx = context(console.clone());

        assert_eq!(
            ctx.dispatch("time -r 2 -- echo hi").await,
            DispatchOutcome::Executed
        );
        let lines = console.lines();
        assert_eq!(lines.iter().filter(|l| l.as_str() == "hi").count(), 2);

        ctx.dispatch("time last").await;
        assert!(console.contents().contains("'echo hi' took"));
    }

    #[tokio::test]
    async fn test_time_without_command_does_not_run() {
        let console = Arc::new(BufferConsole::new());
        let ctx = context(console.clone());

        assert_eq!(ctx.dispatch("time run").await, DispatchOutcome::Failed);
        assert!(console.contents().contains("expected a command after '--'"));
        ctx.dispatch("time last").await;
        assert!(console.contents().contains("Nothing timed yet"));
    }

    #[tokio::test]
    async fn test_time_reports_failed_forwarded_command() {
        let console = Arc::new(BufferConsole::new());
        let ctx = context(console.clone());

        assert_eq!(
            ctx.dispatch("time run -- sleep abc").await,
            DispatchOutcome::Failed
        );
        assert!(!console.contents().contains("took"));
        ctx.dispatch("time last").await;
        assert!(console.contents().contains("Nothing timed yet"));
    }

    #[tokio::test]
    async fn test_task_rejects_unknown_flag() {
        let console = Arc::new(BufferConsole::new());
        let ctx = context(console.clone());

        assert_eq!(ctx.dispatch("task add --bogus").await, DispatchOutcome::Failed);
        let usage_count = console
            .lines()
            .iter()
            .filter(|line| line.starts_with("task - "))
            .count();
        assert_eq!(usage_count, 1);
    }

    #[tokio::test]
    async fn test_sleep_is_cancellable() {
        let console = Arc::new(BufferConsole::new());
        let ctx = context(console);
        ctx.cancellation().cancel();
        assert_eq!(ctx.dispatch("sleep 30").await, DispatchOutcome::Failed);
    }

    #[tokio::test]
    async fn test_sleep_rejects_garbage() {
        let ctx = context(Arc::new(BufferConsole::new()));
        assert_eq!(ctx.dispatch("sleep soon").await, DispatchOutcome::Failed);
        assert_eq!(ctx.dispatch("sleep -1").await, DispatchOutcome::Failed);
    }

    #[tokio::test]
    async fn test_exit_cancels() {
        let ctx = context(Arc::new(BufferConsole::new()));
        ctx.dispatch("quit").await;
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_fallback_suggests_similar_names() {
        let console = Arc::new(BufferConsole::new());
        let ctx = context(console.clone());

        assert_eq!(ctx.dispatch("tsk list").await, DispatchOutcome::Delegated);
        assert!(console.contents().contains("Did you mean: task, time?"));
    }
}
