//! Forwarding router
//!
//! A forwarder is a verb router whose line carries a second command after a
//! separator token, e.g. `time run --repeat 3 -- echo hi`. The options half is
//! parsed like any verb router line; the forwarded half is handed to the verb
//! handler, which typically dispatches it again.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::context::ExecutionContext;
use super::router::{RouterBuilder, VerbRouter};
use super::schema::ArityPolicy;
use super::Command;
use crate::error::{ExecutionError, Result};
use crate::parser::{SeparatorSplit, tokenize_simple};
use crate::repl::completion::{ForwardSuggestions, SuggestionProvider};

/// Verb router that splits its line at a separator
pub struct ForwardingRouter {
    router: VerbRouter,
    separator: String,
    forwards: Vec<Arc<ForwardSuggestions>>,
}

impl ForwardingRouter {
    pub(crate) fn from_builder(builder: RouterBuilder, separator: String) -> Result<Self> {
        let mut forwards = Vec::new();
        let router = builder.build_with(|_, options| {
            let strategy = Arc::new(ForwardSuggestions::new(separator.clone(), options));
            forwards.push(Arc::clone(&strategy));
            strategy
        })?;

        Ok(Self {
            router,
            separator,
            forwards,
        })
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Split `args`, parse the options half and run the matching verb
    ///
    /// The verb's arity policy is enforced before its handler runs.
    ///
    /// # Returns
    /// * `Ok(true)` - The verb's handler ran
    /// * `Ok(false)` - Parsing failed or a required forwarded command was
    ///   missing; the handler was not called
    /// * `Err` - The verb's handler failed
    pub async fn handle(&self, args: &str, ctx: &ExecutionContext) -> Result<bool> {
        let split = SeparatorSplit::find(args, &self.separator);
        let tokens = tokenize_simple(split.options(args));
        let forwarded = split
            .forward(args)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string);

        let (entry, options) = match self.router.parse(&tokens) {
            Ok(parsed) => parsed,
            Err(errors) => {
                self.router.report(&errors, ctx);
                return Ok(false);
            }
        };

        let command = self.router.name();
        let verb = entry.schema.name.as_str();
        match (entry.schema.forwarding, &forwarded) {
            (ArityPolicy::Required, None) => {
                error!(command = %command, verb = %verb, "Forwarded command required");
                ctx.console().write_line(&format!(
                    "{command} {verb}: expected a command after '{}'",
                    self.separator
                ));
                return Ok(false);
            }
            (ArityPolicy::Disallowed, Some(rest)) => {
                warn!(
                    command = %command,
                    verb = %verb,
                    ignored = %rest,
                    "Verb does not take a forwarded command"
                );
            }
            _ => {}
        }

        debug!(command = %command, verb = %verb, forwarded = ?forwarded, "Forwarding");
        self.router.invoke(entry, options, forwarded, ctx).await?;
        Ok(true)
    }
}

#[async_trait]
impl Command for ForwardingRouter {
    fn name(&self) -> &str {
        self.router.name()
    }

    fn description(&self) -> &str {
        self.router.description()
    }

    fn usage(&self) -> String {
        format!(
            "{}\n\nUsage: {} [VERB] [OPTIONS] [{} COMMAND]",
            self.router.usage_text(),
            self.router.name(),
            self.separator
        )
    }

    async fn execute(&self, args: &str, ctx: &ExecutionContext) -> Result<()> {
        if self.handle(args, ctx).await? {
            Ok(())
        } else {
            Err(ExecutionError::Rejected(self.router.name().to_string()).into())
        }
    }

    fn suggestions(&self) -> Option<Arc<dyn SuggestionProvider>> {
        Some(self.router.suggestion_strategy())
    }

    fn attach_root_suggestions(&self, root: Weak<dyn SuggestionProvider>) {
        for strategy in &self.forwards {
            strategy.bind_root(Weak::clone(&root));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::schema::{OptionSpec, VerbSchema};
    use crate::executor::CommandRegistry;
    use crate::repl::BufferConsole;
    use crate::repl::completion::CommandNameSuggestions;
    use crate::test_utils::WarnCounter;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    type Calls = Arc<Mutex<Vec<(String, Option<String>)>>>;

    fn forwarder(calls: &Calls) -> ForwardingRouter {
        let run_calls = Arc::clone(calls);
        let last_calls = Arc::clone(calls);
        let opt_calls = Arc::clone(calls);
        VerbRouter::builder("time", "Time a command")
            .verb(
                VerbSchema::new("run")
                    .default_verb()
                    .option(OptionSpec::value("repeat").short('r').long("repeat"))
                    .forwarding(ArityPolicy::Required),
                move |inv| {
                    let calls = Arc::clone(&run_calls);
                    async move {
                        calls.lock().unwrap().push((inv.verb, inv.forwarded));
                        Ok(())
                    }
                },
            )
            .verb(
                VerbSchema::new("last").forwarding(ArityPolicy::Disallowed),
                move |inv| {
                    let calls = Arc::clone(&last_calls);
                    async move {
                        calls.lock().unwrap().push((inv.verb, inv.forwarded));
                        Ok(())
                    }
                },
            )
            .verb(
                VerbSchema::new("maybe").forwarding(ArityPolicy::Optional),
                move |inv| {
                    let calls = Arc::clone(&opt_calls);
                    async move {
                        calls.lock().unwrap().push((inv.verb, inv.forwarded));
                        Ok(())
                    }
                },
            )
            .build_forwarding("--")
            .unwrap()
    }

    fn context() -> ExecutionContext {
        ExecutionContext::new(
            Arc::new(CommandRegistry::new()),
            None,
            Arc::new(BufferConsole::new()),
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn test_required_forward_present() {
        let calls = Calls::default();
        let router = forwarder(&calls);

        assert!(router.handle("run -r 3 -- echo \"a -- b\"", &context()).await.unwrap());
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            [("run".to_string(), Some("echo \"a -- b\"".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_required_forward_missing_skips_handler() {
        let calls = Calls::default();
        let router = forwarder(&calls);
        let ctx = context();

        assert!(!router.handle("run -r 3", &ctx).await.unwrap());
        assert!(!router.handle("run --   ", &ctx).await.unwrap());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disallowed_forward_warns_once_and_runs() {
        let calls = Calls::default();
        let router = forwarder(&calls);
        let counter = WarnCounter::default();

        let handled = {
            let _guard = counter.install();
            router.handle("last -- echo hi", &context()).await.unwrap()
        };

        assert!(handled);
        assert_eq!(counter.count(), 1);
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            [("last".to_string(), Some("echo hi".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_optional_accepts_both() {
        let calls = Calls::default();
        let router = forwarder(&calls);
        let ctx = context();

        assert!(router.handle("maybe", &ctx).await.unwrap());
        assert!(router.handle("maybe -- x", &ctx).await.unwrap());
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_default_verb_without_name() {
        let calls = Calls::default();
        let router = forwarder(&calls);

        assert!(router.handle("-- echo hi", &context()).await.unwrap());
        assert_eq!(calls.lock().unwrap()[0].0, "run");
    }

    #[test]
    fn test_completion_reaches_root_after_separator() {
        let calls = Calls::default();
        let router = forwarder(&calls);
        let root: Arc<dyn SuggestionProvider> =
            Arc::new(CommandNameSuggestions::new(["echo", "time"], Vec::<String>::new()));
        router.attach_root_suggestions(Arc::downgrade(&root));

        let strategy = router.suggestions().unwrap();
        let text = "time run -- ec";
        let result = strategy.suggest(text, text.len());
        assert_eq!(result.candidates, vec!["echo"]);
        assert_eq!((result.start, result.end), (12, Some(14)));

        let result = strategy.suggest("time run ", 9);
        assert_eq!(result.candidates, vec!["--repeat"]);
    }
}
