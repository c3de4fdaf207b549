//! Verb router for multi-verb commands
//!
//! A verb router owns an ordered list of verbs, each with a schema and a
//! handler. A line is parsed against the verbs first-match-wins; the first
//! verb whose schema accepts the tokens has its handler invoked. When no verb
//! accepts them, every parse error is reported together with the usage text.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

use super::alias::AliasTable;
use super::context::ExecutionContext;
use super::forward::ForwardingRouter;
use super::schema::{ParsedOptions, VerbSchema};
use super::Command;
use crate::error::{ConfigError, ExecutionError, Result};
use crate::parser::tokenize_simple;
use crate::repl::completion::{
    FilePathSuggestions, OptionNameSuggestions, SuggestionChain, SuggestionProvider,
    VerbSuggestions,
};

/// Everything a verb handler receives
pub struct VerbInvocation {
    /// Canonical verb name
    pub verb: String,
    pub options: ParsedOptions,
    /// Trimmed forwarded command, forwarders only
    pub forwarded: Option<String>,
    pub context: ExecutionContext,
}

/// Handler bound to a verb
pub type VerbHandler =
    Arc<dyn Fn(VerbInvocation) -> BoxFuture<'static, Result<()>> + Send + Sync>;

pub(crate) struct VerbEntry {
    pub(crate) schema: VerbSchema,
    parser: clap::Command,
    handler: VerbHandler,
}

impl VerbEntry {
    fn try_parse(&self, tokens: &[String]) -> std::result::Result<ParsedOptions, String> {
        self.parser
            .clone()
            .try_get_matches_from(tokens)
            .map(ParsedOptions::from)
            .map_err(|e| format!("{}: {}", self.schema.name, first_line(&e.to_string())))
    }
}

fn first_line(message: &str) -> &str {
    let line = message.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line)
}

/// Builder collecting verbs before the alias table is checked
pub struct RouterBuilder {
    name: String,
    description: String,
    verbs: Vec<(VerbSchema, VerbHandler)>,
    base_dir: PathBuf,
}

impl RouterBuilder {
    /// Bind a handler to a verb schema
    ///
    /// Verbs are tried in the order they are added.
    pub fn verb<F, Fut>(mut self, schema: VerbSchema, handler: F) -> Self
    where
        F: Fn(VerbInvocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let handler: VerbHandler = Arc::new(move |invocation| handler(invocation).boxed());
        self.verbs.push((schema, handler));
        self
    }

    /// Directory quoted paths are completed against
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Build a plain verb router
    pub fn build(self) -> Result<VerbRouter> {
        self.build_with(|_, options| options)
    }

    /// Build a forwarding router splitting lines at `separator`
    pub fn build_forwarding(self, separator: impl Into<String>) -> Result<ForwardingRouter> {
        ForwardingRouter::from_builder(self, separator.into())
    }

    /// Build the router, letting `wrap` decorate each verb's option strategy
    pub(crate) fn build_with<W>(self, mut wrap: W) -> Result<VerbRouter>
    where
        W: FnMut(&VerbSchema, Arc<dyn SuggestionProvider>) -> Arc<dyn SuggestionProvider>,
    {
        if self.verbs.is_empty() {
            return Err(ConfigError::NoVerbs { command: self.name }.into());
        }

        let schemas: Vec<VerbSchema> = self.verbs.iter().map(|(s, _)| s.clone()).collect();
        let aliases = AliasTable::build(&self.name, &schemas)?;

        let mut per_verb = Vec::with_capacity(self.verbs.len());
        let mut entries = Vec::with_capacity(self.verbs.len());

        for (schema, handler) in self.verbs {
            let options: Arc<dyn SuggestionProvider> =
                Arc::new(OptionNameSuggestions::new(&schema.options));
            per_verb.push((schema.name.clone(), wrap(&schema, options)));

            let parser = schema
                .to_command()
                .bin_name(format!("{} {}", self.name, schema.name));
            entries.push(VerbEntry {
                schema,
                parser,
                handler,
            });
        }

        let suggestions = SuggestionChain::new()
            .with(Arc::new(FilePathSuggestions::new(self.base_dir)))
            .with(Arc::new(VerbSuggestions::new(aliases.clone(), per_verb)));

        debug!(command = %self.name, verbs = entries.len(), "Built verb router");
        Ok(VerbRouter {
            name: self.name,
            description: self.description,
            entries,
            aliases,
            suggestions: Arc::new(suggestions),
        })
    }
}

/// Command made of verbs, e.g. `task add`, `task list`
pub struct VerbRouter {
    name: String,
    description: String,
    entries: Vec<VerbEntry>,
    aliases: AliasTable,
    suggestions: Arc<dyn SuggestionProvider>,
}

impl VerbRouter {
    /// Start building a router for `name`
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> RouterBuilder {
        RouterBuilder {
            name: name.into(),
            description: description.into(),
            verbs: Vec::new(),
            base_dir: PathBuf::from("."),
        }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Parse logical tokens against the verbs, first match wins
    ///
    /// The verb named by the first token is tried on the remaining tokens,
    /// then the default verb on every token.
    ///
    /// # Returns
    /// * `Ok` - The matching verb and its parsed options
    /// * `Err` - One diagnostic per verb that was tried
    pub(crate) fn parse(
        &self,
        tokens: &[String],
    ) -> std::result::Result<(&VerbEntry, ParsedOptions), Vec<String>> {
        let named = tokens
            .first()
            .and_then(|token| self.aliases.resolve(token));
        let fallback = self
            .aliases
            .default_verb()
            .filter(|&verb| Some(verb) != named);

        let attempts = named
            .map(|verb| (verb, &tokens[1..]))
            .into_iter()
            .chain(fallback.map(|verb| (verb, tokens)));

        let mut errors = Vec::new();
        for (verb, rest) in attempts {
            let Some(entry) = self.entries.iter().find(|e| e.schema.name == verb) else {
                continue;
            };
            match entry.try_parse(rest) {
                Ok(options) => return Ok((entry, options)),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            let message = match tokens.first() {
                Some(token) => format!("{}: unknown verb '{token}'", self.name),
                None => format!("{}: missing verb", self.name),
            };
            errors.push(message);
        }
        Err(errors)
    }

    /// Run a verb's handler
    pub(crate) async fn invoke(
        &self,
        entry: &VerbEntry,
        options: ParsedOptions,
        forwarded: Option<String>,
        ctx: &ExecutionContext,
    ) -> Result<()> {
        debug!(command = %self.name, verb = %entry.schema.name, "Invoking verb");
        let invocation = VerbInvocation {
            verb: entry.schema.name.clone(),
            options,
            forwarded,
            context: ctx.clone(),
        };
        (entry.handler)(invocation).await
    }

    /// Print parse diagnostics followed by the usage text
    pub(crate) fn report(&self, errors: &[String], ctx: &ExecutionContext) {
        for error in errors {
            ctx.console().write_line(error);
        }
        ctx.console().write_line(&self.usage_text());
    }

    /// Parse `args` and run the matching verb
    ///
    /// # Returns
    /// * `Ok(true)` - A verb ran
    /// * `Ok(false)` - No verb accepted the arguments; diagnostics were printed
    /// * `Err` - The verb's handler failed
    pub async fn handle(&self, args: &str, ctx: &ExecutionContext) -> Result<bool> {
        let tokens = tokenize_simple(args);
        match self.parse(&tokens) {
            Ok((entry, options)) => {
                self.invoke(entry, options, None, ctx).await?;
                Ok(true)
            }
            Err(errors) => {
                self.report(&errors, ctx);
                Ok(false)
            }
        }
    }

    pub(crate) fn usage_text(&self) -> String {
        let mut usage = format!("{} - {}", self.name, self.description);
        for entry in &self.entries {
            usage.push_str("\n\n");
            usage.push_str(entry.parser.clone().render_help().to_string().trim_end());
        }
        usage
    }

    pub(crate) fn suggestion_strategy(&self) -> Arc<dyn SuggestionProvider> {
        Arc::clone(&self.suggestions)
    }
}

#[async_trait]
impl Command for VerbRouter {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn usage(&self) -> String {
        self.usage_text()
    }

    async fn execute(&self, args: &str, ctx: &ExecutionContext) -> Result<()> {
        if self.handle(args, ctx).await? {
            Ok(())
        } else {
            Err(ExecutionError::Rejected(self.name.clone()).into())
        }
    }

    fn suggestions(&self) -> Option<Arc<dyn SuggestionProvider>> {
        Some(self.suggestion_strategy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use crate::executor::CommandRegistry;
    use crate::executor::schema::OptionSpec;
    use crate::repl::BufferConsole;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    type Calls = Arc<Mutex<Vec<String>>>;

    fn router(calls: &Calls) -> VerbRouter {
        let add_calls = Arc::clone(calls);
        let list_calls = Arc::clone(calls);
        VerbRouter::builder("task", "Manage tasks")
            .verb(
                VerbSchema::new("add")
                    .alias("a")
                    .option(OptionSpec::positional("title").required())
                    .option(OptionSpec::value("priority").short('p').long("priority")),
                move |inv| {
                    let calls = Arc::clone(&add_calls);
                    async move {
                        let title = inv.options.value("title").unwrap_or_default().to_string();
                        calls.lock().unwrap().push(format!("add:{title}"));
                        Ok(())
                    }
                },
            )
            .verb(
                VerbSchema::new("list")
                    .alias("ls")
                    .default_verb()
                    .option(OptionSpec::flag("all").long("all")),
                move |inv| {
                    let calls = Arc::clone(&list_calls);
                    async move {
                        calls.lock().unwrap().push(format!("list:{}", inv.options.flag("all")));
                        Ok(())
                    }
                },
            )
            .build()
            .unwrap()
    }

    fn context(console: Arc<BufferConsole>) -> ExecutionContext {
        ExecutionContext::new(
            Arc::new(CommandRegistry::new()),
            None,
            console,
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn test_dispatches_by_alias() {
        let calls = Calls::default();
        let router = router(&calls);
        let ctx = context(Arc::new(BufferConsole::new()));

        assert!(router.handle("a \"buy milk\" -p 1", &ctx).await.unwrap());
        assert_eq!(calls.lock().unwrap().as_slice(), ["add:buy milk"]);
    }

    #[tokio::test]
    async fn test_default_verb_takes_all_tokens() {
        let calls = Calls::default();
        let router = router(&calls);
        let ctx = context(Arc::new(BufferConsole::new()));

        assert!(router.handle("--all", &ctx).await.unwrap());
        assert!(router.handle("", &ctx).await.unwrap());
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            ["list:true", "list:false"]
        );
    }

    #[tokio::test]
    async fn test_parse_failure_prints_errors_and_usage() {
        let calls = Calls::default();
        let router = router(&calls);
        let console = Arc::new(BufferConsole::new());
        let ctx = context(console.clone());

        assert!(!router.handle("add --bogus", &ctx).await.unwrap());
        assert!(calls.lock().unwrap().is_empty());

        let output = console.contents();
        assert!(output.contains("add:"));
        assert!(output.contains("task - Manage tasks"));
        assert!(output.contains("--priority"));
    }

    #[tokio::test]
    async fn test_handler_error_propagates() {
        let router = VerbRouter::builder("fail", "Always fails")
            .verb(VerbSchema::new("run").default_verb(), |_| async {
                Err(ShellError::Generic("nope".into()))
            })
            .build()
            .unwrap();
        let ctx = context(Arc::new(BufferConsole::new()));
        assert!(router.handle("", &ctx).await.is_err());
    }

    #[test]
    fn test_unknown_verb_without_default() {
        let router = VerbRouter::builder("svc", "Service control")
            .verb(VerbSchema::new("start"), |_| async { Ok(()) })
            .build()
            .unwrap();

        let errors = router.parse(&["stop".to_string()]).err().unwrap();
        assert_eq!(errors, vec!["svc: unknown verb 'stop'"]);
        let errors = router.parse(&[]).err().unwrap();
        assert_eq!(errors, vec!["svc: missing verb"]);
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            VerbRouter::builder("empty", "").build(),
            Err(ShellError::Config(ConfigError::NoVerbs { .. }))
        ));

        let result = VerbRouter::builder("task", "")
            .verb(VerbSchema::new("list").default_verb(), |_| async { Ok(()) })
            .verb(VerbSchema::new("show").default_verb(), |_| async { Ok(()) })
            .build();
        assert!(matches!(
            result,
            Err(ShellError::Config(ConfigError::DuplicateAlias { .. }))
        ));
    }

    #[test]
    fn test_suggestions_complete_verbs() {
        let calls = Calls::default();
        let strategy = router(&calls).suggestion_strategy();
        let result = strategy.suggest("task l", 6);
        assert_eq!(result.candidates, vec!["list"]);
    }
}
