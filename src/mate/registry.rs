//! Named logger registry.
//!
//! # Responsibilities
//! - Build loggers from their resolved configuration
//! - Populate the cache from a [`MateConfig`] exactly once
//! - Serve cached loggers by name
//!
//! # Design Decisions
//! - Validation runs before the map is touched
//! - A logger is only stored after every step of its build succeeded
//! - Population short-circuits on the first failing logger and keeps the
//!   loggers built before it
//! - Later `initialize` calls return the first attempt's result unchanged

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::config::{validate_config, LoggerConfig, MateConfig};
use crate::error::MateError;
use crate::logger::{Level, Logger};
use crate::plugins::Plugins;

/// Owns a name → logger cache and the plugins used to build its loggers.
#[derive(Debug)]
pub struct LogMate {
    plugins: Arc<Plugins>,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    initialized: OnceLock<Result<(), MateError>>,
}

impl LogMate {
    /// An empty, uninitialized registry using the process-wide plugins.
    pub fn new() -> Self {
        Self::with_plugins(Plugins::global())
    }

    /// An empty, uninitialized registry resolving against `plugins`.
    pub fn with_plugins(plugins: Arc<Plugins>) -> Self {
        Self {
            plugins,
            loggers: Mutex::new(HashMap::new()),
            initialized: OnceLock::new(),
        }
    }

    /// Build a registry holding every logger declared in `config`.
    pub fn from_config(config: &MateConfig) -> Result<Self, MateError> {
        Self::from_config_with_plugins(config, Plugins::global())
    }

    pub fn from_config_with_plugins(
        config: &MateConfig,
        plugins: Arc<Plugins>,
    ) -> Result<Self, MateError> {
        let mate = Self::with_plugins(plugins);
        mate.initialize(config)?;
        Ok(mate)
    }

    /// Populate the registry from `config`.
    ///
    /// The work runs at most once per registry. Concurrent callers block
    /// until it finishes; every caller, then and later, receives the
    /// result of that single attempt.
    pub fn initialize(&self, config: &MateConfig) -> Result<(), MateError> {
        self.initialized.get_or_init(|| self.populate(config)).clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get().is_some()
    }

    fn populate(&self, config: &MateConfig) -> Result<(), MateError> {
        validate_config(config).map_err(MateError::ConfigValidation)?;

        let run_env = config.run_env();
        let mut loggers = self.lock();
        loggers.reserve(config.loggers.len());

        for item in &config.loggers {
            let logger_config = item.config_for(run_env);
            let logger = self.build(&logger_config)?;
            loggers.insert(item.name.clone(), Arc::new(logger));
        }

        tracing::debug!(
            run_env = %run_env,
            loggers = config.loggers.len(),
            "Logger registry initialized"
        );
        Ok(())
    }

    /// Construct a logger from `config` without registering it.
    pub fn build(&self, config: &LoggerConfig) -> Result<Logger, MateError> {
        let mut logger = Logger::new();

        let formatter_config = config.effective_formatter();
        let formatter = self
            .plugins
            .formatters()
            .resolve(&formatter_config.name, formatter_config.options.as_ref())?;
        logger.set_formatter(formatter_config.name, formatter);

        for (name, options) in &config.hooks {
            let hook = self.plugins.hooks().resolve(name, Some(options))?;
            logger.add_hook(hook);
        }

        let level: Level = config.level.parse()?;
        logger.set_level(level);

        Ok(logger)
    }

    /// Build a logger and store it under `name`, replacing any previous
    /// logger of that name. Nothing is stored when the build fails.
    pub fn new_logger(
        &self,
        name: impl Into<String>,
        config: &LoggerConfig,
    ) -> Result<Arc<Logger>, MateError> {
        let name = name.into();
        let logger = Arc::new(self.build(config)?);

        tracing::debug!(logger = %name, level = %logger.level(), "Logger registered");
        self.lock().insert(name, logger.clone());
        Ok(logger)
    }

    /// The logger registered under `name`; `None` (or `""`) is the unnamed
    /// logger. Never builds on demand.
    pub fn logger<'a>(&self, name: impl Into<Option<&'a str>>) -> Option<Arc<Logger>> {
        let name = name.into().unwrap_or_default();
        self.lock().get(name).cloned()
    }

    /// Registered logger names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Logger>>> {
        self.loggers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LogMate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormatterConfig, LoggerItem, Options, ValidationError};
    use crate::error::{PluginError, PluginKind};
    use crate::plugins::{Formatter, Hook, TextFormatter};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    fn config(run_env: &str, items: Vec<LoggerItem>) -> MateConfig {
        let mut config = MateConfig::default();
        config.environments.run_env = run_env.to_string();
        config.loggers = items;
        config
    }

    fn plugins() -> Arc<Plugins> {
        Arc::new(Plugins::with_builtins())
    }

    #[test]
    fn test_every_declared_logger_is_served() {
        let cfg = config(
            "production",
            vec![
                LoggerItem::new("").with_env("production", LoggerConfig::default()),
                LoggerItem::new("api").with_env(
                    "production",
                    LoggerConfig::default()
                        .with_level("warn")
                        .with_formatter(FormatterConfig::new("json")),
                ),
                LoggerItem::new("db").with_env("production", LoggerConfig::default().with_level("error")),
            ],
        );
        let mate = LogMate::from_config_with_plugins(&cfg, plugins()).unwrap();

        assert_eq!(mate.names(), ["", "api", "db"]);
        assert_eq!(mate.len(), 3);

        let api = mate.logger("api").unwrap();
        assert_eq!(api.level(), Level::Warn);
        assert_eq!(api.formatter_name(), "json");
        assert_eq!(mate.logger("db").unwrap().level(), Level::Error);
    }

    #[test]
    fn test_missing_environment_uses_default_config() {
        let cfg = config(
            "development",
            vec![LoggerItem::new("svc").with_env(
                "production",
                LoggerConfig::default()
                    .with_level("error")
                    .with_formatter(FormatterConfig::new("json")),
            )],
        );
        let mate = LogMate::from_config_with_plugins(&cfg, plugins()).unwrap();

        let svc = mate.logger("svc").unwrap();
        assert_eq!(svc.level(), Level::Debug);
        assert_eq!(svc.formatter_name(), "text");
        assert_eq!(svc.hook_count(), 0);
    }

    #[test]
    fn test_unknown_formatter_aborts_build() {
        let cfg = config(
            "development",
            vec![LoggerItem::new("svc").with_env(
                "development",
                LoggerConfig::default().with_formatter(FormatterConfig::new("nope")),
            )],
        );
        let mate = LogMate::with_plugins(plugins());
        let err = mate.initialize(&cfg).unwrap_err();

        assert!(matches!(
            err,
            MateError::PluginNotFound { kind: PluginKind::Formatter, ref name } if name == "nope"
        ));
        assert!(mate.logger("svc").is_none());
    }

    #[test]
    fn test_unparseable_level() {
        let mate = LogMate::with_plugins(plugins());
        let err = mate
            .new_logger("svc", &LoggerConfig::default().with_level("verbose"))
            .unwrap_err();

        assert!(matches!(err, MateError::LevelParse(ref e) if e.0 == "verbose"));
        assert!(mate.logger("svc").is_none());
    }

    #[test]
    fn test_failed_build_keeps_previous_logger() {
        let mate = LogMate::with_plugins(plugins());
        let first = mate.new_logger("svc", &LoggerConfig::default()).unwrap();

        let err = mate
            .new_logger("svc", &LoggerConfig::default().with_hook("missing", Options::new()))
            .unwrap_err();
        assert!(matches!(err, MateError::PluginNotFound { kind: PluginKind::Hook, .. }));

        assert!(Arc::ptr_eq(&mate.logger("svc").unwrap(), &first));
    }

    #[test]
    fn test_first_failure_short_circuits_population() {
        let cfg = config(
            "development",
            vec![
                LoggerItem::new("ok"),
                LoggerItem::new("bad").with_env(
                    "development",
                    LoggerConfig::default().with_level("loud"),
                ),
                LoggerItem::new("never"),
            ],
        );
        let mate = LogMate::with_plugins(plugins());

        assert!(matches!(mate.initialize(&cfg), Err(MateError::LevelParse(_))));
        assert_eq!(mate.names(), ["ok"]);
    }

    #[test]
    fn test_invalid_config_leaves_registry_empty() {
        let cfg = config("development", vec![LoggerItem::new("a"), LoggerItem::new("a")]);
        let mate = LogMate::with_plugins(plugins());

        let err = mate.initialize(&cfg).unwrap_err();
        match err {
            MateError::ConfigValidation(errors) => {
                assert_eq!(errors, vec![ValidationError::DuplicateLogger { name: "a".into() }]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(mate.is_empty());
        assert!(LogMate::from_config_with_plugins(&cfg, plugins()).is_err());
    }

    #[test]
    fn test_default_and_empty_name_are_equivalent() {
        let mate = LogMate::from_config_with_plugins(&crate::config::default_mate_config(), plugins())
            .unwrap();

        let by_none = mate.logger(None).unwrap();
        let by_empty = mate.logger("").unwrap();
        assert!(Arc::ptr_eq(&by_none, &by_empty));
        assert!(mate.logger("unknown").is_none());
    }

    #[test]
    fn test_build_result_is_cached_instance() {
        let mate = LogMate::with_plugins(plugins());
        let built = mate
            .new_logger("svc", &LoggerConfig::default().with_formatter(FormatterConfig::new("text")))
            .unwrap();

        assert!(Arc::ptr_eq(&built, &mate.logger("svc").unwrap()));
    }

    #[test]
    fn test_build_does_not_register() {
        let mate = LogMate::with_plugins(plugins());
        let logger = mate.build(&LoggerConfig::default().with_level("trace")).unwrap();

        assert_eq!(logger.level(), Level::Trace);
        assert!(mate.is_empty());
    }

    #[test]
    fn test_hooks_are_attached() {
        let plugins = plugins();
        let fired = Arc::new(AtomicUsize::new(0));

        struct Counter(Arc<AtomicUsize>);
        impl Hook for Counter {
            fn fire(&self, _entry: &crate::logger::Entry) -> Result<(), crate::logger::LogError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let counter = fired.clone();
        plugins
            .hooks()
            .register("counter", move |_| Ok(Box::new(Counter(counter.clone())) as Box<dyn Hook>));

        let mate = LogMate::with_plugins(plugins);
        let logger = mate
            .new_logger(
                "svc",
                &LoggerConfig::default()
                    .with_formatter(FormatterConfig::new("null"))
                    .with_hook("counter", Options::new()),
            )
            .unwrap();

        assert_eq!(logger.hook_count(), 1);
        logger.info("one");
        logger.trace("filtered by level");
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_constructor_error_surfaces() {
        let plugins = plugins();
        plugins.hooks().register("picky", |_| {
            Err(PluginError::MissingOption { key: "url".into() })
        });
        let mate = LogMate::with_plugins(plugins);

        let err = mate
            .new_logger("svc", &LoggerConfig::default().with_hook("picky", Options::new()))
            .unwrap_err();
        assert!(matches!(
            err,
            MateError::PluginConstruction {
                kind: PluginKind::Hook,
                source: PluginError::MissingOption { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_initialize_runs_once_and_repeats_success() {
        let first = config("development", vec![LoggerItem::new("a")]);
        let second = config("development", vec![LoggerItem::new("b")]);
        let mate = LogMate::with_plugins(plugins());

        assert!(!mate.is_initialized());
        mate.initialize(&first).unwrap();
        let a = mate.logger("a").unwrap();

        mate.initialize(&second).unwrap();
        assert!(mate.is_initialized());
        assert_eq!(mate.names(), ["a"]);
        assert!(Arc::ptr_eq(&a, &mate.logger("a").unwrap()));
    }

    #[test]
    fn test_initialize_repeats_original_error() {
        let bad = config(
            "development",
            vec![LoggerItem::new("a").with_env("development", LoggerConfig::default().with_level("nope"))],
        );
        let good = config("development", vec![LoggerItem::new("b")]);
        let mate = LogMate::with_plugins(plugins());

        let first = mate.initialize(&bad).unwrap_err();
        let second = mate.initialize(&good).unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
        assert!(mate.is_empty());
    }

    #[test]
    fn test_concurrent_initialize_populates_once() {
        const THREADS: usize = 8;

        let plugins = plugins();
        let constructed = Arc::new(AtomicUsize::new(0));
        let counter = constructed.clone();
        plugins.formatters().register("counted", move |options| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(TextFormatter::from_options(options)?) as Box<dyn Formatter>)
        });

        let cfg = config(
            "development",
            vec![LoggerItem::new("svc").with_env(
                "development",
                LoggerConfig::default().with_formatter(FormatterConfig::new("counted")),
            )],
        );
        let mate = Arc::new(LogMate::with_plugins(plugins));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let mate = mate.clone();
                let barrier = barrier.clone();
                let cfg = cfg.clone();
                thread::spawn(move || {
                    barrier.wait();
                    mate.initialize(&cfg).unwrap();
                    mate.logger("svc").unwrap()
                })
            })
            .collect();

        let loggers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(constructed.load(Ordering::SeqCst), 1);
        assert!(loggers.iter().all(|l| Arc::ptr_eq(l, &loggers[0])));
    }
}
