//! Name → constructor registries for formatters and hooks.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::config::Options;
use crate::error::{MateError, PluginError, PluginKind};
use crate::plugins::formatter::{Formatter, JsonFormatter, NullFormatter, TextFormatter};
use crate::plugins::hook::{FileHook, Hook, TracingHook};

/// Builds a plugin instance from its (optional) options.
pub type Constructor<T> =
    Arc<dyn Fn(Option<&Options>) -> Result<Box<T>, PluginError> + Send + Sync>;

/// Maps plugin names to constructors.
pub struct PluginRegistry<T: ?Sized> {
    kind: PluginKind,
    constructors: RwLock<HashMap<String, Constructor<T>>>,
}

impl<T: ?Sized> PluginRegistry<T> {
    pub fn new(kind: PluginKind) -> Self {
        Self {
            kind,
            constructors: RwLock::new(HashMap::new()),
        }
    }

    /// Add a constructor, replacing any previous one with the same name.
    pub fn register<F>(&self, name: impl Into<String>, constructor: F)
    where
        F: Fn(Option<&Options>) -> Result<Box<T>, PluginError> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(kind = %self.kind, plugin = %name, "Plugin registered");
        self.constructors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(constructor));
    }

    /// Construct the plugin registered as `name`.
    ///
    /// The constructor runs outside the registry lock, so it may itself
    /// register plugins.
    pub fn resolve(&self, name: &str, options: Option<&Options>) -> Result<Box<T>, MateError> {
        let constructor = self
            .constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| MateError::PluginNotFound {
                kind: self.kind,
                name: name.to_string(),
            })?;

        constructor(options).map_err(|source| MateError::PluginConstruction {
            kind: self.kind,
            name: name.to_string(),
            source,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl<T: ?Sized> fmt::Debug for PluginRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("kind", &self.kind)
            .field("names", &self.names())
            .finish()
    }
}

/// The formatter and hook registries a [`LogMate`](crate::LogMate) resolves against.
#[derive(Debug)]
pub struct Plugins {
    formatters: PluginRegistry<dyn Formatter>,
    hooks: PluginRegistry<dyn Hook>,
}

impl Plugins {
    /// Registries with nothing registered.
    pub fn empty() -> Self {
        Self {
            formatters: PluginRegistry::new(PluginKind::Formatter),
            hooks: PluginRegistry::new(PluginKind::Hook),
        }
    }

    /// Registries pre-populated with the built-in formatters and hooks.
    pub fn with_builtins() -> Self {
        let plugins = Self::empty();

        plugins.formatters.register("text", |options| {
            Ok(Box::new(TextFormatter::from_options(options)?) as Box<dyn Formatter>)
        });
        plugins.formatters.register("json", |options| {
            Ok(Box::new(JsonFormatter::from_options(options)?) as Box<dyn Formatter>)
        });
        plugins
            .formatters
            .register("null", |_| Ok(Box::new(NullFormatter) as Box<dyn Formatter>));

        plugins.hooks.register("file", |options| {
            Ok(Box::new(FileHook::from_options(options)?) as Box<dyn Hook>)
        });
        plugins.hooks.register("tracing", |options| {
            Ok(Box::new(TracingHook::from_options(options)?) as Box<dyn Hook>)
        });

        plugins
    }

    /// Process-wide registries, created with the built-ins on first use.
    pub fn global() -> Arc<Plugins> {
        static GLOBAL: OnceLock<Arc<Plugins>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Plugins::with_builtins())).clone()
    }

    pub fn formatters(&self) -> &PluginRegistry<dyn Formatter> {
        &self.formatters
    }

    pub fn hooks(&self) -> &PluginRegistry<dyn Hook> {
        &self.hooks
    }
}

impl Default for Plugins {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Register a formatter in the process-wide registry.
pub fn register_formatter<F>(name: impl Into<String>, constructor: F)
where
    F: Fn(Option<&Options>) -> Result<Box<dyn Formatter>, PluginError> + Send + Sync + 'static,
{
    Plugins::global().formatters().register(name, constructor);
}

/// Register a hook in the process-wide registry.
pub fn register_hook<F>(name: impl Into<String>, constructor: F)
where
    F: Fn(Option<&Options>) -> Result<Box<dyn Hook>, PluginError> + Send + Sync + 'static,
{
    Plugins::global().hooks().register(name, constructor);
}
