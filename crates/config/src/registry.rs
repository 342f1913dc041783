use crate::error::ConfigError;
use crate::model::ConfigModel;
use crate::path;
use crate::source::ConfigSource;
use crate::tracked::Tracked;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// Builds a model from a dictionary of values.
pub type Loader<T> = Arc<dyn Fn(Value) -> Result<T, ConfigError> + Send + Sync>;

#[derive(Debug)]
struct Registration {
    type_id: TypeId,
    type_name: &'static str,
    defaults: Value,
    loader: Box<dyn Any + Send + Sync>,
}

impl Registration {
    fn loader<T: ConfigModel>(&self, name: &str) -> Result<Loader<T>, ConfigError> {
        self.check_type::<T>(name)?;
        self.loader.downcast_ref::<Loader<T>>().cloned().ok_or_else(|| {
            ConfigError::registry(format!("Loader for '{name}' has an unexpected type"))
        })
    }

    fn check_type<T: ConfigModel>(&self, name: &str) -> Result<(), ConfigError> {
        if self.type_id == TypeId::of::<T>() {
            return Ok(());
        }
        Err(ConfigError::registry(format!(
            "'{name}' is registered as {}, not {}",
            self.type_name,
            std::any::type_name::<T>()
        )))
    }
}

/// The default loader: deserializes, rejects unknown fields and validates.
#[must_use]
pub fn serde_loader<T: ConfigModel>() -> Loader<T> {
    Arc::new(|value| {
        Tracked::<T>::from_value(value, ConfigSource::Default).map(Tracked::into_inner)
    })
}

/// A thread-safe registry of named configuration models.
///
/// Each entry stores a loader and a defaults dictionary. Entries are keyed by name and
/// remember the model type they were registered with, so retrieving an entry as the wrong
/// type fails with [`ConfigError::Registry`].
#[derive(Debug, Clone, Default)]
pub struct ConfigRegistry {
    entries: Arc<RwLock<FxHashMap<String, Registration>>>,
}

static GLOBAL: OnceLock<ConfigRegistry> = OnceLock::new();

impl ConfigRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Registers `name` with a loader and a defaults dictionary.
    ///
    /// The defaults are run through the loader once so broken registrations fail here
    /// rather than on first use.
    ///
    /// # Errors
    /// Returns [`ConfigError::Registry`] if `name` is taken, or the loader's error if the
    /// defaults do not load.
    pub fn register<T: ConfigModel>(
        &self,
        name: impl Into<String>,
        loader: Loader<T>,
        defaults: Value,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(ConfigError::registry(format!("'{name}' is already registered")));
        }
        loader(defaults.clone())?;

        let mut entries = self.entries.write();
        if entries.contains_key(&name) {
            return Err(ConfigError::registry(format!("'{name}' is already registered")));
        }
        entries.insert(
            name.clone(),
            Registration {
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                defaults,
                loader: Box::new(loader),
            },
        );
        debug!(name, model = std::any::type_name::<T>(), "Registered config");
        Ok(())
    }

    /// Like [`ConfigRegistry::register`] but succeeds without changes when `name` already holds
    /// a `T`. Returns `true` if this call performed the registration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Registry`] if `name` is registered with another model type.
    pub fn register_if_absent<T: ConfigModel>(
        &self,
        name: impl Into<String>,
        loader: Loader<T>,
        defaults: Value,
    ) -> Result<bool, ConfigError> {
        let name = name.into();
        if let Some(existing) = self.entries.read().get(&name) {
            existing.check_type::<T>(&name)?;
            trace!(name, "Config already registered");
            return Ok(false);
        }
        self.register(name, loader, defaults).map(|()| true)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// The defaults dictionary registered under `name`.
    #[must_use]
    pub fn defaults(&self, name: &str) -> Option<Value> {
        self.entries.read().get(name).map(|e| e.defaults.clone())
    }

    /// Loads `name` with `overrides` deep-merged over its defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Registry`] for unknown names or a type mismatch, or the loader's
    /// error.
    pub fn load<T: ConfigModel>(
        &self,
        name: &str,
        overrides: Option<Value>,
    ) -> Result<T, ConfigError> {
        let (loader, mut values) = {
            let entries = self.entries.read();
            let entry = entries.get(name).ok_or_else(|| unknown(name))?;
            (entry.loader::<T>(name)?, entry.defaults.clone())
        };

        if let Some(overrides) = overrides {
            path::merge(&mut values, overrides);
        }
        loader(values)
    }

    /// A [`Tracked`] model whose baseline is the registered defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Registry`] for unknown names or a type mismatch.
    pub fn tracked<T: ConfigModel>(&self, name: &str) -> Result<Tracked<T>, ConfigError> {
        let defaults = {
            let entries = self.entries.read();
            let entry = entries.get(name).ok_or_else(|| unknown(name))?;
            entry.check_type::<T>(name)?;
            entry.defaults.clone()
        };
        Tracked::with_defaults(defaults)
    }

    /// Removes `name`. Returns `true` if it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = self.entries.write().remove(name).is_some();
        if removed {
            debug!(name, "Unregistered config");
        }
        removed
    }
}

fn unknown(name: &str) -> ConfigError {
    ConfigError::registry(format!("'{name}' is not registered"))
}
