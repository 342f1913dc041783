use crate::error::{ConfigError, ConfigErrorExt};
use crate::model::ConfigModel;
use crate::path;
use crate::source::ConfigSource;
use crate::tracked::Tracked;
use config::{Config, Environment, File, Map};
use serde_json::Value;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment prefix used by [`load_config`].
pub const DEFAULT_ENV_PREFIX: &str = "BEDROCK";
/// Separator between the prefix, sections and keys of environment variable names.
pub const DEFAULT_ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone)]
struct FileLayer {
    path: PathBuf,
    required: bool,
}

/// A layered configuration loader producing a source-tracked model.
///
/// Layers apply in this order, each one attributed to its own [`ConfigSource`]:
/// 1. **Defaults**: `T::default()`, optionally overlaid with [`ConfigLoader::defaults`].
/// 2. **Files**: every [`ConfigLoader::file`] / [`ConfigLoader::optional_file`] in call order.
///    The format follows the extension (`toml`, `json`, `yaml`, `ini`, ...).
/// 3. **Environment**: variables named `PREFIX__SECTION__KEY`, values parsed as
///    booleans/numbers where possible.
/// 4. **Overrides**: dictionaries passed to [`ConfigLoader::override_with`].
///
/// # Example
/// ```rust
/// use bedrock_config::{ConfigLoader, ConfigModel, ConfigSource};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// struct App {
///     port: u16,
/// }
/// impl ConfigModel for App {}
///
/// let app = ConfigLoader::<App>::new()
///     .env_source([("BEDROCK__PORT".to_owned(), "8080".to_owned())])
///     .load()
///     .unwrap();
///
/// assert_eq!(app.port, 8080);
/// assert_eq!(app.source_of("port"), Some(&ConfigSource::Environment));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader<T: ConfigModel> {
    defaults: Option<Value>,
    files: Vec<FileLayer>,
    env_prefix: Option<String>,
    env_separator: String,
    env_source: Option<Map<String, String>>,
    overrides: Vec<Value>,
    _model: PhantomData<fn() -> T>,
}

impl<T: ConfigModel> Default for ConfigLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ConfigModel> ConfigLoader<T> {
    /// A loader reading environment variables prefixed with [`DEFAULT_ENV_PREFIX`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            defaults: None,
            files: Vec::new(),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_owned()),
            env_separator: DEFAULT_ENV_SEPARATOR.to_owned(),
            env_source: None,
            overrides: Vec::new(),
            _model: PhantomData,
        }
    }

    /// Overlays `defaults` on `T::default()`; the result is the reset baseline.
    #[must_use]
    pub fn defaults(mut self, defaults: Value) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Adds a file layer that must exist.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(FileLayer { path: path.into(), required: true });
        self
    }

    /// Adds a file layer that is skipped when missing.
    #[must_use]
    pub fn optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(FileLayer { path: path.into(), required: false });
        self
    }

    /// Sets the environment prefix. `None` disables the environment layer.
    #[must_use]
    pub fn env_prefix(mut self, prefix: Option<&str>) -> Self {
        self.env_prefix = prefix.map(str::to_owned);
        self
    }

    #[must_use]
    pub fn env_separator(mut self, separator: &str) -> Self {
        separator.clone_into(&mut self.env_separator);
        self
    }

    /// Reads environment variables from `vars` instead of the process environment.
    #[must_use]
    pub fn env_source(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env_source = Some(vars.into_iter().collect());
        self
    }

    /// Adds a runtime override layer (for example parsed command-line input).
    #[must_use]
    pub fn override_with(mut self, overrides: Value) -> Self {
        self.overrides.push(overrides);
        self
    }

    /// Applies every layer and returns the tracked model.
    ///
    /// # Errors
    /// Returns [`ConfigError::Load`] or [`ConfigError::Ini`] when a layer cannot be read and
    /// [`ConfigError::Invalid`] when a layer does not fit the model.
    pub fn load(self) -> Result<Tracked<T>, ConfigError> {
        let mut tracked: Tracked<T> = match self.defaults {
            Some(defaults) => Tracked::with_defaults(defaults)?,
            None => Tracked::new()?,
        };

        for layer in &self.files {
            let Some(values) = read_file(layer)? else {
                debug!(path = %layer.path.display(), "Optional config file not found, skipping");
                continue;
            };
            info!(path = %layer.path.display(), "Loading config file");
            tracked
                .merge(values, ConfigSource::file(&layer.path))
                .context(format!("Applying {}", layer.path.display()))?;
        }

        if let Some(prefix) = &self.env_prefix {
            let values = read_environment(prefix, &self.env_separator, self.env_source)?;
            if has_entries(&values) {
                debug!(prefix, "Applying environment overrides");
                tracked.merge(values, ConfigSource::Environment).context("Applying environment")?;
            }
        }

        for overrides in self.overrides {
            tracked.merge(overrides, ConfigSource::Override).context("Applying overrides")?;
        }

        Ok(tracked)
    }
}

fn read_file(layer: &FileLayer) -> Result<Option<Value>, ConfigError> {
    if !layer.path.exists() {
        if layer.required {
            return Err(ConfigError::Load {
                source: config::ConfigError::NotFound(layer.path.display().to_string()),
                context: Some("Reading config file".into()),
            });
        }
        return Ok(None);
    }

    if is_ini(&layer.path) {
        let document = bedrock_ini::load(&layer.path).context("Reading INI config file")?;
        return Ok(Some(bedrock_ini::to_value(&document)));
    }

    let values = Config::builder()
        .add_source(File::from(layer.path.as_path()).required(true))
        .build()
        .context("Failed to build config")?
        .try_deserialize::<Value>()
        .context("Failed to deserialize config")?;

    Ok(Some(values))
}

fn read_environment(
    prefix: &str,
    separator: &str,
    source: Option<Map<String, String>>,
) -> Result<Value, ConfigError> {
    let values = Config::builder()
        .add_source(
            Environment::with_prefix(prefix)
                .prefix_separator(separator)
                .separator(separator)
                .try_parsing(true)
                .source(source),
        )
        .build()
        .context("Failed to read environment")?
        .try_deserialize::<Value>()
        .context("Failed to deserialize environment")?;

    Ok(path::lowercase_keys(values))
}

fn is_ini(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case("ini"))
}

fn has_entries(value: &Value) -> bool {
    value.as_object().is_some_and(|map| !map.is_empty())
}

/// One-shot loader: `path` (default `settings.toml`) then `BEDROCK__*` environment variables.
///
/// # Errors
/// Returns an error if the file is missing or the combined values do not fit `T`.
///
/// # Example
/// ```rust
/// use bedrock_config::{ConfigModel, load_config};
///
/// #[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
/// impl ConfigModel for AppConfig {}
///
/// let cfg: AppConfig = load_config(Some("config/local.toml")).unwrap_or_default();
/// ```
pub fn load_config<T: ConfigModel>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError> {
    let effective_path =
        path.map_or_else(|| PathBuf::from("settings.toml"), |p| p.as_ref().to_path_buf());

    info!("Loading config from {}", effective_path.display());

    ConfigLoader::<T>::new().file(effective_path).load().map(Tracked::into_inner)
}
