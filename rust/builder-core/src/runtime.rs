// rust/builder-core/src/runtime.rs

//! Application context for assembling a training or evaluation run.
//!
//! The `Runtime` owns the validated data configuration and the builder
//! registry, and hands out loaded builders by name.
//!
//! # Example
//!
//! ```no_run
//! use builder_core::Runtime;
//!
//! let runtime = Runtime::from_config_file("vqa2.toml").unwrap();
//!
//! // Load the dataset for the configured split
//! let builder = runtime.load("vqa2").unwrap();
//! let dataset = builder.dataset().unwrap();
//! println!("{} shards", dataset.num_shards());
//!
//! // Feed vocabulary sizes to the model configuration
//! let mut model_config = toml::Table::new();
//! builder.update_config_for_model(&mut model_config).unwrap();
//! ```

use std::path::Path;

use crate::builder::DatasetBuilder;
use crate::config::DataConfig;
use crate::error::Result;
use crate::registry::BuilderRegistry;

pub struct Runtime {
    config: DataConfig,
    registry: BuilderRegistry,
}

impl Runtime {
    /// Creates a runtime with the built-in builders.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: DataConfig) -> Result<Self> {
        Self::with_registry(config, BuilderRegistry::with_defaults())
    }

    /// Creates a runtime from a configuration file.
    ///
    /// The configuration file should be in TOML format. Environment variable
    /// overrides are applied after loading the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or is invalid.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_config_file_with(path, |_| {})
    }

    /// Creates a runtime from a configuration file, letting the caller adjust
    /// the configuration after environment overrides and before validation.
    ///
    /// Precedence, lowest first: file, `VQA_*` environment, `overrides`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or is invalid.
    pub fn from_config_file_with(
        path: impl AsRef<Path>,
        overrides: impl FnOnce(&mut DataConfig),
    ) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Reading configuration from {}", path.display());
        let mut config = DataConfig::read_file(path)?.with_env_overrides();
        overrides(&mut config);
        Self::from_config(config)
    }

    /// Creates a runtime with a caller-supplied registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_registry(config: DataConfig, registry: BuilderRegistry) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, registry })
    }

    /// Creates the builder registered as `name` and loads its dataset.
    ///
    /// # Errors
    ///
    /// Returns `UnknownBuilder` for an unregistered name, or any error
    /// raised while loading.
    pub fn load(&self, name: &str) -> Result<Box<dyn DatasetBuilder>> {
        let mut builder = self.registry.create(name)?;
        tracing::info!(
            "Loading '{}' dataset for {} split from {}",
            name,
            self.config.dataset_type.as_deref().unwrap_or("unset"),
            self.config.data_root_dir.display()
        );
        builder.load(&self.config)?;
        Ok(builder)
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    pub fn registry(&self) -> &BuilderRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BuilderRegistry {
        &mut self.registry
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("dataset_type", &self.config.dataset_type)
            .field("data_root_dir", &self.config.data_root_dir)
            .field("registry", &self.registry)
            .finish()
    }
}
