//! Renderer configuration

use crate::error::ConfigError;
use crate::partials::PartialNaming;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default template file extension
pub const DEFAULT_EXT_NAME: &str = "hbs";

/// Default prefix for environment configuration
pub const ENV_PREFIX: &str = "HBS_TO_HTML";

fn default_ext_name() -> String {
    DEFAULT_EXT_NAME.to_string()
}

/// Configuration for a [`TemplateRenderer`](crate::TemplateRenderer)
///
/// Only the template directory is required. Validation happens when the
/// renderer is built, so an invalid config never touches the filesystem.
///
/// # Example
///
/// ```rust
/// use hbs_to_html::RendererConfig;
///
/// let config = RendererConfig::new("views")
///     .default_layout("views/layouts/main.hbs")
///     .partial_dir("views/partials");
///
/// assert_eq!(config.ext_name, "hbs");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Directory holding `<name>.<ext_name>` templates
    pub template_dir_path: PathBuf,
    /// Template file extension, without the leading dot
    #[serde(default = "default_ext_name")]
    pub ext_name: String,
    /// Layout wrapped around every rendered template
    #[serde(default)]
    pub default_layout_file_path: Option<PathBuf>,
    /// Directory of partials registered before every render
    #[serde(default)]
    pub partial_dir_path: Option<PathBuf>,
    /// How partial file names map to partial names
    #[serde(default)]
    pub partial_naming: PartialNaming,
    /// Register partials into the process-wide registry instead of a
    /// registry owned by the renderer
    #[serde(default)]
    pub shared_partials: bool,
}

impl RendererConfig {
    /// Create a config for the given template directory
    pub fn new(template_dir_path: impl Into<PathBuf>) -> Self {
        Self {
            template_dir_path: template_dir_path.into(),
            ext_name: default_ext_name(),
            default_layout_file_path: None,
            partial_dir_path: None,
            partial_naming: PartialNaming::default(),
            shared_partials: false,
        }
    }

    /// Load the config from `HBS_TO_HTML_*` environment variables
    ///
    /// `HBS_TO_HTML_TEMPLATE_DIR_PATH` is required; `HBS_TO_HTML_EXT_NAME`,
    /// `HBS_TO_HTML_DEFAULT_LAYOUT_FILE_PATH`, `HBS_TO_HTML_PARTIAL_DIR_PATH`,
    /// `HBS_TO_HTML_PARTIAL_NAMING` (`legacy` or `suffix`) and
    /// `HBS_TO_HTML_SHARED_PARTIALS` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_prefixed(ENV_PREFIX)
    }

    /// Load the config from environment variables starting with `<prefix>_`
    pub fn from_env_prefixed(prefix: &str) -> Result<Self, ConfigError> {
        envy::prefixed(format!("{}_", prefix))
            .from_env::<Self>()
            .map_err(ConfigError::from)
    }

    /// Set the template file extension
    pub fn ext_name(mut self, ext_name: impl Into<String>) -> Self {
        self.ext_name = ext_name.into();
        self
    }

    /// Set the layout file
    pub fn default_layout(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_layout_file_path = Some(path.into());
        self
    }

    /// Set the partials directory
    pub fn partial_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.partial_dir_path = Some(path.into());
        self
    }

    /// Set the partial naming mode
    pub fn partial_naming(mut self, naming: PartialNaming) -> Self {
        self.partial_naming = naming;
        self
    }

    /// Opt into the process-wide partial registry
    pub fn shared_partials(mut self, enabled: bool) -> Self {
        self.shared_partials = enabled;
        self
    }

    /// Path of the template file for `template_name`
    pub fn template_path(&self, template_name: &str) -> PathBuf {
        self.template_dir_path
            .join(format!("{}.{}", template_name, self.ext_name))
    }

    /// The layout file, if one is configured
    pub fn layout_path(&self) -> Option<&Path> {
        self.default_layout_file_path.as_deref()
    }

    /// The partials directory, if one is configured
    pub fn partial_dir_path(&self) -> Option<&Path> {
        self.partial_dir_path.as_deref()
    }
}
