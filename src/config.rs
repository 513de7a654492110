//! Build configuration module.
//!
//! Handles loading, validating, and merging `shortlinks.toml`. Configuration
//! is layered: stock defaults are overridden by the project's config file,
//! which is in turn overridden by command-line flags.
//!
//! ## Config File Location
//!
//! Place `shortlinks.toml` in the project root, next to the link registry:
//!
//! ```text
//! project/
//! ├── shortlinks.toml          # Build config (optional)
//! ├── links.yaml               # Link registry
//! ├── templates/
//! │   ├── redirect.html        # pages mode
//! │   ├── index.html           # router mode
//! │   ├── outbound.html        # only when [outbound] is enabled
//! │   └── generate.html        # only when [outbound] generator is on
//! ├── assets/                  # Copied verbatim to dist/assets/
//! └── logo.png                 # Copied to dist/logo.png
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source = "links.yaml"
//! template_dir = "templates"
//! output_dir = "dist"
//! mode = "pages"            # or "router"
//! site_title = "Short Links"
//! default_title = "Redirecting"
//!
//! [assets]
//! dir = "assets"
//! logo = "logo.png"
//!
//! [outbound]
//! enabled = false
//! generator = false         # requires enabled = true
//! ```
//!
//! Relative paths are resolved against the project root. Unknown keys are
//! rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "shortlinks.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {}", .0.message())]
    Toml(#[from] toml::de::Error),
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Missing {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Missing template {}", .0.display())]
    MissingTemplate(PathBuf),
    #[error("{0}")]
    Validation(String),
}

/// Which kind of site the emitter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One redirect page per short code at `<code>/index.html`.
    #[default]
    Pages,
    /// A single `index.html` that resolves codes client-side.
    Router,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Pages => f.write_str("pages"),
            Mode::Router => f.write_str("router"),
        }
    }
}

/// Build configuration loaded from `shortlinks.toml`.
///
/// All fields have defaults; a config file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Path to the YAML link registry.
    pub source: PathBuf,
    /// Directory holding the HTML string templates.
    pub template_dir: PathBuf,
    /// Output directory. Deleted and recreated on every build.
    pub output_dir: PathBuf,
    /// Per-code pages or a single router page.
    pub mode: Mode,
    /// Site name, exposed to templates as `{{site_title}}`.
    pub site_title: String,
    /// Display title for links that don't set one.
    pub default_title: String,
    /// Static assets staged into the output tree.
    pub assets: AssetsConfig,
    /// Outbound interstitial page.
    pub outbound: OutboundConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("links.yaml"),
            template_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("dist"),
            mode: Mode::default(),
            site_title: "Short Links".to_string(),
            default_title: "Redirecting".to_string(),
            assets: AssetsConfig::default(),
            outbound: OutboundConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate values that don't depend on the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_title must not be empty".into(),
            ));
        }
        if self.site_title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site_title must not be empty".into(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir must not be empty".into(),
            ));
        }
        if self.outbound.generator && !self.outbound.enabled {
            return Err(ConfigError::Validation(
                "outbound.generator requires outbound.enabled".into(),
            ));
        }
        Ok(())
    }

    /// Resolve every configured path against the project root.
    pub fn resolve_paths(&self, root: &Path) -> Paths {
        Paths {
            source: root.join(&self.source),
            template_dir: root.join(&self.template_dir),
            output_dir: root.join(&self.output_dir),
            assets_dir: root.join(&self.assets.dir),
            logo: root.join(&self.assets.logo),
        }
    }
}

/// Static asset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Directory copied to `<output>/assets/`, skipped if absent.
    pub dir: PathBuf,
    /// Image copied to the output root, skipped if absent.
    pub logo: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            logo: PathBuf::from("logo.png"),
        }
    }
}

/// Outbound interstitial settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutboundConfig {
    pub enabled: bool,
    /// Also emit the `/generate/` page that builds `/outbound/<url>` links.
    pub generator: bool,
}

/// Filesystem locations for one build, resolved from [`SiteConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    pub source: PathBuf,
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub logo: PathBuf,
}

impl Paths {
    /// Refuse output locations whose removal would destroy build inputs.
    ///
    /// Paths are made absolute and `.`/`..` are resolved lexically before
    /// comparing. Symlinks are not followed.
    pub fn validate(&self, root: &Path) -> Result<(), ConfigError> {
        let output = normalize(&self.output_dir)?;
        if normalize(root)?.starts_with(&output) {
            return Err(ConfigError::Validation(format!(
                "Refusing to use the project root or a parent of it as output directory: {}",
                self.output_dir.display()
            )));
        }
        let inputs = [
            ("source", &self.source),
            ("template_dir", &self.template_dir),
            ("assets.dir", &self.assets_dir),
            ("assets.logo", &self.logo),
        ];
        for (what, input) in inputs {
            if normalize(input)?.starts_with(&output) {
                return Err(ConfigError::Validation(format!(
                    "output_dir {} contains {} {}; it would be deleted by the build",
                    self.output_dir.display(),
                    what,
                    input.display()
                )));
            }
        }
        Ok(())
    }
}

/// Absolute form of `path` with `.` dropped and `..` applied to the
/// preceding component, so `dist`, `./dist` and `sub/../dist` compare equal.
fn normalize(path: &Path) -> Result<PathBuf, ConfigError> {
    let mut normalized = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge each overlay in order onto `base`, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config: stock defaults, then `config_path` if it exists, then
/// `overrides` (typically built from command-line flags).
pub fn load_config(
    config_path: &Path,
    overrides: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let file = load_raw_config(config_path)?;
    resolve_config(base, file.into_iter().chain(overrides))
}

/// Command-line flags that override config file values.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub mode: Option<Mode>,
}

impl Overrides {
    /// The overlay table for [`load_config`], or `None` if no flag was given.
    pub fn to_toml(&self) -> Option<toml::Value> {
        let mut table = toml::map::Map::new();
        let paths = [
            ("source", &self.source),
            ("template_dir", &self.template_dir),
            ("output_dir", &self.output_dir),
        ];
        for (key, path) in paths {
            if let Some(path) = path {
                table.insert(
                    key.to_string(),
                    toml::Value::String(path.to_string_lossy().into_owned()),
                );
            }
        }
        if let Some(mode) = self.mode {
            table.insert("mode".to_string(), toml::Value::String(mode.to_string()));
        }
        (!table.is_empty()).then_some(toml::Value::Table(table))
    }
}

/// Returns a fully-commented stock `shortlinks.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Shortlinks Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Relative paths are resolved against the project root (--root).
# Command-line flags (--source, --templates, --output, --mode) override
# the values in this file. Unknown keys will cause an error.

# YAML mapping of short code -> { url, title }.
source = "links.yaml"

# Directory holding the HTML templates. Required templates depend on mode:
#   pages  -> redirect.html
#   router -> index.html
# plus outbound.html when [outbound] is enabled.
template_dir = "templates"

# Output directory. It is deleted and rebuilt on every run.
output_dir = "dist"

# "pages"  : one redirect page per short code at <code>/index.html
# "router" : a single index.html that resolves codes in the browser
mode = "pages"

# Site name, available to templates as {{site_title}}.
site_title = "Short Links"

# Title shown for links that don't set one.
default_title = "Redirecting"

# ---------------------------------------------------------------------------
# Static assets
# ---------------------------------------------------------------------------
[assets]
# Copied verbatim to <output_dir>/assets/ when present.
dir = "assets"

# Copied to the root of <output_dir> when present.
logo = "logo.png"

# ---------------------------------------------------------------------------
# Outbound interstitial
# ---------------------------------------------------------------------------
[outbound]
# Render templates/outbound.html to <output_dir>/outbound/index.html and
# route /outbound/* to it.
enabled = false

# Render templates/generate.html to <output_dir>/generate/index.html: a page
# that turns a destination URL into an /outbound/ link. Requires enabled.
generator = false
"##
}
