//! Site emission.
//!
//! Turns a validated [`LinkRegistry`] into the output tree. Every file is
//! rendered into memory first by [`render_site`]; [`emit`] then deletes the
//! output directory, recreates it, and writes the rendered files and staged
//! assets. A failure while rendering leaves the previous output untouched. A
//! failure after the delete leaves a partial or empty tree: the next
//! successful run rebuilds it completely.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── go/index.html          # pages mode: one redirect page per code
//! ├── index.html             # router mode: single page resolving codes
//! ├── outbound/index.html    # [outbound] enabled
//! ├── generate/index.html    # [outbound] generator
//! ├── links.json             # code -> {url, title}
//! ├── 404.html               # built-in not-found page
//! ├── _redirects             # routing manifest
//! ├── assets/                # copied from the assets directory
//! └── logo.png               # copied from the logo file
//! ```
//!
//! ## Template Placeholders
//!
//! | Template | Placeholders |
//! |----------|--------------|
//! | `redirect.html` | `{{code}}`, `{{url}}`, `{{title}}`, `{{site_title}}` |
//! | `index.html` | `{{links_json}}`, `{{site_title}}`, `{{default_title}}` |
//! | `outbound.html` | `{{site_title}}` |
//! | `generate.html` | `{{site_title}}` |
//!
//! All values are HTML-escaped except `{{links_json}}`, which is JSON with
//! `</` escaped so it can sit inside a `<script>` element.

use crate::config::{ConfigError, Mode, Paths, SiteConfig};
use crate::registry::LinkRegistry;
use crate::render::{Substitutions, escape_html, escape_json_for_html, render};
use crate::routing::{self, REDIRECTS_FILE};
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const REDIRECT_TEMPLATE: &str = "redirect.html";
pub const INDEX_TEMPLATE: &str = "index.html";
pub const OUTBOUND_TEMPLATE: &str = "outbound.html";
pub const GENERATOR_TEMPLATE: &str = "generate.html";

pub const LINKS_FILE: &str = "links.json";
pub const NOT_FOUND_FILE: &str = "404.html";
pub const ASSETS_DIR: &str = "assets";

#[derive(Error, Debug)]
pub enum EmitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Copying assets: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Attach the offending path to an I/O error.
trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T, EmitError>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: &Path) -> Result<T, EmitError> {
        self.map_err(|source| EmitError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The string templates a build needs, read up front.
#[derive(Debug, Clone)]
pub struct Templates {
    /// `redirect.html` in pages mode, `index.html` in router mode.
    pub page: String,
    /// `outbound.html`, present only when the outbound page is enabled.
    pub outbound: Option<String>,
    /// `generate.html`, present only when the link generator is enabled.
    pub generator: Option<String>,
}

impl Templates {
    /// Template file names the given config requires.
    pub fn required(config: &SiteConfig) -> Vec<&'static str> {
        let mut names = vec![match config.mode {
            Mode::Pages => REDIRECT_TEMPLATE,
            Mode::Router => INDEX_TEMPLATE,
        }];
        if config.outbound.enabled {
            names.push(OUTBOUND_TEMPLATE);
        }
        if config.outbound.generator {
            names.push(GENERATOR_TEMPLATE);
        }
        names
    }

    /// Read the required templates from `dir`.
    ///
    /// Existence of every template is checked before any is read, so the
    /// error names the first missing file.
    pub fn load(dir: &Path, config: &SiteConfig) -> Result<Self, ConfigError> {
        let required = Self::required(config);
        if let Some(missing) = required
            .iter()
            .map(|name| dir.join(name))
            .find(|path| !path.is_file())
        {
            return Err(ConfigError::MissingTemplate(missing));
        }

        let read = |name: &str| fs::read_to_string(dir.join(name));
        let optional = |name: &'static str| -> Result<Option<String>, ConfigError> {
            if required.contains(&name) {
                Ok(Some(read(name)?))
            } else {
                Ok(None)
            }
        };
        Ok(Self {
            page: read(required[0])?,
            outbound: optional(OUTBOUND_TEMPLATE)?,
            generator: optional(GENERATOR_TEMPLATE)?,
        })
    }
}

/// What a rendered file is, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum FileKind {
    Redirect { code: String },
    Router,
    Outbound,
    Generator,
    LinkIndex,
    NotFound,
    Routing { rules: usize },
}

/// A file rendered in memory, with its path relative to the output root.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
    pub kind: FileKind,
}

/// Summary of one emission.
#[derive(Debug, Clone)]
pub struct EmitReport {
    pub output_dir: PathBuf,
    pub mode: Mode,
    pub files: Vec<(PathBuf, FileKind)>,
    /// Number of files copied from the assets directory.
    pub assets: usize,
    /// Logo path relative to the output root, if one was copied.
    pub logo: Option<PathBuf>,
}

impl EmitReport {
    pub fn redirect_pages(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, kind)| matches!(kind, FileKind::Redirect { .. }))
            .count()
    }

    pub fn routing_rules(&self) -> usize {
        self.files
            .iter()
            .find_map(|(_, kind)| match kind {
                FileKind::Routing { rules } => Some(*rules),
                _ => None,
            })
            .unwrap_or(0)
    }
}

/// Render every generated file without touching the filesystem.
pub fn render_site(
    registry: &LinkRegistry,
    templates: &Templates,
    config: &SiteConfig,
) -> Result<Vec<OutputFile>, EmitError> {
    let site_title = escape_html(&config.site_title);
    let links_json = escape_json_for_html(&registry.to_json()?);
    let mut files = Vec::new();

    match config.mode {
        Mode::Pages => {
            for entry in registry {
                let subs = Substitutions::from([
                    ("code", escape_html(&entry.code)),
                    ("url", escape_html(&entry.url)),
                    ("title", escape_html(entry.display_title(&config.default_title))),
                    ("site_title", site_title.clone()),
                ]);
                files.push(OutputFile {
                    path: Path::new(&entry.code).join("index.html"),
                    contents: render(&templates.page, &subs),
                    kind: FileKind::Redirect {
                        code: entry.code.clone(),
                    },
                });
            }
        }
        Mode::Router => {
            let subs = Substitutions::from([
                ("links_json", links_json.clone()),
                ("site_title", site_title.clone()),
                ("default_title", escape_html(&config.default_title)),
            ]);
            files.push(OutputFile {
                path: PathBuf::from("index.html"),
                contents: render(&templates.page, &subs),
                kind: FileKind::Router,
            });
        }
    }

    if let Some(outbound) = &templates.outbound {
        let subs = Substitutions::from([("site_title", site_title.clone())]);
        files.push(OutputFile {
            path: PathBuf::from("outbound").join("index.html"),
            contents: render(outbound, &subs),
            kind: FileKind::Outbound,
        });
    }

    if let Some(generator) = &templates.generator {
        let subs = Substitutions::from([("site_title", site_title.clone())]);
        files.push(OutputFile {
            path: PathBuf::from("generate").join("index.html"),
            contents: render(generator, &subs),
            kind: FileKind::Generator,
        });
    }

    files.push(OutputFile {
        path: PathBuf::from(LINKS_FILE),
        contents: links_json,
        kind: FileKind::LinkIndex,
    });

    files.push(OutputFile {
        path: PathBuf::from(NOT_FOUND_FILE),
        contents: render_not_found(&config.site_title).into_string(),
        kind: FileKind::NotFound,
    });

    let rules = routing::redirect_rules(registry, config);
    files.push(OutputFile {
        path: PathBuf::from(REDIRECTS_FILE),
        contents: routing::format_redirects(&rules),
        kind: FileKind::Routing { rules: rules.len() },
    });

    Ok(files)
}

/// Replace the output directory with the rendered site and staged assets.
pub fn emit(
    registry: &LinkRegistry,
    templates: &Templates,
    config: &SiteConfig,
    paths: &Paths,
) -> Result<EmitReport, EmitError> {
    let files = render_site(registry, templates, config)?;

    let output_dir = &paths.output_dir;
    clear_dir(output_dir)?;
    fs::create_dir_all(output_dir).at(output_dir)?;

    for file in &files {
        let target = output_dir.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        fs::write(&target, &file.contents).at(&target)?;
    }

    let assets = if paths.assets_dir.is_dir() {
        copy_dir_recursive(&paths.assets_dir, &output_dir.join(ASSETS_DIR))?
    } else {
        0
    };

    let logo = match paths.logo.file_name() {
        Some(name) if paths.logo.is_file() => {
            let target = output_dir.join(name);
            fs::copy(&paths.logo, &target).at(&target)?;
            Some(PathBuf::from(name))
        }
        _ => None,
    };

    Ok(EmitReport {
        output_dir: output_dir.clone(),
        mode: config.mode,
        files: files.into_iter().map(|f| (f.path, f.kind)).collect(),
        assets,
        logo,
    })
}

/// Remove `dir` and everything below it. A missing directory is fine.
fn clear_dir(dir: &Path) -> Result<(), EmitError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(EmitError::Io {
            path: dir.to_path_buf(),
            source: e,
        }),
    }
}

/// Copy `src` into `dst` in file-name order. Returns the number of files copied.
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, EmitError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).at(&target)?;
        } else {
            fs::copy(entry.path(), &target).at(entry.path())?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// The page static hosts serve for unknown paths.
fn render_not_found(site_title: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="robots" content="noindex";
                title { "Link not found · " (site_title) }
            }
            body {
                main.not-found {
                    h1 { "Link not found" }
                    p { "This short link does not exist." }
                    p {
                        a href="/" { (site_title) }
                    }
                }
            }
        }
    }
}
