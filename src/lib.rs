//! # Shortlinks
//!
//! A static site generator for short-link redirect sites. A YAML registry maps
//! short codes to destination URLs; the build turns it into files any static
//! host can serve: redirect pages, a JSON link index, and a `_redirects`
//! routing manifest.
//!
//! # Architecture: Load, Then Emit
//!
//! ```text
//! 1. Load   links.yaml + templates/  →  LinkRegistry + Templates   (validate everything)
//! 2. Emit   registry + templates      →  dist/                      (render, clear, write)
//! ```
//!
//! The whole registry is loaded and validated before anything is rendered,
//! and everything is rendered before the output directory is cleared. A bad
//! entry or a missing template never costs you the previous build.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Layered `shortlinks.toml` loading (defaults → file → CLI flags) and validation |
//! | [`registry`] | Parses and validates the link registry into an ordered [`registry::LinkRegistry`] |
//! | [`render`] | `{{placeholder}}` substitution and context-specific escaping |
//! | [`routing`] | `_redirects` rules for Netlify-style static hosts |
//! | [`emit`] | Renders all output files and writes the output tree |
//! | [`pipeline`] | `build` and `check` entry points taking explicit configuration |
//! | [`output`] | CLI output formatting |
//!
//! # Build Modes
//!
//! - **pages** renders `templates/redirect.html` once per code into
//!   `<code>/index.html`: a plain redirect page that works without JavaScript.
//! - **router** renders `templates/index.html` once, with the registry inlined
//!   as JSON, and routes every path to it. Adding a link changes one file.
//!
//! Both modes write `links.json`, `404.html` and `_redirects`, and stage the
//! `assets/` directory and logo when present. The `[outbound]` section adds an
//! interstitial page for external links and, optionally, a generator page
//! that builds `/outbound/` links.
//!
//! # Determinism
//!
//! The same inputs always produce a byte-identical output tree: registry order
//! follows the source document, assets are copied in file-name order, and no
//! timestamps or build ids are embedded.

pub mod config;
pub mod emit;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod routing;

#[cfg(test)]
pub(crate) mod test_helpers;
