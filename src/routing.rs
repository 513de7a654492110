//! Static-host routing manifest.
//!
//! Produces the `_redirects` file understood by Netlify and Cloudflare Pages:
//! one `<path> <destination> <status>` rule per line. Hosts apply the first
//! matching rule, so specific rules come before catch-alls.
//!
//! ```text
//! /outbound/* /outbound/index.html 200    # [outbound] enabled
//! /generate /generate/index.html 200      # [outbound] generator
//! /go /go/index.html 200                  # pages mode, one per code
//! /* /index.html 200                      # router mode
//! ```

use crate::config::{Mode, SiteConfig};
use crate::registry::LinkRegistry;
use std::fmt;

/// File name of the routing manifest in the output root.
pub const REDIRECTS_FILE: &str = "_redirects";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    pub from: String,
    pub to: String,
    pub status: u16,
}

impl RedirectRule {
    /// A status-200 rule: the host serves `to` without changing the URL.
    pub fn rewrite(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            status: 200,
        }
    }
}

impl fmt::Display for RedirectRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.from, self.to, self.status)
    }
}

/// Routing rules for a build, most specific first.
pub fn redirect_rules(registry: &LinkRegistry, config: &SiteConfig) -> Vec<RedirectRule> {
    let mut rules = Vec::new();
    if config.outbound.enabled {
        rules.push(RedirectRule::rewrite("/outbound/*", "/outbound/index.html"));
    }
    if config.outbound.generator {
        rules.push(RedirectRule::rewrite("/generate", "/generate/index.html"));
    }
    match config.mode {
        Mode::Pages => rules.extend(registry.iter().map(|entry| {
            RedirectRule::rewrite(
                format!("/{}", entry.code),
                format!("/{}/index.html", entry.code),
            )
        })),
        Mode::Router => rules.push(RedirectRule::rewrite("/*", "/index.html")),
    }
    rules
}

/// Render rules as manifest text, each row terminated by `\n`.
pub fn format_redirects(rules: &[RedirectRule]) -> String {
    rules.iter().map(|rule| format!("{rule}\n")).collect()
}
