//! CLI output formatting.
//!
//! Output is information-first: each link leads with its position and short
//! code, with the destination after an arrow and details on indented lines.
//!
//! ## Check
//!
//! ```text
//! Links
//! 001 go → https://example.com
//!     Title: Example
//! 002 x → https://example.com
//!     Title: Redirecting (default)
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 go → go/index.html
//! 002 x → x/index.html
//! Index → links.json
//! Not found → 404.html
//! Routing → _redirects (2 rules)
//! Assets → assets/ (3 files)
//! Logo → logo.png
//! Generated 2 redirect pages, 2 routing rules
//! ```
//!
//! Each `format_*` function returns lines and does no I/O, so it can be tested
//! directly; `print_*` wrappers write the lines to stdout.

use crate::emit::{ASSETS_DIR, EmitReport, FileKind};
use crate::registry::LinkRegistry;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// Format the validated registry, one entry per link.
pub fn format_check_output(registry: &LinkRegistry, default_title: &str) -> Vec<String> {
    let mut lines = vec!["Links".to_string()];
    if registry.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, entry) in registry.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            entry.code,
            entry.url
        ));
        let title = match &entry.title {
            Some(title) => title.clone(),
            None => format!("{default_title} (default)"),
        };
        lines.push(format!("{}Title: {}", indent(1), title));
    }
    lines
}

pub fn print_check_output(registry: &LinkRegistry, default_title: &str) {
    for line in format_check_output(registry, default_title) {
        println!("{}", line);
    }
}

/// Format the files written by a build.
pub fn format_build_output(report: &EmitReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut position = 0;

    for (path, kind) in &report.files {
        let path = path.display();
        let line = match kind {
            FileKind::Redirect { code } => {
                position += 1;
                format!("{} {} \u{2192} {}", format_index(position), code, path)
            }
            FileKind::Router => format!("Router \u{2192} {path}"),
            FileKind::Outbound => format!("Outbound \u{2192} {path}"),
            FileKind::Generator => format!("Generator \u{2192} {path}"),
            FileKind::LinkIndex => format!("Index \u{2192} {path}"),
            FileKind::NotFound => format!("Not found \u{2192} {path}"),
            FileKind::Routing { rules } => {
                format!("Routing \u{2192} {} ({})", path, plural(*rules, "rule", "rules"))
            }
        };
        lines.push(line);
    }

    if report.assets > 0 {
        lines.push(format!(
            "Assets \u{2192} {}/ ({})",
            ASSETS_DIR,
            plural(report.assets, "file", "files")
        ));
    }
    if let Some(logo) = &report.logo {
        lines.push(format!("Logo \u{2192} {}", logo.display()));
    }

    lines.push(format!(
        "Generated {}, {}",
        plural(report.redirect_pages(), "redirect page", "redirect pages"),
        plural(report.routing_rules(), "routing rule", "routing rules")
    ));
    lines
}

pub fn print_build_output(report: &EmitReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}
