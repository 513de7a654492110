//! Build entry points.
//!
//! [`build`] runs the whole pipeline from explicit configuration: resolve
//! paths, load the registry, load templates, then emit. Everything that can
//! be validated is validated before the output directory is touched.
//! [`check`] stops after validation.

use crate::config::{ConfigError, Paths, SiteConfig};
use crate::emit::{self, EmitError, EmitReport, Templates};
use crate::registry::{self, LinkRegistry};
use std::path::Path;

/// Everything loaded and validated, ready to emit.
#[derive(Debug)]
pub struct Checked {
    pub paths: Paths,
    pub registry: LinkRegistry,
    pub templates: Templates,
}

/// Validate config paths, the registry and the templates without writing.
pub fn check(config: &SiteConfig, root: &Path) -> Result<Checked, EmitError> {
    config.validate()?;
    let paths = config.resolve_paths(root);
    paths.validate(root)?;
    let registry = registry::load_registry_file(&paths.source)?;
    check_logo_collision(&registry, &paths)?;
    let templates = Templates::load(&paths.template_dir, config)?;
    Ok(Checked {
        paths,
        registry,
        templates,
    })
}

/// The logo is copied to `<output>/<file name>`, so no code may take that name.
fn check_logo_collision(registry: &LinkRegistry, paths: &Paths) -> Result<(), ConfigError> {
    let Some(name) = paths.logo.file_name().and_then(|n| n.to_str()) else {
        return Ok(());
    };
    match registry.get(name) {
        Some(entry) => Err(ConfigError::Validation(format!(
            "Short code '{}' collides with the logo file {}",
            entry.code,
            paths.logo.display()
        ))),
        None => Ok(()),
    }
}

/// Run the full build. Returns what was written.
pub fn build(config: &SiteConfig, root: &Path) -> Result<(LinkRegistry, EmitReport), EmitError> {
    let checked = check(config, root)?;
    let report = emit::emit(&checked.registry, &checked.templates, config, &checked.paths)?;
    Ok((checked.registry, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, Mode};
    use crate::test_helpers::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn build_fixture_site() {
        let tmp = setup_fixtures();
        let (registry, report) = build(&SiteConfig::default(), tmp.path()).unwrap();
        assert_eq!(find_link(&registry, "go").url, "https://example.com");
        assert_eq!(find_link(&registry, "go").title.as_deref(), Some("Example"));
        assert_eq!(find_link(&registry, "x").title, None);
        assert_eq!(report.redirect_pages(), registry.len());
        assert_eq!(report.mode, Mode::Pages);
    }

    #[test]
    fn check_writes_nothing() {
        let tmp = setup_fixtures();
        let checked = check(&SiteConfig::default(), tmp.path()).unwrap();
        assert!(!checked.paths.output_dir.exists());
        assert!(!checked.registry.is_empty());
    }

    #[test]
    fn invalid_registry_leaves_previous_output() {
        let tmp = setup_fixtures();
        build(&SiteConfig::default(), tmp.path()).unwrap();
        fs::write(tmp.path().join("links.yaml"), "go:\n  url: \"  \"\n").unwrap();

        let err = build(&SiteConfig::default(), tmp.path()).unwrap_err();
        assert_eq!(err.to_string(), "Entry for 'go' must include a non-empty 'url'");
        assert!(tmp.path().join("dist").join(crate::emit::LINKS_FILE).is_file());
    }

    #[test]
    fn missing_template_fails_before_clearing_output() {
        let tmp = setup_fixtures();
        build(&SiteConfig::default(), tmp.path()).unwrap();
        let config = SiteConfig {
            mode: Mode::Router,
            template_dir: PathBuf::from("no-such-templates"),
            ..Default::default()
        };

        let err = build(&config, tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            EmitError::Config(ConfigError::MissingTemplate(_))
        ));
        assert!(tmp.path().join("dist").join(crate::emit::LINKS_FILE).is_file());
    }

    #[test]
    fn missing_registry_is_error() {
        let tmp = setup_fixtures();
        fs::remove_file(tmp.path().join("links.yaml")).unwrap();
        let err = build(&SiteConfig::default(), tmp.path()).unwrap_err();
        assert!(matches!(err, EmitError::Config(ConfigError::MissingFile(_))));
    }

    #[test]
    fn refuses_to_clear_project_root() {
        let tmp = setup_fixtures();
        let config = SiteConfig {
            output_dir: PathBuf::from("."),
            ..Default::default()
        };
        assert!(build(&config, tmp.path()).is_err());
        assert!(tmp.path().join("links.yaml").is_file());
    }

    #[test]
    fn refuses_output_that_resolves_to_root() {
        let tmp = setup_fixtures();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        let config = SiteConfig {
            output_dir: PathBuf::from("sub/.."),
            ..Default::default()
        };

        let err = build(&config, tmp.path()).unwrap_err();
        assert!(matches!(err, EmitError::Config(ConfigError::Validation(_))));
        assert!(tmp.path().join("links.yaml").is_file());
        assert!(tmp.path().join("templates").is_dir());
    }

    #[test]
    fn refuses_output_containing_assets() {
        let tmp = setup_fixtures();
        fs::create_dir_all(tmp.path().join("dist/static")).unwrap();
        fs::write(tmp.path().join("dist/static/site.css"), "body {}").unwrap();
        let mut config = SiteConfig::default();
        config.assets.dir = PathBuf::from("dist/static");

        let err = build(&config, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("assets.dir"), "{err}");
        assert!(tmp.path().join("dist/static/site.css").is_file());
    }

    #[test]
    fn logo_named_code_fails_before_clearing_output() {
        let tmp = setup_fixtures();
        build(&SiteConfig::default(), tmp.path()).unwrap();
        let mut links = fs::read_to_string(tmp.path().join("links.yaml")).unwrap();
        links.push_str("logo.png:\n  url: https://example.com/logo\n");
        fs::write(tmp.path().join("links.yaml"), links).unwrap();

        let err = build(&SiteConfig::default(), tmp.path()).unwrap_err();
        assert!(
            err.to_string().starts_with("Short code 'logo.png' collides with the logo file"),
            "{err}"
        );
        assert!(tmp.path().join("dist/go/index.html").is_file());
        assert!(tmp.path().join("dist/logo.png").is_file());
    }
}
