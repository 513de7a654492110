use clap::{Parser, Subcommand};
use shortlinks::config::{self, Mode, Overrides, SiteConfig};
use shortlinks::{output, pipeline};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "shortlinks")]
#[command(about = "Static site generator for short-link redirect sites")]
#[command(long_about = "\
Static site generator for short-link redirect sites

Reads a YAML registry of short codes and writes a static site: redirect
pages (or a single router page), links.json, 404.html and a _redirects
routing manifest. Running without a command performs a full build.

Project structure:

  project/
  ├── shortlinks.toml          # Build config (optional)
  ├── links.yaml               # code: { url, title? }
  ├── templates/
  │   ├── redirect.html        # pages mode: {{code}} {{url}} {{title}} {{site_title}}
  │   ├── index.html           # router mode: {{links_json}} {{site_title}} {{default_title}}
  │   ├── outbound.html        # [outbound] enabled: {{site_title}}
  │   └── generate.html        # [outbound] generator: {{site_title}}
  ├── assets/                  # Copied to dist/assets/
  └── logo.png                 # Copied to dist/logo.png

The output directory is deleted and rebuilt on every run.

Run 'shortlinks gen-config' to generate a documented shortlinks.toml.")]
#[command(version)]
struct Cli {
    /// Project root; relative paths in the config resolve against it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file [default: <root>/shortlinks.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Link registry (overrides `source`)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Template directory (overrides `template_dir`)
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    /// Output directory (overrides `output_dir`)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Build mode (overrides `mode`)
    #[arg(long, value_enum, global = true)]
    mode: Option<Mode>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site (the default)
    Build,
    /// Validate config, registry and templates without writing anything
    Check,
    /// Print a stock shortlinks.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command.as_ref().unwrap_or(&Command::Build) {
        Command::Build => {
            let site_config = load_site_config(&cli)?;
            println!(
                "==> Building {} site \u{2192} {}",
                site_config.mode,
                cli.root.join(&site_config.output_dir).display()
            );
            let (_, report) = pipeline::build(&site_config, &cli.root)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", report.output_dir.display());
        }
        Command::Check => {
            let site_config = load_site_config(&cli)?;
            println!("==> Checking {}", cli.root.display());
            let checked = pipeline::check(&site_config, &cli.root)?;
            output::print_check_output(&checked.registry, &site_config.default_title);
            println!("==> Links are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Stock defaults, then the config file, then command-line flags.
fn load_site_config(cli: &Cli) -> Result<SiteConfig, config::ConfigError> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.root.join(config::CONFIG_FILE_NAME));
    let overrides = Overrides {
        source: cli.source.clone(),
        template_dir: cli.templates.clone(),
        output_dir: cli.output.clone(),
        mode: cli.mode,
    };
    config::load_config(&config_path, overrides.to_toml())
}
