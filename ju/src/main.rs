use std::fs::File;
use std::path::Path;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use serde_json::Value as Json;
use tracing::{debug, info};

use jirautil::cli::{Cli, Command};
use jirautil::config::Config;
use jirautil::template::helpers::to_json;
use jirautil::{Renderer, codec, find_closest_parent_path, find_parent_paths, normalize, prompt_yes_no, read_file};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > WARN
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") | None => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", other);
            tracing::Level::WARN
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_deref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    match cli.command {
        Command::Render { template, data } => {
            let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
            debug!(sources = ?config.sources, "main: config loaded");
            cmd_render(&config, &template, data.as_deref())
        }
        Command::Find { name, all } => cmd_find(&name, all),
        Command::Normalize { input, output } => cmd_normalize(&input, output.as_deref()),
        Command::Confirm { message, default_yes } => {
            let yes = prompt_yes_no(&message, default_yes)?;
            if !yes {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// Read a YAML (or JSON) file into a normalized tree, `{}` when it is all blank
fn load_data(path: &Path) -> Result<Json> {
    let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
    let raw = codec::yaml_decode(file).context(format!("Failed to parse {}", path.display()))?;
    let data = normalize(&raw).context(format!("Failed to normalize {}", path.display()))?;
    Ok(data.unwrap_or_else(|| Json::Object(Default::default())))
}

fn cmd_render(config: &Config, template: &str, data: Option<&Path>) -> Result<()> {
    let template_path = config.resolve_template(template)?;
    let source = read_file(&template_path)?;
    let data = match data {
        Some(path) => load_data(path)?,
        None => config.document.clone(),
    };

    let stdout = std::io::stdout();
    Renderer::new()
        .render(&source, &data, stdout.lock())
        .context(format!("Failed to render {}", template_path.display()))?;
    Ok(())
}

fn cmd_find(name: &str, all: bool) -> Result<()> {
    if all {
        let paths = find_parent_paths(name);
        if paths.is_empty() {
            return Err(eyre!("{} not found in parent directory hierarchy", name));
        }
        for path in paths {
            println!("{}", path.display());
        }
    } else {
        let path = find_closest_parent_path(name)?;
        println!("{}", path.display());
    }
    Ok(())
}

fn cmd_normalize(input: &Path, output: Option<&Path>) -> Result<()> {
    let data = load_data(input)?;
    match output {
        Some(path) => {
            codec::json_write(path, &data)?;
            eprintln!("{} Wrote {}", "✓".green(), path.display().to_string().cyan());
        }
        None => println!("{}", to_json(&data)?),
    }
    Ok(())
}
