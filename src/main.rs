//! form-controller - check field values against a form definition
//!
//! Loads a JSON form definition, applies `FIELD=VALUE` changes through
//! field bindings and reports every failing field.

use anyhow::{bail, Context, Result};
use clap::Parser;
use form_controller::config::Settings;
use form_controller::FormController;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "form-controller")]
#[command(version, about = "Validate field values against a form definition", long_about = None)]
struct Cli {
    /// Form definition file (defaults to `default_form` in the settings file)
    #[arg(short, long)]
    form: Option<PathBuf>,

    /// Field changes, applied in order
    #[arg(value_name = "FIELD=VALUE")]
    changes: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let default_filter = settings
        .log_filter
        .clone()
        .unwrap_or_else(|| "form_controller=info".to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let valid = run(&cli, &settings, &mut io::stdout().lock())?;
    if !valid {
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: &Cli, settings: &Settings, out: &mut impl Write) -> Result<bool> {
    let path = cli
        .form
        .as_ref()
        .or(settings.default_form.as_ref())
        .context("no form definition given; pass --form or set default_form in the settings")?;

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading form definition {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing form definition {}", path.display()))?;
    let mut form = FormController::from_json(&value)
        .with_context(|| format!("loading form definition {}", path.display()))?;
    tracing::info!(form = %path.display(), fields = form.validations().len(), "form loaded");

    for change in &cli.changes {
        let (name, value) = parse_change(change)?;
        form.bind_field(name)?.on_change(value);
    }

    for error in form.field_errors() {
        writeln!(out, "{error}")?;
    }

    let valid = form.is_valid();
    writeln!(out, "{}", if valid { "valid" } else { "invalid" })?;
    Ok(valid)
}

/// Split `FIELD=VALUE` at the first `=`
fn parse_change(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('=') {
        Some((name, value)) => Ok((name, value)),
        None => bail!("expected FIELD=VALUE, got '{arg}'"),
    }
}
