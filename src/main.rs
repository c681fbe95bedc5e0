use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use clusterform_emitter::{CloudFormationValidator, TemplateValidator, publish};
use clusterform_registry::ParameterRegistry;
use clusterform_stack::{StackConfig, declare_parameters, generate};

/// Clusterform - generates the CloudFormation template for an Ambari/HDP cluster
#[derive(Parser)]
#[command(name = "clusterform")]
#[command(version, about, long_about = None)]
struct Cli {
  /// JSON file with stack settings (platform, disk layout, timeouts)
  #[arg(long)]
  config: Option<PathBuf>,

  /// Where to write the template
  #[arg(short, long, default_value = "cloudformation.json")]
  output: PathBuf,

  /// Region of the validation endpoint
  #[arg(long, default_value = "us-west-2")]
  region: String,

  /// Write the template without validating it remotely
  #[arg(long)]
  skip_validation: bool,

  /// Override a parameter default, e.g. --set AdditionalInstanceCount=3
  #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_override)]
  overrides: Vec<(String, String)>,
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
  match raw.split_once('=') {
    Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
    _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
  }
}

fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run(cli).await })
}

async fn run(cli: Cli) -> Result<()> {
  let config = match &cli.config {
    Some(path) => load_config(path).await?,
    None => StackConfig::default(),
  };

  let mut registry = ParameterRegistry::new();
  declare_parameters(&mut registry).context("failed to declare parameters")?;
  for (name, value) in &cli.overrides {
    registry
      .set_default(name, value.as_str())
      .with_context(|| format!("invalid override for {}", name))?;
  }

  let template = generate(&registry, &config).context("failed to assemble template")?;

  let validator = if cli.skip_validation {
    None
  } else {
    Some(CloudFormationValidator::from_env(cli.region.as_str()).await)
  };

  match publish(
    &template,
    validator.as_ref().map(|v| v as &dyn TemplateValidator),
    &cli.output,
  )
  .await
  {
    Ok(report) => {
      println!("Template written to {}", report.path.display());
      Ok(())
    }
    Err(err) => {
      error!(error = %err, "template not written");
      Err(err).context("failed to publish template")
    }
  }
}

async fn load_config(path: &Path) -> Result<StackConfig> {
  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read config file: {}", path.display()))?;

  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_override() {
    assert_eq!(
      parse_override("AdditionalInstanceCount=3").unwrap(),
      ("AdditionalInstanceCount".to_string(), "3".to_string())
    );
    // only the first '=' splits
    assert_eq!(
      parse_override("PostCommand=echo a=b").unwrap(),
      ("PostCommand".to_string(), "echo a=b".to_string())
    );
    assert!(parse_override("NoValue").is_err());
    assert!(parse_override("=3").is_err());
  }

  #[test]
  fn test_cli_defaults() {
    let cli = Cli::parse_from(["clusterform"]);
    assert_eq!(cli.output, PathBuf::from("cloudformation.json"));
    assert_eq!(cli.region, "us-west-2");
    assert!(!cli.skip_validation);
    assert!(cli.overrides.is_empty());
  }

  #[test]
  fn test_cli_repeated_set() {
    let cli = Cli::parse_from([
      "clusterform",
      "--skip-validation",
      "-o",
      "out.json",
      "--set",
      "InstanceType=m4.2xlarge",
      "--set",
      "AdditionalInstanceCount=2",
    ]);
    assert!(cli.skip_validation);
    assert_eq!(cli.output, PathBuf::from("out.json"));
    assert_eq!(cli.overrides.len(), 2);
  }
}
