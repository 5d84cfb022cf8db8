//! CLI application entry point and configuration.
//!
//! This module provides the main CLI application logic, including argument parsing,
//! configuration loading, and command dispatch.

use crate::commands::{Cli, Commands, ConfigCommand, FeaturizeArgs, ListArgs, OutputFormat};
use crate::error::{CliError, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead};
use std::path::Path;
use textfeat_analysis::{
    AnalysisResult, CombinedFeatures, Combiner, FeaturizerOptions, FeaturizerRegistry, Toolkit,
};
use textfeat_core::config::{LogFormat, RunMode};
use textfeat_core::{Collision, FeatureMapping, MergeReport, TextfeatConfig};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main CLI application.
#[derive(Debug)]
pub struct App {
    /// Effective configuration.
    pub config: TextfeatConfig,
    /// Parsed CLI arguments.
    pub cli: Cli,
}

/// One featurized text as printed by `featurize`.
#[derive(Debug, Serialize)]
struct FeatureRecord<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<&'a FeatureMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    collisions: Option<&'a [Collision]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Rendered `featurize` output and how many texts failed.
#[derive(Debug)]
struct FeaturizeOutput {
    rendered: String,
    failed: usize,
}

/// Registered featurizer as printed by `list`.
#[derive(Debug, Serialize)]
struct FeaturizerInfo {
    name: String,
    description: String,
}

impl App {
    /// Create a new application instance from command line arguments.
    pub fn new() -> Result<Self> {
        Self::from_cli(Cli::parse())
    }

    /// Create an application instance from already parsed arguments.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let config = Self::load_config(&cli)?;
        Ok(Self { config, cli })
    }

    /// Load configuration from the `--config` file or the default location.
    fn load_config(cli: &Cli) -> Result<TextfeatConfig> {
        if let Some(config_path) = &cli.config {
            if !config_path.exists() {
                return Err(CliError::Config(format!(
                    "Configuration file not found: {}",
                    config_path.display()
                )));
            }
            return Ok(TextfeatConfig::load(config_path)?);
        }

        match TextfeatConfig::default_path() {
            Ok(path) if path.exists() => Ok(TextfeatConfig::load(&path)?),
            _ => Ok(TextfeatConfig::default()),
        }
    }

    /// Run the application.
    pub fn run(self) -> Result<()> {
        self.setup_logging();

        match &self.cli.command {
            Commands::Featurize(args) => self.handle_featurize(args),
            Commands::List(args) => self.handle_list(args),
            Commands::Config(args) => self.handle_config(&args.command),
        }
    }

    /// Set up logging from `-v`, `RUST_LOG`, or the configured level, in that order.
    fn setup_logging(&self) {
        let filter = match self.cli.verbose {
            0 => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.config.logging.level.as_str())),
            count => EnvFilter::new(verbosity_level(count)),
        };

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr);

        let _ = match self.config.logging.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Text => builder.try_init(),
        };
    }

    fn handle_featurize(&self, args: &FeaturizeArgs) -> Result<()> {
        let texts = collect_texts(args)?;
        let output = self.featurize(args, &texts)?;
        print!("{}", output.rendered);
        if output.failed > 0 {
            return Err(CliError::Featurize {
                failed: output.failed,
                total: texts.len(),
            });
        }
        Ok(())
    }

    /// Featurize `texts` and render them in the requested format.
    ///
    /// A text that fails is rendered with its error in place of features;
    /// the other texts are unaffected.
    fn featurize(&self, args: &FeaturizeArgs, texts: &[String]) -> Result<FeaturizeOutput> {
        if texts.is_empty() {
            return Err(CliError::Argument("no input texts".to_string()));
        }

        let config = apply_overrides(&self.config, args);
        let toolkit = Toolkit::from_config(&config.toolkit)?;
        let registry = FeaturizerRegistry::with_options(FeaturizerOptions {
            sentence_keys: config.toolkit.sentence_keys,
        });
        let combiner = Combiner::from_config(&config, &registry)?;
        info!(
            "Featurizing {} texts with {}",
            texts.len(),
            combiner.featurizer_names().join(", ")
        );

        let report_collisions = config.combiner.report_collisions;
        let results: Vec<AnalysisResult<CombinedFeatures>> = if report_collisions {
            texts
                .iter()
                .map(|text| combiner.combine_with_report(text, &toolkit))
                .collect()
        } else {
            combiner
                .featurize_batch(texts, &toolkit)
                .into_iter()
                .map(|result| {
                    result.map(|features| CombinedFeatures {
                        features,
                        report: MergeReport::default(),
                    })
                })
                .collect()
        };

        let records: Vec<FeatureRecord<'_>> = texts
            .iter()
            .zip(&results)
            .map(|(text, result)| match result {
                Ok(combined) => FeatureRecord {
                    text,
                    features: Some(&combined.features),
                    collisions: report_collisions.then(|| combined.report.collisions.as_slice()),
                    error: None,
                },
                Err(err) => {
                    warn!("Failed to featurize {:?}: {}", text, err);
                    FeatureRecord {
                        text,
                        features: None,
                        collisions: None,
                        error: Some(err.to_string()),
                    }
                }
            })
            .collect();

        let failed = records.iter().filter(|record| record.error.is_some()).count();
        Ok(FeaturizeOutput {
            rendered: render_records(&records, args.format)?,
            failed,
        })
    }

    fn handle_list(&self, args: &ListArgs) -> Result<()> {
        let registry = FeaturizerRegistry::with_options(FeaturizerOptions {
            sentence_keys: self.config.toolkit.sentence_keys,
        });
        print!("{}", render_featurizers(&registry, args.format)?);
        Ok(())
    }

    fn handle_config(&self, command: &ConfigCommand) -> Result<()> {
        match command {
            ConfigCommand::Show { format } => {
                let rendered = match format {
                    OutputFormat::Text => self.config.to_toml()?,
                    OutputFormat::Json | OutputFormat::Jsonl => {
                        format!("{}\n", serde_json::to_string_pretty(&self.config)?)
                    }
                };
                print!("{}", rendered);
                Ok(())
            }
            ConfigCommand::Init { path, force } => {
                let path = match path {
                    Some(path) => path.clone(),
                    None => TextfeatConfig::default_path()?,
                };
                init_config(&path, *force)?;
                println!("Wrote default configuration to {}", path.display());
                Ok(())
            }
        }
    }
}

fn verbosity_level(count: u8) -> &'static str {
    match count {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Effective configuration after command line overrides.
fn apply_overrides(base: &TextfeatConfig, args: &FeaturizeArgs) -> TextfeatConfig {
    let mut config = base.clone();
    if !args.featurizers.is_empty() {
        config.featurizers.enabled = args.featurizers.clone();
    }
    if let Some(policy) = args.policy {
        config.combiner.collision_policy = policy.into();
    }
    if args.report_collisions {
        config.combiner.report_collisions = true;
    }
    if args.parallel {
        config.combiner.run_mode = RunMode::Parallel;
    }
    if let Some(workers) = args.workers {
        config.combiner.max_workers = workers;
    }
    if let Some(style) = args.sentence_keys {
        config.toolkit.sentence_keys = style.into();
    }
    config
}

/// Texts from arguments and `--input`, or stdin when neither is given.
fn collect_texts(args: &FeaturizeArgs) -> Result<Vec<String>> {
    let mut texts = args.texts.clone();

    if let Some(path) = &args.input {
        let content = fs::read_to_string(path)?;
        texts.extend(non_blank_lines(content.lines()));
    }

    if texts.is_empty() && args.input.is_none() {
        debug!("Reading texts from stdin");
        let lines = io::stdin()
            .lock()
            .lines()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        texts.extend(non_blank_lines(lines.iter().map(String::as_str)));
    }

    Ok(texts)
}

fn non_blank_lines<'a>(
    lines: impl Iterator<Item = &'a str> + 'a,
) -> impl Iterator<Item = String> + 'a {
    lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

fn render_records(records: &[FeatureRecord<'_>], format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            out.push_str(&serde_json::to_string_pretty(records)?);
            out.push('\n');
        }
        OutputFormat::Jsonl => {
            for record in records {
                out.push_str(&serde_json::to_string(record)?);
                out.push('\n');
            }
        }
        OutputFormat::Text => {
            for record in records {
                out.push_str(record.text);
                out.push('\n');
                for (key, value) in record.features.iter().flat_map(|features| features.iter()) {
                    out.push_str(&format!("  {} = {}\n", key, value));
                }
                if let Some(error) = &record.error {
                    out.push_str(&format!("  error: {}\n", error));
                }
                for collision in record.collisions.unwrap_or_default() {
                    out.push_str(&format!("  ! {}\n", collision));
                }
            }
        }
    }
    Ok(out)
}

fn render_featurizers(registry: &FeaturizerRegistry, format: OutputFormat) -> Result<String> {
    let infos: Vec<FeaturizerInfo> = registry
        .featurizers()
        .iter()
        .map(|featurizer| FeaturizerInfo {
            name: featurizer.name().to_string(),
            description: featurizer.description().to_string(),
        })
        .collect();

    let mut out = String::new();
    match format {
        OutputFormat::Text => {
            for info in &infos {
                out.push_str(&format!("{:<20} {}\n", info.name, info.description));
            }
        }
        OutputFormat::Json => {
            out.push_str(&serde_json::to_string_pretty(&infos)?);
            out.push('\n');
        }
        OutputFormat::Jsonl => {
            for info in &infos {
                out.push_str(&serde_json::to_string(info)?);
                out.push('\n');
            }
        }
    }
    Ok(out)
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        )));
    }
    TextfeatConfig::default().save(path)?;
    Ok(())
}

/// Parse arguments and run the application.
pub fn run() -> Result<()> {
    let app = App::new()?;
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::PolicyArg;
    use std::path::PathBuf;
    use textfeat_core::CollisionPolicy;

    fn featurize_args(extra: &[&str]) -> FeaturizeArgs {
        let mut argv = vec!["textfeat", "featurize"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).expect("arguments should parse").command {
            Commands::Featurize(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn app() -> App {
        let cli = Cli::try_parse_from(["textfeat", "list"]).expect("arguments should parse");
        App {
            config: TextfeatConfig::default(),
            cli,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("textfeat-cli-{}-{}", std::process::id(), name))
    }

    #[test]
    fn parses_featurize_flags() {
        let args = featurize_args(&[
            "--featurizers",
            "length,question_words",
            "--policy",
            "first-write-wins",
            "--format",
            "jsonl",
            "--parallel",
            "What now?",
        ]);
        assert_eq!(args.featurizers, vec!["length", "question_words"]);
        assert_eq!(args.policy, Some(PolicyArg::FirstWriteWins));
        assert_eq!(args.format, OutputFormat::Jsonl);
        assert!(args.parallel);
        assert_eq!(args.texts, vec!["What now?"]);
    }

    #[test]
    fn overrides_replace_configured_values() {
        let args = featurize_args(&[
            "--featurizers",
            "bigrams",
            "--policy",
            "error",
            "--workers",
            "3",
            "--report-collisions",
            "x",
        ]);
        let config = apply_overrides(&TextfeatConfig::default(), &args);
        assert_eq!(config.featurizers.enabled, vec!["bigrams"]);
        assert_eq!(config.combiner.collision_policy, CollisionPolicy::Error);
        assert_eq!(config.combiner.max_workers, 3);
        assert!(config.combiner.report_collisions);
        assert_eq!(config.combiner.run_mode, RunMode::Sequential);
    }

    #[test]
    fn featurize_renders_default_combination() {
        let args = featurize_args(&["--format", "jsonl"]);
        let output = app()
            .featurize(&args, &["Cats sleep.".to_string()])
            .expect("featurize")
            .rendered;

        let value: serde_json::Value =
            serde_json::from_str(output.trim()).expect("one JSON line");
        assert_eq!(value["text"], "Cats sleep.");
        assert_eq!(value["features"]["cats"], 1);
        assert_eq!(value["features"]["sent_length"], 3);
        assert!(value.get("collisions").is_none());
    }

    #[test]
    fn featurize_reports_collisions() {
        let args = featurize_args(&[
            "--featurizers",
            "bow_count,bow_binary",
            "--report-collisions",
            "--format",
            "json",
        ]);
        let output = app()
            .featurize(&args, &["Hi hi".to_string()])
            .expect("featurize")
            .rendered;

        let value: serde_json::Value = serde_json::from_str(&output).expect("JSON");
        assert_eq!(value[0]["features"]["hi"], 1);
        assert_eq!(value[0]["collisions"][0]["key"], "hi");
        assert_eq!(value[0]["collisions"][0]["previous_source"], "bow_count");
    }

    #[test]
    fn failing_text_does_not_hide_the_others() {
        let args = featurize_args(&["--format", "jsonl"]);
        let texts = ["Cats sleep.", "???", "Dogs run."].map(String::from);
        let output = app().featurize(&args, &texts).expect("featurize");
        assert_eq!(output.failed, 1);

        let lines: Vec<serde_json::Value> = output
            .rendered
            .lines()
            .map(|line| serde_json::from_str(line).expect("JSON line"))
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["features"]["cats"], 1);
        assert_eq!(lines[1]["text"], "???");
        assert!(lines[1].get("features").is_none());
        assert!(lines[1]["error"]
            .as_str()
            .is_some_and(|error| error.contains("readability")));
        assert_eq!(lines[2]["features"]["dogs"], 1);
    }

    #[test]
    fn featurize_rejects_unknown_featurizer() {
        let args = featurize_args(&["--featurizers", "length,nonsense"]);
        let err = app()
            .featurize(&args, &["text".to_string()])
            .expect_err("unknown featurizer");
        assert!(err.to_string().contains("Unknown featurizer: nonsense"));
    }

    #[test]
    fn featurize_requires_texts() {
        let args = featurize_args(&[]);
        let err = app().featurize(&args, &[]).expect_err("no texts");
        assert!(matches!(err, CliError::Argument(_)));
    }

    #[test]
    fn text_format_lists_key_values() {
        let args = featurize_args(&["--featurizers", "length", "--format", "text"]);
        let output = app()
            .featurize(&args, &["One two".to_string()])
            .expect("featurize")
            .rendered;
        assert_eq!(output, "One two\n  sent_length = 2\n");
    }

    #[test]
    fn input_file_skips_blank_lines() {
        let path = temp_path("input.txt");
        fs::write(&path, "First text.\n\n   \nSecond text?\n").expect("write input");

        let input = path.to_string_lossy().to_string();
        let args = featurize_args(&["--input", &input, "Inline"]);
        let texts = collect_texts(&args).expect("collect");
        let _ = fs::remove_file(&path);

        assert_eq!(texts, vec!["Inline", "First text.", "Second text?"]);
    }

    #[test]
    fn lists_every_registered_featurizer() {
        let registry = FeaturizerRegistry::new();
        let text = render_featurizers(&registry, OutputFormat::Text).expect("render");
        assert_eq!(text.lines().count(), registry.count());
        assert!(text.starts_with("bow_binary"));

        let json = render_featurizers(&registry, OutputFormat::Json).expect("render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("JSON");
        assert_eq!(value[2]["name"], "length");
    }

    #[test]
    fn init_config_refuses_to_overwrite() {
        let path = temp_path("config.toml");
        let _ = fs::remove_file(&path);

        init_config(&path, false).expect("first write");
        let err = init_config(&path, false).expect_err("existing file");
        assert!(err.to_string().contains("--force"));
        init_config(&path, true).expect("forced write");

        let loaded = TextfeatConfig::load(&path).expect("load");
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, TextfeatConfig::default());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["textfeat", "-c", "/nonexistent/textfeat.toml", "list"])
            .expect("arguments should parse");
        let err = App::from_cli(cli).expect_err("missing config");
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
