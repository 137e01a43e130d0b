use anyhow::{bail, Context};
use colored::Colorize;
use rsm_engine::{
    BatchReport, Compiler, Orchestrator, RsmConfig, SourceOutcome, TargetOutcome, TargetPlan,
    TargetReport,
};
use rsm_store::FsRulesetStore;
use rsm_types::{Entry, KeyShape};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(ref args) => cmd_merge(&cli, args),
        Command::Compile(ref args) => cmd_compile(&cli, args),
        Command::Sources(ref args) => cmd_sources(&cli, args),
        Command::Key(ref args) => cmd_key(&cli, args),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<RsmConfig> {
    RsmConfig::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))
}

/// Keep the plans whose target name is in `names`. An empty filter keeps all.
fn select_plans(config: &RsmConfig, names: &[String]) -> anyhow::Result<Vec<TargetPlan>> {
    let plans = config.plans()?;
    if names.is_empty() {
        return Ok(plans);
    }
    for name in names {
        if !plans.iter().any(|p| p.target.name() == name) {
            bail!("unknown target {name}");
        }
    }
    Ok(plans
        .into_iter()
        .filter(|p| names.iter().any(|n| n == p.target.name()))
        .collect())
}

// ---- merge ----

fn cmd_merge(cli: &Cli, args: &MergeArgs) -> anyhow::Result<()> {
    let mut config = load_config(cli)?;
    if let Some(workers) = args.workers {
        config.workers = workers.max(1);
    }
    let plans = select_plans(&config, &args.targets)?;
    let orchestrator = Orchestrator::from_config(&config)?;
    let batch = orchestrator.run_batch(&plans);

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batch)?),
        OutputFormat::Text => print_batch(&batch),
    }

    if batch.has_failures() {
        bail!("{} of {} targets failed", batch.failed(), batch.targets.len());
    }
    Ok(())
}

fn print_batch(batch: &BatchReport) {
    for report in &batch.targets {
        print_target(report);
    }
    println!(
        "\n{} targets: {} completed, {}",
        batch.targets.len(),
        batch.completed().to_string().green(),
        if batch.has_failures() {
            format!("{} failed", batch.failed()).red()
        } else {
            "0 failed".normal()
        }
    );
}

fn print_target(report: &TargetReport) {
    println!("{}", report.target.to_string().bold());
    for source in &report.sources {
        match &source.outcome {
            SourceOutcome::Merged {
                seen,
                added,
                used_fallback,
            } => {
                let note = if *used_fallback {
                    " (latin-1)".yellow().to_string()
                } else {
                    String::new()
                };
                println!(
                    "  {} {}  seen {}, added {}{}",
                    "✓".green(),
                    source.url,
                    seen,
                    added.to_string().cyan(),
                    note
                );
            }
            SourceOutcome::Failed { stage, message } => {
                println!(
                    "  {} {}  {} failed: {}",
                    "✗".red(),
                    source.url,
                    stage,
                    message.dimmed()
                );
            }
        }
    }
    match &report.outcome {
        TargetOutcome::Written(summary) => {
            let state = if summary.save.changed {
                "written".green()
            } else {
                "unchanged".dimmed()
            };
            println!(
                "  {} sources {}/{} ok, seen {}, added {}, total {} → {} ({})",
                "=".bold(),
                report.succeeded(),
                report.attempted(),
                report.seen(),
                report.added(),
                summary.total.to_string().bold(),
                summary.save.location,
                state,
            );
        }
        TargetOutcome::Failed { error } => println!("  {} {}", "✗ failed:".red().bold(), error),
    }
}

// ---- compile ----

fn cmd_compile(cli: &Cli, args: &CompileArgs) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let plans = select_plans(&config, &args.targets)?;
    let store = FsRulesetStore::new(&config.json_dir, &config.yaml_dir);

    let mut results = Vec::new();
    let mut failed = 0usize;
    for plan in &plans {
        let format = plan.target.format();
        let Some(settings) = config.compiler.for_format(format) else {
            tracing::info!(target = %plan.target, "no compiler configured for {format}, skipping");
            continue;
        };
        let compiler = Compiler::from_settings(format, settings);
        let input = store.path_for(&plan.target);
        match compiler.compile(&input) {
            Ok(outcome) => {
                if let OutputFormat::Text = cli.format {
                    println!("{} {} → {}", "✓".green(), plan.target, outcome.output.display());
                    if !outcome.stdout.is_empty() {
                        println!("{}", outcome.stdout.dimmed());
                    }
                }
                results.push(serde_json::json!({
                    "target": plan.target.to_string(),
                    "output": outcome.output.display().to_string(),
                    "ok": true,
                }));
            }
            Err(e) => {
                failed += 1;
                tracing::error!(target = %plan.target, error = %e, "compile failed");
                if let OutputFormat::Text = cli.format {
                    println!("{} {}: {}", "✗".red(), plan.target, e);
                }
                results.push(serde_json::json!({
                    "target": plan.target.to_string(),
                    "error": e.to_string(),
                    "ok": false,
                }));
            }
        }
    }

    if let OutputFormat::Json = cli.format {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    if failed > 0 {
        bail!("{failed} of {} documents failed to compile", results.len());
    }
    Ok(())
}

// ---- sources / key ----

fn cmd_sources(cli: &Cli, args: &SourcesArgs) -> anyhow::Result<()> {
    let urls = rsm_engine::read_source_list(&args.file)?;
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&urls)?),
        OutputFormat::Text => {
            for url in &urls {
                println!("{url}");
            }
        }
    }
    Ok(())
}

fn cmd_key(cli: &Cli, args: &KeyArgs) -> anyhow::Result<()> {
    let value = rsm_codec::json::parse_value(&args.entry, "<argument>")?;
    let key = Entry::from_value(value).key();
    let shape = match key.shape() {
        KeyShape::Text => "text",
        KeyShape::Structured => "structured",
    };
    match cli.format {
        OutputFormat::Json => {
            let json = serde_json::json!({ "shape": shape, "key": key.into_string() });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => println!("{} {}", shape.dimmed(), key),
    }
    Ok(())
}
