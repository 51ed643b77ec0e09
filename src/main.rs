//! lookthrough CLI: inspect ownership snapshots from the terminal.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use lookthrough::config::EngineConfig;
use lookthrough::engine::{Engine, OwnershipTable};
use lookthrough::snapshot::Snapshot;

#[derive(Parser)]
#[command(name = "lookthrough", version, about = "Ownership-hierarchy consolidation engine")]
struct Cli {
    /// Snapshot JSON exported by the setup application.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Engine config (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Hierarchy classification id. May be omitted when the snapshot has only one.
    #[arg(long, global = true)]
    classification: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the root companies of a classification.
    Roots,

    /// Ultimate ownership held by one root.
    Ownership {
        /// Root company id.
        #[arg(long)]
        root: String,
    },

    /// Ultimate ownership across all roots of a classification.
    Group,

    /// Suggest a consolidation method for a percentage.
    Suggest {
        /// Ownership percentage (0-100).
        percentage: f64,
    },

    /// Report data-quality issues in the snapshot.
    Validate,

    /// List ownership cycles in a classification.
    Cycles,

    /// Print the effective engine config as TOML.
    Config,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let engine = Engine::new(config)?;

    match &cli.command {
        Commands::Roots => {
            let snapshot = load_snapshot(&cli)?;
            let classification = resolve_classification(&cli, &snapshot)?;
            let roots = engine.identify_roots(&snapshot, &classification)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&roots).into_diagnostic()?);
            } else if roots.is_empty() {
                println!("No roots in classification \"{classification}\".");
            } else {
                println!("Roots of \"{classification}\" ({}):", roots.len());
                for root in &roots {
                    let name = snapshot.company(root.as_str()).map_or("?", |c| c.name.as_str());
                    println!("  {root}  {name}");
                }
            }
        }

        Commands::Ownership { root } => {
            let snapshot = load_snapshot(&cli)?;
            let classification = resolve_classification(&cli, &snapshot)?;
            let table = engine.ownership_table(&snapshot, &classification, Some(root.as_str()))?;
            print_table(&table, cli.json)?;
        }

        Commands::Group => {
            let snapshot = load_snapshot(&cli)?;
            let classification = resolve_classification(&cli, &snapshot)?;
            let table = engine.ownership_table(&snapshot, &classification, None)?;
            print_table(&table, cli.json)?;
        }

        Commands::Suggest { percentage } => {
            let method = engine.suggest_consolidation_method(*percentage);
            if cli.json {
                println!("{}", serde_json::to_string(&method).into_diagnostic()?);
            } else {
                println!("{percentage}% -> {method}");
            }
        }

        Commands::Validate => {
            let snapshot = load_snapshot(&cli)?;
            let report = engine.validate(&snapshot);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
            } else if report.is_clean() {
                println!("Snapshot is clean.");
            } else {
                println!("Issues ({}):", report.len());
                for issue in &report.issues {
                    println!("  {issue}");
                }
            }
        }

        Commands::Cycles => {
            let snapshot = load_snapshot(&cli)?;
            let classification = resolve_classification(&cli, &snapshot)?;
            let cycles = engine.cycles(&snapshot, &classification)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&cycles).into_diagnostic()?);
            } else if cycles.is_empty() {
                println!("No ownership cycles in \"{classification}\".");
            } else {
                println!("Ownership cycles ({}):", cycles.len());
                for cycle in &cycles {
                    let ids: Vec<&str> = cycle.members.iter().map(|m| m.as_str()).collect();
                    println!("  {}", ids.join(", "));
                }
            }
        }

        Commands::Config => {
            print!("{}", engine.config().to_toml()?);
        }
    }

    Ok(())
}

fn load_snapshot(cli: &Cli) -> Result<Snapshot> {
    let Some(path) = &cli.snapshot else {
        miette::bail!("this command needs --snapshot <FILE>");
    };
    Ok(Snapshot::load(path)?)
}

/// The `--classification` flag, or the snapshot's only classification.
fn resolve_classification(cli: &Cli, snapshot: &Snapshot) -> Result<String> {
    if let Some(id) = &cli.classification {
        return Ok(id.clone());
    }
    match snapshot.classifications.as_slice() {
        [only] => Ok(only.id.to_string()),
        [] => miette::bail!("snapshot defines no classifications; pass --classification"),
        many => {
            let ids: Vec<&str> = many.iter().map(|c| c.id.as_str()).collect();
            miette::bail!("pass --classification, one of: {}", ids.join(", "))
        }
    }
}

fn print_table(table: &OwnershipTable, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(table).into_diagnostic()?);
        return Ok(());
    }

    let roots: Vec<&str> = table.propagation.roots.iter().map(|r| r.as_str()).collect();
    println!(
        "Ownership in \"{}\" from {}:",
        table.classification_id,
        if roots.is_empty() { "(no roots)".to_string() } else { roots.join(", ") }
    );
    for row in &table.rows {
        let recorded = row
            .recorded_method
            .map(|m| format!("  (recorded {m})"))
            .unwrap_or_default();
        println!(
            "  {:<12} {:<32} {:>3} {:>9.4}%  {}{recorded}",
            row.company_id, row.company_name, row.country, row.ownership_pct, row.suggested_method
        );
    }
    println!("{}", table.summary);

    if !table.propagation.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &table.propagation.warnings {
            println!("  {warning}");
        }
    }
    Ok(())
}
