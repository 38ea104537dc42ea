//! Affinity CLI: radial affinity analysis of project relationship tables
//!
//! Loads a relationship CSV, then analyzes one center, a batch of centers,
//! or every entity in the table.

use affinity::{
    all_centers, load_records, run_batch, AffinityConfig, AffinityView, AnalysisSettings, Analyzer,
    BatchReport, ConnectionMatrix, MarkdownReport, RelationshipGraph, ThresholdTable, TieBreak, Tier,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "affinity", version, about = "Project affinity analysis")]
struct Cli {
    /// Relationship table (CSV with ProjectKey, ConnectedProject, LinkCount)
    #[arg(long, short, global = true, env = "AFFINITY_INPUT")]
    input: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, global = true, env = "AFFINITY_CONFIG")]
    config: Option<PathBuf>,

    /// Threshold preset, overrides the configuration file
    #[arg(long, global = true)]
    preset: Option<String>,

    /// In-ring ordering, overrides the configuration file
    #[arg(long, global = true)]
    tie_break: Option<TieBreakArg>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum TieBreakArg {
    Insertion,
    Clock,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::Insertion => TieBreak::InsertionOrder,
            TieBreakArg::Clock => TieBreak::Clock,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single center
    Analyze {
        /// Center entity key
        center: String,
    },
    /// Analyze several centers; one status line per center
    Batch {
        /// Center entity keys
        centers: Vec<String>,

        /// Analyze every entity in the table
        #[arg(long)]
        all: bool,
    },
    /// Write the markdown connection tables for every entity
    Report {
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Export the connection matrix of the heaviest entities as CSV
    Matrix {
        /// Number of entities to keep
        #[arg(long)]
        top: Option<usize>,

        /// Entity keys to leave out
        #[arg(long)]
        exclude: Vec<String>,
    },
    /// List threshold presets
    Presets,
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AffinityConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AffinityConfig::default(),
    };
    let settings = settings(&cli, &config)?;

    if let Commands::Presets = cli.command {
        print_presets();
        return Ok(());
    }

    let input = cli
        .input
        .as_deref()
        .context("no input table given (use --input or AFFINITY_INPUT)")?;
    let graph = load_graph(input, &config)?;

    match &cli.command {
        Commands::Analyze { center } => {
            let analyzer = Analyzer::new(&graph, settings);
            let view = analyzer.analyze(center)?;
            print_view(&view, &cli.format)
        }
        Commands::Batch { centers, all } => {
            let centers: Vec<String> = if *all {
                all_centers(&graph).into_iter().map(|k| k.to_string()).collect()
            } else {
                centers.clone()
            };
            anyhow::ensure!(!centers.is_empty(), "no centers given (pass keys or --all)");

            let analyzer = Analyzer::new(&graph, settings);
            let report = run_batch(&analyzer, &centers)?;
            print_batch(&report, &cli.format)
        }
        Commands::Report { output } => {
            let centers = all_centers(&graph);
            let analyzer = Analyzer::new(&graph, settings);
            let batch = run_batch(&analyzer, &centers.iter().map(|k| k.as_str()).collect::<Vec<_>>())?;

            let markdown = MarkdownReport::new(&graph, &analyzer.settings().thresholds)
                .generated_at(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
                .render(&batch);
            match output {
                Some(path) => std::fs::write(path, markdown)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{}", markdown),
            }
            Ok(())
        }
        Commands::Matrix { top, exclude } => {
            let matrix = ConnectionMatrix::build(&graph, *top, exclude)?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matrix)?),
                _ => matrix.write_csv(std::io::stdout().lock())?,
            }
            Ok(())
        }
        Commands::Presets => Ok(()),
    }
}

fn settings(cli: &Cli, config: &AffinityConfig) -> Result<AnalysisSettings> {
    let mut settings = config.settings()?;
    if let Some(preset) = &cli.preset {
        settings.thresholds = ThresholdTable::preset(preset)?;
    }
    if let Some(tie_break) = cli.tie_break {
        settings.tie_break = tie_break.into();
    }
    Ok(settings)
}

fn load_graph(input: &Path, config: &AffinityConfig) -> Result<RelationshipGraph> {
    let records = load_records(input, &config.columns)
        .with_context(|| format!("loading {}", input.display()))?;
    let mut graph = RelationshipGraph::build(records);
    let named = graph.apply_display_names(&config.display_names);
    tracing::debug!(named, configured = config.display_names.len(), "display names applied");
    Ok(graph)
}

fn print_presets() {
    let mut table = Table::new();
    table.set_header(vec!["Preset", "Hub", "High", "Medium", "Low"]);
    for name in ThresholdTable::PRESETS {
        if let Ok(preset) = ThresholdTable::preset(name) {
            let mut row = vec![name.to_string()];
            row.extend(Tier::ALL.iter().map(|&t| preset.describe(t).unwrap_or_else(|| "-".to_string())));
            table.add_row(row);
        }
    }
    println!("{}", table);
}

fn print_view(view: &AffinityView, format: &OutputFormat) -> Result<()> {
    let rows = view.report_rows();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(view)?);
        }
        OutputFormat::Csv => {
            write_view_csv(view, std::io::stdout().lock())?;
        }
        OutputFormat::Table => {
            if view.is_empty() {
                println!("{}: empty neighborhood", view.center);
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Connected", "Network", "Direct", "Total", "Tier", "x", "y"]);
            for row in &rows {
                let (x, y) = view
                    .layout
                    .get(row.key.as_str())
                    .map(|p| (format!("{:.3}", p.x), format!("{:.3}", p.y)))
                    .unwrap_or_default();
                table.add_row(vec![
                    row.key.to_string(),
                    row.network_connections.to_string(),
                    row.direct_links.to_string(),
                    row.total_links.to_string(),
                    row.tier.to_string(),
                    x,
                    y,
                ]);
            }

            let title = view.display_name.as_deref().unwrap_or(view.center.as_str());
            println!("{} - {} neighbors", title, view.neighbors.len());
            println!("{}", table);
            println!("Key:      {}", view.score.sort_key());
            println!("Artifact: {}", view.artifact_name("png"));
        }
    }
    Ok(())
}

fn print_batch(report: &BatchReport, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Csv => {
            write_batch_csv(report, std::io::stdout().lock())?;
        }
        OutputFormat::Table => {
            for line in report.status_lines() {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn write_view_csv<W: Write>(view: &AffinityView, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["connected", "network_connections", "direct_links", "total_links", "tier"])?;
    for row in view.report_rows() {
        writer.write_record([
            row.key.to_string(),
            row.network_connections.to_string(),
            row.direct_links.to_string(),
            row.total_links.to_string(),
            row.tier.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_batch_csv<W: Write>(report: &BatchReport, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["center", "status", "key"])?;
    for (center, outcome) in &report.outcomes {
        let key = outcome.view().map(|v| v.score.sort_key()).unwrap_or_default();
        writer.write_record([center.as_str(), outcome.status(), key.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}
