//! atfcrush - load, reshape, and merge ATF electrophysiology exports

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use indexmap::IndexMap;

use atfcrush::config::{Config, CrushPolicy, OutputFormat};
use atfcrush::corpus::{Corpus, GroupPredicate};
use atfcrush::model::{Table, Value};
use atfcrush::output::render_to_stdout;
use atfcrush::parser::read_data_rows;
use atfcrush::reshape::ReshapeView;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCrushPolicy {
    All,
    First,
}

impl From<CliCrushPolicy> for CrushPolicy {
    fn from(p: CliCrushPolicy) -> Self {
        match p {
            CliCrushPolicy::All => CrushPolicy::AllMatches,
            CliCrushPolicy::First => CrushPolicy::FirstMatch,
        }
    }
}

/// Load, reshape, and merge ATF electrophysiology exports
#[derive(Parser, Debug)]
#[command(name = "atfcrush")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Folder containing ATF exports
    folder: PathBuf,

    /// Filename suffix to load
    #[arg(long, default_value = ".atf")]
    ext: String,

    /// Number of metadata lines before the header
    #[arg(long, default_value_t = 2)]
    meta_lines: usize,

    /// Reshape by raw token position instead of header names,
    /// e.g. "start_time=4,end_time=5,peak_amp=7"
    #[arg(long, value_delimiter = ',')]
    reshape: Vec<String>,

    /// Derive the inter-event interval (needs start_time and end_time
    /// reshape fields)
    #[arg(long, requires = "reshape")]
    iei: bool,

    /// Keep only these columns (comma-separated)
    #[arg(long, value_delimiter = ',')]
    squeeze: Vec<String>,

    /// Crush group as label=substring, matched against file names (repeatable)
    #[arg(long)]
    group: Vec<String>,

    /// How a file matching several groups is assigned
    #[arg(long, value_enum, default_value = "all")]
    crush_policy: CliCrushPolicy,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Maximum rows to print per dataset (terminal format)
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if !cli.reshape.is_empty() {
        return run_reshape(&cli);
    }
    run_corpus(&cli)
}

/// Full pipeline: load every file into a corpus, project, crush, render.
fn run_corpus(cli: &Cli) -> Result<()> {
    let config = Config::default()
        .with_extension(cli.ext.clone())
        .with_metadata_lines(cli.meta_lines)
        .with_crush_policy(cli.crush_policy.into());

    let mut corpus = Corpus::new(config);
    let report = corpus
        .load_dir(&cli.folder)
        .with_context(|| format!("Failed to load {}", cli.folder.display()))?;

    if report.loaded == 0 {
        bail!("no *{} files loaded from {}", cli.ext, cli.folder.display());
    }
    for (path, err) in &report.skipped {
        eprintln!("Warning: skipped {}: {}", path.display(), err);
    }

    if !cli.squeeze.is_empty() {
        let keep: Vec<&str> = cli.squeeze.iter().map(String::as_str).collect();
        corpus.squeeze_all(&keep);
    }

    if !cli.group.is_empty() {
        let groups = parse_groups(&cli.group)?;
        corpus.crush(&groups).context("Crush failed")?;
    }

    for table in &corpus.datasets {
        let columns: Vec<(&str, &[Value])> = table.iter().collect();
        render_to_stdout(table.name(), &columns, cli.format.into(), cli.limit)?;
    }
    Ok(())
}

/// Narrow pipeline: positional reshape per file, optional derived iei column.
fn run_reshape(cli: &Cli) -> Result<()> {
    let mapping = parse_mapping(&cli.reshape)?;

    let mut paths: Vec<PathBuf> = std::fs::read_dir(&cli.folder)
        .with_context(|| format!("Failed to list {}", cli.folder.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&cli.ext))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!("no *{} files found in {}", cli.ext, cli.folder.display());
    }

    for path in &paths {
        let rows = read_data_rows(path, cli.meta_lines)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut view = ReshapeView::from_rows(&rows, &mapping);

        if cli.iei {
            let iei = inter_event_intervals(&view)?;
            view.add_field("iei", iei);
        }

        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let columns: Vec<(&str, &[Value])> = view.iter().collect();
        render_to_stdout(&title, &columns, cli.format.into(), cli.limit)?;
    }
    Ok(())
}

/// Time from one event's start back to the previous event's end; zero for the
/// first event, missing where either side fails to parse as a number.
fn inter_event_intervals(view: &ReshapeView) -> Result<Vec<Value>> {
    let start = view.get("start_time").context("--iei needs a start_time reshape field")?;
    let end = view.get("end_time").context("--iei needs an end_time reshape field")?;

    let mut iei = Vec::with_capacity(start.len());
    for ix in 0..start.len() {
        if ix == 0 {
            iei.push(Value::Float(0.0));
            continue;
        }
        match (start[ix].as_f64(), end[ix - 1].as_f64()) {
            (Some(s), Some(e)) => iei.push(Value::Float(s - e)),
            _ => iei.push(Value::Missing),
        }
    }
    Ok(iei)
}

/// Parse `name=index` pairs into an alias -> position map.
fn parse_mapping(pairs: &[String]) -> Result<IndexMap<String, usize>> {
    let mut mapping = IndexMap::new();
    for pair in pairs {
        let (name, index) = pair
            .split_once('=')
            .with_context(|| format!("Invalid reshape field '{}', expected name=index", pair))?;
        let index: usize = index
            .trim()
            .parse()
            .with_context(|| format!("Invalid reshape index in '{}'", pair))?;
        mapping.insert(name.trim().to_string(), index);
    }
    Ok(mapping)
}

/// Parse `label=substring` pairs into filename-contains crush groups.
fn parse_groups(pairs: &[String]) -> Result<IndexMap<String, GroupPredicate>> {
    let mut groups: IndexMap<String, GroupPredicate> = IndexMap::new();
    for pair in pairs {
        let (label, needle) = pair
            .split_once('=')
            .with_context(|| format!("Invalid group '{}', expected label=substring", pair))?;
        let needle = needle.to_string();
        groups.insert(
            label.to_string(),
            Box::new(move |t: &Table| t.name().contains(&needle)),
        );
    }
    Ok(groups)
}
