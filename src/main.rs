use anyhow::{Context, Result};
use glob::glob;
use rayon::prelude::*;
use schedscraper::{extract_dump, ExtractConfig, GridDump};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure dirs & load overrides ──────────────────────────
    let mut args = std::env::args().skip(1);
    let grids_dir = PathBuf::from(args.next().unwrap_or_else(|| "grids".into()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "schedules".into()));
    let config_path = PathBuf::from(args.next().unwrap_or_else(|| "config.yaml".into()));

    fs::create_dir_all(&out_dir)?;

    let config = if config_path.is_file() {
        info!(path = %config_path.display(), "loading config");
        ExtractConfig::load(&config_path)?
    } else {
        warn!(path = %config_path.display(), "no config file; using defaults");
        ExtractConfig::default()
    };

    // ─── 3) discover grid dumps ──────────────────────────────────────
    let pattern = format!("{}/*.json", grids_dir.display());
    let dumps: Vec<PathBuf> = glob(&pattern)
        .context("invalid grid dump glob")?
        .filter_map(|e| e.ok())
        .filter(|p| p.is_file())
        .collect();

    if dumps.is_empty() {
        info!("no grid dumps in {}; exit", grids_dir.display());
        return Ok(());
    }
    info!("{} grid dumps to process", dumps.len());

    // ─── 4) process sheets in parallel; failures stay per-sheet ──────
    let results: Vec<bool> = dumps
        .par_iter()
        .map(|path| match process_dump(path, &config, &out_dir) {
            Ok(()) => true,
            Err(e) => {
                error!("{} failed: {:#}", path.display(), e);
                false
            }
        })
        .collect();

    let failed = results.iter().filter(|ok| !**ok).count();
    info!(processed = results.len() - failed, failed, "all done");
    Ok(())
}

fn process_dump(path: &Path, config: &ExtractConfig, out_dir: &Path) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read grid dump `{}`", path.display()))?;
    let dump: GridDump = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse grid dump `{}`", path.display()))?;

    info!(sheet = %dump.sheet_name, "processing");
    let schedule = extract_dump(&dump, config)
        .with_context(|| format!("extraction failed for sheet `{}`", dump.sheet_name))?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sheet");

    // nested JSON
    let json_path = out_dir.join(format!("{}_schedule.json", stem));
    let json_file = File::create(&json_path)
        .with_context(|| format!("failed to create `{}`", json_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(json_file), &schedule)
        .context("writing schedule JSON")?;

    // tabular CSVs: lesson text plus the paired teacher-color table
    let tabular = schedule.to_tabular();
    let lessons_path = out_dir.join(format!("{}_lessons.csv", stem));
    tabular.write_csv(BufWriter::new(File::create(&lessons_path)?))?;
    let teachers_path = out_dir.join(format!("{}_teachers.csv", stem));
    tabular.write_teacher_csv(BufWriter::new(File::create(&teachers_path)?))?;

    info!(
        sheet = %dump.sheet_name,
        slots = schedule.summary.total_time_slots,
        lessons = schedule.summary.total_lessons,
        out = %json_path.display(),
        "wrote outputs"
    );
    Ok(())
}
