// src/cli.rs
use std::{ env, fs, path::{ Path, PathBuf } };

use color_eyre::eyre::{ bail, eyre, Result, WrapErr };
use tracing::{ info, warn, Level };

use crate::{
    config::options::{ AppOptions, DataPaths },
    core::HttpFetcher,
    log, merge, migrate,
    progress::Progress,
    scrape, specs, store,
    data::UrlCache,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    FixUrls,
    MigrateDocs,
    Extract,
    Companies(PathBuf),
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    pub command: Command,
    pub opts: AppOptions,
    pub log_level: Level,
    pub log_file: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    let params = parse_args(env::args().skip(1))?;
    log::init(params.log_level, params.log_file.as_deref())?;
    execute(&params)
}

pub fn execute(params: &Params) -> Result<()> {
    let opts = &params.opts;
    match &params.command {
        Command::Help => {
            eprintln!(include_str!("cli_help.txt"));
            Ok(())
        }
        Command::FixUrls => fix_urls(opts, &[]),
        Command::MigrateDocs => migrate_docs(&opts.paths),
        Command::Extract => extract(opts),
        Command::Companies(file) => companies(opts, file),
    }
}

fn fix_urls(opts: &AppOptions, extra: &[&UrlCache]) -> Result<()> {
    let out = merge::fix_urls(&opts.paths, &opts.extract, extra);
    let path = out.persisted.wrap_err("Merged URL cache was not saved")?;
    println!(
        "{} companies ({} synthesized from mapping) -> {}",
        out.merged.cache.len(),
        out.merged.synthesized,
        path.display()
    );
    Ok(())
}

fn migrate_docs(paths: &DataPaths) -> Result<()> {
    let mapping = store::load_mapping(&paths.mapping());
    let report = migrate::migrate_documents(&paths.documents(), &mapping.value)
        .wrap_err("Document cache migration failed")?;

    if let Some(backup) = &report.backup {
        println!("Backup: {}", backup.display());
    }
    match report.shape {
        migrate::Shape::Missing => println!("No document cache at {}; nothing to do", paths.documents().display()),
        migrate::Shape::Current => println!("Already keyed by company ({} companies)", report.companies),
        migrate::Shape::Unrecognized => println!("Unrecognized content; left as is"),
        migrate::Shape::Legacy => {
            println!(
                "Converted: {} companies, {} resolved, {} synthesized, {} dropped",
                report.companies,
                report.tally.resolved,
                report.tally.synthesized,
                report.tally.dropped.len()
            );
        }
    }
    if let Some(persisted) = report.persisted {
        persisted.wrap_err("Converted cache was not saved")?;
    }
    Ok(())
}

fn extract(opts: &AppOptions) -> Result<()> {
    let paths = &opts.paths;
    let cache = store::load_or_default::<UrlCache>(&paths.url_cache()).value;
    let targets = scrape::targets_from_cache(&cache, &opts.extract.only);
    if targets.is_empty() {
        bail!("No companies with a URL in {}; run fix-urls first", paths.url_cache().display());
    }

    let mut docs = migrate::load_current(&paths.documents())?;
    let report = scrape::extract_batch(&targets, &HttpFetcher::default(), &opts.extract, &mut CliProgress::default());

    let mut added = 0;
    for ex in report.succeeded() {
        let fresh = merge::append_documents(&mut docs, &ex.company_id, ex.pdf_links());
        if !fresh.is_empty() {
            info!("{}: {} new documents", ex.company_id, fresh.len());
        }
        added += fresh.len();
    }

    store::write_json(&paths.documents(), &docs)?;

    let failed: Vec<&str> = report.failed().map(|f| f.company_id.as_str()).collect();
    println!(
        "{} of {} pages extracted, {} new documents",
        targets.len() - failed.len(),
        targets.len(),
        added
    );
    if !failed.is_empty() {
        warn!("Failed: {}", failed.join(", "));
        println!("Failed: {}", failed.join(", "));
    }
    Ok(())
}

fn companies(opts: &AppOptions, file: &Path) -> Result<()> {
    let html = fs::read_to_string(file).wrap_err_with(|| format!("Reading {}", file.display()))?;
    let extracted = specs::companies::extract(&html, &opts.extract.base_url);
    if extracted.is_empty() {
        warn!("No companies found in {}", file.display());
    } else {
        store::write_json(&opts.paths.extracted_companies(), &extracted)?;
    }
    fix_urls(opts, &[&extracted])
}

/// Prints one line per finished target to stderr.
#[derive(Default)]
struct CliProgress {
    total: usize,
    seen: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Extracting {total} company pages…");
    }
    fn item_done(&mut self, company_id: &str, records: usize) {
        self.seen += 1;
        eprintln!("[{}/{}] {company_id}: {records} records", self.seen, self.total);
    }
    fn item_failed(&mut self, company_id: &str, reason: &str) {
        self.seen += 1;
        eprintln!("[{}/{}] {company_id}: FAILED ({reason})", self.seen, self.total);
    }
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Params> {
    let mut opts = AppOptions::default();
    let mut command: Option<Command> = None;
    let mut log_level = Level::INFO;
    let mut log_file = None;

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "-d" | "--data-dir" => {
                let v = args.next().ok_or_else(|| eyre!("Missing value for --data-dir"))?;
                opts.paths = DataPaths::in_dir(v);
            }
            "--base-url" => opts.extract.base_url = args.next().ok_or_else(|| eyre!("Missing value for --base-url"))?,
            "-w" | "--workers" => {
                let v: usize = args.next().ok_or_else(|| eyre!("Missing value for --workers"))?.parse()?;
                if v == 0 { bail!("--workers must be at least 1"); }
                opts.extract.workers = v;
            }
            "--pause-ms" => {
                opts.extract.pause_ms = args.next().ok_or_else(|| eyre!("Missing value for --pause-ms"))?.parse()?;
            }
            "-c" | "--company" => {
                let v = args.next().ok_or_else(|| eyre!("Missing company id"))?;
                opts.extract.only.extend(v.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from));
            }
            "--log-file" => log_file = Some(PathBuf::from(args.next().ok_or_else(|| eyre!("Missing log path"))?)),
            "--debug-log" => log_file = Some(log::default_log_file()),
            "-v" | "--verbose" => log_level = Level::DEBUG,
            "-h" | "--help" | "help" => command = Some(Command::Help),
            "fix-urls" => command = Some(Command::FixUrls),
            "migrate-docs" => command = Some(Command::MigrateDocs),
            "extract" => command = Some(Command::Extract),
            "companies" => {
                let v = args.next().ok_or_else(|| eyre!("companies needs an HTML file"))?;
                command = Some(Command::Companies(PathBuf::from(v)));
            }
            _ => bail!("Unknown arg: {a}"),
        }
    }

    Ok(Params {
        command: command.unwrap_or(Command::Help),
        opts,
        log_level,
        log_file,
    })
}
