// src/scrape.rs
use std::{
    sync::{ mpsc, atomic::{ AtomicUsize, Ordering } },
    thread, time::Duration,
};

use tracing::{ info, warn };
use url::Url;

use crate::{
    config::options::ExtractOptions,
    core::{ html, Fetch },
    data::{ DiscoveredVia, DocumentRecord, UrlCache },
    error::Error,
    progress::Progress,
    specs::documents::{ self, Counts, RedirectTrace },
};

/// One company page to extract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub company_id: String,
    pub url: String,
}

#[derive(Clone, Debug)]
pub struct Extracted {
    pub company_id: String,
    pub final_url: String,
    pub redirect: Option<RedirectTrace>,
    pub records: Vec<DocumentRecord>,
    pub counts: Counts,
}

impl Extracted {
    /// Direct PDF links with hrefs resolved against the page they came from.
    pub fn pdf_links(&self) -> Vec<DocumentRecord> {
        let base = Url::parse(&self.final_url).ok();
        self.records
            .iter()
            .filter(|r| r.discovered_via == DiscoveredVia::DirectPdfLink)
            .map(|r| {
                let url = match base.as_ref().and_then(|b| b.join(&r.url).ok()) {
                    Some(u) => u.into(),
                    None => r.url.clone(),
                };
                DocumentRecord { url, ..r.clone() }
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct TargetFailure {
    pub company_id: String,
    pub url: String,
    pub error: Error,
}

pub type TargetOutcome = Result<Extracted, TargetFailure>;

/// Every target's outcome, in target order. One failure never hides the others.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &Extracted> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &TargetFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn is_partial(&self) -> bool {
        self.failed().next().is_some() && self.succeeded().next().is_some()
    }
}

/// Records that carry a URL, in key order; `only` (if non-empty) restricts to those ids.
pub fn targets_from_cache(cache: &UrlCache, only: &[String]) -> Vec<Target> {
    cache
        .iter()
        .filter(|(id, _)| only.is_empty() || only.contains(id))
        .filter_map(|(id, rec)| {
            let url = rec.url().filter(|u| !u.trim().is_empty())?;
            Some(Target { company_id: id.clone(), url: s!(url) })
        })
        .collect()
}

/// Fetch + extract one page. `Html` is not `Send`, so parsing stays on the worker.
pub fn extract_one(target: &Target, fetcher: &dyn Fetch) -> TargetOutcome {
    let fail = |error| TargetFailure { company_id: target.company_id.clone(), url: target.url.clone(), error };

    let page = fetcher.fetch(&target.url).map_err(fail)?;
    let redirect = documents::trace_redirects(&page.final_url, &page.chain);
    let doc = html::parse(&page.body);
    let records: Vec<DocumentRecord> = documents::extract(&doc, &page.final_url).collect();
    let counts = Counts::of(&records);

    Ok(Extracted {
        company_id: target.company_id.clone(),
        final_url: page.final_url,
        redirect,
        records,
        counts,
    })
}

pub fn extract_batch<F: Fetch>(
    targets: &[Target],
    fetcher: &F,
    opts: &ExtractOptions,
    progress: &mut dyn Progress,
) -> BatchReport {
    progress.begin(targets.len());
    if targets.is_empty() {
        progress.finish();
        return BatchReport::default();
    }

    let counter = AtomicUsize::new(0);
    let (res_tx, res_rx) = mpsc::channel::<(usize, TargetOutcome)>();
    let workers = opts.workers.min(targets.len()).max(1);
    let pause = Duration::from_millis(opts.pause_ms);

    let mut indexed: Vec<(usize, TargetOutcome)> = Vec::with_capacity(targets.len());

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = res_tx.clone();
            let counter = &counter;
            scope.spawn(move || {
                loop {
                    let i = counter.fetch_add(1, Ordering::Relaxed);
                    if i >= targets.len() {
                        break;
                    }
                    let outcome = extract_one(&targets[i], fetcher);
                    if tx.send((i, outcome)).is_err() {
                        break;
                    }
                    if !pause.is_zero() {
                        thread::sleep(pause); // be polite
                    }
                }
            });
        }
        drop(res_tx); // main thread is sole receiver now

        // Aggregate results as they arrive
        for (i, outcome) in res_rx.iter() {
            match &outcome {
                Ok(ex) => {
                    info!(
                        "{}: {} pdf links, {} document sections, {} card sections",
                        ex.company_id, ex.counts.pdf_links, ex.counts.document_sections, ex.counts.card_sections
                    );
                    progress.item_done(&ex.company_id, ex.records.len());
                }
                Err(f) => {
                    warn!("{} ({}): {}", f.company_id, f.url, f.error);
                    progress.item_failed(&f.company_id, &f.error.to_string());
                }
            }
            indexed.push((i, outcome));
        }
    });

    progress.finish();

    // Sort back into target order
    indexed.sort_by_key(|(i, _)| *i);
    BatchReport { outcomes: indexed.into_iter().map(|(_, o)| o).collect() }
}
