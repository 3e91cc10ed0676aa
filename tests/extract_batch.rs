// tests/extract_batch.rs
use std::fs;

use url::Url;

use lender_cache::config::options::ExtractOptions;
use lender_cache::core::HttpFetcher;
use lender_cache::data::{ CompanyRecord, DiscoveredVia, DocumentCache, UrlCache };
use lender_cache::merge;
use lender_cache::progress::NullProgress;
use lender_cache::scrape::{ self, Target };

const ACME_PAGE: &str = r#"
<html><body>
  <div class="loan-originator-info__documents">
    <a href="files/financials-2023.pdf"> Financial statements 2023 </a>
    <a href="files/financials-2023.pdf">Duplicate link</a>
    <a href="https://cdn.test/acme/Presentation.PDF"></a>
  </div>
  <div class="card">Rating card</div>
</body></html>
"#;

fn opts() -> ExtractOptions {
    ExtractOptions { pause_ms: 0, workers: 3, ..ExtractOptions::default() }
}

#[test]
fn saved_pages_are_extracted_and_appended_once() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("acme.html");
    fs::write(&page, ACME_PAGE).unwrap();
    let page_url = Url::from_file_path(&page).unwrap();

    let mut cache = UrlCache::new();
    cache.insert("acme".into(), CompanyRecord::new("Acme Capital", page_url.as_str()));
    cache.insert("ghost".into(), CompanyRecord::new("Ghost", "file:///does/not/exist.html"));
    cache.insert("remote".into(), CompanyRecord::new("Remote", "https://www.mintos.com/en/lending-companies/remote"));

    let targets = scrape::targets_from_cache(&cache, &[]);
    let report = scrape::extract_batch(&targets, &HttpFetcher::default(), &opts(), &mut NullProgress);

    let ids: Vec<&str> = report
        .outcomes
        .iter()
        .map(|o| match o {
            Ok(ex) => ex.company_id.as_str(),
            Err(f) => f.company_id.as_str(),
        })
        .collect();
    assert_eq!(ids, vec!["acme", "ghost", "remote"]);
    assert_eq!(report.failed().count(), 2);

    let acme = report.succeeded().next().unwrap();
    assert_eq!(acme.counts.pdf_links, 3);
    assert_eq!(acme.counts.document_sections, 1);
    assert_eq!(acme.counts.card_sections, 1);
    assert!(acme.redirect.is_none());

    let links = acme.pdf_links();
    assert_eq!(links[0].title, "Financial statements 2023");
    assert_eq!(links[0].url, page_url.join("files/financials-2023.pdf").unwrap().as_str());
    assert_eq!(links[2].title, "Untitled Document");
    assert!(links.iter().all(|l| l.discovered_via == DiscoveredVia::DirectPdfLink));

    let mut docs = DocumentCache::new();
    assert_eq!(merge::append_documents(&mut docs, "acme", links.clone()).len(), 2);
    assert!(merge::append_documents(&mut docs, "acme", links).is_empty());
    assert_eq!(docs["acme"][0]["company_id"], "acme");
}

#[test]
fn filter_limits_targets() {
    let mut cache = UrlCache::new();
    cache.insert("acme".into(), CompanyRecord::new("Acme", "https://x.test/acme"));
    cache.insert("beta".into(), CompanyRecord::new("Beta", "https://x.test/beta"));

    let targets = scrape::targets_from_cache(&cache, &["beta".to_string()]);
    assert_eq!(targets, vec![Target { company_id: "beta".into(), url: "https://x.test/beta".into() }]);
}
