// src/config/consts.rs

// Marketplace
pub const BASE_URL: &str = "https://www.mintos.com/en";
pub const PROFILE_SEGMENT: &str = "lending-companies";
pub const LEGACY_PROFILE_SEGMENT: &str = "loan-originators";

// Local data
pub const DEFAULT_DATA_DIR: &str = "data";
pub const MAPPING_FILE: &str = "company_mapping.json";
pub const URL_CACHE_FILE: &str = "company_urls_cache.json";
pub const MANUAL_URLS_FILE: &str = "company_urls_manual.json";
pub const DOCUMENTS_CACHE_FILE: &str = "documents_cache.json";
pub const EXTRACTED_COMPANIES_FILE: &str = "extracted_companies.json";
pub const BACKUP_SUFFIX: &str = "_backup";

// Logging
pub const STORE_DIR: &str = ".store";
pub const DEBUG_LOG_FILE: &str = "debug.log";

// Extraction
pub const UNTITLED_DOCUMENT: &str = "Untitled Document";
pub const PDF_EXT: &str = ".pdf";

// Fetching
pub const HTTP_TIMEOUT_SECS: u64 = 15;
pub const MAX_REDIRECTS: usize = 5;

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
