//! In-memory CSV service answering the mock server's endpoints.
//!
//! Each endpoint is mounted with a [`ServiceRoute`] that shares one store,
//! so uploads, review updates, and filtered loads observe each other.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;
use torchmap::api::models::{CsvFile, CsvRow, FileId, ReviewStatusUpdate, RowId};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Statuses assigned to seeded rows, in rotation.
const SEEDED_STATUSES: [&str; 2] = ["Active", "Closed"];

struct StoredFile {
    summary: CsvFile,
    rows: Vec<CsvRow>,
}

#[derive(Default)]
struct Store {
    files: Vec<StoredFile>,
}

/// Shared handle to the fake service's data.
#[derive(Clone, Default)]
pub(crate) struct FakeCsvService {
    store: Arc<Mutex<Store>>,
}

impl FakeCsvService {
    /// Adds a file with `count` pending rows `r-1..=r-count` whose statuses
    /// alternate between Active and Closed.
    pub(crate) fn seed_file(&self, id: &str, filename: &str, count: usize) {
        let rows = (1..=count)
            .zip(SEEDED_STATUSES.iter().cycle())
            .map(|(index, status)| CsvRow {
                id: RowId::new(format!("r-{index}")),
                row_data: BTreeMap::from([
                    ("Site".to_owned(), format!("site-{index}")),
                    ("Status".to_owned(), (*status).to_owned()),
                ]),
                is_reviewed: false,
            })
            .collect();
        self.insert(id, filename, vec!["Site".to_owned(), "Status".to_owned()], rows);
    }

    /// Mounts every endpoint under `/api` on `server`.
    pub(crate) async fn mount(&self, server: &MockServer) {
        let routes = [
            ("GET", Matcher::Exact("/api/csv-files"), Route::ListFiles),
            ("POST", Matcher::Exact("/api/upload-csv"), Route::Upload),
            ("GET", Matcher::Regex(r"^/api/csv-data/[^/]+$"), Route::LoadDataset),
            ("GET", Matcher::Regex(r"^/api/csv-columns/[^/]+$"), Route::Columns),
            ("POST", Matcher::Exact("/api/update-review-status"), Route::UpdateReview),
            ("GET", Matcher::Regex(r"^/api/export-reviewed/[^/]+$"), Route::Export),
        ];
        for (verb, matcher, route) in routes {
            let responder = ServiceRoute {
                service: self.clone(),
                route,
            };
            let mock = match matcher {
                Matcher::Exact(exact) => Mock::given(method(verb)).and(path(exact)),
                Matcher::Regex(pattern) => Mock::given(method(verb)).and(path_regex(pattern)),
            };
            mock.respond_with(responder).mount(server).await;
        }
    }

    /// Review flags currently stored for `file_id`, keyed by row id.
    pub(crate) fn review_flags(&self, file_id: &str) -> BTreeMap<String, bool> {
        self.lock()
            .files
            .iter()
            .find(|file| file.summary.id.as_str() == file_id)
            .map(|file| {
                file.rows
                    .iter()
                    .map(|row| (row.id.as_str().to_owned(), row.is_reviewed))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn insert(&self, id: &str, filename: &str, headers: Vec<String>, rows: Vec<CsvRow>) {
        let summary = CsvFile {
            id: FileId::new(id),
            filename: filename.to_owned(),
            headers,
            row_count: u64::try_from(rows.len()).unwrap_or(u64::MAX),
        };
        self.lock().files.push(StoredFile { summary, rows });
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

enum Matcher {
    Exact(&'static str),
    Regex(&'static str),
}

#[derive(Clone, Copy)]
enum Route {
    ListFiles,
    Upload,
    LoadDataset,
    Columns,
    UpdateReview,
    Export,
}

struct ServiceRoute {
    service: FakeCsvService,
    route: Route,
}

impl Respond for ServiceRoute {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match self.route {
            Route::ListFiles => {
                let store = self.service.lock();
                let files: Vec<&CsvFile> = store.files.iter().map(|file| &file.summary).collect();
                ResponseTemplate::new(200).set_body_json(files)
            }
            Route::Upload => self.upload(request),
            Route::LoadDataset => self.load(request),
            Route::Columns => self.columns(request),
            Route::UpdateReview => self.update(request),
            Route::Export => self.export(request),
        }
    }
}

impl ServiceRoute {
    fn upload(&self, request: &Request) -> ResponseTemplate {
        let Some((filename, contents)) = multipart_file(&request.body) else {
            return ResponseTemplate::new(400).set_body_json(json!({"detail": "no file part"}));
        };
        let mut lines = contents.lines().filter(|line| !line.trim().is_empty());
        let headers: Vec<String> = lines
            .next()
            .map(|line| line.split(',').map(|cell| cell.trim().to_owned()).collect())
            .unwrap_or_default();
        let rows: Vec<CsvRow> = lines
            .enumerate()
            .map(|(index, line)| CsvRow {
                id: RowId::new(format!("r-{}", index.saturating_add(1))),
                row_data: headers
                    .iter()
                    .cloned()
                    .zip(line.split(',').map(|cell| cell.trim().to_owned()))
                    .collect(),
                is_reviewed: false,
            })
            .collect();
        let row_count = rows.len();

        let id = format!("f-{}", self.service.lock().files.len().saturating_add(1));
        self.service.insert(&id, &filename, headers, rows);
        ResponseTemplate::new(200).set_body_json(json!({ "row_count": row_count }))
    }

    fn load(&self, request: &Request) -> ResponseTemplate {
        let file_id = last_segment(request);
        let pairs: BTreeMap<String, String> = request.url.query_pairs().into_owned().collect();
        let reviewed_only = pairs.get("reviewed_only").map(|flag| flag == "true");
        let search = pairs.get("search_term").map(|term| term.to_lowercase());
        let column_filters: BTreeMap<String, String> = pairs
            .get("column_filters")
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();

        let store = self.service.lock();
        let Some(file) = store.files.iter().find(|file| file.summary.id.as_str() == file_id)
        else {
            return not_found();
        };
        let rows: Vec<&CsvRow> = file
            .rows
            .iter()
            .filter(|row| reviewed_only.is_none_or(|flag| row.is_reviewed == flag))
            .filter(|row| {
                search.as_deref().is_none_or(|term| {
                    row.row_data
                        .values()
                        .any(|value| value.to_lowercase().contains(term))
                })
            })
            .filter(|row| {
                column_filters
                    .iter()
                    .all(|(header, value)| row.cell(header) == Some(value.as_str()))
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({
            "csv_file": file.summary,
            "rows": rows,
        }))
    }

    fn columns(&self, request: &Request) -> ResponseTemplate {
        let file_id = last_segment(request);
        let store = self.service.lock();
        let Some(file) = store.files.iter().find(|file| file.summary.id.as_str() == file_id)
        else {
            return not_found();
        };
        let catalog: BTreeMap<&str, Vec<&str>> = file
            .summary
            .headers
            .iter()
            .map(|header| {
                let values: BTreeSet<&str> =
                    file.rows.iter().filter_map(|row| row.cell(header)).collect();
                (header.as_str(), values.into_iter().collect())
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(catalog)
    }

    fn update(&self, request: &Request) -> ResponseTemplate {
        let Ok(update) = serde_json::from_slice::<ReviewStatusUpdate>(&request.body) else {
            return ResponseTemplate::new(422).set_body_json(json!({"detail": "invalid body"}));
        };
        let mut store = self.service.lock();
        let mut updated = 0_usize;
        for row in store.files.iter_mut().flat_map(|file| file.rows.iter_mut()) {
            if update.row_ids.contains(&row.id) {
                row.is_reviewed = update.is_reviewed;
                updated = updated.saturating_add(1);
            }
        }
        ResponseTemplate::new(200).set_body_json(json!({ "updated": updated }))
    }

    fn export(&self, request: &Request) -> ResponseTemplate {
        let file_id = last_segment(request);
        let store = self.service.lock();
        let Some(file) = store.files.iter().find(|file| file.summary.id.as_str() == file_id)
        else {
            return not_found();
        };
        let mut csv = file.summary.headers.join(",");
        csv.push('\n');
        for row in file.rows.iter().filter(|row| row.is_reviewed) {
            let cells: Vec<&str> = file
                .summary
                .headers
                .iter()
                .map(|header| row.cell(header).unwrap_or_default())
                .collect();
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }
        ResponseTemplate::new(200).set_body_raw(csv.into_bytes(), "text/csv")
    }
}

fn last_segment(request: &Request) -> String {
    request
        .url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_owned()
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({"detail": "CSV file not found"}))
}

/// Extracts the file name and text of the first file part of a multipart
/// body.
fn multipart_file(body: &[u8]) -> Option<(String, String)> {
    let text = String::from_utf8_lossy(body);
    let boundary = text.lines().next()?.trim().to_owned();
    let (_, after_name) = text.split_once("filename=\"")?;
    let (filename, after_headers) = after_name.split_once('"')?;
    let (_, contents) = after_headers.split_once("\r\n\r\n")?;
    let (file_text, _) = contents.split_once(&format!("\r\n{boundary}"))?;
    Some((filename.to_owned(), file_text.to_owned()))
}
