//! Batch pipeline tests
//!
//! Drives the orchestrator end to end with a fixture catalog and a fake
//! browser that "downloads" a small valid PDF on every navigation.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lopdf::{dictionary, Document, Object};
use serde_json::{json, Value};
use tokio::sync::mpsc;

use sdsacquire::browser::{BrowserLauncher, BrowserSession};
use sdsacquire::catalog::{write_response, CatalogError, CatalogSource};
use sdsacquire::config::Config;
use sdsacquire::services::{BatchEvent, BatchRunner, DownloadOutcome};

const BASE_URL: &str = "https://sds.example.com/SDS_DOCS/";

/// Serialized one-page PDF.
fn pdf_bytes() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

struct FixtureCatalog {
    pages: Vec<(PathBuf, Value)>,
}

#[async_trait]
impl CatalogSource for FixtureCatalog {
    async fn fetch(&self) -> Result<Vec<PathBuf>, CatalogError> {
        let mut written = Vec::new();
        for (path, data) in &self.pages {
            write_response(path, data).await?;
            written.push(path.clone());
        }
        Ok(written)
    }
}

/// Fake browser recording every URL it was asked to open.
#[derive(Clone, Default)]
struct RecordingLauncher {
    launches: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    visited: Arc<Mutex<Vec<String>>>,
}

struct RecordingSession {
    dir: PathBuf,
    closes: Arc<AtomicUsize>,
    visited: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl BrowserSession for RecordingSession {
    async fn navigate(&mut self, url: &str) -> anyhow::Result<()> {
        self.visited.lock().unwrap().push(url.to_string());
        // Browsers save under the server's name, not ours.
        std::fs::write(self.dir.join("download.pdf"), pdf_bytes())?;
        Ok(())
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BrowserLauncher for RecordingLauncher {
    type Session = RecordingSession;

    async fn launch(&self, download_dir: &Path) -> anyhow::Result<RecordingSession> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(RecordingSession {
            dir: download_dir.to_path_buf(),
            closes: self.closes.clone(),
            visited: self.visited.clone(),
        })
    }
}

fn config_in(dir: &Path) -> Config {
    Config {
        base_url: BASE_URL.to_string(),
        response_dir: dir.to_path_buf(),
        output_dir: dir.join("PDFs"),
        pages: 1,
        download_timeout_seconds: 2,
        ..Config::default()
    }
}

fn filesystem_is_case_sensitive(dir: &Path) -> bool {
    let probe = dir.join("CaseProbe");
    std::fs::write(&probe, b"").unwrap();
    let sensitive = !dir.join("caseprobe").exists();
    std::fs::remove_file(probe).unwrap();
    sensitive
}

async fn collect_events(mut rx: mpsc::Receiver<BatchEvent>) -> Vec<BatchEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_end_to_end_case_variant_references() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let catalog = FixtureCatalog {
        pages: vec![(
            config.response_path(1),
            json!({"response": {"items": [
                {"pdfname": "a.pdf"},
                {"pdfname": "A.PDF"},
                {"notpdfname": "x"}
            ]}}),
        )],
    };
    let launcher = RecordingLauncher::default();
    let runner = BatchRunner::new(catalog, launcher.clone(), config.clone());

    let (tx, rx) = mpsc::channel(64);
    let events = tokio::spawn(collect_events(rx));
    let report = runner.run(tx).await.unwrap();
    let events = events.await.unwrap();

    assert_eq!(report.references_found, 2);
    assert_eq!(report.unique, 2);
    assert_eq!(report.attempted, 2);
    assert_eq!(report.downloaded, 1);
    assert_eq!(report.already_existed, 1);
    assert!(report.failures.is_empty());
    assert!(!report.capped);

    // Only the first reference needed a browser.
    assert_eq!(launcher.launches.load(Ordering::SeqCst), 1);
    assert_eq!(launcher.closes.load(Ordering::SeqCst), 1);
    assert_eq!(
        *launcher.visited.lock().unwrap(),
        vec![format!("{}a.pdf", BASE_URL)]
    );

    let target = config.output_dir.join("a.pdf");
    assert!(target.exists());
    assert!(!config.output_dir.join("download.pdf").exists());

    let outcomes: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::ItemFinished { outcome, .. } => Some(outcome.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        outcomes,
        vec![
            DownloadOutcome::Downloaded {
                path: target.clone()
            },
            DownloadOutcome::AlreadyExists { path: target }
        ]
    );

    let sweep = report.sweep.unwrap();
    assert_eq!(sweep.scanned, 1);
    assert_eq!(sweep.removed, 0);
    assert!(sweep.collisions.is_empty());
}

#[tokio::test]
async fn test_stray_uppercase_file_is_reported_as_collision() {
    let dir = tempfile::tempdir().unwrap();
    if !filesystem_is_case_sensitive(dir.path()) {
        return;
    }

    let config = config_in(dir.path());
    std::fs::create_dir_all(&config.output_dir).unwrap();
    let stray = config.output_dir.join("A.PDF");
    std::fs::write(&stray, pdf_bytes()).unwrap();

    let catalog = FixtureCatalog {
        pages: vec![(
            config.response_path(1),
            json!({"response": {"items": [{"pdfname": "a.pdf"}]}}),
        )],
    };
    let runner = BatchRunner::new(catalog, RecordingLauncher::default(), config.clone());

    let (tx, rx) = mpsc::channel(64);
    let drain = tokio::spawn(collect_events(rx));
    let report = runner.run(tx).await.unwrap();
    drain.await.unwrap();

    assert_eq!(report.downloaded, 1);
    let sweep = report.sweep.unwrap();
    assert_eq!(sweep.scanned, 2);
    assert_eq!(sweep.renamed, 0);
    assert_eq!(sweep.collisions, vec![stray.clone()]);
    assert!(stray.exists());
    assert!(config.output_dir.join("a.pdf").exists());
}

#[tokio::test]
async fn test_absolute_references_bypass_base_url() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let catalog = FixtureCatalog {
        pages: vec![(
            config.response_path(1),
            json!({"response": {"items": [
                {"pdfname": "https://cdn.example.org/files/Label%20Sheet.pdf?v=2"},
                {"pdfname": "docs/b.pdf"}
            ]}}),
        )],
    };
    let launcher = RecordingLauncher::default();
    let runner = BatchRunner::new(catalog, launcher.clone(), config.clone()).without_sweep();

    let (tx, rx) = mpsc::channel(64);
    let drain = tokio::spawn(collect_events(rx));
    let report = runner.run(tx).await.unwrap();
    drain.await.unwrap();

    assert_eq!(report.downloaded, 2);
    assert!(report.sweep.is_none());
    assert_eq!(
        *launcher.visited.lock().unwrap(),
        vec![
            "https://cdn.example.org/files/Label%20Sheet.pdf?v=2".to_string(),
            format!("{}docs/b.pdf", BASE_URL),
        ]
    );
    assert!(config.output_dir.join("label20sheet.pdf").exists());
    assert!(config.output_dir.join("b.pdf").exists());
}
