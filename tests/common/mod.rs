#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use dou_watcher::application::services::{DateProcessor, ResultReporter};
use dou_watcher::domain::entities::{EditionReference, FetchedArtifact, ProcessingResult};
use dou_watcher::error::{FetchError, NotifyError};
use dou_watcher::infrastructure::fetcher::{DocumentFetcher, store_validated};
use dou_watcher::infrastructure::locator::DocumentLocator;
use dou_watcher::infrastructure::notifier::Notifier;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builds a PDF with one text line per `BT`/`ET` block, one inner slice per page.
pub fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let y = 780 - (i as i64) * 20;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![50.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Always resolves to the same edition URL.
pub struct StaticLocator;

#[async_trait]
impl DocumentLocator for StaticLocator {
    async fn locate(&self, _date: NaiveDate) -> Option<EditionReference> {
        Some(EditionReference::new(
            Url::parse("https://pesquisa.in.gov.br/imprensa/servlet/INPDFViewer?data=04/11/2024")
                .unwrap(),
        ))
    }
}

/// Serves fixed bytes as the downloaded document, through the same
/// write-then-validate path as the HTTP fetcher.
pub struct BytesFetcher {
    pub work_dir: PathBuf,
    pub body: Vec<u8>,
}

#[async_trait]
impl DocumentFetcher for BytesFetcher {
    async fn fetch(
        &self,
        _reference: &EditionReference,
        date: NaiveDate,
    ) -> Result<FetchedArtifact, FetchError> {
        let path = self
            .work_dir
            .join(format!("dou_latest_{}.pdf", date.format("%d%m%Y")));
        store_validated(&self.body, &path, date).await
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub texts: Mutex<Vec<String>>,
    pub documents: Mutex<Vec<(String, usize, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn send_document(
        &self,
        filename: &str,
        content: Bytes,
        caption: &str,
    ) -> Result<(), NotifyError> {
        self.documents
            .lock()
            .unwrap()
            .push((filename.to_string(), content.len(), caption.to_string()));
        Ok(())
    }
}

/// Finishes later dates first: each date sleeps less than the one before.
pub struct ReverseOrderProcessor {
    pub base: NaiveDate,
}

#[async_trait]
impl DateProcessor for ReverseOrderProcessor {
    async fn process(&self, date: NaiveDate) -> ProcessingResult {
        let offset = (date - self.base).num_days().max(0) as u64;
        tokio::time::sleep(Duration::from_secs(100u64.saturating_sub(offset))).await;
        ProcessingResult::empty(date)
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub dates: Mutex<Vec<NaiveDate>>,
}

#[async_trait]
impl ResultReporter for RecordingReporter {
    async fn report(&self, result: &ProcessingResult) {
        self.dates.lock().unwrap().push(result.date);
    }
}
