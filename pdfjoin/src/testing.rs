//! Fixtures shared by unit tests.

use lopdf::{Document, Object, Stream, dictionary};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use crate::codec::{CodecError, DocumentInfo, PdfCodec};

/// Build a PDF with `pages` pages; page `n` carries the marker `{label}{n}`.
pub fn sample_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::with_capacity(pages);
    for n in 1..=pages {
        let marker = format!("{label}{n}");
        let content = format!("BT /F1 24 Tf 72 720 Td ({marker}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(595.0),
                Object::Real(842.0),
            ]),
            "Marker" => Object::string_literal(marker),
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => pages as i64,
            "Kids" => kids,
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

/// Page markers of an encoded PDF, in page order.
pub fn page_markers(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
            match page.get(b"Marker") {
                Ok(Object::String(marker, _)) => String::from_utf8_lossy(marker).into_owned(),
                other => panic!("page has no marker: {other:?}"),
            }
        })
        .collect()
}

const FAKE_HEADER: &str = "fake:";

/// Bytes understood by [`FakeCodec`]: `pages` pages labelled `{label}{n}`.
pub fn fake_pdf(label: &str, pages: usize) -> Vec<u8> {
    let labels: Vec<String> = (1..=pages).map(|n| format!("{label}{n}")).collect();
    format!("{FAKE_HEADER}{}", labels.join(",")).into_bytes()
}

/// Page labels of bytes produced by [`FakeCodec`].
pub fn fake_pages(bytes: &[u8]) -> Vec<String> {
    parse_fake(bytes).unwrap()
}

fn parse_fake(bytes: &[u8]) -> Result<Vec<String>, CodecError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| CodecError::Malformed(e.to_string()))?;
    let body = text
        .strip_prefix(FAKE_HEADER)
        .ok_or_else(|| CodecError::Malformed("missing header".to_string()))?;

    Ok(body
        .split(',')
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect())
}

/// In-memory codec whose documents are lists of page labels.
#[derive(Debug, Clone, Default)]
pub struct FakeCodec {
    decodes: Arc<AtomicUsize>,
    encodes: Arc<AtomicUsize>,
    fail_encode: bool,
}

impl FakeCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec whose `encode` always fails.
    pub fn failing_encode() -> Self {
        Self {
            fail_encode: true,
            ..Self::default()
        }
    }

    pub fn decode_calls(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }

    pub fn encode_calls(&self) -> usize {
        self.encodes.load(Ordering::SeqCst)
    }
}

impl PdfCodec for FakeCodec {
    type Document = Vec<String>;
    type Page = String;

    fn decode(&self, bytes: &[u8]) -> Result<Vec<String>, CodecError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        parse_fake(bytes)
    }

    fn create_empty(&self) -> Vec<String> {
        Vec::new()
    }

    fn page_count(&self, doc: &Vec<String>) -> usize {
        doc.len()
    }

    fn copy_pages(
        &self,
        _target: &mut Vec<String>,
        source: &Vec<String>,
        indices: &[usize],
    ) -> Result<Vec<String>, CodecError> {
        indices
            .iter()
            .map(|&index| {
                source.get(index).cloned().ok_or(CodecError::PageOutOfRange {
                    index,
                    page_count: source.len(),
                })
            })
            .collect()
    }

    fn append(&self, target: &mut Vec<String>, pages: Vec<String>) -> Result<(), CodecError> {
        target.extend(pages);
        Ok(())
    }

    fn encode(&self, doc: Vec<String>) -> Result<Vec<u8>, CodecError> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        if self.fail_encode {
            return Err(CodecError::Encode("disk full".to_string()));
        }
        Ok(format!("{FAKE_HEADER}{}", doc.join(",")).into_bytes())
    }

    fn inspect(&self, doc: &Vec<String>) -> DocumentInfo {
        DocumentInfo {
            page_count: doc.len(),
            version: "1.7".to_string(),
            object_count: doc.len(),
            page_dimensions: None,
        }
    }
}

#[derive(Debug, Default)]
struct Flag {
    set: Mutex<bool>,
    changed: Condvar,
}

impl Flag {
    fn raise(&self) {
        *self.set.lock().unwrap() = true;
        self.changed.notify_all();
    }

    fn wait(&self) {
        let mut set = self.set.lock().unwrap();
        while !*set {
            set = self.changed.wait(set).unwrap();
        }
    }
}

/// Holds every decode of a [`GateCodec`] until released.
#[derive(Debug, Default)]
pub struct Gate {
    started: Flag,
    released: Flag,
}

impl Gate {
    /// Block until a decode has started.
    pub fn wait_until_started(&self) {
        self.started.wait();
    }

    /// Let all current and future decodes proceed.
    pub fn release(&self) {
        self.released.raise();
    }
}

/// [`FakeCodec`] whose decodes block on a [`Gate`].
#[derive(Debug, Clone)]
pub struct GateCodec {
    inner: FakeCodec,
    gate: Arc<Gate>,
}

impl GateCodec {
    pub fn new() -> (Self, Arc<Gate>) {
        let gate = Arc::new(Gate::default());
        let codec = Self {
            inner: FakeCodec::new(),
            gate: Arc::clone(&gate),
        };
        (codec, gate)
    }
}

impl PdfCodec for GateCodec {
    type Document = Vec<String>;
    type Page = String;

    fn decode(&self, bytes: &[u8]) -> Result<Vec<String>, CodecError> {
        self.gate.started.raise();
        self.gate.released.wait();
        self.inner.decode(bytes)
    }

    fn create_empty(&self) -> Vec<String> {
        self.inner.create_empty()
    }

    fn page_count(&self, doc: &Vec<String>) -> usize {
        self.inner.page_count(doc)
    }

    fn copy_pages(
        &self,
        target: &mut Vec<String>,
        source: &Vec<String>,
        indices: &[usize],
    ) -> Result<Vec<String>, CodecError> {
        self.inner.copy_pages(target, source, indices)
    }

    fn append(&self, target: &mut Vec<String>, pages: Vec<String>) -> Result<(), CodecError> {
        self.inner.append(target, pages)
    }

    fn encode(&self, doc: Vec<String>) -> Result<Vec<u8>, CodecError> {
        self.inner.encode(doc)
    }

    fn inspect(&self, doc: &Vec<String>) -> DocumentInfo {
        self.inner.inspect(doc)
    }
}
