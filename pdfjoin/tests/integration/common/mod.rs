//! Shared fixtures for the integration tests.
//!
//! Fixtures are generated with lopdf. Every page carries a `/Marker` string
//! (`A1`, `A2`, ...) so tests can assert the exact page order of a merge.

#![allow(dead_code)]

use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

use pdfjoin::entry::FileSource;

/// Build a PDF with `pages` pages marked `{label}1` to `{label}{pages}`.
pub fn sample_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|n| {
            let marker = format!("{label}{n}");
            let content = format!("BT /F1 18 Tf 50 700 Td ({marker}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
                "Marker" => Object::string_literal(marker),
            });
            Object::Reference(page_id)
        })
        .collect();

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
    doc.save_to(&mut buffer).expect("Failed to serialize fixture");
    buffer
}

/// Write a sample PDF into `dir` and return its path.
pub fn write_pdf(dir: &Path, name: &str, label: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, sample_pdf(label, pages)).expect("Failed to write fixture");
    path
}

/// In-memory source holding a sample PDF.
pub fn memory_pdf(name: &str, label: &str, pages: usize) -> FileSource {
    FileSource::memory(name, sample_pdf(label, pages))
}

/// Page markers of a PDF, in page order.
pub fn page_markers(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("Merged output is not a valid PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc
                .get_object(page_id)
                .and_then(Object::as_dict)
                .expect("Page is not a dictionary");
            match page.get(b"Marker") {
                Ok(Object::String(marker, _)) => String::from_utf8_lossy(marker).into_owned(),
                other => panic!("Page has no marker: {other:?}"),
            }
        })
        .collect()
}

/// Page markers of the PDF file at `path`.
pub fn file_page_markers(path: &Path) -> Vec<String> {
    page_markers(&std::fs::read(path).expect("Failed to read merged output"))
}

/// File names present in `dir`, sorted.
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to list directory")
        .map(|entry| {
            entry
                .expect("Failed to read directory entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_pdf_markers() {
        assert_eq!(page_markers(&sample_pdf("X", 3)), ["X1", "X2", "X3"]);
    }
}
