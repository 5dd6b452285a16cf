//! [`PdfCodec`] implementation backed by `lopdf`.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::{BTreeMap, HashSet};

use super::{CodecError, DocumentInfo, PdfCodec};
use crate::config::CompressionLevel;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `/Parent` chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

const EMPTY_DOCUMENT_VERSION: &str = "1.5";

/// A page imported into a target document, identified by its new object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LopdfPage(ObjectId);

impl LopdfPage {
    /// Object id of the page inside the target document.
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

/// Codec over `lopdf` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfCodec {
    compression: CompressionLevel,
}

impl LopdfCodec {
    /// Create a codec using the default compression level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec that encodes with the given compression level.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        Self { compression }
    }
}

impl PdfCodec for LopdfCodec {
    type Document = Document;
    type Page = LopdfPage;

    fn decode(&self, bytes: &[u8]) -> Result<Document, CodecError> {
        let doc = Document::load_mem(bytes).map_err(|e| load_error(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(CodecError::Encrypted);
        }

        Ok(doc)
    }

    fn create_empty(&self) -> Document {
        let mut doc = Document::with_version(EMPTY_DOCUMENT_VERSION);

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc
    }

    fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }

    fn copy_pages(
        &self,
        target: &mut Document,
        source: &Document,
        indices: &[usize],
    ) -> Result<Vec<LopdfPage>, CodecError> {
        let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
        let mut copier = ObjectCopier::new(source);
        let mut emitted = HashSet::new();
        let mut pages = Vec::with_capacity(indices.len());

        for &index in indices {
            let source_id = *source_pages.get(index).ok_or(CodecError::PageOutOfRange {
                index,
                page_count: source_pages.len(),
            })?;

            let mut page = source
                .get_object(source_id)
                .and_then(Object::as_dict)
                .map_err(|e| CodecError::PageTree(format!("page {}: {e}", index + 1)))?
                .clone();
            inherit_attributes(source, &mut page);

            // The page may already have been pulled in through a link from an
            // earlier page; its slot is then overwritten with the full copy.
            let page_id = copier.reserve(target, source_id);
            let copied = copier.copy_dictionary(target, &page);
            target.objects.insert(page_id, Object::Dictionary(copied));

            let page_id = if emitted.insert(page_id) {
                page_id
            } else {
                let duplicate = target.objects[&page_id].clone();
                target.add_object(duplicate)
            };
            pages.push(LopdfPage(page_id));
        }

        if source.version > target.version {
            target.version = source.version.clone();
        }

        Ok(pages)
    }

    fn append(&self, target: &mut Document, pages: Vec<LopdfPage>) -> Result<(), CodecError> {
        let pages_id = target
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|e| CodecError::PageTree(format!("missing pages root: {e}")))?;

        for page in &pages {
            let page_dict = target
                .get_object_mut(page.0)
                .and_then(Object::as_dict_mut)
                .map_err(|e| CodecError::PageTree(format!("copied page is missing: {e}")))?;
            page_dict.set("Parent", pages_id);
        }

        let pages_dict = target
            .get_object_mut(pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| CodecError::PageTree(format!("pages root is not a dictionary: {e}")))?;

        let kids = pages_dict
            .get_mut(b"Kids")
            .and_then(Object::as_array_mut)
            .map_err(|_| CodecError::PageTree("pages root has no Kids array".to_string()))?;
        kids.extend(pages.iter().map(|page| Object::Reference(page.0)));

        let current_count = pages_dict.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        pages_dict.set("Count", current_count + pages.len() as i64);

        Ok(())
    }

    fn encode(&self, mut doc: Document) -> Result<Vec<u8>, CodecError> {
        match self.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => doc.compress(),
            CompressionLevel::Maximum => {
                doc.prune_objects();
                doc.compress();
            }
        }
        doc.renumber_objects();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(buffer)
    }

    fn compression(&self) -> CompressionLevel {
        self.compression
    }

    fn inspect(&self, doc: &Document) -> DocumentInfo {
        let pages = doc.get_pages();

        let page_dimensions = pages.values().next().and_then(|&page_id| {
            let mut page = doc.get_object(page_id).and_then(Object::as_dict).ok()?.clone();
            inherit_attributes(doc, &mut page);
            let mediabox = page.get(b"MediaBox").and_then(Object::as_array).ok()?;
            if mediabox.len() < 4 {
                return None;
            }
            let width = mediabox[2].as_float().ok()? - mediabox[0].as_float().ok()?;
            let height = mediabox[3].as_float().ok()? - mediabox[1].as_float().ok()?;
            Some((width, height))
        });

        DocumentInfo {
            page_count: pages.len(),
            version: doc.version.clone(),
            object_count: doc.objects.len(),
            page_dimensions,
        }
    }
}

/// Classify a `lopdf` load error message.
fn load_error(message: String) -> CodecError {
    let lower = message.to_lowercase();
    if ["encrypt", "decrypt", "password"]
        .iter()
        .any(|word| lower.contains(word))
    {
        CodecError::Encrypted
    } else {
        CodecError::Malformed(message)
    }
}

/// Copy inherited page attributes onto the page itself.
///
/// Once copied pages are re-parented under the target's page tree they can
/// no longer inherit anything from the source tree.
fn inherit_attributes(source: &Document, page: &mut Dictionary) {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if depth == MAX_TREE_DEPTH {
            break;
        }
        depth += 1;

        let Ok(node) = source.get_object(node_id).and_then(Object::as_dict) else {
            break;
        };

        for key in INHERITABLE_ATTRIBUTES {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
}

/// Deep-copies objects from one document into another under fresh ids.
struct ObjectCopier<'a> {
    source: &'a Document,
    remap: BTreeMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document) -> Self {
        Self {
            source,
            remap: BTreeMap::new(),
        }
    }

    /// Target id for `source_id`, allocating one on first use.
    fn reserve(&mut self, target: &mut Document, source_id: ObjectId) -> ObjectId {
        *self
            .remap
            .entry(source_id)
            .or_insert_with(|| target.new_object_id())
    }

    fn import(&mut self, target: &mut Document, source_id: ObjectId) -> ObjectId {
        if let Some(&target_id) = self.remap.get(&source_id) {
            return target_id;
        }

        let source = self.source;
        let target_id = self.reserve(target, source_id);
        let object = match source.get_object(source_id) {
            Ok(object) => self.copy_object(target, object),
            Err(_) => Object::Null,
        };
        target.objects.insert(target_id, object);
        target_id
    }

    fn copy_object(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => Object::Reference(self.import(target, *id)),
            Object::Array(items) => {
                let mut copied = Vec::with_capacity(items.len());
                for item in items {
                    copied.push(self.copy_object(target, item));
                }
                Object::Array(copied)
            }
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(target, dict)),
            Object::Stream(stream) => {
                let mut copied = stream.clone();
                copied.dict = self.copy_dictionary(target, &stream.dict);
                Object::Stream(copied)
            }
            other => other.clone(),
        }
    }

    /// Copy a dictionary, never following the `/Parent` link of a page.
    fn copy_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let is_page = dict
            .get(b"Type")
            .and_then(Object::as_name)
            .is_ok_and(|name| name == b"Page");

        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            if is_page && key.as_slice() == b"Parent" {
                continue;
            }
            copied.set(key.clone(), self.copy_object(target, value));
        }
        copied
    }
}
