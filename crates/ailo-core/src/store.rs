//! Immutable in-memory document store and its category index.
//!
//! The store is built once from corpus records. Records that cannot become a
//! valid [`Document`] are skipped and counted in a [`LoadReport`]; one bad
//! record never aborts the batch.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, info, warn};
use twox_hash::XxHash64;

use crate::types::{Category, DocId, Document, MetaValue, Metadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotAnObject,
    MissingText,
    EmptyText,
    NonStringField,
    BadId,
    BadMetadata,
    DuplicateId,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::NotAnObject => "record is not an object",
            SkipReason::MissingText => "missing text",
            SkipReason::EmptyText => "empty text",
            SkipReason::NonStringField => "non-string field",
            SkipReason::BadId => "id is neither string nor integer",
            SkipReason::BadMetadata => "metadata is not an object",
            SkipReason::DuplicateId => "duplicate id",
        };
        f.write_str(s)
    }
}

/// Outcome of building a store: how many records made it in and why the rest did not.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl LoadReport {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    fn skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }
}

/// Category name → document ids in store order. Diagnostics only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryIndex(BTreeMap<Category, Vec<DocId>>);

impl CategoryIndex {
    fn build(documents: &[Document]) -> Self {
        let mut index: BTreeMap<Category, Vec<DocId>> = BTreeMap::new();
        for doc in documents { index.entry(doc.category).or_default().push(doc.id.clone()); }
        Self(index)
    }

    pub fn ids(&self, category: Category) -> &[DocId] {
        self.0.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Counts for every category, including empty ones.
    pub fn counts(&self) -> Vec<(Category, usize)> {
        Category::ALL.iter().map(|c| (*c, self.ids(*c).len())).collect()
    }
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    positions: HashMap<DocId, usize>,
    categories: CategoryIndex,
}

impl DocumentStore {
    pub fn empty() -> Self { Self::default() }

    /// Build a store from raw JSON records in corpus order.
    pub fn load<I>(records: I) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = Value>,
    {
        let mut report = LoadReport::default();
        let mut documents = Vec::new();
        for (position, record) in records.into_iter().enumerate() {
            match document_from_record(record) {
                Ok(doc) => documents.push(doc),
                Err(reason) => {
                    debug!(position, %reason, "skipping corpus record");
                    report.skip(reason);
                }
            }
        }
        let (store, dedup) = Self::from_documents(documents);
        for (reason, count) in dedup.skipped { *report.skipped.entry(reason).or_insert(0) += count; }
        report.loaded = dedup.loaded;
        if report.skipped_total() > 0 {
            warn!(loaded = report.loaded, skipped = report.skipped_total(), "some corpus records were skipped");
        }
        (store, report)
    }

    /// Build a store from already constructed documents. Empty ids or texts and
    /// repeated ids are skipped; the first occurrence of an id wins.
    pub fn from_documents<I>(docs: I) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = Document>,
    {
        let mut report = LoadReport::default();
        let mut documents = Vec::new();
        let mut positions = HashMap::new();
        for doc in docs {
            if doc.id.trim().is_empty() { report.skip(SkipReason::BadId); continue; }
            if doc.text.trim().is_empty() { report.skip(SkipReason::EmptyText); continue; }
            if positions.contains_key(&doc.id) { report.skip(SkipReason::DuplicateId); continue; }
            positions.insert(doc.id.clone(), documents.len());
            documents.push(doc);
        }
        report.loaded = documents.len();
        let categories = CategoryIndex::build(&documents);
        info!(documents = documents.len(), "document store built");
        (Self { documents, positions, categories }, report)
    }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    /// Documents in load order; ranking tie-breaks follow this order.
    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.positions.get(id).map(|&i| &self.documents[i])
    }

    pub fn position(&self, id: &str) -> Option<usize> { self.positions.get(id).copied() }

    pub fn category_index(&self) -> &CategoryIndex { &self.categories }
}

fn document_from_record(record: Value) -> Result<Document, SkipReason> {
    let Value::Object(mut obj) = record else { return Err(SkipReason::NotAnObject) };
    let text = match obj.remove("text") {
        None | Some(Value::Null) => return Err(SkipReason::MissingText),
        Some(Value::String(s)) => s,
        Some(_) => return Err(SkipReason::NonStringField),
    };
    if text.trim().is_empty() { return Err(SkipReason::EmptyText); }
    let title = optional_string(&mut obj, "title")?;
    let source_endpoint = optional_string(&mut obj, "source_endpoint")?;
    let metadata = match obj.remove("metadata") {
        None | Some(Value::Null) => Metadata::new(),
        Some(Value::Object(map)) => metadata_from_map(map),
        Some(_) => return Err(SkipReason::BadMetadata),
    };
    let id = match obj.remove("id") {
        None | Some(Value::Null) => derive_id(&source_endpoint, &title, &text),
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        Some(Value::Number(n)) if n.is_u64() || n.is_i64() => n.to_string(),
        Some(_) => return Err(SkipReason::BadId),
    };
    Ok(Document::new(id, title, text, source_endpoint, metadata))
}

fn optional_string(obj: &mut Map<String, Value>, key: &str) -> Result<String, SkipReason> {
    match obj.remove(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(SkipReason::NonStringField),
    }
}

fn metadata_from_map(map: Map<String, Value>) -> Metadata {
    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, MetaValue::Text(s))),
            Value::Number(n) => Some((key, MetaValue::Number(n))),
            Value::Bool(b) => Some((key, MetaValue::Text(b.to_string()))),
            _ => None,
        })
        .collect()
}

/// Stable id for records that arrive without one.
fn derive_id(endpoint: &str, title: &str, text: &str) -> DocId {
    let mut hasher = XxHash64::with_seed(0);
    endpoint.hash(&mut hasher);
    title.hash(&mut hasher);
    text.hash(&mut hasher);
    format!("doc-{:016x}", hasher.finish())
}
