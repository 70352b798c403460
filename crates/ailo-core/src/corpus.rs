use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::store::{DocumentStore, LoadReport};

/// Read corpus records from a dataset file or a directory of JSON files.
///
/// A dataset is either a top-level array of records or an object with a
/// `documents` array. Inside a directory, files that are not datasets are
/// treated as raw API dumps and become one record each.
pub fn load_path(path: &Path) -> Result<Vec<Value>> {
    if path.is_dir() { return load_directory(path); }
    if !path.exists() { return Err(Error::NotFound(path.display().to_string())); }
    let value = read_json(path)?;
    dataset_records(value).map_err(|_| Error::CorpusLayout(path.to_path_buf()))
}

/// Convenience: read records and build the store in one step.
pub fn load_store(path: &Path) -> Result<(DocumentStore, LoadReport)> {
    let records = load_path(path)?;
    info!(records = records.len(), path = %path.display(), "corpus records read");
    Ok(DocumentStore::load(records))
}

fn load_directory(dir: &Path) -> Result<Vec<Value>> {
    let files = list_json_files(dir);
    if files.is_empty() {
        warn!(dir = %dir.display(), "no .json files found");
        return Ok(vec![]);
    }
    let mut records = Vec::new();
    for file_path in &files {
        let value = match read_json(file_path) {
            Ok(value) => value,
            Err(e) => { warn!(error = %e, "skipping unreadable corpus file"); continue; }
        };
        match dataset_records(value) {
            Ok(batch) => records.extend(batch),
            Err(raw) => records.push(raw_record(file_path, &raw)),
        }
    }
    info!(files = files.len(), records = records.len(), "processed corpus directory");
    Ok(records)
}

/// Hands the value back untouched when it is not a dataset.
fn dataset_records(value: Value) -> std::result::Result<Vec<Value>, Value> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("documents") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => { obj.insert("documents".to_string(), other); Err(Value::Object(obj)) }
            None => Err(Value::Object(obj)),
        },
        other => Err(other),
    }
}

/// A raw API dump becomes a single record named after its file.
fn raw_record(file_path: &Path, data: &Value) -> Value {
    let stem = file_path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    let file_name = file_path.file_name().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    json!({
        "id": stem,
        "title": title_case(&stem.replace('_', " ")),
        "text": data.to_string(),
        "source_endpoint": stem.replace('_', "/"),
        "metadata": { "file": file_name },
    })
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn read_json(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    serde_json::from_slice(&bytes).map_err(|source| Error::Json { path: path.to_path_buf(), source })
}

fn list_json_files(root: &Path) -> Vec<PathBuf> {
    let mut json_files = Vec::new();
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
        let path = entry.path(); if path.extension().and_then(|s| s.to_str()) == Some("json") { json_files.push(path.to_path_buf()); }
    }
    json_files.sort(); json_files
}
