//! Uploaded-file trees and their normalization from environment data.
//!
//! Environment upload data describes nested file fields "inside out": a field
//! `docs[a][]` arrives as one descriptor object whose `tmp_name`, `name`, `type`,
//! `error` and `size` entries each hold the whole nested structure. The normalizer
//! turns it back into a tree with one [`UploadedFile`] per leaf.

use std::sync::Arc;

use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::upload::code::ErrorCode;
use crate::upload::error::Error;
use crate::upload::file::UploadedFile;

/// Descriptor fields, in the order they are merged.
const FIELDS: [&str; 5] = ["tmp_name", "name", "type", "error", "size"];

/// A normalized upload tree.
#[derive(Debug, Clone)]
pub enum FileTree {
    Leaf(Arc<UploadedFile>),
    Node(IndexMap<String, FileTree>),
}

impl FileTree {
    /// The file at this position, if it is a leaf.
    pub fn as_file(&self) -> Option<&Arc<UploadedFile>> {
        match self {
            FileTree::Leaf(file) => Some(file),
            FileTree::Node(_) => None,
        }
    }

    /// Child subtree under `key`, if this is a node.
    pub fn get(&self, key: &str) -> Option<&FileTree> {
        match self {
            FileTree::Leaf(_) => None,
            FileTree::Node(children) => children.get(key),
        }
    }

    /// Follow `path` through nested nodes.
    pub fn find(&self, path: &[&str]) -> Option<&FileTree> {
        path.iter().try_fold(self, |tree, key| tree.get(key))
    }

    /// Number of files in the tree.
    pub fn file_count(&self) -> usize {
        match self {
            FileTree::Leaf(_) => 1,
            FileTree::Node(children) => children.values().map(FileTree::file_count).sum(),
        }
    }
}

/// Leaves are equal when they are the same file.
impl PartialEq for FileTree {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FileTree::Leaf(a), FileTree::Leaf(b)) => Arc::ptr_eq(a, b),
            (FileTree::Node(a), FileTree::Node(b)) => a == b,
            _ => false,
        }
    }
}

/// Upload data before normalization.
///
/// Deserializing always produces [`FileInput::Raw`]; the other variants let callers
/// mix already constructed files into the input.
#[derive(Debug, Clone)]
pub enum FileInput {
    File(Arc<UploadedFile>),
    Group(IndexMap<String, FileInput>),
    /// Environment data: a descriptor object or a nesting of them.
    Raw(Value),
}

impl From<UploadedFile> for FileInput {
    fn from(file: UploadedFile) -> Self {
        FileInput::File(Arc::new(file))
    }
}

impl From<Arc<UploadedFile>> for FileInput {
    fn from(file: Arc<UploadedFile>) -> Self {
        FileInput::File(file)
    }
}

impl From<Value> for FileInput {
    fn from(value: Value) -> Self {
        FileInput::Raw(value)
    }
}

impl<'de> Deserialize<'de> for FileInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(FileInput::Raw)
    }
}

/// Normalize upload data keyed by field name into file trees.
///
/// # Arguments
///
/// * `files` - Field name to upload data
///
/// # Returns
///
/// The same fields mapped to trees, or `InvalidUploadStructure` when some position
/// holds neither a descriptor nor a nested structure.
pub fn normalize_files(files: IndexMap<String, FileInput>) -> Result<IndexMap<String, FileTree>, Error> {
    files
        .into_iter()
        .map(|(key, input)| Ok((key, resolve(input)?)))
        .collect()
}

fn resolve(input: FileInput) -> Result<FileTree, Error> {
    match input {
        FileInput::File(file) => Ok(FileTree::Leaf(file)),
        FileInput::Group(group) => Ok(FileTree::Node(normalize_files(group)?)),
        FileInput::Raw(value) => resolve_value(&value),
    }
}

fn resolve_value(value: &Value) -> Result<FileTree, Error> {
    match value {
        Value::Object(map) if map.contains_key("tmp_name") => {
            for key in map.keys().filter(|key| !FIELDS.contains(&key.as_str())) {
                trace!("Ignoring upload descriptor key {:?}", key);
            }
            let mut partial = Partial::Empty;
            for field in FIELDS {
                if let Some(field_value) = map.get(field) {
                    partial.merge(field, field_value)?;
                }
            }
            partial.materialize()
        }
        Value::Object(_) | Value::Array(_) => {
            let children = entries(value)
                .into_iter()
                .map(|(key, child)| Ok((key, resolve_value(child)?)))
                .collect::<Result<_, Error>>()?;
            Ok(FileTree::Node(children))
        }
        other => Err(Error::InvalidUploadStructure(format!(
            "expected file descriptor or nested structure, found {}",
            other
        ))),
    }
}

/// Children of an object or array, arrays keyed by index.
fn entries(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        _ => Vec::new(),
    }
}

/// A tree under construction while descriptor fields are merged in.
enum Partial {
    Empty,
    Record(IndexMap<&'static str, Value>),
    Node(IndexMap<String, Partial>),
}

impl Partial {
    /// Spread one descriptor field over the tree, creating positions as needed.
    fn merge(&mut self, field: &'static str, value: &Value) -> Result<(), Error> {
        match value {
            Value::Object(_) | Value::Array(_) => {
                if let Partial::Empty = self {
                    *self = Partial::Node(IndexMap::new());
                }
                let Partial::Node(children) = self else {
                    return Err(shape_conflict(field));
                };
                for (key, child) in entries(value) {
                    children.entry(key).or_insert(Partial::Empty).merge(field, child)?;
                }
            }
            scalar => {
                if let Partial::Empty = self {
                    *self = Partial::Record(IndexMap::new());
                }
                let Partial::Record(record) = self else {
                    return Err(shape_conflict(field));
                };
                record.insert(field, scalar.clone());
            }
        }
        Ok(())
    }

    fn materialize(self) -> Result<FileTree, Error> {
        match self {
            Partial::Record(record) => leaf(record).map(|file| FileTree::Leaf(Arc::new(file))),
            Partial::Node(children) => Ok(FileTree::Node(
                children
                    .into_iter()
                    .map(|(key, child)| Ok((key, child.materialize()?)))
                    .collect::<Result<_, Error>>()?,
            )),
            Partial::Empty => Err(Error::InvalidUploadStructure("empty file descriptor".to_string())),
        }
    }
}

fn leaf(record: IndexMap<&'static str, Value>) -> Result<UploadedFile, Error> {
    let invalid = |what: &str| Error::InvalidUploadStructure(format!("{what} in file descriptor"));

    let path = record
        .get("tmp_name")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing or non-string tmp_name"))?;
    let code = record
        .get("error")
        .and_then(Value::as_i64)
        .ok_or_else(|| invalid("missing or non-integer error"))?;
    let size = match record.get("size") {
        None | Some(Value::Null) => None,
        Some(size) => Some(size.as_u64().ok_or_else(|| invalid("non-integer size"))?),
    };

    Ok(UploadedFile::from_path(
        path,
        size,
        ErrorCode::try_from(code)?,
        optional_string(record.get("name")).map_err(|_| invalid("non-string name"))?,
        optional_string(record.get("type")).map_err(|_| invalid("non-string type"))?,
    ))
}

fn optional_string(value: Option<&Value>) -> Result<Option<String>, ()> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(()),
    }
}

fn shape_conflict(field: &str) -> Error {
    Error::InvalidUploadStructure(format!("{field} does not match the shape of other descriptor fields"))
}
