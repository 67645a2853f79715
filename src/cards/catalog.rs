//! Read-only people catalog loaded once at startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::cards::keyboard::PERSON_PREFIX;

/// Telegram rejects callback data longer than this many bytes.
const MAX_CALLBACK_DATA_BYTES: usize = 64;

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// One entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Person {
    /// Stable identifier, used in callback data.
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    /// Absolute http(s) URL of the photo. Anything else means "no photo".
    #[serde(default)]
    pub photo_url: String,
}

impl Person {
    pub fn new(key: &str, name: &str, bio: &str, photo_url: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            bio: bio.to_string(),
            photo_url: photo_url.to_string(),
        }
    }
}

/// Errors that can occur when loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read people file '{}': {source}", path.display())]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("failed to parse people file '{}': {source}", path.display())]
    ParseJson { path: PathBuf, source: serde_json::Error },
    #[error("people catalog is empty")]
    Empty,
    #[error("invalid person key '{0}' (allowed: letters, digits, '_' and '-')")]
    InvalidKey(String),
    #[error("person key '{0}' is too long for callback data")]
    KeyTooLong(String),
    #[error("duplicate person key '{0}'")]
    DuplicateKey(String),
    #[error("person '{0}' has an empty name")]
    EmptyName(String),
}

/// Insertion-ordered mapping from key to [`Person`].
#[derive(Debug, Clone)]
pub struct Catalog {
    people: Vec<Person>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Load the catalog from a JSON array of people.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| CatalogError::ReadFile { path: path.clone(), source: e })?;
        let people: Vec<Person> = serde_json::from_str(&content)
            .map_err(|e| CatalogError::ParseJson { path: path.clone(), source: e })?;
        Self::from_people(people)
    }

    /// Build a catalog, validating every record.
    pub fn from_people(people: Vec<Person>) -> Result<Self, CatalogError> {
        if people.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(people.len());
        for (position, person) in people.iter().enumerate() {
            if !KEY_PATTERN.is_match(&person.key) {
                return Err(CatalogError::InvalidKey(person.key.clone()));
            }
            if PERSON_PREFIX.len() + person.key.len() > MAX_CALLBACK_DATA_BYTES {
                return Err(CatalogError::KeyTooLong(person.key.clone()));
            }
            if person.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(person.key.clone()));
            }
            if index.insert(person.key.clone(), position).is_some() {
                return Err(CatalogError::DuplicateKey(person.key.clone()));
            }
            debug!("Catalog entry: key={}, name={}", person.key, person.name);
        }

        Ok(Self { people, index })
    }

    /// Look up a person. A miss is a normal outcome, not a fault.
    pub fn get(&self, key: &str) -> Option<&Person> {
        self.index.get(key).map(|&i| &self.people[i])
    }

    /// Keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.people.iter().map(|p| p.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}
