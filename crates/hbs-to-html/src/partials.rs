//! Partial registry and directory loading
//!
//! A [`PartialRegistry`] maps partial names to their template source. The
//! [`PartialLoader`] fills one from a directory, deriving each partial's
//! name from its file name:
//!
//! | File | Partial |
//! |------|---------|
//! | `card.hbs` | `card` |
//! | `footer.handlebars` | `footer` |
//! | `card.partial.hbs` | `card` |
//!
//! Everything after the first remaining `.` is dropped, so `card.partial.hbs`
//! and `card.hbs` register under the same name and the one read last wins.

use crate::error::{RenderError, Result};
use futures_util::future::join_all;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Recognized partial file extensions, in the order they are tried
pub const PARTIAL_EXTENSIONS: &[&str] = &["hbs", "handlebars"];

static GLOBAL_PARTIALS: Lazy<PartialRegistry> = Lazy::new(PartialRegistry::new);

/// How partial file names are turned into partial names and paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialNaming {
    /// Strip a trailing `.hbs` or `.handlebars`; other files are skipped
    #[default]
    Suffix,
    /// Naming rule of earlier releases, kept for compatibility
    ///
    /// The extension is `hbs` when the second dot-separated segment is
    /// `hbs`, otherwise `handlebars`, and its first occurrence anywhere in
    /// the file name is removed. Files not named `name.hbs` or
    /// `name.handlebars` usually resolve to a path that does not exist.
    Legacy,
}

/// Where a partial is read from and the name it registers under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSource {
    /// Registration key
    pub key: String,
    /// File name to read, relative to the partials directory
    pub file_name: String,
}

/// Derive the partial for a directory entry
///
/// Returns `None` when the entry should be skipped, which only happens in
/// [`PartialNaming::Suffix`] mode for files without a recognized extension
/// or whose name before the first `.` is empty (`.hbs`, `._card.hbs`).
pub fn derive_partial(file_name: &str, naming: PartialNaming) -> Option<PartialSource> {
    match naming {
        PartialNaming::Suffix => derive_by_suffix(file_name),
        PartialNaming::Legacy => Some(derive_legacy(file_name)),
    }
}

fn derive_by_suffix(file_name: &str) -> Option<PartialSource> {
    let stem = PARTIAL_EXTENSIONS.iter().find_map(|ext| {
        file_name
            .strip_suffix(ext)
            .and_then(|rest| rest.strip_suffix('.'))
    })?;

    let key = key_before_first_dot(stem);
    if key.is_empty() {
        return None;
    }

    Some(PartialSource {
        key,
        file_name: file_name.to_string(),
    })
}

fn derive_legacy(file_name: &str) -> PartialSource {
    let extension = if file_name.split('.').nth(1) == Some("hbs") {
        "hbs"
    } else {
        "handlebars"
    };
    let working = file_name.replacen(extension, "", 1);

    PartialSource {
        key: key_before_first_dot(&working),
        file_name: format!("{}{}", working, extension),
    }
}

fn key_before_first_dot(name: &str) -> String {
    name.split('.').next().unwrap_or_default().to_string()
}

/// Thread-safe table of partial sources
///
/// Cloning is cheap and clones share the same table. Each renderer owns
/// its own registry unless it opts into [`PartialRegistry::global`].
#[derive(Debug, Clone, Default)]
pub struct PartialRegistry {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl PartialRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry shared by every renderer that opts in
    pub fn global() -> Self {
        GLOBAL_PARTIALS.clone()
    }

    /// Whether this is the process-wide registry
    pub fn is_global(&self) -> bool {
        Arc::ptr_eq(&self.inner, &GLOBAL_PARTIALS.inner)
    }

    /// Register a partial, replacing any partial with the same name
    pub async fn register(&self, name: impl Into<String>, source: impl Into<String>) {
        let mut partials = self.inner.write().await;
        partials.insert(name.into(), source.into());
    }

    /// Merge a batch of partials under a single write lock
    pub async fn extend<I>(&self, partials: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut table = self.inner.write().await;
        table.extend(partials);
    }

    /// Source of the named partial
    pub async fn get(&self, name: &str) -> Option<String> {
        let partials = self.inner.read().await;
        partials.get(name).cloned()
    }

    /// Check if a partial is registered
    pub async fn contains(&self, name: &str) -> bool {
        let partials = self.inner.read().await;
        partials.contains_key(name)
    }

    /// All registered partial names, sorted
    pub async fn names(&self) -> Vec<String> {
        let partials = self.inner.read().await;
        let mut names: Vec<String> = partials.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered partials
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether no partial is registered
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Copy of the whole table
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.inner.read().await.clone()
    }
}

/// Registers every partial file in a directory into a [`PartialRegistry`]
#[derive(Debug, Clone)]
pub struct PartialLoader {
    registry: PartialRegistry,
    naming: PartialNaming,
}

impl PartialLoader {
    /// Create a loader writing into `registry`
    pub fn new(registry: PartialRegistry, naming: PartialNaming) -> Self {
        Self { registry, naming }
    }

    /// Read every partial in `dir` and merge it into the registry
    ///
    /// Files are read concurrently and merged in file-name order. If a read
    /// fails, partials ordered before the failing file are still merged and
    /// the error is returned; nothing is rolled back.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Validation`] if `dir` is empty or has no entries
    /// - [`RenderError::Io`] if the directory or a partial cannot be read
    ///
    /// Returns the number of partials merged.
    pub async fn register_partials(&self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        if dir.as_os_str().is_empty() {
            return Err(RenderError::validation("partial directory is required"));
        }

        let file_names = list_file_names(dir).await?;
        if file_names.is_empty() {
            return Err(RenderError::validation(format!(
                "partial directory {} is empty, no file(s) found",
                dir.display()
            )));
        }

        let sources: Vec<PartialSource> = file_names
            .iter()
            .filter_map(|name| {
                let source = derive_partial(name, self.naming);
                if source.is_none() {
                    tracing::debug!(file = %name, "Skipping non-template file in partial directory");
                }
                source
            })
            .collect();

        if sources.is_empty() {
            tracing::warn!(
                dir = %dir.display(),
                entries = file_names.len(),
                "Partial directory has no .hbs or .handlebars files"
            );
        }

        let reads = sources.iter().map(|source| {
            let path = dir.join(&source.file_name);
            async move {
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| RenderError::io(&path, e))
            }
        });
        let results = join_all(reads).await;

        let mut merged = Vec::with_capacity(sources.len());
        let mut failure = None;
        for (source, result) in sources.into_iter().zip(results) {
            match result {
                Ok(content) => {
                    tracing::debug!(partial = %source.key, file = %source.file_name, "Registering partial");
                    merged.push((source.key, content));
                }
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        let count = merged.len();
        self.registry.extend(merged).await;

        match failure {
            Some(err) => Err(err),
            None => Ok(count),
        }
    }
}

async fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| RenderError::io(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| RenderError::io(dir, e))?
    {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Register the partials in `dir` into `registry`
pub async fn register_partials(
    dir: impl AsRef<Path>,
    registry: &PartialRegistry,
    naming: PartialNaming,
) -> Result<usize> {
    PartialLoader::new(registry.clone(), naming)
        .register_partials(dir)
        .await
}
