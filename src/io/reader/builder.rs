// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Builder pattern for loading bag sets.
//!
//! The `BagLoader` provides a fluent API for configuring and loading one
//! or more bag files into a [`BagSet`](super::BagSet).

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::core::{BagError, Result};
use crate::io::formats::bag::BagFile;
use crate::schema::DefinitionRegistry;

use super::BagSet;

/// Configuration for loading bags.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Bag files making up one recording
    pub paths: Vec<PathBuf>,
    /// Sort paths by name before loading, as a proxy for recording order
    pub sort_paths: bool,
    /// Compute static layouts for every registered type after loading
    pub precompute_layouts: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            sort_paths: true,
            precompute_layouts: true,
        }
    }
}

/// Builder for loading bag sets.
///
/// # Example
///
/// ```rust,no_run
/// use robobag::io::BagLoader;
///
/// let bags = BagLoader::new()
///     .path("run_0.bag")
///     .path("run_1.bag")
///     .precompute_layouts(false)
///     .load()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct BagLoader {
    config: LoadConfig,
}

impl BagLoader {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bag file.
    pub fn path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config.paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Add several bag files.
    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<std::path::Path>,
    {
        self.config
            .paths
            .extend(paths.into_iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    /// Whether to sort paths by name before loading.
    pub fn sort_paths(mut self, sort: bool) -> Self {
        self.config.sort_paths = sort;
        self
    }

    /// Whether to precompute static layouts after loading.
    pub fn precompute_layouts(mut self, precompute: bool) -> Self {
        self.config.precompute_layouts = precompute;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: LoadConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn load_config(&self) -> &LoadConfig {
        &self.config
    }

    /// Open every bag and build the shared catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is set, or if any file fails to load.
    /// A failed file aborts the whole load.
    pub fn load(self) -> Result<BagSet> {
        let LoadConfig {
            mut paths,
            sort_paths,
            precompute_layouts,
        } = self.config;

        if paths.is_empty() {
            return Err(BagError::config("no bag files given"));
        }
        if sort_paths {
            sort_by_name(&mut paths);
        }

        let registry = Arc::new(DefinitionRegistry::new());
        let files = paths
            .iter()
            .map(|path| BagFile::open(path, &registry))
            .collect::<Result<Vec<_>>>()?;

        if precompute_layouts {
            registry.precompute_layouts();
        }
        debug!(
            files = files.len(),
            types = registry.len(),
            "loaded bag set"
        );

        Ok(BagSet::from_parts(files, registry))
    }
}

/// Order paths by their full string, not component by component.
fn sort_by_name(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
}
