//! Forest service
//!
//! Loads flat menu records from a file and assembles them into trees.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{
    parse_records, ApplicationError, ApplicationResult, IoResultExt, RecordFormat,
};
use crate::domain::{
    find_relation_nodes, BuildOptions, MenuRecord, Record, TreeBuilder, TreeNode,
};
use crate::infrastructure::traits::FileSystem;

/// Service for building menu forests from record files.
pub struct ForestService {
    fs: Arc<dyn FileSystem>,
    builder: TreeBuilder,
}

impl ForestService {
    /// Create a new forest service.
    pub fn new(fs: Arc<dyn FileSystem>, options: BuildOptions) -> Self {
        Self {
            fs,
            builder: TreeBuilder::new(options),
        }
    }

    /// Load all records from a `.json` or `.toml` file, in file order.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<MenuRecord>> {
        let format = RecordFormat::from_path(path)?;
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read records", path)?;
        let records = parse_records(&content, format, path)?;
        debug!("loaded {} records", records.len());
        Ok(records)
    }

    /// Full forest with the given ids flagged as selected.
    ///
    /// Ids that match no record are ignored.
    #[instrument(level = "debug", skip(self, records))]
    pub fn tree<'a>(
        &self,
        records: &'a [MenuRecord],
        selected_ids: &[i64],
    ) -> ApplicationResult<Vec<TreeNode<'a, MenuRecord>>> {
        let selected: Vec<MenuRecord> = records
            .iter()
            .filter(|r| selected_ids.contains(&r.id))
            .cloned()
            .collect();
        if selected_ids.iter().any(|id| !records.iter().any(|r| r.id == *id)) {
            debug!("ignoring selected ids without a record");
        }
        Ok(self.builder.build(records, &selected)?)
    }

    /// Targets plus all of their ancestors, in file order.
    ///
    /// Every id must name a loaded record. Feeding the result into
    /// [`ForestService::tree`] yields the forest pruned to those chains.
    #[instrument(level = "debug", skip(self, records))]
    pub fn ancestors(
        &self,
        records: &[MenuRecord],
        target_ids: &[i64],
    ) -> ApplicationResult<Vec<MenuRecord>> {
        let targets = lookup(records, target_ids)?;
        Ok(find_relation_nodes(&targets, records)
            .into_iter()
            .cloned()
            .collect())
    }
}

fn lookup(records: &[MenuRecord], ids: &[i64]) -> ApplicationResult<Vec<MenuRecord>> {
    ids.iter()
        .map(|id| {
            records
                .iter()
                .find(|r| r.id() == *id)
                .cloned()
                .ok_or_else(|| ApplicationError::RecordNotFound(format!("id {}", id)))
        })
        .collect()
}
