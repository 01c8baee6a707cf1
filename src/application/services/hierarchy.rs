//! Hierarchy file service
//!
//! Loads and saves CSV hierarchy files through the filesystem boundary.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, IoResultExt, Session};
use crate::domain::{export_text, import_text, Forest, TokenSource};
use crate::infrastructure::traits::FileSystem;

/// Service for reading and writing hierarchy files.
pub struct HierarchyService {
    fs: Arc<dyn FileSystem>,
}

impl HierarchyService {
    /// Create a new hierarchy service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a CSV file into a canonical forest.
    ///
    /// Only a missing or unreadable file is an error; malformed content degrades per cell.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Forest> {
        let text = self
            .fs
            .read_to_string(path)
            .with_input_context(path)?;
        let forest = import_text(&text);
        info!(
            "loaded {} node(s) from {}",
            forest.len(),
            path.display()
        );
        Ok(forest)
    }

    /// Load `path` into `session`. The session keeps its forest when loading fails.
    pub fn import_into<T: TokenSource>(
        &self,
        session: &mut Session<T>,
        path: &Path,
    ) -> ApplicationResult<()> {
        let forest = self.load(path)?;
        session.replace(forest);
        Ok(())
    }

    /// Serialize `forest` to `path`, creating parent directories as needed.
    #[instrument(level = "debug", skip(self, forest))]
    pub fn save(&self, forest: &Forest, path: &Path) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        self.fs
            .write(path, &export_text(forest))
            .with_path_context("write hierarchy", path)?;
        debug!("saved {} node(s) to {}", forest.len(), path.display());
        Ok(())
    }
}
