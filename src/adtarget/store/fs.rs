use super::RelationStore;
use crate::error::{Result, TargetingError};
use crate::model::{Anchor, Catalogs};
use crate::relation::PersistedEdge;
use std::fs;
use std::path::{Path, PathBuf};

const CATALOGS_FILENAME: &str = "catalogs.json";
const RELATIONS_DIR: &str = "relations";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn relation_path(&self, anchor: Anchor) -> PathBuf {
        self.root.join(RELATIONS_DIR).join(format!(
            "{}-{}.json",
            anchor.kind().label(),
            anchor.id()
        ))
    }

    /// Write catalogs, creating the data directory if needed.
    pub fn save_catalogs(&self, catalogs: &Catalogs) -> Result<()> {
        ensure_dir(&self.root)?;
        let content = serde_json::to_string_pretty(catalogs).map_err(TargetingError::Serialization)?;
        fs::write(self.root.join(CATALOGS_FILENAME), content).map_err(TargetingError::Io)?;
        Ok(())
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(TargetingError::Io)?;
    }
    Ok(())
}

impl RelationStore for FileStore {
    fn load_catalogs(&self) -> Result<Catalogs> {
        let path = self.root.join(CATALOGS_FILENAME);
        if !path.exists() {
            return Err(TargetingError::Store(format!(
                "No catalogs found at {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(&path).map_err(TargetingError::Io)?;
        let catalogs: Catalogs = serde_json::from_str(&content).map_err(TargetingError::Serialization)?;
        tracing::debug!(
            path = %path.display(),
            restaurants = catalogs.restaurants.len(),
            campaigns = catalogs.campaigns.len(),
            "loaded catalogs"
        );
        Ok(catalogs)
    }

    fn load_relation(&self, anchor: Anchor) -> Result<Vec<PersistedEdge>> {
        let path = self.relation_path(anchor);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(TargetingError::Io)?;
        let edges = serde_json::from_str(&content).map_err(TargetingError::Serialization)?;
        Ok(edges)
    }

    fn save_relation(&mut self, anchor: Anchor, edges: &[PersistedEdge]) -> Result<()> {
        let path = self.relation_path(anchor);
        if let Some(dir) = path.parent() {
            ensure_dir(dir)?;
        }
        let content = serde_json::to_string_pretty(edges).map_err(TargetingError::Serialization)?;

        // Write beside the target, then rename, so a failed write leaves the old file intact.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(TargetingError::Io)?;
        fs::rename(&tmp, &path).map_err(TargetingError::Io)?;

        tracing::debug!(path = %path.display(), edges = edges.len(), "wrote relation");
        Ok(())
    }
}
