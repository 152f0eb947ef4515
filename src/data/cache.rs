use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::loader::{self, LoadError};
use super::model::PlayerTable;

type TableRegistry = Mutex<HashMap<PathBuf, Arc<PlayerTable>>>;

fn registry() -> &'static TableRegistry {
    static TABLES: OnceLock<TableRegistry> = OnceLock::new();
    TABLES.get_or_init(|| Mutex::new(HashMap::new()))
}

fn cache_key(path: &Path) -> Result<PathBuf, LoadError> {
    std::fs::canonicalize(path).map_err(|source| LoadError::NotFound {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a player table, parsing each distinct file at most once per process.
///
/// The registry lock is held while parsing, so concurrent callers asking for
/// the same path wait for the first parse instead of repeating it. Failed
/// loads are not remembered.
pub fn load(path: &Path) -> Result<Arc<PlayerTable>, LoadError> {
    let key = cache_key(path)?;
    let mut tables = registry().lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(table) = tables.get(&key) {
        log::debug!("Using cached table for {}", key.display());
        return Ok(Arc::clone(table));
    }

    let table = Arc::new(loader::load_file(&key)?);
    tables.insert(key, Arc::clone(&table));
    Ok(table)
}

/// Whether `path` has already been parsed in this process.
pub fn is_cached(path: &Path) -> bool {
    let Ok(key) = std::fs::canonicalize(path) else {
        return false;
    };
    registry()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&key)
}
