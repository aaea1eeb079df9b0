//! JSON persistence of a [`RepertoireSnapshot`].

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::RepertoireError;
use crate::snapshot::RepertoireSnapshot;

/// Load a snapshot from `path`. A missing file is an empty repertoire.
pub fn load(path: &Path) -> Result<RepertoireSnapshot, RepertoireError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no repertoire file, starting empty");
            return Ok(RepertoireSnapshot::default());
        }
        Err(source) => {
            return Err(RepertoireError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&contents).map_err(|source| RepertoireError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `snapshot` to `path` as pretty-printed JSON, creating parent
/// directories as needed.
pub fn save(snapshot: &RepertoireSnapshot, path: &Path) -> Result<(), RepertoireError> {
    let io_error = |source| RepertoireError::Io {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(snapshot).map_err(|source| RepertoireError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, json).map_err(io_error)?;

    debug!(path = %path.display(), variants = snapshot.data.len(), "repertoire saved");
    Ok(())
}
