use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::core::error::{PushError, Result};

/// Find `folder` one level below the children of `base`.
///
/// Children are visited in name order and the first one containing a `folder`
/// directory wins, so `base/archive/demo` beats `base/work/demo`. Later
/// matches are only logged.
pub fn find_project_folder(base: &Path, folder: &str) -> Result<PathBuf> {
    let not_found = || PushError::ProjectFolderNotFound {
        folder: folder.to_string(),
        base: base.display().to_string(),
    };

    let folder = folder.trim();
    let mut components = Path::new(folder).components();
    let single_name = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_name {
        return Err(not_found());
    }

    let entries = match std::fs::read_dir(base) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("cannot list {}: {}", base.display(), e);
            return Err(not_found());
        }
    };

    let mut parents: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    parents.sort();

    let mut matches = parents
        .into_iter()
        .map(|parent| parent.join(folder))
        .filter(|candidate| candidate.is_dir());

    let found = matches.next().ok_or_else(not_found)?;
    for other in matches {
        warn!(
            "{} also matches; using {}",
            other.display(),
            found.display()
        );
    }

    let found = found.canonicalize().unwrap_or(found);
    debug!("project folder resolved to {}", found.display());
    Ok(found)
}
