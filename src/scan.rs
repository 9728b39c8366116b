//! Local discovery of order exports waiting to be uploaded.

use std::path::{Path, PathBuf};

/// One file to upload. The remote name is the local filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTask {
    pub local_path: PathBuf,
    pub remote_filename: String,
}

/// Find files in `folder` ending in `.<extension>`, optionally restricted to
/// names containing `date_token`.
///
/// A missing or unreadable folder is logged and yields no tasks. Results are
/// sorted by filename.
pub fn find_transfer_tasks(
    folder: &Path,
    extension: &str,
    date_token: Option<&str>,
) -> Vec<TransferTask> {
    if !folder.is_dir() {
        tracing::error!("Folder not found: {}", folder.display());
        return Vec::new();
    }

    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to read folder {}: {}", folder.display(), e);
            return Vec::new();
        }
    };

    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let mut tasks = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {}: {}", folder.display(), e);
                continue;
            }
        };

        let Ok(filename) = entry.file_name().into_string() else {
            tracing::debug!("Skipping non UTF-8 filename {:?}", entry.file_name());
            continue;
        };

        if !matches_export(&filename, &suffix, date_token) {
            continue;
        }

        let path = entry.path();
        if !path.is_file() {
            tracing::debug!("Skipping {}: not a regular file", path.display());
            continue;
        }

        tasks.push(TransferTask {
            local_path: path,
            remote_filename: filename,
        });
    }

    tasks.sort_by(|a, b| a.remote_filename.cmp(&b.remote_filename));
    tasks
}

fn matches_export(filename: &str, suffix: &str, date_token: Option<&str>) -> bool {
    if !filename.ends_with(suffix) {
        return false;
    }
    date_token.map_or(true, |token| filename.contains(token))
}

#[cfg(test)]
mod tests {
    use super::matches_export;

    #[test]
    fn suffix_must_match_exactly() {
        assert!(matches_export("orders.mer", ".mer", None));
        assert!(!matches_export("orders.mer.bak", ".mer", None));
        assert!(!matches_export("orders.MER", ".mer", None));
    }

    #[test]
    fn date_token_is_a_substring_match() {
        assert!(matches_export("orders20240501.mer", ".mer", Some("20240501")));
        assert!(matches_export("20240501-export.mer", ".mer", Some("20240501")));
        assert!(!matches_export("orders20240502.mer", ".mer", Some("20240501")));
    }
}
