/// Join a remote directory and a filename with a single `/`.
///
/// Remote paths are always POSIX, so this works on strings rather than
/// `std::path`, which would use the local separator on Windows.
#[must_use]
pub fn remote_file_path(directory: &str, filename: &str) -> String {
    if directory.is_empty() {
        filename.to_string()
    } else if directory.ends_with('/') {
        format!("{directory}{filename}")
    } else {
        format!("{directory}/{filename}")
    }
}

/// Simple tilde expansion for local paths
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home.display().to_string();
        }
    }
    if let Some(suffix) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{suffix}", home.display());
        }
    }
    path.to_string()
}
