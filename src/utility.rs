//! Path helpers for the client's settings and log files.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

const APP_DIR_NAME: &str = ".level3client";

/// Resolve the application directory: a `.level3client` folder in the
/// current working directory wins, otherwise one under the home directory
/// (created on first use).
fn resolve_app_dir(dir_name: &str) -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let local = cwd.join(dir_name);
    if local.exists() {
        return local;
    }

    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let app_dir = home.join(dir_name);
    if !app_dir.exists() {
        let _ = fs::create_dir_all(&app_dir);
    }
    app_dir
}

/// Application directory
pub static APP_DIR: LazyLock<PathBuf> = LazyLock::new(|| resolve_app_dir(APP_DIR_NAME));

/// Path for a file inside the application directory.
pub fn get_file_path(filename: &str) -> PathBuf {
    APP_DIR.join(filename)
}

/// Path for a folder inside the application directory, created if needed.
pub fn get_folder_path(folder_name: &str) -> PathBuf {
    let folder_path = APP_DIR.join(folder_name);
    if !folder_path.exists() {
        let _ = fs::create_dir_all(&folder_path);
    }
    folder_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_path_is_under_app_dir() {
        let path = get_file_path("rpc_setting.json");
        assert!(path.starts_with(&*APP_DIR));
        assert_eq!(path.file_name().unwrap(), "rpc_setting.json");
    }
}
