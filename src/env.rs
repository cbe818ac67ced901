//! Environment constants and path utilities for smart-todo.
//!
//! This module centralizes the hardcoded names, environment variables and
//! defaults used throughout the application, making them easier to maintain.

use std::path::{Path, PathBuf};

/// Main application directory name (hidden directory like .git, .vscode)
pub const APP_DIR_NAME: &str = ".smart-todo";

/// Configuration file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name looked up directly in the current directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "smart-todo.toml";

/// System-wide configuration file (Unix-like systems)
pub const SYSTEM_CONFIG_FILE: &str = "/etc/smart-todo/config.toml";

/// Environment variables that override configuration values
pub mod vars {
    /// Base URL for both the task store and the enrichment service
    pub const API_URL: &str = "SMART_TODO_API_URL";

    /// Base URL for the enrichment service only; wins over `API_URL`
    pub const AI_URL: &str = "SMART_TODO_AI_URL";
}

/// Defaults shared by configuration and the workflows
pub mod defaults {
    /// Base URL of the backend REST API
    pub const API_BASE_URL: &str = "http://localhost:8000/api/";

    /// Timeout applied to task store calls
    pub const STORE_TIMEOUT_SECS: u64 = 30;

    /// Timeout applied to enrichment calls; model inference is slow
    pub const ENRICHMENT_TIMEOUT_SECS: u64 = 60;

    /// Priority assigned when no usable enrichment is available
    pub const PRIORITY_SCORE: u8 = 3;

    /// Category assigned when no usable enrichment is available
    pub const CATEGORY: &str = "Uncategorized";

    /// Maximum deadline distance, in days, for two tasks to conflict
    pub const CONFLICT_WINDOW_DAYS: i64 = 2;

    /// Completion percentage at which a task no longer conflicts
    pub const COMPLETION_EXEMPTION: u8 = 90;

    /// Number of conflicts that requires user confirmation before rescoring
    pub const CONFIRMATION_THRESHOLD: usize = 2;

    /// Concurrent enrichment requests issued by the import pipeline
    pub const IMPORT_CONCURRENCY: usize = 1;
}

/// Build the application directory path from a root directory
pub fn app_dir_path(root: &Path) -> PathBuf {
    root.join(APP_DIR_NAME)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    app_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build local config file path in current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    app_dir_path(current_dir).join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        let home_dir = Path::new("/home/user");
        let current_dir = Path::new("/current/project");

        assert_eq!(
            user_config_file_path(home_dir),
            Path::new("/home/user/.smart-todo/config.toml")
        );

        assert_eq!(
            local_config_file_path(current_dir),
            Path::new("/current/project/.smart-todo/config.toml")
        );
    }
}
