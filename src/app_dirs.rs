use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "spotdiff";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
        } else {
            Self::project()
                .map(|pd| pd.data_local_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("spotdiff_config.json"))
    }

    /// Where saved custom games live
    pub fn store_dir() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_dir().join("games"))
            .unwrap_or_else(|| PathBuf::from("spotdiff_games"))
    }

    pub fn results_path() -> PathBuf {
        Self::state_dir().join("results.csv")
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir().join("spotdiff.log")
    }
}
