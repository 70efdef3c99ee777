use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Location of the preferences file under the platform config dir.
    pub fn config_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "typometer") {
            proj_dirs.config_dir().join("config.json")
        } else {
            PathBuf::from("typometer_config.json")
        }
    }
}
