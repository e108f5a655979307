use std::path::{Path, PathBuf};

pub fn get_root_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("videotutor")
}

/// Get the path of the TOML config file
pub fn get_config_path() -> PathBuf {
    get_root_config_dir().join("config.toml")
}

/// Get the path of the persisted UI preferences
pub fn get_preferences_path() -> PathBuf {
    get_root_config_dir().join("preferences.json")
}

/// Get the path for an exported notebook inside `dir`
pub fn get_export_path(dir: &Path, video_id: &str) -> PathBuf {
    dir.join(crate::video::export_filename(video_id))
}
