use std::path::PathBuf;

/// Fixed namespace key of the persisted favourites collection.
pub const FAVOURITES_STORAGE_KEY: &str = "artist-showcase-storage";

const APP_DIR: &str = "showcase";

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/showcase/ (XDG standard)
    // instead of macOS Application Support for consistency
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }
    #[cfg(windows)]
    {
        // Portable installs keep their data beside the executable
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_data = exe_dir.join("data");
                if portable_data.exists() {
                    return portable_data;
                }
            }
        }

        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

/// Default location of the favourites file: `<data_dir>/artist-showcase-storage.json`.
pub fn favourites_file() -> PathBuf {
    data_dir().join(format!("{}.json", FAVOURITES_STORAGE_KEY))
}

pub fn log_file() -> PathBuf {
    data_dir().join("showcase.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favourites_file_uses_namespace_key() {
        let path = favourites_file();
        assert!(path.ends_with("artist-showcase-storage.json"));
        assert!(path.starts_with(data_dir()));
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_dirs_are_xdg_style() {
        assert!(data_dir().ends_with(".local/share/showcase"));
        assert!(config_dir().ends_with(".config/showcase"));
    }
}
