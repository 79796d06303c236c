use std::path::PathBuf;

const APP_DIR: &str = "mediadex";

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/mediadex/ (XDG standard)
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
        // Portable installs keep a data/ directory beside the executable
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
    #[cfg(windows)]
    {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_config = exe_dir.join("config.toml");
                if portable_config.exists() {
                    return exe_dir.to_path_buf();
                }
            }
        }
    }

    // On macOS and Linux, always use ~/.config/mediadex/
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

/// Log file written by the `mediadex` binary.
pub fn log_path() -> PathBuf {
    data_dir().join("mediadex.log")
}
