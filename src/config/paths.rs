use std::env;
use std::path::{Path, PathBuf};

/// Directory name under the config base.
const APP_DIR: &str = "finscope";

/// Settings file name inside the config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Candidate settings paths in lookup order: `$XDG_CONFIG_HOME` first, then `$HOME/.config`.
fn settings_candidates(home: Option<&str>, xdg_config: Option<&str>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(xdg) = xdg_config.filter(|x| !x.trim().is_empty()) {
        candidates.push(Path::new(xdg).join(APP_DIR).join(SETTINGS_FILE));
    }
    if let Some(h) = home {
        candidates.push(Path::new(h).join(".config").join(APP_DIR).join(SETTINGS_FILE));
    }
    candidates
}

/// Locate an existing settings file, if any.
pub fn resolve_settings_path() -> Option<PathBuf> {
    let home = env::var("HOME").ok();
    let xdg_config = env::var("XDG_CONFIG_HOME").ok();
    settings_candidates(home.as_deref(), xdg_config.as_deref())
        .into_iter()
        .find(|p| p.is_file())
}

/// Config directory: `$XDG_CONFIG_HOME/finscope`, else `$HOME/.config/finscope` (ensured to exist).
pub fn config_dir() -> PathBuf {
    let base = match env::var("XDG_CONFIG_HOME") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => Path::new(&env::var("HOME").unwrap_or_else(|_| ".".to_string())).join(".config"),
    };
    let dir = base.join(APP_DIR);
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Logs directory under config: `<config>/logs` (ensured to exist)
pub fn logs_dir() -> PathBuf {
    let dir = config_dir().join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}
