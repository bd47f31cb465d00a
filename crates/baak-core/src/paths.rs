use std::env;
use std::path::PathBuf;

const CONFIG_DIR_NAME: &str = "baak";
const CONFIG_FILE_NAME: &str = "config.json";

/// Return the user's home directory path.
///
/// Uses HOME on Unix-like systems and USERPROFILE on Windows.
pub fn get_home_dir() -> Result<String, String> {
    ["HOME", "USERPROFILE"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.is_empty())
        .ok_or_else(|| "Home directory not set".to_string())
}

/// `~/.config/baak`
pub fn config_dir() -> Result<PathBuf, String> {
    let home = get_home_dir()?;
    Ok(PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME))
}

/// `~/.config/baak/config.json`
pub fn default_config_path() -> Result<PathBuf, String> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}
