use super::types::GameConfig;
use crate::constants::{CONFIG_APP_NAME, CONFIG_FILE_NAME};
use directories::ProjectDirs;
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where the configuration lives when no path is given.
///
/// `<platform config dir>/gacha-planner/game.json`; the directory is not
/// created.
pub fn default_config_path() -> io::Result<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", CONFIG_APP_NAME).ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Could not determine config directory")
    })?;
    Ok(project_dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Parse a configuration document.
///
/// Malformed JSON or records that do not match the schema are
/// `InvalidData` errors.
pub fn parse_game_config(json: &str) -> io::Result<GameConfig> {
    let config: GameConfig =
        serde_json::from_str(json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    debug!(
        "parsed game config {}: {} pity systems, {} banners, {} packs",
        config.id,
        config.pity_systems.len(),
        config.banners.len(),
        config.recharge_packs.len()
    );
    Ok(config)
}

/// Read and parse a configuration file. A missing file keeps its `NotFound`
/// kind.
pub fn load_game_config(path: &Path) -> io::Result<GameConfig> {
    let json = fs::read_to_string(path)?;
    let config = parse_game_config(&json)?;
    info!("loaded {} from {}", config.name, path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "id": "demo",
        "name": "Demo",
        "defaultMainCurrencyId": "gem",
        "defaultPremiumCurrencyId": "crystal"
    }"#;

    #[test]
    fn test_parse_minimal() {
        let config = parse_game_config(MINIMAL).unwrap();
        assert_eq!(config.id, "demo");
        assert!(config.banners.is_empty());
        assert!(config.exchange_rates.is_empty());
    }

    #[test]
    fn test_malformed_is_invalid_data() {
        let err = parse_game_config("{ not json").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err = parse_game_config(r#"{"id": "x"}"#).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_game_config(Path::new("/nonexistent/gacha/game.json")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("gacha-planner-{}.json", std::process::id()));
        fs::write(&path, MINIMAL).unwrap();
        let config = load_game_config(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.name, "Demo");
    }

    #[test]
    fn test_default_path_file_name() {
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with(Path::new(CONFIG_APP_NAME).join(CONFIG_FILE_NAME)));
        }
    }
}
