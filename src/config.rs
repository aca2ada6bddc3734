use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path};
use tracing::debug;

/// Settings file looked up next to the bundled archive
pub const CONFIG_FILE_NAME: &str = "cache-seed.toml";

/// Content identifier of the world bundle shipped with the tool
pub const DEFAULT_CONTENT_ID: &str = "00000000000000000000000026000000";

/// Names the tool works with. Every field can be overridden from TOML;
/// missing fields keep their defaults.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// File name of the cache archive, relative to the base directory
    pub archive_name: String,
    /// Cache folder below the VRChat data root
    pub cache_dir: String,
    /// Hash directory VRChat files this bundle under
    pub cache_namespace: String,
    /// Directory name of the bundle itself
    pub content_id: String,
    /// Console title and banner heading
    pub title: String,
    pub world_name: String,
    pub world_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            archive_name: format!("{DEFAULT_CONTENT_ID}.zip"),
            cache_dir: "Cache-WindowsPlayer".to_string(),
            cache_namespace: "DC07F804E3F2FFA5".to_string(),
            content_id: DEFAULT_CONTENT_ID.to_string(),
            title: "ZyaNight Bar".to_string(),
            world_name: "Information".to_string(),
            world_id: "wrld_951da35a-1b9f-4260-973e-5210c89ce693".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("Invalid settings file: {}", path.display()))?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// The cache path segments are cleared before extraction, so each must
    /// name exactly one directory below its parent.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("cache_dir", &self.cache_dir),
            ("cache_namespace", &self.cache_namespace),
            ("content_id", &self.content_id),
        ] {
            if !is_single_segment(value) {
                bail!("`{field}` must be a single directory name, got {value:?}");
            }
        }
        Ok(())
    }

    /// Load `cache-seed.toml` from `base_dir` if it exists, defaults otherwise
    pub fn discover(base_dir: &Path) -> Result<Self> {
        let candidate = base_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

fn is_single_segment(value: &str) -> bool {
    if value.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(value).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_archive_matches_content_id() {
        let settings = Settings::default();
        assert_eq!(settings.archive_name, format!("{}.zip", settings.content_id));
        assert_eq!(settings.cache_dir, "Cache-WindowsPlayer");
    }

    #[test]
    fn test_parse_partial_settings() {
        let toml_str = r#"
content_id = "00000000000000000000000042000000"
world_name = "Rooftop"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.content_id, "00000000000000000000000042000000");
        assert_eq!(settings.world_name, "Rooftop");
        // Untouched fields keep their defaults
        assert_eq!(settings.cache_namespace, "DC07F804E3F2FFA5");
        assert_eq!(settings.archive_name, Settings::default().archive_name);
    }

    #[test]
    fn test_parse_empty_settings() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::discover(temp.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_discover_reads_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "archive_name = \"bundle.zip\"\n",
        )
        .unwrap();

        let settings = Settings::discover(temp.path()).unwrap();
        assert_eq!(settings.archive_name, "bundle.zip");
    }

    #[test]
    fn test_default_settings_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn test_load_rejects_unsafe_segment() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);

        for field in ["cache_dir", "cache_namespace", "content_id"] {
            for value in ["", ".", "..", "../../..", "a/b", "a\\b", "/abs"] {
                fs::write(&path, format!("{field} = '{value}'\n")).unwrap();

                let err = Settings::load(&path).unwrap_err();
                assert!(
                    err.to_string().contains("Invalid settings file"),
                    "{field} = {value:?} was accepted"
                );
                assert!(format!("{err:#}").contains(field));
            }
        }
    }

    #[test]
    fn test_discover_rejects_empty_content_id() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "content_id = \"\"\n").unwrap();

        assert!(Settings::discover(temp.path()).is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "archive_name = [").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
    }
}
