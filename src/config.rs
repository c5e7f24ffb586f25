//! 設定ファイル（config.yml）
//!
//! 読み込み順: --config 指定 → ./config.yml → ~/.config/plate-pioneer/config.yml → 既定値

use crate::error::{PioneerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub file_paths: FilePaths,
    pub sheet_names: SheetNames,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FilePaths {
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SheetNames {
    pub metadata: String,
    pub results: String,
    pub antibodies: String,
    pub concentrations: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            metadata: "experiment_meta".into(),
            results: "results".into(),
            antibodies: "ta_map".into(),
            concentrations: "concentration_map".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("experiments.db"),
            table: "experiments".into(),
        }
    }
}

impl Config {
    /// 設定を読み込む
    ///
    /// `explicit` が指定された場合はそのファイルが存在しなければエラー。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(PioneerError::FileNotFound(path.display().to_string()));
            }
            return Self::load_from(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from(&local);
        }

        if let Ok(user) = Self::user_config_path() {
            if user.exists() {
                return Self::load_from(&user);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn user_config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| PioneerError::Config("設定ディレクトリが見つかりません".into()))?;
        Ok(dir.join("plate-pioneer").join(LOCAL_CONFIG_FILE))
    }

    /// シート名とDB設定が空でないことを確認
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("sheet_names.metadata", self.sheet_names.metadata.as_str()),
            ("sheet_names.results", self.sheet_names.results.as_str()),
            ("sheet_names.antibodies", self.sheet_names.antibodies.as_str()),
            ("sheet_names.concentrations", self.sheet_names.concentrations.as_str()),
            ("database.table", self.database.table.as_str()),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(PioneerError::Config(format!("{} が空です", key)));
            }
        }
        Ok(())
    }

    pub fn input_file(&self) -> Result<&Path> {
        self.file_paths
            .input_file
            .as_deref()
            .ok_or_else(|| PioneerError::Config("file_paths.input_file が設定されていません".into()))
    }

    pub fn output_file(&self) -> Result<&Path> {
        self.file_paths
            .output_file
            .as_deref()
            .ok_or_else(|| PioneerError::Config("file_paths.output_file が設定されていません".into()))
    }
}
