use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use phoneclean_core::{
    ColumnClassifier, FormatConfig, DEFAULT_DIGIT_RANGE, DEFAULT_PREVIEW_ROWS,
    DEFAULT_SAMPLE_SIZE, DEFAULT_THRESHOLD,
};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "phoneclean";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub format: FormatConfig,
    pub cleaning: CleaningDefaults,
    pub detection: DetectionConfig,
    pub preview_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleaningDefaults {
    pub merge_columns: bool,
    pub remove_duplicates: bool,
    pub drop_empty_rows: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    pub extra_keywords: Vec<String>,
    pub sample_size: usize,
    pub min_digits: usize,
    pub max_digits: usize,
    pub threshold: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            format: FormatConfig::default(),
            cleaning: CleaningDefaults {
                merge_columns: false,
                remove_duplicates: true,
                drop_empty_rows: false,
            },
            detection: DetectionConfig {
                extra_keywords: Vec::new(),
                sample_size: DEFAULT_SAMPLE_SIZE,
                min_digits: *DEFAULT_DIGIT_RANGE.start(),
                max_digits: *DEFAULT_DIGIT_RANGE.end(),
                threshold: DEFAULT_THRESHOLD,
            },
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl DetectionConfig {
    pub fn classifier(&self) -> ColumnClassifier {
        ColumnClassifier::default()
            .with_keywords(&self.extra_keywords)
            .with_sample_size(self.sample_size)
            .with_digit_range(self.min_digits..=self.max_digits)
            .with_threshold(self.threshold)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid sample_size value: {0}")]
    InvalidSampleSize(usize),
    #[error("invalid digit range: {min}..={max}")]
    InvalidDigitRange { min: usize, max: usize },
    #[error("invalid threshold value: {0}")]
    InvalidThreshold(f64),
    #[error("invalid preview max_rows value: {0}")]
    InvalidPreviewRows(usize),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    format: Option<FormatFile>,
    cleaning: Option<CleaningFile>,
    detection: Option<DetectionFile>,
    preview: Option<PreviewFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FormatFile {
    keep_national_only: Option<bool>,
    include_country_code: Option<bool>,
    whatsapp_format: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CleaningFile {
    merge_columns: Option<bool>,
    remove_duplicates: Option<bool>,
    drop_empty_rows: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetectionFile {
    extra_keywords: Option<Vec<String>>,
    sample_size: Option<usize>,
    min_digits: Option<usize>,
    max_digits: Option<usize>,
    threshold: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PreviewFile {
    max_rows: Option<usize>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(format) = parsed.format {
        if let Some(value) = format.keep_national_only {
            config.format.keep_national_only = value;
        }
        if let Some(value) = format.include_country_code {
            config.format.include_country_code = value;
        }
        if let Some(value) = format.whatsapp_format {
            config.format.whatsapp_format = value;
        }
    }

    if let Some(cleaning) = parsed.cleaning {
        if let Some(value) = cleaning.merge_columns {
            config.cleaning.merge_columns = value;
        }
        if let Some(value) = cleaning.remove_duplicates {
            config.cleaning.remove_duplicates = value;
        }
        if let Some(value) = cleaning.drop_empty_rows {
            config.cleaning.drop_empty_rows = value;
        }
    }

    if let Some(detection) = parsed.detection {
        merge_detection(&mut config.detection, detection)?;
    }

    if let Some(preview) = parsed.preview {
        if let Some(max_rows) = preview.max_rows {
            if max_rows == 0 {
                return Err(ConfigError::InvalidPreviewRows(max_rows));
            }
            config.preview_rows = max_rows;
        }
    }

    Ok(config)
}

fn merge_detection(config: &mut DetectionConfig, parsed: DetectionFile) -> Result<()> {
    if let Some(keywords) = parsed.extra_keywords {
        config.extra_keywords = keywords;
    }
    if let Some(sample_size) = parsed.sample_size {
        if sample_size == 0 {
            return Err(ConfigError::InvalidSampleSize(sample_size));
        }
        config.sample_size = sample_size;
    }
    let min = parsed.min_digits.unwrap_or(config.min_digits);
    let max = parsed.max_digits.unwrap_or(config.max_digits);
    if min > max {
        return Err(ConfigError::InvalidDigitRange { min, max });
    }
    config.min_digits = min;
    config.max_digits = max;
    if let Some(threshold) = parsed.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        config.threshold = threshold;
    }
    Ok(())
}
