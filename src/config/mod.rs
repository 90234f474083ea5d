use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::query::optimizer::cost::{CostModelKind, CostWeights};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub estimator: EstimatorConfig,
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "graphdb-cost".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

/// 代价估算配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EstimatorConfig {
    /// 使用的代价模型
    pub model: CostModelKind,
    /// 基于日志的模型对历史统计的信任程度，[0, 1]
    pub trust_factor: f64,
    /// 历史统计日志文件（JSON）
    pub statistics_log: Option<PathBuf>,
    pub weights: CostWeights,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            model: CostModelKind::Structural,
            trust_factor: 0.5,
            statistics_log: None,
            weights: CostWeights::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        if let Some(log_path) = config.estimator.statistics_log.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.estimator.statistics_log = Some(Config::resolve_path(&log_path, base)?);
        }
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 解析配置中的路径：`~` 开头相对于用户主目录，其他相对路径相对于配置文件所在目录
    fn resolve_path(path: &Path, base: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }

        if let Ok(rest) = path.strip_prefix("~") {
            #[allow(deprecated)]
            let home_dir = env::home_dir().ok_or("无法获取用户主目录")?;
            return Ok(home_dir.join(rest));
        }

        Ok(base.join(path))
    }
}
