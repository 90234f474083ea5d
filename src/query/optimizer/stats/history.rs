//! 历史统计信息
//!
//! 以日志名称为键，记录查询片段在历次求值中的平均结果规模、
//! 平均选择性以及路径自动机的平均状态数。`StatisticsLog` 提供线程安全的读取，
//! 多个并行的优化过程可以共享同一份日志。

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::core::error::CostResult;

/// 历史统计来源
///
/// 对未记录的名称返回 0（选择性返回区间 (0, 1] 之外的值）。
pub trait HistoricalStatistics: Send + Sync {
    /// 平均结果规模
    fn average_result_size(&self, logging_name: &str) -> f64;

    /// 平均选择性
    fn average_selectivity(&self, logging_name: &str) -> f64;

    /// 路径自动机的平均状态数
    fn average_automaton_size(&self, logging_name: &str) -> f64;
}

/// 增量平均值
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningAverage {
    pub samples: u64,
    pub mean: f64,
}

impl RunningAverage {
    pub fn record(&mut self, value: f64) {
        self.samples += 1;
        self.mean += (value - self.mean) / self.samples as f64;
    }

    /// 没有样本时为 0
    pub fn value(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.mean
        }
    }
}

/// 单个日志名称下的统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub result_size: RunningAverage,
    #[serde(default)]
    pub selectivity: RunningAverage,
    #[serde(default)]
    pub automaton_size: RunningAverage,
}

/// 内存中的历史统计日志
#[derive(Debug, Default)]
pub struct StatisticsLog {
    entries: RwLock<HashMap<String, LogEntry>>,
}

impl StatisticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次求值的结果规模
    pub fn record_result_size(&self, logging_name: &str, size: u64) {
        self.entries
            .write()
            .entry(logging_name.to_string())
            .or_default()
            .result_size
            .record(size as f64);
    }

    /// 记录一次求值的选择性，区间外的值被忽略
    pub fn record_selectivity(&self, logging_name: &str, selectivity: f64) {
        if !(0.0..=1.0).contains(&selectivity) {
            log::warn!("忽略越界的选择性记录: {} = {}", logging_name, selectivity);
            return;
        }
        self.entries
            .write()
            .entry(logging_name.to_string())
            .or_default()
            .selectivity
            .record(selectivity);
    }

    /// 记录一次路径搜索所用自动机的状态数
    pub fn record_automaton_size(&self, logging_name: &str, states: u64) {
        self.entries
            .write()
            .entry(logging_name.to_string())
            .or_default()
            .automaton_size
            .record(states as f64);
    }

    /// 获取某个日志名称的统计
    pub fn entry(&self, logging_name: &str) -> Option<LogEntry> {
        self.entries.read().get(logging_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// 清除所有统计
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// 从 JSON 文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> CostResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let entries: HashMap<String, LogEntry> = serde_json::from_str(&content)?;
        log::info!(
            "已加载历史统计日志: {} ({} 条)",
            path.as_ref().display(),
            entries.len()
        );
        Ok(Self {
            entries: RwLock::new(entries),
        })
    }

    /// 保存为 JSON 文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> CostResult<()> {
        let content = serde_json::to_string_pretty(&*self.entries.read())?;
        fs::write(path, content)?;
        Ok(())
    }

    fn read_value(&self, logging_name: &str, pick: fn(&LogEntry) -> f64) -> f64 {
        self.entries.read().get(logging_name).map(pick).unwrap_or(0.0)
    }
}

impl HistoricalStatistics for StatisticsLog {
    fn average_result_size(&self, logging_name: &str) -> f64 {
        self.read_value(logging_name, |e| e.result_size.value())
    }

    fn average_selectivity(&self, logging_name: &str) -> f64 {
        self.read_value(logging_name, |e| e.selectivity.value())
    }

    fn average_automaton_size(&self, logging_name: &str) -> f64 {
        self.read_value(logging_name, |e| e.automaton_size.value())
    }
}
