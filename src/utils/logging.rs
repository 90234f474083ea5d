//! 估算器日志
//!
//! 命令行估算器把每个节点的估算过程写入滚动日志文件，
//! 警告及以上级别同时输出到标准错误，便于在终端看到失败的估算。
//! `RUST_LOG` 环境变量优先于配置文件中的日志级别。

use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use parking_lot::Mutex;

use crate::config::LogConfig;

/// 进程内唯一的日志句柄，退出前由 `shutdown` 取走并 flush
static HANDLE: Mutex<Option<LoggerHandle>> = Mutex::new(None);

/// 按配置启动日志
///
/// 已经启动时直接返回，`log` 门面只允许设置一次全局日志器。
///
/// ```no_run
/// use graphdb_cost::config::LogConfig;
/// use graphdb_cost::utils::logging;
///
/// logging::init(&LogConfig::default()).expect("日志初始化失败");
/// log::debug!("节点代价已计算");
/// logging::shutdown();
/// ```
pub fn init(config: &LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut slot = HANDLE.lock();
    if slot.is_some() {
        return Ok(());
    }

    let files = FileSpec::default()
        .directory(&config.dir)
        .basename(&config.file);
    let handle = Logger::try_with_env_or_str(&config.level)?
        .log_to_file(files)
        .duplicate_to_stderr(Duplicate::Warn)
        .rotate(
            Criterion::Size(config.max_file_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.max_files),
        )
        .write_mode(WriteMode::Async)
        .append()
        .start()?;
    *slot = Some(handle);
    drop(slot);

    log::info!(
        "估算器日志已启动: 级别 {}, 目录 {}, 文件名 {}",
        config.level,
        config.dir,
        config.file
    );
    Ok(())
}

/// 写出异步缓冲中的日志并释放句柄
pub fn shutdown() {
    // 句柄 drop 时等待异步写线程结束
    if let Some(handle) = HANDLE.lock().take() {
        handle.flush();
    }
}

pub fn is_initialized() -> bool {
    HANDLE.lock().is_some()
}
