//! # 日志初始化模块

use env_logger::Builder;
use log::LevelFilter;

/// 将 `-v` 的次数映射为日志级别。
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// 初始化日志系统，日志输出到标准错误。
///
/// 默认级别由 `verbosity` 决定，设置了 `RUST_LOG` 时以其为准。
pub fn init_logger(verbosity: u8) {
    Builder::new()
        .filter_level(level_for(verbosity))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}
