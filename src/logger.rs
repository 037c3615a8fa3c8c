//! 日志初始化
//!
//! 控制台输出走 tracing，级别由 RUST_LOG 控制，默认 info

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
