//! 提取错误类型
//!
//! 错误分三类：
//! - 分段退化：仅信息性，不构成错误
//! - 提取失败：单题块粒度捕获，降级为 Error 状态记录
//! - 空输入：返回空结果，不是错误
//!
//! 任何错误都不跨题块传播；批次调用本身不会因单题块失败而中断

use thiserror::Error;

/// 单题块提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 花括号不配对（结构化标记损坏）
    #[error("花括号不配对: 位置 {position} 附近，命令 {command}")]
    UnbalancedBrace { command: String, position: usize },

    /// \choice 命令缺少选项槽
    #[error("\\choice 命令格式错误: 期望 4 个选项槽，实际找到 {found} 个")]
    MalformedChoice { found: usize },

    /// 结构化题块缺少可提取内容
    #[error("结构化题块为空: 标记之间没有内容")]
    EmptyStructuredBlock,

    /// 正则模式编译失败（配置错误）
    #[error("正则模式编译失败 ({name}): {source}")]
    PatternCompile {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// 提取结果类型别名
pub type ExtractResult<T> = Result<T, ExtractError>;
