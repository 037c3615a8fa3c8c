//! # Exam Extract Submit
//!
//! 把大段考试题目文本批量转换为规范的 16 字段题库记录
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 题块、记录与标识符类型
//! - `QuestionBlock` - 分段产物，创建后不可变
//! - `ExtractedQuestion` - 规范输出记录
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个题块
//! - `Segmenter` - 结构化扫描 / 四策略自由文本切分能力
//! - `StructuredExtractor` / `HeuristicExtractor` - 双模式字段提取能力
//! - `TypeClassifier` - 五类题型判定能力
//! - `Assembler` - 记录装配与降级能力
//! - `WarnWriter` - 写 warn.txt 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个题块"的完整处理流程
//! - `BlockCtx` - 上下文封装（位置 + 创建者）
//! - `BlockFlow` - 流程编排（模式分派 → 提取 → 判型 → 装配）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_pipeline` - 批次提取管线，同步纯函数
//! - `orchestrator/app` - 应用编排，摄入源文件并逐条提交记录
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod workflow;

// 重新导出常用类型
pub use clients::BankClient;
pub use config::{Config, ExtractConfig};
pub use error::{ExtractError, ExtractResult};
pub use models::{
    BlockMode, Choice, CorrectAnswer, Creator, ExtractedQuestion, QuestionBlock, QuestionId,
    QuestionType, StatusCode, SubCount,
};
pub use orchestrator::{App, BatchPipeline, BatchResult};
pub use services::{ExtractOutcome, Segmenter, SplitStrategy};
pub use workflow::{BlockCtx, BlockFlow};
