//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_pipeline` - 批次提取管线
//! - 分段原始批次（Vec<QuestionBlock>）
//! - 逐题块调用 workflow::BlockFlow
//! - 保证块数守恒与输出顺序
//! - 汇总降级计数
//!
//! ### `app` - 应用编排
//! - 管理应用生命周期（初始化、运行）
//! - 摄入源文件、调用管线、逐条提交记录
//! - 降级记录写 warn.txt
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app (摄入 + 提交，异步 I/O)
//!     ↓
//! batch_pipeline (处理 Vec<QuestionBlock>，同步纯函数)
//!     ↓
//! workflow::BlockFlow (处理单个 QuestionBlock)
//!     ↓
//! services (能力层：segment / extract / classify / assemble / warn)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：app 管 I/O 与提交，batch_pipeline 管纯转换
//! 2. **纯函数核心**：提取管线不做任何网络/磁盘访问
//! 3. **向下依赖**：编排层 → workflow → services
//! 4. **无业务逻辑**：只做调度和统计，不做具体提取判断

pub mod app;
pub mod batch_pipeline;

pub use app::App;
pub use batch_pipeline::{BatchPipeline, BatchResult};
