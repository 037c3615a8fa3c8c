use crate::models::Creator;

/// 题块处理上下文
///
/// 封装单个题块流程需要的批次信息，避免长参数列表
#[derive(Debug, Clone)]
pub struct BlockCtx {
    /// 题块位置（从 0 开始）
    pub block_index: usize,
    /// 批次内题块总数（用于日志）
    pub total_blocks: usize,
    /// 创建者，由调用方会话提供
    pub creator: Creator,
}

impl BlockCtx {
    pub fn new(block_index: usize, total_blocks: usize, creator: Creator) -> Self {
        Self {
            block_index,
            total_blocks,
            creator,
        }
    }

    /// 日志前缀
    pub fn log_prefix(&self) -> String {
        format!("[题块 {}/{}]", self.block_index + 1, self.total_blocks)
    }
}
