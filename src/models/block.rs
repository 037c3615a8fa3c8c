use serde::{Deserialize, Serialize};

/// 题块提取模式
///
/// 决定一个题块走结构化标记提取还是自由文本启发式提取
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockMode {
    /// 结构化标记（\begin{ex}...\end{ex} 约定）
    Structured,
    /// 自由文本（无闭合标记，仅靠模式启发式）
    FreeText,
}

impl BlockMode {
    /// 检测题块模式
    ///
    /// 判定规则：同时包含 `\begin{ex}` 和 `\end{ex}` 才算结构化题块
    pub fn detect(text: &str) -> Self {
        if text.contains(r"\begin{ex}") && text.contains(r"\end{ex}") {
            BlockMode::Structured
        } else {
            BlockMode::FreeText
        }
    }
}

/// 题块
///
/// 分段器切出的一段原文，认为恰好包含一道题目。
/// 创建后不再修改，由提取器消费一次。
#[derive(Debug, Clone)]
pub struct QuestionBlock {
    /// 原文片段
    pub text: String,
    /// 在批次中的位置（从 0 开始）
    pub index: usize,
    /// 检测到的提取模式
    pub mode: BlockMode,
}

impl QuestionBlock {
    /// 创建新题块，创建时完成一次模式检测
    pub fn new(text: String, index: usize) -> Self {
        let mode = BlockMode::detect(&text);
        Self { text, index, mode }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_structured() {
        let text = r"\begin{ex} Nội dung \end{ex}";
        assert_eq!(BlockMode::detect(text), BlockMode::Structured);
    }

    #[test]
    fn test_detect_free_text_when_unterminated() {
        // 只有开始标记不算结构化
        let text = r"\begin{ex} Nội dung";
        assert_eq!(BlockMode::detect(text), BlockMode::FreeText);
    }

    #[test]
    fn test_detect_plain_text() {
        assert_eq!(BlockMode::detect("Câu 1: 2+2=?"), BlockMode::FreeText);
    }
}
