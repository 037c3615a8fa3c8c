//! 分段服务 - 业务能力层
//!
//! 把原始批次文本切成有序题块序列。
//!
//! 切分顺序：
//! 1. 文本中存在 `\begin{ex}...\end{ex}` 配对 → 按结构化标记扫描，无歧义
//! 2. 否则并行跑四种自由文本切分策略，取产出题块数最多的一种
//!
//! "取最多"是没有语法时最便宜的边界判据：切少了会把多道题合并，
//! 切多了也只是产出质量偏低但仍可解析的题块，不会静默丢失内容

use crate::config::ExtractConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::models::QuestionBlock;
use regex::Regex;
use tracing::{debug, info};

const BEGIN_EX: &str = r"\begin{ex}";
const END_EX: &str = r"\end{ex}";

/// 自由文本切分策略，声明顺序即平局裁决顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// 连续两个以上空行
    BlankLines,
    /// 序号题头行（"Câu <N>." / "Câu <N>:"）
    OrdinalHeader,
    /// 标识题头行（"ID:" / "Mã:"）
    IdHeader,
    /// 首选项行（"A." / "A)"）
    FirstChoice,
}

impl SplitStrategy {
    pub fn name(self) -> &'static str {
        match self {
            SplitStrategy::BlankLines => "blank_lines",
            SplitStrategy::OrdinalHeader => "ordinal_header",
            SplitStrategy::IdHeader => "id_header",
            SplitStrategy::FirstChoice => "first_choice",
        }
    }
}

/// 分段服务
pub struct Segmenter {
    re_blank_gap: Regex,
    re_ordinal: Regex,
    re_id_header: Regex,
    re_first_choice: Regex,
    re_choice_line: Regex,
}

impl Segmenter {
    /// 按提取配置编译切分模式
    pub fn new(config: &ExtractConfig) -> ExtractResult<Self> {
        let compile = |name: &'static str, pattern: &str| {
            Regex::new(pattern).map_err(|source| ExtractError::PatternCompile { name, source })
        };
        Ok(Self {
            re_blank_gap: compile("blank_gap", r"\r?\n(?:[ \t]*\r?\n){2,}")?,
            re_ordinal: compile("ordinal_header", &config.ordinal_header_pattern)?,
            re_id_header: compile("id_header", &config.segment_id_header_pattern)?,
            re_first_choice: compile("first_choice", &config.first_choice_pattern)?,
            re_choice_line: compile("choice_line", &config.choice_line_pattern)?,
        })
    }

    /// 切分原始批次
    ///
    /// 空输入产出零个题块，不是错误
    pub fn segment(&self, raw: &str) -> Vec<QuestionBlock> {
        if raw.trim().is_empty() {
            return Vec::new();
        }

        let candidates = if raw.contains(BEGIN_EX) && raw.contains(END_EX) {
            let spans = self.segment_structured(raw);
            if spans.is_empty() {
                // 标记存在但顺序错乱（如 \end 在 \begin 之前），退回自由文本切分
                debug!("结构化标记存在但未扫出配对区间，退回自由文本切分");
                self.best_free_text_split(raw)
            } else {
                spans
            }
        } else {
            self.best_free_text_split(raw)
        };

        candidates
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let text = self.ensure_header(text, index);
                QuestionBlock::new(text, index)
            })
            .collect()
    }

    /// 结构化标记扫描：提取所有不重叠的 \begin{ex}..\end{ex} 区间
    ///
    /// 区间外的首尾文本丢弃；末尾未闭合的开始标记丢弃
    fn segment_structured(&self, raw: &str) -> Vec<String> {
        let mut spans = Vec::new();
        let mut offset = 0;

        while let Some(begin_rel) = raw[offset..].find(BEGIN_EX) {
            let begin = offset + begin_rel;
            match raw[begin..].find(END_EX) {
                Some(end_rel) => {
                    let end = begin + end_rel + END_EX.len();
                    spans.push(raw[begin..end].to_string());
                    offset = end;
                }
                None => break,
            }
        }

        spans
    }

    /// 四种策略各跑一遍，返回 (策略, 候选题块) 列表，按声明顺序
    ///
    /// 对外公开，供直接按策略名核对各策略的产出数量
    pub fn strategy_candidates(&self, raw: &str) -> Vec<(SplitStrategy, Vec<String>)> {
        vec![
            (SplitStrategy::BlankLines, self.split_on_blank_gaps(raw)),
            (
                SplitStrategy::OrdinalHeader,
                self.split_before_matching_lines(raw, &self.re_ordinal),
            ),
            (
                SplitStrategy::IdHeader,
                self.split_before_matching_lines(raw, &self.re_id_header),
            ),
            (
                SplitStrategy::FirstChoice,
                self.split_before_matching_lines(raw, &self.re_first_choice),
            ),
        ]
    }

    /// 选出产出最多的策略（平局取声明顺序靠前者）
    fn best_free_text_split(&self, raw: &str) -> Vec<String> {
        let mut best: Option<(SplitStrategy, Vec<String>)> = None;

        for (strategy, candidates) in self.strategy_candidates(raw) {
            debug!("策略 {} 产出 {} 个候选题块", strategy.name(), candidates.len());
            let better = match &best {
                Some((_, current)) => candidates.len() > current.len(),
                None => true,
            };
            if better {
                best = Some((strategy, candidates));
            }
        }

        let (strategy, candidates) = best.unwrap_or((SplitStrategy::BlankLines, Vec::new()));
        info!(
            "✂️ 选用切分策略 {}，产出 {} 个题块",
            strategy.name(),
            candidates.len()
        );
        candidates
    }

    /// 策略 1：按连续两个以上空行切分
    fn split_on_blank_gaps(&self, raw: &str) -> Vec<String> {
        self.re_blank_gap
            .split(raw)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// 策略 2-4：在匹配行之前开新题块
    fn split_before_matching_lines(&self, raw: &str, re: &Regex) -> Vec<String> {
        let mut candidates = Vec::new();
        let mut current = String::new();

        for line in raw.lines() {
            if re.is_match(line) && !current.trim().is_empty() {
                candidates.push(current.trim().to_string());
                current = String::new();
            }
            current.push_str(line);
            current.push('\n');
        }
        if !current.trim().is_empty() {
            candidates.push(current.trim().to_string());
        }

        candidates
    }

    /// 后处理：以选项行开头、缺少前置题干的题块补一个占位题头
    fn ensure_header(&self, text: String, index: usize) -> String {
        let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        if self.re_choice_line.is_match(first_line) {
            format!("Câu {}: (thiếu phần dẫn)\n{}", index + 1, text)
        } else {
            text
        }
    }
}
