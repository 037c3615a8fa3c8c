//! 结构化提取服务 - 业务能力层
//!
//! 解析 `\begin{ex}...\end{ex}` 约定的题块：
//! - 标识：`[TL.<数字>]` 标签，其次 "Từ ngân hàng. Câu <数字>" 注释
//! - 题干：开始标记到第一个 `\choice` 之间的文本，剥离命令/注释/方括号选项
//! - 选项：`\choice{A}{B}{C}{D}` 四个花括号槽，`\True` 标记正确项
//! - 解答：第一个 `\loigiai{...}`，`\\` 转为换行
//! - 来源："File gốc: <值>" 注释；标签：`%[Tags:...]` 注释
//!
//! 任何阶段的失败（花括号不配对等）以 ExtractError 返回，
//! 由流程层捕获降级，绝不中断整个批次

use crate::config::ExtractConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::models::{Choice, ExtractedFields, QuestionBlock, QuestionId, SubCount};
use regex::Regex;

const BEGIN_EX: &str = r"\begin{ex}";
const END_EX: &str = r"\end{ex}";
const CHOICE_CMD: &str = r"\choice";
const TRUE_MARKER: &str = r"\True";
const SOLUTION_CMD: &str = r"\loigiai";

/// 结构化提取服务
pub struct StructuredExtractor {
    subcount_prefix: String,
    re_subcount_tag: Regex,
    re_bank_comment: Regex,
    re_true_arg: Regex,
    re_source: Regex,
    re_tags: Regex,
}

impl StructuredExtractor {
    pub fn new(config: &ExtractConfig) -> ExtractResult<Self> {
        let compile = |name: &'static str, pattern: &str| {
            Regex::new(pattern).map_err(|source| ExtractError::PatternCompile { name, source })
        };
        Ok(Self {
            subcount_prefix: config.subcount_prefix.clone(),
            re_subcount_tag: compile("subcount_tag", r"\[(TL\.\d+)\]")?,
            re_bank_comment: compile("bank_comment", r"Từ ngân hàng\.?\s*Câu\s*(\d+)")?,
            re_true_arg: compile("true_arg", r"\\True\s+([^\\{}\r\n]+)")?,
            re_source: compile("source_comment", r"%\s*File gốc:\s*(.+)")?,
            re_tags: compile("tags_comment", r"%\s*\[Tags:([^\]]*)\]")?,
        })
    }

    /// 提取一个结构化题块
    pub fn extract(&self, block: &QuestionBlock) -> ExtractResult<ExtractedFields> {
        let text = &block.text;
        let (inner, begin_option) = Self::inner_span(text)?;

        let mut fields = ExtractedFields {
            question_id: begin_option.as_deref().and_then(QuestionId::from_position_code),
            subcount: self.extract_subcount(text),
            ..Default::default()
        };

        let choice_pos = inner.find(CHOICE_CMD);
        fields.choices = match choice_pos {
            Some(pos) => self.extract_choices(&inner, pos)?,
            None => Vec::new(),
        };

        let stem_end = [choice_pos, inner.find(SOLUTION_CMD)]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(inner.len());
        fields.content = Self::extract_stem(&inner[..stem_end], choice_pos.is_some());
        fields.solution = Self::extract_solution(&inner)?;

        if let Some(caps) = self.re_source.captures(text) {
            fields.source = caps[1].trim().to_string();
        }
        if let Some(caps) = self.re_tags.captures(text) {
            fields.tags = caps[1]
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(fields)
    }

    /// 取开始/结束标记之间的内容，连同开始标记上的方括号选项（若有）
    fn inner_span(text: &str) -> ExtractResult<(String, Option<String>)> {
        let begin = text.find(BEGIN_EX).ok_or(ExtractError::EmptyStructuredBlock)?;
        let mut content_start = begin + BEGIN_EX.len();

        // \begin{ex}[0D1V1-2] 形式的方括号选项
        let mut begin_option = None;
        let after_begin = &text[content_start..];
        let trimmed = after_begin.trim_start();
        if trimmed.starts_with('[') {
            if let Some(close) = trimmed.find(']') {
                begin_option = Some(trimmed[1..close].to_string());
                let skipped_ws = after_begin.len() - trimmed.len();
                content_start += skipped_ws + close + 1;
            }
        }

        let end = text[content_start..]
            .find(END_EX)
            .map(|rel| content_start + rel)
            .ok_or(ExtractError::EmptyStructuredBlock)?;

        let inner = text[content_start..end].to_string();
        if inner.trim().is_empty() {
            return Err(ExtractError::EmptyStructuredBlock);
        }
        Ok((inner, begin_option))
    }

    /// 次级标识：[TL.<数字>] 标签优先，其次题库注释
    fn extract_subcount(&self, text: &str) -> Option<SubCount> {
        if let Some(caps) = self.re_subcount_tag.captures(text) {
            return Some(SubCount::from_text(&caps[1]));
        }
        if let Some(caps) = self.re_bank_comment.captures(text) {
            if let Ok(number) = caps[1].parse::<u32>() {
                return Some(SubCount {
                    prefix: self.subcount_prefix.clone(),
                    number,
                    full_id: format!("{}.{:06}", self.subcount_prefix, number),
                });
            }
        }
        None
    }

    /// 题干：开始标记到第一个 \choice 或 \loigiai 之间的区域；
    /// 区域内无 \choice 时只取第一个非注释行
    fn extract_stem(zone: &str, has_choice: bool) -> String {
        let stem_raw = if has_choice {
            zone.to_string()
        } else {
            zone.lines()
                .map(str::trim)
                .find(|l| !l.is_empty() && !l.starts_with('%'))
                .unwrap_or("")
                .to_string()
        };

        let no_comments: String = stem_raw
            .lines()
            .filter(|l| !l.trim_start().starts_with('%'))
            .collect::<Vec<_>>()
            .join("\n");

        strip_markup(&no_comments)
    }

    /// 解析 \choice{..}{..}{..}{..} 的四个选项槽
    fn extract_choices(&self, inner: &str, choice_pos: usize) -> ExtractResult<Vec<Choice>> {
        let mut cursor = choice_pos + CHOICE_CMD.len();
        let mut slots = Vec::new();

        while slots.len() < 4 {
            let rest = &inner[cursor..];
            let skipped = rest.len() - rest.trim_start().len();
            cursor += skipped;
            if !inner[cursor..].starts_with('{') {
                return Err(ExtractError::MalformedChoice { found: slots.len() });
            }
            let (slot, next) = read_braced_group(inner, cursor, CHOICE_CMD)?;
            slots.push(slot);
            cursor = next;
        }

        let mut choices: Vec<Choice> = slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                let is_correct = slot.contains(TRUE_MARKER);
                Choice {
                    label: ((b'A' + i as u8) as char).to_string(),
                    text: strip_markup(&slot),
                    is_correct,
                }
            })
            .collect();

        // 槽内无 \True 标记时，用单独捕获的 "\True <文本>" 参数按文本精确匹配兜底
        if !choices.iter().any(|c| c.is_correct) {
            if let Some(caps) = self.re_true_arg.captures(inner) {
                let target = strip_markup(&caps[1]);
                if let Some(choice) = choices.iter_mut().find(|c| c.text == target) {
                    choice.is_correct = true;
                }
            }
        }

        Ok(choices)
    }

    /// 解答：第一个 \loigiai{...}，不存在时为空
    fn extract_solution(inner: &str) -> ExtractResult<String> {
        let pos = match inner.find(SOLUTION_CMD) {
            Some(pos) => pos,
            None => return Ok(String::new()),
        };

        let mut cursor = pos + SOLUTION_CMD.len();
        let rest = &inner[cursor..];
        cursor += rest.len() - rest.trim_start().len();
        if !inner[cursor..].starts_with('{') {
            return Err(ExtractError::UnbalancedBrace {
                command: SOLUTION_CMD.to_string(),
                position: cursor,
            });
        }

        let (body, _) = read_braced_group(inner, cursor, SOLUTION_CMD)?;
        // 换行命令先于剥离转成真实换行
        let body = body.replace(r"\\", "\n");
        Ok(strip_markup(&body))
    }
}

/// 从 start（必须指向 '{'）读取一个配对花括号组
///
/// 返回组内文本与结束括号之后的索引；转义的 \{ \} 不参与配对
fn read_braced_group(text: &str, start: usize, command: &str) -> ExtractResult<(String, usize)> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((text[start + 1..i].to_string(), i + 1));
                }
            }
            _ => {}
        }
        i += 1;
    }

    Err(ExtractError::UnbalancedBrace {
        command: command.to_string(),
        position: start,
    })
}

/// 剥离常见数学标记命令，压缩空白
///
/// 保留正文与公式内容本身，只去掉排版命令
fn strip_markup(text: &str) -> String {
    let mut out = text.replace(TRUE_MARKER, "");
    for cmd in [
        r"\displaystyle",
        r"\left",
        r"\right",
        r"\limits",
        r"\quad",
        r"\qquad",
        r"\immini",
        r"\,",
        r"\;",
        r"\!",
    ] {
        out = out.replace(cmd, " ");
    }
    out = out.replace('$', "");

    // 逐行压缩空白，保留行结构
    out.lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> StructuredExtractor {
        StructuredExtractor::new(&ExtractConfig::default()).expect("提取模式应能编译")
    }

    fn block(text: &str) -> QuestionBlock {
        QuestionBlock::new(text.to_string(), 0)
    }

    #[test]
    fn test_canonical_markup_round_trip() {
        let ex = extractor();
        let b = block(r"\begin{ex} Stem \choice{\True A}{B}{C}{D} \loigiai{Sol} \end{ex}");
        let fields = ex.extract(&b).expect("规范标记应能提取");

        assert!(fields.content.contains("Stem"));
        assert_eq!(fields.choices.len(), 4);
        assert!(fields.choices[0].is_correct);
        assert_eq!(fields.choices[0].text, "A");
        assert!(!fields.choices[1].is_correct);
        assert_eq!(fields.solution, "Sol");
    }

    #[test]
    fn test_nested_braces_in_choice() {
        let ex = extractor();
        let b = block(r"\begin{ex} Tính \choice{\True $\frac{1}{2}$}{$\frac{1}{3}$}{2}{3} \end{ex}");
        let fields = ex.extract(&b).expect("嵌套花括号应能解析");
        assert_eq!(fields.choices.len(), 4);
        assert!(fields.choices[0].is_correct);
        assert!(fields.choices[0].text.contains(r"\frac{1}{2}"));
    }

    #[test]
    fn test_unterminated_choice_is_error() {
        let ex = extractor();
        let b = block(r"\begin{ex} Stem \choice{A}{B \end{ex}");
        let err = ex.extract(&b).expect_err("花括号不配对应报错");
        assert!(matches!(err, ExtractError::UnbalancedBrace { .. }));
    }

    #[test]
    fn test_too_few_choice_slots_is_error() {
        let ex = extractor();
        let b = block(r"\begin{ex} Stem \choice{A}{B} còn lại là văn xuôi \end{ex}");
        let err = ex.extract(&b).expect_err("槽数不足应报错");
        assert!(matches!(err, ExtractError::MalformedChoice { found: 2 }));
    }

    #[test]
    fn test_true_arg_disambiguation() {
        let ex = extractor();
        // \True 不在槽内，按单独参数的文本精确匹配
        let b = block("\\begin{ex} Stem \\choice{3}{4}{5}{6}\n% \\True 4\n\\loigiai{x}\n\\end{ex}");
        let fields = ex.extract(&b).expect("应能提取");
        assert!(fields.choices[1].is_correct);
        assert!(!fields.choices[0].is_correct);
    }

    #[test]
    fn test_begin_option_question_id() {
        let ex = extractor();
        let b = block(r"\begin{ex}[0D1V1-2] Stem \choice{\True A}{B}{C}{D} \end{ex}");
        let fields = ex.extract(&b).expect("应能提取");
        let id = fields.question_id.expect("方括号选项应解析为主标识");
        assert_eq!(id.full_id, "0D1V1-2");
        assert_eq!(id.level.description, "Vận dụng");
        assert!(fields.content.contains("Stem"));
    }

    #[test]
    fn test_subcount_tag_and_bank_comment() {
        let ex = extractor();
        let b = block("\\begin{ex}\n%[TL.069761]\nStem\n\\choice{\\True A}{B}{C}{D}\n\\end{ex}");
        let fields = ex.extract(&b).expect("应能提取");
        assert_eq!(fields.subcount.expect("应捕获 TL 标签").full_id, "TL.069761");

        let b = block("\\begin{ex}\n% Từ ngân hàng. Câu 42\nStem\n\\choice{\\True A}{B}{C}{D}\n\\end{ex}");
        let fields = ex.extract(&b).expect("应能提取");
        let sc = fields.subcount.expect("应捕获题库注释");
        assert_eq!(sc.number, 42);
        assert_eq!(sc.full_id, "TL.000042");
    }

    #[test]
    fn test_solution_line_breaks() {
        let ex = extractor();
        let b = block(r"\begin{ex} Stem \choice{\True A}{B}{C}{D} \loigiai{dòng một \\ dòng hai} \end{ex}");
        let fields = ex.extract(&b).expect("应能提取");
        assert_eq!(fields.solution, "dòng một\ndòng hai");
    }

    #[test]
    fn test_source_and_tags_comments() {
        let ex = extractor();
        let b = block(
            "\\begin{ex}\nStem\n\\choice{\\True A}{B}{C}{D}\n%[Tags: hàm số, đạo hàm]\n\\end{ex}\n% File gốc: de_thi_2024.tex",
        );
        let fields = ex.extract(&b).expect("应能提取");
        assert_eq!(fields.source, "de_thi_2024.tex");
        assert_eq!(fields.tags, vec!["hàm số", "đạo hàm"]);
    }

    #[test]
    fn test_stem_excludes_inline_solution() {
        let ex = extractor();
        let b = block(r"\begin{ex} Chứng minh đẳng thức. \loigiai{Biến đổi vế trái} \end{ex}");
        let fields = ex.extract(&b).expect("应能提取");
        assert_eq!(fields.content, "Chứng minh đẳng thức.");
        assert_eq!(fields.solution, "Biến đổi vế trái");
    }

    #[test]
    fn test_stem_without_choice_takes_first_noncomment_line() {
        let ex = extractor();
        let b = block("\\begin{ex}\n% chú thích\nChứng minh rằng tổng hai số lẻ là số chẵn.\n\\loigiai{Hiển nhiên}\n\\end{ex}");
        let fields = ex.extract(&b).expect("应能提取");
        assert!(fields.content.starts_with("Chứng minh"));
        assert!(fields.choices.is_empty());
        assert_eq!(fields.solution, "Hiển nhiên");
    }
}
