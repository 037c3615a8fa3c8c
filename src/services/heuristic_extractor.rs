//! 启发式提取服务 - 业务能力层
//!
//! 解析无闭合标记的自由文本题块。题块视为非空行的有序序列，
//! 各字段按固定优先级的模式列表首配即中，缺失一律给空值而不是报错。
//!
//! 两条刻意保留的有损默认规则（改动会改变可观察输出）：
//! - 无任何正确标记时，强制第一个选项为正确
//! - 题干超过上限字符数时截断并加省略号（显示安全，不是正确性要求）

use crate::config::ExtractConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::models::{Choice, ExtractedFields, QuestionBlock, QuestionId, SubCount};
use regex::Regex;

/// 启发式提取服务
pub struct HeuristicExtractor {
    max_content_len: usize,
    re_ordinal: Regex,
    re_first_choice: Regex,
    re_choices: Vec<Regex>,
    re_ids: Vec<Regex>,
    re_solutions: Vec<Regex>,
    re_sources: Vec<Regex>,
    re_tags: Vec<Regex>,
}

impl HeuristicExtractor {
    pub fn new(config: &ExtractConfig) -> ExtractResult<Self> {
        let compile = |name: &'static str, pattern: &str| {
            Regex::new(pattern).map_err(|source| ExtractError::PatternCompile { name, source })
        };
        let compile_all = |name: &'static str, patterns: &[String]| {
            patterns
                .iter()
                .map(|p| compile(name, p))
                .collect::<ExtractResult<Vec<_>>>()
        };

        Ok(Self {
            max_content_len: config.max_content_len,
            re_ordinal: compile("ordinal_header", &config.ordinal_header_pattern)?,
            re_first_choice: compile("first_choice", &config.first_choice_pattern)?,
            re_choices: compile_all("choice", &config.choice_patterns)?,
            re_ids: compile_all("id_header", &config.id_header_patterns)?,
            re_solutions: compile_all("solution", &config.solution_patterns)?,
            re_sources: compile_all("source", &config.source_patterns)?,
            re_tags: compile_all("tags", &config.tag_patterns)?,
        })
    }

    /// 提取一个自由文本题块
    ///
    /// 本路径的缺失字段一律取空值，正常情况下不会返回错误
    pub fn extract(&self, block: &QuestionBlock) -> ExtractResult<ExtractedFields> {
        let lines: Vec<&str> = block
            .text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let mut fields = ExtractedFields::default();
        if lines.is_empty() {
            return Ok(fields);
        }

        fields.choices = self.extract_choices(&lines);
        fields.content = self.resolve_stem(&lines);

        if let Some(raw_id) = self.first_capture(&lines, &self.re_ids) {
            match QuestionId::from_position_code(&raw_id) {
                Some(id) => fields.question_id = Some(id),
                None => fields.subcount = Some(SubCount::from_text(&raw_id)),
            }
        }

        if let Some(solution) = self.first_capture(&lines, &self.re_solutions) {
            fields.solution = solution;
        }
        if let Some(source) = self.first_capture(&lines, &self.re_sources) {
            fields.source = source;
        }
        if let Some(tag_line) = self.first_capture(&lines, &self.re_tags) {
            fields.tags = tag_line
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(fields)
    }

    /// 选项提取：每行按三种模式顺序测试，首配即中
    ///
    /// 匹配行中任意位置的 `*` 标记该选项正确（显示文本中剥去）。
    /// 无任何正确标记时强制第一个选项为正确
    fn extract_choices(&self, lines: &[&str]) -> Vec<Choice> {
        let mut choices = Vec::new();

        for line in lines {
            for re in &self.re_choices {
                if let Some(caps) = re.captures(line) {
                    let is_correct = line.contains('*');
                    let text = caps[2].replace('*', "").trim().to_string();
                    choices.push(Choice {
                        label: caps[1].to_string(),
                        text,
                        is_correct,
                    });
                    break;
                }
            }
        }

        if !choices.is_empty() && !choices.iter().any(|c| c.is_correct) {
            choices[0].is_correct = true;
        }

        choices
    }

    /// 题干解析，按优先级：
    /// (a) "Câu <N>." 行去掉前缀；
    /// (b) 位置 > 0 的首选项行之前的所有行拼接；
    /// (c) 第一个不属于标识/选项/解答/来源/标签模式的行；
    /// (d) 第一行原样
    fn resolve_stem(&self, lines: &[&str]) -> String {
        let stem = if let Some(line) = lines.iter().find(|l| self.re_ordinal.is_match(l)) {
            let m = self.re_ordinal.find(line).map(|m| m.end()).unwrap_or(0);
            line[m..].trim().to_string()
        } else if let Some(pos) = lines
            .iter()
            .position(|l| self.re_first_choice.is_match(l))
            .filter(|&pos| pos > 0)
        {
            lines[..pos].join(" ")
        } else if let Some(line) = lines.iter().find(|l| !self.is_metadata_line(l)) {
            line.to_string()
        } else {
            lines[0].to_string()
        };

        truncate_content(&stem, self.max_content_len)
    }

    /// 标识/选项/解答/来源/标签行判定（题干兜底规则用）
    fn is_metadata_line(&self, line: &str) -> bool {
        self.re_ids.iter().any(|re| re.is_match(line))
            || self.re_choices.iter().any(|re| re.is_match(line))
            || self.re_solutions.iter().any(|re| re.is_match(line))
            || self.re_sources.iter().any(|re| re.is_match(line))
            || self.re_tags.iter().any(|re| re.is_match(line))
    }

    /// 跨行首配即中，返回首个捕获值
    fn first_capture(&self, lines: &[&str], patterns: &[Regex]) -> Option<String> {
        for re in patterns {
            for line in lines {
                if let Some(caps) = re.captures(line) {
                    return Some(caps[1].trim().to_string());
                }
            }
        }
        None
    }
}

/// 截断长题干用于显示（按字符计数，保留多字节文本完整）
fn truncate_content(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> HeuristicExtractor {
        HeuristicExtractor::new(&ExtractConfig::default()).expect("提取模式应能编译")
    }

    fn block(text: &str) -> QuestionBlock {
        QuestionBlock::new(text.to_string(), 0)
    }

    #[test]
    fn test_free_text_fallback_example() {
        let ex = extractor();
        let b = block("Câu 1: 2+2=?\nA. 3\nB. 4*\nC. 5\nD. 6");
        let fields = ex.extract(&b).expect("自由文本提取不应失败");

        assert_eq!(fields.content, "2+2=?");
        assert_eq!(fields.choices.len(), 4);
        assert!(fields.choices[1].is_correct);
        assert_eq!(fields.choices[1].text, "4");
        assert!(!fields.choices[0].is_correct);
    }

    #[test]
    fn test_force_first_choice_correct_when_unmarked() {
        let ex = extractor();
        let b = block("Câu 3: chọn một\nA. một\nB. hai\nC. ba\nD. bốn");
        let fields = ex.extract(&b).expect("应能提取");
        assert!(fields.choices[0].is_correct);
        assert_eq!(fields.choices.iter().filter(|c| c.is_correct).count(), 1);
    }

    #[test]
    fn test_stem_from_lines_before_first_choice() {
        let ex = extractor();
        // 无 "Câu N" 题头，题干取首选项行之前的行拼接
        let b = block("Cho hàm số y = x^2.\nTìm giá trị nhỏ nhất.\nA. 0\nB. 1\nC. 2\nD. 3");
        let fields = ex.extract(&b).expect("应能提取");
        assert_eq!(
            fields.content,
            "Cho hàm số y = x^2. Tìm giá trị nhỏ nhất."
        );
        assert_eq!(fields.choices.len(), 4);
    }

    #[test]
    fn test_stem_fallback_skips_metadata_lines() {
        let ex = extractor();
        let b = block("ID: TL.000123\nNội dung câu hỏi tự luận.\nNguồn: sách giáo khoa");
        let fields = ex.extract(&b).expect("应能提取");
        assert_eq!(fields.content, "Nội dung câu hỏi tự luận.");
        assert_eq!(fields.subcount.expect("应捕获 ID 行").full_id, "TL.000123");
        assert_eq!(fields.source, "sách giáo khoa");
    }

    #[test]
    fn test_id_position_code_goes_to_question_id() {
        let ex = extractor();
        let b = block("Mã: 0D1V1-2\nCâu 5: đề bài\nA. x\nB. y");
        let fields = ex.extract(&b).expect("应能提取");
        let id = fields.question_id.expect("六段式编码应归入主标识");
        assert_eq!(id.full_id, "0D1V1-2");
        assert!(fields.subcount.is_none());
    }

    #[test]
    fn test_answer_line_choice_pattern() {
        let ex = extractor();
        let b = block("Câu 2: hỏi gì đó\nĐáp án A: giá trị đúng\nĐáp án B: giá trị sai");
        let fields = ex.extract(&b).expect("应能提取");
        assert_eq!(fields.choices.len(), 2);
        assert_eq!(fields.choices[0].label, "A");
        assert_eq!(fields.choices[0].text, "giá trị đúng");
    }

    #[test]
    fn test_solution_and_tags_lines() {
        let ex = extractor();
        let b = block("Câu 1: đề\nA. x\nB. y\nLời giải: dùng định nghĩa\nTags: lớp 10, hàm số");
        let fields = ex.extract(&b).expect("应能提取");
        assert_eq!(fields.solution, "dùng định nghĩa");
        assert_eq!(fields.tags, vec!["lớp 10", "hàm số"]);
    }

    #[test]
    fn test_no_lines_yields_empty_fields() {
        let ex = extractor();
        let fields = ex.extract(&block("   \n  ")).expect("空题块不报错");
        assert!(fields.content.is_empty());
        assert!(fields.choices.is_empty());
    }

    #[test]
    fn test_content_truncated_at_cap() {
        let ex = extractor();
        let long_stem = "x".repeat(600);
        let b = block(&format!("Câu 1: {}", long_stem));
        let fields = ex.extract(&b).expect("应能提取");
        assert_eq!(fields.content.chars().count(), 503);
        assert!(fields.content.ends_with("..."));
    }
}
