use serde::Deserialize;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题目源文件存放目录
    pub input_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 降级记录清单文件
    pub warn_file: String,
    // --- 题库 API 配置 ---
    pub bank_api_base_url: String,
    pub bank_token: String,
    // --- 创建者（来自调用方会话） ---
    pub creator_id: String,
    pub creator_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "input_text".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            warn_file: "warn.txt".to_string(),
            bank_api_base_url: "http://localhost:8080".to_string(),
            bank_token: String::new(),
            creator_id: "system".to_string(),
            creator_name: "Trích xuất tự động".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载，未设置的项取默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            warn_file: std::env::var("WARN_FILE").unwrap_or(default.warn_file),
            bank_api_base_url: std::env::var("BANK_API_BASE_URL").unwrap_or(default.bank_api_base_url),
            bank_token: std::env::var("BANK_TOKEN").unwrap_or(default.bank_token),
            creator_id: std::env::var("CREATOR_ID").unwrap_or(default.creator_id),
            creator_name: std::env::var("CREATOR_NAME").unwrap_or(default.creator_name),
        }
    }

    /// 加载配置：优先 extract.toml 文件，其次环境变量
    pub fn load() -> Self {
        match std::fs::read_to_string("extract.toml") {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("extract.toml 解析失败，改用环境变量配置: {}", e);
                    Self::from_env()
                }
            },
            Err(_) => Self::from_env(),
        }
    }
}

/// 提取配置
///
/// 模式串与关键词集合的不可变配置值，构造后按引用传入各组件，
/// 保证管线是 (文本, 配置) → 记录 的纯函数。
/// 模式列表的顺序即匹配优先级，调整顺序会改变可观察输出。
#[derive(Clone, Debug)]
pub struct ExtractConfig {
    /// 合成 subcount 的前缀
    pub subcount_prefix: String,
    /// 题干显示上限（字符数），超出截断并加省略号
    pub max_content_len: usize,

    // --- 分段模式 ---
    /// 序号题头行（"Câu <N>." / "Câu <N>:"）
    pub ordinal_header_pattern: String,
    /// 标识题头行（"ID:" / "Mã:"），仅用于分段策略
    pub segment_id_header_pattern: String,
    /// 首选项行（"A." / "A)"）
    pub first_choice_pattern: String,
    /// 任意选项行（"A."～"D."），用于补全缺失题头
    pub choice_line_pattern: String,

    // --- 启发式提取模式（按优先级排列） ---
    /// 选项行模式，捕获组为 (标签, 文本)
    pub choice_patterns: Vec<String>,
    /// 标识行模式，捕获组为标识值
    pub id_header_patterns: Vec<String>,
    /// 解答行模式，捕获组为解答文本
    pub solution_patterns: Vec<String>,
    /// 来源行模式，捕获组为来源文本
    pub source_patterns: Vec<String>,
    /// 标签行模式，捕获组为逗号分隔的标签串
    pub tag_patterns: Vec<String>,

    // --- 类型判定关键词 ---
    /// 配对题关键词（出现在题干中）
    pub matching_keywords: Vec<String>,
    /// 简答题关键词（出现在题干中）
    pub short_answer_keywords: Vec<String>,
    /// 判断题首选项关键词
    pub true_false_keywords: Vec<String>,
    /// 配对题结构标记（出现在题块原文中）
    pub matching_markers: Vec<String>,
    /// 简答题结构标记（出现在题块原文中）
    pub short_answer_markers: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            subcount_prefix: "TL".to_string(),
            max_content_len: 500,
            ordinal_header_pattern: r"^\s*Câu\s*(\d+)\s*[.:]".to_string(),
            segment_id_header_pattern: r"^\s*(?:ID|Mã)\s*:".to_string(),
            first_choice_pattern: r"^\s*A[.)]\s".to_string(),
            choice_line_pattern: r"^\s*[A-D][.)]\s".to_string(),
            choice_patterns: vec![
                r"^\s*([A-D])[.)]\s*(.+)$".to_string(),
                r"^\s*([A-D])\s+(.+)$".to_string(),
                r"^\s*(?:Đáp án|Answer)\s*([A-D])[:.]\s*(.+)$".to_string(),
            ],
            id_header_patterns: vec![
                r"^\s*ID\s*:\s*(.+)$".to_string(),
                r"^\s*Mã\s*:\s*(.+)$".to_string(),
                r"^\s*QuestionID\s*:\s*(.+)$".to_string(),
            ],
            solution_patterns: vec![
                r"^\s*Lời giải\s*:\s*(.*)$".to_string(),
                r"^\s*Giải thích\s*:\s*(.*)$".to_string(),
                r"^\s*Giải\s*:\s*(.*)$".to_string(),
            ],
            source_patterns: vec![
                r"^\s*Nguồn\s*:\s*(.+)$".to_string(),
                r"^\s*Source\s*:\s*(.+)$".to_string(),
            ],
            tag_patterns: vec![
                r"^\s*Tags\s*:\s*(.+)$".to_string(),
                r"^\s*Nhãn\s*:\s*(.+)$".to_string(),
            ],
            matching_keywords: vec!["ghép đôi".to_string(), "nối".to_string()],
            short_answer_keywords: vec![
                "điền vào chỗ trống".to_string(),
                "trả lời ngắn".to_string(),
            ],
            true_false_keywords: vec![
                "đúng".to_string(),
                "sai".to_string(),
                "true".to_string(),
                "false".to_string(),
            ],
            matching_markers: vec![r"\begin{matching}".to_string()],
            short_answer_markers: vec![r"\shortans".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input_folder, "input_text");
        assert!(!config.verbose_logging);
    }

    #[test]
    fn test_extract_config_pattern_order() {
        let config = ExtractConfig::default();
        // 选项模式共三条，"A." 形式优先
        assert_eq!(config.choice_patterns.len(), 3);
        assert!(config.choice_patterns[0].contains("[.)]"));
        assert!(config.matching_keywords.iter().any(|k| k == "ghép đôi"));
    }
}
