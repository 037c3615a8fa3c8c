use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 判断扩展名是否为可摄入的题目源文件
fn is_input_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("txt") | Some("tex")
    )
}

/// 读取单个题目源文件
pub async fn load_input_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取源文件: {}", path.display()))
}

/// 从文件夹加载所有题目源文件并拼接为一个原始批次
///
/// 多文件之间以空行分隔（管线的约定输入格式）。
/// 文件按文件名排序，保证批次内题块顺序稳定。
///
/// # 返回
/// 返回 (拼接后的原始文本, 成功读取的文件数)
pub async fn load_raw_batch(folder_path: &str) -> Result<(String, usize)> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut input_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_input_file(&path) {
            input_files.push(path);
        }
    }

    input_files.sort();

    let mut documents = Vec::new();
    for path in &input_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_input_file(path).await {
            Ok(content) => {
                if content.trim().is_empty() {
                    tracing::warn!("文件为空，跳过: {}", path.display());
                } else {
                    documents.push(content);
                }
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    let loaded = documents.len();
    // 至少两个空行的间隔，保证文件边界同时也是题块边界
    Ok((documents.join("\n\n\n"), loaded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_input_file() {
        assert!(is_input_file(Path::new("de_thi.txt")));
        assert!(is_input_file(Path::new("ngan_hang.tex")));
        assert!(!is_input_file(Path::new("config.toml")));
        assert!(!is_input_file(Path::new("README")));
    }

    #[test]
    fn test_load_raw_batch_missing_folder() {
        let result = tokio_test::block_on(load_raw_batch("không/tồn/tại"));
        assert!(result.is_err());
    }
}
