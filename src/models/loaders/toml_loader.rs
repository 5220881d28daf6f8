use crate::models::plan::ExamPlan;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载试卷方案
pub async fn load_plan(toml_file_path: &Path) -> Result<ExamPlan> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let plan: ExamPlan = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(plan.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 从文件夹中加载所有试卷方案
///
/// 单个文件解析失败只记录警告，不影响其他文件。结果按文件名排序。
pub async fn load_all_plans(folder_path: &str) -> Result<Vec<ExamPlan>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut plans = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_plan(&path).await {
            Ok(plan) => {
                tracing::info!("成功加载 {} 个知识点", plan.topics.len());
                plans.push(plan);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "paper_blueprint_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_all_plans_skips_broken_files() {
        let dir = temp_dir("loader");
        std::fs::write(
            dir.join("b_good.toml"),
            "[exam]\ntitle = \"B\"\n\n[[topics]]\nname = \"Optics\"\neasy_mcqs = 3\n",
        )
        .unwrap();
        std::fs::write(dir.join("a_good.toml"), "[exam]\ntitle = \"A\"\n").unwrap();
        std::fs::write(dir.join("broken.toml"), "[exam\ntitle = ").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let plans = load_all_plans(dir.to_str().unwrap()).await.unwrap();
        let titles: Vec<&str> = plans.iter().map(|p| p.exam.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(plans[1].topics[0].easy_mcqs, 3);
        assert!(plans[0].file_path.as_deref().unwrap().ends_with("a_good.toml"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_folder_is_an_error() {
        let result = load_all_plans("/definitely/not/here").await;
        assert!(result.is_err());
    }
}
