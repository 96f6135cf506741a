//! JSON 存储服务 - 业务能力层
//!
//! 只负责"把题目追加到 JSON 文件"能力，不关心流程

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::FileError;
use crate::models::EnrichedQuestion;

/// 题目 JSON 存储
///
/// 文件内容始终是一个 JSON 数组，使用 4 空格缩进。
/// 多个站点并发追加时由内部锁串行化读改写。
pub struct JsonStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加题目：读出已有数组，合并后整体写回
    ///
    /// 返回写入后文件中的题目总数
    pub async fn append(&self, questions: &[EnrichedQuestion]) -> Result<usize> {
        if questions.is_empty() {
            debug!("没有新题目，跳过写入 {}", self.display());
            return Ok(0);
        }

        let _guard = self.write_lock.lock().await;
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| FileError::read_failed(self.display(), e))?;
        let mut all = if exists {
            self.load().await?
        } else {
            info!("📄 创建新的题目文件: {}", self.display());
            Vec::new()
        };
        all.extend_from_slice(questions);

        let bytes = to_pretty_json(&all).map_err(|e| FileError::write_failed(self.display(), e))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| FileError::write_failed(self.display(), e))?;

        info!(
            "💾 已追加 {} 道题目到 {}（共 {} 道）",
            questions.len(),
            self.display(),
            all.len()
        );
        Ok(all.len())
    }

    /// 读取文件中的全部题目
    pub async fn load(&self) -> Result<Vec<EnrichedQuestion>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FileError::read_failed(self.display(), e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let questions: Vec<EnrichedQuestion> = serde_json::from_str(&content)
            .map_err(|e| FileError::json_parse_failed(self.display(), e))?;
        debug!("从 {} 读取了 {} 道题目", self.display(), questions.len());
        Ok(questions)
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionRecord;
    use pretty_assertions::assert_eq;

    fn question(text: &str) -> EnrichedQuestion {
        EnrichedQuestion::plain(
            QuestionRecord {
                question: text.to_string(),
                options: vec!["yes".to_string(), "no".to_string()],
                answer: "a".to_string(),
                explanation: "Because.".to_string(),
                subtopic: Some("Basics".to_string()),
                additional_info: None,
            },
            Some("Testing"),
        )
    }

    #[tokio::test]
    async fn append_creates_then_extends() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("questions.json"));

        assert_eq!(store.append(&[question("Q1?")]).await.unwrap(), 1);
        assert_eq!(
            store.append(&[question("Q2?"), question("Q3?")]).await.unwrap(),
            3
        );

        let loaded = store.load().await.unwrap();
        let texts: Vec<&str> = loaded.iter().map(|q| q.record.question.as_str()).collect();
        assert_eq!(texts, vec!["Q1?", "Q2?", "Q3?"]);
    }

    #[tokio::test]
    async fn writes_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("questions.json"));
        store.append(&[question("Q1?")]).await.unwrap();

        let content = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert!(content.starts_with("[\n    {\n        \"question\": \"Q1?\""));
    }

    #[tokio::test]
    async fn empty_append_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("questions.json"));
        assert_eq!(store.append(&[]).await.unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        tokio::fs::write(&path, "{not json").await.unwrap();
        let store = JsonStore::new(&path);
        let err = store.append(&[question("Q1?")]).await.unwrap_err();
        assert!(err.to_string().contains("JSON解析失败"));
    }

    #[tokio::test]
    async fn unreadable_location_is_reported_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        tokio::fs::write(&blocker, "plain file").await.unwrap();
        let store = JsonStore::new(blocker.join("questions.json"));

        let err = store.append(&[question("Q1?")]).await.unwrap_err();
        assert!(err.to_string().contains("读取文件失败"), "{err}");
        assert_eq!(tokio::fs::read_to_string(&blocker).await.unwrap(), "plain file");
    }
}
