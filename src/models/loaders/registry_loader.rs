use std::path::Path;

use tokio::fs;

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::item::{Item, ModelSet};
use crate::models::locator::{LocatorRegistry, ModelLocators};

/// 读取文本文件，文件不存在视为配置缺失
async fn read_required(path: &Path) -> AppResult<String> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!("❌ 找不到配置文件: {}", path.display());
            Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            }
            .into())
        }
        Err(e) => Err(AppError::file_read_failed(path.display().to_string(), e)),
    }
}

/// 非空行（去除首尾空白）
fn non_blank_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// 加载元素定位器注册表（`xpaths.ini`）
pub async fn load_locator_registry(path: &Path) -> AppResult<LocatorRegistry> {
    let content = read_required(path).await?;
    let registry = LocatorRegistry::parse(&content, &path.display().to_string());
    tracing::info!(
        "已加载 {} 个元素定位器: {}",
        registry.len(),
        path.display()
    );
    Ok(registry)
}

/// 加载请求的模型列表（`models.ini`），每行一个模型
pub async fn load_model_set(path: &Path) -> AppResult<ModelSet> {
    let content = read_required(path).await?;
    let mut models = ModelSet::default();
    for line in non_blank_lines(&content) {
        if !models.insert(line) {
            tracing::warn!("⚠️ {} 中模型重复: {}", path.display(), line);
        }
    }
    tracing::info!("已加载 {} 个模型: {}", models.len(), path.display());
    Ok(models)
}

/// 加载模型勾选框定位器（`modelxpaths.ini`），文件缺失为致命错误
pub async fn load_model_locators(path: &Path) -> AppResult<ModelLocators> {
    let content = read_required(path).await?;
    let locators = ModelLocators::parse(&content)?;
    tracing::info!(
        "已加载 {} 个模型定位器: {}",
        locators.len(),
        path.display()
    );
    Ok(locators)
}

/// 加载输入条目，每行一个 SMILES
pub async fn load_items(path: &Path) -> AppResult<Vec<Item>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
    Ok(non_blank_lines(&content).map(Item::new).collect())
}
