//! 错误类型
//!
//! 配置、浏览器、流程、文件四大类统一汇总到 `AppError`；参数错误只在命令行解析中使用

use std::fmt;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误（注册表文件缺失、条目不存在等）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 单个条目处理流程错误
    #[error("流程错误: {0}")]
    Workflow(#[from] WorkflowError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必需的配置文件不存在
    #[error("配置文件不存在: {path}")]
    MissingFile { path: String },
    /// 定位器注册表中没有该元素
    #[error("未为元素 '{name}' 指定定位器")]
    MissingLocator { name: String },
    /// 模型定位器映射中没有该模型
    #[error("模型 '{model}' 没有对应的选择控件定位器")]
    UnknownModel { model: String },
    /// 定位器语法无法识别
    #[error("无法解析定位器 '{value}'")]
    InvalidLocator { value: String },
    /// 间隔必须大于零
    #[error("{name} 必须大于 0")]
    ZeroInterval { name: String },
    /// 设置文件解析失败
    #[error("设置文件解析失败 ({path}): {source}")]
    SettingsParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

/// 命令行参数错误
#[derive(Debug, Error)]
pub enum ArgsError {
    /// 参数后缺少值
    #[error("参数 {flag} 缺少值")]
    MissingValue { flag: String },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 页面上找不到元素
    #[error("找不到元素: {locator}")]
    ElementNotFound { locator: String },
    /// 对元素的操作失败
    #[error("{action} 失败 ({locator}): {source}")]
    ActionFailed {
        action: String,
        locator: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 会话已关闭后仍被使用
    #[error("浏览器会话已关闭")]
    SessionClosed,
    /// 关闭会话失败
    #[error("关闭浏览器会话失败: {source}")]
    CloseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 单个条目的处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connecting,
    AcceptingTerms,
    SelectingModels,
    Submitting,
    Polling,
    Extracting,
    Closing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Connecting => "连接页面",
            Stage::AcceptingTerms => "接受使用条款",
            Stage::SelectingModels => "选择模型",
            Stage::Submitting => "输入 SMILES",
            Stage::Polling => "等待计算完成",
            Stage::Extracting => "读取结果",
            Stage::Closing => "关闭会话",
        };
        f.write_str(name)
    }
}

/// 流程错误
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// 某个阶段的浏览器操作失败
    #[error("[条目 {item_index}] 阶段「{stage}」失败: {source}")]
    StepFailed {
        item_index: usize,
        stage: Stage,
        #[source]
        source: BrowserError,
    },
    /// 提交按钮重试次数耗尽
    #[error("[条目 {item_index}] 提交计算在 {attempts} 次尝试后仍然失败")]
    SubmitRetriesExhausted { item_index: usize, attempts: u32 },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

impl BrowserError {
    /// 创建元素操作失败错误
    pub fn action_failed(
        action: impl Into<String>,
        locator: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        BrowserError::ActionFailed {
            action: action.into(),
            locator: locator.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failure_names_item_and_stage() {
        let err: AppError = WorkflowError::StepFailed {
            item_index: 3,
            stage: Stage::Polling,
            source: BrowserError::SessionClosed,
        }
        .into();
        let message = err.to_string();
        assert!(message.contains("条目 3"), "{message}");
        assert!(message.contains("等待计算完成"), "{message}");
    }

    #[test]
    fn test_zero_interval_names_the_setting() {
        let err: AppError = ConfigError::ZeroInterval {
            name: "poll_interval_secs".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("poll_interval_secs"));
    }
}
