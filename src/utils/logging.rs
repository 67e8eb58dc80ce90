//! 日志工具模块
//!
//! 提供日志初始化和输出格式化的辅助函数
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{Item, ModelSet};
use crate::orchestrator::RunSummary;

/// 初始化日志，默认 info 级别，可用 RUST_LOG 覆盖
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 配置
/// - `output_path`: 输出文件路径
/// - `models`: 请求的模型
/// - `items`: 待处理的条目
pub fn log_startup(config: &Config, output_path: &Path, models: &ModelSet, items: &[Item]) {
    info!("{}", "=".repeat(60));
    info!("🚀 QSAR 批量运行器 v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "-".repeat(60));
    info!("输入文件: {}", config.input_file.display());
    info!("输出文件: {}", output_path.display());
    info!(
        "超时: {} 秒 ({})",
        config.timeout_secs,
        if config.enforce_timeout { "启用" } else { "未启用" }
    );
    info!("选择的模型:");
    for model in models.iter() {
        info!("\t> {}", model);
    }
    info!("待处理 {} 个 SMILES:", items.len());
    for item in items {
        info!("\t> {}", truncate_text(item.as_str(), 80));
    }
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 完成: {}", summary.completed);
    info!("⏱️ 超时: {}", summary.timed_out);
    info!("📋 输出列: {}", summary.table.columns.len() + 2);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", summary.output_path.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
