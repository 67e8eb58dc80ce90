//! 单个条目处理器 - 编排层
//!
//! 跑完一个条目的网页流程，再把面板文本解析成记录

use tracing::{info, warn};

use crate::error::AppResult;
use crate::infrastructure::SessionFactory;
use crate::models::RecordMap;
use crate::services::ResultParser;
use crate::utils::logging::truncate_text;
use crate::workflow::{Completion, ItemCtx, ItemFlow};

/// 单个条目的处理结果
#[derive(Debug, Clone)]
pub struct ItemReport {
    pub records: RecordMap,
    pub completion: Completion,
}

/// 处理单个条目
///
/// # 参数
/// - `driver`: 会话工厂
/// - `flow`: 条目处理流程
/// - `parser`: 结果面板解析器
/// - `ctx`: 条目上下文
pub async fn process_item<F: SessionFactory>(
    driver: &F,
    flow: &ItemFlow<'_>,
    parser: &ResultParser<'_>,
    ctx: &ItemCtx,
) -> AppResult<ItemReport> {
    log_item_start(ctx);

    let outcome = flow.run(driver, ctx).await?;
    let records = parser.parse(&outcome.panel);

    if records.is_empty() {
        warn!("{} ⚠️ 结果面板中没有可识别的模型结果", ctx);
    }
    if outcome.completion.timed_out() {
        warn!("{} ⚠️ 计算超时，结果可能不完整", ctx);
    }

    log_item_complete(ctx, &records, outcome.submit_attempts);

    Ok(ItemReport {
        records,
        completion: outcome.completion,
    })
}

// ========== 日志辅助函数 ==========

fn log_item_start(ctx: &ItemCtx) {
    info!("\n{}", "─".repeat(60));
    info!("{} 🧪 开始处理: {}", ctx, truncate_text(ctx.item.as_str(), 80));
    info!("{}", "─".repeat(60));
}

fn log_item_complete(ctx: &ItemCtx, records: &RecordMap, submit_attempts: u32) {
    info!(
        "{} ✓ 处理完成: {} 个模型结果 (提交尝试 {} 次)",
        ctx,
        records.len(),
        submit_attempts
    );
    for record in records.values() {
        info!(
            "{}   {} → 预测: {} | 实验值: {}",
            ctx,
            record.model,
            record.prediction.as_deref().unwrap_or("-"),
            record.experimental.as_deref().unwrap_or("-")
        );
    }
}
