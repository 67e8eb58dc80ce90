//! 条目处理流程 - 流程层
//!
//! 核心职责：定义"一个 SMILES"的完整处理流程
//!
//! 流程顺序：
//! 1. 打开新会话并导航到模型页面
//! 2. 接受使用条款
//! 3. 选择模型
//! 4. 输入 SMILES
//! 5. 固定等待
//! 6. 点击执行（失败后按重试策略重试）
//! 7. 轮询计算状态（完成 / 超时）
//! 8. 读取结果面板
//! 9. 关闭会话（任何退出路径都会执行）
//!
//! 只有第 6、7 步会等待或重试，其余步骤失败即返回错误

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppResult, BrowserError, Stage, WorkflowError};
use crate::infrastructure::{SessionFactory, UiSession};
use crate::models::{ModelLocators, ModelSet, PageLocators, RawPanelText};
use crate::workflow::item_ctx::ItemCtx;
use crate::workflow::policy::{PollPolicy, RetryPolicy};

/// 轮询结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// 状态不再显示 processing，已点击完成确认
    Completed { elapsed: Duration },
    /// 达到超时，未点击完成确认
    TimedOut { elapsed: Duration },
}

impl Completion {
    pub fn timed_out(&self) -> bool {
        matches!(self, Completion::TimedOut { .. })
    }
}

/// 单个条目的处理结果
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub panel: RawPanelText,
    pub completion: Completion,
    /// 点击执行按钮的尝试次数
    pub submit_attempts: u32,
}

/// 条目处理流程
///
/// - 编排单个条目的完整网页操作
/// - 持有重试与超时策略
/// - 不持有会话，每次运行打开并关闭一个
pub struct ItemFlow<'a> {
    target_url: &'a str,
    page: &'a PageLocators,
    models: &'a ModelSet,
    model_locators: &'a ModelLocators,
    pause: Duration,
    retry: RetryPolicy,
    poll: PollPolicy,
}

impl<'a> ItemFlow<'a> {
    pub fn new(
        config: &'a Config,
        page: &'a PageLocators,
        models: &'a ModelSet,
        model_locators: &'a ModelLocators,
    ) -> Self {
        Self {
            target_url: &config.target_url,
            page,
            models,
            model_locators,
            pause: config.pause(),
            retry: config.retry_policy(),
            poll: config.poll_policy(),
        }
    }

    /// 处理一个条目，返回结果面板原文
    ///
    /// 无论成功、超时还是中途失败，会话都会被关闭
    pub async fn run<F: SessionFactory>(&self, driver: &F, ctx: &ItemCtx) -> AppResult<ItemOutcome> {
        info!("{} 🌐 打开浏览器会话", ctx);
        let mut session = driver
            .open()
            .await
            .map_err(|e| step_failed(ctx, Stage::Connecting, e))?;

        let result = self.drive(&mut session, ctx).await;

        if let Err(e) = session.close().await {
            warn!("{} ⚠️ {}失败: {}", ctx, Stage::Closing, e);
        } else {
            debug!("{} 会话已关闭", ctx);
        }

        result
    }

    async fn drive<S: UiSession>(&self, session: &mut S, ctx: &ItemCtx) -> AppResult<ItemOutcome> {
        // 1. 连接页面
        session
            .navigate(self.target_url)
            .await
            .map_err(|e| step_failed(ctx, Stage::Connecting, e))?;

        // 2. 接受使用条款
        info!("{} 接受使用条款", ctx);
        session
            .click(&self.page.accept)
            .await
            .map_err(|e| step_failed(ctx, Stage::AcceptingTerms, e))?;

        // 3. 选择模型
        info!("{} 选择 {} 个模型", ctx, self.models.len());
        self.select_models(session, ctx).await?;

        // 4. 输入 SMILES
        info!("{} 输入 SMILES: {}", ctx, ctx.item);
        self.submit_input(session, ctx)
            .await
            .map_err(|e| step_failed(ctx, Stage::Submitting, e))?;

        // 5. 固定等待
        info!("{} 等待 {} 秒", ctx, self.pause.as_secs());
        sleep(self.pause).await;

        // 6. 执行
        let submit_attempts = self.execute(session, ctx).await?;

        // 7. 轮询
        let completion = self.poll(session, ctx).await?;

        // 8. 读取结果
        let text = session
            .read_text(&self.page.table)
            .await
            .map_err(|e| step_failed(ctx, Stage::Extracting, e))?;
        let panel = RawPanelText::from_text(&text);
        debug!("{} 结果面板共 {} 行", ctx, panel.lines().len());

        Ok(ItemOutcome {
            panel,
            completion,
            submit_attempts,
        })
    }

    async fn select_models<S: UiSession>(&self, session: &mut S, ctx: &ItemCtx) -> AppResult<()> {
        session
            .click(&self.page.model_tab)
            .await
            .map_err(|e| step_failed(ctx, Stage::SelectingModels, e))?;

        for model in self.models.iter() {
            let locator = self.model_locators.get(model)?;
            debug!("{} 勾选模型: {}", ctx, model);
            session
                .click(locator)
                .await
                .map_err(|e| step_failed(ctx, Stage::SelectingModels, e))?;
        }
        Ok(())
    }

    async fn submit_input<S: UiSession>(&self, session: &mut S, ctx: &ItemCtx) -> Result<(), BrowserError> {
        session.click(&self.page.smiles_tab).await?;
        session
            .type_text(&self.page.smiles_box, ctx.item.as_str())
            .await?;
        session.click(&self.page.smiles_go).await
    }

    /// 点击执行按钮，失败后固定间隔重试
    ///
    /// 返回成功时的尝试次数
    async fn execute<S: UiSession>(&self, session: &mut S, ctx: &ItemCtx) -> AppResult<u32> {
        info!("{} 📤 点击执行按钮", ctx);
        let mut attempts = 0;
        loop {
            attempts += 1;
            match session.click(&self.page.predict).await {
                Ok(()) => {
                    info!("{} ✓ 提交成功 (第 {} 次尝试)", ctx, attempts);
                    return Ok(attempts);
                }
                Err(e) if self.retry.allows_another(attempts) => {
                    warn!(
                        "{} 提交失败: {}，{} 秒后重试...",
                        ctx,
                        e,
                        self.retry.interval.as_secs()
                    );
                    sleep(self.retry.interval).await;
                }
                Err(e) => {
                    error!("{} ❌ 提交失败: {}，已尝试 {} 次", ctx, e, attempts);
                    return Err(WorkflowError::SubmitRetriesExhausted {
                        item_index: ctx.index,
                        attempts,
                    }
                    .into());
                }
            }
        }
    }

    /// 轮询计算状态，直到完成或超时
    async fn poll<S: UiSession>(&self, session: &mut S, ctx: &ItemCtx) -> AppResult<Completion> {
        let mut elapsed = Duration::ZERO;
        loop {
            let status = session
                .read_text(&self.page.status)
                .await
                .map_err(|e| step_failed(ctx, Stage::Polling, e))?;

            if !is_processing(&status) {
                info!("{} ✓ 计算完成，用时 {} 秒", ctx, elapsed.as_secs());
                session
                    .click(&self.page.end_ok)
                    .await
                    .map_err(|e| step_failed(ctx, Stage::Polling, e))?;
                return Ok(Completion::Completed { elapsed });
            }

            info!("{} ⏳ 计算仍在进行，已等待 {} 秒", ctx, elapsed.as_secs());
            elapsed += self.poll.interval;
            sleep(self.poll.interval).await;

            if self.poll.timed_out(elapsed) {
                // 面板可能尚未渲染完整，按原样读取
                warn!(
                    "{} ⚠️ 计算在 {} 秒后超时，直接读取当前结果面板",
                    ctx,
                    self.poll.timeout.as_secs()
                );
                return Ok(Completion::TimedOut { elapsed });
            }
        }
    }
}

fn is_processing(status: &str) -> bool {
    status.to_lowercase().contains("processing")
}

fn step_failed(ctx: &ItemCtx, stage: Stage, source: BrowserError) -> crate::error::AppError {
    error!("{} ❌ {}失败: {}", ctx, stage, source);
    WorkflowError::StepFailed {
        item_index: ctx.index,
        stage,
        source,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_processing_ignores_case() {
        assert!(is_processing("Processing..."));
        assert!(is_processing("Status: PROCESSING models"));
        assert!(!is_processing("Finished"));
        assert!(!is_processing(""));
    }
}
