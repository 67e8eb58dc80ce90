//! 批量条目处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责加载配置资源并逐个处理条目。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载定位器、模型列表、模型定位器和输入条目
//! 2. **顺序处理**：一次只处理一个条目，上一个会话关闭后才开始下一个
//! 3. **结果汇总**：把每个条目的记录汇总成一张宽表
//! 4. **报告输出**：写入 CSV 并输出全局统计
//!
//! 任一条目失败都会终止整次运行，已处理的结果不会写出

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::SessionFactory;
use crate::models::{self, Item, ItemResultSet, ModelLocators, ModelSet, PageLocators};
use crate::orchestrator::item_processor;
use crate::services::{aggregate, OutputTable, ReportWriter, ResultParser};
use crate::utils::logging;
use crate::workflow::{ItemCtx, ItemFlow};

/// 应用主结构
#[derive(Debug)]
pub struct App {
    config: Config,
    page: PageLocators,
    models: ModelSet,
    model_locators: ModelLocators,
    items: Vec<Item>,
}

/// 一次运行的汇总
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub table: OutputTable,
    pub output_path: PathBuf,
    pub completed: usize,
    pub timed_out: usize,
}

impl App {
    /// 初始化应用
    ///
    /// 所有配置文件在打开浏览器之前加载并校验
    pub async fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        let registry = models::load_locator_registry(&config.locator_file).await?;
        let page = registry.page_locators()?;
        let models = models::load_model_set(&config.models_file).await?;
        let model_locators = models::load_model_locators(&config.model_locator_file).await?;
        model_locators.ensure_covers(&models)?;
        let items = models::load_items(&config.input_file).await?;

        Ok(Self {
            config,
            page,
            models,
            model_locators,
            items,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn models(&self) -> &ModelSet {
        &self.models
    }

    /// 运行应用主逻辑
    pub async fn run<F: SessionFactory>(&self, driver: &F) -> AppResult<RunSummary> {
        let output_path = self.config.output_path();
        logging::log_startup(&self.config, &output_path, &self.models, &self.items);

        if self.items.is_empty() {
            warn!("⚠️ 输入文件中没有 SMILES，只写出表头");
        }

        let (results, timed_out) = self.process_all_items(driver).await?;

        let table = aggregate(&results, &self.models);
        ReportWriter::with_path(&output_path).write(&table)?;

        let summary = RunSummary {
            table,
            output_path,
            completed: results.len(),
            timed_out,
        };
        logging::print_final_stats(&summary);

        Ok(summary)
    }

    /// 顺序处理所有条目，返回结果集和超时条目数
    async fn process_all_items<F: SessionFactory>(&self, driver: &F) -> AppResult<(ItemResultSet, usize)> {
        let flow = ItemFlow::new(&self.config, &self.page, &self.models, &self.model_locators);
        let parser = ResultParser::new(&self.models);
        let total = self.items.len();

        let mut results = ItemResultSet::new();
        let mut timed_out = 0;

        for (idx, item) in self.items.iter().enumerate() {
            let ctx = ItemCtx::new(idx + 1, total, item.clone());
            let report = item_processor::process_item(driver, &flow, &parser, &ctx).await?;
            if report.completion.timed_out() {
                timed_out += 1;
            }
            results.push(item.clone(), report.records);
        }

        info!("✓ 全部 {} 个条目处理完毕", total);
        Ok((results, timed_out))
    }
}
