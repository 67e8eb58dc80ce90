//! # QSAR Batch
//!
//! 通过网页界面批量运行 QSAR 模型，并把结果汇总为一张 CSV 表
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 启动或连接浏览器
//! - `infrastructure/` - `UiSession` 能力（导航、点击、输入、读文本），
//!   `ChromeSession` 为生产实现，`ScriptedSession` 为脚本化实现
//!
//! ### ② 业务能力层（Services）
//! - `ResultParser` - 把结果面板文本解析为记录
//! - `aggregate` - 把各条目的记录汇总成宽表
//! - `ReportWriter` - 写 CSV 能力
//!
//! ### ③ 流程层（Workflow）
//! - `ItemFlow` - 单个条目的网页操作状态机（提交 → 重试 → 轮询 → 读取）
//! - `RetryPolicy` / `PollPolicy` - 重试与超时策略
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 加载资源，顺序处理全部条目并写出报告
//! - `orchestrator/item_processor` - 单个条目：流程 + 解析
//!
//! ## 模块结构

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{ChromeDriver, SessionFactory, UiSession};
pub use models::{Item, ModelSet, ResultRecord};
pub use orchestrator::{App, RunSummary};
pub use workflow::{ItemCtx, ItemFlow};
