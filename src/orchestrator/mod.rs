//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量条目处理器
//! - 管理应用生命周期（初始化、运行）
//! - 加载注册表和输入条目
//! - 顺序处理所有条目，汇总并写出报告
//!
//! ### `item_processor` - 单个条目处理器
//! - 运行 `ItemFlow` 得到结果面板
//! - 解析面板为记录
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Item>)
//!     ↓
//! item_processor (处理单个 Item)
//!     ↓
//! workflow::ItemFlow (网页操作状态机)
//!     ↓
//! infrastructure (会话能力：ChromeSession / ScriptedSession)
//! ```

pub mod batch_processor;
pub mod item_processor;

pub use batch_processor::{App, RunSummary};
pub use item_processor::{process_item, ItemReport};
