//! 界面驱动能力
//!
//! 流程层只通过这两个 trait 操作页面，不认识具体的浏览器实现

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::models::Locator;

/// 一个浏览器会话，只绑定一个条目
///
/// 每个方法都可能因为元素不存在而失败
#[async_trait]
pub trait UiSession: Send {
    /// 打开页面
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// 点击元素
    async fn click(&mut self, locator: &Locator) -> Result<(), BrowserError>;

    /// 向元素输入文本
    async fn type_text(&mut self, locator: &Locator, text: &str) -> Result<(), BrowserError>;

    /// 读取元素的可见文本
    async fn read_text(&mut self, locator: &Locator) -> Result<String, BrowserError>;

    /// 关闭会话，释放浏览器资源
    async fn close(&mut self) -> Result<(), BrowserError>;
}

/// 会话工厂，每个条目打开一个新会话
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: UiSession;

    async fn open(&self) -> Result<Self::Session, BrowserError>;
}
