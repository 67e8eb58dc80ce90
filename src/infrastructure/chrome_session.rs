//! 基于 chromiumoxide 的会话实现
//!
//! 持有唯一的 Page 资源，只暴露点击 / 输入 / 读文本能力

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::browser::{connect_to_browser, launch_browser};
use crate::config::BrowserOptions;
use crate::error::BrowserError;
use crate::infrastructure::ui_driver::{SessionFactory, UiSession};
use crate::models::{Locator, Strategy};

/// 生产环境的会话工厂
///
/// 未设置调试端口时每个会话启动独立的浏览器；设置后连接已有浏览器并新开标签页
pub struct ChromeDriver {
    options: BrowserOptions,
}

impl ChromeDriver {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl SessionFactory for ChromeDriver {
    type Session = ChromeSession;

    async fn open(&self) -> Result<ChromeSession, BrowserError> {
        let (mut browser, events, owns_browser) = match self.options.debug_port {
            Some(port) => {
                let (browser, events) = connect_to_browser(port).await?;
                (browser, events, false)
            }
            None => {
                let (browser, events) = launch_browser(&self.options).await?;
                (browser, events, true)
            }
        };

        match browser.new_page("about:blank").await {
            Ok(page) => Ok(ChromeSession {
                browser: Some(browser),
                page: Some(page),
                events,
                owns_browser,
            }),
            Err(e) => {
                if owns_browser {
                    let _ = browser.close().await;
                    let _ = browser.wait().await;
                }
                events.abort();
                Err(BrowserError::PageCreationFailed {
                    source: Box::new(e),
                })
            }
        }
    }
}

/// 一个 chromiumoxide 页面会话
pub struct ChromeSession {
    browser: Option<Browser>,
    page: Option<Page>,
    events: JoinHandle<()>,
    owns_browser: bool,
}

impl ChromeSession {
    fn page(&self) -> Result<&Page, BrowserError> {
        self.page.as_ref().ok_or(BrowserError::SessionClosed)
    }

    async fn find(&self, locator: &Locator) -> Result<Element, BrowserError> {
        let page = self.page()?;
        let found = match locator.strategy {
            Strategy::XPath => page.find_xpath(locator.selector.clone()).await,
            Strategy::Css => page.find_element(locator.selector.clone()).await,
        };
        found.map_err(|e| {
            debug!("查找元素失败 {}: {}", locator, e);
            BrowserError::ElementNotFound {
                locator: locator.to_string(),
            }
        })
    }
}

#[async_trait]
impl UiSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let page = self.page()?;
        page.goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                source: Box::new(e),
            })?;
        debug!("已导航到: {}", url);
        Ok(())
    }

    async fn click(&mut self, locator: &Locator) -> Result<(), BrowserError> {
        let element = self.find(locator).await?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::action_failed("点击", locator.to_string(), e))?;
        Ok(())
    }

    async fn type_text(&mut self, locator: &Locator, text: &str) -> Result<(), BrowserError> {
        let element = self.find(locator).await?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::action_failed("聚焦", locator.to_string(), e))?
            .type_str(text)
            .await
            .map_err(|e| BrowserError::action_failed("输入", locator.to_string(), e))?;
        Ok(())
    }

    async fn read_text(&mut self, locator: &Locator) -> Result<String, BrowserError> {
        let element = self.find(locator).await?;
        let text = element
            .inner_text()
            .await
            .map_err(|e| BrowserError::action_failed("读取文本", locator.to_string(), e))?;
        Ok(text.unwrap_or_default())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        let page = self.page.take();
        let browser = self.browser.take();

        let result = if self.owns_browser {
            match browser {
                Some(mut browser) => {
                    let closed = browser.close().await.map(|_| ());
                    if let Err(e) = browser.wait().await {
                        warn!("等待浏览器进程退出失败: {}", e);
                    }
                    closed
                }
                None => Ok(()),
            }
        } else {
            match page {
                Some(page) => page.close().await,
                None => Ok(()),
            }
        };

        self.events.abort();
        result.map_err(|e| BrowserError::CloseFailed {
            source: Box::new(e),
        })
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.events.abort();
    }
}
