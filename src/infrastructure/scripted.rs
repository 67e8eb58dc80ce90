//! 脚本化的会话实现
//!
//! 按预先写好的脚本返回文本或错误，并记录每一次操作，
//! 用于在没有真实浏览器的情况下测试流程

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::infrastructure::ui_driver::{SessionFactory, UiSession};
use crate::models::Locator;

/// 会话上发生的一次操作，元素以选择器字符串记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Open,
    Navigate(String),
    Click(String),
    Type(String, String),
    Read(String),
    Close,
}

/// 单个会话的脚本
#[derive(Debug, Clone, Default)]
pub struct Script {
    texts: HashMap<String, VecDeque<String>>,
    missing: HashSet<String>,
    click_failures: HashMap<String, u32>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一次读取返回的文本；队列只剩最后一条时重复返回它
    pub fn text(mut self, selector: &str, text: &str) -> Self {
        self.texts
            .entry(selector.to_string())
            .or_default()
            .push_back(text.to_string());
        self
    }

    /// 页面上不存在该元素
    pub fn missing(mut self, selector: &str) -> Self {
        self.missing.insert(selector.to_string());
        self
    }

    /// 前 `times` 次点击该元素失败
    pub fn fail_clicks(mut self, selector: &str, times: u32) -> Self {
        self.click_failures.insert(selector.to_string(), times);
        self
    }
}

/// 按顺序为每个新会话取出一份脚本
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    scripts: Mutex<VecDeque<Script>>,
    journal: Arc<Mutex<Vec<Action>>>,
}

impl ScriptedDriver {
    pub fn new(scripts: impl IntoIterator<Item = Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            journal: Arc::default(),
        }
    }

    /// 所有会话的操作记录
    pub fn journal(&self) -> Vec<Action> {
        self.journal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl SessionFactory for ScriptedDriver {
    type Session = ScriptedSession;

    async fn open(&self) -> Result<ScriptedSession, BrowserError> {
        let script = self
            .scripts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| BrowserError::LaunchFailed {
                source: "没有剩余的会话脚本".into(),
            })?;
        let session = ScriptedSession {
            script,
            journal: Arc::clone(&self.journal),
            closed: false,
        };
        session.record(Action::Open);
        Ok(session)
    }
}

/// 按脚本响应的会话
pub struct ScriptedSession {
    script: Script,
    journal: Arc<Mutex<Vec<Action>>>,
    closed: bool,
}

impl ScriptedSession {
    fn record(&self, action: Action) {
        self.journal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(action);
    }

    fn ensure_open(&self) -> Result<(), BrowserError> {
        if self.closed {
            return Err(BrowserError::SessionClosed);
        }
        Ok(())
    }

    fn ensure_present(&self, locator: &Locator) -> Result<(), BrowserError> {
        self.ensure_open()?;
        if self.script.missing.contains(&locator.selector) {
            return Err(BrowserError::ElementNotFound {
                locator: locator.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UiSession for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.record(Action::Navigate(url.to_string()));
        self.ensure_open()
    }

    async fn click(&mut self, locator: &Locator) -> Result<(), BrowserError> {
        self.record(Action::Click(locator.selector.clone()));
        self.ensure_present(locator)?;
        if let Some(remaining) = self.script.click_failures.get_mut(&locator.selector) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(BrowserError::action_failed(
                    "点击",
                    locator.to_string(),
                    std::io::Error::new(std::io::ErrorKind::Other, "元素尚未可点击"),
                ));
            }
        }
        Ok(())
    }

    async fn type_text(&mut self, locator: &Locator, text: &str) -> Result<(), BrowserError> {
        self.record(Action::Type(locator.selector.clone(), text.to_string()));
        self.ensure_present(locator)
    }

    async fn read_text(&mut self, locator: &Locator) -> Result<String, BrowserError> {
        self.record(Action::Read(locator.selector.clone()));
        self.ensure_present(locator)?;
        let queue = self
            .script
            .texts
            .get_mut(&locator.selector)
            .ok_or_else(|| BrowserError::ElementNotFound {
                locator: locator.to_string(),
            })?;
        let text = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(text.unwrap_or_default())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.record(Action::Close);
        self.ensure_open()?;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_is_unusable_after_close() {
        let driver = ScriptedDriver::new([Script::new().text("/div/status", "done")]);
        let mut session = driver.open().await.unwrap();
        let status = Locator::xpath("/div/status");

        assert_eq!(session.read_text(&status).await.unwrap(), "done");
        session.close().await.unwrap();

        assert!(matches!(
            session.read_text(&status).await,
            Err(BrowserError::SessionClosed)
        ));
        assert!(matches!(session.navigate("about:blank").await, Err(BrowserError::SessionClosed)));
        assert!(matches!(session.close().await, Err(BrowserError::SessionClosed)));
    }

    #[tokio::test]
    async fn test_click_failures_are_consumed_in_order() {
        let driver = ScriptedDriver::new([Script::new().fail_clicks("/button/predict", 1)]);
        let mut session = driver.open().await.unwrap();
        let predict = Locator::xpath("/button/predict");

        assert!(session.click(&predict).await.is_err());
        assert!(session.click(&predict).await.is_ok());
        assert_eq!(
            driver.journal(),
            vec![
                Action::Open,
                Action::Click("/button/predict".to_string()),
                Action::Click("/button/predict".to_string()),
            ]
        );
    }
}
