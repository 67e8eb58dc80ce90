use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::BrowserOptions;
use crate::error::BrowserError;

/// 启动一个新的浏览器进程
///
/// 返回浏览器和后台事件处理任务，任务在会话关闭时中止
pub async fn launch_browser(options: &BrowserOptions) -> Result<(Browser, JoinHandle<()>), BrowserError> {
    info!("🚀 启动浏览器...");
    debug!("浏览器选项: {:?}", options);

    let mut builder = BrowserConfig::builder()
        .window_size(options.window_width, options.window_height)
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--start-maximized",
        ]);
    builder = if options.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = &options.executable {
        builder = builder.chrome_executable(path);
    }

    let config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        BrowserError::LaunchFailed { source: e.into() }
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        BrowserError::LaunchFailed { source: Box::new(e) }
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let events = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    Ok((browser, events))
}
