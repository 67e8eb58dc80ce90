use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::workflow::{PollPolicy, RetryPolicy};

/// 程序配置
///
/// 启动时构建一次，之后只读，按引用传给各层
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 模型服务页面
    pub target_url: String,
    /// 输入文件（每行一个 SMILES）
    pub input_file: PathBuf,
    /// 输出文件，缺省时由输入文件改扩展名得到
    pub output_file: Option<PathBuf>,
    /// 元素定位器注册表
    pub locator_file: PathBuf,
    /// 请求的模型列表
    pub models_file: PathBuf,
    /// 模型勾选框定位器
    pub model_locator_file: PathBuf,
    /// 提交前的固定等待（秒）
    pub pause_secs: u64,
    /// 状态轮询间隔（秒）
    pub poll_interval_secs: u64,
    /// 计算超时（秒）
    pub timeout_secs: u64,
    /// 是否启用超时
    pub enforce_timeout: bool,
    /// 提交失败后的重试间隔（秒）
    pub retry_interval_secs: u64,
    /// 提交最多尝试次数，None 表示不限
    pub submit_max_attempts: Option<u32>,
    /// 浏览器选项
    pub browser: BrowserOptions,
}

/// 浏览器选项
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BrowserOptions {
    /// 无头模式
    pub headless: bool,
    /// 浏览器可执行文件，缺省时自动查找
    pub executable: Option<PathBuf>,
    /// 设置后连接到已在该调试端口运行的浏览器，而不是每个条目启动新浏览器
    pub debug_port: Option<u16>,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: false,
            executable: None,
            debug_port: None,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: "https://qsarmodels.food.dtu.dk/runmodel/index.html".to_string(),
            input_file: PathBuf::from("SMILES.txt"),
            output_file: None,
            locator_file: PathBuf::from("xpaths.ini"),
            models_file: PathBuf::from("models.ini"),
            model_locator_file: PathBuf::from("modelxpaths.ini"),
            pause_secs: 5,
            poll_interval_secs: 5,
            timeout_secs: 10,
            enforce_timeout: false,
            retry_interval_secs: 5,
            submit_max_attempts: None,
            browser: BrowserOptions::default(),
        }
    }
}

impl Config {
    /// 从 TOML 文本解析，未出现的字段取默认值
    pub fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::SettingsParseFailed {
            path: path.to_string(),
            source,
        })
    }

    /// 加载设置文件；未指定时使用默认值
    pub fn load(settings: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = settings else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.display().to_string(),
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// 用环境变量覆盖配置
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// 用给定的查找函数覆盖配置（便于测试）
    pub fn with_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup("TARGET_URL") {
            self.target_url = url;
        }
        if let Some(v) = parse_env(&lookup, "PAUSE_SECS", "u64")? {
            self.pause_secs = v;
        }
        if let Some(v) = parse_env(&lookup, "POLL_INTERVAL_SECS", "u64")? {
            self.poll_interval_secs = v;
        }
        if let Some(v) = parse_env(&lookup, "TIMEOUT_SECS", "u64")? {
            self.timeout_secs = v;
        }
        if let Some(v) = parse_env(&lookup, "ENFORCE_TIMEOUT", "bool")? {
            self.enforce_timeout = v;
        }
        if let Some(v) = parse_env(&lookup, "RETRY_INTERVAL_SECS", "u64")? {
            self.retry_interval_secs = v;
        }
        if let Some(v) = parse_env(&lookup, "SUBMIT_MAX_ATTEMPTS", "u32")? {
            self.submit_max_attempts = Some(v);
        }
        if let Some(v) = parse_env(&lookup, "BROWSER_HEADLESS", "bool")? {
            self.browser.headless = v;
        }
        if let Some(v) = parse_env(&lookup, "BROWSER_DEBUG_PORT", "u16")? {
            self.browser.debug_port = Some(v);
        }
        if let Some(path) = lookup("BROWSER_EXECUTABLE") {
            self.browser.executable = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    /// 用命令行参数覆盖配置
    pub fn with_cli(mut self, args: &CliArgs) -> Self {
        if let Some(input) = &args.input {
            self.input_file = input.clone();
        }
        if let Some(output) = &args.output {
            self.output_file = Some(output.clone());
        }
        self
    }

    /// 校验配置
    ///
    /// 轮询间隔为 0 时已等待时间不会增长，超时永远不会触发；重试间隔为 0 时会空转
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("poll_interval_secs", self.poll_interval_secs),
            ("retry_interval_secs", self.retry_interval_secs),
        ];
        for (name, secs) in intervals {
            if secs == 0 {
                return Err(ConfigError::ZeroInterval {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// 输出文件路径：未指定时把输入文件扩展名换成 csv
    pub fn output_path(&self) -> PathBuf {
        self.output_file
            .clone()
            .unwrap_or_else(|| self.input_file.with_extension("csv"))
    }

    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_secs(self.retry_interval_secs),
            max_attempts: self.submit_max_attempts,
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.poll_interval_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            enforce_timeout: self.enforce_timeout,
        }
    }
}

fn parse_env<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(var_name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        })
}
