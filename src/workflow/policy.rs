//! 提交重试与状态轮询策略

use std::time::Duration;

/// 提交按钮的重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 两次尝试之间的固定等待
    pub interval: Duration,
    /// 最多尝试次数，None 表示一直重试到成功
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    pub fn capped(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts),
        }
    }

    /// 已经失败 `attempts` 次后是否还能再试
    pub fn allows_another(&self, attempts: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
    }
}

/// 计算状态轮询策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
    /// 关闭时轮询没有上限
    pub enforce_timeout: bool,
}

impl PollPolicy {
    pub fn timed_out(&self, elapsed: Duration) -> bool {
        self.enforce_timeout && elapsed >= self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_cap() {
        let policy = RetryPolicy::capped(Duration::from_secs(5), 3);
        assert!(policy.allows_another(1));
        assert!(policy.allows_another(2));
        assert!(!policy.allows_another(3));

        let policy = RetryPolicy::unbounded(Duration::from_secs(5));
        assert!(policy.allows_another(u32::MAX));
    }

    #[test]
    fn test_poll_policy_only_times_out_when_enforced() {
        let mut policy = PollPolicy {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
            enforce_timeout: true,
        };
        assert!(!policy.timed_out(Duration::from_secs(5)));
        assert!(policy.timed_out(Duration::from_secs(10)));

        policy.enforce_timeout = false;
        assert!(!policy.timed_out(Duration::from_secs(1000)));
    }
}
