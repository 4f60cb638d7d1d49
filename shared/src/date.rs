//! 时间类型模块
//!
//! `Timestamp`: 可序列化的毫秒时间戳，用于会话过期判断。
//! 解析依赖 chrono，不依赖 js_sys，因此可以在原生目标上测试。

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use std::time::Duration;

/// 毫秒时间戳
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// 创建新的时间戳
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// 当前时间
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// 获取毫秒值
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// 获取秒值
    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0 / 1000
    }

    /// 解析 ISO 8601 / RFC 3339 字符串
    ///
    /// 也接受不带时区的日期时间（按 UTC 处理）和纯日期。
    /// 返回 None 如果解析失败
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.timestamp_millis()));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Self(naive.and_utc().timestamp_millis()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc().timestamp_millis()))
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.as_millis() as i64)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// 计算两个时间戳之间的差值（返回 Duration）
    fn sub(self, rhs: Timestamp) -> Self::Output {
        let diff_ms = (self.0 - rhs.0).max(0);
        Duration::from_millis(diff_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let rfc = Timestamp::parse("1970-01-01T00:00:01Z").unwrap();
        assert_eq!(rfc.as_millis(), 1000);

        let with_offset = Timestamp::parse("1970-01-01T01:00:01+01:00").unwrap();
        assert_eq!(with_offset, rfc);

        let naive = Timestamp::parse("1970-01-01T00:00:01.500").unwrap();
        assert_eq!(naive.as_millis(), 1500);

        let date = Timestamp::parse("1970-01-02").unwrap();
        assert_eq!(date.as_secs(), 86_400);

        assert!(Timestamp::parse("not a date").is_none());
    }

    #[test]
    fn test_arithmetic() {
        let start = Timestamp::new(1_000);
        let later = start + Duration::from_secs(2);
        assert_eq!(later.as_millis(), 3_000);
        assert_eq!(later - start, Duration::from_secs(2));
        assert_eq!(start - later, Duration::ZERO);
    }
}
