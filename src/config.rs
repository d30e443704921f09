use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, Result};

pub const DEFAULT_MAX_ROWS_IN_MEMORY: u32 = 75_000;
pub const DEFAULT_MAX_ROWS_PER_SEGMENT: u32 = 5_000_000;
pub const DEFAULT_INTERMEDIATE_PERSIST_PERIOD: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_MAX_PENDING_PERSISTS: u32 = 0;
pub const DEFAULT_HANDOFF_CONDITION_TIMEOUT_MS: u64 = 0;
pub const DEFAULT_CHAT_RETRIES: u64 = 8;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(80);
pub const DEFAULT_OFFSET_FETCH_PERIOD: Duration = Duration::from_secs(30);

/// Tuning of a streaming-ingestion supervisor, keyed by its `"type"` field.
///
/// ```json
/// {"type": "kafka", "chatRetries": 3, "httpTimeout": "15s"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SupervisorTuningConfig {
    Kafka(KafkaSupervisorTuningConfig),
}

impl SupervisorTuningConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            SupervisorTuningConfig::Kafka(kafka) => kafka.validate(),
        }
    }
}

/// The record as written by a user: every field may be left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KafkaSupervisorTuningSpec {
    pub max_rows_in_memory: Option<u32>,
    pub max_rows_per_segment: Option<u32>,
    #[serde(with = "humantime_serde::option")]
    pub intermediate_persist_period: Option<Duration>,
    pub base_persist_directory: Option<PathBuf>,
    pub max_pending_persists: Option<u32>,
    pub index_spec: Option<serde_json::Value>,
    /// Read from old configs and then ignored.
    pub build_v9_directly: Option<bool>,
    pub report_parse_exceptions: Option<bool>,
    /// Milliseconds.
    pub handoff_condition_timeout: Option<u64>,
    pub reset_offset_automatically: Option<bool>,

    pub worker_threads: Option<u32>,
    pub chat_threads: Option<u32>,
    pub chat_retries: Option<u64>,
    #[serde(with = "humantime_serde::option")]
    pub http_timeout: Option<Duration>,
    #[serde(with = "humantime_serde::option")]
    pub shutdown_timeout: Option<Duration>,
    #[serde(with = "humantime_serde::option")]
    pub offset_fetch_period: Option<Duration>,
}

impl KafkaSupervisorTuningSpec {
    /// Fills every missing field with its default. `workerThreads`,
    /// `chatThreads`, `basePersistDirectory` and `indexSpec` stay optional.
    pub fn apply_defaults(self) -> KafkaSupervisorTuningConfig {
        if self.build_v9_directly == Some(false) {
            debug!("buildV9Directly=false is ignored, supervised tasks always build v9");
        }
        KafkaSupervisorTuningConfig {
            max_rows_in_memory: self
                .max_rows_in_memory
                .unwrap_or(DEFAULT_MAX_ROWS_IN_MEMORY),
            max_rows_per_segment: self
                .max_rows_per_segment
                .unwrap_or(DEFAULT_MAX_ROWS_PER_SEGMENT),
            intermediate_persist_period: self
                .intermediate_persist_period
                .unwrap_or(DEFAULT_INTERMEDIATE_PERSIST_PERIOD),
            base_persist_directory: self.base_persist_directory,
            max_pending_persists: self
                .max_pending_persists
                .unwrap_or(DEFAULT_MAX_PENDING_PERSISTS),
            index_spec: self.index_spec,
            build_v9_directly: true,
            report_parse_exceptions: self.report_parse_exceptions.unwrap_or(false),
            handoff_condition_timeout: self
                .handoff_condition_timeout
                .unwrap_or(DEFAULT_HANDOFF_CONDITION_TIMEOUT_MS),
            reset_offset_automatically: self.reset_offset_automatically.unwrap_or(false),
            worker_threads: self.worker_threads,
            chat_threads: self.chat_threads,
            chat_retries: self.chat_retries.unwrap_or(DEFAULT_CHAT_RETRIES),
            http_timeout: self.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT),
            shutdown_timeout: self.shutdown_timeout.unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT),
            offset_fetch_period: self
                .offset_fetch_period
                .unwrap_or(DEFAULT_OFFSET_FETCH_PERIOD),
        }
    }
}

/// Kafka supervisor tuning with defaults applied. Two configs are equal when
/// every field is equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "KafkaSupervisorTuningSpec", rename_all = "camelCase")]
pub struct KafkaSupervisorTuningConfig {
    pub max_rows_in_memory: u32,
    pub max_rows_per_segment: u32,
    #[serde(with = "humantime_serde")]
    pub intermediate_persist_period: Duration,
    pub base_persist_directory: Option<PathBuf>,
    pub max_pending_persists: u32,
    pub index_spec: Option<serde_json::Value>,
    pub build_v9_directly: bool,
    pub report_parse_exceptions: bool,
    pub handoff_condition_timeout: u64,
    pub reset_offset_automatically: bool,

    pub worker_threads: Option<u32>,
    pub chat_threads: Option<u32>,
    pub chat_retries: u64,
    #[serde(with = "humantime_serde")]
    pub http_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub offset_fetch_period: Duration,
}

impl Default for KafkaSupervisorTuningConfig {
    fn default() -> Self {
        KafkaSupervisorTuningSpec::default().apply_defaults()
    }
}

impl From<KafkaSupervisorTuningSpec> for KafkaSupervisorTuningConfig {
    fn from(spec: KafkaSupervisorTuningSpec) -> Self {
        spec.apply_defaults()
    }
}

impl KafkaSupervisorTuningConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_rows_in_memory == 0 {
            return Err(ErrorCode::InvalidConfig(
                "maxRowsInMemory must be positive".to_string(),
            ));
        }
        if self.max_rows_per_segment == 0 {
            return Err(ErrorCode::InvalidConfig(
                "maxRowsPerSegment must be positive".to_string(),
            ));
        }
        if self.worker_threads == Some(0) || self.chat_threads == Some(0) {
            return Err(ErrorCode::InvalidConfig(
                "workerThreads and chatThreads must be positive when set".to_string(),
            ));
        }
        for (name, duration) in [
            ("httpTimeout", self.http_timeout),
            ("shutdownTimeout", self.shutdown_timeout),
            ("offsetFetchPeriod", self.offset_fetch_period),
        ] {
            if duration.is_zero() {
                return Err(ErrorCode::InvalidConfig(format!(
                    "{} must be longer than zero",
                    name
                )));
            }
        }
        Ok(())
    }
}

struct Nullable<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Nullable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "null"),
        }
    }
}

impl fmt::Display for KafkaSupervisorTuningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KafkaSupervisorTuningConfig{{maxRowsInMemory={}, maxRowsPerSegment={}, \
             intermediatePersistPeriod={}, basePersistDirectory={}, maxPendingPersists={}, \
             indexSpec={}, reportParseExceptions={}, handoffConditionTimeout={}, \
             resetOffsetAutomatically={}, workerThreads={}, chatThreads={}, chatRetries={}, \
             httpTimeout={}, shutdownTimeout={}, offsetFetchPeriod={}}}",
            self.max_rows_in_memory,
            self.max_rows_per_segment,
            humantime::format_duration(self.intermediate_persist_period),
            Nullable(&self.base_persist_directory.as_ref().map(|p| p.display())),
            self.max_pending_persists,
            Nullable(&self.index_spec),
            self.report_parse_exceptions,
            self.handoff_condition_timeout,
            self.reset_offset_automatically,
            Nullable(&self.worker_threads),
            Nullable(&self.chat_threads),
            self.chat_retries,
            humantime::format_duration(self.http_timeout),
            humantime::format_duration(self.shutdown_timeout),
            humantime::format_duration(self.offset_fetch_period),
        )
    }
}

/// Settings of the interactive shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplConfig {
    pub prompt: String,
    /// Print the resolved SQL type of every result column.
    pub show_types: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "Enter SQL expression (or 'exit' to quit): ".to_string(),
            show_types: true,
        }
    }
}

/// Serde helper for Duration. Writes humantime (`"1m 20s"`) and reads
/// either humantime or ISO-8601 (`"PT80S"`), the form Druid writes.
mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        s.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse(text: &str) -> Result<Duration, String> {
        match text.trim().strip_prefix(|c: char| c.eq_ignore_ascii_case(&'P')) {
            Some(period) => parse_iso8601(text, period),
            None => humantime::parse_duration(text.trim()).map_err(|e| e.to_string()),
        }
    }

    /// `P[nW][nD][T[nH][nM][n[.f]S]]`. Years and months have no fixed length
    /// and are rejected.
    fn parse_iso8601(text: &str, period: &str) -> Result<Duration, String> {
        let invalid = || format!("invalid ISO-8601 duration '{}'", text);
        let (date, time) = match period.split_once(|c: char| c.eq_ignore_ascii_case(&'T')) {
            Some((date, time)) if !time.is_empty() => (date, time),
            Some(_) => return Err(invalid()),
            None => (period, ""),
        };
        if date.is_empty() && time.is_empty() {
            return Err(invalid());
        }

        let mut total = Duration::ZERO;
        for (part, units) in [
            (date, &[('W', 7 * 86_400), ('D', 86_400)][..]),
            (time, &[('H', 3_600), ('M', 60), ('S', 1)][..]),
        ] {
            let mut rest = part;
            let mut next_unit = 0;
            while !rest.is_empty() {
                let end = rest
                    .find(|c: char| c.is_ascii_alphabetic())
                    .ok_or_else(invalid)?;
                let (number, tail) = rest.split_at(end);
                let designator = tail[..1].to_ascii_uppercase();
                // designators appear at most once, largest first
                let offset = units[next_unit..]
                    .iter()
                    .position(|(unit, _)| designator.starts_with(*unit))
                    .ok_or_else(invalid)?;
                let (unit, seconds) = units[next_unit + offset];
                next_unit += offset + 1;

                let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
                if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                if !fraction.is_empty() && (unit != 'S' || fraction.len() > 9) {
                    return Err(invalid());
                }
                if !fraction.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                let whole = whole
                    .parse::<u64>()
                    .ok()
                    .and_then(|n| n.checked_mul(seconds))
                    .ok_or_else(invalid)?;
                let nanos = if fraction.is_empty() {
                    0
                } else {
                    format!("{:0<9}", fraction).parse::<u32>().map_err(|_| invalid())?
                };
                total = total
                    .checked_add(Duration::new(whole, nanos))
                    .ok_or_else(invalid)?;
                rest = &tail[1..];
            }
        }
        Ok(total)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            duration
                .map(|d| humantime::format_duration(d).to_string())
                .serialize(serializer)
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|s| parse(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
