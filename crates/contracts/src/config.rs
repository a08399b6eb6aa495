//! RelayConfig - Config Loader output
//!
//! Describes the complete relay setup: transport credentials, data source,
//! message template, scheduled update targets and dispatch pacing.

use serde::{Deserialize, Serialize};

use crate::Destination;

/// Default Telegram Bot API base (overridable for tests / proxies)
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Complete relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Transport settings
    pub telegram: TelegramConfig,

    /// Market data source
    pub data: DataConfig,

    /// Message template settings
    #[serde(default)]
    pub message: MessageConfig,

    /// Periodic update settings
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Dispatch pacing settings
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Chat transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token
    pub token: String,

    /// Identities allowed to trigger on-demand replies
    #[serde(default)]
    pub admin_ids: Vec<i64>,

    /// Bot API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Market data endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Snapshot endpoint (HTTP GET, JSON body)
    pub url: String,
}

/// Message template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Template with `F{..}` / `S{..}` / `E{..}` placeholder tokens
    #[serde(default = "default_template")]
    pub template: String,

    /// Inbound text prefix that triggers an on-demand reply
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            command_prefix: default_command_prefix(),
        }
    }
}

fn default_template() -> String {
    "E{data.attributes.price_change_percentage.m5} S{data.attributes.name}: \
     F{data.attributes.base_token_price_usd} 24H: F{data.attributes.volume_usd.h24} \
     MC: F{data.attributes.fdv_usd}"
        .to_string()
}

fn default_command_prefix() -> String {
    "/price".to_string()
}

/// Periodic update configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between scheduled update ticks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Messages kept up to date by replace-in-place edits
    #[serde(default)]
    pub targets: Vec<UpdateTarget>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            targets: Vec::new(),
        }
    }
}

fn default_interval_secs() -> u64 {
    60
}

/// One previously-sent message to keep updated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTarget {
    pub chat_id: i64,

    #[serde(default)]
    pub thread_id: Option<i64>,

    /// Message to edit on every tick
    pub message_id: i64,
}

impl UpdateTarget {
    /// Queue key for this target
    pub fn destination(&self) -> Destination {
        Destination {
            chat_id: self.chat_id,
            thread_id: self.thread_id,
        }
    }
}

/// Dispatch pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Minimum spacing between sends to one destination
    #[serde(default = "default_min_send_interval_ms")]
    pub min_send_interval_ms: u64,

    /// Bounded queue depth per destination
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Retire a destination worker after this much inactivity (0 = never)
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            min_send_interval_ms: default_min_send_interval_ms(),
            queue_capacity: default_queue_capacity(),
            idle_ttl_secs: default_idle_ttl_secs(),
        }
    }
}

fn default_min_send_interval_ms() -> u64 {
    3000
}

fn default_queue_capacity() -> usize {
    64
}

fn default_idle_ttl_secs() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_in() {
        let toml_src = r#"
[telegram]
token = "123:abc"

[data]
url = "https://example.com/pools/x"
"#;
        let config: RelayConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.telegram.api_url, DEFAULT_API_URL);
        assert_eq!(config.schedule.interval_secs, 60);
        assert_eq!(config.dispatch.min_send_interval_ms, 3000);
        assert_eq!(config.dispatch.queue_capacity, 64);
        assert_eq!(config.dispatch.idle_ttl_secs, 300);
        assert_eq!(config.message.command_prefix, "/price");
        assert!(config.message.template.contains("F{"));
    }

    #[test]
    fn test_target_destination() {
        let target = UpdateTarget {
            chat_id: -100,
            thread_id: Some(3),
            message_id: 42,
        };
        assert_eq!(target.destination(), Destination::thread(-100, 3));
    }
}
