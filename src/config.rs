use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

use crate::models::CampaignInfo;
use crate::sequencer::{SequencerConfig, WheelConfig};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub lottery: LotteryConfig,
    #[serde(default)]
    pub debug: DebugConfig,
    #[serde(default)]
    pub campaign: CampaignInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// JSON 存储文件路径；为空时使用内存存储（重启丢失）
    #[serde(default)]
    pub path: Option<String>,
}

/// 指定参与标识的强制结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrizeOverride {
    pub participant_key: String,
    pub prize_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LotteryConfig {
    pub overrides: Vec<PrizeOverride>,
    /// 提供了手机号但未命中强制结果时，是否直接给兜底奖品（否则走权重随机）
    pub keyed_fallback_enabled: bool,
    pub keyed_fallback_prize_id: i64,
    pub animation: SequencerConfig,
    pub wheel: WheelConfig,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            overrides: vec![PrizeOverride {
                participant_key: "17865579967".to_string(),
                prize_id: 0,
            }],
            keyed_fallback_enabled: true,
            keyed_fallback_prize_id: 4,
            animation: SequencerConfig::default(),
            wheel: WheelConfig::default(),
        }
    }
}

impl LotteryConfig {
    pub fn override_map(&self) -> HashMap<String, i64> {
        self.overrides
            .iter()
            .map(|o| (o.participant_key.clone(), o.prize_id))
            .collect()
    }

    pub fn keyed_fallback(&self) -> Option<i64> {
        self.keyed_fallback_enabled
            .then_some(self.keyed_fallback_prize_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// 是否开放清空存储接口（无鉴权）
    pub clear_enabled: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            clear_enabled: true,
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 配置文件不存在时完全依赖环境变量与默认值
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("Config file {config_path} not found, using defaults and environment");
                Config::default()
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        toml::from_str(config_str).map_err(|e| format!("解析配置文件失败: {e}").into())
    }

    /// 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("STORE_PATH") {
            self.storage.path = (!v.is_empty()).then_some(v);
        }
        if let Ok(v) = env::var("LOTTERY_TOTAL_ROUNDS")
            && let Ok(n) = v.parse()
        {
            self.lottery.animation.total_rounds = n;
        }
        if let Ok(v) = env::var("LOTTERY_KEYED_FALLBACK_PRIZE_ID") {
            match v.parse() {
                Ok(id) => {
                    self.lottery.keyed_fallback_enabled = true;
                    self.lottery.keyed_fallback_prize_id = id;
                }
                Err(_) if v.eq_ignore_ascii_case("none") => {
                    self.lottery.keyed_fallback_enabled = false;
                }
                Err(_) => log::warn!("Ignoring invalid LOTTERY_KEYED_FALLBACK_PRIZE_ID={v}"),
            }
        }
        if let Ok(v) = env::var("DEBUG_CLEAR_ENABLED")
            && let Ok(b) = v.parse()
        {
            self.debug.clear_enabled = b;
        }
    }
}
