use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;

use crate::error::{AppError, AppResult};
use crate::models::PrizeTable;

/// 抽奖引擎
///
/// 选奖顺序：
/// 1. 参与标识命中强制结果表 -> 对应奖品
/// 2. 提供了参与标识且配置了兜底奖品 -> 兜底奖品
/// 3. 否则按权重随机
#[derive(Debug, Clone)]
pub struct DrawEngine {
    table: Arc<PrizeTable>,
    overrides: HashMap<String, i64>,
    keyed_fallback: Option<i64>,
}

impl DrawEngine {
    pub fn new(
        table: Arc<PrizeTable>,
        overrides: HashMap<String, i64>,
        keyed_fallback: Option<i64>,
    ) -> AppResult<Self> {
        for (key, id) in &overrides {
            if table.get(*id).is_none() {
                return Err(AppError::ConfigError(format!(
                    "Override for '{key}' points to unknown prize {id}"
                )));
            }
        }
        if let Some(id) = keyed_fallback
            && table.get(id).is_none()
        {
            return Err(AppError::ConfigError(format!(
                "Keyed fallback points to unknown prize {id}"
            )));
        }
        if table.total_weight() == 0 {
            return Err(AppError::ConfigError(format!(
                "Prize table '{}' has zero total weight",
                table.variant
            )));
        }
        Ok(Self {
            table,
            overrides,
            keyed_fallback,
        })
    }

    /// 纯权重随机，无任何强制规则（转盘使用）
    pub fn weighted(table: Arc<PrizeTable>) -> AppResult<Self> {
        Self::new(table, HashMap::new(), None)
    }

    pub fn table(&self) -> &PrizeTable {
        &self.table
    }

    pub fn select(&self, participant_key: Option<&str>) -> i64 {
        self.select_with(participant_key, &mut rand::thread_rng())
    }

    pub fn select_with<R: Rng + ?Sized>(&self, participant_key: Option<&str>, rng: &mut R) -> i64 {
        if let Some(key) = participant_key {
            if let Some(id) = self.overrides.get(key) {
                return *id;
            }
            if let Some(id) = self.keyed_fallback {
                return id;
            }
        }

        let roll = rng.gen_range(0.0..self.table.total_weight() as f64);
        self.pick_by_roll(roll)
    }

    /// 累加权重，返回第一个累计值 >= roll 的奖品；零权重奖品永不命中
    pub fn pick_by_roll(&self, roll: f64) -> i64 {
        let mut cumulative = 0u64;
        for entry in &self.table.entries {
            if entry.weight == 0 {
                continue;
            }
            cumulative += u64::from(entry.weight);
            if cumulative as f64 >= roll {
                return entry.id;
            }
        }
        // 浮点误差兜底
        self.table.entries[self.table.len() - 1].id
    }
}
