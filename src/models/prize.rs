use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// 奖品展示形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrizeVariant {
    /// 九宫格
    #[default]
    Grid,
    /// 转盘
    Wheel,
}

impl std::fmt::Display for PrizeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrizeVariant::Grid => write!(f, "grid"),
            PrizeVariant::Wheel => write!(f, "wheel"),
        }
    }
}

/// 奖品配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PrizeEntry {
    pub id: i64,
    #[schema(example = "一人免单套餐")]
    pub text: String,
    /// 相对权重（无需归一化）
    pub weight: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "#000000")]
    pub color: Option<String>,
}

impl PrizeEntry {
    pub fn new(id: i64, text: &str, weight: u32) -> Self {
        Self {
            id,
            text: text.to_string(),
            weight,
            color: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

/// 一组固定奖品（启动时构造，之后只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PrizeTable {
    pub variant: PrizeVariant,
    pub entries: Vec<PrizeEntry>,
}

impl PrizeTable {
    pub fn new(variant: PrizeVariant, entries: Vec<PrizeEntry>) -> AppResult<Self> {
        if entries.is_empty() {
            return Err(AppError::ConfigError(format!(
                "Prize table '{variant}' must not be empty"
            )));
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(AppError::ConfigError(format!(
                    "Duplicate prize id {} in table '{variant}'",
                    entry.id
                )));
            }
        }
        Ok(Self { variant, entries })
    }

    /// 九宫格奖品（id 即格子下标）
    pub fn grid() -> Self {
        Self {
            variant: PrizeVariant::Grid,
            entries: vec![
                PrizeEntry::new(0, "一人免单套餐", 5),
                PrizeEntry::new(1, "魔法世界8折券", 15),
                PrizeEntry::new(2, "霍格沃茨相框", 15),
                PrizeEntry::new(3, "再转一次", 20),
                PrizeEntry::new(4, "谢谢参与", 20),
                PrizeEntry::new(5, "神秘魔法道具", 8),
                PrizeEntry::new(6, "格兰芬多徽章", 10),
                PrizeEntry::new(7, "98折优惠券", 5),
                PrizeEntry::new(8, "94折优惠券", 2),
            ],
        }
    }

    /// 转盘奖品
    pub fn wheel() -> Self {
        Self {
            variant: PrizeVariant::Wheel,
            entries: vec![
                PrizeEntry::new(1, "免费写真套餐", 5).with_color("#000000"),
                PrizeEntry::new(2, "8折优惠券", 15).with_color("#333333"),
                PrizeEntry::new(3, "精美相框", 20).with_color("#666666"),
                PrizeEntry::new(4, "再来一次", 25).with_color("#999999"),
                PrizeEntry::new(5, "谢谢参与", 25).with_color("#cccccc"),
                PrizeEntry::new(6, "神秘礼品", 10).with_color("#444444"),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&PrizeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// 奖品在格子/扇区中的位置
    pub fn index_of(&self, id: i64) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.weight)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables() {
        let grid = PrizeTable::grid();
        assert_eq!(grid.len(), 9);
        assert_eq!(grid.total_weight(), 100);
        assert!(
            grid.entries
                .iter()
                .enumerate()
                .all(|(i, e)| e.id == i as i64)
        );

        let wheel = PrizeTable::wheel();
        assert_eq!(wheel.len(), 6);
        assert_eq!(wheel.total_weight(), 100);
        assert!(wheel.entries.iter().all(|e| e.color.is_some()));
        assert_eq!(wheel.index_of(1), Some(0));
    }

    #[test]
    fn test_lookup() {
        let grid = PrizeTable::grid();
        assert_eq!(grid.get(4).map(|e| e.text.as_str()), Some("谢谢参与"));
        assert_eq!(grid.get(42), None);
    }

    #[test]
    fn test_rejects_empty_and_duplicate_tables() {
        assert!(PrizeTable::new(PrizeVariant::Grid, vec![]).is_err());
        let dup = vec![PrizeEntry::new(1, "a", 1), PrizeEntry::new(1, "b", 1)];
        assert!(PrizeTable::new(PrizeVariant::Wheel, dup).is_err());
    }
}
