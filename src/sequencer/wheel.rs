use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// 转盘动画参数
///
/// 指针固定在正上方，扇区按顺时针从 0 号开始排列；转盘顺时针旋转。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct WheelConfig {
    pub min_turns: u32,
    pub max_turns: u32,
    /// 前端 CSS 过渡时长
    pub duration_ms: u64,
    /// 落点在扇区内的随机抖动比例（0 表示正中）
    pub jitter_ratio: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            min_turns: 3,
            max_turns: 5,
            duration_ms: 3000,
            jitter_ratio: 0.8,
        }
    }
}

impl WheelConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.min_turns == 0 || self.max_turns <= self.min_turns {
            return Err(AppError::ConfigError(
                "Wheel turns must satisfy 0 < min_turns < max_turns".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.jitter_ratio) {
            return Err(AppError::ConfigError(
                "Wheel jitter_ratio must be in [0, 1)".into(),
            ));
        }
        Ok(())
    }
}

/// 每个扇区的角度
pub fn sector_angle(sectors: usize) -> f64 {
    360.0 / sectors as f64
}

/// 给定绝对旋转角度，指针所指的扇区；没有扇区时为 `None`
pub fn sector_at(rotation_deg: f64, sectors: usize) -> Option<usize> {
    if sectors == 0 || !rotation_deg.is_finite() {
        return None;
    }
    let under_pointer = (360.0 - rotation_deg.rem_euclid(360.0)).rem_euclid(360.0);
    Some(((under_pointer / sector_angle(sectors)) as usize).min(sectors - 1))
}

/// 计算转盘目标角度：从 `from_deg` 顺时针转 `[min_turns, max_turns)` 圈，停在目标扇区内
pub fn plan_rotation<R: Rng + ?Sized>(
    config: &WheelConfig,
    from_deg: f64,
    sectors: usize,
    target: usize,
    rng: &mut R,
) -> AppResult<f64> {
    config.validate()?;
    if !from_deg.is_finite() {
        return Err(AppError::ValidationError(
            "from_deg must be a finite number".into(),
        ));
    }
    if sectors == 0 || target >= sectors {
        return Err(AppError::ValidationError(format!(
            "Target sector {target} out of range (0..{sectors})"
        )));
    }

    let angle = sector_angle(sectors);
    let half_span = angle / 2.0 * config.jitter_ratio;
    let jitter = if half_span > 0.0 {
        rng.gen_range(-half_span..half_span)
    } else {
        0.0
    };
    let landing = target as f64 * angle + angle / 2.0 + jitter;

    let base = from_deg + f64::from(config.min_turns) * 360.0;
    let offset = (-landing - base).rem_euclid(360.0);
    let extra_turns = rng.gen_range(0..config.max_turns - config.min_turns);

    Ok(base + f64::from(extra_turns) * 360.0 + offset)
}
