use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ParticipationRecord, PrizeEntry, PrizeVariant};
use crate::sequencer::Frame;

/// 无法找到历史结果时的占位文案
pub const UNKNOWN_RESULT: &str = "未知";

/// 奖品列表查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct PrizeListQuery {
    /// grid (默认) 或 wheel
    pub variant: Option<PrizeVariant>,
}

/// 抽奖请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DrawRequest {
    #[schema(example = "13800000000")]
    pub phone_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DrawStatus {
    /// 本次完成抽奖
    Drawn,
    /// 已参与过，直接返回历史结果
    AlreadyParticipated,
}

/// 命中重复参与规则的维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationScope {
    Device,
    Phone,
}

/// 抽奖响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResponse {
    pub status: DrawStatus,
    /// 奖品文案（本次或历史）
    pub result: String,
    /// 弹窗展示文案
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ParticipationScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize: Option<PrizeEntry>,
    /// 中奖格子下标
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<ParticipationRecord>,
    /// 九宫格动画帧（已参与时为空）
    pub frames: Vec<Frame>,
}

impl DrawResponse {
    pub fn drawn(
        prize: PrizeEntry,
        cell_index: usize,
        record: ParticipationRecord,
        frames: Vec<Frame>,
    ) -> Self {
        Self {
            status: DrawStatus::Drawn,
            result: prize.text.clone(),
            message: prize.text.clone(),
            scope: None,
            prize: Some(prize),
            cell_index: Some(cell_index),
            record: Some(record),
            frames,
        }
    }

    pub fn already_participated(scope: ParticipationScope, previous: Option<String>) -> Self {
        let result = previous.unwrap_or_else(|| UNKNOWN_RESULT.to_string());
        let message = match scope {
            ParticipationScope::Device => format!("您已经参与过本次活动了！\n抽奖结果：{result}"),
            ParticipationScope::Phone => format!("您已经参与过抽奖了！\n上次抽奖结果：{result}"),
        };
        Self {
            status: DrawStatus::AlreadyParticipated,
            result,
            message,
            scope: Some(scope),
            prize: None,
            cell_index: None,
            record: None,
            frames: Vec::new(),
        }
    }
}

/// 当前设备的参与状态
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeviceStatusResponse {
    #[schema(example = "device_1759000000000_k3j9x2m1q")]
    pub device_id: String,
    pub has_drawn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// 动画流查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AnimationQuery {
    /// 中奖奖品ID (九宫格)
    pub winning_id: i64,
}

/// 动画流结束行
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnimationComplete {
    pub complete: bool,
    pub result: String,
}

/// 转盘请求
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct WheelSpinRequest {
    /// 转盘当前角度（度），默认 0
    pub from_deg: Option<f64>,
}

/// 转盘结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WheelSpinResponse {
    pub prize: PrizeEntry,
    pub sector_index: usize,
    /// 目标绝对角度（度）
    pub rotation_deg: f64,
    /// 前端过渡动画时长
    pub duration_ms: u64,
}

/// 清空存储结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClearResponse {
    pub cleared: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_participated_messages() {
        let device = DrawResponse::already_participated(
            ParticipationScope::Device,
            Some("谢谢参与".into()),
        );
        assert_eq!(device.message, "您已经参与过本次活动了！\n抽奖结果：谢谢参与");
        assert!(device.frames.is_empty());

        let phone = DrawResponse::already_participated(ParticipationScope::Phone, None);
        assert_eq!(phone.result, UNKNOWN_RESULT);
        assert_eq!(phone.message, "您已经参与过抽奖了！\n上次抽奖结果：未知");
    }

    #[test]
    fn test_draw_status_serializes_snake_case() {
        let value = serde_json::to_value(DrawStatus::AlreadyParticipated).unwrap();
        assert_eq!(value, "already_participated");
    }
}
