use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 参与记录（只追加，除整体清空外从不修改）
///
/// 字段名保持 camelCase，与前端 localStorage 中 `lottery_records` 的格式一致。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationRecord {
    #[schema(example = "13800000000")]
    pub phone_number: String,
    #[schema(example = "谢谢参与")]
    pub result: String,
    /// 抽奖完成时间 (epoch 毫秒)
    pub timestamp: i64,
    /// 早期记录可能没有该字段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// 设备抽奖状态：deviceId -> 是否已抽奖
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceStatus(pub BTreeMap<String, bool>);

impl DeviceStatus {
    pub fn has_drawn(&self, device_id: &str) -> bool {
        self.0.get(device_id).copied().unwrap_or(false)
    }

    pub fn mark_drawn(&mut self, device_id: &str) {
        self.0.insert(device_id.to_string(), true);
    }

    /// 移除设备的状态，返回是否存在过
    pub fn forget(&mut self, device_id: &str) -> bool {
        self.0.remove(device_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_camel_case_keys() {
        let record = ParticipationRecord {
            phone_number: "13800000000".into(),
            result: "谢谢参与".into(),
            timestamp: 1_759_000_000_000,
            device_id: Some("device_1_abc".into()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["phoneNumber"], "13800000000");
        assert_eq!(json["deviceId"], "device_1_abc");
    }

    #[test]
    fn test_record_without_device_id_still_decodes() {
        let raw = r#"{"phoneNumber":"13800000000","result":"谢谢参与","timestamp":1}"#;
        let record: ParticipationRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.device_id, None);
    }

    #[test]
    fn test_device_status_is_plain_object() {
        let mut status = DeviceStatus::default();
        status.mark_drawn("device_1_abc");
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#"{"device_1_abc":true}"#
        );
        assert!(status.has_drawn("device_1_abc"));
        assert!(!status.has_drawn("device_2_xyz"));

        assert!(status.forget("device_1_abc"));
        assert!(!status.forget("device_1_abc"));
        assert_eq!(serde_json::to_string(&status).unwrap(), "{}");
    }
}
