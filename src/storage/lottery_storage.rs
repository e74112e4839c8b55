use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::KeyValueStore;
use crate::models::{DeviceStatus, ParticipationRecord};
use crate::utils::generate_device_id;

pub const RECORDS_KEY: &str = "lottery_records";
pub const DEVICE_STATUS_KEY: &str = "device_lottery_status";
pub const DEVICE_ID_KEY: &str = "device_id";

/// 抽奖参与记录的读写适配层
///
/// 所有存储/编解码错误都在这里记录日志并降级为“无数据”（空列表 / false / None），
/// 不向调用方传播。
pub struct LotteryStorage<'a> {
    store: &'a mut dyn KeyValueStore,
    device_id: Option<String>,
}

impl<'a> LotteryStorage<'a> {
    pub fn new(store: &'a mut dyn KeyValueStore) -> Self {
        Self {
            store,
            device_id: None,
        }
    }

    /// 获取设备ID，不存在则生成并持久化
    ///
    /// 同一个适配器实例内重复调用总是返回同一个值，即使持久化失败。
    pub fn device_id(&mut self) -> String {
        if let Some(id) = &self.device_id {
            return id.clone();
        }

        let existing = match self.store.get(DEVICE_ID_KEY) {
            Ok(v) => v.filter(|id| !id.is_empty()),
            Err(e) => {
                log::error!("Failed to read device id: {e}");
                None
            }
        };

        let id = match existing {
            Some(id) => id,
            None => {
                let id = generate_device_id(Utc::now().timestamp_millis());
                if let Err(e) = self.store.set(DEVICE_ID_KEY, &id) {
                    log::error!("Failed to persist device id: {e}");
                } else {
                    log::info!("Issued new device id {id}");
                }
                id
            }
        };

        self.device_id = Some(id.clone());
        id
    }

    /// 获取所有抽奖记录
    pub fn records(&self) -> Vec<ParticipationRecord> {
        self.read_json(RECORDS_KEY).unwrap_or_default()
    }

    /// 检查手机号是否已经抽过奖
    pub fn has_phone_drawn(&self, phone: &str) -> bool {
        self.records().iter().any(|r| r.phone_number == phone)
    }

    /// 获取特定手机号的抽奖记录
    pub fn record_for_phone(&self, phone: &str) -> Option<ParticipationRecord> {
        self.records().into_iter().find(|r| r.phone_number == phone)
    }

    /// 检查当前设备是否已经抽过奖
    pub fn has_device_drawn(&mut self) -> bool {
        let device_id = self.device_id();
        self.read_json::<DeviceStatus>(DEVICE_STATUS_KEY)
            .map(|status| status.has_drawn(&device_id))
            .unwrap_or(false)
    }

    /// 获取当前设备的抽奖记录
    pub fn device_record(&mut self) -> Option<ParticipationRecord> {
        let device_id = self.device_id();
        self.records()
            .into_iter()
            .find(|r| r.device_id.as_deref() == Some(device_id.as_str()))
    }

    /// 追加抽奖记录并标记当前设备已抽奖
    pub fn add_record(&mut self, phone: &str, result: &str) -> ParticipationRecord {
        let device_id = self.device_id();
        let record = ParticipationRecord {
            phone_number: phone.to_string(),
            result: result.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            device_id: Some(device_id.clone()),
        };

        let mut records = self.records();
        records.push(record.clone());
        if self.write_json(RECORDS_KEY, &records) {
            self.mark_device_drawn(&device_id);
        }

        record
    }

    /// 清空当前设备的全部抽奖数据：它的记录、设备状态和设备ID
    ///
    /// 其它设备的记录保持不变，相当于只清空这一个浏览器的本地存储。
    pub fn clear_all(&mut self) {
        let device_id = self.device_id();

        let records = self.records();
        let total = records.len();
        let kept: Vec<ParticipationRecord> = records
            .into_iter()
            .filter(|r| r.device_id.as_deref() != Some(device_id.as_str()))
            .collect();
        if kept.len() != total {
            self.write_json(RECORDS_KEY, &kept);
        }

        if let Some(mut status) = self.read_json::<DeviceStatus>(DEVICE_STATUS_KEY)
            && status.forget(&device_id)
        {
            self.write_json(DEVICE_STATUS_KEY, &status);
        }

        if let Err(e) = self.store.remove(DEVICE_ID_KEY) {
            log::error!("Failed to remove device id: {e}");
        }
        self.device_id = None;
        log::info!(
            "Cleared lottery data for device {device_id} ({} records)",
            total - kept.len()
        );
    }

    fn mark_device_drawn(&mut self, device_id: &str) {
        let mut status: DeviceStatus = self.read_json(DEVICE_STATUS_KEY).unwrap_or_default();
        status.mark_drawn(device_id);
        self.write_json(DEVICE_STATUS_KEY, &status);
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::error!("Failed to read '{key}': {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                log::error!("Failed to decode '{key}': {e}");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Failed to encode '{key}': {e}");
                return false;
            }
        };
        match self.store.set(key, &raw) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to write '{key}': {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ClientStore, DeviceSession, MemoryStore, StoreError};

    /// 任何操作都失败的存储，模拟不可用的 localStorage
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
        fn clear(&mut self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
    }

    #[test]
    fn test_add_record_then_phone_has_drawn() {
        let mut store = MemoryStore::new();
        let mut storage = LotteryStorage::new(&mut store);

        assert!(!storage.has_phone_drawn("13800000000"));
        let record = storage.add_record("13800000000", "谢谢参与");

        assert!(storage.has_phone_drawn("13800000000"));
        assert_eq!(
            storage.record_for_phone("13800000000").as_ref(),
            Some(&record)
        );
        assert!(!storage.has_phone_drawn("13900000000"));
    }

    #[test]
    fn test_device_id_is_idempotent_and_persisted() {
        let mut store = MemoryStore::new();
        let first = {
            let mut storage = LotteryStorage::new(&mut store);
            let first = storage.device_id();
            assert_eq!(storage.device_id(), first);
            first
        };
        assert!(first.starts_with("device_"));
        assert_eq!(store.get(DEVICE_ID_KEY).unwrap(), Some(first.clone()));

        let mut storage = LotteryStorage::new(&mut store);
        assert_eq!(storage.device_id(), first);
    }

    #[test]
    fn test_add_record_marks_device() {
        let mut store = MemoryStore::new();
        let mut storage = LotteryStorage::new(&mut store);

        assert!(!storage.has_device_drawn());
        assert_eq!(storage.device_record(), None);

        storage.add_record("17865579967", "一人免单套餐");

        assert!(storage.has_device_drawn());
        let record = storage.device_record().unwrap();
        assert_eq!(record.result, "一人免单套餐");
        assert_eq!(record.device_id, Some(storage.device_id()));
    }

    #[test]
    fn test_clear_all_resets_device() {
        let mut store = MemoryStore::new();
        let mut storage = LotteryStorage::new(&mut store);
        storage.add_record("13800000000", "谢谢参与");
        assert!(storage.has_device_drawn());

        storage.clear_all();

        assert!(!storage.has_device_drawn());
        assert!(storage.records().is_empty());
        assert_eq!(store.get(DEVICE_ID_KEY).unwrap(), None);
    }

    #[test]
    fn test_clear_all_keeps_other_devices() {
        let mut shared = MemoryStore::new();
        let mut alice = DeviceSession::from_cookie(Some("device_1_aaaaaaaaa".into()));
        let mut bob = DeviceSession::from_cookie(Some("device_2_bbbbbbbbb".into()));

        {
            let mut client = ClientStore::new(&mut shared, &mut alice);
            LotteryStorage::new(&mut client).add_record("17865579967", "一人免单套餐");
        }
        {
            let mut client = ClientStore::new(&mut shared, &mut bob);
            let mut storage = LotteryStorage::new(&mut client);
            storage.add_record("13800000000", "谢谢参与");
            storage.clear_all();
            assert!(!storage.has_phone_drawn("13800000000"));
        }
        assert!(bob.is_cleared());

        let mut client = ClientStore::new(&mut shared, &mut alice);
        let mut storage = LotteryStorage::new(&mut client);
        assert!(storage.has_device_drawn());
        assert!(storage.has_phone_drawn("17865579967"));
        assert_eq!(storage.records().len(), 1);
    }

    #[test]
    fn test_records_are_stored_as_json_array() {
        let mut store = MemoryStore::new();
        LotteryStorage::new(&mut store).add_record("13800000000", "谢谢参与");

        let raw = store.get(RECORDS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["phoneNumber"], "13800000000");
        assert_eq!(value[0]["result"], "谢谢参与");

        let status = store.get(DEVICE_STATUS_KEY).unwrap().unwrap();
        assert!(status.contains("true"));
    }

    #[test]
    fn test_corrupt_data_reads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(RECORDS_KEY, "{not json").unwrap();
        store.set(DEVICE_STATUS_KEY, "[1,2,3]").unwrap();

        let mut storage = LotteryStorage::new(&mut store);
        assert!(storage.records().is_empty());
        assert!(!storage.has_phone_drawn("13800000000"));
        assert!(!storage.has_device_drawn());
    }

    #[test]
    fn test_broken_store_degrades_silently() {
        let mut store = BrokenStore;
        let mut storage = LotteryStorage::new(&mut store);

        let id = storage.device_id();
        assert_eq!(storage.device_id(), id);
        assert!(storage.records().is_empty());
        assert!(!storage.has_device_drawn());

        let record = storage.add_record("13800000000", "谢谢参与");
        assert_eq!(record.phone_number, "13800000000");
        assert!(!storage.has_phone_drawn("13800000000"));

        storage.clear_all();
    }
}
