use std::sync::Arc;

use crate::config::LotteryConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    DeviceStatusResponse, DrawResponse, ParticipationScope, PrizeEntry, PrizeTable, PrizeVariant,
    WheelSpinResponse,
};
use crate::sequencer::{Sequencer, WheelConfig, plan_rotation};
use crate::services::DrawEngine;
use crate::storage::{ClientStore, DeviceSession, LotteryStorage, SharedStore};
use crate::utils::{sanitize_phone_input, validate_cn_phone};

/// 活动抽奖流程：设备校验 -> 手机号校验 -> 手机号去重 -> 抽奖 -> 记录
#[derive(Clone)]
pub struct LotteryService {
    store: SharedStore,
    grid_engine: Arc<DrawEngine>,
    wheel_engine: Arc<DrawEngine>,
    sequencer: Arc<Sequencer>,
    wheel: WheelConfig,
}

impl LotteryService {
    pub fn new(store: SharedStore, config: &LotteryConfig) -> AppResult<Self> {
        let grid = Arc::new(PrizeTable::grid());
        let wheel = Arc::new(PrizeTable::wheel());
        config.wheel.validate()?;

        Ok(Self {
            store,
            grid_engine: Arc::new(DrawEngine::new(
                grid.clone(),
                config.override_map(),
                config.keyed_fallback(),
            )?),
            wheel_engine: Arc::new(DrawEngine::weighted(wheel)?),
            sequencer: Arc::new(Sequencer::new(grid, config.animation.clone())?),
            wheel: config.wheel.clone(),
        })
    }

    /// 新建一个空闲的动画驱动（每条动画流独占一个，互不阻塞）
    pub fn animation_sequencer(&self) -> Sequencer {
        self.sequencer.fresh()
    }

    /// 获取奖品列表
    pub fn list_prizes(&self, variant: PrizeVariant) -> Vec<PrizeEntry> {
        match variant {
            PrizeVariant::Grid => self.grid_engine.table().entries.clone(),
            PrizeVariant::Wheel => self.wheel_engine.table().entries.clone(),
        }
    }

    /// 当前设备的参与状态（必要时为设备分配ID）
    pub async fn device_status(&self, session: &mut DeviceSession) -> DeviceStatusResponse {
        let mut guard = self.store.lock().await;
        let mut client = ClientStore::new(&mut **guard, session);
        let mut storage = LotteryStorage::new(&mut client);

        let device_id = storage.device_id();
        let has_drawn = storage.has_device_drawn();
        let result = if has_drawn {
            storage.device_record().map(|r| r.result)
        } else {
            None
        };

        DeviceStatusResponse {
            device_id,
            has_drawn,
            result,
        }
    }

    /// 抽奖
    ///
    /// 整个流程持有存储锁，同一设备的并发请求不会产生两条记录。
    pub async fn draw(&self, session: &mut DeviceSession, phone: &str) -> AppResult<DrawResponse> {
        let mut guard = self.store.lock().await;
        let mut client = ClientStore::new(&mut **guard, session);
        let mut storage = LotteryStorage::new(&mut client);

        // 设备已参与：直接返回历史结果，不再抽奖
        if storage.has_device_drawn() {
            let previous = storage.device_record().map(|r| r.result);
            log::info!("Device {} already participated", storage.device_id());
            return Ok(DrawResponse::already_participated(
                ParticipationScope::Device,
                previous,
            ));
        }

        let phone = validate_cn_phone(&sanitize_phone_input(phone))?;

        if storage.has_phone_drawn(&phone) {
            let previous = storage.record_for_phone(&phone).map(|r| r.result);
            log::info!("Phone {} already participated", mask_phone(&phone));
            return Ok(DrawResponse::already_participated(
                ParticipationScope::Phone,
                previous,
            ));
        }

        let prize_id = self.grid_engine.select(Some(phone.as_str()));
        let prize = self
            .grid_engine
            .table()
            .get(prize_id)
            .cloned()
            .ok_or_else(|| AppError::InternalError(format!("Drawn prize {prize_id} missing")))?;
        let cell_index = self
            .grid_engine
            .table()
            .index_of(prize_id)
            .ok_or_else(|| AppError::InternalError(format!("Drawn prize {prize_id} missing")))?;
        let frames = self.sequencer.frames(prize_id)?;

        let record = storage.add_record(&phone, &prize.text);
        log::info!(
            "Phone {} drew prize {} ({})",
            mask_phone(&phone),
            prize.id,
            prize.text
        );

        Ok(DrawResponse::drawn(prize, cell_index, record, frames))
    }

    /// 转盘（独立玩法，不做参与校验，也不记录）
    pub fn spin_wheel(&self, from_deg: f64) -> AppResult<WheelSpinResponse> {
        let table = self.wheel_engine.table();
        let prize_id = self.wheel_engine.select(None);
        let (sector_index, prize) = table
            .entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.id == prize_id)
            .map(|(i, e)| (i, e.clone()))
            .ok_or_else(|| AppError::InternalError(format!("Wheel prize {prize_id} missing")))?;

        let rotation_deg = plan_rotation(
            &self.wheel,
            from_deg,
            table.len(),
            sector_index,
            &mut rand::thread_rng(),
        )?;

        Ok(WheelSpinResponse {
            prize,
            sector_index,
            rotation_deg,
            duration_ms: self.wheel.duration_ms,
        })
    }

    /// 清空当前设备的抽奖数据（调试用，不影响其它设备）
    pub async fn clear_all(&self, session: &mut DeviceSession) {
        let mut guard = self.store.lock().await;
        let mut client = ClientStore::new(&mut **guard, session);
        LotteryStorage::new(&mut client).clear_all();
        log::warn!("Device lottery data cleared via debug endpoint");
    }
}

/// 日志中隐藏手机号中间四位
fn mask_phone(phone: &str) -> String {
    if phone.len() == 11 && phone.is_ascii() {
        format!("{}****{}", &phone[..3], &phone[7..])
    } else {
        "***".to_string()
    }
}
