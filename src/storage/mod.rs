pub mod client;
pub mod file;
pub mod lottery_storage;
pub mod memory;

pub use client::*;
pub use file::*;
pub use lottery_storage::*;
pub use memory::*;

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::StorageConfig;
use crate::error::AppResult;

/// 存储层错误（由 `LotteryStorage` 统一吞掉并记录日志）
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt store data: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// 字符串键值存储，语义对齐浏览器 localStorage
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// 所有 worker 共享的后端存储
pub type SharedStore = Arc<Mutex<Box<dyn KeyValueStore>>>;

pub fn shared_store<S: KeyValueStore + 'static>(store: S) -> SharedStore {
    Arc::new(Mutex::new(Box::new(store)))
}

/// 按配置打开存储：配置了路径用文件存储，否则用内存存储（重启丢失）
pub fn open_store(config: &StorageConfig) -> AppResult<SharedStore> {
    match &config.path {
        Some(path) => {
            let store = FileStore::open(path)?;
            log::info!("Using file store at {path}");
            Ok(shared_store(store))
        }
        None => {
            log::warn!("No store path configured, records will be lost on restart");
            Ok(shared_store(MemoryStore::new()))
        }
    }
}
