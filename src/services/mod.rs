pub mod draw_engine;
pub mod lottery_service;

pub use draw_engine::*;
pub use lottery_service::*;
