pub mod campaign;
pub mod debug;
pub mod lottery;

pub use campaign::campaign_config;
pub use debug::debug_config;
pub use lottery::lottery_config;
