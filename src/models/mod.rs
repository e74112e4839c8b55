pub mod campaign;
pub mod common;
pub mod lottery;
pub mod prize;
pub mod record;

pub use campaign::*;
pub use common::*;
pub use lottery::*;
pub use prize::*;
pub use record::*;
