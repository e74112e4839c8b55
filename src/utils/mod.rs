pub mod device_id;
pub mod phone;

pub use device_id::generate_device_id;
pub use phone::*;
