pub mod cors;
pub mod device;

pub use cors::create_cors;
pub use device::{DeviceMiddleware, take_device_session, store_device_session};
