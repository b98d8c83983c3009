pub mod request;
pub mod response;

pub mod alarm;
pub mod google_device;
pub mod timer;
