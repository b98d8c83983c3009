pub mod availability;
pub mod device;
pub mod models;
pub mod sensor;
pub mod topics;
