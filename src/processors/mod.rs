pub mod command_processor;
pub mod sensor_processor;
