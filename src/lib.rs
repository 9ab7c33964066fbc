pub mod calibration;
pub mod monitor;
pub mod record;
pub mod scope;
pub mod settings;
pub mod stats;
pub mod store;
