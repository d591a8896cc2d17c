//! Configuration management for LogShip

pub mod settings;

pub use settings::ShipperConfig;
