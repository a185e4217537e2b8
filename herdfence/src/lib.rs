pub mod app;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod service;
pub mod store;
