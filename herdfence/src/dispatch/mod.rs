mod dispatch_config;
mod dispatch_report;
mod fanout_dispatcher;

pub use dispatch_config::{
    DispatchConfig, DEFAULT_MAX_CONCURRENT_SENDS, DEFAULT_MAX_RADIUS_METERS,
    DEFAULT_MIN_RADIUS_METERS,
};
pub use dispatch_report::{DispatchOutcome, DispatchReport, DispatchStatus};
pub use fanout_dispatcher::FanoutDispatcher;
