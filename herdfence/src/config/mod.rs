mod herdfence_config;

pub use herdfence_config::HerdfenceConfig;
