pub mod config;
pub mod handle;
pub mod paths;

pub use config::{
    default_minimum_availability, default_template, AcquisitionConfig, BrokerConfig,
    CatalogConfig, Config, DiscordConfig, EnrichmentConfig, HistoryConfig, ManagerConfig,
    NotificationsConfig, SchedulerConfig,
};
pub use handle::ConfigHandle;
pub use paths::{container_base_path, PathManager};
