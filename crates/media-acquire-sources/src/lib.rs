pub mod discord;
pub mod error;
pub mod factory;
pub mod history;
pub mod http;
pub mod omdb;
pub mod ombi;
pub mod servarr;
pub mod settings;
pub mod traits;
pub mod trakt;

pub use discord::DiscordNotifier;
pub use error::SourceError;
pub use factory::{notification_providers, HttpBackendFactory};
pub use history::JsonHistoryStore;
pub use http::build_client;
pub use omdb::OmdbEnricher;
pub use ombi::OmbiBroker;
pub use servarr::ServarrManager;
pub use settings::FileSettingsStore;
pub use traits::{
    AppendStatus, BackendFactory, CandidateSource, DirectManager, HistoryStore, MetadataEnricher,
    NotificationProvider, RequestBroker, RunSettings, SettingsStore,
};
pub use trakt::TraktCatalog;
