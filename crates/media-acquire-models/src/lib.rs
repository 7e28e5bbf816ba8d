pub mod backend;
pub mod candidate;
pub mod history;
pub mod job;
pub mod media;
pub mod media_ids;
pub mod rules;
pub mod schedule;

pub use backend::{
    AcquisitionBackendConfig, AcquisitionMode, BrokerRequest, DirectManagerConfig, ManagerRequest,
    Outcome, QualityProfile, RequestBrokerConfig, RootFolder, SubmitStatus,
};
pub use candidate::{CandidateItem, CatalogQuery};
pub use history::{AcquiredMediaRecord, Enrichment, NotificationEvent, NotificationKind};
pub use job::{JobRunRecord, ListJobSpec, RunDisposition, RunReport};
pub use media::{JobKey, ListType, MediaKind};
pub use media_ids::ExternalIds;
pub use rules::{FilterRule, ListSettings, PerList};
pub use schedule::normalize_cron;
