pub mod error;
pub mod executor;
pub mod filter;
pub mod notify;
pub mod pipeline;
pub mod query;
pub mod registry;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{PipelineError, RegistryError};
pub use executor::RequestExecutor;
pub use filter::{first_rejection, reduce, Rejection};
pub use notify::{DeliveryReport, NotificationDispatcher};
pub use pipeline::{ListPipeline, PipelineRun};
pub use query::build_catalog_query;
pub use registry::{JobRegistry, JobRunner};
pub use router::{route, BackendRequest, PreparedBackend};
