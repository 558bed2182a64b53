pub mod error;
pub mod files;
pub mod generation;
pub mod pipeline;
pub mod store;
pub mod traits;

pub use error::{PipelineError, Result};
pub use files::FileStorageClient;
pub use generation::GenerationClient;
pub use pipeline::TryOnPipeline;
pub use store::{PgFileStore, PgRequestStore};
pub use traits::{FileStore, GenerationBackend, GenerationJob, JobImages, RequestStore};
