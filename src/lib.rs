pub mod backup;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod interchange;
pub mod merge;
pub mod util;

pub use backup::{BackupReport, Orchestrator, RestoreReport, RestoreStatus};
pub use config::Config;
pub use context::{AppContext, StatusSummary};
pub use data::{Database, Stores};
pub use error::{ChronicleError, Result};
pub use interchange::{ExportMeta, Format, InterchangeSummary};
pub use util::DataPaths;
