mod category;
mod report;
mod result;
mod session;

pub use category::{SyncCategory, DATA_SYNC, FHIR_RESOURCES, VALIDATION};
pub use report::{ConnectionState, ConnectionStatus, StatusView, SyncReport};
pub use result::SyncResult;
pub use session::SessionContext;
