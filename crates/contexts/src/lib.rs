//! # Grantdesk Contexts
//!
//! Company-context records and the repository that manages them per
//! workspace: create/read/update/delete plus JSON export and import, layered
//! on the tenant store.
//!
//! ## Example
//!
//! ```no_run
//! use grantdesk_contexts::{ContextRepository, Result};
//!
//! fn main() -> Result<()> {
//!     let repo = ContextRepository::new("/var/lib/grantdesk");
//!
//!     let mut record = repo.create_default();
//!     record.company_name = "Acme Corp".into();
//!     repo.save("Acme Corp", record, "my-workspace-key")?;
//!
//!     for name in repo.list_names("my-workspace-key")? {
//!         println!("{name}");
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod record;
mod repository;

pub use error::{ContextsError, Result};
pub use record::{now_rfc3339, ContextRecord};
pub use repository::{ContextRepository, IMPORTED_CONTEXT_NAME};
