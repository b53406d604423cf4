//! Incremental reconciliation of joint geometry into a host document.
//!
//! Joint synthesis emits boolean operations; this crate owns turning
//! them into persisted document features (one base feature plus a join
//! and an intersect combine per target body), updating those features
//! in place across recomputes, and persisting the authoring parameters
//! on the document.

pub mod error;
pub mod gate;
pub mod mock_document;
pub mod persist;
pub mod port;
pub mod reconcile;

pub use error::SyncError;
pub use gate::ComputeGate;
pub use mock_document::MockDocument;
pub use persist::{load_parameters, save_parameters};
pub use port::{CombineKind, DocumentPort, TimelineCursor};
pub use reconcile::reconcile;
