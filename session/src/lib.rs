//! vartab Session
//!
//! The root editing context for a variant table.
//!
//! Responsibilities:
//! - Own the document, its configuration and its mutation runner
//! - Expose every sanctioned edit as an undoable operation
//! - Rebuild the pair table and prune orphaned notes after structural edits
//! - Drive presentation callbacks (invalidate, layout, render, status, focus)
//! - Load and save the persisted document shape
//! - Install a tracing subscriber for embedding applications

mod error;
mod hooks;
pub mod logging;
mod persist;
mod workbench;

pub use error::{SessionError, SessionResult};
pub use hooks::{NullPresenter, Presenter, PresenterEvent, RecordingPresenter, WorkbenchHooks};
pub use persist::{from_json, parse_json, to_json};
pub use workbench::{Focus, Workbench, WorkbenchTransaction};
