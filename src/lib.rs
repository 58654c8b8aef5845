//! Keeps the lesson progress table in a README in sync with the lesson
//! folders on disk.
//!
//! The pipeline is linear: [`Config`] lists the topics, [`status`] classifies
//! each topic folder, [`progress`] tallies the states, [`render`] produces the
//! Markdown block and [`readme`] splices it between the progress markers.

pub mod cli;
pub mod config;
pub mod error;
pub mod progress;
pub mod readme;
pub mod render;
pub mod status;

pub use config::{Config, Settings, Topic};
pub use error::{Error, Result};
pub use progress::ProgressSummary;
pub use readme::PatchOutcome;
pub use status::{FolderState, StatusClassifier};
