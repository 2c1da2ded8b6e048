pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::RosterConfig};

pub use crate::adapters::{DataBundle, HttpEnrollmentStore, InMemoryEnrollmentStore};
pub use crate::core::{
    courses::CourseService,
    engine::ExportEngine,
    partition::{OrderingPolicy, RosterPartitioner},
    pipeline::RosterExportPipeline,
};
pub use crate::domain::model::{
    RosterStats, SectionGroup, StudentRecord, TeamGroup, DEFAULT_SECTION,
};
pub use crate::utils::error::{Result, RosterError};
