pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::partition::OrderingPolicy;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::{RosterConfig, SOURCE_API, SOURCE_BUNDLE};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "course-roster")]
#[command(about = "Partition a course roster into sections and teams and export it")]
pub struct CliConfig {
    /// Path to a TOML configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub course_id: Option<String>,

    /// JSON data bundle holding courses and students
    #[arg(long, conflicts_with = "api_endpoint")]
    pub data_bundle: Option<String>,

    /// Base URL of an enrollment API
    #[arg(long)]
    pub api_endpoint: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Section label that marks students without a section
    #[arg(long)]
    pub default_section: Option<String>,

    /// Group the roster in the order the source returns it, without sorting
    #[arg(long)]
    pub trust_input_order: bool,

    /// Leave summary.json out of the archive
    #[arg(long)]
    pub no_summary: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory between phases")]
    pub monitor: bool,

    /// Show what would be exported without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file, if any, and applies command line overrides.
    pub fn resolve(&self) -> Result<RosterConfig> {
        let mut config = match &self.config {
            Some(path) => RosterConfig::from_file(path)?,
            None => RosterConfig::new(self.course_id.clone().unwrap_or_default()),
        };

        if let Some(course_id) = &self.course_id {
            config.course.id = course_id.clone();
        }
        if let Some(path) = &self.data_bundle {
            config.source.r#type = SOURCE_BUNDLE.to_string();
            config.source.path = Some(path.clone());
        }
        if let Some(endpoint) = &self.api_endpoint {
            config.source.r#type = SOURCE_API.to_string();
            config.source.endpoint = Some(endpoint.clone());
        }
        if let Some(output_path) = &self.output_path {
            config.export.output_path = output_path.clone();
        }
        if let Some(label) = &self.default_section {
            config.partition.default_section = Some(label.clone());
        }
        if self.trust_input_order {
            config.partition.ordering = Some(OrderingPolicy::TrustInput);
        }
        if self.no_summary {
            config.export.include_summary = Some(false);
        }

        Ok(config)
    }

    /// Resolves the configuration and picks the log format it asks for.
    /// A configuration that fails to load falls back to compact logs so the
    /// error itself can still be reported.
    pub fn bootstrap(&self) -> (LogFormat, Result<RosterConfig>) {
        let config = self.resolve();
        let format = config
            .as_ref()
            .map(RosterConfig::log_format)
            .unwrap_or_default();
        (format, config)
    }
}
