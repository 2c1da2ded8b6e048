use crate::core::partition::{OrderingPolicy, RosterPartitioner};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, RosterError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SOURCE_BUNDLE: &str = "bundle";
pub const SOURCE_API: &str = "api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    pub course: CourseConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub partition: PartitionConfig,
    #[serde(default)]
    pub export: ExportConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub default_section: Option<String>,
    pub ordering: Option<OrderingPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    pub include_summary: Option<bool>,
    pub archive_name: Option<String>,
}

fn default_output_path() -> String {
    "./output".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            include_summary: None,
            archive_name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

impl RosterConfig {
    /// 以預設值建立配置（資料來源為 JSON bundle）
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course: CourseConfig {
                id: course_id.into(),
            },
            source: SourceConfig {
                r#type: SOURCE_BUNDLE.to_string(),
                path: None,
                endpoint: None,
                timeout_seconds: None,
            },
            partition: PartitionConfig::default(),
            export: ExportConfig::default(),
            monitoring: None,
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RosterError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ROSTER_API})；未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RosterError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("course.id", &self.course.id)?;
        validation::validate_one_of(
            "source.type",
            &self.source.r#type,
            &[SOURCE_BUNDLE, SOURCE_API],
        )?;

        if self.source.r#type == SOURCE_BUNDLE {
            let path = validation::validate_required_field("source.path", &self.source.path)?;
            validation::validate_path("source.path", path)?;
            validation::validate_file_extension("source.path", path, &["json"])?;
        } else {
            let endpoint =
                validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
            validation::validate_url("source.endpoint", endpoint)?;
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 300)?;
        }

        validation::validate_path("export.output_path", &self.export.output_path)?;
        if let Some(name) = &self.export.archive_name {
            validation::validate_file_extension("export.archive_name", name, &["zip"])?;
        }

        if let Some(label) = &self.partition.default_section {
            validation::validate_non_empty_string("partition.default_section", label)?;
        }

        if let Some(format) = self.monitoring.as_ref().and_then(|m| m.log_format.as_deref()) {
            validation::validate_one_of(
                "monitoring.log_format",
                format,
                &["compact", "text", "json"],
            )?;
        }

        Ok(())
    }

    pub fn partitioner(&self) -> RosterPartitioner {
        let mut partitioner =
            RosterPartitioner::new().with_ordering(self.partition.ordering.unwrap_or_default());
        if let Some(label) = &self.partition.default_section {
            partitioner = partitioner.with_default_section(label.clone());
        }
        partitioner
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_format(&self) -> LogFormat {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .and_then(LogFormat::parse)
            .unwrap_or_default()
    }
}

impl ConfigProvider for RosterConfig {
    fn course_id(&self) -> &str {
        &self.course.id
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn archive_name(&self) -> String {
        self.export
            .archive_name
            .clone()
            .unwrap_or_else(|| format!("{}_roster.zip", self.course.id))
    }

    fn include_summary(&self) -> bool {
        self.export.include_summary.unwrap_or(true)
    }
}

impl Validate for RosterConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
