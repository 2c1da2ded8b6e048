use clap::Parser;
use course_roster::config::toml_config::SOURCE_BUNDLE;
use course_roster::core::partition::RosterPartitioner;
use course_roster::domain::ports::{ConfigProvider, EnrollmentStore};
use course_roster::utils::error::{ErrorSeverity, RosterError};
use course_roster::utils::{logger, validation::Validate};
use course_roster::{
    CliConfig, CourseService, ExportEngine, HttpEnrollmentStore, InMemoryEnrollmentStore,
    LocalStorage, RosterConfig, RosterExportPipeline,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 先解析配置才能決定日誌格式
    let (log_format, config) = cli.bootstrap();
    logger::init_logger(cli.verbose, log_format);
    tracing::info!("Starting course-roster");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli, config).await {
        tracing::error!(
            "❌ Roster export failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(
    cli: CliConfig,
    config: Result<RosterConfig, RosterError>,
) -> Result<(), RosterError> {
    let config = config?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated");

    // 命令列 --monitor 優先，否則依配置檔
    let monitor_enabled = cli.monitor || config.monitoring_enabled();
    let store = build_store(&config).await?;
    let partitioner = config.partitioner();

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        return dry_run(store, partitioner, &config).await;
    }

    let storage = LocalStorage::new(config.output_path());
    let pipeline = RosterExportPipeline::new(storage, store, partitioner, config);
    let engine = ExportEngine::new_with_monitoring(pipeline, monitor_enabled);

    let output_path = engine.run().await?;
    println!("✅ Roster export completed successfully!");
    println!("📁 Output saved to: {}", output_path);
    Ok(())
}

async fn build_store(config: &RosterConfig) -> Result<Arc<dyn EnrollmentStore>, RosterError> {
    match (&config.source.path, &config.source.endpoint) {
        (Some(path), _) if config.source.r#type == SOURCE_BUNDLE => {
            tracing::info!("📁 Loading data bundle from: {}", path);
            Ok(Arc::new(InMemoryEnrollmentStore::from_json_file(path).await?))
        }
        (_, Some(endpoint)) => {
            tracing::info!("🌐 Using enrollment API at: {}", endpoint);
            let mut store = HttpEnrollmentStore::new(endpoint.as_str());
            if let Some(timeout) = config.source.timeout_seconds {
                store = store.with_timeout(Duration::from_secs(timeout));
            }
            Ok(Arc::new(store))
        }
        _ => Err(RosterError::MissingConfigError {
            field: "source.path or source.endpoint".to_string(),
        }),
    }
}

async fn dry_run(
    store: Arc<dyn EnrollmentStore>,
    partitioner: RosterPartitioner,
    config: &RosterConfig,
) -> Result<(), RosterError> {
    let courses = CourseService::with_partitioner(store, partitioner);
    let details = courses.get_sections_for_course(config.course_id()).await?;

    println!("Course: {} ({})", details.course.name, details.course.id);
    for section in &details.sections {
        println!(
            "  Section {}: {} teams, {} students",
            section.name,
            section.teams.len(),
            section.student_count()
        );
    }
    println!(
        "Totals: {} sections, {} teams, {} students, {} yet to join",
        details.stats.sections_total,
        details.stats.teams_total,
        details.stats.students_total,
        details.stats.unregistered_total
    );
    println!(
        "Would write: {}/{}",
        config.output_path(),
        config.archive_name()
    );
    Ok(())
}
