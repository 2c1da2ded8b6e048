use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::ProcessMonitor;

pub struct ExportEngine<P: Pipeline> {
    pipeline: P,
    monitor: ProcessMonitor,
}

impl<P: Pipeline> ExportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ProcessMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting roster export...");
        self.monitor.log_stats("Start");

        let students = self.pipeline.extract().await?;
        tracing::info!("Extracted {} student records", students.len());
        self.monitor.log_stats("Extract");

        let bundle = self.pipeline.transform(students).await?;
        let stats = bundle.details.stats;
        tracing::info!(
            "Partitioned roster: {} sections, {} teams, {} students ({} yet to join)",
            stats.sections_total,
            stats.teams_total,
            stats.students_total,
            stats.unregistered_total
        );
        self.monitor.log_stats("Transform");

        let output_path = self.pipeline.load(bundle).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
