use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Single pass: a failure in any phase aborts before anything is written.
    pub fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting conversion...");

        // Extract
        let raw_rows = self.pipeline.extract()?;
        tracing::info!("Extracted {} raw rows", raw_rows.len());
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(raw_rows)?;
        let converted_rows = result.output_rows.len();
        let skipped = result.skipped.clone();
        tracing::info!(
            "Transformed {} rows ({} skipped)",
            converted_rows,
            skipped.total()
        );
        for (reason, count) in skipped.iter() {
            tracing::debug!("  skipped {}: {}", reason.as_str(), count);
        }
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(result)?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(RunSummary {
            output_path,
            converted_rows,
            skipped,
        })
    }
}
