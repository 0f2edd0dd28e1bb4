use crate::core::{Pipeline, RunReport};
use crate::utils::error::Result;
use std::fmt;
use std::time::Instant;

/// Progress of one run. `Failed` is absorbing and reachable from every
/// non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    Extracted,
    Archived,
    Loaded,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn next(self) -> Option<Self> {
        match self {
            PipelineStage::Start => Some(PipelineStage::Extracted),
            PipelineStage::Extracted => Some(PipelineStage::Archived),
            PipelineStage::Archived => Some(PipelineStage::Loaded),
            PipelineStage::Loaded => Some(PipelineStage::Done),
            PipelineStage::Done | PipelineStage::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Start => "START",
            PipelineStage::Extracted => "EXTRACTED",
            PipelineStage::Archived => "ARCHIVED",
            PipelineStage::Loaded => "LOADED",
            PipelineStage::Done => "DONE",
            PipelineStage::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    stage: PipelineStage,
    failed_after: Option<PipelineStage>,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            stage: PipelineStage::Start,
            failed_after: None,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Last stage reached before the run failed.
    pub fn failed_after(&self) -> Option<PipelineStage> {
        self.failed_after
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Runs every stage once, in order. The first error aborts the run and
    /// nothing already written is rolled back.
    pub async fn run(&mut self) -> Result<RunReport> {
        self.stage = PipelineStage::Start;
        self.failed_after = None;
        let started = Instant::now();

        tracing::info!("🚀 Starting weather ETL run");

        // 1. 擷取
        let extracted = self.pipeline.extract().await;
        let snapshot = self.advance(extracted)?;

        // 2. 寫入 Data Lake (raw zone)
        let archived = self.pipeline.archive(&snapshot).await;
        let archived = self.advance(archived)?;

        // 3. 轉換並寫入 Data Warehouse (trusted zone)
        let loaded = self.pipeline.load(&snapshot).await;
        let rows_appended = self.advance(loaded)?;

        self.transition(PipelineStage::Done);
        tracing::info!("✅ Weather ETL run finished in {:?}", started.elapsed());

        Ok(RunReport {
            archived,
            rows_appended,
        })
    }

    fn advance<T>(&mut self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                if let Some(next) = self.stage.next() {
                    self.transition(next);
                }
                Ok(value)
            }
            Err(e) => {
                tracing::error!(
                    "❌ Weather ETL run failed after {}: {} (Category: {:?})",
                    self.stage,
                    e,
                    e.category()
                );
                self.failed_after = Some(self.stage);
                self.stage = PipelineStage::Failed;
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: PipelineStage) {
        tracing::debug!("Pipeline stage {} -> {}", self.stage, next);
        self.stage = next;
    }
}
