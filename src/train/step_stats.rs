use serde::{Serialize, Deserialize};

use crate::eval::probe::ProbeResult;

/// Loss and monitoring metric for a single training step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    pub loss: f64,
    /// Sum of absolute error over the example's timesteps.
    pub abs_error: f64,
}

/// Emitted by `train_loop` every `report_every` iterations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// 0-based index of the iteration that was just trained.
    pub iteration: usize,
    pub total_iterations: usize,
    pub stats: StepStats,
    /// Mean loss over the iterations since the previous report.
    pub window_loss: f64,
    /// The just-used example, run forward after its update.
    pub probe: ProbeResult,
    pub elapsed_ms: u64,
}

/// What a finished `train_loop` run returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainSummary {
    pub iterations: usize,
    pub last: Option<StepStats>,
    /// Mean loss over the final reporting window.
    pub final_window_loss: f64,
    pub elapsed_ms: u64,
}
