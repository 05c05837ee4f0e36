use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::eval::probe::probe;
use crate::data::generator::ExampleGenerator;
use crate::network::network::SequenceModel;
use crate::optim::sgd::Sgd;
use crate::train::step_stats::{ProgressReport, StepStats, TrainSummary};
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train_step;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `model` for exactly `config.iterations` freshly generated examples.
///
/// # Arguments
/// - `model`     - mutable reference to the model; modified in place
/// - `generator` - source of addition examples, one per iteration
/// - `optimizer` - SGD optimizer (carries learning rate and momentum state)
/// - `config`    - iteration count and reporting interval
/// - `on_report` - called with a `ProgressReport` whenever
///                 `iteration % config.report_every == 0`
///
/// There is no early stopping and no validation split: the loop ends only
/// when the iteration budget is spent.
///
/// # Panics
/// Panics if `config.report_every == 0`; `TrainConfig::validate` rejects it.
pub fn train_loop<R, F>(
    model: &mut SequenceModel,
    generator: &mut ExampleGenerator<R>,
    optimizer: &mut Sgd,
    config: &TrainConfig,
    mut on_report: F,
) -> TrainSummary
where
    R: Rng,
    F: FnMut(&ProgressReport),
{
    assert!(config.report_every > 0, "report_every must be at least 1");

    let t_start = Instant::now();
    let codec = *generator.codec();
    let mut last: Option<StepStats> = None;
    let mut window = LossWindow::default();

    info!(
        iterations = config.iterations,
        params = model.param_count(),
        learning_rate = optimizer.learning_rate,
        "training started"
    );

    for iteration in 0..config.iterations {
        let example = generator.next_example();
        let stats = train_step(model, optimizer, &example);
        window.push(stats.loss);
        last = Some(stats);

        if !stats.loss.is_finite() {
            warn!(iteration, loss = stats.loss, "loss is not finite");
        }

        // ── Probe the example that was just used ──────────────────────────
        if iteration % config.report_every == 0 {
            let report = ProgressReport {
                iteration,
                total_iterations: config.iterations,
                stats,
                window_loss: window.take_mean(),
                probe: probe(model, &example, &codec),
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            debug!(
                iteration,
                loss = report.stats.loss,
                abs_error = report.stats.abs_error,
                window_loss = report.window_loss,
                probe = %report.probe,
                "progress"
            );
            on_report(&report);
        }
    }

    let summary = TrainSummary {
        iterations: config.iterations,
        last,
        final_window_loss: window.mean().unwrap_or(0.0),
        elapsed_ms: t_start.elapsed().as_millis() as u64,
    };
    info!(
        elapsed_ms = summary.elapsed_ms,
        final_window_loss = summary.final_window_loss,
        "training finished"
    );
    summary
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Running loss total between two reports.
#[derive(Default)]
struct LossWindow {
    total: f64,
    count: usize,
    /// Mean of the previous window, kept so the summary still has a value
    /// when the run ends exactly on a report.
    previous: Option<f64>,
}

impl LossWindow {
    fn push(&mut self, loss: f64) {
        self.total += loss;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            self.previous
        } else {
            Some(self.total / self.count as f64)
        }
    }

    fn take_mean(&mut self) -> f64 {
        let mean = self.mean().unwrap_or(0.0);
        self.previous = Some(mean);
        self.total = 0.0;
        self.count = 0;
        mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::spec::ModelConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(seed: u64) -> (SequenceModel, ExampleGenerator<ChaCha8Rng>) {
        let model = SequenceModel::new(ModelConfig::default(), &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        (model, ExampleGenerator::seeded(8, seed).unwrap())
    }

    #[test]
    fn reports_on_the_interval_starting_at_zero() {
        let (mut model, mut generator) = setup(1);
        let config = TrainConfig { report_every: 10, ..TrainConfig::new(35) };
        let mut optimizer = config.optimizer();

        let mut seen = Vec::new();
        let summary = train_loop(&mut model, &mut generator, &mut optimizer, &config, |r| {
            seen.push(r.iteration);
        });

        assert_eq!(seen, vec![0, 10, 20, 30]);
        assert_eq!(summary.iterations, 35);
        assert_eq!(optimizer.iterations(), 35);
        assert!(summary.last.is_some());
    }

    #[test]
    fn zero_iterations_leaves_the_model_untouched() {
        let (mut model, mut generator) = setup(2);
        let before = model.clone();
        let config = TrainConfig::new(0);
        let summary = train_loop(&mut model, &mut generator, &mut config.optimizer(), &config, |_| {});
        assert!(summary.last.is_none());
        assert_eq!(model.output.weights, before.output.weights);
    }

    #[test]
    fn loss_window_tracks_means_between_reports() {
        let mut window = LossWindow::default();
        assert_eq!(window.mean(), None);
        window.push(1.0);
        window.push(3.0);
        assert_eq!(window.take_mean(), 2.0);
        assert_eq!(window.mean(), Some(2.0));
        window.push(5.0);
        assert_eq!(window.mean(), Some(5.0));
    }
}
