//! Trains the recurrent adder and prints its progress.

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use carry_rnn::{
    adversarial_example, probe, train_loop, BinaryCodec, ExampleGenerator, SequenceModel,
    TrainConfig,
};

#[derive(Parser, Debug)]
#[command(name = "carry-rnn")]
#[command(about = "Train a recurrent network to add binary numbers")]
struct Args {
    /// JSON training config; flags below override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Number of training iterations (one example each)
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Seed for weight initialization and example generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// SGD learning rate
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Print a progress report every N iterations
    #[arg(long)]
    report_every: Option<usize>,

    /// Write the effective config to this path before training
    #[arg(long)]
    write_config: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("carry_rnn=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TrainConfig::load_json(path)?,
        None => TrainConfig::default(),
    };
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(learning_rate) = args.learning_rate {
        config.learning_rate = learning_rate;
    }
    if let Some(report_every) = args.report_every {
        config.report_every = report_every;
    }
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);
    config.validate()?;

    if let Some(path) = &args.write_config {
        config.save_json(path)?;
        info!("wrote config to {}", path);
    }

    info!(seed, "building model");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut model = SequenceModel::new(config.model.clone(), &mut rng)?;
    let mut generator = ExampleGenerator::new(BinaryCodec::new(config.width)?, rng);
    let mut optimizer = config.optimizer();

    train_loop(&mut model, &mut generator, &mut optimizer, &config, |report| {
        println!("{}", report.probe);
        println!("{}", report.stats.loss);
    });

    let codec = *generator.codec();
    let hard = adversarial_example(&codec);
    let result = probe(&model, &hard, &codec);
    println!("{}", hard.inputs);
    println!("{}", result.rounded_matrix());
    println!("{}", result);

    Ok(())
}
