//! Word count over a text file, one map task per line.
//!
//! Prints one `word : count` line per distinct word, in no particular order.

use anyhow::{Context, Result};
use clap::Parser;
use mapflow_common::{DEFAULT_BUFFER_CAPACITY, EngineConfig, MapflowError, init_tracing};
use mapflow_core::input::read_records;
use mapflow_core::{Engine, WordCount};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "wc", version, about = "Count words with a parallel map/reduce run")]
struct Args {
    /// Input text file
    #[arg(short, long)]
    input: PathBuf,

    /// Capacity of the merge buffers between stages
    #[arg(long, default_value_t = DEFAULT_BUFFER_CAPACITY)]
    buffer_capacity: usize,

    /// Limit on concurrently running map/reduce tasks (unbounded if omitted)
    #[arg(long)]
    max_concurrent_tasks: Option<usize>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let records = read_records(&args.input)
        .await
        .with_context(|| format!("read input file {}", args.input.display()))?;

    let mut config = EngineConfig::new().with_buffer_capacity(args.buffer_capacity);
    if let Some(limit) = args.max_concurrent_tasks {
        config = config.with_max_concurrent_tasks(limit);
    }
    let engine = Engine::try_new(config).context("invalid engine options")?;

    info!(records = records.len(), input = %args.input.display(), "starting word count");
    let mut output = engine.run(Arc::new(WordCount), records);
    while let Some(tuple) = output.recv().await {
        println!("{tuple}");
    }

    let stats = match output.join().await {
        Ok(stats) => stats,
        Err(err) => {
            error!(error = %err, "{}", failure_note(&err));
            return Err(err).context("word count run failed");
        }
    };
    info!(
        words = stats.reduce_tasks,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "word count finished"
    );
    Ok(())
}

/// How much of the printed output can be trusted after a failed run.
fn failure_note(err: &MapflowError) -> &'static str {
    if err.is_run_fault() {
        "run aborted midway, counts printed above are incomplete"
    } else {
        "run did not start, nothing was counted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapflow_common::Stage;

    #[test]
    fn test_failure_note_distinguishes_aborted_runs() {
        let fault = MapflowError::task_panicked(Stage::Reduce, "the", "boom");
        assert!(failure_note(&fault).contains("incomplete"));

        let config = MapflowError::invalid_config("buffer_capacity must be greater than zero");
        assert!(failure_note(&config).contains("did not start"));
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["wc", "--input", "words.txt"]);
        assert_eq!(args.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert_eq!(args.max_concurrent_tasks, None);
        assert_eq!(args.log_level, "warn");
    }
}
