use anagram_pipeline::cli::{self, Cli};
use anagram_pipeline::error::PipelineError;
use clap::Parser;
use tracing::{debug, error, trace};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli::get_log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(cli.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("anagram-pipeline started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = cli::execute(&cli).await {
        let exit_code = match e.downcast_ref::<PipelineError>() {
            Some(pipeline_error) => {
                error!("Fatal error: {}", pipeline_error);
                eprintln!("Error: {}", pipeline_error.user_message());
                pipeline_error.exit_code()
            }
            None => {
                error!("Fatal error: {:#}", e);
                eprintln!("Error: {e:#}");
                1
            }
        };
        std::process::exit(exit_code);
    }
}
