use clap::Parser;

mod commands;

use commands::build::{run_build, BuildArgs};
use commands::combine::run_combine;
use commands::ingest::run_ingest;
use commands::query::{run_query, QueryArgs};
use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    bisque::logging::init_logger(cli.verbose);

    let result = match cli.command {
        Commands::IngestCortex { in_dir, out_dir } => run_ingest(&in_dir, &out_dir),
        Commands::BuildClassic {
            in_dir,
            out_dir,
            signature_size,
            block_size,
            hashes,
            config,
        } => run_build(BuildArgs {
            in_dir: &in_dir,
            out_dir: &out_dir,
            signature_size,
            block_size,
            hashes,
            config,
        }),
        Commands::Combine {
            in_dir,
            out_dir,
            batch_size,
        } => run_combine(&in_dir, &out_dir, batch_size),
        Commands::Query {
            index,
            query,
            query_file,
            threshold,
            num_results,
            extra_index,
            no_mmap,
            output,
        } => run_query(QueryArgs {
            index,
            query,
            query_file,
            threshold,
            num_results,
            extra_index,
            no_mmap,
            output,
        }),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
