use std::path::PathBuf;

use clap::Parser;
use log::info;

use sortnet_gnp::config::Config;
use sortnet_gnp::search::GenerateAndPrune;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of inputs.
    #[arg(value_name = "INT", default_value = "4")]
    n: u8,

    /// Maximum number of comparators (defaults to the known upper bound).
    #[clap(short, long, value_name = "INT")]
    k: Option<u8>,

    /// Number of cores to use; one of them orchestrates.
    #[clap(long, value_name = "INT")]
    cores: Option<usize>,

    /// Maximum number of networks per segment file.
    #[clap(long, value_name = "INT", default_value = "5000")]
    segment_size: usize,

    /// Directory for the segment files.
    #[clap(long, value_name = "PATH", default_value = ".")]
    dir: PathBuf,

    /// Skip comparator validation while generating.
    #[clap(long)]
    unsafe_fast: bool,

    /// Keep the segment files when done.
    #[clap(long)]
    keep_files: bool,

    /// Log per-phase details.
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    let mut config = Config::new(args.n)
        .with_segment_capacity(args.segment_size)
        .with_directory(&args.dir)
        .with_safety(!args.unsafe_fast)
        .with_keep_files(args.keep_files);
    if let Some(k) = args.k {
        config = config.with_k(k);
    }
    if let Some(cores) = args.cores {
        config = config.with_cores(cores);
    }

    let time_total = std::time::Instant::now();
    let outcome = GenerateAndPrune::new(config)?.run()?;

    println!("{}", outcome.metrics);
    match &outcome.found {
        Some(network) => {
            println!(
                "sorting network for n = {} with {} comparators:",
                args.n,
                network.len()
            );
            println!("{}", network);
        }
        None => println!(
            "no sorting network found within {} comparators",
            outcome.layers
        ),
    }

    info!("All done in {:.2} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
