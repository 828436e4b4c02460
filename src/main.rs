//! Yggdrasil key generator CLI
//!
//! Usage:
//!   ygg_genkeys                  # Search on all cores until Ctrl+C
//!   ygg_genkeys -t 4 -T 600      # 4 threads, stop after 10 minutes
//!   ygg_genkeys --ipv6-nice -v   # Prefer addresses with long zero runs

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ygg_genkeys::report::format_duration;
use ygg_genkeys::{Config, SearchCoordinator, SearchOutcome};

fn main() {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let settings = config.search_settings();

    // Print startup info
    println!("Yggdrasil Key Generator");
    println!("=======================");
    println!("Threads: {}", settings.worker_count());
    println!("Mode:    {}", settings.mode);
    if let Some(budget) = settings.time_budget {
        println!("Timeout: {}", format_duration(budget));
    }
    if let Some(target) = settings.target_zero_bits {
        println!("Target:  {} leading zero bits", target);
    }
    println!();

    let coordinator = SearchCoordinator::new(settings);
    ctrlc_handler(coordinator.stop_handle());

    println!("Searching... (Press Ctrl+C to stop)\n");

    match coordinator.run(|report| println!("{}", report)) {
        Ok(outcome) => print_summary(&outcome),
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "ygg_genkeys=debug"
    } else {
        "ygg_genkeys=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(outcome: &SearchOutcome) {
    println!("\n--- Final Statistics ---");
    println!("Stopped:              {}", outcome.reason);
    println!("Total keys generated: {}", outcome.total_keys);
    println!("Time elapsed:         {}", format_duration(outcome.elapsed));
    println!(
        "Average speed:        {:.0} keys per second",
        outcome.keys_per_second
    );
    if let Some(best) = &outcome.best {
        println!("Best leading zeros:   {}", best.leading_zero_bits());
        println!("Best zero groups:     {}", best.zero_address_groups());
    }
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    }) {
        warn!("Ctrl-C handler unavailable: {}", e);
    }
}
