use clap::{Arg, ArgAction, Command};
use colored::*;
use std::process;
use std::str::FromStr;

use deimos::{config::SweepConfig, network::ProbeMode, scanner::engine::SweepEngine, utils::cidr};

fn print_banner() {
    println!("{}", " ____  _____ ___ __  __  ___  ____  ".truecolor(142, 68, 173).bold());
    println!("{}", "|  _ \\| ____|_ _|  \\/  |/ _ \\/ ___| ".truecolor(142, 68, 173).bold());
    println!("{}", "| | | |  _|  | || |\\/| | | | \\___ \\ ".truecolor(142, 68, 173).bold());
    println!("{}", "| |_| | |___ | || |  | | |_| |___) |".truecolor(142, 68, 173).bold());
    println!("{}", "|____/|_____|___|_|  |_|\\___/|____/ ".truecolor(142, 68, 173).bold());
    println!();
    println!("{}", "Deimos – The God of Dread. Twin of Phobos ⚡".truecolor(255, 215, 0).bold());
    println!("{}", "\"No silent host stays hidden.\"".truecolor(142, 68, 173));
    println!();
}

fn build_cli() -> Command {
    Command::new("deimos")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Concurrent ICMP host-liveness sweeper")
        .arg(
            Arg::new("cidr")
                .help("Network range to sweep, in CIDR notation (e.g. 192.168.1.0/24)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase verbosity (-v tags lines with workers, -vv reports dead hosts too)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress the banner and all non-essential output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("workers")
                .short('w')
                .long("workers")
                .help("Worker count (default: derived from the host count)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("probe")
                .long("probe")
                .help("Probe mechanism: 'ping' (subprocess, unprivileged) or 'raw' (raw ICMP socket)")
                .value_parser(["ping", "raw"]),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout-ms")
                .help("Per-host reply timeout in milliseconds")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let matches = build_cli().get_matches();
    let quiet = matches.get_flag("quiet");

    let mut config = SweepConfig::load_default_config();
    config.target = matches
        .get_one::<String>("cidr")
        .expect("cidr is a required argument")
        .clone();

    if quiet {
        config.verbosity = 0;
    } else {
        let verbose = matches.get_count("verbose");
        if verbose > 0 {
            config.verbosity = verbose.min(2);
        }
    }

    if let Some(&workers) = matches.get_one::<usize>("workers") {
        config.workers = Some(workers);
    }

    if let Some(probe) = matches.get_one::<String>("probe") {
        match ProbeMode::from_str(probe) {
            Ok(mode) => config.probe = mode,
            Err(e) => {
                eprintln!("deimos: {}", e);
                process::exit(1);
            }
        }
    }

    if let Some(&timeout_ms) = matches.get_one::<u64>("timeout") {
        config.timeout_ms = timeout_ms;
    }

    if !quiet {
        print_banner();
    }

    let range = match cidr::parse_cidr(&config.target) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("deimos: {:#}", e);
            process::exit(1);
        }
    };

    let engine = match SweepEngine::new(range.base, range.host_count, &config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("deimos: {}", e);
            process::exit(1);
        }
    };

    println!("Scanning network: {}", config.target);
    println!("Total hosts to scan: {}", range.host_count);
    if config.verbosity > 0 {
        println!(
            "Using {} workers ({} probe)",
            engine.worker_count(),
            config.probe.name()
        );
        println!("Verbosity: {}\n", config.verbosity);
    }

    // An interrupt reaps every in-flight ping subprocess before exiting;
    // raw-socket workers simply never get to their next host.
    let registry = engine.registry();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let killed = registry.kill_all();
            log::warn!("interrupted; terminated {} outstanding probes", killed);
            process::exit(130);
        }
    });

    if let Err(e) = engine.run().await {
        eprintln!("deimos: {}", e);
        process::exit(1);
    }
}
