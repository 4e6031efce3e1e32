//! Reward curves, policy traces and reward statistics for Q-learning run logs.
//!
//! Usage:
//!   rewardcurve <command> [args]
//!
//! Commands:
//!   plot [file[=color] ...]   - Plot cumulative reward of each file into one chart
//!   policy [file]             - Print the learned policy of every run
//!   summary [file] [--json]   - Print reward and transition statistics
//!
//! Environment:
//!   PLOT_OUT, PLOT_WIDTH, PLOT_HEIGHT, PLOT_TITLE, LEGEND_PARAMS, DATA_DIR
//!   LOG_LEVEL, LOG_DOMAINS, LOG_FILE, RUN_ID

use std::io::{self, Write};

use anyhow::Result;
use rewardcurve::cli::{parse_plot_inputs, single_input};
use rewardcurve::config::Config;
use rewardcurve::logging::{info, log, obj, v_str, Domain, Level};
use rewardcurve::plotter::Plotter;
use rewardcurve::policy::write_policy;
use rewardcurve::run::load_runs;
use rewardcurve::stats::EpisodeStats;

fn print_usage() {
    eprintln!("Usage: rewardcurve <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  plot [file[=color] ...]   Plot cumulative reward curves (colors: b r g m c y k or #rrggbb)");
    eprintln!("  policy [file]             Print policy traces");
    eprintln!("  summary [file] [--json]   Print reward statistics");
}

fn cmd_plot(cfg: &Config, args: &[String]) -> Result<()> {
    let inputs = parse_plot_inputs(args, cfg)?;
    let mut plotter = Plotter::new(cfg);
    for input in &inputs {
        plotter.load(&input.path, input.color)?;
    }
    plotter.plot(&cfg.plot_out)?;
    println!("Saved reward plot to {}", cfg.plot_out.display());
    Ok(())
}

fn cmd_policy(cfg: &Config, args: &[String]) -> Result<()> {
    let path = single_input(args, cfg)?;
    let runs = load_runs(&path)?;
    write_policy(&mut io::stdout().lock(), &runs)
}

fn cmd_summary(cfg: &Config, args: &[String]) -> Result<()> {
    let as_json = args.iter().any(|a| a == "--json");
    let rest: Vec<String> = args.iter().filter(|a| *a != "--json").cloned().collect();
    let path = single_input(&rest, cfg)?;
    let runs = load_runs(&path)?;
    let stats = EpisodeStats::from_runs(&runs)?;
    let mut out = io::stdout().lock();
    if as_json {
        writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
        Ok(())
    } else {
        stats.write_to(&mut out)
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(2);
    }

    let cfg = Config::from_env();
    let cmd = args[1].as_str();
    let rest = &args[2..];
    info(Domain::System, "start", obj(&[("command", v_str(cmd))]));

    let result = match cmd {
        "plot" => cmd_plot(&cfg, rest),
        "policy" => cmd_policy(&cfg, rest),
        "summary" => cmd_summary(&cfg, rest),
        _ => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = result {
        log(
            Level::Error,
            Domain::System,
            "failed",
            obj(&[("command", v_str(cmd)), ("error", v_str(&format!("{:#}", err)))]),
        );
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
