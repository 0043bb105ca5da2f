//! Gacha planner CLI.
//!
//! Loads a game configuration, simulates the draws needed for a banner and
//! prints the budget plan.
//!
//! Usage:
//!   gacha-planner [OPTIONS]
//!
//! Examples:
//!   gacha-planner --config data/sample_game.json
//!   gacha-planner -t 2 -p 40 --guaranteed --owned 12000
//!   gacha-planner --seed 42 --exact --json

use gacha_planner::build_info;
use gacha_planner::config::{default_config_path, load_game_config, GameConfig};
use gacha_planner::pity::DrawState;
use gacha_planner::planner::{analyze_banner, PlanRequest};
use log::error;
use rust_decimal::Decimal;
use std::env;
use std::io;
use std::path::PathBuf;
use std::process;

struct CliOptions {
    config_path: Option<PathBuf>,
    banner_id: Option<String>,
    request: PlanRequest,
    list_banners: bool,
    json: bool,
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'gacha-planner --help' for usage.");
            process::exit(1);
        }
    };

    let path = match options.config_path.clone() {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = load_game_config(&path).map_err(|e| {
        error!("could not load {}: {}", path.display(), e);
        e
    })?;

    if options.list_banners {
        print_banners(&config);
        return Ok(());
    }

    let banner_id = match options.banner_id.clone().or_else(|| config.default_banner().map(|b| b.id.clone())) {
        Some(id) => id,
        None => {
            eprintln!("{} defines no banners", config.name);
            process::exit(1);
        }
    };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                     GACHA BUDGET PLANNER                      ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Config:         {}", path.display());
    println!("  Banner:         {}", banner_id);
    println!("  Target:         {}", options.request.target_count);
    println!("  Pity counter:   {}", options.request.state.pity_counter);
    println!("  Guaranteed:     {}", options.request.state.guaranteed_loses > 0);
    println!("  Runs:           {}", options.request.sim.num_runs);
    if let Some(seed) = options.request.sim.seed {
        println!("  Seed:           {}", seed);
    }
    println!();

    let Some(analysis) = analyze_banner(&config, &banner_id, &options.request) else {
        eprintln!("Unknown banner or pity system: {}", banner_id);
        process::exit(1);
    };

    println!("{}", analysis.to_text());

    if options.json {
        let filename = format!(
            "plan_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        std::fs::write(&filename, analysis.to_json())?;
        println!("JSON report saved to: {}", filename);
    }

    Ok(())
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    args.get(i + 1)
        .ok_or_else(|| format!("{} needs a value", flag))?
        .parse()
        .map_err(|_| format!("invalid value for {}: {}", flag, args[i + 1]))
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        config_path: None,
        banner_id: None,
        request: PlanRequest::default(),
        list_banners: false,
        json: false,
    };
    let mut pity_counter = 0u32;
    let mut guaranteed = false;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-c" | "--config" => {
                options.config_path = Some(PathBuf::from(parse_value::<String>(args, i, flag)?));
                i += 1;
            }
            "-b" | "--banner" => {
                options.banner_id = Some(parse_value(args, i, flag)?);
                i += 1;
            }
            "-t" | "--target" => {
                options.request.target_count = parse_value::<u32>(args, i, flag)?.max(1);
                i += 1;
            }
            "-p" | "--pity" => {
                pity_counter = parse_value(args, i, flag)?;
                i += 1;
            }
            "-g" | "--guaranteed" => {
                guaranteed = true;
            }
            "-n" | "--runs" => {
                options.request.sim.num_runs = parse_value::<u32>(args, i, flag)?.max(1);
                i += 1;
            }
            "-s" | "--seed" => {
                options.request.sim.seed = Some(parse_value(args, i, flag)?);
                i += 1;
            }
            "--owned" => {
                options.request.owned_main = parse_value::<Decimal>(args, i, flag)?;
                i += 1;
            }
            "--owned-premium" => {
                options.request.owned_premium = parse_value::<Decimal>(args, i, flag)?;
                i += 1;
            }
            "--exact" => {
                options.request.exact = true;
            }
            "--list" => {
                options.list_banners = true;
            }
            "--json" => {
                options.json = true;
            }
            "-V" | "--version" => {
                println!("{}", build_info::version_line());
                process::exit(0);
            }
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    options.request.state = DrawState::new(pity_counter, guaranteed);
    Ok(options)
}

fn print_banners(config: &GameConfig) {
    println!("{} banners:", config.name);
    for banner in &config.banners {
        println!(
            "  {:<20} {:<32} {} {}/draw ({})",
            banner.id, banner.name, banner.cost_per_pull, banner.cost_currency_id, banner.pity_system_id
        );
    }
}

fn print_help() {
    println!("Gacha Budget Planner");
    println!();
    println!("USAGE:");
    println!("    gacha-planner [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>     Game config JSON (default: platform config dir/game.json)");
    println!("    -b, --banner <ID>       Banner to plan for (default: first banner)");
    println!("    -t, --target <N>        Featured copies wanted (default: 1)");
    println!("    -p, --pity <N>          Draws since the last top-rarity hit (default: 0)");
    println!("    -g, --guaranteed        Next top-rarity hit is guaranteed featured");
    println!("    -n, --runs <N>          Simulation runs (default: 5000)");
    println!("    -s, --seed <S>          Random seed for reproducibility");
    println!("    --owned <AMOUNT>        Main currency on hand");
    println!("    --owned-premium <AMT>   Premium currency on hand");
    println!("    --exact                 Also print the exact distribution");
    println!("    --list                  List the config's banners and exit");
    println!("    --json                  Save JSON report");
    println!("    -V, --version           Show version information");
    println!("    -h, --help              Show this help");
    println!();
    println!("Set RUST_LOG=debug for solver details.");
}
