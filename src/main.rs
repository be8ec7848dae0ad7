use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aviator_sim::agents::{AdaptiveLearning, AgentStrategy, FixedFraction, KellyCriterion, Martingale};
use aviator_sim::api::{ApiServer, AppState};
use aviator_sim::backtest::BacktestEngine;
use aviator_sim::config::Config;
use aviator_sim::entropy::{EntropySource, OsEntropy, SeededEntropy};
use aviator_sim::safety::{SafetyManager, DISCLAIMER};
use aviator_sim::storage::MemoryStore;
use aviator_sim::types::AgentId;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("aviator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Provably-fair crash game simulator and strategy backtester")
        .arg(
            Arg::new("mode")
                .value_parser(["backtest", "serve"])
                .default_value("backtest")
                .help("Run a backtest or serve the HTTP API"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML config file"),
        )
        .arg(
            Arg::new("rounds")
                .short('r')
                .long("rounds")
                .value_name("N")
                .value_parser(clap::value_parser!(u32))
                .help("Number of rounds for backtest mode"),
        )
        .arg(
            Arg::new("rng-seed")
                .long("rng-seed")
                .value_name("SEED")
                .value_parser(clap::value_parser!(u64))
                .help("Seed all randomness for a reproducible run"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .default_value("info")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Skip the banner and disclaimer"),
        )
        .get_matches();

    let log_level = matches.get_one::<String>("log-level").unwrap();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load(path)
            .await
            .with_context(|| format!("failed to load config from {path}"))?,
        None => Config::default(),
    };
    if let Some(rounds) = matches.get_one::<u32>("rounds") {
        config.backtest.num_rounds = *rounds;
    }
    if let Some(seed) = matches.get_one::<u64>("rng-seed") {
        config.backtest.rng_seed = Some(*seed);
    }

    if !matches.get_flag("quiet") {
        print_banner();
        println!("{DISCLAIMER}\n");
    }

    match matches.get_one::<String>("mode").unwrap().as_str() {
        "serve" => serve(config).await,
        _ => run_backtest(config),
    }
}

fn run_backtest(config: Config) -> Result<()> {
    let entropy: Box<dyn EntropySource> = match config.backtest.rng_seed {
        Some(seed) => Box::new(SeededEntropy::new(seed)),
        None => Box::new(OsEntropy),
    };

    let mut agents = build_roster(&config);
    if agents.is_empty() {
        anyhow::bail!("no agents enabled in config");
    }
    let names: Vec<(AgentId, String)> = agents
        .iter()
        .map(|a| (a.id(), a.name().to_string()))
        .collect();

    let mut engine = BacktestEngine::new(entropy);
    let report = engine.run(&mut agents, config.backtest.num_rounds)?;

    for (id, name) in names {
        let metrics = &report.metrics[&id];
        info!(
            %id,
            strategy = name.as_str(),
            total_return = format!("{:+.2}%", metrics.total_return * 100.0).as_str(),
            max_drawdown = format!("{:.2}%", metrics.max_drawdown * 100.0).as_str(),
            risk_ratio = format!("{:.4}", metrics.risk_ratio).as_str(),
            final_balance = format!("{:.2}", metrics.final_balance).as_str(),
            "backtest result"
        );
    }
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let safety = SafetyManager::new(
        config.safety.max_bet_fraction,
        config.safety.max_daily_loss,
    );
    let state = AppState::new(MemoryStore::new(), safety);
    ApiServer::new(config.api, state).serve().await
}

/// Build the enabled agents in a fixed, stable order.
fn build_roster(config: &Config) -> Vec<Box<dyn AgentStrategy>> {
    let balance = config.backtest.initial_balance;
    let mut roster: Vec<Box<dyn AgentStrategy>> = Vec::new();

    let ff = &config.agents.fixed_fraction;
    if ff.enabled {
        roster.push(Box::new(FixedFraction::new(
            AgentId(1),
            balance,
            ff.fraction,
            ff.target_multiplier,
        )));
    }
    let kelly = &config.agents.kelly;
    if kelly.enabled {
        roster.push(Box::new(KellyCriterion::new(
            AgentId(2),
            balance,
            kelly.win_prob,
            kelly.odds,
        )));
    }
    let mg = &config.agents.martingale;
    if mg.enabled {
        roster.push(Box::new(Martingale::new(
            AgentId(3),
            balance,
            mg.base_bet,
            mg.target_multiplier,
        )));
    }
    let ad = &config.agents.adaptive;
    if ad.enabled {
        roster.push(Box::new(AdaptiveLearning::new(
            AgentId(4),
            balance,
            ad.target_multiplier,
        )));
    }
    roster
}

fn print_banner() {
    println!(
        r#"
    ___        _       __             _____ _
   /   |_   __(_)___ _/ /_____  _____/ ___/(_)___ ___
  / /| | | / / / __ `/ __/ __ \/ ___/\__ \/ / __ `__ \
 / ___ | |/ / / /_/ / /_/ /_/ / /   ___/ / / / / / / /
/_/  |_|___/_/\__,_/\__/\____/_/   /____/_/_/ /_/ /_/

  provably-fair crash rounds · strategy backtesting
"#
    );
}
