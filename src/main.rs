use anyhow::{Context, bail};
use clap::Parser;
use colored::Colorize;
use log::LevelFilter;

use tact_scheduler::domain::scheduler::assignment::Scheduler;
use tact_scheduler::domain::scheduler::export::export_csv;
use tact_scheduler::domain::scheduler::metrics::{ScheduleMetrics, compare_algorithms};
use tact_scheduler::domain::scheduler::report::{comparison_report, schedule_report};
use tact_scheduler::domain::scheduler::scheduler_config::SchedulerConfig;
use tact_scheduler::domain::scheduler::scheduler_type::{PlacementAlgorithm, QueuePolicy};
use tact_scheduler::domain::scheduler::validation::{ValidationStatus, validate};
use tact_scheduler::{load_scenario, logger};

/// Schedules a task graph onto a topology of compute nodes with bounded physical links.
#[derive(Parser, Debug)]
#[command(name = "tact-scheduler", version, about, long_about = None)]
struct Cli {
    /// Path to the scenario JSON file
    #[arg(short, long)]
    scenario: String,

    /// Placement algorithm: random | greedy
    #[arg(short, long)]
    placement: Option<PlacementAlgorithm>,

    /// Queue policy: critical-path | out-degree | reverse-critical-path
    #[arg(short, long)]
    queue: Option<QueuePolicy>,

    /// Physical links per compute node
    #[arg(short, long)]
    links: Option<usize>,

    /// Allow one inbound and one outbound transfer per link at the same time
    #[arg(long)]
    duplex: bool,

    /// Ledger horizon in tacts
    #[arg(long, conflicts_with = "unbounded")]
    horizon: Option<u64>,

    /// Do not limit the ledger horizon
    #[arg(long)]
    unbounded: bool,

    /// Seed for the random placement
    #[arg(long)]
    seed: Option<u64>,

    /// Run every placement and queue combination and print their metrics
    #[arg(long)]
    compare: bool,

    /// Export task placements and transmissions to this CSV file
    #[arg(long)]
    csv: Option<String>,

    /// Only log warnings and errors
    #[arg(long)]
    quiet: bool,
}

impl Cli {
    /// Command line values take precedence over the scenario file.
    fn apply(&self, config: &mut SchedulerConfig) {
        if let Some(placement) = self.placement {
            config.placement = placement;
        }
        if let Some(queue) = self.queue {
            config.queue_policy = queue;
        }
        if let Some(links) = self.links {
            config.link_count = links;
        }
        if self.duplex {
            config.duplex = true;
        }
        if let Some(horizon) = self.horizon {
            config.horizon = Some(horizon);
        }
        if self.unbounded {
            config.horizon = None;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.quiet {
        logger::init_with_level(LevelFilter::Warn);
    } else {
        logger::init();
    }

    let mut scenario = load_scenario(&cli.scenario).with_context(|| format!("Failed to load scenario '{}'", cli.scenario))?;
    cli.apply(&mut scenario.config);
    scenario.config.validate()?;

    let status = validate(&scenario.graph, &scenario.topology);
    if !status.is_ok() {
        if status == ValidationStatus::CyclicTaskGraph {
            eprint!("{}", scenario.graph.detect_cycles().describe());
        }
        bail!("Scenario cannot be scheduled: {}", status);
    }

    if cli.compare {
        let results = compare_algorithms(&mut scenario.graph, &mut scenario.topology, &scenario.config)?;
        println!("{}", "Algorithm comparison".bold());
        print!("{}", comparison_report(&results));
        return Ok(());
    }

    let config = scenario.config;
    let queue = scenario.graph.generate_queue(config.queue_policy);
    println!("{}", scenario.graph.queue_report(&queue, config.queue_policy));
    println!();

    let mut scheduler = Scheduler::new(config);
    let schedule = scheduler.schedule_queue(&mut scenario.graph, &mut scenario.topology, &queue)?;
    print!("{}", schedule_report(&schedule, &scenario.topology));

    let metrics = ScheduleMetrics::compute(&schedule, &scenario.graph, &scenario.topology);
    println!(
        "{} Tn = {}, Kp = {:.3}, Ke = {:.3}, Kea = {:.3}",
        "Result:".green().bold(),
        metrics.total_time,
        metrics.speedup,
        metrics.efficiency,
        metrics.critical_efficiency
    );

    if let Some(path) = &cli.csv {
        export_csv(&schedule, path).with_context(|| format!("Failed to export schedule to '{}'", path))?;
    }

    Ok(())
}
