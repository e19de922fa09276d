use crate::api::scenario_dto::ScenarioDto;
use crate::domain::scheduler::assignment::Scheduler;
use crate::domain::scheduler::schedule::Schedule;
use crate::domain::scheduler::scheduler_config::SchedulerConfig;
use crate::domain::task_graph::graph::TaskGraph;
use crate::domain::topology::topology::Topology;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// A task graph, a topology and the configuration to schedule one onto the other.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub graph: TaskGraph,
    pub topology: Topology,
    pub config: SchedulerConfig,
}

impl TryFrom<ScenarioDto> for Scenario {
    type Error = error::Error;

    fn try_from(dto: ScenarioDto) -> Result<Self> {
        let topology = Topology::try_from(dto.topology)?;
        let graph = TaskGraph::try_from(dto.task_graph)?;
        let config = SchedulerConfig::try_from(dto.scheduler)?;
        Ok(Scenario { graph, topology, config })
    }
}

/// Reads a scenario JSON file and builds the domain model from it.
pub fn load_scenario(file_path: &str) -> Result<Scenario> {
    let root_dto: ScenarioDto = parse_json_file::<ScenarioDto>(file_path)?;
    log::info!("JSON file '{}' parsed successfully.", file_path);

    let scenario = Scenario::try_from(root_dto)?;
    log::info!("Scenario constructed: {} tasks, {} compute nodes.", scenario.graph.len(), scenario.topology.len());

    Ok(scenario)
}

/// Schedules a scenario with its own configuration.
pub fn run_scenario(scenario: &mut Scenario) -> Result<Schedule> {
    let mut scheduler = Scheduler::new(scenario.config);
    scheduler.schedule(&mut scenario.graph, &mut scenario.topology)
}
