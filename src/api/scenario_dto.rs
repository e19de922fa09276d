use serde::{Deserialize, Serialize};

use crate::domain::schedule::time_ledger::DEFAULT_HORIZON;
use crate::domain::scheduler::scheduler_config::SchedulerConfig;
use crate::domain::task_graph::graph::TaskGraph;
use crate::domain::topology::topology::Topology;
use crate::domain::utils::id::{NodeId, TaskId};
use crate::error::{ConversionError, Error};

/// Root of a scenario file.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDto {
    pub topology: TopologyDto,
    pub task_graph: TaskGraphDto,

    #[serde(default)]
    pub scheduler: SchedulerConfigDto,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TopologyDto {
    pub nodes: Vec<u32>,

    /// Undirected connections as `[a, b]` node id pairs.
    #[serde(default)]
    pub links: Vec<[u32; 2]>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskGraphDto {
    pub tasks: Vec<TaskDto>,

    #[serde(default)]
    pub dependencies: Vec<DependencyDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: u32,
    pub cost: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DependencyDto {
    pub from: u32,
    pub to: u32,
    pub weight: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfigDto {
    /// `random` / `greedy` (or the numeric codes `1` / `5`).
    pub placement: Option<String>,

    /// `critical-path` / `out-degree` / `reverse-critical-path` (or `1` / `12` / `16`).
    pub queue_policy: Option<String>,

    pub link_count: Option<usize>,
    pub duplex: Option<bool>,
    pub horizon: Option<u64>,

    /// Drops the horizon entirely.
    pub unbounded: Option<bool>,

    pub seed: Option<u64>,
}

impl TryFrom<TopologyDto> for Topology {
    type Error = Error;

    fn try_from(dto: TopologyDto) -> Result<Self, Self::Error> {
        let mut topology = Topology::new();

        for node in &dto.nodes {
            topology.add_node_with_id(NodeId::new(*node))?;
        }

        for [a, b] in &dto.links {
            for endpoint in [a, b] {
                if topology.node(NodeId::new(*endpoint)).is_none() {
                    log::error!("InvalidTopologyConfiguration: link {} - {} references unknown node {}.", a, b, endpoint);
                    return Err(ConversionError::UnknownNodeReference(*endpoint).into());
                }
            }
            topology.connect(NodeId::new(*a), NodeId::new(*b))?;
        }

        Ok(topology)
    }
}

impl TryFrom<TaskGraphDto> for TaskGraph {
    type Error = Error;

    fn try_from(dto: TaskGraphDto) -> Result<Self, Self::Error> {
        let mut graph = TaskGraph::new();

        for task in &dto.tasks {
            graph.add_task_with_id(TaskId::new(task.id), task.cost)?;
        }

        for dependency in &dto.dependencies {
            for endpoint in [dependency.from, dependency.to] {
                if graph.task(TaskId::new(endpoint)).is_none() {
                    log::error!("InvalidTaskGraphConfiguration: dependency {} -> {} references unknown task {}.", dependency.from, dependency.to, endpoint);
                    return Err(ConversionError::UnknownTaskReference(endpoint).into());
                }
            }
            graph.add_dependency(TaskId::new(dependency.from), TaskId::new(dependency.to), dependency.weight)?;
        }

        Ok(graph)
    }
}

impl TryFrom<SchedulerConfigDto> for SchedulerConfig {
    type Error = ConversionError;

    fn try_from(dto: SchedulerConfigDto) -> Result<Self, Self::Error> {
        let mut config = SchedulerConfig::default();

        if let Some(placement) = &dto.placement {
            config.placement = placement.parse()?;
        }
        if let Some(policy) = &dto.queue_policy {
            config.queue_policy = policy.parse()?;
        }
        if let Some(link_count) = dto.link_count {
            if link_count == 0 {
                return Err(ConversionError::InvalidScenario("linkCount must be at least 1".to_string()));
            }
            config.link_count = link_count;
        }

        config.duplex = dto.duplex.unwrap_or(false);
        config.horizon = match dto.unbounded {
            Some(true) => None,
            _ => Some(dto.horizon.unwrap_or(DEFAULT_HORIZON)),
        };
        config.seed = dto.seed;

        Ok(config)
    }
}
