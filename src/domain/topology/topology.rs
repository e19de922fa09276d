use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use slotmap::{SlotMap, new_key_type};

use crate::domain::schedule::data_transmission::DataTransmission;
use crate::domain::topology::compute_node::ComputeNode;
use crate::domain::utils::id::{IdAllocator, NodeId, NodeTag};
use crate::error::{Error, Result};

new_key_type! {
    /// Internal arena key of a compute node.
    pub struct NodeKey;
}

/// Compute nodes connected by undirected logical links.
///
/// The `id_index` defines the canonical node order (ascending id); the order used during
/// assignment is [`Topology::nodes_by_priority`].
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: SlotMap<NodeKey, ComputeNode>,

    /// Index lookup InternalKey (NodeKey) using the user visible id (NodeId).
    id_index: BTreeMap<NodeId, NodeKey>,

    allocator: IdAllocator<NodeTag>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully connected topology with `count` nodes (ids `0..count`).
    pub fn fully_connected(count: usize) -> Self {
        let mut topology = Topology::new();
        for _ in 0..count {
            topology.add_node();
        }
        let keys: Vec<NodeKey> = topology.nodes.keys().collect();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                topology.link_keys(*a, *b);
            }
        }
        topology
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_node(&mut self) -> NodeId {
        let id = self.allocator.allocate();
        let key = self.nodes.insert(ComputeNode::new(id));
        self.id_index.insert(id, key);
        id
    }

    pub fn add_node_with_id(&mut self, id: NodeId) -> Result<NodeId> {
        if self.id_index.contains_key(&id) {
            return Err(Error::DuplicateNode(id));
        }
        self.allocator.observe(id);
        let key = self.nodes.insert(ComputeNode::new(id));
        self.id_index.insert(id, key);
        Ok(id)
    }

    /// Removes a node and every connection to it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<ComputeNode> {
        let key = self.key(id)?;
        self.id_index.remove(&id);
        let node = self.nodes.remove(key).ok_or(Error::UnknownNode(id))?;

        for neighbor in &node.neighbors {
            if let Some(other) = self.nodes.get_mut(*neighbor) {
                other.neighbors.retain(|k| *k != key);
            }
        }
        Ok(node)
    }

    /// Connects two nodes. Connecting an already connected pair is a no-op.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        if a == b {
            return Err(Error::SelfConnection(a));
        }
        let a_key = self.key(a)?;
        let b_key = self.key(b)?;
        self.link_keys(a_key, b_key);
        Ok(())
    }

    fn link_keys(&mut self, a: NodeKey, b: NodeKey) {
        if self.nodes[a].neighbors.contains(&b) {
            return;
        }
        self.nodes[a].neighbors.push(b);
        self.nodes[b].neighbors.push(a);
    }

    pub fn disconnect(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        let a_key = self.key(a)?;
        let b_key = self.key(b)?;
        self.nodes[a_key].neighbors.retain(|k| *k != b_key);
        self.nodes[b_key].neighbors.retain(|k| *k != a_key);
        Ok(())
    }

    pub fn are_connected(&self, a: NodeId, b: NodeId) -> bool {
        match (self.id_index.get(&a), self.id_index.get(&b)) {
            (Some(a_key), Some(b_key)) => self.nodes[*a_key].neighbors.contains(b_key),
            _ => false,
        }
    }

    pub fn neighbors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let key = self.key(id)?;
        Ok(self.nodes[key].neighbors.iter().map(|k| self.nodes[*k].id).collect())
    }

    /// Neighbor count of a node.
    pub fn priority(&self, id: NodeId) -> Result<usize> {
        Ok(self.nodes[self.key(id)?].priority())
    }

    /// All undirected connections as `(smaller id, larger id)` pairs, sorted.
    pub fn connections(&self) -> Vec<(NodeId, NodeId)> {
        let mut connections = Vec::new();
        for node in self.nodes() {
            for neighbor in &node.neighbors {
                let other = self.nodes[*neighbor].id;
                if node.id < other {
                    connections.push((node.id, other));
                }
            }
        }
        connections.sort();
        connections
    }

    pub fn node(&self, id: NodeId) -> Option<&ComputeNode> {
        self.id_index.get(&id).map(|key| &self.nodes[*key])
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &ComputeNode> + '_ {
        self.id_index.values().map(move |key| &self.nodes[*key])
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.id_index.keys().copied().collect()
    }

    /// Node order used by the assignment engine: ascending by priority, ties by id.
    pub fn nodes_by_priority(&self) -> Vec<NodeId> {
        let mut ids = self.node_ids();
        ids.sort_by_key(|id| self.node(*id).map(|n| n.priority()).unwrap_or(0));
        ids
    }

    /// Breadth first traversal from an arbitrary node; connected iff every node is reached.
    ///
    /// An empty topology is reported as not connected.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.id_index.values().next().copied() else {
            return false;
        };

        let mut visited: HashSet<NodeKey> = HashSet::from([start]);
        let mut queue: VecDeque<NodeKey> = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for neighbor in &self.nodes[current].neighbors {
                if visited.insert(*neighbor) {
                    queue.push_back(*neighbor);
                }
            }
        }
        visited.len() == self.nodes.len()
    }

    /// Shortest path (fewest hops) between two nodes, both included.
    ///
    /// If `from == to` the path is the single node.
    ///
    /// # Returns
    /// `Error::NoRoute` if `to` cannot be reached from `from`.
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Result<Vec<NodeId>> {
        let path = self.shortest_path_keys(self.key(from)?, self.key(to)?)?;
        Ok(path.iter().map(|k| self.nodes[*k].id).collect())
    }

    /// Number of topology edges on the shortest path.
    pub fn hop_count(&self, from: NodeId, to: NodeId) -> Result<usize> {
        Ok(self.shortest_path(from, to)?.len() - 1)
    }

    pub(crate) fn shortest_path_keys(&self, from: NodeKey, to: NodeKey) -> Result<Vec<NodeKey>> {
        if from == to {
            return Ok(vec![from]);
        }

        let mut parents: HashMap<NodeKey, NodeKey> = HashMap::new();
        let mut visited: HashSet<NodeKey> = HashSet::from([from]);
        let mut queue: VecDeque<NodeKey> = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                break;
            }
            for neighbor in &self.nodes[current].neighbors {
                if visited.insert(*neighbor) {
                    parents.insert(*neighbor, current);
                    queue.push_back(*neighbor);
                }
            }
        }

        if !parents.contains_key(&to) {
            log::debug!("NoPathFound: {} => {}", self.nodes[from].id, self.nodes[to].id);
            return Err(Error::NoRoute { from: self.nodes[from].id, to: self.nodes[to].id });
        }

        let mut path = vec![to];
        let mut current = to;
        while let Some(parent) = parents.get(&current) {
            path.push(*parent);
            current = *parent;
        }
        path.reverse();
        Ok(path)
    }

    /// Clears every node's schedule and rebuilds links and ledgers so a run starts from a clean state.
    pub fn reset_for_run(&mut self, link_count: usize, duplex: bool, horizon: Option<u64>) -> Result<()> {
        if link_count == 0 {
            return Err(Error::InvalidLinkCount(link_count));
        }
        for node in self.nodes.values_mut() {
            node.reset(link_count, duplex, horizon);
        }
        Ok(())
    }

    /// Maximum over all nodes of the last scheduled task's end time.
    pub fn total_schedule_time(&self) -> u64 {
        self.nodes.values().map(|node| node.last_task_end()).max().unwrap_or(0)
    }

    /// Every hop transmission, ordered by start time, then source task, then source node.
    pub fn transmissions(&self) -> Vec<DataTransmission> {
        let mut transmissions: Vec<DataTransmission> = Vec::new();
        for node in self.nodes() {
            for link in &node.links {
                // Each hop is stored on both endpoints; keep the copy held by the sender.
                transmissions.extend(link.transmissions.iter().filter(|t| t.source_node == node.id && t.source_link == link.number));
            }
        }
        transmissions.sort_by_key(|t| (t.start, t.source_task, t.dest_task, t.source_node));
        transmissions
    }

    pub(crate) fn key(&self, id: NodeId) -> Result<NodeKey> {
        self.id_index.get(&id).copied().ok_or(Error::UnknownNode(id))
    }

    pub(crate) fn get(&self, key: NodeKey) -> &ComputeNode {
        &self.nodes[key]
    }

    pub(crate) fn get_mut(&mut self, key: NodeKey) -> &mut ComputeNode {
        &mut self.nodes[key]
    }
}
