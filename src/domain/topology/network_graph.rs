use rand::{Rng, RngCore};
use std::collections::HashMap;

use crate::api::topology_dto::{LinkDto, NodeDto, TopologyDto};
use crate::domain::topology::graph::{Action, RoutingGraph, State};
use crate::domain::topology::link::Link;
use crate::domain::topology::node::Node;
use crate::domain::utils::id::{LinkIndex, NodeIndex};
use crate::error::{Error, Result};

/// Models the routing network as an indexed graph.
///
/// The `NetworkGraph` owns:
/// * **Nodes**: indexed in the order they appear in the topology file.
/// * **Links**: indexed in file order, each carrying capacity and traffic.
/// * **Adjacency**: the precomputed, ordered list of hops leaving every node.
///
/// Structure is fixed after construction; only link traffic changes.
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    name: Option<String>,
    nodes: Vec<Node>,
    links: Vec<Link>,

    /// Outgoing hops per node, sorted by link index. The position inside the
    /// inner vector is the action index an agent selects.
    adjacency: Vec<Vec<Action>>,

    /// Whether a link may also be traversed from its target to its source.
    bidirectional: bool,
}

impl TryFrom<(TopologyDto, bool)> for NetworkGraph {
    type Error = Error;

    fn try_from(args: (TopologyDto, bool)) -> Result<Self> {
        let (dto, bidirectional) = args;

        // 1. Nodes, with a lookup from file identifier to index.
        let (nodes, node_lookup) = NetworkGraph::setup_nodes(&dto)?;

        // 2. Links, resolving their endpoints.
        let links = NetworkGraph::setup_links(&dto, &node_lookup)?;

        // 3. Ordered outgoing hops per node.
        let adjacency = NetworkGraph::setup_adjacency(nodes.len(), &links, bidirectional);

        let graph = NetworkGraph { name: dto.name, nodes, links, adjacency, bidirectional };

        log::debug!(
            "NetworkGraph built: {} nodes, {} links, max out degree {}, bidirectional: {}",
            graph.nodes.len(),
            graph.links.len(),
            graph.max_out_degree(),
            graph.bidirectional
        );

        Ok(graph)
    }
}

impl NetworkGraph {
    /// Builds a graph from plain `(source, target, capacity)` triples over
    /// nodes `0..num_nodes`. Mostly useful for tests and synthetic topologies.
    pub fn from_edges(num_nodes: usize, edges: &[(usize, usize, f64)], bidirectional: bool) -> Result<Self> {
        let dto = TopologyDto {
            name: None,
            nodes: (0..num_nodes).map(|i| NodeDto { id: i.to_string() }).collect(),
            links: edges
                .iter()
                .enumerate()
                .map(|(i, (source, target, capacity))| LinkDto {
                    id: format!("L{}", i),
                    source: source.to_string(),
                    target: target.to_string(),
                    capacity: *capacity,
                })
                .collect(),
        };

        NetworkGraph::try_from((dto, bidirectional))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.get())
    }

    pub fn is_bidirectional(&self) -> bool {
        self.bidirectional
    }

    fn outgoing(&self, node: NodeIndex) -> Result<&[Action]> {
        self.adjacency.get(node.get()).map(Vec::as_slice).ok_or(Error::NodeNotFound(node.get()))
    }

    fn setup_nodes(dto: &TopologyDto) -> Result<(Vec<Node>, HashMap<String, NodeIndex>)> {
        let mut nodes = Vec::with_capacity(dto.nodes.len());
        let mut lookup = HashMap::with_capacity(dto.nodes.len());

        for (i, node_dto) in dto.nodes.iter().enumerate() {
            let index = NodeIndex::new(i);
            if lookup.insert(node_dto.id.clone(), index).is_some() {
                return Err(Error::InvalidTopology(format!("duplicate node id '{}'", node_dto.id)));
            }
            nodes.push(Node::new(index, node_dto.id.clone()));
        }

        if nodes.len() < 2 {
            return Err(Error::InvalidTopology(format!("at least 2 nodes are required, found {}", nodes.len())));
        }

        Ok((nodes, lookup))
    }

    fn setup_links(dto: &TopologyDto, node_lookup: &HashMap<String, NodeIndex>) -> Result<Vec<Link>> {
        let mut links = Vec::with_capacity(dto.links.len());
        let mut seen_ids = HashMap::with_capacity(dto.links.len());

        for (i, link_dto) in dto.links.iter().enumerate() {
            if seen_ids.insert(link_dto.id.clone(), i).is_some() {
                return Err(Error::InvalidTopology(format!("duplicate link id '{}'", link_dto.id)));
            }

            let resolve = |endpoint: &str| {
                node_lookup
                    .get(endpoint)
                    .copied()
                    .ok_or_else(|| Error::InvalidTopology(format!("link '{}' references unknown node '{}'", link_dto.id, endpoint)))
            };
            let source = resolve(&link_dto.source)?;
            let target = resolve(&link_dto.target)?;

            if source == target {
                return Err(Error::InvalidTopology(format!("link '{}' is a self loop on '{}'", link_dto.id, link_dto.source)));
            }

            if !(link_dto.capacity.is_finite() && link_dto.capacity > 0.0) {
                return Err(Error::InvalidTopology(format!("link '{}' has non-positive capacity {}", link_dto.id, link_dto.capacity)));
            }

            links.push(Link::new(LinkIndex::new(i), link_dto.id.clone(), source, target, link_dto.capacity));
        }

        if links.is_empty() {
            return Err(Error::InvalidTopology("the topology contains no links".to_string()));
        }

        Ok(links)
    }

    fn setup_adjacency(num_nodes: usize, links: &[Link], bidirectional: bool) -> Vec<Vec<Action>> {
        let mut adjacency = vec![Vec::new(); num_nodes];

        // Links are visited in index order, so every list ends up sorted.
        for link in links {
            adjacency[link.source.get()].push(Action { link: link.index, from: link.source, to: link.target });

            if bidirectional {
                adjacency[link.target.get()].push(Action { link: link.index, from: link.target, to: link.source });
            }
        }

        for (node, actions) in adjacency.iter().enumerate() {
            if actions.is_empty() {
                log::warn!("DeadEndNode: node {} has no outgoing links, a packet reaching it can only wait for the step budget.", node);
            }
        }

        adjacency
    }
}

impl RoutingGraph for NetworkGraph {
    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn links(&self) -> &[Link] {
        &self.links
    }

    fn links_mut(&mut self) -> &mut [Link] {
        &mut self.links
    }

    fn get_actions(&self, state: &State) -> Result<Vec<Action>> {
        Ok(self.outgoing(state.current)?.to_vec())
    }

    fn resolve(&self, action: &Action, state: &State) -> Result<State> {
        if action.from != state.current {
            return Err(Error::LinkNotFound { from: state.current.get(), to: action.to.get() });
        }

        let link = self.link(action.link).ok_or(Error::LinkNotFound { from: action.from.get(), to: action.to.get() })?;
        if !link.connects(action.from, action.to, self.bidirectional) {
            return Err(Error::LinkNotFound { from: action.from.get(), to: action.to.get() });
        }

        Ok(state.moved_to(action.to))
    }

    fn terminate(&self, action: &Action, state: &State) -> bool {
        action.to == state.end
    }

    fn get_initial_state(&self, rng: &mut dyn RngCore) -> Result<State> {
        let num_nodes = self.nodes.len();
        if num_nodes < 2 {
            return Err(Error::InvalidTopology(format!("at least 2 nodes are required, found {}", num_nodes)));
        }

        let start = rng.random_range(0..num_nodes);
        // Draw from the remaining n - 1 nodes and skip over `start`.
        let mut end = rng.random_range(0..num_nodes - 1);
        if end >= start {
            end += 1;
        }

        Ok(State::new(NodeIndex::new(start), NodeIndex::new(end)))
    }

    fn max_out_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn path_graph() -> NetworkGraph {
        NetworkGraph::from_edges(3, &[(0, 1, 10.0), (1, 2, 10.0)], true).unwrap()
    }

    #[test]
    fn actions_are_ordered_by_link_index() {
        let graph = NetworkGraph::from_edges(4, &[(0, 1, 1.0), (2, 0, 1.0), (0, 3, 1.0)], true).unwrap();
        let state = State::new(NodeIndex::new(0), NodeIndex::new(3));

        let targets: Vec<usize> = graph.get_actions(&state).unwrap().iter().map(|a| a.to.get()).collect();
        assert_eq!(targets, vec![1, 2, 3]);
        assert_eq!(graph.max_out_degree(), 3);
        assert!(graph.is_bidirectional());
    }

    #[test]
    fn directed_graph_only_offers_forward_hops() {
        let graph = NetworkGraph::from_edges(3, &[(0, 1, 10.0), (1, 2, 10.0)], false).unwrap();
        let state = State::new(NodeIndex::new(1), NodeIndex::new(0));

        assert!(!graph.is_bidirectional());
        let actions = graph.get_actions(&state).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].to, NodeIndex::new(2));
    }

    #[test]
    fn resolve_moves_current_and_keeps_endpoints() {
        let graph = path_graph();
        let state = State::new(NodeIndex::new(0), NodeIndex::new(2));
        let action = graph.get_actions(&state).unwrap()[0];

        let next = graph.resolve(&action, &state).unwrap();
        assert_eq!(next.current, NodeIndex::new(1));
        assert_eq!(next.start, NodeIndex::new(0));
        assert_eq!(next.end, NodeIndex::new(2));
        assert!(!graph.terminate(&action, &state));
    }

    #[test]
    fn resolve_rejects_action_from_another_node() {
        let graph = path_graph();
        let state = State::new(NodeIndex::new(0), NodeIndex::new(2));
        let foreign = Action { link: LinkIndex::new(1), from: NodeIndex::new(1), to: NodeIndex::new(2) };

        assert!(matches!(graph.resolve(&foreign, &state), Err(Error::LinkNotFound { from: 0, to: 2 })));
    }

    #[test]
    fn initial_state_is_reproducible_and_valid() {
        let graph = NetworkGraph::from_edges(5, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)], true).unwrap();
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let a = graph.get_initial_state(&mut rng_a).unwrap();
            let b = graph.get_initial_state(&mut rng_b).unwrap();
            assert_eq!(a, b);
            assert_ne!(a.start, a.end);
            assert_eq!(a.current, a.start);
        }
    }

    #[test]
    fn invalid_topologies_are_rejected() {
        let self_loop = NetworkGraph::from_edges(2, &[(0, 0, 1.0)], true);
        assert!(matches!(self_loop, Err(Error::InvalidTopology(_))));

        let zero_capacity = NetworkGraph::from_edges(2, &[(0, 1, 0.0)], true);
        assert!(matches!(zero_capacity, Err(Error::InvalidTopology(_))));

        let single_node = NetworkGraph::from_edges(1, &[], true);
        assert!(matches!(single_node, Err(Error::InvalidTopology(_))));

        let dto = TopologyDto {
            name: None,
            nodes: vec![NodeDto { id: "A".to_string() }, NodeDto { id: "B".to_string() }],
            links: vec![LinkDto { id: "L".to_string(), source: "A".to_string(), target: "Z".to_string(), capacity: 1.0 }],
        };
        assert!(matches!(NetworkGraph::try_from((dto, true)), Err(Error::InvalidTopology(_))));
    }
}
