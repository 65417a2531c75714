//! Track connectivity for an operating entity, memoized by map version.
//!
//! A walk starts at the cities holding the entity's station tokens and
//! follows track across tiles. Cities filled with other owners' tokens are
//! reached but not passed through.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use tw_core::{Edge, EntityId, HexId, Track};

use crate::map::Map;
use crate::tile::PathEnd;

/// A path on a specific hex, by index into the hex tile's paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathRef {
    pub hex: HexId,
    pub index: usize,
}

/// A city or town on a specific hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub hex: HexId,
    pub end: PathEnd,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Paths of this gauge are not walked. Dual track is always walked.
    pub skip_track: Option<Track>,
    /// Full cities do not block the walk.
    pub ignore_tokens: bool,
}

/// Everything an entity's network touches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Connectivity {
    hexes: HashMap<HexId, BTreeSet<Edge>>,
    paths: HashSet<PathRef>,
    nodes: HashSet<NodeRef>,
    reachable: HashSet<HexId>,
}

impl Connectivity {
    /// Walk from the cities holding `entity`'s tokens.
    pub fn compute(map: &Map, entity: EntityId, opts: WalkOptions) -> Self {
        let mut out = Self::default();
        let mut seeds = Vec::new();

        for token in map.tokens_of(entity) {
            let Some(loc) = token.location else {
                continue;
            };
            let Ok(hex) = map.hex(loc.hex) else {
                continue;
            };
            // A station lets its owner build out of the hex in any direction
            out.hexes
                .entry(hex.id)
                .or_default()
                .extend(hex.neighbor_edges());
            seeds.push(NodeRef {
                hex: hex.id,
                end: PathEnd::City(loc.city),
            });
        }

        out.walk(map, entity, seeds, opts);
        out
    }

    /// Walk from explicit starting nodes.
    pub fn compute_from(
        map: &Map,
        entity: EntityId,
        seeds: impl IntoIterator<Item = NodeRef>,
        opts: WalkOptions,
    ) -> Self {
        let mut out = Self::default();
        out.walk(map, entity, seeds.into_iter().collect(), opts);
        out
    }

    fn walk(&mut self, map: &Map, entity: EntityId, seeds: Vec<NodeRef>, opts: WalkOptions) {
        let skipped = |track: Track| opts.skip_track == Some(track);
        let mut nodes_to_visit: Vec<NodeRef> = Vec::new();
        for seed in seeds {
            if self.nodes.insert(seed) {
                nodes_to_visit.push(seed);
            }
        }

        // (hex, path index, end we entered the path from)
        let mut frontier: Vec<(HexId, usize, PathEnd)> = Vec::new();
        let mut visited: HashSet<PathRef> = HashSet::new();

        loop {
            if let Some(node) = nodes_to_visit.pop() {
                let Ok(tile) = map.hex_tile(node.hex) else {
                    continue;
                };
                for (index, path) in tile.paths().iter().enumerate() {
                    if path.touches(node.end) && !skipped(path.track) {
                        frontier.push((node.hex, index, node.end));
                    }
                }
                continue;
            }

            let Some((hex_id, index, from)) = frontier.pop() else {
                break;
            };
            if !visited.insert(PathRef { hex: hex_id, index }) {
                continue;
            }
            let (Ok(hex), Ok(tile)) = (map.hex(hex_id), map.hex_tile(hex_id)) else {
                continue;
            };
            let Some(path) = tile.paths().get(index).copied() else {
                continue;
            };

            self.paths.insert(PathRef { hex: hex_id, index });
            self.reachable.insert(hex_id);
            for edge in path.exits() {
                self.hexes.entry(hex_id).or_default().insert(edge);
                if let Some(neighbor) = hex.neighbor(edge) {
                    self.hexes.entry(neighbor).or_default().insert(edge.invert());
                }
            }

            match path.other_end(from) {
                Some(PathEnd::Edge(edge)) => {
                    let Some(neighbor) = hex.neighbor(edge) else {
                        continue;
                    };
                    let Ok(next_tile) = map.hex_tile(neighbor) else {
                        continue;
                    };
                    let entry = PathEnd::Edge(edge.invert());
                    for (next_index, next) in next_tile.paths().iter().enumerate() {
                        if next.touches(entry) && !skipped(next.track) && path.tracks_match(next) {
                            frontier.push((neighbor, next_index, entry));
                        }
                    }
                }
                Some(end) => {
                    let node = NodeRef { hex: hex_id, end };
                    if self.nodes.insert(node) && !Self::blocks(map, entity, node, opts) {
                        nodes_to_visit.push(node);
                    }
                }
                None => {}
            }
        }
    }

    /// A city full of other owners' tokens cannot be run through.
    fn blocks(map: &Map, entity: EntityId, node: NodeRef, opts: WalkOptions) -> bool {
        if opts.ignore_tokens {
            return false;
        }
        let PathEnd::City(i) = node.end else {
            return false;
        };
        let Ok(tile) = map.hex_tile(node.hex) else {
            return false;
        };
        let Some(city) = tile.cities.get(i as usize) else {
            return false;
        };
        city.is_full()
            && !city
                .tokens
                .iter()
                .any(|&t| map.token(t).map(|tok| tok.owner == entity).unwrap_or(false))
    }

    /// Edges of `hex` the network reaches, if any.
    pub fn connected_edges(&self, hex: HexId) -> Option<&BTreeSet<Edge>> {
        self.hexes.get(&hex)
    }

    pub fn connected_hexes(&self) -> &HashMap<HexId, BTreeSet<Edge>> {
        &self.hexes
    }

    pub fn is_path_connected(&self, path: PathRef) -> bool {
        self.paths.contains(&path)
    }

    pub fn connected_nodes(&self) -> &HashSet<NodeRef> {
        &self.nodes
    }

    /// Hexes holding track the network runs over.
    pub fn is_reachable(&self, hex: HexId) -> bool {
        self.reachable.contains(&hex)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Network {
    Main,
    Gauge(Track),
}

#[derive(Debug)]
struct CacheEntry {
    version: u64,
    connectivity: Rc<Connectivity>,
}

/// Memoized connectivity keyed on (entity, network) and the map version.
///
/// Entries computed for an older map version are recomputed on the next read.
#[derive(Debug, Default)]
pub struct GraphCache {
    skip_track: Option<Track>,
    entries: RefCell<HashMap<(EntityId, Network), CacheEntry>>,
}

impl GraphCache {
    pub fn new(skip_track: Option<Track>) -> Self {
        Self {
            skip_track,
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Gauge the main network ignores.
    pub fn skip_track(&self) -> Option<Track> {
        self.skip_track
    }

    fn cached(
        &self,
        map: &Map,
        key: (EntityId, Network),
        compute: impl FnOnce() -> Connectivity,
    ) -> Rc<Connectivity> {
        if let Some(entry) = self.entries.borrow().get(&key) {
            if entry.version == map.version() {
                return Rc::clone(&entry.connectivity);
            }
        }
        let connectivity = Rc::new(compute());
        tracing::debug!(entity = %key.0, version = map.version(), "connectivity recomputed");
        self.entries.borrow_mut().insert(
            key,
            CacheEntry {
                version: map.version(),
                connectivity: Rc::clone(&connectivity),
            },
        );
        connectivity
    }

    /// The entity's station network.
    pub fn connectivity(&self, map: &Map, entity: EntityId) -> Rc<Connectivity> {
        let opts = WalkOptions {
            skip_track: self.skip_track,
            ignore_tokens: false,
        };
        self.cached(map, (entity, Network::Main), || {
            Connectivity::compute(map, entity, opts)
        })
    }

    /// Track of one gauge reachable from the nodes of the station network,
    /// not blocked by tokens.
    pub fn gauge_network(&self, map: &Map, entity: EntityId, gauge: Track) -> Rc<Connectivity> {
        let main = self.connectivity(map, entity);
        let opts = WalkOptions {
            skip_track: gauge.opposite(),
            ignore_tokens: true,
        };
        self.cached(map, (entity, Network::Gauge(gauge)), || {
            Connectivity::compute_from(map, entity, main.connected_nodes().iter().copied(), opts)
        })
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MapBuilder;
    use crate::tile::Tile;
    use tw_core::{Axial, TileColor};

    fn e(n: u8) -> Edge {
        Edge::new(n).unwrap()
    }

    /// Three hexes in a column: city, straight track, blank.
    fn column() -> (Map, [HexId; 3]) {
        let mut b = MapBuilder::new();
        let city = Tile::new("city", TileColor::Yellow)
            .with_city(1, 20)
            .with_paths(&["c0-e0"])
            .unwrap();
        let straight = Tile::new("9", TileColor::Yellow)
            .with_paths(&["e3-e0"])
            .unwrap();
        let h0 = b.add_hex("A1", Axial::new(0, 0), city);
        let h1 = b.add_hex("A2", Axial::new(0, 1), straight);
        let h2 = b.add_blank_hex("A3", Axial::new(0, 2));
        (b.build().unwrap(), [h0, h1, h2])
    }

    #[test]
    fn walk_follows_track_across_hexes() {
        let (mut map, [h0, h1, h2]) = column();
        let corp = EntityId::from_index(7);
        map.place_token(corp, h0, 0).unwrap();

        let c = Connectivity::compute(&map, corp, WalkOptions::default());
        assert!(c.is_reachable(h0));
        assert!(c.is_reachable(h1));
        assert!(!c.is_reachable(h2));
        assert!(c.connected_edges(h2).unwrap().contains(&e(3)));
        assert!(c.is_path_connected(PathRef { hex: h1, index: 0 }));
        // Token hex is open in every direction that has a neighbor
        assert_eq!(c.connected_edges(h0).unwrap().len(), 1);
    }

    #[test]
    fn no_tokens_no_network() {
        let (map, [h0, ..]) = column();
        let c = Connectivity::compute(&map, EntityId::from_index(1), WalkOptions::default());
        assert!(c.connected_edges(h0).is_none());
        assert!(c.connected_nodes().is_empty());
    }

    #[test]
    fn cache_follows_map_version() {
        let (mut map, [h0, _, h2]) = column();
        let corp = EntityId::from_index(3);
        let cache = GraphCache::new(None);

        let before = cache.connectivity(&map, corp);
        assert!(before.connected_edges(h2).is_none());

        map.place_token(corp, h0, 0).unwrap();
        let after = cache.connectivity(&map, corp);
        assert!(after.connected_edges(h2).is_some());

        // Same version, same shared result
        let again = cache.connectivity(&map, corp);
        assert!(Rc::ptr_eq(&after, &again));
    }
}
