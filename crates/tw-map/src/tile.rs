//! Track tiles: paths, cities, towns, borders and rotation.

use std::collections::BTreeSet;
use std::fmt;

use tw_core::{Edge, EDGE_COUNT, HexId, Money, Terrain, TileColor, TileId, TokenId, Track};

use crate::error::{MapError, MapResult};

/// One end of a path: a hex edge, or a city/town on the same tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathEnd {
    Edge(Edge),
    City(u8),
    Town(u8),
}

impl PathEnd {
    fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let kind = chars.next()?;
        let n: u8 = chars.as_str().parse().ok()?;
        match kind {
            'e' => Edge::new(n).ok().map(PathEnd::Edge),
            'c' => Some(PathEnd::City(n)),
            't' => Some(PathEnd::Town(n)),
            _ => None,
        }
    }

    /// Part-wise "is contained in": edges must be the same edge, nodes the same kind.
    fn fits_within(self, other: PathEnd) -> bool {
        match (self, other) {
            (PathEnd::Edge(a), PathEnd::Edge(b)) => a == b,
            (PathEnd::City(_), PathEnd::City(_)) => true,
            (PathEnd::Town(_), PathEnd::Town(_)) => true,
            _ => false,
        }
    }

    fn rotated(self, by: u8) -> Self {
        match self {
            PathEnd::Edge(e) => PathEnd::Edge(e.rotate(by)),
            node => node,
        }
    }

    pub fn is_node(self) -> bool {
        !matches!(self, PathEnd::Edge(_))
    }
}

impl fmt::Display for PathEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathEnd::Edge(e) => write!(f, "e{e}"),
            PathEnd::City(n) => write!(f, "c{n}"),
            PathEnd::Town(n) => write!(f, "t{n}"),
        }
    }
}

/// A piece of track between two ends of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Path {
    pub a: PathEnd,
    pub b: PathEnd,
    pub track: Track,
}

impl Path {
    pub fn new(a: PathEnd, b: PathEnd, track: Track) -> Self {
        Self { a, b, track }
    }

    /// Parse the compact notation `e0-c0`, `e1-e4:narrow`, `t0-e3:dual`.
    pub fn parse(spec: &str) -> MapResult<Self> {
        let invalid = |reason: &str| MapError::InvalidPath {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let (ends, track) = match spec.split_once(':') {
            Some((ends, "broad")) => (ends, Track::Broad),
            Some((ends, "narrow")) => (ends, Track::Narrow),
            Some((ends, "dual")) => (ends, Track::Dual),
            Some(_) => return Err(invalid("unknown gauge")),
            None => (spec, Track::Broad),
        };
        let (a, b) = ends
            .split_once('-')
            .ok_or_else(|| invalid("expected two ends joined by '-'"))?;
        let a = PathEnd::parse(a.trim()).ok_or_else(|| invalid("bad first end"))?;
        let b = PathEnd::parse(b.trim()).ok_or_else(|| invalid("bad second end"))?;
        if a == b {
            return Err(invalid("both ends are the same"));
        }
        Ok(Self::new(a, b, track))
    }

    pub fn ends(&self) -> [PathEnd; 2] {
        [self.a, self.b]
    }

    pub fn touches(&self, end: PathEnd) -> bool {
        self.a == end || self.b == end
    }

    pub fn other_end(&self, end: PathEnd) -> Option<PathEnd> {
        if self.a == end {
            Some(self.b)
        } else if self.b == end {
            Some(self.a)
        } else {
            None
        }
    }

    /// Edges this path leaves the tile through.
    pub fn exits(&self) -> impl Iterator<Item = Edge> + '_ {
        self.ends().into_iter().filter_map(|end| match end {
            PathEnd::Edge(e) => Some(e),
            _ => None,
        })
    }

    /// Cities and towns on this path.
    pub fn nodes(&self) -> impl Iterator<Item = PathEnd> + '_ {
        self.ends().into_iter().filter(|end| end.is_node())
    }

    /// True when all connectivity of `self` is also provided by `other`.
    pub fn is_subset_of(&self, other: &Path) -> bool {
        let ends_fit = (self.a.fits_within(other.a) && self.b.fits_within(other.b))
            || (self.a.fits_within(other.b) && self.b.fits_within(other.a));
        ends_fit && self.track.fits_within(other.track)
    }

    pub fn tracks_match(&self, other: &Path) -> bool {
        self.track.matches(other.track)
    }

    fn rotated(&self, by: u8) -> Self {
        Self {
            a: self.a.rotated(by),
            b: self.b.rotated(by),
            track: self.track,
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)?;
        match self.track {
            Track::Broad => Ok(()),
            Track::Narrow => write!(f, ":narrow"),
            Track::Dual => write!(f, ":dual"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub slots: usize,
    pub revenue: Money,
    pub tokens: Vec<TokenId>,
}

impl City {
    pub fn is_full(&self) -> bool {
        self.tokens.len() >= self.slots
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Town {
    pub revenue: Money,
}

/// A terrain edge. Borders with a cost are removed (and paid for) once track
/// on both sides points across them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub edge: Edge,
    pub cost: Option<Money>,
    pub terrain: Option<Terrain>,
}

/// Cost of building on a hex with the given terrain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainUpgrade {
    pub cost: Money,
    pub terrains: Vec<Terrain>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Assigned when the tile is added to a map.
    pub id: TileId,
    pub name: String,
    pub color: TileColor,
    rotation: u8,
    paths: Vec<Path>,
    pub cities: Vec<City>,
    pub towns: Vec<Town>,
    pub borders: Vec<Border>,
    pub upgrades: Vec<TerrainUpgrade>,
    pub label: Option<String>,
    pub location_name: Option<String>,
    pub unlimited: bool,
    pub preprinted: bool,
    pub blocks_lay: bool,
    pub(crate) hex: Option<HexId>,
}

impl Tile {
    pub fn new(name: impl Into<String>, color: TileColor) -> Self {
        Self {
            id: TileId::from_index(0),
            name: name.into(),
            color,
            rotation: 0,
            paths: Vec::new(),
            cities: Vec::new(),
            towns: Vec::new(),
            borders: Vec::new(),
            upgrades: Vec::new(),
            label: None,
            location_name: None,
            unlimited: false,
            preprinted: false,
            blocks_lay: false,
            hex: None,
        }
    }

    /// Plain white hex with no track.
    pub fn blank() -> Self {
        Self::new("blank", TileColor::White).preprinted()
    }

    pub fn with_path(mut self, path: Path) -> Self {
        self.paths.push(path);
        self
    }

    pub fn with_paths(mut self, specs: &[&str]) -> MapResult<Self> {
        for spec in specs {
            self.paths.push(Path::parse(spec)?);
        }
        Ok(self)
    }

    pub fn with_city(mut self, slots: usize, revenue: Money) -> Self {
        self.cities.push(City {
            slots,
            revenue,
            tokens: Vec::new(),
        });
        self
    }

    pub fn with_town(mut self, revenue: Money) -> Self {
        self.towns.push(Town { revenue });
        self
    }

    pub fn with_border(
        mut self,
        edge: Edge,
        cost: Option<Money>,
        terrain: Option<Terrain>,
    ) -> Self {
        self.borders.push(Border {
            edge,
            cost,
            terrain,
        });
        self
    }

    pub fn with_upgrade(mut self, cost: Money, terrains: Vec<Terrain>) -> Self {
        self.upgrades.push(TerrainUpgrade { cost, terrains });
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_location_name(mut self, name: impl Into<String>) -> Self {
        self.location_name = Some(name.into());
        self
    }

    pub fn unlimited(mut self) -> Self {
        self.unlimited = true;
        self
    }

    pub fn preprinted(mut self) -> Self {
        self.preprinted = true;
        self
    }

    pub fn blocks_lay(mut self) -> Self {
        self.blocks_lay = true;
        self
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Turn the tile to an absolute orientation. Paths and borders follow.
    pub fn rotate(&mut self, rotation: u8) {
        let rotation = rotation % EDGE_COUNT;
        let delta = (rotation + EDGE_COUNT - self.rotation) % EDGE_COUNT;
        if delta == 0 {
            return;
        }
        for path in &mut self.paths {
            *path = path.rotated(delta);
        }
        for border in &mut self.borders {
            border.edge = border.edge.rotate(delta);
        }
        self.rotation = rotation;
    }

    /// Paths in the tile's current orientation.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn has_paths(&self) -> bool {
        !self.paths.is_empty()
    }

    /// Hex the tile is laid on, if any.
    pub fn hex(&self) -> Option<HexId> {
        self.hex
    }

    pub fn exits(&self) -> BTreeSet<Edge> {
        self.paths.iter().flat_map(|p| p.exits()).collect()
    }

    /// For each city, then each town: the edges its track leaves through.
    /// Indexed like `cities` followed by `towns`.
    pub fn node_edges(&self) -> Vec<BTreeSet<Edge>> {
        let nodes = (0..self.cities.len())
            .map(|i| PathEnd::City(i as u8))
            .chain((0..self.towns.len()).map(|i| PathEnd::Town(i as u8)));
        nodes
            .map(|node| {
                self.paths
                    .iter()
                    .filter(|p| p.touches(node))
                    .flat_map(|p| p.exits())
                    .collect()
            })
            .collect()
    }

    /// Edge groups of the cities and towns that have track to an edge.
    pub fn city_town_edges(&self) -> Vec<BTreeSet<Edge>> {
        self.node_edges()
            .into_iter()
            .filter(|edges| !edges.is_empty())
            .collect()
    }

    pub fn node_revenue(&self, end: PathEnd) -> Option<Money> {
        match end {
            PathEnd::City(i) => self.cities.get(i as usize).map(|c| c.revenue),
            PathEnd::Town(i) => self.towns.get(i as usize).map(|t| t.revenue),
            PathEnd::Edge(_) => None,
        }
    }

    /// Sorted revenues of the cities and towns a path runs through.
    pub fn path_revenues(&self, path: &Path) -> Vec<Money> {
        let mut revenues: Vec<Money> = path
            .nodes()
            .filter_map(|node| self.node_revenue(node))
            .collect();
        revenues.sort_unstable();
        revenues
    }

    /// Terrain types printed on the tile.
    pub fn terrain(&self) -> Vec<Terrain> {
        self.upgrades
            .iter()
            .flat_map(|u| u.terrains.iter().copied())
            .collect()
    }

    /// Total terrain cost of building over this tile.
    pub fn terrain_cost(&self) -> Money {
        self.upgrades.iter().map(|u| u.cost).sum()
    }

    /// True when every path of `self` survives on `other` in some orientation.
    pub fn paths_are_subset_of(&self, other: &Tile) -> bool {
        (0..EDGE_COUNT).any(|delta| {
            let rotated: Vec<Path> = other.paths.iter().map(|p| p.rotated(delta)).collect();
            self.paths
                .iter()
                .all(|path| rotated.iter().any(|p| path.is_subset_of(p)))
        })
    }

    pub fn tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.cities.iter().flat_map(|c| c.tokens.iter().copied())
    }

    /// Check that every path end refers to a city or town on the tile.
    pub(crate) fn check_nodes(&self) -> MapResult<()> {
        for end in self.paths.iter().flat_map(|p| p.ends()) {
            let present = match end {
                PathEnd::City(i) => (i as usize) < self.cities.len(),
                PathEnd::Town(i) => (i as usize) < self.towns.len(),
                PathEnd::Edge(_) => true,
            };
            if !present {
                return Err(MapError::MissingNode {
                    tile: self.name.clone(),
                    end: end.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(n: u8) -> Edge {
        Edge::new(n).unwrap()
    }

    #[test]
    fn parse_path_notation() {
        let p = Path::parse("e0-c0").unwrap();
        assert_eq!(p.a, PathEnd::Edge(edge(0)));
        assert_eq!(p.b, PathEnd::City(0));
        assert_eq!(p.track, Track::Broad);

        let n = Path::parse("t0-e3:narrow").unwrap();
        assert_eq!(n.track, Track::Narrow);
        assert_eq!(n.to_string(), "t0-e3:narrow");

        assert!(Path::parse("e0").is_err());
        assert!(Path::parse("e0-e9").is_err());
        assert!(Path::parse("e0-x1").is_err());
        assert!(Path::parse("e1-e1").is_err());
        assert!(Path::parse("e0-e3:meter").is_err());
    }

    #[test]
    fn rotation_moves_exits() {
        let mut tile = Tile::new("7", TileColor::Yellow)
            .with_paths(&["e0-e1"])
            .unwrap();
        tile.rotate(2);
        assert_eq!(tile.rotation(), 2);
        assert_eq!(tile.exits(), [edge(2), edge(3)].into_iter().collect());

        // Absolute, not cumulative
        tile.rotate(1);
        assert_eq!(tile.exits(), [edge(1), edge(2)].into_iter().collect());
    }

    #[test]
    fn subset_respects_gauge_and_ends() {
        let narrow = Path::parse("e0-e3:narrow").unwrap();
        let dual = Path::parse("e3-e0:dual").unwrap();
        let broad = Path::parse("e0-e3").unwrap();
        assert!(narrow.is_subset_of(&dual));
        assert!(!narrow.is_subset_of(&broad));
        assert!(!Path::parse("e0-e2").unwrap().is_subset_of(&broad));
        assert!(Path::parse("e0-c0").unwrap().is_subset_of(&Path::parse("c1-e0").unwrap()));
        assert!(!Path::parse("e0-t0").unwrap().is_subset_of(&Path::parse("e0-c0").unwrap()));
    }

    #[test]
    fn city_town_edges_group_exits() {
        let tile = Tile::new("59", TileColor::Yellow)
            .with_city(1, 40)
            .with_city(1, 40)
            .with_paths(&["e0-c0", "e3-c1"])
            .unwrap();
        let groups = tile.city_town_edges();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], [edge(0)].into_iter().collect());
        assert_eq!(groups[1], [edge(3)].into_iter().collect());
    }

    #[test]
    fn paths_subset_in_some_rotation() {
        let straight = Tile::new("9", TileColor::Yellow)
            .with_paths(&["e1-e4"])
            .unwrap();
        let x = Tile::new("23", TileColor::Green)
            .with_paths(&["e0-e3", "e0-e4"])
            .unwrap();
        assert!(straight.paths_are_subset_of(&x));

        let curve = Tile::new("7", TileColor::Yellow)
            .with_paths(&["e0-e1"])
            .unwrap();
        assert!(!curve.paths_are_subset_of(&x));
    }

    #[test]
    fn trackless_cities_have_no_edge_group() {
        let tile = Tile::new("OO", TileColor::White)
            .with_city(1, 0)
            .with_city(1, 0)
            .with_label("OO");
        assert_eq!(tile.node_edges().len(), 2);
        assert!(tile.city_town_edges().is_empty());
    }

    #[test]
    fn missing_node_detected() {
        let tile = Tile::new("bad", TileColor::Yellow)
            .with_paths(&["e0-c0"])
            .unwrap();
        assert!(matches!(tile.check_nodes(), Err(MapError::MissingNode { .. })));
    }

    #[test]
    fn terrain_and_cost() {
        let tile = Tile::blank()
            .with_upgrade(80, vec![Terrain::Mountain])
            .with_upgrade(20, vec![Terrain::Water]);
        assert_eq!(tile.terrain_cost(), 100);
        assert_eq!(tile.terrain(), vec![Terrain::Mountain, Terrain::Water]);
    }
}
