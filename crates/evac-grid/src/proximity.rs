//! Per-tick spatial index over live agent positions.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds one entry per live agent, keyed by the
//! agent's cell centre.  It is bulk-loaded from scratch every tick and is
//! read-only until the next rebuild, so every agent's decision in a tick sees
//! the same snapshot.
//!
//! Radius queries use Euclidean distance between cell centres, in cells.
//! Results are returned sorted by `AgentId` so anything folded over them
//! (means, nearest-neighbour ties) is independent of tree layout.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use evac_core::{AgentId, Cell};

// ── Index entries ─────────────────────────────────────────────────────────────

/// What the index knows about one agent: identity, location, and the numeric
/// attributes neighbours average over.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentSample {
    pub id:    AgentId,
    pub cell:  Cell,
    pub speed: f32,
    pub panic: f32,
}

/// Numeric agent attribute that can be averaged over a neighbourhood.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AgentField {
    Speed,
    Panic,
}

impl AgentSample {
    #[inline]
    pub fn field(&self, field: AgentField) -> f32 {
        match field {
            AgentField::Speed => self.speed,
            AgentField::Panic => self.panic,
        }
    }
}

/// Entry stored in the R-tree: the sample plus its 2-D `[x, y]` point.
#[derive(Clone)]
struct IndexEntry {
    point:  [f32; 2],
    sample: AgentSample,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── ProximityIndex ────────────────────────────────────────────────────────────

/// Radius and nearest-neighbour queries over one tick's agent positions.
#[derive(Default)]
pub struct ProximityIndex {
    tree: RTree<IndexEntry>,
}

impl ProximityIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `samples` in one bulk load.
    pub fn build<I: IntoIterator<Item = AgentSample>>(samples: I) -> Self {
        let mut index = Self::new();
        index.rebuild(samples);
        index
    }

    /// Discard the previous snapshot and bulk-load `samples`.
    pub fn rebuild<I: IntoIterator<Item = AgentSample>>(&mut self, samples: I) {
        let entries: Vec<IndexEntry> = samples
            .into_iter()
            .map(|sample| IndexEntry { point: sample.cell.center(), sample })
            .collect();
        self.tree = RTree::bulk_load(entries);
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// All agents whose centre lies within `radius` of `point`, sorted by id.
    pub fn query(&self, point: [f32; 2], radius: f32) -> Vec<AgentSample> {
        let mut hits: Vec<AgentSample> = self
            .tree
            .locate_within_distance(point, radius * radius)
            .map(|e| e.sample)
            .collect();
        hits.sort_unstable_by_key(|s| s.id);
        hits
    }

    /// Mean of `field` over agents within `radius` of `point`.
    ///
    /// `None` when no agent is in range.
    pub fn mean(&self, field: AgentField, point: [f32; 2], radius: f32) -> Option<f32> {
        mean_of(self.query(point, radius).iter(), field)
    }

    /// As [`mean`](Self::mean), but excluding `agent` itself.
    pub fn mean_around(
        &self,
        agent:  AgentId,
        field:  AgentField,
        point:  [f32; 2],
        radius: f32,
    ) -> Option<f32> {
        let hits = self.query(point, radius);
        mean_of(hits.iter().filter(|s| s.id != agent), field)
    }

    /// The closest agent other than `agent` within `radius` of `point`, with
    /// its distance.  Equidistant candidates resolve to the lowest id.
    pub fn closest_other(
        &self,
        agent:  AgentId,
        point:  [f32; 2],
        radius: f32,
    ) -> Option<(AgentSample, f32)> {
        self.tree
            .locate_within_distance(point, radius * radius)
            .filter(|e| e.sample.id != agent)
            .map(|e| (e.sample, e.distance_2(&point)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)))
            .map(|(sample, d2)| (sample, d2.sqrt()))
    }
}

fn mean_of<'a, I>(samples: I, field: AgentField) -> Option<f32>
where
    I: Iterator<Item = &'a AgentSample>,
{
    let (sum, n) = samples.fold((0.0_f32, 0_u32), |(sum, n), s| (sum + s.field(field), n + 1));
    (n > 0).then(|| sum / n as f32)
}
