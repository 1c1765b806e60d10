//! The per-agent motion model: panic, speed, avoidance, path-following.
//!
//! # Per-tick rule for one live agent
//!
//! 1. **Panic** — `panic_gain × mean speed of neighbours within
//!    panic_radius` (self excluded), clamped to `[0, max_panic]`.
//! 2. **Speed** — `base_speed + panic`, in cells per tick.
//! 3. **Stride** — the carried fraction plus `speed`; the integer part is the
//!    number of cells the agent may move this tick.
//! 4. **Route** — keep the cached path if fresh, otherwise plan from the
//!    current cell.  `NoPathFound` makes the agent `Stuck`; it holds position
//!    and retries on later ticks.
//! 5. **Avoidance** — if another agent is within `distance_preference`, the
//!    path heading is rotated 90° away from the closest one and the agent
//!    sidesteps one cell that way instead of following the path.  The other
//!    rotation is tried when the preferred landing is not walkable; with
//!    neither open the agent follows its path.  The path is untouched; the
//!    agent is simply off it, which makes it stale next tick.  After a
//!    sidestep the agent follows its route for [`AVOIDANCE_COOLDOWN_TICKS`]
//!    ticks, so its route length drops by at least one every three ticks.
//! 6. **Follow** — otherwise walk the path, stopping early on an exit.
//!
//! [`decide`] only reads shared state and returns a [`Decision`]; nothing is
//! written until the caller applies the whole tick's decisions.

use evac_core::{AgentId, AgentRng, Cell, Direction, EvacConfig};
use evac_grid::{AgentField, GridError, GridResult, GridWorld, PathPlanner, ProximityIndex};

use crate::state::{AgentStatus, CachedPath, Decision, PathUpdate};
use crate::AgentPool;

/// Ticks an agent must follow its route after a sidestep before it may
/// sidestep again.
pub const AVOIDANCE_COOLDOWN_TICKS: u32 = 2;

// ── MotionParams ──────────────────────────────────────────────────────────────

/// Tunables of the motion model.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionParams {
    pub base_speed:          f32,
    pub panic_radius:        f32,
    /// Avoidance radius.  `0` disables avoidance.
    pub distance_preference: f32,
    pub panic_gain:          f32,
    pub max_panic:           Option<f32>,
    pub max_plan_retries:    Option<u32>,
}

impl MotionParams {
    pub fn from_config(config: &EvacConfig) -> Self {
        Self {
            base_speed:          config.base_speed,
            panic_radius:        config.panic_radius,
            distance_preference: config.distance_preference,
            panic_gain:          config.panic_gain,
            max_panic:           config.max_panic,
            max_plan_retries:    config.max_plan_retries,
        }
    }

    /// Panic produced by a mean neighbour speed (`None` = nobody in range).
    ///
    /// Non-negative, and monotone non-decreasing in `mean_neighbor_speed`.
    pub fn panic_level(&self, mean_neighbor_speed: Option<f32>) -> f32 {
        let raw = (self.panic_gain * mean_neighbor_speed.unwrap_or(0.0)).max(0.0);
        match self.max_panic {
            Some(cap) => raw.min(cap),
            None => raw,
        }
    }

    /// `true` if a stuck agent should try planning again.
    fn should_retry(&self, status: AgentStatus, revision: u64) -> bool {
        match (status, self.max_plan_retries) {
            (AgentStatus::Stuck { retries, revision: last }, Some(max)) if retries >= max => {
                last != revision
            }
            _ => true,
        }
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        Self::from_config(&EvacConfig::default())
    }
}

// ── MotionContext ─────────────────────────────────────────────────────────────

/// Read-only view of everything an agent's decision may consult.
///
/// Built once per tick and shared by every agent's [`decide`] call.
pub struct MotionContext<'a, P: PathPlanner> {
    pub grid:    &'a GridWorld,
    pub agents:  &'a AgentPool,
    pub index:   &'a ProximityIndex,
    pub planner: &'a P,
    pub params:  &'a MotionParams,
}

impl<'a, P: PathPlanner> MotionContext<'a, P> {
    pub fn new(
        grid:    &'a GridWorld,
        agents:  &'a AgentPool,
        index:   &'a ProximityIndex,
        planner: &'a P,
        params:  &'a MotionParams,
    ) -> Self {
        Self { grid, agents, index, planner, params }
    }
}

// ── decide ────────────────────────────────────────────────────────────────────

/// Compute one live agent's decision for this tick.
///
/// # Errors
///
/// Only defensive failures: `InvalidStart` / `OutOfBounds` from the planner
/// mean the pool holds an agent on a barrier or off the grid.
/// `NoPathFound` is absorbed into the `Stuck` status.
pub fn decide<P: PathPlanner>(
    agent: AgentId,
    ctx:   &MotionContext<'_, P>,
    rng:   &mut AgentRng,
) -> GridResult<Decision> {
    let i = agent.index();
    let pool = ctx.agents;
    let grid = ctx.grid;
    let params = ctx.params;

    let cell = pool.cell[i];
    let point = cell.center();

    // ① panic and ② speed
    let mean = ctx.index.mean_around(agent, AgentField::Speed, point, params.panic_radius);
    let panic = params.panic_level(mean);
    let speed = params.base_speed + panic;

    // ③ stride
    let budget = pool.stride[i] + speed;
    let steps = budget.floor().max(0.0) as u32;
    let stride = budget - steps as f32;

    // ④ route
    let mut status = pool.status[i];
    let mut replanned = false;
    let mut planned: Option<CachedPath> = None;

    let cached = pool.path[i].as_ref().filter(|cp| cp.is_fresh(grid, cell));
    if cached.is_none() && params.should_retry(status, grid.revision()) {
        replanned = true;
        match ctx.planner.plan(grid, cell) {
            Ok(path) => {
                planned = Some(CachedPath::new(path, cell, grid.revision()));
                status = AgentStatus::Active;
            }
            Err(GridError::NoPathFound { .. }) => {
                let retries = match status {
                    AgentStatus::Stuck { retries, revision } if revision == grid.revision() => {
                        retries + 1
                    }
                    _ => 1,
                };
                status = AgentStatus::Stuck { retries, revision: grid.revision() };
            }
            Err(e) => return Err(e),
        }
    }
    let route = planned.as_ref().or(cached);

    let path_heading = route
        .and_then(CachedPath::next_waypoint)
        .and_then(|w| Direction::between(cell, w));

    // ⑤ avoidance, ⑥ follow
    let threat = if params.distance_preference > 0.0 {
        ctx.index.closest_other(agent, point, params.distance_preference)
    } else {
        None
    };

    let cooldown = pool.avoid_cooldown[i];
    let dodge = match (threat, path_heading) {
        (Some((other, _)), Some(ahead)) if cooldown == 0 && steps > 0 => {
            dodge_heading(grid, cell, ahead, other.cell, rng)
        }
        _ => None,
    };

    let (next_cell, heading, cursor) = match (dodge, route) {
        (Some((dir, landing)), Some(cp)) => (landing, Some(dir), cp.cursor),
        (None, Some(cp)) => {
            let (to, cursor) = follow(grid, cp, cell, steps)?;
            (to, path_heading, cursor)
        }
        (_, None) => (cell, None, 0),
    };
    let deflected = dodge.is_some() && route.is_some();
    let avoid_cooldown = if deflected {
        AVOIDANCE_COOLDOWN_TICKS
    } else {
        cooldown.saturating_sub(1)
    };

    let has_route = route.is_some();
    let path = match (planned, has_route) {
        (Some(mut fresh), _) => {
            fresh.cursor = cursor;
            PathUpdate::Replace(fresh)
        }
        (None, true) => PathUpdate::Keep { cursor, revision: grid.revision() },
        (None, false) => PathUpdate::Clear,
    };

    Ok(Decision {
        agent,
        cell: next_cell,
        speed,
        panic,
        stride,
        heading,
        path_heading,
        deflected,
        avoid_cooldown,
        replanned,
        path,
        status,
    })
}

// ── Movement helpers ──────────────────────────────────────────────────────────

/// Pick a 90° rotation of `ahead` and the cell one step that way.
///
/// The side landing farther from `threat` is preferred, exact ties broken by
/// the agent's RNG.  A rotation whose landing is off the grid or a barrier is
/// skipped; `None` when both are.
fn dodge_heading(
    grid:   &GridWorld,
    cell:   Cell,
    ahead:  Direction,
    threat: Cell,
    rng:    &mut AgentRng,
) -> Option<(Direction, Cell)> {
    let landing = |d: Direction| {
        cell.step(d).filter(|&c| grid.is_walkable(c)).map(|c| (d, c))
    };
    match (landing(ahead.rotate_cw()), landing(ahead.rotate_ccw())) {
        (Some(cw), Some(ccw)) => {
            let (a, b) = (cw.1.manhattan(threat), ccw.1.manhattan(threat));
            if a > b || (a == b && rng.gen_bool(0.5)) { Some(cw) } else { Some(ccw) }
        }
        (cw, ccw) => cw.or(ccw),
    }
}

/// Advance along `route` up to `steps` waypoints, stopping on an exit.
/// Returns the new cell and cursor.
fn follow(grid: &GridWorld, route: &CachedPath, from: Cell, steps: u32) -> GridResult<(Cell, usize)> {
    let mut cur = from;
    let mut cursor = route.cursor;
    for _ in 0..steps {
        let Some(next) = route.path.get(cursor) else {
            break;
        };
        cur = next;
        cursor += 1;
        if grid.is_exit(cur)? {
            break;
        }
    }
    Ok((cur, cursor))
}
