//! Unit tests for evac-agent.

#[cfg(test)]
mod support {
    use evac_core::AgentId;
    use evac_grid::{AStarPlanner, GridResult, GridWorld, ProximityIndex};

    use crate::{AgentPool, AgentRngs, Decision, MotionContext, MotionParams, decide};

    /// A 1-row corridor of `len` cells with the exit at the east end.
    pub fn corridor(len: u32) -> GridWorld {
        evac_grid::GridWorldBuilder::new(len, 1)
            .exit(evac_core::Cell::new(len - 1, 0))
            .build()
            .unwrap()
    }

    /// Decide for `agent` against the pool as it stands.
    pub fn decide_for(
        grid:   &GridWorld,
        pool:   &AgentPool,
        rngs:   &mut AgentRngs,
        params: &MotionParams,
        agent:  AgentId,
    ) -> GridResult<Decision> {
        let index = ProximityIndex::build(pool.samples());
        let ctx = MotionContext::new(grid, pool, &index, &AStarPlanner, params);
        decide(agent, &ctx, rngs.get_mut(agent))
    }

    /// Calm parameters: no panic, no avoidance.
    pub fn calm(base_speed: f32) -> MotionParams {
        MotionParams {
            base_speed,
            panic_radius: 0.0,
            distance_preference: 0.0,
            panic_gain: 0.0,
            max_panic: None,
            max_plan_retries: None,
        }
    }
}

#[cfg(test)]
mod pool {
    use evac_core::{AgentId, Cell, Direction, Tick};

    use crate::{AgentError, AgentPool, AgentStatus, Decision, PathUpdate};

    #[test]
    fn spawn_issues_sequential_ids() {
        let mut pool = AgentPool::new();
        let a = pool.spawn(Cell::new(0, 0), 1.0, Tick::ZERO);
        let b = pool.spawn(Cell::new(1, 0), 1.0, Tick(3));
        assert_eq!((a, b), (AgentId(0), AgentId(1)));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.spawn_tick[1], Tick(3));
        assert_eq!(pool.status(b), Some(AgentStatus::Active));
    }

    #[test]
    fn remove_keeps_the_row() {
        let mut pool = AgentPool::new();
        let a = pool.spawn(Cell::new(0, 0), 1.0, Tick::ZERO);
        let b = pool.spawn(Cell::new(1, 0), 1.0, Tick::ZERO);

        pool.remove(a, Tick(4)).unwrap();

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.capacity(), 2);
        assert!(!pool.is_active(a));
        assert_eq!(pool.status(a), Some(AgentStatus::Exited { tick: Tick(4) }));
        assert_eq!(pool.active_ids().collect::<Vec<_>>(), vec![b]);
        assert_eq!(pool.cell(a), Some(Cell::new(0, 0)));
    }

    #[test]
    fn remove_twice_or_unknown_fails() {
        let mut pool = AgentPool::new();
        let a = pool.spawn(Cell::new(0, 0), 1.0, Tick::ZERO);
        pool.remove(a, Tick(1)).unwrap();

        assert!(matches!(pool.remove(a, Tick(2)), Err(AgentError::AlreadyExited(id)) if id == a));
        assert!(matches!(
            pool.remove(AgentId(9), Tick(2)),
            Err(AgentError::AgentNotFound(AgentId(9)))
        ));
        assert_eq!(pool.len(), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn positions_and_samples_skip_exited() {
        let mut pool = AgentPool::new();
        pool.spawn(Cell::new(0, 0), 1.0, Tick::ZERO);
        let b = pool.spawn(Cell::new(2, 0), 1.0, Tick::ZERO);
        pool.spawn(Cell::new(4, 0), 1.0, Tick::ZERO);
        pool.remove(b, Tick(1)).unwrap();

        let cells: Vec<Cell> = pool.positions().map(|(_, c)| c).collect();
        assert_eq!(cells, vec![Cell::new(0, 0), Cell::new(4, 0)]);
        assert_eq!(pool.samples().count(), 2);
    }

    #[test]
    fn apply_writes_every_field() {
        let mut pool = AgentPool::new();
        let a = pool.spawn(Cell::new(0, 0), 1.0, Tick::ZERO);

        pool.apply(Decision {
            agent:          a,
            cell:           Cell::new(1, 0),
            speed:          1.25,
            panic:          0.25,
            stride:         0.25,
            heading:        Some(Direction::East),
            path_heading:   Some(Direction::East),
            deflected:      false,
            avoid_cooldown: 1,
            replanned:      true,
            path:           PathUpdate::Clear,
            status:         AgentStatus::Stuck { retries: 1, revision: 0 },
        });

        assert_eq!(pool.cell[0], Cell::new(1, 0));
        assert_eq!(pool.speed[0], 1.25);
        assert_eq!(pool.panic[0], 0.25);
        assert_eq!(pool.stride[0], 0.25);
        assert_eq!(pool.heading[0], Some(Direction::East));
        assert_eq!(pool.avoid_cooldown[0], 1);
        assert_eq!(pool.stuck_ids().collect::<Vec<_>>(), vec![a]);
        // Stuck agents are still live.
        assert_eq!(pool.len(), 1);
    }
}

#[cfg(test)]
mod builder {
    use evac_core::{Cell, SpawnDistribution};
    use evac_grid::{GridError, GridWorldBuilder};

    use crate::{AgentError, AgentPoolBuilder};

    fn room() -> evac_grid::GridWorld {
        GridWorldBuilder::new(6, 6)
            .barriers([Cell::new(2, 2), Cell::new(3, 3)])
            .exit(Cell::new(5, 5))
            .build()
            .unwrap()
    }

    #[test]
    fn explicit_cells_in_order() {
        let grid = room();
        let (pool, rngs) = AgentPoolBuilder::new(0, 1.0)
            .at(Cell::new(0, 0))
            .at_cells([Cell::new(1, 1), Cell::new(4, 0)])
            .build(&grid)
            .unwrap();
        assert_eq!(pool.cell, vec![Cell::new(0, 0), Cell::new(1, 1), Cell::new(4, 0)]);
        assert_eq!(rngs.len(), 3);
    }

    #[test]
    fn spawn_on_barrier_rejected() {
        let grid = room();
        let err = AgentPoolBuilder::new(0, 1.0).at(Cell::new(2, 2)).build(&grid).err().unwrap();
        assert!(matches!(err, AgentError::SpawnOnBarrier(c) if c == Cell::new(2, 2)));
    }

    #[test]
    fn spawn_out_of_bounds_rejected() {
        let grid = room();
        let err = AgentPoolBuilder::new(0, 1.0).at(Cell::new(6, 0)).build(&grid).err().unwrap();
        assert!(matches!(err, AgentError::Grid(GridError::OutOfBounds { .. })));
    }

    #[test]
    fn uniform_avoids_barriers_and_exits() {
        let grid = room();
        let (pool, _) = AgentPoolBuilder::new(7, 1.0)
            .distribute(&grid, &SpawnDistribution::Uniform, 200)
            .unwrap()
            .build(&grid)
            .unwrap();
        assert_eq!(pool.len(), 200);
        for &cell in &pool.cell {
            assert!(grid.is_walkable(cell));
            assert!(!grid.is_exit(cell).unwrap());
        }
    }

    #[test]
    fn uniform_is_deterministic_per_seed() {
        let grid = room();
        let place = |seed| {
            AgentPoolBuilder::new(seed, 1.0)
                .distribute(&grid, &SpawnDistribution::Uniform, 30)
                .unwrap()
                .build(&grid)
                .unwrap()
                .0
                .cell
        };
        assert_eq!(place(11), place(11));
    }

    #[test]
    fn region_stays_inside() {
        let grid = room();
        let spawn = SpawnDistribution::Region { min: Cell::new(0, 0), max: Cell::new(1, 2) };
        let (pool, _) = AgentPoolBuilder::new(3, 1.0)
            .distribute(&grid, &spawn, 50)
            .unwrap()
            .build(&grid)
            .unwrap();
        assert!(pool.cell.iter().all(|c| c.x <= 1 && c.y <= 2));
    }

    #[test]
    fn cells_variant_ignores_count() {
        let grid = room();
        let spawn = SpawnDistribution::Cells { cells: vec![Cell::new(0, 5), Cell::new(1, 5)] };
        let (pool, _) = AgentPoolBuilder::new(0, 1.0)
            .distribute(&grid, &spawn, 99)
            .unwrap()
            .build(&grid)
            .unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn no_candidate_cells() {
        let grid = GridWorldBuilder::new(2, 1)
            .barrier(Cell::new(0, 0))
            .exit(Cell::new(1, 0))
            .build()
            .unwrap();
        let err = AgentPoolBuilder::new(0, 1.0)
            .distribute(&grid, &SpawnDistribution::Uniform, 3)
            .err()
            .unwrap();
        assert!(matches!(err, AgentError::NoSpawnCells(3)));
    }
}

#[cfg(test)]
mod rngs {
    use evac_core::AgentId;

    use crate::AgentRngs;

    #[test]
    fn per_agent_determinism() {
        let mut rngs1 = AgentRngs::new(10, 999);
        let mut rngs2 = AgentRngs::new(10, 999);
        for i in 0..10u32 {
            let a: Vec<bool> = (0..16).map(|_| rngs1.get_mut(AgentId(i)).gen_bool(0.5)).collect();
            let b: Vec<bool> = (0..16).map(|_| rngs2.get_mut(AgentId(i)).gen_bool(0.5)).collect();
            assert_eq!(a, b, "agent {i} RNG should be deterministic");
        }
    }

    #[test]
    fn ensure_leaves_existing_streams_alone() {
        let mut grown = AgentRngs::new(2, 5);
        grown.ensure(4);
        let mut fresh = AgentRngs::new(4, 5);
        assert_eq!(grown.len(), 4);
        for i in 0..4u32 {
            let a: Vec<bool> = (0..16).map(|_| grown.get_mut(AgentId(i)).gen_bool(0.5)).collect();
            let b: Vec<bool> = (0..16).map(|_| fresh.get_mut(AgentId(i)).gen_bool(0.5)).collect();
            assert_eq!(a, b);
        }
    }
}

#[cfg(test)]
mod cached_path {
    use evac_core::Cell;
    use evac_grid::{AStarPlanner, GridWorldBuilder, PathPlanner};

    use crate::CachedPath;

    #[test]
    fn expected_cell_follows_cursor() {
        let grid = super::support::corridor(4);
        let path = AStarPlanner.plan(&grid, Cell::new(0, 0)).unwrap();
        let mut cached = CachedPath::new(path, Cell::new(0, 0), grid.revision());

        assert_eq!(cached.expected_cell(), Cell::new(0, 0));
        assert_eq!(cached.next_waypoint(), Some(Cell::new(1, 0)));

        cached.cursor = 2;
        assert_eq!(cached.expected_cell(), Cell::new(2, 0));
        assert_eq!(cached.next_waypoint(), Some(Cell::new(3, 0)));
    }

    #[test]
    fn off_path_is_stale() {
        let grid = super::support::corridor(4);
        let path = AStarPlanner.plan(&grid, Cell::new(0, 0)).unwrap();
        let cached = CachedPath::new(path, Cell::new(0, 0), grid.revision());

        assert!(cached.is_fresh(&grid, Cell::new(0, 0)));
        assert!(!cached.is_fresh(&grid, Cell::new(1, 0)));
    }

    #[test]
    fn freshness_after_barrier_change() {
        let mut grid = GridWorldBuilder::new(5, 3).exit(Cell::new(4, 1)).build().unwrap();
        let start = Cell::new(0, 1);
        let path = AStarPlanner.plan(&grid, start).unwrap();
        let cached = CachedPath::new(path, start, grid.revision());

        // A barrier off the route leaves the path usable.
        grid.set_barriers([Cell::new(0, 0)]).unwrap();
        assert!(cached.is_fresh(&grid, start));

        // A barrier on the route invalidates it.
        grid.set_barriers([Cell::new(2, 1)]).unwrap();
        assert!(!cached.is_fresh(&grid, start));
    }
}

#[cfg(test)]
mod motion {
    use evac_core::{AgentId, Cell, Direction, Tick};
    use evac_grid::{GridError, GridWorldBuilder};

    use super::support::{calm, corridor, decide_for};
    use crate::{AVOIDANCE_COOLDOWN_TICKS, AgentPoolBuilder, AgentRngs, AgentStatus, MotionParams, PathUpdate};

    const A: AgentId = AgentId(0);

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn panic_level_is_monotone_and_capped() {
        let mut params = MotionParams { panic_gain: 0.5, ..calm(1.0) };
        assert_eq!(params.panic_level(None), 0.0);

        let mut last = 0.0;
        for mean in [0.0, 0.5, 1.0, 2.0, 8.0] {
            let p = params.panic_level(Some(mean));
            assert!(p >= last);
            last = p;
        }

        params.max_panic = Some(0.75);
        assert_eq!(params.panic_level(Some(100.0)), 0.75);
    }

    #[test]
    fn lone_agent_plans_and_steps() {
        let grid = corridor(6);
        let (pool, mut rngs) = AgentPoolBuilder::new(0, 1.0).at(Cell::new(0, 0)).build(&grid).unwrap();
        let params = MotionParams::default();

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();

        assert_eq!(d.panic, 0.0);
        assert_eq!(d.speed, 1.0);
        assert_eq!(d.cell, Cell::new(1, 0));
        assert_eq!(d.heading, Some(Direction::East));
        assert!(d.replanned);
        assert!(!d.deflected);
        assert_eq!(d.status, AgentStatus::Active);
        match d.path {
            PathUpdate::Replace(cached) => {
                assert_eq!(cached.cursor, 1);
                assert_eq!(cached.path.goal(), Some(Cell::new(5, 0)));
            }
            other => panic!("expected a new path, got {other:?}"),
        }
    }

    #[test]
    fn fractional_speed_carries_between_ticks() {
        let grid = corridor(6);
        let (mut pool, mut rngs) =
            AgentPoolBuilder::new(0, 0.5).at(Cell::new(0, 0)).build(&grid).unwrap();
        let params = calm(0.5);

        let first = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert_eq!(first.cell, Cell::new(0, 0));
        assert_eq!(first.stride, 0.5);
        pool.apply(first);

        let second = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert_eq!(second.cell, Cell::new(1, 0));
        assert_eq!(second.stride, 0.0);
        // The path planned on the first tick is still in use.
        assert!(!second.replanned);
    }

    #[test]
    fn speed_is_base_plus_panic() {
        let grid = corridor(10);
        let (pool, mut rngs) = AgentPoolBuilder::new(0, 1.0)
            .at_cells([Cell::new(0, 0), Cell::new(2, 0)])
            .build(&grid)
            .unwrap();
        let params = MotionParams {
            panic_radius: 3.0,
            panic_gain: 0.1,
            ..calm(1.0)
        };

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(approx(d.panic, 0.1));
        assert!(approx(d.speed, 1.1));
        assert_eq!(d.cell, Cell::new(1, 0));
        assert!(approx(d.stride, 0.1));
    }

    #[test]
    fn panic_cap_applies_to_speed() {
        let grid = corridor(10);
        let (pool, mut rngs) = AgentPoolBuilder::new(0, 1.0)
            .at_cells([Cell::new(0, 0), Cell::new(2, 0)])
            .build(&grid)
            .unwrap();
        let params = MotionParams {
            panic_radius: 3.0,
            panic_gain: 10.0,
            max_panic: Some(0.5),
            ..calm(1.0)
        };

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert_eq!(d.panic, 0.5);
        assert_eq!(d.speed, 1.5);
    }

    #[test]
    fn stops_on_exit_with_budget_left() {
        let grid = corridor(4);
        let (pool, mut rngs) = AgentPoolBuilder::new(0, 5.0).at(Cell::new(1, 0)).build(&grid).unwrap();

        let d = decide_for(&grid, &pool, &mut rngs, &calm(5.0), A).unwrap();
        assert_eq!(d.cell, Cell::new(3, 0));
    }

    fn open_room() -> evac_grid::GridWorld {
        GridWorldBuilder::new(5, 5).exit(Cell::new(4, 2)).build().unwrap()
    }

    #[test]
    fn avoidance_turns_away_from_neighbour() {
        let grid = open_room();
        // The neighbour sits diagonally south-east; the only shortest route
        // heads east, so the dodge must go north.
        let (pool, mut rngs) = AgentPoolBuilder::new(0, 1.0)
            .at_cells([Cell::new(1, 2), Cell::new(2, 3)])
            .build(&grid)
            .unwrap();
        let params = MotionParams { distance_preference: 2.0, ..calm(1.0) };

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(d.deflected);
        assert_eq!(d.path_heading, Some(Direction::East));
        assert_eq!(d.heading, Some(Direction::North));
        assert_eq!(d.cell, Cell::new(1, 1));
    }

    #[test]
    fn avoidance_tie_goes_sideways() {
        let grid = open_room();
        let (pool, mut rngs) = AgentPoolBuilder::new(0, 1.0)
            .at_cells([Cell::new(1, 2), Cell::new(2, 2)])
            .build(&grid)
            .unwrap();
        let params = MotionParams { distance_preference: 2.0, ..calm(1.0) };

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(d.deflected);
        assert!(d.cell == Cell::new(1, 1) || d.cell == Cell::new(1, 3));
    }

    #[test]
    fn zero_preference_disables_avoidance() {
        let grid = open_room();
        let (pool, mut rngs) = AgentPoolBuilder::new(0, 1.0)
            .at_cells([Cell::new(1, 2), Cell::new(2, 3)])
            .build(&grid)
            .unwrap();

        let d = decide_for(&grid, &pool, &mut rngs, &calm(1.0), A).unwrap();
        assert!(!d.deflected);
        assert_eq!(d.cell, Cell::new(2, 2));
    }

    #[test]
    fn deflection_forces_replan_next_tick() {
        let grid = open_room();
        let (mut pool, mut rngs) = AgentPoolBuilder::new(0, 1.0)
            .at_cells([Cell::new(1, 2), Cell::new(2, 3)])
            .build(&grid)
            .unwrap();
        let params = MotionParams { distance_preference: 2.0, ..calm(1.0) };

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        pool.apply(d);
        pool.remove(AgentId(1), Tick(1)).unwrap();

        let next = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(next.replanned);
        assert!(!next.deflected);
    }

    #[test]
    fn boxed_in_sidestep_follows_path() {
        // Both sides of the corridor are off the grid.
        let grid = corridor(6);
        let (pool, mut rngs) = AgentPoolBuilder::new(0, 1.0)
            .at_cells([Cell::new(0, 0), Cell::new(1, 0)])
            .build(&grid)
            .unwrap();
        let params = MotionParams { distance_preference: 2.0, ..calm(1.0) };

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(!d.deflected);
        assert_eq!(d.heading, Some(Direction::East));
        assert_eq!(d.cell, Cell::new(1, 0));
        assert_eq!(d.avoid_cooldown, 0);
    }

    #[test]
    fn sidestep_takes_open_side_when_preferred_is_walled() {
        let grid = GridWorldBuilder::new(5, 5)
            .barrier(Cell::new(1, 1))
            .exit(Cell::new(4, 2))
            .build()
            .unwrap();
        let (pool, mut rngs) = AgentPoolBuilder::new(0, 1.0)
            .at_cells([Cell::new(1, 2), Cell::new(2, 3)])
            .build(&grid)
            .unwrap();
        let params = MotionParams { distance_preference: 2.0, ..calm(1.0) };

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(d.deflected);
        assert_eq!(d.heading, Some(Direction::South));
        assert_eq!(d.cell, Cell::new(1, 3));
    }

    #[test]
    fn route_is_followed_during_cooldown() {
        let grid = open_room();
        let exit = Cell::new(4, 2);
        let (mut pool, mut rngs) = AgentPoolBuilder::new(0, 1.0)
            .at_cells([Cell::new(1, 2), Cell::new(2, 3)])
            .build(&grid)
            .unwrap();
        // The neighbour stays in range for the next three ticks.
        let params = MotionParams { distance_preference: 3.0, ..calm(1.0) };

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(d.deflected);
        assert_eq!(d.cell, Cell::new(1, 1));
        assert_eq!(d.avoid_cooldown, AVOIDANCE_COOLDOWN_TICKS);
        pool.apply(d);

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(!d.deflected);
        assert!(d.replanned);
        assert_eq!(d.cell.manhattan(exit), 3);
        assert_eq!(d.avoid_cooldown, 1);
        pool.apply(d);

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(!d.deflected);
        assert_eq!(d.cell.manhattan(exit), 2);
        assert_eq!(d.avoid_cooldown, 0);
    }

    #[test]
    fn walled_off_agent_is_stuck_and_holds() {
        let grid = GridWorldBuilder::new(5, 1)
            .barrier(Cell::new(2, 0))
            .exit(Cell::new(4, 0))
            .build()
            .unwrap();
        let (mut pool, mut rngs) = AgentPoolBuilder::new(0, 1.0).at(Cell::new(0, 0)).build(&grid).unwrap();

        let d = decide_for(&grid, &pool, &mut rngs, &calm(1.0), A).unwrap();
        assert_eq!(d.cell, Cell::new(0, 0));
        assert_eq!(d.status, AgentStatus::Stuck { retries: 1, revision: grid.revision() });
        assert_eq!(d.path, PathUpdate::Clear);
        pool.apply(d);

        let d = decide_for(&grid, &pool, &mut rngs, &calm(1.0), A).unwrap();
        assert_eq!(d.status, AgentStatus::Stuck { retries: 2, revision: grid.revision() });
    }

    #[test]
    fn retries_pause_until_layout_changes() {
        let mut grid = GridWorldBuilder::new(5, 1)
            .barrier(Cell::new(2, 0))
            .exit(Cell::new(4, 0))
            .build()
            .unwrap();
        let (mut pool, mut rngs) = AgentPoolBuilder::new(0, 1.0).at(Cell::new(0, 0)).build(&grid).unwrap();
        let params = MotionParams { max_plan_retries: Some(2), ..calm(1.0) };

        for _ in 0..2 {
            let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
            assert!(d.replanned);
            pool.apply(d);
        }
        let idle = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(!idle.replanned);
        assert_eq!(idle.status, AgentStatus::Stuck { retries: 2, revision: 0 });
        pool.apply(idle);

        grid.set_barriers(std::iter::empty()).unwrap();
        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(d.replanned);
        assert_eq!(d.status, AgentStatus::Active);
        assert_eq!(d.cell, Cell::new(1, 0));
    }

    #[test]
    fn blocked_route_is_replanned() {
        let mut grid = GridWorldBuilder::new(5, 3).exit(Cell::new(4, 1)).build().unwrap();
        let (mut pool, mut rngs) = AgentPoolBuilder::new(0, 1.0).at(Cell::new(0, 1)).build(&grid).unwrap();
        let params = calm(1.0);

        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert_eq!(d.cell, Cell::new(1, 1));
        pool.apply(d);

        grid.set_barriers([Cell::new(3, 1)]).unwrap();
        let d = decide_for(&grid, &pool, &mut rngs, &params, A).unwrap();
        assert!(d.replanned);
        match d.path {
            PathUpdate::Replace(cached) => {
                assert!(!cached.path.cells().contains(&Cell::new(3, 1)));
                assert_eq!(cached.path.len(), 5);
            }
            other => panic!("expected a new path, got {other:?}"),
        }
    }

    #[test]
    fn agent_on_barrier_is_an_error() {
        let mut grid = corridor(4);
        let (pool, mut rngs) = AgentPoolBuilder::new(0, 1.0).at(Cell::new(1, 0)).build(&grid).unwrap();
        grid.set_barriers([Cell::new(1, 0)]).unwrap();

        let err = decide_for(&grid, &pool, &mut rngs, &calm(1.0), A).unwrap_err();
        assert_eq!(err, GridError::InvalidStart(Cell::new(1, 0)));
    }

    #[test]
    fn decisions_do_not_depend_on_call_order() {
        let grid = open_room();
        let (pool, _) = AgentPoolBuilder::new(4, 1.0)
            .at_cells([Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 4), Cell::new(1, 4)])
            .build(&grid)
            .unwrap();
        let params = MotionParams::default();

        let mut forward_rngs = AgentRngs::new(pool.capacity(), 4);
        let forward: Vec<_> = pool
            .active_ids()
            .map(|a| decide_for(&grid, &pool, &mut forward_rngs, &params, a).unwrap())
            .collect();

        let mut reverse_rngs = AgentRngs::new(pool.capacity(), 4);
        let mut reverse: Vec<_> = pool
            .active_ids()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|a| decide_for(&grid, &pool, &mut reverse_rngs, &params, a).unwrap())
            .collect();
        reverse.reverse();

        assert_eq!(forward, reverse);
    }
}
