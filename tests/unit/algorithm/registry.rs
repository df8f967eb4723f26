//! Tests for the placer registry and refresh-mode event dispatch

#[cfg(test)]
mod tests {
    use roomstamp::DungeonError;
    use roomstamp::algorithm::layout::{LayoutConfig, LayoutGenerator};
    use roomstamp::algorithm::placement::PlacementOptions;
    use roomstamp::algorithm::registry::{
        LayoutEvent, LayoutId, PassKind, PlacementPass, PlacerRegistry, RefreshMode,
    };
    use roomstamp::patterns::{ConstraintIndex, Pattern};
    use roomstamp::spatial::{DungeonGrid, Rect, TargetKind};

    fn pattern_pass(name: &str, coverage_ratio: f64, only_unoccupied: bool) -> PlacementPass {
        PlacementPass {
            name: name.to_string(),
            options: PlacementOptions {
                coverage_ratio,
                only_unoccupied,
                ..PlacementOptions::default()
            },
            kind: PassKind::Patterns {
                patterns: vec![Pattern::rectangle(1, 1)],
                constraints: ConstraintIndex::new(),
            },
        }
    }

    fn room_grid() -> DungeonGrid {
        let mut grid = DungeonGrid::new(8, 8);
        grid.carve_room(&Rect::new(1, 1, 6, 6), 0);
        grid
    }

    // Tests passes run in order and later passes see earlier used cells
    // Verified by registering cells only after the last pass
    #[test]
    fn test_run_all_chains_used_cells() {
        let layout = LayoutId(1);
        let mut registry = PlacerRegistry::new();
        registry.register(layout, pattern_pass("first", 0.5, false));
        registry.register(layout, pattern_pass("second", 1.0, true));
        let mut grid = room_grid();

        let outcomes = registry.run_all(layout, &mut grid, 9);
        let outcomes = outcomes.expect("passes run");

        let names: Vec<_> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        let first = outcomes.first().map_or(0, |o| o.cells.len());
        let second = outcomes.get(1).map_or(0, |o| o.cells.len());
        assert_eq!(first, 18);
        assert_eq!(second, 36 - 18);
        assert_eq!(grid.used_cells.count(), 36);
    }

    // Tests unregistering removes the pass and unknown layouts are errors
    #[test]
    fn test_unregister() {
        let layout = LayoutId(2);
        let mut registry = PlacerRegistry::new();
        let id = registry.register(layout, pattern_pass("only", 0.1, false));
        assert_eq!(registry.placer_count(layout), 1);

        assert!(registry.unregister(layout, id).is_some());
        assert!(registry.unregister(layout, id).is_none());
        assert_eq!(registry.placer_count(layout), 0);

        let mut grid = room_grid();
        assert!(matches!(
            registry.run_all(layout, &mut grid, 0),
            Err(DungeonError::UnknownLayout(2))
        ));
    }

    // Tests manual mode ignores updates and runs once on a successful finish
    // Verified by running passes on every update regardless of mode
    #[test]
    fn test_manual_mode_dispatch() {
        let layout = LayoutId(3);
        let mut registry = PlacerRegistry::new();
        registry.register(layout, pattern_pass("decor", 0.25, false));
        let mut grid = room_grid();

        registry.begin_manual(layout);
        assert_eq!(registry.mode(layout), RefreshMode::ManualInProgress);
        let update = registry.dispatch(layout, LayoutEvent::LayoutUpdated, &mut grid, 1);
        assert!(update.is_ok_and(|ran| ran.is_none()));
        assert!(grid.used_cells.is_empty());

        let finish = registry.dispatch(
            layout,
            LayoutEvent::GenerationFinished { success: true },
            &mut grid,
            1,
        );
        assert!(finish.is_ok_and(|ran| ran.is_some_and(|outcomes| outcomes.len() == 1)));
        assert_eq!(registry.mode(layout), RefreshMode::Steady);
        assert_eq!(grid.used_cells.count(), 9);
    }

    // Tests a failed manual regeneration returns to steady mode without running
    #[test]
    fn test_manual_failure_skips_passes() {
        let layout = LayoutId(4);
        let mut registry = PlacerRegistry::new();
        registry.register(layout, pattern_pass("decor", 0.25, false));
        let mut grid = room_grid();

        registry.begin_manual(layout);
        let finish = registry.dispatch(
            layout,
            LayoutEvent::GenerationFinished { success: false },
            &mut grid,
            1,
        );
        assert!(finish.is_ok_and(|ran| ran.is_none()));
        assert_eq!(registry.mode(layout), RefreshMode::Steady);
        assert!(grid.used_cells.is_empty());
    }

    // Tests steady mode runs on updates and ignores finish events
    #[test]
    fn test_steady_mode_dispatch() {
        let layout = LayoutId(5);
        let mut registry = PlacerRegistry::new();
        registry.register(layout, pattern_pass("decor", 0.25, false));
        let mut grid = room_grid();

        let finish = registry.dispatch(
            layout,
            LayoutEvent::GenerationFinished { success: true },
            &mut grid,
            1,
        );
        assert!(finish.is_ok_and(|ran| ran.is_none()));

        let update = registry.dispatch(layout, LayoutEvent::LayoutUpdated, &mut grid, 1);
        assert!(update.is_ok_and(|ran| ran.is_some()));

        let empty = registry.dispatch(LayoutId(99), LayoutEvent::LayoutUpdated, &mut grid, 1);
        assert!(empty.is_ok_and(|ran| ran.is_none()));
    }

    // Tests manual regeneration runs passes once against the final layout
    #[test]
    fn test_regenerate_runs_once() {
        let layout = LayoutId(6);
        let mut registry = PlacerRegistry::new();
        registry.register(layout, pattern_pass("decor", 0.1, false));
        registry.register(
            layout,
            PlacementPass {
                name: "moss".to_string(),
                options: PlacementOptions {
                    target: TargetKind::Wall,
                    only_unoccupied: true,
                    ..PlacementOptions::default()
                },
                kind: PassKind::Terrain {
                    terrain_set: 0,
                    terrain: 1,
                    catalog: vec![2],
                },
            },
        );

        let mut generator = LayoutGenerator::new(LayoutConfig::default());
        let result = registry.regenerate(layout, &mut generator, 42);
        let (report, outcomes) = result.expect("layout and passes run");

        if report.success {
            assert_eq!(outcomes.len(), 2);
            let used: usize = outcomes.iter().map(|o| o.cells.len()).sum();
            assert_eq!(generator.grid().used_cells.count(), used);
        } else {
            assert!(outcomes.is_empty());
        }
        assert_eq!(registry.mode(layout), RefreshMode::Steady);
    }
}
