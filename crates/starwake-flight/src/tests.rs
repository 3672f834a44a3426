#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::DVec2;

    use starwake_core::design::{ChainGunDesign, ExplosionDesign, ShipDesign, ThrusterDesign};
    use starwake_core::enums::{Faction, SpaceObjectKind};
    use starwake_core::objects::{ObjectState, ObjectSummary};
    use starwake_core::ship::Ship;

    use crate::gunner::*;
    use crate::helm::*;

    const DT: f64 = 0.05;

    /// Integrate a 1D body the way the world does: velocity first, then position.
    fn fly_to(capacity: f64, target: f64, initial_velocity: f64, secs: f64) -> (f64, f64) {
        let mut x = 0.0;
        let mut v = initial_velocity;
        for _ in 0..(secs / DT) as usize {
            let cmd = accelerate_to_position(DT, capacity, v, target - (x + v * DT));
            assert!((-1.0..=1.0).contains(&cmd), "command out of range: {cmd}");
            v += cmd * capacity * DT;
            x += v * DT;
        }
        (x, v)
    }

    fn summary(position: DVec2, velocity: DVec2, radius: f64) -> ObjectSummary {
        ObjectSummary {
            id: "target".into(),
            kind: SpaceObjectKind::Ship,
            position,
            velocity,
            angle: 0.0,
            radius,
            faction: Faction::None,
            frozen: false,
            destroyed: false,
        }
    }

    #[test]
    fn test_position_controller_settles_on_target() {
        for (capacity, target, v0) in [(10.0, 100.0, 0.0), (50.0, -300.0, 20.0), (10.0, 5.0, 30.0), (10.0, -50.0, 40.0)] {
            let (x, v) = fly_to(capacity, target, v0, 30.0);
            assert!((x - target).abs() < 0.01, "capacity {capacity}: ended at {x}, wanted {target}");
            assert!(v.abs() < 0.01, "capacity {capacity}: residual speed {v}");
        }
    }

    #[test]
    fn test_position_controller_full_authority_when_far() {
        assert_eq!(accelerate_to_position(DT, 10.0, 0.0, 1000.0), 1.0);
        assert_eq!(accelerate_to_position(DT, 10.0, 0.0, -1000.0), -1.0);
    }

    #[test]
    fn test_position_controller_brakes_before_overshoot() {
        // 100 u/s toward a point 50 away with 10 u/s² cannot stop in time
        let cmd = accelerate_to_position(DT, 10.0, 100.0, 50.0);
        assert_eq!(cmd, -1.0);
    }

    #[test]
    fn test_zero_capacity_yields_no_command() {
        assert_eq!(accelerate_to_position(DT, 0.0, 5.0, 100.0), 0.0);
        assert_eq!(accelerate_to_speed(DT, 0.0, 100.0), 0.0);
    }

    #[test]
    fn test_accelerate_to_speed_proportional() {
        assert!((accelerate_to_speed(DT, 100.0, 2.5) - 0.5).abs() < 1e-12);
        assert_eq!(accelerate_to_speed(DT, 100.0, -1000.0), -1.0);
    }

    #[test]
    fn test_move_to_target_uses_local_frame() {
        let capacity = HelmCapacity {
            boost: 10.0,
            strafe: 10.0,
            rotation: 10.0,
        };
        // Facing +Y, a target further along +Y is straight ahead
        let state = ObjectState::new("a", DVec2::ZERO, 1.0).with_angle(90.0);
        let cmd = move_to_target(DT, &capacity, &state, DVec2::new(0.0, 1000.0));
        assert!((cmd.x - 1.0).abs() < 1e-9, "boost should be full: {cmd}");
        assert!(cmd.y.abs() < 1e-9, "strafe should be idle: {cmd}");
    }

    #[test]
    fn test_rotate_to_target_takes_short_way() {
        let capacity = HelmCapacity {
            boost: 0.0,
            strafe: 0.0,
            rotation: 90.0,
        };
        let state = ObjectState::new("a", DVec2::ZERO, 1.0).with_angle(350.0);
        assert!(rotate_to_target(DT, &capacity, &state, 80.0) > 0.0);
        assert!(rotate_to_target(DT, &capacity, &state, 260.0) < 0.0);
    }

    #[test]
    fn test_match_global_speed_brakes() {
        let capacity = HelmCapacity {
            boost: 10.0,
            strafe: 10.0,
            rotation: 0.0,
        };
        let state = ObjectState::new("a", DVec2::ZERO, 1.0).with_velocity(DVec2::new(100.0, 0.0));
        let cmd = match_global_speed(DT, &capacity, &state, DVec2::ZERO);
        assert_eq!(cmd, DVec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_helm_capacity_ignores_broken_thrusters() {
        let mut design = ShipDesign::default();
        design.thrusters = vec![ThrusterDesign::at(0.0), ThrusterDesign::at(180.0)];
        let mut ship = Ship::new(ObjectState::default(), Arc::new(design));
        let capacity = HelmCapacity::from_ship(&ship);
        assert!((capacity.boost - 50.0).abs() < 1e-9, "boost: {}", capacity.boost);
        assert!(capacity.strafe < 1e-9, "no lateral thrusters: {}", capacity.strafe);

        ship.thrusters[0].available_capacity = 0.0;
        let capacity = HelmCapacity::from_ship(&ship);
        assert!((capacity.boost - 50.0).abs() < 1e-9, "rear thruster still rates the axis");
    }

    #[test]
    fn test_predict_stationary_target_converges_exactly() {
        let target = DVec2::new(300.0, 400.0);
        let prediction = predict_hit_location(DVec2::ZERO, DVec2::ZERO, 1000.0, target, DVec2::ZERO);
        assert!(prediction.converged);
        assert!(prediction.location.distance(target) < 1e-9);
        assert!((prediction.time - 0.5).abs() < 1e-9, "500 units at 1000 u/s: {}", prediction.time);
    }

    #[test]
    fn test_predict_moving_target_leads() {
        let target = DVec2::new(1000.0, 0.0);
        let velocity = DVec2::new(0.0, 100.0);
        let prediction = predict_hit_location(DVec2::ZERO, DVec2::ZERO, 1000.0, target, velocity);
        assert!(prediction.converged);
        assert!(prediction.location.y > 0.0, "aim point should lead the target");
        let flight = prediction.location.length() / 1000.0;
        assert!((flight - prediction.time).abs() < 1e-3);
    }

    #[test]
    fn test_predict_unreachable_falls_back() {
        // Target outruns the shell
        let prediction = predict_hit_location(
            DVec2::ZERO,
            DVec2::ZERO,
            10.0,
            DVec2::new(100.0, 0.0),
            DVec2::new(1000.0, 0.0),
        );
        assert!(!prediction.converged);
        assert!(prediction.location.is_finite());
    }

    #[test]
    fn test_shell_range_helpers() {
        let design = ChainGunDesign::default();
        assert_eq!(direct_shell_range(&design, 0.0), design.min_shell_range);
        assert_eq!(direct_shell_range(&design, 2.0), design.max_shell_range);
        let ttl = shell_seconds_to_live(&design, design.max_shell_range);
        assert!((ttl - design.max_shell_range / design.bullet_speed).abs() < 1e-12);
    }

    #[test]
    fn test_kill_zone_hit_and_miss() {
        let shooter = Shooter {
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            angle: 0.0,
            muzzle_speed: 1000.0,
            deviation_degrees: 0.0,
        };
        let explosion = ExplosionDesign {
            radius: 5.0,
            expansion_speed: 0.0,
            ..ExplosionDesign::default()
        };
        let on_line = summary(DVec2::new(1000.0, 0.0), DVec2::ZERO, 10.0);
        assert!(is_target_in_kill_zone(&shooter, 1.0, &explosion, &on_line));

        let off_line = summary(DVec2::new(1000.0, 100.0), DVec2::ZERO, 10.0);
        assert!(!is_target_in_kill_zone(&shooter, 1.0, &explosion, &off_line));

        let spread = Shooter {
            deviation_degrees: 10.0,
            ..shooter
        };
        assert!(is_target_in_kill_zone(&spread, 1.0, &explosion, &off_line), "spread widens the band");
    }
}
