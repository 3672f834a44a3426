//! Chain gun: rate of fire, ammunition, shell fusing and projectile spawn.

use rand::Rng;
use tracing::{trace, warn};

use starwake_core::constants::PROJECTILE_SPAWN_MARGIN;
use starwake_core::enums::{ShellRangeMode, SpaceObjectKind};
use starwake_core::math::direction;
use starwake_core::objects::{ObjectState, Projectile};
use starwake_core::ship::Ship;
use starwake_flight::gunner::{direct_shell_range, shell_seconds_to_live};

use crate::die::gaussian;
use crate::world::SpatialWorld;

/// Advance the gun by one tick. A gun whose rate of fire outpaces the tick
/// rate fires several shots, each spawned as far along its path as it would
/// have flown since it left the barrel.
pub fn run(ship: &mut Ship, world: &mut SpatialWorld, rng: &mut impl Rng, dt: f64) {
    if ship.state.destroyed {
        return;
    }
    let design = ship.design.clone();
    let gun_design = &design.chain_gun;
    let rate = gun_design.bullets_per_second * ship.chain_gun.rate_of_fire_factor.max(0.0);
    let gun = &mut ship.chain_gun;

    if gun.cooldown > 0.0 {
        gun.cooldown -= dt * rate;
    }
    if !gun.is_firing {
        gun.cooldown = gun.cooldown.max(0.0);
    }

    if gun.projectile.is_none() {
        gun.projectile = gun_design
            .projectile_types
            .iter()
            .copied()
            .find(|&p| ship.magazine.count(p) > 0);
    }

    update_shell_fuse(ship, world);

    while ship.chain_gun.is_firing && !ship.chain_gun.broken() && ship.chain_gun.cooldown <= 0.0 {
        let age = if rate > 0.0 {
            (-ship.chain_gun.cooldown / rate).clamp(0.0, dt)
        } else {
            0.0
        };
        if !fire(ship, world, rng, age) {
            break;
        }
        ship.chain_gun.cooldown += 1.0;
    }
}

/// Spawn one projectile that left the barrel `age` seconds ago.
fn fire(ship: &mut Ship, world: &mut SpatialWorld, rng: &mut impl Rng, age: f64) -> bool {
    let design = ship.design.clone();
    let gun_design = &design.chain_gun;
    let Some(projectile_type) = ship.chain_gun.projectile else {
        return false;
    };
    let Some(projectile_design) = design.projectiles.get(&projectile_type) else {
        warn!(id = %ship.id(), ?projectile_type, "no design for selected projectile");
        return false;
    };
    if !ship.magazine.take(projectile_type) {
        return false;
    }

    let bearing = ship.state.angle
        + ship.chain_gun.angle_offset
        + gaussian(rng, 0.0, gun_design.bullet_degrees_deviation);
    let heading = direction(bearing);
    let spawn_distance = ship.state.radius + projectile_design.radius + PROJECTILE_SPAWN_MARGIN;
    let (seconds_to_live, target_id) = match &projectile_design.homing {
        Some(homing) => (homing.seconds_to_live, ship.weapons_target.clone()),
        None => (ship.chain_gun.shell_seconds_to_live, None),
    };
    let velocity = ship.state.velocity + heading * gun_design.bullet_speed;

    let id = world.next_id(SpaceObjectKind::Projectile);
    let state = ObjectState::new(
        id.clone(),
        ship.state.position + heading * spawn_distance + velocity * age,
        projectile_design.radius,
    )
    .with_velocity(velocity)
    .with_angle(bearing)
    .with_faction(ship.state.faction);
    let projectile = Projectile {
        state,
        projectile_type,
        design: projectile_design.clone(),
        seconds_to_live: seconds_to_live - age,
        target_id,
        source_id: Some(ship.id().clone()),
    };
    match world.insert(projectile) {
        Ok(()) => trace!(id = %ship.id(), projectile = %id, "fired"),
        Err(err) => warn!(id = %ship.id(), error = %err, "projectile spawn rejected"),
    }
    true
}

/// Derive the shell time-to-live from the range mode.
fn update_shell_fuse(ship: &mut Ship, world: &SpatialWorld) {
    let gun_design = &ship.design.chain_gun;
    if let Some(fixed) = gun_design.shell_seconds_to_live {
        ship.chain_gun.shell_seconds_to_live = fixed;
        return;
    }
    if ship.chain_gun.shell_range_mode == ShellRangeMode::Target {
        let target = ship
            .weapons_target
            .as_ref()
            .and_then(|id| world.summary(id))
            .filter(|t| !t.destroyed);
        match target {
            Some(target) => {
                let range = target.position.distance(ship.state.position);
                ship.chain_gun.shell_seconds_to_live = shell_seconds_to_live(gun_design, range);
                return;
            }
            None => {
                warn!(id = %ship.id(), "shell range target lost, reverting to direct");
                ship.chain_gun.shell_range_mode = ShellRangeMode::Direct;
            }
        }
    }
    let range = direct_shell_range(gun_design, ship.chain_gun.shell_range);
    ship.chain_gun.shell_seconds_to_live = shell_seconds_to_live(gun_design, range);
}
