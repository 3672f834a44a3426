//! Reactor energy ledger.
//!
//! Consumers pay through `try_spend_energy`. The per-tick run folds the
//! spending into the per-consumer telemetry, applies the leak, regenerates
//! and recharges the afterburner tank.

use std::collections::BTreeSet;

use tracing::warn;

use starwake_core::constants::ENERGY_EMA_WINDOW_SECS;
use starwake_core::enums::EnergyConsumer;
use starwake_core::ship::Ship;
use starwake_core::subsystems::Reactor;

/// Debit `amount` if the reactor holds strictly more than that.
///
/// An unaffordable request drains the reactor to zero and fails.
pub fn try_spend_energy(reactor: &mut Reactor, amount: f64, consumer: EnergyConsumer) -> bool {
    if !amount.is_finite() || amount < 0.0 {
        warn!(amount, ?consumer, "rejected energy request");
        return false;
    }
    if amount == 0.0 {
        return true;
    }
    if reactor.energy > amount {
        reactor.energy -= amount;
        *reactor.spent_this_tick.entry(consumer).or_default() += amount;
        true
    } else {
        reactor.energy = 0.0;
        false
    }
}

pub fn run(ship: &mut Ship, dt: f64) {
    if dt <= 0.0 {
        return;
    }
    let design = &ship.design.reactor;
    let reactor = &mut ship.reactor;

    // 1. Telemetry: exponential moving average of energy per minute
    let alpha = (dt / ENERGY_EMA_WINDOW_SECS).min(1.0);
    let spent = std::mem::take(&mut reactor.spent_this_tick);
    let consumers: BTreeSet<EnergyConsumer> = reactor
        .energy_per_minute
        .keys()
        .chain(spent.keys())
        .copied()
        .collect();
    for consumer in consumers {
        let sample = spent.get(&consumer).copied().unwrap_or(0.0) / dt * 60.0;
        let average = reactor.energy_per_minute.entry(consumer).or_default();
        *average += (sample - *average) * alpha;
    }

    // 2. Leak
    let leak = reactor.energy_leak * design.energy_per_second * dt;
    reactor.energy = (reactor.energy - leak).max(0.0);

    // 3. Regeneration
    let regen = design.energy_per_second * reactor.efficiency_factor.max(0.0) * dt;
    reactor.energy = (reactor.energy + regen).min(design.max_energy);

    // 4. Afterburner recharge
    let charge = (design.afterburner_charge_rate * dt)
        .min(design.max_afterburner_fuel - reactor.afterburner_fuel)
        .max(0.0);
    if charge > 0.0 {
        let cost = charge * design.afterburner_energy_cost;
        if reactor.energy > cost && try_spend_energy(reactor, cost, EnergyConsumer::Afterburner) {
            reactor.afterburner_fuel += charge;
        }
    }
}
