//! Field of view: a 360° visibility sweep around a viewer.
//!
//! Every candidate occupies an angular interval centred on its bearing.
//! Sweeping the sorted interval endpoints while tracking the nearest active
//! candidate yields arcs that partition `[0, 360)`, each attributed to the
//! closest occluder at that bearing (or to nothing).

use std::cmp::Ordering;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use starwake_core::math::{angle_of, limit_precision};
use starwake_core::ObjectId;

/// Contiguous range of bearings attributed to one object, or to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleArc {
    /// `None` where nothing is within range.
    pub object: Option<ObjectId>,
    /// Surface distance, never beyond the viewer's range.
    pub distance: f64,
    pub from_angle: f64,
    pub to_angle: f64,
}

/// An object the sweep may attribute arcs to.
#[derive(Debug, Clone, PartialEq)]
pub struct FovCandidate {
    pub id: ObjectId,
    pub position: DVec2,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy)]
struct Endpoint {
    angle: f64,
    edge: Edge,
    /// Index into the interval table.
    owner: usize,
}

struct Interval {
    object: Option<ObjectId>,
    distance: f64,
}

/// Compute the arcs seen from `origin` out to `range`.
pub fn compute_arcs(origin: DVec2, range: f64, candidates: &[FovCandidate]) -> Vec<VisibleArc> {
    let range = limit_precision(range.max(0.0));
    let mut intervals = vec![Interval {
        object: None,
        distance: f64::INFINITY,
    }];
    // The sentinel spans the whole ring so the active set is never empty.
    let mut endpoints = vec![
        Endpoint {
            angle: 0.0,
            edge: Edge::Start,
            owner: 0,
        },
        Endpoint {
            angle: 360.0,
            edge: Edge::Stop,
            owner: 0,
        },
    ];

    for candidate in candidates {
        let offset = candidate.position - origin;
        let center_distance = offset.length();
        let distance = limit_precision((center_distance - candidate.radius).max(0.0));
        if distance > range {
            continue;
        }
        let owner = intervals.len();
        intervals.push(Interval {
            object: Some(candidate.id.clone()),
            distance,
        });
        let mut push = |from: f64, to: f64| {
            if to > from {
                endpoints.push(Endpoint {
                    angle: from,
                    edge: Edge::Start,
                    owner,
                });
                endpoints.push(Endpoint {
                    angle: to,
                    edge: Edge::Stop,
                    owner,
                });
            }
        };
        if center_distance <= candidate.radius {
            push(0.0, 360.0);
            continue;
        }
        let half_width = (candidate.radius / center_distance).asin().to_degrees();
        let bearing = angle_of(offset);
        let from = limit_precision(bearing - half_width);
        let to = limit_precision(bearing + half_width);
        if from < 0.0 {
            push(from + 360.0, 360.0);
            push(0.0, to);
        } else if to > 360.0 {
            push(from, 360.0);
            push(0.0, to - 360.0);
        } else {
            push(from, to);
        }
    }

    endpoints.sort_by(|a, b| a.angle.partial_cmp(&b.angle).unwrap_or(Ordering::Equal));

    let nearest_first = |a: &usize, b: &usize| {
        let (ia, ib) = (&intervals[*a], &intervals[*b]);
        ia.distance
            .partial_cmp(&ib.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| ia.object.cmp(&ib.object))
    };

    let mut active: Vec<usize> = Vec::new();
    let mut arcs: Vec<VisibleArc> = Vec::new();
    let mut current: Option<usize> = None;
    let mut arc_start = 0.0;
    let mut i = 0;
    while i < endpoints.len() {
        let angle = endpoints[i].angle;
        // Apply every endpoint at this angle before looking at the nearest.
        while i < endpoints.len() && endpoints[i].angle == angle {
            let endpoint = endpoints[i];
            match endpoint.edge {
                Edge::Start => active.push(endpoint.owner),
                Edge::Stop => active.retain(|&owner| owner != endpoint.owner),
            }
            i += 1;
        }
        active.sort_by(nearest_first);
        let nearest = active.first().copied();
        if nearest == current {
            continue;
        }
        if let Some(owner) = current {
            if angle > arc_start {
                emit(&mut arcs, &intervals[owner], range, arc_start, angle);
            }
        }
        current = nearest;
        arc_start = angle;
    }
    arcs
}

fn emit(arcs: &mut Vec<VisibleArc>, interval: &Interval, range: f64, from: f64, to: f64) {
    let distance = interval.distance.min(range);
    if let Some(last) = arcs.last_mut() {
        if last.object == interval.object && last.to_angle == from {
            last.to_angle = to;
            return;
        }
    }
    arcs.push(VisibleArc {
        object: interval.object.clone(),
        distance,
        from_angle: from,
        to_angle: to,
    });
}
