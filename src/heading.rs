//! Per-step heading computation.
//!
//! Every agent scans every other agent (O(N²) per step) against a read-only
//! snapshot of positions and velocities, and the results land in a freshly
//! allocated buffer. Agents are independent, so the outer loop runs on the
//! rayon pool.

use rayon::prelude::*;

use crate::components::{cap_unit_length, cosine_between, length, normalize, Point2, Vector2};
use crate::neighborhood::{NearestImage, Torus};
use crate::params::{SimulationParameters, StepConstants};

/// The four accumulated rule vectors for one agent, after the single-neighbour
/// centering suppression and after capping each at unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleVectors {
	pub centering: Vector2,
	pub copying: Vector2,
	pub avoidance: Vector2,
	pub visual: Vector2,
}

impl RuleVectors {
	pub fn zero() -> Self {
		Self {
			centering: Vector2::zeros(),
			copying: Vector2::zeros(),
			avoidance: Vector2::zeros(),
			visual: Vector2::zeros(),
		}
	}

	/// Weighted sum of the four rules.
	pub fn target(&self, params: &SimulationParameters) -> Vector2 {
		self.centering * params.weight_center
			+ self.copying * params.weight_copy
			+ self.avoidance * params.weight_avoid
			+ self.visual * params.weight_visual
	}
}

/// Everything one heading invocation shares across agents.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
	params: &'a SimulationParameters,
	consts: StepConstants,
	torus: Torus,
}

impl<'a> StepContext<'a> {
	pub fn new(params: &'a SimulationParameters) -> Self {
		Self {
			params,
			consts: StepConstants::new(params),
			torus: Torus::new(params.world_width, params.world_height),
		}
	}

	pub fn rule_vectors(&self, positions: &[Point2], velocities: &[Vector2], which: usize) -> RuleVectors {
		let params = self.params;
		let me = positions[which];
		let heading = velocities[which];

		let mut centering = Vector2::zeros();
		let mut num_center = 0usize;
		let mut copying = Vector2::zeros();
		let mut avoidance = Vector2::zeros();
		let mut visual = Vector2::zeros();

		for (i, (pos, vel)) in positions.iter().zip(velocities).enumerate() {
			if i == which {
				continue;
			}

			let NearestImage { position: image, distance } = self.torus.nearest_image(&me, pos);
			if distance > self.consts.max_radius {
				continue;
			}

			let to_neighbor = image - me;
			// a stationary agent (or a coincident neighbour) sees nothing
			let cos = match cosine_between(&heading, &to_neighbor) {
				Some(cos) if cos >= self.consts.cos_view => cos,
				_ => continue,
			};

			if distance <= params.radius_center && distance > params.radius_avoid {
				centering += to_neighbor;
				num_center += 1;
			}

			if distance <= params.radius_copy && distance > params.radius_avoid {
				copying += vel;
			}

			if distance <= params.radius_avoid && distance != 0.0 {
				let away = me - image;
				avoidance += normalize(away) / distance;
			}

			if distance <= params.radius_visual && cos > self.consts.cos_visual && distance != 0.0 {
				let away = me - image;
				visual += (away + clearance_offset(&away, &heading)) / distance;
			}
		}

		// centering on a lone neighbour looks aggressive
		if num_center < 2 {
			centering = Vector2::zeros();
		}

		RuleVectors {
			centering: cap_unit_length(centering),
			copying: cap_unit_length(copying),
			avoidance: cap_unit_length(avoidance),
			visual: cap_unit_length(visual),
		}
	}

	pub fn heading(&self, positions: &[Point2], velocities: &[Vector2], which: usize) -> Vector2 {
		let target = self.rule_vectors(positions, velocities, which).target(self.params);
		let old = velocities[which];
		let blended = old * self.params.momentum + target * (1.0 - self.params.momentum);
		enforce_min_speed(blended, &old, self.params.min_speed)
	}
}

/// A vector orthogonal to `away`, flipped to agree with `heading`.
///
/// When `away` lies on an axis the result is a fixed axis vector rather than
/// a true perpendicular; flock dynamics depend on this exact casework.
pub fn clearance_offset(away: &Vector2, heading: &Vector2) -> Vector2 {
	let (x, y) = (away.x, away.y);
	let (mut u, mut v) = (0.0, 0.0);
	if x != 0.0 && y != 0.0 {
		let slope2 = (y / x) * (y / x);
		u = (slope2 / (1.0 + slope2)).sqrt();
		v = -x * u / y;
	} else if x != 0.0 {
		u = 1.0;
	} else if y != 0.0 {
		v = 1.0;
	}
	if heading.x * u + heading.y * v < 0.0 {
		u = -u;
		v = -v;
	}
	Vector2::new(u, v)
}

/// Raises `v` to at least `min_speed`, keeping its direction.
///
/// A zero `v` has no direction: it takes `previous`'s direction instead,
/// and `+x` if `previous` is zero as well.
pub fn enforce_min_speed(v: Vector2, previous: &Vector2, min_speed: f64) -> Vector2 {
	let speed = length(&v);
	if speed >= min_speed {
		return v;
	}
	if speed > 0.0 {
		return v * (min_speed / speed);
	}
	let dir = normalize(*previous);
	if dir == Vector2::zeros() {
		Vector2::new(min_speed, 0.0)
	} else {
		dir * min_speed
	}
}

/// New velocity for every agent, computed in parallel.
///
/// `new_velocity[i]` depends only on the inputs, so the result is identical
/// to [`compute_step_sequential`] whatever order the pool runs agents in.
pub fn compute_step(params: &SimulationParameters, positions: &[Point2], velocities: &[Vector2]) -> Vec<Vector2> {
	debug_assert_eq!(positions.len(), velocities.len());
	let ctx = StepContext::new(params);
	let mut new_velocities = vec![Vector2::zeros(); positions.len()];
	new_velocities.par_iter_mut()
		.enumerate()
		.for_each(|(which, out)| {
			*out = ctx.heading(positions, velocities, which);
		});
	new_velocities
}

/// Same as [`compute_step`] on the calling thread, in index order.
pub fn compute_step_sequential(params: &SimulationParameters, positions: &[Point2], velocities: &[Vector2]) -> Vec<Vector2> {
	debug_assert_eq!(positions.len(), velocities.len());
	let ctx = StepContext::new(params);
	(0..positions.len())
		.map(|which| ctx.heading(positions, velocities, which))
		.collect()
}

/// Rule contributions for a single agent; useful for inspection.
pub fn rule_vectors(params: &SimulationParameters, positions: &[Point2], velocities: &[Vector2], which: usize) -> RuleVectors {
	StepContext::new(params).rule_vectors(positions, velocities, which)
}
