use std::f64::consts::TAU;

use rand::prelude::*;
use rayon::prelude::*;

use crate::components::{Point2, Vector2};
use crate::heading::compute_step;
use crate::neighborhood::Torus;
use crate::params::SimulationParameters;

/// Agent state surfaced after each committed step.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
	/// Number of steps committed so far, starting at 1 for the first frame.
	pub step: u64,
	pub positions: &'a [Point2],
	pub velocities: &'a [Vector2],
}

/// Receives the flock after every step: a renderer, a recorder, a logger.
pub trait FrameSink {
	fn frame(&mut self, frame: Frame<'_>);
}

impl<F: FnMut(Frame<'_>)> FrameSink for F {
	fn frame(&mut self, frame: Frame<'_>) {
		self(frame)
	}
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
	fn frame(&mut self, _frame: Frame<'_>) {}
}

/// Owns the agent arrays and advances them one step at a time.
///
/// The agent count is fixed at construction. Positions and velocities are
/// only touched between heading invocations, so every agent in a step reads
/// the same snapshot.
#[derive(Debug, Clone)]
pub struct Flock {
	params: SimulationParameters,
	torus: Torus,
	positions: Vec<Point2>,
	velocities: Vec<Vector2>,
	steps: u64,
}

impl Flock {
	/// Uniformly random positions and unit-length headings.
	pub fn new_random<R: Rng>(count: usize, params: SimulationParameters, rng: &mut R) -> Self {
		let mut positions = Vec::with_capacity(count);
		let mut velocities = Vec::with_capacity(count);
		for _ in 0..count {
			positions.push(Point2::new(
				rng.gen_range(0.0..params.world_width),
				rng.gen_range(0.0..params.world_height),
			));
			let angle = rng.gen::<f64>() * TAU;
			velocities.push(Vector2::new(angle.cos(), angle.sin()));
		}
		Self::from_state(params, positions, velocities)
	}

	pub fn seeded(count: usize, params: SimulationParameters, seed: u64) -> Self {
		let mut rng = StdRng::seed_from_u64(seed);
		log::debug!(
			"seeding {} agents on a {}x{} world (seed {})",
			count, params.world_width, params.world_height, seed
		);
		Self::new_random(count, params, &mut rng)
	}

	/// # Panics
	/// If `positions` and `velocities` differ in length.
	pub fn from_state(params: SimulationParameters, positions: Vec<Point2>, velocities: Vec<Vector2>) -> Self {
		assert_eq!(
			positions.len(),
			velocities.len(),
			"every agent needs both a position and a velocity"
		);
		Self {
			torus: Torus::new(params.world_width, params.world_height),
			params,
			positions,
			velocities,
			steps: 0,
		}
	}

	pub fn params(&self) -> &SimulationParameters {
		&self.params
	}

	pub fn positions(&self) -> &[Point2] {
		&self.positions
	}

	pub fn velocities(&self) -> &[Vector2] {
		&self.velocities
	}

	pub fn steps_taken(&self) -> u64 {
		self.steps
	}

	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	/// Computes new headings for everyone, then commits them and moves.
	pub fn step(&mut self) {
		self.velocities = compute_step(&self.params, &self.positions, &self.velocities);

		let dt = self.params.time_step;
		let torus = self.torus;
		self.positions.par_iter_mut()
			.zip(self.velocities.par_iter())
			.for_each(|(pos, vel)| {
				*pos += vel * dt;
				torus.wrap(pos);
			});

		self.steps += 1;
		log::trace!("step {} committed", self.steps);
	}

	pub fn step_observed<S: FrameSink + ?Sized>(&mut self, sink: &mut S) {
		self.step();
		sink.frame(self.frame());
	}

	pub fn run<S: FrameSink + ?Sized>(&mut self, steps: u64, sink: &mut S) {
		for _ in 0..steps {
			self.step_observed(sink);
		}
	}

	pub fn frame(&self) -> Frame<'_> {
		Frame {
			step: self.steps,
			positions: &self.positions,
			velocities: &self.velocities,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn in_bounds(flock: &Flock) -> bool {
		let p = flock.params();
		flock.positions().iter().all(|pos| {
			pos.x >= 0.0 && pos.x < p.world_width && pos.y >= 0.0 && pos.y < p.world_height
		})
	}

	#[test]
	fn random_start_is_in_bounds_with_unit_headings() {
		let flock = Flock::seeded(200, SimulationParameters::default(), 7);
		assert_eq!(flock.len(), 200);
		assert!(in_bounds(&flock));
		for v in flock.velocities() {
			assert!((v.norm() - 1.0).abs() < 1e-12);
		}
	}

	#[test]
	fn same_seed_same_flock() {
		let a = Flock::seeded(50, SimulationParameters::default(), 42);
		let b = Flock::seeded(50, SimulationParameters::default(), 42);
		assert_eq!(a.positions(), b.positions());
		assert_eq!(a.velocities(), b.velocities());
		let c = Flock::seeded(50, SimulationParameters::default(), 43);
		assert_ne!(a.positions(), c.positions());
	}

	#[test]
	fn step_commits_headings_then_moves() {
		let params = SimulationParameters::default();
		let mut flock = Flock::seeded(30, params, 1);
		let before = flock.positions().to_vec();
		let expected = compute_step(&params, flock.positions(), flock.velocities());

		flock.step();

		assert_eq!(flock.velocities(), expected.as_slice());
		let torus = Torus::new(params.world_width, params.world_height);
		for ((old, new), vel) in before.iter().zip(flock.positions()).zip(&expected) {
			let mut moved = *old + vel * params.time_step;
			torus.wrap(&mut moved);
			assert_eq!(*new, moved);
		}
		assert_eq!(flock.steps_taken(), 1);
	}

	#[test]
	fn lone_agent_wraps_around() {
		let params = SimulationParameters {
			world_width: 100.0,
			world_height: 100.0,
			time_step: 1.0,
			..Default::default()
		};
		let mut flock = Flock::from_state(params, vec![Point2::new(99.5, 0.2)], vec![Vector2::new(1.0, -1.0)]);
		flock.step();
		let v = flock.velocities()[0];
		assert_eq!(v, Vector2::new(1.0, -1.0) * params.momentum);
		let p = flock.positions()[0];
		assert!((p.x - (99.5 + v.x - 100.0)).abs() < 1e-12);
		assert!((p.y - (0.2 + v.y + 100.0)).abs() < 1e-12);
	}

	#[test]
	fn long_run_stays_in_bounds_above_min_speed() {
		let params = SimulationParameters::default();
		let mut flock = Flock::seeded(60, params, 3);
		for _ in 0..200 {
			flock.step();
			assert!(in_bounds(&flock));
			for v in flock.velocities() {
				assert!(v.norm() >= params.min_speed - 1e-12);
			}
		}
	}

	#[test]
	fn sink_sees_every_step() {
		let mut flock = Flock::seeded(10, SimulationParameters::default(), 9);
		let mut seen = Vec::new();
		let mut record = |frame: Frame<'_>| {
			assert_eq!(frame.positions.len(), 10);
			assert_eq!(frame.velocities.len(), 10);
			seen.push(frame.step);
		};
		flock.run(5, &mut record);
		assert_eq!(seen, vec![1, 2, 3, 4, 5]);
		assert_eq!(flock.steps_taken(), 5);
	}

	#[test]
	fn empty_flock_steps() {
		let mut flock = Flock::seeded(0, SimulationParameters::default(), 0);
		assert!(flock.is_empty());
		flock.run(3, &mut NullSink);
		assert_eq!(flock.steps_taken(), 3);
	}

	#[test]
	#[should_panic]
	fn mismatched_arrays_are_rejected() {
		Flock::from_state(SimulationParameters::default(), vec![Point2::origin()], vec![]);
	}
}
