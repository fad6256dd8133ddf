use crate::components::{Point2, Vector2};

/// The wrapped plane `[0, width) × [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
	pub width: f64,
	pub height: f64,
}

/// The periodic image of a neighbour closest to some agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestImage {
	pub position: Point2,
	pub distance: f64,
}

impl Torus {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Searches the nine translated copies of `other` and returns the one
	/// nearest to `from`. Ties keep the first image found, scanning x offsets
	/// in the outer loop and y offsets in the inner one.
	pub fn nearest_image(&self, from: &Point2, other: &Point2) -> NearestImage {
		let mut best = NearestImage { position: *other, distance: f64::INFINITY };
		for dx in [-self.width, 0.0, self.width] {
			for dy in [-self.height, 0.0, self.height] {
				let image = *other + Vector2::new(dx, dy);
				let d = nalgebra::distance(&image, from);
				if d < best.distance {
					best = NearestImage { position: image, distance: d };
				}
			}
		}
		best
	}

	pub fn wrap(&self, pos: &mut Point2) {
		wrap_pos_within_limits(pos, self.width, self.height);
	}
}

/// Brings a coordinate back into `[0, span)` by adding or subtracting the
/// span once. Positions are assumed to move less than a span per step.
#[inline]
pub fn wrap_coordinate(c: f64, span: f64) -> f64 {
	if c < 0.0 {
		let c = c + span;
		// tiny negatives round up to exactly `span`
		if c >= span { 0.0 } else { c }
	} else if c >= span {
		c - span
	} else {
		c
	}
}

pub fn wrap_pos_within_limits(pos: &mut Point2, width: f64, height: f64) {
	pos.x = wrap_coordinate(pos.x, width);
	pos.y = wrap_coordinate(pos.y, height);
}
