use nalgebra as na;

pub type Point2 = na::Point2<f64>;
pub type Vector2 = na::Vector2<f64>;

#[inline]
pub fn length(v: &Vector2) -> f64 {
	v.norm()
}

/// Scales `v` to unit length. The zero vector is returned unchanged.
#[inline]
pub fn normalize(v: Vector2) -> Vector2 {
	let len = length(&v);
	if len != 0.0 {
		v / len
	} else {
		v
	}
}

/// Rescales vectors longer than 1.0 to unit length; shorter ones pass through.
#[inline]
pub fn cap_unit_length(v: Vector2) -> Vector2 {
	if length(&v) > 1.0 {
		normalize(v)
	} else {
		v
	}
}

/// Cosine of the angle between `a` and `b`, or `None` when either is zero.
#[inline]
pub fn cosine_between(a: &Vector2, b: &Vector2) -> Option<f64> {
	let denom = length(a) * length(b);
	if denom == 0.0 {
		return None;
	}
	Some(a.dot(b) / denom)
}
