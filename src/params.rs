use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::{BoidsError, Result};

pub const WORLD_W: f64 = 640.0;
pub const WORLD_H: f64 = 480.0;

pub const VIEW_ANGLE_DEG: f64 = 270.0;
pub const VISUAL_AVOID_ANGLE_DEG: f64 = 90.0;

pub const COPY_RANGE: f64 = 80.0;
pub const COPY_WEIGHT: f64 = 0.2;

pub const CENTER_RANGE: f64 = 30.0;
pub const CENTER_WEIGHT: f64 = 0.4;

pub const VISUAL_RANGE: f64 = 40.0;
pub const VISUAL_WEIGHT: f64 = 0.8;

pub const AVOID_RANGE: f64 = 15.0;
pub const AVOID_WEIGHT: f64 = 1.0;

pub const MOMENTUM: f64 = 0.95;
pub const MIN_SPEED: f64 = 0.5;
pub const TIME_STEP: f64 = 3.0;

/// Fixed physics and behaviour settings for one run.
///
/// Angles are held in radians; on disk they are written in degrees.
/// Nothing here is checked by the heading computation. Hosts that accept
/// outside input should call [`SimulationParameters::validate`] first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
	pub world_width: f64,
	pub world_height: f64,
	/// Full field of view.
	#[serde(with = "degrees")]
	pub view_angle: f64,
	/// Full cone inside which a neighbour counts as blocking the view.
	#[serde(with = "degrees")]
	pub visual_avoid_angle: f64,
	pub radius_copy: f64,
	pub radius_center: f64,
	pub radius_visual: f64,
	pub radius_avoid: f64,
	pub weight_copy: f64,
	pub weight_center: f64,
	pub weight_visual: f64,
	pub weight_avoid: f64,
	/// Share of the previous velocity kept each step ("ddt").
	pub momentum: f64,
	pub min_speed: f64,
	pub time_step: f64,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		Self {
			world_width: WORLD_W,
			world_height: WORLD_H,
			view_angle: VIEW_ANGLE_DEG.to_radians(),
			visual_avoid_angle: VISUAL_AVOID_ANGLE_DEG.to_radians(),
			radius_copy: COPY_RANGE,
			radius_center: CENTER_RANGE,
			radius_visual: VISUAL_RANGE,
			radius_avoid: AVOID_RANGE,
			weight_copy: COPY_WEIGHT,
			weight_center: CENTER_WEIGHT,
			weight_visual: VISUAL_WEIGHT,
			weight_avoid: AVOID_WEIGHT,
			momentum: MOMENTUM,
			min_speed: MIN_SPEED,
			time_step: TIME_STEP,
		}
	}
}

impl SimulationParameters {
	/// Largest distance at which any rule can fire.
	pub fn max_radius(&self) -> f64 {
		self.radius_visual
			.max(self.radius_copy)
			.max(self.radius_center)
			.max(self.radius_avoid)
	}

	/// Rejects configurations the heading computation is not defined for.
	pub fn validate(&self) -> Result<()> {
		fn check(name: &'static str, value: f64, ok: bool, reason: &'static str) -> Result<()> {
			if !value.is_finite() {
				return Err(BoidsError::InvalidParameter { name, value, reason: "must be finite" });
			}
			if !ok {
				return Err(BoidsError::InvalidParameter { name, value, reason });
			}
			Ok(())
		}
		// 360° converted to radians may land an ulp past TAU
		let angle_ok = |a: f64| (0.0..=TAU + 1e-9).contains(&a);

		check("world_width", self.world_width, self.world_width > 0.0, "must be positive")?;
		check("world_height", self.world_height, self.world_height > 0.0, "must be positive")?;
		check("view_angle", self.view_angle, angle_ok(self.view_angle), "must lie in [0, 2π]")?;
		check(
			"visual_avoid_angle",
			self.visual_avoid_angle,
			angle_ok(self.visual_avoid_angle),
			"must lie in [0, 2π]",
		)?;
		check("radius_copy", self.radius_copy, self.radius_copy >= 0.0, "must not be negative")?;
		check("radius_center", self.radius_center, self.radius_center >= 0.0, "must not be negative")?;
		check("radius_visual", self.radius_visual, self.radius_visual >= 0.0, "must not be negative")?;
		check("radius_avoid", self.radius_avoid, self.radius_avoid >= 0.0, "must not be negative")?;
		check("weight_copy", self.weight_copy, true, "")?;
		check("weight_center", self.weight_center, true, "")?;
		check("weight_visual", self.weight_visual, true, "")?;
		check("weight_avoid", self.weight_avoid, true, "")?;
		check(
			"momentum",
			self.momentum,
			self.momentum > 0.0 && self.momentum < 1.0,
			"must lie strictly between 0 and 1",
		)?;
		check("min_speed", self.min_speed, self.min_speed >= 0.0, "must not be negative")?;
		check("time_step", self.time_step, self.time_step > 0.0, "must be positive")?;
		Ok(())
	}
}

/// Values derived once per heading invocation and shared by every agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConstants {
	pub cos_view: f64,
	pub cos_visual: f64,
	pub max_radius: f64,
}

impl StepConstants {
	pub fn new(params: &SimulationParameters) -> Self {
		Self {
			cos_view: (params.view_angle / 2.0).cos(),
			cos_visual: (params.visual_avoid_angle / 2.0).cos(),
			max_radius: params.max_radius(),
		}
	}
}

mod degrees {
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(radians: &f64, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_f64(radians.to_degrees())
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
		f64::deserialize(deserializer).map(f64::to_radians)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		SimulationParameters::default().validate().unwrap();
	}

	#[test]
	fn max_radius_picks_largest_rule() {
		let params = SimulationParameters::default();
		assert_eq!(params.max_radius(), COPY_RANGE);
		let params = SimulationParameters { radius_avoid: 500.0, ..params };
		assert_eq!(params.max_radius(), 500.0);
	}

	#[test]
	fn step_constants_use_half_angles() {
		let params = SimulationParameters {
			view_angle: TAU,
			visual_avoid_angle: std::f64::consts::FRAC_PI_2,
			..Default::default()
		};
		let consts = StepConstants::new(&params);
		assert_eq!(consts.cos_view, -1.0);
		assert!((consts.cos_visual - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
	}

	#[test]
	fn momentum_must_be_inside_open_interval() {
		for momentum in [0.0, 1.0, -0.1, 1.5] {
			let params = SimulationParameters { momentum, ..Default::default() };
			match params.validate() {
				Err(BoidsError::InvalidParameter { name, .. }) => assert_eq!(name, "momentum"),
				other => panic!("momentum {} accepted: {:?}", momentum, other),
			}
		}
	}

	#[test]
	fn negative_radius_and_weights() {
		let params = SimulationParameters { radius_center: -1.0, ..Default::default() };
		assert!(params.validate().is_err());
		// negative weights invert a rule and are legal
		let params = SimulationParameters { weight_avoid: -2.0, ..Default::default() };
		params.validate().unwrap();
	}

	#[test]
	fn non_finite_values_are_rejected() {
		let params = SimulationParameters { weight_copy: f64::NAN, ..Default::default() };
		assert!(params.validate().is_err());
		let params = SimulationParameters { world_width: f64::INFINITY, ..Default::default() };
		assert!(params.validate().is_err());
	}

	#[test]
	fn angles_are_read_as_degrees() {
		let params: SimulationParameters =
			serde_json::from_str(r#"{ "view_angle": 180.0, "radius_avoid": 10.0 }"#).unwrap();
		assert!((params.view_angle - std::f64::consts::PI).abs() < 1e-12);
		assert_eq!(params.radius_avoid, 10.0);
		assert_eq!(params.radius_copy, COPY_RANGE);
	}
}
