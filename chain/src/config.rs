use crate::gear::{ToothProfile, STANDARD_TOOTH_COUNT};
use angles::SweepParams;
use std::f64::consts::PI;

/// Tunables of the mesh collision resolver.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct MeshParams {
    /// Teeth further than this from the line to the neighbor's
    /// center are not considered to be in the mesh zone.
    pub facing_tolerance: f64,
    /// Minimum tip-to-tip distance, as a multiple of tooth width.
    pub safe_distance_multiplier: f64,
    /// How far a gear is advanced per resolver step.
    pub adjustment_step: f64,
    /// Step bound for each resolver stage.
    pub max_iterations: usize,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            facing_tolerance: PI / 2.,
            safe_distance_multiplier: 1.5,
            adjustment_step: PI / 360.,
            max_iterations: 720,
        }
    }
}

impl MeshParams {
    /// Narrower mesh zone: only teeth within 60° of the center line.
    pub fn strict() -> Self {
        Self {
            facing_tolerance: PI / 3.,
            ..Self::default()
        }
    }

    pub fn min_safe_distance(&self, profile: &ToothProfile) -> f64 {
        self.safe_distance_multiplier * profile.width
    }
}

/// Tunables of the alignment rotation solver.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AlignParams {
    pub sweep: SweepParams,
    /// Both marked teeth must be strictly closer than this to their target.
    pub tolerance: f64,
    /// Offset reported when the sweep finds nothing.
    pub fallback: f64,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            sweep: SweepParams::default(),
            tolerance: 0.05,
            fallback: PI / 3.,
        }
    }
}

/// Timeline of the ground-truth animation.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct VideoConfig {
    pub enabled: bool,
    pub fps: u32,
    /// frames the initial state is held for
    pub hold_frames: usize,
    pub rotation_frames: usize,
    /// the final state is held for `hold_frames * final_hold_multiplier`
    pub final_hold_multiplier: usize,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fps: 10,
            hold_frames: 8,
            rotation_frames: 40,
            final_hold_multiplier: 2,
        }
    }
}

/// TaskConfig describes everything a task is generated from, apart from
/// the random source.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)] // missing fields take their default values
pub struct TaskConfig {
    pub domain: String,
    pub image_size: (u32, u32),

    pub min_gears: usize,
    pub max_gears: usize,
    pub gear_radius: f64,
    /// Gap between adjacent tip circles. Negative values push the
    /// gears into each other so the teeth look meshed.
    pub gear_gap: f64,
    pub tooth_count: usize,
    pub tooth: ToothProfile,

    pub mesh: MeshParams,
    pub align: AlignParams,
    pub video: VideoConfig,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            domain: "gear_chain".to_owned(),
            image_size: (512, 512),
            min_gears: 3,
            max_gears: 6,
            gear_radius: 40.,
            gear_gap: -8.,
            tooth_count: STANDARD_TOOTH_COUNT,
            tooth: ToothProfile::STANDARD,
            mesh: MeshParams::default(),
            align: AlignParams::default(),
            video: VideoConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("a chain needs at least 2 gears, min_gears is {0}")]
    TooFewGears(usize),
    #[error("min_gears ({min}) is greater than max_gears ({max})")]
    GearRange { min: usize, max: usize },
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{0} must be non-zero")]
    Zero(&'static str),
    #[error("gear_gap must be finite, got {0}")]
    Gap(f64),
}

impl TaskConfig {
    /// Center-to-center distance between adjacent gears.
    pub fn spacing(&self) -> f64 {
        2. * self.gear_radius + 2. * self.tooth.length + self.gear_gap
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_gears < 2 {
            return Err(ConfigError::TooFewGears(self.min_gears));
        }
        if self.min_gears > self.max_gears {
            return Err(ConfigError::GearRange {
                min: self.min_gears,
                max: self.max_gears,
            });
        }
        if !self.gear_gap.is_finite() {
            return Err(ConfigError::Gap(self.gear_gap));
        }

        for (field, value) in [
            ("gear_radius", self.gear_radius),
            ("tooth.length", self.tooth.length),
            ("tooth.width", self.tooth.width),
            ("spacing", self.spacing()),
            ("mesh.facing_tolerance", self.mesh.facing_tolerance),
            ("mesh.safe_distance_multiplier", self.mesh.safe_distance_multiplier),
            ("mesh.adjustment_step", self.mesh.adjustment_step),
            ("align.sweep.step", self.align.sweep.step),
            ("align.sweep.max", self.align.sweep.max),
            ("align.tolerance", self.align.tolerance),
        ] {
            if !(value.is_finite() && value > 0.) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("image_size.0", self.image_size.0 as usize),
            ("image_size.1", self.image_size.1 as usize),
            ("tooth_count", self.tooth_count),
            ("mesh.max_iterations", self.mesh.max_iterations),
            ("video.rotation_frames", self.video.rotation_frames),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(field));
            }
        }

        Ok(())
    }
}
