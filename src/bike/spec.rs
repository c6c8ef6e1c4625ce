/// Bike specification definitions
///
/// This module defines the attributes a customer picks for a build and the
/// single correction (a rear gear clamp) that resolution may apply to them.
use crate::SpecError;
use serde::Deserialize;
use std::fmt;

/// Overall frame geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameStyle {
    Road,
    Tour,
    Gravel,
    SingleSpeed,
}

/// How the bike stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrakeType {
    Rim,
    MechanicalDisc,
    HydraulicDisc,
}

/// How gears are changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShifterStyle {
    /// Flat-bar trigger shifters with separate brake levers
    Trigger,
    /// Combined drop-bar shift and brake levers
    Sti,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandlebarType {
    Drops,
    Flat,
    Bullhorns,
    Flare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WheelPreference {
    Cheap,
    Premium,
}

/// Groupset manufacturer; the catalog tables currently cover Shimano parts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupsetBrand {
    #[default]
    Shimano,
    Sram,
    Campagnolo,
}

macro_rules! impl_display {
    ($ty:ty { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = match self {
                    $(Self::$variant => $label),+
                };
                write!(f, "{}", s)
            }
        }
    };
}

impl_display!(FrameStyle { Road => "road", Tour => "tour", Gravel => "gravel", SingleSpeed => "single-speed" });
impl_display!(BrakeType { Rim => "rim", MechanicalDisc => "mechanical-disc", HydraulicDisc => "hydraulic-disc" });
impl_display!(ShifterStyle { Trigger => "trigger", Sti => "sti" });
impl_display!(HandlebarType { Drops => "drops", Flat => "flat", Bullhorns => "bullhorns", Flare => "flare" });
impl_display!(WheelPreference { Cheap => "cheap", Premium => "premium" });
impl_display!(GroupsetBrand { Shimano => "shimano", Sram => "sram", Campagnolo => "campagnolo" });

/// The desired attributes of one bike build
///
/// A specification is owned by a single resolution run. Only the sequential
/// pre-pass may change it, and only through a [`SpecPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BikeSpecification {
    pub frame_style: FrameStyle,
    #[serde(default)]
    pub disc_brake_compatible: bool,
    pub brake_type: BrakeType,
    pub shifter_style: ShifterStyle,
    pub handlebar_type: HandlebarType,
    pub wheel_preference: WheelPreference,
    #[serde(default)]
    pub groupset_brand: GroupsetBrand,
    pub front_gears: u8,
    pub rear_gears: u8,
}

/// Rear gear counts a build may carry; 1 marks a single-speed drivetrain
pub const SUPPORTED_REAR_GEARS: [u8; 6] = [1, 8, 9, 10, 11, 12];

/// Front gear counts a build may carry
pub const SUPPORTED_FRONT_GEARS: [u8; 3] = [1, 2, 3];

impl BikeSpecification {
    /// Checks the gear count invariants
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Front gears in 1..=3 and rear gears supported
    /// * `Err(SpecError)` - The first offending count
    pub fn validate(&self) -> Result<(), SpecError> {
        if !SUPPORTED_FRONT_GEARS.contains(&self.front_gears) {
            return Err(SpecError::FrontGears(self.front_gears));
        }
        if !SUPPORTED_REAR_GEARS.contains(&self.rear_gears) {
            return Err(SpecError::RearGears(self.rear_gears));
        }
        Ok(())
    }

    /// Returns true if the drivetrain has no rear shifting
    pub fn is_single_speed_drivetrain(&self) -> bool {
        self.rear_gears <= 1
    }

    /// Applies a patch, returning true if anything changed
    pub fn apply(&mut self, patch: &SpecPatch) -> bool {
        if self.rear_gears == patch.rear_gears {
            return false;
        }
        tracing::warn!(
            "Clamping rear gears from {} to {}: {}",
            self.rear_gears,
            patch.rear_gears,
            patch.reason
        );
        self.rear_gears = patch.rear_gears;
        true
    }
}

impl fmt::Display for BikeSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frame (disc: {}), {} brakes, {} shifters, {} bars, {} wheels, {} {}x{}",
            self.frame_style,
            self.disc_brake_compatible,
            self.brake_type,
            self.shifter_style,
            self.handlebar_type,
            self.wheel_preference,
            self.groupset_brand,
            self.front_gears,
            self.rear_gears
        )
    }
}

/// A forced correction to an unsupported gear combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPatch {
    /// The rear gear count the specification must carry from now on
    pub rear_gears: u8,

    /// Human-readable explanation, logged when the patch is applied
    pub reason: String,
}
