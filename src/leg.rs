use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of legs addressed by index.
    ///
    /// Bit `n` is leg `n` in body configuration order.
    /// Named constants follow the hexapod ordering.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LegFlags: u32 {
        const LEFT_FRONT = 0b00000001;
        const LEFT_MIDDLE = 0b00000010;
        const LEFT_REAR = 0b00000100;
        const RIGHT_FRONT = 0b00001000;
        const RIGHT_MIDDLE = 0b00010000;
        const RIGHT_REAR = 0b00100000;
        const LRL_TRIPOD =
            Self::LEFT_FRONT.bits() | Self::RIGHT_MIDDLE.bits() | Self::LEFT_REAR.bits();
        const RLR_TRIPOD =
            Self::RIGHT_FRONT.bits() | Self::LEFT_MIDDLE.bits() | Self::RIGHT_REAR.bits();
    }
}

impl LegFlags {
    pub const MAX_LEGS: usize = u32::BITS as usize;

    pub fn leg(index: usize) -> Self {
        debug_assert!(index < Self::MAX_LEGS);
        Self::from_bits_retain(1 << index)
    }

    pub fn from_legs(indices: &[usize]) -> Self {
        indices
            .iter()
            .fold(Self::empty(), |flags, &index| flags | Self::leg(index))
    }

    /// Every leg of a body with `count` legs
    pub fn first_legs(count: usize) -> Self {
        if count >= Self::MAX_LEGS {
            Self::from_bits_retain(u32::MAX)
        } else {
            Self::from_bits_retain((1_u32 << count) - 1)
        }
    }

    pub fn contains_leg(&self, index: usize) -> bool {
        index < Self::MAX_LEGS && self.bits() & (1 << index) != 0
    }

    pub fn leg_count(&self) -> usize {
        self.bits().count_ones() as usize
    }

    pub fn leg_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..Self::MAX_LEGS).filter(move |index| self.contains_leg(*index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegSide {
    Left,
    Right,
}

impl LegSide {
    /// Sign applied to the lateral component before solving hip yaw.
    ///
    /// Left legs are the mirrored side so that a positive hip angle
    /// swings the foot toward the front of the body on both sides.
    pub fn mirror_sign(&self) -> f32 {
        match self {
            LegSide::Left => -1.0,
            LegSide::Right => 1.0,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct JointTriple<T: Clone> {
    hip: T,
    femur: T,
    tibia: T,
}

impl<T: Clone> JointTriple<T> {
    pub fn new(hip: T, femur: T, tibia: T) -> Self {
        Self { hip, femur, tibia }
    }

    pub fn hip_ref(&self) -> &T {
        &self.hip
    }

    pub fn femur_ref(&self) -> &T {
        &self.femur
    }

    pub fn tibia_ref(&self) -> &T {
        &self.tibia
    }

    /// Joint names paired with values, proximal to distal
    pub fn named(&self) -> [(&'static str, &T); 3] {
        [("hip", &self.hip), ("femur", &self.femur), ("tibia", &self.tibia)]
    }
}

impl<T: Clone + Copy> Copy for JointTriple<T> {}

impl<T: Clone + Copy> JointTriple<T> {
    pub fn hip(&self) -> T {
        self.hip
    }

    pub fn femur(&self) -> T {
        self.femur
    }

    pub fn tibia(&self) -> T {
        self.tibia
    }
}

/// Hip yaw, femur pitch and tibia pitch in radians
pub type JointAngles = JointTriple<f32>;

/// Inclusive angle range in radians
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct AngleRange {
    pub min: f32,
    pub max: f32,
}

impl AngleRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn from_degrees(min: f32, max: f32) -> Self {
        Self::new(min.to_radians(), max.to_radians())
    }

    pub fn is_inverted(&self) -> bool {
        !(self.min <= self.max)
    }

    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.min && angle <= self.max
    }

    /// Clamp into the range. NaN maps to the range minimum.
    pub fn clamp(&self, angle: f32) -> f32 {
        if angle.is_nan() {
            return self.min;
        }
        angle.max(self.min).min(self.max)
    }
}

pub type JointLimits = JointTriple<AngleRange>;
