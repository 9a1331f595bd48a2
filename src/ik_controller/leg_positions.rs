use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// One point per leg, in body configuration order
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct LegPositions(Vec<Point3<f32>>);

impl LegPositions {
    pub fn new(positions: Vec<Point3<f32>>) -> LegPositions {
        LegPositions(positions)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point3<f32>> {
        self.0.iter()
    }

    /// Express positions relative to a body shifted by `translation` and rotated by `rotation`
    pub fn transform(
        &self,
        translation: Vector3<f32>,
        rotation: UnitQuaternion<f32>,
    ) -> LegPositions {
        let inverse = rotation.inverse();
        self.0
            .iter()
            .map(|position| inverse * (position - translation))
            .collect()
    }
}

impl FromIterator<Point3<f32>> for LegPositions {
    fn from_iter<I: IntoIterator<Item = Point3<f32>>>(iter: I) -> Self {
        LegPositions(iter.into_iter().collect())
    }
}

impl Index<usize> for LegPositions {
    type Output = Point3<f32>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

pub trait MoveTowards {
    type Item;

    fn move_towards(&self, target: &Self, max_move: &f32) -> (Self::Item, bool);
}

impl MoveTowards for f32 {
    type Item = f32;

    fn move_towards(&self, target: &f32, max_move: &f32) -> (f32, bool) {
        if self == target {
            return (*target, false);
        }
        let difference = target - self;
        if difference.abs() <= *max_move {
            return (*target, true);
        }
        (self + difference.signum() * *max_move, true)
    }
}

impl MoveTowards for Vector3<f32> {
    type Item = Vector3<f32>;

    fn move_towards(&self, target: &Vector3<f32>, max_move: &f32) -> (Vector3<f32>, bool) {
        if self == target {
            return (*target, false);
        }
        let vector = target - self;
        if vector.norm() <= *max_move {
            return (*target, true);
        }
        (self + vector.normalize() * *max_move, true)
    }
}

pub trait RotateTowards {
    type Item;

    fn rotate_towards(&self, target: &Self, max_rotation: f32) -> (Self::Item, bool);
}

impl RotateTowards for UnitQuaternion<f32> {
    type Item = UnitQuaternion<f32>;

    fn rotate_towards(
        &self,
        target: &UnitQuaternion<f32>,
        max_rotation: f32,
    ) -> (UnitQuaternion<f32>, bool) {
        if self == target {
            return (*target, false);
        }
        let angle = self.angle_to(target);
        if angle <= max_rotation {
            return (*target, true);
        }
        (self.nlerp(target, max_rotation / angle), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn move_scalar_towards_full_step() {
        let (new, moved) = 0.0_f32.move_towards(&1.0, &1.0);
        assert!(moved);
        assert_eq!(new, 1.0);
    }

    #[test]
    fn move_scalar_towards_partial_step() {
        let (new, moved) = 1.0_f32.move_towards(&-1.0, &0.5);
        assert!(moved);
        assert_eq!(new, 0.5);
    }

    #[test]
    fn move_scalar_towards_not_move() {
        let (new, moved) = 1.0_f32.move_towards(&1.0, &10.0);
        assert!(!moved);
        assert_eq!(new, 1.0);
    }

    #[test]
    fn move_vector_towards_half() {
        let start = Vector3::new(0_f32, 0_f32, 0_f32);
        let target = Vector3::new(1_f32, 0_f32, 0_f32);
        let (new, moved) = start.move_towards(&target, &0.5);
        assert!(moved);
        assert_eq!(new, Vector3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn move_vector_towards_counts_steps() {
        let target = Vector3::new(6.0, 0.0, 0.0);
        let mut step = Vector3::zeros();
        let mut keep_moving = true;
        let mut counter = 0;
        while keep_moving {
            let (new, moved) = step.move_towards(&target, &1.0);
            step = new;
            keep_moving = moved;
            counter += 1;
        }
        assert_eq!(counter, 7);
        assert_eq!(target, step);
    }

    #[test]
    fn rotate_towards_single_step() {
        let a = UnitQuaternion::<f32>::identity();
        let b = UnitQuaternion::from_euler_angles(std::f32::consts::PI, 0.0, 0.0);
        let (res, rotated) = a.rotate_towards(&b, std::f32::consts::PI);
        assert!(rotated);
        assert_relative_eq!(b, res);
    }

    #[test]
    fn rotate_towards_already_rotated() {
        let a = UnitQuaternion::<f32>::identity();
        let (res, rotated) = a.rotate_towards(&a, std::f32::consts::PI);
        assert!(!rotated);
        assert_relative_eq!(a, res);
    }

    #[test]
    fn rotate_towards_half_with_nlerp() {
        let start = UnitQuaternion::<f32>::identity();
        let target =
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::PI * 0.5);
        let expected = start.nlerp(&target, 0.5);
        let (res, rotated) = start.rotate_towards(&target, std::f32::consts::PI * 0.25);
        assert!(rotated);
        assert_relative_eq!(expected, res);
    }

    #[test]
    fn transform_moves_feet_opposite_to_body() {
        let positions = LegPositions::new(vec![Point3::new(0.1, 0.2, -0.09)]);
        let shifted = positions.transform(Vector3::new(0.0, 0.0, 0.02), UnitQuaternion::identity());
        assert_relative_eq!(shifted[0], Point3::new(0.1, 0.2, -0.11));

        let yawed = positions.transform(
            Vector3::zeros(),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_2),
        );
        assert_relative_eq!(yawed[0], Point3::new(0.2, -0.1, -0.09), epsilon = 1e-6);
    }
}
