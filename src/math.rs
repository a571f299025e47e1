use std::{
    array,
    f32::consts::TAU,
    ops::{Add, Mul, RangeInclusive, Sub},
};

use bytemuck::NoUninit;

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Vec<T, const N: usize>([T; N]);

impl<const N: usize> Vec<f32, N> {
    pub fn dist(self, other: Self) -> f32 {
        let mut sum = 0.0;
        for (&a, &b) in self.0.iter().zip(&other.0) {
            let diff = b - a;
            sum += diff * diff;
        }
        sum.sqrt()
    }

    pub fn length(self) -> f32 {
        self.dist(Vec([0.0; N]))
    }
}

impl<T: Copy> Vec<T, 2> {
    pub fn x(self) -> T {
        self.0[0]
    }

    pub fn y(self) -> T {
        self.0[1]
    }
}

// Safety: `[T; N]` has no padding iff `T` has no padding.
unsafe impl<T: NoUninit, const N: usize> NoUninit for Vec<T, N> {}

pub type Vec2<T> = Vec<T, 2>;
pub type Vec2f = Vec2<f32>;
pub type Vec4f = Vec<f32, 4>;

impl<T, const N: usize> From<[T; N]> for Vec<T, N> {
    fn from(value: [T; N]) -> Self {
        Self(value)
    }
}

impl<T, const N: usize> From<Vec<T, N>> for [T; N] {
    fn from(value: Vec<T, N>) -> Self {
        value.0
    }
}

impl<T, const N: usize> Add<Vec<T, N>> for Vec<T, N>
where
    T: Add<Output = T> + Copy,
{
    type Output = Vec<T, N>;

    fn add(self, rhs: Vec<T, N>) -> Self::Output {
        Vec(array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl<T, const N: usize> Sub<Vec<T, N>> for Vec<T, N>
where
    T: Sub<Output = T> + Copy,
{
    type Output = Vec<T, N>;

    fn sub(self, rhs: Vec<T, N>) -> Self::Output {
        Vec(array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl<T, const N: usize> Mul<T> for Vec<T, N>
where
    T: Mul<Output = T> + Copy,
{
    type Output = Vec<T, N>;

    fn mul(self, rhs: T) -> Self::Output {
        Vec(array::from_fn(|i| self.0[i] * rhs))
    }
}

pub fn vec2<T>(x: T, y: T) -> Vec2<T> {
    Vec([x, y])
}

pub fn lerp<R>(range: RangeInclusive<R>, t: f32) -> R
where
    R: Copy + Add<R, Output = R> + Mul<f32, Output = R>,
{
    *range.start() * (1.0 - t) + *range.end() * t
}

/// Schlick's bias curve. `bias == 0.5` is the identity on `0..=1`; smaller values pull the
/// curve towards the start, larger values towards the end.
///
/// Must agree with `ease` in `gradient.wgsl`.
pub fn ease(bias: f32, t: f32) -> f32 {
    let b = bias.clamp(0.001, 0.999);
    t / ((1.0 / b - 2.0) * (1.0 - t) + 1.0)
}

/// Maps an angle in radians to a fraction of a full turn in `0.0..1.0`.
pub fn turns(angle: f32) -> f32 {
    let t = angle / TAU;
    t - t.floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_is_linear_at_half_bias() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((ease(0.5, t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn ease_keeps_endpoints() {
        for bias in [0.0, 0.1, 0.3, 0.7, 0.9, 1.0] {
            assert!(ease(bias, 0.0).abs() < 1e-6);
            assert!((ease(bias, 1.0) - 1.0).abs() < 1e-6);
        }
        assert!(ease(0.2, 0.5) < 0.5);
        assert!(ease(0.8, 0.5) > 0.5);
    }

    #[test]
    fn turns_wraps_negative_angles() {
        assert!((turns(-TAU / 4.0) - 0.75).abs() < 1e-6);
        assert!(turns(TAU).abs() < 1e-6);
        assert!((turns(TAU / 2.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn lerp_colors() {
        let a = Vec4f::from([1.0, 0.0, 0.0, 1.0]);
        let b = Vec4f::from([0.0, 0.0, 1.0, 1.0]);
        let mid: [f32; 4] = lerp(a..=b, 0.5).into();
        assert_eq!(mid, [0.5, 0.0, 0.5, 1.0]);
    }
}
