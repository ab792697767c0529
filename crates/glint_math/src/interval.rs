/// A closed range of real values.
///
/// Bounds valid ray parameters during hit tests and color channels during
/// quantization. The default interval is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Contains nothing: min is above max.
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Contains every real value.
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Width of the range; negative infinity for [`Interval::EMPTY`].
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// `min <= x <= max`
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// `min < x < max`. Hit tests use this so a surface at exactly `t_min`
    /// is never reported.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Saturates x to [min, max].
    ///
    /// Unlike `f32::clamp` this never panics, so it is safe on the empty
    /// interval; NaN falls through unchanged.
    pub fn clamp(&self, x: f32) -> f32 {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}
