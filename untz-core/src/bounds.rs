//! Range limits for encoder values: clipping or wraparound.

/// What happens when a value leaves its range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Overflow {
    /// Stop at the nearest bound.
    #[default]
    Clip,
    /// Re-enter the range from the opposite end.
    Wrap,
}

/// Inclusive value range plus overflow policy.
///
/// # Example
///
/// ```
/// use untz_core::Bounds;
///
/// let clip = Bounds::new(0, 10, false);
/// assert_eq!(clip.apply(12), 10);
///
/// let wrap = Bounds::new(0, 10, true);
/// assert_eq!(wrap.apply(11), 0);
/// assert_eq!(wrap.apply(-1), 10);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds {
    lo: i16,
    hi: i16,
    overflow: Overflow,
}

impl Bounds {
    /// Whole `i16` range, clipping at the ends.
    pub const FULL: Self = Self {
        lo: i16::MIN,
        hi: i16::MAX,
        overflow: Overflow::Clip,
    };

    /// Create bounds `lo..=hi`. A reversed pair is swapped.
    #[must_use]
    pub const fn new(lo: i16, hi: i16, wrap: bool) -> Self {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        Self {
            lo,
            hi,
            overflow: if wrap { Overflow::Wrap } else { Overflow::Clip },
        }
    }

    #[inline]
    #[must_use]
    pub const fn lo(&self) -> i16 {
        self.lo
    }

    #[inline]
    #[must_use]
    pub const fn hi(&self) -> i16 {
        self.hi
    }

    #[inline]
    #[must_use]
    pub const fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Check whether `value` already lies inside the range.
    #[inline]
    #[must_use]
    pub const fn contains(&self, value: i16) -> bool {
        value >= self.lo && value <= self.hi
    }

    /// Normalize a raw value into this range.
    #[inline]
    #[must_use]
    pub fn apply(&self, raw: i32) -> i16 {
        apply(raw, self.lo, self.hi, self.overflow == Overflow::Wrap)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::FULL
    }
}

/// Normalize `raw` into `lo..=hi`.
///
/// Without `wrap` the value is clamped. With `wrap` it is reduced modulo the
/// span `hi - lo + 1` using a non-negative remainder, so `lo - 1` maps to `hi`.
/// Requires `lo <= hi`.
#[must_use]
pub fn apply(raw: i32, lo: i16, hi: i16, wrap: bool) -> i16 {
    let (lo, hi) = (i32::from(lo), i32::from(hi));
    let normalized = if wrap {
        let span = hi - lo + 1;
        lo + (raw - lo).rem_euclid(span)
    } else {
        raw.clamp(lo, hi)
    };
    // Both branches land in lo..=hi, which came from i16.
    normalized as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_clamps_both_ends() {
        assert_eq!(apply(11, 0, 10, false), 10);
        assert_eq!(apply(500, 0, 10, false), 10);
        assert_eq!(apply(-1, 0, 10, false), 0);
        assert_eq!(apply(7, 0, 10, false), 7);
    }

    #[test]
    fn test_wrap_reenters_range() {
        assert_eq!(apply(11, 0, 10, true), 0);
        assert_eq!(apply(12, 0, 10, true), 1);
        assert_eq!(apply(-1, 0, 10, true), 10);
        assert_eq!(apply(-12, 0, 10, true), 10);
    }

    #[test]
    fn test_wrap_with_negative_range() {
        assert_eq!(apply(-6, -5, 5, true), 5);
        assert_eq!(apply(6, -5, 5, true), -5);
        assert_eq!(apply(0, -5, 5, true), 0);
    }

    #[test]
    fn test_full_range_does_not_overflow() {
        assert_eq!(Bounds::FULL.apply(i32::from(i16::MAX) + 1), i16::MAX);
        assert_eq!(Bounds::FULL.apply(i32::from(i16::MIN) - 1), i16::MIN);
        assert_eq!(
            apply(i32::from(i16::MAX) + 1, i16::MIN, i16::MAX, true),
            i16::MIN
        );
    }

    #[test]
    fn test_single_value_range() {
        assert_eq!(apply(3, 4, 4, true), 4);
        assert_eq!(apply(9, 4, 4, false), 4);
    }

    #[test]
    fn test_reversed_bounds_are_swapped() {
        let bounds = Bounds::new(10, 0, false);
        assert_eq!(bounds.lo(), 0);
        assert_eq!(bounds.hi(), 10);
        assert!(bounds.contains(5));
        assert!(!bounds.contains(11));
    }
}
