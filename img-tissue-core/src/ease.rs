use crate::Scalar;

/// Linear interpolation with start delay, clamped so it never passes `to`.
///
/// # Arguments
/// * `elapsed` - Time since animation start.
/// * `from` - Start value.
/// * `to` - Target value.
/// * `duration` - Time it takes to travel from `from` to `to`.
/// * `delay` - Time to wait before leaving `from`.
///
/// # Examples
/// ```
/// use img_tissue_core::prelude::*;
///
/// assert_eq!(linear(0.0, 0.0, 10.0, 100.0, 0.0), 0.0);
/// assert_eq!(linear(50.0, 0.0, 10.0, 100.0, 0.0), 5.0);
/// assert_eq!(linear(100.0, 0.0, 10.0, 100.0, 0.0), 10.0);
/// assert_eq!(linear(150.0, 0.0, 10.0, 100.0, 0.0), 10.0);
/// ```
#[inline]
pub fn linear(elapsed: Scalar, from: Scalar, to: Scalar, duration: Scalar, delay: Scalar) -> Scalar {
    let running = (elapsed - delay).max(0.0);
    if duration <= 0.0 {
        return if elapsed >= delay { to } else { from };
    }
    if running >= duration {
        return to;
    }
    let next = from + (to - from) * (running / duration);
    if to > from {
        next.min(to)
    } else {
        next.max(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_direction_with_delay() {
        assert_eq!(linear(10.0, 10.0, 0.0, 100.0, 20.0), 10.0);
        assert_eq!(linear(70.0, 10.0, 0.0, 100.0, 20.0), 5.0);
        assert_eq!(linear(200.0, 10.0, 0.0, 100.0, 20.0), 0.0);
    }

    #[test]
    fn test_holds_start_value_until_delay() {
        for t in [0.0, 10.0, 39.999] {
            assert_eq!(linear(t, 3.0, 9.0, 60.0, 40.0), 3.0);
        }
    }

    #[test]
    fn test_lands_exactly_on_target() {
        let from = 0.1;
        let to = 0.7;
        for t in [131.0, 500.0, 1000.0] {
            assert_eq!(linear(t, from, to, 100.0, 30.0), to);
            assert_eq!(linear(t, to, from, 100.0, 30.0), from);
        }
    }

    #[test]
    fn test_lands_on_target_at_travel_end() {
        let pairs = [
            (802.8549152229671, -938.8200339328929),
            (12.7, 66.7),
            (0.1, 0.7),
            (-3.3, 1e-3),
        ];
        for (from, to) in pairs {
            assert_eq!(linear(100.0, from, to, 100.0, 0.0), to);
            assert_eq!(linear(100.0, to, from, 100.0, 0.0), from);
            assert_eq!(linear(137.5, from, to, 100.0, 37.5), to);
        }
    }

    #[test]
    fn test_monotonic() {
        let mut last = linear(0.0, 5.0, -5.0, 80.0, 10.0);
        for step in 1..200 {
            let value = linear(step as Scalar, 5.0, -5.0, 80.0, 10.0);
            assert!(value <= last);
            assert!(value >= -5.0);
            last = value;
        }
    }

    #[test]
    fn test_constant_value() {
        assert_eq!(linear(50.0, 4.0, 4.0, 100.0, 0.0), 4.0);
    }

    #[test]
    fn test_zero_duration_jumps() {
        assert_eq!(linear(5.0, 1.0, 2.0, 0.0, 10.0), 1.0);
        assert_eq!(linear(10.0, 1.0, 2.0, 0.0, 10.0), 2.0);
    }
}
