use bevy::input::keyboard::KeyCode;

/// Multiplier applied per density key press
pub const DENSITY_STEP: f64 = 1.25;
pub const MIN_DENSITY: f64 = 0.0001;
pub const MAX_DENSITY: f64 = 0.01;

const LEVEL_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Collapses a burst of window resize events into one settled size
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDebounce {
    settle_secs: f64,
    pending: Option<((u32, u32), f64)>,
}

impl ResizeDebounce {
    pub fn new(settle_secs: f64) -> Self {
        Self {
            settle_secs: settle_secs.max(0.0),
            pending: None,
        }
    }

    /// Record a resize at time `now`. Returns true when this starts a burst.
    pub fn note(&mut self, size: (u32, u32), now: f64) -> bool {
        let started = self.pending.is_none();
        self.pending = Some((size, now));
        started
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Last size once no event has arrived for the settle time
    pub fn settled(&mut self, now: f64) -> Option<(u32, u32)> {
        let (size, last) = self.pending?;
        if now - last < self.settle_secs {
            return None;
        }
        self.pending = None;
        Some(size)
    }
}

/// Density after `steps` key presses (negative for fewer particles)
pub fn step_density(current: f64, steps: i32) -> f64 {
    (current * DENSITY_STEP.powi(steps)).clamp(MIN_DENSITY, MAX_DENSITY)
}

/// Catalog level for a digit key, `1` being the first level
pub fn level_index(key: KeyCode) -> Option<usize> {
    LEVEL_KEYS.iter().position(|&k| k == key)
}

/// Window size in whole pixels, never zero
pub fn pixel_size(width: f32, height: f32) -> (u32, u32) {
    (width.round().max(1.0) as u32, height.round().max(1.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let mut debounce = ResizeDebounce::new(0.25);
        assert!(debounce.note((800, 600), 1.0));
        assert!(!debounce.note((820, 610), 1.1));
        assert!(!debounce.note((840, 620), 1.2));

        assert_eq!(debounce.settled(1.3), None);
        assert_eq!(debounce.settled(1.45), Some((840, 620)));
        assert!(!debounce.is_pending());
        assert_eq!(debounce.settled(5.0), None);
    }

    #[test]
    fn test_debounce_new_burst_after_settle() {
        let mut debounce = ResizeDebounce::new(0.0);
        assert!(debounce.note((800, 600), 1.0));
        assert_eq!(debounce.settled(1.0), Some((800, 600)));
        assert!(debounce.note((640, 480), 2.0));
    }

    #[rstest]
    #[case(0.0016, 1, 0.002)]
    #[case(0.002, -1, 0.0016)]
    #[case(0.009, 3, MAX_DENSITY)]
    #[case(0.00011, -2, MIN_DENSITY)]
    fn test_step_density(#[case] current: f64, #[case] steps: i32, #[case] expected: f64) {
        assert!((step_density(current, steps) - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(KeyCode::Digit1, Some(0))]
    #[case(KeyCode::Digit9, Some(8))]
    #[case(KeyCode::Digit0, None)]
    #[case(KeyCode::KeyA, None)]
    fn test_level_index(#[case] key: KeyCode, #[case] expected: Option<usize>) {
        assert_eq!(level_index(key), expected);
    }

    #[rstest]
    #[case(1280.4, 719.6, (1280, 720))]
    #[case(0.0, 0.2, (1, 1))]
    fn test_pixel_size(#[case] width: f32, #[case] height: f32, #[case] expected: (u32, u32)) {
        assert_eq!(pixel_size(width, height), expected);
    }
}
