//! Output volume and the mute toggle
//!
//! Volume is a linear engine level in `0.0..=1.0`. Mute is not a separate
//! flag: a level of zero is muted. Unmuting always restores full volume,
//! the level before muting is not remembered.

/// Engine output level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Level written when muting
    pub const MUTED: Volume = Volume(0.0);

    /// Level written when unmuting
    pub const UNMUTED: Volume = Volume(1.0);

    /// Create a volume, clamping to `0.0..=1.0`
    ///
    /// NaN maps to muted; use `try_new` to reject it instead.
    pub fn new(level: f32) -> Self {
        Self::try_new(level).unwrap_or(Self::MUTED)
    }

    /// Create a volume, clamping to `0.0..=1.0`; `None` for NaN
    pub fn try_new(level: f32) -> Option<Self> {
        if level.is_nan() {
            None
        } else {
            Some(Self(level.clamp(0.0, 1.0)))
        }
    }

    /// Current level (0.0-1.0)
    pub fn level(self) -> f32 {
        self.0
    }

    pub fn is_muted(self) -> bool {
        self.0 <= 0.0
    }

    /// Level after pressing the mute button
    #[must_use]
    pub fn toggled_mute(self) -> Self {
        if self.is_muted() {
            Self::UNMUTED
        } else {
            Self::MUTED
        }
    }

    /// Level as a whole percentage, for display
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::UNMUTED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_unit_range() {
        assert_eq!(Volume::new(1.5).level(), 1.0);
        assert_eq!(Volume::new(-0.2).level(), 0.0);
        assert_eq!(Volume::new(0.25).level(), 0.25);
    }

    #[test]
    fn nan_is_rejected_by_try_new() {
        assert!(Volume::try_new(f32::NAN).is_none());
        assert!(Volume::new(f32::NAN).is_muted());
    }

    #[test]
    fn mute_toggle_restores_full_volume() {
        let vol = Volume::new(0.4);
        assert!(!vol.is_muted());

        let muted = vol.toggled_mute();
        assert!(muted.is_muted());
        assert_eq!(muted.level(), 0.0);

        // Prior level (0.4) is not restored
        let unmuted = muted.toggled_mute();
        assert_eq!(unmuted.level(), 1.0);
    }

    #[test]
    fn percent_display() {
        assert_eq!(Volume::new(0.5).percent(), 50);
        assert_eq!(Volume::UNMUTED.percent(), 100);
        assert_eq!(Volume::MUTED.percent(), 0);
    }
}
