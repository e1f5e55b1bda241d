//! Volume control for the media element
//!
//! Level is 0-100%; the media element takes a linear 0.0-1.0 volume.

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume (0-100, clamped)
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
            muted: false,
        }
    }

    /// Set volume level (0-100)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Toggle mute state (the level is kept)
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Value for the media element's `volume` property
    ///
    /// Returns 0.0 if muted.
    pub fn element_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            f64::from(self.level) / 100.0
        }
    }
}
