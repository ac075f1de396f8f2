//! Rotation angle over time.

/// Angular speed used by the demo, in degrees per second.
pub const DEFAULT_DEGREES_PER_SECOND: f32 = 50.0;

/// One full turn, in degrees.
pub const FULL_TURN: f32 = 360.0;

/// Advances `angle` by `degrees_per_second * dt`.
///
/// On reaching a full turn the angle resets to 0 rather than carrying the
/// remainder over. Negative or non-finite `dt` counts as no time passing.
/// The result is always in `[0, 360)`.
pub fn advance_angle(angle: f32, degrees_per_second: f32, dt: f32) -> f32 {
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
    let next = angle + degrees_per_second * dt;

    if !next.is_finite() || next >= FULL_TURN {
        0.0
    } else if next < 0.0 {
        next.rem_euclid(FULL_TURN) % FULL_TURN
    } else {
        next
    }
}

/// Animation state: current angle plus the timestamp of the last update.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Animation {
    angle: f32,
    last_timestamp: f64,
    degrees_per_second: f32,
}

impl Animation {
    pub fn new(degrees_per_second: f32) -> Self {
        Self {
            angle: 0.0,
            last_timestamp: 0.0,
            degrees_per_second,
        }
    }

    /// Starts at `angle` (folded into `[0, 360)`).
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = if angle.is_finite() {
            angle.rem_euclid(FULL_TURN) % FULL_TURN
        } else {
            0.0
        };
        self
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Seconds, on whatever timeline the caller feeds in.
    #[inline]
    pub fn last_timestamp(&self) -> f64 {
        self.last_timestamp
    }

    #[inline]
    pub fn degrees_per_second(&self) -> f32 {
        self.degrees_per_second
    }

    /// Advances by an explicit delta (host-driven loop).
    pub fn step(&mut self, dt: f32) -> f32 {
        self.angle = advance_angle(self.angle, self.degrees_per_second, dt);
        if dt.is_finite() && dt > 0.0 {
            self.last_timestamp += dt as f64;
        }
        self.angle
    }

    /// Advances to the absolute timestamp `now` (seconds): the delta is the
    /// time since the previous call, and `now` becomes the new baseline.
    pub fn advance_to(&mut self, now: f64) -> f32 {
        let dt = (now - self.last_timestamp) as f32;
        self.last_timestamp = now;
        self.angle = advance_angle(self.angle, self.degrees_per_second, dt);
        self.angle
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(DEFAULT_DEGREES_PER_SECOND)
    }
}
