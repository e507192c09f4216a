/// Shape of a tween's progress curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Constant rate.
    #[default]
    Linear,
    /// Starts slow (cubic).
    In,
    /// Ends slow (cubic).
    Out,
    /// Slow at both ends (smoothstep).
    InOut,
}

impl Ease {
    /// Map progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::In => t.powi(3),
            Self::Out => 1.0 - (1.0 - t).powi(3),
            Self::InOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Handle to a tween registered on a [`TweenClock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenId(usize);

#[derive(Clone, Copy, Debug)]
struct Tween {
    start: f64,
    duration: f64,
    from: f64,
    to: f64,
    ease: Ease,
}

impl Tween {
    fn value_at(&self, now: f64) -> f64 {
        let t = if self.duration <= 0.0 {
            if now >= self.start { 1.0 } else { 0.0 }
        } else {
            (now - self.start) / self.duration
        };
        self.from + (self.to - self.from) * self.ease.apply(t)
    }
}

/// Session-time clock driving renderer tweens.
///
/// The session steps it to the current frame time before every update callback and clears it
/// when rendering begins, so tweens are a function of frame time, not wall time.
#[derive(Clone, Debug, Default)]
pub struct TweenClock {
    now: f64,
    tweens: Vec<Tween>,
}

impl TweenClock {
    /// Empty clock at time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Move the clock to `secs`.
    pub fn step_to(&mut self, secs: f64) {
        self.now = secs;
    }

    /// Drop every tween and rewind to 0.
    pub fn clear(&mut self) {
        self.tweens.clear();
        self.now = 0.0;
    }

    /// Tween from `from` to `to` over `[start, start + duration]` seconds.
    pub fn add(&mut self, start: f64, duration: f64, from: f64, to: f64, ease: Ease) -> TweenId {
        self.tweens.push(Tween {
            start,
            duration,
            from,
            to,
            ease,
        });
        TweenId(self.tweens.len() - 1)
    }

    /// Value of a tween at the current clock time, `None` for stale ids.
    pub fn value(&self, id: TweenId) -> Option<f64> {
        self.tweens.get(id.0).map(|t| t.value_at(self.now))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/tween.rs"]
mod tests;
