/// Clamp a host-supplied time step to a usable value. Negative and
/// non-finite steps count as no time passing.
#[inline]
pub fn sanitize_delta(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.max(0.0)
    } else {
        0.0
    }
}

/// Wait until a total amount of simulated time has elapsed.
///
/// Time is only counted through [`Delay::tick`], so a delay created during a
/// step can never complete in that same step, even when its duration is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delay {
    duration: f32,
    elapsed: f32,
}

impl Delay {
    pub fn new(seconds: f32) -> Self {
        Self {
            duration: sanitize_delta(seconds),
            elapsed: 0.0,
        }
    }

    /// Add `dt` and report whether the wait is over.
    #[inline]
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += sanitize_delta(dt);
        self.is_done()
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }
}
