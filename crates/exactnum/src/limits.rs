//! Iteration caps for the bounded loops in the arithmetic engine.

/// Precision at or below which decimal division runs digit-by-digit long division.
///
/// Larger precisions use the Newton reciprocal path.
pub const DEFAULT_LONG_DIVISION_MAX_PRECISION: u32 = 100;

/// Default cap on Newton-Raphson reciprocal iterations.
pub const DEFAULT_NEWTON_MAX_ITERATIONS: usize = 64;

/// Default number of random candidates `probable_prime` tries before giving up.
pub const DEFAULT_PRIME_MAX_ATTEMPTS: usize = 10_000;

/// Default cap on series terms / Gauss-Legendre rounds when computing constants.
pub const DEFAULT_CONSTANT_MAX_ITERATIONS: usize = 100_000;

/// Bounds for every retry and convergence loop in the engine.
///
/// Plain methods on `BigInteger`/`BigDecimal` use [`Limits::default`]; a
/// [`Session`](crate::Session) can carry its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Limits {
    /// Highest precision still served by long division.
    pub long_division_max_precision: u32,
    /// Maximum Newton iterations for a reciprocal.
    pub newton_max_iterations: usize,
    /// Maximum random candidates drawn by `probable_prime`.
    pub prime_max_attempts: usize,
    /// Maximum terms or rounds when computing PI and E.
    pub constant_max_iterations: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            long_division_max_precision: DEFAULT_LONG_DIVISION_MAX_PRECISION,
            newton_max_iterations: DEFAULT_NEWTON_MAX_ITERATIONS,
            prime_max_attempts: DEFAULT_PRIME_MAX_ATTEMPTS,
            constant_max_iterations: DEFAULT_CONSTANT_MAX_ITERATIONS,
        }
    }
}

impl Limits {
    /// Returns a copy with a different long-division threshold.
    #[must_use]
    pub fn with_long_division_max_precision(mut self, precision: u32) -> Self {
        self.long_division_max_precision = precision;
        self
    }

    /// Returns a copy with a different Newton iteration cap.
    #[must_use]
    pub fn with_newton_max_iterations(mut self, iterations: usize) -> Self {
        self.newton_max_iterations = iterations;
        self
    }

    /// Returns a copy with a different prime candidate budget.
    #[must_use]
    pub fn with_prime_max_attempts(mut self, attempts: usize) -> Self {
        self.prime_max_attempts = attempts;
        self
    }

    /// Returns a copy with a different constant-series cap.
    #[must_use]
    pub fn with_constant_max_iterations(mut self, iterations: usize) -> Self {
        self.constant_max_iterations = iterations;
        self
    }
}
