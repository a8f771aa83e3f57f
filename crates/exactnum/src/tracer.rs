//! Arithmetic engine tracing infrastructure.
//!
//! Provides a trait-based tracing system for the bounded loops of the engine with
//! zero-cost abstraction. When using [`NoopTracer`], all trace methods compile away
//! entirely via monomorphization.
//!
//! # Architecture
//!
//! The [`ArithTracer`] trait defines hook points at the events worth observing:
//! which division strategy was chosen, Newton iterations, repeating-cycle
//! detection, Miller-Rabin witness rounds, prime candidates and constant cache
//! lookups. Concrete implementations collect different kinds of data:
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost no-op (default for plain methods) |
//! | [`StderrTracer`] | Human-readable event log to stderr |
//! | [`RecordingTracer`] | Full event recording for tests or post-mortem |
//!
//! # Usage
//!
//! Plain methods such as [`BigDecimal::divide`](crate::BigDecimal::divide) always use
//! [`NoopTracer`]. To observe an operation, run it through a [`Session`](crate::Session):
//!
//! ```
//! use exactnum::{BigDecimal, MathContext, RecordingTracer, Session};
//!
//! let mut session = Session::new().with_context(MathContext::DECIMAL64).with_tracer(RecordingTracer::new());
//! let one: BigDecimal = "1".parse().unwrap();
//! let three: BigDecimal = "3".parse().unwrap();
//! session.divide(&one, &three).unwrap();
//! assert!(!session.tracer().events().is_empty());
//! ```

use std::fmt;

/// Which algorithm served a decimal division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum DivisionStrategy {
    /// Digit-by-digit long division.
    #[strum(serialize = "long-division")]
    LongDivision,
    /// Newton-Raphson reciprocal followed by an exact correction step.
    #[strum(serialize = "newton")]
    Newton,
}

/// Trace event emitted by the engine.
///
/// Used by [`RecordingTracer`] to capture the full sequence of events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A decimal division picked its strategy.
    Division {
        /// Strategy that will compute the quotient.
        strategy: DivisionStrategy,
        /// Requested significant digits (0 = unlimited).
        precision: u32,
    },
    /// Long division finished producing quotient digits.
    LongDivisionDone {
        /// Number of fractional digits generated.
        digits: usize,
        /// Whether the remainder reached zero.
        exact: bool,
    },
    /// Unlimited-precision long division saw a remainder for the second time.
    CycleDetected {
        /// Number of distinct remainders seen before the repeat.
        remainders: usize,
    },
    /// One Newton reciprocal iteration completed.
    NewtonStep {
        /// 1-based iteration number.
        iteration: usize,
    },
    /// One Miller-Rabin witness round completed.
    WitnessRound {
        /// 1-based round number.
        round: u32,
        /// Whether the witness proved the candidate composite.
        composite: bool,
    },
    /// `probable_prime` drew a new candidate.
    PrimeCandidate {
        /// 1-based attempt number.
        attempt: usize,
    },
    /// A PI/E lookup against the constant cache.
    ConstantLookup {
        /// Constant name (`"PI"` or `"E"`).
        name: &'static str,
        /// Whether the cached value was reused.
        hit: bool,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Division { strategy, precision } => write!(f, "divide      strategy={strategy} precision={precision}"),
            Self::LongDivisionDone { digits, exact } => write!(f, "long-div    digits={digits} exact={exact}"),
            Self::CycleDetected { remainders } => write!(f, "cycle       remainders={remainders}"),
            Self::NewtonStep { iteration } => write!(f, "newton      iteration={iteration}"),
            Self::WitnessRound { round, composite } => write!(f, "witness     round={round} composite={composite}"),
            Self::PrimeCandidate { attempt } => write!(f, "candidate   attempt={attempt}"),
            Self::ConstantLookup { name, hit } => write!(f, "constant    name={name} hit={hit}"),
        }
    }
}

/// Trait for engine tracing.
///
/// All methods have default no-op implementations, so [`NoopTracer`] requires
/// zero lines of code and compiles to zero instructions. The engine carries the
/// tracer as a type parameter, so no-op calls are inlined away.
pub trait ArithTracer: fmt::Debug {
    /// Called once per decimal division after the strategy is chosen.
    #[inline(always)]
    fn on_division(&mut self, _strategy: DivisionStrategy, _precision: u32) {}

    /// Called when long division stops producing digits.
    #[inline(always)]
    fn on_long_division_done(&mut self, _digits: usize, _exact: bool) {}

    /// Called when unlimited-precision division detects a repeating remainder.
    #[inline(always)]
    fn on_cycle_detected(&mut self, _remainders: usize) {}

    /// Called after each Newton reciprocal iteration.
    #[inline(always)]
    fn on_newton_step(&mut self, _iteration: usize) {}

    /// Called after each Miller-Rabin witness round.
    #[inline(always)]
    fn on_witness_round(&mut self, _round: u32, _composite: bool) {}

    /// Called for every candidate tested by `probable_prime` or `next_probable_prime`.
    #[inline(always)]
    fn on_prime_candidate(&mut self, _attempt: usize) {}

    /// Called for every PI/E cache lookup.
    #[inline(always)]
    fn on_constant_lookup(&mut self, _name: &'static str, _hit: bool) {}
}

// ============================================================================
// NoopTracer — zero-cost default
// ============================================================================

/// A tracer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl ArithTracer for NoopTracer {}

// ============================================================================
// StderrTracer — human-readable event log
// ============================================================================

/// Tracer that prints one line per event to stderr.
///
/// Output format:
/// ```text
/// [    0] divide      strategy=long-division precision=16
/// [    1] long-div    digits=16 exact=false
/// ```
#[derive(Debug)]
pub struct StderrTracer {
    /// Maximum number of events to print before going quiet. None = unlimited.
    limit: Option<usize>,
    /// Number of events printed so far.
    count: usize,
}

impl StderrTracer {
    /// Creates a new stderr tracer with no event limit.
    #[must_use]
    pub fn new() -> Self {
        Self { limit: None, count: 0 }
    }

    /// Creates a new stderr tracer that stops after `limit` events.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            count: 0,
        }
    }

    fn emit(&mut self, event: &TraceEvent) {
        if let Some(limit) = self.limit
            && self.count >= limit
        {
            return;
        }
        eprintln!("[{:>5}] {event}", self.count);
        self.count += 1;
        if let Some(limit) = self.limit
            && self.count == limit
        {
            eprintln!("--- trace limit reached ({limit} events) ---");
        }
    }
}

impl Default for StderrTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl ArithTracer for StderrTracer {
    fn on_division(&mut self, strategy: DivisionStrategy, precision: u32) {
        self.emit(&TraceEvent::Division { strategy, precision });
    }

    fn on_long_division_done(&mut self, digits: usize, exact: bool) {
        self.emit(&TraceEvent::LongDivisionDone { digits, exact });
    }

    fn on_cycle_detected(&mut self, remainders: usize) {
        self.emit(&TraceEvent::CycleDetected { remainders });
    }

    fn on_newton_step(&mut self, iteration: usize) {
        self.emit(&TraceEvent::NewtonStep { iteration });
    }

    fn on_witness_round(&mut self, round: u32, composite: bool) {
        self.emit(&TraceEvent::WitnessRound { round, composite });
    }

    fn on_prime_candidate(&mut self, attempt: usize) {
        self.emit(&TraceEvent::PrimeCandidate { attempt });
    }

    fn on_constant_lookup(&mut self, name: &'static str, hit: bool) {
        self.emit(&TraceEvent::ConstantLookup { name, hit });
    }
}

// ============================================================================
// RecordingTracer — full event capture
// ============================================================================

/// Tracer that records every event in order.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    events: Vec<TraceEvent>,
}

impl RecordingTracer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Consumes the recorder and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// Drops all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ArithTracer for RecordingTracer {
    fn on_division(&mut self, strategy: DivisionStrategy, precision: u32) {
        self.events.push(TraceEvent::Division { strategy, precision });
    }

    fn on_long_division_done(&mut self, digits: usize, exact: bool) {
        self.events.push(TraceEvent::LongDivisionDone { digits, exact });
    }

    fn on_cycle_detected(&mut self, remainders: usize) {
        self.events.push(TraceEvent::CycleDetected { remainders });
    }

    fn on_newton_step(&mut self, iteration: usize) {
        self.events.push(TraceEvent::NewtonStep { iteration });
    }

    fn on_witness_round(&mut self, round: u32, composite: bool) {
        self.events.push(TraceEvent::WitnessRound { round, composite });
    }

    fn on_prime_candidate(&mut self, attempt: usize) {
        self.events.push(TraceEvent::PrimeCandidate { attempt });
    }

    fn on_constant_lookup(&mut self, name: &'static str, hit: bool) {
        self.events.push(TraceEvent::ConstantLookup { name, hit });
    }
}
