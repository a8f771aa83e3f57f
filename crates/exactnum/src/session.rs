//! Explicit configuration for callers that want no thread-local state.
//!
//! A [`Session`] owns everything the plain methods otherwise take from the
//! current thread or from defaults: the [`MathContext`], the [`Limits`], the
//! random source and an [`ArithTracer`]. Its operations mirror the plain ones and
//! route the session's tracer into the bounded loops.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    context::MathContext,
    decimal::{BigDecimal, constants},
    error::ArithResult,
    integer::BigInteger,
    limits::Limits,
    tracer::{ArithTracer, NoopTracer},
};

/// Context, limits, random source and tracer for a sequence of operations.
#[derive(Debug)]
pub struct Session<R: RngCore = ChaCha8Rng, T: ArithTracer = NoopTracer> {
    context: MathContext,
    limits: Limits,
    rng: R,
    tracer: T,
}

impl Session {
    /// Unlimited context, default limits, an entropy-seeded ChaCha source, no tracing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(ChaCha8Rng::from_entropy())
    }

    /// Like [`Session::new`] but with a deterministic random source.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_parts(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_parts(rng: ChaCha8Rng) -> Self {
        Self {
            context: MathContext::UNLIMITED,
            limits: Limits::default(),
            rng,
            tracer: NoopTracer,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore, T: ArithTracer> Session<R, T> {
    #[must_use]
    pub fn with_context(mut self, context: MathContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Replaces the random source.
    pub fn with_rng<R2: RngCore>(self, rng: R2) -> Session<R2, T> {
        Session {
            context: self.context,
            limits: self.limits,
            rng,
            tracer: self.tracer,
        }
    }

    /// Replaces the tracer.
    pub fn with_tracer<T2: ArithTracer>(self, tracer: T2) -> Session<R, T2> {
        Session {
            context: self.context,
            limits: self.limits,
            rng: self.rng,
            tracer,
        }
    }

    #[must_use]
    pub fn context(&self) -> MathContext {
        self.context
    }

    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    #[must_use]
    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut T {
        &mut self.tracer
    }

    /// Consumes the session, returning the tracer with everything it collected.
    pub fn into_tracer(self) -> T {
        self.tracer
    }

    /// Parses a decimal whose default context is the session's.
    pub fn parse(&self, text: &str) -> ArithResult<BigDecimal> {
        Ok(text.parse::<BigDecimal>()?.with_default_context(self.context))
    }

    /// `a / b` rounded to the session context, traced.
    pub fn divide(&mut self, a: &BigDecimal, b: &BigDecimal) -> ArithResult<BigDecimal> {
        a.divide_traced(b, &self.context, &self.limits, &mut self.tracer)
    }

    /// `a / b` rounded to `context`, traced.
    pub fn divide_with_context(&mut self, a: &BigDecimal, b: &BigDecimal, context: &MathContext) -> ArithResult<BigDecimal> {
        a.divide_traced(b, context, &self.limits, &mut self.tracer)
    }

    pub fn add(&self, a: &BigDecimal, b: &BigDecimal) -> ArithResult<BigDecimal> {
        a.add_with_context(b, &self.context)
    }

    pub fn subtract(&self, a: &BigDecimal, b: &BigDecimal) -> ArithResult<BigDecimal> {
        a.subtract_with_context(b, &self.context)
    }

    pub fn multiply(&self, a: &BigDecimal, b: &BigDecimal) -> ArithResult<BigDecimal> {
        a.multiply_with_context(b, &self.context)
    }

    pub fn sqrt(&self, value: &BigDecimal) -> ArithResult<BigDecimal> {
        value.sqrt(&self.context)
    }

    /// Rounds `value` to the session context.
    pub fn round(&self, value: &BigDecimal) -> ArithResult<BigDecimal> {
        value.round(&self.context)
    }

    /// Miller-Rabin with witnesses from the session's random source.
    pub fn is_probable_prime(&mut self, value: &BigInteger, certainty: u32) -> bool {
        value.miller_rabin(certainty, &mut self.rng, &mut self.tracer)
    }

    /// Random `bits`-bit probable prime within the session's candidate budget.
    pub fn probable_prime(&mut self, bits: u64, certainty: u32) -> ArithResult<BigInteger> {
        BigInteger::probable_prime_traced(bits, certainty, &mut self.rng, &self.limits, &mut self.tracer)
    }

    /// Smallest probable prime above `value`, testing with the session's random source.
    pub fn next_probable_prime(&mut self, value: &BigInteger, certainty: u32) -> BigInteger {
        value.next_probable_prime_traced(certainty, &mut self.rng, &mut self.tracer)
    }

    /// Uniformly random value in `[0, 2^bits)`.
    pub fn random_bits(&mut self, bits: u64) -> BigInteger {
        BigInteger::random_bits(bits, &mut self.rng)
    }

    /// PI rounded to the session context.
    pub fn pi(&mut self) -> ArithResult<BigDecimal> {
        constants::pi_traced(&self.context, &self.limits, &mut self.tracer)
    }

    /// E rounded to the session context.
    pub fn e(&mut self) -> ArithResult<BigDecimal> {
        constants::e_traced(&self.context, &self.limits, &mut self.tracer)
    }
}
