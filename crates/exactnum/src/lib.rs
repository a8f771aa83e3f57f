#![doc = include_str!("../../../README.md")]
#![expect(clippy::cast_possible_truncation, reason = "limb and digit narrowing is range-checked")]
#![expect(clippy::cast_sign_loss, reason = "scales and digit counts are checked non-negative")]
#![expect(clippy::cast_possible_wrap, reason = "digit counts stay far below i64::MAX")]

mod context;
mod decimal;
mod error;
mod integer;
mod limbs;
mod limits;
mod random;
mod rounding;
mod session;
mod tracer;

pub use crate::{
    context::{MathContext, default_context, set_default_context},
    decimal::BigDecimal,
    error::{ArithError, ArithResult},
    integer::{BigInteger, DEFAULT_CERTAINTY, Sign, ToBigInteger},
    limits::{
        DEFAULT_CONSTANT_MAX_ITERATIONS, DEFAULT_LONG_DIVISION_MAX_PRECISION, DEFAULT_NEWTON_MAX_ITERATIONS,
        DEFAULT_PRIME_MAX_ATTEMPTS, Limits,
    },
    random::{seed_default_rng, with_default_rng},
    rounding::{Discarded, RoundingMode},
    session::Session,
    tracer::{ArithTracer, DivisionStrategy, NoopTracer, RecordingTracer, StderrTracer, TraceEvent},
};
