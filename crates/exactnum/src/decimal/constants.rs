//! PI and E to a requested precision.
//!
//! Both are computed in fixed point (integers scaled by `10^working`) with
//! [`GUARD_DIGITS`] extra digits, then rounded to the context. Results are kept
//! in a per-thread cache of [`CACHE_CAPACITY`] entries per constant, keyed by the
//! context's canonical string and ordered by recency.

use std::{cell::RefCell, thread::LocalKey};

use indexmap::IndexMap;

use super::BigDecimal;
use crate::{
    context::MathContext,
    error::{ArithError, ArithResult},
    integer::BigInteger,
    limits::Limits,
    tracer::{ArithTracer, NoopTracer},
};

/// Digits carried beyond the requested precision.
const GUARD_DIGITS: u64 = 10;

/// Entries kept per constant.
pub(crate) const CACHE_CAPACITY: usize = 10;

/// Recency-ordered cache; the most recently used entry is last.
#[derive(Debug)]
pub(crate) struct ConstantCache {
    entries: IndexMap<String, BigDecimal, ahash::RandomState>,
}

impl ConstantCache {
    fn new() -> Self {
        Self {
            entries: IndexMap::with_hasher(ahash::RandomState::new()),
        }
    }

    /// Looks up `key` and marks it most recently used.
    fn get(&mut self, key: &str) -> Option<BigDecimal> {
        let (key, value) = self.entries.shift_remove_entry(key)?;
        self.entries.insert(key, value.clone());
        Some(value)
    }

    /// Inserts as most recently used, evicting the least recently used beyond capacity.
    fn insert(&mut self, key: String, value: BigDecimal) {
        self.entries.shift_remove(&key);
        self.entries.insert(key, value);
        while self.entries.len() > CACHE_CAPACITY {
            self.entries.shift_remove_index(0);
        }
    }

    /// Keys from most to least recently used.
    #[cfg(test)]
    fn keys(&self) -> Vec<String> {
        self.entries.keys().rev().cloned().collect()
    }
}

thread_local! {
    static PI_CACHE: RefCell<ConstantCache> = RefCell::new(ConstantCache::new());
    static E_CACHE: RefCell<ConstantCache> = RefCell::new(ConstantCache::new());
}

impl BigDecimal {
    /// PI rounded to `context` (Gauss-Legendre).
    ///
    /// Fails with `InvalidArgument` for unlimited precision.
    pub fn pi(context: &MathContext) -> ArithResult<Self> {
        pi_traced(context, &Limits::default(), &mut NoopTracer)
    }

    /// Euler's number rounded to `context` (Taylor series of `exp(1)`).
    ///
    /// Fails with `InvalidArgument` for unlimited precision.
    pub fn e(context: &MathContext) -> ArithResult<Self> {
        e_traced(context, &Limits::default(), &mut NoopTracer)
    }
}

pub(crate) fn pi_traced(context: &MathContext, limits: &Limits, tracer: &mut impl ArithTracer) -> ArithResult<BigDecimal> {
    cached("pi", &PI_CACHE, context, tracer, |working| gauss_legendre(working, context, limits))
}

pub(crate) fn e_traced(context: &MathContext, limits: &Limits, tracer: &mut impl ArithTracer) -> ArithResult<BigDecimal> {
    cached("e", &E_CACHE, context, tracer, |working| exp_one(working, context, limits))
}

/// Keys of the current thread's PI cache, most recently used first.
#[cfg(test)]
fn cached_pi_keys() -> Vec<String> {
    PI_CACHE.with(|cache| cache.borrow().keys())
}

fn cached(
    name: &'static str,
    cache: &'static LocalKey<RefCell<ConstantCache>>,
    context: &MathContext,
    tracer: &mut impl ArithTracer,
    compute: impl FnOnce(u64) -> ArithResult<BigInteger>,
) -> ArithResult<BigDecimal> {
    if context.is_unlimited() {
        return Err(ArithError::invalid(name, "an irrational constant needs a finite precision"));
    }
    let key = context.to_string();
    if let Some(hit) = cache.with(|entries| entries.borrow_mut().get(&key)) {
        tracer.on_constant_lookup(name, true);
        return Ok(hit);
    }
    tracer.on_constant_lookup(name, false);
    let working = u64::from(context.precision()) + GUARD_DIGITS;
    let fixed = compute(working)?;
    let value = BigDecimal::from_parts(fixed, working as i64, *context).round(context)?;
    cache.with(|entries| entries.borrow_mut().insert(key, value.clone()));
    Ok(value)
}

fn not_converged(context: &MathContext, working: u64) -> ArithError {
    ArithError::PrecisionOverflow {
        precision: context.precision(),
        needed: working,
    }
}

/// `PI * 10^working` by Gauss-Legendre iteration.
fn gauss_legendre(working: u64, context: &MathContext, limits: &Limits) -> ArithResult<BigInteger> {
    let unit = BigInteger::ten_pow(working);
    let one = BigInteger::one();
    let mut a = unit.clone();
    let mut b = unit.multiply(&unit).shift_right(1).sqrt()?;
    let mut t = unit.shift_right(2);
    let mut p = BigInteger::one();
    for _ in 0..limits.constant_max_iterations {
        if a.subtract(&b).abs() <= one {
            let sum = a.add(&b);
            return sum.multiply(&sum).divide(&t.shift_left(2));
        }
        let next_a = a.add(&b).shift_right(1);
        b = a.multiply(&b).sqrt()?;
        let delta = a.subtract(&next_a);
        t = t.subtract(&p.multiply(&delta.multiply(&delta)).divide(&unit)?);
        p = p.shift_left(1);
        a = next_a;
    }
    Err(not_converged(context, working))
}

/// `E * 10^working` by summing `1/k!` until the terms vanish.
fn exp_one(working: u64, context: &MathContext, limits: &Limits) -> ArithResult<BigInteger> {
    let mut term = BigInteger::ten_pow(working);
    let mut sum = BigInteger::ZERO;
    for k in 1..=limits.constant_max_iterations {
        if term.is_zero() {
            return Ok(sum);
        }
        sum = sum.add(&term);
        term = term.divide(&BigInteger::from(k))?;
    }
    Err(not_converged(context, working))
}
