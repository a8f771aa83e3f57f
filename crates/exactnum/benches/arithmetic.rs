// Use codspeed-criterion-compat when running on CodSpeed (CI), real criterion otherwise (for flamegraphs)
#[cfg(codspeed)]
use codspeed_criterion_compat::{Bencher, Criterion, black_box, criterion_group, criterion_main};
#[cfg(not(codspeed))]
use criterion::{Bencher, Criterion, black_box, criterion_group, criterion_main};
use exactnum::{BigDecimal, BigInteger, Limits, MathContext, RoundingMode, Session};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Fixed-seed operands so every run measures the same values.
fn operands(bits: u64) -> (BigInteger, BigInteger) {
    let mut rng = ChaCha8Rng::seed_from_u64(bits);
    let a = BigInteger::random_bits(bits, &mut rng).set_bit(bits - 1);
    let b = BigInteger::random_bits(bits / 2, &mut rng).set_bit(bits / 2 - 1);
    (a, b)
}

#[cfg(not(codspeed))]
fn oracle(value: &BigInteger) -> num_bigint::BigInt {
    value.to_string().parse().unwrap()
}

fn multiply(bench: &mut Bencher, bits: u64) {
    let (a, b) = operands(bits);
    bench.iter(|| black_box(a.multiply(&b)));
}

/// Same product through `num-bigint` for comparison.
#[cfg(not(codspeed))]
fn multiply_num_bigint(bench: &mut Bencher, bits: u64) {
    let (a, b) = operands(bits);
    let (a, b) = (oracle(&a), oracle(&b));
    bench.iter(|| black_box(&a * &b));
}

fn divide(bench: &mut Bencher, bits: u64) {
    let (a, b) = operands(bits);
    bench.iter(|| black_box(a.div_rem(&b).unwrap()));
}

fn format_decimal(bench: &mut Bencher, bits: u64) {
    let (a, _) = operands(bits);
    bench.iter(|| black_box(a.to_string()));
}

fn mod_pow(bench: &mut Bencher, bits: u64) {
    let (base, exponent) = operands(bits);
    let modulus = operands(bits + 1).0.set_bit(0);
    bench.iter(|| black_box(base.mod_pow(&exponent, &modulus).unwrap()));
}

/// `1/7` at `precision` digits with the division threshold forced to one strategy.
fn decimal_divide(bench: &mut Bencher, precision: u32, long_division: bool) {
    let threshold = if long_division { u32::MAX } else { 0 };
    let mut session = Session::seeded(0)
        .with_context(MathContext::new(precision, RoundingMode::HalfEven))
        .with_limits(Limits::default().with_long_division_max_precision(threshold));
    let one = BigDecimal::from(1);
    let seven = BigDecimal::from(7);
    bench.iter(|| black_box(session.divide(&one, &seven).unwrap()));
}

fn criterion_benchmark(c: &mut Criterion) {
    for bits in [256, 4096] {
        c.bench_function(&format!("multiply_{bits}__exactnum"), |b| multiply(b, bits));
        #[cfg(not(codspeed))]
        c.bench_function(&format!("multiply_{bits}__num_bigint"), |b| multiply_num_bigint(b, bits));
        c.bench_function(&format!("divide_{bits}"), |b| divide(b, bits));
        c.bench_function(&format!("to_string_{bits}"), |b| format_decimal(b, bits));
    }
    c.bench_function("mod_pow_512", |b| mod_pow(b, 512));
    for precision in [50, 500] {
        c.bench_function(&format!("decimal_divide_{precision}__long"), |b| {
            decimal_divide(b, precision, true);
        });
        c.bench_function(&format!("decimal_divide_{precision}__newton"), |b| {
            decimal_divide(b, precision, false);
        });
    }
    c.bench_function("pi_100_cached", |b| {
        let context = MathContext::new(100, RoundingMode::HalfEven);
        b.iter(|| black_box(BigDecimal::pi(&context).unwrap()));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
