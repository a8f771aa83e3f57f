//! Behavioural tests for `BigDecimal`: scales, rounding, division and formatting.
use std::collections::HashSet;

use exactnum::{ArithError, BigDecimal, BigInteger, Limits, MathContext, RoundingMode, Session};
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn dec(text: &str) -> BigDecimal {
    text.parse().expect("test literal should parse")
}

// ============================================================================
// Construction and formatting
// ============================================================================

#[test]
fn canonical_strings_round_trip() {
    for text in [
        "0",
        "123.45",
        "-0.001",
        "1E+3",
        "1.23E-7",
        "-12.3400",
        "0.000001",
        "9.999999999999999999999999E+40",
    ] {
        let value = dec(text);
        assert_eq!(value.to_string(), text);
        let reparsed = dec(&value.to_string());
        assert!(reparsed.same_representation(&value), "{text} changed representation");
    }
}

#[test]
fn plain_strings_parse_back_to_equal_values() {
    let mut rng = ChaCha8Rng::seed_from_u64(41);
    for _ in 0..500 {
        let unscaled = BigInteger::from(rng.gen_range(-1_000_000_000_i64..1_000_000_000));
        let value = BigDecimal::new(unscaled, rng.gen_range(-20..20));
        let plain = value.to_plain_string();
        assert!(!plain.contains('E'), "{plain}");
        let reparsed = dec(&plain);
        assert_eq!(reparsed, value, "{plain}");
        // a non-negative scale survives exactly; a negative one is written out as zeros
        if value.scale() >= 0 {
            assert!(reparsed.same_representation(&value), "{plain}");
        } else {
            assert_eq!(reparsed.scale(), 0, "{plain}");
        }
    }
}

#[test]
fn exponents_fold_into_the_scale() {
    let value = dec("1.23e5");
    assert_eq!(value.unscaled(), &BigInteger::from(123));
    assert_eq!(value.scale(), -3);
    assert_eq!(value.to_plain_string(), "123000");
    assert_eq!(value.to_engineering_string(), "123E+3");
    assert_eq!(dec("-.5").to_string(), "-0.5");
    assert_eq!(dec("+7.").to_string(), "7");
}

#[test]
fn malformed_literals_are_rejected() {
    for input in ["", ".", "1..2", "1e", "e5", "--1", "1.2.3", "12a", "1e+", " 1"] {
        assert!(
            matches!(input.parse::<BigDecimal>(), Err(ArithError::MalformedNumericLiteral { .. })),
            "{input:?} should not parse"
        );
    }
}

#[test]
fn primitive_conversions() {
    assert_eq!(BigDecimal::from(-42i64).to_string(), "-42");
    assert_eq!(BigDecimal::from_f64(0.1).unwrap().to_string(), "0.1");
    assert_eq!(
        BigDecimal::from_f64_exact(0.1).unwrap().to_string(),
        "0.1000000000000000055511151231257827021181583404541015625"
    );
    assert!(BigDecimal::from_f64(f64::NAN).is_err());
    assert_eq!(dec("12.99").to_big_integer(), BigInteger::from(12));
    assert_eq!(dec("-12.99").long_value(), -12);
    assert!(dec("1.5").to_big_integer_exact().is_err());
    assert!((dec("2.5").to_f64() - 2.5).abs() < f64::EPSILON);
}

// ============================================================================
// Scale arithmetic
// ============================================================================

#[test]
fn sums_take_the_larger_scale_and_products_add_scales() {
    let mut rng = ChaCha8Rng::seed_from_u64(20);
    for _ in 0..200 {
        let a = BigDecimal::new(BigInteger::from(rng.gen_range(-100_000i64..100_000)), rng.gen_range(-5..10));
        let b = BigDecimal::new(BigInteger::from(rng.gen_range(-100_000i64..100_000)), rng.gen_range(-5..10));
        let sum = &a + &b;
        assert_eq!(sum.scale(), a.scale().max(b.scale()));
        assert_eq!(&sum - &b, a);
        let product = &a * &b;
        assert_eq!(product.scale(), a.scale() + b.scale());
        assert_eq!(product.unscaled(), &a.unscaled().multiply(b.unscaled()));
    }
}

#[test]
fn equality_ignores_trailing_zeros() {
    assert_eq!(dec("2.0"), dec("2.00"));
    assert!(!dec("2.0").same_representation(&dec("2.00")));
    assert!(dec("1.99") < dec("2"));
    assert!(dec("-1E+2") < dec("-99.9"));
    let set: HashSet<_> = ["1", "1.0", "1.000", "10E-1", "0.1E+1"].into_iter().map(dec).collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn point_moves() {
    assert_eq!(dec("123").move_point_left(2).to_string(), "1.23");
    assert_eq!(dec("1.23").move_point_right(4).to_string(), "12300");
    assert_eq!(dec("1.23").scale_by_power_of_ten(3).to_string(), "1.23E+3");
    assert_eq!(dec("1.500").strip_trailing_zeros().to_string(), "1.5");
    assert_eq!(dec("100").strip_trailing_zeros().to_string(), "1E+2");
    assert_eq!(dec("0.000").strip_trailing_zeros().to_string(), "0");
    assert_eq!(dec("1.23").ulp().to_string(), "0.01");
}

// ============================================================================
// Rounding
// ============================================================================

#[test]
fn rounding_table() {
    use RoundingMode::{Ceiling, Down, Floor, HalfDown, HalfEven, HalfUp, Up};

    let modes = [Up, Down, Ceiling, Floor, HalfUp, HalfDown, HalfEven];
    let table: [(&str, [i64; 7]); 10] = [
        ("5.5", [6, 5, 6, 5, 6, 5, 6]),
        ("2.5", [3, 2, 3, 2, 3, 2, 2]),
        ("1.6", [2, 1, 2, 1, 2, 2, 2]),
        ("1.1", [2, 1, 2, 1, 1, 1, 1]),
        ("1.0", [1, 1, 1, 1, 1, 1, 1]),
        ("-1.0", [-1, -1, -1, -1, -1, -1, -1]),
        ("-1.1", [-2, -1, -1, -2, -1, -1, -1]),
        ("-1.6", [-2, -1, -1, -2, -2, -2, -2]),
        ("-2.5", [-3, -2, -2, -3, -3, -2, -2]),
        ("-5.5", [-6, -5, -5, -6, -6, -5, -6]),
    ];
    for (input, expected) in table {
        for (mode, want) in modes.into_iter().zip(expected) {
            let rounded = dec(input).set_scale(0, mode).unwrap();
            assert_eq!(rounded.long_value(), want, "{input} rounded {mode}");
        }
    }
}

#[test]
fn ties() {
    assert_eq!(dec("2.5").set_scale(0, RoundingMode::HalfUp).unwrap(), dec("3"));
    assert_eq!(dec("2.5").set_scale(0, RoundingMode::HalfEven).unwrap(), dec("2"));
    assert_eq!(dec("3.5").set_scale(0, RoundingMode::HalfEven).unwrap(), dec("4"));
    // digits past the first discarded one break the tie
    assert_eq!(dec("2.501").set_scale(0, RoundingMode::HalfDown).unwrap(), dec("3"));
    assert_eq!(dec("2.501").set_scale(0, RoundingMode::HalfEven).unwrap(), dec("3"));
}

#[test]
fn unnecessary_rounding_fails_only_when_digits_are_lost() {
    assert_eq!(
        dec("1.23").set_scale(1, RoundingMode::Unnecessary),
        Err(ArithError::RoundingRequired)
    );
    assert_eq!(
        dec("1.1").set_scale(0, RoundingMode::Unnecessary),
        Err(ArithError::RoundingRequired)
    );
    assert_eq!(
        dec("1.10").set_scale(1, RoundingMode::Unnecessary).unwrap().to_string(),
        "1.1"
    );
    let exact = MathContext::new(3, RoundingMode::Unnecessary);
    assert_eq!(dec("1.2300").round(&exact).unwrap().to_string(), "1.23");
    assert_eq!(dec("1.2345").round(&exact), Err(ArithError::RoundingRequired));
}

#[test]
fn context_rounding_keeps_precision_digits() {
    let four = MathContext::new(4, RoundingMode::HalfUp);
    assert_eq!(dec("123.456").round(&four).unwrap().to_string(), "123.5");
    assert_eq!(dec("9999.5").round(&four).unwrap().to_string(), "1.000E+4");
    let two = MathContext::new(2, RoundingMode::HalfUp);
    assert_eq!(dec("123.456").round(&two).unwrap().to_string(), "1.2E+2");
    assert_eq!(dec("0.0012345").round(&two).unwrap().to_string(), "0.0012");
    assert_eq!(dec("123.456").round(&MathContext::UNLIMITED).unwrap().to_string(), "123.456");
}

// ============================================================================
// Division
// ============================================================================

#[test]
fn exact_quotients_use_the_preferred_scale() {
    assert_eq!(dec("1").divide(&dec("8")).unwrap().to_string(), "0.125");
    assert_eq!(dec("10").divide(&dec("4")).unwrap().to_string(), "2.5");
    assert_eq!(dec("6.0").divide(&dec("2")).unwrap().to_string(), "3.0");
    assert_eq!(dec("6").divide(&dec("2.0")).unwrap().to_string(), "3");
    assert_eq!(dec("0").divide(&dec("5.00")).unwrap().scale(), -2);
}

#[test]
fn non_terminating_quotients_need_a_context() {
    assert!(matches!(
        dec("1").divide(&dec("3")),
        Err(ArithError::NonTerminatingDecimal { .. })
    ));
    assert_eq!(
        dec("1.00")
            .divide_with_context(&dec("3"), &MathContext::DECIMAL32)
            .unwrap()
            .to_string(),
        "0.3333333"
    );
    assert_eq!(
        dec("-2")
            .divide_with_context(&dec("3"), &MathContext::new(5, RoundingMode::Floor))
            .unwrap()
            .to_string(),
        "-0.66667"
    );
}

#[test]
fn division_by_zero_is_an_error() {
    assert_eq!(dec("1").divide(&dec("0.00")), Err(ArithError::DivisionByZero));
    assert_eq!(
        dec("1").divide_to_scale(&dec("0"), 2, RoundingMode::HalfUp),
        Err(ArithError::DivisionByZero)
    );
    assert_eq!(dec("1").remainder(&dec("0")), Err(ArithError::DivisionByZero));
}

#[test]
fn integral_division_and_remainder() {
    let (quotient, remainder) = dec("7.5").divide_and_remainder(&dec("2")).unwrap();
    assert_eq!(quotient.to_string(), "3.0");
    assert_eq!(remainder.to_string(), "1.5");
    assert_eq!(dec("-7.5").remainder(&dec("2")).unwrap().to_string(), "-1.5");
    assert_eq!(
        dec("1E+5")
            .divide_to_integral_value_with_context(&dec("3"), &MathContext::with_precision(2)),
        Err(ArithError::PrecisionOverflow {
            precision: 2,
            needed: 5
        })
    );
}

#[test]
fn integral_quotient_and_remainder_recompose() {
    let mut rng = ChaCha8Rng::seed_from_u64(22);
    for _ in 0..200 {
        let a = BigDecimal::new(BigInteger::from(rng.gen_range(-1_000_000i64..1_000_000)), rng.gen_range(-3..6));
        let b = BigDecimal::new(BigInteger::from(rng.gen_range(1..5_000i64)), rng.gen_range(-3..6));
        let b = if rng.gen_bool(0.5) { -b } else { b };
        let (quotient, remainder) = a.divide_and_remainder(&b).unwrap();
        assert_eq!(&(&quotient * &b) + &remainder, a);
        assert!(remainder.abs() < b.abs());
        assert!(remainder.is_zero() || remainder.is_negative() == a.is_negative());
    }
}

#[test]
fn divide_to_scale_rounds_once() {
    let value = dec("2").divide_to_scale(&dec("3"), 4, RoundingMode::HalfUp).unwrap();
    assert_eq!(value.to_string(), "0.6667");
    let value = dec("2").divide_to_scale(&dec("3"), 4, RoundingMode::Down).unwrap();
    assert_eq!(value.to_string(), "0.6666");
    let value = dec("1.25").divide_with_mode(&dec("2"), RoundingMode::HalfEven).unwrap();
    assert_eq!(value.to_string(), "0.62");
}

#[test]
fn newton_and_long_division_agree() {
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let context = MathContext::new(150, RoundingMode::HalfEven);
    let mut newton = Session::seeded(0).with_context(context);
    let mut long = Session::seeded(0)
        .with_context(context)
        .with_limits(Limits::default().with_long_division_max_precision(200));
    for _ in 0..40 {
        let a = BigDecimal::new(BigInteger::random_bits(rng.gen_range(1..400), &mut rng), rng.gen_range(-20..20));
        let b = BigDecimal::new(
            BigInteger::random_bits(rng.gen_range(1..300), &mut rng).add(&BigInteger::one()),
            rng.gen_range(-20..20),
        );
        let expected = long.divide(&a, &b).unwrap();
        assert!(newton.divide(&a, &b).unwrap().same_representation(&expected));
    }
}

#[test]
fn rounded_quotient_times_divisor_is_close() {
    let context = MathContext::new(30, RoundingMode::HalfEven);
    let a = dec("22");
    let b = dec("7");
    let quotient = a.divide_with_context(&b, &context).unwrap();
    assert_eq!(quotient.to_string(), "3.14285714285714285714285714286");
    let back = &quotient * &b;
    assert!(back.approx_eq(&a, &dec("1E-28")));
}

// ============================================================================
// Square roots and constants
// ============================================================================

#[test]
fn square_roots() {
    let context = MathContext::new(20, RoundingMode::HalfEven);
    assert_eq!(dec("2").sqrt(&context).unwrap().to_string(), "1.4142135623730950488");
    assert_eq!(dec("0.0144").sqrt(&context).unwrap().to_string(), "0.12");
    assert_eq!(dec("-2").sqrt(&context), Err(ArithError::NegativeSquareRoot));
}

#[test]
fn constants_match_known_digits() {
    let context = MathContext::new(30, RoundingMode::HalfEven);
    assert_eq!(BigDecimal::pi(&context).unwrap().to_string(), "3.14159265358979323846264338328");
    assert_eq!(BigDecimal::e(&context).unwrap().to_string(), "2.71828182845904523536028747135");
}
