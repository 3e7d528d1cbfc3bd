//! End to end tests of the public interface: string conversion round
//! trips, context rounding, status accumulation, and the trap boundary.

use core::str::FromStr;

use decnum::{Context, Decimal, RoundingMode, Sign, Status, Triple, TripleTag};
use rand::random;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn quiet(prec: usize) -> Context {
    let mut ctx = Context::new();
    ctx.set_prec(prec).unwrap();
    ctx
}

#[test]
fn parse_format_round_trip() {
    let cases = [
        "0",
        "-0",
        "0E+3",
        "0.00",
        "1",
        "-1",
        "12345",
        "12345.6789",
        "0.001",
        "1E-7",
        "1.000000000000000000000000000001",
        "1.23E+15",
        "-4.5E-20",
        "9999999999999999999999999999999999999999",
        "7.50E+1000",
        "-8E-999999999999999999",
        "Infinity",
        "-Infinity",
        "NaN",
        "-NaN",
        "NaN123",
        "sNaN",
        "-sNaN987",
    ];

    let mut ctx = Context::new();
    for s in cases {
        let v = d(s);
        let back = d(&v.to_sci_string());
        assert_eq!(back.to_sci_string(), v.to_sci_string(), "{}", s);
        assert_eq!(back.as_triple(), v.as_triple(), "{}", s);

        // engineering notation may repad the coefficient but denotes the
        // same value and sign
        let eng = d(&v.to_eng_string());
        if v.is_nan() {
            assert!(eng.is_nan(), "{}", s);
            assert_eq!(eng.is_signaling_nan(), v.is_signaling_nan(), "{}", s);
        } else {
            assert!(eng.compare(&v, &mut ctx).is_zero(), "{}", s);
            assert_eq!(eng.sign(), v.sign(), "{}", s);
        }
    }
    assert!(ctx.status().is_empty());
}

#[test]
fn random_string_round_trip() {
    let mut ctx = Context::new();

    for _ in 0..1000 {
        let sign = if random::<bool>() { Sign::Neg } else { Sign::Pos };
        let hi = if random::<bool>() { random::<u64>() } else { 0 };
        let t = Triple {
            tag: TripleTag::Normal,
            sign,
            hi,
            lo: random::<u64>(),
            exp: random::<i64>() % 6000,
        };

        let v = Decimal::from_triple(&t, &mut ctx);
        assert!(ctx.status().is_empty(), "{:?}", t);

        // the scientific form carries the exact coefficient and exponent
        let back = d(&v.to_sci_string());
        assert_eq!(back.as_triple(), t, "{}", v.to_sci_string());
    }
}

#[test]
fn rounding_modes_from_str() {
    let cases = [
        (RoundingMode::Down, "2", "-2"),
        (RoundingMode::Up, "3", "-3"),
        (RoundingMode::Ceiling, "3", "-2"),
        (RoundingMode::Floor, "2", "-3"),
        (RoundingMode::HalfUp, "3", "-3"),
        (RoundingMode::HalfDown, "2", "-2"),
        (RoundingMode::HalfEven, "2", "-2"),
        (RoundingMode::ZeroFiveUp, "2", "-2"),
    ];

    for (rm, pos, neg) in cases {
        let mut ctx = quiet(1);
        ctx.set_round(rm);

        let v = Decimal::from_str_ctx("2.5", &mut ctx);
        assert_eq!(v.to_sci_string(), pos, "{:?}", rm);
        let v = Decimal::from_str_ctx("-2.5", &mut ctx);
        assert_eq!(v.to_sci_string(), neg, "{:?}", rm);
        assert_eq!(ctx.status(), Status::ROUNDED | Status::INEXACT, "{:?}", rm);
    }
}

#[test]
fn nine_digit_session() {
    let mut ctx = Context::basic();
    ctx.set_traps(Status::EMPTY);

    let a = Decimal::from_str_ctx("1.23", &mut ctx);
    let b = Decimal::from_str_ctx("2.345", &mut ctx);
    assert_eq!(a.add(&b, &mut ctx).to_sci_string(), "3.575");
    assert!(ctx.status().is_empty());

    let q = Decimal::one().div(&Decimal::from(3u32), &mut ctx);
    assert_eq!(q.to_sci_string(), "0.333333333");
    assert_eq!(ctx.status(), Status::INEXACT | Status::ROUNDED);
    ctx.clear_status();

    // quiet comparison with a NaN is unordered without a flag
    let c = a.compare(&Decimal::NAN, &mut ctx);
    assert!(c.is_nan());
    assert!(ctx.status().is_empty());

    // the signaling variant raises Invalid_operation
    let c = a.compare_signal(&Decimal::NAN, &mut ctx);
    assert!(c.is_nan());
    assert_eq!(ctx.status(), Status::INVALID_OPERATION);
    ctx.clear_status();

    let q = d("2.17").quantize(&d("0.001"), &mut ctx);
    assert_eq!(q.to_sci_string(), "2.170");
    assert!(ctx.status().is_empty());

    let p = Decimal::from(2u32).pow(&Decimal::from(10u32), &mut ctx);
    assert_eq!(p.to_sci_string(), "1024");
    assert!(ctx.status().is_empty());
}

#[test]
fn random_arithmetic_identities() {
    // 20 digit operands: sums and 40 digit products stay exact
    let mut ctx = quiet(45);
    let zero = Decimal::zero();

    for _ in 0..500 {
        let a = Decimal::from(random::<u64>());
        let b = Decimal::from(random::<u64>() | 1);

        let s = a.add(&b, &mut ctx).sub(&b, &mut ctx);
        assert!(s.compare(&a, &mut ctx).is_zero());

        let p = a.mul(&b, &mut ctx);
        assert!(p.div(&b, &mut ctx).compare(&a, &mut ctx).is_zero());
        assert!(a.fma(&b, &zero, &mut ctx).compare(&p, &mut ctx).is_zero());

        assert!(a.sub(&a, &mut ctx).is_zero());
        assert!(ctx.status().is_empty());
    }
}

#[test]
fn operands_can_alias() {
    let mut ctx = quiet(9);

    let mut x = d("7.25");
    x = x.div(&x, &mut ctx);
    assert_eq!(x.to_sci_string(), "1");

    let mut y = d("1.5");
    y = y.add(&y, &mut ctx);
    assert_eq!(y.to_sci_string(), "3.0");

    let mut z = d("4");
    z = z.fma(&z, &z, &mut ctx);
    assert_eq!(z.to_sci_string(), "20");
    assert!(ctx.status().is_empty());
}

#[test]
fn special_value_propagation() {
    let mut ctx = quiet(9);
    let one = Decimal::one();
    let inf = d("Infinity");

    // a quiet NaN flows through with its payload, no flag
    let r = d("NaN123").add(&one, &mut ctx);
    assert_eq!(r.to_sci_string(), "NaN123");
    assert!(ctx.status().is_empty());

    // a signaling NaN quiets and raises Invalid_operation
    let r = d("sNaN5").mul(&one, &mut ctx);
    assert_eq!(r.to_sci_string(), "NaN5");
    assert_eq!(ctx.status(), Status::INVALID_OPERATION);
    ctx.clear_status();

    assert_eq!(one.add(&inf, &mut ctx).to_sci_string(), "Infinity");
    assert!(ctx.status().is_empty());

    let r = inf.sub(&inf, &mut ctx);
    assert!(r.is_nan());
    assert_eq!(ctx.status(), Status::INVALID_OPERATION);
    ctx.clear_status();

    let r = one.div(&Decimal::zero(), &mut ctx);
    assert_eq!(r.to_sci_string(), "Infinity");
    assert_eq!(ctx.status(), Status::DIVISION_BY_ZERO);
    ctx.clear_status();

    let r = Decimal::zero().div(&Decimal::zero(), &mut ctx);
    assert!(r.is_nan());
    assert_eq!(ctx.status(), Status::DIVISION_UNDEFINED);
}

#[test]
fn trap_boundary() {
    let mut ctx = quiet(9);
    ctx.set_traps(Status::DIVISION_BY_ZERO | Status::NAN_PRODUCING);

    let ok = ctx.checked(|ctx| Decimal::one().div(&d("3"), ctx));
    assert_eq!(ok.unwrap().to_sci_string(), "0.333333333");

    let err = ctx.checked(|ctx| Decimal::one().div(&Decimal::zero(), ctx));
    let err = err.unwrap_err();
    assert_eq!(err.status(), Status::DIVISION_BY_ZERO);
    assert!(err.into_result().is_infinite());

    // flags outside the trap set pass through
    let ok = ctx.checked(|ctx| Decimal::one().div(&d("7"), ctx));
    assert!(ok.is_ok());
    assert!(ctx.status().contains(Status::INEXACT));
}

#[test]
fn overflow_and_underflow_from_str() {
    let mut ctx = quiet(9);
    ctx.set_emax(999).unwrap();
    ctx.set_emin(-999).unwrap();

    let v = Decimal::from_str_ctx("1E+1000", &mut ctx);
    assert_eq!(v.to_sci_string(), "Infinity");
    assert!(ctx.status().contains(Status::OVERFLOW | Status::INEXACT));
    ctx.clear_status();

    let v = Decimal::from_str_ctx("1E-1200", &mut ctx);
    assert!(v.is_zero());
    assert!(ctx.status().contains(Status::UNDERFLOW | Status::CLAMPED));
}
