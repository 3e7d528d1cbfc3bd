//! Parser for the decimal string syntax: an optional sign, digits with an
//! optional point, an optional exponent, or one of the special spellings
//! `Infinity`, `Inf`, `NaN` and `sNaN`, all case-insensitive.

use crate::coefficient;
use crate::ctx::Context;
use crate::dec::Decimal;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::Sign;
use crate::defs::Status;
use crate::defs::MAX_EMAX;
use crate::num::DecNumber;
use core::str::Chars;
use core::str::FromStr;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

// A literal exponent beyond this saturates; finalization turns the excess
// into overflow or underflow. Small enough that adding a digit count to it
// never wraps an Exponent.
const EXP_LIMIT: i128 = 4 * MAX_EMAX as i128;

pub(crate) struct ParserState<'a> {
    chars: Chars<'a>,
    cur_ch: Option<char>,
    s_len: usize,
    sign: Sign,
    digits: Vec<u8>,
    frac_len: usize,
    e: i128,
    inf: bool,
    nan: bool,
    signaling: bool,
}

impl<'a> ParserState<'a> {
    fn new(s: &'a str) -> Self {
        ParserState {
            chars: s.chars(),
            cur_ch: None,
            s_len: s.len(),
            sign: Sign::Pos,
            digits: Vec::new(),
            frac_len: 0,
            e: 0,
            inf: false,
            nan: false,
            signaling: false,
        }
    }

    // Returns the next character of the string in lower case,
    // or None if the string end is reached.
    fn next_char(&mut self) -> Option<char> {
        self.cur_ch = self.chars.next().map(|c| c.to_ascii_lowercase());
        self.cur_ch
    }

    fn cur_char(&self) -> Option<char> {
        self.cur_ch
    }

    pub fn is_inf(&self) -> bool {
        self.inf
    }

    pub fn is_nan(&self) -> bool {
        self.nan
    }

    pub fn is_signaling(&self) -> bool {
        self.signaling
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Coefficient digits in big-endian order (the NaN payload for a NaN)
    /// and the exponent of the least significant digit.
    pub fn raw_parts(&self) -> (&[u8], Exponent) {
        let e = self.e - self.frac_len as i128;
        (&self.digits, e.clamp(-EXP_LIMIT, EXP_LIMIT) as Exponent)
    }
}

/// Parses the decimal string syntax.
///
/// ## Errors
///
///  - InvalidArgument: the string is not a valid number.
///  - MemoryAllocation: failed to allocate memory for the digits.
pub(crate) fn parse(s: &str) -> Result<ParserState, Error> {
    let mut p = ParserState::new(s);
    let mut ch = p.next_char();

    // sign
    if let Some(c) = ch {
        match c {
            '+' => ch = p.next_char(),
            '-' => {
                p.sign = Sign::Neg;
                ch = p.next_char()
            }
            _ => {}
        };
    }

    match ch {
        Some('i') => parse_inf(&mut p)?,
        Some('n') => parse_nan(&mut p, false)?,
        Some('s') => {
            p.next_char();
            parse_nan(&mut p, true)?
        }
        Some('.' | '0'..='9') => parse_num(&mut p)?,
        _ => return Err(Error::InvalidArgument),
    }

    // the whole string must be consumed
    if p.cur_char().is_some() {
        return Err(Error::InvalidArgument);
    }

    Ok(p)
}

// "inf" or "infinity" past the leading 'i'.
fn parse_inf(p: &mut ParserState) -> Result<(), Error> {
    expect_word(p, "nf")?;
    p.inf = true;
    if p.cur_char() == Some('i') {
        expect_word(p, "nity")?;
    }
    Ok(())
}

// "nan" past the leading 'n' (the 's' of "snan" is consumed by the caller),
// followed by optional diagnostic digits.
fn parse_nan(p: &mut ParserState, signaling: bool) -> Result<(), Error> {
    if p.cur_char() != Some('n') {
        return Err(Error::InvalidArgument);
    }
    expect_word(p, "an")?;
    p.nan = true;
    p.signaling = signaling;

    if matches!(p.cur_char(), Some('0'..='9')) {
        parse_digits(p)?;
    }
    Ok(())
}

// Significant digits in a big-endian digit string.
fn payload_digits(digits: &[u8]) -> usize {
    let lead = digits.iter().take_while(|&&d| d == 0).count();
    digits.len() - lead
}

// The current character starts the word; the cursor ends one past it.
fn expect_word(p: &mut ParserState, rest: &str) -> Result<(), Error> {
    for w in rest.chars() {
        if p.next_char() != Some(w) {
            return Err(Error::InvalidArgument);
        }
    }
    p.next_char();
    Ok(())
}

fn parse_num(p: &mut ParserState) -> Result<(), Error> {
    let int_len = parse_digits(p)?;

    let mut frac_len = 0;
    if p.cur_char() == Some('.') {
        p.next_char();
        frac_len = parse_digits(p)?;
        p.frac_len = frac_len;
    }

    // a point alone is not a number
    if int_len == 0 && frac_len == 0 {
        return Err(Error::InvalidArgument);
    }

    if p.cur_char() == Some('e') {
        p.next_char();
        parse_exp(p)?;
    }

    Ok(())
}

fn parse_digits(p: &mut ParserState) -> Result<usize, Error> {
    let mut len = 0;
    let mut ch = p.cur_char();

    while let Some(c) = ch {
        if let Some(d) = c.to_digit(10) {
            if p.digits.is_empty() {
                p.digits.try_reserve_exact(p.s_len)?;
            }
            p.digits.push(d as u8);
            len += 1;
        } else {
            break;
        }
        ch = p.next_char();
    }

    Ok(len)
}

fn parse_exp(p: &mut ParserState) -> Result<(), Error> {
    let mut neg = false;
    let mut ch = p.cur_char();
    if let Some(c) = ch {
        match c {
            '+' => ch = p.next_char(),
            '-' => {
                neg = true;
                ch = p.next_char();
            }
            _ => {}
        };
    }

    let mut len = 0;
    while let Some(c) = ch {
        if let Some(d) = c.to_digit(10) {
            if p.e < EXP_LIMIT {
                p.e = p.e.saturating_mul(10).saturating_add(d as i128);
            }
            len += 1;
        } else {
            break;
        }
        ch = p.next_char();
    }

    if len == 0 {
        return Err(Error::InvalidArgument);
    }
    if neg {
        p.e = -p.e;
    }
    Ok(())
}

// Builds the exact value the parser state describes, with no rounding.
fn build(p: &ParserState) -> Result<Decimal, Error> {
    if p.is_inf() {
        return Ok(Decimal::inf(p.sign()));
    }

    let (digits, e) = p.raw_parts();

    if p.is_nan() {
        let payload = if digits.is_empty() {
            None
        } else {
            let m = coefficient::from_digits(digits)?;
            if coefficient::is_zero(&m) {
                None
            } else {
                Some(m)
            }
        };
        return Ok(Decimal::nan(p.sign(), p.is_signaling(), payload));
    }

    Ok(Decimal::from_num(DecNumber::from_digits_parts(p.sign(), digits, e)?))
}

impl Decimal {
    /// Converts a string to a decimal, rounding to the context.
    ///
    /// Malformed input yields a quiet NaN and raises Conversion_syntax; a
    /// NaN payload wider than the context precision allows is malformed as
    /// well. A well-formed finite number is rounded to `ctx` like any
    /// arithmetic result, so out-of-range values overflow or underflow with
    /// the usual flags.
    pub fn from_str_ctx(s: &str, ctx: &mut Context) -> Decimal {
        let p = match parse(s) {
            Ok(p) => p,
            Err(Error::InvalidArgument) => {
                ctx.raise(Status::CONVERSION_SYNTAX);
                return Decimal::NAN;
            }
            Err(e) => return Decimal::from_error(e, ctx),
        };

        if p.is_nan() {
            let (digits, _) = p.raw_parts();
            let limit = ctx.prec() - usize::from(ctx.clamp());
            if payload_digits(digits) > limit {
                ctx.raise(Status::CONVERSION_SYNTAX);
                return Decimal::NAN;
            }
        }

        match build(&p) {
            Ok(d) => match d.inner {
                crate::dec::Flavor::Finite(n) => Decimal::finalized(n, ctx),
                _ => d,
            },
            Err(e) => Decimal::from_error(e, ctx),
        }
    }
}

impl FromStr for Decimal {
    type Err = Error;

    /// Converts a string to a decimal exactly, with no context: every digit
    /// of a well-formed number is kept.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: the string is not a valid number.
    ///  - MemoryAllocation: failed to allocate memory for the coefficient.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let p = parse(s)?;
        build(&p)
    }
}
