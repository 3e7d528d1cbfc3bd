//! Decimal to string conversion: scientific and engineering notation as
//! defined by the decimal arithmetic specification, and a format
//! mini-language for width, fill, grouping and sign control.

use crate::coefficient;
use crate::dec::Decimal;
use crate::dec::Flavor;
use crate::dec::NanData;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::num::DecNumber;
use crate::round;
use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Write;

#[cfg(not(feature = "std"))]
use alloc::string::String;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// A malformed format specification. This is a caller error channel,
/// separate from the arithmetic status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The format specification does not follow the mini-language.
    InvalidSpec,

    /// Memory allocation failed while building the output.
    Memory,
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let repr = match self {
            FormatError::InvalidSpec => "invalid format specification",
            FormatError::Memory => "memory allocation failure",
        };
        f.write_str(repr)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FormatError {}

impl From<Error> for FormatError {
    fn from(_: Error) -> Self {
        FormatError::Memory
    }
}

impl Decimal {
    /// Converts to a string in scientific notation.
    ///
    /// Exponential notation is used when the exponent is positive or the
    /// adjusted exponent is below -6; otherwise the number is written out
    /// plainly. The conversion preserves the representation: coefficient
    /// digits and exponent can be read back exactly.
    pub fn to_sci_string(&self) -> String {
        self.stringify(false, 'E').unwrap_or_default()
    }

    /// Converts to a string in engineering notation: when an exponent is
    /// shown it is a multiple of three, with one to three digits before
    /// the decimal point.
    pub fn to_eng_string(&self) -> String {
        self.stringify(true, 'E').unwrap_or_default()
    }

    fn stringify(&self, eng: bool, e_char: char) -> Result<String, Error> {
        match &self.inner {
            Flavor::Finite(n) => {
                let mut out = String::new();
                if n.sign.is_negative() {
                    out.push('-');
                }
                let ds = coefficient::to_digits(&n.data)?;
                let (int, frac, exp) = finite_parts(&ds, n.exp, eng, e_char, n.is_zero())?;
                out.push_str(&int);
                if !frac.is_empty() {
                    out.push('.');
                    out.push_str(&frac);
                }
                out.push_str(&exp);
                Ok(out)
            }
            Flavor::Inf(s) => {
                Ok(String::from(if s.is_negative() { "-Infinity" } else { "Infinity" }))
            }
            Flavor::Nan(n) => nan_str(n),
        }
    }
}

fn nan_str(n: &NanData) -> Result<String, Error> {
    let mut out = String::new();
    if n.sign.is_negative() {
        out.push('-');
    }
    out.push_str(if n.signaling { "sNaN" } else { "NaN" });
    if let Some(p) = &n.payload {
        for d in coefficient::to_digits(p)? {
            out.push((b'0' + d) as char);
        }
    }
    Ok(out)
}

// Splits a finite number into integer digits, fraction digits and an
// exponent suffix, following the sci or eng rules.
fn finite_parts(
    ds: &[u8],
    exp: Exponent,
    eng: bool,
    e_char: char,
    zero: bool,
) -> Result<(String, String, String), Error> {
    let len = ds.len() as Exponent;
    let adj = exp + len - 1;

    if exp <= 0 && adj >= -6 {
        return Ok(plain_parts(ds, exp));
    }

    if eng {
        if zero {
            // only the exponent needs adjusting; each increment toward a
            // multiple of three adds a zero after the point
            let e = (exp + 2).div_euclid(3) * 3;
            let fz = (e - exp) as usize;
            let mut frac = String::new();
            for _ in 0..fz {
                frac.push('0');
            }
            return Ok((String::from("0"), frac, exp_suffix(e_char, e)));
        }

        let e = adj.div_euclid(3) * 3;
        let int_len = (adj - e + 1) as usize;
        let mut int = String::new();
        let mut frac = String::new();
        for i in 0..int_len.max(ds.len()) {
            let c = if i < ds.len() { (b'0' + ds[i]) as char } else { '0' };
            if i < int_len {
                int.push(c);
            } else {
                frac.push(c);
            }
        }
        let exp = if e == 0 { String::new() } else { exp_suffix(e_char, e) };
        return Ok((int, frac, exp));
    }

    let mut int = String::new();
    int.push((b'0' + ds[0]) as char);
    let mut frac = String::new();
    for &d in &ds[1..] {
        frac.push((b'0' + d) as char);
    }
    Ok((int, frac, exp_suffix(e_char, adj)))
}

fn plain_parts(ds: &[u8], exp: Exponent) -> (String, String, String) {
    let mut int = String::new();
    let mut frac = String::new();

    if exp >= 0 {
        for &d in ds {
            int.push((b'0' + d) as char);
        }
        for _ in 0..exp {
            int.push('0');
        }
    } else {
        let point = ds.len() as Exponent + exp;
        if point > 0 {
            for (i, &d) in ds.iter().enumerate() {
                if (i as Exponent) < point {
                    int.push((b'0' + d) as char);
                } else {
                    frac.push((b'0' + d) as char);
                }
            }
        } else {
            int.push('0');
            for _ in 0..-point {
                frac.push('0');
            }
            for &d in ds {
                frac.push((b'0' + d) as char);
            }
        }
    }

    (int, frac, String::new())
}

fn exp_suffix(e_char: char, e: Exponent) -> String {
    let mut s = String::new();
    let _ = write!(s, "{}{}{}", e_char, if e < 0 { '-' } else { '+' }, e.unsigned_abs());
    s
}

impl Display for Decimal {
    /// Scientific notation.
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_sci_string())
    }
}

// A parsed format specification:
// [[fill]align][sign][#][0][width][,][.precision][type]
struct FormatSpec {
    fill: char,
    align: Option<char>,
    sign: char,
    alt: bool,
    width: usize,
    grouping: bool,
    precision: Option<usize>,
    ty: Option<char>,
}

impl FormatSpec {
    fn parse(spec: &str) -> Result<Self, FormatError> {
        let chars: Vec<char> = spec.chars().collect();
        let mut fs = FormatSpec {
            fill: ' ',
            align: None,
            sign: '-',
            alt: false,
            width: 0,
            grouping: false,
            precision: None,
            ty: None,
        };
        let mut i = 0;

        if chars.len() >= 2 && matches!(chars[1], '<' | '>' | '=' | '^') {
            fs.fill = chars[0];
            fs.align = Some(chars[1]);
            i = 2;
        } else if !chars.is_empty() && matches!(chars[0], '<' | '>' | '=' | '^') {
            fs.align = Some(chars[0]);
            i = 1;
        }

        if i < chars.len() && matches!(chars[i], '+' | '-' | ' ') {
            fs.sign = chars[i];
            i += 1;
        }

        if i < chars.len() && chars[i] == '#' {
            fs.alt = true;
            i += 1;
        }

        if i < chars.len() && chars[i] == '0' {
            if fs.align.is_none() {
                fs.fill = '0';
                fs.align = Some('=');
            }
            i += 1;
        }

        while i < chars.len() && chars[i].is_ascii_digit() {
            let d = chars[i] as usize - '0' as usize;
            fs.width = fs.width.checked_mul(10).and_then(|w| w.checked_add(d)).ok_or(FormatError::InvalidSpec)?;
            i += 1;
        }

        if i < chars.len() && chars[i] == ',' {
            fs.grouping = true;
            i += 1;
        }

        if i < chars.len() && chars[i] == '.' {
            i += 1;
            let mut prec = 0usize;
            let mut any = false;
            while i < chars.len() && chars[i].is_ascii_digit() {
                let d = chars[i] as usize - '0' as usize;
                prec = prec.checked_mul(10).and_then(|p| p.checked_add(d)).ok_or(FormatError::InvalidSpec)?;
                any = true;
                i += 1;
            }
            if !any {
                return Err(FormatError::InvalidSpec);
            }
            fs.precision = Some(prec);
        }

        if i < chars.len() {
            if matches!(chars[i], 'e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%') {
                fs.ty = Some(chars[i]);
                i += 1;
            }
            if i < chars.len() {
                return Err(FormatError::InvalidSpec);
            }
        }

        Ok(fs)
    }
}

impl Decimal {
    /// Formats the value with a specification of the form
    /// `[[fill]align][sign][#][0][width][,][.precision][type]`, where the
    /// type is one of `e E f F g G %`. Rounding applied for an explicit
    /// precision is half-even.
    ///
    /// ## Errors
    ///
    ///  - InvalidSpec: the specification is malformed.
    ///  - Memory: allocation failed while building the output.
    pub fn format(&self, spec: &str) -> Result<String, FormatError> {
        let fs = FormatSpec::parse(spec)?;

        match &self.inner {
            Flavor::Finite(n) => format_finite(n, &fs),
            _ => {
                // special values ignore precision, grouping and zero fill
                let body = self.stringify(false, 'E')?;
                let (sign, body) = match body.strip_prefix('-') {
                    Some(b) => (String::from("-"), String::from(b)),
                    None => (sign_str(&fs), body),
                };
                Ok(pad(sign, body, fs.fill, fs.align.unwrap_or('>'), fs.width))
            }
        }
    }
}

fn sign_str(fs: &FormatSpec) -> String {
    match fs.sign {
        '+' => String::from("+"),
        ' ' => String::from(" "),
        _ => String::new(),
    }
}

fn format_finite(n: &DecNumber, fs: &FormatSpec) -> Result<String, FormatError> {
    let mut n = n.try_clone()?;
    let ty = fs.ty.unwrap_or('g');

    if ty == '%' {
        n.exp += 2;
    }

    // apply the requested precision
    if let Some(prec) = fs.precision {
        match ty {
            'e' | 'E' => round_significant(&mut n, prec + 1)?,
            'f' | 'F' | '%' => rescale_to(&mut n, -(prec as Exponent))?,
            _ => round_significant(&mut n, prec.max(1))?,
        }
    }

    let ds = coefficient::to_digits(&n.data)?;
    let (int, frac, exp) = match ty {
        'e' | 'E' => {
            let adj = n.exp + ds.len() as Exponent - 1;
            let mut int = String::new();
            int.push((b'0' + ds[0]) as char);
            let mut frac = String::new();
            for &d in &ds[1..] {
                frac.push((b'0' + d) as char);
            }
            if let Some(prec) = fs.precision {
                while frac.len() < prec {
                    frac.push('0');
                }
            }
            (int, frac, exp_suffix(ty, adj))
        }
        'f' | 'F' | '%' => plain_parts(&ds, n.exp),
        'g' => finite_parts(&ds, n.exp, false, 'e', n.is_zero())?,
        _ => finite_parts(&ds, n.exp, false, 'E', n.is_zero())?,
    };

    let sign = if n.sign.is_negative() { String::from("-") } else { sign_str(fs) };
    let suffix = if ty == '%' { "%" } else { "" };

    Ok(assemble(sign, int, frac, exp, suffix, fs))
}

// Rounds to at most `sig` significant digits, half-even.
fn round_significant(n: &mut DecNumber, sig: usize) -> Result<(), Error> {
    if n.digits > sig {
        round::apply_round(n, n.digits - sig, RoundingMode::HalfEven, sig)?;
    }
    Ok(())
}

// Brings the exponent to exactly `e`, rounding or zero-padding.
fn rescale_to(n: &mut DecNumber, e: Exponent) -> Result<(), Error> {
    if n.exp < e {
        round::apply_round(n, (e - n.exp) as usize, RoundingMode::HalfEven, usize::MAX)?;
        n.exp = e;
    } else if n.exp > e {
        n.pad_to_exp(e)?;
    }
    Ok(())
}

fn group(int: &str) -> String {
    let mut out = String::new();
    let len = int.len();
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn assemble(
    sign: String,
    mut int: String,
    frac: String,
    exp: String,
    suffix: &str,
    fs: &FormatSpec,
) -> String {
    let align = fs.align.unwrap_or('>');
    let tail_len = |frac: &str| {
        (if frac.is_empty() && !fs.alt { 0 } else { 1 + frac.len() }) + exp.len() + suffix.len()
    };

    // zero padding grows the integer part itself so that grouping stays valid
    if align == '=' && fs.fill == '0' {
        let tail = tail_len(&frac);
        loop {
            let body = if fs.grouping { group(&int) } else { int.clone() };
            if sign.len() + body.len() + tail >= fs.width {
                break;
            }
            int.insert(0, '0');
        }
    }

    let mut body = if fs.grouping { group(&int) } else { int };
    if !frac.is_empty() || fs.alt {
        body.push('.');
        body.push_str(&frac);
    }
    body.push_str(&exp);
    body.push_str(suffix);

    pad(sign, body, fs.fill, align, fs.width)
}

fn pad(sign: String, body: String, fill: char, align: char, width: usize) -> String {
    let len = sign.chars().count() + body.chars().count();
    let need = width.saturating_sub(len);

    let mut out = String::new();
    match align {
        '<' => {
            out.push_str(&sign);
            out.push_str(&body);
            for _ in 0..need {
                out.push(fill);
            }
        }
        '^' => {
            for _ in 0..need / 2 {
                out.push(fill);
            }
            out.push_str(&sign);
            out.push_str(&body);
            for _ in 0..need - need / 2 {
                out.push(fill);
            }
        }
        '=' => {
            out.push_str(&sign);
            for _ in 0..need {
                out.push(fill);
            }
            out.push_str(&body);
        }
        _ => {
            for _ in 0..need {
                out.push(fill);
            }
            out.push_str(&sign);
            out.push_str(&body);
        }
    }
    out
}
