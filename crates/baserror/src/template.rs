//! printf-style message templates.
//!
//! Error messages may be stored as templates (`"user %s not found"`) and
//! filled in later with positional [`Arg`]s, so the template has to be
//! interpreted at runtime. Supported directives:
//!
//! | Verb | Accepts | Output |
//! |------|---------|--------|
//! | `%v` | anything | default form |
//! | `%s` | string, char | the text |
//! | `%q` | string, char | escaped, quoted |
//! | `%d` | integers, char | decimal |
//! | `%x` `%X` | integers, string | hex |
//! | `%o` `%b` | integers | octal / binary |
//! | `%c` | char, integers | the character |
//! | `%t` | bool | `true` / `false` |
//! | `%f` `%e` `%g` | float | fixed / exponent / shortest |
//! | `%%` | - | literal `%` |
//!
//! Flags `-` (left align), `+` (always sign), `0` (zero pad), a width and a
//! `.precision` may precede the verb.
//!
//! Formatting never fails. Problems are reported inline, and a width or
//! precision above 1,000,000 becomes `%!(BADWIDTH)` / `%!(BADPREC)`:
//!
//! ```rust
//! use baserror::{args, format_template};
//!
//! assert_eq!(format_template("%d-%s", &args![7, "x"]), "7-x");
//! assert_eq!(format_template("%d %d", &args![1]), "1 %!d(MISSING)");
//! assert_eq!(format_template("%d", &args!["x"]), "%!d(string=x)");
//! assert_eq!(format_template("hi", &args![1]), "hi%!(EXTRA int=1)");
//! ```

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// A positional template argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(String),
}

impl Arg {
    /// Capture any `Display` value as a string argument.
    pub fn display(value: impl fmt::Display) -> Self {
        Arg::Str(value.to_string())
    }

    /// Type name used in inline diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Int(_) => "int",
            Arg::Uint(_) => "uint",
            Arg::Float(_) => "float64",
            Arg::Bool(_) => "bool",
            Arg::Char(_) => "char",
            Arg::Str(_) => "string",
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Arg::Int(_) | Arg::Uint(_) | Arg::Float(_))
    }
}

/// The `%v` form.
impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(v) => write!(f, "{v}"),
            Arg::Uint(v) => write!(f, "{v}"),
            Arg::Float(v) => write!(f, "{v}"),
            Arg::Bool(v) => write!(f, "{v}"),
            Arg::Char(v) => write!(f, "{v}"),
            Arg::Str(v) => f.write_str(v),
        }
    }
}

macro_rules! impl_from_arg {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Arg {
                #[inline]
                fn from(v: $source) -> Self {
                    Arg::$variant(v as $target)
                }
            }
        )+
    };
}

impl_from_arg!(Int as i64: i8, i16, i32, i64, isize);
impl_from_arg!(Uint as u64: u8, u16, u32, u64, usize);
impl_from_arg!(Float as f64: f32, f64);

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<char> for Arg {
    fn from(v: char) -> Self {
        Arg::Char(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Str(v.to_owned())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Str(v)
    }
}

impl From<&String> for Arg {
    fn from(v: &String) -> Self {
        Arg::Str(v.clone())
    }
}

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```rust
/// use baserror::{args, Arg};
///
/// let list = args![7, "x", true];
/// assert_eq!(list, vec![Arg::Int(7), Arg::Str("x".into()), Arg::Bool(true)]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}

/// Largest width or precision honoured; anything above renders
/// `%!(BADWIDTH)` / `%!(BADPREC)` and is dropped.
const MAX_PADDING: usize = 1_000_000;

#[derive(Debug, Default)]
struct Spec {
    left: bool,
    plus: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

fn take_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit as usize),
        );
    }
    value
}

/// Format `template` against `args`.
pub fn format_template(template: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '+' => spec.plus = true,
                '0' => spec.zero = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = take_number(&mut chars);
        if spec.width.is_some_and(|w| w > MAX_PADDING) {
            out.push_str("%!(BADWIDTH)");
            spec.width = None;
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(take_number(&mut chars).unwrap_or(0));
            if spec.precision.is_some_and(|p| p > MAX_PADDING) {
                out.push_str("%!(BADPREC)");
                spec.precision = None;
            }
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next) {
            Some(arg) => {
                next += 1;
                match convert(verb, &spec, arg) {
                    Some(text) => out.push_str(&pad(text, &spec, arg)),
                    None => out.push_str(&format!("%!{verb}({}={arg})", arg.type_name())),
                }
            }
            None => out.push_str(&format!("%!{verb}(MISSING)")),
        }
    }

    if let Some(extra) = args.get(next..).filter(|rest| !rest.is_empty()) {
        let listed: Vec<String> = extra
            .iter()
            .map(|arg| format!("{}={arg}", arg.type_name()))
            .collect();
        out.push_str(&format!("%!(EXTRA {})", listed.join(", ")));
    }

    out
}

fn convert(verb: char, spec: &Spec, arg: &Arg) -> Option<String> {
    let text = match (verb, arg) {
        ('v' | 's', Arg::Str(s)) => truncate(s, spec.precision),
        ('v' | 'g', Arg::Float(v)) => match spec.precision {
            Some(p) => format!("{v:.p$}"),
            None => format!("{v}"),
        },
        ('v', _) => arg.to_string(),
        ('s', Arg::Char(c)) | ('c', Arg::Char(c)) => c.to_string(),
        ('q', Arg::Str(s)) => format!("{s:?}"),
        ('q', Arg::Char(c)) => format!("{c:?}"),
        ('d', Arg::Int(v)) => v.to_string(),
        ('d', Arg::Uint(v)) => v.to_string(),
        ('d', Arg::Char(c)) => u32::from(*c).to_string(),
        ('x', Arg::Int(v)) => signed_radix(*v, |u| format!("{u:x}")),
        ('X', Arg::Int(v)) => signed_radix(*v, |u| format!("{u:X}")),
        ('o', Arg::Int(v)) => signed_radix(*v, |u| format!("{u:o}")),
        ('b', Arg::Int(v)) => signed_radix(*v, |u| format!("{u:b}")),
        ('x', Arg::Uint(v)) => format!("{v:x}"),
        ('X', Arg::Uint(v)) => format!("{v:X}"),
        ('o', Arg::Uint(v)) => format!("{v:o}"),
        ('b', Arg::Uint(v)) => format!("{v:b}"),
        ('x', Arg::Str(s)) => s.bytes().map(|b| format!("{b:02x}")).collect(),
        ('X', Arg::Str(s)) => s.bytes().map(|b| format!("{b:02X}")).collect(),
        ('c', Arg::Int(v)) => code_point(u64::try_from(*v).unwrap_or(u64::MAX)),
        ('c', Arg::Uint(v)) => code_point(*v),
        ('t', Arg::Bool(b)) => b.to_string(),
        ('f' | 'F', Arg::Float(v)) => format!("{v:.p$}", p = spec.precision.unwrap_or(6)),
        ('e', Arg::Float(v)) => exponent(*v, spec.precision.unwrap_or(6)),
        ('E', Arg::Float(v)) => exponent(*v, spec.precision.unwrap_or(6)).to_uppercase(),
        _ => return None,
    };

    let signed_verb = matches!(verb, 'v' | 'd' | 'f' | 'F' | 'e' | 'E' | 'g');
    if spec.plus && signed_verb && arg.is_numeric() && !text.starts_with('-') {
        Some(format!("+{text}"))
    } else {
        Some(text)
    }
}

fn truncate(s: &str, precision: Option<usize>) -> String {
    match precision {
        Some(p) => s.chars().take(p).collect(),
        None => s.to_owned(),
    }
}

fn signed_radix(v: i64, render: impl Fn(u64) -> String) -> String {
    if v < 0 {
        format!("-{}", render(v.unsigned_abs()))
    } else {
        render(v.unsigned_abs())
    }
}

fn code_point(v: u64) -> String {
    u32::try_from(v)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}

/// `1.5e0` → `1.500000e+00`.
fn exponent(v: f64, precision: usize) -> String {
    let raw = format!("{v:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    }
}

fn pad(text: String, spec: &Spec, arg: &Arg) -> String {
    let Some(width) = spec.width else {
        return text;
    };
    let len = text.chars().count();
    if len >= width {
        return text;
    }
    let fill = width - len;

    if spec.left {
        format!("{text}{}", " ".repeat(fill))
    } else if spec.zero && arg.is_numeric() {
        let (sign, digits) = match text.chars().next() {
            Some(s @ ('-' | '+')) => (s.to_string(), &text[1..]),
            _ => (String::new(), text.as_str()),
        };
        format!("{sign}{}{digits}", "0".repeat(fill))
    } else {
        format!("{}{text}", " ".repeat(fill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(format_template("no directives", &[]), "no directives");
        assert_eq!(format_template("100%%", &[]), "100%");
        assert_eq!(format_template("", &[]), "");
    }

    #[test]
    fn oversized_width_and_precision_are_rejected() {
        assert_eq!(
            format_template("%99999999999999999999d", &args![1]),
            "%!(BADWIDTH)1"
        );
        assert_eq!(format_template("[%1000001s]", &args!["x"]), "[%!(BADWIDTH)x]");
        assert_eq!(
            format_template("%.99999999999999999999f", &args![1.5]),
            "%!(BADPREC)1.500000"
        );
        assert_eq!(format_template("%.2000000s", &args!["abc"]), "%!(BADPREC)abc");
        assert_eq!(format_template("%5.1f", &args![2.5]), "  2.5");
    }

    #[test]
    fn basic_verbs() {
        assert_eq!(format_template("%d-%s", &args![7, "x"]), "7-x");
        assert_eq!(format_template("%v|%v|%v", &args![1.5, true, 'z']), "1.5|true|z");
        assert_eq!(format_template("%q", &args!["a\"b"]), "\"a\\\"b\"");
        assert_eq!(format_template("%t", &args![false]), "false");
        assert_eq!(format_template("%c%c", &args!['o', 107u32]), "ok");
    }

    #[test]
    fn radix_verbs() {
        assert_eq!(format_template("%x %X", &args![255, 255u8]), "ff FF");
        assert_eq!(format_template("%x", &args![-255]), "-ff");
        assert_eq!(format_template("%o %b", &args![8, 5]), "10 101");
        assert_eq!(format_template("%x", &args!["hi"]), "6869");
    }

    #[test]
    fn float_verbs() {
        assert_eq!(format_template("%f", &args![1.5]), "1.500000");
        assert_eq!(format_template("%.2f", &args![3.14159]), "3.14");
        assert_eq!(format_template("%e", &args![1500.0]), "1.500000e+03");
        assert_eq!(format_template("%.1e", &args![0.015]), "1.5e-02");
        assert_eq!(format_template("%+d %+.1f", &args![3, 2.0]), "+3 +2.0");
    }

    #[test]
    fn width_and_flags() {
        assert_eq!(format_template("[%5d]", &args![42]), "[   42]");
        assert_eq!(format_template("[%-5d]", &args![42]), "[42   ]");
        assert_eq!(format_template("[%05d]", &args![-42]), "[-0042]");
        assert_eq!(format_template("[%.3s]", &args!["abcdef"]), "[abc]");
        assert_eq!(format_template("[%04s]", &args!["ab"]), "[  ab]");
    }

    #[test]
    fn problems_render_inline() {
        assert_eq!(format_template("%d %d", &args![1]), "1 %!d(MISSING)");
        assert_eq!(format_template("%d", &args!["x"]), "%!d(string=x)");
        assert_eq!(format_template("%s", &args![7]), "%!s(int=7)");
        assert_eq!(format_template("%z", &args![true]), "%!z(bool=true)");
        assert_eq!(format_template("50%", &[]), "50%!(NOVERB)");
        assert_eq!(
            format_template("%s", &args!["a", 1, "b"]),
            "a%!(EXTRA int=1, string=b)"
        );
    }

    #[test]
    fn display_arg_captures_text() {
        let arg = Arg::display(std::net::Ipv4Addr::LOCALHOST);
        assert_eq!(arg, Arg::Str("127.0.0.1".into()));
        assert_eq!(Arg::from(String::from("s")).type_name(), "string");
        assert_eq!(Arg::from(3u16), Arg::Uint(3));
        assert_eq!(Arg::from(-3i8), Arg::Int(-3));
    }
}
