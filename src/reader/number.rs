//! Number token decoding: integer fast path with a double fallback.

use thiserror::Error;

use super::token::Token;
use crate::value::Payload;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{literal}' is not a number.")]
pub(crate) struct NumberDecodeError {
    pub literal: String,
}

/// Decodes a numeric token span.
///
/// The integer path is attempted first: digits accumulate into a `u64`
/// against a limit of `|i64::MIN|` for negative literals and `u64::MAX`
/// otherwise. Any non-digit byte, or any accumulation that would overflow,
/// defers to the double path. A successful integer decode yields `Int` when
/// the value fits `i64` (or is negative) and `UInt` above that.
pub(crate) fn decode_number(doc: &[u8], token: &Token) -> Result<Payload, NumberDecodeError> {
    let span = &doc[token.offset_start..token.offset_end];
    let (negative, digits) = match span.first() {
        Some(b'-') => (true, &span[1..]),
        _ => (false, span),
    };
    let max: u64 = if negative {
        i64::MIN.unsigned_abs()
    } else {
        u64::MAX
    };
    let threshold = max / 10;
    let mut value: u64 = 0;
    for (index, &c) in digits.iter().enumerate() {
        if !c.is_ascii_digit() {
            return decode_double(span);
        }
        let digit = u64::from(c - b'0');
        if value >= threshold {
            // Having touched the limit divided by ten, one further digit is
            // representable only if it is the last and fits the remainder.
            if value > threshold || index + 1 != digits.len() || digit > max % 10 {
                return decode_double(span);
            }
        }
        value = value * 10 + digit;
    }
    Ok(if negative {
        Payload::Int((value as i64).wrapping_neg())
    } else if value <= i64::MAX as u64 {
        Payload::Int(value as i64)
    } else {
        Payload::UInt(value)
    })
}

fn decode_double(span: &[u8]) -> Result<Payload, NumberDecodeError> {
    let literal = String::from_utf8_lossy(span);
    match literal.parse::<f64>() {
        Ok(value) => Ok(Payload::Double(value)),
        Err(_) => Err(NumberDecodeError {
            literal: literal.into_owned(),
        }),
    }
}
