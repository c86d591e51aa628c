//! Fractional order keys.
//!
//! An [`OrderKey`] orders siblings (container members, shape stacking) so that
//! a new key can always be minted between two neighbors without renumbering
//! anything else. Keys compare as plain byte strings.
//!
//! KEY FORMAT
//! ==========
//! A key is an *integer part* followed by an optional *fraction*. The first
//! character of the integer part encodes its length: `a`..`z` give 2..27
//! characters (growing positive integers), `A`..`Z` give 27..2 characters
//! (growing negative integers). The remaining characters are base-62 digits
//! `0-9A-Za-z`. A fraction never ends in `0`, which keeps every key unique
//! under string comparison. The very first key handed out is `a0`.

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const ZERO: u8 = b'0';
const LAST: u8 = b'z';

/// `A` followed by 26 zeros. Nothing can sort below it, so it is not a valid key.
const SMALLEST_INTEGER: &[u8] = b"A00000000000000000000000000";

/// Errors produced while validating or allocating order keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// The text is not a well-formed order key.
    #[error("invalid order key: {0:?}")]
    InvalidKey(String),

    /// The lower bound does not sort strictly before the upper bound.
    #[error("order keys out of order: {lower} >= {upper}")]
    OutOfOrder { lower: String, upper: String },

    /// The integer part cannot grow or shrink any further.
    #[error("order key space exhausted")]
    Exhausted,
}

/// A validated fractional order key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderKey(String);

impl OrderKey {
    /// Validate `text` as an order key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` when the integer part is malformed, a character is
    /// not a base-62 digit, or the fraction ends in `0`.
    pub fn parse(text: &str) -> Result<Self, IndexError> {
        validate(text.as_bytes())?;
        Ok(Self(text.to_owned()))
    }

    /// The key every fresh sequence starts from (`a0`).
    #[must_use]
    pub fn first() -> Self {
        Self(String::from("a0"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|&b| char::from(b)).collect())
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrderKey {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OrderKey {
    type Error = IndexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(value.as_bytes())?;
        Ok(Self(value))
    }
}

impl From<OrderKey> for String {
    fn from(key: OrderKey) -> Self {
        key.0
    }
}

/// Return a key that sorts strictly after `lower` and strictly before `upper`.
///
/// An absent bound is an open end; with both absent the result is `a0`.
///
/// # Errors
///
/// Returns `OutOfOrder` when `lower >= upper`, and `Exhausted` when the
/// integer part has no room left in the requested direction.
pub fn key_between(lower: Option<&OrderKey>, upper: Option<&OrderKey>) -> Result<OrderKey, IndexError> {
    match (lower, upper) {
        (None, None) => Ok(OrderKey::first()),
        (None, Some(b)) => {
            let b = b.0.as_bytes();
            let (ib, fb) = split_integer(b)?;
            if ib == SMALLEST_INTEGER {
                return Ok(OrderKey::from_bytes(&concat(ib, &midpoint(&[], Some(fb))?)));
            }
            if ib.len() < b.len() {
                return Ok(OrderKey::from_bytes(ib));
            }
            let dec = decrement_integer(ib)?.ok_or(IndexError::Exhausted)?;
            Ok(OrderKey::from_bytes(&dec))
        }
        (Some(a), None) => {
            let (ia, fa) = split_integer(a.0.as_bytes())?;
            match increment_integer(ia)? {
                Some(inc) => Ok(OrderKey::from_bytes(&inc)),
                None => Ok(OrderKey::from_bytes(&concat(ia, &midpoint(fa, None)?))),
            }
        }
        (Some(a), Some(b)) => {
            if a >= b {
                return Err(IndexError::OutOfOrder { lower: a.0.clone(), upper: b.0.clone() });
            }
            let (ia, fa) = split_integer(a.0.as_bytes())?;
            let (ib, fb) = split_integer(b.0.as_bytes())?;
            if ia == ib {
                return Ok(OrderKey::from_bytes(&concat(ia, &midpoint(fa, Some(fb))?)));
            }
            let inc = increment_integer(ia)?.ok_or(IndexError::Exhausted)?;
            if inc.as_slice() < b.0.as_bytes() {
                return Ok(OrderKey::from_bytes(&inc));
            }
            Ok(OrderKey::from_bytes(&concat(ia, &midpoint(fa, None)?)))
        }
    }
}

/// Return `n` ascending keys strictly between `lower` and `upper`.
///
/// Bounded ranges are split recursively around a midpoint so the keys stay
/// short; open ranges step outward from the given bound.
///
/// # Errors
///
/// Same as [`key_between`].
pub fn keys_between(lower: Option<&OrderKey>, upper: Option<&OrderKey>, n: usize) -> Result<Vec<OrderKey>, IndexError> {
    match n {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![key_between(lower, upper)?]),
        _ => {}
    }

    match (lower, upper) {
        (_, None) => {
            let mut keys = Vec::with_capacity(n);
            let mut current = key_between(lower, None)?;
            for _ in 1..n {
                let next = key_between(Some(&current), None)?;
                keys.push(current);
                current = next;
            }
            keys.push(current);
            Ok(keys)
        }
        (None, Some(_)) => {
            let mut keys = Vec::with_capacity(n);
            let mut current = key_between(None, upper)?;
            for _ in 1..n {
                let next = key_between(None, Some(&current))?;
                keys.push(current);
                current = next;
            }
            keys.push(current);
            keys.reverse();
            Ok(keys)
        }
        (Some(_), Some(_)) => {
            let half = n / 2;
            let mid = key_between(lower, upper)?;
            let mut keys = keys_between(lower, Some(&mid), half)?;
            keys.push(mid.clone());
            keys.extend(keys_between(Some(&mid), upper, n - half - 1)?);
            Ok(keys)
        }
    }
}

fn concat(head: &[u8], tail: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(head.len() + tail.len());
    out.extend_from_slice(head);
    out.extend_from_slice(tail);
    out
}

fn digit_value(c: u8) -> Result<usize, IndexError> {
    DIGITS
        .iter()
        .position(|&d| d == c)
        .ok_or_else(|| IndexError::InvalidKey(char::from(c).to_string()))
}

fn invalid(key: &[u8]) -> IndexError {
    IndexError::InvalidKey(key.iter().map(|&b| char::from(b)).collect())
}

fn integer_length(head: u8) -> Option<usize> {
    match head {
        b'a'..=b'z' => Some(usize::from(head - b'a') + 2),
        b'A'..=b'Z' => Some(usize::from(b'Z' - head) + 2),
        _ => None,
    }
}

/// Split a key into its integer part and fraction.
fn split_integer(key: &[u8]) -> Result<(&[u8], &[u8]), IndexError> {
    let head = *key.first().ok_or_else(|| invalid(key))?;
    let len = integer_length(head).ok_or_else(|| invalid(key))?;
    if len > key.len() {
        return Err(invalid(key));
    }
    Ok(key.split_at(len))
}

fn validate(key: &[u8]) -> Result<(), IndexError> {
    if key == SMALLEST_INTEGER {
        return Err(invalid(key));
    }
    let (_, fraction) = split_integer(key)?;
    if fraction.last() == Some(&ZERO) {
        return Err(invalid(key));
    }
    for &c in &key[1..] {
        digit_value(c).map_err(|_| invalid(key))?;
    }
    Ok(())
}

/// Digits strictly between fractions `a` and `b` (`None` = 1.0).
fn midpoint(a: &[u8], b: Option<&[u8]>) -> Result<Vec<u8>, IndexError> {
    if let Some(b) = b {
        if a >= b {
            return Err(IndexError::OutOfOrder { lower: string_of(a), upper: string_of(b) });
        }
    }
    if a.last() == Some(&ZERO) || b.and_then(<[u8]>::last) == Some(&ZERO) {
        return Err(invalid(a));
    }

    if let Some(b) = b {
        // Shared prefix, padding `a` with zeros.
        let mut n = 0;
        while n < b.len() && a.get(n).copied().unwrap_or(ZERO) == b[n] {
            n += 1;
        }
        if n > 0 {
            let rest_a = if n < a.len() { &a[n..] } else { &[] };
            return Ok(concat(&b[..n], &midpoint(rest_a, Some(&b[n..]))?));
        }
    }

    let digit_a = match a.first() {
        Some(&c) => digit_value(c)?,
        None => 0,
    };
    let digit_b = match b.and_then(<[u8]>::first) {
        Some(&c) => digit_value(c)?,
        None => DIGITS.len(),
    };

    if digit_b > digit_a + 1 {
        let mid = (digit_a + digit_b + 1) / 2;
        return Ok(vec![DIGITS[mid]]);
    }

    if let Some(b) = b
        && b.len() > 1
    {
        return Ok(vec![b[0]]);
    }

    let rest_a = a.get(1..).unwrap_or(&[]);
    Ok(concat(&[DIGITS[digit_a]], &midpoint(rest_a, None)?))
}

fn string_of(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Next integer part, or `None` past the largest representable one.
fn increment_integer(int: &[u8]) -> Result<Option<Vec<u8>>, IndexError> {
    let (&head, digits) = int.split_first().ok_or_else(|| invalid(int))?;
    let mut digits = digits.to_vec();
    let mut carry = true;
    for d in digits.iter_mut().rev() {
        let next = digit_value(*d)? + 1;
        if next == DIGITS.len() {
            *d = ZERO;
        } else {
            *d = DIGITS[next];
            carry = false;
            break;
        }
    }

    if !carry {
        return Ok(Some(concat(&[head], &digits)));
    }
    match head {
        b'Z' => Ok(Some(vec![b'a', ZERO])),
        b'z' => Ok(None),
        _ => {
            let next_head = head + 1;
            if next_head > b'a' {
                digits.push(ZERO);
            } else {
                digits.pop();
            }
            Ok(Some(concat(&[next_head], &digits)))
        }
    }
}

/// Previous integer part, or `None` below the smallest representable one.
fn decrement_integer(int: &[u8]) -> Result<Option<Vec<u8>>, IndexError> {
    let (&head, digits) = int.split_first().ok_or_else(|| invalid(int))?;
    let mut digits = digits.to_vec();
    let mut borrow = true;
    for d in digits.iter_mut().rev() {
        let value = digit_value(*d)?;
        if value == 0 {
            *d = LAST;
        } else {
            *d = DIGITS[value - 1];
            borrow = false;
            break;
        }
    }

    if !borrow {
        return Ok(Some(concat(&[head], &digits)));
    }
    match head {
        b'a' => Ok(Some(vec![b'Z', LAST])),
        b'A' => Ok(None),
        _ => {
            let next_head = head - 1;
            if next_head < b'Z' {
                digits.push(LAST);
            } else {
                digits.pop();
            }
            Ok(Some(concat(&[next_head], &digits)))
        }
    }
}
