//! The four primitive transforms.
//!
//! Each transform is a pure, length-preserving bijection over alphabet
//! indices. Shift, Linear and Wave add a position-dependent offset modulo `N`
//! and invert by negating that offset; Mirror permutes positions and is its
//! own inverse.
//!
//! # Invariants
//!
//! - `apply(apply(x, Encode), Decode) == x` for every transform and input
//! - Output length equals input length
//! - All arithmetic is reduced modulo `N` before indexing, so no index ever
//!   leaves `[0, N)`

use std::{fmt, num::NonZeroUsize};

use crate::{error::ParameterError, protocol::Command};

/// Direction a protocol is applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Forward application, instructions in parsed order.
    Encode,
    /// Inverse application, instructions in reverse order.
    Decode,
}

impl Direction {
    /// `+1` for encode, `-1` for decode.
    const fn sign(self) -> i128 {
        match self {
            Self::Encode => 1,
            Self::Decode => -1,
        }
    }
}

/// A validated transform with its typed parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Add a constant to every index.
    Shift(i64),
    /// Reverse each consecutive block of this size.
    Mirror(NonZeroUsize),
    /// Add `round_ties_even(coefficient * (i + 1))` at position `i`, reduced
    /// modulo `N` without leaving floating point.
    Linear(f64),
    /// Add a running offset driven by a triangle wave of this height.
    Wave(i64),
}

impl Transform {
    /// Parses and validates `raw` as the parameter of `command`.
    pub fn from_parameter(command: Command, raw: &str) -> Result<Self, ParameterError> {
        match command {
            Command::Shift => parse_integer(raw).map(Self::Shift),
            Command::Mirror => {
                let size = parse_integer(raw)?;
                usize::try_from(size)
                    .ok()
                    .and_then(NonZeroUsize::new)
                    .map(Self::Mirror)
                    .ok_or(ParameterError::NonPositiveBlockSize)
            },
            Command::Linear => parse_coefficient(raw).map(Self::Linear),
            Command::Wave => parse_integer(raw).map(Self::Wave),
        }
    }

    /// The command this transform was built from.
    pub const fn command(&self) -> Command {
        match self {
            Self::Shift(_) => Command::Shift,
            Self::Mirror(_) => Command::Mirror,
            Self::Linear(_) => Command::Linear,
            Self::Wave(_) => Command::Wave,
        }
    }

    /// Applies the transform to `indices` over an alphabet of `modulus`
    /// symbols.
    ///
    /// Every index must already be below `modulus`.
    pub fn apply(&self, indices: &[usize], modulus: usize, direction: Direction) -> Vec<usize> {
        debug_assert!(modulus > 0, "alphabet cannot be empty");
        match *self {
            Self::Shift(amount) => shift(indices, modulus, i128::from(amount) * direction.sign()),
            Self::Mirror(block) => mirror(indices, block),
            Self::Linear(coefficient) => linear(indices, modulus, coefficient, direction.sign()),
            Self::Wave(height) => wave(indices, modulus, height, direction.sign()),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shift(amount) => write!(f, "shift({amount})"),
            Self::Mirror(block) => write!(f, "mirror({block})"),
            Self::Linear(coefficient) => write!(f, "linear({coefficient})"),
            Self::Wave(height) => write!(f, "wave({height})"),
        }
    }
}

/// Integer with an optional leading `-`. Surrounding whitespace is ignored.
fn parse_integer(raw: &str) -> Result<i64, ParameterError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParameterError::NotAnInteger);
    }
    trimmed.parse().map_err(|_| ParameterError::OutOfRange)
}

/// Removes `_` digit separators. Each one must sit between two ASCII digits
/// (`1_5`, `0.2_5`); any other `_` makes the number invalid.
fn strip_digit_separators(number: &str) -> Option<String> {
    let chars: Vec<char> = number.chars().collect();
    let mut stripped = String::with_capacity(number.len());

    for (i, &c) in chars.iter().enumerate() {
        if c != '_' {
            stripped.push(c);
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| chars.get(j));
        let after = chars.get(i + 1);
        if !(before.is_some_and(char::is_ascii_digit) && after.is_some_and(char::is_ascii_digit)) {
            return None;
        }
    }
    Some(stripped)
}

/// Real number, with `*5` meaning `0.5` and `-*5` meaning `-0.5`. Digits may
/// be grouped with `_`.
fn parse_coefficient(raw: &str) -> Result<f64, ParameterError> {
    let trimmed = raw.trim();
    let expanded = if let Some(fraction) = trimmed.strip_prefix("-*") {
        format!("-0.{fraction}")
    } else if let Some(fraction) = trimmed.strip_prefix('*') {
        format!("0.{fraction}")
    } else {
        trimmed.to_owned()
    };

    let value: f64 = strip_digit_separators(&expanded)
        .and_then(|number| number.parse().ok())
        .ok_or(ParameterError::NotANumber)?;
    if !value.is_finite() {
        return Err(ParameterError::NonFinite);
    }
    Ok(value)
}

/// Reduces a signed offset into `[0, modulus)`.
fn residue(offset: i128, modulus: usize) -> usize {
    offset.rem_euclid(modulus as i128) as usize
}

fn shift(indices: &[usize], modulus: usize, amount: i128) -> Vec<usize> {
    let delta = residue(amount, modulus);
    indices.iter().map(|&index| (index + delta) % modulus).collect()
}

fn mirror(indices: &[usize], block: NonZeroUsize) -> Vec<usize> {
    indices.chunks(block.get()).flat_map(|chunk| chunk.iter().rev().copied()).collect()
}

/// Encode offset of the linear transform at `position`, reduced into
/// `[0, modulus)`.
///
/// The rounded product is reduced as a float: every `f64` at or beyond
/// `2^53` is already an integer, so `rem_euclid` is exact at any magnitude
/// and no integer cast can saturate. Decode negates this residue, so
/// rounding is identical in both directions.
pub(crate) fn linear_residue(coefficient: f64, position: usize, modulus: usize) -> usize {
    let rounded = (coefficient * (position as f64 + 1.0)).round_ties_even();
    rounded.rem_euclid(modulus as f64) as usize
}

fn linear(indices: &[usize], modulus: usize, coefficient: f64, sign: i128) -> Vec<usize> {
    indices
        .iter()
        .enumerate()
        .map(|(position, &index)| {
            let delta = linear_residue(coefficient, position, modulus);
            let delta = if sign < 0 { (modulus - delta) % modulus } else { delta };
            (index + delta) % modulus
        })
        .collect()
}

/// Increment at `position` of the wave cycle for `amplitude = |height|`.
///
/// One cycle has length `4 * amplitude`: `H, H-1, .., 1, -1, .., -H` followed
/// by its negation, so it sums to zero.
pub(crate) fn wave_increment(amplitude: u64, position: usize) -> i128 {
    let amplitude = u128::from(amplitude);
    let phase = position as u128 % (4 * amplitude);
    let (half_phase, negated) =
        if phase < 2 * amplitude { (phase, false) } else { (phase - 2 * amplitude, true) };

    let base = if half_phase < amplitude {
        (amplitude - half_phase) as i128
    } else {
        -((half_phase - amplitude + 1) as i128)
    };

    if negated { -base } else { base }
}

fn wave(indices: &[usize], modulus: usize, height: i64, sign: i128) -> Vec<usize> {
    if height == 0 {
        return indices.to_vec();
    }

    let amplitude = height.unsigned_abs();
    let orientation = if height < 0 { -sign } else { sign };
    let mut cumulative = 0;

    indices
        .iter()
        .enumerate()
        .map(|(position, &index)| {
            let out = (index + cumulative) % modulus;
            let step = wave_increment(amplitude, position) * orientation;
            cumulative = (cumulative + residue(step, modulus)) % modulus;
            out
        })
        .collect()
}
