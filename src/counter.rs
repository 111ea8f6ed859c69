//! Mixed-radix enumeration of lower-triangular digit matrices.
//!
//! A coloring of the complete graph on `n` vertices is a lower-triangular
//! matrix `D[i][j]` (`0 <= j < i < n`). The counter reads that matrix as one
//! integer of `n(n-1)/2` digits and steps through every value exactly once.

use crate::error::{Result, TournamentError};

// ============================================================================
// Triangle indexing
// ============================================================================

/// Precomputed `choose(n, 2) = n*(n-1)/2` for n in 0..=64.
const CHOOSE2: [usize; 65] = {
    let mut table = [0usize; 65];
    let mut i = 0usize;
    while i < 65 {
        table[i] = (i * i.saturating_sub(1)) / 2;
        i += 1;
    }
    table
};

/// Returns `n * (n-1) / 2`, via lookup for small `n`.
#[inline(always)]
pub(crate) const fn choose2(n: usize) -> usize {
    if n < CHOOSE2.len() {
        CHOOSE2[n]
    } else {
        n * (n - 1) / 2
    }
}

/// `n * (n-1) / 2`, or `None` if it overflows `usize`.
const fn checked_choose2(n: usize) -> Option<usize> {
    if n < 2 {
        Some(0)
    } else if n % 2 == 0 {
        (n / 2).checked_mul(n - 1)
    } else {
        n.checked_mul((n - 1) / 2)
    }
}

/// Number of states of a base-`base` counter on `order` vertices, computed
/// without building the digit matrix.
///
/// # Errors
/// Returns [`TournamentError::SpaceTooLarge`] if the count overflows `u64`.
pub(crate) fn state_count(order: usize, base: u8) -> Result<u64> {
    let too_large = TournamentError::SpaceTooLarge { order, base };
    let Some(exp) = checked_choose2(order).and_then(|d| u32::try_from(d).ok()) else {
        return Err(too_large);
    };
    u64::from(base).checked_pow(exp).ok_or(too_large)
}

/// Flat offset of `D[row][col]` in row-major triangular order (`col < row`).
#[inline(always)]
pub(crate) const fn triangle_index(row: usize, col: usize) -> usize {
    debug_assert!(col < row);
    choose2(row) + col
}

// ============================================================================
// MixedRadixCounter
// ============================================================================

/// A triangular digit matrix treated as a single base-`b` integer.
///
/// Digits are stored flat in row-major order (row 1, then row 2, ...), which is
/// also increment order: `D[1][0]` is the least significant digit and
/// `D[n-1][n-2]` the most significant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MixedRadixCounter {
    order: usize,
    base: u8,
    digits: Vec<u8>,
    is_zero: bool,
}

impl MixedRadixCounter {
    /// Creates a counter at value zero.
    ///
    /// # Errors
    /// Returns [`TournamentError::InvalidBase`] if `base < 2`.
    pub fn new(order: usize, base: u8) -> Result<Self> {
        if base < 2 {
            return Err(TournamentError::InvalidBase { base });
        }
        Ok(Self {
            order,
            base,
            digits: vec![0; choose2(order)],
            is_zero: true,
        })
    }

    /// Creates a base-3 counter at value zero, the coloring counter.
    pub fn ternary(order: usize) -> Self {
        Self {
            order,
            base: 3,
            digits: vec![0; choose2(order)],
            is_zero: true,
        }
    }

    /// Creates a counter from explicit triangular rows (`rows[i].len() == i`).
    ///
    /// # Errors
    /// Returns a shape error if a row has the wrong length or a digit is not
    /// below `base`.
    pub fn from_digits(rows: &[Vec<u8>], base: u8) -> Result<Self> {
        if base < 2 {
            return Err(TournamentError::InvalidBase { base });
        }
        let digits = flatten_rows(rows, base)?;
        let is_zero = digits.iter().all(|&d| d == 0);
        Ok(Self {
            order: rows.len(),
            base,
            digits,
            is_zero,
        })
    }

    /// Creates a counter holding `value`, used to seed disjoint shards.
    ///
    /// # Errors
    /// Returns [`TournamentError::HashOutOfRange`] if `value` does not fit
    /// the triangle, or [`TournamentError::InvalidBase`] for `base < 2`.
    pub fn from_value(order: usize, base: u8, value: u64) -> Result<Self> {
        let mut counter = Self::new(order, base)?;
        let mut rest = value;
        for d in &mut counter.digits {
            *d = (rest % u64::from(base)) as u8;
            rest /= u64::from(base);
        }
        if rest != 0 {
            return Err(TournamentError::HashOutOfRange { order });
        }
        counter.is_zero = value == 0;
        Ok(counter)
    }

    /// Advances the counter by one, carrying through the triangular layout.
    ///
    /// Sets the zero flag exactly when the increment overflows back to zero.
    pub fn increment(&mut self) {
        let base = self.base;
        for d in &mut self.digits {
            if *d + 1 < base {
                *d += 1;
                self.is_zero = false;
                return;
            }
            *d = 0;
        }
        self.is_zero = true;
    }

    /// Increments and returns the new digits, or `None` once the counter wraps.
    ///
    /// Starting from zero, this yields every non-zero value once.
    pub fn advance(&mut self) -> Option<&[u8]> {
        self.increment();
        if self.is_zero {
            None
        } else {
            Some(self.digits.as_slice())
        }
    }

    /// Returns whether the counter currently holds zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.is_zero
    }

    /// Number of vertices of the colorings being enumerated.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Radix of every digit.
    #[inline]
    pub fn base(&self) -> u8 {
        self.base
    }

    /// Number of digits, `n(n-1)/2`.
    #[inline]
    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    /// Read-only view of the digits in row-major triangular order.
    #[inline]
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Returns `D[row][col]`.
    ///
    /// # Errors
    /// Returns a bounds error unless `col < row < order`.
    pub fn digit(&self, row: usize, col: usize) -> Result<u8> {
        if row >= self.order {
            return Err(TournamentError::VertexOutOfRange {
                vertex: row,
                order: self.order,
            });
        }
        if col >= row {
            return Err(TournamentError::VertexOutOfRange {
                vertex: col,
                order: row,
            });
        }
        Ok(self.digits[triangle_index(row, col)])
    }

    /// Owned snapshot of the digits as triangular rows (row 0 is empty).
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.order)
            .map(|i| self.digits[choose2(i)..choose2(i + 1)].to_vec())
            .collect()
    }

    /// The digits read as a base-`b` integer, most significant digit first by
    /// descending row then descending column.
    ///
    /// Exact while `base^digit_count` fits in `u64`; wraps beyond that.
    pub fn hash_code(&self) -> u64 {
        positional_hash(&self.digits, self.base)
    }

    /// Alias of [`Self::hash_code`] for callers thinking of the counter as a number.
    #[inline]
    pub fn value(&self) -> u64 {
        self.hash_code()
    }

    /// Length of the full cycle, `base^(n(n-1)/2)`.
    ///
    /// # Errors
    /// Returns [`TournamentError::SpaceTooLarge`] if it overflows `u64`.
    pub fn total_states(&self) -> Result<u64> {
        state_count(self.order, self.base)
    }
}

/// Reads flat triangular digits as a base-`base` integer, last digit most significant.
#[inline]
pub(crate) fn positional_hash(digits: &[u8], base: u8) -> u64 {
    digits.iter().rev().fold(0u64, |h, &d| {
        h.wrapping_mul(u64::from(base)).wrapping_add(u64::from(d))
    })
}

/// Validates triangular rows and flattens them in row-major order.
pub(crate) fn flatten_rows(rows: &[Vec<u8>], base: u8) -> Result<Vec<u8>> {
    let mut digits = Vec::with_capacity(choose2(rows.len()));
    for (row, values) in rows.iter().enumerate() {
        if values.len() != row {
            return Err(TournamentError::RowLength {
                row,
                expected: row,
                got: values.len(),
            });
        }
        for (col, &digit) in values.iter().enumerate() {
            if digit >= base {
                return Err(TournamentError::DigitOutOfRange {
                    row,
                    col,
                    digit,
                    base,
                });
            }
            digits.push(digit);
        }
    }
    Ok(digits)
}

// ============================================================================
// Tests
// ============================================================================
