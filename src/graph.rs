//! Edge-3-colored complete graphs ("colored tournaments") and the local repair
//! heuristic that removes avoidable rainbow triangles.

use crate::counter::{MixedRadixCounter, choose2, flatten_rows, positional_hash, triangle_index};
use crate::error::{Result, TournamentError};
use rand::Rng;
use std::cell::Cell;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

// ============================================================================
// Colors
// ============================================================================

/// An arc color, always one of `0`, `1`, `2`.
pub type Color = u8;

/// Number of arc colors.
pub const COLORS: usize = 3;

/// Color-to-bit table used by the rainbow tests.
const COLOR_BITS: [u8; COLORS] = [1, 2, 4];

/// Bit pattern of a triangle that shows every color.
const RAINBOW: u8 = 0b111;

/// The color missing from a pair of distinct colors.
#[inline(always)]
const fn third_color(a: Color, b: Color) -> Color {
    debug_assert!(a != b);
    3 - a - b
}

#[inline(always)]
fn is_rainbow(a: Color, b: Color, c: Color) -> bool {
    (COLOR_BITS[a as usize] | COLOR_BITS[b as usize] | COLOR_BITS[c as usize]) == RAINBOW
}

// ============================================================================
// ColoredArc
// ============================================================================

/// The single colored connection between two vertices.
///
/// Arcs are oriented from the lower index to the higher one for storage
/// purposes only; the coloring itself is undirected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColoredArc {
    /// Lower endpoint.
    pub source: usize,
    /// Higher endpoint.
    pub destination: usize,
    /// Arc color.
    pub color: Color,
}

// ============================================================================
// ColoredTournament
// ============================================================================

/// A complete graph on `order` labeled vertices whose arcs carry one of three colors.
///
/// Colors live in a flat lower-triangular array: the arc between `i` and
/// `j < i` sits at offset `i*(i-1)/2 + j`, the same layout the
/// [`MixedRadixCounter`] enumerates. The canonical hash is cached and cleared
/// by every recoloring.
#[derive(Clone, Debug)]
pub struct ColoredTournament {
    order: usize,
    colors: Vec<Color>,
    hash: Cell<Option<u64>>,
}

impl PartialEq for ColoredTournament {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.colors == other.colors
    }
}

impl Eq for ColoredTournament {}

impl ColoredTournament {
    /// Creates a graph on `order` vertices with every arc colored `0`.
    pub fn new(order: usize) -> Self {
        Self {
            order,
            colors: vec![0; choose2(order)],
            hash: Cell::new(None),
        }
    }

    /// Builds a graph from triangular rows, `rows[i][j]` being the color of arc `(i, j)`.
    ///
    /// # Errors
    /// Returns a shape error if a row has the wrong length or holds a value `>= 3`.
    pub fn from_digits(rows: &[Vec<Color>]) -> Result<Self> {
        let colors = flatten_rows(rows, COLORS as u8)?;
        Ok(Self::from_valid_colors(rows.len(), colors))
    }

    /// Builds a graph from flat row-major triangular digits.
    ///
    /// # Errors
    /// Returns [`TournamentError::Truncated`] or [`TournamentError::TrailingData`]
    /// if the length is not `order*(order-1)/2`, or a shape error for a value `>= 3`.
    pub fn from_flat_digits(order: usize, digits: &[Color]) -> Result<Self> {
        let expected = choose2(order);
        if digits.len() < expected {
            return Err(TournamentError::Truncated {
                expected,
                got: digits.len(),
            });
        }
        if digits.len() > expected {
            return Err(TournamentError::TrailingData { expected });
        }
        check_colors(digits)?;
        Ok(Self::from_valid_colors(order, digits.to_vec()))
    }

    /// Snapshots the coloring currently held by a counter.
    ///
    /// # Errors
    /// Returns a shape error if the counter's base allows digits `>= 3`.
    pub fn from_counter(counter: &MixedRadixCounter) -> Result<Self> {
        Self::from_flat_digits(counter.order(), counter.digits())
    }

    /// Decodes a canonical hash back into the coloring it fingerprints.
    ///
    /// # Errors
    /// Returns [`TournamentError::HashOutOfRange`] if `code` needs more digits
    /// than the triangle of `order` has.
    pub fn from_hash(order: usize, code: u64) -> Result<Self> {
        let counter = MixedRadixCounter::from_value(order, COLORS as u8, code)?;
        Ok(Self::from_valid_colors(order, counter.digits().to_vec()))
    }

    /// Builds a graph from explicit arcs; pairs that are not listed keep color `0`.
    ///
    /// # Errors
    /// Returns a bounds error for self-arcs or vertices outside the order, and
    /// [`TournamentError::InvalidColor`] for colors `>= 3`.
    pub fn from_arcs<I>(order: usize, arcs: I) -> Result<Self>
    where
        I: IntoIterator<Item = ColoredArc>,
    {
        let mut graph = Self::new(order);
        for arc in arcs {
            graph.set_color(arc.source, arc.destination, arc.color)?;
        }
        Ok(graph)
    }

    /// Overwrites every color with flat row-major digits of the same order,
    /// reusing the allocation.
    ///
    /// # Errors
    /// Returns a length error if `digits` does not fit this order, or a shape
    /// error for a value `>= 3`; the graph is left unchanged on error.
    pub fn load_digits(&mut self, digits: &[Color]) -> Result<()> {
        if digits.len() < self.colors.len() {
            return Err(TournamentError::Truncated {
                expected: self.colors.len(),
                got: digits.len(),
            });
        }
        if digits.len() > self.colors.len() {
            return Err(TournamentError::TrailingData {
                expected: self.colors.len(),
            });
        }
        check_colors(digits)?;
        self.colors.copy_from_slice(digits);
        self.hash.set(None);
        Ok(())
    }

    /// Draws every arc color uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, order: usize) -> Self {
        let colors = (0..choose2(order))
            .map(|_| rng.random_range(0..COLORS as u8))
            .collect();
        Self::from_valid_colors(order, colors)
    }

    fn from_valid_colors(order: usize, colors: Vec<Color>) -> Self {
        debug_assert_eq!(colors.len(), choose2(order));
        debug_assert!(colors.iter().all(|&c| (c as usize) < COLORS));
        Self {
            order,
            colors,
            hash: Cell::new(None),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Number of vertices.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of arcs, `order*(order-1)/2`.
    #[inline]
    pub fn arc_count(&self) -> usize {
        self.colors.len()
    }

    /// Color of the arc between `u` and `v` (either order).
    ///
    /// Unchecked hot-path accessor: `u != v` and both in range are asserted in
    /// debug builds only. Use [`Self::try_color`] for untrusted indices.
    #[inline(always)]
    pub fn color(&self, u: usize, v: usize) -> Color {
        debug_assert!(u != v && u < self.order && v < self.order);
        if u > v {
            self.colors[triangle_index(u, v)]
        } else {
            self.colors[triangle_index(v, u)]
        }
    }

    /// Checked version of [`Self::color`].
    ///
    /// # Errors
    /// Returns a bounds error for self-arcs or out-of-range vertices.
    pub fn try_color(&self, u: usize, v: usize) -> Result<Color> {
        self.check_pair(u, v)?;
        Ok(self.color(u, v))
    }

    /// Recolors the arc between `u` and `v`, invalidating the cached hash.
    ///
    /// # Errors
    /// Returns a bounds error for self-arcs or out-of-range vertices and
    /// [`TournamentError::InvalidColor`] for colors `>= 3`.
    pub fn set_color(&mut self, u: usize, v: usize, color: Color) -> Result<()> {
        self.check_pair(u, v)?;
        if color as usize >= COLORS {
            return Err(TournamentError::InvalidColor { color });
        }
        self.recolor(u.max(v), u.min(v), color);
        Ok(())
    }

    /// Iterates over every arc, row by row.
    pub fn arcs(&self) -> impl Iterator<Item = ColoredArc> + '_ {
        (1..self.order).flat_map(move |i| {
            (0..i).map(move |j| ColoredArc {
                source: j,
                destination: i,
                color: self.color(i, j),
            })
        })
    }

    /// Number of arcs of each color.
    pub fn color_counts(&self) -> [usize; COLORS] {
        let mut counts = [0usize; COLORS];
        for &c in &self.colors {
            counts[c as usize] += 1;
        }
        counts
    }

    /// Flat row-major triangular digits.
    #[inline]
    pub fn digits(&self) -> &[Color] {
        &self.colors
    }

    /// Owned triangular rows (row 0 is empty).
    pub fn to_rows(&self) -> Vec<Vec<Color>> {
        (0..self.order)
            .map(|i| self.colors[choose2(i)..choose2(i + 1)].to_vec())
            .collect()
    }

    /// Writes `color` at `(hi, lo)` and drops the cached hash if it changed.
    #[inline(always)]
    fn recolor(&mut self, hi: usize, lo: usize, color: Color) {
        let slot = &mut self.colors[triangle_index(hi, lo)];
        if *slot != color {
            *slot = color;
            self.hash.set(None);
        }
    }

    fn check_vertex(&self, v: usize) -> Result<()> {
        if v >= self.order {
            return Err(TournamentError::VertexOutOfRange {
                vertex: v,
                order: self.order,
            });
        }
        Ok(())
    }

    fn check_pair(&self, u: usize, v: usize) -> Result<()> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        if u == v {
            return Err(TournamentError::SelfArc { vertex: u });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Rainbow triangles
    // ------------------------------------------------------------------------

    /// Returns whether some triple `i < j < k` shows all three colors.
    pub fn has_rainbow_triangles(&self) -> bool {
        for k in 2..self.order {
            for j in 1..k {
                let kj = self.color(k, j);
                for i in 0..j {
                    if is_rainbow(kj, self.color(k, i), self.color(j, i)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Counts rainbow triples.
    pub fn number_of_rainbow_triangles(&self) -> usize {
        let mut count = 0;
        for k in 2..self.order {
            for j in 1..k {
                let kj = COLOR_BITS[self.color(k, j) as usize];
                for i in 0..j {
                    let sum = kj
                        + COLOR_BITS[self.color(k, i) as usize]
                        + COLOR_BITS[self.color(j, i) as usize];
                    // Sums of three entries of {1, 2, 4} reach 7 only as 1 + 2 + 4.
                    if sum == RAINBOW {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Lists every rainbow triple as `(i, j, k)` with `i < j < k`.
    pub fn rainbow_triangles(&self) -> Vec<(usize, usize, usize)> {
        let mut out = Vec::new();
        for i in 0..self.order {
            for j in (i + 1)..self.order {
                for k in (j + 1)..self.order {
                    if is_rainbow(self.color(j, i), self.color(k, i), self.color(k, j)) {
                        out.push((i, j, k));
                    }
                }
            }
        }
        out
    }

    // ------------------------------------------------------------------------
    // Compression
    // ------------------------------------------------------------------------

    /// Locally repairs the coloring to remove avoidable rainbow triangles.
    ///
    /// Runs a descending-separation pass that recolors each hypotenuse toward a
    /// color shared by an interior pair of legs, then an ascending pass that
    /// moves each hypotenuse off any color forced into a rainbow by its
    /// interior vertices. Returns `true` if some hypotenuse is rainbow for every
    /// choice of color, in which case the graph still contains a rainbow
    /// triangle; `false` means the repaired graph is rainbow-free.
    ///
    /// Repeated application has no guaranteed fixed point: up to order 5 the
    /// flag is stable from the second round on, but from order 6 upward it can
    /// still change between the second and third rounds.
    ///
    /// `O(n^3)`.
    pub fn partially_compress(&mut self) -> bool {
        self.repair_descending();
        self.repair_ascending()
    }

    fn repair_descending(&mut self) {
        let n = self.order;
        for gap in (2..n).rev() {
            for s in 0..n - gap {
                let t = s + gap;
                let mut used = [false; COLORS];
                let mut preferred = [false; COLORS];
                for k in 0..n {
                    if k == s || k == t {
                        continue;
                    }
                    let a = self.color(k, s);
                    let b = self.color(k, t);
                    if k < s || k > t {
                        if a != b {
                            used[third_color(a, b) as usize] = true;
                        }
                    } else if a == b {
                        preferred[a as usize] = true;
                    }
                }
                // Highest qualifying color wins.
                if let Some(c) = (0..COLORS as u8)
                    .rev()
                    .find(|&c| preferred[c as usize] && !used[c as usize])
                {
                    self.recolor(t, s, c);
                }
            }
        }
    }

    fn repair_ascending(&mut self) -> bool {
        let n = self.order;
        let mut irreducible = false;
        let mut candidates: Vec<Color> = Vec::with_capacity(n + COLORS);
        for gap in 2..n {
            for s in 0..n - gap {
                let t = s + gap;
                let mut used = [false; COLORS];
                candidates.clear();
                candidates.extend_from_slice(&[0, 1, 2]);
                for k in (s + 1)..t {
                    let a = self.color(k, s);
                    let b = self.color(k, t);
                    if a != b {
                        used[third_color(a, b) as usize] = true;
                        candidates.push(b);
                    }
                }
                if used.iter().all(|&u| u) {
                    irreducible = true;
                    continue;
                }
                if used[self.color(t, s) as usize] {
                    while let Some(c) = candidates.pop() {
                        if !used[c as usize] {
                            self.recolor(t, s, c);
                            break;
                        }
                    }
                }
            }
        }
        irreducible
    }

    // ------------------------------------------------------------------------
    // Hashing and subgraphs
    // ------------------------------------------------------------------------

    /// Canonical fingerprint: the triangular digits read as a base-3 integer,
    /// most significant digit first by descending row then descending column.
    ///
    /// Equal to [`MixedRadixCounter::hash_code`] for the same digits. Exact up
    /// to order 9; larger orders wrap. This identifies a labeled coloring, it is
    /// not an isomorphism certificate.
    pub fn hash_code(&self) -> u64 {
        if let Some(h) = self.hash.get() {
            return h;
        }
        let h = positional_hash(&self.colors, COLORS as u8);
        self.hash.set(Some(h));
        h
    }

    /// Induced subgraph on `indices`, renumbered `0..len` in increasing
    /// original index order.
    ///
    /// # Errors
    /// Returns a bounds error for an out-of-range index and
    /// [`TournamentError::DuplicateVertex`] if an index repeats.
    pub fn subgraph(&self, indices: &[usize]) -> Result<Self> {
        let mut keep = indices.to_vec();
        keep.sort_unstable();
        for w in keep.windows(2) {
            if w[0] == w[1] {
                return Err(TournamentError::DuplicateVertex { vertex: w[0] });
            }
        }
        if let Some(&last) = keep.last() {
            self.check_vertex(last)?;
        }

        let mut colors = Vec::with_capacity(choose2(keep.len()));
        for (a, &hi) in keep.iter().enumerate() {
            for &lo in &keep[..a] {
                colors.push(self.color(hi, lo));
            }
        }
        Ok(Self::from_valid_colors(keep.len(), colors))
    }

    /// Induced subgraph with vertex `v` removed.
    ///
    /// # Errors
    /// Returns a bounds error if `v` is out of range.
    pub fn delete_vertex(&self, v: usize) -> Result<Self> {
        self.check_vertex(v)?;
        let keep: Vec<usize> = (0..self.order).filter(|&u| u != v).collect();
        self.subgraph(&keep)
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Saves the coloring: the order, then one line of colors per row.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, filename: impl AsRef<Path>) -> Result<()> {
        let f = File::create(filename)?;
        self.write_to(f)?;
        Ok(())
    }

    /// Writes the persisted form to a writer.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        writeln!(w, "{}", self.order)?;
        write!(w, "{self}")
    }

    /// Loads a coloring written by [`Self::save_to_file`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its contents are malformed.
    pub fn load_from_file(filename: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(filename)?;
        parse_coloring(&text)
    }
}

impl fmt::Display for ColoredTournament {
    /// Left-justified triangle: one tab-separated row per vertex after the first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 1..self.order {
            let row = &self.colors[choose2(i)..choose2(i + 1)];
            for (j, c) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str("\t")?;
                }
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn check_colors(digits: &[Color]) -> Result<()> {
    let (mut row, mut col) = (1usize, 0usize);
    for &digit in digits {
        if digit as usize >= COLORS {
            return Err(TournamentError::DigitOutOfRange {
                row,
                col,
                digit,
                base: COLORS as u8,
            });
        }
        col += 1;
        if col == row {
            row += 1;
            col = 0;
        }
    }
    Ok(())
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses the persisted text form: whitespace-separated tokens, the order `n`
/// first, then the `n(n-1)/2` colors in row-major triangular order.
///
/// # Errors
/// Returns an error if the input is empty, holds a non-numeric token or a
/// color `>= 3`, stops early, or continues past the last color.
pub fn parse_coloring(text: &str) -> Result<ColoredTournament> {
    let mut tokens = text.split_whitespace().enumerate();
    let (_, first) = tokens.next().ok_or(TournamentError::Empty)?;
    let order: usize = first.parse().map_err(|_| TournamentError::BadToken {
        index: 0,
        token: first.to_string(),
    })?;

    let expected = order
        .checked_mul(order.saturating_sub(1))
        .map_or(usize::MAX, |x| x / 2);
    let mut colors = Vec::new();
    while colors.len() < expected {
        let Some((index, token)) = tokens.next() else {
            return Err(TournamentError::Truncated {
                expected,
                got: colors.len(),
            });
        };
        let digit: u8 = token.parse().map_err(|_| TournamentError::BadToken {
            index,
            token: token.to_string(),
        })?;
        colors.push(digit);
    }
    if tokens.next().is_some() {
        return Err(TournamentError::TrailingData { expected });
    }
    check_colors(&colors)?;
    Ok(ColoredTournament::from_valid_colors(order, colors))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use std::collections::HashSet;

    /// Every coloring of order `n`, the all-zero one included.
    fn all_colorings(n: usize) -> Vec<ColoredTournament> {
        let mut counter = MixedRadixCounter::ternary(n);
        let mut out = vec![ColoredTournament::from_counter(&counter).unwrap()];
        while counter.advance().is_some() {
            out.push(ColoredTournament::from_counter(&counter).unwrap());
        }
        out
    }

    /// Straightforward triple scan over distinct color sets.
    fn reference_has_rainbow(g: &ColoredTournament) -> bool {
        let n = g.order();
        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    let set: HashSet<Color> = [g.color(i, j), g.color(i, k), g.color(j, k)]
                        .into_iter()
                        .collect();
                    if set.len() == 3 {
                        return true;
                    }
                }
            }
        }
        false
    }

    // -------------------------------------------------------------------------
    // Scenarios
    // -------------------------------------------------------------------------

    #[test]
    fn single_rainbow_triangle() {
        let g = ColoredTournament::from_digits(&[vec![], vec![0], vec![1, 2]]).unwrap();
        assert!(g.has_rainbow_triangles());
        assert_eq!(g.number_of_rainbow_triangles(), 1);
        assert_eq!(g.rainbow_triangles(), vec![(0, 1, 2)]);
    }

    #[test]
    fn monochromatic_triangle_is_left_alone() {
        let mut g = ColoredTournament::from_digits(&[vec![], vec![0], vec![0, 0]]).unwrap();
        assert!(!g.has_rainbow_triangles());
        assert_eq!(g.number_of_rainbow_triangles(), 0);
        assert!(!g.partially_compress());
        assert!(g.digits().iter().all(|&c| c == 0));
    }

    #[test]
    fn rainbow_triangle_is_repaired_on_its_hypotenuse() {
        let mut g = ColoredTournament::from_digits(&[vec![], vec![0], vec![1, 2]]).unwrap();
        assert!(!g.partially_compress());
        // Hypotenuse (2, 0) moves to the leg color nearest vertex 2.
        assert_eq!(g.color(2, 0), 2);
        assert_eq!(g.color(1, 0), 0);
        assert_eq!(g.color(2, 1), 2);
        assert!(!g.has_rainbow_triangles());
    }

    // -------------------------------------------------------------------------
    // Exhaustive checks on small orders
    // -------------------------------------------------------------------------

    #[test]
    fn rainbow_detection_matches_reference_up_to_order_five() {
        for n in 0..=5 {
            for g in all_colorings(n) {
                let expected = reference_has_rainbow(&g);
                assert_eq!(g.has_rainbow_triangles(), expected, "order {n}\n{g}");
                assert_eq!(g.number_of_rainbow_triangles() > 0, expected);
                assert_eq!(g.rainbow_triangles().len(), g.number_of_rainbow_triangles());
            }
        }
    }

    #[test]
    fn compression_result_matches_remaining_rainbows() {
        for n in 0..=5 {
            for mut g in all_colorings(n) {
                let forced = g.partially_compress();
                assert_eq!(forced, g.has_rainbow_triangles(), "order {n}\n{g}");
            }
        }
    }

    #[test]
    fn compression_result_stable_after_two_rounds() {
        for n in 0..=5 {
            for mut g in all_colorings(n) {
                g.partially_compress();
                let second = g.partially_compress();
                let third = g.partially_compress();
                assert_eq!(second, third, "order {n}\n{g}");
            }
        }
    }

    #[test]
    fn compression_result_can_shift_on_third_round_at_order_seven() {
        let mut rng = XorShiftRng::seed_from_u64(0x7777);
        let shifted = (0..20_000)
            .filter(|_| {
                let mut g = ColoredTournament::random(&mut rng, 7);
                g.partially_compress();
                let second = g.partially_compress();
                let third = g.partially_compress();
                second != third
            })
            .count();
        assert!(shifted > 0);
    }

    #[test]
    fn forced_colorings_first_appear_at_order_five() {
        for n in 0..=4 {
            assert!(all_colorings(n).into_iter().all(|mut g| !g.partially_compress()));
        }
        let forced = all_colorings(5)
            .into_iter()
            .skip(1)
            .filter(|g| g.clone().partially_compress())
            .count();
        assert_eq!(forced, 807);
    }

    // -------------------------------------------------------------------------
    // Hashing
    // -------------------------------------------------------------------------

    #[test]
    fn hash_agrees_across_constructors() {
        let rows = vec![vec![], vec![2], vec![1, 0], vec![2, 2, 1]];
        let from_rows = ColoredTournament::from_digits(&rows).unwrap();
        let counter = MixedRadixCounter::from_digits(&rows, 3).unwrap();
        let from_counter = ColoredTournament::from_counter(&counter).unwrap();
        let from_hash = ColoredTournament::from_hash(4, counter.hash_code()).unwrap();
        let from_arcs = ColoredTournament::from_arcs(4, from_rows.arcs()).unwrap();
        let reparsed = parse_coloring(&format!("4\n{from_rows}")).unwrap();

        let h = from_rows.hash_code();
        assert_eq!(h, counter.hash_code());
        for g in [&from_counter, &from_hash, &from_arcs, &reparsed] {
            assert_eq!(g, &from_rows);
            assert_eq!(g.hash_code(), h);
        }
    }

    #[test]
    fn hash_is_injective_on_order_four() {
        let hashes: HashSet<u64> = all_colorings(4).iter().map(ColoredTournament::hash_code).collect();
        assert_eq!(hashes.len(), 729);
    }

    #[test]
    fn recoloring_invalidates_cached_hash() {
        let mut g = ColoredTournament::new(4);
        assert_eq!(g.hash_code(), 0);
        g.set_color(0, 1, 1).unwrap();
        assert_eq!(g.hash_code(), 1);
        g.set_color(3, 2, 2).unwrap();
        assert_eq!(g.hash_code(), 1 + 2 * 3u64.pow(5));
    }

    #[test]
    fn compression_keeps_hash_in_sync() {
        let mut rng = XorShiftRng::seed_from_u64(0xC0FFEE);
        for _ in 0..200 {
            let mut g = ColoredTournament::random(&mut rng, 7);
            let _ = g.hash_code();
            g.partially_compress();
            let fresh = ColoredTournament::from_flat_digits(7, g.digits()).unwrap();
            assert_eq!(g.hash_code(), fresh.hash_code());
        }
    }

    #[test]
    fn from_hash_rejects_oversized_code() {
        assert!(matches!(
            ColoredTournament::from_hash(3, 27),
            Err(TournamentError::HashOutOfRange { order: 3 })
        ));
    }

    // -------------------------------------------------------------------------
    // Subgraphs
    // -------------------------------------------------------------------------

    #[test]
    fn subgraph_preserves_induced_colors() {
        let mut rng = XorShiftRng::seed_from_u64(0xBEEF);
        for _ in 0..100 {
            let g = ColoredTournament::random(&mut rng, 8);
            let mut keep: Vec<usize> = (0..8).filter(|_| rng.random_bool(0.6)).collect();
            let sub = g.subgraph(&keep).unwrap();
            keep.sort_unstable();
            assert_eq!(sub.order(), keep.len());
            for a in 0..keep.len() {
                for b in 0..a {
                    assert_eq!(sub.color(a, b), g.color(keep[a], keep[b]));
                }
            }
        }
    }

    #[test]
    fn subgraph_renumbers_in_original_order() {
        let g = ColoredTournament::from_digits(&[vec![], vec![0], vec![1, 2], vec![2, 1, 0]]).unwrap();
        let sub = g.subgraph(&[3, 1]).unwrap();
        assert_eq!(sub.order(), 2);
        assert_eq!(sub.color(1, 0), g.color(3, 1));
    }

    #[test]
    fn subgraph_rejects_bad_indices() {
        let g = ColoredTournament::new(4);
        assert!(matches!(
            g.subgraph(&[0, 4]),
            Err(TournamentError::VertexOutOfRange { vertex: 4, order: 4 })
        ));
        assert!(matches!(
            g.subgraph(&[2, 1, 2]),
            Err(TournamentError::DuplicateVertex { vertex: 2 })
        ));
    }

    #[test]
    fn delete_vertex_drops_one_vertex() {
        let g = ColoredTournament::from_digits(&[vec![], vec![0], vec![1, 2], vec![2, 1, 0]]).unwrap();
        let sub = g.delete_vertex(0).unwrap();
        assert_eq!(sub.to_rows(), vec![vec![], vec![2], vec![1, 0]]);
        assert!(g.delete_vertex(4).is_err());
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[test]
    fn set_color_validates_arguments() {
        let mut g = ColoredTournament::new(3);
        assert!(matches!(g.set_color(1, 1, 0), Err(TournamentError::SelfArc { vertex: 1 })));
        assert!(matches!(g.set_color(0, 3, 0), Err(TournamentError::VertexOutOfRange { .. })));
        assert!(matches!(g.set_color(0, 2, 3), Err(TournamentError::InvalidColor { color: 3 })));
        g.set_color(0, 2, 1).unwrap();
        assert_eq!(g.try_color(2, 0).unwrap(), 1);
        assert_eq!(g.try_color(0, 2).unwrap(), 1);
    }

    #[test]
    fn arcs_and_counts_cover_every_pair() {
        let g = ColoredTournament::from_digits(&[vec![], vec![0], vec![1, 2], vec![2, 1, 0]]).unwrap();
        let arcs: Vec<ColoredArc> = g.arcs().collect();
        assert_eq!(arcs.len(), g.arc_count());
        assert!(arcs.iter().all(|a| a.source < a.destination));
        assert_eq!(
            arcs[2],
            ColoredArc {
                source: 1,
                destination: 2,
                color: 2
            }
        );
        assert_eq!(g.color_counts(), [2, 2, 2]);
    }

    #[test]
    fn from_flat_digits_checks_length_and_values() {
        assert!(matches!(
            ColoredTournament::from_flat_digits(3, &[0, 1]),
            Err(TournamentError::Truncated { expected: 3, got: 2 })
        ));
        assert!(matches!(
            ColoredTournament::from_flat_digits(3, &[0, 1, 2, 0]),
            Err(TournamentError::TrailingData { expected: 3 })
        ));
        assert!(matches!(
            ColoredTournament::from_flat_digits(3, &[0, 1, 5]),
            Err(TournamentError::DigitOutOfRange { row: 2, col: 1, digit: 5, .. })
        ));
    }

    #[test]
    fn load_digits_replaces_colors_and_hash() {
        let mut g = ColoredTournament::new(3);
        assert_eq!(g.hash_code(), 0);
        g.load_digits(&[0, 1, 2]).unwrap();
        assert_eq!(g.hash_code(), 21);
        assert!(g.load_digits(&[0, 1]).is_err());
        assert!(g.load_digits(&[0, 1, 7]).is_err());
        assert_eq!(g.digits(), &[0, 1, 2]);
    }

    #[test]
    fn from_counter_rejects_wide_base() {
        let counter = MixedRadixCounter::from_digits(&[vec![], vec![3]], 4).unwrap();
        assert!(ColoredTournament::from_counter(&counter).is_err());
    }

    // -------------------------------------------------------------------------
    // Display and persistence
    // -------------------------------------------------------------------------

    #[test]
    fn display_is_tab_separated_triangle() {
        let g = ColoredTournament::from_digits(&[vec![], vec![0], vec![1, 2], vec![2, 1, 0]]).unwrap();
        assert_eq!(g.to_string(), "0\n1\t2\n2\t1\t0\n");
    }

    #[test]
    fn write_and_parse_roundtrip() {
        let mut rng = XorShiftRng::seed_from_u64(0x1234);
        for order in 0..9 {
            let g = ColoredTournament::random(&mut rng, order);
            let mut buf = Vec::new();
            g.write_to(&mut buf).unwrap();
            let text = String::from_utf8(buf).unwrap();
            let back = parse_coloring(&text).unwrap();
            assert_eq!(back, g);
            assert_eq!(back.hash_code(), g.hash_code());
        }
    }

    #[test]
    fn file_roundtrip() {
        let path = std::env::temp_dir().join("rainbow_graph_roundtrip_test.txt");
        let g = ColoredTournament::random(&mut XorShiftRng::seed_from_u64(42), 6);
        g.save_to_file(&path).unwrap();
        let loaded = ColoredTournament::load_from_file(&path).unwrap();
        assert_eq!(loaded, g);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("rainbow_graph_does_not_exist.txt");
        assert!(matches!(
            ColoredTournament::load_from_file(path),
            Err(TournamentError::Io(_))
        ));
    }

    #[test]
    fn parse_accepts_single_line_layout() {
        let g = parse_coloring("3 0 1 2").unwrap();
        assert_eq!(g.to_rows(), vec![vec![], vec![0], vec![1, 2]]);
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(parse_coloring("  \n\n "), Err(TournamentError::Empty)));
    }

    #[test]
    fn parse_rejects_bad_tokens() {
        assert!(matches!(
            parse_coloring("x 0"),
            Err(TournamentError::BadToken { index: 0, .. })
        ));
        assert!(matches!(
            parse_coloring("3\n0\n1 a\n"),
            Err(TournamentError::BadToken { index: 3, .. })
        ));
    }

    #[test]
    fn parse_rejects_short_input() {
        assert!(matches!(
            parse_coloring("4\n0\n1 2\n"),
            Err(TournamentError::Truncated { expected: 6, got: 3 })
        ));
    }

    #[test]
    fn parse_rejects_trailing_data() {
        assert!(matches!(
            parse_coloring("2\n1\n0\n"),
            Err(TournamentError::TrailingData { expected: 1 })
        ));
    }

    #[test]
    fn parse_rejects_color_out_of_range() {
        assert!(matches!(
            parse_coloring("3\n0\n1 3\n"),
            Err(TournamentError::DigitOutOfRange { row: 2, col: 1, digit: 3, .. })
        ));
    }

    mod properties {
        use super::*;
        use crate::counter::choose2;
        use proptest::prelude::*;

        fn coloring() -> impl Strategy<Value = ColoredTournament> {
            (0usize..9).prop_flat_map(|n| {
                prop::collection::vec(0u8..3, choose2(n))
                    .prop_map(move |digits| ColoredTournament::from_flat_digits(n, &digits).unwrap())
            })
        }

        proptest! {
            /// Induced subgraphs keep every selected pair's color.
            #[test]
            fn prop_subgraph_keeps_colors(g in coloring(), mask in any::<u16>()) {
                let keep: Vec<usize> = (0..g.order()).filter(|&v| mask & (1 << v) != 0).collect();
                let sub = g.subgraph(&keep).unwrap();
                prop_assert_eq!(sub.order(), keep.len());
                for a in 0..keep.len() {
                    for b in 0..a {
                        prop_assert_eq!(sub.color(a, b), g.color(keep[a], keep[b]));
                    }
                }
            }

            /// The persisted text reloads to the same labeled coloring.
            #[test]
            fn prop_text_roundtrip(g in coloring()) {
                let mut buf = Vec::new();
                g.write_to(&mut buf).unwrap();
                let back = parse_coloring(std::str::from_utf8(&buf).unwrap()).unwrap();
                prop_assert_eq!(back.hash_code(), g.hash_code());
                prop_assert_eq!(back, g);
            }

            /// Compression never leaves a rainbow triangle unless it says so.
            #[test]
            fn prop_compression_reports_remaining_rainbows(g in coloring()) {
                let mut g = g;
                let forced = g.partially_compress();
                prop_assert_eq!(forced, g.has_rainbow_triangles());
            }
        }
    }
}
