//! Exhaustive two-phase search for minimal rainbow-forcing colorings.
//!
//! Phase A enumerates every coloring of `n0` vertices, compresses it and
//! records the hashes of those that still contain a rainbow triangle. Phase B
//! does the same for `n0 + 1` vertices and keeps a forced coloring only if none
//! of its single-vertex-deleted subgraphs hashes into the Phase A set.
//!
//! The hash is a labeled fingerprint, not an isomorphism certificate, so the
//! Phase B filter is sound but incomplete: a discovery may still contain a
//! relabeled copy of a smaller forced coloring.

use crate::counter::{MixedRadixCounter, state_count};
use crate::error::{Result, TournamentError};
use crate::graph::{COLORS, ColoredTournament};
use crate::invariant::PathInvariant;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::Range;
use std::time::Instant;
use tracing::{debug, info};

// ============================================================================
// Configuration
// ============================================================================

/// Search configuration parameters.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Vertex count `n0` of Phase A; Phase B runs on `n0 + 1`.
    pub small_order: usize,
    /// Number of disjoint counter ranges per phase. `1` runs a single counter
    /// on the calling thread.
    pub shards: usize,
    /// Print each discovery's triangular table along with its summary line.
    pub print_graphs: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let shards = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1);

        Self {
            small_order: 4,
            shards,
            print_graphs: false,
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// A forced coloring of `n0 + 1` vertices none of whose vertex-deleted
/// subgraphs was recorded in Phase A.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Discovery {
    /// Canonical hash of the compressed coloring.
    pub hash: u64,
    /// The compressed coloring.
    pub tournament: ColoredTournament,
}

/// Outcome of [`run_search`].
#[derive(Clone, Debug, Default)]
pub struct SearchReport {
    /// Phase A vertex count.
    pub small_order: usize,
    /// Distinct compressed hashes that still force a rainbow at `n0`.
    pub small_forced: usize,
    /// Colorings of `n0 + 1` vertices (with repeats) still forced after compression.
    pub candidates: usize,
    /// Candidates discarded because a vertex-deleted subgraph was already known.
    pub rejected: usize,
    /// Accepted discoveries, deduplicated and sorted by hash.
    pub discoveries: Vec<Discovery>,
}

// ============================================================================
// Public API
// ============================================================================

/// Runs both phases to exhaustion and returns the accepted discoveries.
///
/// # Errors
/// Returns [`crate::TournamentError::SpaceTooLarge`] if either enumeration
/// cycle does not fit in `u64`.
pub fn run_search(cfg: &SearchConfig) -> Result<SearchReport> {
    let n0 = cfg.small_order;
    let shards = cfg.shards.max(1);
    let n1 = n0.checked_add(1).ok_or(TournamentError::SpaceTooLarge {
        order: n0,
        base: COLORS as u8,
    })?;
    info!(small_order = n0, large_order = n1, shards, "starting rainbow search");

    let small_total = total_colorings(n0)?;
    let large_total = total_colorings(n1)?;

    let start = Instant::now();
    let small_ranges = shard_ranges(small_total, shards);
    let known_small = if shards == 1 {
        forced_hashes(n0, small_ranges[0].clone())?
    } else {
        small_ranges
            .into_par_iter()
            .map(|range| forced_hashes(n0, range))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .fold(HashSet::new(), |mut acc, set| {
                acc.extend(set);
                acc
            })
    };
    info!(
        order = n0,
        forced = known_small.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "phase A complete"
    );

    // Phase B may only start once every Phase A hash is known.
    let start = Instant::now();
    let large_ranges = shard_ranges(large_total, shards);
    let tallies = if shards == 1 {
        vec![scan_large(n1, large_ranges[0].clone(), &known_small)?]
    } else {
        large_ranges
            .into_par_iter()
            .map(|range| scan_large(n1, range, &known_small))
            .collect::<Result<Vec<_>>>()?
    };

    let mut report = SearchReport {
        small_order: n0,
        small_forced: known_small.len(),
        ..SearchReport::default()
    };
    let mut accepted = BTreeMap::new();
    for tally in tallies {
        report.candidates += tally.candidates;
        report.rejected += tally.rejected;
        accepted.extend(tally.accepted);
    }
    report.discoveries = accepted
        .into_iter()
        .map(|(hash, tournament)| Discovery { hash, tournament })
        .collect();
    info!(
        order = n1,
        candidates = report.candidates,
        rejected = report.rejected,
        discoveries = report.discoveries.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "phase B complete"
    );
    Ok(report)
}

/// Prints one line per discovery and the final total.
pub fn print_report(report: &SearchReport, print_graphs: bool) {
    for (k, d) in report.discoveries.iter().enumerate() {
        let rainbows = d.tournament.number_of_rainbow_triangles();
        let signature = PathInvariant::compute(&d.tournament).signature();
        println!(
            "#{k}: order {} hash {} rainbow triangles {rainbows} path signature {signature:?}",
            d.tournament.order(),
            d.hash,
        );
        if print_graphs {
            print!("{}", d.tournament);
        }
    }
    println!(
        "Total: {} new minimal rainbow-forcing colorings on {} vertices ({} forced on {})",
        report.discoveries.len(),
        report.small_order + 1,
        report.small_forced,
        report.small_order
    );
}

/// Returns whether no single-vertex-deleted subgraph of `graph` hashes into `known`.
///
/// # Errors
/// Propagates subgraph errors (none occur for in-range vertices).
pub fn is_new_minimal(graph: &ColoredTournament, known: &HashSet<u64>) -> Result<bool> {
    for v in 0..graph.order() {
        let sub = graph.delete_vertex(v)?;
        if known.contains(&sub.hash_code()) {
            debug!(hash = graph.hash_code(), deleted = v, "candidate contains known coloring");
            return Ok(false);
        }
    }
    Ok(true)
}

// ============================================================================
// Sampling
// ============================================================================

/// Outcome of [`sample_forced`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleReport {
    /// Vertex count sampled.
    pub order: usize,
    /// Colorings drawn.
    pub samples: u64,
    /// Draws still forced after compression.
    pub forced: u64,
    /// Distinct compressed hashes among the forced draws.
    pub distinct: BTreeSet<u64>,
}

/// Draws `samples` uniformly random colorings of `order` vertices across
/// `shards` workers and tallies the ones compression cannot free of rainbows.
///
/// Results depend only on `(order, samples, seed, shards)`.
pub fn sample_forced(order: usize, samples: u64, seed: u64, shards: usize) -> SampleReport {
    let shards = shards.max(1);
    info!(order, samples, seed, shards, "sampling random colorings");
    let per_shard = samples / shards as u64;
    let extra = samples % shards as u64;

    let partials: Vec<SampleReport> = (0..shards)
        .into_par_iter()
        .map(|worker| {
            let quota = per_shard + u64::from((worker as u64) < extra);
            let mut rng = SmallRng::seed_from_u64(splitmix64(seed ^ worker as u64));
            let mut part = SampleReport {
                order,
                samples: quota,
                ..SampleReport::default()
            };
            for _ in 0..quota {
                let mut g = ColoredTournament::random(&mut rng, order);
                if g.partially_compress() {
                    part.forced += 1;
                    part.distinct.insert(g.hash_code());
                }
            }
            part
        })
        .collect();

    let mut report = SampleReport {
        order,
        ..SampleReport::default()
    };
    for part in partials {
        report.samples += part.samples;
        report.forced += part.forced;
        report.distinct.extend(part.distinct);
    }
    info!(
        forced = report.forced,
        distinct = report.distinct.len(),
        "sampling complete"
    );
    report
}

// ============================================================================
// Phases
// ============================================================================

#[derive(Debug, Default)]
struct LargeTally {
    candidates: usize,
    rejected: usize,
    accepted: BTreeMap<u64, ColoredTournament>,
}

/// `3^(n(n-1)/2)`, the length of the counter cycle.
fn total_colorings(order: usize) -> Result<u64> {
    state_count(order, COLORS as u8)
}

/// Splits the non-zero counter values `1..total` into at most `shards`
/// contiguous, non-empty ranges. Always returns at least one range.
fn shard_ranges(total: u64, shards: usize) -> Vec<Range<u64>> {
    let span = total.saturating_sub(1);
    let shards = (shards.max(1) as u64).min(span.max(1));
    let step = span / shards;
    let extra = span % shards;
    let mut ranges = Vec::with_capacity(shards as usize);
    let mut lo = 1u64;
    for i in 0..shards {
        let len = step + u64::from(i < extra);
        ranges.push(lo..lo + len);
        lo += len;
    }
    ranges
}

/// Phase A over one counter range: hashes of compressed colorings that stay forced.
fn forced_hashes(order: usize, range: Range<u64>) -> Result<HashSet<u64>> {
    debug!(order, start = range.start, end = range.end, "phase A shard");
    let mut found = HashSet::new();
    if range.is_empty() {
        return Ok(found);
    }
    let mut counter = MixedRadixCounter::from_value(order, COLORS as u8, range.start)?;
    let mut graph = ColoredTournament::new(order);
    for _ in range {
        graph.load_digits(counter.digits())?;
        if graph.partially_compress() {
            found.insert(graph.hash_code());
        }
        counter.increment();
    }
    Ok(found)
}

/// Phase B over one counter range.
fn scan_large(order: usize, range: Range<u64>, known_small: &HashSet<u64>) -> Result<LargeTally> {
    debug!(order, start = range.start, end = range.end, "phase B shard");
    let mut tally = LargeTally::default();
    if range.is_empty() {
        return Ok(tally);
    }
    let mut counter = MixedRadixCounter::from_value(order, COLORS as u8, range.start)?;
    let mut graph = ColoredTournament::new(order);
    for _ in range {
        graph.load_digits(counter.digits())?;
        if graph.partially_compress() {
            tally.candidates += 1;
            if is_new_minimal(&graph, known_small)? {
                tally
                    .accepted
                    .entry(graph.hash_code())
                    .or_insert_with(|| graph.clone());
            } else {
                tally.rejected += 1;
            }
        }
        counter.increment();
    }
    Ok(tally)
}

/// SplitMix64 mixer for deriving per-worker seeds from a base seed.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ============================================================================
// Tests
// ============================================================================
