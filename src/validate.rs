//! Deterministic validation of persisted colorings and the bundled witnesses.

use crate::error::Result;
use crate::graph::{COLORS, ColoredTournament, parse_coloring};
use crate::invariant::PathInvariant;
use std::fmt;
use std::path::Path;

// ============================================================================
// Report
// ============================================================================

/// What compression and the rainbow checks say about one coloring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of vertices.
    pub order: usize,
    /// Rainbow triangles in the coloring as given.
    pub rainbow_triangles: usize,
    /// Whether compression leaves an irreducible rainbow triangle.
    pub forced: bool,
    /// Forced, and no single-vertex-deleted subgraph of the compressed
    /// coloring is forced after its own compression.
    pub minimal: bool,
    /// Canonical hash of the compressed coloring.
    pub compressed_hash: u64,
    /// Path-invariant signature of the compressed coloring.
    pub signature: Vec<[u32; COLORS]>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "order: {}", self.order)?;
        writeln!(f, "rainbow triangles: {}", self.rainbow_triangles)?;
        writeln!(f, "forced after compression: {}", self.forced)?;
        writeln!(f, "minimal: {}", self.minimal)?;
        writeln!(f, "compressed hash: {}", self.compressed_hash)?;
        write!(f, "path signature: {:?}", self.signature)
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Validates a coloring; the argument is left untouched.
///
/// # Errors
/// Propagates vertex-deletion errors from the minimality check.
pub fn validate_tournament(graph: &ColoredTournament) -> Result<ValidationReport> {
    let rainbow_triangles = graph.number_of_rainbow_triangles();
    let mut compressed = graph.clone();
    let forced = compressed.partially_compress();
    let mut minimal = forced;
    if forced {
        for v in 0..compressed.order() {
            if deleted_is_forced(&compressed, v)? {
                minimal = false;
                break;
            }
        }
    }

    Ok(ValidationReport {
        order: graph.order(),
        rainbow_triangles,
        forced,
        minimal,
        compressed_hash: compressed.hash_code(),
        signature: PathInvariant::compute(&compressed).signature(),
    })
}

/// Loads a persisted coloring and validates it.
///
/// # Errors
/// Returns an error if the file cannot be read or is malformed.
pub fn validate_file(path: impl AsRef<Path>) -> Result<ValidationReport> {
    let graph = ColoredTournament::load_from_file(path)?;
    validate_tournament(&graph)
}

/// Checks the bundled witnesses:
/// - `forced_n5.txt` forces a rainbow triangle and is minimal
/// - `repairable_n3.txt` is rainbow but compression repairs it
///
/// # Errors
/// Returns an error message if a bundled coloring fails to parse or to meet
/// its expectation.
pub fn validate_known_witnesses() -> std::result::Result<(), String> {
    let forced = check_witness(include_str!("../witnesses/forced_n5.txt"), "forced_n5.txt")?;
    if !forced.forced || !forced.minimal {
        return Err(format!(
            "forced_n5.txt: expected a minimal forced coloring, got forced={} minimal={}",
            forced.forced, forced.minimal
        ));
    }

    let repairable = check_witness(
        include_str!("../witnesses/repairable_n3.txt"),
        "repairable_n3.txt",
    )?;
    if repairable.rainbow_triangles == 0 || repairable.forced {
        return Err(format!(
            "repairable_n3.txt: expected a repairable rainbow, got {} rainbow triangles, forced={}",
            repairable.rainbow_triangles, repairable.forced
        ));
    }
    Ok(())
}

// ============================================================================
// Internal
// ============================================================================

fn check_witness(text: &str, name: &str) -> std::result::Result<ValidationReport, String> {
    parse_coloring(text)
        .and_then(|graph| validate_tournament(&graph))
        .map_err(|e| format!("{name}: {e}"))
}

fn deleted_is_forced(graph: &ColoredTournament, v: usize) -> Result<bool> {
    let mut sub = graph.delete_vertex(v)?;
    Ok(sub.partially_compress())
}

// ============================================================================
// Tests
// ============================================================================
