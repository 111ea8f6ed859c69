//! # Rainbow Search Engine
//!
//! Exhaustive search over edge-3-colorings of complete graphs ("colored
//! tournaments") for colorings that cannot be repaired into rainbow-free ones.
//!
//! This crate provides:
//! - A mixed-radix counter that visits every coloring of `K_n` exactly once.
//! - A colored tournament graph with an `O(n^3)` local repair heuristic,
//!   brute-force rainbow triangle detection, induced subgraphs and a base-3
//!   positional hash.
//! - A color-avoiding longest-path invariant with an in-place validity check.
//! - A two-phase search driver that reports forced colorings on `n0 + 1`
//!   vertices containing no known forced coloring on `n0` vertices.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rainbow::search::{SearchConfig, print_report, run_search};
//!
//! let cfg = SearchConfig {
//!     small_order: 5,
//!     ..Default::default()
//! };
//! let report = run_search(&cfg).expect("order 6 fits the counter");
//! print_report(&report, false);
//! ```
//!
//! ## Working with Colorings Directly
//!
//! ```
//! use rainbow::graph::ColoredTournament;
//!
//! // arc(1,0) = 0, arc(2,0) = 1, arc(2,1) = 2
//! let mut g = ColoredTournament::from_digits(&[vec![], vec![0], vec![1, 2]]).unwrap();
//! assert!(g.has_rainbow_triangles());
//! assert_eq!(g.number_of_rainbow_triangles(), 1);
//!
//! // A single triangle can always be repaired.
//! assert!(!g.partially_compress());
//! assert!(!g.has_rainbow_triangles());
//! ```
//!
//! ## Enumerating
//!
//! ```
//! use rainbow::counter::MixedRadixCounter;
//!
//! let mut counter = MixedRadixCounter::ternary(3);
//! let mut visited = 1; // the all-zero start
//! while counter.advance().is_some() {
//!     visited += 1;
//! }
//! assert_eq!(visited, 27);
//! ```
//!
//! ## Modules
//!
//! - [`counter`]: Mixed-radix enumeration of triangular digit matrices.
//! - [`graph`]: Colored tournaments, compression, hashing, text format.
//! - [`invariant`]: Color-avoiding longest-path table.
//! - [`search`]: Exhaustive two-phase driver and random sampling.
//! - [`validate`]: Validation of persisted colorings and bundled witnesses.
//!
//! ## Performance Notes
//!
//! - The enumeration cycle is `3^(n(n-1)/2)`; orders up to 6 finish in
//!   seconds, order 7 needs about `10^10` compressions.
//! - Hashes are exact up to order 9 (`3^36 < 2^64`).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::needless_range_loop)] // Often clearer for matrix indexing
#![allow(clippy::doc_markdown)]
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod counter;
pub mod error;
pub mod graph;
pub mod invariant;
pub mod search;
pub mod validate;

pub use error::{Result, TournamentError};

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::counter::MixedRadixCounter;
    pub use crate::error::{Result, TournamentError};
    pub use crate::graph::{COLORS, Color, ColoredArc, ColoredTournament, parse_coloring};
    pub use crate::invariant::PathInvariant;
    pub use crate::search::{SearchConfig, SearchReport, run_search, sample_forced};
    pub use crate::validate::{ValidationReport, validate_file, validate_tournament};
}
