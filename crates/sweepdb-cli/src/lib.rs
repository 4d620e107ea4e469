//! sweepdb-cli
//! ===========
//!
//! Command-line interface for the `sweepdb-core` street-cleaning schedule
//! engine.
//!
//! This crate primarily provides a binary (`sweepdb`). We include a small
//! library target so that docs.rs renders a documentation page and shows this
//! overview. See the README for full usage examples.
//!
//! Quick start
//! -----------
//!
//! Install the CLI:
//!
//! ```text
//! cargo install sweepdb-cli
//! ```
//!
//! Basic usage:
//!
//! ```text
//! sweepdb --help
//! sweepdb stats
//! sweepdb --today 2024-06-01 list --tier urgent
//! sweepdb hit 41.9405 -87.6543
//! sweepdb --wards 44 section 44 3
//! ```
//!
//! For programmatic access to the registry, hit-testing and status tiers,
//! use the [`sweepdb-core`] crate directly.
//!
#![cfg_attr(docsrs, feature(doc_cfg))]

// This library target intentionally exposes no API; the binary is the primary
// deliverable. The presence of this file enables a rendered page on docs.rs.
