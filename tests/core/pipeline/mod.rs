//! Pipeline tests
//!
//! Full runs through blob store, normalizer, chunker, scorer, router
//! and catalog.

mod test_failures;
mod test_scenarios;
