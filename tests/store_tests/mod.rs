//! Store tests
