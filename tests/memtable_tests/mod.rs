//! MemTable tests
