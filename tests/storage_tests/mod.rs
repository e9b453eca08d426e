//! Table storage tests: file format and manager

mod table_tests;
