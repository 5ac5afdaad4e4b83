//! Integration tests for field declarations and record layouts

mod layout_tests;
