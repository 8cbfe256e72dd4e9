//! Integration tests for hn-harvest

mod crawl_tests;
