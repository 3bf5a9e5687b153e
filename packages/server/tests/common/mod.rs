#![allow(dead_code, unused_imports)]

pub mod harness;

pub use harness::{build_test_app, send_request, TestHarness};
