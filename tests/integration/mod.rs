//! Integration tests

pub mod end_to_end;
