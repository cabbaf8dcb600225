//! Integration tests for the `arch_conform::check!()` macro.
//!
//! The generated test loads the fixture snapshots and runs the minimal
//! preset over them end to end.

arch_conform::check!(
    preset = "minimal",
    config = "crates/arch-conform/tests/test-config.toml",
);
