//! Cross-crate integration tests for the aac workspace live under `tests/`.
