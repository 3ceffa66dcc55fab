// ABOUTME: Sealed trait pattern for provider capability traits.
// ABOUTME: Prevents external implementations, allowing non-breaking evolution.

/// Only types inside this crate can implement the provider traits.
pub trait Sealed {}
