//! Structural trace events.
//!
//! With the `tracing` feature enabled, [`trace_structure!`] forwards to
//! `tracing::trace!` under the `trie_vector::structure` target. Without it the
//! macro expands to nothing.

#[cfg(feature = "tracing")]
macro_rules! trace_structure {
    ($($argument:tt)*) => {
        ::tracing::trace!(target: "trie_vector::structure", $($argument)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_structure {
    ($($argument:tt)*) => {};
}
