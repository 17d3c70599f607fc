//! The rewrite stages, applied in order after analysis:
//!
//! 1. [`iife`] moves the program into a wrapper function, hoisting `var`,
//!    `function`, and `class` bindings onto the host global and threading
//!    `let`/`const` through the persisted lexical context.
//! 2. [`uncatchable`] rewrites every user `try` statement so uncatchable
//!    errors pass through `catch` handlers and skip `finally` blocks.
//! 3. [`awaitify`] inserts the implicit-await machinery itself.

pub mod awaitify;
pub mod build;
pub mod iife;
pub mod names;
pub mod uncatchable;

/// Registry keys of the well-known symbols shared with the runtime support
/// library.
pub const SYMBOL_LEXICAL_CONTEXT: &str = "@@mongosh.lexicalContext";
pub const SYMBOL_SYNTHETIC_PROMISE: &str = "@@mongosh.syntheticPromise";
pub const SYMBOL_SYNTHETIC_ASYNC_ITERABLE: &str = "@@mongosh.syntheticAsyncIterable";
pub const SYMBOL_UNCATCHABLE: &str = "@@mongosh.uncatchable";
