//! Structural discovery over declared shapes.
//!
//! Both walks run once per type at registration time and only look at
//! shapes, never at live values.

pub mod capability;
pub mod hooks;

pub use capability::{CapabilityPath, find_capabilities};
pub use hooks::{HookKind, HookSet, discover_hooks};
