//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-sync`, `core-catalog`, `provider-jwplayer`).
//! Tools that want to drive a reconciliation pass programmatically can depend
//! on `sms-sync-workspace` and enable the documented features without wiring
//! each crate individually.
//!
//! - `reconcile` (default): catalog loading, planners and the job executor.
//! - `jwplayer`: the JW Platform gateway and the desktop HTTP client.

#[cfg(feature = "reconcile")]
pub use core_catalog as catalog;
#[cfg(feature = "reconcile")]
pub use core_sync as sync;

#[cfg(feature = "jwplayer")]
pub use bridge_desktop as desktop;
#[cfg(feature = "jwplayer")]
pub use provider_jwplayer as jwplayer;
