//! Broadcast layer: turns connection lifecycle and update events into
//! registry mutations and fan-out.

pub mod router;

pub use router::BroadcastRouter;
