//! # jumpr core
//!
//! Everything between the inventory answer and the ssh hand-off:
//!
//! * **[`probe`]**: one concurrent reachability check per host and protocol,
//!   each exposed as a receive-once [`probe::ProbeHandle`].
//! * **[`snapshot`]**: turns raw inventory records into the ordered host list
//!   of one discovery cycle and starts its probes.
//! * **[`network`]**: the [`network::dial::Dialer`] seam and the ssh tunnel
//!   that can stand in for direct TCP while the inventory is queried.
//! * **[`inventory`]** and **[`discovery`]**: the inventory query and the
//!   service that runs one full cycle.
//! * **[`render`]**, **[`watch`]**, **[`select`]**, **[`launch`]**: row
//!   collection, the refresh loop, operator selection and the ssh launcher.

pub mod discovery;
pub mod inventory;
pub mod launch;
pub mod network;
pub mod probe;
pub mod render;
pub mod select;
pub mod snapshot;
pub mod watch;
