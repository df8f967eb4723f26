/// Target masks and placement candidate enumeration
pub mod candidates;
/// Walkable-cell reachability measurement
pub mod connectivity;
/// Spanning-tree corridor carving
pub mod corridors;
/// Resumable chunked generation job
pub mod job;
/// Layout configuration and the retrying generator
pub mod layout;
/// Weighted constrained pattern placement
pub mod placement;
/// Per-layout placement pass registry and refresh dispatch
pub mod registry;
/// Random non-overlapping room sampling
pub mod rooms;
/// Terrain painting mode
pub mod terrain;
