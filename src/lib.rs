// Root app shell and re-exports for workspace crates used by bins.
pub use client_core as client;
pub use collision_static as collision;
pub use data_runtime as data;
pub use sim_core as sim;
pub use ux_hud as hud;

pub mod harness;
