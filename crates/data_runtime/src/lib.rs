//! data_runtime: static content schemas and configuration loaders.
//!
//! Everything here is read once at startup. Files live under the workspace
//! `data/` directory (see [`loader::data_root`]); missing config files fall
//! back to built-in defaults so headless tools and tests run anywhere.

pub mod loader;
pub mod zone;
pub mod configs {
    pub mod avatar;
    pub mod telemetry;
}
