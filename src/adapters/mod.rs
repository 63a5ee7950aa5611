//! Adapters: implementations of ports and other external I/O

pub mod profile_store;
pub mod simulated_source;

pub use profile_store::ProfileStore;
pub use simulated_source::SimulatedSource;
