//! Domain models shared by the lifecycle commands, the repository port and the HTTP adapter.

pub mod location;
pub mod warehouse;

pub use location::Location;
pub use warehouse::Warehouse;
