//! Custom extractors.

mod params;

pub use params::Params;
