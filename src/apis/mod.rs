// Shared markup helpers and the source registry
pub mod common;
pub mod factory;

// Sources with extraction rules
pub mod aninat;
pub mod galeria_nac;
pub mod gam;
pub mod mnba;
pub mod patricia_ready;
pub mod precolombino;

// Registered sources without extraction rules
pub mod pending;

pub use factory::{build_registry, create_extractor, supported_sources};
