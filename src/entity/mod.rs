pub mod candidates;
pub mod catalog;
pub mod context;
pub mod types;

pub use candidates::CandidatesInfo;
pub use catalog::{load_catalog, Catalog, SurfaceFormEntry};
pub use context::{tokenize, EntityContext};
pub use types::{normalize, Entity, EntityScore};
