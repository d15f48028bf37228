pub mod admission;
pub mod types;
pub mod queries;

pub use admission::*;
pub use types::*;
pub use queries::*;
