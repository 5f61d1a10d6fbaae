// Utility functions
pub mod error;
pub mod multipart;
pub mod upload;
pub mod validation;

pub use error::*;
pub use upload::*;
pub use validation::*;
