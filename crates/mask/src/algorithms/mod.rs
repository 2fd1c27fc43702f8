pub mod preprocessing;
pub mod extraction;
pub mod detection;
pub mod points;

pub use preprocessing::*;
pub use extraction::*;
pub use detection::*;
pub use points::*;
