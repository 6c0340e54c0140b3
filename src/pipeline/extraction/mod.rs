pub mod types;
pub mod normalize;
pub mod confidence;

pub use types::*;
pub use normalize::*;
pub use confidence::*;
