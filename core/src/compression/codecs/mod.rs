pub mod deflate;
pub mod stored;

pub use deflate::*;
pub use stored::*;
