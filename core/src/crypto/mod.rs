pub mod types;
pub mod key_material;
pub mod kdf;
pub mod cipher;

pub use types::*;
pub use key_material::*;
pub use kdf::*;
pub use cipher::*;
