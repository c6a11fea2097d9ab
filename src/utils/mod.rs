pub mod conversion;
pub mod crypto;
pub mod logging;
pub mod random;
pub mod serialization;
