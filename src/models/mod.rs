pub mod credential;
pub mod ddo;
pub mod did;
