pub mod datatoken;
pub mod nft_factory;
pub mod params;
