pub mod products;
pub mod profile;
