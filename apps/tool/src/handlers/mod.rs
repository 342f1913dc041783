pub mod ini;
pub mod keygen;
pub mod transport;
pub mod trust;
