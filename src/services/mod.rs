pub mod pairing;

pub use pairing::PairingService;
