pub mod p_keygen;

pub use p_keygen::{
    p_keygen, p_keygen_default, KeyPair, PublicKey, SecretKey, DEFAULT_KEY_BITS, MIN_KEY_BITS,
};
