// Déclaration des modules
pub mod crypto_error;
pub mod paillier;
pub mod key_management;

pub use crate::paillier::math;
pub use crate::paillier::p_keygen;
pub use crate::paillier::p_encrypt;
pub use crate::paillier::p_decrypt;

// Fonctions mathématiques principales
pub use crate::paillier::math::{
    gcd, is_probable_prime, l_function, lcm, mod_inverse, reduced_residue_system,
    sieve_of_eratosthenes,
};

// Types depuis keygen
pub use p_keygen::p_keygen::{KeyPair, PublicKey, SecretKey, DEFAULT_KEY_BITS, MIN_KEY_BITS};

// Erreur centralisée
pub use crypto_error::CryptoError;

// Registre de clés thread-safe — point d'entrée pour les serveurs multi-threadés
pub use key_management::{KeyRegistry, RegistryError};
