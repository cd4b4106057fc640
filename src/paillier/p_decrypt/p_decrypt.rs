use num_bigint::BigUint;
use crate::paillier::math::l_function;
use crate::paillier::p_keygen::p_keygen::SecretKey;
use crate::paillier::p_keygen::PublicKey;
use crate::crypto_error::CryptoError;

// Déchiffrement Paillier d'une séquence : m = L(c^lambda mod n²) · mu  mod n
// Un plaintext par chiffré, même ordre, même longueur.
pub fn p_decrypt(
    ciphertexts: &[BigUint],
    pk: &PublicKey,
    sk: &SecretKey,
) -> Result<Vec<BigUint>, CryptoError> {
    let mut plaintexts = Vec::with_capacity(ciphertexts.len());

    for c in ciphertexts {
        if c >= &pk.n_squared {
            return Err(CryptoError::CiphertextOutOfRange);
        }

        // Calcule c^lambda mod n²
        let c_lambda = c.modpow(&sk.lambda, &pk.n_squared);

        // Calcule L(c^lambda mod n²)
        let l_c_lambda = l_function(&c_lambda, &pk.n);

        // Calcule m = L(c^lambda mod n²) * mu (mod n)
        plaintexts.push((&l_c_lambda * &sk.mu) % &pk.n);
    }

    Ok(plaintexts)
}
