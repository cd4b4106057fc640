use num_bigint::BigUint;
use rand::Rng;
use rand_core::OsRng;
use crate::paillier::p_keygen::PublicKey;
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Chiffrement Paillier d'une séquence : c = g^m * r^n  mod n²
//
// La séquence entière est validée AVANT le moindre chiffrement : toute
// valeur hors de [0, n) fait échouer l'appel complet avec la liste des
// valeurs fautives — jamais de chiffrement partiel.
//
// Le facteur d'aveuglement r est tiré uniformément dans le système résiduel
// réduit de n, matérialisé dans la clé au premier appel puis réutilisé.
// Rechiffrer le même m produit un chiffré différent avec une probabilité
// écrasante (r frais à chaque élément).
// ---------------------------------------------------------------------------
pub fn p_encrypt(plaintexts: &[BigUint], pk: &PublicKey) -> Result<Vec<BigUint>, CryptoError> {
    // Validation de l'entrée — erreur récupérable, pas de panic
    let offending: Vec<BigUint> = plaintexts
        .iter()
        .filter(|m| *m >= &pk.n)
        .cloned()
        .collect();
    if !offending.is_empty() {
        return Err(CryptoError::MessageOutOfRange { offending });
    }

    // Matérialise (premier appel) ou relit (appels suivants) le cache
    let residues = pk.residues()?;
    // n = p·q est impair, donc 2 est toujours copremier avec n : jamais vide
    debug_assert!(!residues.is_empty());

    let mut rng = OsRng;
    let mut ciphertexts = Vec::with_capacity(plaintexts.len());

    for m in plaintexts {
        let r = &residues[rng.gen_range(0..residues.len())];

        // c = g^m * r^n  mod n²
        let g_m = pk.g.modpow(m, &pk.n_squared);
        let r_n = r.modpow(&pk.n, &pk.n_squared);
        ciphertexts.push((&g_m * &r_n) % &pk.n_squared);
    }

    Ok(ciphertexts)
}

// ============================================================================
// Tests unitaires
// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use crate::paillier::p_keygen::p_keygen;

    #[test]
    fn test_out_of_range_rejects_whole_sequence() {
        let kp = p_keygen(16).unwrap();
        let pk = &kp.public_key;

        let n_plus_1 = &pk.n + BigUint::one();
        let input = vec![BigUint::from(7u32), pk.n.clone(), n_plus_1.clone()];

        match p_encrypt(&input, pk) {
            Err(CryptoError::MessageOutOfRange { offending }) => {
                // les deux valeurs fautives sont énumérées, la valide non
                assert_eq!(offending, vec![pk.n.clone(), n_plus_1]);
            }
            other => panic!("attendu MessageOutOfRange, obtenu {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_ok() {
        let kp = p_keygen(16).unwrap();
        assert_eq!(p_encrypt(&[], &kp.public_key).unwrap(), vec![]);
    }

    #[test]
    fn test_output_shape_and_range() {
        let kp = p_keygen(16).unwrap();
        let pk = &kp.public_key;

        let input: Vec<BigUint> = [0u32, 1, 255].iter().map(|&v| BigUint::from(v)).collect();
        let output = p_encrypt(&input, pk).unwrap();

        assert_eq!(output.len(), input.len());
        for c in &output {
            assert!(c < &pk.n_squared);
        }
    }

    #[test]
    fn test_encryption_is_probabilistic() {
        let kp = p_keygen(16).unwrap();
        let pk = &kp.public_key;

        let m = vec![BigUint::from(42u32); 3];
        let c1 = p_encrypt(&m, pk).unwrap();
        let c2 = p_encrypt(&m, pk).unwrap();

        // r frais à chaque chiffrement : les deux séquences diffèrent
        // (collision simultanée des trois facteurs d'aveuglement exclue)
        assert_ne!(c1, c2);
    }
}
