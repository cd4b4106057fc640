use num_bigint::BigUint;
use num_traits::One;
use std::sync::OnceLock;
use zeroize::Zeroize;
use crate::paillier::math::{
    gcd, generate_probable_prime, generate_probable_prime_in_range, l_function, lcm,
    mod_inverse, reduced_residue_system,
};
use crate::crypto_error::CryptoError;

// Taille de clé par défaut (bits de n)
pub const DEFAULT_KEY_BITS: u64 = 256;

// Taille minimale acceptée — en dessous, le découpage nbits/2 ne laisse
// plus assez de place pour deux premiers distincts utilisables
pub const MIN_KEY_BITS: u64 = 16;

// Plafonds de rejet des boucles de génération. La condition
// gcd(pq, (p-1)(q-1)) != 1 et les valeurs L non inversibles sont rares :
// atteindre ces plafonds indique un problème structurel, pas de la malchance.
const MAX_PAIR_ATTEMPTS: u32 = 64;
const MAX_GENERATOR_ATTEMPTS: u32 = 64;

// ============================================================================
// Clé publique Paillier — pas de données secrètes, pas de zeroize nécessaire
//
// `residue_cache` est le seul état mutable de tout le schéma : le système
// résiduel réduit de n, matérialisé paresseusement au premier chiffrement
// puis mémoïsé. OnceLock = initialisation exclusive par un seul écrivain,
// lectures partagées ensuite.
// ============================================================================
#[derive(Clone, Debug)]
pub struct PublicKey {
    pub n:         BigUint,
    pub g:         BigUint,
    pub n_squared: BigUint,
    residue_cache: OnceLock<Vec<BigUint>>,
}

impl PublicKey {
    pub fn new(n: BigUint, g: BigUint) -> Self {
        let n_squared = &n * &n;
        PublicKey {
            n,
            g,
            n_squared,
            residue_cache: OnceLock::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Système résiduel réduit de n — source des facteurs d'aveuglement r.
    //
    // Premier appel : calcul complet (crible jusqu'à n + filtre gcd) puis
    // insertion dans le cache. Appels suivants : lecture seule, idempotent.
    // En cas de course entre threads, chacun calcule sa copie et le premier
    // arrivé publie la sienne ; les autres copies sont jetées.
    // -----------------------------------------------------------------------
    pub fn residues(&self) -> Result<&[BigUint], CryptoError> {
        if let Some(cached) = self.residue_cache.get() {
            return Ok(cached);
        }
        let computed = reduced_residue_system(&self.n)?;
        Ok(self.residue_cache.get_or_init(|| computed))
    }
}

// ============================================================================
// Helper : efface les octets internes d'un BigUint
// ============================================================================
fn zeroize_biguint(n: &mut BigUint) {
    let bits = n.bits() as usize;
    if bits > 0 {
        *n = BigUint::from_bytes_be(&vec![0u8; (bits + 7) / 8]);
    }
    *n = BigUint::default();
}

// ============================================================================
// Clé secrète Paillier — ZEROISÉE À LA DESTRUCTION
//
// p et q sont des artefacts de construction conservés à titre de diagnostic ;
// le déchiffrement lui-même n'utilise que lambda et mu.
// ============================================================================
#[derive(Clone, Debug)]
pub struct SecretKey {
    pub lambda: BigUint,
    pub mu:     BigUint,
    pub p:      BigUint,
    pub q:      BigUint,
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.lambda);
        zeroize_biguint(&mut self.mu);
        zeroize_biguint(&mut self.p);
        zeroize_biguint(&mut self.q);
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// Paire de clés
// ============================================================================
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub secret_key: SecretKey,
}

// ============================================================================
// Génération de clés Paillier
//
// 1. p, q : deux premiers probables (Fermat) indépendants de nbits/2 bits,
//    distincts ; la paire entière est rejetée et retirée tant que
//    gcd(p·q, (p-1)(q-1)) != 1 — précondition standard gcd(n, lambda) = 1.
// 2. lambda = ppcm(p-1, q-1).
// 3. g : premier probable tiré uniformément dans [n²/2, n²). Choix délibéré
//    du schéma — pas le raccourci canonique g = n+1. Tout g dont la valeur
//    L(g^lambda mod n²) est inversible mod n convient ; un g inutilisable
//    est rejeté et retiré.
// 4. mu = mod_inverse(L(g^lambda mod n²), n) mod n.
//
// Toutes les boucles sont plafonnées : l'épuisement remonte en
// Err(KeyGenerationExhausted) au lieu de boucler sans fin.
// ============================================================================
pub fn p_keygen(nbits: u64) -> Result<KeyPair, CryptoError> {
    // Une taille impaire perdrait silencieusement un bit au découpage nbits/2
    if nbits % 2 != 0 {
        return Err(CryptoError::KeySizeOdd { requested: nbits });
    }
    if nbits < MIN_KEY_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: nbits,
            minimum:   MIN_KEY_BITS,
        });
    }

    let half = nbits / 2;

    // --- Étape 1 : la paire (p, q) -----------------------------------------
    let mut pair_attempts = 0u32;
    let (p, q) = loop {
        pair_attempts += 1;
        if pair_attempts > MAX_PAIR_ATTEMPTS {
            return Err(CryptoError::KeyGenerationExhausted {
                attempts: MAX_PAIR_ATTEMPTS,
            });
        }

        let p = generate_probable_prime(half)?;
        let mut q = generate_probable_prime(half)?;
        while q == p {
            q = generate_probable_prime(half)?;
        }

        let n   = &p * &q;
        let phi = (&p - BigUint::one()) * (&q - BigUint::one());
        if gcd(&n, &phi).is_one() {
            break (p, q);
        }
    };

    let n         = &p * &q;
    let n_squared = &n * &n;
    let lambda    = lcm(&(&p - BigUint::one()), &(&q - BigUint::one()));

    // --- Étapes 3 et 4 : g et mu -------------------------------------------
    let lower = &n_squared >> 1;
    let mut g_attempts = 0u32;
    let (g, mu) = loop {
        g_attempts += 1;
        if g_attempts > MAX_GENERATOR_ATTEMPTS {
            return Err(CryptoError::KeyGenerationExhausted {
                attempts: MAX_GENERATOR_ATTEMPTS,
            });
        }

        let candidate  = generate_probable_prime_in_range(&lower, &n_squared)?;
        let g_lambda   = candidate.modpow(&lambda, &n_squared);
        let l_g_lambda = l_function(&g_lambda, &n);

        match mod_inverse(&l_g_lambda, &n) {
            // mod_inverse renvoie le coefficient de Bézout borné par
            // max(a, n) ; la réduction finale mod n incombe à l'appelant
            Ok(inverse) => break (candidate, inverse % &n),
            // Valeur L non inversible : ce g est inutilisable, on en retire un autre
            Err(CryptoError::NoModularInverse) => continue,
            Err(e) => return Err(e),
        }
    };

    Ok(KeyPair {
        public_key: PublicKey::new(n, g),
        secret_key: SecretKey { lambda, mu, p, q },
    })
}

/// Génération avec la taille par défaut (256 bits).
pub fn p_keygen_default() -> Result<KeyPair, CryptoError> {
    p_keygen(DEFAULT_KEY_BITS)
}

// ============================================================================
// Tests unitaires
// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn test_keygen_rejects_odd_size() {
        assert!(matches!(
            p_keygen(17),
            Err(CryptoError::KeySizeOdd { requested: 17 })
        ));
    }

    #[test]
    fn test_keygen_rejects_too_small_size() {
        assert!(matches!(
            p_keygen(8),
            Err(CryptoError::KeySizeTooSmall { requested: 8, .. })
        ));
    }

    #[test]
    fn test_keygen_key_relations() {
        let kp = p_keygen(16).unwrap();
        let pk = &kp.public_key;
        let sk = &kp.secret_key;

        // n = p·q, n² cohérent
        assert_eq!(pk.n, &sk.p * &sk.q);
        assert_eq!(pk.n_squared, &pk.n * &pk.n);
        assert_ne!(sk.p, sk.q);

        // lambda = ppcm(p-1, q-1), copremier avec n
        let expected_lambda = lcm(&(&sk.p - BigUint::one()), &(&sk.q - BigUint::one()));
        assert_eq!(sk.lambda, expected_lambda);
        assert!(gcd(&pk.n, &sk.lambda).is_one());

        // L(g^lambda mod n²) inversible mod n, et mu en est l'inverse
        let g_lambda   = pk.g.modpow(&sk.lambda, &pk.n_squared);
        let l_g_lambda = l_function(&g_lambda, &pk.n);
        assert!(gcd(&l_g_lambda, &pk.n).is_one());
        assert_eq!((&l_g_lambda * &sk.mu) % &pk.n, BigUint::one());

        // mu réduit dans [0, n)
        assert!(sk.mu < pk.n);
    }

    #[test]
    fn test_keygen_generator_range() {
        let kp = p_keygen(16).unwrap();
        let pk = &kp.public_key;
        let lower = &pk.n_squared >> 1;
        assert!(pk.g >= lower && pk.g < pk.n_squared);
    }

    #[test]
    fn test_residue_cache_is_idempotent() {
        let kp = p_keygen(16).unwrap();
        let pk = &kp.public_key;

        let first  = pk.residues().unwrap().to_vec();
        let second = pk.residues().unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());

        // tous les résidus sont copremiers avec n
        for r in second {
            assert!(gcd(r, &pk.n).is_one());
        }
    }

    #[test]
    fn test_secret_key_zeroize() {
        let kp = p_keygen(16).unwrap();
        let mut sk = kp.secret_key.clone();
        sk.zeroize();
        assert!(sk.lambda.is_zero());
        assert!(sk.mu.is_zero());
        assert!(sk.p.is_zero());
        assert!(sk.q.is_zero());
    }
}
