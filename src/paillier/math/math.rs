use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, ToPrimitive, Zero};
use rand_core::OsRng;
use crate::crypto_error::crypto_error::CryptoError;

// Plafond de tentatives des boucles d'échantillonnage (premiers, générateur).
// Très au-dessus de l'espérance réelle : pour un candidat impair de k bits,
// la densité des premiers est ~2/ln(2^k), soit quelques centaines de tirages
// attendus au pire pour les tailles usuelles. Atteindre le plafond signale
// un problème de source d'entropie, pas de la malchance.
pub const MAX_SAMPLING_ATTEMPTS: u32 = 50_000;

// Fonction L(u) = (u-1)/n — division entière plancher.
// Centrale à la dérivation de mu et au déchiffrement.
pub fn l_function(u: &BigUint, n: &BigUint) -> BigUint {
    (u - BigUint::one()) / n
}

// ---------------------------------------------------------------------------
// Calcule le pgcd de deux nombres — algorithme d'Euclide classique.
//
// Rendu itératif (la forme récursive épuiserait la pile sur des opérandes
// de précision arbitraire) ; la normalisation a >= b de la forme récursive
// est absorbée par la première itération (a % b == a quand a < b).
// ---------------------------------------------------------------------------
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let (mut a, mut b) = (a.clone(), b.clone());
    while !b.is_zero() {
        let r = &a % &b;
        a = std::mem::replace(&mut b, r);
    }
    a
}

// Calcule le ppcm : a*b / pgcd(a,b) — division exacte par construction.
pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    (a * b) / gcd(a, b)
}

// ---------------------------------------------------------------------------
// Calcule l'inverse modulaire de a mod n — algorithme d'Euclide étendu.
//
// Tous les coefficients de Bézout intermédiaires sont réduits modulo
// max(a, n) à chaque étape pour empêcher leur croissance non bornée.
// L'opposé -q est représenté par (max - q) mod max, ce qui garde tout le
// calcul dans BigUint sans passer par des entiers signés.
//
// Le résultat est dans [0, max(a, n)) ; quand a < n (cas de la dérivation
// de mu, où a = L(g^lambda mod n²) < n), max vaut n et le résultat est
// déjà l'inverse réduit dans [0, n).
//
// Retourne Err(CryptoError::NoModularInverse) si gcd(a, n) != 1.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    let bound = a.max(n).clone();
    let (mut a, mut n) = (a.clone(), n.clone());
    let (mut x, mut xx) = (BigUint::one(), BigUint::zero());

    while !n.is_zero() {
        let q = &a / &n;
        let r = &a % &n;
        a = std::mem::replace(&mut n, r);

        if n.is_zero() {
            // a contient le dernier diviseur non nul, c'est-à-dire le pgcd
            if a.is_one() {
                return Ok(xx);
            }
            return Err(CryptoError::NoModularInverse);
        }

        // x, xx = xx mod max, (x + xx*(max - q)) mod max
        let neg_q = (&bound - &q % &bound) % &bound;
        let next = (&x + &xx * &neg_q) % &bound;
        x = &xx % &bound;
        xx = next;
    }

    // n initial nul : hors contrat d'appel
    Err(CryptoError::NoModularInverse)
}

// ---------------------------------------------------------------------------
// Test de primalité de Fermat à témoin unique : 2^(x-1) mod x == 1.
//
// Test probabiliste à un seul round — les menteurs de Fermat en base 2
// (341 = 11·31 est le plus petit) sont acceptés comme premiers. Limitation
// assumée du schéma ; un système de production utiliserait un Miller-Rabin
// multi-rounds à la place.
//
// Contrat : x >= 2.
// ---------------------------------------------------------------------------
pub fn is_probable_prime(x: &BigUint) -> bool {
    debug_assert!(x >= &BigUint::from(2u32));
    let two = BigUint::from(2u32);
    two.modpow(&(x - BigUint::one()), x).is_one()
}

// ---------------------------------------------------------------------------
// Crible d'Ératosthène : tous les premiers <= limit, en ordre croissant.
// Déterministe — recalculable à l'identique depuis limit.
// ---------------------------------------------------------------------------
pub fn sieve_of_eratosthenes(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }
    let n = limit as usize;
    let mut composite = vec![false; n + 1];
    let mut primes = Vec::new();

    for i in 2..=n {
        if composite[i] {
            continue;
        }
        primes.push(i as u64);
        if i <= n / i {
            let mut j = i * i;
            while j <= n {
                composite[j] = true;
                j += i;
            }
        }
    }
    primes
}

// ---------------------------------------------------------------------------
// Système résiduel réduit de n : les PREMIERS <= n copremiers avec n
// (sortie du crible filtrée par gcd(n, p) == 1).
//
// Attention — ce n'est PAS le groupe multiplicatif mod n complet
// ({k < n : gcd(k,n)=1}) : le schéma restreint délibérément les candidats
// aux premiers, ce qui resserre la distribution du facteur d'aveuglement r
// tiré ici au chiffrement. Sémantique préservée telle quelle.
//
// n doit tenir dans un u64 pour piloter le crible ; au-delà, le crible
// jusqu'à n est physiquement irréalisable et on le signale par une erreur
// typée plutôt qu'une allocation sans fin.
// ---------------------------------------------------------------------------
pub fn reduced_residue_system(n: &BigUint) -> Result<Vec<BigUint>, CryptoError> {
    let limit = n
        .to_u64()
        .ok_or(CryptoError::SieveLimitTooLarge { bits: n.bits() })?;

    let mut residues = Vec::new();
    for p in sieve_of_eratosthenes(limit) {
        let bp = BigUint::from(p);
        if gcd(n, &bp).is_one() {
            residues.push(bp);
        }
    }
    Ok(residues)
}

// ---------------------------------------------------------------------------
// Tire un premier probable de `nbits` bits exactement.
//
// Candidats impairs uniformes dans [2^(nbits-1), 2^nbits) : MSB forcé pour
// garantir la largeur, bit 0 forcé pour l'imparité, puis retest de Fermat
// jusqu'au premier candidat acceptant.
// ---------------------------------------------------------------------------
pub fn generate_probable_prime(nbits: u64) -> Result<BigUint, CryptoError> {
    let mut rng = OsRng;

    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let mut candidate = rng.gen_biguint(nbits);
        candidate.set_bit(nbits - 1, true); // garantit exactement nbits bits
        candidate.set_bit(0, true);         // candidat impair
        if is_probable_prime(&candidate) {
            return Ok(candidate);
        }
    }

    Err(CryptoError::KeyGenerationExhausted {
        attempts: MAX_SAMPLING_ATTEMPTS,
    })
}

// ---------------------------------------------------------------------------
// Tire un premier probable uniforme dans [lo, hi).
// Utilisé pour le générateur g, cherché dans [n²/2, n²).
// ---------------------------------------------------------------------------
pub fn generate_probable_prime_in_range(
    lo: &BigUint,
    hi: &BigUint,
) -> Result<BigUint, CryptoError> {
    let mut rng = OsRng;

    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let candidate = rng.gen_biguint_range(lo, hi);
        if is_probable_prime(&candidate) {
            return Ok(candidate);
        }
    }

    Err(CryptoError::KeyGenerationExhausted {
        attempts: MAX_SAMPLING_ATTEMPTS,
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use num_integer::Integer;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_gcd_scenario() {
        assert_eq!(gcd(&big(48), &big(18)), big(6));
        assert_eq!(gcd(&big(18), &big(48)), big(6));
        assert_eq!(gcd(&big(17), &big(31)), big(1));
        assert_eq!(gcd(&big(0), &big(5)), big(5));
    }

    #[test]
    fn test_gcd_matches_reference() {
        // Notre Euclide itératif contre le gcd de référence de num-integer
        let pairs = [
            (big(48), big(18)),
            (big(270), big(192)),
            (big(1_000_003), big(999_983)),
            (big(u64::MAX), big(1_234_567_891)),
        ];
        for (a, b) in pairs {
            assert_eq!(gcd(&a, &b), a.gcd(&b));
        }
    }

    #[test]
    fn test_lcm_scenario() {
        assert_eq!(lcm(&big(4), &big(6)), big(12));
        assert_eq!(lcm(&big(7), &big(5)), big(35));
    }

    #[test]
    fn test_l_function() {
        // L(u) = (u-1)/n, division plancher
        assert_eq!(l_function(&big(15), &big(7)), big(2));
        assert_eq!(l_function(&big(1), &big(7)), big(0));
    }

    #[test]
    fn test_mod_inverse_known_values() {
        assert_eq!(mod_inverse(&big(3), &big(7)).unwrap(), big(5));
        assert_eq!(mod_inverse(&big(10), &big(17)).unwrap(), big(12));
    }

    #[test]
    fn test_mod_inverse_roundtrip() {
        let n = big(1_000_000_007);
        for a in [big(2), big(12345), big(999_999_999)] {
            let inv = mod_inverse(&a, &n).unwrap();
            assert_eq!((&a * &inv) % &n, big(1));
        }
    }

    #[test]
    fn test_mod_inverse_non_coprime() {
        assert_eq!(
            mod_inverse(&big(4), &big(6)),
            Err(CryptoError::NoModularInverse)
        );
    }

    #[test]
    fn test_fermat_on_primes_and_composites() {
        // 2 lui-même échoue la formule (2^1 mod 2 = 0), les candidats réels
        // sont toujours impairs
        for p in [3u64, 5, 97, 65_537] {
            assert!(is_probable_prime(&big(p)), "{p} devrait passer Fermat");
        }
        for c in [9u64, 91, 100, 65_535] {
            assert!(!is_probable_prime(&big(c)), "{c} devrait échouer Fermat");
        }
    }

    #[test]
    fn test_fermat_accepts_liar_341() {
        // 341 = 11·31 est le plus petit menteur de Fermat en base 2 :
        // le test à témoin unique l'accepte, comportement assumé du schéma
        assert!(is_probable_prime(&big(341)));
    }

    #[test]
    fn test_sieve_scenario() {
        assert_eq!(
            sieve_of_eratosthenes(30),
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]
        );
    }

    #[test]
    fn test_sieve_below_two_is_empty() {
        assert!(sieve_of_eratosthenes(0).is_empty());
        assert!(sieve_of_eratosthenes(1).is_empty());
        assert_eq!(sieve_of_eratosthenes(2), vec![2]);
    }

    #[test]
    fn test_reduced_residue_system_semiprime() {
        // n = 15 = 3·5 : premiers <= 15 sans les facteurs 3 et 5
        let residues = reduced_residue_system(&big(15)).unwrap();
        assert_eq!(residues, vec![big(2), big(7), big(11), big(13)]);
    }

    #[test]
    fn test_reduced_residue_system_too_large() {
        let n = BigUint::one() << 80;
        assert!(matches!(
            reduced_residue_system(&n),
            Err(CryptoError::SieveLimitTooLarge { .. })
        ));
    }

    #[test]
    fn test_generate_probable_prime_width() {
        let p = generate_probable_prime(12).unwrap();
        assert_eq!(p.bits(), 12);
        assert!(p.bit(0), "le candidat retenu est impair");
    }

    #[test]
    fn test_generate_probable_prime_in_range_bounds() {
        let lo = big(1 << 20);
        let hi = big(1 << 21);
        let p = generate_probable_prime_in_range(&lo, &hi).unwrap();
        assert!(p >= lo && p < hi);
    }
}
