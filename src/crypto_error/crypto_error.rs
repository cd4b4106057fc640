// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// L'appelant reçoit une Err(...) et peut répondre proprement sans
// crasher le thread.
// ===========================================================================

use num_bigint::BigUint;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CryptoError {
    // --- Erreurs de paramètres d'entrée ---
    /// Au moins un message m est >= n (hors domaine plaintext Paillier).
    /// Les valeurs fautives sont énumérées pour guider l'utilisateur
    /// vers une régénération de clés plus grandes.
    MessageOutOfRange { offending: Vec<BigUint> },
    /// Le chiffré c est >= n² (hors domaine ciphertext Paillier)
    CiphertextOutOfRange,
    /// La taille de clé demandée est trop petite (< MIN_KEY_BITS)
    KeySizeTooSmall { requested: u64, minimum: u64 },
    /// La taille de clé demandée est impaire : le découpage en deux
    /// premiers de taille/2 perdrait un bit de la force visée
    KeySizeOdd { requested: u64 },

    // --- Erreurs mathématiques internes ---
    /// L'inverse modulaire n'existe pas (gcd != 1)
    NoModularInverse,
    /// Les boucles d'échantillonnage (premiers, générateur) ont épuisé
    /// leur plafond de tentatives sans trouver de candidat valide
    KeyGenerationExhausted { attempts: u32 },
    /// Le module n ne tient pas dans un u64 : le crible d'Ératosthène
    /// jusqu'à n est physiquement irréalisable à cette taille
    SieveLimitTooLarge { bits: u64 },
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::MessageOutOfRange { offending } => {
                let liste = offending
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "Message(s) hors du domaine [0, n) : {liste}. \
                     Régénérez des clés plus grandes."
                )
            }
            CryptoError::CiphertextOutOfRange =>
                write!(f, "Le chiffré doit être dans [0, n²)"),
            CryptoError::KeySizeTooSmall { requested, minimum } =>
                write!(f, "Taille de clé {requested} bits insuffisante, minimum requis : {minimum} bits"),
            CryptoError::KeySizeOdd { requested } =>
                write!(f, "Taille de clé {requested} impaire : utilisez une taille paire"),
            CryptoError::NoModularInverse =>
                write!(f, "Impossible de calculer l'inverse modulaire (gcd != 1)"),
            CryptoError::KeyGenerationExhausted { attempts } =>
                write!(f, "Génération de clés épuisée après {attempts} tentatives"),
            CryptoError::SieveLimitTooLarge { bits } =>
                write!(f, "Module de {bits} bits : crible d'Ératosthène jusqu'à n irréalisable (limite u64)"),
        }
    }
}

impl std::error::Error for CryptoError {}
