// ============================================================================
// KeyRegistry — Registre de clés thread-safe pour déploiement serveur
//
// Problème sans ce module :
//   Dans un serveur multi-threadé, plusieurs threads traitent des requêtes
//   simultanément et ont besoin d'accéder aux clés. Sans synchronisation,
//   le compilateur Rust refuse le partage de référence mutable entre
//   threads — ou, si on contourne avec unsafe, on risque des data races.
//
// Solution — Arc<RwLock<Option<T>>> :
//   - Arc<T>        : comptage de références atomique → cloneable entre threads
//   - RwLock<T>     : plusieurs lecteurs simultanés, un seul écrivain exclusif
//   - Option<T>     : permet de distinguer "clé non encore chargée" de "clé chargée"
//
// Pattern d'usage serveur recommandé :
//   1. Au démarrage : KeyRegistry::new() puis registry.set_keypair(kp)?
//   2. Dans chaque handler : let pk = registry.public_key()?  (lecture partagée)
//   3. Rotation de clé : registry.set_keypair(new_kp)?       (écriture exclusive)
//
// Le cache du système résiduel vit DANS PublicKey (OnceLock) : le clone
// rendu par public_key() emporte le cache déjà matérialisé, et le premier
// chiffrement d'un clone frais le matérialise pour ce clone.
// ============================================================================

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::paillier::p_keygen::{PublicKey, SecretKey, KeyPair};

// ============================================================================
// Erreurs spécifiques au registre
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Aucune clé Paillier n'a encore été chargée dans le registre
    NoPaillierKey,
    /// Le verrou RwLock est empoisonné (thread paniqué pendant un accès exclusif)
    LockPoisoned,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NoPaillierKey =>
                write!(f, "Aucune clé Paillier chargée dans le registre"),
            RegistryError::LockPoisoned =>
                write!(f, "Verrou du registre empoisonné — redémarrage requis"),
        }
    }
}

impl std::error::Error for RegistryError {}

// ============================================================================
// KeyRegistry — point d'entrée unique pour l'accès aux clés en production
//
// Clonable à faible coût grâce à Arc (clone = incrément d'un compteur atomique).
// Peut être transmis aux handlers de chaque thread via .clone().
// ============================================================================
#[derive(Clone)]
pub struct KeyRegistry {
    inner: Arc<RwLock<Option<KeyPair>>>,
}

impl KeyRegistry {
    // -----------------------------------------------------------------------
    // Constructeur — registre vide, prêt à recevoir des clés
    // -----------------------------------------------------------------------
    pub fn new() -> Self {
        KeyRegistry {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Option<KeyPair>>, RegistryError> {
        self.inner.write().map_err(|_| RegistryError::LockPoisoned)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Option<KeyPair>>, RegistryError> {
        self.inner.read().map_err(|_| RegistryError::LockPoisoned)
    }

    // -----------------------------------------------------------------------
    // Chargement / rotation de la paire de clés Paillier
    //
    // Écriture exclusive : bloque les lecteurs pendant le remplacement.
    // -----------------------------------------------------------------------
    pub fn set_keypair(&self, kp: KeyPair) -> Result<(), RegistryError> {
        *self.write()? = Some(kp);
        Ok(())
    }

    /// Supprime la clé Paillier (et déclenche la zeroization via Drop)
    pub fn clear_keypair(&self) -> Result<(), RegistryError> {
        *self.write()? = None;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accès à la clé publique Paillier — lecture partagée (N threads simultanés)
    //
    // Retourne un clone de PublicKey. PublicKey ne contient pas de données
    // secrètes donc le clonage est sûr et sans impact sécuritaire.
    // -----------------------------------------------------------------------
    pub fn public_key(&self) -> Result<PublicKey, RegistryError> {
        let guard = self.read()?;
        guard
            .as_ref()
            .map(|kp| kp.public_key.clone())
            .ok_or(RegistryError::NoPaillierKey)
    }

    // -----------------------------------------------------------------------
    // Exécution d'une opération avec accès à la clé secrète Paillier
    //
    // Pattern "prêter sans cloner" : la clé secrète n'est jamais extraite
    // du registre. Le closure reçoit une référence &SecretKey valide
    // uniquement pendant l'exécution, puis le verrou est relâché.
    //
    // Usage typique :
    //   let m = registry.with_secret_key(|sk| p_decrypt(&ct, &pk, sk))?;
    // -----------------------------------------------------------------------
    pub fn with_secret_key<F, T>(&self, f: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&SecretKey) -> T,
    {
        let guard = self.read()?;
        guard
            .as_ref()
            .map(|kp| f(&kp.secret_key))
            .ok_or(RegistryError::NoPaillierKey)
    }

    // -----------------------------------------------------------------------
    // Vérification de présence des clés (utile au démarrage)
    // -----------------------------------------------------------------------
    pub fn has_keypair(&self) -> bool {
        self.read().map(|g| g.is_some()).unwrap_or(false)
    }
}

impl Default for KeyRegistry {
    fn default() -> Self { Self::new() }
}
