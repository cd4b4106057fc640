// =========================================================
// Démonstration — Cryptosystème de Paillier
// Texte → codepoints → chiffrement → déchiffrement
// =========================================================

use paillier_core::paillier::p_keygen::p_keygen::p_keygen;
use paillier_core::paillier::p_encrypt::p_encrypt::p_encrypt;
use paillier_core::paillier::p_decrypt::p_decrypt::p_decrypt;

use paillier_core::CryptoError;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use std::time::Instant;

// Taille de démonstration : le tirage de r exige le crible d'Ératosthène
// jusqu'à n, donc une clé de démonstration reste petite. Les tailles
// au-delà de ~32 bits échouent proprement avec SieveLimitTooLarge.
const DEMO_KEY_BITS: u64 = 16;

const DEMO_TEXT: &str = "Hello, Paillier !";

fn main() {
    let bits = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(DEMO_KEY_BITS);

    if let Err(e) = demonstration_paillier(bits) {
        eprintln!("\n[ERREUR] {}\n", e);
        std::process::exit(1);
    }
}

fn demonstration_paillier(bits: u64) -> Result<(), CryptoError> {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   CRYPTOSYSTÈME DE PAILLIER — DÉMONSTRATION   ║");
    println!("╚═══════════════════════════════════════════════╝");

    // ── Génération de la paire de clés ───────────────────
    println!("\n[1] Génération d'une paire de clés de {bits} bits...");
    let debut = Instant::now();
    let kp = p_keygen(bits)?;
    println!("    Durée : {:?}", debut.elapsed());

    let pk = &kp.public_key;
    let sk = &kp.secret_key;

    println!("\n    Clé publique :");
    println!("      n      = {}", pk.n);
    println!("      g      = {}", pk.g);
    println!("    Clé privée :");
    println!("      lambda = {}", sk.lambda);
    println!("      mu     = {}", sk.mu);

    // ── Chiffrement ──────────────────────────────────────
    let plaintext: Vec<BigUint> = DEMO_TEXT
        .chars()
        .map(|c| BigUint::from(c as u32))
        .collect();

    println!("\n[2] Chiffrement de {:?} ({} codepoints)...", DEMO_TEXT, plaintext.len());
    let debut = Instant::now();
    let ciphertext = p_encrypt(&plaintext, pk)?;
    println!("    Durée : {:?}", debut.elapsed());
    println!("    Premier chiffré : {}", ciphertext[0]);

    // ── Déchiffrement ────────────────────────────────────
    println!("\n[3] Déchiffrement...");
    let debut = Instant::now();
    let recovered = p_decrypt(&ciphertext, pk, sk)?;
    println!("    Durée : {:?}", debut.elapsed());

    let texte: String = recovered
        .iter()
        .filter_map(|m| m.to_u32().and_then(char::from_u32))
        .collect();
    println!("    Texte reconstruit : {:?}", texte);
    println!("    Identique au clair : {}", texte == DEMO_TEXT);

    // ── Addition homomorphe ──────────────────────────────
    println!("\n[4] Addition homomorphe : Dec(Enc(19) · Enc(23) mod n²)");
    let c1 = p_encrypt(&[BigUint::from(19u32)], pk)?.remove(0);
    let c2 = p_encrypt(&[BigUint::from(23u32)], pk)?.remove(0);
    let somme = p_decrypt(&[(&c1 * &c2) % &pk.n_squared], pk, sk)?.remove(0);
    println!("    Résultat : {somme}");

    println!();
    Ok(())
}
