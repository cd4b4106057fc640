// Réexporte toutes les fonctions mathématiques

mod math;

pub use math::{
    gcd, generate_probable_prime, generate_probable_prime_in_range, is_probable_prime,
    l_function, lcm, mod_inverse, reduced_residue_system, sieve_of_eratosthenes,
    MAX_SAMPLING_ATTEMPTS,
};
