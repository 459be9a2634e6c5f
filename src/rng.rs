use rand::SeedableRng;
use rand_pcg::Pcg64;

/// Deterministic RNG factory for a given (seed, round) pair.
///
/// - Derives a per-round 64-bit seed as `seed ^ round`.
/// - Uses PCG 64-bit generator (rand_pcg::Pcg64) so a session seed replays the same questions.
#[inline]
pub fn rng_for_round(seed: u64, round: u64) -> Pcg64 {
    let derived: u64 = seed ^ round;
    Pcg64::seed_from_u64(derived)
}
