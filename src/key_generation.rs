// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

use crypto_bigint::rand_core::{impls, CryptoRng, CryptoRngCore, RngCore};
use crypto_bigint::{Concat, Integer};
use crypto_primes::generate_prime_with_rng;
use tracing::{debug, warn};

use crate::{
    error::{SamplingError, SanityCheckError},
    DecryptionKey, EncryptionKey, LargePrimeSizedNumber, Result, MAX_PRIME_BIT_LENGTH,
    MAX_SAMPLING_ATTEMPTS, MIN_PRIME_BIT_LENGTH,
};

/// A matching Paillier key pair, produced by a single generation event.
///
/// The public half is derived from the private one, so the two can never refer to different
/// moduli.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    decryption_key: DecryptionKey,
}

impl KeyPair {
    /// Generates a key pair from two distinct random primes $p, q$ of `prime_bit_length` bits
    /// each, so that $N = pq$ is of `2 * prime_bit_length` (or one fewer) bits.
    pub fn generate(prime_bit_length: usize, rng: &mut impl CryptoRngCore) -> Result<KeyPair> {
        if !(MIN_PRIME_BIT_LENGTH..=MAX_PRIME_BIT_LENGTH).contains(&prime_bit_length) {
            return Err(SanityCheckError::InvalidPrimeBitLength {
                bit_length: prime_bit_length,
                min: MIN_PRIME_BIT_LENGTH,
                max: MAX_PRIME_BIT_LENGTH,
            }
            .into());
        }

        let mut rng = FallibleRng::new(rng);

        let p: LargePrimeSizedNumber = generate_prime_with_rng(&mut rng, Some(prime_bit_length));
        rng.check()?;

        let mut redraws = 0;
        let q = loop {
            let q: LargePrimeSizedNumber =
                generate_prime_with_rng(&mut rng, Some(prime_bit_length));
            rng.check()?;

            if q != p {
                break q;
            }

            redraws += 1;
            if redraws == MAX_SAMPLING_ATTEMPTS {
                warn!(
                    prime_bit_length,
                    attempts = redraws,
                    "failed to sample a second distinct prime"
                );

                return Err(SamplingError::AttemptsExhausted { attempts: redraws }.into());
            }
        };

        let key_pair = KeyPair::from_primes(p, q)?;

        debug!(
            prime_bit_length,
            modulus_bit_length = key_pair.encryption_key().n().bits_vartime(),
            redraws,
            "generated a Paillier key pair"
        );

        Ok(key_pair)
    }

    /// Instantiates the key pair $N = pq$, $\phi(N) = (p-1)(q-1)$ for two distinct odd primes.
    ///
    /// Primality of `p` and `q` is assumed and not checked.
    pub fn from_primes(p: LargePrimeSizedNumber, q: LargePrimeSizedNumber) -> Result<KeyPair> {
        let three = LargePrimeSizedNumber::from(3u8);
        if p == q || p < three || q < three || !bool::from(p.is_odd() & q.is_odd()) {
            return Err(SanityCheckError::InvalidPrimes.into());
        }

        // Both factors are below $2^{1024}$, so their product fits in $2048$ bits.
        let (lo, hi) = p.mul_wide(&q);
        let n = hi.concat(&lo);

        let (lo, hi) = p
            .wrapping_sub(&LargePrimeSizedNumber::ONE)
            .mul_wide(&q.wrapping_sub(&LargePrimeSizedNumber::ONE));
        let phi = hi.concat(&lo);

        let encryption_key = EncryptionKey::new(n)?;
        let decryption_key = DecryptionKey::new(encryption_key, phi)?;

        Ok(KeyPair { decryption_key })
    }

    pub fn encryption_key(&self) -> &EncryptionKey {
        self.decryption_key.encryption_key()
    }

    pub fn decryption_key(&self) -> &DecryptionKey {
        &self.decryption_key
    }

    pub fn into_parts(self) -> (EncryptionKey, DecryptionKey) {
        (self.decryption_key.encryption_key().clone(), self.decryption_key)
    }
}

/// Draws every byte through [`RngCore::try_fill_bytes`] of the wrapped source, keeping the first
/// failure so it can be reported once an infallible consumer (prime generation) returns.
struct FallibleRng<'a, R> {
    rng: &'a mut R,
    error: Option<String>,
}

impl<'a, R: CryptoRngCore> FallibleRng<'a, R> {
    fn new(rng: &'a mut R) -> Self {
        FallibleRng { rng, error: None }
    }

    fn check(&mut self) -> Result<()> {
        match self.error.take() {
            Some(error) => {
                warn!(error = %error, "the random source failed during prime generation");

                Err(SamplingError::RandomnessUnavailable(error).into())
            }
            None => Ok(()),
        }
    }
}

impl<R: CryptoRngCore> RngCore for FallibleRng<'_, R> {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        // Failed draws yield zeros, which prime generation still terminates on.
        if self.try_fill_bytes(dest).is_err() {
            dest.fill(0);
        }
    }

    fn try_fill_bytes(
        &mut self,
        dest: &mut [u8],
    ) -> core::result::Result<(), crypto_bigint::rand_core::Error> {
        self.rng.try_fill_bytes(dest).map_err(|e| {
            self.error.get_or_insert_with(|| e.to_string());

            e
        })
    }
}

impl<R: CryptoRngCore> CryptoRng for FallibleRng<'_, R> {}
