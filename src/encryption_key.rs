// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

use crypto_bigint::modular::runtime_mod::DynResidueParams;
use crypto_bigint::rand_core::{CryptoRngCore, RngCore};
use crypto_bigint::Uint;
use subtle::Choice;
use tracing::{trace, warn};

use crate::{
    error::{SamplingError, SanityCheckError},
    AsNaturalNumber, AsRingElement, Error, LargeBiPrimeSizedNumber, PaillierModulusSizedNumber,
    PaillierPlaintextRingElement, PaillierRingElement, Result, MAX_SAMPLING_ATTEMPTS,
};

/// A Paillier public key $(N, N^2)$.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionKey {
    n: LargeBiPrimeSizedNumber,
    n2: PaillierModulusSizedNumber,
    // Montgomery parameters for arithmetic $ mod N $ and $ mod N^2 $
    n_params: DynResidueParams<{ LargeBiPrimeSizedNumber::LIMBS }>,
    n2_params: DynResidueParams<{ PaillierModulusSizedNumber::LIMBS }>,
}

impl EncryptionKey {
    /// Instantiates a public key from the modulus $N = pq$.
    ///
    /// Fails if $N$ is even or smaller than 3, as no such $N$ is a product of two distinct odd
    /// primes.
    pub fn new(n: LargeBiPrimeSizedNumber) -> Result<EncryptionKey> {
        if n <= LargeBiPrimeSizedNumber::from(2u8) {
            return Err(SanityCheckError::InvalidModulus.into());
        }

        let n2: PaillierModulusSizedNumber = n.square();
        let n_params = montgomery_params(&n)?;
        let n2_params = montgomery_params(&n2)?;

        Ok(EncryptionKey {
            n,
            n2,
            n_params,
            n2_params,
        })
    }

    /// The modulus $N$.
    pub fn n(&self) -> &LargeBiPrimeSizedNumber {
        &self.n
    }

    /// The ciphertext modulus $N^2$.
    pub fn n2(&self) -> &PaillierModulusSizedNumber {
        &self.n2
    }

    pub(crate) fn n_params(&self) -> &DynResidueParams<{ LargeBiPrimeSizedNumber::LIMBS }> {
        &self.n_params
    }

    pub(crate) fn n2_params(&self) -> &DynResidueParams<{ PaillierModulusSizedNumber::LIMBS }> {
        &self.n2_params
    }

    /// Encrypts `plaintext` $ m \in [0, N) $ under fresh randomness sampled from `rng`.
    pub fn encrypt(
        &self,
        plaintext: &LargeBiPrimeSizedNumber,
        rng: &mut impl CryptoRngCore,
    ) -> Result<PaillierModulusSizedNumber> {
        self.check_plaintext(plaintext)?;

        let randomness = self.sample_randomness(rng)?;

        Ok(self.encrypt_unchecked(plaintext, &randomness))
    }

    /// Deterministically encrypts `plaintext` using the caller-provided `randomness`
    /// $ r \in \mathbb{Z}_N^* $.
    ///
    /// Reusing `randomness` across encryptions breaks semantic security; prefer
    /// [`Self::encrypt()`].
    pub fn encrypt_with_randomness(
        &self,
        plaintext: &LargeBiPrimeSizedNumber,
        randomness: &LargeBiPrimeSizedNumber,
    ) -> Result<PaillierModulusSizedNumber> {
        self.check_plaintext(plaintext)?;

        if !self.is_unit(randomness) {
            return Err(SanityCheckError::InvalidRandomness.into());
        }

        Ok(self.encrypt_unchecked(plaintext, randomness))
    }

    fn encrypt_unchecked(
        &self,
        plaintext: &LargeBiPrimeSizedNumber,
        randomness: &LargeBiPrimeSizedNumber,
    ) -> PaillierModulusSizedNumber {
        let n: PaillierModulusSizedNumber = self.n.resize();
        let n: PaillierRingElement = n.as_ring_element(&self.n2_params);
        let one = PaillierRingElement::one(self.n2_params);
        // The plaintext is the full-width exponent of $(1 + N)$, never truncated.
        let m: PaillierModulusSizedNumber = plaintext.resize();
        let m: PaillierRingElement = m.as_ring_element(&self.n2_params);
        let r: PaillierModulusSizedNumber = randomness.resize();
        let r: PaillierRingElement = r.as_ring_element(&self.n2_params);

        // $ c = (1 + N)^m * r^N = (m*N + 1) * r^N mod N^2 $
        ((m * n + one) * r.pow_bounded_exp(&self.n, self.n.bits_vartime())).as_natural_number()
    }

    /// Homomorphically adds the plaintexts of `lhs` and `rhs`:
    /// $ Dec(c_1 \cdot c_2 \mod N^2) = m_1 + m_2 \mod N $.
    pub fn add(
        &self,
        lhs: &PaillierModulusSizedNumber,
        rhs: &PaillierModulusSizedNumber,
    ) -> Result<PaillierModulusSizedNumber> {
        self.check_ciphertext(lhs)?;
        self.check_ciphertext(rhs)?;

        Ok(
            (lhs.as_ring_element(&self.n2_params) * rhs.as_ring_element(&self.n2_params))
                .as_natural_number(),
        )
    }

    /// Homomorphically multiplies the plaintext of `ciphertext` by `scalar`:
    /// $ Dec(c^s \mod N^2) = s \cdot m \mod N $.
    pub fn multiply<const SCALAR_LIMBS: usize>(
        &self,
        scalar: &Uint<SCALAR_LIMBS>,
        ciphertext: &PaillierModulusSizedNumber,
    ) -> Result<PaillierModulusSizedNumber> {
        self.check_ciphertext(ciphertext)?;

        Ok(ciphertext
            .as_ring_element(&self.n2_params)
            .pow(scalar)
            .as_natural_number())
    }

    /// Samples $ r \in \mathbb{Z}_N^* $: draws integers of the bit length of $N$ until one is
    /// non-zero, smaller than $N$ and coprime to it.
    pub(crate) fn sample_randomness(
        &self,
        rng: &mut impl CryptoRngCore,
    ) -> Result<LargeBiPrimeSizedNumber> {
        let excess_bits = LargeBiPrimeSizedNumber::BITS - self.n.bits_vartime();

        for attempt in 1..=MAX_SAMPLING_ATTEMPTS {
            let mut bytes = [0u8; LargeBiPrimeSizedNumber::BYTES];
            rng.try_fill_bytes(&mut bytes)
                .map_err(|e| SamplingError::RandomnessUnavailable(e.to_string()))?;

            let candidate = LargeBiPrimeSizedNumber::from_le_slice(&bytes).shr_vartime(excess_bits);

            if candidate < self.n && self.is_unit(&candidate) {
                return Ok(candidate);
            }

            trace!(attempt, "rejected randomness candidate");
        }

        warn!(attempts = MAX_SAMPLING_ATTEMPTS, "failed to sample a unit modulo N");

        Err(SamplingError::AttemptsExhausted {
            attempts: MAX_SAMPLING_ATTEMPTS,
        }
        .into())
    }

    /// Whether `x` is a unit of $\mathbb{Z}_N$, i.e. invertible modulo $N$ (which, for $x \ne 0$,
    /// is equivalent to $\gcd(x, N) = 1$).
    fn is_unit(&self, x: &LargeBiPrimeSizedNumber) -> bool {
        if x == &LargeBiPrimeSizedNumber::ZERO || x >= &self.n {
            return false;
        }

        let element: PaillierPlaintextRingElement = x.as_ring_element(&self.n_params);
        let (_, is_invertible) = element.invert();

        Choice::from(is_invertible).into()
    }

    fn check_plaintext(&self, plaintext: &LargeBiPrimeSizedNumber) -> Result<()> {
        if plaintext >= &self.n {
            return Err(Error::from(SanityCheckError::PlaintextOutOfRange));
        }

        Ok(())
    }

    pub(crate) fn check_ciphertext(&self, ciphertext: &PaillierModulusSizedNumber) -> Result<()> {
        if ciphertext >= &self.n2 {
            return Err(Error::from(SanityCheckError::CiphertextOutOfRange));
        }

        Ok(())
    }
}

/// Montgomery parameters for `modulus`, which must be odd.
fn montgomery_params<const LIMBS: usize>(
    modulus: &Uint<LIMBS>,
) -> Result<DynResidueParams<LIMBS>> {
    #[allow(deprecated)]
    let params = DynResidueParams::<LIMBS>::new_checked(modulus);

    Option::<DynResidueParams<LIMBS>>::from(params)
        .ok_or(Error::from(SanityCheckError::InvalidModulus))
}
