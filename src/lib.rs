// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

//! The [Paillier cryptosystem](https://en.wikipedia.org/wiki/Paillier_cryptosystem):
//! key generation, encryption, decryption, homomorphic addition of ciphertexts and
//! homomorphic multiplication of a ciphertext by a plaintext scalar.
//!
//! ```
//! use paillier::{KeyPair, LargeBiPrimeSizedNumber};
//! use rand_core::OsRng;
//!
//! # fn main() -> paillier::Result<()> {
//! let key_pair = KeyPair::generate(16, &mut OsRng)?;
//! let (encryption_key, decryption_key) = (key_pair.encryption_key(), key_pair.decryption_key());
//!
//! let m = LargeBiPrimeSizedNumber::from(5555u16);
//! let ciphertext = encryption_key.encrypt(&m, &mut OsRng)?;
//! assert_eq!(decryption_key.decrypt(&ciphertext)?, m);
//!
//! let m1 = LargeBiPrimeSizedNumber::from(45u8);
//! let m2 = LargeBiPrimeSizedNumber::from(67u8);
//! let c1 = encryption_key.encrypt(&m1, &mut OsRng)?;
//! let c2 = encryption_key.encrypt(&m2, &mut OsRng)?;
//!
//! let sum = encryption_key.add(&c1, &c2)?;
//! assert_eq!(decryption_key.decrypt(&sum)?, LargeBiPrimeSizedNumber::from(112u8));
//!
//! let product = encryption_key.multiply(&m1, &c2)?;
//! assert_eq!(decryption_key.decrypt(&product)?, LargeBiPrimeSizedNumber::from(3015u16));
//! # Ok(())
//! # }
//! ```

use crypto_bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use crypto_bigint::{Concat, Uint, U1024};

pub use decryption_key::DecryptionKey;
pub use encryption_key::EncryptionKey;
pub use error::{DecryptionError, Error, Result, SamplingError, SanityCheckError};
pub use key_generation::KeyPair;

mod decryption_key;
mod encryption_key;
mod error;
mod key_generation;

/* Types & Trait (impls) around `crypto_bigint` for internal use */

pub type LargePrimeSizedNumber = U1024;
pub type LargeBiPrimeSizedNumber = <LargePrimeSizedNumber as Concat>::Output;
pub type PaillierModulusSizedNumber = <LargeBiPrimeSizedNumber as Concat>::Output;

pub(crate) type PaillierPlaintextRingElement = DynResidue<{ LargeBiPrimeSizedNumber::LIMBS }>;
pub(crate) type PaillierRingElement = DynResidue<{ PaillierModulusSizedNumber::LIMBS }>;

/// The smallest supported bit length of each of the primes $p, q$: the shortest one with more
/// than a single odd prime, as $p, q$ must be distinct and odd.
pub const MIN_PRIME_BIT_LENGTH: usize = 3;

/// The largest supported bit length of each of the primes $p, q$, bounded by the width of
/// [`LargePrimeSizedNumber`] (so that $N$ fits a [`LargeBiPrimeSizedNumber`] and $N^2$ a
/// [`PaillierModulusSizedNumber`]).
pub const MAX_PRIME_BIT_LENGTH: usize = LargePrimeSizedNumber::BITS;

/// The number of draws a rejection-sampling loop performs before giving up.
pub const MAX_SAMPLING_ATTEMPTS: usize = 256;

pub(crate) trait AsNaturalNumber<const LIMBS: usize> {
    fn as_natural_number(&self) -> Uint<LIMBS>;
}

pub(crate) trait AsRingElement<const LIMBS: usize> {
    fn as_ring_element(&self, params: &DynResidueParams<LIMBS>) -> DynResidue<LIMBS>;
}

impl<const LIMBS: usize> AsNaturalNumber<LIMBS> for DynResidue<LIMBS> {
    fn as_natural_number(&self) -> Uint<LIMBS> {
        self.retrieve()
    }
}

impl<const LIMBS: usize> AsRingElement<LIMBS> for Uint<LIMBS> {
    fn as_ring_element(&self, params: &DynResidueParams<LIMBS>) -> DynResidue<LIMBS> {
        DynResidue::new(self, *params)
    }
}

/// Known-answer values for the toy key $p = 65521$, $q = 65519$.
#[cfg(any(test, feature = "test_exports"))]
pub mod test_exports {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    pub const P: LargePrimeSizedNumber = LargePrimeSizedNumber::from_u64(65521);
    pub const Q: LargePrimeSizedNumber = LargePrimeSizedNumber::from_u64(65519);
    pub const N: LargeBiPrimeSizedNumber = LargeBiPrimeSizedNumber::from_u64(4292870399);
    pub const N2: PaillierModulusSizedNumber =
        PaillierModulusSizedNumber::from_u64(18428736262610419201);
    pub const PHI: LargeBiPrimeSizedNumber = LargeBiPrimeSizedNumber::from_u64(4292739360);
    pub const PLAINTEXT: LargeBiPrimeSizedNumber = LargeBiPrimeSizedNumber::from_u64(5555);
    pub const RANDOMNESS: LargeBiPrimeSizedNumber = LargeBiPrimeSizedNumber::from_u64(123456789);
    pub const CIPHERTEXT: PaillierModulusSizedNumber =
        PaillierModulusSizedNumber::from_u64(6898860496047394361);

    /// A seeded, reproducible cryptographically-secure generator for tests.
    pub fn deterministic_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto_bigint::{NonZero, RandomMod};
    use rand_core::OsRng;

    #[test]
    fn as_ring_element_and_as_natural_number_circles_correctly() {
        let n2 = test_exports::N2;
        let params = DynResidueParams::new(&n2);
        let x = PaillierModulusSizedNumber::random_mod(&mut OsRng, &NonZero::new(n2).unwrap());

        assert_eq!(x.as_ring_element(&params).as_natural_number(), x);
    }

    #[test]
    fn test_vectors_are_consistent() {
        use test_exports::*;

        let (lo, hi) = P.mul_wide(&Q);
        assert_eq!(hi.concat(&lo), N);
        assert_eq!(N.square(), N2);

        let (lo, hi) = P
            .wrapping_sub(&LargePrimeSizedNumber::ONE)
            .mul_wide(&Q.wrapping_sub(&LargePrimeSizedNumber::ONE));
        assert_eq!(hi.concat(&lo), PHI);
    }
}
