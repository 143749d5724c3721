// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

use core::fmt;

use crypto_bigint::NonZero;
use subtle::CtOption;

use crate::{
    error::{DecryptionError, SanityCheckError},
    AsNaturalNumber, AsRingElement, EncryptionKey, Error, LargeBiPrimeSizedNumber,
    PaillierModulusSizedNumber, PaillierPlaintextRingElement, Result,
};

/// A Paillier private key $(N, N^2, \phi(N))$.
///
/// Carries its own copy of the matching [`EncryptionKey`], so the moduli the two keys hold are
/// always equal.
#[derive(Clone, PartialEq, Eq)]
pub struct DecryptionKey {
    encryption_key: EncryptionKey,
    // $ \phi(N) = (p-1)(q-1) $
    phi: LargeBiPrimeSizedNumber,
}

impl DecryptionKey {
    pub fn new(
        encryption_key: EncryptionKey,
        phi: LargeBiPrimeSizedNumber,
    ) -> Result<DecryptionKey> {
        if phi == LargeBiPrimeSizedNumber::ZERO || &phi >= encryption_key.n() {
            return Err(SanityCheckError::InvalidTotient.into());
        }

        let decryption_key = DecryptionKey {
            encryption_key,
            phi,
        };

        decryption_key
            .phi_inverse()
            .map_err(|_| Error::from(SanityCheckError::InvalidTotient))?;

        Ok(decryption_key)
    }

    pub fn encryption_key(&self) -> &EncryptionKey {
        &self.encryption_key
    }

    pub fn phi(&self) -> &LargeBiPrimeSizedNumber {
        &self.phi
    }

    /// Decrypts `ciphertext` $ c \in [0, N^2) $ to the unique $ m \in [0, N) $ it encrypts.
    ///
    /// Fails with [`DecryptionError::InexactDivision`] rather than returning a wrong plaintext
    /// when `c` is not a valid ciphertext under this key.
    pub fn decrypt(
        &self,
        ciphertext: &PaillierModulusSizedNumber,
    ) -> Result<LargeBiPrimeSizedNumber> {
        self.encryption_key.check_ciphertext(ciphertext)?;

        let n = self.encryption_key.n();

        // $ a = c^{\phi(N)} mod N^2 $; $ \phi(N) < N $ bounds the exponent's bit length.
        let a = ciphertext
            .as_ring_element(self.encryption_key.n2_params())
            .pow_bounded_exp(&self.phi, n.bits_vartime())
            .as_natural_number();

        // Valid ciphertexts satisfy $ a = (1 + N)^{m \phi(N)} = 1 + m \phi(N) N mod N^2 $,
        // so $ a \equiv 1 mod N $, and in particular $ a \ne 0 $.
        if a == PaillierModulusSizedNumber::ZERO {
            return Err(DecryptionError::InexactDivision.into());
        }

        let n_wide: PaillierModulusSizedNumber = n.resize();
        let n_wide = Option::<NonZero<PaillierModulusSizedNumber>>::from(NonZero::new(n_wide))
            .ok_or(Error::InternalError)?;

        // $ b = (a - 1) / N $, computed over the integers and required to be exact
        let (b, remainder) = a
            .wrapping_sub(&PaillierModulusSizedNumber::ONE)
            .div_rem(&n_wide);

        if remainder != PaillierModulusSizedNumber::ZERO {
            return Err(DecryptionError::InexactDivision.into());
        }

        // $ a - 1 < N^2 $, so $ b < N $ fits the plaintext size.
        let b: LargeBiPrimeSizedNumber = b.resize();
        let b: PaillierPlaintextRingElement = b.as_ring_element(self.encryption_key.n_params());

        // $ m = b * \phi(N)^{-1} mod N $
        Ok((b * self.phi_inverse()?).as_natural_number())
    }

    fn phi_inverse(&self) -> Result<PaillierPlaintextRingElement> {
        let (inverse, is_invertible) = self
            .phi
            .as_ring_element(self.encryption_key.n_params())
            .invert();

        Option::<PaillierPlaintextRingElement>::from(CtOption::new(inverse, is_invertible.into()))
            .ok_or(Error::from(DecryptionError::NonInvertibleTotient))
    }
}

impl fmt::Debug for DecryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptionKey")
            .field("encryption_key", &self.encryption_key)
            .field("phi", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::test_exports::{CIPHERTEXT, N, N2, P, PHI, PLAINTEXT, RANDOMNESS};

    fn decryption_key() -> DecryptionKey {
        DecryptionKey::new(EncryptionKey::new(N).unwrap(), PHI).unwrap()
    }

    #[test]
    fn decrypts() {
        assert_eq!(decryption_key().decrypt(&CIPHERTEXT).unwrap(), PLAINTEXT);
    }

    #[rstest]
    #[case::zero(LargeBiPrimeSizedNumber::ZERO)]
    #[case::one(LargeBiPrimeSizedNumber::ONE)]
    #[case::n_minus_one(N.wrapping_sub(&LargeBiPrimeSizedNumber::ONE))]
    fn decrypts_boundary_plaintexts(#[case] plaintext: LargeBiPrimeSizedNumber) {
        let decryption_key = decryption_key();
        let ciphertext = decryption_key
            .encryption_key()
            .encrypt_with_randomness(&plaintext, &RANDOMNESS)
            .unwrap();

        assert_eq!(decryption_key.decrypt(&ciphertext).unwrap(), plaintext);
    }

    #[rstest]
    #[case::zero(PaillierModulusSizedNumber::ZERO)]
    #[case::n(N.resize())]
    #[case::p(P.resize())]
    #[case::multiple_of_q(PaillierModulusSizedNumber::from(65519u64 * 7))]
    fn rejects_malformed_ciphertexts(#[case] ciphertext: PaillierModulusSizedNumber) {
        assert_eq!(
            decryption_key().decrypt(&ciphertext),
            Err(DecryptionError::InexactDivision.into())
        );
    }

    #[test]
    fn rejects_out_of_range_ciphertexts() {
        assert_eq!(
            decryption_key().decrypt(&N2),
            Err(SanityCheckError::CiphertextOutOfRange.into())
        );
    }

    #[rstest]
    #[case::zero(LargeBiPrimeSizedNumber::ZERO)]
    #[case::n(N)]
    #[case::shares_a_factor_with_n(P.resize())]
    fn rejects_invalid_totients(#[case] phi: LargeBiPrimeSizedNumber) {
        assert_eq!(
            DecryptionKey::new(EncryptionKey::new(N).unwrap(), phi),
            Err(SanityCheckError::InvalidTotient.into())
        );
    }

    #[test]
    fn debug_redacts_the_totient() {
        let debug = format!("{:?}", decryption_key());

        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(&format!("{:?}", PHI)));
    }
}
