// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum Error {
    #[error("the following sanity-check error occurred: {0}")]
    SanityCheckError(#[from] SanityCheckError),
    #[error("the following decryption error occurred: {0}")]
    DecryptionError(#[from] DecryptionError),
    #[error("the following sampling error occurred: {0}")]
    SamplingError(#[from] SamplingError),
    #[error("an internal error that should never have happened and signifies a bug")]
    InternalError,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum SanityCheckError {
    #[error("prime bit length {bit_length} is outside the supported range [{min}, {max}]")]
    InvalidPrimeBitLength {
        bit_length: usize,
        min: usize,
        max: usize,
    },
    #[error("plaintext must be smaller than the modulus N")]
    PlaintextOutOfRange,
    #[error("ciphertext must be smaller than the modulus N^2")]
    CiphertextOutOfRange,
    #[error("randomness must be a unit of the ring of integers modulo N")]
    InvalidRandomness,
    #[error("the modulus N must be odd and greater than one")]
    InvalidModulus,
    #[error("the primes p and q must be distinct odd primes")]
    InvalidPrimes,
    #[error("the totient must be smaller than N and invertible modulo N")]
    InvalidTotient,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum DecryptionError {
    #[error("c^phi(N) - 1 is not divisible by N; the ciphertext is malformed or foreign to this key")]
    InexactDivision,
    #[error("phi(N) is not invertible modulo N")]
    NonInvertibleTotient,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum SamplingError {
    #[error("the random source failed: {0}")]
    RandomnessUnavailable(String),
    #[error("rejection sampling gave up after {attempts} attempts")]
    AttemptsExhausted { attempts: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
