// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use crypto_bigint::{NonZero, RandomMod};
use paillier::{KeyPair, LargeBiPrimeSizedNumber};
use rand_core::OsRng;

pub fn key_generation_benches(c: &mut Criterion) {
    let mut g = c.benchmark_group("key generation benches");
    g.sample_size(10);

    for prime_bit_length in [256, 512, 1024] {
        g.bench_function(format!("generate() with {prime_bit_length}-bit primes"), |bench| {
            bench.iter(|| KeyPair::generate(prime_bit_length, &mut OsRng).unwrap());
        });
    }

    g.finish();
}

pub fn encryption_scheme_benches(c: &mut Criterion) {
    let mut g = c.benchmark_group("encryption scheme benches");

    for prime_bit_length in [512, 1024] {
        let key_pair = KeyPair::generate(prime_bit_length, &mut OsRng).unwrap();
        let (encryption_key, decryption_key) =
            (key_pair.encryption_key(), key_pair.decryption_key());
        let modulus = NonZero::new(*encryption_key.n()).unwrap();

        let random_plaintext = || LargeBiPrimeSizedNumber::random_mod(&mut OsRng, &modulus);
        let random_ciphertext = || {
            encryption_key
                .encrypt(&random_plaintext(), &mut OsRng)
                .unwrap()
        };

        g.bench_function(format!("encrypt() with {prime_bit_length}-bit primes"), |bench| {
            bench.iter_batched(
                random_plaintext,
                |plaintext| encryption_key.encrypt(&plaintext, &mut OsRng).unwrap(),
                BatchSize::SmallInput,
            );
        });

        g.bench_function(format!("decrypt() with {prime_bit_length}-bit primes"), |bench| {
            bench.iter_batched(
                random_ciphertext,
                |ciphertext| decryption_key.decrypt(&ciphertext).unwrap(),
                BatchSize::SmallInput,
            );
        });

        g.bench_function(format!("add() with {prime_bit_length}-bit primes"), |bench| {
            bench.iter_batched(
                || (random_ciphertext(), random_ciphertext()),
                |(lhs, rhs)| encryption_key.add(&lhs, &rhs).unwrap(),
                BatchSize::SmallInput,
            );
        });

        g.bench_function(format!("multiply() with {prime_bit_length}-bit primes"), |bench| {
            bench.iter_batched(
                || (random_plaintext(), random_ciphertext()),
                |(scalar, ciphertext)| encryption_key.multiply(&scalar, &ciphertext).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }

    g.finish();
}

criterion_group! {
  name = benches;
  config = Criterion::default().measurement_time(Duration::from_secs(10));
  targets = key_generation_benches, encryption_scheme_benches
}

criterion_main!(benches);
