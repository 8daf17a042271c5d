//! Stepping invariants that must hold for every job variant regardless of
//! how input is chunked and how small the output buffer starts.

use core::num::NonZeroU32;

use engine::{
    Job, Signature, SignatureOptions, begin_create_delta, begin_load_signature, begin_patch,
    begin_signature_with,
};
use proptest::prelude::*;

/// Drives `job` to completion and returns everything it produced.
fn drive(job: &mut Job<'_>, input: &[u8], chunk: usize, initial_output: usize) -> Vec<u8> {
    let mut output = vec![0u8; initial_output];
    let mut produced = Vec::new();
    for piece in input.chunks(chunk) {
        let step = job.step(piece, &mut output).expect("step");
        produced.extend_from_slice(&output[..step.produced]);
        if step.done {
            assert_eq!(step.unused_input, 0);
            return produced;
        }
        assert_eq!(step.unused_input, 0);
    }
    let step = job.step(&[], &mut output).expect("final step");
    assert!(step.done);
    produced.extend_from_slice(&output[..step.produced]);
    produced
}

fn options(block_len: u32) -> SignatureOptions {
    SignatureOptions::new().block_length(NonZeroU32::new(block_len))
}

fn signature_bytes(basis: &[u8], block_len: u32) -> Vec<u8> {
    let (mut job, _) = begin_signature_with(options(block_len)).expect("layout");
    drive(&mut job, basis, 1 << 20, 1 << 20)
}

fn loaded(signature: &[u8]) -> Signature {
    let (mut job, mut loaded) = begin_load_signature();
    drive(&mut job, signature, 1 << 20, 16);
    loaded.build_hash_table().expect("hash table");
    loaded
}

fn edited(basis: &[u8], at: usize, insert: &[u8]) -> Vec<u8> {
    let at = at.min(basis.len());
    let mut new = basis[..at].to_vec();
    new.extend_from_slice(insert);
    new.extend_from_slice(&basis[at..]);
    new
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn signature_output_is_independent_of_buffering(
        basis in proptest::collection::vec(any::<u8>(), 0..3000),
        block_len in 1u32..300,
        chunk in 1usize..700,
        initial in 1usize..64,
    ) {
        let (mut small, _) = begin_signature_with(options(block_len)).unwrap();
        let (mut large, _) = begin_signature_with(options(block_len)).unwrap();
        prop_assert_eq!(
            drive(&mut small, &basis, chunk, initial),
            drive(&mut large, &basis, basis.len().max(1), 1 << 20)
        );
    }

    #[test]
    fn delta_output_is_independent_of_buffering(
        basis in proptest::collection::vec(any::<u8>(), 0..3000),
        insert in proptest::collection::vec(any::<u8>(), 0..200),
        at in 0usize..3000,
        chunk in 1usize..700,
        initial in 1usize..64,
    ) {
        let signature = loaded(&signature_bytes(&basis, 64));
        let new = edited(&basis, at, &insert);

        let mut small = begin_create_delta(&signature).unwrap();
        let mut large = begin_create_delta(&signature).unwrap();
        prop_assert_eq!(
            drive(&mut small, &new, chunk, initial),
            drive(&mut large, &new, new.len().max(1), 1 << 20)
        );
    }

    #[test]
    fn patch_output_is_independent_of_buffering(
        basis in proptest::collection::vec(any::<u8>(), 1..3000),
        insert in proptest::collection::vec(any::<u8>(), 0..200),
        at in 0usize..3000,
        chunk in 1usize..700,
        initial in 1usize..64,
    ) {
        let signature = loaded(&signature_bytes(&basis, 32));
        let new = edited(&basis, at, &insert);
        let mut delta_job = begin_create_delta(&signature).unwrap();
        let delta = drive(&mut delta_job, &new, 1 << 20, 1 << 20);

        let mut small = begin_patch(basis.as_slice());
        let mut large = begin_patch(basis.as_slice());
        let rebuilt = drive(&mut small, &delta, chunk, initial);
        prop_assert_eq!(&rebuilt, &drive(&mut large, &delta, delta.len(), 1 << 20));
        prop_assert_eq!(rebuilt, new);
    }

    #[test]
    fn signature_round_trip_reproduces_input(
        data in proptest::collection::vec(any::<u8>(), 0..5000),
        block_len in 1u32..512,
    ) {
        let signature = loaded(&signature_bytes(&data, block_len));
        let mut delta_job = begin_create_delta(&signature).unwrap();
        let delta = drive(&mut delta_job, &data, 333, 1);
        let stats = delta_job.command_stats().unwrap();
        prop_assert_eq!(stats.literal_bytes, 0);

        let mut patch = begin_patch(data.as_slice());
        prop_assert_eq!(&drive(&mut patch, &delta, 97, 1), &data);
    }
}
