use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use engine::{
    JobError, StateError, begin_create_delta, begin_load_signature, begin_patch, begin_signature,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill(&mut data[..]);
    data
}

#[test]
fn ten_thousand_byte_round_trip() {
    let original = random_bytes(10_000, 0x5eed);

    let (mut job, layout) = begin_signature(Some(10_000), None).expect("signature job");
    assert_eq!(layout.block_len(), 256);
    assert_eq!(layout.strong_len(), 16);
    let mut output = vec![0u8; 64];
    let mut signature_bytes = Vec::new();
    for chunk in original.chunks(1000).chain(std::iter::once(&[][..])) {
        let step = job.step(chunk, &mut output).expect("signature step");
        signature_bytes.extend_from_slice(&output[..step.produced]);
    }
    assert!(job.is_done());
    assert_eq!(signature_bytes.len(), 12 + 40 * 20);

    let (mut loader, mut signature) = begin_load_signature();
    for chunk in signature_bytes.chunks(77).chain(std::iter::once(&[][..])) {
        let step = loader.step(chunk, &mut output).expect("load step");
        assert_eq!(step.produced, 0);
    }
    assert!(loader.is_done());
    signature.build_hash_table().expect("hash table");
    assert_eq!(signature.block_count(), Some(40));

    let mut delta_job = begin_create_delta(&signature).expect("delta job");
    let mut delta = Vec::new();
    for chunk in original.chunks(4096).chain(std::iter::once(&[][..])) {
        let step = delta_job.step(chunk, &mut output).expect("delta step");
        delta.extend_from_slice(&output[..step.produced]);
    }

    let source = |offset: u64, buf: &mut [u8]| -> io::Result<usize> {
        let start = offset as usize;
        let n = buf.len().min(original.len() - start);
        buf[..n].copy_from_slice(&original[start..start + n]);
        Ok(n)
    };
    let mut patch = begin_patch(source);
    let mut rebuilt = Vec::new();
    let mut last = None;
    for chunk in delta.chunks(500) {
        let step = patch.step(chunk, &mut output).expect("patch step");
        rebuilt.extend_from_slice(&output[..step.produced]);
        last = Some(step);
    }
    let last = last.expect("delta is not empty");
    assert!(last.done);
    assert_eq!(last.unused_input, 0);
    assert_eq!(rebuilt, original);
}

#[test]
fn completed_job_steps_are_no_ops() {
    let (mut job, _) = begin_signature(Some(5), None).expect("signature job");
    let mut output = Vec::new();
    job.step(b"hello", &mut output).expect("data");
    let step = job.step(b"", &mut output).expect("end");
    assert!(step.done);

    let before = output.clone();
    for _ in 0..3 {
        let step = job.step(b"", &mut output).expect("idle step");
        assert_eq!((step.done, step.unused_input, step.produced), (true, 0, 0));
    }
    assert_eq!(output, before);
}

#[test]
fn empty_chunk_ends_stream_after_single_payload() {
    let payload = random_bytes(300, 7);
    let (mut job, _) = begin_signature(Some(300), None).expect("signature job");
    let mut output = Vec::new();
    let first = job.step(&payload, &mut output).expect("payload");
    assert!(!first.done);
    let last = job.step(&[], &mut output).expect("end of stream");
    assert!(last.done);
    assert_eq!(first.produced + last.produced, 12 + 2 * 20);
}

#[test]
fn short_source_reads_resume_at_the_next_offset() {
    let basis = random_bytes(5000, 11);
    let new = {
        let mut new = basis.clone();
        new.truncate(4900);
        new.extend_from_slice(b"tail");
        new
    };

    let (mut job, _) = begin_signature(Some(basis.len() as u64), None).expect("signature job");
    let mut output = Vec::new();
    let mut sig = Vec::new();
    for chunk in [&basis[..], &[][..]] {
        let step = job.step(chunk, &mut output).expect("signature step");
        sig.extend_from_slice(&output[..step.produced]);
    }
    let (mut loader, mut signature) = begin_load_signature();
    loader.step(&sig, &mut output).expect("load");
    loader.step(&[], &mut output).expect("load end");
    signature.build_hash_table().expect("hash table");

    let mut delta_job = begin_create_delta(&signature).expect("delta job");
    let mut delta = Vec::new();
    for chunk in [&new[..], &[][..]] {
        let step = delta_job.step(chunk, &mut output).expect("delta step");
        delta.extend_from_slice(&output[..step.produced]);
    }

    let calls = AtomicUsize::new(0);
    let stingy = |offset: u64, buf: &mut [u8]| -> io::Result<usize> {
        calls.fetch_add(1, Ordering::Relaxed);
        let start = offset as usize;
        let n = buf.len().min(7).min(basis.len() - start);
        buf[..n].copy_from_slice(&basis[start..start + n]);
        Ok(n)
    };
    let mut patch = begin_patch(stingy);
    let mut rebuilt = Vec::new();
    for chunk in [&delta[..], &[][..]] {
        let step = patch.step(chunk, &mut output).expect("patch step");
        rebuilt.extend_from_slice(&output[..step.produced]);
    }
    let copied = patch.command_stats().expect("patch stats").copy_bytes;
    drop(patch);
    assert_eq!(rebuilt, new);
    assert!(copied > 0);
    assert!(calls.load(Ordering::Relaxed) as u64 >= copied.div_ceil(7));
}

#[test]
fn delta_from_unbuilt_signature_is_rejected() {
    let (mut loader, signature) = begin_load_signature();
    let (mut sig_job, _) = begin_signature(None, None).expect("signature job");
    let mut output = Vec::new();
    let step = sig_job.step(&[], &mut output).expect("empty signature");
    loader.step(&output[..step.produced], &mut Vec::new()).expect("load");
    loader.step(&[], &mut Vec::new()).expect("load end");

    let err = begin_create_delta(&signature).unwrap_err();
    assert!(matches!(err, JobError::State(StateError::HashTableNotBuilt)));
}

#[test]
fn building_before_load_completes_fails() {
    let (_loader, mut signature) = begin_load_signature();
    let err = signature.build_hash_table().unwrap_err();
    assert_eq!(err.code(), Some(engine::EngineCode::InputEnded));
}
