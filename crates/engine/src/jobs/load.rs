//! Parses a signature stream into the slot shared with its [`Signature`].
//!
//! [`Signature`]: crate::Signature

use signature::format::{self, FormatError, HEADER_LEN};
use signature::FileSignature;

use super::{Advance, Stage, fill};
use crate::buffers::Buffers;
use crate::error::{EngineCode, JobError, JobResult};
use crate::loaded_signature::Slot;
use crate::tube::Tube;

#[derive(Debug)]
pub(crate) struct LoadSignature {
    slot: Slot,
    scoop: Vec<u8>,
    signature: Option<FileSignature>,
}

impl LoadSignature {
    pub(crate) fn new(slot: Slot) -> Self {
        Self {
            slot,
            scoop: Vec::with_capacity(HEADER_LEN),
            signature: None,
        }
    }

    fn publish(&mut self, signature: FileSignature) -> JobResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| JobError::internal("signature hand-off slot is poisoned"))?;
        *slot = Some(signature);
        Ok(())
    }
}

impl Stage for LoadSignature {
    fn advance(&mut self, buffers: &mut Buffers<'_>, _tube: &mut Tube) -> JobResult<Advance> {
        let Some(signature) = self.signature.as_mut() else {
            if !fill(&mut self.scoop, buffers, HEADER_LEN) {
                return if buffers.input_ended() {
                    Err(JobError::engine(
                        EngineCode::InputEnded,
                        format!(
                            "signature stream ended after {} of {HEADER_LEN} header bytes",
                            self.scoop.len()
                        ),
                    ))
                } else {
                    Ok(Advance::NeedInput)
                };
            }
            let mut header = [0u8; HEADER_LEN];
            header.copy_from_slice(&self.scoop);
            let layout = format::decode_header(&header).map_err(header_error)?;
            self.scoop.clear();
            self.signature = Some(FileSignature::new(layout));
            return Ok(Advance::Continue);
        };

        let record_len = format::record_len(signature.layout());
        if self.scoop.is_empty() && buffers.avail_in() >= record_len {
            // Records are parsed straight from the caller's input when whole.
            while buffers.avail_in() >= record_len {
                let record = buffers.take_input(record_len);
                let index = signature.len() as u64;
                let block = format::decode_record(index, record);
                signature.push(block.weak(), block.into_strong());
            }
            return Ok(Advance::Continue);
        }

        if fill(&mut self.scoop, buffers, record_len) {
            let block = format::decode_record(signature.len() as u64, &self.scoop);
            signature.push(block.weak(), block.into_strong());
            self.scoop.clear();
            return Ok(Advance::Continue);
        }

        if !buffers.input_ended() {
            return Ok(Advance::NeedInput);
        }
        if !self.scoop.is_empty() {
            return Err(JobError::engine(
                EngineCode::InputEnded,
                format!(
                    "signature stream ended inside block record {} ({} of {record_len} bytes)",
                    signature.len(),
                    self.scoop.len()
                ),
            ));
        }

        if let Some(signature) = self.signature.take() {
            #[cfg(feature = "tracing")]
            logging::debug_signature!(
                blocks = signature.len(),
                block_len = signature.layout().block_len(),
                "signature loaded"
            );
            self.publish(signature)?;
        }
        Ok(Advance::Finished)
    }
}

fn header_error(err: FormatError) -> JobError {
    let code = match err {
        FormatError::BadMagic(_) => EngineCode::BadMagic,
        FormatError::ZeroBlockLength | FormatError::StrongLength { .. } => EngineCode::Corrupt,
    };
    JobError::engine(code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{Machine, Status};
    use core::num::{NonZeroU8, NonZeroU32};
    use signature::{SignatureAlgorithm, SignatureLayout};
    use std::sync::{Arc, Mutex};

    fn layout() -> SignatureLayout {
        SignatureLayout::from_raw_parts(
            SignatureAlgorithm::Md5,
            NonZeroU32::new(16).unwrap(),
            NonZeroU8::new(4).unwrap(),
        )
    }

    fn stream(records: usize) -> Vec<u8> {
        let mut out = format::encode_header(layout()).to_vec();
        for i in 0..records {
            let data = [i as u8; 16];
            format::encode_record(layout(), i as u32, &data, &mut out);
        }
        out
    }

    fn feed(machine: &mut Machine<LoadSignature>, input: &[u8]) -> JobResult<Status> {
        let mut out = [0u8; 0];
        let mut buffers = Buffers::new(input, input.is_empty(), &mut out);
        let status = machine.iterate(&mut buffers)?;
        assert_eq!(buffers.avail_in(), 0);
        Ok(status)
    }

    #[test]
    fn publishes_parsed_records_at_end_of_stream() {
        let slot: Slot = Arc::new(Mutex::new(None));
        let mut machine = Machine::new(LoadSignature::new(Arc::clone(&slot)));
        let data = stream(5);
        for chunk in data.chunks(7) {
            assert_eq!(feed(&mut machine, chunk).unwrap(), Status::Blocked);
        }
        assert!(slot.lock().unwrap().is_none());
        assert_eq!(feed(&mut machine, b"").unwrap(), Status::Done);

        let loaded = slot.lock().unwrap().take().expect("published");
        assert_eq!(loaded.layout(), layout());
        assert_eq!(loaded.len(), 5);
        assert_eq!(loaded.block(3).weak(), 3);
    }

    #[test]
    fn bad_magic_is_reported() {
        let slot: Slot = Arc::new(Mutex::new(None));
        let mut machine = Machine::new(LoadSignature::new(slot));
        let mut data = stream(0);
        data[3] = 0x99;
        let err = feed(&mut machine, &data).unwrap_err();
        assert_eq!(err.code(), Some(EngineCode::BadMagic));
    }

    #[test]
    fn zero_block_length_is_corrupt() {
        let slot: Slot = Arc::new(Mutex::new(None));
        let mut machine = Machine::new(LoadSignature::new(slot));
        let mut data = stream(0);
        data[4..8].copy_from_slice(&[0, 0, 0, 0]);
        let err = feed(&mut machine, &data).unwrap_err();
        assert_eq!(err.code(), Some(EngineCode::Corrupt));
    }

    #[test]
    fn truncated_record_is_input_ended() {
        let slot: Slot = Arc::new(Mutex::new(None));
        let mut machine = Machine::new(LoadSignature::new(Arc::clone(&slot)));
        let data = stream(2);
        feed(&mut machine, &data[..data.len() - 1]).unwrap();
        let err = feed(&mut machine, b"").unwrap_err();
        assert_eq!(err.code(), Some(EngineCode::InputEnded));
        assert!(slot.lock().unwrap().is_none());
    }

    #[test]
    fn truncated_header_is_input_ended() {
        let slot: Slot = Arc::new(Mutex::new(None));
        let mut machine = Machine::new(LoadSignature::new(slot));
        feed(&mut machine, &stream(0)[..5]).unwrap();
        let err = feed(&mut machine, b"").unwrap_err();
        assert_eq!(err.code(), Some(EngineCode::InputEnded));
    }
}
