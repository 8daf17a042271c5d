//! Signature generation: one record per block of the input.

use checksums::RollingDigest;
use signature::SignatureLayout;
use signature::format::{encode_header, encode_record};

use super::{Advance, Stage};
use crate::buffers::Buffers;
use crate::error::JobResult;
use crate::tube::Tube;

#[derive(Debug)]
pub(crate) struct GenerateSignature {
    layout: SignatureLayout,
    header_sent: bool,
    block: Vec<u8>,
    #[cfg_attr(not(any(test, feature = "tracing")), allow(dead_code))]
    blocks: u64,
}

impl GenerateSignature {
    pub(crate) fn new(layout: SignatureLayout) -> Self {
        Self {
            layout,
            header_sent: false,
            block: Vec::with_capacity(layout.block_len()),
            blocks: 0,
        }
    }

    #[cfg(test)]
    pub(crate) const fn blocks(&self) -> u64 {
        self.blocks
    }

    fn emit(&mut self, data: &[u8], tube: &mut Tube) {
        push_record(self.layout, data, tube);
        self.blocks += 1;
    }
}

impl Stage for GenerateSignature {
    fn advance(&mut self, buffers: &mut Buffers<'_>, tube: &mut Tube) -> JobResult<Advance> {
        if !self.header_sent {
            tube.put(&encode_header(self.layout));
            self.header_sent = true;
            return Ok(Advance::Continue);
        }

        let block_len = self.layout.block_len();
        if self.block.is_empty() && buffers.avail_in() >= block_len {
            let data = buffers.take_input(block_len);
            self.emit(data, tube);
            return Ok(Advance::Continue);
        }

        let chunk = buffers.take_input(block_len - self.block.len());
        self.block.extend_from_slice(chunk);
        if self.block.len() == block_len || (buffers.input_ended() && !self.block.is_empty()) {
            push_record(self.layout, &self.block, tube);
            self.blocks += 1;
            self.block.clear();
            return Ok(Advance::Continue);
        }

        if buffers.input_ended() {
            #[cfg(feature = "tracing")]
            logging::debug_signature!(blocks = self.blocks, "signature generated");
            Ok(Advance::Finished)
        } else {
            Ok(Advance::NeedInput)
        }
    }
}

fn push_record(layout: SignatureLayout, data: &[u8], tube: &mut Tube) {
    let weak = RollingDigest::from_bytes(data).value();
    encode_record(layout, weak, data, tube.buffer_mut());
}
