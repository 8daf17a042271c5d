//! crates/engine/src/command.rs
//!
//! Delta stream command encoding.
//!
//! ```text
//! stream  : magic u32 | command* | END
//! END     : 0x00
//! LITERAL : 0x01..=0x40                    (length in the opcode, data follows)
//!         | 0x41..=0x44 len                (1/2/4/8-byte length, data follows)
//! COPY    : 0x45..=0x54 offset len         (0x45 + 4 * w(offset) + w(len))
//! ```
//!
//! All integers are big-endian. Encoders always pick the narrowest width
//! that holds the value.

/// Magic number at the start of every delta stream.
pub const DELTA_MAGIC: u32 = 0x7273_0236;

const OP_END: u8 = 0x00;
const OP_LITERAL_IMMEDIATE_MAX: u8 = 0x40;
const OP_LITERAL_N1: u8 = 0x41;
const OP_COPY_N1_N1: u8 = 0x45;
const OP_COPY_N8_N8: u8 = 0x54;

const WIDTHS: [usize; 4] = [1, 2, 4, 8];

/// A decoded delta command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// End of the delta stream.
    End,
    /// The next `len` bytes of the stream are copied to the output.
    Literal(u64),
    /// `len` bytes of the basis starting at `offset` are copied to the output.
    Copy {
        /// Byte offset into the basis.
        offset: u64,
        /// Number of bytes.
        len: u64,
    },
}

/// Decoded command byte, before its parameters are read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Opcode {
    /// END.
    End,
    /// Literal whose length is carried in the opcode.
    ImmediateLiteral(u8),
    /// Literal followed by a length field of the given width.
    Literal {
        /// Width of the length field in bytes.
        len_width: usize,
    },
    /// Copy followed by offset and length fields.
    Copy {
        /// Width of the offset field in bytes.
        offset_width: usize,
        /// Width of the length field in bytes.
        len_width: usize,
    },
}

impl Opcode {
    /// Decodes a command byte; `None` for bytes no command uses.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            OP_END => Some(Self::End),
            1..=OP_LITERAL_IMMEDIATE_MAX => Some(Self::ImmediateLiteral(byte)),
            OP_LITERAL_N1..OP_COPY_N1_N1 => Some(Self::Literal {
                len_width: WIDTHS[(byte - OP_LITERAL_N1) as usize],
            }),
            OP_COPY_N1_N1..=OP_COPY_N8_N8 => {
                let selector = (byte - OP_COPY_N1_N1) as usize;
                Some(Self::Copy {
                    offset_width: WIDTHS[selector / 4],
                    len_width: WIDTHS[selector % 4],
                })
            }
            _ => None,
        }
    }

    /// Number of parameter bytes following the command byte.
    #[must_use]
    pub const fn param_len(self) -> usize {
        match self {
            Self::End | Self::ImmediateLiteral(_) => 0,
            Self::Literal { len_width } => len_width,
            Self::Copy {
                offset_width,
                len_width,
            } => offset_width + len_width,
        }
    }

    /// Builds the command from its parameter bytes.
    ///
    /// `params` must hold exactly [`param_len`](Self::param_len) bytes.
    #[must_use]
    pub fn command(self, params: &[u8]) -> Command {
        match self {
            Self::End => Command::End,
            Self::ImmediateLiteral(len) => Command::Literal(u64::from(len)),
            Self::Literal { .. } => Command::Literal(read_be(params)),
            Self::Copy { offset_width, .. } => Command::Copy {
                offset: read_be(&params[..offset_width]),
                len: read_be(&params[offset_width..]),
            },
        }
    }
}

/// Counts of the commands carried by a delta stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CommandStats {
    /// Literal commands.
    pub literal_commands: u64,
    /// Bytes carried by literal commands.
    pub literal_bytes: u64,
    /// Copy commands.
    pub copy_commands: u64,
    /// Bytes described by copy commands.
    pub copy_bytes: u64,
}

impl CommandStats {
    pub(crate) fn record(&mut self, command: Command) {
        match command {
            Command::End => {}
            Command::Literal(len) => {
                self.literal_commands += 1;
                self.literal_bytes += len;
            }
            Command::Copy { len, .. } => {
                self.copy_commands += 1;
                self.copy_bytes += len;
            }
        }
    }
}

/// Appends the stream magic.
pub fn encode_magic(out: &mut Vec<u8>) {
    out.extend_from_slice(&DELTA_MAGIC.to_be_bytes());
}

/// Appends `command`; literal data is not included.
pub fn encode(command: Command, out: &mut Vec<u8>) {
    match command {
        Command::End => out.push(OP_END),
        Command::Literal(len) if len <= u64::from(OP_LITERAL_IMMEDIATE_MAX) => {
            debug_assert!(len > 0, "zero-length literal");
            out.push(len as u8);
        }
        Command::Literal(len) => {
            let width = width_index(len);
            out.push(OP_LITERAL_N1 + width as u8);
            write_be(len, WIDTHS[width], out);
        }
        Command::Copy { offset, len } => {
            let offset_width = width_index(offset);
            let len_width = width_index(len);
            out.push(OP_COPY_N1_N1 + (offset_width * 4 + len_width) as u8);
            write_be(offset, WIDTHS[offset_width], out);
            write_be(len, WIDTHS[len_width], out);
        }
    }
}

const fn width_index(value: u64) -> usize {
    if value <= 0xff {
        0
    } else if value <= 0xffff {
        1
    } else if value <= 0xffff_ffff {
        2
    } else {
        3
    }
}

fn write_be(value: u64, width: usize, out: &mut Vec<u8>) {
    out.extend_from_slice(&value.to_be_bytes()[8 - width..]);
}

fn read_be(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}
