//! crates/cli/src/frontend/command_builder.rs
//!
//! The `clap` command definition.

use std::num::{NonZeroU32, NonZeroUsize};

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser, value_parser};
use engine::{SignatureAlgorithm, StrongLength};

pub(crate) const PROGRAM_NAME: &str = "rdelta";

pub(crate) fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compute signatures and deltas of files and apply patches")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Report progress on stderr; repeat for more detail.")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .short('s')
                .help("Print byte and command counts to stderr when done.")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("force")
                .long("force")
                .short('f')
                .help("Overwrite existing output files.")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("buffer-size")
                .long("buffer-size")
                .value_name("BYTES")
                .help("Size of the read and output buffers.")
                .value_parser(value_parser!(NonZeroUsize))
                .action(ArgAction::Set)
                .global(true),
        )
        .subcommand(signature_command())
        .subcommand(delta_command())
        .subcommand(patch_command())
}

fn signature_command() -> Command {
    Command::new("signature")
        .about("Write the signature of BASIS to SIGNATURE")
        .arg(
            Arg::new("block-size")
                .long("block-size")
                .short('b')
                .value_name("BYTES")
                .help("Block length; derived from the basis size when omitted.")
                .value_parser(value_parser!(NonZeroU32))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("sum-size")
                .long("sum-size")
                .short('S')
                .value_name("BYTES")
                .help("Strong checksum bytes per block; 0 for the full digest, 'min' for the smallest safe width.")
                .value_parser(parse_sum_size)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("hash")
                .long("hash")
                .short('H')
                .value_name("ALG")
                .help("Strong checksum algorithm (md4 or md5).")
                .value_parser(parse_hash)
                .default_value("md5")
                .action(ArgAction::Set),
        )
        .arg(operand("basis", "BASIS"))
        .arg(operand("signature", "SIGNATURE"))
}

fn delta_command() -> Command {
    Command::new("delta")
        .about("Write the delta turning the signed basis into NEWFILE")
        .arg(operand("signature", "SIGNATURE").required(true))
        .arg(operand("new", "NEWFILE"))
        .arg(operand("delta", "DELTA"))
}

fn patch_command() -> Command {
    Command::new("patch")
        .about("Apply DELTA to BASIS and write NEWFILE")
        .arg(operand("basis", "BASIS").required(true))
        .arg(operand("delta", "DELTA"))
        .arg(operand("new", "NEWFILE"))
}

fn operand(id: &'static str, name: &'static str) -> Arg {
    Arg::new(id)
        .value_name(name)
        .allow_hyphen_values(true)
        .value_parser(OsStringValueParser::new())
        .action(ArgAction::Set)
}

fn parse_sum_size(value: &str) -> Result<StrongLength, String> {
    if value.eq_ignore_ascii_case("min") {
        return Ok(StrongLength::Minimum);
    }
    let parsed = value
        .parse::<usize>()
        .map_err(|_| format!("'{value}' is not a byte count or 'min'"))?;
    StrongLength::from_override(parsed).map_err(|n| format!("{n} exceeds the 255 byte limit"))
}

fn parse_hash(value: &str) -> Result<SignatureAlgorithm, String> {
    SignatureAlgorithm::from_name(value).ok_or_else(|| format!("unknown hash '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        clap_command().debug_assert();
    }

    #[test]
    fn sum_size_accepts_counts_and_min() {
        assert_eq!(parse_sum_size("0"), Ok(StrongLength::Full));
        assert_eq!(parse_sum_size("MIN"), Ok(StrongLength::Minimum));
        assert!(matches!(parse_sum_size("8"), Ok(StrongLength::Exact(n)) if n.get() == 8));
        assert!(parse_sum_size("256").is_err());
        assert!(parse_sum_size("eight").is_err());
    }

    #[test]
    fn hash_names_are_case_insensitive() {
        assert_eq!(parse_hash("MD4"), Ok(SignatureAlgorithm::Md4));
        assert!(parse_hash("sha1").is_err());
    }
}
