//! crates/cli/src/frontend/arguments.rs
//!
//! Conversion of `clap` matches into an invocation.

use std::ffi::OsString;
use std::fmt;
use std::num::{NonZeroU32, NonZeroUsize};
use std::path::PathBuf;

use clap::ArgMatches;
use clap::error::ErrorKind;
use engine::{JobConfig, SignatureAlgorithm, SignatureOptions, StrongLength};
use logging::Verbosity;

use super::command_builder::clap_command;

/// A file operand, where `-` selects standard input or output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Operand {
    Stdio,
    Path(PathBuf),
}

impl Operand {
    fn from_matches(matches: &mut ArgMatches, id: &str) -> Self {
        match matches.remove_one::<OsString>(id) {
            Some(value) if value != "-" => Self::Path(PathBuf::from(value)),
            _ => Self::Stdio,
        }
    }

    pub(crate) const fn is_stdio(&self) -> bool {
        matches!(self, Self::Stdio)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio => f.write_str("-"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug)]
pub(crate) enum Action {
    Signature {
        basis: Operand,
        signature: Operand,
        options: SignatureOptions,
    },
    Delta {
        signature: Operand,
        new: Operand,
        delta: Operand,
    },
    Patch {
        basis: PathBuf,
        delta: Operand,
        new: Operand,
    },
}

impl Action {
    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Self::Signature { .. } => "signature",
            Self::Delta { .. } => "delta",
            Self::Patch { .. } => "patch",
        }
    }
}

/// Parsed command produced by [`parse_args`].
#[derive(Debug)]
pub(crate) struct ParsedArgs {
    pub(crate) action: Action,
    pub(crate) config: JobConfig,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) verbosity: Verbosity,
    pub(crate) stats: bool,
    pub(crate) force: bool,
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
pub(crate) fn parse_args(arguments: Vec<OsString>) -> Result<ParsedArgs, clap::Error> {
    let mut command = clap_command();
    let mut matches = command.try_get_matches_from_mut(arguments)?;

    let verbosity = Verbosity::from_count(matches.get_count("verbose"));
    let stats = matches.get_flag("stats");
    let force = matches.get_flag("force");
    let config = matches
        .get_one::<NonZeroUsize>("buffer-size")
        .map_or_else(JobConfig::new, |size| {
            JobConfig::new().with_io_buffer_size(*size)
        });

    let action = match matches.remove_subcommand() {
        Some((name, mut sub)) if name == "signature" => {
            let options = SignatureOptions::new()
                .block_length(sub.get_one::<NonZeroU32>("block-size").copied())
                .strong_length(
                    sub.get_one::<StrongLength>("sum-size")
                        .copied()
                        .unwrap_or_default(),
                )
                .algorithm(
                    sub.get_one::<SignatureAlgorithm>("hash")
                        .copied()
                        .unwrap_or_default(),
                );
            Action::Signature {
                basis: Operand::from_matches(&mut sub, "basis"),
                signature: Operand::from_matches(&mut sub, "signature"),
                options,
            }
        }
        Some((name, mut sub)) if name == "delta" => {
            let signature = Operand::from_matches(&mut sub, "signature");
            let new = Operand::from_matches(&mut sub, "new");
            if signature.is_stdio() && new.is_stdio() {
                return Err(command.error(
                    ErrorKind::ArgumentConflict,
                    "SIGNATURE and NEWFILE cannot both be read from standard input",
                ));
            }
            Action::Delta {
                signature,
                new,
                delta: Operand::from_matches(&mut sub, "delta"),
            }
        }
        Some((name, mut sub)) if name == "patch" => {
            let Operand::Path(basis) = Operand::from_matches(&mut sub, "basis") else {
                return Err(command.error(
                    ErrorKind::InvalidValue,
                    "BASIS must be a seekable file, not standard input",
                ));
            };
            Action::Patch {
                basis,
                delta: Operand::from_matches(&mut sub, "delta"),
                new: Operand::from_matches(&mut sub, "new"),
            }
        }
        _ => return Err(command.error(ErrorKind::MissingSubcommand, "no subcommand given")),
    };

    Ok(ParsedArgs {
        action,
        config,
        verbosity,
        stats,
        force,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ParsedArgs, clap::Error> {
        parse_args(args.iter().map(OsString::from).collect())
    }

    #[test]
    fn signature_defaults_to_standard_streams() {
        let parsed = parse(&["rdelta", "signature"]).unwrap();
        let Action::Signature {
            basis,
            signature,
            options,
        } = parsed.action
        else {
            panic!("expected signature action");
        };
        assert_eq!(basis, Operand::Stdio);
        assert_eq!(signature, Operand::Stdio);
        assert_eq!(options, SignatureOptions::new());
        assert_eq!(parsed.verbosity, Verbosity::Warn);
    }

    #[test]
    fn signature_options_are_collected() {
        let parsed = parse(&[
            "rdelta", "-vv", "signature", "-b", "512", "-S", "8", "--hash", "md4", "basis", "-",
        ])
        .unwrap();
        let Action::Signature {
            basis,
            signature,
            options,
        } = parsed.action
        else {
            panic!("expected signature action");
        };
        assert_eq!(basis, Operand::Path(PathBuf::from("basis")));
        assert_eq!(signature, Operand::Stdio);
        let expected = SignatureOptions::new()
            .block_length(NonZeroU32::new(512))
            .strong_length(StrongLength::from_override(8).unwrap())
            .algorithm(SignatureAlgorithm::Md4);
        assert_eq!(options, expected);
        assert_eq!(parsed.verbosity, Verbosity::Debug);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let parsed = parse(&[
            "rdelta",
            "delta",
            "sig",
            "new",
            "out",
            "--stats",
            "--force",
            "--buffer-size",
            "4096",
        ])
        .unwrap();
        assert!(parsed.stats);
        assert!(parsed.force);
        assert_eq!(parsed.config.io_buffer_size(), 4096);
        assert_eq!(parsed.action.name(), "delta");
    }

    #[test]
    fn zero_buffer_size_is_rejected() {
        let err = parse(&["rdelta", "--buffer-size", "0", "signature"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn delta_cannot_read_both_inputs_from_stdin() {
        let err = parse(&["rdelta", "delta", "-"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn patch_basis_must_be_a_file() {
        let err = parse(&["rdelta", "patch", "-", "delta"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);

        let parsed = parse(&["rdelta", "patch", "basis"]).unwrap();
        let Action::Patch { basis, delta, new } = parsed.action else {
            panic!("expected patch action");
        };
        assert_eq!(basis, PathBuf::from("basis"));
        assert!(delta.is_stdio() && new.is_stdio());
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(parse(&["rdelta", "-v"]).is_err());
    }
}
