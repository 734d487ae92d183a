use std::path::PathBuf;

use clap::Parser;
use oneof_common::{Config, FormatterChoice};

/// Generate Go sum types from a `oneof<Name>` template struct
#[derive(Parser, Debug)]
#[command(name = "go-oneof")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Go file holding the oneof struct; it is rewritten in place
    #[arg(value_name = "FILE", value_parser = go_file)]
    pub file: PathBuf,

    /// Implement oneof interface over pointer to struct
    #[arg(short = 'p', long, default_value_t = false)]
    pub pointer: bool,

    /// Formatter applied to the generated file
    #[arg(long, value_enum, default_value = "auto")]
    pub formatter: FormatterArg,

    /// Log more, repeat for more detail
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn go_file(value: &str) -> Result<PathBuf, String> {
    if value.ends_with(".go") {
        Ok(PathBuf::from(value))
    } else {
        Err("FILE must be go file".to_string())
    }
}

impl Args {
    /// Convert command-line arguments into internal configuration
    pub fn to_config(&self) -> Config {
        Config::builder()
            .pointer(self.pointer)
            .formatter(self.formatter.into())
            .build()
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Command-line argument wrapper for FormatterChoice
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FormatterArg {
    /// gofmt when available, the built-in formatter otherwise
    #[value(name = "auto")]
    Auto,
    /// Always gofmt
    #[value(name = "gofmt")]
    Gofmt,
    /// Always the built-in formatter
    #[value(name = "builtin")]
    Builtin,
}

impl From<FormatterArg> for FormatterChoice {
    fn from(arg: FormatterArg) -> Self {
        match arg {
            FormatterArg::Auto => FormatterChoice::Auto,
            FormatterArg::Gofmt => FormatterChoice::Gofmt,
            FormatterArg::Builtin => FormatterChoice::Builtin,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["go-oneof", "node.go"]).unwrap();
        let config = args.to_config();
        assert_eq!(args.file, PathBuf::from("node.go"));
        assert!(!config.pointer);
        assert_eq!(config.formatter, FormatterChoice::Auto);
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "go-oneof",
            "-p",
            "--formatter",
            "builtin",
            "-vv",
            "pkg/node.go",
        ])
        .unwrap();
        let config = args.to_config();
        assert!(config.pointer);
        assert_eq!(config.formatter, FormatterChoice::Builtin);
        assert_eq!(args.log_level(), "debug");
    }

    #[rstest]
    #[case(&["go-oneof", "node.txt"], ErrorKind::ValueValidation)]
    #[case(&["go-oneof"], ErrorKind::MissingRequiredArgument)]
    #[case(&["go-oneof", "--formatter", "clang", "node.go"], ErrorKind::InvalidValue)]
    fn test_usage_errors(#[case] argv: &[&str], #[case] kind: ErrorKind) {
        let err = Args::try_parse_from(argv).unwrap_err();
        assert_eq!(err.kind(), kind);
        assert_eq!(err.exit_code(), 2);
    }
}
