//! Configuration for a generator run.
//!
//! Quick examples
//!
//! Default run (marker prefix `oneof`, value-receiver directive, formatter
//! picked automatically):
//! ```ignore
//! use oneof_common::Config;
//! let cfg = Config::default();
//! ```
//!
//! Pointer directive, always use the built-in formatter:
//! ```ignore
//! use oneof_common::{Config, FormatterChoice};
//! let cfg = Config::builder()
//!     .pointer(true)
//!     .formatter(FormatterChoice::Builtin)
//!     .build();
//! ```

/// Reserved prefix marking the template struct of a union.
pub const DEFAULT_PREFIX: &str = "oneof";

/// Command name written into the regeneration directive.
pub const DEFAULT_GENERATOR: &str = "go-oneof";

/// Which formatter canonicalizes the assembled source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FormatterChoice {
    /// `gofmt` when it can be found on `PATH`, the built-in formatter otherwise.
    #[default]
    Auto,
    /// Always `gofmt`; a missing binary is an error.
    Gofmt,
    /// Always the built-in formatter.
    Builtin,
}

/// Global generator configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Name prefix of the marker struct.
    pub prefix: String,
    /// Whether the regeneration directive asks for `--pointer`.
    ///
    /// This only changes the directive text. Receivers are picked from the
    /// shape of each branch.
    pub pointer: bool,
    /// Formatter used on the assembled buffer.
    pub formatter: FormatterChoice,
    /// Command name written into the regeneration directive.
    pub generator: String,
}

impl Config {
    /// A builder starting from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Marker struct name for a variant, e.g. `oneofNode` for `Node`.
    pub fn marker_name(&self, variant: &str) -> String {
        format!("{}{}", self.prefix, variant)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            pointer: false,
            formatter: FormatterChoice::Auto,
            generator: DEFAULT_GENERATOR.to_string(),
        }
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Marker prefix, `oneof` by default.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    /// Ask for `--pointer` in the regeneration directive.
    pub fn pointer(mut self, pointer: bool) -> Self {
        self.config.pointer = pointer;
        self
    }

    /// Formatter for the assembled buffer.
    pub fn formatter(mut self, formatter: FormatterChoice) -> Self {
        self.config.formatter = formatter;
        self
    }

    /// Shorthand for `formatter(FormatterChoice::Builtin)`.
    pub fn builtin_formatter(self) -> Self {
        self.formatter(FormatterChoice::Builtin)
    }

    /// Finishes the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.prefix, "oneof");
        assert!(!cfg.pointer);
        assert_eq!(cfg.formatter, FormatterChoice::Auto);
        assert_eq!(cfg.marker_name("Node"), "oneofNode");
    }

    #[test]
    fn test_builder() {
        let cfg = Config::builder()
            .pointer(true)
            .builtin_formatter()
            .prefix("sum")
            .build();
        assert!(cfg.pointer);
        assert_eq!(cfg.formatter, FormatterChoice::Builtin);
        assert_eq!(cfg.marker_name("Expr"), "sumExpr");
        assert_eq!(cfg.generator, "go-oneof");
    }
}
