//! read → parse → locate → synthesize → assemble → format → write.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use oneof_common::Config;
use oneof_syntax::parse_source;

use crate::OneofError;
use crate::assemble::{assemble, directive};
use crate::format::{Formatter, formatter_for, numbered_listing};
use crate::locate::locate;
use crate::synth::synthesize;

/// Regenerates Go files with one configuration and formatter.
pub struct Generator {
    config: Config,
    formatter: Box<dyn Formatter>,
}

impl Generator {
    /// A generator using the formatter picked by `config.formatter`.
    ///
    /// # Errors
    ///
    /// Fails when `gofmt` is required but missing.
    pub fn new(config: Config) -> Result<Self, OneofError> {
        let formatter = formatter_for(config.formatter)?;
        tracing::debug!(formatter = formatter.name(), "selected formatter");
        Ok(Self { config, formatter })
    }

    /// A generator using `formatter` whatever `config.formatter` says.
    pub fn with_formatter<F: Formatter + 'static>(config: Config, formatter: F) -> Self {
        Self {
            config,
            formatter: Box::new(formatter),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Produces the new contents for `file`, whose current contents are
    /// `src`. Nothing is written.
    ///
    /// # Errors
    ///
    /// Any parse, validation, rendering or formatting failure.
    pub fn generate(&self, file: &Path, src: &str) -> Result<String, OneofError> {
        let name = file.display().to_string();
        let unit = parse_source(&name, src).map_err(OneofError::Syntax)?;
        tracing::debug!(file = %name, types = unit.types.len(), "parsed");

        let marker = locate(&unit, &self.config)?;
        let artifacts = synthesize(&marker);
        let rendered = artifacts.render()?;
        tracing::debug!(branches = artifacts.branches.len(), "synthesized");

        let base = file
            .file_name()
            .map_or_else(|| name.clone(), |base| base.to_string_lossy().into_owned());
        let buffer = assemble(&unit, &marker, &directive(&self.config, &base), &rendered);

        self.formatter
            .format(&buffer)
            .map_err(|source| OneofError::Format {
                source,
                listing: numbered_listing(&buffer),
            })
    }

    /// Regenerates `path` in place. The file is left untouched on any error.
    ///
    /// # Errors
    ///
    /// Any failure of [`Generator::generate`] plus read and write errors.
    pub fn run(&self, path: &Path) -> Result<(), OneofError> {
        let src = fs::read_to_string(path).map_err(|source| OneofError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let output = self.generate(path, &src)?;

        write_atomic(path, &output).map_err(|source| OneofError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "wrote oneof");
        Ok(())
    }
}

/// Replaces `path` through a temporary file in the same directory, keeping
/// the original permissions.
fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut temp = tempfile::Builder::new()
        .prefix(".go-oneof-")
        .suffix(".go")
        .tempfile_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;

    let permissions = fs::metadata(path)?.permissions();
    fs::set_permissions(temp.path(), permissions)?;

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
