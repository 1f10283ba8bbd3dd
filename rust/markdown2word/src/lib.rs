//! Markdown to Word (`.docx`) conversion.
//!
//! A conversion runs in three phases:
//!
//! 1. [`ast::parse`] turns CommonMark text into a [`Document`] tree.
//! 2. [`BlockTranslator`] walks the tree and serializes each output paragraph
//!    as a WordprocessingML fragment, using [`inline::runs`] for styled text.
//! 3. [`package::assemble`] wraps the fragments, styles and relationships
//!    into a zip archive.
//!
//! [`Converter`] drives all three:
//!
//! ```no_run
//! use markdown2word::{ConvertOptions, Converter};
//!
//! let converter = Converter::new(ConvertOptions::default());
//! let docx = converter.convert(b"# Hello\n\nWorld").unwrap();
//! std::fs::write("hello.docx", docx).unwrap();
//! ```

pub mod ast;
pub mod block;
pub mod error;
pub mod inline;
pub mod options;
pub mod package;
pub mod style;
pub mod xml;

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, info, warn};

pub use ast::{Block, Document, Inline};
pub use block::{BlockTranslator, Body, Fragment, FragmentKind};
pub use error::{Error, Result};
pub use options::{ConvertOptions, PageSize};
pub use style::Run;

/// Converts Markdown documents with one fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Parses and translates `input` without packaging it. Bytes that are not
    /// valid UTF-8 are replaced with U+FFFD.
    pub fn fragments(&self, input: &[u8]) -> Result<Body> {
        let source = String::from_utf8_lossy(input);
        if let Cow::Owned(_) = source {
            warn!("input is not valid UTF-8, invalid bytes were replaced with U+FFFD");
        }
        let doc = ast::parse(&source)?;
        debug!("parsed {} top-level blocks", doc.blocks.len());

        let body = BlockTranslator::new(&self.options).translate(&doc)?;
        debug!(
            "translated into {} fragments with {} hyperlinks",
            body.fragments().len(),
            body.hyperlinks().len()
        );
        Ok(body)
    }

    /// Converts Markdown bytes into the bytes of a `.docx` archive.
    pub fn convert(&self, input: &[u8]) -> Result<Vec<u8>> {
        let body = self.fragments(input)?;
        package::assemble(&body, &self.options)
    }

    pub fn convert_to_writer<W: Write>(&self, input: &[u8], mut writer: W) -> Result<()> {
        let docx = self.convert(input)?;
        writer.write_all(&docx).map_err(Error::Output)?;
        writer.flush().map_err(Error::Output)
    }

    /// Reads `input`, converts it and writes the archive to `output`.
    /// Nothing is written if any phase fails.
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<()> {
        let markdown = fs::read(input).map_err(Error::Input)?;
        let docx = self.convert(&markdown)?;
        fs::write(output, &docx).map_err(Error::Output)?;
        info!(
            "wrote {} ({} bytes) from {}",
            output.display(),
            docx.len(),
            input.display()
        );
        Ok(())
    }
}
