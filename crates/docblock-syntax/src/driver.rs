//! Driver — scans a line source for block starts and accumulates blocks.

use crate::block::{Block, BlockBuilder, BlockState};
use crate::error::{DocError, Result};
use crate::line::{classify, is_block_start};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Sequential line input: the next line, or `None` at end of input.
pub trait LineSource {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl LineSource for std::str::Lines<'_> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.next().map(str::to_string))
    }
}

impl<B: BufRead> LineSource for io::Lines<B> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.next().transpose()
    }
}

/// Reads blocks one at a time from a line source.
pub struct BlockParser<'f, S> {
    file: &'f str,
    source: S,
    line: usize,
}

impl<'f, S: LineSource> BlockParser<'f, S> {
    pub fn new(file: &'f str, source: S) -> BlockParser<'f, S> {
        BlockParser {
            file,
            source,
            line: 0,
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        self.line += 1;
        self.source.next_line().map_err(|source| DocError::Io {
            file: self.file.to_string(),
            line: self.line,
            source,
        })
    }

    /// Skip to the next start delimiter and read the block it opens.
    /// `Ok(None)` at end of input.
    pub fn next_block(&mut self) -> Result<Option<Block>> {
        while let Some(raw) = self.read_line()? {
            if is_block_start(&raw) {
                return self.accumulate().map(Some);
            }
        }
        Ok(None)
    }

    /// Consume lines up to and including the end delimiter of the block
    /// whose start was the last line read.
    fn accumulate(&mut self) -> Result<Block> {
        let mut builder = BlockBuilder::new(self.file, self.line);
        while let Some(raw) = self.read_line()? {
            let Some(line) = classify(&raw, self.file, self.line)? else {
                continue;
            };
            if builder.push(line) == BlockState::Closed {
                break;
            }
        }
        let block = builder.finish()?;
        debug!(file = self.file, line = block.line(), "accumulated block");
        Ok(block)
    }
}

impl<S: LineSource> Iterator for BlockParser<'_, S> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_block().transpose()
    }
}

/// Parse every block of one source. Each block must resolve to a path; the
/// first failure aborts the whole source.
pub fn parse_source<S: LineSource>(file: &str, source: S) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    for block in BlockParser::new(file, source) {
        let block = block?;
        block.path()?;
        blocks.push(block);
    }
    debug!(file, blocks = blocks.len(), "parsed source");
    Ok(blocks)
}

pub fn parse_str(file: &str, text: &str) -> Result<Vec<Block>> {
    parse_source(file, text.lines())
}

pub fn parse_file(path: &Path) -> Result<Vec<Block>> {
    let name = path.to_string_lossy();
    let file = File::open(path).map_err(|source| DocError::Io {
        file: name.to_string(),
        line: 0,
        source,
    })?;
    parse_source(&name, BufReader::new(file).lines())
}
