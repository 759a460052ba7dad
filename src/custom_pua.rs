//! Custom PUA characters that were added to the native library's data files.
//!
//! The data files use the `UnicodeData.txt` layout; lines a user added carry
//! a `User Added` comment. Only their codepoints matter here, the properties
//! are read back through the provider.

use crate::codepoint::parse_codepoint;
use crate::error::Result;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const USER_ADDED_MARKER: &str = "User Added";

/// The codepoints marked `User Added` in a native data file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomPuaSet {
    codepoints: BTreeSet<u32>,
}

impl CustomPuaSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the `User Added` codepoints in `text`.
    pub fn parse(text: &str) -> Self {
        let mut set = Self::default();
        for line in text.lines() {
            set.add_line(line);
        }
        set
    }

    /// Collects the `User Added` codepoints from a reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut set = Self::default();
        for line in reader.lines() {
            set.add_line(&line?);
        }
        Ok(set)
    }

    /// Collects the `User Added` codepoints from the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        log::debug!("reading custom PUA definitions from {}", path.as_ref().display());
        Self::from_reader(BufReader::new(file))
    }

    fn add_line(&mut self, line: &str) {
        if !line.contains(USER_ADDED_MARKER) {
            return;
        }
        let code = line.split(';').next().unwrap_or_default();
        match parse_codepoint(code) {
            Ok(cp) => {
                self.codepoints.insert(cp);
            }
            Err(e) => log::warn!("skipping custom PUA line {:?}: {}", line, e),
        }
    }

    /// Marks `cp` as a custom character.
    pub fn insert(&mut self, cp: u32) {
        self.codepoints.insert(cp);
    }

    /// Whether `cp` was added by a user.
    pub fn contains(&self, cp: u32) -> bool {
        self.codepoints.contains(&cp)
    }

    /// The custom codepoints, ascending.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.codepoints.iter().copied()
    }

    /// The number of custom codepoints.
    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    /// Whether there are none.
    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }
}
