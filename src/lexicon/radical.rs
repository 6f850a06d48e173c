use std::collections::HashMap;
use std::io::{self, BufRead};
use std::path::Path;

use crate::data::parser::{for_each_text_line, open_text_reader};
use crate::error::{FeatureError, Result};

/// Character -> radical table for CJK radical features.
///
/// Characters without an entry are their own radical.
#[derive(Debug, Clone, Default)]
pub struct RadicalMap {
    radicals: HashMap<char, char>,
}

impl RadicalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let to_error = |source| FeatureError::Resource {
            kind: "radical map",
            path: path.to_path_buf(),
            source,
        };
        let reader = open_text_reader(path).map_err(to_error)?;
        let map = Self::from_reader(reader).map_err(to_error)?;
        log::info!("Loaded {} radicals from {}", map.len(), path.display());
        Ok(map)
    }

    /// Read `char<TAB>radical` lines; lines without two single-character
    /// fields are skipped
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut map = Self::new();
        let invalid = for_each_text_line(reader, |_, line| {
            let mut fields = line.split_whitespace();
            if let (Some(ch), Some(radical)) = (fields.next(), fields.next()) {
                let mut ch = ch.chars();
                let mut radical = radical.chars();
                if let (Some(c), None, Some(r), None) =
                    (ch.next(), ch.next(), radical.next(), radical.next())
                {
                    map.insert(c, r);
                }
            }
        })?;
        if invalid > 0 {
            log::warn!("Skipped {} undecodable radical lines", invalid);
        }
        Ok(map)
    }

    pub fn insert(&mut self, ch: char, radical: char) {
        self.radicals.insert(ch, radical);
    }

    pub fn get(&self, ch: char) -> char {
        self.radicals.get(&ch).copied().unwrap_or(ch)
    }

    pub fn len(&self) -> usize {
        self.radicals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radicals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_char_is_own_radical() {
        let mut map = RadicalMap::new();
        map.insert('好', '女');
        assert_eq!(map.get('好'), '女');
        assert_eq!(map.get('人'), '人');
    }

    #[test]
    fn test_from_reader_skips_bad_lines() {
        let data = "好\t女\n河 氵\nbad\nab\tc\n";
        let map = RadicalMap::from_reader(data.as_bytes()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get('河'), '氵');
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let data: Vec<u8> = ["好\t女\n".as_bytes(), b"\xff\t\xfe\n".as_slice(), "河\t氵\n".as_bytes()].concat();
        let map = RadicalMap::from_reader(data.as_slice()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get('好'), '女');
        assert_eq!(map.get('河'), '氵');
    }
}
