// reader.rs - Searching `std::io::Read` sources.
//
// The whole source is read into memory first; matching then runs over the
// buffer like any other byte search.

use std::io::{self, Read};
use std::ops::Range;

use crate::region::Region;
use crate::regex::Regex;

fn read_all<R: Read>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

impl Regex {
    /// Reports whether the pattern matches anywhere in `reader`'s contents.
    pub fn is_match_reader<R: Read>(&self, reader: R) -> io::Result<bool> {
        Ok(self.is_match(&read_all(reader)?))
    }

    /// Byte range of the leftmost match in `reader`'s contents.
    ///
    /// ```
    /// use rubex::Regex;
    ///
    /// let re = Regex::new(r"\d+").unwrap();
    /// let found = re.find_reader_index(&b"abc 123"[..]).unwrap();
    /// assert_eq!(found, Some(4..7));
    /// ```
    pub fn find_reader_index<R: Read>(&self, reader: R) -> io::Result<Option<Range<usize>>> {
        Ok(self.find_index(&read_all(reader)?))
    }

    /// Group spans of the leftmost match in `reader`'s contents.
    pub fn find_reader_submatch_index<R: Read>(&self, reader: R) -> io::Result<Option<Region>> {
        Ok(self.find_submatch_index(&read_all(reader)?))
    }
}
