//! Typed access to the slash-delimited segments of an entry's name,
//! and the numeric keys we pull out of them.

use std::cmp::Ordering;

use crate::result::*;

/// The segment of `root/part/chapter/page` naming the chapter
pub const CHAPTER_SEGMENT: usize = 2;

/// The segment of `root/part/chapter/page` naming the page
pub const PAGE_SEGMENT: usize = 3;

/// Returns the `index`th (zero-based) `/`-separated segment of `path`.
///
/// Segments are taken literally: `a//b` has an empty segment 1,
/// and a leading `/` makes segment 0 empty.
pub fn segment(path: &str, index: usize) -> ChapterResult<&str> {
    path.split('/')
        .nth(index)
        .ok_or_else(|| ChapterError::MissingSegment {
            path: path.to_owned(),
            index,
        })
}

/// Like [`NumericKey::first_in()`], but reports which path lacked a number.
pub(crate) fn sort_key<'a>(path: &str, segment: &'a str) -> ChapterResult<NumericKey<'a>> {
    NumericKey::first_in(segment).ok_or_else(|| ChapterError::NoSortKey {
        path: path.to_owned(),
        segment: segment.to_owned(),
    })
}

/// The first run of ASCII digits in a string, ordered by its numeric value.
///
/// Comparison is exact for any length of digits:
/// leading zeros are dropped, then a longer run is a larger number
/// and runs of equal length compare digit by digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumericKey<'a> {
    /// The digit run with leading zeros trimmed (so zero is empty)
    digits: &'a str,
}

impl<'a> NumericKey<'a> {
    /// Finds the first digit run in `s`, if there is one.
    pub fn first_in(s: &'a str) -> Option<Self> {
        let start = s.find(|c: char| c.is_ascii_digit())?;
        let run = &s[start..];
        let end = run
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(run.len());
        Some(Self {
            digits: run[..end].trim_start_matches('0'),
        })
    }

    /// The key as a floating-point number. Long runs lose precision here;
    /// use `Ord` to compare.
    pub fn value(&self) -> f64 {
        if self.digits.is_empty() {
            0.0
        } else {
            self.digits.parse().unwrap_or(f64::INFINITY)
        }
    }
}

impl Ord for NumericKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(other.digits))
    }
}

impl PartialOrd for NumericKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn key(s: &str) -> NumericKey<'_> {
        NumericKey::first_in(s).unwrap()
    }

    #[test]
    fn segments() {
        let path = "volume/part/ch1/page10.png";
        assert_eq!(segment(path, 0).unwrap(), "volume");
        assert_eq!(segment(path, CHAPTER_SEGMENT).unwrap(), "ch1");
        assert_eq!(segment(path, PAGE_SEGMENT).unwrap(), "page10.png");

        match segment("volume/part", CHAPTER_SEGMENT) {
            Err(ChapterError::MissingSegment { path, index }) => {
                assert_eq!(path, "volume/part");
                assert_eq!(index, 2);
            }
            other => panic!("Expected a missing segment, got {:?}", other),
        }
    }

    #[test]
    fn empty_segments_count() {
        assert_eq!(segment("a//b", 1).unwrap(), "");
        assert_eq!(segment("/a/b", 0).unwrap(), "");
        assert_eq!(segment("a/b/", 2).unwrap(), "");
    }

    #[test]
    fn first_digit_run_only() {
        assert_eq!(key("chapter12part3").value(), 12.0);
        assert_eq!(key("7").value(), 7.0);
        assert_eq!(key("v2.5").value(), 2.0);
        assert!(NumericKey::first_in("prologue").is_none());
        assert!(NumericKey::first_in("").is_none());
    }

    #[test]
    fn numeric_not_lexical() {
        assert!(key("ch2") < key("ch10"));
        assert!(key("ch10") > key("ch9"));
        assert!(key("page001") < key("page2"));
        assert_eq!(key("p007"), key("p7"));
        assert_eq!(key("p0").value(), 0.0);
        assert!(key("page000") < key("page1"));
    }

    #[test]
    fn long_runs_stay_exact() {
        // Both of these round to the same f64.
        let a = key("id90071992547409930");
        let b = key("id90071992547409931");
        assert_eq!(a.value(), b.value());
        assert!(a < b);

        let huge = "9".repeat(400);
        assert!(NumericKey::first_in(&huge).unwrap().value().is_infinite());
    }
}
