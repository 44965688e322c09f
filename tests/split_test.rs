// split_test.rs - Splitting through the public API.

use rubex::Regex;

struct SplitCase {
    text: &'static str,
    pattern: &'static str,
    limit: isize,
    pieces: &'static [&'static str],
}

const CASES: &[SplitCase] = &[
    SplitCase { text: "foo:and:bar", pattern: ":", limit: -1, pieces: &["foo", "and", "bar"] },
    SplitCase { text: "foo:and:bar", pattern: ":", limit: 1, pieces: &["foo:and:bar"] },
    SplitCase { text: "foo:and:bar", pattern: ":", limit: 2, pieces: &["foo", "and:bar"] },
    SplitCase { text: "foo:and:bar", pattern: "foo", limit: -1, pieces: &["", ":and:bar"] },
    SplitCase { text: "foo:and:bar", pattern: "bar", limit: -1, pieces: &["foo:and:", ""] },
    SplitCase { text: "foo:and:bar", pattern: "baz", limit: -1, pieces: &["foo:and:bar"] },
    SplitCase { text: "baabaab", pattern: "a", limit: -1, pieces: &["b", "", "b", "", "b"] },
    SplitCase { text: "baabaab", pattern: "ba*", limit: -1, pieces: &["", "", "", ""] },
    SplitCase { text: "baabaab", pattern: "a+", limit: -1, pieces: &["b", "b", "b"] },
    // an empty match straight after a separator adds an empty piece
    SplitCase { text: "baabaab", pattern: "a*", limit: -1, pieces: &["b", "", "b", "", "b"] },
    SplitCase { text: "abc", pattern: "", limit: -1, pieces: &["a", "b", "c"] },
    SplitCase { text: "abc", pattern: "", limit: 2, pieces: &["a", "bc"] },
    SplitCase { text: "", pattern: ",", limit: -1, pieces: &[""] },
    SplitCase { text: "", pattern: "", limit: -1, pieces: &[] },
    SplitCase { text: "a,b", pattern: ",", limit: 0, pieces: &[] },
    SplitCase { text: "1 + 2 = 3", pattern: r"\s*[+=]\s*", limit: -1, pieces: &["1", "2", "3"] },
    SplitCase {
        text: "日本、中国、韓国",
        pattern: "、",
        limit: -1,
        pieces: &["日本", "中国", "韓国"],
    },
];

#[test]
fn split_table() {
    for case in CASES {
        let re = Regex::new(case.pattern).unwrap();
        let pieces = re.split_str(case.text, case.limit);
        assert_eq!(
            pieces, case.pieces,
            "{:?} split by {:?} limit {}",
            case.text, case.pattern, case.limit
        );
        let bytes: Vec<&[u8]> = re.split(case.text.as_bytes(), case.limit);
        let expected: Vec<&[u8]> = case.pieces.iter().map(|p| p.as_bytes()).collect();
        assert_eq!(bytes, expected);
    }
}

#[test]
fn positive_limit_caps_piece_count() {
    for case in CASES.iter().filter(|c| c.limit > 0) {
        let re = Regex::new(case.pattern).unwrap();
        assert!(re.split_str(case.text, case.limit).len() <= case.limit as usize);
    }
}

#[test]
fn rejoin_with_fixed_separator() {
    let re = Regex::new(",").unwrap();
    for text in ["a,b,c", ",lead", "trail,", ",,", "none"] {
        assert_eq!(re.split_str(text, -1).join(","), text);
    }
}
