//! Text folding for user-typed shorthand
//!
//! Users type with or without Vietnamese diacritics and in any case. Every
//! lookup key (aliases, station names, keywords) and every input line is
//! folded the same way before comparison.

const A: &str = "àáảãạăằắẳẵặâầấẩẫậ";
const E: &str = "èéẻẽẹêềếểễệ";
const I: &str = "ìíỉĩị";
const O: &str = "òóỏõọôồốổỗộơờớởỡợ";
const U: &str = "ùúủũụưừứửữự";
const Y: &str = "ỳýỷỹỵ";

fn fold_char(c: char) -> char {
    if c == 'đ' {
        'd'
    } else if A.contains(c) {
        'a'
    } else if E.contains(c) {
        'e'
    } else if I.contains(c) {
        'i'
    } else if O.contains(c) {
        'o'
    } else if U.contains(c) {
        'u'
    } else if Y.contains(c) {
        'y'
    } else {
        c
    }
}

/// Lowercase and strip Vietnamese diacritics
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(fold_char)
        .collect()
}

/// Fold and drop whitespace, the form used for alias and keyword keys
pub fn fold_key(text: &str) -> String {
    fold(text).chars().filter(|c| !c.is_whitespace()).collect()
}

/// Fold, trim and collapse runs of whitespace to one space
pub fn fold_line(text: &str) -> String {
    fold(text).split_whitespace().collect::<Vec<_>>().join(" ")
}
