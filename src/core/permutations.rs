//! Digit permutations for đảo bets
//!
//! Permutations are produced in lexicographic order by stepping a sorted
//! digit buffer with next-permutation, so repeated digits never yield
//! duplicates and the output is deterministic.

/// Rearrange `digits` into the next lexicographic permutation
///
/// Returns false when `digits` is already the last permutation.
fn next_permutation(digits: &mut [u8]) -> bool {
    if digits.len() < 2 {
        return false;
    }

    let mut i = digits.len() - 1;
    while i > 0 && digits[i - 1] >= digits[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }

    let mut j = digits.len() - 1;
    while digits[j] <= digits[i - 1] {
        j -= 1;
    }
    digits.swap(i - 1, j);
    digits[i..].reverse();
    true
}

/// All distinct permutations of `number`, sorted ascending
pub fn permutations(number: &str) -> Vec<String> {
    let mut digits: Vec<u8> = number.bytes().collect();
    digits.sort_unstable();

    let mut result = vec![String::from_utf8_lossy(&digits).into_owned()];
    while next_permutation(&mut digits) {
        result.push(String::from_utf8_lossy(&digits).into_owned());
    }
    result
}
