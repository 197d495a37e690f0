//! Number-combination keywords
//!
//! Keywords such as tài or chẵn stand for fixed sets of two-digit numbers.
//! The configuration supplies their aliases; the sets themselves are fixed.

/// A fixed set of two-digit numbers named by a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberSet {
    /// 50..=99
    Tai,
    /// 00..=49
    Xiu,
    /// Even numbers
    Chan,
    /// Odd numbers
    Le,
    /// Even tens digit, even units digit
    ChanChan,
    /// Even tens digit, odd units digit
    ChanLe,
    /// Odd tens digit, even units digit
    LeChan,
    /// Odd tens digit, odd units digit
    LeLe,
}

impl NumberSet {
    /// Every set
    pub const ALL: [NumberSet; 8] = [
        NumberSet::Tai,
        NumberSet::Xiu,
        NumberSet::Chan,
        NumberSet::Le,
        NumberSet::ChanChan,
        NumberSet::ChanLe,
        NumberSet::LeChan,
        NumberSet::LeLe,
    ];

    /// Canonical keyword, written back by the normalizer
    pub fn keyword(&self) -> &'static str {
        match self {
            NumberSet::Tai => "tai",
            NumberSet::Xiu => "xiu",
            NumberSet::Chan => "chan",
            NumberSet::Le => "le",
            NumberSet::ChanChan => "chanchan",
            NumberSet::ChanLe => "chanle",
            NumberSet::LeChan => "lechan",
            NumberSet::LeLe => "lele",
        }
    }

    /// Look up a set by its configured name (folded, spaces and underscores ignored)
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = crate::core::text::fold_key(name)
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect();
        NumberSet::ALL.into_iter().find(|set| set.keyword() == key)
    }

    fn contains(&self, n: u32) -> bool {
        let tens_even = (n / 10) % 2 == 0;
        let units_even = n % 2 == 0;
        match self {
            NumberSet::Tai => n >= 50,
            NumberSet::Xiu => n < 50,
            NumberSet::Chan => units_even,
            NumberSet::Le => !units_even,
            NumberSet::ChanChan => tens_even && units_even,
            NumberSet::ChanLe => tens_even && !units_even,
            NumberSet::LeChan => !tens_even && units_even,
            NumberSet::LeLe => !tens_even && !units_even,
        }
    }

    /// The numbers of the set, zero-padded and ascending
    pub fn numbers(&self) -> Vec<String> {
        (0..100u32)
            .filter(|n| self.contains(*n))
            .map(|n| format!("{:02}", n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NumberSet::Tai, 50, "50", "99")]
    #[case(NumberSet::Xiu, 50, "00", "49")]
    #[case(NumberSet::Chan, 50, "00", "98")]
    #[case(NumberSet::Le, 50, "01", "99")]
    #[case(NumberSet::ChanChan, 25, "00", "88")]
    #[case(NumberSet::ChanLe, 25, "01", "89")]
    #[case(NumberSet::LeChan, 25, "10", "98")]
    #[case(NumberSet::LeLe, 25, "11", "99")]
    fn test_set_contents(
        #[case] set: NumberSet,
        #[case] size: usize,
        #[case] first: &str,
        #[case] last: &str,
    ) {
        let numbers = set.numbers();
        assert_eq!(numbers.len(), size);
        assert_eq!(numbers.first().map(String::as_str), Some(first));
        assert_eq!(numbers.last().map(String::as_str), Some(last));
    }

    #[rstest]
    #[case("tai", Some(NumberSet::Tai))]
    #[case("Chẵn Lẻ", Some(NumberSet::ChanLe))]
    #[case("le_le", Some(NumberSet::LeLe))]
    #[case("lẻ", Some(NumberSet::Le))]
    #[case("bao", None)]
    fn test_from_name(#[case] name: &str, #[case] expected: Option<NumberSet>) {
        assert_eq!(NumberSet::from_name(name), expected);
    }
}
