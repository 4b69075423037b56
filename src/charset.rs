use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CharacterClass {
    Upper,
    Lower,
    Digit,
    Special,
}

impl CharacterClass {
    /// Sampling order. Generator consumption depends on it.
    pub const ALL: [Self; 4] = [Self::Upper, Self::Lower, Self::Digit, Self::Special];

    pub const fn alphabet(self) -> &'static str {
        match self {
            Self::Upper => "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            Self::Lower => "abcdefghijklmnopqrstuvwxyz",
            Self::Digit => "0123456789",
            Self::Special => "?!@#$%^&*",
        }
    }

    pub const fn flag(self) -> char {
        match self {
            Self::Upper => 'u',
            Self::Lower => 'l',
            Self::Digit => 'n',
            Self::Special => 's',
        }
    }

    pub fn from_flag(flag: char) -> Option<Self> {
        match flag {
            'u' => Some(Self::Upper),
            'l' => Some(Self::Lower),
            'n' | 'd' => Some(Self::Digit),
            's' => Some(Self::Special),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Upper => "uppercase",
            Self::Lower => "lowercase",
            Self::Digit => "numbers",
            Self::Special => "specials",
        }
    }

    /// The class whose alphabet contains `ch`, if any.
    pub fn of(ch: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|class| class.alphabet().contains(ch))
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of character classes, always iterated in sampling order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ClassSet(u8);

impl ClassSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    pub const fn with(self, class: CharacterClass) -> Self {
        Self(self.0 | class.bit())
    }

    pub fn insert(&mut self, class: CharacterClass) {
        self.0 |= class.bit();
    }

    pub const fn contains(self, class: CharacterClass) -> bool {
        self.0 & class.bit() != 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = CharacterClass> {
        CharacterClass::ALL
            .into_iter()
            .filter(move |class| self.contains(*class))
    }

    /// Number of distinct characters the selected classes can produce.
    pub fn charset_size(self) -> usize {
        self.iter().map(|class| class.alphabet().len()).sum()
    }

    /// Flag string as written to the history log, e.g. `-ulns`.
    pub fn flags(self) -> String {
        std::iter::once('-')
            .chain(self.iter().map(CharacterClass::flag))
            .collect()
    }

    /// Parses a flag string such as `-uln` or `ds`. Unknown letters yield `None`.
    pub fn from_flags(flags: &str) -> Option<Self> {
        flags
            .strip_prefix('-')
            .unwrap_or(flags)
            .chars()
            .map(CharacterClass::from_flag)
            .collect()
    }
}

impl FromIterator<CharacterClass> for ClassSet {
    fn from_iter<I: IntoIterator<Item = CharacterClass>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}
