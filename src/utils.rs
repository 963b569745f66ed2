use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Titles stripped from the front of a name ("Dr. Jane Doe").
const HONORIFICS: &[&str] = &[
    "dr", "prof", "professor", "mr", "mrs", "ms", "mx", "sir", "dame",
];

/// Generational and academic suffixes ("John Smith Jr.", "Smith, J., PhD").
const SUFFIXES: &[&str] = &[
    "jr", "sr", "ii", "iii", "iv", "phd", "dphil", "msc", "bsc", "esq",
];

/// Suffixes that are also given-name abbreviations ("Md Rahman"). Only
/// stripped when written in capitals at the end of a name ("John Smith MD").
const CAPITALIZED_SUFFIXES: &[&str] = &["md"];

/// Lowercase surname particles that belong to the surname that follows them.
const PARTICLES: &[&str] = &[
    "van", "von", "de", "der", "den", "del", "della", "di", "da", "du", "dos", "das", "le", "la",
    "ten", "ter", "bin", "ibn", "al", "el",
];

/// Letters that survive NFKD decomposition unchanged but have a conventional
/// Latin spelling.
const FOLDS: &[(char, &str)] = &[
    ('ß', "ss"),
    ('ø', "o"),
    ('Ø', "O"),
    ('ł', "l"),
    ('Ł', "L"),
    ('æ', "ae"),
    ('Æ', "AE"),
    ('œ', "oe"),
    ('Œ', "OE"),
    ('đ', "d"),
    ('Đ', "D"),
    ('þ', "th"),
    ('Þ', "TH"),
    ('ı', "i"),
];

/// Folds accented letters to their base letters, keeping case.
///
/// `"José García"` becomes `"Jose Garcia"`. Letters outside the Latin script
/// are left untouched.
pub(crate) fn fold_diacritics(input: &str) -> String {
    let mut folded = String::with_capacity(input.len());
    for c in input.nfkd().filter(|c| !is_combining_mark(*c)) {
        match FOLDS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => folded.push_str(to),
            None => folded.push(c),
        }
    }
    folded
}

/// Maps the Unicode dash family onto an ASCII hyphen.
pub(crate) fn unify_dashes(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
            c => c,
        })
        .collect()
}

pub(crate) fn is_honorific(word: &str) -> bool {
    HONORIFICS.contains(&word)
}

pub(crate) fn is_suffix(word: &str) -> bool {
    SUFFIXES.contains(&word)
}

/// Returns true for a raw word such as `"MD"` that is a suffix only in
/// capitals. The caller decides whether the word is in trailing position.
pub(crate) fn is_capitalized_suffix(word: &str) -> bool {
    CAPITALIZED_SUFFIXES.contains(&clean_word(word).as_str())
        && !word.chars().any(char::is_lowercase)
}

pub(crate) fn is_particle(word: &str) -> bool {
    PARTICLES.contains(&word)
}

/// Lowercases a raw word and keeps only letters and inner hyphens.
///
/// Apostrophes, digits and punctuation are dropped, so `"O'Brien"` becomes
/// `"obrien"` and `"Smith1"` becomes `"smith"`.
pub(crate) fn clean_word(word: &str) -> String {
    let mut cleaned = String::with_capacity(word.len());
    for c in word.chars() {
        if c.is_alphabetic() {
            cleaned.extend(c.to_lowercase());
        } else if c == '-' && !cleaned.is_empty() && !cleaned.ends_with('-') {
            cleaned.push('-');
        }
    }
    while cleaned.ends_with('-') {
        cleaned.pop();
    }
    cleaned
}

/// Returns true for a run of capital letters that reads as initials ("JQ")
/// rather than as a word. Only meaningful when the surrounding name is in
/// mixed case; an all-caps name has no way to tell the two apart.
pub(crate) fn is_initials_cluster(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| *c != '.').collect();
    (2..=3).contains(&letters.len()) && letters.iter().all(char::is_ascii_uppercase)
}

/// Returns true when a raw word is a single initial such as `"J"` or `"J."`.
pub(crate) fn is_single_initial(word: &str) -> bool {
    let mut letters = word.chars().filter(|c| c.is_alphabetic());
    letters.next().is_some() && letters.next().is_none()
}

/// Returns true when the text contains both upper- and lowercase letters.
pub(crate) fn is_mixed_case(text: &str) -> bool {
    text.chars().any(char::is_lowercase) && text.chars().any(char::is_uppercase)
}

pub(crate) fn has_uppercase(text: &str) -> bool {
    text.chars().any(char::is_uppercase)
}

/// Returns true when the text contains at least one letter.
pub(crate) fn has_alphabetic(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// Splits a raw segment into words, breaking after every period so that
/// `"J.Q."` yields `"J."` and `"Q."`.
pub(crate) fn split_words(segment: &str) -> Vec<&str> {
    segment
        .split_inclusive('.')
        .flat_map(str::split_whitespace)
        .collect()
}
