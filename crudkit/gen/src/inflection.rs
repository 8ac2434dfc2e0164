//! English inflection for synthesized schema names.
//!
//! Augmentation names plural query fields and relation fields after the
//! lowercased type name (`Movie` -> `movies`, `Person` -> `people`). The
//! rules here are deliberately small: a handful of irregular and uncountable
//! nouns, then suffix rules.
//!
//! ## Examples
//!
//! ```
//! use crudkit_gen::inflection::{lowercase, pluralize};
//!
//! assert_eq!(pluralize(&lowercase("Movie")), "movies");
//! assert_eq!(pluralize("person"), "people");
//! assert_eq!(pluralize("category"), "categories");
//! assert_eq!(pluralize("address"), "addresses");
//! ```

/// Nouns whose plural is not formed by a suffix rule.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("ox", "oxen"),
    ("quiz", "quizzes"),
    ("criterion", "criteria"),
    ("datum", "data"),
];

/// Nouns with identical singular and plural forms.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "feedback",
    "fish",
    "information",
    "metadata",
    "news",
    "series",
    "sheep",
    "species",
];

/// Nouns ending in `f`/`fe` that pluralize to `ves`.
const F_TO_VES: &[&str] = &[
    "calf", "half", "knife", "leaf", "life", "loaf", "shelf", "thief", "wife", "wolf",
];

/// Nouns ending in `o` that take `es`.
const O_TO_OES: &[&str] = &["echo", "hero", "potato", "tomato", "veto"];

/// Lowercases a type name the way synthesized field names expect.
///
/// ```
/// use crudkit_gen::inflection::lowercase;
///
/// assert_eq!(lowercase("PrimaryKeyNested4"), "primarykeynested4");
/// ```
pub fn lowercase(name: &str) -> String {
    name.to_lowercase()
}

/// Returns the plural form of a lowercase English noun.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }

    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return (*plural).to_string();
    }

    if let Some(stem) = word.strip_suffix("sis") {
        return format!("{stem}ses");
    }

    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        return format!("{word}es");
    }

    if let Some(stem) = word.strip_suffix('y')
        && stem.chars().last().is_some_and(|c| !is_vowel(c))
    {
        return format!("{stem}ies");
    }

    if F_TO_VES.contains(&word) {
        let stem = word
            .strip_suffix("fe")
            .or_else(|| word.strip_suffix('f'))
            .unwrap_or(word);
        return format!("{stem}ves");
    }

    if O_TO_OES.contains(&word) {
        return format!("{word}es");
    }

    format!("{word}s")
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
