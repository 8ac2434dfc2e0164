//! Rust identifiers for GraphQL names.

use convert_case::{Case, Casing};
use proc_macro2::{Ident, Span};

/// Keywords that cannot be used as plain identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers either.
const PATH_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

/// Snake-case field or module name, as a string.
///
/// ```
/// use crudkit_gen::codegen::naming::snake_name;
///
/// assert_eq!(snake_name("movieId"), "movie_id");
/// assert_eq!(snake_name("GetMovie"), "get_movie");
/// assert_eq!(snake_name("movies_as_studio"), "movies_as_studio");
/// ```
pub fn snake_name(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// Pascal-case type name, as a string.
///
/// ```
/// use crudkit_gen::codegen::naming::type_name;
///
/// assert_eq!(type_name("Movie_Data"), "MovieData");
/// assert_eq!(type_name("GetMovieVariables"), "GetMovieVariables");
/// ```
pub fn type_name(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// Identifier for a struct field, parameter, or module.
///
/// Keywords become raw identifiers; `self`, `Self`, `super` and `crate`
/// get a trailing underscore.
pub fn value_ident(name: &str) -> Ident {
    ident(&snake_name(name))
}

/// Identifier for a generated struct.
pub fn type_ident(name: &str) -> Ident {
    ident(&type_name(name))
}

fn ident(name: &str) -> Ident {
    if PATH_KEYWORDS.contains(&name) {
        Ident::new(&format!("{name}_"), Span::call_site())
    } else if KEYWORDS.contains(&name) {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}
