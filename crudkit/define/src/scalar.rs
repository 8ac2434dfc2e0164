//! The fixed scalar vocabulary.
//!
//! Only the five GraphQL built-in scalars are supported as user-facing leaf
//! types. On top of those, augmentation registers three result-marker scalars
//! whose names carry the reserved [`SYSTEM_MARKER`] prefix; the prefix is
//! stripped whenever a name is rendered.

/// The GraphQL built-in scalar type names.
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Prefix reserved for types synthesized by the generator itself.
pub const SYSTEM_MARKER: &str = "sdk:";

/// Return type of every synthesized `<type>_insert` mutation field.
pub const INSERT_RESULT_MARKER: &str = "sdk:MutationRef.InsertData";

/// Return type of every synthesized `<type>_update` mutation field.
pub const UPDATE_RESULT_MARKER: &str = "sdk:MutationRef.UpdateData";

/// Return type of every synthesized `<type>_delete` mutation field.
pub const DELETE_RESULT_MARKER: &str = "sdk:MutationRef.DeleteData";

/// All result-marker scalar names, in registration order.
pub const RESULT_MARKERS: [&str; 3] = [
    INSERT_RESULT_MARKER,
    UPDATE_RESULT_MARKER,
    DELETE_RESULT_MARKER,
];

/// Returns `true` for the five GraphQL built-in scalars.
///
/// ```
/// use crudkit_define::scalar::is_builtin_scalar;
///
/// assert!(is_builtin_scalar("ID"));
/// assert!(!is_builtin_scalar("Movie"));
/// ```
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Returns `true` if the name carries the reserved system marker.
pub fn is_system_name(name: &str) -> bool {
    name.starts_with(SYSTEM_MARKER)
}

/// Maps a GraphQL type name to the name used in generated code.
///
/// `ID` renders as `String`, system-marked names lose their marker, and
/// every other name passes through unchanged.
///
/// ```
/// use crudkit_define::scalar::rendered_type_name;
///
/// assert_eq!(rendered_type_name("ID"), "String");
/// assert_eq!(rendered_type_name("sdk:MutationRef.InsertData"), "MutationRef.InsertData");
/// assert_eq!(rendered_type_name("Movie_Data"), "Movie_Data");
/// ```
pub fn rendered_type_name(name: &str) -> &str {
    match name {
        "Int" => "Int",
        "Float" => "Float",
        "String" | "ID" => "String",
        "Boolean" => "Boolean",
        other => other.strip_prefix(SYSTEM_MARKER).unwrap_or(other),
    }
}

/// Returns `true` if `rendered` is the rendered form of a result marker.
pub fn is_rendered_result_marker(rendered: &str) -> bool {
    RESULT_MARKERS
        .iter()
        .any(|marker| rendered_type_name(marker) == rendered)
}
