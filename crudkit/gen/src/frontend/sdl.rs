//! Renders a [`Schema`] back to GraphQL SDL so the external validator can
//! check the augmented schema and the operations written against it.
//!
//! Names carrying the system marker (`sdk:MutationRef.InsertData`) are not
//! valid GraphQL names, so they are mangled to `sdk_MutationRef_InsertData`.

use std::fmt::{self, Write as _};

use crudkit_define::scalar::{SYSTEM_MARKER, is_builtin_scalar, is_system_name};
use crudkit_define::{ArgumentDef, Schema, TypeDef, TypeKind, TypeRef};

const INDENT: &str = "  ";

/// Definition of the `@pick` directive accepted on operation variables.
pub const PICK_DIRECTIVE_SDL: &str =
    "directive @pick(fields: [String!]) on VARIABLE_DEFINITION";

/// Maps a type name to a valid GraphQL name.
///
/// ```
/// use crudkit_gen::frontend::sdl_name;
///
/// assert_eq!(sdl_name("sdk:MutationRef.InsertData"), "sdk_MutationRef_InsertData");
/// assert_eq!(sdl_name("Movie"), "Movie");
/// ```
pub fn sdl_name(name: &str) -> String {
    if is_system_name(name) {
        let marker = SYSTEM_MARKER.trim_end_matches(':');
        let rest = name[SYSTEM_MARKER.len()..].replace('.', "_");
        format!("{marker}_{rest}")
    } else {
        name.to_string()
    }
}

fn sdl_type(ty: &TypeRef) -> TypeRef {
    ty.with_innermost_name(&sdl_name(ty.innermost_name()))
}

/// Renders the whole schema, roots last, followed by the `@pick` directive.
pub fn to_sdl(schema: &Schema) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render_schema(schema, &mut out);
    out
}

fn render_schema(schema: &Schema, out: &mut impl fmt::Write) -> fmt::Result {
    let has_mutation = !schema.mutation.fields.is_empty();

    writeln!(out, "schema {{")?;
    writeln!(out, "{INDENT}query: {}", schema.query.name)?;
    if has_mutation {
        writeln!(out, "{INDENT}mutation: {}", schema.mutation.name)?;
    }
    writeln!(out, "}}")?;

    for type_def in schema.types.values() {
        if type_def.is_scalar() && is_builtin_scalar(&type_def.name) {
            continue;
        }
        writeln!(out)?;
        render_type(type_def, out)?;
    }

    writeln!(out)?;
    render_type(&schema.query, out)?;
    if has_mutation {
        writeln!(out)?;
        render_type(&schema.mutation, out)?;
    }

    writeln!(out)?;
    writeln!(out, "{PICK_DIRECTIVE_SDL}")
}

fn render_type(type_def: &TypeDef, out: &mut impl fmt::Write) -> fmt::Result {
    render_description(type_def.description.as_deref(), "", out)?;

    let keyword = match type_def.kind {
        TypeKind::Object => "type",
        TypeKind::Input => "input",
        TypeKind::Scalar => {
            return writeln!(out, "scalar {}", sdl_name(&type_def.name));
        }
    };

    writeln!(out, "{keyword} {} {{", sdl_name(&type_def.name))?;
    for field in &type_def.fields {
        render_description(field.description.as_deref(), INDENT, out)?;
        write!(out, "{INDENT}{}", field.name)?;
        render_arguments(&field.arguments, out)?;
        writeln!(out, ": {}", sdl_type(&field.ty))?;
    }
    writeln!(out, "}}")
}

fn render_arguments(arguments: &[ArgumentDef], out: &mut impl fmt::Write) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }
    out.write_char('(')?;
    for (index, arg) in arguments.iter().enumerate() {
        if index > 0 {
            out.write_str(", ")?;
        }
        write!(out, "{}: {}", arg.name, sdl_type(&arg.ty))?;
    }
    out.write_char(')')
}

fn render_description(
    description: Option<&str>,
    indent: &str,
    out: &mut impl fmt::Write,
) -> fmt::Result {
    let Some(description) = description else {
        return Ok(());
    };
    out.write_str(indent)?;
    out.write_char('"')?;
    for c in description.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            c => out.write_char(c)?,
        }
    }
    out.write_str("\"\n")
}
