//! C# model emission with DataAnnotations attributes.
//!
//! Each table renders as one class: the using preamble, a `[Table]`
//! attribute, and one auto-property per column preceded by its annotation
//! markers. The preamble is repeated for every class within a document;
//! that duplication is the documented behavior of the reference generator
//! and is preserved.
//!
//! Annotation order per column is fixed:
//! 1. `[Key]`
//! 2. `[Required(ErrorMessage = "Required")]`
//! 3. `[Column(TypeName = "...")]` (date/time and exact-numeric families,
//!    carrying the type text as declared in the source)
//! 4. `[DataType(DataType.Date)]` / `[DataType(DataType.Time)]`
//! 5. `[StringLength(n)]` (character families, parameterized, not max)
//! 6. `[DefaultValue("...")]`

use crate::schema::{ColumnFact, TableFact};

use super::ModelGenerator;

/// Using declarations emitted ahead of every class.
const PREAMBLE: &str = "using System.ComponentModel;\n\
                        using System.ComponentModel.DataAnnotations;\n\
                        using System.ComponentModel.DataAnnotations.Schema;\n\n";

/// Header written at the top of generated .cs files.
const FILE_HEADER: &str = "// <auto-generated>\n\
                           //     Generated by sqlscaffold from SQL DDL.\n\
                           //     Manual changes to this file may be overwritten.\n\
                           // </auto-generated>\n\n";

/// Source types that carry an explicit storage-type annotation.
const STORAGE_TYPE_FAMILIES: &[&str] = &[
    "DATETIME",
    "DATETIME2",
    "DATETIMEOFFSET",
    "SMALLDATETIME",
    "DECIMAL",
    "NUMERIC",
];

/// Source types that map to C# string.
const CHARACTER_FAMILIES: &[&str] = &["CHAR", "VARCHAR", "NCHAR", "NVARCHAR", "TEXT", "NTEXT"];

/// C# generator.
pub struct CSharpGenerator;

impl ModelGenerator for CSharpGenerator {
    fn generate(&self, tables: &[TableFact]) -> String {
        let mut model = String::new();
        for table in tables {
            emit_class(&mut model, table);
        }
        model
    }

    fn file_extension(&self) -> &'static str {
        ".cs"
    }

    fn file_header(&self) -> &'static str {
        FILE_HEADER
    }
}

fn emit_class(out: &mut String, table: &TableFact) {
    out.push_str(PREAMBLE);

    // Schema is omitted from the attribute only when empty, never because
    // it equals the default schema.
    if table.id.schema.is_empty() {
        out.push_str(&format!("[Table(\"{}\")]\n", table.id.name));
    } else {
        out.push_str(&format!(
            "[Table(\"{}\", Schema = \"{}\")]\n",
            table.id.name, table.id.schema
        ));
    }

    out.push_str(&format!("public class {}\n{{\n", table.id.name));

    for column in &table.columns {
        for annotation in column_annotations(table, column) {
            out.push_str("    ");
            out.push_str(&annotation);
            out.push('\n');
        }
        out.push_str(&format!(
            "    public {} {} {{ get; set; }}\n\n",
            map_type(&column.type_name, column.nullable),
            column.name
        ));
    }

    out.push_str("}\n\n");
}

/// Evaluate the ordered annotation rules against one column's facts.
fn column_annotations(table: &TableFact, column: &ColumnFact) -> Vec<String> {
    let mut annotations = Vec::new();
    let base_type = column.type_name.to_uppercase();

    if table.primary_keys.contains(&column.name) {
        annotations.push("[Key]".to_string());
    }

    if !column.nullable {
        annotations.push("[Required(ErrorMessage = \"Required\")]".to_string());
    }

    if STORAGE_TYPE_FAMILIES.contains(&base_type.as_str()) {
        annotations.push(format!("[Column(TypeName = \"{}\")]", column.full_type()));
    }

    if base_type == "DATE" {
        annotations.push("[DataType(DataType.Date)]".to_string());
    }
    if base_type == "TIME" {
        annotations.push("[DataType(DataType.Time)]".to_string());
    }

    if CHARACTER_FAMILIES.contains(&base_type.as_str()) {
        if let Some(params) = &column.type_params {
            if !params.eq_ignore_ascii_case("max") {
                annotations.push(format!("[StringLength({})]", params));
            }
        }
    }

    if let Some(default) = column.resolved_default() {
        annotations.push(format!("[DefaultValue(\"{}\")]", default));
    }

    annotations
}

/// Map a source scalar type to a C# type, with nullability suffixing.
///
/// Unknown types fall back to `string` rather than failing. Value types get
/// a `?` suffix when nullable; reference types (`string`, `byte[]`) carry
/// no marker, and `byte[]` is never marked nullable.
pub fn map_type(type_name: &str, nullable: bool) -> String {
    let cs_type = match type_name.to_uppercase().as_str() {
        "INT" => "int",
        "BIGINT" => "long",
        "SMALLINT" => "short",
        "TINYINT" => "byte",
        "BIT" => "bool",
        "DECIMAL" | "NUMERIC" | "MONEY" | "SMALLMONEY" => "decimal",
        "FLOAT" | "REAL" => "float",
        "DATE" | "DATETIME" | "DATETIME2" | "SMALLDATETIME" => "DateTime",
        "DATETIMEOFFSET" => "DateTimeOffset",
        "TIME" => "TimeSpan",
        "CHAR" | "VARCHAR" | "NCHAR" | "NVARCHAR" | "TEXT" | "NTEXT" => "string",
        "BINARY" | "VARBINARY" | "IMAGE" => "byte[]",
        _ => "string",
    };

    let is_reference = matches!(cs_type, "string" | "byte[]");
    if nullable && !is_reference {
        format!("{}?", cs_type)
    } else {
        cs_type.to_string()
    }
}
