//! schema type catalog
//!
//! one pass over the schema classifying every named type and recording how
//! it renders in go. built once per generator and immutable afterward; the
//! traversal and the field resolver only read from it, so a catalog can be
//! shared across generation runs for an unchanged schema.

use crate::naming::export_name;
use graphql_parser::schema::{
    Definition, Document, EnumType, InputObjectType, ObjectType, ScalarType, Type, TypeDefinition,
};
use std::collections::BTreeMap;

/// built-in graphql scalars and their go primitives, in seed order
pub const BUILTIN_SCALARS: &[(&str, &str)] = &[
    ("Int", "int64"),
    ("Float", "float64"),
    ("Boolean", "bool"),
    ("String", "string"),
    ("ID", "string"),
];

/// classification of a named schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Enum,
    Input,
    Object,
}

/// catalog entry for a named schema type
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// exported go type name
    pub target_name: String,
    /// classification by schema node kind
    pub kind: TypeKind,
    /// backing go primitive, scalars only
    pub primitive: Option<String>,
}

/// lookup from schema type names to go renderings plus the retained
/// definitions needed for emission and traversal
pub struct TypeCatalog<'a> {
    entries: BTreeMap<String, CatalogEntry>,
    scalars: Vec<&'a ScalarType<'a, String>>,
    enums: Vec<&'a EnumType<'a, String>>,
    inputs: Vec<&'a InputObjectType<'a, String>>,
    objects: Vec<&'a ObjectType<'a, String>>,
    objects_by_name: BTreeMap<&'a str, &'a ObjectType<'a, String>>,
    query_type: String,
    mutation_type: String,
}

impl<'a> TypeCatalog<'a> {
    /// build the catalog from a parsed, pre-validated schema document
    pub fn new(doc: &'a Document<'a, String>) -> Self {
        let mut entries = BTreeMap::new();
        for (name, primitive) in BUILTIN_SCALARS {
            entries.insert(
                (*name).to_string(),
                CatalogEntry {
                    target_name: export_name(name),
                    kind: TypeKind::Scalar,
                    primitive: Some((*primitive).to_string()),
                },
            );
        }

        let mut scalars = Vec::new();
        let mut enums = Vec::new();
        let mut inputs = Vec::new();
        let mut objects = Vec::new();
        let mut objects_by_name = BTreeMap::new();
        let mut query_type = "Query".to_string();
        let mut mutation_type = "Mutation".to_string();

        for def in &doc.definitions {
            match def {
                Definition::TypeDefinition(ty) => {
                    let (name, kind, primitive) = match ty {
                        TypeDefinition::Scalar(scalar) => {
                            scalars.push(scalar);
                            // custom scalars default to an opaque string
                            (&scalar.name, TypeKind::Scalar, Some("string".to_string()))
                        }
                        TypeDefinition::Enum(enum_ty) => {
                            enums.push(enum_ty);
                            (&enum_ty.name, TypeKind::Enum, None)
                        }
                        TypeDefinition::InputObject(input_ty) => {
                            inputs.push(input_ty);
                            (&input_ty.name, TypeKind::Input, None)
                        }
                        TypeDefinition::Object(obj) => {
                            objects.push(obj);
                            objects_by_name.insert(obj.name.as_str(), obj);
                            (&obj.name, TypeKind::Object, None)
                        }
                        // interfaces and unions are not classified; unknown
                        // node kinds stay out of the catalog
                        _ => continue,
                    };
                    entries.insert(
                        name.clone(),
                        CatalogEntry {
                            target_name: export_name(name),
                            kind,
                            primitive,
                        },
                    );
                }
                Definition::SchemaDefinition(schema) => {
                    if let Some(query) = &schema.query {
                        query_type = query.clone();
                    }
                    if let Some(mutation) = &schema.mutation {
                        mutation_type = mutation.clone();
                    }
                }
                _ => {}
            }
        }

        Self {
            entries,
            scalars,
            enums,
            inputs,
            objects,
            objects_by_name,
            query_type,
            mutation_type,
        }
    }

    /// look up the catalog entry for a named type
    pub fn lookup(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// object definition for a type name, if it is an object
    pub fn object(&self, name: &str) -> Option<&'a ObjectType<'a, String>> {
        self.objects_by_name.get(name).copied()
    }

    /// output type of a field on an object type
    pub fn field_type(&self, type_name: &str, field_name: &str) -> Option<&'a Type<'a, String>> {
        self.object(type_name)?
            .fields
            .iter()
            .find(|field| field.name == field_name)
            .map(|field| &field.field_type)
    }

    /// root object type name for queries
    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    /// root object type name for mutations
    pub fn mutation_type(&self) -> &str {
        &self.mutation_type
    }

    /// declared custom scalars, first-seen order
    pub fn scalars(&self) -> &[&'a ScalarType<'a, String>] {
        &self.scalars
    }

    /// declared enums, first-seen order
    pub fn enums(&self) -> &[&'a EnumType<'a, String>] {
        &self.enums
    }

    /// declared input objects, first-seen order
    pub fn inputs(&self) -> &[&'a InputObjectType<'a, String>] {
        &self.inputs
    }

    /// declared objects, first-seen order
    pub fn objects(&self) -> &[&'a ObjectType<'a, String>] {
        &self.objects
    }
}
