//! Schema Invariant Tests
//!
//! Tests for schema compilation invariants:
//! - Field kinds resolve from reflection or explicit overrides
//! - Constraint families only apply to matching types
//! - Compiling a field twice replaces the earlier descriptor
//! - Inheritance chains merge into one schema

use chrono::{DateTime, Utc};
use docschema::schema::{
    EntityRegistry, FieldDescriptor, FieldOptions, PrimitiveType, Reflect, ResolvedFieldKind,
    SchemaAssembler, SchemaError, TypeHandle,
};
use docschema::{CompilerConfig, MergeOrder};
use regex::Regex;

struct Author;

impl Reflect for Author {
    fn type_handle() -> TypeHandle {
        TypeHandle::named("Author")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_library() -> EntityRegistry {
    let registry = EntityRegistry::new();

    registry
        .entity("Author")
        .field::<String>("name", FieldOptions::new())
        .field::<Vec<String>>("tags", FieldOptions::new().of_type::<String>())
        .register()
        .unwrap();

    registry
        .entity("Book")
        .field::<String>("title", FieldOptions::new().required(true))
        .field_untyped("author", FieldOptions::new().reference::<Author>())
        .register()
        .unwrap();

    registry
}

fn string_only_options() -> Vec<(&'static str, FieldOptions)> {
    vec![
        ("lowercase", FieldOptions::new().lowercase()),
        ("uppercase", FieldOptions::new().uppercase()),
        ("trim", FieldOptions::new().trim()),
        ("match", FieldOptions::new().matches(Regex::new("^[a-z]").unwrap())),
        ("enum", FieldOptions::new().one_of(["draft", "published"])),
        ("minlength", FieldOptions::new().minlength(2)),
        ("maxlength", FieldOptions::new().maxlength(64)),
    ]
}

// =============================================================================
// Type Resolution Tests
// =============================================================================

/// Reflected text and explicit array element types compile without error.
#[test]
fn test_author_fields_resolve() {
    let registry = setup_library();
    let schema = SchemaAssembler::new(&registry).assemble("Author").unwrap();

    assert_eq!(
        schema.fields["name"].kind(),
        ResolvedFieldKind::Primitive(PrimitiveType::String)
    );
    assert_eq!(
        schema.fields["tags"].kind(),
        ResolvedFieldKind::Primitive(PrimitiveType::String).into_array()
    );
}

/// An explicit reference resolves to a reference, not an embedded copy.
#[test]
fn test_book_author_is_reference() {
    let registry = setup_library();
    let schema = SchemaAssembler::new(&registry).assemble("Book").unwrap();

    let author = &schema.fields["author"];
    assert_eq!(author.kind(), ResolvedFieldKind::ReferenceTo("Author".into()));
    assert!(matches!(
        author,
        FieldDescriptor::Reference { target, array: false } if target == "Author"
    ));
}

/// Declaring an entity-typed field without `ref` embeds the entity.
#[test]
fn test_entity_type_without_ref_embeds() {
    let registry = setup_library();
    registry
        .entity("Shelf")
        .field::<Vec<Author>>("authors", FieldOptions::new().of_type::<Author>())
        .register()
        .unwrap();

    let table = registry.field_table("Shelf").unwrap();
    match &table["authors"] {
        FieldDescriptor::Embedded { schema, array } => {
            assert!(*array);
            assert_eq!(schema.entity, "Author");
            assert!(schema.fields.contains_key("name"));
            assert!(!schema.keep_id);
        }
        other => panic!("expected embedded descriptor, got {:?}", other),
    }
}

/// A field with no reflected type and no override cannot be compiled.
#[test]
fn test_unknown_type() {
    let registry = EntityRegistry::new();
    let err = registry
        .entity("Post")
        .field_untyped("body", FieldOptions::new().required(true))
        .register()
        .unwrap_err();

    assert_eq!(
        err,
        SchemaError::UnknownType {
            entity: "Post".into(),
            field: "body".into(),
        }
    );
}

/// Types that are neither primitive nor registered entities are rejected.
#[test]
fn test_unsupported_type() {
    let registry = EntityRegistry::new();
    let err = registry
        .entity("Post")
        .field_as("cover", Some(TypeHandle::named("Image")), FieldOptions::new())
        .register()
        .unwrap_err();

    assert_eq!(err.code(), "SCHEMA_UNSUPPORTED_TYPE");
    assert!(err.to_string().contains("Image"));
}

/// Every supported primitive name resolves.
#[test]
fn test_all_primitives_supported() {
    let registry = EntityRegistry::new();
    let mut builder = registry.entity("Everything");
    for primitive in PrimitiveType::ALL {
        builder = builder.field_as(primitive.name(), Some(primitive.into()), FieldOptions::new());
    }
    builder.register().unwrap();

    let table = registry.field_table("Everything").unwrap();
    assert_eq!(table.len(), PrimitiveType::ALL.len());
}

// =============================================================================
// Array Tests
// =============================================================================

/// Arrays without an explicit element type always fail, whatever else is set.
#[test]
fn test_array_missing_type_regardless_of_options() {
    let mut candidates: Vec<FieldOptions> = string_only_options()
        .into_iter()
        .map(|(_, options)| options)
        .collect();
    candidates.push(FieldOptions::new());
    candidates.push(FieldOptions::new().required(true).unique());
    candidates.push(FieldOptions::new().min(1).max(2));

    for options in candidates {
        let registry = EntityRegistry::new();
        let err = registry
            .entity("Post")
            .field::<Vec<String>>("tags", options)
            .register()
            .unwrap_err();
        assert_eq!(err.code(), "SCHEMA_ARRAY_MISSING_TYPE");
        assert!(!registry.field_table("Post").unwrap().contains_key("tags"));
    }
}

// =============================================================================
// Constraint Compatibility Tests
// =============================================================================

/// String constraints on non-string fields fail with the string error.
#[test]
fn test_string_validators_require_string() {
    let non_string = [
        PrimitiveType::Number,
        PrimitiveType::Date,
        PrimitiveType::Boolean,
        PrimitiveType::ObjectId,
    ];

    for ty in non_string {
        for (label, options) in string_only_options() {
            let registry = EntityRegistry::new();
            let err = registry
                .entity("Post")
                .field_as("value", Some(ty.into()), options)
                .register()
                .unwrap_err();
            assert_eq!(
                err.code(),
                "SCHEMA_STRING_VALIDATORS",
                "{} on {} should be rejected",
                label,
                ty
            );
        }

        let registry = EntityRegistry::new();
        registry
            .entity("Post")
            .field_as("value", Some(ty.into()), FieldOptions::new().required(true))
            .register()
            .unwrap();
    }
}

/// String constraints on string fields compile.
#[test]
fn test_string_validators_on_string() {
    for (label, options) in string_only_options() {
        let registry = EntityRegistry::new();
        let result = registry
            .entity("Post")
            .field::<String>("slug", options)
            .register();
        assert!(result.is_ok(), "{} should be accepted on String", label);
    }
}

/// Bounds are accepted on numbers and dates only.
#[test]
fn test_number_validators() {
    let registry = EntityRegistry::new();
    let launch: DateTime<Utc> = "2020-01-01T00:00:00Z".parse().unwrap();
    registry
        .entity("Event")
        .field::<i64>("seats", FieldOptions::new().min(1).max(500))
        .field::<DateTime<Utc>>("startsAt", FieldOptions::new().min(launch))
        .register()
        .unwrap();

    for ty in [PrimitiveType::String, PrimitiveType::Boolean, PrimitiveType::Buffer] {
        let registry = EntityRegistry::new();
        let err = registry
            .entity("Event")
            .field_as("value", Some(ty.into()), FieldOptions::new().max(10))
            .register()
            .unwrap_err();
        assert_eq!(err.code(), "SCHEMA_NUMBER_VALIDATORS");
    }

    let registry = setup_library();
    let err = registry
        .entity("Review")
        .field_untyped("book", FieldOptions::new().reference_named("Book").min(1))
        .register()
        .unwrap_err();
    assert_eq!(err.code(), "SCHEMA_NUMBER_VALIDATORS");
}

/// Neither constraint family applies to an embedded entity.
#[test]
fn test_validators_rejected_on_embedded_entity() {
    for (label, options) in string_only_options() {
        let registry = setup_library();
        let err = registry
            .entity("Profile")
            .field::<Author>("author", options)
            .register()
            .unwrap_err();
        assert_eq!(err.code(), "SCHEMA_STRING_VALIDATORS", "{} on embedded", label);
    }

    for options in [FieldOptions::new().min(1), FieldOptions::new().max(9)] {
        let registry = setup_library();
        let err = registry
            .entity("Profile")
            .field::<Vec<Author>>("authors", options.of_type::<Author>())
            .register()
            .unwrap_err();
        assert_eq!(err.code(), "SCHEMA_NUMBER_VALIDATORS");
        assert!(!registry.field_table("Profile").unwrap().contains_key("authors"));
    }
}

// =============================================================================
// Registration Tests
// =============================================================================

/// Compiling the same field twice keeps only the second descriptor.
#[test]
fn test_field_recompile_replaces() {
    let registry = EntityRegistry::new();
    registry
        .entity("Note")
        .field::<String>("x", FieldOptions::new().required(true).lowercase())
        .field::<f64>("x", FieldOptions::new().min(0))
        .register()
        .unwrap();

    let table = registry.field_table("Note").unwrap();
    assert_eq!(table.len(), 1);
    let options = table["x"].options().unwrap();
    assert_eq!(table["x"].kind(), ResolvedFieldKind::Primitive(PrimitiveType::Number));
    assert!(options.required.is_none());
    assert!(options.lowercase.is_none());
    assert!(options.min.is_some());
}

// =============================================================================
// Inheritance Tests
// =============================================================================

/// A child schema contains its own and its parent's fields.
#[test]
fn test_child_contains_parent_fields() {
    let registry = EntityRegistry::new();
    registry
        .entity("Parent")
        .field::<DateTime<Utc>>("createdAt", FieldOptions::new())
        .register()
        .unwrap();
    registry
        .entity("Child")
        .extends("Parent")
        .field::<String>("title", FieldOptions::new())
        .register()
        .unwrap();

    let schema = SchemaAssembler::new(&registry).assemble("Child").unwrap();
    assert!(schema.fields.contains_key("createdAt"));
    assert!(schema.fields.contains_key("title"));
    assert_eq!(schema.ancestors, vec!["Parent".to_string()]);
}

/// Entities with no fields and no ancestors assemble to nothing.
#[test]
fn test_empty_entity_assembles_empty() {
    let registry = EntityRegistry::new();
    registry.entity("Blank").register().unwrap();

    let schema = SchemaAssembler::new(&registry).assemble("Blank").unwrap();
    assert!(schema.fields.is_empty());
    assert!(schema.behavior.is_empty());
}

/// Colliding field names follow the configured merge order.
#[test]
fn test_collision_follows_merge_order() {
    for (order, expected) in [
        (MergeOrder::AncestorWins, PrimitiveType::String),
        (MergeOrder::DescendantWins, PrimitiveType::Number),
    ] {
        let registry = EntityRegistry::with_config(CompilerConfig {
            merge_order: order,
            ..CompilerConfig::default()
        });
        registry
            .entity("Parent")
            .field::<String>("code", FieldOptions::new())
            .register()
            .unwrap();
        registry
            .entity("Child")
            .extends("Parent")
            .field::<u32>("code", FieldOptions::new())
            .register()
            .unwrap();

        let schema = SchemaAssembler::new(&registry).assemble("Child").unwrap();
        assert_eq!(schema.fields["code"].kind(), ResolvedFieldKind::Primitive(expected));
    }
}

/// Registering an entity again keeps its parent, behavior and earlier fields.
#[test]
fn test_register_again_keeps_inheritance() {
    let registry = EntityRegistry::new();
    registry
        .entity("Parent")
        .field::<DateTime<Utc>>("createdAt", FieldOptions::new())
        .register()
        .unwrap();
    registry
        .entity("Child")
        .extends("Parent")
        .field::<String>("title", FieldOptions::new())
        .method("greet", |_, _| serde_json::json!("hi"))
        .register()
        .unwrap();
    registry
        .entity("Child")
        .field::<String>("body", FieldOptions::new())
        .register()
        .unwrap();

    let schema = SchemaAssembler::new(&registry).assemble("Child").unwrap();
    let names: Vec<&str> = schema.fields.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["body", "createdAt", "title"]);
    assert_eq!(schema.ancestors, vec!["Parent".to_string()]);
    assert!(schema.behavior.methods.contains_key("greet"));
}

/// Assembly is independent of the order entities were declared in.
#[test]
fn test_child_declared_before_parent() {
    let registry = EntityRegistry::new();
    registry
        .entity("Child")
        .extends("Parent")
        .field::<String>("title", FieldOptions::new())
        .register()
        .unwrap();
    registry
        .entity("Parent")
        .field::<bool>("archived", FieldOptions::new())
        .register()
        .unwrap();

    let schema = SchemaAssembler::new(&registry).assemble("Child").unwrap();
    assert_eq!(schema.fields.len(), 2);
}
