//! Type descriptors consumed by the formatter.
//!
//! A [`Type`] describes layout only: what kind of object it is, how many bytes it occupies and,
//! for derived types, what it points at or contains. The formatter borrows types read-only and
//! never builds them itself beyond the convenience constructors offered here.
//!
//! # Stub Types
//!
//! A type flagged as a stub has an incomplete definition (a forward-declared `struct` is the
//! usual case). It must not be interpreted. Before printing through a stub the formatter asks a
//! [`TypeResolver`] for the complete definition and prints `<incomplete type>` if there is none.
//!
//! # Example
//!
//! ```rust
//! use valscope::types::{Type, TypeCode};
//!
//! let int = Type::int("int", 4, false);
//! let array = Type::array_of(int.clone(), 8);
//! assert_eq!(array.code(), TypeCode::Array);
//! assert_eq!(array.length(), 32);
//! assert_eq!(array.element_count(), 8);
//! ```

use std::{collections::HashMap, sync::Arc};

/// Shared reference to a type descriptor.
pub type TypeRef = Arc<Type>;

/// Discriminates the kind of a [`Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TypeCode {
    /// Fixed-width integer. Signedness is carried by [`Type::is_unsigned`].
    Int,
    /// IEEE-754 floating point (or x87 extended for widths above 8 bytes).
    Float,
    /// Pointer to [`Type::target`].
    Pointer,
    /// Reference to [`Type::target`].
    Reference,
    /// Array of [`Type::target`] elements.
    Array,
    /// Structure with [`Type::fields`].
    Struct,
    /// Union with [`Type::fields`].
    Union,
    /// Enumeration with [`Type::enumerators`].
    Enum,
}

/// A member of a struct or union.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Member name.
    pub name: String,
    /// Byte offset from the start of the containing object.
    pub offset: usize,
    /// Member type.
    pub ty: TypeRef,
}

impl Field {
    /// Creates a member at `offset`.
    #[must_use]
    pub fn new(name: impl Into<String>, offset: usize, ty: TypeRef) -> Self {
        Field {
            name: name.into(),
            offset,
            ty,
        }
    }
}

/// A named constant of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    /// Constant name.
    pub name: String,
    /// Constant value.
    pub value: i64,
}

/// Layout description of a target object.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    code: TypeCode,
    name: Option<String>,
    length: usize,
    unsigned: bool,
    stub: bool,
    target: Option<TypeRef>,
    fields: Vec<Field>,
    enumerators: Vec<Enumerator>,
}

impl Type {
    fn bare(code: TypeCode, name: Option<String>, length: usize) -> Self {
        Type {
            code,
            name,
            length,
            unsigned: false,
            stub: false,
            target: None,
            fields: Vec::new(),
            enumerators: Vec::new(),
        }
    }

    /// Creates an integer type of `length` bytes.
    #[must_use]
    pub fn int(name: impl Into<String>, length: usize, unsigned: bool) -> TypeRef {
        let mut ty = Type::bare(TypeCode::Int, Some(name.into()), length);
        ty.unsigned = unsigned;
        Arc::new(ty)
    }

    /// Creates a floating point type of `length` bytes.
    #[must_use]
    pub fn float(name: impl Into<String>, length: usize) -> TypeRef {
        Arc::new(Type::bare(TypeCode::Float, Some(name.into()), length))
    }

    /// Creates a pointer of `length` bytes to `target`.
    #[must_use]
    pub fn pointer_to(target: TypeRef, length: usize) -> TypeRef {
        let mut ty = Type::bare(TypeCode::Pointer, None, length);
        ty.unsigned = true;
        ty.target = Some(target);
        Arc::new(ty)
    }

    /// Creates a reference of `length` bytes to `target`.
    #[must_use]
    pub fn reference_to(target: TypeRef, length: usize) -> TypeRef {
        let mut ty = Type::bare(TypeCode::Reference, None, length);
        ty.unsigned = true;
        ty.target = Some(target);
        Arc::new(ty)
    }

    /// Creates an array of `count` elements of type `element`.
    #[must_use]
    pub fn array_of(element: TypeRef, count: usize) -> TypeRef {
        let mut ty = Type::bare(TypeCode::Array, None, element.length * count);
        ty.target = Some(element);
        Arc::new(ty)
    }

    /// Creates a structure of `length` bytes.
    #[must_use]
    pub fn structure(name: impl Into<String>, length: usize, fields: Vec<Field>) -> TypeRef {
        let mut ty = Type::bare(TypeCode::Struct, Some(name.into()), length);
        ty.fields = fields;
        Arc::new(ty)
    }

    /// Creates a union of `length` bytes.
    #[must_use]
    pub fn union(name: impl Into<String>, length: usize, fields: Vec<Field>) -> TypeRef {
        let mut ty = Type::bare(TypeCode::Union, Some(name.into()), length);
        ty.fields = fields;
        Arc::new(ty)
    }

    /// Creates an enumeration of `length` bytes from `(name, value)` pairs.
    #[must_use]
    pub fn enumeration(
        name: impl Into<String>,
        length: usize,
        enumerators: &[(&str, i64)],
    ) -> TypeRef {
        let mut ty = Type::bare(TypeCode::Enum, Some(name.into()), length);
        ty.enumerators = enumerators
            .iter()
            .map(|(name, value)| Enumerator {
                name: (*name).to_string(),
                value: *value,
            })
            .collect();
        Arc::new(ty)
    }

    /// Creates a stub: a named type of the given kind whose definition is not yet known.
    #[must_use]
    pub fn stub(code: TypeCode, name: impl Into<String>) -> TypeRef {
        let mut ty = Type::bare(code, Some(name.into()), 0);
        ty.stub = true;
        Arc::new(ty)
    }

    /// Returns the kind of this type.
    #[must_use]
    pub fn code(&self) -> TypeCode {
        self.code
    }

    /// Returns the name of this type, if it has one. Derived types are unnamed.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the size of an object of this type in bytes.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns `true` for unsigned integers (and pointers).
    #[must_use]
    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    /// Returns `true` if this type's definition is incomplete.
    #[must_use]
    pub fn is_stub(&self) -> bool {
        self.stub
    }

    /// Returns the pointee, referent or element type.
    #[must_use]
    pub fn target(&self) -> Option<&TypeRef> {
        self.target.as_ref()
    }

    /// Returns the members of a struct or union.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the constants of an enumeration.
    #[must_use]
    pub fn enumerators(&self) -> &[Enumerator] {
        &self.enumerators
    }

    /// Returns the enumerator named for `value`, if any.
    #[must_use]
    pub fn enumerator_for(&self, value: i64) -> Option<&Enumerator> {
        self.enumerators.iter().find(|e| e.value == value)
    }

    /// Returns the number of elements of an array type, zero for everything else.
    ///
    /// An element type of zero length yields zero elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        match (self.code, &self.target) {
            (TypeCode::Array, Some(element)) if element.length > 0 => {
                self.length / element.length
            }
            _ => 0,
        }
    }

    /// Returns `true` for a one-byte integer, the element type of target strings.
    #[must_use]
    pub fn is_byte_sized_int(&self) -> bool {
        self.code == TypeCode::Int && self.length == 1
    }
}

/// Completes stub types.
pub trait TypeResolver {
    /// Returns the complete definition for `ty`, or `None` if none is known.
    fn resolve_stub(&self, ty: &Type) -> Option<TypeRef>;
}

/// A resolver that never completes a stub.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStubs;

impl TypeResolver for NoStubs {
    fn resolve_stub(&self, _ty: &Type) -> Option<TypeRef> {
        None
    }
}

/// A registry of complete types, resolving stubs by kind and name.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<(TypeCode, String), TypeRef>,
}

impl TypeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        TypeTable {
            types: HashMap::new(),
        }
    }

    /// Registers a complete, named type. Unnamed and stub types are ignored.
    pub fn register(&mut self, ty: TypeRef) {
        if ty.stub {
            return;
        }
        if let Some(name) = ty.name.clone() {
            self.types.insert((ty.code, name), ty);
        }
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for TypeTable {
    fn resolve_stub(&self, ty: &Type) -> Option<TypeRef> {
        let name = ty.name.as_ref()?;
        let resolved = self.types.get(&(ty.code, name.clone())).cloned();
        log::debug!(
            "stub {} {} {}",
            ty.code,
            name,
            if resolved.is_some() {
                "resolved"
            } else {
                "unresolved"
            }
        );
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_element_count() {
        let short = Type::int("short", 2, false);
        let array = Type::array_of(short, 5);
        assert_eq!(array.length(), 10);
        assert_eq!(array.element_count(), 5);
        assert_eq!(Type::int("int", 4, false).element_count(), 0);
    }

    #[test]
    fn test_zero_length_element() {
        let empty = Type::structure("empty", 0, Vec::new());
        let array = Type::array_of(empty, 4);
        assert_eq!(array.element_count(), 0);
    }

    #[test]
    fn test_stub_resolution() {
        let point = Type::structure(
            "point",
            8,
            vec![
                Field::new("x", 0, Type::int("int", 4, false)),
                Field::new("y", 4, Type::int("int", 4, false)),
            ],
        );
        let mut table = TypeTable::new();
        table.register(point.clone());
        table.register(Type::stub(TypeCode::Struct, "ignored"));
        assert_eq!(table.len(), 1);

        let stub = Type::stub(TypeCode::Struct, "point");
        assert!(stub.is_stub());
        assert_eq!(table.resolve_stub(&stub), Some(point));
        assert_eq!(table.resolve_stub(&Type::stub(TypeCode::Union, "point")), None);
        assert_eq!(NoStubs.resolve_stub(&stub), None);
    }

    #[test]
    fn test_enumerator_lookup() {
        let color = Type::enumeration("color", 4, &[("red", 0), ("green", 1)]);
        assert_eq!(color.enumerator_for(1).map(|e| e.name.as_str()), Some("green"));
        assert!(color.enumerator_for(7).is_none());
    }
}
