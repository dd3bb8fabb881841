//! Externally-resolved type bindings.
//!
//! Bindings are produced by the resolver that runs alongside the external
//! parser. The tree only ever holds shared references to them: a binding is
//! interned once in a [`TypeTable`] and compared by identity afterwards.

mod table;


pub use table::TypeTable;

use core::fmt;

/// Primitive types of the source language.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub const ALL: [Primitive; 9] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
        Primitive::Void,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    pub fn from_name(name: &str) -> Option<Primitive> {
        Primitive::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Returns true for the integral and floating-point primitives.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Primitive::Boolean | Primitive::Void)
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Primitive::Byte | Primitive::Char | Primitive::Short | Primitive::Int | Primitive::Long
        )
    }
}

/// A resolved type, as reported by the external resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeBinding<'t> {
    Primitive(Primitive),

    /// Class or interface, by qualified name (e.g. `java.lang.String`).
    Declared(&'t str),

    Array(&'t TypeBinding<'t>),

    /// Type of the `null` literal.
    Null,
}

/// Shared handle to an interned binding. Nodes store these; they never own
/// the binding.
pub type TypeRef<'t> = &'t TypeBinding<'t>;

impl<'t> TypeBinding<'t> {
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeBinding::Primitive(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, TypeBinding::Primitive(Primitive::Boolean))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeBinding::Primitive(p) if p.is_numeric())
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, TypeBinding::Primitive(p) if p.is_integral())
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeBinding::Array(_))
    }

    pub fn element_type(&self) -> Option<TypeRef<'t>> {
        match self {
            TypeBinding::Array(elem) => Some(*elem),
            _ => None,
        }
    }
}

impl fmt::Display for TypeBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeBinding::Primitive(p) => f.write_str(p.name()),
            TypeBinding::Declared(name) => f.write_str(name),
            TypeBinding::Array(elem) => write!(f, "{elem}[]"),
            TypeBinding::Null => f.write_str("null"),
        }
    }
}
