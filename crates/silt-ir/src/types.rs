//! The type model shared by variables and expressions.

use serde::{Deserialize, Serialize};

/// Primitive types of the analyzed language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Byte,
    Short,
    Int,
    Char,
    Boolean,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    /// Whether values of this type fit the word-sized signed-integer domain
    /// tracked by constant propagation.
    pub fn holds_int(self) -> bool {
        matches!(
            self,
            PrimitiveType::Byte
                | PrimitiveType::Short
                | PrimitiveType::Int
                | PrimitiveType::Char
                | PrimitiveType::Boolean
        )
    }
}

/// Declared type of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveType),
    /// Class or array type, by name.
    Reference(String),
}

impl Type {
    pub fn holds_int(&self) -> bool {
        matches!(self, Type::Primitive(p) if p.holds_int())
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Primitive(PrimitiveType::Byte) => write!(f, "byte"),
            Type::Primitive(PrimitiveType::Short) => write!(f, "short"),
            Type::Primitive(PrimitiveType::Int) => write!(f, "int"),
            Type::Primitive(PrimitiveType::Char) => write!(f, "char"),
            Type::Primitive(PrimitiveType::Boolean) => write!(f, "boolean"),
            Type::Primitive(PrimitiveType::Long) => write!(f, "long"),
            Type::Primitive(PrimitiveType::Float) => write!(f, "float"),
            Type::Primitive(PrimitiveType::Double) => write!(f, "double"),
            Type::Reference(name) => write!(f, "{}", name),
        }
    }
}
