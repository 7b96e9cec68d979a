use serde::{Deserialize, Serialize};

/**
The types a value can have.  Every value is 4 bytes wide.  Arrays are not a
type: an array declaration decays to a pointer to its element type, once per
dimension.
 */
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Int,
    Pointer(Box<Type>),
}

impl Type {
    pub fn size_of(&self) -> i32 {
        match self {
            Type::Int | Type::Pointer(_) => 4,
        }
    }

    /// Two types are compatible when they are the same kind of type. Only
    /// the outermost kind is compared, so `int*` and `int**` are compatible.
    pub fn is_compatible(&self, other: &Type) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn pointer_to(self) -> Type {
        Type::Pointer(Box::new(self))
    }

    /// The type this pointer points to.  `None` if this is not a pointer.
    pub fn referent(&self) -> Option<&Type> {
        match self {
            Type::Pointer(ty) => Some(ty),
            Type::Int => None,
        }
    }

    /// The type of a variable declared as an array of `element` with the
    /// given number of dimensions.
    pub fn decay_array(element: Type, dimensions: usize) -> Type {
        (0..dimensions).fold(element, |ty, _| ty.pointer_to())
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::Pointer(ty) => write!(f, "{}*", ty),
        }
    }
}

/// Formats the return type of a function, where `None` is `void`.
pub fn fmt_return(ty: &Option<Type>) -> String {
    match ty {
        Some(ty) => ty.to_string(),
        None => "void".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_of() {
        assert_eq!(Type::Int.size_of(), 4);
        assert_eq!(Type::Int.pointer_to().size_of(), 4);
        assert_eq!(Type::Int.pointer_to().pointer_to().size_of(), 4);
    }

    #[test]
    fn test_compatibility_is_shallow() {
        let int = Type::Int;
        let ptr = Type::Int.pointer_to();
        let ptr_ptr = Type::Int.pointer_to().pointer_to();

        for (a, b, expected) in vec![
            (&int, &int, true),
            (&ptr, &ptr, true),
            (&ptr, &ptr_ptr, true),
            (&ptr_ptr, &ptr, true),
            (&int, &ptr, false),
            (&ptr_ptr, &int, false),
        ] {
            assert_eq!(a.is_compatible(b), expected, "{} ~ {}", a, b);
        }
    }

    #[test]
    fn test_decay_array() {
        assert_eq!(Type::decay_array(Type::Int, 0), Type::Int);
        assert_eq!(Type::decay_array(Type::Int, 1), Type::Int.pointer_to());
        assert_eq!(
            Type::decay_array(Type::Int, 2),
            Type::Int.pointer_to().pointer_to()
        );
        assert_eq!(
            Type::decay_array(Type::Int.pointer_to(), 1).referent(),
            Some(&Type::Int.pointer_to())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(Type::Int.pointer_to().pointer_to().to_string(), "int**");
        assert_eq!(fmt_return(&None), "void");
    }
}
