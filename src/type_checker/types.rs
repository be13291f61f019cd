use std::fmt::Display;

use crate::lexer::tokens::Token;

/// Canonical unit type.
pub const UNIT: Type = Type::Enum(1);
/// Canonical boolean type.
pub const BOOL: Type = Type::Enum(2);
/// The universe every type identifier lives in.
pub const TYPES: Type = Type::TypeUniverse(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Proc,
}

impl Builtin {
    pub const ALL: [Builtin; 11] = [
        Builtin::I8,
        Builtin::I16,
        Builtin::I32,
        Builtin::I64,
        Builtin::U8,
        Builtin::U16,
        Builtin::U32,
        Builtin::U64,
        Builtin::F32,
        Builtin::F64,
        Builtin::Proc,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::I8 => "i8",
            Builtin::I16 => "i16",
            Builtin::I32 => "i32",
            Builtin::I64 => "i64",
            Builtin::U8 => "u8",
            Builtin::U16 => "u16",
            Builtin::U32 => "u32",
            Builtin::U64 => "u64",
            Builtin::F32 => "f32",
            Builtin::F64 => "f64",
            Builtin::Proc => "proc",
        }
    }

    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    /// Whether an integer literal of this value fits the builtin.
    pub fn admits(&self, value: i64) -> bool {
        match self {
            Builtin::I8 => i8::try_from(value).is_ok(),
            Builtin::I16 => i16::try_from(value).is_ok(),
            Builtin::I32 => i32::try_from(value).is_ok(),
            Builtin::I64 => true,
            Builtin::U8 => u8::try_from(value).is_ok(),
            Builtin::U16 => u16::try_from(value).is_ok(),
            Builtin::U32 => u32::try_from(value).is_ok(),
            Builtin::U64 => value >= 0,
            Builtin::F32 | Builtin::F64 | Builtin::Proc => false,
        }
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The result of evaluating an expression. Values and types share one
/// grammar, so `TypeIdentifier` marks a result that denotes a type rather
/// than a value of that type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A finite type with `n` inhabitants.
    Enum(u32),
    Builtin(Builtin),
    /// An integer literal not yet sized by its context.
    IntLiteral(i64),
    Function(Box<Type>, Box<Type>),
    Product(Box<Type>, Box<Type>),
    Sum(Box<Type>, Box<Type>),
    CString,
    TypeIdentifier(Box<Type>),
    TypeUniverse(u32),
    Polymorphic {
        from: String,
        type_class: Box<Type>,
        to: Box<Type>,
    },
    Variable {
        name: String,
        type_class: Box<Type>,
    },
    Hole {
        name: String,
        token: Token,
    },
    Record {
        names: Vec<String>,
        fields: Vec<Type>,
    },
    Variant {
        names: Vec<String>,
        fields: Vec<Type>,
    },
}

impl Type {
    pub fn function(from: Type, to: Type) -> Type {
        Type::Function(Box::new(from), Box::new(to))
    }

    pub fn product(left: Type, right: Type) -> Type {
        Type::Product(Box::new(left), Box::new(right))
    }

    pub fn sum(left: Type, right: Type) -> Type {
        Type::Sum(Box::new(left), Box::new(right))
    }

    pub fn type_identifier(inner: Type) -> Type {
        Type::TypeIdentifier(Box::new(inner))
    }

    pub fn polymorphic(from: &str, type_class: Type, to: Type) -> Type {
        Type::Polymorphic {
            from: from.to_string(),
            type_class: Box::new(type_class),
            to: Box::new(to),
        }
    }

    pub fn variable(name: &str, type_class: Type) -> Type {
        Type::Variable {
            name: name.to_string(),
            type_class: Box::new(type_class),
        }
    }

    pub fn is_hole(&self) -> bool {
        matches!(self, Type::Hole { .. })
    }

    /// Structural compatibility. Reflexive and recursive through composite
    /// shapes; holes are compatible with everything and integer literals
    /// with every builtin whose range holds them. Not transitive.
    pub fn compatible(&self, other: &Type) -> bool {
        if self == other {
            return true;
        }

        match (self, other) {
            (Type::IntLiteral(_), Type::IntLiteral(_)) => return true,
            (Type::TypeIdentifier(left), Type::TypeIdentifier(right)) => return left.compatible(right),
            (Type::Product(ll, lr), Type::Product(rl, rr))
            | (Type::Sum(ll, lr), Type::Sum(rl, rr))
            | (Type::Function(ll, lr), Type::Function(rl, rr)) => {
                return ll.compatible(rl) && lr.compatible(rr);
            }
            (
                Type::Polymorphic { type_class: lc, to: lt, .. },
                Type::Polymorphic { type_class: rc, to: rt, .. },
            ) => return lc.compatible(rc) && lt.compatible(rt),
            (Type::Record { names: ln, fields: lf }, Type::Record { names: rn, fields: rf })
            | (Type::Variant { names: ln, fields: lf }, Type::Variant { names: rn, fields: rf }) => {
                return ln == rn
                    && lf.len() == rf.len()
                    && lf.iter().zip(rf).all(|(left, right)| left.compatible(right));
            }
            _ => {}
        }

        if (matches!(self, Type::TypeIdentifier(_)) && *other == TYPES)
            || (*self == TYPES && matches!(other, Type::TypeIdentifier(_)))
        {
            return true;
        }

        if self.is_hole() || other.is_hole() {
            return true;
        }

        let (builtin, literal) = if matches!(other, Type::Builtin(_)) {
            (other, self)
        } else {
            (self, other)
        };

        match (builtin, literal) {
            (Type::Builtin(builtin), Type::IntLiteral(value)) => builtin.admits(*value),
            _ => false,
        }
    }

    /// Whether this type satisfies `type_class`, which must be a universe.
    pub fn satisfies(&self, type_class: &Type) -> bool {
        if !matches!(type_class, Type::TypeUniverse(_)) {
            return false;
        }

        match self {
            Type::TypeIdentifier(inner) => !matches!(**inner, Type::TypeUniverse(_)),
            Type::Variable { type_class: own, .. } => **own == *type_class,
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.compatible(&Type::IntLiteral(0))
    }

    /// Partial order used when resolving holes: a larger literal is stricter
    /// than a smaller one, a builtin is stricter than a literal it admits.
    pub fn is_stricter_type(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::IntLiteral(left), Type::IntLiteral(right)) => left.unsigned_abs() > right.unsigned_abs(),
            (Type::Builtin(_), Type::IntLiteral(_)) => self.compatible(other),
            _ => false,
        }
    }

    /// Picks the stricter of two compatible types. Between two literals the
    /// larger magnitude wins and a negative sign on either side is kept.
    pub fn get_stricter_type(&self, other: &Type) -> Type {
        match (self, other) {
            (Type::IntLiteral(left), Type::IntLiteral(right)) => {
                if left.unsigned_abs() > right.unsigned_abs() {
                    if *left < 0 || *right >= 0 {
                        Type::IntLiteral(*left)
                    } else {
                        Type::IntLiteral(-*left)
                    }
                } else if *left < 0 && *right >= 0 {
                    Type::IntLiteral(-*right)
                } else {
                    Type::IntLiteral(*right)
                }
            }
            (Type::Builtin(_), Type::IntLiteral(_)) => self.clone(),
            _ => other.clone(),
        }
    }

    /// Replaces every occurrence of the type variable `variable` with `value`.
    pub fn monomorphize(&self, variable: &str, value: &Type) -> Type {
        match self {
            Type::Function(from, to) => Type::function(from.monomorphize(variable, value), to.monomorphize(variable, value)),
            Type::Product(left, right) => {
                Type::product(left.monomorphize(variable, value), right.monomorphize(variable, value))
            }
            Type::Sum(left, right) => Type::sum(left.monomorphize(variable, value), right.monomorphize(variable, value)),
            Type::Polymorphic { from, type_class, to } => Type::Polymorphic {
                from: from.clone(),
                type_class: Box::new(type_class.monomorphize(variable, value)),
                to: Box::new(to.monomorphize(variable, value)),
            },
            Type::TypeIdentifier(inner) => Type::type_identifier(inner.monomorphize(variable, value)),
            Type::Variable { name, .. } if name == variable => value.clone(),
            Type::Record { names, fields } => Type::Record {
                names: names.clone(),
                fields: fields.iter().map(|field| field.monomorphize(variable, value)).collect(),
            },
            Type::Variant { names, fields } => Type::Variant {
                names: names.clone(),
                fields: fields.iter().map(|field| field.monomorphize(variable, value)).collect(),
            },
            Type::Enum(_)
            | Type::Builtin(_)
            | Type::IntLiteral(_)
            | Type::CString
            | Type::TypeUniverse(_)
            | Type::Variable { .. }
            | Type::Hole { .. } => self.clone(),
        }
    }
}

fn write_labelled(
    f: &mut std::fmt::Formatter<'_>,
    names: &[String],
    fields: &[Type],
    separator: &str,
) -> std::fmt::Result {
    let parts: Vec<String> = names
        .iter()
        .zip(fields)
        .map(|(name, field)| format!("({}: {})", name, field))
        .collect();
    write!(f, "{{{}}}", parts.join(separator))
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Enum(1) => write!(f, "unit"),
            Type::Enum(2) => write!(f, "bool"),
            Type::Enum(n) => write!(f, "{}", n),
            Type::Builtin(builtin) => write!(f, "{}", builtin),
            Type::IntLiteral(value) => write!(f, "ConstInt[{}]", value),
            Type::Function(from, to) => write!(f, "{} -> {}", from, to),
            Type::Product(left, right) => write!(f, "{} * {}", left, right),
            Type::Sum(left, right) => write!(f, "{} + {}", left, right),
            Type::CString => write!(f, "ConstString"),
            Type::TypeIdentifier(inner) => write!(f, "Val[{}]", inner),
            Type::TypeUniverse(level) => write!(f, "Type {}", level),
            Type::Polymorphic { from, type_class, to } => write!(f, "'{} : {} => {}", from, type_class, to),
            Type::Variable { name, type_class } => write!(f, "'{} : {}", name, type_class),
            Type::Hole { name, .. } => write!(f, "Hole[{}]", name),
            Type::Record { names, fields } => write_labelled(f, names, fields, " * "),
            Type::Variant { names, fields } => write_labelled(f, names, fields, " + "),
        }
    }
}
