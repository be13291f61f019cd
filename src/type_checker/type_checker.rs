use std::collections::HashMap;

use crate::{
    ast::{expressions::ExprId, statements::Definition},
    errors::{
        diagnostics::Diagnostic,
        errors::{Error, ErrorImpl},
    },
    lexer::tokens::Token,
    unit::CompilationUnit,
};

use super::{
    constraints::{Constraint, ConstraintTable},
    evaluator::{Bindings, TypeEvaluator},
    types::{Builtin, Type, TYPES},
};

/// Integer literals in this range denote a finite type with that many values.
fn as_enum(value: i64) -> Option<Type> {
    u32::try_from(value)
        .ok()
        .filter(|count| (1..=i32::MAX as u32).contains(count))
        .map(Type::Enum)
}

/// Reduces an evaluated type expression to its canonical form: strips
/// `TypeIdentifier` wrappers, recurses into composite types and turns
/// positive integer literals into enums. Anything that is not a type is
/// reported against `token`.
pub fn normalize_types(ty: Type, token: &Token) -> Result<Type, Error> {
    match ty {
        Type::TypeIdentifier(inner) => normalize_types(*inner, token),
        Type::Function(from, to) => Ok(Type::function(normalize_types(*from, token)?, normalize_types(*to, token)?)),
        Type::Product(left, right) => Ok(Type::product(
            normalize_types(*left, token)?,
            normalize_types(*right, token)?,
        )),
        Type::Sum(left, right) => Ok(Type::sum(normalize_types(*left, token)?, normalize_types(*right, token)?)),
        Type::Polymorphic { from, type_class, to } => Ok(Type::Polymorphic {
            from,
            type_class: Box::new(normalize_types(*type_class, token)?),
            to: Box::new(normalize_types(*to, token)?),
        }),
        Type::Record { names, fields } => Ok(Type::Record {
            names,
            fields: normalize_all(fields, token)?,
        }),
        Type::Variant { names, fields } => Ok(Type::Variant {
            names,
            fields: normalize_all(fields, token)?,
        }),
        Type::IntLiteral(value) => as_enum(value).ok_or_else(|| {
            Error::new(
                ErrorImpl::NotAType {
                    type_: Type::IntLiteral(value).to_string(),
                },
                token.clone(),
            )
        }),
        ty @ (Type::Builtin(_)
        | Type::CString
        | Type::Enum(_)
        | Type::TypeUniverse(_)
        | Type::Variable { .. }
        | Type::Hole { .. }) => Ok(ty),
    }
}

fn normalize_all(fields: Vec<Type>, token: &Token) -> Result<Vec<Type>, Error> {
    fields.into_iter().map(|field| normalize_types(field, token)).collect()
}

/// The type an evaluated expression denotes, if it denotes one at all.
pub fn denoted_type(ty: Type, token: &Token) -> Result<Option<Type>, Error> {
    match ty {
        Type::TypeIdentifier(_) => normalize_types(ty, token).map(Some),
        Type::IntLiteral(value) => Ok(as_enum(value)),
        ty if ty == TYPES => Ok(Some(ty)),
        _ => Ok(None),
    }
}

/// Progress of a single top-level definition through the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    TypeEvaluated,
    ValueEvaluated,
    Consistent,
    Inconsistent,
}

/// Bindings every program starts with.
pub fn global_bindings() -> Bindings {
    let mut bindings: Bindings = Builtin::ALL
        .into_iter()
        .map(|builtin| (builtin.name().to_string(), Type::type_identifier(Type::Builtin(builtin))))
        .collect();

    bindings.insert("Type".to_string(), Type::type_identifier(TYPES));
    bindings.insert(
        "inl".to_string(),
        Type::polymorphic(
            "T",
            TYPES,
            Type::polymorphic(
                "U",
                TYPES,
                Type::function(
                    Type::variable("T", TYPES),
                    Type::sum(Type::variable("T", TYPES), Type::variable("U", TYPES)),
                ),
            ),
        ),
    );

    bindings
}

/// Checks a list of top-level definitions in two passes: declared types
/// first, so every definition can see every other, then values against
/// those types. Holes are resolved from their constraints afterwards.
#[derive(Debug)]
pub struct TypeChecker {
    bindings: Bindings,
    evaluator: TypeEvaluator,
    states: Vec<CheckState>,
    errored: bool,
}

impl Default for TypeChecker {
    fn default() -> Self {
        TypeChecker::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            bindings: global_bindings(),
            evaluator: TypeEvaluator::new(),
            states: vec![],
            errored: false,
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn type_table(&self) -> &HashMap<ExprId, Type> {
        self.evaluator.type_table()
    }

    pub fn constraints(&self) -> &ConstraintTable {
        self.evaluator.constraints()
    }

    /// One state per checked definition, in source order.
    pub fn states(&self) -> &[CheckState] {
        &self.states
    }

    pub fn errored(&self) -> bool {
        self.errored
    }

    pub fn check(&mut self, unit: &mut CompilationUnit, definitions: &[Definition]) {
        self.states = vec![CheckState::Unchecked; definitions.len()];

        let mut declared = Vec::with_capacity(definitions.len());
        for (index, definition) in definitions.iter().enumerate() {
            match self.declare(definition) {
                Ok(ty) => {
                    log::debug!(target: "type_checker", "{} : {}", definition.id.data, ty);
                    self.bindings.insert(definition.id.data.clone(), ty.clone());
                    self.evaluator.record(definition.val.id, ty.clone());
                    self.states[index] = CheckState::TypeEvaluated;
                    declared.push(Some(ty));
                }
                Err(error) => {
                    self.report(unit, &error);
                    self.states[index] = CheckState::Inconsistent;
                    declared.push(None);
                }
            }
        }

        for (index, definition) in definitions.iter().enumerate() {
            let Some(expected) = &declared[index] else {
                continue;
            };

            let actual = match self.evaluator.evaluate(&definition.val, &self.bindings, Some(expected)) {
                Ok(actual) => actual,
                Err(error) => {
                    self.report(unit, &error);
                    self.states[index] = CheckState::Inconsistent;
                    continue;
                }
            };
            self.states[index] = CheckState::ValueEvaluated;
            self.evaluator.add_unification(expected, &actual);

            if !expected.compatible(&actual) {
                let error = Error::new(
                    ErrorImpl::TypeMismatch {
                        expected: expected.to_string(),
                        received: actual.to_string(),
                    },
                    definition.val.token.clone(),
                );
                self.report(unit, &error);
                self.states[index] = CheckState::Inconsistent;
                continue;
            }

            log::debug!(target: "type_checker", "{} = {}", definition.id.data, actual);
            if should_update_binding(expected) {
                self.bindings.insert(definition.id.data.clone(), actual);
            }
            self.states[index] = CheckState::Consistent;
        }

        for error in self.resolve_holes() {
            self.report(unit, &error);
        }

        if !self.errored {
            let message = format!("Successfully typechecked {}", unit.file_name);
            unit.info(message);
        }
    }

    fn declare(&mut self, definition: &Definition) -> Result<Type, Error> {
        let ty = self.evaluator.evaluate(&definition.ty, &self.bindings, None)?;
        match denoted_type(ty.clone(), &definition.ty.token)? {
            Some(denoted) => Ok(denoted),
            None => Err(Error::new(
                ErrorImpl::NotATypeIdentifier {
                    type_: ty.to_string(),
                    definition: definition.id.data.clone(),
                },
                definition.ty.token.clone(),
            )),
        }
    }

    /// Folds each hole's unification constraints into one candidate type.
    fn resolve_holes(&self) -> Vec<Error> {
        let mut errors = vec![];

        for (hole, constraints) in self.evaluator.constraints().iter() {
            let listed: Vec<String> = constraints.iter().map(ToString::to_string).collect();
            log::debug!(target: "type_checker", "{}: {}", hole, listed.join(", "));

            let Type::Hole { token, .. } = hole else {
                continue;
            };

            let mut candidate: Option<Type> = None;
            for constraint in constraints {
                let Constraint::Unification(ty) = constraint else {
                    continue;
                };
                match &candidate {
                    None => candidate = Some(ty.clone()),
                    Some(current) if current.compatible(ty) => {
                        let stricter = ty.get_stricter_type(current);
                        candidate = Some(stricter);
                    }
                    Some(current) => errors.push(Error::new(
                        ErrorImpl::NotUnifiable {
                            hole: hole.to_string(),
                            left: current.to_string(),
                            right: ty.to_string(),
                        },
                        token.clone(),
                    )),
                }
            }

            match candidate {
                // TODO: substitute resolved holes back into the type table.
                Some(resolved) => log::debug!(target: "type_checker", "{} resolved to {}", hole, resolved),
                None => errors.push(Error::new(
                    ErrorImpl::NoConcreteType {
                        hole: hole.to_string(),
                    },
                    token.clone(),
                )),
            }
        }

        errors
    }

    fn report(&mut self, unit: &mut CompilationUnit, error: &Error) {
        log::trace!(target: "type_checker", "{}: {}", error.get_error_name(), error);
        let diagnostic = Diagnostic::from_error(unit, error);
        unit.add_diagnostic(diagnostic);
        self.errored = true;
    }
}

/// Definitions whose declared type is a type-level scheme take on the more
/// specific type their value evaluates to.
fn should_update_binding(expected: &Type) -> bool {
    matches!(expected, Type::Polymorphic { to, .. } if **to == TYPES)
}

/// Runs the checker over `definitions`, reporting into `unit`.
pub fn type_check(unit: &mut CompilationUnit, definitions: &[Definition]) -> TypeChecker {
    let mut checker = TypeChecker::new();
    checker.check(unit, definitions);
    checker
}
