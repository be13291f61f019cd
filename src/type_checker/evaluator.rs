//! Type evaluation of expressions.
//!
//! Values and types share one grammar, so a single evaluator serves both
//! purposes: evaluating a declared type yields a `TypeIdentifier`, while
//! evaluating a value yields the type of that value. An optional hint
//! carries the expected type down into lambda bodies, case arms and
//! return statements.

use std::collections::HashMap;

use crate::{
    ast::{
        expressions::{Case, ExprId, ExprKind, Expression},
        statements::{FieldDefinition, ProcedureDefinition, Statement},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{
    constraints::{Constraint, ConstraintTable},
    type_checker::{denoted_type, normalize_types},
    types::{Builtin, Type, BOOL, TYPES, UNIT},
};

/// Identifier to type, cloned whenever a new scope is entered.
pub type Bindings = HashMap<String, Type>;

fn error(kind: ErrorImpl, token: &Token) -> Error {
    Error::new(kind, token.clone())
}

fn unwrap_identifier(ty: Type) -> Type {
    match ty {
        Type::TypeIdentifier(inner) => *inner,
        other => other,
    }
}

#[derive(Debug, Default)]
pub struct TypeEvaluator {
    type_table: HashMap<ExprId, Type>,
    constraints: ConstraintTable,
    hole_count: usize,
}

impl TypeEvaluator {
    pub fn new() -> Self {
        TypeEvaluator::default()
    }

    /// Every expression evaluated so far, keyed by node identity.
    pub fn type_table(&self) -> &HashMap<ExprId, Type> {
        &self.type_table
    }

    pub fn constraints(&self) -> &ConstraintTable {
        &self.constraints
    }

    pub fn record(&mut self, id: ExprId, ty: Type) {
        self.type_table.insert(id, ty);
    }

    pub fn add_unification(&mut self, expected: &Type, actual: &Type) {
        self.constraints.add_unification(expected, actual);
    }

    /// Evaluates `expr` under `bindings`, guided by `hint` when given, and
    /// records the result in the type table.
    pub fn evaluate(&mut self, expr: &Expression, bindings: &Bindings, hint: Option<&Type>) -> Result<Type, Error> {
        let ty = match &expr.kind {
            ExprKind::Identifier(name) => lookup(name, &expr.token, bindings)?,
            ExprKind::Number(value) => Type::IntLiteral(*value),
            ExprKind::String(_) => Type::CString,
            ExprKind::Unit => UNIT,
            ExprKind::Tuple(values) => self.evaluate_tuple(values, bindings)?,
            ExprKind::Prefix { operator, operand } => self.evaluate_prefix(expr, *operator, operand, bindings)?,
            ExprKind::BinaryOperator { operator, left, right } => {
                self.evaluate_binary(expr, *operator, left, right, bindings, hint)?
            }
            ExprKind::Procedure { definitions, statements } => {
                self.evaluate_procedure(definitions, statements, bindings, hint)?
            }
            ExprKind::Case(cases) => self.evaluate_cases(expr, cases, bindings, hint)?,
            ExprKind::Application { function, argument } => {
                self.evaluate_application(expr, function, argument, bindings)?
            }
            ExprKind::Record(fields) => {
                let (names, fields) = self.evaluate_fields(fields, bindings)?;
                Type::type_identifier(Type::Record { names, fields })
            }
            ExprKind::Variant(fields) => {
                let (names, fields) = self.evaluate_fields(fields, bindings)?;
                Type::type_identifier(Type::Variant { names, fields })
            }
            ExprKind::Hole => self.fresh_hole(&expr.token),
        };

        log::trace!(target: "type_checker", "{} {} : {}", expr.id, expr, ty);
        self.type_table.insert(expr.id, ty.clone());
        Ok(ty)
    }

    fn evaluate_tuple(&mut self, values: &[Expression], bindings: &Bindings) -> Result<Type, Error> {
        let mut result: Option<Type> = None;
        for value in values {
            let ty = self.evaluate(value, bindings, None)?;
            result = Some(match result {
                Some(left) => Type::product(left, ty),
                None => ty,
            });
        }
        Ok(result.unwrap_or(UNIT))
    }

    fn evaluate_prefix(
        &mut self,
        expr: &Expression,
        operator: TokenKind,
        operand: &Expression,
        bindings: &Bindings,
    ) -> Result<Type, Error> {
        match operator {
            TokenKind::Minus => match self.evaluate(operand, bindings, None)? {
                Type::IntLiteral(value) => Ok(Type::IntLiteral(-value)),
                ty if ty.is_numeric() => Ok(ty),
                ty => Err(error(ErrorImpl::NotNegatable { found: ty.to_string() }, &expr.token)),
            },
            other => unreachable!("no type rule for prefix operator {}", other),
        }
    }

    fn evaluate_binary(
        &mut self,
        expr: &Expression,
        operator: TokenKind,
        left: &Expression,
        right: &Expression,
        bindings: &Bindings,
        hint: Option<&Type>,
    ) -> Result<Type, Error> {
        match operator {
            TokenKind::FuncType => {
                let from = unwrap_identifier(self.evaluate(left, bindings, None)?);
                let to = unwrap_identifier(self.evaluate(right, bindings, None)?);
                Ok(Type::type_identifier(Type::function(from, to)))
            }
            TokenKind::MapsTo => self.evaluate_lambda(expr, left, right, bindings, hint),
            TokenKind::DoubleTo => {
                let Some(name) = left.as_identifier() else {
                    return Err(error(ErrorImpl::PolymorphicBinding, &expr.token));
                };
                let mut scope = bindings.clone();
                scope.insert(name.to_string(), Type::variable(name, TYPES));
                let body = self.evaluate(right, &scope, None)?;
                Ok(Type::type_identifier(Type::polymorphic(name, TYPES, body)))
            }
            TokenKind::DoubleMapsTo => self.evaluate_polymorphic_lambda(expr, left, right, bindings, hint),
            TokenKind::Equals => {
                let (left, right) = self.evaluate_operands(left, right, bindings)?;
                if !left.compatible(&right) {
                    return Err(incompatible("compare", &left, &right, &expr.token));
                }
                Ok(BOOL)
            }
            TokenKind::Less => {
                let (left, right) = self.evaluate_operands(left, right, bindings)?;
                arithmetic("compare", &left, &right, &expr.token)?;
                Ok(BOOL)
            }
            TokenKind::Times | TokenKind::Plus => {
                let (left, right) = self.evaluate_operands(left, right, bindings)?;
                match (left, right) {
                    (Type::TypeIdentifier(left), Type::TypeIdentifier(right)) => {
                        let former = if operator == TokenKind::Times {
                            Type::Product(left, right)
                        } else {
                            Type::Sum(left, right)
                        };
                        Ok(Type::type_identifier(former))
                    }
                    (left, right) => {
                        let operation = if operator == TokenKind::Times { "multiply" } else { "add" };
                        arithmetic(operation, &left, &right, &expr.token)
                    }
                }
            }
            TokenKind::Minus | TokenKind::Slash => {
                let (left, right) = self.evaluate_operands(left, right, bindings)?;
                let operation = if operator == TokenKind::Minus { "subtract" } else { "divide" };
                arithmetic(operation, &left, &right, &expr.token)
            }
            other => unreachable!("no type rule for operator {}", other),
        }
    }

    fn evaluate_operands(
        &mut self,
        left: &Expression,
        right: &Expression,
        bindings: &Bindings,
    ) -> Result<(Type, Type), Error> {
        let left = self.evaluate(left, bindings, None)?;
        let right = self.evaluate(right, bindings, None)?;
        Ok((left, right))
    }

    fn evaluate_lambda(
        &mut self,
        expr: &Expression,
        left: &Expression,
        right: &Expression,
        bindings: &Bindings,
        hint: Option<&Type>,
    ) -> Result<Type, Error> {
        let (from, to) = match hint {
            None => {
                if left.as_identifier().is_none() {
                    return Err(error(ErrorImpl::MissingBinding, &expr.token));
                }
                return self.evaluate(right, bindings, None);
            }
            Some(Type::Function(from, to)) => (from, to),
            Some(other) => {
                return Err(error(ErrorImpl::ExpectedFunction { found: other.to_string() }, &expr.token));
            }
        };

        let mut scope = bindings.clone();
        match (&**from, &left.kind) {
            (Type::Product(..), ExprKind::Tuple(values)) => bind_parameters(&mut scope, values, from, &expr.token)?,
            (Type::Product(..), _) => return Err(error(ErrorImpl::MissingBinding, &expr.token)),
            _ => {
                let Some(name) = left.as_identifier() else {
                    return Err(error(ErrorImpl::MissingBinding, &expr.token));
                };
                scope.insert(name.to_string(), (**from).clone());
            }
        }

        let actual = self.evaluate(right, &scope, Some(&**to))?;
        if !to.compatible(&actual) {
            return Err(error(
                ErrorImpl::FunctionReturn {
                    expected: to.to_string(),
                    received: actual.to_string(),
                },
                &expr.token,
            ));
        }

        Ok(Type::Function(from.clone(), to.clone()))
    }

    fn evaluate_polymorphic_lambda(
        &mut self,
        expr: &Expression,
        left: &Expression,
        right: &Expression,
        bindings: &Bindings,
        hint: Option<&Type>,
    ) -> Result<Type, Error> {
        let Some(polymorphic @ Type::Polymorphic { to, .. }) = hint else {
            let found = hint.map_or_else(|| "nothing".to_string(), Type::to_string);
            return Err(error(ErrorImpl::ExpectedPolymorphic { found }, &expr.token));
        };
        let Some(name) = left.as_identifier() else {
            return Err(error(ErrorImpl::PolymorphicBinding, &expr.token));
        };

        let mut scope = bindings.clone();
        scope.insert(name.to_string(), Type::variable(name, TYPES));

        let actual = self.evaluate(right, &scope, Some(&**to))?;
        if !to.compatible(&actual) {
            return Err(error(
                ErrorImpl::PolymorphicBody {
                    expected: to.to_string(),
                    received: actual.to_string(),
                },
                &expr.token,
            ));
        }

        Ok(polymorphic.clone())
    }

    fn evaluate_cases(
        &mut self,
        expr: &Expression,
        cases: &[Case],
        bindings: &Bindings,
        hint: Option<&Type>,
    ) -> Result<Type, Error> {
        let Some(hint) = hint else {
            return Err(error(ErrorImpl::MissingCaseType, &expr.token));
        };

        for case in cases {
            if let Case::Bool { pattern, .. } = case {
                let ty = self.evaluate(pattern, bindings, Some(&BOOL))?;
                if !ty.compatible(&BOOL) {
                    return Err(error(ErrorImpl::CasePattern, &pattern.token));
                }
            }

            let value = case.value();
            let ty = self.evaluate(value, bindings, Some(hint))?;
            if !ty.compatible(hint) {
                return Err(error(ErrorImpl::CaseValue { expected: hint.to_string() }, &value.token));
            }
        }

        Ok(hint.clone())
    }

    fn evaluate_application(
        &mut self,
        expr: &Expression,
        function: &Expression,
        argument: &Expression,
        bindings: &Bindings,
    ) -> Result<Type, Error> {
        let function = self.evaluate(function, bindings, None)?;
        let argument = self.evaluate(argument, bindings, None)?;

        match &function {
            Type::Function(from, to) if from.compatible(&argument) => Ok((**to).clone()),
            Type::Function(from, _) => Err(error(
                ErrorImpl::ArgumentMismatch {
                    function: function.to_string(),
                    expected: from.to_string(),
                    received: argument.to_string(),
                },
                &expr.token,
            )),
            Type::Polymorphic { from, type_class, to } if argument.satisfies(type_class) => {
                let value = match &argument {
                    Type::TypeIdentifier(inner) => (**inner).clone(),
                    other => other.clone(),
                };
                if value.is_hole() {
                    self.constraints.add(value.clone(), Constraint::Satisfaction((**type_class).clone()));
                }
                Ok(to.monomorphize(from, &value))
            }
            Type::Polymorphic { type_class, .. } => Err(error(
                ErrorImpl::ConstraintNotSatisfied {
                    argument: argument.to_string(),
                    type_class: type_class.to_string(),
                    polymorphic: function.to_string(),
                },
                &expr.token,
            )),
            _ => Err(error(ErrorImpl::NotAFunction { found: function.to_string() }, &expr.token)),
        }
    }

    fn evaluate_procedure(
        &mut self,
        definitions: &[ProcedureDefinition],
        statements: &[Statement],
        bindings: &Bindings,
        hint: Option<&Type>,
    ) -> Result<Type, Error> {
        let mut scope = bindings.clone();

        let mut locals = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let declared = self.evaluate(&definition.ty, bindings, None)?;
            let declared = normalize_types(declared, &definition.ty.token)?;
            scope.insert(definition.id.data.clone(), declared.clone());
            locals.push((definition, declared));
        }

        for (definition, declared) in &locals {
            let Some(value) = &definition.val else {
                continue;
            };
            let actual = self.evaluate(value, &scope, Some(declared))?;
            self.check_assignment(declared, &actual, &value.token)?;
        }

        let mut result: Option<Type> = None;
        for statement in statements {
            match statement {
                Statement::Assignment { variable, value } => {
                    let expected = lookup(&variable.data, variable, &scope)?;
                    let actual = self.evaluate(value, &scope, Some(&expected))?;
                    self.check_assignment(&expected, &actual, &value.token)?;
                }
                Statement::Callable { routine, argument } if routine.data == "print" => {
                    self.evaluate(argument, &scope, None)?;
                }
                Statement::Callable { routine, argument } => {
                    let routine_type = lookup(&routine.data, routine, &scope)?;
                    let actual = self.evaluate(argument, &scope, None)?;
                    if let Type::Function(from, _) = &routine_type {
                        if !from.compatible(&actual) {
                            return Err(error(
                                ErrorImpl::ArgumentMismatch {
                                    function: routine_type.to_string(),
                                    expected: from.to_string(),
                                    received: actual.to_string(),
                                },
                                routine,
                            ));
                        }
                    }
                }
                Statement::Return { argument } => {
                    let current = self.evaluate(argument, &scope, hint)?;
                    let established = match result.take() {
                        None => current,
                        Some(established) => {
                            if !established.compatible(&current) {
                                return Err(error(
                                    ErrorImpl::InconsistentReturn {
                                        expected: established.to_string(),
                                        received: current.to_string(),
                                    },
                                    &argument.token,
                                ));
                            }
                            established
                        }
                    };

                    if let Some(hint) = hint {
                        if !established.compatible(hint) {
                            return Err(error(
                                ErrorImpl::ReturnMismatch {
                                    expected: hint.to_string(),
                                    received: established.to_string(),
                                },
                                &argument.token,
                            ));
                        }
                    }
                    result = Some(established);
                }
            }
        }

        Ok(result.unwrap_or(UNIT))
    }

    /// Links a declared type with the type assigned to it.
    fn check_assignment(&mut self, expected: &Type, actual: &Type, token: &Token) -> Result<(), Error> {
        self.constraints.add_unification(expected, actual);
        if !expected.compatible(actual) {
            return Err(error(
                ErrorImpl::TypeMismatch {
                    expected: expected.to_string(),
                    received: actual.to_string(),
                },
                token,
            ));
        }
        Ok(())
    }

    fn evaluate_fields(
        &mut self,
        fields: &[FieldDefinition],
        bindings: &Bindings,
    ) -> Result<(Vec<String>, Vec<Type>), Error> {
        let mut names = Vec::with_capacity(fields.len());
        let mut types = Vec::with_capacity(fields.len());

        for field in fields {
            let ty = self.evaluate(&field.ty, bindings, None)?;
            let Some(denoted) = denoted_type(ty.clone(), &field.ty.token)? else {
                return Err(error(ErrorImpl::NotAType { type_: ty.to_string() }, &field.ty.token));
            };
            names.push(field.id.data.clone());
            types.push(denoted);
        }

        Ok((names, types))
    }

    fn fresh_hole(&mut self, token: &Token) -> Type {
        let hole = Type::Hole {
            name: format!("?{}", self.hole_count),
            token: token.clone(),
        };
        self.hole_count += 1;
        self.constraints.register_hole(hole.clone());
        Type::type_identifier(hole)
    }
}

/// Resolves a name: builtin type names first, then the scope.
fn lookup(name: &str, token: &Token, bindings: &Bindings) -> Result<Type, Error> {
    if let Some(builtin) = Builtin::from_name(name) {
        return Ok(Type::type_identifier(Type::Builtin(builtin)));
    }

    bindings.get(name).cloned().ok_or_else(|| {
        error(
            ErrorImpl::UnknownIdentifier {
                name: name.to_string(),
            },
            token,
        )
    })
}

/// Binds a tuple of parameter names against a right-nested product type.
fn bind_parameters(scope: &mut Bindings, values: &[Expression], from: &Type, token: &Token) -> Result<(), Error> {
    let Some((last, init)) = values.split_last() else {
        return Err(error(ErrorImpl::MissingBinding, token));
    };

    let mut remaining = from.clone();
    for value in init {
        let Type::Product(component, rest) = remaining else {
            return Err(error(ErrorImpl::ExpectedProductParameter { found: from.to_string() }, token));
        };
        let Some(name) = value.as_identifier() else {
            return Err(error(ErrorImpl::ParameterNotIdentifier { found: value.to_string() }, &value.token));
        };
        scope.insert(name.to_string(), *component);
        remaining = *rest;
    }

    let Some(name) = last.as_identifier() else {
        return Err(error(ErrorImpl::ParameterNotIdentifier { found: last.to_string() }, &last.token));
    };
    scope.insert(name.to_string(), remaining);

    Ok(())
}

fn incompatible(operation: &'static str, left: &Type, right: &Type, token: &Token) -> Error {
    error(
        ErrorImpl::IncompatibleOperands {
            operation,
            left: left.to_string(),
            right: right.to_string(),
        },
        token,
    )
}

/// Numeric operands of compatible types; the result takes the left type.
fn arithmetic(operation: &'static str, left: &Type, right: &Type, token: &Token) -> Result<Type, Error> {
    if !left.is_numeric() || !right.is_numeric() {
        return Err(error(
            ErrorImpl::NonNumericOperands {
                operation,
                left: left.to_string(),
                right: right.to_string(),
            },
            token,
        ));
    }
    if !left.compatible(right) {
        return Err(incompatible(operation, left, right, token));
    }
    Ok(left.clone())
}
