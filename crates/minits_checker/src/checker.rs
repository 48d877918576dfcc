//! The checking pass.
//!
//! [`Checker`] walks an already-parsed source file statement by statement,
//! computing a type for every expression and collecting diagnostics. Every
//! statement is checked even after earlier ones failed.
//!
//! Type resolution lives in `resolve.rs` and expression checking in
//! `expression.rs`; both extend the same `impl Checker` block.

use crate::builtins;
use crate::narrowing::Guard;
use crate::relation::{Reason, Relation};
use crate::scope::{BindingId, Environment, ScopeExit, ScopeKind};
use crate::types::{
    ObjectShape, ParamInfo, PropertyInfo, Signature, TypeId, TypeKind, TypeTable,
};
use minits_ast::node::*;
use minits_ast::NodeFlags;
use minits_core::intern::{Atom, Interner};
use minits_core::text::TextSpan;
use minits_diagnostics::{
    messages, Diagnostic, DiagnosticCollection, DiagnosticMessage, DiagnosticSink,
};
use minits_options::CheckerOptions;
use rustc_hash::FxHashMap;

/// Where a named type comes from.
#[derive(Debug, Clone)]
pub(crate) enum TypeDecl<'a> {
    Alias(&'a TypeAliasDeclaration<'a>),
    /// Every declaration merged under one name, in source order.
    Interface(Vec<&'a InterfaceDeclaration<'a>>),
    Builtin(TypeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolveState {
    Unresolved,
    /// Being resolved. Holds the id reserved for it once a member refers
    /// back to it.
    Resolving(Option<TypeId>),
    Resolved(TypeId),
}

/// A type name declared in some scope.
#[derive(Debug, Clone)]
pub(crate) struct TypeSymbol<'a> {
    pub(crate) name: Atom,
    pub(crate) decl: TypeDecl<'a>,
    pub(crate) state: ResolveState,
    /// Set while the `extends` clauses of an interface are resolved.
    pub(crate) resolving_bases: bool,
}

/// An interface built before some of its bases were done resolving.
#[derive(Debug, Clone)]
pub(crate) struct LateBases {
    pub(crate) id: TypeId,
    pub(crate) bases: Vec<usize>,
}

/// A function declaration whose signature was built before its block ran.
#[derive(Debug, Clone, Copy)]
struct HoistedFunction {
    binding: BindingId,
    ty: TypeId,
    /// Properties assigned onto the function next to its declaration.
    expando: Option<TypeId>,
}

/// Return types seen while checking one function body.
#[derive(Debug, Default)]
pub(crate) struct ReturnContext {
    pub(crate) annotated: Option<TypeId>,
    pub(crate) collected: Vec<TypeId>,
    pub(crate) has_bare_return: bool,
}

/// The type checker.
pub struct Checker<'a> {
    /// The type table (type arena).
    pub types: TypeTable,
    pub(crate) relation: Relation,
    pub(crate) options: CheckerOptions,
    pub(crate) env: Environment,
    /// Type names per scope, parallel to the value scopes in `env`.
    pub(crate) type_scopes: Vec<FxHashMap<Atom, usize>>,
    pub(crate) type_symbols: Vec<TypeSymbol<'a>>,
    /// Nesting of object and function types being resolved. A type name
    /// met inside one may refer to a declaration still being resolved.
    pub(crate) deferred_depth: u32,
    pub(crate) late_bases: Vec<LateBases>,
    hoisted: FxHashMap<TextSpan, HoistedFunction>,
    pub(crate) returns: Vec<ReturnContext>,
    expression_types: FxHashMap<TextSpan, TypeId>,
    diagnostics: DiagnosticCollection,
}

impl<'a> Checker<'a> {
    pub fn new(interner: Interner) -> Self {
        Self::with_options(interner, CheckerOptions::default())
    }

    pub fn with_options(interner: Interner, options: CheckerOptions) -> Self {
        let mut checker = Self {
            types: TypeTable::new(interner),
            relation: Relation::new(&options),
            options,
            env: Environment::new(),
            type_scopes: vec![FxHashMap::default()],
            type_symbols: Vec::new(),
            deferred_depth: 0,
            late_bases: Vec::new(),
            hoisted: FxHashMap::default(),
            returns: Vec::new(),
            expression_types: FxHashMap::default(),
            diagnostics: DiagnosticCollection::new(),
        };
        for (name, ty) in builtins::prelude_values(&mut checker.types) {
            checker.declare_global(name, ty);
        }
        for (name, ty) in builtins::prelude_types(&mut checker.types) {
            checker.declare_global_type(name, ty);
        }
        checker
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    /// Declare a global value, e.g. a host API the program may call.
    pub fn declare_global(&mut self, name: &str, ty: TypeId) -> BindingId {
        let atom = self.types.interner().intern(name);
        self.env.declare(atom, ty, true)
    }

    /// Declare a global type name.
    pub fn declare_global_type(&mut self, name: &str, ty: TypeId) {
        let atom = self.types.interner().intern(name);
        self.types.set_name(ty, atom);
        let index = self.type_symbols.len();
        self.type_symbols.push(TypeSymbol {
            name: atom,
            decl: TypeDecl::Builtin(ty),
            state: ResolveState::Resolved(ty),
            resolving_bases: false,
        });
        if let Some(scope) = self.type_scopes.first_mut() {
            scope.insert(atom, index);
        }
    }

    /// Check a source file for type errors.
    pub fn check_source_file(&mut self, source_file: &'a SourceFile<'a>) {
        tracing::debug!(file = source_file.file_name, "checking source file");
        self.check_statements(source_file.statements);
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    /// Hand every collected diagnostic to `sink`, in report order.
    pub fn report_to(&mut self, sink: &mut dyn DiagnosticSink) {
        self.diagnostics.drain_into(sink);
    }

    pub fn is_assignable(&mut self, source: TypeId, target: TypeId) -> bool {
        self.relation.is_assignable(&self.types, source, target)
    }

    pub fn explain(&mut self, source: TypeId, target: TypeId) -> Option<Reason> {
        self.relation.explain(&self.types, source, target)
    }

    pub fn display(&self, ty: TypeId) -> String {
        self.types.display(ty)
    }

    /// The current type of a value name visible at the top level.
    pub fn type_of_binding(&self, name: &str) -> Option<TypeId> {
        let atom = self.types.interner().get(name)?;
        let id = self.env.lookup(atom)?;
        Some(self.env.current_type(id))
    }

    /// Resolve a type name visible at the top level.
    pub fn type_named(&mut self, name: &str) -> Option<TypeId> {
        let atom = self.types.interner().get(name)?;
        let index = self.lookup_type_symbol(atom)?;
        Some(self.resolve_type_symbol(index, TextSpan::default()))
    }

    /// The type computed for the expression at `span`.
    pub fn type_at(&self, span: TextSpan) -> Option<TypeId> {
        self.expression_types.get(&span).copied()
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    pub(crate) fn error(&mut self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) {
        self.report(Diagnostic::with_span(span, message, args));
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(
            code = diagnostic.code,
            kind = ?diagnostic.kind,
            message = %diagnostic.message_text,
            "diagnostic"
        );
        self.diagnostics.add(diagnostic);
    }

    pub(crate) fn record_type(&mut self, span: TextSpan, ty: TypeId) {
        self.expression_types.insert(span, ty);
    }

    pub(crate) fn name_text(&self, name: Atom) -> String {
        self.types.interner().resolve(name).to_string()
    }

    /// Display `source` the way an error about it reads: fresh literals are
    /// shown widened unless the target itself is literal.
    fn display_source(&mut self, source: TypeId, target: TypeId) -> String {
        if self.types.contains_literal(target) {
            self.types.display(source)
        } else {
            let widened = self.types.widen(source);
            self.types.display(widened)
        }
    }

    /// Check that `source`, the type of `expr`, may be used where `target`
    /// is expected. Reports and returns `false` when it may not.
    pub(crate) fn check_assignable_expression(
        &mut self,
        expr: &'a Expression<'a>,
        source: TypeId,
        target: TypeId,
        argument: bool,
    ) -> bool {
        if self.options.excess_property_checks && self.check_excess_properties(expr, target) {
            return false;
        }
        self.check_assignable(expr.span(), source, target, argument)
    }

    pub(crate) fn check_assignable(
        &mut self,
        span: TextSpan,
        source: TypeId,
        target: TypeId,
        argument: bool,
    ) -> bool {
        let Some(reason) = self.relation.explain(&self.types, source, target) else {
            return true;
        };
        match reason {
            Reason::MissingProperty {
                name,
                source: from,
                target: to,
            } if !argument => {
                let name = self.name_text(name);
                let from = self.display_source(from, to);
                let to = self.types.display(to);
                self.error(
                    span,
                    &messages::PROPERTY_0_IS_MISSING_IN_TYPE_1_BUT_REQUIRED_IN_TYPE_2,
                    &[&name, &from, &to],
                );
            }
            Reason::TupleArity { .. } if !argument => {
                let mut diagnostic = reason.elaborate(&self.types);
                diagnostic.span = Some(span);
                self.report(diagnostic);
            }
            _ => {
                let message = if argument {
                    &messages::ARGUMENT_OF_TYPE_0_IS_NOT_ASSIGNABLE_TO_PARAMETER_OF_TYPE_1
                } else {
                    &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1
                };
                let from = self.display_source(source, target);
                let to = self.types.display(target);
                let mut diagnostic = Diagnostic::with_span(span, message, &[&from, &to]);
                let leaf = matches!(
                    reason,
                    Reason::Incompatible { source: s, target: t } if s == source && t == target
                );
                if !leaf {
                    diagnostic = diagnostic.with_related(reason.elaborate(&self.types));
                }
                self.report(diagnostic);
            }
        }
        false
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    pub(crate) fn enter_scope(&mut self, kind: ScopeKind) {
        self.env.push_scope(kind);
        self.type_scopes.push(FxHashMap::default());
    }

    pub(crate) fn leave_scope(&mut self) -> ScopeExit {
        self.type_scopes.pop();
        self.env.pop_scope()
    }

    /// Leave two sibling branches entered from the same state. Only the
    /// branches that fall through reach the code after them.
    pub(crate) fn join_branches(
        &mut self,
        when_true: Option<ScopeExit>,
        when_false: Option<ScopeExit>,
    ) {
        match (when_true, when_false) {
            (Some(exit), None) | (None, Some(exit)) => self.env.apply_exit(exit),
            (Some(a), Some(b)) => self.env.join_exits(&mut self.types, &[a, b]),
            (None, None) => {}
        }
    }

    /// Push the refinements `guard` implies when it evaluates to
    /// `assume_true`.
    pub(crate) fn apply_guard(&mut self, guard: &Guard, assume_true: bool) {
        let env = &self.env;
        let current = |name: Atom| env.lookup(name).map(|id| env.current_type(id));
        let narrowed = guard.narrowings(&mut self.types, &current, assume_true);
        for (name, ty) in narrowed {
            if let Some(id) = self.env.lookup(name) {
                tracing::trace!(
                    binding = self.types.interner().resolve(name),
                    branch = assume_true,
                    ty = %self.types.display(ty),
                    "narrowed by guard"
                );
                self.env.narrow(id, ty);
            }
        }
    }

    // ========================================================================
    // Statement checking
    // ========================================================================

    /// Check the statements of a block in the current scope, after hoisting
    /// its type and function declarations.
    pub(crate) fn check_statements(&mut self, statements: &'a [Statement<'a>]) {
        self.hoist_declarations(statements);
        for statement in statements {
            self.check_statement(statement);
        }
    }

    fn check_statement(&mut self, stmt: &'a Statement<'a>) {
        match stmt {
            Statement::VariableStatement(n) => self.check_variable_statement(n),
            Statement::ExpressionStatement(n) => {
                self.check_expression(n.expression);
            }
            Statement::IfStatement(n) => self.check_if_statement(n),
            Statement::Block(n) => {
                self.enter_scope(ScopeKind::Block);
                self.check_statements(n.statements);
                let exit = self.leave_scope();
                self.env.apply_exit(exit);
            }
            Statement::ReturnStatement(n) => self.check_return_statement(n),
            Statement::ForOfStatement(n) => self.check_for_of_statement(n),
            Statement::FunctionDeclaration(n) => self.check_function_declaration(n),
            Statement::TypeAliasDeclaration(n) => self.check_type_declaration(n.name),
            Statement::InterfaceDeclaration(n) => self.check_type_declaration(n.name),
        }
    }

    fn check_variable_statement(&mut self, stmt: &'a VariableStatement<'a>) {
        let is_const = stmt.is_const();
        for decl in stmt.declarations {
            self.check_variable_declaration(decl, is_const);
        }
    }

    fn check_variable_declaration(&mut self, decl: &'a VariableDeclaration<'a>, is_const: bool) {
        let annotated = decl.type_annotation.map(|node| self.resolve_type_node(node));
        let mut assigned = None;
        let declared = match (annotated, decl.initializer) {
            (Some(target), Some(init)) => {
                let source = self.check_expression_with_context(init, Some(target));
                if self.check_assignable_expression(init, source, target, false) {
                    assigned = Some(source);
                }
                target
            }
            (Some(target), None) => target,
            (None, Some(init)) => {
                let ty = self.check_expression(init);
                if is_const {
                    ty
                } else {
                    self.types.widen(ty)
                }
            }
            (None, None) => self.types.unknown,
        };

        let id = self.env.declare(decl.name.name, declared, is_const);
        if let Some(source) = assigned {
            self.refine_by_assignment(id, declared, source);
        }
    }

    /// After `x = v` type-checked, narrow `x` to what was assigned.
    ///
    /// Only union-typed bindings are refined. Primitive and literal parts
    /// of `v` are kept as written; object parts become the declared
    /// members they are assignable to, so named types survive.
    pub(crate) fn refine_by_assignment(&mut self, id: BindingId, declared: TypeId, source: TypeId) {
        if self.types.constituents_expanded(declared).len() < 2 {
            return;
        }
        let declared_members = self.types.constituents_expanded(declared);
        let mut refined = Vec::new();
        for member in self.types.constituents(source) {
            if self.types.contains(declared, member) || self.types.is_unknown(member) {
                refined.push(member);
                continue;
            }
            let is_object_like = !matches!(
                self.types.kind(member),
                TypeKind::Primitive(_) | TypeKind::Literal(_)
            );
            if is_object_like {
                let matching: Vec<TypeId> = declared_members
                    .iter()
                    .copied()
                    .filter(|&d| self.relation.is_assignable(&self.types, member, d))
                    .collect();
                if !matching.is_empty() {
                    refined.extend(matching);
                    continue;
                }
            }
            refined.push(member);
        }
        let ty = self.types.union(refined);
        self.env.assign(id, ty);
    }

    fn check_if_statement(&mut self, stmt: &'a IfStatement<'a>) {
        self.check_expression(stmt.expression);
        let guard = self.guard_of(stmt.expression);
        let then_exits = always_exits(stmt.then_statement);
        let else_exits = stmt.else_statement.is_some_and(always_exits);

        self.enter_scope(ScopeKind::Branch);
        self.apply_guard(&guard, true);
        self.check_statement(stmt.then_statement);
        let then_exit = self.leave_scope();

        self.enter_scope(ScopeKind::Branch);
        self.apply_guard(&guard, false);
        if let Some(else_statement) = stmt.else_statement {
            self.check_statement(else_statement);
        }
        let else_exit = self.leave_scope();

        // Code after the statement only runs on the branch that did not exit.
        if then_exits && !else_exits {
            self.apply_guard(&guard, false);
        } else if else_exits && !then_exits {
            self.apply_guard(&guard, true);
        }
        self.join_branches(
            (!then_exits).then_some(then_exit),
            (!else_exits).then_some(else_exit),
        );
    }

    fn check_return_statement(&mut self, stmt: &'a ReturnStatement<'a>) {
        let annotated = self.returns.last().and_then(|ctx| ctx.annotated);
        let Some(expr) = stmt.expression else {
            if let Some(ctx) = self.returns.last_mut() {
                ctx.has_bare_return = true;
            }
            return;
        };
        let ty = self.check_expression_with_context(expr, annotated);
        if let Some(target) = annotated {
            self.check_assignable_expression(expr, ty, target, false);
        }
        if let Some(ctx) = self.returns.last_mut() {
            ctx.collected.push(ty);
        }
    }

    fn check_for_of_statement(&mut self, stmt: &'a ForOfStatement<'a>) {
        let iterated = self.check_expression(stmt.expression);
        let element = self.iterated_element_type(iterated);
        self.enter_scope(ScopeKind::Block);
        let is_const = stmt.data.has(NodeFlags::CONST);
        self.env.declare(stmt.name.name, element, is_const);
        self.check_statement(stmt.statement);
        let exit = self.leave_scope();
        // The body may not run at all.
        self.env.join_exits(&mut self.types, &[exit, ScopeExit::default()]);
    }

    fn check_type_declaration(&mut self, name: Identifier) {
        if let Some(index) = self.lookup_type_symbol(name.name) {
            self.resolve_type_symbol(index, name.data.span);
        }
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Declare a function before its block runs. `siblings` are the
    /// statements of that block; `name.prop = value` among them adds `prop`
    /// to the function's type.
    pub(crate) fn hoist_function(
        &mut self,
        decl: &'a FunctionDeclaration<'a>,
        siblings: &'a [Statement<'a>],
    ) {
        let signature = self.build_signature(decl.parameters, decl.return_type, None);
        let ty = self.types.function(signature);
        let properties = self.expando_properties(siblings, decl.name.name);
        let expando = (!properties.is_empty()).then(|| {
            self.types.object(ObjectShape {
                properties,
                ..ObjectShape::default()
            })
        });
        let value = self.function_value_type(ty, expando);
        let binding = self.env.declare(decl.name.name, value, true);
        self.hoisted.insert(
            decl.data.span,
            HoistedFunction {
                binding,
                ty,
                expando,
            },
        );
    }

    fn function_value_type(&mut self, ty: TypeId, expando: Option<TypeId>) -> TypeId {
        match expando {
            Some(properties) => self.types.intersection(ty, properties),
            None => ty,
        }
    }

    fn expando_properties(
        &mut self,
        siblings: &'a [Statement<'a>],
        name: Atom,
    ) -> Vec<PropertyInfo> {
        let mut properties: Vec<PropertyInfo> = Vec::new();
        for statement in siblings {
            let Statement::ExpressionStatement(stmt) = statement else {
                continue;
            };
            let Expression::Binary(assign) = stmt.expression.skip_parentheses() else {
                continue;
            };
            if assign.operator != BinaryOperator::Assign {
                continue;
            }
            let Expression::PropertyAccess(access) = assign.left.skip_parentheses() else {
                continue;
            };
            let is_target = matches!(
                access.expression.skip_parentheses(),
                Expression::Identifier(target) if target.name == name
            );
            if !is_target || properties.iter().any(|p| p.name == access.name.name) {
                continue;
            }
            let ty = self.expando_value_type(assign.right);
            properties.push(PropertyInfo::new(access.name.name, ty));
        }
        properties
    }

    /// Type of an expando property from the form of its first value. Only
    /// literals are typed this early; anything else is `any`.
    fn expando_value_type(&mut self, value: &Expression<'_>) -> TypeId {
        match value.skip_parentheses() {
            Expression::Literal(literal) => match literal.value {
                Literal::String(_) => self.types.string,
                Literal::Number(_) => self.types.number,
                Literal::Boolean(_) => self.types.boolean,
            },
            Expression::Template(_) => self.types.string,
            Expression::PrefixUnary(unary)
                if matches!(unary.operator, PrefixOperator::Minus | PrefixOperator::Plus) =>
            {
                self.types.number
            }
            _ => self.types.unknown,
        }
    }

    fn check_function_declaration(&mut self, decl: &'a FunctionDeclaration<'a>) {
        let hoisted = match self.hoisted.get(&decl.data.span) {
            Some(hoisted) => *hoisted,
            None => {
                self.hoist_function(decl, &[]);
                match self.hoisted.get(&decl.data.span) {
                    Some(hoisted) => *hoisted,
                    None => return,
                }
            }
        };
        let Some(signature) = self.types.signature_of(hoisted.ty).cloned() else {
            return;
        };
        let annotated = decl.return_type.map(|_| signature.return_type);
        let return_type = self.check_function_body(
            decl.parameters,
            &signature,
            ArrowBody::Block(decl.body),
            annotated,
            None,
        );
        if annotated.is_none() {
            let ty = self.types.function(Signature {
                params: signature.params,
                return_type,
            });
            let value = self.function_value_type(ty, hoisted.expando);
            self.env.set_declared(hoisted.binding, value);
            self.hoisted.insert(
                decl.data.span,
                HoistedFunction {
                    binding: hoisted.binding,
                    ty,
                    expando: hoisted.expando,
                },
            );
        }
    }

    /// Build a signature from parameter declarations.
    ///
    /// An unannotated parameter takes its type from its default value, then
    /// from the contextual signature. An unannotated return is `any` here;
    /// callers infer it from the body.
    pub(crate) fn build_signature(
        &mut self,
        parameters: &'a [ParameterDeclaration<'a>],
        return_type: Option<&'a TypeNode<'a>>,
        contextual: Option<&Signature>,
    ) -> Signature {
        let mut params = Vec::with_capacity(parameters.len());
        let mut seen_optional = false;
        for (index, param) in parameters.iter().enumerate() {
            let rest = param.is_rest();
            let optional = !rest && param.is_optional();
            if !optional && !rest && seen_optional {
                self.error(
                    param.data.span,
                    &messages::A_REQUIRED_PARAMETER_CANNOT_FOLLOW_AN_OPTIONAL_PARAMETER,
                    &[],
                );
            }
            seen_optional |= optional;

            let ty = match (param.type_annotation, param.initializer) {
                (Some(node), _) => self.resolve_type_node(node),
                (None, Some(init)) => {
                    let ty = self.check_expression(init);
                    self.types.widen(ty)
                }
                (None, None) => match contextual.and_then(|s| s.param_type_at(&self.types, index)) {
                    Some(ty) if rest => self.types.array(ty),
                    Some(ty) => ty,
                    None => {
                        if self.options.no_implicit_any {
                            let name = self.name_text(param.name.name);
                            self.error(
                                param.data.span,
                                &messages::PARAMETER_0_IMPLICITLY_HAS_AN_ANY_TYPE,
                                &[&name],
                            );
                        }
                        if rest {
                            self.types.array(self.types.unknown)
                        } else {
                            self.types.unknown
                        }
                    }
                },
            };
            params.push(ParamInfo {
                name: param.name.name,
                ty,
                optional,
                rest,
            });
        }
        let return_type = match return_type {
            Some(node) => self.resolve_type_node(node),
            None => self.types.unknown,
        };
        Signature {
            params,
            return_type,
        }
    }

    /// Check a function body against its signature and return its return
    /// type: the annotation, or the union of the returned types.
    pub(crate) fn check_function_body(
        &mut self,
        parameters: &'a [ParameterDeclaration<'a>],
        signature: &Signature,
        body: ArrowBody<'a>,
        annotated: Option<TypeId>,
        contextual_return: Option<TypeId>,
    ) -> TypeId {
        self.enter_scope(ScopeKind::Function);
        for (param, info) in parameters.iter().zip(signature.params.iter()) {
            let ty = if info.optional && param.initializer.is_none() {
                self.types.union([info.ty, self.types.undefined])
            } else {
                info.ty
            };
            if let (Some(_), Some(init)) = (param.type_annotation, param.initializer) {
                let value = self.check_expression_with_context(init, Some(info.ty));
                self.check_assignable_expression(init, value, info.ty, false);
            }
            self.env.declare(param.name.name, ty, false);
        }

        self.returns.push(ReturnContext {
            annotated,
            ..ReturnContext::default()
        });
        match body {
            ArrowBody::Block(block) => self.check_statements(block.statements),
            ArrowBody::Expression(expr) => {
                let context = annotated.or(contextual_return);
                let ty = self.check_expression_with_context(expr, context);
                if let Some(target) = annotated {
                    self.check_assignable_expression(expr, ty, target, false);
                }
                if let Some(ctx) = self.returns.last_mut() {
                    ctx.collected.push(ty);
                }
            }
        }
        let ctx = self.returns.pop().unwrap_or_default();
        self.leave_scope();

        if let Some(annotated) = annotated {
            return annotated;
        }
        if ctx.collected.is_empty() {
            return self.types.void;
        }
        let keep_literals = contextual_return.is_some_and(|t| self.types.contains_literal(t));
        let mut returned: Vec<TypeId> = ctx
            .collected
            .into_iter()
            .map(|ty| if keep_literals { ty } else { self.types.widen(ty) })
            .collect();
        if ctx.has_bare_return {
            returned.push(self.types.undefined);
        }
        self.types.union(returned)
    }
}

/// Whether control never reaches the statement after `stmt`.
fn always_exits(stmt: &Statement<'_>) -> bool {
    match stmt {
        Statement::ReturnStatement(_) => true,
        Statement::Block(block) => block.statements.iter().any(always_exits),
        Statement::IfStatement(n) => {
            always_exits(n.then_statement) && n.else_statement.is_some_and(always_exits)
        }
        _ => false,
    }
}

impl std::fmt::Debug for Checker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checker")
            .field("types", &self.types)
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}
