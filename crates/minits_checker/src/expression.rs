//! Expression checking and guard recognition.

use crate::checker::Checker;
use crate::narrowing::{self, Guard, TypeofTag};
use crate::scope::{ScopeExit, ScopeKind};
use crate::structural;
use crate::types::{
    LiteralValue, ObjectShape, ParamInfo, PrimitiveKind, PropertyInfo, Signature, TypeId,
    TypeKind,
};
use minits_ast::node::*;
use minits_core::intern::Atom;
use minits_core::text::TextSpan;
use minits_diagnostics::{messages, Diagnostic};

impl<'a> Checker<'a> {
    pub(crate) fn check_expression(&mut self, expr: &'a Expression<'a>) -> TypeId {
        self.check_expression_with_context(expr, None)
    }

    /// Compute the type of `expr`. `context` is the type the surrounding
    /// code expects, used to type callback parameters, keep literals and
    /// form tuples.
    pub(crate) fn check_expression_with_context(
        &mut self,
        expr: &'a Expression<'a>,
        context: Option<TypeId>,
    ) -> TypeId {
        let ty = match expr {
            Expression::Identifier(id) => self.check_identifier(id),
            Expression::Literal(n) => self.literal_type(n.value),
            Expression::NullKeyword(_) => self.types.null,
            Expression::Template(n) => {
                for substitution in n.substitutions {
                    self.check_expression(substitution);
                }
                self.types.string
            }
            Expression::ObjectLiteral(n) => self.check_object_literal(n, context),
            Expression::ArrayLiteral(n) => self.check_array_literal(n, context),
            Expression::PropertyAccess(n) => self.check_property_access(n),
            Expression::ElementAccess(n) => self.check_element_access(n),
            Expression::Call(n) => self.check_call(n),
            Expression::New(n) => self.check_new(n),
            Expression::PrefixUnary(n) => self.check_prefix_unary(n),
            Expression::Binary(n) => self.check_binary(n, context),
            Expression::Conditional(n) => self.check_conditional(n, context),
            Expression::ArrowFunction(n) => {
                self.check_function_like(n.parameters, n.return_type, n.body, context)
            }
            Expression::FunctionExpression(n) => self.check_function_like(
                n.parameters,
                n.return_type,
                ArrowBody::Block(n.body),
                context,
            ),
            Expression::Parenthesized(n) => self.check_expression_with_context(n.expression, context),
            Expression::Spread(n) => self.check_expression(n.expression),
        };
        self.record_type(expr.span(), ty);
        ty
    }

    fn check_identifier(&mut self, id: &Identifier) -> TypeId {
        if let Some(binding) = self.env.lookup(id.name) {
            return self.env.current_type(binding);
        }
        if self.types.interner().resolve(id.name) == "undefined" {
            return self.types.undefined;
        }
        let name = self.name_text(id.name);
        self.error(id.data.span, &messages::CANNOT_FIND_NAME_0, &[&name]);
        self.types.unknown
    }

    fn literal_type(&mut self, literal: Literal<'_>) -> TypeId {
        match literal {
            Literal::String(value) => self.types.string_literal(value),
            Literal::Number(value) => self.types.number_literal(value),
            Literal::Boolean(value) => self.types.boolean_literal(value),
        }
    }

    // ========================================================================
    // Object and array literals
    // ========================================================================

    fn check_object_literal(
        &mut self,
        node: &'a ObjectLiteralExpression<'a>,
        context: Option<TypeId>,
    ) -> TypeId {
        let mut shape = ObjectShape::default();
        for element in node.properties {
            let name = element.name();
            let expected = self.contextual_property_type(context, name.name);
            let ty = match element {
                ObjectLiteralElement::Property(p) => {
                    self.check_expression_with_context(p.initializer, expected)
                }
                ObjectLiteralElement::Shorthand(id) => {
                    let ty = self.check_identifier(id);
                    self.record_type(id.data.span, ty);
                    ty
                }
                ObjectLiteralElement::Method(m) => self.check_function_like(
                    m.parameters,
                    m.return_type,
                    ArrowBody::Block(m.body),
                    expected,
                ),
            };
            let ty = if expected.is_some_and(|t| self.types.contains_literal(t)) {
                ty
            } else {
                self.types.widen(ty)
            };
            // A later duplicate overwrites the earlier value.
            match shape.properties.iter_mut().find(|p| p.name == name.name) {
                Some(existing) => existing.ty = ty,
                None => shape.properties.push(PropertyInfo::new(name.name, ty)),
            }
        }
        self.types.object(shape)
    }

    /// The type the context expects for property `name` of an object
    /// literal: the union over the context's object constituents.
    fn contextual_property_type(&mut self, context: Option<TypeId>, name: Atom) -> Option<TypeId> {
        let context = context?;
        let mut expected = Vec::new();
        for member in self.types.constituents(context) {
            if let TypeKind::Object(shape) = self.types.kind(member) {
                if let Some(prop) = shape.property(name) {
                    expected.push(prop.ty);
                } else if let Some(index) = shape.string_index {
                    expected.push(index);
                }
            }
        }
        if expected.is_empty() {
            None
        } else {
            Some(self.types.union(expected))
        }
    }

    fn check_array_literal(
        &mut self,
        node: &'a ArrayLiteralExpression<'a>,
        context: Option<TypeId>,
    ) -> TypeId {
        let has_spread = node
            .elements
            .iter()
            .any(|e| matches!(e, Expression::Spread(_)));
        let constituents = context.map(|c| self.types.constituents(c)).unwrap_or_default();

        let tuple_context = constituents.iter().find_map(|&m| match self.types.kind(m) {
            TypeKind::Tuple(elements) => Some(elements.clone()),
            _ => None,
        });
        if let (Some(expected), false) = (tuple_context, has_spread) {
            let elements = node
                .elements
                .iter()
                .enumerate()
                .map(|(i, element)| {
                    self.check_expression_with_context(element, expected.get(i).copied())
                })
                .collect();
            return self.types.tuple(elements);
        }

        let element_context = constituents
            .iter()
            .find_map(|&m| self.types.element_type(m));
        let mut elements = Vec::with_capacity(node.elements.len());
        for element in node.elements {
            match element {
                Expression::Spread(spread) => {
                    let spread_ty = self.check_expression(spread.expression);
                    self.record_type(spread.data.span, spread_ty);
                    let inner = self.iterated_element_type(spread_ty);
                    elements.push(inner);
                }
                _ => elements.push(self.check_expression_with_context(element, element_context)),
            }
        }
        if elements.is_empty() {
            let element = element_context.unwrap_or(self.types.unknown);
            return self.types.array(element);
        }
        let element = self.types.union(elements);
        let element = if element_context.is_some_and(|t| self.types.contains_literal(t)) {
            element
        } else {
            self.types.widen(element)
        };
        self.types.array(element)
    }

    /// The type a `for...of` loop or spread yields for each element.
    pub(crate) fn iterated_element_type(&mut self, ty: TypeId) -> TypeId {
        let mut elements = Vec::new();
        for member in self.types.constituents(ty) {
            match self.types.kind(member) {
                TypeKind::Array(element) => elements.push(*element),
                TypeKind::Tuple(items) => elements.extend(items.iter().copied()),
                TypeKind::Primitive(PrimitiveKind::String)
                | TypeKind::Literal(LiteralValue::String(_)) => elements.push(self.types.string),
                _ => elements.push(self.types.unknown),
            }
        }
        self.types.union(elements)
    }

    // ========================================================================
    // Member access
    // ========================================================================

    fn check_property_access(&mut self, node: &'a PropertyAccessExpression<'a>) -> TypeId {
        let object = self.check_expression(node.expression);
        match self.lookup_member(node.expression, object, node.name, false) {
            Some(prop) => prop.ty,
            None => self.types.unknown,
        }
    }

    /// Look up `name` on the value of `object_expr`, reporting a possibly
    /// nullish receiver and a missing member.
    ///
    /// Reading an optional property yields its type with `undefined` added.
    pub(crate) fn lookup_member(
        &mut self,
        object_expr: &'a Expression<'a>,
        object: TypeId,
        name: Identifier,
        for_write: bool,
    ) -> Option<PropertyInfo> {
        let receiver = self.receiver_type(object_expr, object)?;
        self.member_of(receiver, name.name, name.data.span, for_write)
    }

    fn member_of(
        &mut self,
        receiver: TypeId,
        name: Atom,
        span: TextSpan,
        for_write: bool,
    ) -> Option<PropertyInfo> {
        match structural::property_of(&mut self.types, receiver, name) {
            Some(mut prop) => {
                if prop.optional && !for_write && self.options.strict_null_checks {
                    prop.ty = self.types.union([prop.ty, self.types.undefined]);
                }
                Some(prop)
            }
            None => {
                self.report_unknown_member(receiver, name, span);
                None
            }
        }
    }

    fn report_unknown_member(&mut self, receiver: TypeId, name: Atom, span: TextSpan) {
        let member = self.name_text(name);
        let owner = self.types.display(receiver);
        let mut diagnostic = Diagnostic::with_span(
            span,
            &messages::PROPERTY_0_DOES_NOT_EXIST_ON_TYPE_1,
            &[&member, &owner],
        );
        if self.types.is_union(receiver) {
            let missing = structural::constituents_missing(&mut self.types, receiver, name);
            if let Some(&first) = missing.first() {
                let constituent = self.types.display(first);
                diagnostic = diagnostic.with_related(Diagnostic::new(
                    &messages::PROPERTY_0_DOES_NOT_EXIST_ON_TYPE_1,
                    &[&member, &constituent],
                ));
            }
        }
        self.report(diagnostic);
    }

    /// The type of a value about to be dereferenced, without its nullish
    /// parts. Under strict null checks a possibly nullish value is reported;
    /// a value that is only nullish yields `None`.
    fn receiver_type(&mut self, expr: &'a Expression<'a>, ty: TypeId) -> Option<TypeId> {
        if !self.types.has_nullish(ty) {
            return Some(ty);
        }
        if self.options.strict_null_checks {
            let members = self.types.constituents(ty);
            let has_null = members.contains(&self.types.null);
            let has_undefined = members
                .iter()
                .any(|&m| m == self.types.undefined || m == self.types.void);
            let (named, anonymous) = match (has_null, has_undefined) {
                (true, true) => (
                    &messages::_0_IS_POSSIBLY_NULL_OR_UNDEFINED,
                    &messages::OBJECT_IS_POSSIBLY_NULL_OR_UNDEFINED,
                ),
                (true, false) => (
                    &messages::_0_IS_POSSIBLY_NULL,
                    &messages::OBJECT_IS_POSSIBLY_NULL,
                ),
                _ => (
                    &messages::_0_IS_POSSIBLY_UNDEFINED,
                    &messages::OBJECT_IS_POSSIBLY_UNDEFINED,
                ),
            };
            match self.expression_text(expr) {
                Some(text) => self.error(expr.span(), named, &[&text]),
                None => self.error(expr.span(), anonymous, &[]),
            }
        }
        let receiver = self.types.remove_nullish(ty);
        if receiver == self.types.never {
            None
        } else {
            Some(receiver)
        }
    }

    /// Source-like text of a name or a dotted member chain.
    fn expression_text(&self, expr: &Expression<'_>) -> Option<String> {
        match expr.skip_parentheses() {
            Expression::Identifier(id) => Some(self.name_text(id.name)),
            Expression::PropertyAccess(p) => {
                let object = self.expression_text(p.expression)?;
                Some(format!("{}.{}", object, self.name_text(p.name.name)))
            }
            _ => None,
        }
    }

    fn check_element_access(&mut self, node: &'a ElementAccessExpression<'a>) -> TypeId {
        let object = self.check_expression(node.expression);
        let index = self.check_expression(node.argument);
        let Some(receiver) = self.receiver_type(node.expression, object) else {
            return self.types.unknown;
        };
        self.indexed_type(receiver, index, node.argument.span())
    }

    fn indexed_type(&mut self, receiver: TypeId, index: TypeId, span: TextSpan) -> TypeId {
        if let Some(LiteralValue::String(key)) = self.types.literal_value(index) {
            return match self.member_of(receiver, key, span, false) {
                Some(prop) => prop.ty,
                None => self.types.unknown,
            };
        }
        match self.types.kind(receiver).clone() {
            TypeKind::Union(members) => {
                let types: Vec<TypeId> = members
                    .into_iter()
                    .map(|m| self.indexed_type(m, index, span))
                    .collect();
                self.types.union(types)
            }
            TypeKind::Tuple(elements) => match self.types.literal_value(index) {
                Some(LiteralValue::Number(position)) => {
                    let in_range = position >= 0.0
                        && position.fract() == 0.0
                        && (position as usize) < elements.len();
                    if in_range {
                        elements[position as usize]
                    } else {
                        let tuple = self.types.display(receiver);
                        let length = elements.len().to_string();
                        let at = self.types.display(index);
                        self.error(
                            span,
                            &messages::TUPLE_TYPE_0_OF_LENGTH_1_HAS_NO_ELEMENT_AT_INDEX_2,
                            &[&tuple, &length, &at],
                        );
                        self.types.unknown
                    }
                }
                _ => self.types.union(elements),
            },
            TypeKind::Array(element) => element,
            TypeKind::Object(shape) => shape.string_index.unwrap_or(self.types.unknown),
            TypeKind::Primitive(PrimitiveKind::String) | TypeKind::Literal(LiteralValue::String(_)) => {
                self.types.string
            }
            _ => self.types.unknown,
        }
    }

    // ========================================================================
    // Calls
    // ========================================================================

    fn check_call(&mut self, node: &'a CallExpression<'a>) -> TypeId {
        let callee = self.check_expression(node.expression);
        let signature = match self.receiver_type(node.expression, callee) {
            Some(callee) if self.types.is_unknown(callee) => None,
            Some(callee) => match self.call_signature(callee) {
                Some(signature) => Some(signature),
                None => {
                    let display = self.types.display(callee);
                    self.error(
                        node.expression.span(),
                        &messages::THIS_EXPRESSION_IS_NOT_CALLABLE,
                        &[&display],
                    );
                    None
                }
            },
            None => None,
        };
        self.check_arguments(node, signature)
    }

    /// `new callee(arguments)` goes through the construct signature.
    fn check_new(&mut self, node: &'a CallExpression<'a>) -> TypeId {
        let callee = self.check_expression(node.expression);
        let signature = if self.types.is_unknown(callee) {
            None
        } else {
            let signature = self.types.construct_signature_of(callee).cloned();
            if signature.is_none() {
                let display = self.types.display(callee);
                self.error(
                    node.expression.span(),
                    &messages::THIS_EXPRESSION_IS_NOT_CONSTRUCTABLE,
                    &[&display],
                );
            }
            signature
        };
        self.check_arguments(node, signature)
    }

    /// Check arguments against the signature and give the result type.
    /// Without a signature the arguments are still checked.
    fn check_arguments(
        &mut self,
        node: &'a CallExpression<'a>,
        signature: Option<Signature>,
    ) -> TypeId {
        let Some(signature) = signature else {
            for argument in node.arguments {
                self.check_expression(argument);
            }
            return self.types.unknown;
        };

        self.check_arity(node, &signature);
        for (i, argument) in node.arguments.iter().enumerate() {
            if let Expression::Spread(spread) = argument {
                let spread_ty = self.check_expression(argument);
                let element = self.iterated_element_type(spread_ty);
                if let Some(target) = signature.param_type_at(&self.types, i) {
                    self.check_assignable(spread.data.span, element, target, true);
                }
                continue;
            }
            let Some(param) = signature.param_at(i).copied() else {
                self.check_expression(argument);
                continue;
            };
            let target = signature
                .param_type_at(&self.types, i)
                .unwrap_or(self.types.unknown);
            let mut ty = self.check_expression_with_context(argument, Some(target));
            // An optional parameter also takes `undefined`.
            if param.optional {
                let undefined = self.types.undefined;
                ty = self.types.filter(ty, |_, m| m != undefined);
            }
            self.check_assignable_expression(argument, ty, target, true);
        }
        signature.return_type
    }

    /// The signature a call through `callee` uses.
    ///
    /// A union is callable when every member is. Its parameters are the
    /// intersections of the members' parameters at each position, optional
    /// where any member leaves them out; it returns the union of returns.
    fn call_signature(&mut self, callee: TypeId) -> Option<Signature> {
        let members = self.types.constituents(callee);
        let mut signatures = Vec::with_capacity(members.len());
        for member in members {
            signatures.push(self.types.signature_of(member)?.clone());
        }
        if let [single] = signatures.as_slice() {
            return Some(single.clone());
        }

        let count = signatures.iter().map(|s| s.params.len()).max()?;
        let mut params: Vec<ParamInfo> = Vec::with_capacity(count);
        for i in 0..count {
            let mut merged: Option<ParamInfo> = None;
            let mut missing = false;
            for signature in &signatures {
                let Some(param) = signature.params.get(i) else {
                    missing = true;
                    continue;
                };
                merged = Some(match merged {
                    Some(acc) => ParamInfo {
                        ty: self.types.intersection(acc.ty, param.ty),
                        optional: acc.optional && param.optional,
                        rest: acc.rest && param.rest,
                        ..acc
                    },
                    None => *param,
                });
            }
            if let Some(mut param) = merged {
                param.optional = (param.optional || missing) && !param.rest;
                params.push(param);
            }
        }
        let returns: Vec<TypeId> = signatures.iter().map(|s| s.return_type).collect();
        let return_type = self.types.union(returns);
        Some(Signature {
            params,
            return_type,
        })
    }

    fn check_arity(&mut self, node: &'a CallExpression<'a>, signature: &Signature) {
        // Spread arguments have no static count.
        if node
            .arguments
            .iter()
            .any(|a| matches!(a, Expression::Spread(_)))
        {
            return;
        }
        let count = node.arguments.len();
        let min = signature.min_arity();
        let max = signature.max_arity();
        if count >= min && max.map_or(true, |max| count <= max) {
            return;
        }
        let got = count.to_string();
        let expected = min.to_string();
        match max {
            None => self.error(
                node.data.span,
                &messages::EXPECTED_AT_LEAST_0_ARGUMENTS_BUT_GOT_1,
                &[&expected, &got],
            ),
            Some(max) if max == min => self.error(
                node.data.span,
                &messages::EXPECTED_0_ARGUMENTS_BUT_GOT_1,
                &[&expected, &got],
            ),
            Some(max) => {
                let upper = max.to_string();
                self.error(
                    node.data.span,
                    &messages::EXPECTED_0_1_ARGUMENTS_BUT_GOT_2,
                    &[&expected, &upper, &got],
                )
            }
        }
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn check_prefix_unary(&mut self, node: &'a PrefixUnaryExpression<'a>) -> TypeId {
        match node.operator {
            PrefixOperator::TypeOf => {
                self.check_expression(node.operand);
                self.types.string
            }
            PrefixOperator::Not => {
                self.check_expression(node.operand);
                self.types.boolean
            }
            PrefixOperator::Minus => {
                let operand = self.check_expression(node.operand);
                match self.types.literal_value(operand) {
                    Some(LiteralValue::Number(value)) => self.types.number_literal(-value),
                    _ => self.types.number,
                }
            }
            PrefixOperator::Plus => {
                self.check_expression(node.operand);
                self.types.number
            }
        }
    }

    fn check_binary(&mut self, node: &'a BinaryExpression<'a>, context: Option<TypeId>) -> TypeId {
        match node.operator {
            op if op.is_assignment() => self.check_assignment(node),
            BinaryOperator::AmpersandAmpersand | BinaryOperator::BarBar => {
                self.check_logical(node, context)
            }
            BinaryOperator::Plus => {
                let left = self.check_expression(node.left);
                let right = self.check_expression(node.right);
                self.plus_result(left, right)
            }
            BinaryOperator::Minus
            | BinaryOperator::Asterisk
            | BinaryOperator::Slash
            | BinaryOperator::Percent => {
                self.check_expression(node.left);
                self.check_expression(node.right);
                self.types.number
            }
            _ => {
                self.check_expression(node.left);
                self.check_expression(node.right);
                self.types.boolean
            }
        }
    }

    fn plus_result(&self, left: TypeId, right: TypeId) -> TypeId {
        if self.is_family(left, PrimitiveKind::String) || self.is_family(right, PrimitiveKind::String) {
            self.types.string
        } else if self.is_family(left, PrimitiveKind::Number) && self.is_family(right, PrimitiveKind::Number) {
            self.types.number
        } else {
            self.types.unknown
        }
    }

    /// Whether every constituent is the primitive `family` or one of its
    /// literals.
    fn is_family(&self, ty: TypeId, family: PrimitiveKind) -> bool {
        self.types
            .constituents(ty)
            .into_iter()
            .all(|m| match self.types.kind(m) {
                TypeKind::Primitive(p) => *p == family,
                TypeKind::Literal(value) => value.primitive() == family,
                _ => false,
            })
    }

    /// `a && b` is the falsy part of `a` or `b`; `a || b` is the truthy
    /// part of `a` or `b`. The right operand is checked under the left
    /// operand's guard.
    fn check_logical(&mut self, node: &'a BinaryExpression<'a>, context: Option<TypeId>) -> TypeId {
        let is_and = node.operator == BinaryOperator::AmpersandAmpersand;
        let left = self.check_expression_with_context(node.left, context);
        let guard = self.guard_of(node.left);

        self.enter_scope(ScopeKind::Branch);
        self.apply_guard(&guard, is_and);
        let right = self.check_expression_with_context(node.right, context);
        let exit = self.leave_scope();
        // The right operand may not run at all.
        self.join_branches(Some(exit), Some(ScopeExit::default()));

        let left_part = narrowing::narrow_by_truthiness(&mut self.types, left, !is_and);
        self.types.union([left_part, right])
    }

    fn check_conditional(
        &mut self,
        node: &'a ConditionalExpression<'a>,
        context: Option<TypeId>,
    ) -> TypeId {
        self.check_expression(node.condition);
        let guard = self.guard_of(node.condition);

        self.enter_scope(ScopeKind::Branch);
        self.apply_guard(&guard, true);
        let when_true = self.check_expression_with_context(node.when_true, context);
        let true_exit = self.leave_scope();

        self.enter_scope(ScopeKind::Branch);
        self.apply_guard(&guard, false);
        let when_false = self.check_expression_with_context(node.when_false, context);
        let false_exit = self.leave_scope();
        self.join_branches(Some(true_exit), Some(false_exit));

        self.types.union([when_true, when_false])
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    fn check_assignment(&mut self, node: &'a BinaryExpression<'a>) -> TypeId {
        match node.left.skip_parentheses() {
            Expression::Identifier(id) => self.check_name_assignment(node, id),
            Expression::PropertyAccess(access) => {
                let object = self.check_expression(access.expression);
                let Some(prop) = self.lookup_member(access.expression, object, access.name, true)
                else {
                    return self.check_expression(node.right);
                };
                self.record_type(access.data.span, prop.ty);
                if prop.readonly {
                    let name = self.name_text(access.name.name);
                    self.error(
                        access.name.data.span,
                        &messages::CANNOT_ASSIGN_TO_0_BECAUSE_IT_IS_A_READ_ONLY_PROPERTY,
                        &[&name],
                    );
                    return self.check_expression(node.right);
                }
                let (value, _) = self.check_assigned_value(node, prop.ty, prop.ty);
                value
            }
            Expression::ElementAccess(access) => {
                let target = self.check_element_access(access);
                self.record_type(access.data.span, target);
                let (value, _) = self.check_assigned_value(node, target, target);
                value
            }
            _ => {
                self.check_expression(node.left);
                self.check_expression(node.right)
            }
        }
    }

    fn check_name_assignment(&mut self, node: &'a BinaryExpression<'a>, id: &Identifier) -> TypeId {
        let Some(binding) = self.env.lookup(id.name) else {
            let name = self.name_text(id.name);
            self.error(id.data.span, &messages::CANNOT_FIND_NAME_0, &[&name]);
            return self.check_expression(node.right);
        };
        let current = self.env.current_type(binding);
        let declared = self.env.binding(binding).declared;
        self.record_type(id.data.span, current);

        if self.env.binding(binding).is_const {
            let name = self.name_text(id.name);
            self.error(
                id.data.span,
                &messages::CANNOT_ASSIGN_TO_0_BECAUSE_IT_IS_A_CONSTANT,
                &[&name],
            );
            return self.check_expression(node.right);
        }

        let (value, ok) = self.check_assigned_value(node, current, declared);
        if ok {
            self.refine_by_assignment(binding, declared, value);
        }
        value
    }

    /// Check the right side of `=`, `+=` or `-=` against `declared`.
    /// `current` is the target's type before the assignment. Returns the
    /// resulting value type and whether it was assignable.
    fn check_assigned_value(
        &mut self,
        node: &'a BinaryExpression<'a>,
        current: TypeId,
        declared: TypeId,
    ) -> (TypeId, bool) {
        match node.operator {
            BinaryOperator::PlusAssign => {
                let right = self.check_expression(node.right);
                let value = self.plus_result(current, right);
                let ok = self.check_assignable(node.data.span, value, declared, false);
                (value, ok)
            }
            BinaryOperator::MinusAssign => {
                self.check_expression(node.right);
                let value = self.types.number;
                let ok = self.check_assignable(node.data.span, value, declared, false);
                (value, ok)
            }
            _ => {
                let value = self.check_expression_with_context(node.right, Some(declared));
                let ok = self.check_assignable_expression(node.right, value, declared, false);
                (value, ok)
            }
        }
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Arrow functions, function expressions and object literal methods.
    /// Unannotated parameters take their types from a callable constituent
    /// of `context`.
    fn check_function_like(
        &mut self,
        parameters: &'a [ParameterDeclaration<'a>],
        return_type: Option<&'a TypeNode<'a>>,
        body: ArrowBody<'a>,
        context: Option<TypeId>,
    ) -> TypeId {
        let contextual = context.and_then(|c| {
            self.types
                .constituents(c)
                .into_iter()
                .find_map(|m| self.types.signature_of(m).cloned())
        });
        let signature = self.build_signature(parameters, return_type, contextual.as_ref());
        let annotated = return_type.map(|_| signature.return_type);
        let contextual_return = contextual.as_ref().map(|s| s.return_type);
        let returned =
            self.check_function_body(parameters, &signature, body, annotated, contextual_return);
        self.types.function(Signature {
            params: signature.params,
            return_type: returned,
        })
    }

    // ========================================================================
    // Guards
    // ========================================================================

    /// Recognise the narrowing a condition implies. Conditions the engine
    /// does not understand become [`Guard::Opaque`].
    pub(crate) fn guard_of(&mut self, expr: &'a Expression<'a>) -> Guard {
        match expr.skip_parentheses() {
            Expression::Identifier(id) => Guard::Truthy { binding: id.name },
            Expression::PrefixUnary(p) if p.operator == PrefixOperator::Not => {
                self.guard_of(p.operand).negate()
            }
            Expression::Binary(b) => match b.operator {
                BinaryOperator::AmpersandAmpersand => Guard::And(
                    Box::new(self.guard_of(b.left)),
                    Box::new(self.guard_of(b.right)),
                ),
                BinaryOperator::BarBar => Guard::Or(
                    Box::new(self.guard_of(b.left)),
                    Box::new(self.guard_of(b.right)),
                ),
                op if op.is_equality() => {
                    let loose = matches!(op, BinaryOperator::Equals | BinaryOperator::NotEquals);
                    let guard = match self.equality_guard(b.left, b.right, loose) {
                        Some(guard) => guard,
                        None => self
                            .equality_guard(b.right, b.left, loose)
                            .unwrap_or(Guard::Opaque),
                    };
                    if op.is_negated_equality() {
                        guard.negate()
                    } else {
                        guard
                    }
                }
                _ => Guard::Opaque,
            },
            _ => Guard::Opaque,
        }
    }

    /// `subject === value` with `subject` a name or `typeof name`.
    fn equality_guard(
        &mut self,
        subject: &'a Expression<'a>,
        value: &'a Expression<'a>,
        loose: bool,
    ) -> Option<Guard> {
        match subject.skip_parentheses() {
            Expression::PrefixUnary(p) if p.operator == PrefixOperator::TypeOf => {
                let Expression::Identifier(id) = p.operand.skip_parentheses() else {
                    return None;
                };
                let Expression::Literal(LiteralExpression {
                    value: Literal::String(tag),
                    ..
                }) = value.skip_parentheses()
                else {
                    return None;
                };
                let tag = TypeofTag::parse(tag)?;
                Some(Guard::Typeof {
                    binding: id.name,
                    tag,
                })
            }
            Expression::Identifier(id) => {
                let value = self.constant_value(value)?;
                Some(Guard::Equality {
                    binding: id.name,
                    value,
                    loose,
                })
            }
            _ => None,
        }
    }

    /// The unit type of a literal, `null`, `undefined` or negated number.
    fn constant_value(&mut self, expr: &'a Expression<'a>) -> Option<TypeId> {
        match expr.skip_parentheses() {
            Expression::Literal(n) => Some(self.literal_type(n.value)),
            Expression::NullKeyword(_) => Some(self.types.null),
            Expression::Identifier(id)
                if self.env.lookup(id.name).is_none()
                    && self.types.interner().resolve(id.name) == "undefined" =>
            {
                Some(self.types.undefined)
            }
            Expression::PrefixUnary(PrefixUnaryExpression {
                operator: PrefixOperator::Minus,
                operand,
                ..
            }) => match operand.skip_parentheses() {
                Expression::Literal(LiteralExpression {
                    value: Literal::Number(n),
                    ..
                }) => Some(self.types.number_literal(-n)),
                _ => None,
            },
            _ => None,
        }
    }

    // ========================================================================
    // Excess properties
    // ========================================================================

    /// Report the first property of a fresh object literal that no object
    /// constituent of `target` declares, descending into nested literals.
    /// Returns whether one was reported.
    pub(crate) fn check_excess_properties(&mut self, expr: &'a Expression<'a>, target: TypeId) -> bool {
        match expr.skip_parentheses() {
            Expression::ObjectLiteral(literal) => self.check_object_excess(literal, target),
            Expression::Conditional(c) => {
                let when_true = self.check_excess_properties(c.when_true, target);
                let when_false = self.check_excess_properties(c.when_false, target);
                when_true || when_false
            }
            _ => false,
        }
    }

    fn check_object_excess(&mut self, literal: &'a ObjectLiteralExpression<'a>, target: TypeId) -> bool {
        let shapes: Vec<ObjectShape> = self
            .types
            .constituents(target)
            .into_iter()
            .filter_map(|m| match self.types.kind(m) {
                TypeKind::Object(shape) => Some(shape.clone()),
                _ => None,
            })
            .collect();
        if shapes.is_empty() || shapes.iter().any(|s| s.string_index.is_some()) {
            return false;
        }

        for element in literal.properties {
            let name = element.name();
            let declared: Vec<TypeId> = shapes
                .iter()
                .filter_map(|s| s.property(name.name).map(|p| p.ty))
                .collect();
            if declared.is_empty() {
                let property = self.name_text(name.name);
                let display = self.types.display(target);
                self.error(
                    name.data.span,
                    &messages::OBJECT_LITERAL_MAY_ONLY_SPECIFY_KNOWN_PROPERTIES,
                    &[&property, &display],
                );
                return true;
            }
            if let ObjectLiteralElement::Property(p) = element {
                let nested = self.types.union(declared);
                if self.check_excess_properties(p.initializer, nested) {
                    return true;
                }
            }
        }
        false
    }
}
