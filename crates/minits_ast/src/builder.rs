//! Programmatic construction of syntax trees.
//!
//! There is no parser in this workspace; front ends and tests build trees
//! through [`AstBuilder`]. Each node gets a fresh one-byte span from a
//! running cursor, so every node in a tree has a distinct position and
//! diagnostics can be matched back to the node that produced them.

use crate::node::*;
use crate::types::NodeFlags;
use bumpalo::Bump;
use minits_core::intern::Interner;
use minits_core::text::TextSpan;
use std::cell::Cell;

pub struct AstBuilder<'a> {
    arena: &'a Bump,
    interner: Interner,
    cursor: Cell<u32>,
}

impl<'a> AstBuilder<'a> {
    pub fn new(arena: &'a Bump, interner: Interner) -> Self {
        Self {
            arena,
            interner,
            cursor: Cell::new(0),
        }
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn arena(&self) -> &'a Bump {
        self.arena
    }

    /// Position the next node will receive.
    pub fn position(&self) -> u32 {
        self.cursor.get()
    }

    fn next_span(&self) -> TextSpan {
        let pos = self.cursor.get();
        self.cursor.set(pos + 1);
        TextSpan::new(pos, 1)
    }

    fn data(&self) -> NodeData {
        NodeData::new(self.next_span())
    }

    fn data_with(&self, flags: NodeFlags) -> NodeData {
        NodeData::with_flags(self.next_span(), flags)
    }

    #[inline]
    fn alloc<T>(&self, value: T) -> &'a T {
        self.arena.alloc(value)
    }

    #[inline]
    fn list<T: Copy>(&self, items: &[T]) -> &'a [T] {
        self.arena.alloc_slice_copy(items)
    }

    fn alloc_opt<T>(&self, value: Option<T>) -> Option<&'a T> {
        value.map(|v| self.alloc(v))
    }

    // ========================================================================
    // Names and literals
    // ========================================================================

    pub fn id(&self, name: &str) -> Identifier {
        Identifier {
            data: self.data(),
            name: self.interner.intern(name),
        }
    }

    pub fn ident(&self, name: &str) -> Expression<'a> {
        Expression::Identifier(self.id(name))
    }

    pub fn string(&self, value: &str) -> Expression<'a> {
        Expression::Literal(LiteralExpression {
            data: self.data(),
            value: Literal::String(self.arena.alloc_str(value)),
        })
    }

    pub fn number(&self, value: f64) -> Expression<'a> {
        Expression::Literal(LiteralExpression {
            data: self.data(),
            value: Literal::Number(value),
        })
    }

    pub fn boolean(&self, value: bool) -> Expression<'a> {
        Expression::Literal(LiteralExpression {
            data: self.data(),
            value: Literal::Boolean(value),
        })
    }

    pub fn null(&self) -> Expression<'a> {
        Expression::NullKeyword(self.data())
    }

    /// `undefined` is an identifier resolved through the global scope.
    pub fn undefined(&self) -> Expression<'a> {
        self.ident("undefined")
    }

    pub fn template(&self, substitutions: &[Expression<'a>]) -> Expression<'a> {
        Expression::Template(TemplateExpression {
            data: self.data(),
            substitutions: self.list(substitutions),
        })
    }

    // ========================================================================
    // Compound expressions
    // ========================================================================

    /// Object literal from `name: value` pairs.
    pub fn object(&self, properties: &[(&str, Expression<'a>)]) -> Expression<'a> {
        let elements: Vec<ObjectLiteralElement<'a>> = properties
            .iter()
            .map(|(name, value)| self.prop(name, *value))
            .collect();
        self.object_with(&elements)
    }

    pub fn object_with(&self, elements: &[ObjectLiteralElement<'a>]) -> Expression<'a> {
        Expression::ObjectLiteral(ObjectLiteralExpression {
            data: self.data(),
            properties: self.list(elements),
        })
    }

    pub fn prop(&self, name: &str, initializer: Expression<'a>) -> ObjectLiteralElement<'a> {
        ObjectLiteralElement::Property(PropertyAssignment {
            data: self.data(),
            name: self.id(name),
            initializer: self.alloc(initializer),
        })
    }

    pub fn shorthand(&self, name: &str) -> ObjectLiteralElement<'a> {
        ObjectLiteralElement::Shorthand(self.id(name))
    }

    pub fn method(
        &self,
        name: &str,
        parameters: &[ParameterDeclaration<'a>],
        return_type: Option<TypeNode<'a>>,
        body: Block<'a>,
    ) -> ObjectLiteralElement<'a> {
        ObjectLiteralElement::Method(MethodDeclaration {
            data: self.data(),
            name: self.id(name),
            parameters: self.list(parameters),
            return_type: self.alloc_opt(return_type),
            body: self.alloc(body),
        })
    }

    pub fn array(&self, elements: &[Expression<'a>]) -> Expression<'a> {
        Expression::ArrayLiteral(ArrayLiteralExpression {
            data: self.data(),
            elements: self.list(elements),
        })
    }

    pub fn spread(&self, expression: Expression<'a>) -> Expression<'a> {
        Expression::Spread(SpreadElement {
            data: self.data(),
            expression: self.alloc(expression),
        })
    }

    /// `object.name`
    pub fn member(&self, object: Expression<'a>, name: &str) -> Expression<'a> {
        Expression::PropertyAccess(PropertyAccessExpression {
            data: self.data(),
            expression: self.alloc(object),
            name: self.id(name),
        })
    }

    /// `object[argument]`
    pub fn index(&self, object: Expression<'a>, argument: Expression<'a>) -> Expression<'a> {
        Expression::ElementAccess(ElementAccessExpression {
            data: self.data(),
            expression: self.alloc(object),
            argument: self.alloc(argument),
        })
    }

    pub fn call(&self, callee: Expression<'a>, arguments: &[Expression<'a>]) -> Expression<'a> {
        Expression::Call(CallExpression {
            data: self.data(),
            expression: self.alloc(callee),
            arguments: self.list(arguments),
        })
    }

    pub fn new_(&self, callee: Expression<'a>, arguments: &[Expression<'a>]) -> Expression<'a> {
        Expression::New(CallExpression {
            data: self.data(),
            expression: self.alloc(callee),
            arguments: self.list(arguments),
        })
    }

    fn prefix(&self, operator: PrefixOperator, operand: Expression<'a>) -> Expression<'a> {
        Expression::PrefixUnary(PrefixUnaryExpression {
            data: self.data(),
            operator,
            operand: self.alloc(operand),
        })
    }

    pub fn typeof_(&self, operand: Expression<'a>) -> Expression<'a> {
        self.prefix(PrefixOperator::TypeOf, operand)
    }

    pub fn not(&self, operand: Expression<'a>) -> Expression<'a> {
        self.prefix(PrefixOperator::Not, operand)
    }

    pub fn neg(&self, operand: Expression<'a>) -> Expression<'a> {
        self.prefix(PrefixOperator::Minus, operand)
    }

    pub fn binary(
        &self,
        left: Expression<'a>,
        operator: BinaryOperator,
        right: Expression<'a>,
    ) -> Expression<'a> {
        Expression::Binary(BinaryExpression {
            data: self.data(),
            left: self.alloc(left),
            operator,
            right: self.alloc(right),
        })
    }

    pub fn strict_eq(&self, left: Expression<'a>, right: Expression<'a>) -> Expression<'a> {
        self.binary(left, BinaryOperator::StrictEquals, right)
    }

    pub fn strict_ne(&self, left: Expression<'a>, right: Expression<'a>) -> Expression<'a> {
        self.binary(left, BinaryOperator::StrictNotEquals, right)
    }

    pub fn loose_eq(&self, left: Expression<'a>, right: Expression<'a>) -> Expression<'a> {
        self.binary(left, BinaryOperator::Equals, right)
    }

    pub fn loose_ne(&self, left: Expression<'a>, right: Expression<'a>) -> Expression<'a> {
        self.binary(left, BinaryOperator::NotEquals, right)
    }

    pub fn and(&self, left: Expression<'a>, right: Expression<'a>) -> Expression<'a> {
        self.binary(left, BinaryOperator::AmpersandAmpersand, right)
    }

    pub fn or(&self, left: Expression<'a>, right: Expression<'a>) -> Expression<'a> {
        self.binary(left, BinaryOperator::BarBar, right)
    }

    pub fn assign(&self, target: Expression<'a>, value: Expression<'a>) -> Expression<'a> {
        self.binary(target, BinaryOperator::Assign, value)
    }

    pub fn conditional(
        &self,
        condition: Expression<'a>,
        when_true: Expression<'a>,
        when_false: Expression<'a>,
    ) -> Expression<'a> {
        Expression::Conditional(ConditionalExpression {
            data: self.data(),
            condition: self.alloc(condition),
            when_true: self.alloc(when_true),
            when_false: self.alloc(when_false),
        })
    }

    pub fn paren(&self, expression: Expression<'a>) -> Expression<'a> {
        Expression::Parenthesized(ParenthesizedExpression {
            data: self.data(),
            expression: self.alloc(expression),
        })
    }

    /// `(params): R => expression`
    pub fn arrow(
        &self,
        parameters: &[ParameterDeclaration<'a>],
        return_type: Option<TypeNode<'a>>,
        body: Expression<'a>,
    ) -> Expression<'a> {
        Expression::ArrowFunction(ArrowFunction {
            data: self.data(),
            parameters: self.list(parameters),
            return_type: self.alloc_opt(return_type),
            body: ArrowBody::Expression(self.alloc(body)),
        })
    }

    /// `(params): R => { ... }`
    pub fn arrow_block(
        &self,
        parameters: &[ParameterDeclaration<'a>],
        return_type: Option<TypeNode<'a>>,
        body: Block<'a>,
    ) -> Expression<'a> {
        Expression::ArrowFunction(ArrowFunction {
            data: self.data(),
            parameters: self.list(parameters),
            return_type: self.alloc_opt(return_type),
            body: ArrowBody::Block(self.alloc(body)),
        })
    }

    pub fn function_expr(
        &self,
        parameters: &[ParameterDeclaration<'a>],
        return_type: Option<TypeNode<'a>>,
        body: Block<'a>,
    ) -> Expression<'a> {
        Expression::FunctionExpression(FunctionExpression {
            data: self.data(),
            parameters: self.list(parameters),
            return_type: self.alloc_opt(return_type),
            body: self.alloc(body),
        })
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    fn parameter(
        &self,
        name: &str,
        flags: NodeFlags,
        type_annotation: Option<TypeNode<'a>>,
        initializer: Option<Expression<'a>>,
    ) -> ParameterDeclaration<'a> {
        ParameterDeclaration {
            data: self.data_with(flags),
            name: self.id(name),
            type_annotation: self.alloc_opt(type_annotation),
            initializer: self.alloc_opt(initializer),
        }
    }

    pub fn param(&self, name: &str, ty: Option<TypeNode<'a>>) -> ParameterDeclaration<'a> {
        self.parameter(name, NodeFlags::NONE, ty, None)
    }

    /// `name?: T`
    pub fn optional_param(
        &self,
        name: &str,
        ty: Option<TypeNode<'a>>,
    ) -> ParameterDeclaration<'a> {
        self.parameter(name, NodeFlags::OPTIONAL, ty, None)
    }

    /// `name: T = initializer`
    pub fn default_param(
        &self,
        name: &str,
        ty: Option<TypeNode<'a>>,
        initializer: Expression<'a>,
    ) -> ParameterDeclaration<'a> {
        self.parameter(name, NodeFlags::NONE, ty, Some(initializer))
    }

    /// `...name: T`
    pub fn rest_param(&self, name: &str, ty: Option<TypeNode<'a>>) -> ParameterDeclaration<'a> {
        self.parameter(name, NodeFlags::REST, ty, None)
    }

    // ========================================================================
    // Type nodes
    // ========================================================================

    pub fn keyword(&self, keyword: TypeKeyword) -> TypeNode<'a> {
        TypeNode::Keyword(KeywordTypeNode {
            data: self.data(),
            keyword,
        })
    }

    pub fn any_type(&self) -> TypeNode<'a> {
        self.keyword(TypeKeyword::Any)
    }

    pub fn string_type(&self) -> TypeNode<'a> {
        self.keyword(TypeKeyword::String)
    }

    pub fn number_type(&self) -> TypeNode<'a> {
        self.keyword(TypeKeyword::Number)
    }

    pub fn boolean_type(&self) -> TypeNode<'a> {
        self.keyword(TypeKeyword::Boolean)
    }

    pub fn null_type(&self) -> TypeNode<'a> {
        self.keyword(TypeKeyword::Null)
    }

    pub fn undefined_type(&self) -> TypeNode<'a> {
        self.keyword(TypeKeyword::Undefined)
    }

    pub fn void_type(&self) -> TypeNode<'a> {
        self.keyword(TypeKeyword::Void)
    }

    pub fn never_type(&self) -> TypeNode<'a> {
        self.keyword(TypeKeyword::Never)
    }

    /// A reference to a named alias or interface.
    pub fn type_ref(&self, name: &str) -> TypeNode<'a> {
        self.generic_ref(name, &[])
    }

    /// `Name<Args>`; only `Array<T>` gives arguments meaning.
    pub fn generic_ref(&self, name: &str, type_arguments: &[TypeNode<'a>]) -> TypeNode<'a> {
        TypeNode::Reference(TypeReferenceNode {
            data: self.data(),
            type_name: self.id(name),
            type_arguments: self.list(type_arguments),
        })
    }

    fn literal_type(&self, literal: Literal<'a>) -> TypeNode<'a> {
        TypeNode::Literal(LiteralTypeNode {
            data: self.data(),
            literal,
        })
    }

    pub fn string_literal_type(&self, value: &str) -> TypeNode<'a> {
        self.literal_type(Literal::String(self.arena.alloc_str(value)))
    }

    pub fn number_literal_type(&self, value: f64) -> TypeNode<'a> {
        self.literal_type(Literal::Number(value))
    }

    pub fn boolean_literal_type(&self, value: bool) -> TypeNode<'a> {
        self.literal_type(Literal::Boolean(value))
    }

    pub fn union_type(&self, types: &[TypeNode<'a>]) -> TypeNode<'a> {
        TypeNode::Union(UnionTypeNode {
            data: self.data(),
            types: self.list(types),
        })
    }

    pub fn intersection_type(&self, types: &[TypeNode<'a>]) -> TypeNode<'a> {
        TypeNode::Intersection(IntersectionTypeNode {
            data: self.data(),
            types: self.list(types),
        })
    }

    /// `T[]`
    pub fn array_type(&self, element_type: TypeNode<'a>) -> TypeNode<'a> {
        TypeNode::Array(ArrayTypeNode {
            data: self.data(),
            element_type: self.alloc(element_type),
        })
    }

    pub fn tuple_type(&self, elements: &[TypeNode<'a>]) -> TypeNode<'a> {
        TypeNode::Tuple(TupleTypeNode {
            data: self.data(),
            elements: self.list(elements),
        })
    }

    /// `(params) => R`
    pub fn function_type(
        &self,
        parameters: &[ParameterDeclaration<'a>],
        return_type: TypeNode<'a>,
    ) -> TypeNode<'a> {
        TypeNode::Function(FunctionTypeNode {
            data: self.data(),
            parameters: self.list(parameters),
            return_type: self.alloc(return_type),
        })
    }

    pub fn type_literal(&self, members: &[TypeElement<'a>]) -> TypeNode<'a> {
        TypeNode::TypeLiteral(TypeLiteralNode {
            data: self.data(),
            members: self.list(members),
        })
    }

    pub fn paren_type(&self, type_node: TypeNode<'a>) -> TypeNode<'a> {
        TypeNode::Parenthesized(ParenthesizedTypeNode {
            data: self.data(),
            type_node: self.alloc(type_node),
        })
    }

    // ========================================================================
    // Type members
    // ========================================================================

    fn property_signature(
        &self,
        name: &str,
        flags: NodeFlags,
        ty: TypeNode<'a>,
    ) -> TypeElement<'a> {
        TypeElement::Property(PropertySignature {
            data: self.data_with(flags),
            name: self.id(name),
            type_annotation: Some(self.alloc(ty)),
        })
    }

    pub fn prop_sig(&self, name: &str, ty: TypeNode<'a>) -> TypeElement<'a> {
        self.property_signature(name, NodeFlags::NONE, ty)
    }

    /// `name?: T`
    pub fn optional_prop_sig(&self, name: &str, ty: TypeNode<'a>) -> TypeElement<'a> {
        self.property_signature(name, NodeFlags::OPTIONAL, ty)
    }

    /// `readonly name: T`
    pub fn readonly_prop_sig(&self, name: &str, ty: TypeNode<'a>) -> TypeElement<'a> {
        self.property_signature(name, NodeFlags::READONLY, ty)
    }

    /// A property written without a type annotation.
    pub fn untyped_prop_sig(&self, name: &str) -> TypeElement<'a> {
        TypeElement::Property(PropertySignature {
            data: self.data(),
            name: self.id(name),
            type_annotation: None,
        })
    }

    pub fn method_sig(
        &self,
        name: &str,
        parameters: &[ParameterDeclaration<'a>],
        return_type: TypeNode<'a>,
    ) -> TypeElement<'a> {
        TypeElement::Method(MethodSignature {
            data: self.data(),
            name: self.id(name),
            parameters: self.list(parameters),
            return_type: Some(self.alloc(return_type)),
        })
    }

    /// `name?(params): R`
    pub fn optional_method_sig(
        &self,
        name: &str,
        parameters: &[ParameterDeclaration<'a>],
        return_type: TypeNode<'a>,
    ) -> TypeElement<'a> {
        TypeElement::Method(MethodSignature {
            data: self.data_with(NodeFlags::OPTIONAL),
            name: self.id(name),
            parameters: self.list(parameters),
            return_type: Some(self.alloc(return_type)),
        })
    }

    /// `[parameter: key_type]: value_type`
    pub fn index_sig(
        &self,
        parameter: &str,
        key_type: TypeNode<'a>,
        value_type: TypeNode<'a>,
    ) -> TypeElement<'a> {
        TypeElement::Index(IndexSignature {
            data: self.data(),
            parameter: self.id(parameter),
            key_type: self.alloc(key_type),
            type_annotation: self.alloc(value_type),
        })
    }

    pub fn call_sig(
        &self,
        parameters: &[ParameterDeclaration<'a>],
        return_type: TypeNode<'a>,
    ) -> TypeElement<'a> {
        TypeElement::Call(CallSignature {
            data: self.data(),
            parameters: self.list(parameters),
            return_type: Some(self.alloc(return_type)),
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn variable(
        &self,
        flags: NodeFlags,
        name: &str,
        ty: Option<TypeNode<'a>>,
        initializer: Option<Expression<'a>>,
    ) -> Statement<'a> {
        let declaration = VariableDeclaration {
            data: self.data(),
            name: self.id(name),
            type_annotation: self.alloc_opt(ty),
            initializer: self.alloc_opt(initializer),
        };
        Statement::VariableStatement(VariableStatement {
            data: self.data_with(flags),
            declarations: self.list(&[declaration]),
        })
    }

    pub fn let_(
        &self,
        name: &str,
        ty: Option<TypeNode<'a>>,
        initializer: Option<Expression<'a>>,
    ) -> Statement<'a> {
        self.variable(NodeFlags::LET, name, ty, initializer)
    }

    pub fn const_(
        &self,
        name: &str,
        ty: Option<TypeNode<'a>>,
        initializer: Expression<'a>,
    ) -> Statement<'a> {
        self.variable(NodeFlags::CONST, name, ty, Some(initializer))
    }

    pub fn var(
        &self,
        name: &str,
        ty: Option<TypeNode<'a>>,
        initializer: Option<Expression<'a>>,
    ) -> Statement<'a> {
        self.variable(NodeFlags::NONE, name, ty, initializer)
    }

    pub fn expr_stmt(&self, expression: Expression<'a>) -> Statement<'a> {
        Statement::ExpressionStatement(ExpressionStatement {
            data: self.data(),
            expression: self.alloc(expression),
        })
    }

    pub fn if_(
        &self,
        condition: Expression<'a>,
        then_statement: Statement<'a>,
        else_statement: Option<Statement<'a>>,
    ) -> Statement<'a> {
        Statement::IfStatement(IfStatement {
            data: self.data(),
            expression: self.alloc(condition),
            then_statement: self.alloc(then_statement),
            else_statement: self.alloc_opt(else_statement),
        })
    }

    pub fn block(&self, statements: &[Statement<'a>]) -> Block<'a> {
        Block {
            data: self.data(),
            statements: self.list(statements),
        }
    }

    pub fn block_stmt(&self, statements: &[Statement<'a>]) -> Statement<'a> {
        Statement::Block(self.block(statements))
    }

    pub fn ret(&self, expression: Option<Expression<'a>>) -> Statement<'a> {
        Statement::ReturnStatement(ReturnStatement {
            data: self.data(),
            expression: self.alloc_opt(expression),
        })
    }

    pub fn function(
        &self,
        name: &str,
        parameters: &[ParameterDeclaration<'a>],
        return_type: Option<TypeNode<'a>>,
        body: Block<'a>,
    ) -> Statement<'a> {
        Statement::FunctionDeclaration(FunctionDeclaration {
            data: self.data(),
            name: self.id(name),
            parameters: self.list(parameters),
            return_type: self.alloc_opt(return_type),
            body: self.alloc(body),
        })
    }

    pub fn type_alias(&self, name: &str, type_node: TypeNode<'a>) -> Statement<'a> {
        Statement::TypeAliasDeclaration(TypeAliasDeclaration {
            data: self.data(),
            name: self.id(name),
            type_node: self.alloc(type_node),
        })
    }

    pub fn interface(
        &self,
        name: &str,
        extends: &[&str],
        members: &[TypeElement<'a>],
    ) -> Statement<'a> {
        let heritage: Vec<Identifier> = extends.iter().map(|base| self.id(base)).collect();
        Statement::InterfaceDeclaration(InterfaceDeclaration {
            data: self.data(),
            name: self.id(name),
            extends: self.list(&heritage),
            members: self.list(members),
        })
    }

    /// `for (const name of expression) statement`
    pub fn for_of(
        &self,
        name: &str,
        expression: Expression<'a>,
        statement: Statement<'a>,
    ) -> Statement<'a> {
        Statement::ForOfStatement(ForOfStatement {
            data: self.data_with(NodeFlags::CONST),
            name: self.id(name),
            expression: self.alloc(expression),
            statement: self.alloc(statement),
        })
    }

    pub fn source_file(&self, file_name: &str, statements: &[Statement<'a>]) -> &'a SourceFile<'a> {
        self.alloc(SourceFile {
            data: self.data(),
            file_name: self.arena.alloc_str(file_name),
            statements: self.list(statements),
        })
    }
}
