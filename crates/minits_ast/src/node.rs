//! Syntax node definitions.
//!
//! Only the constructs the checker gives meaning to are represented.
//! Children are arena references; lists are arena slices. Every node is
//! `Copy`, so the builder can pass nodes around by value.

use crate::types::NodeFlags;
use minits_core::intern::Atom;
use minits_core::text::TextSpan;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Data common to every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeData {
    pub span: TextSpan,
    pub flags: NodeFlags,
}

impl NodeData {
    pub fn new(span: TextSpan) -> Self {
        Self {
            span,
            flags: NodeFlags::NONE,
        }
    }

    pub fn with_flags(span: TextSpan, flags: NodeFlags) -> Self {
        Self { span, flags }
    }

    #[inline]
    pub fn has(&self, flag: NodeFlags) -> bool {
        self.flags.contains(flag)
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

/// An optional arena-allocated node.
pub type OptionalNode<'a, T> = Option<&'a T>;

// ============================================================================
// Source File
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    pub data: NodeData,
    pub file_name: &'a str,
    pub statements: NodeList<'a, Statement<'a>>,
}

// ============================================================================
// Identifier and literals
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Identifier {
    pub data: NodeData,
    pub name: Atom,
}

/// A literal value as written in source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    String(&'a str),
    Number(f64),
    Boolean(bool),
}

// ============================================================================
// Type Nodes
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum TypeNode<'a> {
    Keyword(KeywordTypeNode),
    Reference(TypeReferenceNode<'a>),
    Literal(LiteralTypeNode<'a>),
    Union(UnionTypeNode<'a>),
    Intersection(IntersectionTypeNode<'a>),
    Array(ArrayTypeNode<'a>),
    Tuple(TupleTypeNode<'a>),
    Function(FunctionTypeNode<'a>),
    TypeLiteral(TypeLiteralNode<'a>),
    Parenthesized(ParenthesizedTypeNode<'a>),
}

impl<'a> TypeNode<'a> {
    pub fn span(&self) -> TextSpan {
        match self {
            TypeNode::Keyword(n) => n.data.span,
            TypeNode::Reference(n) => n.data.span,
            TypeNode::Literal(n) => n.data.span,
            TypeNode::Union(n) => n.data.span,
            TypeNode::Intersection(n) => n.data.span,
            TypeNode::Array(n) => n.data.span,
            TypeNode::Tuple(n) => n.data.span,
            TypeNode::Function(n) => n.data.span,
            TypeNode::TypeLiteral(n) => n.data.span,
            TypeNode::Parenthesized(n) => n.data.span,
        }
    }
}

/// Keywords that name a built-in type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKeyword {
    Any,
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Null,
    Undefined,
    Void,
    Never,
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordTypeNode {
    pub data: NodeData,
    pub keyword: TypeKeyword,
}

/// `Name` or `Name<Args>`.
#[derive(Debug, Clone, Copy)]
pub struct TypeReferenceNode<'a> {
    pub data: NodeData,
    pub type_name: Identifier,
    pub type_arguments: NodeList<'a, TypeNode<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct LiteralTypeNode<'a> {
    pub data: NodeData,
    pub literal: Literal<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct UnionTypeNode<'a> {
    pub data: NodeData,
    pub types: NodeList<'a, TypeNode<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct IntersectionTypeNode<'a> {
    pub data: NodeData,
    pub types: NodeList<'a, TypeNode<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ArrayTypeNode<'a> {
    pub data: NodeData,
    pub element_type: &'a TypeNode<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TupleTypeNode<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, TypeNode<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct FunctionTypeNode<'a> {
    pub data: NodeData,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: &'a TypeNode<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TypeLiteralNode<'a> {
    pub data: NodeData,
    pub members: NodeList<'a, TypeElement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ParenthesizedTypeNode<'a> {
    pub data: NodeData,
    pub type_node: &'a TypeNode<'a>,
}

// ============================================================================
// Type Elements (members of type literals and interfaces)
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum TypeElement<'a> {
    Property(PropertySignature<'a>),
    Method(MethodSignature<'a>),
    Index(IndexSignature<'a>),
    Call(CallSignature<'a>),
}

impl<'a> TypeElement<'a> {
    pub fn span(&self) -> TextSpan {
        match self {
            TypeElement::Property(n) => n.data.span,
            TypeElement::Method(n) => n.data.span,
            TypeElement::Index(n) => n.data.span,
            TypeElement::Call(n) => n.data.span,
        }
    }
}

/// `name: T`, `name?: T`, `readonly name: T`.
#[derive(Debug, Clone, Copy)]
pub struct PropertySignature<'a> {
    pub data: NodeData,
    pub name: Identifier,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
}

/// `name(params): R`, `name?(params): R`.
#[derive(Debug, Clone, Copy)]
pub struct MethodSignature<'a> {
    pub data: NodeData,
    pub name: Identifier,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
}

/// `[key: string]: T`.
#[derive(Debug, Clone, Copy)]
pub struct IndexSignature<'a> {
    pub data: NodeData,
    pub parameter: Identifier,
    pub key_type: &'a TypeNode<'a>,
    pub type_annotation: &'a TypeNode<'a>,
}

/// `(params): R` inside an interface.
#[derive(Debug, Clone, Copy)]
pub struct CallSignature<'a> {
    pub data: NodeData,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
}

// ============================================================================
// Parameters
// ============================================================================

/// A parameter. `NodeFlags::OPTIONAL` marks `?`, `NodeFlags::REST` marks `...`.
#[derive(Debug, Clone, Copy)]
pub struct ParameterDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
    pub initializer: OptionalNode<'a, Expression<'a>>,
}

impl<'a> ParameterDeclaration<'a> {
    pub fn is_rest(&self) -> bool {
        self.data.has(NodeFlags::REST)
    }

    /// `?`-marked or defaulted.
    pub fn is_optional(&self) -> bool {
        self.data.has(NodeFlags::OPTIONAL) || self.initializer.is_some()
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Statement<'a> {
    VariableStatement(VariableStatement<'a>),
    ExpressionStatement(ExpressionStatement<'a>),
    IfStatement(IfStatement<'a>),
    Block(Block<'a>),
    ReturnStatement(ReturnStatement<'a>),
    ForOfStatement(ForOfStatement<'a>),
    FunctionDeclaration(FunctionDeclaration<'a>),
    TypeAliasDeclaration(TypeAliasDeclaration<'a>),
    InterfaceDeclaration(InterfaceDeclaration<'a>),
}

impl<'a> Statement<'a> {
    pub fn span(&self) -> TextSpan {
        match self {
            Statement::VariableStatement(n) => n.data.span,
            Statement::ExpressionStatement(n) => n.data.span,
            Statement::IfStatement(n) => n.data.span,
            Statement::Block(n) => n.data.span,
            Statement::ReturnStatement(n) => n.data.span,
            Statement::ForOfStatement(n) => n.data.span,
            Statement::FunctionDeclaration(n) => n.data.span,
            Statement::TypeAliasDeclaration(n) => n.data.span,
            Statement::InterfaceDeclaration(n) => n.data.span,
        }
    }
}

/// `let`/`const`/`var` list. `NodeFlags::CONST` / `NodeFlags::LET` on `data`;
/// neither means `var`.
#[derive(Debug, Clone, Copy)]
pub struct VariableStatement<'a> {
    pub data: NodeData,
    pub declarations: NodeList<'a, VariableDeclaration<'a>>,
}

impl<'a> VariableStatement<'a> {
    pub fn is_const(&self) -> bool {
        self.data.has(NodeFlags::CONST)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VariableDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
    pub initializer: OptionalNode<'a, Expression<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ExpressionStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct IfStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub then_statement: &'a Statement<'a>,
    pub else_statement: OptionalNode<'a, Statement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ReturnStatement<'a> {
    pub data: NodeData,
    pub expression: OptionalNode<'a, Expression<'a>>,
}

/// `for (const name of expression) statement`.
#[derive(Debug, Clone, Copy)]
pub struct ForOfStatement<'a> {
    pub data: NodeData,
    pub name: Identifier,
    pub expression: &'a Expression<'a>,
    pub statement: &'a Statement<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct FunctionDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
    pub body: &'a Block<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TypeAliasDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier,
    pub type_node: &'a TypeNode<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct InterfaceDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier,
    pub extends: NodeList<'a, Identifier>,
    pub members: NodeList<'a, TypeElement<'a>>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Expression<'a> {
    Identifier(Identifier),
    Literal(LiteralExpression<'a>),
    NullKeyword(NodeData),
    Template(TemplateExpression<'a>),
    ObjectLiteral(ObjectLiteralExpression<'a>),
    ArrayLiteral(ArrayLiteralExpression<'a>),
    PropertyAccess(PropertyAccessExpression<'a>),
    ElementAccess(ElementAccessExpression<'a>),
    Call(CallExpression<'a>),
    /// `new callee(arguments)`.
    New(CallExpression<'a>),
    PrefixUnary(PrefixUnaryExpression<'a>),
    Binary(BinaryExpression<'a>),
    Conditional(ConditionalExpression<'a>),
    ArrowFunction(ArrowFunction<'a>),
    FunctionExpression(FunctionExpression<'a>),
    Parenthesized(ParenthesizedExpression<'a>),
    Spread(SpreadElement<'a>),
}

impl<'a> Expression<'a> {
    pub fn span(&self) -> TextSpan {
        match self {
            Expression::Identifier(n) => n.data.span,
            Expression::Literal(n) => n.data.span,
            Expression::NullKeyword(data) => data.span,
            Expression::Template(n) => n.data.span,
            Expression::ObjectLiteral(n) => n.data.span,
            Expression::ArrayLiteral(n) => n.data.span,
            Expression::PropertyAccess(n) => n.data.span,
            Expression::ElementAccess(n) => n.data.span,
            Expression::Call(n) | Expression::New(n) => n.data.span,
            Expression::PrefixUnary(n) => n.data.span,
            Expression::Binary(n) => n.data.span,
            Expression::Conditional(n) => n.data.span,
            Expression::ArrowFunction(n) => n.data.span,
            Expression::FunctionExpression(n) => n.data.span,
            Expression::Parenthesized(n) => n.data.span,
            Expression::Spread(n) => n.data.span,
        }
    }

    /// Strip any number of surrounding parentheses.
    pub fn skip_parentheses(&self) -> &Expression<'a> {
        let mut expr = self;
        while let Expression::Parenthesized(p) = expr {
            expr = p.expression;
        }
        expr
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LiteralExpression<'a> {
    pub data: NodeData,
    pub value: Literal<'a>,
}

/// A template string; only the substitutions are kept.
#[derive(Debug, Clone, Copy)]
pub struct TemplateExpression<'a> {
    pub data: NodeData,
    pub substitutions: NodeList<'a, Expression<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ObjectLiteralExpression<'a> {
    pub data: NodeData,
    pub properties: NodeList<'a, ObjectLiteralElement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum ObjectLiteralElement<'a> {
    /// `name: value`
    Property(PropertyAssignment<'a>),
    /// `name`
    Shorthand(Identifier),
    /// `name(params) { body }`
    Method(MethodDeclaration<'a>),
}

impl<'a> ObjectLiteralElement<'a> {
    pub fn name(&self) -> Identifier {
        match self {
            ObjectLiteralElement::Property(p) => p.name,
            ObjectLiteralElement::Shorthand(id) => *id,
            ObjectLiteralElement::Method(m) => m.name,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PropertyAssignment<'a> {
    pub data: NodeData,
    pub name: Identifier,
    pub initializer: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct MethodDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
    pub body: &'a Block<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct ArrayLiteralExpression<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, Expression<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct PropertyAccessExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub name: Identifier,
}

#[derive(Debug, Clone, Copy)]
pub struct ElementAccessExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub argument: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct CallExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub arguments: NodeList<'a, Expression<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    TypeOf,
    Not,
    Minus,
    Plus,
}

#[derive(Debug, Clone, Copy)]
pub struct PrefixUnaryExpression<'a> {
    pub data: NodeData,
    pub operator: PrefixOperator,
    pub operand: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    StrictEquals,
    StrictNotEquals,
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessThanEquals,
    GreaterThanEquals,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    AmpersandAmpersand,
    BarBar,
    Assign,
    PlusAssign,
    MinusAssign,
}

impl BinaryOperator {
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOperator::Assign | BinaryOperator::PlusAssign | BinaryOperator::MinusAssign
        )
    }

    pub fn is_equality(self) -> bool {
        matches!(
            self,
            BinaryOperator::StrictEquals
                | BinaryOperator::StrictNotEquals
                | BinaryOperator::Equals
                | BinaryOperator::NotEquals
        )
    }

    /// `!==` and `!=`.
    pub fn is_negated_equality(self) -> bool {
        matches!(self, BinaryOperator::StrictNotEquals | BinaryOperator::NotEquals)
    }

    pub fn text(self) -> &'static str {
        match self {
            BinaryOperator::StrictEquals => "===",
            BinaryOperator::StrictNotEquals => "!==",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThanEquals => "<=",
            BinaryOperator::GreaterThanEquals => ">=",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Asterisk => "*",
            BinaryOperator::Slash => "/",
            BinaryOperator::Percent => "%",
            BinaryOperator::AmpersandAmpersand => "&&",
            BinaryOperator::BarBar => "||",
            BinaryOperator::Assign => "=",
            BinaryOperator::PlusAssign => "+=",
            BinaryOperator::MinusAssign => "-=",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BinaryExpression<'a> {
    pub data: NodeData,
    pub left: &'a Expression<'a>,
    pub operator: BinaryOperator,
    pub right: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct ConditionalExpression<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub when_true: &'a Expression<'a>,
    pub when_false: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum ArrowBody<'a> {
    Expression(&'a Expression<'a>),
    Block(&'a Block<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct ArrowFunction<'a> {
    pub data: NodeData,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
    pub body: ArrowBody<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct FunctionExpression<'a> {
    pub data: NodeData,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
    pub body: &'a Block<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct ParenthesizedExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct SpreadElement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}
