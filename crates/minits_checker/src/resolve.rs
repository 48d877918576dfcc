//! Resolution of written types.
//!
//! Type names are hoisted per block and resolved on first use. Interfaces
//! with the same name in the same scope merge into one object type.
//!
//! A name met again while its declaration is being resolved is legal inside
//! an object or function type (`interface Tree { children: Tree[] }`). It
//! gets a reserved id that is filled in once the declaration is done. Any
//! other self-reference is circular and resolves to `any`.

use crate::checker::{Checker, LateBases, ResolveState, TypeDecl, TypeSymbol};
use crate::structural;
use crate::types::{ObjectShape, PropertyInfo, TypeId, TypeKind};
use minits_ast::node::*;
use minits_ast::NodeFlags;
use minits_core::intern::Atom;
use minits_core::text::TextSpan;
use minits_diagnostics::messages;
use rustc_hash::FxHashMap;

impl<'a> Checker<'a> {
    /// Register the type names and function signatures declared directly in
    /// `statements`, so they can be used before their declaration.
    pub(crate) fn hoist_declarations(&mut self, statements: &'a [Statement<'a>]) {
        for statement in statements {
            match statement {
                Statement::TypeAliasDeclaration(alias) => {
                    if self.local_type_symbol(alias.name.name).is_none() {
                        self.declare_type_symbol(alias.name.name, TypeDecl::Alias(alias));
                    }
                }
                Statement::InterfaceDeclaration(interface) => {
                    match self.local_type_symbol(interface.name.name) {
                        Some(index) => {
                            if let TypeDecl::Interface(decls) = &mut self.type_symbols[index].decl {
                                decls.push(interface);
                            }
                        }
                        None => {
                            self.declare_type_symbol(
                                interface.name.name,
                                TypeDecl::Interface(vec![interface]),
                            );
                        }
                    }
                }
                _ => {}
            }
        }
        for statement in statements {
            if let Statement::FunctionDeclaration(function) = statement {
                self.hoist_function(function, statements);
            }
        }
    }

    fn declare_type_symbol(&mut self, name: Atom, decl: TypeDecl<'a>) {
        let index = self.type_symbols.len();
        self.type_symbols.push(TypeSymbol {
            name,
            decl,
            state: ResolveState::Unresolved,
            resolving_bases: false,
        });
        if let Some(scope) = self.type_scopes.last_mut() {
            scope.insert(name, index);
        }
    }

    fn local_type_symbol(&self, name: Atom) -> Option<usize> {
        self.type_scopes.last()?.get(&name).copied()
    }

    pub(crate) fn lookup_type_symbol(&self, name: Atom) -> Option<usize> {
        self.type_scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }

    /// Resolve a declared type name. `span` is where it was referenced.
    pub(crate) fn resolve_type_symbol(&mut self, index: usize, span: TextSpan) -> TypeId {
        let name = self.type_symbols[index].name;
        match self.type_symbols[index].state {
            ResolveState::Resolved(ty) => return ty,
            ResolveState::Resolving(reserved) if self.deferred_depth > 0 => {
                if let Some(id) = reserved {
                    return id;
                }
                let id = self.types.reserve();
                tracing::trace!(name = self.types.interner().resolve(name), id = id.index(), "reserved recursive type");
                self.type_symbols[index].state = ResolveState::Resolving(Some(id));
                return id;
            }
            ResolveState::Resolving(_) => {
                let text = self.name_text(name);
                let message = match self.type_symbols[index].decl {
                    TypeDecl::Interface(_) => &messages::TYPE_0_RECURSIVELY_REFERENCES_ITSELF_AS_A_BASE_TYPE,
                    _ => &messages::TYPE_ALIAS_0_CIRCULARLY_REFERENCES_ITSELF,
                };
                self.error(span, message, &[&text]);
                return self.types.unknown;
            }
            ResolveState::Unresolved => {}
        }

        self.type_symbols[index].state = ResolveState::Resolving(None);
        let ty = match self.type_symbols[index].decl.clone() {
            TypeDecl::Alias(alias) => {
                let ty = self.resolve_type_node(alias.type_node);
                self.close_alias(index, ty, alias.name.data.span)
            }
            TypeDecl::Interface(decls) => {
                let (shape, late) = self.resolve_interface(index, &decls);
                let reserved = match self.type_symbols[index].state {
                    ResolveState::Resolving(Some(reserved)) => Some(reserved),
                    _ if !late.is_empty() => Some(self.types.reserve()),
                    _ => None,
                };
                match reserved {
                    Some(id) => {
                        self.fill_reserved(id, TypeKind::Object(shape));
                        if !late.is_empty() {
                            self.late_bases.push(LateBases { id, bases: late });
                        }
                        id
                    }
                    None => self.types.object(shape),
                }
            }
            TypeDecl::Builtin(ty) => ty,
        };
        self.types.set_name(ty, name);
        tracing::trace!(name = self.types.interner().resolve(name), ty = %self.types.display(ty), "resolved type");
        self.type_symbols[index].state = ResolveState::Resolved(ty);
        self.apply_late_bases();
        ty
    }

    /// Let interfaces inherit from bases that were still resolving their
    /// members when the interface was built.
    fn apply_late_bases(&mut self) {
        let mut i = 0;
        while i < self.late_bases.len() {
            let ready = self.late_bases[i]
                .bases
                .iter()
                .all(|&base| matches!(self.type_symbols[base].state, ResolveState::Resolved(_)));
            if !ready {
                i += 1;
                continue;
            }
            let late = self.late_bases.swap_remove(i);
            let TypeKind::Object(mut shape) = self.types.kind(late.id).clone() else {
                continue;
            };
            for base in late.bases {
                let ResolveState::Resolved(ty) = self.type_symbols[base].state else {
                    continue;
                };
                if let TypeKind::Object(base_shape) = self.types.kind(ty).clone() {
                    inherit(&mut shape, base_shape);
                }
            }
            self.fill_reserved(late.id, TypeKind::Object(shape));
        }
    }

    /// Fill the id reserved for an alias that refers to itself. Only an
    /// object or function type can contain itself.
    fn close_alias(&mut self, index: usize, ty: TypeId, span: TextSpan) -> TypeId {
        let ResolveState::Resolving(Some(reserved)) = self.type_symbols[index].state else {
            return ty;
        };
        match self.types.kind(ty).clone() {
            kind @ (TypeKind::Object(_) | TypeKind::Function(_)) => {
                self.fill_reserved(reserved, kind);
                reserved
            }
            _ => {
                let text = self.name_text(self.type_symbols[index].name);
                self.error(span, &messages::TYPE_ALIAS_0_CIRCULARLY_REFERENCES_ITSELF, &[&text]);
                self.fill_reserved(reserved, TypeKind::Unknown);
                self.types.unknown
            }
        }
    }

    fn fill_reserved(&mut self, id: TypeId, kind: TypeKind) {
        self.types.define(id, kind);
        // Verdicts reached while the id was pending are stale.
        self.relation.clear_cache();
    }

    /// Merge every declaration of an interface into one object shape.
    ///
    /// Inherited members come first and are overridden by own members. A
    /// member declared again by a later declaration must have the same
    /// shape; the first declaration wins.
    ///
    /// The second vector lists bases that are still resolving their own
    /// members; they are inherited once they are done.
    fn resolve_interface(
        &mut self,
        index: usize,
        decls: &[&'a InterfaceDeclaration<'a>],
    ) -> (ObjectShape, Vec<usize>) {
        let mut shape = ObjectShape::default();
        let mut late = Vec::new();

        // A base type is needed whole, so it is never a deferred position.
        let deferred = std::mem::take(&mut self.deferred_depth);
        self.type_symbols[index].resolving_bases = true;
        for decl in decls {
            for base in decl.extends {
                match self.resolve_base(*base) {
                    BaseShape::Ready(base_shape) => inherit(&mut shape, base_shape),
                    BaseShape::Late(symbol) => late.push(symbol),
                    BaseShape::Unusable => {}
                }
            }
        }
        self.type_symbols[index].resolving_bases = false;
        self.deferred_depth = deferred;

        let mut own: FxHashMap<Atom, PropertyInfo> = FxHashMap::default();
        for decl in decls {
            let (members, spans) = self.member_shape(decl.members);
            for (prop, span) in members.properties.into_iter().zip(spans) {
                if let Some(previous) = own.get(&prop.name).copied() {
                    if !structural::same_shape(&mut self.relation, &self.types, previous.ty, prop.ty) {
                        let member = self.name_text(prop.name);
                        let expected = self.types.display(previous.ty);
                        let actual = self.types.display(prop.ty);
                        self.error(
                            span,
                            &messages::SUBSEQUENT_PROPERTY_DECLARATIONS_MUST_HAVE_THE_SAME_TYPE,
                            &[&member, &expected, &actual],
                        );
                    }
                    continue;
                }
                own.insert(prop.name, prop);
                match shape.properties.iter_mut().find(|p| p.name == prop.name) {
                    Some(inherited) => *inherited = prop,
                    None => shape.properties.push(prop),
                }
            }
            if let Some(index) = members.string_index {
                shape.string_index = Some(match shape.string_index {
                    Some(existing) => self.types.intersection(existing, index),
                    None => index,
                });
            }
            if members.call.is_some() {
                shape.call = members.call;
            }
        }
        (shape, late)
    }

    fn resolve_base(&mut self, base: Identifier) -> BaseShape {
        let Some(index) = self.lookup_type_symbol(base.name) else {
            let text = self.name_text(base.name);
            self.error(base.data.span, &messages::CANNOT_FIND_NAME_0, &[&text]);
            return BaseShape::Unusable;
        };
        let symbol = &self.type_symbols[index];
        if matches!(symbol.state, ResolveState::Resolving(_)) && !symbol.resolving_bases {
            return BaseShape::Late(index);
        }
        let ty = self.resolve_type_symbol(index, base.data.span);
        match self.types.kind(ty) {
            TypeKind::Object(shape) => BaseShape::Ready(shape.clone()),
            _ => BaseShape::Unusable,
        }
    }

    /// Build the members of a type literal or interface body. The second
    /// vector holds the span of each property, in order.
    fn member_shape(&mut self, members: &'a [TypeElement<'a>]) -> (ObjectShape, Vec<TextSpan>) {
        let mut shape = ObjectShape::default();
        let mut spans = Vec::new();
        self.deferred_depth += 1;
        for member in members {
            let (name, ty, data) = match member {
                TypeElement::Property(p) => {
                    let ty = match p.type_annotation {
                        Some(node) => self.resolve_type_node(node),
                        None => self.types.unknown,
                    };
                    (p.name.name, ty, p.data)
                }
                TypeElement::Method(m) => {
                    let signature = self.build_signature(m.parameters, m.return_type, None);
                    (m.name.name, self.types.function(signature), m.data)
                }
                TypeElement::Index(index) => {
                    // Number keys are a subset of string keys.
                    self.resolve_type_node(index.key_type);
                    let value = self.resolve_type_node(index.type_annotation);
                    shape.string_index = Some(match shape.string_index {
                        Some(existing) => self.types.intersection(existing, value),
                        None => value,
                    });
                    continue;
                }
                TypeElement::Call(call) => {
                    if shape.call.is_none() {
                        shape.call = Some(self.build_signature(call.parameters, call.return_type, None));
                    }
                    continue;
                }
            };
            if shape.property(name).is_some() {
                continue;
            }
            shape.properties.push(PropertyInfo {
                name,
                ty,
                optional: data.has(NodeFlags::OPTIONAL),
                readonly: data.has(NodeFlags::READONLY),
            });
            spans.push(data.span);
        }
        self.deferred_depth -= 1;
        (shape, spans)
    }

    /// Resolve a written type to a [`TypeId`].
    pub(crate) fn resolve_type_node(&mut self, node: &'a TypeNode<'a>) -> TypeId {
        match node {
            TypeNode::Keyword(k) => match k.keyword {
                TypeKeyword::Any => self.types.unknown,
                TypeKeyword::String => self.types.string,
                TypeKeyword::Number => self.types.number,
                TypeKeyword::Boolean => self.types.boolean,
                TypeKeyword::BigInt => self.types.bigint,
                TypeKeyword::Symbol => self.types.symbol,
                TypeKeyword::Null => self.types.null,
                TypeKeyword::Undefined => self.types.undefined,
                TypeKeyword::Void => self.types.void,
                TypeKeyword::Never => self.types.never,
            },
            TypeNode::Reference(r) => self.resolve_type_reference(r),
            TypeNode::Literal(l) => match l.literal {
                Literal::String(value) => self.types.string_literal(value),
                Literal::Number(value) => self.types.number_literal(value),
                Literal::Boolean(value) => self.types.boolean_literal(value),
            },
            TypeNode::Union(u) => {
                let members: Vec<TypeId> = u.types.iter().map(|t| self.resolve_type_node(t)).collect();
                self.types.union(members)
            }
            TypeNode::Intersection(i) => {
                let mut parts = i.types.iter();
                let Some(first) = parts.next() else {
                    return self.types.unknown;
                };
                let mut ty = self.resolve_type_node(first);
                for part in parts {
                    let next = self.resolve_type_node(part);
                    ty = self.types.intersection(ty, next);
                }
                ty
            }
            TypeNode::Array(a) => {
                let element = self.resolve_type_node(a.element_type);
                self.types.array(element)
            }
            TypeNode::Tuple(t) => {
                let elements = t.elements.iter().map(|e| self.resolve_type_node(e)).collect();
                self.types.tuple(elements)
            }
            TypeNode::Function(f) => {
                self.deferred_depth += 1;
                let signature = self.build_signature(f.parameters, Some(f.return_type), None);
                self.deferred_depth -= 1;
                self.types.function(signature)
            }
            TypeNode::TypeLiteral(l) => {
                let (shape, _) = self.member_shape(l.members);
                self.types.object(shape)
            }
            TypeNode::Parenthesized(p) => self.resolve_type_node(p.type_node),
        }
    }

    fn resolve_type_reference(&mut self, reference: &'a TypeReferenceNode<'a>) -> TypeId {
        let name = reference.type_name.name;
        if self.types.interner().resolve(name) == "Array" {
            if let [element] = reference.type_arguments {
                let element = self.resolve_type_node(element);
                return self.types.array(element);
            }
        }
        match self.lookup_type_symbol(name) {
            Some(index) => self.resolve_type_symbol(index, reference.data.span),
            None => {
                let text = self.name_text(name);
                self.error(reference.data.span, &messages::CANNOT_FIND_NAME_0, &[&text]);
                self.types.unknown
            }
        }
    }
}

/// What an `extends` clause contributes.
enum BaseShape {
    Ready(ObjectShape),
    /// The base is resolving its members; inherit from it afterwards.
    Late(usize),
    Unusable,
}

/// Add the members of `base` that `shape` does not declare itself.
fn inherit(shape: &mut ObjectShape, base: ObjectShape) {
    for prop in base.properties {
        if shape.property(prop.name).is_none() {
            shape.properties.push(prop);
        }
    }
    shape.string_index = shape.string_index.or(base.string_index);
    if shape.call.is_none() {
        shape.call = base.call;
    }
}

#[cfg(test)]
mod tests {
    use crate::Checker;
    use bumpalo::Bump;
    use minits_ast::AstBuilder;
    use minits_core::intern::Interner;
    use minits_diagnostics::DiagnosticKind;

    #[test]
    fn test_interface_is_hoisted_and_named() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena, Interner::new());
        let file = b.source_file(
            "novel.ts",
            &[
                b.interface(
                    "Novel",
                    &[],
                    &[b.prop_sig("setting", b.type_ref("Setting"))],
                ),
                b.interface(
                    "Setting",
                    &[],
                    &[
                        b.prop_sig("place", b.string_type()),
                        b.prop_sig("year", b.number_type()),
                    ],
                ),
            ],
        );
        let mut checker = Checker::new(b.interner().clone());
        checker.check_source_file(file);
        assert!(checker.diagnostics().is_empty());
        let novel = checker.type_named("Novel").unwrap();
        assert_eq!(checker.display(novel), "Novel");
    }

    #[test]
    fn test_circular_alias() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena, Interner::new());
        let file = b.source_file(
            "loop.ts",
            &[b.type_alias(
                "Loop",
                b.union_type(&[b.string_type(), b.type_ref("Loop")]),
            )],
        );
        let mut checker = Checker::new(b.interner().clone());
        checker.check_source_file(file);
        assert_eq!(checker.diagnostics().count_of(DiagnosticKind::CircularReference), 1);
        let resolved = checker.type_named("Loop").unwrap();
        assert_eq!(checker.display(resolved), "any");
    }

    #[test]
    fn test_generic_array_reference() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena, Interner::new());
        let file = b.source_file(
            "names.ts",
            &[b.type_alias("Names", b.generic_ref("Array", &[b.string_type()]))],
        );
        let mut checker = Checker::new(b.interner().clone());
        checker.check_source_file(file);
        let names = checker.type_named("Names").unwrap();
        assert_eq!(checker.display(names), "string[]");
    }
}
