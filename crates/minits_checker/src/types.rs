//! Type system representation.
//!
//! Types are stored in a [`TypeTable`] and referenced by [`TypeId`]. The
//! table hash-conses: building a type that is structurally equal to one
//! already in the table returns the existing id, so type equality is id
//! equality. Union members and object members are compared in a canonical
//! order, while each type keeps the order it was first written in for
//! display.
//!
//! A type that refers to itself (`interface Tree { children: Tree[] }`)
//! cannot be hash-consed before it exists. Its id is reserved first, used
//! by the members being built, and filled in once they are done.

use indexmap::IndexSet;
use minits_core::intern::{Atom, Interner};
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::{Hash, Hasher};

/// Maximum nesting rendered by [`TypeTable::display`].
const MAX_DISPLAY_DEPTH: u32 = 20;

/// Handle to a type in a [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Null,
    Undefined,
    Void,
}

impl PrimitiveKind {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::BigInt => "bigint",
            PrimitiveKind::Symbol => "symbol",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Undefined => "undefined",
            PrimitiveKind::Void => "void",
        }
    }

    pub fn is_nullish(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Null | PrimitiveKind::Undefined | PrimitiveKind::Void
        )
    }
}

/// The value of a literal type.
#[derive(Debug, Clone, Copy)]
pub enum LiteralValue {
    String(Atom),
    Number(f64),
    Boolean(bool),
}

impl LiteralValue {
    /// The primitive this literal widens to.
    pub fn primitive(self) -> PrimitiveKind {
        match self {
            LiteralValue::String(_) => PrimitiveKind::String,
            LiteralValue::Number(_) => PrimitiveKind::Number,
            LiteralValue::Boolean(_) => PrimitiveKind::Boolean,
        }
    }

    /// `-0` and `0` are the same literal; every NaN is the same literal.
    fn number_bits(value: f64) -> u64 {
        if value.is_nan() {
            f64::NAN.to_bits()
        } else {
            (value + 0.0).to_bits()
        }
    }
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a == b,
            (LiteralValue::Number(a), LiteralValue::Number(b)) => {
                Self::number_bits(*a) == Self::number_bits(*b)
            }
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::String(atom) => atom.hash(state),
            LiteralValue::Number(value) => Self::number_bits(*value).hash(state),
            LiteralValue::Boolean(value) => value.hash(state),
        }
    }
}

/// A named member of an object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: Atom,
    pub ty: TypeId,
    pub optional: bool,
    pub readonly: bool,
}

impl PropertyInfo {
    pub fn new(name: Atom, ty: TypeId) -> Self {
        Self {
            name,
            ty,
            optional: false,
            readonly: false,
        }
    }
}

/// A parameter in a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: Atom,
    /// For a rest parameter, the array type.
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
}

/// A call signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
}

impl Signature {
    /// Number of arguments a call must supply.
    pub fn min_arity(&self) -> usize {
        self.params
            .iter()
            .filter(|p| !p.optional && !p.rest)
            .count()
    }

    /// Number of arguments a call may supply; `None` with a rest parameter.
    pub fn max_arity(&self) -> Option<usize> {
        if self.has_rest() {
            None
        } else {
            Some(self.params.len())
        }
    }

    pub fn has_rest(&self) -> bool {
        self.params.last().is_some_and(|p| p.rest)
    }

    /// The type an argument at `index` is checked against. Past a rest
    /// parameter, this is the rest parameter's element type.
    pub fn param_type_at(&self, table: &TypeTable, index: usize) -> Option<TypeId> {
        let last = self.params.last()?;
        if index + 1 >= self.params.len() && last.rest {
            return Some(table.element_type(last.ty).unwrap_or(table.unknown));
        }
        self.params.get(index).map(|p| p.ty)
    }

    /// The parameter declared at `index`, or the rest parameter covering it.
    pub fn param_at(&self, index: usize) -> Option<&ParamInfo> {
        match self.params.get(index) {
            Some(param) => Some(param),
            None => self.params.last().filter(|p| p.rest),
        }
    }
}

/// Members of an object type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ObjectShape {
    pub properties: Vec<PropertyInfo>,
    /// `[key: string]: T`
    pub string_index: Option<TypeId>,
    /// Call signature of a callable interface.
    pub call: Option<Signature>,
    /// Signature used by `new`.
    pub construct: Option<Signature>,
}

impl ObjectShape {
    pub fn property(&self, name: Atom) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.string_index.is_none()
            && self.call.is_none()
            && self.construct.is_none()
    }

    pub fn required(&self) -> impl Iterator<Item = &PropertyInfo> {
        self.properties.iter().filter(|p| !p.optional)
    }
}

/// The data of each type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// The escape hatch: assignable to and from everything. Written `any`.
    Unknown,
    Never,
    Primitive(PrimitiveKind),
    Literal(LiteralValue),
    /// Two or more members; never contains a nested union.
    Union(Vec<TypeId>),
    Object(ObjectShape),
    Function(Signature),
    Array(TypeId),
    Tuple(Vec<TypeId>),
    /// A reserved id whose type is still being built.
    Pending,
}

impl TypeKind {
    /// Key used for hash-consing: member order does not matter.
    fn canonical(&self) -> TypeKind {
        match self {
            TypeKind::Union(members) => {
                let mut members = members.clone();
                members.sort_unstable();
                TypeKind::Union(members)
            }
            TypeKind::Object(shape) => {
                let mut shape = shape.clone();
                shape.properties.sort_by_key(|p| p.name);
                TypeKind::Object(shape)
            }
            other => other.clone(),
        }
    }
}

/// The type table stores all types and provides access by [`TypeId`].
pub struct TypeTable {
    types: Vec<TypeKind>,
    ids: FxHashMap<TypeKind, TypeId>,
    /// Declared names of interfaces and aliased object/function types.
    names: FxHashMap<TypeId, Atom>,
    /// Ids handed out by [`TypeTable::reserve`].
    recursive: FxHashSet<TypeId>,
    /// Object intersections being merged, with the id reserved for the
    /// result if a member refers back to the same pair.
    intersecting: Vec<((TypeId, TypeId), Option<TypeId>)>,
    interner: Interner,
    // Well-known types
    pub unknown: TypeId,
    pub never: TypeId,
    pub string: TypeId,
    pub number: TypeId,
    pub boolean: TypeId,
    pub bigint: TypeId,
    pub symbol: TypeId,
    pub null: TypeId,
    pub undefined: TypeId,
    pub void: TypeId,
    pub true_type: TypeId,
    pub false_type: TypeId,
    pub empty_string: TypeId,
    pub zero: TypeId,
}

impl TypeTable {
    pub fn new(interner: Interner) -> Self {
        let placeholder = TypeId(0);
        let mut table = Self {
            types: Vec::with_capacity(256),
            ids: FxHashMap::default(),
            names: FxHashMap::default(),
            recursive: FxHashSet::default(),
            intersecting: Vec::new(),
            interner,
            unknown: placeholder,
            never: placeholder,
            string: placeholder,
            number: placeholder,
            boolean: placeholder,
            bigint: placeholder,
            symbol: placeholder,
            null: placeholder,
            undefined: placeholder,
            void: placeholder,
            true_type: placeholder,
            false_type: placeholder,
            empty_string: placeholder,
            zero: placeholder,
        };

        table.unknown = table.intern(TypeKind::Unknown);
        table.never = table.intern(TypeKind::Never);
        table.string = table.intern(TypeKind::Primitive(PrimitiveKind::String));
        table.number = table.intern(TypeKind::Primitive(PrimitiveKind::Number));
        table.boolean = table.intern(TypeKind::Primitive(PrimitiveKind::Boolean));
        table.bigint = table.intern(TypeKind::Primitive(PrimitiveKind::BigInt));
        table.symbol = table.intern(TypeKind::Primitive(PrimitiveKind::Symbol));
        table.null = table.intern(TypeKind::Primitive(PrimitiveKind::Null));
        table.undefined = table.intern(TypeKind::Primitive(PrimitiveKind::Undefined));
        table.void = table.intern(TypeKind::Primitive(PrimitiveKind::Void));
        table.true_type = table.intern(TypeKind::Literal(LiteralValue::Boolean(true)));
        table.false_type = table.intern(TypeKind::Literal(LiteralValue::Boolean(false)));
        let empty = table.interner.intern("");
        table.empty_string = table.intern(TypeKind::Literal(LiteralValue::String(empty)));
        table.zero = table.intern(TypeKind::Literal(LiteralValue::Number(0.0)));

        table
    }

    /// Return the id of a structurally equal type, adding it if it is new.
    pub fn intern(&mut self, kind: TypeKind) -> TypeId {
        let key = kind.canonical();
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(kind);
        self.ids.insert(key, id);
        id
    }

    /// Allocate an id for a type that is referenced before it is built.
    /// Its kind is [`TypeKind::Pending`] until [`TypeTable::define`].
    pub fn reserve(&mut self) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeKind::Pending);
        self.recursive.insert(id);
        id
    }

    /// Fill in, or refill, a reserved id. Types built afterwards with the
    /// same structure share the id.
    pub fn define(&mut self, id: TypeId, kind: TypeKind) {
        let key = kind.canonical();
        let previous = std::mem::replace(&mut self.types[id.index()], kind);
        if !matches!(previous, TypeKind::Pending) {
            let stale = previous.canonical();
            if self.ids.get(&stale) == Some(&id) {
                self.ids.remove(&stale);
            }
        }
        self.ids.entry(key).or_insert(id);
    }

    /// Whether `id` was reserved, i.e. may occur inside its own members.
    pub fn is_recursive(&self, id: TypeId) -> bool {
        self.recursive.contains(&id)
    }

    #[inline]
    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.types[id.index()]
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Record the declared name of a type. The first name given wins.
    /// Only object and function types are named; aliases of primitives and
    /// unions display structurally.
    pub fn set_name(&mut self, id: TypeId, name: Atom) {
        if matches!(self.kind(id), TypeKind::Object(_) | TypeKind::Function(_)) {
            self.names.entry(id).or_insert(name);
        }
    }

    pub fn name_of(&self, id: TypeId) -> Option<Atom> {
        self.names.get(&id).copied()
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn primitive(&self, kind: PrimitiveKind) -> TypeId {
        match kind {
            PrimitiveKind::String => self.string,
            PrimitiveKind::Number => self.number,
            PrimitiveKind::Boolean => self.boolean,
            PrimitiveKind::BigInt => self.bigint,
            PrimitiveKind::Symbol => self.symbol,
            PrimitiveKind::Null => self.null,
            PrimitiveKind::Undefined => self.undefined,
            PrimitiveKind::Void => self.void,
        }
    }

    pub fn literal(&mut self, value: LiteralValue) -> TypeId {
        self.intern(TypeKind::Literal(value))
    }

    pub fn string_literal(&mut self, value: &str) -> TypeId {
        let atom = self.interner.intern(value);
        self.literal(LiteralValue::String(atom))
    }

    pub fn number_literal(&mut self, value: f64) -> TypeId {
        self.literal(LiteralValue::Number(value))
    }

    pub fn boolean_literal(&self, value: bool) -> TypeId {
        if value {
            self.true_type
        } else {
            self.false_type
        }
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeKind::Array(element))
    }

    pub fn tuple(&mut self, elements: Vec<TypeId>) -> TypeId {
        self.intern(TypeKind::Tuple(elements))
    }

    pub fn object(&mut self, shape: ObjectShape) -> TypeId {
        self.intern(TypeKind::Object(shape))
    }

    pub fn function(&mut self, signature: Signature) -> TypeId {
        self.intern(TypeKind::Function(signature))
    }

    /// Build a union.
    ///
    /// Nested unions are flattened, duplicates and `never` dropped, a literal
    /// is absorbed by its primitive, and `true | false` becomes `boolean`.
    /// `Unknown` absorbs everything.
    pub fn union(&mut self, members: impl IntoIterator<Item = TypeId>) -> TypeId {
        let mut flat: IndexSet<TypeId> = IndexSet::default();
        for member in members {
            match self.kind(member) {
                TypeKind::Unknown => return self.unknown,
                TypeKind::Never => {}
                TypeKind::Union(inner) => flat.extend(inner.iter().copied()),
                _ => {
                    flat.insert(member);
                }
            }
        }

        if flat.contains(&self.true_type) && flat.contains(&self.false_type) {
            let at = flat
                .get_index_of(&self.true_type)
                .into_iter()
                .chain(flat.get_index_of(&self.false_type))
                .min()
                .unwrap_or(0);
            flat.shift_remove(&self.true_type);
            flat.shift_remove(&self.false_type);
            if !flat.contains(&self.boolean) {
                flat.shift_insert(at.min(flat.len()), self.boolean);
            }
        }

        let absorbed: Vec<TypeId> = flat
            .iter()
            .copied()
            .filter(|&id| match self.kind(id) {
                TypeKind::Literal(value) => flat.contains(&self.primitive(value.primitive())),
                _ => false,
            })
            .collect();
        for id in absorbed {
            flat.shift_remove(&id);
        }

        match flat.len() {
            0 => self.never,
            1 => flat[0],
            _ => self.intern(TypeKind::Union(flat.into_iter().collect())),
        }
    }

    /// Resolve `a & b` to a concrete type.
    pub fn intersection(&mut self, a: TypeId, b: TypeId) -> TypeId {
        if a == b {
            return a;
        }
        match (self.kind(a).clone(), self.kind(b).clone()) {
            (TypeKind::Unknown, _) | (_, TypeKind::Unknown) => self.unknown,
            (TypeKind::Never, _) | (_, TypeKind::Never) => self.never,
            (TypeKind::Union(members), _) => {
                let parts: Vec<TypeId> = members
                    .into_iter()
                    .map(|m| self.intersection(m, b))
                    .collect();
                self.union(parts)
            }
            (_, TypeKind::Union(members)) => {
                let parts: Vec<TypeId> = members
                    .into_iter()
                    .map(|m| self.intersection(a, m))
                    .collect();
                self.union(parts)
            }
            (TypeKind::Literal(value), TypeKind::Primitive(p))
                if value.primitive() == p =>
            {
                a
            }
            (TypeKind::Primitive(p), TypeKind::Literal(value))
                if value.primitive() == p =>
            {
                b
            }
            // Not built yet; keep the reference.
            (TypeKind::Pending, _) => a,
            (_, TypeKind::Pending) => b,
            (TypeKind::Object(left), TypeKind::Object(right)) => {
                self.intersect_objects(a, b, left, right)
            }
            (TypeKind::Function(signature), TypeKind::Object(mut shape))
            | (TypeKind::Object(mut shape), TypeKind::Function(signature)) => {
                if shape.call.is_none() {
                    shape.call = Some(signature);
                }
                self.object(shape)
            }
            (TypeKind::Array(x), TypeKind::Array(y)) => {
                let element = self.intersection(x, y);
                self.array(element)
            }
            (TypeKind::Tuple(xs), TypeKind::Tuple(ys)) if xs.len() == ys.len() => {
                let elements: Vec<TypeId> = xs
                    .into_iter()
                    .zip(ys)
                    .map(|(x, y)| self.intersection(x, y))
                    .collect();
                if elements.iter().any(|&e| e == self.never) {
                    self.never
                } else {
                    self.tuple(elements)
                }
            }
            _ => self.never,
        }
    }

    /// Merge two object types. Recursive members that lead back to the same
    /// pair refer to the merged type itself.
    fn intersect_objects(
        &mut self,
        a: TypeId,
        b: TypeId,
        left: ObjectShape,
        right: ObjectShape,
    ) -> TypeId {
        if let Some(at) = self.intersecting.iter().position(|(pair, _)| *pair == (a, b)) {
            if let Some(reserved) = self.intersecting[at].1 {
                return reserved;
            }
            let reserved = self.reserve();
            self.intersecting[at].1 = Some(reserved);
            return reserved;
        }
        self.intersecting.push(((a, b), None));
        let merged = self.merge_shapes(left, right);
        let reserved = self.intersecting.pop().and_then(|(_, reserved)| reserved);
        match reserved {
            Some(id) => {
                self.define(id, TypeKind::Object(merged));
                id
            }
            None => self.object(merged),
        }
    }

    fn merge_shapes(&mut self, left: ObjectShape, right: ObjectShape) -> ObjectShape {
        let mut properties = left.properties;
        for prop in right.properties {
            match properties.iter().position(|p| p.name == prop.name) {
                Some(i) => {
                    let existing = properties[i];
                    let ty = self.intersection(existing.ty, prop.ty);
                    properties[i] = PropertyInfo {
                        name: prop.name,
                        ty,
                        optional: existing.optional && prop.optional,
                        readonly: existing.readonly || prop.readonly,
                    };
                }
                None => properties.push(prop),
            }
        }
        let string_index = match (left.string_index, right.string_index) {
            (Some(x), Some(y)) => Some(self.intersection(x, y)),
            (x, y) => x.or(y),
        };
        ObjectShape {
            properties,
            string_index,
            call: left.call.or(right.call),
            construct: left.construct.or(right.construct),
        }
    }

    /// Replace literals with their primitives, through unions, arrays,
    /// tuples and object properties.
    pub fn widen(&mut self, id: TypeId) -> TypeId {
        match self.kind(id).clone() {
            TypeKind::Literal(value) => self.primitive(value.primitive()),
            TypeKind::Union(members) => {
                let widened: Vec<TypeId> = members.into_iter().map(|m| self.widen(m)).collect();
                self.union(widened)
            }
            TypeKind::Array(element) => {
                let element = self.widen(element);
                self.array(element)
            }
            TypeKind::Tuple(elements) => {
                let elements = elements.into_iter().map(|e| self.widen(e)).collect();
                self.tuple(elements)
            }
            TypeKind::Object(mut shape) if self.name_of(id).is_none() && !self.is_recursive(id) => {
                for prop in shape.properties.iter_mut() {
                    prop.ty = self.widen(prop.ty);
                }
                self.object(shape)
            }
            _ => id,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Members of a union, or the type itself.
    pub fn constituents(&self, id: TypeId) -> Vec<TypeId> {
        match self.kind(id) {
            TypeKind::Union(members) => members.clone(),
            _ => vec![id],
        }
    }

    /// Like [`TypeTable::constituents`], with `boolean` split into
    /// `true` and `false`.
    pub fn constituents_expanded(&self, id: TypeId) -> Vec<TypeId> {
        let mut out = Vec::new();
        for member in self.constituents(id) {
            if member == self.boolean {
                out.push(self.true_type);
                out.push(self.false_type);
            } else {
                out.push(member);
            }
        }
        out
    }

    /// Keep the constituents matching `keep`. `boolean` is split first so
    /// a predicate can keep only one of its literals.
    pub fn filter(&mut self, id: TypeId, mut keep: impl FnMut(&TypeTable, TypeId) -> bool) -> TypeId {
        let members: Vec<TypeId> = self
            .constituents_expanded(id)
            .into_iter()
            .filter(|&m| keep(self, m))
            .collect();
        self.union(members)
    }

    pub fn is_unknown(&self, id: TypeId) -> bool {
        id == self.unknown
    }

    pub fn is_union(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Union(_))
    }

    pub fn is_nullish(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Primitive(p) if p.is_nullish())
    }

    /// Whether the type is or contains `null`, `undefined` or `void`.
    pub fn has_nullish(&self, id: TypeId) -> bool {
        self.constituents(id).into_iter().any(|m| self.is_nullish(m))
    }

    pub fn remove_nullish(&mut self, id: TypeId) -> TypeId {
        self.filter(id, |t, m| !t.is_nullish(m))
    }

    pub fn contains_literal(&self, id: TypeId) -> bool {
        self.constituents(id)
            .into_iter()
            .any(|m| matches!(self.kind(m), TypeKind::Literal(_)))
    }

    /// Whether `member` is `id` or one of its union members.
    pub fn contains(&self, id: TypeId, member: TypeId) -> bool {
        id == member || self.constituents(id).contains(&member)
    }

    /// Element type of an array. Tuples answer `None`; their elements are
    /// read by position.
    pub fn element_type(&self, id: TypeId) -> Option<TypeId> {
        match self.kind(id) {
            TypeKind::Array(element) => Some(*element),
            _ => None,
        }
    }

    pub fn construct_signature_of(&self, id: TypeId) -> Option<&Signature> {
        match self.kind(id) {
            TypeKind::Object(shape) => shape.construct.as_ref(),
            _ => None,
        }
    }

    /// The call signature of a function or callable object.
    pub fn signature_of(&self, id: TypeId) -> Option<&Signature> {
        match self.kind(id) {
            TypeKind::Function(signature) => Some(signature),
            TypeKind::Object(shape) => shape.call.as_ref(),
            _ => None,
        }
    }

    pub fn literal_value(&self, id: TypeId) -> Option<LiteralValue> {
        match self.kind(id) {
            TypeKind::Literal(value) => Some(*value),
            _ => None,
        }
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Render a type the way it would be written in source.
    pub fn display(&self, id: TypeId) -> String {
        self.display_inner(id, 0)
    }

    fn display_inner(&self, id: TypeId, depth: u32) -> String {
        if depth > MAX_DISPLAY_DEPTH {
            return "...".to_string();
        }
        if let Some(name) = self.name_of(id) {
            return self.interner.resolve(name).to_string();
        }
        match self.kind(id) {
            TypeKind::Unknown | TypeKind::Pending => "any".to_string(),
            TypeKind::Never => "never".to_string(),
            TypeKind::Primitive(p) => p.name().to_string(),
            TypeKind::Literal(value) => self.display_literal(*value),
            TypeKind::Union(members) => members
                .iter()
                .map(|&m| self.display_member(m, depth + 1))
                .collect::<Vec<_>>()
                .join(" | "),
            TypeKind::Array(element) => {
                format!("{}[]", self.display_member(*element, depth + 1))
            }
            TypeKind::Tuple(elements) => {
                let parts = elements
                    .iter()
                    .map(|&e| self.display_inner(e, depth + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", parts)
            }
            TypeKind::Function(signature) => {
                format!(
                    "{} => {}",
                    self.display_params(signature, depth),
                    self.display_inner(signature.return_type, depth + 1)
                )
            }
            TypeKind::Object(shape) => self.display_object(shape, depth),
        }
    }

    /// Parenthesize unions and functions where they would otherwise bind
    /// wrongly (`(string | number)[]`, `(() => void) | undefined`).
    fn display_member(&self, id: TypeId, depth: u32) -> String {
        let text = self.display_inner(id, depth);
        let needs_parens = self.name_of(id).is_none()
            && matches!(self.kind(id), TypeKind::Union(_) | TypeKind::Function(_));
        if needs_parens {
            format!("({})", text)
        } else {
            text
        }
    }

    fn display_literal(&self, value: LiteralValue) -> String {
        match value {
            LiteralValue::String(atom) => format!("\"{}\"", self.interner.resolve(atom)),
            LiteralValue::Number(n) => format_number(n),
            LiteralValue::Boolean(b) => b.to_string(),
        }
    }

    fn display_params(&self, signature: &Signature, depth: u32) -> String {
        let params = signature
            .params
            .iter()
            .map(|p| {
                let name = self.interner.resolve(p.name);
                let ty = self.display_inner(p.ty, depth + 1);
                if p.rest {
                    format!("...{}: {}", name, ty)
                } else if p.optional {
                    format!("{}?: {}", name, ty)
                } else {
                    format!("{}: {}", name, ty)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("({})", params)
    }

    fn display_object(&self, shape: &ObjectShape, depth: u32) -> String {
        if shape.is_empty() {
            return "{}".to_string();
        }
        let mut parts = Vec::new();
        if let Some(call) = &shape.call {
            parts.push(format!(
                "{}: {};",
                self.display_params(call, depth),
                self.display_inner(call.return_type, depth + 1)
            ));
        }
        if let Some(construct) = &shape.construct {
            parts.push(format!(
                "new {}: {};",
                self.display_params(construct, depth),
                self.display_inner(construct.return_type, depth + 1)
            ));
        }
        if let Some(index) = shape.string_index {
            parts.push(format!("[key: string]: {};", self.display_inner(index, depth + 1)));
        }
        for prop in &shape.properties {
            let readonly = if prop.readonly { "readonly " } else { "" };
            let optional = if prop.optional { "?" } else { "" };
            parts.push(format!(
                "{}{}{}: {};",
                readonly,
                self.interner.resolve(prop.name),
                optional,
                self.display_inner(prop.ty, depth + 1)
            ));
        }
        format!("{{ {} }}", parts.join(" "))
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        n.to_string()
    }
}

impl std::fmt::Debug for TypeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeTable")
            .field("len", &self.types.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TypeTable {
        TypeTable::new(Interner::new())
    }

    #[test]
    fn test_hash_consing() {
        let mut t = table();
        let a = t.array(t.string);
        let b = t.array(t.string);
        assert_eq!(a, b);
        assert_ne!(a, t.array(t.number));
    }

    #[test]
    fn test_union_order_independent_identity() {
        let mut t = table();
        let sn = t.union([t.string, t.number]);
        let ns = t.union([t.number, t.string]);
        assert_eq!(sn, ns);
        assert_eq!(t.display(sn), "string | number");
    }

    #[test]
    fn test_union_normalization() {
        let mut t = table();
        let ada = t.string_literal("Ada");
        assert_eq!(t.union([ada, t.string]), t.string);
        assert_eq!(t.union([t.true_type, t.false_type]), t.boolean);
        assert_eq!(t.union([t.never, t.number]), t.number);
        assert_eq!(t.union(std::iter::empty()), t.never);
        assert_eq!(t.union([t.unknown, t.number]), t.unknown);

        let inner = t.union([t.string, t.number]);
        let outer = t.union([inner, t.boolean]);
        match t.kind(outer) {
            TypeKind::Union(members) => {
                assert_eq!(members.len(), 3);
                assert!(members.iter().all(|&m| !t.is_union(m)));
            }
            other => panic!("expected a union, got {:?}", other),
        }
    }

    #[test]
    fn test_object_identity_ignores_member_order() {
        let mut t = table();
        let interner = t.interner().clone();
        let name = interner.intern("name");
        let born = interner.intern("born");
        let a = t.object(ObjectShape {
            properties: vec![PropertyInfo::new(name, t.string), PropertyInfo::new(born, t.number)],
            ..ObjectShape::default()
        });
        let b = t.object(ObjectShape {
            properties: vec![PropertyInfo::new(born, t.number), PropertyInfo::new(name, t.string)],
            ..ObjectShape::default()
        });
        assert_eq!(a, b);
        assert_eq!(t.display(a), "{ name: string; born: number; }");
    }

    #[test]
    fn test_display() {
        let mut t = table();
        let sn = t.union([t.string, t.number]);
        let arr = t.array(sn);
        assert_eq!(t.display(arr), "(string | number)[]");
        let tuple = t.tuple(vec![t.number, t.string]);
        assert_eq!(t.display(tuple), "[number, string]");
        let seven = t.number_literal(7.0);
        assert_eq!(t.display(seven), "7");
        let song = t.interner().intern("song");
        let f = t.function(Signature {
            params: vec![ParamInfo {
                name: song,
                ty: t.string,
                optional: false,
                rest: false,
            }],
            return_type: t.string,
        });
        assert_eq!(t.display(f), "(song: string) => string");
        let maybe = t.union([f, t.undefined]);
        assert_eq!(t.display(maybe), "((song: string) => string) | undefined");
    }

    #[test]
    fn test_widen() {
        let mut t = table();
        let ada = t.string_literal("Ada");
        let one = t.number_literal(1.0);
        let u = t.union([ada, one]);
        let widened = t.widen(u);
        assert_eq!(widened, t.union([t.string, t.number]));
        assert_eq!(t.widen(t.true_type), t.boolean);
    }

    #[test]
    fn test_intersection() {
        let mut t = table();
        assert_eq!(t.intersection(t.string, t.number), t.never);
        let ada = t.string_literal("Ada");
        assert_eq!(t.intersection(ada, t.string), ada);

        let interner = t.interner().clone();
        let author = interner.intern("author");
        let pages = interner.intern("pages");
        let a = t.object(ObjectShape {
            properties: vec![PropertyInfo::new(author, t.string)],
            ..ObjectShape::default()
        });
        let b = t.object(ObjectShape {
            properties: vec![PropertyInfo::new(pages, t.number)],
            ..ObjectShape::default()
        });
        let merged = t.intersection(a, b);
        assert_eq!(t.display(merged), "{ author: string; pages: number; }");

        let sn = t.union([t.string, t.number]);
        assert_eq!(t.intersection(sn, t.string), t.string);
    }

    #[test]
    fn test_named_object_display() {
        let mut t = table();
        let name = t.interner().intern("name");
        let poet = t.interner().intern("Poet");
        let obj = t.object(ObjectShape {
            properties: vec![PropertyInfo::new(name, t.string)],
            ..ObjectShape::default()
        });
        t.set_name(obj, poet);
        t.set_name(t.string, poet);
        assert_eq!(t.display(obj), "Poet");
        assert_eq!(t.display(t.string), "string");
    }

    #[test]
    fn test_element_type_is_for_arrays_only() {
        let mut t = TypeTable::new(Interner::new());
        let strings = t.array(t.string);
        let pair = t.tuple(vec![t.string, t.number]);
        assert_eq!(t.element_type(strings), Some(t.string));
        assert_eq!(t.element_type(pair), None);
        assert_eq!(t.element_type(t.string), None);
    }
}
