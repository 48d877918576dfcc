//! The narrowing engine.
//!
//! The checker recognizes a [`Guard`] in an `if` or `?:` condition; the
//! guard computes, for each branch, the refined type of every binding it
//! mentions. Refinements are pushed onto the bindings' narrowing stacks by
//! the caller and popped when the branch scope ends.

use crate::types::{LiteralValue, PrimitiveKind, TypeId, TypeKind, TypeTable};
use minits_core::intern::Atom;
use rustc_hash::FxHashMap;

/// The tag strings `typeof` can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeofTag {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Undefined,
    Object,
    Function,
}

impl TypeofTag {
    pub fn parse(tag: &str) -> Option<Self> {
        Some(match tag {
            "string" => TypeofTag::String,
            "number" => TypeofTag::Number,
            "boolean" => TypeofTag::Boolean,
            "bigint" => TypeofTag::BigInt,
            "symbol" => TypeofTag::Symbol,
            "undefined" => TypeofTag::Undefined,
            "object" => TypeofTag::Object,
            "function" => TypeofTag::Function,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeofTag::String => "string",
            TypeofTag::Number => "number",
            TypeofTag::Boolean => "boolean",
            TypeofTag::BigInt => "bigint",
            TypeofTag::Symbol => "symbol",
            TypeofTag::Undefined => "undefined",
            TypeofTag::Object => "object",
            TypeofTag::Function => "function",
        }
    }

    /// The primitive a tag pins an unknown value to, if any.
    fn primitive(self) -> Option<PrimitiveKind> {
        match self {
            TypeofTag::String => Some(PrimitiveKind::String),
            TypeofTag::Number => Some(PrimitiveKind::Number),
            TypeofTag::Boolean => Some(PrimitiveKind::Boolean),
            TypeofTag::BigInt => Some(PrimitiveKind::BigInt),
            TypeofTag::Symbol => Some(PrimitiveKind::Symbol),
            TypeofTag::Undefined => Some(PrimitiveKind::Undefined),
            TypeofTag::Object | TypeofTag::Function => None,
        }
    }
}

/// The runtime `typeof` tag of a non-union type. `None` for `Unknown`,
/// whose tag is not known statically.
pub fn typeof_tag_of(table: &TypeTable, ty: TypeId) -> Option<TypeofTag> {
    Some(match table.kind(ty) {
        TypeKind::Unknown | TypeKind::Never | TypeKind::Union(_) | TypeKind::Pending => return None,
        TypeKind::Primitive(p) => match p {
            PrimitiveKind::String => TypeofTag::String,
            PrimitiveKind::Number => TypeofTag::Number,
            PrimitiveKind::Boolean => TypeofTag::Boolean,
            PrimitiveKind::BigInt => TypeofTag::BigInt,
            PrimitiveKind::Symbol => TypeofTag::Symbol,
            PrimitiveKind::Undefined | PrimitiveKind::Void => TypeofTag::Undefined,
            PrimitiveKind::Null => TypeofTag::Object,
        },
        TypeKind::Literal(value) => match value {
            LiteralValue::String(_) => TypeofTag::String,
            LiteralValue::Number(_) => TypeofTag::Number,
            LiteralValue::Boolean(_) => TypeofTag::Boolean,
        },
        TypeKind::Object(shape) if shape.call.is_some() => TypeofTag::Function,
        TypeKind::Function(_) => TypeofTag::Function,
        TypeKind::Object(_) | TypeKind::Array(_) | TypeKind::Tuple(_) => TypeofTag::Object,
    })
}

/// Refine `ty` by `typeof x === tag` (or `!==` when `assume_true` is false).
pub fn narrow_by_typeof(table: &mut TypeTable, ty: TypeId, tag: TypeofTag, assume_true: bool) -> TypeId {
    if table.is_unknown(ty) {
        return match (assume_true, tag.primitive()) {
            (true, Some(p)) => table.primitive(p),
            _ => ty,
        };
    }
    table.filter(ty, |t, member| {
        (typeof_tag_of(t, member) == Some(tag)) == assume_true
    })
}

/// Refine `ty` by `x === value` (`!==` when `assume_true` is false).
///
/// With `loose` (`==`/`!=`), `null` and `undefined` compare equal to each
/// other.
pub fn narrow_by_equality(
    table: &mut TypeTable,
    ty: TypeId,
    value: TypeId,
    assume_true: bool,
    loose: bool,
) -> TypeId {
    if table.is_nullish(value) {
        let matches = |t: &TypeTable, member: TypeId| {
            if loose {
                t.is_nullish(member)
            } else if value == t.null {
                member == t.null
            } else {
                member == t.undefined || member == t.void
            }
        };
        if table.is_unknown(ty) {
            return if assume_true { value } else { ty };
        }
        return table.filter(ty, |t, member| matches(t, member) == assume_true);
    }

    let Some(literal) = table.literal_value(value) else {
        return ty;
    };
    if table.is_unknown(ty) {
        return ty;
    }

    if assume_true {
        let family = table.primitive(literal.primitive());
        let narrowed: Vec<TypeId> = table
            .constituents_expanded(ty)
            .into_iter()
            .filter_map(|member| {
                if member == value || member == family {
                    Some(value)
                } else {
                    None
                }
            })
            .collect();
        table.union(narrowed)
    } else {
        table.filter(ty, |_, member| member != value)
    }
}

/// Refine `ty` by truthiness.
///
/// The true branch drops `null`, `undefined`, `void`, `false`, `""` and `0`.
/// The false branch keeps what can be falsy: nullish types, `false`, the
/// falsy literals, and the `string`/`number` primitives, which are not split
/// further.
pub fn narrow_by_truthiness(table: &mut TypeTable, ty: TypeId, assume_true: bool) -> TypeId {
    if table.is_unknown(ty) {
        return ty;
    }
    if assume_true {
        table.filter(ty, |t, member| !is_definitely_falsy(t, member))
    } else {
        table.filter(ty, can_be_falsy)
    }
}

fn literal_is_falsy(table: &TypeTable, value: LiteralValue) -> bool {
    match value {
        LiteralValue::Boolean(b) => !b,
        LiteralValue::Number(n) => n == 0.0 || n.is_nan(),
        LiteralValue::String(atom) => table.interner().resolve(atom).is_empty(),
    }
}

fn is_definitely_falsy(table: &TypeTable, member: TypeId) -> bool {
    match table.kind(member) {
        TypeKind::Primitive(p) => p.is_nullish(),
        TypeKind::Literal(value) => literal_is_falsy(table, *value),
        _ => false,
    }
}

fn can_be_falsy(table: &TypeTable, member: TypeId) -> bool {
    match table.kind(member) {
        TypeKind::Primitive(_) => true,
        TypeKind::Literal(value) => literal_is_falsy(table, *value),
        TypeKind::Unknown => true,
        _ => false,
    }
}

// ============================================================================
// Guards
// ============================================================================

/// A condition the engine knows how to refine by.
#[derive(Debug, Clone, PartialEq)]
pub enum Guard {
    /// `typeof x === "tag"`
    Typeof { binding: Atom, tag: TypeofTag },
    /// `x === value`, or `x == value` when `loose`
    Equality {
        binding: Atom,
        value: TypeId,
        loose: bool,
    },
    /// `x`
    Truthy { binding: Atom },
    /// `!g`, and the `!==`/`!=` forms
    Not(Box<Guard>),
    /// `g1 && g2`
    And(Box<Guard>, Box<Guard>),
    /// `g1 || g2`
    Or(Box<Guard>, Box<Guard>),
    /// A condition that refines nothing, such as a call.
    Opaque,
}

impl Guard {
    pub fn negate(self) -> Guard {
        match self {
            Guard::Not(inner) => *inner,
            other => Guard::Not(Box::new(other)),
        }
    }

    /// Refined types, per binding, when the guard evaluates to `assume_true`.
    ///
    /// `current` gives a binding's type before the guard; bindings it does
    /// not know are left alone.
    pub fn narrowings(
        &self,
        table: &mut TypeTable,
        current: &dyn Fn(Atom) -> Option<TypeId>,
        assume_true: bool,
    ) -> Vec<(Atom, TypeId)> {
        match self {
            Guard::Typeof { binding, tag } => match current(*binding) {
                Some(ty) => vec![(*binding, narrow_by_typeof(table, ty, *tag, assume_true))],
                None => Vec::new(),
            },
            Guard::Equality {
                binding,
                value,
                loose,
            } => match current(*binding) {
                Some(ty) => vec![(
                    *binding,
                    narrow_by_equality(table, ty, *value, assume_true, *loose),
                )],
                None => Vec::new(),
            },
            Guard::Truthy { binding } => match current(*binding) {
                Some(ty) => vec![(*binding, narrow_by_truthiness(table, ty, assume_true))],
                None => Vec::new(),
            },
            Guard::Not(inner) => inner.narrowings(table, current, !assume_true),
            Guard::Opaque => Vec::new(),
            Guard::And(left, right) => {
                if assume_true {
                    Self::sequence(table, current, left, right, true)
                } else {
                    Self::alternatives(table, current, left, right, false)
                }
            }
            Guard::Or(left, right) => {
                if assume_true {
                    Self::alternatives(table, current, left, right, true)
                } else {
                    Self::sequence(table, current, left, right, false)
                }
            }
        }
    }

    /// Both operands hold with the same outcome: apply `left`, then `right`
    /// on top of it.
    fn sequence(
        table: &mut TypeTable,
        current: &dyn Fn(Atom) -> Option<TypeId>,
        left: &Guard,
        right: &Guard,
        outcome: bool,
    ) -> Vec<(Atom, TypeId)> {
        let first = left.narrowings(table, current, outcome);
        let overlay: FxHashMap<Atom, TypeId> = first.iter().copied().collect();
        let lookup = |name: Atom| overlay.get(&name).copied().or_else(|| current(name));
        let second = right.narrowings(table, &lookup, outcome);

        let mut merged = first;
        for (name, ty) in second {
            match merged.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = ty,
                None => merged.push((name, ty)),
            }
        }
        merged
    }

    /// Either `left` has `outcome`, or `left` has the opposite outcome and
    /// `right` has `outcome`. Only bindings refined on both paths are
    /// refined, to the union of the two refinements.
    fn alternatives(
        table: &mut TypeTable,
        current: &dyn Fn(Atom) -> Option<TypeId>,
        left: &Guard,
        right: &Guard,
        outcome: bool,
    ) -> Vec<(Atom, TypeId)> {
        let via_left = left.narrowings(table, current, outcome);
        let negated = left.narrowings(table, current, !outcome);
        let overlay: FxHashMap<Atom, TypeId> = negated.iter().copied().collect();
        let lookup = |name: Atom| overlay.get(&name).copied().or_else(|| current(name));
        let mut via_right = right.narrowings(table, &lookup, outcome);
        for (name, ty) in negated {
            if !via_right.iter().any(|(n, _)| *n == name) {
                via_right.push((name, ty));
            }
        }

        via_left
            .into_iter()
            .filter_map(|(name, a)| {
                let (_, b) = via_right.iter().copied().find(|(n, _)| *n == name)?;
                Some((name, table.union([a, b])))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minits_core::intern::Interner;

    #[test]
    fn test_typeof_round_trip() {
        let mut t = TypeTable::new(Interner::new());
        let sn = t.union([t.string, t.number]);
        assert_eq!(narrow_by_typeof(&mut t, sn, TypeofTag::String, true), t.string);
        assert_eq!(narrow_by_typeof(&mut t, sn, TypeofTag::String, false), t.number);
    }

    #[test]
    fn test_typeof_includes_literals() {
        let mut t = TypeTable::new(Interner::new());
        let ada = t.string_literal("Ada");
        let u = t.union([ada, t.number, t.boolean]);
        assert_eq!(narrow_by_typeof(&mut t, u, TypeofTag::String, true), ada);
        let rest = narrow_by_typeof(&mut t, u, TypeofTag::String, false);
        assert_eq!(t.display(rest), "number | boolean");
    }

    #[test]
    fn test_typeof_object_includes_null() {
        let mut t = TypeTable::new(Interner::new());
        let arr = t.array(t.string);
        let u = t.union([arr, t.null, t.string]);
        let objects = narrow_by_typeof(&mut t, u, TypeofTag::Object, true);
        assert_eq!(t.display(objects), "string[] | null");
    }

    #[test]
    fn test_typeof_unknown() {
        let mut t = TypeTable::new(Interner::new());
        let (number, unknown) = (t.number, t.unknown);
        assert_eq!(narrow_by_typeof(&mut t, unknown, TypeofTag::Number, true), number);
        let unknown = t.unknown;
        assert_eq!(narrow_by_typeof(&mut t, unknown, TypeofTag::Number, false), unknown);
    }

    #[test]
    fn test_equality_with_member_literal() {
        let mut t = TypeTable::new(Interner::new());
        let a = t.string_literal("a");
        let b = t.string_literal("b");
        let ab = t.union([a, b]);
        assert_eq!(narrow_by_equality(&mut t, ab, a, true, false), a);
        assert_eq!(narrow_by_equality(&mut t, ab, a, false, false), b);

        let c = t.string_literal("c");
        assert_eq!(narrow_by_equality(&mut t, ab, c, true, false), t.never);
    }

    #[test]
    fn test_equality_with_primitive_family() {
        let mut t = TypeTable::new(Interner::new());
        let sn = t.union([t.string, t.number]);
        let rosalind = t.string_literal("Rosalind Franklin");
        assert_eq!(narrow_by_equality(&mut t, sn, rosalind, true, false), rosalind);
        assert_eq!(narrow_by_equality(&mut t, sn, rosalind, false, false), sn);
    }

    #[test]
    fn test_loose_null_equality() {
        let mut t = TypeTable::new(Interner::new());
        let u = t.union([t.string, t.null, t.undefined]);
        let (null, string) = (t.null, t.string);
        assert_eq!(narrow_by_equality(&mut t, u, null, false, true), string);
        let null = t.null;
        let nullish = narrow_by_equality(&mut t, u, null, true, true);
        assert_eq!(t.display(nullish), "null | undefined");
        let null = t.null;
        let strict = narrow_by_equality(&mut t, u, null, false, false);
        assert_eq!(t.display(strict), "string | undefined");
    }

    #[test]
    fn test_truthiness() {
        let mut t = TypeTable::new(Interner::new());
        let u = t.union([t.string, t.undefined, t.boolean]);
        let truthy = narrow_by_truthiness(&mut t, u, true);
        assert_eq!(t.display(truthy), "string | true");
        let falsy = narrow_by_truthiness(&mut t, u, false);
        assert_eq!(t.display(falsy), "string | undefined | false");
    }

    #[test]
    fn test_and_or_guards() {
        let mut t = TypeTable::new(Interner::new());
        let x = t.interner().intern("x");
        let sn = t.union([t.string, t.number, t.undefined]);
        let current = |name: Atom| if name == x { Some(sn) } else { None };

        let is_string = Guard::Typeof {
            binding: x,
            tag: TypeofTag::String,
        };
        let is_number = Guard::Typeof {
            binding: x,
            tag: TypeofTag::Number,
        };

        let either = Guard::Or(Box::new(is_string.clone()), Box::new(is_number.clone()));
        let narrowed = either.narrowings(&mut t, &current, true);
        assert_eq!(narrowed.len(), 1);
        assert_eq!(t.display(narrowed[0].1), "string | number");

        let neither = either.narrowings(&mut t, &current, false);
        assert_eq!(neither, vec![(x, t.undefined)]);

        let both = Guard::And(Box::new(Guard::Truthy { binding: x }), Box::new(is_string));
        let narrowed = both.narrowings(&mut t, &current, true);
        assert_eq!(narrowed, vec![(x, t.string)]);
    }

    #[test]
    fn test_opaque_operand_keeps_other_branch_sound() {
        let mut t = TypeTable::new(Interner::new());
        let x = t.interner().intern("x");
        let maybe = t.union([t.string, t.undefined]);
        let current = |name: Atom| if name == x { Some(maybe) } else { None };

        let guard = Guard::And(Box::new(Guard::Truthy { binding: x }), Box::new(Guard::Opaque));
        assert_eq!(guard.narrowings(&mut t, &current, true), vec![(x, t.string)]);
        let otherwise = guard.narrowings(&mut t, &current, false);
        assert_eq!(otherwise.len(), 1);
        assert_eq!(otherwise[0].1, maybe);
    }
}
