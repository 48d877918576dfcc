//! Structural comparison of object types.
//!
//! Compatibility is decided by member sets, never by declared names. These
//! helpers back the relation's diagnostics ("missing property P") and the
//! interface-merging check for novel versus equivalent shapes.

use crate::builtins;
use crate::relation::Relation;
use crate::types::{PropertyInfo, TypeId, TypeKind, TypeTable};
use minits_core::intern::Atom;

/// Look up a member on any type.
///
/// Objects answer from their properties, then from their string index
/// signature. Primitives, arrays and tuples answer from their apparent
/// members. A union has a member only if every constituent has it; the
/// member's type is then the union of the constituent member types.
pub fn property_of(table: &mut TypeTable, ty: TypeId, name: Atom) -> Option<PropertyInfo> {
    match table.kind(ty).clone() {
        TypeKind::Unknown => Some(PropertyInfo::new(name, table.unknown)),
        TypeKind::Object(shape) => {
            if let Some(prop) = shape.property(name) {
                return Some(*prop);
            }
            shape.string_index.map(|index| PropertyInfo::new(name, index))
        }
        TypeKind::Union(members) => {
            let mut types = Vec::with_capacity(members.len());
            let mut optional = false;
            let mut readonly = false;
            for member in members {
                let prop = property_of(table, member, name)?;
                types.push(prop.ty);
                optional |= prop.optional;
                readonly |= prop.readonly;
            }
            let ty = table.union(types);
            Some(PropertyInfo {
                name,
                ty,
                optional,
                readonly,
            })
        }
        TypeKind::Primitive(_) | TypeKind::Literal(_) | TypeKind::Array(_) | TypeKind::Tuple(_) => {
            let text = table.interner().resolve(name).to_string();
            let member = builtins::apparent_member(table, ty, &text)?;
            let readonly = matches!(table.kind(ty), TypeKind::Tuple(_)) && text == "length";
            Some(PropertyInfo {
                readonly,
                ..PropertyInfo::new(name, member)
            })
        }
        TypeKind::Never | TypeKind::Function(_) | TypeKind::Pending => None,
    }
}

/// Constituents of `ty` that lack the member `name`.
pub fn constituents_missing(table: &mut TypeTable, ty: TypeId, name: Atom) -> Vec<TypeId> {
    table
        .constituents(ty)
        .into_iter()
        .filter(|&member| property_of(table, member, name).is_none())
        .collect()
}

/// Member names of a type, in declaration order. For a union, the names
/// common to every constituent.
pub fn member_names(table: &TypeTable, ty: TypeId) -> Vec<Atom> {
    match table.kind(ty) {
        TypeKind::Object(shape) => shape.properties.iter().map(|p| p.name).collect(),
        TypeKind::Union(members) => {
            let mut members = members.iter();
            let Some(&first) = members.next() else {
                return Vec::new();
            };
            let mut names = member_names(table, first);
            for &member in members {
                let other = member_names(table, member);
                names.retain(|n| other.contains(n));
            }
            names
        }
        _ => {
            let interner = table.interner();
            builtins::apparent_member_names(table, ty)
                .iter()
                .map(|name| interner.intern_static(name))
                .collect()
        }
    }
}

/// Names of the members present on both types, in `a`'s order.
pub fn shares_capabilities(table: &TypeTable, a: TypeId, b: TypeId) -> Vec<Atom> {
    let theirs = member_names(table, b);
    member_names(table, a)
        .into_iter()
        .filter(|name| theirs.contains(name))
        .collect()
}

/// Required members of `target` absent from `source`, in `target`'s
/// declaration order.
pub fn missing_members(table: &TypeTable, source: TypeId, target: TypeId) -> Vec<Atom> {
    let TypeKind::Object(shape) = table.kind(target) else {
        return Vec::new();
    };
    let present = member_names(table, source);
    shape
        .required()
        .map(|p| p.name)
        .filter(|name| !present.contains(name))
        .collect()
}

/// Whether two types have the same shape: equal sets of required member
/// names, with each pair of corresponding member types mutually
/// assignable. Non-object types have the same shape when mutually
/// assignable.
pub fn same_shape(relation: &mut Relation, table: &TypeTable, a: TypeId, b: TypeId) -> bool {
    if a == b {
        return true;
    }
    match (table.kind(a), table.kind(b)) {
        (TypeKind::Object(left), TypeKind::Object(right)) => {
            let left_required: Vec<&PropertyInfo> = left.required().collect();
            let right_required: Vec<&PropertyInfo> = right.required().collect();
            if left_required.len() != right_required.len() {
                return false;
            }
            left_required.iter().all(|lp| {
                right.property(lp.name).is_some_and(|rp| {
                    !rp.optional
                        && relation.is_assignable(table, lp.ty, rp.ty)
                        && relation.is_assignable(table, rp.ty, lp.ty)
                })
            })
        }
        _ => relation.is_assignable(table, a, b) && relation.is_assignable(table, b, a),
    }
}
