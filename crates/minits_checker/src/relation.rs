//! The assignability relation.
//!
//! `is_assignable(source, target)` decides whether a value of `source` may
//! be used where `target` is expected. `explain` re-walks a failed check and
//! reports the first member, position or signature part that broke it.
//!
//! The `Unknown` escape hatch is handled once, at the top of the worker.
//!
//! Recursive types are compared coinductively: a pair met again while it
//! is still being compared is assumed to hold. Verdicts resting on such an
//! assumption are only memoized once the assumed pair has settled, and a
//! `false` produced by the depth guard is never memoized.

use crate::types::{
    ObjectShape, PrimitiveKind, PropertyInfo, Signature, TypeId, TypeKind, TypeTable,
};
use minits_core::intern::Atom;
use minits_diagnostics::{messages, Diagnostic};
use minits_options::CheckerOptions;
use rustc_hash::FxHashMap;

/// Why an assignability check failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Reason {
    /// No rule relates the two types.
    Incompatible { source: TypeId, target: TypeId },
    /// A required target property is absent from the source.
    MissingProperty {
        name: Atom,
        source: TypeId,
        target: TypeId,
    },
    /// A property exists on both sides but its types do not relate.
    PropertyMismatch {
        name: Atom,
        source: TypeId,
        target: TypeId,
        inner: Box<Reason>,
    },
    /// Tuples of different lengths.
    TupleArity {
        source: TypeId,
        target: TypeId,
        source_len: usize,
        target_len: usize,
    },
    /// A tuple element does not relate to the element at the same position.
    TuplePosition { index: usize, inner: Box<Reason> },
    /// A variable-length array against a fixed-length tuple.
    ArrayToTuple { required: usize },
    /// The source signature needs more arguments than the target passes.
    Arity { source_required: usize, target_count: usize },
    /// A target parameter type is not assignable to the source parameter.
    Parameter {
        source_name: Atom,
        target_name: Atom,
        inner: Box<Reason>,
    },
    /// The source return type is not assignable to the target's.
    ReturnType {
        source: TypeId,
        target: TypeId,
        inner: Box<Reason>,
    },
    /// A member of a source union is not assignable to the target.
    UnionMember {
        member: TypeId,
        target: TypeId,
        inner: Box<Reason>,
    },
}

impl Reason {
    fn is_leaf(&self) -> bool {
        matches!(self, Reason::Incompatible { .. })
    }

    /// Render the reason as a diagnostic chain, outermost first.
    pub fn elaborate(&self, table: &TypeTable) -> Diagnostic {
        let interner = table.interner();
        match self {
            Reason::Incompatible { source, target } => Diagnostic::new(
                &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
                &[&table.display(*source), &table.display(*target)],
            ),
            Reason::MissingProperty {
                name,
                source,
                target,
            } => Diagnostic::new(
                &messages::PROPERTY_0_IS_MISSING_IN_TYPE_1_BUT_REQUIRED_IN_TYPE_2,
                &[
                    interner.resolve(*name),
                    &table.display(*source),
                    &table.display(*target),
                ],
            ),
            Reason::PropertyMismatch { name, inner, .. } => Diagnostic::new(
                &messages::TYPES_OF_PROPERTY_0_ARE_INCOMPATIBLE,
                &[interner.resolve(*name)],
            )
            .with_related(inner.elaborate(table)),
            Reason::TupleArity {
                source,
                target,
                source_len,
                target_len,
            } => {
                let message = if source_len > target_len {
                    &messages::SOURCE_HAS_0_ELEMENTS_BUT_TARGET_ALLOWS_ONLY_1
                } else {
                    &messages::SOURCE_HAS_0_ELEMENTS_BUT_TARGET_REQUIRES_1
                };
                Diagnostic::new(
                    message,
                    &[
                        &table.display(*source),
                        &table.display(*target),
                        &source_len.to_string(),
                        &target_len.to_string(),
                    ],
                )
            }
            Reason::TuplePosition { index, inner } => Diagnostic::new(
                &messages::TYPE_AT_POSITION_0_IS_INCOMPATIBLE,
                &[&index.to_string()],
            )
            .with_related(inner.elaborate(table)),
            Reason::ArrayToTuple { required } => Diagnostic::new(
                &messages::TARGET_REQUIRES_0_ELEMENTS_BUT_SOURCE_MAY_HAVE_FEWER,
                &[&required.to_string()],
            ),
            Reason::Arity {
                source_required,
                target_count,
            } => Diagnostic::new(
                &messages::TARGET_SIGNATURE_PROVIDES_TOO_FEW_ARGUMENTS,
                &[&source_required.to_string(), &target_count.to_string()],
            ),
            Reason::Parameter {
                source_name,
                target_name,
                inner,
            } => Diagnostic::new(
                &messages::TYPES_OF_PARAMETERS_0_AND_1_ARE_INCOMPATIBLE,
                &[interner.resolve(*source_name), interner.resolve(*target_name)],
            )
            .with_related(inner.elaborate(table)),
            Reason::ReturnType {
                source,
                target,
                inner,
            } => {
                let diag = Diagnostic::new(
                    &messages::RETURN_TYPES_ARE_INCOMPATIBLE,
                    &[&table.display(*source), &table.display(*target)],
                );
                if inner.is_leaf() {
                    diag
                } else {
                    diag.with_related(inner.elaborate(table))
                }
            }
            Reason::UnionMember {
                member,
                target,
                inner,
            } => {
                let diag = Diagnostic::new(
                    &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
                    &[&table.display(*member), &table.display(*target)],
                );
                if inner.is_leaf() {
                    diag
                } else {
                    diag.with_related(inner.elaborate(table))
                }
            }
        }
    }
}

/// Memoized assignability checker.
#[derive(Debug)]
pub struct Relation {
    /// Settled verdicts by `(source, target)`.
    cache: FxHashMap<(TypeId, TypeId), bool>,
    /// Pairs being compared, outermost first.
    in_progress: Vec<(TypeId, TypeId)>,
    /// `true` verdicts waiting on an assumed pair further out.
    provisional: Vec<(TypeId, TypeId)>,
    /// Outermost in-progress pair the current comparison assumed.
    assumed: Option<usize>,
    /// Set when the depth guard answered `false` during the current query.
    depth_exceeded: bool,
    /// Pairs being explained, to stop at a cycle.
    explaining: Vec<(TypeId, TypeId)>,
    max_depth: u32,
    strict_null_checks: bool,
}

impl Relation {
    pub fn new(options: &CheckerOptions) -> Self {
        Self {
            cache: FxHashMap::default(),
            in_progress: Vec::new(),
            provisional: Vec::new(),
            assumed: None,
            depth_exceeded: false,
            explaining: Vec::new(),
            max_depth: options.max_relation_depth,
            strict_null_checks: options.strict_null_checks,
        }
    }

    /// Forget every memoized verdict, e.g. after a reserved type was
    /// filled in.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.provisional.clear();
    }

    pub fn is_assignable(&mut self, table: &TypeTable, source: TypeId, target: TypeId) -> bool {
        if source == target {
            return true;
        }
        let pair = (source, target);
        if let Some(&result) = self.cache.get(&pair) {
            return result;
        }
        if let Some(at) = self.in_progress.iter().position(|&p| p == pair) {
            self.assumed = Some(self.assumed.map_or(at, |outer| outer.min(at)));
            return true;
        }
        let level = self.in_progress.len();
        if level >= self.max_depth as usize {
            tracing::trace!(
                source = source.index(),
                target = target.index(),
                depth = level,
                "relation depth limit reached"
            );
            self.depth_exceeded = true;
            return false;
        }

        let outer_assumed = self.assumed.take();
        let provisional_start = self.provisional.len();
        self.in_progress.push(pair);
        let result = self.is_assignable_worker(table, source, target);
        self.in_progress.pop();

        // Assumptions on this pair are settled now; outer ones are not.
        let still_assumed = self.assumed.filter(|&at| at < level);
        if !result {
            // Anything that held only because this pair was assumed is void.
            self.provisional.truncate(provisional_start);
            if !self.depth_exceeded {
                self.cache.insert(pair, false);
            }
        } else if still_assumed.is_some() {
            self.provisional.push(pair);
        } else {
            for settled in self.provisional.drain(provisional_start..) {
                self.cache.insert(settled, true);
            }
            self.cache.insert(pair, true);
        }
        self.assumed = match (outer_assumed, still_assumed) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if level == 0 {
            self.depth_exceeded = false;
            self.provisional.clear();
            self.assumed = None;
        }

        if !result {
            tracing::trace!(
                source = %table.display(source),
                target = %table.display(target),
                "not assignable"
            );
        }
        result
    }

    fn is_assignable_worker(&mut self, table: &TypeTable, source: TypeId, target: TypeId) -> bool {
        let source_kind = table.kind(source);
        let target_kind = table.kind(target);

        // The escape hatch.
        if matches!(source_kind, TypeKind::Unknown) || matches!(target_kind, TypeKind::Unknown) {
            return true;
        }
        if matches!(source_kind, TypeKind::Never) {
            return true;
        }
        if matches!(target_kind, TypeKind::Never) {
            return false;
        }
        if !self.strict_null_checks
            && matches!(
                source_kind,
                TypeKind::Primitive(PrimitiveKind::Null | PrimitiveKind::Undefined)
            )
        {
            return true;
        }

        if let TypeKind::Union(members) = source_kind {
            return members
                .iter()
                .all(|&m| self.is_assignable(table, m, target));
        }
        if let TypeKind::Union(members) = target_kind {
            return members
                .iter()
                .any(|&m| self.is_assignable(table, source, m));
        }

        match (source_kind, target_kind) {
            (TypeKind::Primitive(s), TypeKind::Primitive(t)) => {
                s == t || (*s == PrimitiveKind::Undefined && *t == PrimitiveKind::Void)
            }
            (TypeKind::Literal(value), TypeKind::Primitive(p)) => value.primitive() == *p,
            (TypeKind::Literal(_), TypeKind::Literal(_)) => false,

            (_, TypeKind::Object(t)) if t.is_empty() => !table.is_nullish(source),
            (TypeKind::Object(s), TypeKind::Object(t)) => self.is_object_assignable(table, s, t),
            (TypeKind::Function(s), TypeKind::Object(t)) => {
                t.properties.iter().all(|p| p.optional)
                    && t.string_index.is_none()
                    && t.construct.is_none()
                    && t
                        .call
                        .as_ref()
                        .is_some_and(|tc| self.is_signature_assignable(table, s, tc))
            }
            (TypeKind::Object(s), TypeKind::Function(t)) => s
                .call
                .as_ref()
                .is_some_and(|sc| self.is_signature_assignable(table, sc, t)),
            (TypeKind::Function(s), TypeKind::Function(t)) => {
                self.is_signature_assignable(table, s, t)
            }

            (TypeKind::Array(s), TypeKind::Array(t)) => self.is_assignable(table, *s, *t),
            (TypeKind::Tuple(s), TypeKind::Tuple(t)) => {
                s.len() == t.len()
                    && s
                        .iter()
                        .zip(t.iter())
                        .all(|(&se, &te)| self.is_assignable(table, se, te))
            }
            (TypeKind::Tuple(s), TypeKind::Array(t)) => {
                s.iter().all(|&se| self.is_assignable(table, se, *t))
            }
            (TypeKind::Array(_), TypeKind::Tuple(_)) => false,

            _ => false,
        }
    }

    fn is_object_assignable(
        &mut self,
        table: &TypeTable,
        source: &ObjectShape,
        target: &ObjectShape,
    ) -> bool {
        for target_prop in &target.properties {
            match source.property(target_prop.name) {
                Some(source_prop) => {
                    if source_prop.optional && !target_prop.optional {
                        return false;
                    }
                    if !self.is_member_assignable(table, source_prop.ty, target_prop) {
                        return false;
                    }
                }
                None => match source.string_index {
                    Some(index) if target_prop.optional => {
                        if !self.is_assignable(table, index, target_prop.ty) {
                            return false;
                        }
                    }
                    _ if target_prop.optional => {}
                    _ => return false,
                },
            }
        }

        if let Some(target_index) = target.string_index {
            for source_prop in &source.properties {
                if !self.is_assignable(table, source_prop.ty, target_index) {
                    return false;
                }
            }
            if let Some(source_index) = source.string_index {
                if !self.is_assignable(table, source_index, target_index) {
                    return false;
                }
            }
        }

        for (source_sig, target_sig) in [
            (&source.call, &target.call),
            (&source.construct, &target.construct),
        ] {
            if let Some(target_sig) = target_sig {
                match source_sig {
                    Some(source_sig) => {
                        if !self.is_signature_assignable(table, source_sig, target_sig) {
                            return false;
                        }
                    }
                    None => return false,
                }
            }
        }
        true
    }

    /// An optional target member also holds `undefined`.
    fn is_member_assignable(&mut self, table: &TypeTable, source: TypeId, target: &PropertyInfo) -> bool {
        if !target.optional {
            return self.is_assignable(table, source, target.ty);
        }
        table
            .constituents(source)
            .into_iter()
            .all(|m| m == table.undefined || self.is_assignable(table, m, target.ty))
    }

    /// Parameters are compared contravariantly, returns covariantly. A
    /// source may take fewer parameters than the target passes.
    fn is_signature_assignable(
        &mut self,
        table: &TypeTable,
        source: &Signature,
        target: &Signature,
    ) -> bool {
        if let Some(target_max) = target.max_arity() {
            if source.min_arity() > target_max {
                return false;
            }
        }

        let count = source.params.len().max(target.params.len());
        for i in 0..count {
            let (Some(s), Some(t)) = (
                source.param_type_at(table, i),
                target.param_type_at(table, i),
            ) else {
                continue;
            };
            if !self.is_assignable(table, t, s) {
                return false;
            }
        }

        target.return_type == table.void
            || self.is_assignable(table, source.return_type, target.return_type)
    }

    // ========================================================================
    // Explanations
    // ========================================================================

    /// The first reason `source` is not assignable to `target`, or `None`
    /// when it is.
    pub fn explain(&mut self, table: &TypeTable, source: TypeId, target: TypeId) -> Option<Reason> {
        if self.is_assignable(table, source, target) {
            return None;
        }
        Some(self.reason(table, source, target))
    }

    fn reason(&mut self, table: &TypeTable, source: TypeId, target: TypeId) -> Reason {
        let pair = (source, target);
        if self.explaining.contains(&pair) {
            return Reason::Incompatible { source, target };
        }
        self.explaining.push(pair);
        let reason = self.reason_worker(table, source, target);
        self.explaining.pop();
        reason
    }

    fn reason_worker(&mut self, table: &TypeTable, source: TypeId, target: TypeId) -> Reason {
        let incompatible = Reason::Incompatible { source, target };
        match (table.kind(source), table.kind(target)) {
            (TypeKind::Union(members), _) => {
                let failing = members
                    .iter()
                    .copied()
                    .find(|&m| !self.is_assignable(table, m, target));
                match failing {
                    Some(member) => Reason::UnionMember {
                        member,
                        target,
                        inner: Box::new(self.reason(table, member, target)),
                    },
                    None => incompatible,
                }
            }
            (TypeKind::Object(s), TypeKind::Object(t)) => self
                .object_reason(table, source, target, s, t)
                .unwrap_or(incompatible),
            (TypeKind::Function(_), TypeKind::Object(t)) => {
                match t.required().next() {
                    Some(prop) => Reason::MissingProperty {
                        name: prop.name,
                        source,
                        target,
                    },
                    None => incompatible,
                }
            }
            (TypeKind::Object(s), TypeKind::Function(t)) => match &s.call {
                Some(sc) => self.signature_reason(table, sc, t).unwrap_or(incompatible),
                None => incompatible,
            },
            (TypeKind::Function(s), TypeKind::Function(t)) => {
                self.signature_reason(table, s, t).unwrap_or(incompatible)
            }
            (TypeKind::Tuple(s), TypeKind::Tuple(t)) => {
                if s.len() != t.len() {
                    return Reason::TupleArity {
                        source,
                        target,
                        source_len: s.len(),
                        target_len: t.len(),
                    };
                }
                for (index, (&se, &te)) in s.iter().zip(t.iter()).enumerate() {
                    if !self.is_assignable(table, se, te) {
                        return Reason::TuplePosition {
                            index,
                            inner: Box::new(self.reason(table, se, te)),
                        };
                    }
                }
                incompatible
            }
            (TypeKind::Array(_), TypeKind::Tuple(t)) => Reason::ArrayToTuple { required: t.len() },
            _ => incompatible,
        }
    }

    fn object_reason(
        &mut self,
        table: &TypeTable,
        source: TypeId,
        target: TypeId,
        s: &ObjectShape,
        t: &ObjectShape,
    ) -> Option<Reason> {
        for target_prop in &t.properties {
            match s.property(target_prop.name) {
                Some(source_prop) => {
                    if !self.is_member_assignable(table, source_prop.ty, target_prop) {
                        return Some(Reason::PropertyMismatch {
                            name: target_prop.name,
                            source: source_prop.ty,
                            target: target_prop.ty,
                            inner: Box::new(self.reason(table, source_prop.ty, target_prop.ty)),
                        });
                    }
                    if source_prop.optional && !target_prop.optional {
                        return Some(Reason::PropertyMismatch {
                            name: target_prop.name,
                            source: source_prop.ty,
                            target: target_prop.ty,
                            inner: Box::new(Reason::Incompatible {
                                source: table.undefined,
                                target: target_prop.ty,
                            }),
                        });
                    }
                }
                None if !target_prop.optional => {
                    return Some(Reason::MissingProperty {
                        name: target_prop.name,
                        source,
                        target,
                    });
                }
                None => {}
            }
        }
        if let Some(index) = t.string_index {
            for source_prop in &s.properties {
                if !self.is_assignable(table, source_prop.ty, index) {
                    return Some(Reason::PropertyMismatch {
                        name: source_prop.name,
                        source: source_prop.ty,
                        target: index,
                        inner: Box::new(self.reason(table, source_prop.ty, index)),
                    });
                }
            }
        }
        match (&s.call, &t.call) {
            (Some(sc), Some(tc)) => self.signature_reason(table, sc, tc),
            _ => None,
        }
    }

    fn signature_reason(
        &mut self,
        table: &TypeTable,
        source: &Signature,
        target: &Signature,
    ) -> Option<Reason> {
        if let Some(target_max) = target.max_arity() {
            if source.min_arity() > target_max {
                return Some(Reason::Arity {
                    source_required: source.min_arity(),
                    target_count: target_max,
                });
            }
        }
        let count = source.params.len().max(target.params.len());
        for i in 0..count {
            let (Some(s), Some(t)) = (
                source.param_type_at(table, i),
                target.param_type_at(table, i),
            ) else {
                continue;
            };
            if !self.is_assignable(table, t, s) {
                let (Some(sp), Some(tp)) = (source.param_at(i), target.param_at(i)) else {
                    continue;
                };
                return Some(Reason::Parameter {
                    source_name: sp.name,
                    target_name: tp.name,
                    inner: Box::new(self.reason(table, t, s)),
                });
            }
        }
        if target.return_type != table.void
            && !self.is_assignable(table, source.return_type, target.return_type)
        {
            return Some(Reason::ReturnType {
                source: source.return_type,
                target: target.return_type,
                inner: Box::new(self.reason(table, source.return_type, target.return_type)),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectShape, PropertyInfo};
    use minits_core::intern::Interner;

    fn setup() -> (TypeTable, Relation) {
        (
            TypeTable::new(Interner::new()),
            Relation::new(&CheckerOptions::default()),
        )
    }

    #[test]
    fn test_primitive_assignability() {
        let (t, mut r) = setup();
        assert!(r.is_assignable(&t, t.string, t.string));
        assert!(!r.is_assignable(&t, t.string, t.number));
        assert!(r.is_assignable(&t, t.undefined, t.void));
        assert!(!r.is_assignable(&t, t.null, t.string));
    }

    #[test]
    fn test_unknown_both_ways() {
        let (t, mut r) = setup();
        assert!(r.is_assignable(&t, t.unknown, t.number));
        assert!(r.is_assignable(&t, t.number, t.unknown));
    }

    #[test]
    fn test_never() {
        let (t, mut r) = setup();
        assert!(r.is_assignable(&t, t.never, t.string));
        assert!(!r.is_assignable(&t, t.string, t.never));
    }

    #[test]
    fn test_null_without_strict_null_checks() {
        let t = TypeTable::new(Interner::new());
        let options = CheckerOptions {
            strict_null_checks: false,
            ..CheckerOptions::default()
        };
        let mut r = Relation::new(&options);
        assert!(r.is_assignable(&t, t.null, t.string));
        assert!(r.is_assignable(&t, t.undefined, t.number));
    }

    #[test]
    fn test_optional_source_property_rejected_by_required_target() {
        let (mut t, mut r) = setup();
        let name = t.interner().intern("name");
        let optional = t.object(ObjectShape {
            properties: vec![PropertyInfo {
                optional: true,
                ..PropertyInfo::new(name, t.string)
            }],
            ..ObjectShape::default()
        });
        let required = t.object(ObjectShape {
            properties: vec![PropertyInfo::new(name, t.string)],
            ..ObjectShape::default()
        });
        assert!(!r.is_assignable(&t, optional, required));
        assert!(r.is_assignable(&t, required, optional));
    }

    #[test]
    fn test_depth_limit() {
        let (mut t, _) = setup();
        let options = CheckerOptions {
            max_relation_depth: 2,
            ..CheckerOptions::default()
        };
        let mut r = Relation::new(&options);
        let a1 = t.array(t.string);
        let a2 = t.array(a1);
        let a3 = t.array(a2);
        let lit = t.string_literal("x");
        let b1 = t.array(lit);
        let b2 = t.array(b1);
        let b3 = t.array(b2);
        assert!(!r.is_assignable(&t, b3, a3));

        let mut deep = Relation::new(&CheckerOptions::default());
        assert!(deep.is_assignable(&t, b3, a3));
    }

    #[test]
    fn test_depth_limit_does_not_poison_shallower_queries() {
        let (mut t, _) = setup();
        let options = CheckerOptions {
            max_relation_depth: 3,
            ..CheckerOptions::default()
        };
        let a1 = t.array(t.string);
        let a2 = t.array(a1);
        let a3 = t.array(a2);
        let lit = t.string_literal("x");
        let b1 = t.array(lit);
        let b2 = t.array(b1);
        let b3 = t.array(b2);

        let mut fresh = Relation::new(&options);
        assert!(fresh.is_assignable(&t, b2, a2));

        let mut r = Relation::new(&options);
        assert!(!r.is_assignable(&t, b3, a3));
        assert!(r.is_assignable(&t, b2, a2));
        assert!(r.is_assignable(&t, b1, a1));
    }

    /// `{ inner: { back: Self }; tag: tag }`
    fn looping(t: &mut TypeTable, tag: TypeId) -> (TypeId, TypeId) {
        let interner = t.interner().clone();
        let outer = t.reserve();
        let inner = t.object(ObjectShape {
            properties: vec![PropertyInfo::new(interner.intern("back"), outer)],
            ..ObjectShape::default()
        });
        t.define(
            outer,
            TypeKind::Object(ObjectShape {
                properties: vec![
                    PropertyInfo::new(interner.intern("inner"), inner),
                    PropertyInfo::new(interner.intern("tag"), tag),
                ],
                ..ObjectShape::default()
            }),
        );
        (outer, inner)
    }

    #[test]
    fn test_recursive_types_compare_structurally() {
        let (mut t, mut r) = setup();
        let string = t.string;
        let (first, _) = looping(&mut t, string);
        let string = t.string;
        let (second, _) = looping(&mut t, string);
        assert_ne!(first, second);
        assert!(r.is_assignable(&t, first, second));
        assert!(r.is_assignable(&t, second, first));
    }

    #[test]
    fn test_assumed_pair_failing_voids_dependent_verdicts() {
        let (mut t, mut r) = setup();
        let string = t.string;
        let (strings, strings_inner) = looping(&mut t, string);
        let number = t.number;
        let (numbers, numbers_inner) = looping(&mut t, number);
        assert!(!r.is_assignable(&t, strings, numbers));
        // `inner` only looked assignable while the outer pair was assumed.
        assert!(!r.is_assignable(&t, strings_inner, numbers_inner));
    }

    #[test]
    fn test_explain_stops_at_cycles() {
        let (mut t, mut r) = setup();
        let string = t.string;
        let (strings, _) = looping(&mut t, string);
        let number = t.number;
        let (numbers, _) = looping(&mut t, number);
        let reason = r.explain(&t, strings, numbers);
        assert!(matches!(reason, Some(Reason::PropertyMismatch { .. })));
    }

    #[test]
    fn test_explain_array_to_tuple() {
        let (mut t, mut r) = setup();
        let sn = t.union([t.string, t.number]);
        let arr = t.array(sn);
        let tuple = t.tuple(vec![t.number, t.string]);
        assert_eq!(
            r.explain(&t, arr, tuple),
            Some(Reason::ArrayToTuple { required: 2 })
        );
        assert_eq!(r.explain(&t, tuple, arr), None);
    }
}
