//! Lexical scopes and value bindings.
//!
//! Every binding owns a narrowing stack. An entry records the depth of the
//! scope that pushed it, so leaving a scope pops exactly the entries that
//! scope pushed. Leaving a scope reports the types that outer bindings were
//! assigned inside it as a [`ScopeExit`]. The caller decides how the exits
//! of sibling branches combine, so every branch starts from the same state.

use crate::types::{TypeId, TypeTable};
use minits_core::intern::Atom;
use rustc_hash::FxHashMap;

/// Handle to a binding in an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u32);

impl BindingId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A refinement in effect for a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refinement {
    pub ty: TypeId,
    /// Depth of the scope that pushed this entry.
    pub depth: usize,
}

/// A declared value name.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: Atom,
    /// The annotated or inferred type.
    pub declared: TypeId,
    pub is_const: bool,
    /// Number of enclosing function scopes at the declaration.
    function_level: usize,
    /// Innermost last.
    refinements: Vec<Refinement>,
}

impl Binding {
    pub fn refinements(&self) -> &[Refinement] {
        &self.refinements
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
    /// The body of an `if` branch or one side of `&&`, `||` or `?:`.
    Branch,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    names: FxHashMap<Atom, BindingId>,
    /// Bindings that got a refinement at this depth.
    narrowed: Vec<BindingId>,
    /// Bindings assigned at this depth.
    assigned: Vec<BindingId>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            names: FxHashMap::default(),
            narrowed: Vec::new(),
            assigned: Vec::new(),
        }
    }
}

/// Types of outer bindings assigned in a scope, as they were when the
/// scope ended.
#[derive(Debug, Clone, Default)]
pub struct ScopeExit {
    assigned: Vec<(BindingId, TypeId)>,
}

impl ScopeExit {
    pub fn type_of(&self, id: BindingId) -> Option<TypeId> {
        self.assigned
            .iter()
            .find_map(|&(binding, ty)| (binding == id).then_some(ty))
    }
}

/// The chain of scopes active at a point of the checking pass.
#[derive(Debug)]
pub struct Environment {
    bindings: Vec<Binding>,
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            scopes: vec![Scope::new(ScopeKind::Global)],
        }
    }

    /// Depth of the innermost scope; the global scope is at depth 0.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    fn function_level(&self) -> usize {
        self.scopes
            .iter()
            .filter(|s| s.kind == ScopeKind::Function)
            .count()
    }

    /// Depth of the innermost function scope, or 0 at the top level.
    fn function_floor(&self) -> usize {
        self.scopes
            .iter()
            .rposition(|s| s.kind == ScopeKind::Function)
            .unwrap_or(0)
    }

    pub fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new(kind));
        tracing::trace!(depth = self.depth(), kind = ?kind, "push scope");
    }

    /// Leave the innermost scope, dropping the refinements it pushed.
    ///
    /// The state afterwards is the state before the scope was entered. The
    /// returned exit holds what outer bindings were assigned inside; a
    /// function scope reports nothing.
    pub fn pop_scope(&mut self) -> ScopeExit {
        if self.scopes.len() <= 1 {
            return ScopeExit::default();
        }
        let depth = self.depth();
        let exit = match self.scopes.last() {
            Some(scope) if scope.kind != ScopeKind::Function => ScopeExit {
                assigned: scope
                    .assigned
                    .iter()
                    .filter(|&&id| !scope.names.values().any(|&local| local == id))
                    .map(|&id| (id, self.current_type(id)))
                    .collect(),
            },
            _ => ScopeExit::default(),
        };
        let Some(scope) = self.scopes.pop() else {
            return exit;
        };
        tracing::trace!(depth, kind = ?scope.kind, "pop scope");

        for &id in &scope.narrowed {
            self.bindings[id.index()]
                .refinements
                .retain(|r| r.depth < depth);
        }
        exit
    }

    /// Continue with the types a scope ended with, as after a block that
    /// always runs.
    pub fn apply_exit(&mut self, exit: ScopeExit) {
        for (id, ty) in exit.assigned {
            self.assign(id, ty);
        }
    }

    /// Continue from whichever of several scopes ran. A binding assigned in
    /// some of them gets the union of its exit types, where a scope that
    /// left it alone contributes its current type.
    pub fn join_exits(&mut self, table: &mut TypeTable, exits: &[ScopeExit]) {
        let mut ids: Vec<BindingId> = Vec::new();
        for exit in exits {
            for &(id, _) in &exit.assigned {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        for id in ids {
            let before = self.current_type(id);
            let joined = table.union(exits.iter().map(|exit| exit.type_of(id).unwrap_or(before)));
            self.assign(id, joined);
        }
    }

    /// Declare a value name in the innermost scope, shadowing outer ones.
    pub fn declare(&mut self, name: Atom, declared: TypeId, is_const: bool) -> BindingId {
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(Binding {
            name,
            declared,
            is_const,
            function_level: self.function_level(),
            refinements: Vec::new(),
        });
        if let Some(scope) = self.scopes.last_mut() {
            scope.names.insert(name, id);
        }
        id
    }

    pub fn lookup(&self, name: Atom) -> Option<BindingId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.names.get(&name).copied())
    }

    /// Whether `name` is declared in the innermost scope itself.
    pub fn is_declared_locally(&self, name: Atom) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.names.contains_key(&name))
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    /// The type of a binding at the current point: the innermost refinement
    /// in effect, or the declared type.
    ///
    /// Inside a function, refinements of a mutable outer binding made before
    /// the function was entered do not apply, since the function may run
    /// after any later assignment.
    pub fn current_type(&self, id: BindingId) -> TypeId {
        let binding = &self.bindings[id.index()];
        let floor = if !binding.is_const && binding.function_level < self.function_level() {
            self.function_floor()
        } else {
            0
        };
        binding
            .refinements
            .iter()
            .rev()
            .find(|r| r.depth >= floor)
            .map(|r| r.ty)
            .unwrap_or(binding.declared)
    }

    /// Push a refinement from a guard.
    pub fn narrow(&mut self, id: BindingId, ty: TypeId) {
        tracing::trace!(binding = id.index(), ty = ty.index(), depth = self.depth(), "narrow");
        self.push_refinement(id, ty);
    }

    /// Push a refinement from an assignment.
    pub fn assign(&mut self, id: BindingId, ty: TypeId) {
        tracing::trace!(binding = id.index(), ty = ty.index(), depth = self.depth(), "assign");
        self.push_refinement(id, ty);
        self.record_assignment(id);
    }

    /// Replace the declared type, e.g. once a hoisted function's return type
    /// has been inferred.
    pub fn set_declared(&mut self, id: BindingId, ty: TypeId) {
        self.bindings[id.index()].declared = ty;
    }

    fn push_refinement(&mut self, id: BindingId, ty: TypeId) {
        let depth = self.depth();
        let refinements = &mut self.bindings[id.index()].refinements;
        match refinements.last_mut() {
            Some(top) if top.depth == depth => top.ty = ty,
            _ => refinements.push(Refinement { ty, depth }),
        }
        if let Some(scope) = self.scopes.last_mut() {
            if !scope.narrowed.contains(&id) {
                scope.narrowed.push(id);
            }
        }
    }

    fn record_assignment(&mut self, id: BindingId) {
        if let Some(scope) = self.scopes.last_mut() {
            if !scope.assigned.contains(&id) {
                scope.assigned.push(id);
            }
        }
    }
}
