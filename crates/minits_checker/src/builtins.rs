//! Built-in types.
//!
//! Apparent members of primitives and arrays, and the global prelude
//! (`console`, `Math`, `Date`) that lets programs check without a library
//! loader. `Date` is both a type and a value that `new` accepts.

use crate::types::{
    LiteralValue, ObjectShape, ParamInfo, PrimitiveKind, PropertyInfo, Signature, TypeId,
    TypeKind, TypeTable,
};

pub const STRING_MEMBERS: &[&str] = &[
    "length",
    "charAt",
    "concat",
    "endsWith",
    "includes",
    "indexOf",
    "padStart",
    "repeat",
    "slice",
    "split",
    "startsWith",
    "toLowerCase",
    "toString",
    "toUpperCase",
    "trim",
    "valueOf",
];

pub const NUMBER_MEMBERS: &[&str] = &["toFixed", "toPrecision", "toString", "valueOf"];

pub const BOOLEAN_MEMBERS: &[&str] = &["toString", "valueOf"];

pub const ARRAY_MEMBERS: &[&str] = &[
    "length",
    "concat",
    "every",
    "filter",
    "find",
    "forEach",
    "includes",
    "indexOf",
    "join",
    "map",
    "pop",
    "push",
    "reverse",
    "slice",
    "some",
    "toString",
];

/// Parameter description: name, type, optional, rest.
type Param = (&'static str, TypeId, bool, bool);

fn req(name: &'static str, ty: TypeId) -> Param {
    (name, ty, false, false)
}

fn opt(name: &'static str, ty: TypeId) -> Param {
    (name, ty, true, false)
}

fn rest(name: &'static str, array: TypeId) -> Param {
    (name, array, false, true)
}

pub(crate) fn method(table: &mut TypeTable, params: &[Param], return_type: TypeId) -> TypeId {
    let interner = table.interner().clone();
    let params = params
        .iter()
        .map(|&(name, ty, optional, rest)| ParamInfo {
            name: interner.intern_static(name),
            ty,
            optional,
            rest,
        })
        .collect();
    table.function(Signature {
        params,
        return_type,
    })
}

/// Names of the apparent members of a primitive, array or tuple.
pub fn apparent_member_names(table: &TypeTable, ty: TypeId) -> &'static [&'static str] {
    match table.kind(ty) {
        TypeKind::Primitive(PrimitiveKind::String) => STRING_MEMBERS,
        TypeKind::Primitive(PrimitiveKind::Number) => NUMBER_MEMBERS,
        TypeKind::Primitive(PrimitiveKind::Boolean) => BOOLEAN_MEMBERS,
        TypeKind::Literal(value) => match value.primitive() {
            PrimitiveKind::String => STRING_MEMBERS,
            PrimitiveKind::Number => NUMBER_MEMBERS,
            _ => BOOLEAN_MEMBERS,
        },
        TypeKind::Array(_) | TypeKind::Tuple(_) => ARRAY_MEMBERS,
        _ => &[],
    }
}

/// Type of an apparent member, or `None` when the type has no such member.
pub fn apparent_member(table: &mut TypeTable, ty: TypeId, name: &str) -> Option<TypeId> {
    match table.kind(ty).clone() {
        TypeKind::Primitive(PrimitiveKind::String) => string_member(table, name),
        TypeKind::Primitive(PrimitiveKind::Number) => number_member(table, name),
        TypeKind::Primitive(PrimitiveKind::Boolean) => boolean_member(table, name),
        TypeKind::Literal(LiteralValue::String(_)) => string_member(table, name),
        TypeKind::Literal(LiteralValue::Number(_)) => number_member(table, name),
        TypeKind::Literal(LiteralValue::Boolean(_)) => boolean_member(table, name),
        TypeKind::Array(element) => array_member(table, element, name),
        TypeKind::Tuple(elements) => {
            if name == "length" {
                return Some(table.number_literal(elements.len() as f64));
            }
            let element = table.union(elements);
            array_member(table, element, name)
        }
        _ => None,
    }
}

fn string_member(t: &mut TypeTable, name: &str) -> Option<TypeId> {
    let (s, n, b) = (t.string, t.number, t.boolean);
    let ty = match name {
        "length" => n,
        "charAt" => method(t, &[req("pos", n)], s),
        "concat" => {
            let strings = t.array(s);
            method(t, &[rest("strings", strings)], s)
        }
        "includes" | "startsWith" | "endsWith" => {
            method(t, &[req("searchString", s), opt("position", n)], b)
        }
        "indexOf" => method(t, &[req("searchString", s), opt("position", n)], n),
        "padStart" => method(t, &[req("maxLength", n), opt("fillString", s)], s),
        "repeat" => method(t, &[req("count", n)], s),
        "slice" => method(t, &[opt("start", n), opt("end", n)], s),
        "split" => {
            let parts = t.array(s);
            method(t, &[req("separator", s)], parts)
        }
        "toLowerCase" | "toUpperCase" | "toString" | "trim" | "valueOf" => method(t, &[], s),
        _ => return None,
    };
    Some(ty)
}

fn number_member(t: &mut TypeTable, name: &str) -> Option<TypeId> {
    let (s, n) = (t.string, t.number);
    let ty = match name {
        "toFixed" => method(t, &[opt("fractionDigits", n)], s),
        "toPrecision" => method(t, &[opt("precision", n)], s),
        "toString" => method(t, &[opt("radix", n)], s),
        "valueOf" => method(t, &[], n),
        _ => return None,
    };
    Some(ty)
}

fn boolean_member(t: &mut TypeTable, name: &str) -> Option<TypeId> {
    let (s, b) = (t.string, t.boolean);
    let ty = match name {
        "toString" => method(t, &[], s),
        "valueOf" => method(t, &[], b),
        _ => return None,
    };
    Some(ty)
}

fn array_member(t: &mut TypeTable, element: TypeId, name: &str) -> Option<TypeId> {
    let (s, n, b, any, void) = (t.string, t.number, t.boolean, t.unknown, t.void);
    let items = t.array(element);
    let ty = match name {
        "length" => n,
        "push" => method(t, &[rest("items", items)], n),
        "pop" => {
            let maybe = t.union([element, t.undefined]);
            method(t, &[], maybe)
        }
        "join" => method(t, &[opt("separator", s)], s),
        "indexOf" => method(t, &[req("searchElement", element)], n),
        "includes" => method(t, &[req("searchElement", element)], b),
        "concat" => {
            let groups = t.array(items);
            method(t, &[rest("items", groups)], items)
        }
        "slice" => method(t, &[opt("start", n), opt("end", n)], items),
        "reverse" => method(t, &[], items),
        "toString" => method(t, &[], s),
        "forEach" => {
            let callback = method(t, &[req("value", element), req("index", n)], void);
            method(t, &[req("callbackfn", callback)], void)
        }
        "map" => {
            let callback = method(t, &[req("value", element), req("index", n)], any);
            let mapped = t.array(any);
            method(t, &[req("callbackfn", callback)], mapped)
        }
        "filter" | "some" | "every" | "find" => {
            let predicate = method(t, &[req("value", element), req("index", n)], any);
            let result = match name {
                "filter" => items,
                "find" => t.union([element, t.undefined]),
                _ => b,
            };
            method(t, &[req("predicate", predicate)], result)
        }
        _ => return None,
    };
    Some(ty)
}

// ============================================================================
// Prelude
// ============================================================================

fn property(table: &TypeTable, name: &'static str, ty: TypeId) -> PropertyInfo {
    PropertyInfo::new(table.interner().intern_static(name), ty)
}

fn readonly_property(table: &TypeTable, name: &'static str, ty: TypeId) -> PropertyInfo {
    PropertyInfo {
        readonly: true,
        ..property(table, name, ty)
    }
}

/// Global values declared before any program is checked.
pub fn prelude_values(t: &mut TypeTable) -> Vec<(&'static str, TypeId)> {
    let (n, any, void) = (t.number, t.unknown, t.void);

    let data = t.array(any);
    let log = method(t, &[rest("data", data)], void);
    let properties = vec![
        property(t, "log", log),
        property(t, "error", log),
        property(t, "warn", log),
    ];
    let console = t.object(ObjectShape {
        properties,
        ..ObjectShape::default()
    });
    let console_name = t.interner().intern_static("Console");
    t.set_name(console, console_name);

    let numbers = t.array(n);
    let unary = method(t, &[req("x", n)], n);
    let random = method(t, &[], n);
    let variadic = method(t, &[rest("values", numbers)], n);
    let properties = vec![
        readonly_property(t, "PI", n),
        property(t, "abs", unary),
        property(t, "ceil", unary),
        property(t, "floor", unary),
        property(t, "max", variadic),
        property(t, "min", variadic),
        property(t, "random", random),
        property(t, "round", unary),
    ];
    let math = t.object(ObjectShape {
        properties,
        ..ObjectShape::default()
    });
    let math_name = t.interner().intern_static("Math");
    t.set_name(math, math_name);

    let date = date_instance(t);
    let value = t.union([t.string, n]);
    let construct = Signature {
        params: vec![ParamInfo {
            name: t.interner().intern_static("value"),
            ty: value,
            optional: true,
            rest: false,
        }],
        return_type: date,
    };
    let now = method(t, &[], n);
    let date_constructor = t.object(ObjectShape {
        properties: vec![property(t, "now", now)],
        construct: Some(construct),
        ..ObjectShape::default()
    });
    let constructor_name = t.interner().intern_static("DateConstructor");
    t.set_name(date_constructor, constructor_name);

    vec![("console", console), ("Math", math), ("Date", date_constructor)]
}

/// Global type names declared before any program is checked.
pub fn prelude_types(t: &mut TypeTable) -> Vec<(&'static str, TypeId)> {
    vec![("Date", date_instance(t))]
}

/// The type of `Date` values. Building it again yields the same id.
fn date_instance(t: &mut TypeTable) -> TypeId {
    let (s, n) = (t.string, t.number);
    let to_string = method(t, &[], s);
    let get_number = method(t, &[], n);
    let properties = vec![
        property(t, "getDate", get_number),
        property(t, "getFullYear", get_number),
        property(t, "getMonth", get_number),
        property(t, "getTime", get_number),
        property(t, "toISOString", to_string),
        property(t, "toString", to_string),
    ];
    let date = t.object(ObjectShape {
        properties,
        ..ObjectShape::default()
    });
    let date_name = t.interner().intern_static("Date");
    t.set_name(date, date_name);
    date
}

#[cfg(test)]
mod tests {
    use super::*;
    use minits_core::intern::Interner;

    #[test]
    fn test_string_members() {
        let mut t = TypeTable::new(Interner::new());
        let string = t.string;
        let upper = apparent_member(&mut t, string, "toUpperCase").unwrap();
        assert_eq!(t.display(upper), "() => string");
        let (number, string) = (t.number, t.string);
        assert_eq!(apparent_member(&mut t, string, "length"), Some(number));
        let string = t.string;
        assert_eq!(apparent_member(&mut t, string, "toFixed"), None);
    }

    #[test]
    fn test_literal_uses_primitive_members() {
        let mut t = TypeTable::new(Interner::new());
        let ada = t.string_literal("Ada");
        assert!(apparent_member(&mut t, ada, "toUpperCase").is_some());
        assert!(apparent_member(&mut t, ada, "toFixed").is_none());
    }

    #[test]
    fn test_array_members_follow_element_type() {
        let mut t = TypeTable::new(Interner::new());
        let strings = t.array(t.string);
        let push = apparent_member(&mut t, strings, "push").unwrap();
        assert_eq!(t.display(push), "(...items: string[]) => number");
        let pop = apparent_member(&mut t, strings, "pop").unwrap();
        assert_eq!(t.display(pop), "() => string | undefined");
    }

    #[test]
    fn test_tuple_length_is_literal() {
        let mut t = TypeTable::new(Interner::new());
        let pair = t.tuple(vec![t.number, t.string]);
        let length = apparent_member(&mut t, pair, "length").unwrap();
        assert_eq!(t.display(length), "2");
    }

    #[test]
    fn test_prelude() {
        let mut t = TypeTable::new(Interner::new());
        let values = prelude_values(&mut t);
        assert!(values.iter().any(|(name, _)| *name == "console"));
        let types = prelude_types(&mut t);
        assert_eq!(t.display(types[0].1), "Date");
        let (_, constructor) = values.iter().find(|(name, _)| *name == "Date").unwrap();
        let construct = t.construct_signature_of(*constructor).unwrap();
        assert_eq!(construct.return_type, types[0].1);
        assert_eq!(construct.min_arity(), 0);
    }
}
