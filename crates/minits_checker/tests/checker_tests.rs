//! Checker integration tests.
//!
//! Builds syntax trees with the AST builder, runs the checking pass, and
//! verifies diagnostics and computed types.

use bumpalo::Bump;
use minits_ast::{AstBuilder, BinaryOperator, Expression, Statement};
use minits_checker::Checker;
use minits_core::Interner;
use minits_diagnostics::DiagnosticKind;
use minits_options::CheckerOptions;

/// Helper: check `statements` as one source file with default options.
fn check<'a>(b: &AstBuilder<'a>, statements: &[Statement<'a>]) -> Checker<'a> {
    check_with(b, CheckerOptions::default(), statements)
}

fn check_with<'a>(
    b: &AstBuilder<'a>,
    options: CheckerOptions,
    statements: &[Statement<'a>],
) -> Checker<'a> {
    let file = b.source_file("test.ts", statements);
    let mut checker = Checker::with_options(b.interner().clone(), options);
    checker.check_source_file(file);
    checker
}

/// Helper: diagnostic messages in report order.
fn messages(checker: &Checker<'_>) -> Vec<String> {
    checker
        .diagnostics()
        .diagnostics()
        .iter()
        .map(|d| d.message_text.clone())
        .collect()
}

fn kinds(checker: &Checker<'_>) -> Vec<DiagnosticKind> {
    checker
        .diagnostics()
        .diagnostics()
        .iter()
        .map(|d| d.kind)
        .collect()
}

fn binding_type(checker: &Checker<'_>, name: &str) -> String {
    let ty = checker
        .type_of_binding(name)
        .unwrap_or_else(|| panic!("no binding named {}", name));
    checker.display(ty)
}

fn type_at(checker: &Checker<'_>, expr: &Expression<'_>) -> String {
    let ty = checker
        .type_at(expr.span())
        .unwrap_or_else(|| panic!("no type recorded for {:?}", expr.span()));
    checker.display(ty)
}

/// `Math.random() > 0.5`
fn coin_flip<'a>(b: &AstBuilder<'a>) -> Expression<'a> {
    let random = b.call(b.member(b.ident("Math"), "random"), &[]);
    b.binary(random, BinaryOperator::GreaterThan, b.number(0.5))
}

// ============================================================================
// Declarations and literal types
// ============================================================================

#[test]
fn test_const_keeps_literal_and_let_widens() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.const_("philosopher", None, b.string("Hypatia")),
            b.let_("lifespan", None, Some(b.number(89.0))),
            b.var("alive", None, Some(b.boolean(false))),
        ],
    );
    assert!(checker.diagnostics().is_empty());
    assert_eq!(binding_type(&checker, "philosopher"), "\"Hypatia\"");
    assert_eq!(binding_type(&checker, "lifespan"), "number");
    assert_eq!(binding_type(&checker, "alive"), "boolean");
}

#[test]
fn test_literal_assignability() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.let_("specificallyAda", Some(b.string_literal_type("Ada")), Some(b.string("Ada"))),
            b.expr_stmt(b.assign(b.ident("specificallyAda"), b.string("Byron"))),
            b.let_("someString", None, Some(b.string(""))),
            b.expr_stmt(b.assign(b.ident("specificallyAda"), b.ident("someString"))),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec![
            "Type '\"Byron\"' is not assignable to type '\"Ada\"'.",
            "Type 'string' is not assignable to type '\"Ada\"'.",
        ]
    );
}

#[test]
fn test_union_of_primitive_and_literals() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let lifespan = b.union_type(&[
        b.number_type(),
        b.string_literal_type("ongoing"),
        b.string_literal_type("uncertain"),
    ]);
    let checker = check(
        &b,
        &[
            b.let_("lifespan", Some(lifespan), None),
            b.expr_stmt(b.assign(b.ident("lifespan"), b.number(89.0))),
            b.expr_stmt(b.assign(b.ident("lifespan"), b.string("ongoing"))),
            b.expr_stmt(b.assign(b.ident("lifespan"), b.boolean(true))),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec!["Type 'true' is not assignable to type 'number | \"ongoing\" | \"uncertain\"'."]
    );
}

#[test]
fn test_const_reassignment() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.const_("x", None, b.number(1.0)),
            b.expr_stmt(b.assign(b.ident("x"), b.number(2.0))),
        ],
    );
    assert_eq!(messages(&checker), vec!["Cannot assign to 'x' because it is a constant."]);
}

#[test]
fn test_unresolved_names() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.expr_stmt(b.member(b.ident("missing"), "length")),
            b.let_("typed", Some(b.type_ref("Missing")), None),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec!["Cannot find name 'missing'.", "Cannot find name 'Missing'."]
    );
}

#[test]
fn test_every_statement_is_checked_after_errors() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.let_("a", Some(b.number_type()), Some(b.string("one"))),
            b.let_("b", Some(b.string_type()), Some(b.number(2.0))),
            b.expr_stmt(b.call(b.ident("nowhere"), &[])),
            b.let_("c", Some(b.boolean_type()), Some(b.boolean(true))),
        ],
    );
    assert_eq!(
        kinds(&checker),
        vec![
            DiagnosticKind::IncompatibleAssignment,
            DiagnosticKind::IncompatibleAssignment,
            DiagnosticKind::CannotFindName,
        ]
    );
}

// ============================================================================
// Unions and narrowing
// ============================================================================

#[test]
fn test_union_member_access_requires_every_constituent() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let physicist = b.conditional(coin_flip(&b), b.string("Marie Curie"), b.number(84.0));
    let checker = check(
        &b,
        &[
            b.let_("physicist", None, Some(physicist)),
            b.expr_stmt(b.call(b.member(b.ident("physicist"), "toString"), &[])),
            b.expr_stmt(b.call(b.member(b.ident("physicist"), "toUpperCase"), &[])),
        ],
    );
    assert_eq!(binding_type(&checker, "physicist"), "string | number");
    let diagnostics = checker.diagnostics().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message_text,
        "Property 'toUpperCase' does not exist on type 'string | number'."
    );
    assert_eq!(
        diagnostics[0].related_information[0].message_text,
        "Property 'toUpperCase' does not exist on type 'number'."
    );
}

#[test]
fn test_typeof_narrowing_round_trip() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let in_then = b.ident("value");
    let in_else = b.ident("value");
    let after = b.ident("value");
    let guard = b.strict_eq(b.typeof_(b.ident("value")), b.string("string"));
    let body = b.block(&[
        b.if_(
            guard,
            b.block_stmt(&[b.expr_stmt(b.call(b.member(in_then, "toUpperCase"), &[]))]),
            Some(b.block_stmt(&[b.expr_stmt(b.call(b.member(in_else, "toFixed"), &[]))])),
        ),
        b.expr_stmt(b.member(after, "length")),
    ]);
    let union = b.union_type(&[b.string_type(), b.number_type()]);
    let checker = check(&b, &[b.function("f", &[b.param("value", Some(union))], None, body)]);

    assert_eq!(type_at(&checker, &in_then), "string");
    assert_eq!(type_at(&checker, &in_else), "number");
    assert_eq!(type_at(&checker, &after), "string | number");
    assert_eq!(
        messages(&checker),
        vec!["Property 'length' does not exist on type 'string | number'."]
    );
}

#[test]
fn test_equality_narrowing_to_literal() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let narrowed = b.ident("scientist");
    let body = b.block(&[b.if_(
        b.strict_eq(b.ident("scientist"), b.string("Mark Goldberg")),
        b.block_stmt(&[b.expr_stmt(b.call(b.member(narrowed, "toUpperCase"), &[]))]),
        None,
    )]);
    let union = b.union_type(&[b.number_type(), b.string_type()]);
    let checker = check(&b, &[b.function("f", &[b.param("scientist", Some(union))], None, body)]);
    assert!(checker.diagnostics().is_empty());
    assert_eq!(type_at(&checker, &narrowed), "\"Mark Goldberg\"");
}

#[test]
fn test_truthiness_narrowing() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let truthy = b.ident("biologist");
    let falsy = b.ident("biologist");
    let body = b.block(&[b.if_(
        b.ident("biologist"),
        b.expr_stmt(truthy),
        Some(b.expr_stmt(falsy)),
    )]);
    let union = b.union_type(&[b.boolean_literal_type(false), b.string_type()]);
    let checker = check(&b, &[b.function("f", &[b.param("biologist", Some(union))], None, body)]);
    assert_eq!(type_at(&checker, &truthy), "string");
    assert_eq!(type_at(&checker, &falsy), "false | string");
}

#[test]
fn test_possibly_undefined_access() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let body = b.block(&[
        b.if_(
            b.ident("geneticist"),
            b.block_stmt(&[b.expr_stmt(b.call(b.member(b.ident("geneticist"), "toUpperCase"), &[]))]),
            None,
        ),
        b.expr_stmt(b.call(b.member(b.ident("geneticist"), "toUpperCase"), &[])),
    ]);
    let union = b.union_type(&[b.string_type(), b.undefined_type()]);
    let checker = check(&b, &[b.function("f", &[b.param("geneticist", Some(union))], None, body)]);
    assert_eq!(messages(&checker), vec!["'geneticist' is possibly 'undefined'."]);
    assert_eq!(kinds(&checker), vec![DiagnosticKind::UseBeforeNarrowing]);
}

#[test]
fn test_early_return_narrows_rest_of_block() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let body = b.block(&[
        b.if_(
            b.strict_eq(b.ident("value"), b.undefined()),
            b.block_stmt(&[b.ret(Some(b.number(0.0)))]),
            None,
        ),
        b.ret(Some(b.member(b.ident("value"), "length"))),
    ]);
    let union = b.union_type(&[b.string_type(), b.undefined_type()]);
    let checker = check(
        &b,
        &[b.function("describe", &[b.param("value", Some(union))], Some(b.number_type()), body)],
    );
    assert!(checker.diagnostics().is_empty());
    assert_eq!(
        binding_type(&checker, "describe"),
        "(value: string | undefined) => number"
    );
}

#[test]
fn test_negated_guard_with_early_return() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let body = b.block(&[
        b.if_(b.not(b.ident("song")), b.ret(None), None),
        b.expr_stmt(b.call(
            b.member(b.ident("console"), "log"),
            &[b.member(b.ident("song"), "length")],
        )),
    ]);
    let union = b.union_type(&[b.string_type(), b.undefined_type()]);
    let checker = check(
        &b,
        &[b.function("logSong", &[b.param("song", Some(union))], Some(b.void_type()), body)],
    );
    assert!(checker.diagnostics().is_empty());
}

#[test]
fn test_loose_null_check_removes_both_nullish_types() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let inside = b.ident("x");
    let body = b.block(&[b.if_(
        b.loose_ne(b.ident("x"), b.null()),
        b.expr_stmt(b.member(inside, "length")),
        None,
    )]);
    let union = b.union_type(&[b.string_type(), b.null_type(), b.undefined_type()]);
    let checker = check(&b, &[b.function("f", &[b.param("x", Some(union))], None, body)]);
    assert!(checker.diagnostics().is_empty());
    assert_eq!(type_at(&checker, &inside), "string");
}

#[test]
fn test_logical_operators_narrow_and_combine() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let fallback = b.or(b.ident("name"), b.string("anonymous"));
    let guarded = b.and(b.ident("name"), b.member(b.ident("name"), "length"));
    let body = b.block(&[b.expr_stmt(fallback), b.expr_stmt(guarded)]);
    let union = b.union_type(&[b.string_type(), b.undefined_type()]);
    let checker = check(&b, &[b.function("f", &[b.param("name", Some(union))], None, body)]);
    assert!(checker.diagnostics().is_empty());
    assert_eq!(type_at(&checker, &fallback), "string");
}

#[test]
fn test_assignment_narrows_and_joins_after_branch() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let before = b.ident("thinker");
    let union = b.union_type(&[b.string_type(), b.null_type()]);
    let checker = check(
        &b,
        &[
            b.let_("thinker", Some(union), Some(b.null())),
            b.expr_stmt(b.member(before, "length")),
            b.if_(
                coin_flip(&b),
                b.block_stmt(&[b.expr_stmt(b.assign(b.ident("thinker"), b.string("Susanne Langer")))]),
                None,
            ),
        ],
    );
    assert_eq!(type_at(&checker, &before), "null");
    assert_eq!(binding_type(&checker, "thinker"), "null | \"Susanne Langer\"");
    assert_eq!(messages(&checker), vec!["'thinker' is possibly 'null'."]);
}

#[test]
fn test_else_branch_does_not_see_then_branch_assignment() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let in_else = b.ident("x");
    let in_false_arm = b.ident("y");
    let union = || b.union_type(&[b.string_type(), b.number_type()]);
    let checker = check(
        &b,
        &[
            b.let_("x", Some(union()), Some(b.string("a"))),
            b.if_(
                coin_flip(&b),
                b.block_stmt(&[b.expr_stmt(b.assign(b.ident("x"), b.number(1.0)))]),
                Some(b.block_stmt(&[b.expr_stmt(b.call(b.member(in_else, "toUpperCase"), &[]))])),
            ),
            b.let_("y", Some(union()), Some(b.string("b"))),
            b.expr_stmt(b.conditional(
                coin_flip(&b),
                b.paren(b.assign(b.ident("y"), b.number(2.0))),
                b.call(b.member(in_false_arm, "toUpperCase"), &[]),
            )),
        ],
    );
    assert!(checker.diagnostics().is_empty(), "{:?}", messages(&checker));
    assert_eq!(type_at(&checker, &in_else), "\"a\"");
    assert_eq!(type_at(&checker, &in_false_arm), "\"b\"");
    assert_eq!(binding_type(&checker, "x"), "1 | \"a\"");
    assert_eq!(binding_type(&checker, "y"), "2 | \"b\"");
}

#[test]
fn test_branch_that_returns_does_not_join() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let after = b.ident("x");
    let checker = check(
        &b,
        &[b.function(
            "pick",
            &[],
            None,
            b.block(&[
                b.let_(
                    "x",
                    Some(b.union_type(&[b.string_type(), b.number_type()])),
                    Some(b.string("a")),
                ),
                b.if_(
                    coin_flip(&b),
                    b.block_stmt(&[
                        b.expr_stmt(b.assign(b.ident("x"), b.number(1.0))),
                        b.ret(None),
                    ]),
                    Some(b.block_stmt(&[b.expr_stmt(b.assign(b.ident("x"), b.string("c")))])),
                ),
                b.ret(Some(after)),
            ]),
        )],
    );
    assert!(checker.diagnostics().is_empty(), "{:?}", messages(&checker));
    assert_eq!(type_at(&checker, &after), "\"c\"");
}

#[test]
fn test_assignment_replaces_narrowing() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let union = b.union_type(&[b.string_type(), b.null_type()]);
    let checker = check(
        &b,
        &[
            b.let_("thinker", Some(union), Some(b.null())),
            b.expr_stmt(b.assign(b.ident("thinker"), b.string("Susanne Langer"))),
            b.expr_stmt(b.call(b.member(b.ident("thinker"), "toUpperCase"), &[])),
        ],
    );
    assert!(checker.diagnostics().is_empty());
}

#[test]
fn test_narrowing_does_not_reach_into_closures_over_let() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let union = b.union_type(&[b.string_type(), b.undefined_type()]);
    let closure = b.arrow(&[], None, b.member(b.ident("value"), "length"));
    let checker = check(
        &b,
        &[
            b.let_("value", Some(union), None),
            b.if_(
                b.ident("value"),
                b.block_stmt(&[
                    b.expr_stmt(b.member(b.ident("value"), "length")),
                    b.const_("getLength", None, closure),
                ]),
                None,
            ),
        ],
    );
    assert_eq!(messages(&checker), vec!["'value' is possibly 'undefined'."]);
}

#[test]
fn test_strict_null_checks_off() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let union = b.union_type(&[b.string_type(), b.undefined_type()]);
    let body = b.block(&[b.expr_stmt(b.member(b.ident("v"), "length"))]);
    let statements = [
        b.let_("name", Some(b.string_type()), Some(b.null())),
        b.function("f", &[b.param("v", Some(union))], None, body),
    ];
    let options = CheckerOptions {
        strict_null_checks: false,
        ..CheckerOptions::default()
    };
    let relaxed = check_with(&b, options, &statements);
    assert!(relaxed.diagnostics().is_empty());

    let strict = check(&b, &statements);
    assert_eq!(
        messages(&strict),
        vec![
            "Type 'null' is not assignable to type 'string'.",
            "'v' is possibly 'undefined'.",
        ]
    );
}

// ============================================================================
// Objects and interfaces
// ============================================================================

fn poet_alias<'a>(b: &AstBuilder<'a>) -> Statement<'a> {
    b.type_alias(
        "Poet",
        b.type_literal(&[
            b.prop_sig("born", b.number_type()),
            b.prop_sig("name", b.string_type()),
        ]),
    )
}

#[test]
fn test_structural_object_assignability() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            poet_alias(&b),
            b.let_("poetLater", Some(b.type_ref("Poet")), None),
            b.expr_stmt(b.assign(
                b.ident("poetLater"),
                b.object(&[("born", b.number(1935.0)), ("name", b.string("Mary Oliver"))]),
            )),
            b.expr_stmt(b.assign(b.ident("poetLater"), b.string("Sappho"))),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec!["Type 'string' is not assignable to type 'Poet'."]
    );
}

#[test]
fn test_missing_required_member() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            poet_alias(&b),
            b.const_("partial", Some(b.type_ref("Poet")), b.object(&[("born", b.number(1935.0))])),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec!["Property 'name' is missing in type '{ born: number; }' but required in type 'Poet'."]
    );
    assert_eq!(kinds(&checker), vec![DiagnosticKind::MissingRequiredMember]);
}

#[test]
fn test_excess_property_on_fresh_literal_only() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let fresh = b.object(&[
        ("activity", b.string("orating")),
        ("born", b.number(1907.0)),
        ("name", b.string("Sappho")),
    ]);
    let stored = b.object(&[
        ("activity", b.string("orating")),
        ("born", b.number(1907.0)),
        ("name", b.string("Sappho")),
    ]);
    let checker = check(
        &b,
        &[
            poet_alias(&b),
            b.const_("poetMatch", Some(b.type_ref("Poet")), fresh),
            b.const_("extra", None, stored),
            b.const_("poetFromVariable", Some(b.type_ref("Poet")), b.ident("extra")),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec!["Object literal may only specify known properties, and 'activity' does not exist in type 'Poet'."]
    );
}

#[test]
fn test_nested_property_mismatch_is_elaborated() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let author = b.object(&[
        ("firstName", b.string("Ursula")),
        ("lastName", b.number(1929.0)),
    ]);
    let checker = check(
        &b,
        &[
            b.interface(
                "Writer",
                &[],
                &[
                    b.prop_sig("firstName", b.string_type()),
                    b.prop_sig("lastName", b.string_type()),
                ],
            ),
            b.interface(
                "Writing",
                &[],
                &[
                    b.prop_sig("author", b.type_ref("Writer")),
                    b.prop_sig("name", b.string_type()),
                ],
            ),
            b.const_(
                "book",
                Some(b.type_ref("Writing")),
                b.object(&[("author", author), ("name", b.string("The Dispossessed"))]),
            ),
        ],
    );
    let diagnostics = checker.diagnostics().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::IncompatibleAssignment);
    let chain = diagnostics[0].message_chain();
    assert!(chain.contains("Types of property 'author' are incompatible."));
    assert!(chain.contains("Types of property 'lastName' are incompatible."));
    assert!(chain.contains("Type 'number' is not assignable to type 'string'."));
}

#[test]
fn test_optional_member_versus_union_with_undefined() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let maybe_string = b.union_type(&[b.string_type(), b.undefined_type()]);
    let checker = check(
        &b,
        &[
            b.interface(
                "Writers",
                &[],
                &[
                    b.prop_sig("author", maybe_string),
                    b.optional_prop_sig("editor", b.string_type()),
                ],
            ),
            b.const_("hasAuthor", Some(b.type_ref("Writers")), b.object(&[("author", b.undefined())])),
            b.const_("missing", Some(b.type_ref("Writers")), b.object(&[])),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec!["Property 'author' is missing in type '{}' but required in type 'Writers'."]
    );
}

#[test]
fn test_readonly_property_write() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let body = b.block(&[
        b.expr_stmt(b.call(b.member(b.ident("console"), "log"), &[b.member(b.ident("page"), "text")])),
        b.expr_stmt(b.assign(b.member(b.ident("page"), "text"), b.string("Hello, world!"))),
    ]);
    let checker = check(
        &b,
        &[
            b.interface("Page", &[], &[b.readonly_prop_sig("text", b.string_type())]),
            b.function("read", &[b.param("page", Some(b.type_ref("Page")))], None, body),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec!["Cannot assign to 'text' because it is a read-only property."]
    );
}

#[test]
fn test_union_property_access_names_missing_constituent() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let body = b.block(&[
        b.expr_stmt(b.member(b.ident("poem"), "name")),
        b.expr_stmt(b.member(b.ident("poem"), "pages")),
    ]);
    let checker = check(
        &b,
        &[
            b.type_alias(
                "PoemWithPages",
                b.type_literal(&[
                    b.prop_sig("name", b.string_type()),
                    b.prop_sig("pages", b.number_type()),
                    b.prop_sig("type", b.string_literal_type("pages")),
                ]),
            ),
            b.type_alias(
                "PoemWithRhymes",
                b.type_literal(&[
                    b.prop_sig("name", b.string_type()),
                    b.prop_sig("rhymes", b.boolean_type()),
                    b.prop_sig("type", b.string_literal_type("rhymes")),
                ]),
            ),
            b.type_alias(
                "Poem",
                b.union_type(&[b.type_ref("PoemWithPages"), b.type_ref("PoemWithRhymes")]),
            ),
            b.function("f", &[b.param("poem", Some(b.type_ref("Poem")))], None, body),
        ],
    );
    let diagnostics = checker.diagnostics().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message_text,
        "Property 'pages' does not exist on type 'PoemWithPages | PoemWithRhymes'."
    );
    assert_eq!(
        diagnostics[0].related_information[0].message_text,
        "Property 'pages' does not exist on type 'PoemWithRhymes'."
    );
}

#[test]
fn test_interface_extension() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.interface("Writing", &[], &[b.prop_sig("title", b.string_type())]),
            b.interface("Novella", &["Writing"], &[b.prop_sig("pages", b.number_type())]),
            b.let_(
                "myNovella",
                Some(b.type_ref("Novella")),
                Some(b.object(&[("pages", b.number(195.0)), ("title", b.string("Ethan Frome"))])),
            ),
            b.let_(
                "missingPages",
                Some(b.type_ref("Novella")),
                Some(b.object(&[("title", b.string("The Awakening"))])),
            ),
            b.let_(
                "extraProperty",
                Some(b.type_ref("Novella")),
                Some(b.object(&[
                    ("pages", b.number(300.0)),
                    ("strategy", b.string("baseline")),
                    ("style", b.string("Naturalism")),
                ])),
            ),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec![
            "Property 'pages' is missing in type '{ title: string; }' but required in type 'Novella'.",
            "Object literal may only specify known properties, and 'strategy' does not exist in type 'Novella'.",
        ]
    );
}

#[test]
fn test_interface_merging() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.interface("Merged", &[], &[b.prop_sig("fromFirst", b.string_type())]),
            b.interface("Merged", &[], &[b.prop_sig("fromSecond", b.number_type())]),
            b.const_(
                "merged",
                Some(b.type_ref("Merged")),
                b.object(&[("fromFirst", b.string("a")), ("fromSecond", b.number(1.0))]),
            ),
            b.interface("Merged", &[], &[b.prop_sig("fromFirst", b.string_type())]),
        ],
    );
    assert!(checker.diagnostics().is_empty());

    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.interface("Merged", &[], &[b.prop_sig("fromFirst", b.string_type())]),
            b.interface("Merged", &[], &[b.prop_sig("fromFirst", b.number_type())]),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec!["Subsequent property declarations must have the same type. Property 'fromFirst' must be of type 'string', but here has type 'number'."]
    );
}

#[test]
fn test_recursive_interface() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let first_child = b.index(b.member(b.ident("t"), "children"), b.number(0.0));
    let checker = check(
        &b,
        &[
            b.interface(
                "Tree",
                &[],
                &[
                    b.prop_sig("value", b.number_type()),
                    b.prop_sig("children", b.array_type(b.type_ref("Tree"))),
                ],
            ),
            b.let_(
                "t",
                Some(b.type_ref("Tree")),
                Some(b.object(&[("value", b.number(1.0)), ("children", b.array(&[]))])),
            ),
            b.expr_stmt(b.member(first_child, "value")),
        ],
    );
    assert!(checker.diagnostics().is_empty(), "{:?}", messages(&checker));
    assert_eq!(type_at(&checker, &first_child), "Tree");
}

#[test]
fn test_mutually_recursive_interfaces() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let books = b.member(b.member(b.ident("novel"), "author"), "books");
    let checker = check(
        &b,
        &[
            b.interface(
                "Author",
                &[],
                &[
                    b.prop_sig("name", b.string_type()),
                    b.prop_sig("books", b.array_type(b.type_ref("Book"))),
                ],
            ),
            b.interface(
                "Book",
                &[],
                &[
                    b.prop_sig("title", b.string_type()),
                    b.prop_sig("author", b.type_ref("Author")),
                ],
            ),
            b.let_(
                "writer",
                Some(b.type_ref("Author")),
                Some(b.object(&[("name", b.string("Ursula K. Le Guin")), ("books", b.array(&[]))])),
            ),
            b.let_(
                "novel",
                Some(b.type_ref("Book")),
                Some(b.object(&[("title", b.string("The Dispossessed")), ("author", b.ident("writer"))])),
            ),
            b.expr_stmt(books),
            b.let_(
                "wrong",
                Some(b.type_ref("Book")),
                Some(b.object(&[("title", b.string("Lathe of Heaven")), ("author", b.ident("novel"))])),
            ),
        ],
    );
    assert_eq!(type_at(&checker, &books), "Book[]");
    assert_eq!(checker.diagnostics().diagnostics().len(), 1, "{:?}", messages(&checker));
}

#[test]
fn test_interface_extending_a_type_that_refers_back() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let label = b.member(b.member(b.ident("start"), "next"), "label");
    let checker = check(
        &b,
        &[
            b.interface("Step", &[], &[b.prop_sig("next", b.type_ref("Labeled"))]),
            b.interface("Labeled", &["Step"], &[b.prop_sig("label", b.string_type())]),
            b.function(
                "walk",
                &[b.param("start", Some(b.type_ref("Labeled")))],
                None,
                b.block(&[
                    b.expr_stmt(label),
                    b.expr_stmt(b.member(b.member(b.member(b.ident("start"), "next"), "next"), "label")),
                ]),
            ),
        ],
    );
    assert!(checker.diagnostics().is_empty(), "{:?}", messages(&checker));
    assert_eq!(type_at(&checker, &label), "string");
}

#[test]
fn test_base_still_resolving_is_inherited_afterwards() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let label = b.member(b.member(b.ident("start"), "next"), "label");
    let checker = check(
        &b,
        &[
            b.interface("Step", &[], &[b.prop_sig("next", b.type_ref("Labeled"))]),
            b.interface("Labeled", &["Step"], &[b.prop_sig("label", b.string_type())]),
            b.let_("start", Some(b.type_ref("Labeled")), None),
            b.expr_stmt(label),
            b.let_("step", Some(b.type_ref("Step")), Some(b.ident("start"))),
            b.expr_stmt(b.member(b.member(b.ident("step"), "next"), "next")),
        ],
    );
    assert!(checker.diagnostics().is_empty(), "{:?}", messages(&checker));
    assert_eq!(type_at(&checker, &label), "string");
}

#[test]
fn test_interface_extending_itself() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.interface("Ouroboros", &["Ouroboros"], &[b.prop_sig("tail", b.string_type())]),
            b.type_alias("Chain", b.union_type(&[b.string_type(), b.type_ref("Chain")])),
            b.type_alias(
                "List",
                b.type_literal(&[
                    b.prop_sig("head", b.number_type()),
                    b.prop_sig("tail", b.union_type(&[b.type_ref("List"), b.undefined_type()])),
                ]),
            ),
            b.let_(
                "list",
                Some(b.type_ref("List")),
                Some(b.object(&[
                    ("head", b.number(1.0)),
                    ("tail", b.object(&[("head", b.number(2.0)), ("tail", b.undefined())])),
                ])),
            ),
            b.let_("chain", Some(b.type_ref("Chain")), None),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec![
            "Type 'Ouroboros' recursively references itself as a base type.",
            "Type alias 'Chain' circularly references itself.",
        ]
    );
}

#[test]
fn test_index_signature_writes() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.interface("WordCounts", &[], &[b.index_sig("i", b.string_type(), b.number_type())]),
            b.const_("counts", Some(b.type_ref("WordCounts")), b.object(&[])),
            b.expr_stmt(b.assign(b.member(b.ident("counts"), "apple"), b.number(0.0))),
            b.expr_stmt(b.assign(b.member(b.ident("counts"), "cherry"), b.boolean(false))),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec!["Type 'boolean' is not assignable to type 'number'."]
    );
}

#[test]
fn test_methods_and_function_properties_in_literals() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let literal = b.object_with(&[
        b.prop("property", b.arrow(&[], None, b.string(""))),
        b.method("method", &[], None, b.block(&[b.ret(Some(b.string("")))])),
    ]);
    let checker = check(
        &b,
        &[
            b.interface(
                "HasBothFunctionTypes",
                &[],
                &[
                    b.prop_sig("property", b.function_type(&[], b.string_type())),
                    b.method_sig("method", &[], b.string_type()),
                    b.optional_method_sig("optionalMethod", &[], b.string_type()),
                ],
            ),
            b.const_("hasBoth", Some(b.type_ref("HasBothFunctionTypes")), literal),
        ],
    );
    assert!(checker.diagnostics().is_empty());
}

#[test]
fn test_intersection_with_union_of_shapes() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let short_poem = b.intersection_type(&[
        b.type_literal(&[b.prop_sig("author", b.string_type())]),
        b.paren_type(b.union_type(&[
            b.type_literal(&[
                b.prop_sig("kigo", b.string_type()),
                b.prop_sig("type", b.string_literal_type("haiku")),
            ]),
            b.type_literal(&[
                b.prop_sig("meter", b.number_type()),
                b.prop_sig("type", b.string_literal_type("villanelle")),
            ]),
        ])),
    ]);
    let checker = check(
        &b,
        &[
            b.type_alias("ShortPoem", short_poem),
            b.const_(
                "morningGlory",
                Some(b.type_ref("ShortPoem")),
                b.object(&[
                    ("author", b.string("Fukuda Chiyo-ni")),
                    ("kigo", b.string("Morning Glory")),
                    ("type", b.string("haiku")),
                ]),
            ),
            b.const_(
                "oneArt",
                Some(b.type_ref("ShortPoem")),
                b.object(&[("author", b.string("Elizabeth Bishop")), ("type", b.string("villanelle"))]),
            ),
        ],
    );
    assert_eq!(kinds(&checker), vec![DiagnosticKind::IncompatibleAssignment]);
}

#[test]
fn test_structural_typing_ignores_names() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.interface("WithFirstName", &[], &[b.prop_sig("firstName", b.string_type())]),
            b.interface("WithLastName", &[], &[b.prop_sig("lastName", b.string_type())]),
            b.const_(
                "hasBoth",
                None,
                b.object(&[("firstName", b.string("Lucille")), ("lastName", b.string("Clifton"))]),
            ),
            b.let_("withFirstName", Some(b.type_ref("WithFirstName")), Some(b.ident("hasBoth"))),
            b.let_("withLastName", Some(b.type_ref("WithLastName")), Some(b.ident("hasBoth"))),
        ],
    );
    assert!(checker.diagnostics().is_empty());
}

#[test]
fn test_prelude_date_members() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let body = b.block(&[
        b.expr_stmt(b.call(b.member(b.ident("d"), "getFullYear"), &[])),
        b.expr_stmt(b.call(b.member(b.ident("d"), "toFixed"), &[])),
    ]);
    let checker = check(&b, &[b.function("f", &[b.param("d", Some(b.type_ref("Date")))], None, body)]);
    assert_eq!(
        messages(&checker),
        vec!["Property 'toFixed' does not exist on type 'Date'."]
    );
}

#[test]
fn test_new_date_in_index_signature_record() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let frankenstein = b.member(b.ident("publishDates"), "Frankenstein");
    let checker = check(
        &b,
        &[
            b.interface("DateByName", &[], &[b.index_sig("i", b.string_type(), b.type_ref("Date"))]),
            b.const_(
                "publishDates",
                Some(b.type_ref("DateByName")),
                b.object(&[("Frankenstein", b.new_(b.ident("Date"), &[b.string("1 January 1818")]))]),
            ),
            b.expr_stmt(b.call(b.member(frankenstein, "toString"), &[])),
            b.let_("today", None, Some(b.new_(b.ident("Date"), &[]))),
            b.expr_stmt(b.new_(b.ident("Math"), &[])),
        ],
    );
    assert_eq!(type_at(&checker, &frankenstein), "Date");
    assert_eq!(binding_type(&checker, "today"), "Date");
    assert_eq!(
        messages(&checker),
        vec!["This expression is not constructable. Type 'Math' has no construct signatures."]
    );
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_properties_assigned_to_a_function_declaration() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let count = || b.member(b.ident("keepsTrackOfCalls"), "count");
    let log = |message| {
        b.expr_stmt(b.call(b.member(b.ident("console"), "log"), &[message]))
    };
    let checker = check(
        &b,
        &[
            b.interface(
                "FunctionWithCount",
                &[],
                &[b.prop_sig("count", b.number_type()), b.call_sig(&[], b.void_type())],
            ),
            b.let_("hasCallCount", Some(b.type_ref("FunctionWithCount")), None),
            b.function(
                "keepsTrackOfCalls",
                &[],
                None,
                b.block(&[
                    b.expr_stmt(b.binary(count(), BinaryOperator::PlusAssign, b.number(1.0))),
                    log(b.template(&[count()])),
                ]),
            ),
            b.expr_stmt(b.assign(count(), b.number(0.0))),
            b.expr_stmt(b.assign(b.ident("hasCallCount"), b.ident("keepsTrackOfCalls"))),
            b.expr_stmt(b.call(b.ident("keepsTrackOfCalls"), &[])),
            b.function("doesNotHaveCount", &[], None, b.block(&[log(b.string("No Idea!"))])),
            b.expr_stmt(b.assign(b.ident("hasCallCount"), b.ident("doesNotHaveCount"))),
            b.expr_stmt(b.assign(count(), b.string("zero"))),
        ],
    );
    assert_eq!(
        kinds(&checker),
        vec![DiagnosticKind::MissingRequiredMember, DiagnosticKind::IncompatibleAssignment]
    );
    let messages = messages(&checker);
    assert!(messages[0].contains("Property 'count' is missing in type '() => void'"), "{}", messages[0]);
    assert_eq!(messages[1], "Type 'string' is not assignable to type 'number'.");
}

#[test]
fn test_call_arity() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let body = b.block(&[b.expr_stmt(b.call(
        b.member(b.ident("console"), "log"),
        &[b.template(&[b.ident("song")])],
    ))]);
    let checker = check(
        &b,
        &[
            b.function("sing", &[b.param("song", Some(b.string_type()))], None, body),
            b.expr_stmt(b.call(b.ident("sing"), &[b.string("Greensleeves")])),
            b.expr_stmt(b.call(b.ident("sing"), &[])),
            b.expr_stmt(b.call(b.ident("sing"), &[b.string("a"), b.string("b")])),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec![
            "Expected 1 arguments, but got 0.",
            "Expected 1 arguments, but got 2.",
        ]
    );
    assert_eq!(binding_type(&checker, "sing"), "(song: string) => void");
}

#[test]
fn test_optional_and_default_parameters() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let announce_body = b.block(&[b.if_(
        b.ident("singer"),
        b.expr_stmt(b.call(b.member(b.ident("console"), "log"), &[b.ident("singer")])),
        None,
    )]);
    let rate_body = b.block(&[b.ret(Some(b.template(&[b.ident("song"), b.ident("rating")])))]);
    let checker = check(
        &b,
        &[
            b.function(
                "announceSong",
                &[
                    b.param("song", Some(b.string_type())),
                    b.optional_param("singer", Some(b.string_type())),
                ],
                None,
                announce_body,
            ),
            b.function(
                "rateSong",
                &[
                    b.param("song", Some(b.string_type())),
                    b.default_param("rating", None, b.number(0.0)),
                ],
                None,
                rate_body,
            ),
            b.expr_stmt(b.call(b.ident("announceSong"), &[b.string("Greensleeves")])),
            b.expr_stmt(b.call(b.ident("announceSong"), &[b.string("Greensleeves"), b.undefined()])),
            b.expr_stmt(b.call(b.ident("announceSong"), &[b.string("Chandelier"), b.string("Sia")])),
            b.expr_stmt(b.call(b.ident("rateSong"), &[b.string("Photograph")])),
            b.expr_stmt(b.call(b.ident("rateSong"), &[b.string("Set Fire to the Rain"), b.number(5.0)])),
            b.expr_stmt(b.call(b.ident("rateSong"), &[b.string("At Last!"), b.string("100")])),
            b.expr_stmt(b.call(b.ident("rateSong"), &[])),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec![
            "Argument of type 'string' is not assignable to parameter of type 'number'.",
            "Expected 1-2 arguments, but got 0.",
        ]
    );
    assert_eq!(
        binding_type(&checker, "rateSong"),
        "(song: string, rating?: number) => string"
    );
}

#[test]
fn test_rest_parameters_and_spread_arguments() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.function(
                "singAllTheSongs",
                &[
                    b.param("singer", Some(b.string_type())),
                    b.rest_param("songs", Some(b.array_type(b.string_type()))),
                ],
                None,
                b.block(&[]),
            ),
            b.expr_stmt(b.call(b.ident("singAllTheSongs"), &[b.string("Alicia Keys")])),
            b.expr_stmt(b.call(
                b.ident("singAllTheSongs"),
                &[b.string("Lady Gaga"), b.string("Bad Romance"), b.string("Just Dance")],
            )),
            b.expr_stmt(b.call(b.ident("singAllTheSongs"), &[b.string("Ella Fitzgerald"), b.number(2000.0)])),
            b.expr_stmt(b.call(b.ident("singAllTheSongs"), &[])),
            b.const_("birthYears", None, b.array(&[b.number(1844.0), b.number(1840.0)])),
            b.expr_stmt(b.call(
                b.ident("singAllTheSongs"),
                &[b.string("Born in"), b.spread(b.ident("birthYears"))],
            )),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec![
            "Argument of type 'number' is not assignable to parameter of type 'string'.",
            "Expected at least 1 arguments, but got 0.",
            "Argument of type 'number' is not assignable to parameter of type 'string'.",
        ]
    );
}

#[test]
fn test_return_type_annotation_is_enforced() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[b.function(
            "countSongs",
            &[b.param("songs", Some(b.array_type(b.string_type())))],
            Some(b.number_type()),
            b.block(&[b.ret(Some(b.string("many")))]),
        )],
    );
    assert_eq!(
        messages(&checker),
        vec!["Type 'string' is not assignable to type 'number'."]
    );
}

#[test]
fn test_function_declarations_are_hoisted() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.const_("total", None, b.call(b.ident("add"), &[b.number(1.0), b.number(2.0)])),
            b.function(
                "add",
                &[b.param("a", Some(b.number_type())), b.param("b", Some(b.number_type()))],
                Some(b.number_type()),
                b.block(&[b.ret(Some(b.binary(b.ident("a"), BinaryOperator::Plus, b.ident("b"))))]),
            ),
        ],
    );
    assert!(checker.diagnostics().is_empty());
    assert_eq!(binding_type(&checker, "total"), "number");
}

#[test]
fn test_contextual_parameter_types() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let log = b.arrow_block(
        &[b.param("song", None), b.param("index", None)],
        None,
        b.block(&[b.expr_stmt(b.call(
            b.member(b.ident("console"), "log"),
            &[b.template(&[b.ident("song"), b.ident("index")])],
        ))]),
    );
    let wrong = b.arrow(&[b.param("song", None)], None, b.call(b.member(b.ident("song"), "toFixed"), &[]));
    let options = CheckerOptions {
        no_implicit_any: true,
        ..CheckerOptions::default()
    };
    let checker = check_with(
        &b,
        options,
        &[
            b.const_(
                "songs",
                None,
                b.array(&[b.string("Juice"), b.string("Shake It Off"), b.string("What's Up")]),
            ),
            b.expr_stmt(b.call(b.member(b.ident("songs"), "forEach"), &[log])),
            b.expr_stmt(b.call(b.member(b.ident("songs"), "forEach"), &[wrong])),
        ],
    );
    assert_eq!(binding_type(&checker, "songs"), "string[]");
    assert_eq!(
        messages(&checker),
        vec!["Property 'toFixed' does not exist on type 'string'."]
    );
}

#[test]
fn test_function_type_assignment() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let fine = b.arrow(&[b.param("input", None)], None, b.member(b.ident("input"), "length"));
    let wrong = b.arrow(
        &[b.param("input", None)],
        None,
        b.call(b.member(b.ident("input"), "toUpperCase"), &[]),
    );
    let checker = check(
        &b,
        &[
            b.type_alias(
                "StringToNumber",
                b.function_type(&[b.param("input", Some(b.string_type()))], b.number_type()),
            ),
            b.let_("convert", Some(b.type_ref("StringToNumber")), None),
            b.expr_stmt(b.assign(b.ident("convert"), fine)),
            b.expr_stmt(b.assign(b.ident("convert"), wrong)),
        ],
    );
    let diagnostics = checker.diagnostics().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message_text,
        "Type '(input: string) => string' is not assignable to type 'StringToNumber'."
    );
    assert!(diagnostics[0]
        .message_chain()
        .contains("Return type 'string' is not assignable to 'number'."));
}

#[test]
fn test_parameter_ordering_and_implicit_any() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let statements = [
        b.function(
            "ordered",
            &[
                b.optional_param("first", Some(b.string_type())),
                b.param("second", Some(b.number_type())),
            ],
            None,
            b.block(&[]),
        ),
        b.function("untyped", &[b.param("value", None)], None, b.block(&[])),
    ];
    let lenient = check(&b, &statements);
    assert_eq!(kinds(&lenient), vec![DiagnosticKind::RequiredAfterOptional]);

    let options = CheckerOptions {
        no_implicit_any: true,
        ..CheckerOptions::default()
    };
    let strict = check_with(&b, options, &statements);
    assert_eq!(
        messages(&strict),
        vec![
            "A required parameter cannot follow an optional parameter.",
            "Parameter 'value' implicitly has an 'any' type.",
        ]
    );
}

#[test]
fn test_call_on_non_callable() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.let_("count", None, Some(b.number(1.0))),
            b.expr_stmt(b.call(b.ident("count"), &[])),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec!["This expression is not callable. Type 'number' has no call signatures."]
    );
}

// ============================================================================
// Arrays and tuples
// ============================================================================

#[test]
fn test_array_element_checks() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.const_("warriors", None, b.array(&[b.string("Artemisia"), b.string("Boudica")])),
            b.expr_stmt(b.call(b.member(b.ident("warriors"), "push"), &[b.string("Zenobia")])),
            b.expr_stmt(b.call(b.member(b.ident("warriors"), "push"), &[b.boolean(true)])),
        ],
    );
    assert_eq!(
        messages(&checker),
        vec!["Argument of type 'boolean' is not assignable to parameter of type 'string'."]
    );
}

#[test]
fn test_tuple_assignments() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let pair = b.tuple_type(&[b.number_type(), b.string_type()]);
    let checker = check(
        &b,
        &[
            b.let_("yearAndWarrior", Some(pair), None),
            b.expr_stmt(b.assign(
                b.ident("yearAndWarrior"),
                b.array(&[b.number(530.0), b.string("Tomyris")]),
            )),
            b.expr_stmt(b.assign(
                b.ident("yearAndWarrior"),
                b.array(&[b.boolean(false), b.string("Tomyris")]),
            )),
            b.expr_stmt(b.assign(b.ident("yearAndWarrior"), b.array(&[b.number(530.0)]))),
        ],
    );
    assert_eq!(
        kinds(&checker),
        vec![
            DiagnosticKind::IncompatibleAssignment,
            DiagnosticKind::ExcessDiscriminant,
        ]
    );
    let messages = messages(&checker);
    assert_eq!(
        messages[0],
        "Type '[boolean, string]' is not assignable to type '[number, string]'."
    );
    assert!(messages[1].ends_with("Source has 1 element(s) but target requires 2."));
}

#[test]
fn test_array_is_not_assignable_to_tuple() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let checker = check(
        &b,
        &[
            b.const_("pairLoose", None, b.array(&[b.boolean(false), b.number(123.0)])),
            b.const_(
                "pairTupleLoose",
                Some(b.tuple_type(&[b.boolean_type(), b.number_type()])),
                b.ident("pairLoose"),
            ),
        ],
    );
    assert_eq!(binding_type(&checker, "pairLoose"), "(boolean | number)[]");
    let diagnostics = checker.diagnostics().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message_text,
        "Type '(boolean | number)[]' is not assignable to type '[boolean, number]'."
    );
    assert_eq!(
        diagnostics[0].related_information[0].message_text,
        "Target requires 2 element(s) but source may have fewer."
    );
}

#[test]
fn test_tuple_element_access() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let first = b.index(b.ident("pair"), b.number(0.0));
    let checker = check(
        &b,
        &[
            b.const_(
                "pair",
                Some(b.tuple_type(&[b.number_type(), b.string_type()])),
                b.array(&[b.number(1.0), b.string("a")]),
            ),
            b.expr_stmt(first),
            b.expr_stmt(b.index(b.ident("pair"), b.number(2.0))),
        ],
    );
    assert_eq!(type_at(&checker, &first), "number");
    assert_eq!(
        messages(&checker),
        vec!["Tuple type '[number, string]' of length '2' has no element at index '2'."]
    );
}

#[test]
fn test_spreads_and_for_of() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena, Interner::new());
    let element = b.ident("soldier");
    let checker = check(
        &b,
        &[
            b.const_("soldiers", None, b.array(&[b.string("Harriet Tubman"), b.string("Joan of Arc")])),
            b.const_("soldierAges", None, b.array(&[b.number(90.0), b.number(19.0)])),
            b.const_(
                "conjoined",
                None,
                b.array(&[b.spread(b.ident("soldiers")), b.spread(b.ident("soldierAges"))]),
            ),
            b.for_of(
                "soldier",
                b.ident("soldiers"),
                b.block_stmt(&[b.expr_stmt(b.call(b.member(element, "toUpperCase"), &[]))]),
            ),
        ],
    );
    assert!(checker.diagnostics().is_empty());
    assert_eq!(binding_type(&checker, "conjoined"), "(string | number)[]");
    assert_eq!(type_at(&checker, &element), "string");
}
