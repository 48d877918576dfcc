//! Benchmark harness for the checker.
//!
//! Run with: cargo bench -p minits_checker

use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use minits_ast::{AstBuilder, Statement};
use minits_checker::{Checker, ObjectShape, PropertyInfo, Relation, TypeId, TypeTable};
use minits_core::Interner;
use minits_options::CheckerOptions;

/// An object type with `width` numbered string properties.
fn wide_object(t: &mut TypeTable, width: usize, prefix: &str) -> TypeId {
    let properties = (0..width)
        .map(|i| {
            let name = t.interner().intern(&format!("{}{}", prefix, i));
            PropertyInfo::new(name, t.string)
        })
        .collect();
    t.object(ObjectShape {
        properties,
        ..ObjectShape::default()
    })
}

/// A union of `count` distinct object types.
fn object_union(t: &mut TypeTable, count: usize) -> TypeId {
    let members: Vec<TypeId> = (0..count)
        .map(|i| wide_object(t, 8, &format!("m{}_", i)))
        .collect();
    t.union(members)
}

/// A program of `count` interfaces, each with a narrowing consumer and a
/// call site.
fn generate_program<'a>(b: &AstBuilder<'a>, count: usize) -> Vec<Statement<'a>> {
    let mut statements = Vec::with_capacity(count * 3);
    for i in 0..count {
        let item = format!("Item{}", i);
        let consumer = format!("use{}", i);
        statements.push(b.interface(
            &item,
            &[],
            &[
                b.prop_sig("name", b.string_type()),
                b.prop_sig("count", b.number_type()),
                b.optional_prop_sig("tag", b.string_type()),
            ],
        ));
        let param = b.union_type(&[b.type_ref(&item), b.undefined_type()]);
        let body = b.block(&[
            b.if_(
                b.strict_eq(b.ident("item"), b.undefined()),
                b.ret(Some(b.number(0.0))),
                None,
            ),
            b.ret(Some(b.member(b.ident("item"), "count"))),
        ]);
        statements.push(b.function(
            &consumer,
            &[b.param("item", Some(param))],
            Some(b.number_type()),
            body,
        ));
        let argument = b.object(&[("name", b.string("x")), ("count", b.number(i as f64))]);
        statements.push(b.const_(
            &format!("result{}", i),
            None,
            b.call(b.ident(&consumer), &[argument]),
        ));
    }
    statements
}

// ============================================================================
// Relation benchmarks
// ============================================================================

fn bench_relation(c: &mut Criterion) {
    let mut group = c.benchmark_group("relation");

    group.bench_function("wide_object", |bench| {
        let mut t = TypeTable::new(Interner::new());
        let source = wide_object(&mut t, 64, "p");
        let target = wide_object(&mut t, 32, "p");
        bench.iter(|| {
            let mut relation = Relation::new(&CheckerOptions::default());
            black_box(relation.is_assignable(&t, black_box(source), black_box(target)))
        });
    });

    group.bench_function("object_union", |bench| {
        let mut t = TypeTable::new(Interner::new());
        let source = object_union(&mut t, 16);
        let target = object_union(&mut t, 32);
        bench.iter(|| {
            let mut relation = Relation::new(&CheckerOptions::default());
            black_box(relation.is_assignable(&t, black_box(source), black_box(target)))
        });
    });

    group.bench_function("cached", |bench| {
        let mut t = TypeTable::new(Interner::new());
        let source = object_union(&mut t, 16);
        let target = object_union(&mut t, 32);
        let mut relation = Relation::new(&CheckerOptions::default());
        bench.iter(|| black_box(relation.is_assignable(&t, black_box(source), black_box(target))));
    });

    group.finish();
}

// ============================================================================
// Checker benchmarks
// ============================================================================

fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check");
    for count in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |bench, &count| {
            let arena = Bump::new();
            let b = AstBuilder::new(&arena, Interner::new());
            let statements = generate_program(&b, count);
            let file = b.source_file("bench.ts", &statements);
            bench.iter(|| {
                let mut checker = Checker::new(b.interner().clone());
                checker.check_source_file(black_box(file));
                black_box(checker.diagnostics().len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_relation, bench_check);
criterion_main!(benches);
