use super::*;
use pretty_assertions::assert_eq;
use saga_ir::SharedInterner;

#[test]
fn bind_and_resolve_in_global_scope() {
    let interner = SharedInterner::default();
    let name = interner.intern("goblin");

    let mut table = SymbolTable::new();
    let id = table
        .bind(ScopeId::GLOBAL, name, None, SymbolKind::Member)
        .expect("first bind cannot conflict");

    assert_eq!(table.resolve(ScopeId::GLOBAL, name), Some(id));
    assert_eq!(table.symbol(id).name, name);
    assert_eq!(table.symbol(id).scope, ScopeId::GLOBAL);
}

#[test]
fn duplicate_bind_is_rejected_and_first_wins() {
    let interner = SharedInterner::default();
    let name = interner.intern("health_component");

    let mut table = SymbolTable::new();
    let first = table
        .bind(ScopeId::GLOBAL, name, None, SymbolKind::Member)
        .expect("first bind cannot conflict");
    let second = table.bind(ScopeId::GLOBAL, name, None, SymbolKind::Callback);

    match second {
        Err(dup) => assert_eq!(dup.existing, first),
        Ok(_) => panic!("second bind of the same name must fail"),
    }
    assert_eq!(table.resolve(ScopeId::GLOBAL, name), Some(first));
}

#[test]
fn resolution_walks_the_parent_chain() {
    let interner = SharedInterner::default();
    let outer = interner.intern("outer");
    let inner = interner.intern("inner");

    let mut table = SymbolTable::new();
    let nested = table.new_scope(ScopeId::GLOBAL);
    let outer_id = table
        .bind(ScopeId::GLOBAL, outer, None, SymbolKind::Member)
        .expect("bind failed");
    let inner_id = table
        .bind(nested, inner, None, SymbolKind::Member)
        .expect("bind failed");

    // Nested scope sees both; global scope only its own.
    assert_eq!(table.resolve(nested, outer), Some(outer_id));
    assert_eq!(table.resolve(nested, inner), Some(inner_id));
    assert_eq!(table.resolve(ScopeId::GLOBAL, inner), None);
}

#[test]
fn resolve_local_does_not_consult_parents() {
    let interner = SharedInterner::default();
    let name = interner.intern("max_points");

    let mut table = SymbolTable::new();
    let nested = table.new_scope(ScopeId::GLOBAL);
    table
        .bind(ScopeId::GLOBAL, name, None, SymbolKind::Member)
        .expect("bind failed");

    assert_eq!(table.resolve_local(nested, name), None);
    assert!(table.resolve_local(ScopeId::GLOBAL, name).is_some());
}

#[test]
fn scope_symbols_preserve_declaration_order() {
    let interner = SharedInterner::default();
    let names: Vec<_> = ["item_name", "amount", "on_collect"]
        .iter()
        .map(|s| interner.intern(s))
        .collect();

    let mut table = SymbolTable::new();
    let scope = table.new_scope(ScopeId::GLOBAL);
    for &n in &names {
        table
            .bind(scope, n, None, SymbolKind::Member)
            .expect("bind failed");
    }

    let declared: Vec<_> = table
        .scope_symbols(scope)
        .map(|id| table.symbol(id).name)
        .collect();
    assert_eq!(declared, names);
    assert_eq!(table.scope_len(scope), 3);
}
