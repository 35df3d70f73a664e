use tabled::{Table, Tabled};

use crate::scopes::VALID_SCOPES;

#[derive(Tabled)]
struct ScopeRow {
    index: usize,
    scope: &'static str,
}

pub fn scopes() {
    let rows: Vec<ScopeRow> = VALID_SCOPES
        .iter()
        .enumerate()
        .map(|(index, &scope)| ScopeRow { index, scope })
        .collect();
    println!("{}", Table::new(rows));
}
