//! Tests for dependency propagation, cycle detection and cycle recovery

use my_sheets::prelude::*;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

const CYCLE: CellValue = CellValue::Error(CellError::Cycle);

fn number(n: f64) -> CellValue {
    CellValue::Number(n)
}

fn value(sheet: &mut Worksheet, address: &str) -> CellValue {
    sheet.cell(address).unwrap().value().clone()
}

fn set(sheet: &mut Worksheet, address: &str, expression: &str) {
    sheet.set_cell_at_address(address, expression).unwrap();
}

/// Record every change notification as an A1 address
fn record(sheet: &mut Worksheet) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    sheet.subscribe(move |addr| sink.borrow_mut().push(addr.to_string()));
    log
}

#[test]
fn test_dependent_updates() {
    let mut sheet = Worksheet::new();
    sheet.set_cell(0, 0, "10");
    sheet.set_cell(0, 1, "=A1*2");
    assert_eq!(sheet.get_cell(0, 1).value(), &number(20.0));

    sheet.set_cell(0, 0, "5");
    assert_eq!(sheet.get_cell(0, 1).value(), &number(10.0));

    sheet.set_cell(0, 0, "3");
    assert_eq!(sheet.get_cell(0, 1).value(), &number(6.0));
}

#[test]
fn test_chained_dependencies() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "2");
    set(&mut sheet, "B1", "=A1*2");
    set(&mut sheet, "C1", "=B1+1");
    assert_eq!(value(&mut sheet, "C1"), number(5.0));

    set(&mut sheet, "A1", "5");
    assert_eq!(value(&mut sheet, "C1"), number(11.0));
}

#[test]
fn test_deep_chain() {
    let mut sheet = Worksheet::new();
    sheet.set_cell(0, 0, "1");
    for col in 1..10 {
        let previous = CellAddress::new(0, col - 1);
        sheet.set_cell(0, col, format!("={} + 1", previous));
    }
    assert_eq!(sheet.get_cell(0, 9).value(), &number(10.0));

    sheet.set_cell(0, 0, "11");
    assert_eq!(sheet.get_cell(0, 9).value(), &number(20.0));
}

#[test]
fn test_dependency_through_functions() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "1");
    set(&mut sheet, "B1", "2");
    set(&mut sheet, "C1", "=SUM(A1, B1)");
    set(&mut sheet, "D1", "=MAX(C1, 10)");
    assert_eq!(value(&mut sheet, "C1"), number(3.0));
    assert_eq!(value(&mut sheet, "D1"), number(10.0));

    set(&mut sheet, "A1", "20");
    assert_eq!(value(&mut sheet, "C1"), number(22.0));
    assert_eq!(value(&mut sheet, "D1"), number(22.0));
}

#[test]
fn test_range_dependents_update() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "1");
    set(&mut sheet, "A2", "2");
    set(&mut sheet, "A3", "3");
    set(&mut sheet, "B1", "=SUM(A1:A3)");

    set(&mut sheet, "A2", "20");
    assert_eq!(value(&mut sheet, "B1"), number(24.0));
}

#[test]
fn test_replacing_formula_drops_old_edges() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "1");
    set(&mut sheet, "B1", "=A1");
    set(&mut sheet, "B1", "7");

    assert!(sheet.dependents_of(0, 0).is_empty());
    set(&mut sheet, "A1", "100");
    assert_eq!(value(&mut sheet, "B1"), number(7.0));
}

#[test]
fn test_setting_same_expression_is_idempotent() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "4");
    set(&mut sheet, "B1", "=A1*A1+C1");

    let value_before = value(&mut sheet, "B1");
    let graph_before = sheet.dependency_graph().clone();

    set(&mut sheet, "B1", "=A1*A1+C1");

    assert_eq!(value(&mut sheet, "B1"), value_before);
    assert_eq!(sheet.dependency_graph(), &graph_before);
}

#[test]
fn test_self_reference_is_a_cycle() {
    let mut sheet = Worksheet::new();
    sheet.set_cell(0, 0, "=A1+1");

    assert_eq!(sheet.get_cell(0, 0).value(), &CYCLE);
    assert_eq!(sheet.get_cell(0, 0).value().to_string(), "#CYCLE!");
    assert!(sheet.dependency_graph().is_empty());
}

#[test]
fn test_mutual_reference_marks_both_cells() {
    let mut sheet = Worksheet::new();
    sheet.set_cell(0, 0, "=B1+1");
    sheet.set_cell(0, 1, "=A1+1");

    assert_eq!(sheet.get_cell(0, 0).value(), &CYCLE);
    assert_eq!(sheet.get_cell(0, 1).value(), &CYCLE);
}

#[test]
fn test_long_cycle_marks_every_member() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "=B1");
    set(&mut sheet, "B1", "=C1");
    set(&mut sheet, "C1", "=D1");
    set(&mut sheet, "D1", "=A1");

    for address in ["A1", "B1", "C1", "D1"] {
        assert_eq!(value(&mut sheet, address), CYCLE, "{address}");
    }
}

#[test]
fn test_cycle_poisons_readers() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "C1", "=A1*2");
    set(&mut sheet, "D1", "=SUM(C1, 1)");
    set(&mut sheet, "A1", "=B1+1");
    set(&mut sheet, "B1", "=A1+1");

    assert_eq!(value(&mut sheet, "C1"), CYCLE);
    assert_eq!(value(&mut sheet, "D1"), CYCLE);
}

#[test]
fn test_breaking_a_cycle_recovers_the_other_member() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "=B1+1");
    set(&mut sheet, "B1", "=A1+1");

    set(&mut sheet, "B1", "5");

    assert_eq!(value(&mut sheet, "B1"), number(5.0));
    assert_eq!(value(&mut sheet, "A1"), number(6.0));
}

#[test]
fn test_breaking_a_cycle_from_the_first_member() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "=B1+1");
    set(&mut sheet, "B1", "=A1+1");

    set(&mut sheet, "A1", "10");

    assert_eq!(value(&mut sheet, "A1"), number(10.0));
    assert_eq!(value(&mut sheet, "B1"), number(11.0));
}

#[test]
fn test_breaking_a_cycle_recovers_readers() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "C1", "=A1*2");
    set(&mut sheet, "A1", "=B1+1");
    set(&mut sheet, "B1", "=A1+1");
    assert_eq!(value(&mut sheet, "C1"), CYCLE);

    set(&mut sheet, "B1", "1");

    assert_eq!(value(&mut sheet, "A1"), number(2.0));
    assert_eq!(value(&mut sheet, "C1"), number(4.0));
}

#[test]
fn test_cycle_recovery_after_unrelated_edit() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "=A1");
    assert_eq!(value(&mut sheet, "A1"), CYCLE);

    // Editing another cell rescans, but a self-reference never resolves
    set(&mut sheet, "Z1", "1");
    assert_eq!(value(&mut sheet, "A1"), CYCLE);
}

#[test]
fn test_notifications_for_plain_edit() {
    let mut sheet = Worksheet::new();
    let log = record(&mut sheet);

    set(&mut sheet, "A1", "1");
    assert_eq!(*log.borrow(), ["A1"]);
}

#[test]
fn test_notifications_include_cascade() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "1");
    set(&mut sheet, "B1", "=A1+1");
    set(&mut sheet, "C1", "=B1+1");

    let log = record(&mut sheet);
    set(&mut sheet, "A1", "2");

    assert_eq!(*log.borrow(), ["A1", "B1", "C1"]);
}

#[test]
fn test_notifications_for_cycle_marking() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "=B1+1");

    let log = record(&mut sheet);
    set(&mut sheet, "B1", "=A1+1");

    // Marking reports the cycle path (reader first), then the edit itself, then
    // the cascade into A1; the recovery rescan re-detects the cycle from B1
    assert_eq!(*log.borrow(), ["B1", "A1", "B1", "A1", "B1", "A1"]);
}

#[test]
fn test_notifications_for_recovery() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "=B1+1");
    set(&mut sheet, "B1", "=A1+1");

    let log = record(&mut sheet);
    set(&mut sheet, "B1", "5");

    let notified = log.borrow().clone();
    assert_eq!(notified.first().map(String::as_str), Some("B1"));
    assert!(notified.contains(&"A1".to_string()));
}

#[test]
fn test_multiple_listeners_in_order() {
    let mut sheet = Worksheet::new();
    let calls = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&calls);
    sheet.subscribe(move |_| first.borrow_mut().push("first"));
    let second = Rc::clone(&calls);
    sheet.subscribe(move |_| second.borrow_mut().push("second"));

    sheet.set_cell(0, 0, "1");
    assert_eq!(*calls.borrow(), ["first", "second"]);
}

#[test]
fn test_diamond_cascade_reevaluates_per_path() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "1");
    set(&mut sheet, "B1", "=A1+1");
    set(&mut sheet, "C1", "=A1*2");
    set(&mut sheet, "D1", "=B1+C1");

    let log = record(&mut sheet);
    set(&mut sheet, "A1", "3");

    assert_eq!(value(&mut sheet, "D1"), number(10.0));
    let d1_updates = log.borrow().iter().filter(|a| *a == "D1").count();
    assert_eq!(d1_updates, 2);
}

#[test]
fn test_ordered_mode_evaluates_each_dependent_once() {
    let options = CalculationOptions::default().with_recalc_mode(RecalcMode::Ordered);
    let mut sheet = Worksheet::with_options(options);
    assert_eq!(sheet.options().recalc_mode, RecalcMode::Ordered);

    set(&mut sheet, "A1", "1");
    set(&mut sheet, "B1", "=A1+1");
    set(&mut sheet, "C1", "=A1*2");
    set(&mut sheet, "D1", "=B1+C1");

    let log = record(&mut sheet);
    set(&mut sheet, "A1", "3");

    assert_eq!(value(&mut sheet, "D1"), number(10.0));
    let notified = log.borrow().clone();
    assert_eq!(notified.len(), 4);
    assert_eq!(notified.first().map(String::as_str), Some("A1"));
    assert_eq!(notified.last().map(String::as_str), Some("D1"));
}

#[test]
fn test_ordered_mode_cycle_recovery() {
    let options = CalculationOptions::default().with_recalc_mode(RecalcMode::Ordered);
    let mut sheet = Worksheet::with_options(options);

    set(&mut sheet, "C1", "=A1*2");
    set(&mut sheet, "A1", "=B1+1");
    set(&mut sheet, "B1", "=A1+1");
    set(&mut sheet, "B1", "1");

    assert_eq!(value(&mut sheet, "A1"), number(2.0));
    assert_eq!(value(&mut sheet, "C1"), number(4.0));
}

#[test]
fn test_graph_queries() {
    let mut sheet = Worksheet::new();
    set(&mut sheet, "A1", "1");
    set(&mut sheet, "B1", "=A1");
    set(&mut sheet, "C1", "=A1+B1");

    assert_eq!(
        sheet.dependents_of(0, 0),
        vec![CellAddress::new(0, 1), CellAddress::new(0, 2)]
    );
    assert_eq!(
        sheet.dependencies_of(0, 2),
        vec![CellAddress::new(0, 0), CellAddress::new(0, 1)]
    );
    assert_eq!(sheet.dependency_graph().edge_count(), 3);
}
