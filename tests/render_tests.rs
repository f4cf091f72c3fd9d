// Bar and sparkline helper tests

use hostmon::history::HistoryBuffer;
use hostmon::render::{RAMP, bar, sparkline};

#[test]
fn test_bar_empty_and_full() {
    assert_eq!(bar(0.0, 10), "░".repeat(10));
    assert_eq!(bar(100.0, 10), "█".repeat(10));
}

#[test]
fn test_bar_midpoint() {
    let b = bar(50.0, 10);
    assert_eq!(b.chars().filter(|c| *c == '█').count(), 5);
    assert_eq!(b.chars().count(), 10);
}

#[test]
fn test_bar_clamps_out_of_range_values() {
    assert_eq!(bar(150.0, 8), "█".repeat(8));
    assert_eq!(bar(-20.0, 8), "░".repeat(8));
}

#[test]
fn test_sparkline_maps_heights_to_ramp() {
    assert_eq!(sparkline(&[0, 7]), "▁█");
    assert_eq!(sparkline(&[]), "");
    // Heights past the top of the ramp stay at the top block.
    assert_eq!(sparkline(&[99]), "█");
}

#[test]
fn test_sparkline_from_history_heights() {
    let mut history = HistoryBuffer::new(10);
    history.push(0.0);
    history.push(50.0);
    history.push(100.0);
    let line = sparkline(&history.render_heights(RAMP.len()));
    assert_eq!(line.chars().count(), 3);
    assert_eq!(line.chars().next(), Some('▁'));
    assert_eq!(line.chars().last(), Some('█'));
}
