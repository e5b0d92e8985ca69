use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    api::power_source::PhasePower,
    core::flow::PowerFlow,
    quantity::power::Watts,
    store::{SampleLog, TotalsSnapshot},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn net_usage_color(net_usage: Watts) -> Color {
    if net_usage < Watts::ZERO { Color::Green } else { Color::Red }
}

pub fn build_totals_table(snapshot: &TotalsSnapshot) -> Table {
    let mut table = new_table();
    table.set_header(vec!["As of", "Consumption", "Surplus", "Generated"]);
    table.add_row(vec![
        Cell::new(snapshot.time.format("%b %d %H:%M:%S")).add_attribute(Attribute::Dim),
        Cell::new(format!("{:.4}", snapshot.value.total_consumption))
            .set_alignment(CellAlignment::Right)
            .fg(Color::Red),
        Cell::new(format!("{:.4}", snapshot.value.surplus_energy))
            .set_alignment(CellAlignment::Right)
            .fg(Color::Green),
        Cell::new(format!("{:.4}", snapshot.value.generated_energy))
            .set_alignment(CellAlignment::Right)
            .fg(Color::Green),
    ]);
    table
}

pub fn build_samples_table(samples: &SampleLog) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Samples", "From", "To", "Peak consumption", "Peak feed-in", "Last net"]);
    let first = samples.iter().next();
    let last = samples.latest();
    table.add_row(vec![
        Cell::new(samples.len()).set_alignment(CellAlignment::Right),
        Cell::new(first.map_or_else(String::new, |sample| {
            sample.time.format("%b %d %H:%M:%S").to_string()
        }))
        .add_attribute(Attribute::Dim),
        Cell::new(
            last.map_or_else(String::new, |sample| sample.time.format("%b %d %H:%M:%S").to_string()),
        )
        .add_attribute(Attribute::Dim),
        Cell::new(samples.iter().map(|sample| sample.value.consumption).max().unwrap_or_default())
            .set_alignment(CellAlignment::Right),
        Cell::new(samples.iter().map(|sample| sample.value.feed_in).max().unwrap_or_default())
            .set_alignment(CellAlignment::Right),
        last.map_or_else(
            || Cell::new(""),
            |sample| {
                Cell::new(sample.value.net_usage)
                    .set_alignment(CellAlignment::Right)
                    .fg(net_usage_color(sample.value.net_usage))
            },
        ),
    ]);
    table
}

pub fn build_probe_table(phase_power: &PhasePower, flow: PowerFlow) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Phase", "Power"]);
    for (i, power) in phase_power.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).add_attribute(Attribute::Dim),
            Cell::new(power).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("Consumption"),
        Cell::new(flow.consumption).set_alignment(CellAlignment::Right).fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Feed-in"),
        Cell::new(flow.feed_in).set_alignment(CellAlignment::Right).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Net usage"),
        Cell::new(flow.net_usage)
            .set_alignment(CellAlignment::Right)
            .fg(net_usage_color(flow.net_usage)),
    ]);
    table
}
