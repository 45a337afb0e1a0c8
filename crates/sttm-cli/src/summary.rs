//! Terminal tables for parsed documents and analysis reports.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sttm_model::{
    AnalysisReport, ImpactLevel, MappingDocument, TestCaseDocument, TestCaseImpactAssessment,
    UnitImpactSummary,
};

/// Priority assessments listed before truncating.
const PRIORITY_ROWS: usize = 25;

pub fn print_report(report: &AnalysisReport) {
    let meta = &report.metadata;
    println!("Mapping diff: {} ({})", meta.mapping_diff_file, meta.mapping_diff_format);
    println!("Test cases: {} ({})", meta.test_case_file, meta.test_case_format);
    println!("{}", unit_table(report));
    let priority = priority_table(report);
    if priority.row_count() > 0 {
        println!();
        println!("Priority test cases:");
        println!("{priority}");
    }
    println!();
    print!("{}", report.executive_summary());
    print_warnings(&report.warnings);
}

pub fn unit_table(report: &AnalysisReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Unit"),
        header_cell("Category"),
        header_cell("Changes"),
        header_cell("Critical"),
        header_cell("High"),
        header_cell("Medium"),
        header_cell("Low"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for unit in &report.units {
        let mut row = vec![
            Cell::new(&unit.unit_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&unit.change_category),
            Cell::new(unit.total_changes),
        ];
        row.extend(ImpactLevel::ALL.iter().map(|level| count_cell(unit.count(*level), *level)));
        table.add_row(row);
    }
    let summary = &report.summary;
    let mut total = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(summary.total_changes).add_attribute(Attribute::Bold),
    ];
    total.extend(
        ImpactLevel::ALL
            .iter()
            .map(|level| count_cell(summary.count(*level), *level).add_attribute(Attribute::Bold)),
    );
    table.add_row(total);
    table
}

/// Critical and high assessments, most points first.
pub fn priority_table(report: &AnalysisReport) -> Table {
    let mut priority: Vec<&TestCaseImpactAssessment> = report
        .units
        .iter()
        .flat_map(UnitImpactSummary::priority_tests)
        .collect();
    priority.sort_by(|a, b| {
        b.impact_score
            .total_points
            .cmp(&a.impact_score.total_points)
            .then_with(|| a.test_case_id.cmp(&b.test_case_id))
    });

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Test"),
        header_cell("Unit"),
        header_cell("Level"),
        header_cell("Points"),
        header_cell("Action"),
        header_cell("Steps"),
        header_cell("Breakdown"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for assessment in priority.iter().take(PRIORITY_ROWS) {
        let score = &assessment.impact_score;
        let steps = if assessment.affected_step_numbers.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(
                assessment
                    .affected_step_numbers
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        };
        table.add_row(vec![
            Cell::new(&assessment.test_case_id).add_attribute(Attribute::Bold),
            Cell::new(&assessment.unit_name),
            level_cell(score.impact_level),
            Cell::new(score.total_points),
            Cell::new(score.recommended_action.describe()),
            steps,
            Cell::new(score.breakdown()),
        ]);
    }
    if priority.len() > PRIORITY_ROWS {
        let rest = priority.len() - PRIORITY_ROWS;
        table.add_row(vec![dim_cell(format!("... {rest} more"))]);
    }
    table
}

pub fn print_diff(document: &MappingDocument) {
    println!("Format: {}", document.format_name);
    println!("{}", diff_table(document));
    print_warnings(&document.warnings);
}

pub fn diff_table(document: &MappingDocument) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Tab"),
        header_cell("Category"),
        header_cell("Added"),
        header_cell("Deleted"),
        header_cell("Modified"),
        header_cell("Unchanged"),
    ]);
    apply_table_style(&mut table);
    for index in 2..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for tab in document.all_tabs() {
        let name = if tab.has_changes() {
            Cell::new(tab.display_name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        } else {
            dim_cell(tab.display_name())
        };
        table.add_row(vec![
            name,
            Cell::new(tab.change_category.as_str()),
            change_cell(tab.added.len(), Color::Green),
            change_cell(tab.deleted.len(), Color::Red),
            change_cell(tab.modified.len(), Color::Yellow),
            dim_cell(tab.unchanged.len()),
        ]);
    }
    table
}

pub fn print_test_cases(document: &TestCaseDocument) {
    println!("Format: {}", document.format_name);
    println!(
        "Sheet: {} (of {})",
        document.selected_sheet,
        document.sheet_names.join(", ")
    );
    println!("{}", test_case_table(document));
    print_warnings(&document.warnings);
}

pub fn test_case_table(document: &TestCaseDocument) -> Table {
    let pattern = &document.id_pattern;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Property"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new("Test cases"),
        Cell::new(document.total_test_cases()),
    ]);
    table.add_row(vec![Cell::new("Steps"), Cell::new(document.total_steps())]);
    table.add_row(vec![
        Cell::new("Average steps"),
        Cell::new(format!("{:.1}", document.average_steps())),
    ]);
    let pattern_cell = if pattern.is_reliable() {
        Cell::new(&pattern.description).fg(Color::Green)
    } else {
        Cell::new(format!("{} (unreliable)", pattern.description)).fg(Color::Yellow)
    };
    table.add_row(vec![Cell::new("ID pattern"), pattern_cell]);
    table.add_row(vec![
        Cell::new("Pattern confidence"),
        Cell::new(format!("{:.0}%", pattern.confidence * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Next ID example"),
        Cell::new(pattern.generate_new_id("NEW")),
    ]);
    table
}

fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("Warnings:");
    for warning in warnings {
        eprintln!("- {warning}");
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn level_color(level: ImpactLevel) -> Color {
    match level {
        ImpactLevel::Critical | ImpactLevel::High => Color::Red,
        ImpactLevel::Medium => Color::Yellow,
        ImpactLevel::Low => Color::DarkGrey,
    }
}

fn level_cell(level: ImpactLevel) -> Cell {
    let cell = Cell::new(level.label()).fg(level_color(level));
    if level == ImpactLevel::Critical {
        cell.add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

fn count_cell(count: usize, level: ImpactLevel) -> Cell {
    if count > 0 {
        Cell::new(count).fg(level_color(level))
    } else {
        dim_cell(count)
    }
}

fn change_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
