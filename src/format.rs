use crate::database::ResultSet;
use prettytable::format::{FormatBuilder, LinePosition, LineSeparator, TableFormat};
use prettytable::{Cell, Row, Table};

/// psql-style layout: `|` between columns, a dashed rule under the header, no outer border
fn psql_format() -> TableFormat {
    FormatBuilder::new()
        .column_separator('|')
        .separators(&[LinePosition::Title], LineSeparator::new('-', '+', '+', '+'))
        .padding(1, 1)
        .build()
}

fn is_numeric(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit()) && value.parse::<f64>().is_ok()
}

/// Render a result set as an aligned text table followed by a row count
pub fn format_query_results_psql(results: &ResultSet) -> String {
    let mut output = String::new();

    if !results.columns.is_empty() {
        let mut table = Table::new();
        table.set_format(psql_format());
        table.set_titles(Row::new(
            results.columns.iter().map(|name| Cell::new(name)).collect(),
        ));

        for row in &results.rows {
            // Right-align numbers, left-align text
            let cells = row
                .iter()
                .map(|value| {
                    if is_numeric(value) {
                        Cell::new(value).style_spec("r")
                    } else {
                        Cell::new(value)
                    }
                })
                .collect();
            table.add_row(Row::new(cells));
        }

        output.push_str(&table.to_string());
    }

    let row_count = results.rows.len();
    output.push_str(&format!(
        "({} {})\n",
        row_count,
        if row_count == 1 { "row" } else { "rows" }
    ));

    output
}
