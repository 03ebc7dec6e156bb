//! Prompt generation utilities for AI SQL generation

use crate::ai_sql::schema::DatabaseSchema;
use std::fmt::Write;

/// Prompt generator for AI SQL queries
pub struct PromptGenerator;

impl PromptGenerator {
    /// Render the schema as one header per table and one indented line per column
    pub fn schema_summary(schema: &DatabaseSchema) -> String {
        let mut summary = String::new();
        for table in schema.tables() {
            let _ = writeln!(summary, "Schema for table: {}", table.name);
            for field in &table.fields {
                let _ = writeln!(summary, "\t{} {}", field.column, field.datatype);
            }
            summary.push('\n');
        }
        summary
    }

    /// Build the completion prompt for a question against the schema
    pub fn user_prompt(schema: &DatabaseSchema, question: &str) -> String {
        format!(
            "{} \n\tAs a senior analyst, given the above schemas, write a detailed and correct Postgres sql query to answer the analytical question:\n\t\n\t\"{}\"\n\t\n\tComment the query with your logic",
            Self::schema_summary(schema),
            question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn schema(rows: &[(&str, &str, &str)]) -> DatabaseSchema {
        DatabaseSchema::from_rows(
            rows.iter()
                .map(|(t, c, d)| (t.to_string(), c.to_string(), d.to_string())),
        )
    }

    fn orders_schema() -> DatabaseSchema {
        schema(&[("orders", "id", "integer"), ("orders", "total", "numeric")])
    }

    #[rstest]
    #[case::empty(&[], 0, 0)]
    #[case::one_table(&[("orders", "id", "integer"), ("orders", "total", "numeric")], 1, 2)]
    #[case::three_tables(
        &[
            ("users", "id", "integer"),
            ("users", "email", "text"),
            ("users", "created_at", "timestamp without time zone"),
            ("orders", "id", "integer"),
            ("line_items", "order_id", "integer"),
            ("line_items", "sku", "character varying"),
        ],
        3,
        6
    )]
    fn test_summary_line_counts(
        #[case] rows: &[(&str, &str, &str)],
        #[case] tables: usize,
        #[case] columns: usize,
    ) {
        let summary = PromptGenerator::schema_summary(&schema(rows));

        let headers = summary
            .lines()
            .filter(|l| l.starts_with("Schema for table: "))
            .count();
        let column_lines = summary.lines().filter(|l| l.starts_with('\t')).count();

        assert_eq!(headers, tables);
        assert_eq!(column_lines, columns);
    }

    #[test]
    fn test_summary_layout() {
        let summary = PromptGenerator::schema_summary(&orders_schema());
        assert_eq!(
            summary,
            "Schema for table: orders\n\tid integer\n\ttotal numeric\n\n"
        );
    }

    #[test]
    fn test_user_prompt_contains_schema_and_quoted_question() {
        let prompt = PromptGenerator::user_prompt(&orders_schema(), "total revenue last month");

        assert!(prompt.contains("Schema for table: orders"));
        assert!(prompt.contains("\"total revenue last month\""));
        assert!(prompt.contains("As a senior analyst"));
        assert!(prompt.contains("Postgres sql query"));
        assert!(prompt.ends_with("Comment the query with your logic"));
    }

    #[test]
    fn test_user_prompt_is_deterministic() {
        let schema = schema(&[
            ("users", "id", "integer"),
            ("orders", "id", "integer"),
            ("orders", "user_id", "integer"),
        ]);

        let first = PromptGenerator::user_prompt(&schema, "orders per user");
        let second = PromptGenerator::user_prompt(&schema, "orders per user");
        assert_eq!(first, second);
    }

    #[test]
    fn test_question_is_not_altered() {
        let question = "  which customers spent > $100 in \"Q3\"?  ";
        let prompt = PromptGenerator::user_prompt(&orders_schema(), question);
        assert!(prompt.contains(&format!("\"{}\"", question)));
    }
}
