//! Output formatting

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Something that can be drawn as a table.
pub trait Tabular {
    fn headers(&self) -> Vec<String>;
    fn rows(&self) -> Vec<Vec<String>>;

    /// Lines printed under the table (hints, markers).
    fn footer(&self) -> Vec<String> {
        Vec::new()
    }
}

impl OutputFormat {
    pub fn render<T: Serialize + Tabular>(&self, data: &T) -> Result<String> {
        let out = match self {
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Yaml => serde_yaml::to_string(data)?,
            OutputFormat::Table => table(data),
        };
        Ok(out)
    }

    pub fn print<T: Serialize + Tabular>(&self, data: &T) -> Result<()> {
        println!("{}", self.render(data)?);
        Ok(())
    }
}

fn table<T: Tabular>(data: &T) -> String {
    let rows = data.rows();
    let mut out = if rows.is_empty() {
        "(no results)".dimmed().to_string()
    } else {
        let mut builder = Builder::default();
        builder.push_record(data.headers());
        for row in rows {
            builder.push_record(row);
        }
        builder.build().with(Style::rounded()).to_string()
    };
    for line in data.footer() {
        out.push('\n');
        out.push_str(&line);
    }
    out
}

// Messages go to stderr; stdout carries only rendered data.

pub fn alert(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

pub fn notice(message: &str) {
    eprintln!("{} {}", "!".yellow().bold(), message);
}

pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Pair {
        name: &'static str,
        count: usize,
    }

    impl Tabular for Pair {
        fn headers(&self) -> Vec<String> {
            vec!["Name".into(), "Count".into()]
        }

        fn rows(&self) -> Vec<Vec<String>> {
            vec![vec![self.name.into(), self.count.to_string()]]
        }

        fn footer(&self) -> Vec<String> {
            vec!["hint".into()]
        }
    }

    #[test]
    fn test_table_contains_cells_and_footer() {
        let out = OutputFormat::Table.render(&Pair { name: "open", count: 3 }).unwrap();
        assert!(out.contains("Name"));
        assert!(out.contains("open"));
        assert!(out.ends_with("hint"));
    }

    #[test]
    fn test_json_is_data_only() {
        let out = OutputFormat::Json.render(&Pair { name: "open", count: 3 }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["count"], 3);
    }
}
