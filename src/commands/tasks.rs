//! Tasks command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::formatter::Dialect;
use crate::pipeline::OutputLayout;
use crate::task::TaskSpec;
use crate::utils::truncate;

/// Run the tasks command
pub fn run(config_path: &Path, json: bool) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    let tasks = config.task_specs(&[])?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    let layout = OutputLayout::new(&config.output_dir);
    println!();
    print!("{}", render_table(&tasks, &layout));
    println!();
    Ok(())
}

fn render_table(tasks: &[TaskSpec], layout: &OutputLayout) -> String {
    let mut out = String::new();
    out.push_str(" NAME                      TYPE     STRICT  POLICY               SOURCES\n");
    out.push_str(" ───────────────────────── ──────── ─────── ──────────────────── ───────\n");

    for task in tasks {
        out.push_str(&format!(
            " {:<25} {:<8} {:<7} {:<20} {}\n",
            truncate(&task.name, 25),
            task.family,
            if task.strict { "yes" } else { "no" },
            truncate(&task.policy, 20),
            task.sources.len()
        ));
    }

    if let Some(first) = tasks.first() {
        out.push_str(&format!(
            "\n Output example: {}\n",
            layout
                .path(Dialect::Qualified, first.family, &first.name)
                .display()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleFamily;

    #[test]
    fn test_render_table() {
        let tasks = vec![
            TaskSpec::new("apple_domain", "Apple", RuleFamily::Domain, true, vec!["u".into()]),
            TaskSpec::new("apple_ip", "Apple", RuleFamily::Ip, false, vec!["u".into(), "v".into()]),
        ];
        let table = render_table(&tasks, &OutputLayout::new("rules"));

        assert!(table.contains("apple_domain"));
        assert!(table.contains("apple_ip"));
        assert!(table.contains("rules/qualified/domain/apple_domain.list"));
    }

    #[test]
    fn test_render_table_empty() {
        let table = render_table(&[], &OutputLayout::new("rules"));
        assert!(!table.contains("Output example"));
    }
}
