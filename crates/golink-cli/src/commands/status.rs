//! Status command handler

use std::fmt::Write;

use anyhow::Result;

use golink_core::{Config, JsonLinkStore, StoreHealth};

use crate::output::{Output, OutputFormat};

/// Show where links live and whether the store is readable
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let store = JsonLinkStore::from_config(config);
    let health = store.inspect();

    match output.format {
        OutputFormat::Json => {
            let (state, links, duplicates, details, suggestion) = match &health {
                StoreHealth::Missing => ("missing", 0, Vec::new(), None, None),
                StoreHealth::Healthy { links, duplicates } => {
                    ("healthy", *links, duplicates.clone(), None, None)
                }
                StoreHealth::Unreadable {
                    details,
                    suggestion,
                } => (
                    "unreadable",
                    0,
                    Vec::new(),
                    Some(details.clone()),
                    suggestion.clone(),
                ),
            };
            println!(
                "{}",
                serde_json::json!({
                    "links_file": store.path(),
                    "state": state,
                    "links": links,
                    "duplicates": duplicates,
                    "details": details,
                    "suggestion": suggestion,
                    "listen": config.listen_addr()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", summary(&health));
        }
        OutputFormat::Human => {
            print!("{}", human_report(&store, &health, config));
        }
    }

    Ok(())
}

fn human_report(store: &JsonLinkStore, health: &StoreHealth, config: &Config) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "golink Status");
    let _ = writeln!(out, "=============");
    let _ = writeln!(out);
    let _ = writeln!(out, "Storage:");
    let _ = writeln!(out, "  Location: {}", store.path().display());
    let _ = writeln!(out, "  State:    {}", summary(health));
    match health {
        StoreHealth::Healthy { duplicates, .. } if !duplicates.is_empty() => {
            let _ = writeln!(
                out,
                "  Warning:  duplicate names cannot be resolved: {}",
                duplicates.join(", ")
            );
        }
        StoreHealth::Unreadable {
            details,
            suggestion,
        } => {
            let _ = writeln!(out, "  Error:    {}", details);
            let _ = writeln!(out, "  Backup:   {}", store.corrupt_backup_path().display());
            if let Some(suggestion) = suggestion {
                let _ = writeln!(out, "  Hint:     {}", suggestion);
            }
        }
        _ => {}
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Server:");
    let _ = writeln!(out, "  Listen:   http://{}/", config.listen_addr());
    out
}

fn summary(health: &StoreHealth) -> String {
    match health {
        StoreHealth::Missing => "no links yet".to_string(),
        StoreHealth::Healthy { links, .. } => format!("{} link(s)", links),
        StoreHealth::Unreadable { .. } => "unreadable (serving as empty)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_summary() {
        assert_eq!(summary(&StoreHealth::Missing), "no links yet");
        assert_eq!(
            summary(&StoreHealth::Healthy {
                links: 3,
                duplicates: Vec::new()
            }),
            "3 link(s)"
        );
        assert!(summary(&StoreHealth::Unreadable {
            details: "bad".into(),
            suggestion: None,
        })
        .starts_with("unreadable"));
    }

    #[test]
    fn test_report_shows_recovery_hint_for_corrupt_store() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let store = JsonLinkStore::from_config(&config);
        std::fs::write(store.path(), "not json").unwrap();

        let report = human_report(&store, &store.inspect(), &config);

        assert!(report.contains("unreadable (serving as empty)"));
        assert!(report.contains("  Hint:     Restore links.json from links.json.corrupt"));
    }

    #[test]
    fn test_report_lists_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let store = JsonLinkStore::from_config(&config);
        let health = StoreHealth::Healthy {
            links: 2,
            duplicates: vec!["dup".to_string()],
        };

        let report = human_report(&store, &health, &config);

        assert!(report.contains("duplicate names cannot be resolved: dup"));
        assert!(!report.contains("Hint:"));
    }
}
