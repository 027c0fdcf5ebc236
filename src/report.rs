//! Human readable console output. Advisory only, not meant to be parsed.
use crate::provisioner::ProvisionOutcome;
use crate::workspace_apis::CreateDatabaseRequest;

static RULE: &str = "==================================================";

pub fn header() -> String {
    format!("{RULE}\nArchonRI Brain - Notion Setup\n{RULE}\n\nCreating Commands database...")
}

pub fn summary(outcome: &ProvisionOutcome) -> String {
    let url_line = outcome
        .url
        .as_ref()
        .map(|url| format!("   URL: {url}\n"))
        .unwrap_or_default();

    format!(
        "\n✅ Commands database created!\n   \
         Database ID: {database_id}\n   \
         Clean ID (for env): {normalized_id}\n\
         {url_line}\n\
         {RULE}\nSetup Complete!\n{RULE}\n\n\
         COMMANDS_DB_ID={normalized_id}\n\n\
         Add this to your Railway environment variables.\n\n\
         Database IDs saved to: {path}",
        database_id = outcome.database_id,
        normalized_id = outcome.normalized_id,
        path = outcome.output_path.display(),
    )
}

pub fn dry_run(request: &CreateDatabaseRequest) -> serde_json::Result<String> {
    let body = serde_json::to_string_pretty(request)?;
    Ok(format!(
        "Dry run, nothing was created. Request body:\n\n{body}"
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::provisioner::NormalizedId;
    use crate::schema::COMMANDS_SCHEMA;
    use std::path::PathBuf;

    fn outcome(url: Option<&str>) -> ProvisionOutcome {
        let database_id = "abcd1234-ef56-7890-ab12-cd34ef567890".to_string();
        ProvisionOutcome {
            normalized_id: NormalizedId::from_raw(&database_id),
            database_id,
            url: url.map(String::from),
            output_path: PathBuf::from("notion_db_ids.json"),
            replaced_existing: false,
        }
    }

    #[test]
    fn test_summary_lines() {
        let summary = summary(&outcome(None));

        assert!(summary.contains("   Database ID: abcd1234-ef56-7890-ab12-cd34ef567890"));
        assert!(summary.contains("   Clean ID (for env): abcd1234ef567890ab12cd34ef567890"));
        assert!(summary
            .lines()
            .any(|line| line == "COMMANDS_DB_ID=abcd1234ef567890ab12cd34ef567890"));
        assert!(summary.contains("Railway environment variables"));
        assert!(summary.ends_with("Database IDs saved to: notion_db_ids.json"));
        assert!(!summary.contains("URL:"));
    }

    #[test]
    fn test_summary_includes_url_when_known() {
        let summary = summary(&outcome(Some("https://www.notion.so/abcd")));
        assert!(summary.contains("   URL: https://www.notion.so/abcd"));
    }

    #[test]
    fn test_dry_run_contains_request_body() {
        let request = CreateDatabaseRequest::new("page", "Commands", "🧠", &COMMANDS_SCHEMA);
        let output = dry_run(&request).unwrap();

        let (_, body) = output.split_once("\n\n").unwrap();
        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(value["parent"]["page_id"], "page");
        assert!(header().contains("ArchonRI Brain - Notion Setup"));
    }
}
