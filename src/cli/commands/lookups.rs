use anyhow::{anyhow, Result};

use super::{with_course_service, Command};
use crate::api::types::LookupKind;
use crate::catalog::LookupCatalog;
use crate::config::CourseStudioConfig;

pub struct LookupsCommand {
    pub kind: String,
    pub query: Option<String>,
}

impl Command for LookupsCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        let kind: LookupKind = self.kind.parse().map_err(|e: String| {
            let known: Vec<&str> = LookupKind::ALL.iter().map(|k| k.list_key()).collect();
            anyhow!("{e}; expected one of: {}", known.join(", "))
        })?;

        with_course_service(config, |service| async move {
            let catalog = LookupCatalog::new(service);
            let items = catalog
                .search(kind, self.query.as_deref().unwrap_or_default())
                .await?;

            println!();
            println!("📋 {} ({})", kind.list_key(), items.len());
            for item in &items {
                println!("  {} - {}", item.id, item.name);
            }
            Ok(())
        })
        .await
    }
}
