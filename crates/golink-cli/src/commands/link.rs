//! Link command handlers
//!
//! Each handler is one operation-cycle against the registry.

use anyhow::{bail, Context, Result};

use golink_core::{LinkRegistry, LinkStore};

use crate::output::Output;
use crate::prompt::confirm;

/// List all links in rank order
pub fn list<S: LinkStore>(registry: &LinkRegistry<S>, output: &Output) -> Result<()> {
    let links = registry.list();
    output.print_links(links.as_slice());
    Ok(())
}

/// Show a single link without counting a visit
pub fn show<S: LinkStore>(registry: &LinkRegistry<S>, name: String, output: &Output) -> Result<()> {
    let link = registry
        .find_link(&name)
        .ok_or_else(|| anyhow::anyhow!("Link not found: {}", name))?;

    output.print_link(&link);
    Ok(())
}

/// Create a link or repoint an existing one
pub fn add<S: LinkStore>(
    registry: &LinkRegistry<S>,
    name: String,
    url: String,
    output: &Output,
) -> Result<()> {
    let (link, was_created) = registry
        .add_or_update_link(&name, &url)
        .context("Failed to save link")?;

    if was_created {
        output.success(&format!("Added link from '{}' to {}", link.name, link.url));
    } else {
        output.success(&format!("Updated link '{}' to {}", link.name, link.url));
    }
    if output.is_quiet() {
        println!("{}", link.name);
    }

    Ok(())
}

/// Resolve a link, count the visit and print its URL
pub fn go<S: LinkStore>(registry: &LinkRegistry<S>, name: String, output: &Output) -> Result<()> {
    match registry
        .resolve_and_count(&name)
        .context("Failed to record visit")?
    {
        Some(link) => {
            output.print_link(&link);
            Ok(())
        }
        None => bail!("That link doesn't exist yet: {}", name),
    }
}

/// Delete a link
pub fn delete<S: LinkStore>(
    registry: &LinkRegistry<S>,
    name: String,
    yes: bool,
    output: &Output,
) -> Result<()> {
    let Some(link) = registry.find_link(&name) else {
        bail!("The link {} doesn't exist, cannot delete it", name);
    };

    if !yes && output.should_prompt() {
        println!("Delete link: {} -> {}", link.name, link.url);
        if !confirm("Are you sure?")? {
            output.message("Cancelled.");
            return Ok(());
        }
    }

    match registry
        .delete_link(&name)
        .context("Failed to delete link")?
    {
        Some(link) => {
            output.success(&format!("Deleted link {} to {}", link.name, link.url));
            Ok(())
        }
        // Removed by someone else between the prompt and the delete
        None => bail!("The link {} doesn't exist, cannot delete it", name),
    }
}

/// Print names starting with a prefix
pub fn suggest<S: LinkStore>(
    registry: &LinkRegistry<S>,
    prefix: String,
    output: &Output,
) -> Result<()> {
    let names = registry.suggest(&prefix);
    output.print_suggestions(&prefix, &names);
    Ok(())
}
