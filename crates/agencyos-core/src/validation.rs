//! Manual entry validation
//!
//! Entries typed by a person (CLI forms, dashboard inputs) pass through
//! here before reaching the store. A failure carries the offending field and
//! nothing is written.

use crate::entities::{NewAsset, NewClient, NewContentIdea, NewTask};
use crate::error::{Error, Result};

const MAX_NAME_LEN: usize = 200;

fn required(field: &'static str, value: &str, label: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid(field, format!("{} cannot be empty", label)));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(Error::invalid(
            field,
            format!("{} must be {} characters or less", label, MAX_NAME_LEN),
        ));
    }
    Ok(())
}

/// Validator for manually entered records
pub struct EntryValidator;

impl EntryValidator {
    /// Rules:
    /// - Name must not be empty
    pub fn validate_task(task: &NewTask) -> Result<()> {
        required("name", &task.name, "Task name")
    }

    /// Rules:
    /// - Contact name and company must not be empty
    /// - Email, when given, must contain `@`
    pub fn validate_client(client: &NewClient) -> Result<()> {
        required("name", &client.name, "Client name")?;
        required("company", &client.company, "Company")?;

        if let Some(email) = client.email.as_deref().map(str::trim) {
            let valid = email
                .split_once('@')
                .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
            if !valid {
                return Err(Error::invalid(
                    "email",
                    format!("'{}' is not a valid email address", email),
                ));
            }
        }
        Ok(())
    }

    /// Rules:
    /// - Hook must not be empty
    pub fn validate_content(idea: &NewContentIdea) -> Result<()> {
        required("hook", &idea.hook, "Hook")
    }

    /// Rules:
    /// - Name must not be empty
    /// - Link must not be empty; `#` is accepted as a placeholder
    pub fn validate_asset(asset: &NewAsset) -> Result<()> {
        required("name", &asset.name, "Asset name")?;
        if asset.link.trim().is_empty() {
            return Err(Error::invalid(
                "link",
                "Link cannot be empty (use '#' as a placeholder)",
            ));
        }
        Ok(())
    }
}
