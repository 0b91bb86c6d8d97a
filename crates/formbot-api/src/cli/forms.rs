//! Saved-form inspection commands: list, show.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use formbot_core::repository::form::FormRepository;
use formbot_infra::filesystem::JsonFormRepository;
use formbot_types::error::FormError;
use formbot_types::form::{Form, FormId};

/// List saved forms, optionally only those authored by `user`.
pub async fn list_forms(repo: &JsonFormRepository, user: Option<&str>, json: bool) -> Result<()> {
    let forms = match user {
        Some(user) => repo.list_by_owner(user).await?,
        None => repo.list_all().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&forms)?);
        return Ok(());
    }

    if forms.is_empty() {
        println!();
        println!(
            "  {} No forms found in {}. Create one in Slack with {}",
            style("i").blue().bold(),
            repo.forms_dir().display(),
            style("/create-form").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Title").fg(Color::White),
        Cell::new("ID").fg(Color::White),
        Cell::new("Owner").fg(Color::White),
        Cell::new("Fields").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for form in &forms {
        table.add_row(vec![
            Cell::new(&form.title).fg(Color::Cyan),
            Cell::new(form.id.to_string()).fg(Color::DarkGrey),
            Cell::new(&form.user_id),
            Cell::new(form.fields.len()),
            Cell::new(form.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!("  {} form(s)", forms.len());
    println!();

    Ok(())
}

/// Show one form with its fields.
pub async fn show_form(repo: &JsonFormRepository, id: &str, json: bool) -> Result<()> {
    let form_id: FormId = id
        .parse()
        .map_err(|e| FormError::Invalid(format!("'{id}' is not a valid form id: {e}")))?;
    let form = repo
        .get(&form_id)
        .await
        .map_err(FormError::from)
        .and_then(|form| form.ok_or(FormError::NotFound))
        .with_context(|| format!("failed to load form {form_id}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&form)?);
        return Ok(());
    }

    print_form(&form);
    Ok(())
}

fn print_form(form: &Form) {
    println!();
    println!("  {}", style(&form.title).cyan().bold());
    if !form.description.is_empty() {
        println!("  {}", style(&form.description).dim());
    }
    println!();

    println!("  {}", style("── Details ──").dim());
    println!("  {}          {}", style("ID:").bold(), form.id);
    println!("  {}       {}", style("Owner:").bold(), form.user_id);
    println!("  {}      {}", style("Submit:").bold(), form.submission_url);
    println!(
        "  {}     {}",
        style("Created:").bold(),
        form.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();

    println!("  {}", style("── Fields ──").dim());
    if form.fields.is_empty() {
        println!("  {}", style("(none)").dim());
    }
    for (i, field) in form.fields.iter().enumerate() {
        println!(
            "  {}. {} {}",
            i + 1,
            field.name,
            style(format!("({})", field.field_type.label())).dim()
        );
        for option in &field.options {
            println!("       - {option}");
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use formbot_types::form::{FieldType, FormField};
    use tempfile::TempDir;

    fn sample(user_id: &str) -> Form {
        Form {
            id: FormId::new(),
            user_id: user_id.to_string(),
            title: "Lunch".to_string(),
            description: String::new(),
            fields: vec![FormField {
                field_type: FieldType::MultipleChoice,
                name: "Dish".to_string(),
                options: vec!["Soup".to_string()],
            }],
            submission_url: "https://example.com/hook".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_show_rejects_invalid_id() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFormRepository::new(dir.path());
        let err = show_form(&repo, "not-a-uuid", true).await.unwrap_err();
        assert!(err.to_string().contains("not a valid form id"));
    }

    #[tokio::test]
    async fn test_show_missing_form() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFormRepository::new(dir.path());
        let err = show_form(&repo, &FormId::new().to_string(), false)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FormError>(),
            Some(FormError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_and_show_saved_form() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFormRepository::new(dir.path());
        let form = sample("U1");
        repo.save(&form).await.unwrap();

        list_forms(&repo, None, false).await.unwrap();
        list_forms(&repo, Some("U2"), true).await.unwrap();
        show_form(&repo, &form.id.to_string(), false).await.unwrap();
    }
}
