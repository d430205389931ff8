//! Command implementations

use std::collections::BTreeSet;
use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Context;
use anyhow::anyhow;
use anyhow::bail;
use crudlist_lib::Error;
use crudlist_lib::ListController;
use crudlist_lib::error::ConfigError;
use crudlist_lib::loader::ContextLoader;
use crudlist_lib::loader::DataLoader;
use crudlist_lib::loader::LoaderOptions;
use crudlist_lib::loader::Params;
use crudlist_lib::model::Row;
use crudlist_lib::model::UniqueIdentifier;
use crudlist_lib::model::Value;
use crudlist_lib::notify::Notifier;
use crudlist_lib::notify::Toast;
use crudlist_lib::notify::ToastLevel;
use crudlist_lib::view::Column;
use crudlist_lib::view::FilterSpec;
use crudlist_lib::view::ListOptions;
use crudlist_lib::view::ListPrefs;
use crudlist_lib::view::ListView;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;

use crate::cli::DeleteArgs;
use crate::cli::ListArgs;
use crate::cli::PrefsArgs;
use crate::cli::SourceArgs;
use crate::prefs;
use crate::source::JsonFile;
use crate::table;

/// Prints error and warning toasts to stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Error => eprintln!("error: {}", toast.message),
            ToastLevel::Warning => eprintln!("warning: {}", toast.message),
            ToastLevel::Info | ToastLevel::Success => log::info!("{}", toast.message),
        }
    }
}

pub async fn run_list(args: ListArgs) -> anyhow::Result<()> {
    let key = args.source.key();
    let saved = prefs::load(&key);

    let mut params = Params::new();
    for clause in &args.wheres {
        let (field, value) = split_pair(clause, '=')?;
        params.insert(field, parse_value(value));
    }

    let mut filters = Vec::new();
    let mut filter_values = Vec::new();
    for clause in &args.filters {
        let (column, value) = split_pair(clause, '=')?;
        filters.push(FilterSpec::select(column));
        filter_values.push((column, parse_value(value)));
    }
    for clause in &args.any {
        let (column, values) = split_pair(clause, '=')?;
        filters.push(FilterSpec::multiselect(column));
        filter_values.push((column, Value::List(values.split(',').map(parse_value).collect())));
    }

    let options = ListOptions::new()
        .with_search_target(&args.search_field)
        .with_pagination(!args.all)
        .with_unique_identifier(UniqueIdentifier::field(&args.source.id_field));
    let mut list = open(&args.source, params, options, filters, &saved).await?;

    let view = list.view_mut();
    for (column, value) in filter_values {
        view.update_filter(column, value)?;
    }
    if let Some(term) = &args.search {
        view.search(term.as_str());
    }
    if let Some(column) = &args.sort {
        // Headers sort descending first
        view.request_sort(column)?;
        if !args.desc {
            view.request_sort(column)?;
        }
    }
    if let Some(rows_per_page) = args.rows_per_page {
        view.change_rows_per_page(rows_per_page)?;
    }
    for column in &args.toggle {
        view.toggle_column(column)?;
    }
    for pair in &args.swap {
        let (src, dest) = split_pair(pair, ':')?;
        view.switch_columns(src, dest)?;
    }
    view.change_page(args.page.saturating_sub(1));

    println!("{}", table::render(&view.output()));

    if args.save {
        let path = prefs::save(&key, &view.prefs())?;
        println!("Saved preferences to {}", path.display());
    }
    Ok(())
}

pub async fn run_delete(args: DeleteArgs) -> anyhow::Result<()> {
    let options = ListOptions::new()
        .with_pagination(false)
        .with_unique_identifier(UniqueIdentifier::field(&args.source.id_field));
    let mut list = open(&args.source, Params::new(), options, Vec::new(), &ListPrefs::default()).await?;

    let targets: HashSet<&str> = args.ids.iter().map(String::as_str).collect();
    let identifier = &list.view().options().unique_identifier;
    let mut found = HashSet::new();
    let mut rows: Vec<Row> = Vec::new();
    for row in list.view().data() {
        if let Ok(id) = identifier.resolve(row)
            && targets.contains(id.as_str())
        {
            found.insert(id);
            rows.push(row.clone());
        }
    }
    for id in targets.iter().filter(|id| !found.contains(**id)) {
        eprintln!("warning: no record with {} \"{id}\"", args.source.id_field);
    }
    if rows.is_empty() {
        bail!("nothing to delete");
    }

    for row in &rows {
        list.view_mut().toggle_row(row);
    }
    let Some(confirmation) = list.view().delete_confirmation() else {
        return Ok(());
    };
    if !args.yes && !confirm(&confirmation).await? {
        println!("Aborted");
        return Ok(());
    }

    match list.delete_selected().await {
        Ok(deleted) => {
            println!("Deleted {deleted} record(s)");
            Ok(())
        }
        Err(Error::Delete(failure)) => {
            for err in &failure.errors {
                eprintln!("error: {err}");
            }
            Err(anyhow!(failure))
        }
        Err(err) => Err(err.into()),
    }
}

pub fn run_prefs(args: PrefsArgs) -> anyhow::Result<()> {
    if args.reset {
        if prefs::reset(&args.key)? {
            println!("Reset preferences of {}", args.key);
        } else {
            println!("No saved preferences for {}", args.key);
        }
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&prefs::load(&args.key))?);
    Ok(())
}

/// Loads a collection into a list.
///
/// Columns come from `--columns`, or else from the fields of the loaded
/// records. Saved preferences naming a column that is gone are dropped.
async fn open(
    source: &SourceArgs,
    params: Params,
    options: ListOptions,
    filters: Vec<FilterSpec>,
    saved: &ListPrefs,
) -> anyhow::Result<ListController> {
    let file = Arc::new(JsonFile::new(&source.file, &source.id_field));
    let loader = DataLoader::new(
        ContextLoader::new(source.key(), file.clone())
            .with_error_message(format!("Unable to read {}", source.file.display())),
        LoaderOptions::new()
            .with_params(params)
            .with_notifier(Arc::new(StderrNotifier)),
    );
    loader.activate().await;

    let columns = columns_for(source, &loader.data());
    let view = match ListView::with_prefs(columns.clone(), filters.clone(), options.clone(), saved) {
        Ok(view) => view,
        Err(ConfigError::UnknownColumn(column)) => {
            log::warn!("saved sort column \"{column}\" is gone, using defaults");
            ListView::new(columns, filters, options)?
        }
        Err(err) => return Err(err).context("invalid list configuration"),
    };

    let mut list = ListController::new(loader, view).with_remover(file);
    list.sync();
    Ok(list)
}

fn columns_for(source: &SourceArgs, rows: &[Row]) -> Vec<Column> {
    let ids = if source.columns.is_empty() {
        let mut fields: BTreeSet<&str> = rows
            .iter()
            .flat_map(|row| row.fields().keys().map(String::as_str))
            .collect();
        let mut ids = Vec::new();
        for first in [source.id_field.as_str(), "name"] {
            if fields.remove(first) {
                ids.push(first.to_string());
            }
        }
        ids.extend(fields.into_iter().map(str::to_string));
        if ids.is_empty() {
            ids.push(source.id_field.clone());
        }
        ids
    } else {
        source.columns.clone()
    };

    ids.into_iter()
        .map(|id| {
            let label = title(&id);
            Column::new(id, label)
        })
        .collect()
}

/// `"created_at"` -> `"Created at"`.
fn title(id: &str) -> String {
    let spaced = id.replace(['_', '.'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn split_pair(text: &str, separator: char) -> anyhow::Result<(&str, &str)> {
    text.split_once(separator)
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| anyhow!("expected KEY{separator}VALUE, got \"{text}\""))
}

/// Reads a value as JSON, falling back to a plain string.
fn parse_value(text: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(text)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(text))
}

async fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{prompt}\nProceed? [y/N] ").as_bytes()).await?;
    stdout.flush().await?;

    let mut answer = String::new();
    tokio::io::BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title() {
        assert_eq!(title("created_at"), "Created at");
        assert_eq!(title("spec.name"), "Spec name");
        assert_eq!(title(""), "");
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("42"), Value::Int(42));
        assert_eq!(parse_value("active"), Value::from("active"));
        assert_eq!(parse_value("\"42\""), Value::from("42"));
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("status=active", '=').unwrap(), ("status", "active"));
        assert_eq!(split_pair("a:b", ':').unwrap(), ("a", "b"));
        assert!(split_pair("status", '=').is_err());
        assert!(split_pair("=x", '=').is_err());
    }
}
