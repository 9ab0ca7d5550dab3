//! Execution of collection commands.

use std::io::Write;

use crate::adapter::PersistenceAdapter;
use crate::config::DisplayConfig;
use crate::error::{Error, Result};
use crate::record::{Fields, Record};
use crate::session::Planner;
use crate::store::LoadState;

use super::commands::{CollectionCommand, OutputFormat};

/// Run one collection command, writing human or JSON output to `out`.
///
/// # Errors
///
/// Returns validation, lookup and storage errors from the record store, and
/// I/O errors from writing output.
pub async fn handle_collection<R, A, W>(
    planner: &Planner<A>,
    command: CollectionCommand,
    display: &DisplayConfig,
    out: &mut W,
) -> Result<()>
where
    R: Record,
    A: PersistenceAdapter + ?Sized,
    W: Write,
{
    let mut screen = planner.open::<R>().await?;

    match command {
        CollectionCommand::List(args) => {
            // JSON output stays parseable; the load itself already logged the
            // malformed value to stderr.
            let malformed = matches!(screen.store().load_state(), LoadState::Malformed { .. });
            if malformed && args.format == OutputFormat::Plain {
                writeln!(
                    out,
                    "warning: stored {} could not be read; showing an empty list",
                    R::NAME
                )?;
            }
            match args.format {
                OutputFormat::Json => {
                    writeln!(
                        out,
                        "{}",
                        serde_json::to_string_pretty(screen.records().as_slice())?
                    )?;
                }
                OutputFormat::Plain if screen.records().is_empty() => {
                    writeln!(out, "No {} yet.", R::NAME)?;
                }
                OutputFormat::Plain => {
                    for record in screen.records() {
                        writeln!(out, "{}  {}", record.id(), record.render(display))?;
                    }
                }
            }
        }
        CollectionCommand::Show { id, json } => {
            let record = screen
                .store()
                .find_by_id(&id)
                .ok_or_else(|| Error::not_found(R::NAME, &id))?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(record)?)?;
            } else {
                writeln!(out, "id: {}", record.id())?;
                for (name, value) in record.to_fields().iter() {
                    writeln!(out, "{name}: {value}")?;
                }
            }
        }
        CollectionCommand::Add { fields } => {
            let fields = Fields::parse_pairs(R::NAME, &fields)?;
            let record = screen.save(&fields).await?;
            writeln!(out, "Created {}  {}", record.id(), record.render(display))?;
        }
        CollectionCommand::Edit { id, fields } => {
            let changes = Fields::parse_pairs(R::NAME, &fields)?;
            let mut draft = screen.begin_edit(&id)?.clone();
            draft.merge(&changes);
            let record = screen.save(&draft).await?;
            if record.id() == id {
                writeln!(out, "Updated {}  {}", record.id(), record.render(display))?;
            } else {
                writeln!(
                    out,
                    "Updated {id} (now {})  {}",
                    record.id(),
                    record.render(display)
                )?;
            }
        }
        CollectionCommand::Delete { id } => {
            if screen.delete(&id).await? {
                writeln!(out, "Deleted {id}")?;
            } else {
                writeln!(out, "No record {id} in {}; nothing deleted", R::NAME)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapter::MemoryAdapter;
    use crate::cli::ListArgs;
    use crate::id::SequentialIds;
    use crate::record::{Destination, Package, Review};

    fn planner() -> Planner<MemoryAdapter> {
        Planner::with_id_generator(
            Arc::new(MemoryAdapter::new()),
            Arc::new(SequentialIds::new("c")),
        )
    }

    async fn run<R: Record>(
        planner: &Planner<MemoryAdapter>,
        command: CollectionCommand,
    ) -> String {
        let mut out = Vec::new();
        handle_collection::<R, _, _>(planner, command, &DisplayConfig::default(), &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn add(pairs: &[&str]) -> CollectionCommand {
        CollectionCommand::Add {
            fields: pairs.iter().map(ToString::to_string).collect(),
        }
    }

    fn list(format: OutputFormat) -> CollectionCommand {
        CollectionCommand::List(ListArgs { format })
    }

    #[tokio::test]
    async fn test_list_empty() {
        let planner = planner();
        let output = run::<Destination>(&planner, list(OutputFormat::Plain)).await;
        assert_eq!(output, "No destinations yet.\n");
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let planner = planner();
        let output = run::<Package>(&planner, add(&["name=Beach Pack", "value=199.90"])).await;
        assert_eq!(output, "Created c-1  Beach Pack - R$ 199.90\n");

        let output = run::<Package>(&planner, list(OutputFormat::Plain)).await;
        assert_eq!(output, "c-1  Beach Pack - R$ 199.90\n");
    }

    #[tokio::test]
    async fn test_list_json_is_stored_shape() {
        let planner = planner();
        run::<Package>(&planner, add(&["name=Beach Pack", "value=199.90"])).await;

        let output = run::<Package>(&planner, list(OutputFormat::Json)).await;
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"id": "c-1", "name": "Beach Pack", "value": 199.9}])
        );
    }

    #[tokio::test]
    async fn test_edit_overlays_draft() {
        let planner = planner();
        run::<Review>(&planner, add(&["text=Nice", "stars=3", "location=Porto"])).await;

        let output = run::<Review>(
            &planner,
            CollectionCommand::Edit {
                id: "c-1".to_string(),
                fields: vec!["stars=5".to_string()],
            },
        )
        .await;
        assert_eq!(output, "Updated c-1  Nice - Local: Porto - Stars: 5\n");
    }

    #[tokio::test]
    async fn test_edit_package_reports_new_id() {
        let planner = planner();
        run::<Package>(&planner, add(&["name=Beach", "value=10"])).await;

        let output = run::<Package>(
            &planner,
            CollectionCommand::Edit {
                id: "c-1".to_string(),
                fields: vec!["value=12".to_string()],
            },
        )
        .await;
        assert_eq!(output, "Updated c-1 (now c-2)  Beach - R$ 12.00\n");
    }

    #[tokio::test]
    async fn test_show_plain() {
        let planner = planner();
        run::<Destination>(&planner, add(&["name=Paris", "country=France", "city=Paris"])).await;

        let output = run::<Destination>(
            &planner,
            CollectionCommand::Show {
                id: "c-1".to_string(),
                json: false,
            },
        )
        .await;
        assert_eq!(output, "id: c-1\ncity: Paris\ncountry: France\nname: Paris\n");
    }

    #[tokio::test]
    async fn test_show_unknown_id() {
        let planner = planner();
        let mut out = Vec::new();
        let err = handle_collection::<Destination, _, _>(
            &planner,
            CollectionCommand::Show {
                id: "zz".to_string(),
                json: true,
            },
            &DisplayConfig::default(),
            &mut out,
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_messages() {
        let planner = planner();
        run::<Destination>(&planner, add(&["name=Paris", "country=France", "city=Paris"])).await;

        let delete = || CollectionCommand::Delete {
            id: "c-1".to_string(),
        };
        let output = run::<Destination>(&planner, delete()).await;
        assert_eq!(output, "Deleted c-1\n");

        let output = run::<Destination>(&planner, delete()).await;
        assert_eq!(output, "No record c-1 in destinations; nothing deleted\n");
    }

    #[tokio::test]
    async fn test_list_warns_on_malformed_data() {
        let planner = Planner::new(Arc::new(MemoryAdapter::with_entries([("@reviews", "nope")])));
        let output = run::<Review>(&planner, list(OutputFormat::Plain)).await;
        assert!(output.starts_with("warning: stored reviews could not be read"));
        assert!(output.ends_with("No reviews yet.\n"));
    }

    #[tokio::test]
    async fn test_list_json_stays_parseable_on_malformed_data() {
        let planner = Planner::new(Arc::new(MemoryAdapter::with_entries([("@reviews", "nope")])));
        let output = run::<Review>(&planner, list(OutputFormat::Json)).await;
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value, serde_json::json!([]));
    }
}
