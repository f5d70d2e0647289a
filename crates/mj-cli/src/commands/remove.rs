//! Commands that delete entries.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use mj_core::EntryId;
use mj_db::{KeyValueStore, StoreError};

use crate::app::App;

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Entry id, as shown after `#` in listings.
    pub id: EntryId,
}

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Confirm deleting every entry.
    #[arg(long)]
    pub yes: bool,
}

pub fn run<W: Write, B: KeyValueStore>(
    writer: &mut W,
    app: &mut App<B>,
    args: &RemoveArgs,
) -> Result<()> {
    if !app.store.remove(args.id) {
        return Err(StoreError::NotFound(args.id).into());
    }
    writeln!(writer, "Deleted entry #{}", args.id)?;
    Ok(())
}

pub fn clear<W: Write, B: KeyValueStore>(
    writer: &mut W,
    app: &mut App<B>,
    args: &ClearArgs,
) -> Result<()> {
    let count = app.store.all().len();
    if count == 0 {
        writeln!(writer, "No entries to delete.")?;
        return Ok(());
    }
    if !args.yes {
        bail!("refusing to delete {count} entries without --yes");
    }

    app.store.clear();
    writeln!(writer, "Deleted {count} entries.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use mj_core::{EntryDraft, Pay};
    use mj_db::MemoryStore;

    use crate::app::tests::test_app;

    fn seeded(count: usize) -> (App<MemoryStore>, Vec<EntryId>) {
        let mut app = test_app();
        let ids = (0..count)
            .map(|i| {
                let fields = EntryDraft {
                    date: Some(format!("2025-03-{:02}", i + 1)),
                    pay: Pay::Daily { amount: 10.0 },
                    note: None,
                }
                .validate()
                .unwrap();
                app.store.add(fields).id
            })
            .collect();
        (app, ids)
    }

    #[test]
    fn rm_deletes_entry() {
        let (mut app, ids) = seeded(2);
        let mut output = Vec::new();
        run(&mut output, &mut app, &RemoveArgs { id: ids[0] }).unwrap();

        assert!(app.store.get(ids[0]).is_none());
        assert_eq!(app.store.all().len(), 1);
        assert_eq!(
            String::from_utf8(output).unwrap().trim_end(),
            format!("Deleted entry #{}", ids[0])
        );
    }

    #[test]
    fn rm_unknown_id_is_not_found() {
        let (mut app, _) = seeded(1);
        let mut output = Vec::new();
        let err = run(&mut output, &mut app, &RemoveArgs { id: EntryId::new(3) }).unwrap_err();
        assert_snapshot!(err.to_string(), @"entry not found: 3");
        assert_eq!(app.store.all().len(), 1);
    }

    #[test]
    fn clear_requires_confirmation() {
        let (mut app, _) = seeded(3);
        let mut output = Vec::new();
        let err = clear(&mut output, &mut app, &ClearArgs { yes: false }).unwrap_err();
        assert_snapshot!(err.to_string(), @"refusing to delete 3 entries without --yes");
        assert_eq!(app.store.all().len(), 3);
    }

    #[test]
    fn clear_with_yes_deletes_everything() {
        let (mut app, _) = seeded(3);
        let mut output = Vec::new();
        clear(&mut output, &mut app, &ClearArgs { yes: true }).unwrap();
        assert!(app.store.all().is_empty());
        assert_snapshot!(String::from_utf8(output).unwrap(), @"Deleted 3 entries.");
    }

    #[test]
    fn clear_empty_store_is_a_no_op() {
        let (mut app, _) = seeded(0);
        let mut output = Vec::new();
        clear(&mut output, &mut app, &ClearArgs { yes: false }).unwrap();
        assert_snapshot!(String::from_utf8(output).unwrap(), @"No entries to delete.");
    }
}
