//! Local ledger command implementations (list, add, edit, rm)

use anyhow::Result;
use ledge_core::{Database, Entry, EntryFilter};

use super::{parse_date, parse_date_or_today, truncate};

fn amount_str(amount: f64) -> String {
    if amount < 0.0 {
        format!("\x1b[31m{:.2}\x1b[0m", amount) // Red for outflows
    } else {
        format!("\x1b[32m+{:.2}\x1b[0m", amount) // Green for inflows
    }
}

pub fn cmd_list(
    db: &Database,
    search: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    category: Option<&str>,
    account: Option<&str>,
) -> Result<()> {
    let filter = EntryFilter {
        search: search.map(str::to_string),
        from: from.map(parse_date).transpose()?,
        to: to.map(parse_date).transpose()?,
        category: category.map(str::to_string),
        account: account.map(str::to_string),
    };

    let entries = db.list_entries(&filter)?;

    if entries.is_empty() {
        if filter.is_empty() {
            println!("No entries yet. Pull your ledger with:");
            println!("  ledge sync");
        } else {
            println!("No entries match the filter.");
        }
        return Ok(());
    }

    println!();
    println!("📝 Entries");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in entries {
        let marker = if entry.synced { " " } else { "☁" };
        println!(
            "   [{}] {} {} │ {:>10} │ {} │ {} / {}",
            entry.local_id,
            marker,
            entry.occurred_on,
            amount_str(entry.amount),
            truncate(&entry.description, 30),
            entry.category,
            entry.account
        );
    }

    println!();
    println!("   ☁ = not confirmed by the server yet. Run 'ledge sync' to push.");

    Ok(())
}

pub fn cmd_add(
    db: &Database,
    date: Option<&str>,
    description: &str,
    amount: f64,
    category: &str,
    account: &str,
) -> Result<()> {
    let occurred_on = parse_date_or_today(date)?;

    let entry = Entry::new_local(occurred_on, description, amount, category, account);
    let local_id = db.insert_entry(&entry)?;

    println!("✅ Added entry [{}]:", local_id);
    println!(
        "   {} │ {:>10} │ {}",
        occurred_on,
        amount_str(amount),
        truncate(description, 40)
    );
    println!();
    println!("   It will reach the server on the next 'ledge sync'.");

    Ok(())
}

pub fn cmd_edit(
    db: &Database,
    id: i64,
    date: Option<&str>,
    description: Option<&str>,
    amount: Option<f64>,
    category: Option<&str>,
    account: Option<&str>,
) -> Result<()> {
    let mut entry = db
        .get_entry(id)?
        .ok_or_else(|| anyhow::anyhow!("Entry {} not found", id))?;

    if let Some(date) = date {
        entry.occurred_on = parse_date(date)?;
    }
    if let Some(description) = description {
        entry.description = description.to_string();
    }
    if let Some(amount) = amount {
        entry.amount = amount;
    }
    if let Some(category) = category {
        entry.category = category.to_string();
    }
    if let Some(account) = account {
        entry.account = account.to_string();
    }

    // any edit makes the payload unconfirmed again
    entry.synced = false;
    db.update_entry(&entry)?;

    println!("✅ Updated entry [{}]:", id);
    println!(
        "   {} │ {:>10} │ {}",
        entry.occurred_on,
        amount_str(entry.amount),
        truncate(&entry.description, 40)
    );

    Ok(())
}

pub fn cmd_rm(db: &Database, id: i64) -> Result<()> {
    let entry = db
        .get_entry(id)?
        .ok_or_else(|| anyhow::anyhow!("Entry {} not found", id))?;

    db.delete_entry(id)?;

    if entry.remote_id.is_none() {
        println!("✅ Removed entry [{}] (the server never saw it).", id);
    } else {
        println!("✅ Marked entry [{}] for deletion.", id);
        println!("   It will be removed from the server on the next 'ledge sync'.");
    }

    Ok(())
}
