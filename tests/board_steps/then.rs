//! Then steps for board BDD scenarios.

use super::world::{BoardWorld, run_async};
use corkboard::store::ports::{RelationStore, Store, StoreError};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::then;

fn membership_flags(
    world: &BoardWorld,
    member: &str,
    group: &str,
) -> Result<(bool, bool), eyre::Report> {
    let member_id = world.user(member)?;
    let (group_id, admin_id) = world.group(group)?;
    let members = run_async(world.memberships.list_members(group_id, admin_id))
        .wrap_err("list members")?;
    members
        .iter()
        .find(|view| view.user_id == member_id)
        .map(|view| (view.accepted, view.is_admin))
        .ok_or_else(|| eyre!("{member} has no membership in {group}"))
}

#[then(r#""{member}" holds a pending membership in "{group}""#)]
fn pending_membership(
    world: &BoardWorld,
    member: String,
    group: String,
) -> Result<(), eyre::Report> {
    match membership_flags(world, &member, &group)? {
        (false, false) => Ok(()),
        other => Err(eyre!("expected pending membership, got {other:?}")),
    }
}

#[then(r#""{member}" is an accepted member of "{group}" without admin rights"#)]
fn accepted_plain_member(
    world: &BoardWorld,
    member: String,
    group: String,
) -> Result<(), eyre::Report> {
    match membership_flags(world, &member, &group)? {
        (true, false) => Ok(()),
        other => Err(eyre!("expected accepted non-admin, got {other:?}")),
    }
}

#[then(r#""{member}" is an accepted member of "{group}" with admin rights"#)]
fn accepted_admin(
    world: &BoardWorld,
    member: String,
    group: String,
) -> Result<(), eyre::Report> {
    match membership_flags(world, &member, &group)? {
        (true, true) => Ok(()),
        other => Err(eyre!("expected accepted admin, got {other:?}")),
    }
}

#[then(r#"the last operation fails with kind "{kind}""#)]
fn last_operation_fails(world: &BoardWorld, kind: String) -> Result<(), eyre::Report> {
    match world.last_error {
        Some(actual) if actual.as_str() == kind => Ok(()),
        other => Err(eyre!("expected failure kind {kind}, got {other:?}")),
    }
}

#[then(r#""{viewer}" sees {count:u64} member in "{group}""#)]
fn member_count(
    world: &BoardWorld,
    viewer: String,
    count: u64,
    group: String,
) -> Result<(), eyre::Report> {
    let viewer_id = world.user(&viewer)?;
    let (group_id, _) = world.group(&group)?;
    let members = run_async(world.memberships.list_members(group_id, viewer_id))
        .wrap_err("list members")?;
    let found = u64::try_from(members.len()).wrap_err("member count")?;
    if found != count {
        return Err(eyre!("expected {count} members, found {found}"));
    }
    Ok(())
}

#[then(r#"the group "{group}" can no longer be read by "{viewer}""#)]
fn group_is_gone(world: &BoardWorld, group: String, viewer: String) -> Result<(), eyre::Report> {
    let viewer_id = world.user(&viewer)?;
    let (group_id, _) = world.group(&group)?;
    match run_async(world.memberships.get_group(group_id, viewer_id)) {
        Err(err) if err.kind().as_str() == "not_found" => Ok(()),
        other => Err(eyre!("expected group {group} to be gone, got {other:?}")),
    }
}

fn stored_relation_exists(
    world: &BoardWorld,
    member: &str,
    title: &str,
) -> Result<bool, eyre::Report> {
    let member_id = world.user(member)?;
    let task_id = world.task(title)?;
    let found = run_async(world.store.transaction(move |tx| -> Result<bool, StoreError> {
        Ok(tx.find_relation(task_id, member_id)?.is_some())
    }))
    .wrap_err("read relation")?;
    Ok(found)
}

#[then(r#""{member}" has a stored relation to "{title}""#)]
fn has_relation(world: &BoardWorld, member: String, title: String) -> Result<(), eyre::Report> {
    if stored_relation_exists(world, &member, &title)? {
        Ok(())
    } else {
        Err(eyre!("expected a relation row for {member} on {title}"))
    }
}

#[then(r#""{member}" has no stored relation to "{title}""#)]
fn has_no_relation(world: &BoardWorld, member: String, title: String) -> Result<(), eyre::Report> {
    if stored_relation_exists(world, &member, &title)? {
        Err(eyre!("expected no relation row for {member} on {title}"))
    } else {
        Ok(())
    }
}

#[then(r#""{member}" reads as unassigned to "{title}""#)]
fn reads_unassigned(world: &BoardWorld, member: String, title: String) -> Result<(), eyre::Report> {
    let member_id = world.user(&member)?;
    let task_id = world.task(&title)?;
    let state = run_async(world.relations.relation_of(task_id, member_id, member_id))
        .wrap_err("read relation state")?;
    if state.is_assigned {
        return Err(eyre!("{member} still reads as assigned to {title}"));
    }
    Ok(())
}

fn delivered(world: &BoardWorld, count: u64) -> Result<(), eyre::Report> {
    let sent = u64::try_from(world.notifier.sent().len()).wrap_err("sent count")?;
    if sent != count {
        return Err(eyre!("expected {count} reminders, {sent} were sent"));
    }
    Ok(())
}

#[then("{count:u64} reminder is delivered")]
fn one_reminder_delivered(world: &BoardWorld, count: u64) -> Result<(), eyre::Report> {
    delivered(world, count)
}

#[then("{count:u64} reminders are delivered")]
fn reminders_delivered(world: &BoardWorld, count: u64) -> Result<(), eyre::Report> {
    delivered(world, count)
}

#[then(r#"the reminder for "{title}" opens with "{headline}""#)]
fn reminder_headline(
    world: &BoardWorld,
    title: String,
    headline: String,
) -> Result<(), eyre::Report> {
    let mention = format!("📌 *{title}*");
    let message = world
        .notifier
        .sent()
        .into_iter()
        .find(|message| message.text.contains(&mention))
        .ok_or_else(|| eyre!("no reminder mentions {title}"))?;
    if message.text.lines().next() != Some(headline.as_str()) {
        return Err(eyre!("unexpected reminder text: {}", message.text));
    }
    Ok(())
}
