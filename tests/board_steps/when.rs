//! When steps for board BDD scenarios.

use super::world::{BoardWorld, parse_day, run_async};
use corkboard::{
    account::domain::UserIdentifier,
    group::domain::JoinAction,
    task::{domain::Reaction, services::ReactionUpdate},
};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::when;

#[when(r#""{member}" requests to join "{group}" confirming the name "{confirmation}""#)]
fn request_join(
    world: &mut BoardWorld,
    member: String,
    group: String,
    confirmation: String,
) -> Result<(), eyre::Report> {
    let member_id = world.user(&member)?;
    let (group_id, _) = world.group(&group)?;
    let result = run_async(
        world
            .memberships
            .request_join(group_id, &confirmation, member_id),
    );
    world.last_error = result.err().map(|err| err.kind());
    Ok(())
}

#[when(r#""{admin}" approves the join request of "{member}" for "{group}""#)]
fn approve_request(
    world: &mut BoardWorld,
    admin: String,
    member: String,
    group: String,
) -> Result<(), eyre::Report> {
    let admin_id = world.user(&admin)?;
    let member_id = world.user(&member)?;
    let (group_id, _) = world.group(&group)?;
    let result = run_async(world.memberships.resolve_join_request(
        group_id,
        member_id,
        JoinAction::Approve,
        admin_id,
    ));
    world.last_error = result.err().map(|err| err.kind());
    Ok(())
}

#[when(r#""{member}" leaves "{group}""#)]
fn leave_group(world: &mut BoardWorld, member: String, group: String) -> Result<(), eyre::Report> {
    let member_id = world.user(&member)?;
    let (group_id, _) = world.group(&group)?;
    run_async(world.memberships.remove_member(group_id, member_id, member_id))
        .wrap_err("leave group")?;
    Ok(())
}

#[when(r#""{admin}" sets the assignment of "{member}" to "{title}" to "{flag}""#)]
fn set_assignment(
    world: &mut BoardWorld,
    admin: String,
    member: String,
    title: String,
    flag: String,
) -> Result<(), eyre::Report> {
    let admin_id = world.user(&admin)?;
    let member_id = world.user(&member)?;
    let task_id = world.task(&title)?;
    let is_assigned: bool = flag
        .parse()
        .map_err(|_| eyre!("assignment flag must be true or false, got {flag}"))?;
    let result = run_async(world.relations.set_assignment(
        task_id,
        UserIdentifier::Id(member_id),
        is_assigned,
        admin_id,
    ));
    world.last_error = result.err().map(|err| err.kind());
    Ok(())
}

#[when(r#""{member}" reacts "{reaction}" to "{title}""#)]
fn react(
    world: &mut BoardWorld,
    member: String,
    reaction: String,
    title: String,
) -> Result<(), eyre::Report> {
    let member_id = world.user(&member)?;
    let task_id = world.task(&title)?;
    let parsed = Reaction::try_from(reaction.as_str()).wrap_err("reaction")?;
    run_async(world.relations.set_reaction(
        task_id,
        member_id,
        ReactionUpdate {
            reaction: Some(parsed),
            comment: None,
        },
    ))
    .wrap_err("set reaction")?;
    Ok(())
}

#[when(r#"the reminder pass runs for "{date}""#)]
fn reminder_pass(world: &mut BoardWorld, date: String) -> Result<(), eyre::Report> {
    let today = parse_day(&date)?;
    run_async(world.reminders().run(today)).wrap_err("reminder pass")?;
    Ok(())
}
