//! Given steps for board BDD scenarios.

use super::world::{BoardWorld, parse_day, run_async};
use corkboard::{
    group::domain::{JoinAction, SlackIntegration},
    store::ports::{GroupStore, Store, StoreError},
    task::domain::{TaskDetails, TaskTitle},
};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::given;

#[given(r#"a user "{name}""#)]
fn a_user(world: &mut BoardWorld, name: String) -> Result<(), eyre::Report> {
    world.add_user(&name)?;
    Ok(())
}

#[given(r#""{creator}" creates the group "{group}""#)]
fn creates_group(
    world: &mut BoardWorld,
    creator: String,
    group: String,
) -> Result<(), eyre::Report> {
    let creator_id = world.user(&creator)?;
    let created = run_async(world.memberships.create_group(&group, creator_id))
        .wrap_err("create group")?;
    world.groups.insert(group, (created.id(), creator_id));
    Ok(())
}

#[given(r#""{member}" is an approved member of "{group}""#)]
fn approved_member(
    world: &mut BoardWorld,
    member: String,
    group: String,
) -> Result<(), eyre::Report> {
    let member_id = world.user(&member)?;
    let (group_id, admin_id) = world.group(&group)?;
    run_async(world.memberships.request_join(group_id, &group, member_id))
        .wrap_err("request join")?;
    run_async(world.memberships.resolve_join_request(
        group_id,
        member_id,
        JoinAction::Approve,
        admin_id,
    ))
    .wrap_err("approve join")?;
    Ok(())
}

#[given(r#""{member}" requests to join "{group}" confirming the name "{confirmation}""#)]
fn pending_request(
    world: &mut BoardWorld,
    member: String,
    group: String,
    confirmation: String,
) -> Result<(), eyre::Report> {
    let member_id = world.user(&member)?;
    let (group_id, _) = world.group(&group)?;
    run_async(
        world
            .memberships
            .request_join(group_id, &confirmation, member_id),
    )
    .wrap_err("request join")?;
    Ok(())
}

#[given(r#""{admin}" schedules the task "{title}" on "{date}" in "{group}""#)]
fn schedules_task(
    world: &mut BoardWorld,
    admin: String,
    title: String,
    date: String,
    group: String,
) -> Result<(), eyre::Report> {
    let admin_id = world.user(&admin)?;
    let (group_id, _) = world.group(&group)?;
    let details = TaskDetails::new(
        TaskTitle::new(title.as_str()).wrap_err("task title")?,
        parse_day(&date)?,
    )
    .as_task();
    let task = run_async(world.tasks.create_task(group_id, details, admin_id))
        .wrap_err("create task")?;
    world.task_ids.insert(title, task.id());
    Ok(())
}

#[given(r#"the group "{group}" is connected to Slack channel "{channel}""#)]
fn connected_to_slack(
    world: &mut BoardWorld,
    group: String,
    channel: String,
) -> Result<(), eyre::Report> {
    let (group_id, _) = world.group(&group)?;
    let slack = SlackIntegration::new("xoxb-scenario", channel).wrap_err("Slack pair")?;
    let connected = run_async(world.store.transaction(
        move |tx| -> Result<bool, StoreError> {
            let Some(mut stored) = tx.find_group(group_id)? else {
                return Ok(false);
            };
            stored.connect_slack(slack);
            tx.update_group(&stored)?;
            Ok(true)
        },
    ))
    .wrap_err("connect Slack")?;
    if !connected {
        return Err(eyre!("group {group} vanished before Slack was connected"));
    }
    Ok(())
}
