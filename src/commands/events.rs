//! `add`, `list`, `remove` and `update`.

use anyhow::Result;
use log::info;
use owo_colors::OwoColorize;

use super::{Session, expect_args};
use crate::render;

pub const ADD_USAGE: &str = "add <\"title\"> <\"date time\"> <priority>";
pub const REMOVE_USAGE: &str = "remove <id>";
pub const UPDATE_USAGE: &str = "update <id> <\"title\"|_> <\"date time\"|_> <priority|_>";

pub fn add(session: &mut Session, args: &[String]) -> Result<()> {
    expect_args(args, 3, ADD_USAGE)?;

    let event = session.calendar.add_event(&args[1], &args[2], &args[3])?;
    let line = format!("Event \"{}\" added", event.title());
    info!("Event added: id={} title={}", event.id(), event.title());

    session.console.println(&line);
    Ok(())
}

pub fn list(session: &mut Session) -> Result<()> {
    let events = session.calendar.events();
    if events.is_empty() {
        session.console.println("Calendar is empty");
        return Ok(());
    }

    let header = render::header();
    session
        .console
        .println_styled(&header, &header.bold().to_string());
    for event in &events {
        session
            .console
            .println_styled(&render::row(event), &render::row_styled(event));
    }
    info!("Listed {} events", events.len());
    Ok(())
}

pub fn remove(session: &mut Session, args: &[String]) -> Result<()> {
    expect_args(args, 1, REMOVE_USAGE)?;

    let removed = session.calendar.delete_event(&args[1])?;
    info!("Event removed: id={} title={}", removed.id(), removed.title());
    session
        .console
        .println(&format!("Event removed: \"{}\"", removed.title()));
    Ok(())
}

pub fn update(session: &mut Session, args: &[String]) -> Result<()> {
    expect_args(args, 4, UPDATE_USAGE)?;

    let id = &args[1];
    let (old_title, new_title) = session
        .calendar
        .edit_event(id, &args[2], &args[3], &args[4])?;
    info!("Event updated: id={id} old_title={old_title} new_title={new_title}");
    session
        .console
        .println(&format!("Event updated: \"{old_title}\" to \"{new_title}\""));
    Ok(())
}
