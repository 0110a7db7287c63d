//! `remind` and `remind-cancel`.

use anyhow::Result;
use log::info;

use super::{Session, expect_args};

pub const REMIND_USAGE: &str = "remind <id> <\"message\"> <\"date time\"|duration>";
pub const CANCEL_USAGE: &str = "remind-cancel <id>";

pub fn remind(session: &mut Session, args: &[String]) -> Result<()> {
    expect_args(args, 3, REMIND_USAGE)?;

    let id = &args[1];
    let message = args[2].trim();
    session.calendar.set_event_reminder(id, message, &args[3])?;

    info!("Reminder added: id={id} message={message}");
    session
        .console
        .println(&format!("Reminder added: \"{message}\""));
    Ok(())
}

pub fn cancel(session: &mut Session, args: &[String]) -> Result<()> {
    expect_args(args, 1, CANCEL_USAGE)?;

    let id = &args[1];
    session.calendar.cancel_event_reminder(id)?;

    info!("Reminder cancelled: id={id}");
    session.console.println("Reminder cancelled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::execute;
    use super::super::tests::session;

    fn add_event(session: &mut super::Session) -> String {
        execute(session, r#"add "Meeting room A" "2035-06-15 09:30:00" low"#);
        session.calendar.events()[0].id().to_string()
    }

    #[tokio::test]
    async fn remind_and_cancel() {
        let mut session = session();
        let id = add_event(&mut session);

        execute(&mut session, &format!(r#"remind {id} "Don't forget" 10m"#));
        assert!(session.calendar.event(&id).unwrap().has_reminder());
        assert!(
            session
                .console
                .snapshot()
                .contains(&"Reminder added: \"Don't forget\"".to_string())
        );

        execute(&mut session, &format!("remind-cancel {id}"));
        assert!(!session.calendar.event(&id).unwrap().has_reminder());
        assert_eq!(session.console.snapshot().last().unwrap(), "Reminder cancelled");
    }

    #[tokio::test]
    async fn cancel_without_reminder_reports() {
        let mut session = session();
        let id = add_event(&mut session);

        execute(&mut session, &format!("remind-cancel {id}"));
        assert!(session.console.snapshot().last().unwrap().contains("has no reminder"));
    }

    #[tokio::test]
    async fn remind_zero_duration_reports() {
        let mut session = session();
        let id = add_event(&mut session);

        execute(&mut session, &format!("remind {id} ping 0s"));
        assert!(session.console.snapshot().last().unwrap().contains("greater than zero"));
        assert!(!session.calendar.event(&id).unwrap().has_reminder());
    }
}
