use notesync_core::session::SessionStore;

use crate::app::{CliController, CliStorage};
use crate::error::CliError;

pub async fn run_login(
    controller: &CliController,
    profile_name: &str,
    username: &str,
    password: &str,
) -> Result<(), CliError> {
    let session = controller.login(username, password).await?;
    println!(
        "Signed in profile '{profile_name}' as {} ({})",
        session.name, session.username
    );
    Ok(())
}

pub fn run_logout(controller: &CliController, profile_name: &str) -> Result<(), CliError> {
    let previous = controller.restore_session();
    controller.logout()?;

    match previous {
        Some(session) => println!("Signed out {} from profile '{profile_name}'", session.username),
        None => println!("Profile '{profile_name}' was not signed in."),
    }
    Ok(())
}

pub fn run_status(sessions: &SessionStore<CliStorage>, profile_name: &str) {
    match sessions.load() {
        Some(session) => println!(
            "Profile '{profile_name}' is signed in as {} ({})",
            session.name, session.username
        ),
        None => println!("Profile '{profile_name}' is not signed in."),
    }
}
