use serde::Serialize;
use tickerboard_core::generator::local_now;
use tickerboard_core::{FileBackend, SessionStore, User};

use crate::cli::CredentialArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct SessionResponseData {
    user: Option<User>,
    greeting: Option<String>,
}

fn open(context: &Context) -> SessionStore<FileBackend> {
    SessionStore::open(FileBackend::new(&context.config.session_file))
}

fn describe(store: &SessionStore<FileBackend>) -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(SessionResponseData {
        user: store.current_user().cloned(),
        greeting: store.greeting(local_now().date()),
    })?;
    Ok(CommandResult::ok(data))
}

pub fn signup(args: &CredentialArgs, context: &Context) -> Result<CommandResult, CliError> {
    let mut store = open(context);
    if !store.signup(&args.username, &args.password) {
        return Err(CliError::AuthFailed(format!(
            "cannot register '{}': username taken or credentials blank",
            args.username
        )));
    }
    describe(&store)
}

pub fn login(args: &CredentialArgs, context: &Context) -> Result<CommandResult, CliError> {
    let mut store = open(context);
    if !store.login(&args.username, &args.password) {
        return Err(CliError::AuthFailed(String::from(
            "unknown username or wrong password",
        )));
    }
    describe(&store)
}

pub fn logout(context: &Context) -> Result<CommandResult, CliError> {
    let mut store = open(context);
    store.logout();
    describe(&store)
}

pub fn whoami(context: &Context) -> Result<CommandResult, CliError> {
    describe(&open(context))
}
