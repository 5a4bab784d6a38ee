//! Tauri command bindings for the RDS crate.
//!
//! Commands take `tauri::State<'_, RdsServiceState>` and delegate to
//! [`crate::RdsService`]. Streams are collected before returning, since a
//! command reply is a single message.

use crate::command::Invocation;
use crate::registry::CommandInfo;
use crate::service::RdsServiceState;
use serde_json::Value;

#[tauri::command]
pub async fn invoke_rds_command(
    state: tauri::State<'_, RdsServiceState>,
    invocation: Invocation,
) -> Result<Vec<Value>, String> {
    let output = state.invoke(&invocation)?;
    Ok(output.collect().await?)
}

#[tauri::command]
pub async fn list_rds_commands(
    state: tauri::State<'_, RdsServiceState>,
) -> Result<Vec<CommandInfo>, String> {
    Ok(state.commands())
}
