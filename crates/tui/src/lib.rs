//! # wk-tui
//!
//! Terminal User Interface for workflow-kit.
//!
//! This crate renders one workflow session: a step tracker, the
//! conversation and an input composer. It talks to the session running in
//! `wk-core` over channels using the `Op` and `Event` protocol defined in
//! `wk-protocol`.

pub mod app;
pub mod event;
pub mod event_handler;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use tui::Tui;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;
use wk_core::session::{driver, WorkflowSession};
use wk_protocol::config_models::GlobalConfig;
use wk_protocol::ipc::Op;
use wk_protocol::workflow_models::WorkflowDefinition;

/// Run `definition` interactively until the user quits.
///
/// The session runs on a background task; quitting shuts it down and
/// cancels any processing still in flight.
pub async fn run_app(definition: WorkflowDefinition, global: GlobalConfig) -> Result<()> {
    let (op_tx, op_rx) = mpsc::channel(64);
    let (event_tx, event_rx) = mpsc::channel(1024);

    info!(workflow = %definition.name, "opening workflow");
    let session = WorkflowSession::new(definition, event_tx).with_time_scale(global.time_scale);
    let session_task = driver::spawn(session, op_rx);

    let mut tui = Tui::init()?;
    let mut app = App::new(op_tx.clone(), event_rx);
    let result = app.run(&mut tui).await;
    tui.restore()?;
    drop(tui);

    // Event receiver must be gone before shutdown or emits can block
    drop(app);
    let _ = op_tx.send(Op::Shutdown).await;
    drop(op_tx);
    session_task.await?;

    result
}
