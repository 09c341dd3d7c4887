//! Op loop connecting a front end to a workflow session.
//!
//! The front end sends [`Op`]s over a channel and renders the [`Event`]s the
//! session emits. Rejected operations are reported as
//! `Event::SessionError`; they never end the loop.
//!
//! [`Event`]: wk_protocol::ipc::Event

use super::WorkflowSession;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use wk_protocol::ipc::Op;

/// Start `session` and dispatch operations until `Op::Shutdown` arrives or
/// the op channel closes. The session is shut down on exit.
pub async fn run(mut session: WorkflowSession, mut op_rx: mpsc::Receiver<Op>) {
    session.start().await;

    while let Some(op) = op_rx.recv().await {
        debug!(?op, "dispatching op");
        let result = match op {
            Op::SubmitInput { content } => session.submit_input(content).await.map(|_| ()),
            Op::EditMessage { message_id } => session.edit_message(message_id).await.map(|_| ()),
            Op::Restart => session.restart().await,
            Op::Shutdown => break,
        };

        if let Err(e) = result {
            session.report(&e).await;
        }
    }

    session.shutdown().await;
}

/// Run [`run`] on a background task.
pub fn spawn(session: WorkflowSession, op_rx: mpsc::Receiver<Op>) -> JoinHandle<()> {
    tokio::spawn(run(session, op_rx))
}
