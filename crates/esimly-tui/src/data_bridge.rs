//! Data bridge -- connects [Portal] watch channels to TUI actions.
//!
//! Runs as a background task: subscribes to store snapshots and session
//! transitions, forwarding every change as an [`Action`] through the
//! TUI's action channel. Also runs the background token-verification
//! probe that corrects an optimistically restored session.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use esimly_core::Portal;

use crate::action::Action;

/// Spawn the data bridge connecting [`Portal`] reactive state to the TUI.
pub async fn spawn_data_bridge(
    portal: Portal,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    // Correct the optimistic session in the background: a rejected token
    // flips the session state, which lands below as SessionChanged.
    {
        let session = portal.session().clone();
        tokio::spawn(async move {
            session.verify_rehydrated().await;
        });
    }

    let store = portal.store().clone();
    let mut session_rx = portal.session().subscribe();
    let mut bundles = store.subscribe_bundles();
    let mut credit_status = store.subscribe_credit_status();
    let mut credit_levels = store.subscribe_credit_levels();
    let mut users = store.subscribe_users();
    let mut registrations = store.subscribe_registrations();
    let mut enquiries = store.subscribe_enquiries();
    let mut stock_pools = store.subscribe_stock_pools();
    let mut stock_items = store.subscribe_stock_items();
    let mut esim_requests = store.subscribe_esim_requests();
    let mut connection = store.subscribe_connection();

    // Push the current session state so the app routes immediately.
    let _ = action_tx.send(Action::SessionChanged(session_rx.borrow().clone()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = session_rx.changed() => {
                let state = session_rx.borrow_and_update().clone();
                let _ = action_tx.send(Action::SessionChanged(state));
            }
            Ok(()) = bundles.changed() => {
                let snap = bundles.borrow_and_update().clone();
                let _ = action_tx.send(Action::BundlesUpdated(snap));
            }
            Ok(()) = credit_status.changed() => {
                let snap = credit_status.borrow_and_update().clone();
                let _ = action_tx.send(Action::CreditStatusUpdated(snap));
            }
            Ok(()) = credit_levels.changed() => {
                let snap = credit_levels.borrow_and_update().clone();
                let _ = action_tx.send(Action::CreditLevelsUpdated(snap));
            }
            Ok(()) = users.changed() => {
                let snap = users.borrow_and_update().clone();
                let _ = action_tx.send(Action::UsersUpdated(snap));
            }
            Ok(()) = registrations.changed() => {
                let snap = registrations.borrow_and_update().clone();
                let _ = action_tx.send(Action::RegistrationsUpdated(snap));
            }
            Ok(()) = enquiries.changed() => {
                let snap = enquiries.borrow_and_update().clone();
                let _ = action_tx.send(Action::EnquiriesUpdated(snap));
            }
            Ok(()) = stock_pools.changed() => {
                let snap = stock_pools.borrow_and_update().clone();
                let _ = action_tx.send(Action::StockPoolsUpdated(snap));
            }
            Ok(()) = stock_items.changed() => {
                let snap = stock_items.borrow_and_update().clone();
                let _ = action_tx.send(Action::StockItemsUpdated(snap));
            }
            Ok(()) = esim_requests.changed() => {
                let snap = esim_requests.borrow_and_update().clone();
                let _ = action_tx.send(Action::EsimRequestsUpdated(snap));
            }
            Ok(()) = connection.changed() => {
                let status = *connection.borrow_and_update();
                let _ = action_tx.send(Action::ConnectionChanged(status));
            }
        }
    }
}
