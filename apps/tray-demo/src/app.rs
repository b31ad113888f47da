//! Wires the tray controller to the demo's behavior.

use tokio::sync::mpsc;
use traybridge::{Action, ClickEvent, ExitInfo, MenuItem, SysTray};

use crate::config::{Config, QUIT_TITLE};

/// Runs the demo until the renderer exits, "Quit" is clicked or Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let tray = SysTray::new(config.tray_conf())?;
    tracing::info!(pid = ?tray.pid(), platform = %tray.platform(), "renderer started");

    let (exit_tx, mut exit_rx) = mpsc::unbounded_channel::<ExitInfo>();

    tray.on_ready(|| tracing::info!("tray is up"));

    tray.on_error(|e| tracing::error!("tray error: {e}"));

    tray.on_exit(move |exit| {
        let _ = exit_tx.send(*exit);
    });

    let handle = tray.clone();
    tray.on_click(move |click| handle_click(&handle, click));

    tokio::select! {
        exit = exit_rx.recv() => {
            if let Some(exit) = exit {
                tracing::warn!(%exit, "renderer exited");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
            tray.kill(false);
        }
    }

    Ok(())
}

fn handle_click(tray: &SysTray, click: &ClickEvent) {
    tracing::info!(title = click.item.plain_title(), seq_id = click.seq_id, "clicked");

    if click.item.plain_title() == QUIT_TITLE {
        tracing::info!("quit requested via tray");
        tray.kill(true);
        return;
    }

    let action = Action::UpdateItem {
        item: toggled(&click.item),
        seq_id: click.seq_id,
    };
    if let Err(e) = tray.send_action(action) {
        tracing::warn!("failed to update item: {e}");
    }
}

/// The clicked item with its checked state flipped and any marker removed.
fn toggled(item: &MenuItem) -> MenuItem {
    let mut next = item.clone();
    next.title = item.plain_title().to_string();
    next.checked = !item.checked;
    next
}
