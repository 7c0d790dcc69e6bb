//! A terminal form for registering users

/// The "functional core" to the main module's "imperative shell"
mod app;

/// Configuration and argument parsing
mod config;

use app::{App, EffectContext};
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use registro_core::api::Client;
use std::{io, process::ExitCode, sync::Arc};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedSender},
    task::JoinHandle,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let config = config::Config::parse();

    // The terminal belongs to the UI, so logs go to a file.
    std::fs::create_dir_all(config.log_dir())?;
    let appender = tracing_appender::rolling::never(config.log_dir(), "registro.log");
    let (writer, _guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let res = run(terminal, Client::new(config.server.clone())).await;
    ratatui::restore();
    res
}

/// Manage the lifecycle of the app
async fn run(mut terminal: DefaultTerminal, client: Client) -> io::Result<ExitCode> {
    let mut app = App::new();

    let ctx = Arc::new(EffectContext::new());
    let client = Arc::new(client);

    // Side effects (network and filesystem access) run as async tasks; we
    // read their results off of a channel, and keep track of outstanding
    // effects so we can exit cleanly.
    let (effect_tx, mut effect_rx) = unbounded_channel();
    let mut outstanding_effects: Vec<JoinHandle<()>> = Vec::with_capacity(1);

    terminal.draw(|frame| app.render(frame))?;

    let mut event_stream = EventStream::new();

    // Start our event loop!
    loop {
        // Wait for an event: external input or the async result of an
        // effect. This is an `Option<_>` because we don't need to pay
        // attention to every single piece of external input.
        let next_action_opt = tokio::select! {
            event_opt = event_stream.next() => {
                match event_opt {
                    Some(Ok(Event::Key(key_event))) => Some(app::Action::Key(key_event)),
                    Some(Err(err)) => Some(app::Action::Problem(err.to_string())),
                    _ => None,
                }
            },

            effect_opt = effect_rx.recv() => effect_opt,
        };

        // Once we have an action, `app.handle` gives us the next effects.
        if let Some(action) = next_action_opt {
            for effect in app.handle(action) {
                outstanding_effects.push(spawn_effect_task(
                    effect_tx.clone(),
                    Arc::clone(&ctx),
                    Arc::clone(&client),
                    effect,
                ));
            }
        }

        // Re-render to display any changes the app cares about.
        terminal.draw(|frame| app.render(frame))?;

        // Drop completed task handles. This list never gets long (we do this
        // on every pass through the event loop) so a full scan is fine.
        outstanding_effects.retain(|handle| !handle.is_finished());

        // If the app wants to exit, wait for outstanding effects to finish
        // before returning its exit code.
        if let Some(code) = app.should_exit() {
            for effect in outstanding_effects.drain(..) {
                let _ = effect.await;
            }

            return Ok(code);
        }
    }
}

/// Spawn a task to run an effect and send the next action to the app.
fn spawn_effect_task(
    effect_tx: UnboundedSender<app::Action>,
    ctx: Arc<EffectContext>,
    client: Arc<Client>,
    effect: app::Effect,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(next_action) = effect.run(&ctx, &client).await {
            // If the channel is closed we're shutting down and it's OK to
            // drop the message.
            let _ = effect_tx.send(next_action);
        }
    })
}
