use invitation_tracker::{Config, InvitationTracker, init_tracing};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Inizializza la configurazione
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };
    config.print_info();

    let tracker = Arc::new(
        InvitationTracker::from_config(&config)?.with_on_action(|id, decision| {
            info!("Invitation {} {}: group list should be refreshed", id, decision);
        }),
    );

    // Stampa i popup ogni volta che la lista cambia
    let _subscription = tracker.subscribe(|popups| {
        if popups.is_empty() {
            println!("-- no pending invitations --");
            return;
        }
        for inv in popups {
            println!(
                "[{}] {} invited you to join {} (expires {})",
                inv.id, inv.inviter_username, inv.group_name, inv.expires_at
            );
        }
    });

    let handle = tracker.start();

    tokio::signal::ctrl_c().await?;
    handle.shutdown();
    info!("Bye");

    Ok(())
}
