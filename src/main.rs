use dotenv::dotenv;
use snake_pilot::GameConfig;
use snake_pilot::game::Game;
use snake_pilot::infra::{CompositeObserver, DefaultObserver, GameObserver, ReplayObserver};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("snake_pilot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let config = GameConfig::from_env()?;

    tracing::info!(
        "Fallback policy: {:?}, relaxation: {:?}, tick interval: {:?}",
        config.fallback,
        config.relaxation,
        config.tick_interval
    );

    let mut observers: Vec<Box<dyn GameObserver>> = vec![Box::new(DefaultObserver)];
    if let Some(folder) = config.replays_folder.as_deref() {
        tracing::info!("Writing replays to {}", folder);
        observers.push(Box::new(ReplayObserver::new(folder)?));
    }

    let mut game = Game::new(config, CompositeObserver::new(observers));
    tracing::info!("Seed: {} (set SNAKE_SEED to replay this run)", game.seed());
    let summary = game.run().await;

    if summary.losses > 0 {
        tracing::info!("{} of {} rounds ended in a collision", summary.losses, summary.rounds);
    }

    Ok(())
}
