use habit_orb::{
    load_data, router,
    storage::persist_record,
    store::{HabitStore, Record},
    AppState, Config,
};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    fs::create_dir_all(&config.data_dir).await?;

    let data = load_data(&config.data_dir).await;
    info!(
        "loaded {} habits, {} logged days, {} friends from {}",
        data.habits.len(),
        data.logs.len(),
        data.friends.len(),
        config.data_dir.display()
    );

    let mut store = HabitStore::new(data);
    if store.ensure_user_code() {
        persist_record(&config.data_dir, Record::Profile, store.data())
            .await
            .map_err(|err| err.message)?;
        info!("generated user code {}", store.data().profile.user_code);
    }

    let app = router(AppState::new(config.data_dir.clone(), store));

    let addr = config.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
