use tracing::error;
use vessel_map::{
    settings::Settings,
    startup::{App, init_tracing},
};

#[tokio::main]
async fn main() {
    let settings = Settings::new().unwrap();
    init_tracing(&settings.log_directive);

    let app = App::build(&settings).await.unwrap();

    if let Err(e) = app.run().await {
        error!("vessel map exited: {e:?}");
        std::process::exit(1);
    }
}
