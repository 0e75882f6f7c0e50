use anyhow::Context;

use hello_responder::config::Config;
use hello_responder::server::{shutdown, Server, Shutdown};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load().context("failed to load configuration")?;
    let port_source = cfg.port_source();
    let settings = cfg
        .settings(&port_source)
        .context("failed to obtain listening port")?;

    let server = Server::bind(&settings)?;

    let (trigger, shutdown_rx) = Shutdown::new();
    shutdown::spawn_ctrl_c(trigger);

    server.run(shutdown_rx).await;

    Ok(())
}
