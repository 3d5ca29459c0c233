use anyhow::{Context, Result};
use log::{error, info, warn};
use tokio::{io::BufReader, signal};
use tokio_util::sync::CancellationToken;

use server::{ConnectionServer, ReadinessGate, ServerConfig, client, training};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cfg = ServerConfig::from_env().context("invalid configuration")?;
    let gate = ReadinessGate::new();

    let addr = cfg.listen_addr();
    let server = ConnectionServer::bind(&addr, gate.clone()).await?;
    info!("listening at {addr}");

    match cfg.dataset().cloned() {
        Some(path) => {
            let fit_cfg = cfg.fit_config();
            let gate = gate.clone();

            tokio::spawn(async move {
                let res = match training::load_dataset(&path).await {
                    Ok(samples) => training::train(samples, fit_cfg, gate).await,
                    Err(e) => Err(e),
                };

                if let Err(e) = res {
                    error!("training aborted, the model will stay unavailable: {e}");
                }
            });
        }
        None => warn!("DATASET is not set, every prediction request will be answered as not ready"),
    }

    let shutdown = CancellationToken::new();
    let server_task = tokio::spawn(server.run(shutdown.clone()));

    if let Some(peer) = cfg.peer_addr() {
        info!("relaying stdin to peer {peer}");

        let stdin = BufReader::new(tokio::io::stdin());
        tokio::select! {
            res = client::relay_to_peer(&peer, stdin, tokio::io::stdout()) => match res {
                Ok(relayed) => info!(relayed = relayed; "stdin closed, keep serving until ctrl-c"),
                Err(e) => error!("relay to peer {peer} stopped, keep serving until ctrl-c: {e}"),
            },
            _ = signal::ctrl_c() => {
                info!("received SIGINT");
                return stop(shutdown, server_task).await;
            }
        }
    }

    signal::ctrl_c().await?;
    info!("received SIGINT");
    stop(shutdown, server_task).await
}

async fn stop(
    shutdown: CancellationToken,
    server_task: tokio::task::JoinHandle<server::Result<usize>>,
) -> Result<()> {
    shutdown.cancel();
    let accepted = server_task.await.context("listener task panicked")??;
    info!(accepted = accepted; "wrapping up");
    Ok(())
}
