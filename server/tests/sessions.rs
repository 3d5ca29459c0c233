use std::io;

use comms::{
    LineReceiver, LineSender,
    msg::{NOT_A_NUMBER, NOT_READY},
};
use futures::future::try_join_all;
use machine_learning::RegressionModel;
use server::{ClientSession, ReadinessGate};
use tokio::{
    io::{DuplexStream, ReadHalf, WriteHalf},
    task::JoinHandle,
};

type Rx = LineReceiver<ReadHalf<DuplexStream>>;
type Tx = LineSender<WriteHalf<DuplexStream>>;

/// Spawns a session over an in-memory pipe and returns the client's ends.
fn open_session(gate: &ReadinessGate) -> ((Rx, Tx), JoinHandle<io::Result<usize>>) {
    let (client, server) = tokio::io::duplex(4096);

    let (rx, tx) = tokio::io::split(server);
    let (rx, tx) = comms::channel(rx, tx);
    let session = ClientSession::new(rx, tx, gate.clone());
    let handle = tokio::spawn(session.run());

    let (rx, tx) = tokio::io::split(client);
    (comms::channel(rx, tx), handle)
}

async fn ask((rx, tx): &mut (Rx, Tx), line: &str) -> io::Result<String> {
    tx.send(line).await?;
    let reply = rx.recv().await?.ok_or(io::ErrorKind::UnexpectedEof)?;
    Ok(reply.into_owned())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sessions_see_model_only_after_publish() -> io::Result<()> {
    const CLIENTS: usize = 16;

    let gate = ReadinessGate::new();
    let (mut clients, handles): (Vec<_>, Vec<_>) =
        (0..CLIENTS).map(|_| open_session(&gate)).unzip();

    let replies = try_join_all(clients.iter_mut().map(|c| ask(c, "50"))).await?;
    assert!(replies.iter().all(|r| r == NOT_READY), "{replies:?}");

    gate.publish(RegressionModel::new(1.8, 32.0)).unwrap();

    let replies = try_join_all(clients.iter_mut().map(|c| ask(c, "50"))).await?;
    assert!(replies.iter().all(|r| r == "122.00"), "{replies:?}");

    drop(clients);
    for handle in handles {
        assert_eq!(handle.await.unwrap()?, 2);
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn malformed_input_keeps_connection_open() -> io::Result<()> {
    let gate = ReadinessGate::new();
    gate.publish(RegressionModel::new(1.8, 32.0)).unwrap();

    let (mut client, handle) = open_session(&gate);

    for garbage in ["abc", "", "12,5", "NaN", "1e400"] {
        assert_eq!(ask(&mut client, garbage).await?, NOT_A_NUMBER, "{garbage:?}");
    }
    assert_eq!(ask(&mut client, "-40").await?, "-40.00");

    drop(client);
    assert_eq!(handle.await.unwrap()?, 6);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn pipelined_requests_get_ordered_replies() -> io::Result<()> {
    let gate = ReadinessGate::new();
    gate.publish(RegressionModel::new(2.0, 0.5)).unwrap();

    let ((mut rx, mut tx), handle) = open_session(&gate);

    for x in 0..10 {
        tx.send(&x).await?;
    }

    for x in 0..10 {
        let reply = rx.recv().await?.unwrap().into_owned();
        assert_eq!(reply, format!("{:.2}", 2.0 * f64::from(x) + 0.5));
    }

    drop((rx, tx));
    assert_eq!(handle.await.unwrap()?, 10);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn oversized_line_closes_only_its_session() -> io::Result<()> {
    let gate = ReadinessGate::new();
    gate.publish(RegressionModel::new(1.8, 32.0)).unwrap();

    let ((_rx, mut tx), flooded) = open_session(&gate);
    let (mut healthy, handle) = open_session(&gate);

    let flood = "7".repeat(comms::MAX_LINE + 1);
    let _ = tx.send(flood.as_str()).await;

    let err = flooded.await.unwrap().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);

    assert_eq!(ask(&mut healthy, "50").await?, "122.00");
    drop(healthy);
    assert_eq!(handle.await.unwrap()?, 1);
    Ok(())
}
