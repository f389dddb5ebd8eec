use std::sync::mpsc;
use std::thread;

use engine::{
    ClientConfig, Dispatcher, HostIntegration, HttpTrackBackend, Reply, Request, TrackBackend,
};
use iced::futures::{SinkExt, StreamExt, channel::mpsc as futures_mpsc, executor};
use iced::{Subscription, stream};

use crate::host::DesktopHost;

const REQUEST_CHANNEL_CAPACITY: usize = 4;
const REPLY_CHANNEL_CAPACITY: usize = 4;
const SUBSCRIPTION_CHANNEL_CAPACITY: usize = 16;

/// Sender used by the UI thread to hand requests to the worker thread.
pub type RequestSender = mpsc::SyncSender<Request>;

/// Receiver used by the UI thread to read worker replies.
pub type ReplyReceiver = mpsc::Receiver<Reply>;

/// Running worker: request channel plus the identity its host reported.
#[derive(Debug)]
pub struct Worker {
    pub requests: RequestSender,
    pub replies: ReplyReceiver,
    pub host_user_id: Option<i64>,
}

/// Messages emitted by the worker bridge subscription.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    Ready {
        sender: RequestSender,
        host_user_id: Option<i64>,
    },
    Reply(Reply),
    Disconnected,
}

/// Builds a subscription that starts the HTTP worker and forwards its replies.
///
/// Keyed by the backend URL so a changed config starts a fresh worker.
pub fn worker_subscription(config: &ClientConfig) -> Subscription<BridgeEvent> {
    let config = config.clone();
    Subscription::run_with_id(
        config.server_url.clone(),
        bridge_worker_stream_with(move || spawn_http_worker(&config)),
    )
}

fn bridge_worker_stream_with<F>(spawn_worker: F) -> impl iced::futures::Stream<Item = BridgeEvent>
where
    F: FnOnce() -> Worker + Send + 'static,
{
    stream::channel(
        SUBSCRIPTION_CHANNEL_CAPACITY,
        move |mut output| async move {
            let Worker {
                requests,
                replies,
                host_user_id,
            } = spawn_worker();
            let _ = output
                .send(BridgeEvent::Ready {
                    sender: requests,
                    host_user_id,
                })
                .await;

            let (forward_tx, mut forward_rx) =
                futures_mpsc::channel::<BridgeEvent>(SUBSCRIPTION_CHANNEL_CAPACITY);

            thread::spawn(move || {
                let mut forward_tx = forward_tx;
                while let Ok(reply) = replies.recv() {
                    if executor::block_on(forward_tx.send(BridgeEvent::Reply(reply))).is_err() {
                        return;
                    }
                }
                let _ = executor::block_on(forward_tx.send(BridgeEvent::Disconnected));
            });

            while let Some(event) = forward_rx.next().await {
                if output.send(event).await.is_err() {
                    break;
                }
            }
        },
    )
}

/// Spawns the production worker talking to the configured backend.
pub fn spawn_http_worker(config: &ClientConfig) -> Worker {
    let backend = HttpTrackBackend::from_config(config);
    let host = DesktopHost::new(backend.client().clone());
    spawn_worker(Dispatcher::new(backend, host))
}

/// Spawns a worker thread around any backend and host.
pub fn spawn_worker<B, H>(dispatcher: Dispatcher<B, H>) -> Worker
where
    B: TrackBackend + Send + 'static,
    H: HostIntegration + Send + 'static,
{
    let host_user_id = dispatcher.host().user_id();
    let (request_tx, request_rx) = mpsc::sync_channel::<Request>(REQUEST_CHANNEL_CAPACITY);
    let (reply_tx, reply_rx) = mpsc::sync_channel::<Reply>(REPLY_CHANNEL_CAPACITY);

    thread::spawn(move || {
        while let Ok(request) = request_rx.recv() {
            if reply_tx.send(dispatcher.execute(request)).is_err() {
                return;
            }
        }
    });

    Worker {
        requests: request_tx,
        replies: reply_rx,
        host_user_id,
    }
}
