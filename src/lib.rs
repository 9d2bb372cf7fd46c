//! # pubsub-mq
//!
//! Client-side runtime for a topic-addressed publish/subscribe message
//! queue. An application embeds this crate to exchange messages with a
//! remote broker that speaks a minimal HTTP/1.0 dialect: `publish` and
//! `subscribe`/`unsubscribe` enqueue requests for a background pusher
//! thread to deliver; a background puller thread long-polls the broker and
//! feeds whatever arrives to `retrieve`.
//!
//! ```no_run
//! use pubsub_mq::MessageQueue;
//!
//! let mq = MessageQueue::new("alice", "127.0.0.1", 9090);
//! mq.start();
//! mq.subscribe("weather");
//! mq.publish("weather", "73F and sunny");
//!
//! if let Some(body) = mq.retrieve() {
//!     println!("got: {body}");
//! }
//!
//! mq.stop();
//! ```
//!
//! The concurrency core (two bounded-wait FIFO queues, a pusher, a puller,
//! and an orderly shutdown protocol) is the entire point of this crate;
//! see [`client`] for the lifecycle and [`queue`] for the FIFO itself.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod queue;
pub mod request;
pub mod socket;
mod worker;

pub use client::{MessageQueue, SENTINEL};
pub use config::ClientConfig;
pub use queue::Queue;
pub use request::Request;
