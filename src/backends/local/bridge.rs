// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::channel::Channel;
use crate::errors::TransportError;
use crate::protocol::Message;
use crate::traits::{ApiBridge, LogLevel};

/// Both directions of one main/child pair.
///
/// `to_child` belongs in the main process's role data, `to_main` in the
/// child's. Each receiver drains what the other side put on its channel.
pub struct ChannelLink {
    pub to_child: Channel,
    pub to_main: Channel,
    pub child_inbox: UnboundedReceiver<Message>,
    pub main_inbox: UnboundedReceiver<Message>,
}

/// In-process [`ApiBridge`]: every channel is an unbounded tokio queue.
///
/// Messages on one channel arrive in the order they were put. Writes never
/// block; a dropped receiver shows up as [`TransportError::Closed`].
#[derive(Default)]
pub struct LocalBridge {
    routes: RwLock<HashMap<Channel, UnboundedSender<Message>>>,
}

impl LocalBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `channel` to a fresh queue, replacing any previous route.
    pub fn open_channel(&self, channel: Channel) -> UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel, tx);
        rx
    }

    /// Drop the route; returns whether one existed.
    pub fn close_channel(&self, channel: &Channel) -> bool {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(channel)
            .is_some()
    }

    /// Open the down (`<name>.down`) and up (`<name>.up`) channels for one pair.
    pub fn open_link(&self, name: &str) -> ChannelLink {
        let to_child = Channel::new(format!("{}.down", name));
        let to_main = Channel::new(format!("{}.up", name));
        let child_inbox = self.open_channel(to_child.clone());
        let main_inbox = self.open_channel(to_main.clone());
        ChannelLink {
            to_child,
            to_main,
            child_inbox,
            main_inbox,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ApiBridge for LocalBridge {
    fn put_args(&self, channel: Option<&Channel>, message: &Message) -> Result<(), TransportError> {
        let channel = channel.ok_or(TransportError::NoChannel)?;
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        let sender = routes
            .get(channel)
            .ok_or_else(|| TransportError::UnknownChannel(channel.clone()))?;
        sender
            .send(message.clone())
            .map_err(|_| TransportError::Closed(channel.clone()))
    }

    fn logging(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        match level {
            LogLevel::Error => tracing::error!(target: "modcore::bridge", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "modcore::bridge", "{}", args),
            LogLevel::Info => tracing::info!(target: "modcore::bridge", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "modcore::bridge", "{}", args),
            LogLevel::Trace => tracing::trace!(target: "modcore::bridge", "{}", args),
        }
    }
}
