//! Broadcast router: delivers one event to a computed subset of live channels.
//!
//! Works purely on the registry's channel collection, so it can be exercised
//! without a socket. Delivery is fire-and-forget; a channel whose receiver is
//! already gone, or whose queue is full, just drops the event.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;

use super::events::ServerEvent;
use super::registry::SessionRegistry;

/// Which live channels receive an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fanout<'a> {
    /// Only the channel of this user ID.
    SelfOnly(&'a str),
    /// Every channel except this user ID's.
    AllButSender(&'a str),
    /// Every live channel.
    All,
}

impl Fanout<'_> {
    fn includes(&self, user_id: &str) -> bool {
        match *self {
            Fanout::SelfOnly(target) => target == user_id,
            Fanout::AllButSender(sender) => sender != user_id,
            Fanout::All => true,
        }
    }
}

/// Push `event` to every channel selected by `fanout`.
///
/// Returns how many channels accepted it.
pub fn deliver(registry: &SessionRegistry, fanout: Fanout<'_>, event: ServerEvent) -> usize {
    let event = Arc::new(event);
    let mut delivered = 0;

    for entry in registry.entries() {
        if !fanout.includes(&entry.session.user_id) {
            continue;
        }
        match entry.channel.try_send(event.clone()) {
            Ok(()) => delivered += 1,
            Err(TrySendError::Full(_)) => {
                tracing::debug!(
                    user_id = %entry.session.user_id,
                    event = event.name(),
                    "outbound queue full, dropping event"
                );
            }
            // Connection is closing.
            Err(TrySendError::Closed(_)) => {}
        }
    }

    tracing::trace!(event = event.name(), ?fanout, recipients = delivered, "fanout");
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::session::{outbound_channel, OutboundRx, Session, OUTBOUND_CAPACITY};

    fn registry_with(names: &[&str]) -> (SessionRegistry, Vec<OutboundRx>) {
        let mut registry = SessionRegistry::new();
        let mut receivers = Vec::new();
        for name in names {
            let (tx, rx) = outbound_channel();
            registry
                .insert(Session::new(format!("id_{name}"), name.to_string()), tx)
                .unwrap();
            receivers.push(rx);
        }
        (registry, receivers)
    }

    fn ping() -> ServerEvent {
        ServerEvent::Users(Vec::new())
    }

    fn drain(rx: &mut OutboundRx) -> usize {
        let mut n = 0;
        while rx.try_recv().is_ok() {
            n += 1;
        }
        n
    }

    #[test]
    fn self_only_reaches_one_channel() {
        let (registry, mut rxs) = registry_with(&["a", "b", "c"]);
        assert_eq!(deliver(&registry, Fanout::SelfOnly("id_b"), ping()), 1);
        assert_eq!(drain(&mut rxs[0]), 0);
        assert_eq!(drain(&mut rxs[1]), 1);
        assert_eq!(drain(&mut rxs[2]), 0);
    }

    #[test]
    fn all_but_sender_skips_sender() {
        let (registry, mut rxs) = registry_with(&["a", "b", "c"]);
        assert_eq!(deliver(&registry, Fanout::AllButSender("id_a"), ping()), 2);
        assert_eq!(drain(&mut rxs[0]), 0);
        assert_eq!(drain(&mut rxs[1]), 1);
        assert_eq!(drain(&mut rxs[2]), 1);
    }

    #[test]
    fn all_reaches_everyone() {
        let (registry, mut rxs) = registry_with(&["a", "b"]);
        assert_eq!(deliver(&registry, Fanout::All, ping()), 2);
        assert!(rxs.iter_mut().all(|rx| drain(rx) == 1));
    }

    #[test]
    fn closed_channel_is_skipped_silently() {
        let (registry, mut rxs) = registry_with(&["a", "b"]);
        let closing = rxs.remove(0);
        drop(closing);

        assert_eq!(deliver(&registry, Fanout::All, ping()), 1);
        assert_eq!(drain(&mut rxs[0]), 1);
    }

    #[test]
    fn per_channel_order_matches_issue_order() {
        let (registry, mut rxs) = registry_with(&["a"]);
        deliver(&registry, Fanout::All, ServerEvent::Users(Vec::new()));
        deliver(
            &registry,
            Fanout::All,
            ServerEvent::Session(Session::new("id_a".to_string(), "a".to_string())),
        );

        assert_eq!(rxs[0].try_recv().unwrap().name(), "users");
        assert_eq!(rxs[0].try_recv().unwrap().name(), "session");
    }

    #[test]
    fn stalled_reader_backlog_is_capped() {
        let (registry, mut rxs) = registry_with(&["stalled", "talker"]);

        for _ in 0..(OUTBOUND_CAPACITY * 4) {
            deliver(&registry, Fanout::AllButSender("id_talker"), ping());
        }

        // The stalled queue holds at most its capacity; the rest were dropped.
        assert_eq!(drain(&mut rxs[0]), OUTBOUND_CAPACITY);
        assert_eq!(drain(&mut rxs[1]), 0);

        // Once drained, delivery resumes.
        assert_eq!(deliver(&registry, Fanout::SelfOnly("id_stalled"), ping()), 1);
        assert_eq!(drain(&mut rxs[0]), 1);
    }
}
