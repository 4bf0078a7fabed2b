//! UseCase: セッション調整（join / signal / chat / disconnect）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SessionCoordinator の各イベント処理と、その結果として各接続に届くイベント
//!
//! ### なぜこのテストが必要か
//! - ルーム状態（メンバー・履歴・在室記録）を変更するのはこのモジュールだけ
//! - 配信順序と切断時の後始末を保証する必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加、チャット、履歴リプレイ、シグナル中継、切断
//! - 異常系：二重参加、未参加でのチャット、未接続の宛先、二重切断

use std::{collections::HashSet, sync::Arc, time::Duration};

use huddle_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ChatEvent, ConnectionId, ConnectionRegistry, Delivery, HistoryStore, InboundEvent,
    MessagePusher, OutboundEvent, PresenceNotifier, PresenceRecord, PresenceTable, PusherChannel,
    RegistryError, RoomId, SignalRelay, Timestamp,
};

use super::error::SessionError;

/// All mutable relay state. Guarded as a unit so the room table and the
/// reverse index can never be observed out of sync.
#[derive(Default)]
struct RelayState {
    connections: HashSet<ConnectionId>,
    registry: ConnectionRegistry,
    history: HistoryStore,
    presence: PresenceTable,
}

/// What `on_disconnect` cleaned up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectSummary {
    /// Room the connection was in, if it had joined one
    pub room_id: Option<RoomId>,
    /// `true` if the connection was the last member and the room was deleted
    pub room_closed: bool,
    /// Time between join and disconnect
    pub session_duration: Option<Duration>,
}

/// Read-only view of one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub id: RoomId,
    /// Members in join order
    pub members: Vec<PresenceRecord>,
    pub message_count: usize,
}

/// Owns rooms, chat history and presence, and implements the event contract
/// the transport calls into.
///
/// Every operation that touches room state runs under one lock and hands its
/// deliveries to the pusher before releasing it, so mutations and the events
/// they produce are applied in the order the transport delivered them.
pub struct SessionCoordinator {
    state: Mutex<RelayState>,
    message_pusher: Arc<dyn MessagePusher>,
    relay: SignalRelay,
    clock: Arc<dyn Clock>,
}

impl SessionCoordinator {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(RelayState::default()),
            relay: SignalRelay::new(message_pusher.clone()),
            message_pusher,
            clock,
        }
    }

    /// Register a newly accepted connection and its outbound channel.
    pub async fn on_connect(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if !state.connections.insert(connection_id.clone()) {
            return Err(SessionError::AlreadyConnected(connection_id));
        }
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        tracing::info!("Connection '{}' registered", connection_id);
        Ok(())
    }

    /// Dispatch one inbound event from `connection_id`.
    pub async fn handle(
        &self,
        connection_id: &ConnectionId,
        event: InboundEvent,
    ) -> Result<(), SessionError> {
        match event {
            InboundEvent::JoinCall { path } => {
                self.join_call(connection_id, path).await?;
            }
            InboundEvent::Signal { to, payload } => {
                self.relay_signal(connection_id, &to, payload).await?;
            }
            InboundEvent::ChatMessage {
                payload,
                display_name,
            } => {
                self.send_chat(connection_id, payload, display_name).await?;
            }
        }
        Ok(())
    }

    /// Join the room named by `path`.
    ///
    /// Every member (the joiner included) receives `user-join` with the new
    /// member list, then the joiner alone receives the room's chat history in
    /// arrival order.
    ///
    /// # Returns
    ///
    /// The room's members after the join, in join order.
    pub async fn join_call(
        &self,
        connection_id: &ConnectionId,
        path: String,
    ) -> Result<Vec<ConnectionId>, SessionError> {
        let room_id = RoomId::new(path).map_err(|_| SessionError::InvalidRoomId)?;

        let mut state = self.state.lock().await;
        if !state.connections.contains(connection_id) {
            return Err(SessionError::NotConnected(connection_id.clone()));
        }

        let outcome = state.registry.join(&room_id, connection_id)?;
        if outcome.room_created {
            state.history.open(&room_id);
            tracing::info!("Room '{}' created", room_id);
        }
        state
            .presence
            .record_join(connection_id, Timestamp::new(self.clock.now_millis()));

        let mut deliveries = PresenceNotifier::on_join(&room_id, connection_id, &outcome.members);
        let replay = state.history.replay(&room_id);
        if !replay.is_empty() {
            tracing::info!(
                "Replaying {} chat message(s) to '{}'",
                replay.len(),
                connection_id
            );
        }
        deliveries.extend(replay.iter().map(|event| {
            Delivery::new(
                connection_id.clone(),
                OutboundEvent::ChatMessage(event.clone()),
            )
        }));

        tracing::info!(
            "Connection '{}' joined room '{}' ({} member(s))",
            connection_id,
            room_id,
            outcome.members.len()
        );

        self.deliver(deliveries).await;
        Ok(outcome.members)
    }

    /// Forward an opaque signaling payload to one connection.
    ///
    /// Does not touch room state; sender and recipient need not share a room.
    pub async fn relay_signal(
        &self,
        from: &ConnectionId,
        to: &str,
        payload: String,
    ) -> Result<(), SessionError> {
        {
            let state = self.state.lock().await;
            if !state.connections.contains(from) {
                return Err(SessionError::NotConnected(from.clone()));
            }
        }

        self.relay.relay(from, to, payload).await?;
        Ok(())
    }

    /// Store a chat message in the sender's room and send it to every member,
    /// the sender included.
    ///
    /// # Returns
    ///
    /// The room the message was posted to.
    pub async fn send_chat(
        &self,
        from: &ConnectionId,
        payload: String,
        display_name: String,
    ) -> Result<RoomId, SessionError> {
        let mut state = self.state.lock().await;
        if !state.connections.contains(from) {
            return Err(SessionError::NotConnected(from.clone()));
        }

        let room_id = state
            .registry
            .room_of(from)
            .cloned()
            .ok_or_else(|| SessionError::NotInRoom(from.clone()))?;

        let event = ChatEvent::new(from.clone(), display_name, payload);
        state
            .history
            .append(&room_id, event.clone())
            .map_err(|_| SessionError::UnknownRoom(room_id.clone()))?;

        let members = state.registry.members_of(&room_id);
        tracing::info!(
            "Chat message from '{}' ({}) to {} member(s) of '{}'",
            event.sender_display_name,
            from,
            members.len(),
            room_id
        );

        let deliveries = Delivery::fan_out(&members, &OutboundEvent::ChatMessage(event));
        self.deliver(deliveries).await;
        Ok(room_id)
    }

    /// Clean up after the transport reports a disconnect.
    ///
    /// The first call removes the connection from its room (deleting the room
    /// and its history if it was the last member), sends `user-left` to the
    /// remaining members and drops the presence record. Later calls return
    /// `NotConnected` and change nothing.
    pub async fn on_disconnect(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<DisconnectSummary, SessionError> {
        let mut state = self.state.lock().await;
        if !state.connections.remove(connection_id) {
            return Err(SessionError::NotConnected(connection_id.clone()));
        }

        let mut summary = DisconnectSummary {
            room_id: None,
            room_closed: false,
            session_duration: None,
        };

        let deliveries = match state.registry.leave(connection_id) {
            Ok(outcome) => {
                tracing::info!(
                    "Removed '{}' from room '{}'",
                    connection_id,
                    outcome.room_id
                );
                if outcome.room_deleted {
                    let discarded = state.history.discard(&outcome.room_id);
                    tracing::info!(
                        "Closed empty room '{}' ({} chat message(s) discarded)",
                        outcome.room_id,
                        discarded
                    );
                }
                let deliveries =
                    PresenceNotifier::on_leave(connection_id, &outcome.previous_members);
                summary.room_closed = outcome.room_deleted;
                summary.room_id = Some(outcome.room_id);
                deliveries
            }
            Err(RegistryError::NotFound(_)) => Vec::new(),
            Err(e) => {
                tracing::warn!("Unexpected registry error for '{}': {}", connection_id, e);
                Vec::new()
            }
        };

        if let Some(record) = state.presence.remove(connection_id) {
            let duration = record
                .joined_at
                .elapsed_until(Timestamp::new(self.clock.now_millis()));
            tracing::info!(
                "Connection '{}' was in the call for {} second(s)",
                connection_id,
                duration.as_secs()
            );
            summary.session_duration = Some(duration);
        }

        self.message_pusher.unregister_client(connection_id).await;
        self.deliver(deliveries).await;

        tracing::info!("Connection '{}' disconnected", connection_id);
        Ok(summary)
    }

    /// Members of `room_id` in join order; empty if the room does not exist.
    pub async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.state.lock().await.registry.members_of(room_id)
    }

    /// The room `connection_id` is in, if any.
    pub async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        self.state.lock().await.registry.room_of(connection_id).cloned()
    }

    /// Snapshot of every room, sorted by room id.
    pub async fn rooms(&self) -> Vec<RoomSnapshot> {
        let state = self.state.lock().await;
        state
            .registry
            .rooms()
            .into_iter()
            .map(|(id, members)| Self::snapshot(&state, id, members))
            .collect()
    }

    /// Snapshot of one room, or `None` if it does not exist.
    pub async fn room(&self, room_id: &RoomId) -> Option<RoomSnapshot> {
        let state = self.state.lock().await;
        if !state.registry.contains_room(room_id) {
            return None;
        }
        let members = state.registry.members_of(room_id);
        Some(Self::snapshot(&state, room_id.clone(), members))
    }

    /// Number of live connections, joined or not.
    pub async fn connection_count(&self) -> usize {
        self.message_pusher.count_clients().await
    }

    fn snapshot(state: &RelayState, id: RoomId, members: Vec<ConnectionId>) -> RoomSnapshot {
        let members = members
            .into_iter()
            .map(|member| {
                state
                    .presence
                    .get(&member)
                    .cloned()
                    .unwrap_or_else(|| PresenceRecord::new(member, Timestamp::new(0)))
            })
            .collect();
        RoomSnapshot {
            message_count: state.history.len(&id),
            id,
            members,
        }
    }

    /// Hand deliveries to the pusher in order. Recipients that vanished are skipped.
    async fn deliver(&self, deliveries: Vec<Delivery>) {
        for Delivery { to, event } in deliveries {
            if let Err(e) = self.message_pusher.push_to(&to, event).await {
                tracing::debug!("Dropped delivery to '{}': {}", to, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use huddle_shared::time::ManualClock;
    use tokio::sync::mpsc;

    struct Harness {
        coordinator: SessionCoordinator,
        clock: Arc<ManualClock>,
    }

    fn create_test_coordinator() -> Harness {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let message_pusher = Arc::new(WebSocketMessagePusher::default());
        Harness {
            coordinator: SessionCoordinator::new(message_pusher, clock.clone()),
            clock,
        }
    }

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    async fn connect(
        coordinator: &SessionCoordinator,
        id: &str,
    ) -> mpsc::UnboundedReceiver<OutboundEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        coordinator.on_connect(conn(id), tx).await.unwrap();
        rx
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<OutboundEvent>) -> Vec<OutboundEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn chat(sender: &str, name: &str, payload: &str) -> OutboundEvent {
        OutboundEvent::ChatMessage(ChatEvent::new(
            conn(sender),
            name.to_string(),
            payload.to_string(),
        ))
    }

    #[tokio::test]
    async fn test_join_announces_growing_member_list_in_join_order() {
        // テスト項目: N 人目の join で告知されるメンバーリストは N 人で、参加順に並ぶ
        // given (前提条件):
        let h = create_test_coordinator();
        let mut rx_a = connect(&h.coordinator, "a").await;
        let _rx_b = connect(&h.coordinator, "b").await;
        let mut rx_c = connect(&h.coordinator, "c").await;

        // when (操作):
        for id in ["a", "b", "c"] {
            h.coordinator
                .join_call(&conn(id), "/room".to_string())
                .await
                .unwrap();
        }

        // then (期待する結果):
        let events_a = drain(&mut rx_a);
        let sizes: Vec<usize> = events_a
            .iter()
            .map(|event| match event {
                OutboundEvent::UserJoin { members, .. } => members.len(),
                other => panic!("unexpected event: {:?}", other),
            })
            .collect();
        assert_eq!(sizes, vec![1, 2, 3]);

        // c only sees its own announcement, which lists everyone in join order
        let room_id = RoomId::new("/room".to_string()).unwrap();
        assert_eq!(
            drain(&mut rx_c),
            vec![OutboundEvent::UserJoin {
                room_id: room_id.clone(),
                joined: conn("c"),
                members: vec![conn("a"), conn("b"), conn("c")],
            }]
        );
        assert_eq!(
            h.coordinator.members_of(&room_id).await,
            vec![conn("a"), conn("b"), conn("c")]
        );
    }

    #[tokio::test]
    async fn test_each_announcement_makes_only_the_joiner_initiate_offers() {
        // テスト項目: user-join を受け取った各接続のうち、オファーを送るのは告知された参加者だけ
        // given (前提条件):
        let h = create_test_coordinator();
        let mut receivers = Vec::new();
        for id in ["a", "b", "c"] {
            receivers.push((id, connect(&h.coordinator, id).await));
        }

        // when (操作):
        for id in ["a", "b", "c"] {
            h.coordinator
                .join_call(&conn(id), "/room".to_string())
                .await
                .unwrap();
        }

        // then (期待する結果):
        for (own, rx) in receivers.iter_mut() {
            let own = conn(own);
            for event in drain(rx) {
                let OutboundEvent::UserJoin {
                    joined, members, ..
                } = event
                else {
                    panic!("unexpected event");
                };
                let targets = PresenceNotifier::offer_targets(&own, &joined, &members);
                if own == joined {
                    let expected: Vec<_> =
                        members.iter().filter(|m| **m != joined).cloned().collect();
                    assert_eq!(targets, expected);
                } else {
                    assert!(targets.is_empty());
                }
            }
        }
    }

    #[tokio::test]
    async fn test_chat_echoes_to_all_members_and_replays_to_late_joiner() {
        // テスト項目: チャットは送信者を含む全員に届き、後から参加した接続には新着より先にリプレイされる
        // given (前提条件):
        let h = create_test_coordinator();
        let mut rx_a = connect(&h.coordinator, "a").await;
        let mut rx_b = connect(&h.coordinator, "b").await;
        h.coordinator.join_call(&conn("a"), "/r".to_string()).await.unwrap();
        h.coordinator.join_call(&conn("b"), "/r".to_string()).await.unwrap();
        drain(&mut rx_a);
        drain(&mut rx_b);

        // when (操作):
        h.coordinator
            .send_chat(&conn("a"), "hi".to_string(), "alice".to_string())
            .await
            .unwrap();
        let mut rx_d = connect(&h.coordinator, "d").await;
        h.coordinator.join_call(&conn("d"), "/r".to_string()).await.unwrap();
        h.coordinator
            .send_chat(&conn("b"), "welcome".to_string(), "bob".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(drain(&mut rx_a)[0], chat("a", "alice", "hi"));
        assert_eq!(drain(&mut rx_b)[0], chat("a", "alice", "hi"));

        let events_d = drain(&mut rx_d);
        assert_eq!(events_d.len(), 3);
        assert!(matches!(events_d[0], OutboundEvent::UserJoin { .. }));
        assert_eq!(events_d[1], chat("a", "alice", "hi"));
        assert_eq!(events_d[2], chat("b", "bob", "welcome"));
    }

    #[tokio::test]
    async fn test_chat_without_room_is_dropped() {
        // テスト項目: どのルームにも参加していない接続のチャットは破棄され、誰にも届かない
        // given (前提条件):
        let h = create_test_coordinator();
        let mut rx_a = connect(&h.coordinator, "a").await;

        // when (操作):
        let result = h
            .coordinator
            .send_chat(&conn("a"), "hello?".to_string(), "alice".to_string())
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::NotInRoom(conn("a"))));
        assert!(drain(&mut rx_a).is_empty());
    }

    #[tokio::test]
    async fn test_last_member_disconnect_deletes_room_and_history() {
        // テスト項目: 唯一のメンバーが切断するとルームと履歴が削除される
        // given (前提条件):
        let h = create_test_coordinator();
        let _rx_a = connect(&h.coordinator, "a").await;
        let room_id = RoomId::new("/solo".to_string()).unwrap();
        h.coordinator
            .join_call(&conn("a"), room_id.to_string())
            .await
            .unwrap();
        h.coordinator
            .send_chat(&conn("a"), "note to self".to_string(), "alice".to_string())
            .await
            .unwrap();

        // when (操作):
        let summary = h.coordinator.on_disconnect(&conn("a")).await.unwrap();

        // then (期待する結果):
        assert_eq!(summary.room_id, Some(room_id.clone()));
        assert!(summary.room_closed);
        assert!(h.coordinator.members_of(&room_id).await.is_empty());
        assert!(h.coordinator.room(&room_id).await.is_none());

        // the next occupant starts with an empty history
        let mut rx_b = connect(&h.coordinator, "b").await;
        h.coordinator
            .join_call(&conn("b"), room_id.to_string())
            .await
            .unwrap();
        assert_eq!(drain(&mut rx_b).len(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_notifies_only_survivors() {
        // テスト項目: 切断時、残りのメンバーだけが user-left をちょうど 1 回受け取る
        // given (前提条件):
        let h = create_test_coordinator();
        let mut rx_a = connect(&h.coordinator, "a").await;
        let mut rx_b = connect(&h.coordinator, "b").await;
        let mut rx_c = connect(&h.coordinator, "c").await;
        for id in ["a", "b", "c"] {
            h.coordinator
                .join_call(&conn(id), "/r".to_string())
                .await
                .unwrap();
        }
        drain(&mut rx_a);
        drain(&mut rx_b);
        drain(&mut rx_c);

        // when (操作):
        let summary = h.coordinator.on_disconnect(&conn("a")).await.unwrap();

        // then (期待する結果):
        assert!(!summary.room_closed);
        assert_eq!(
            drain(&mut rx_b),
            vec![OutboundEvent::UserLeft { id: conn("a") }]
        );
        assert_eq!(
            drain(&mut rx_c),
            vec![OutboundEvent::UserLeft { id: conn("a") }]
        );
        assert!(drain(&mut rx_a).is_empty());
        assert_eq!(
            h.coordinator
                .members_of(&RoomId::new("/r".to_string()).unwrap())
                .await,
            vec![conn("b"), conn("c")]
        );
    }

    #[tokio::test]
    async fn test_disconnect_runs_cleanup_exactly_once() {
        // テスト項目: 二重の切断通知でも後始末は 1 回だけ行われる
        // given (前提条件):
        let h = create_test_coordinator();
        let _rx_a = connect(&h.coordinator, "a").await;
        let mut rx_b = connect(&h.coordinator, "b").await;
        h.coordinator.join_call(&conn("a"), "/r".to_string()).await.unwrap();
        h.coordinator.join_call(&conn("b"), "/r".to_string()).await.unwrap();
        drain(&mut rx_b);

        // when (操作):
        let first = h.coordinator.on_disconnect(&conn("a")).await;
        let second = h.coordinator.on_disconnect(&conn("a")).await;

        // then (期待する結果):
        assert!(first.is_ok());
        assert_eq!(second, Err(SessionError::NotConnected(conn("a"))));
        assert_eq!(drain(&mut rx_b).len(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_reports_session_duration() {
        // テスト項目: 切断時に参加からの経過時間が計算される
        // given (前提条件):
        let h = create_test_coordinator();
        let _rx_a = connect(&h.coordinator, "a").await;
        h.coordinator.join_call(&conn("a"), "/r".to_string()).await.unwrap();
        h.clock.advance(90_500);

        // when (操作):
        let summary = h.coordinator.on_disconnect(&conn("a")).await.unwrap();

        // then (期待する結果):
        assert_eq!(summary.session_duration, Some(Duration::from_millis(90_500)));
    }

    #[tokio::test]
    async fn test_disconnect_without_join() {
        // テスト項目: ルームに参加せず切断した接続は、ルームなしで正常に後始末される
        // given (前提条件):
        let h = create_test_coordinator();
        let _rx_a = connect(&h.coordinator, "a").await;

        // when (操作):
        let summary = h.coordinator.on_disconnect(&conn("a")).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            summary,
            DisconnectSummary {
                room_id: None,
                room_closed: false,
                session_duration: None,
            }
        );
        assert_eq!(h.coordinator.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_signals_arrive_in_order_and_unmodified() {
        // テスト項目: 同じ宛先へのシグナルは送信順に、内容を変えずに届く
        // given (前提条件):
        let h = create_test_coordinator();
        let _rx_a = connect(&h.coordinator, "a").await;
        let mut rx_b = connect(&h.coordinator, "b").await;
        let p1 = r#"{"sdp":{"type":"offer"}}"#.to_string();
        let p2 = r#"{"ice":{"candidate":"candidate:1 1 udp 2122260223 10.0.0.2 54321 typ host"}}"#
            .to_string();

        // when (操作):
        h.coordinator
            .relay_signal(&conn("a"), "b", p1.clone())
            .await
            .unwrap();
        h.coordinator
            .relay_signal(&conn("a"), "b", p2.clone())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            drain(&mut rx_b),
            vec![
                OutboundEvent::Signal {
                    from: conn("a"),
                    payload: p1,
                },
                OutboundEvent::Signal {
                    from: conn("a"),
                    payload: p2,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_signal_to_disconnected_recipient_is_dropped() {
        // テスト項目: 切断済みの宛先へのシグナルは UnknownRecipient として破棄される
        // given (前提条件):
        let h = create_test_coordinator();
        let _rx_a = connect(&h.coordinator, "a").await;
        let _rx_b = connect(&h.coordinator, "b").await;
        h.coordinator.on_disconnect(&conn("b")).await.unwrap();

        // when (操作):
        let result = h
            .coordinator
            .handle(
                &conn("a"),
                InboundEvent::Signal {
                    to: "b".to_string(),
                    payload: "{}".to_string(),
                },
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::UnknownRecipient("b".to_string())));
    }

    #[tokio::test]
    async fn test_join_second_room_is_rejected() {
        // テスト項目: 切断せずに別ルームへ参加すると DuplicateMembership になり、元のルームは変わらない
        // given (前提条件):
        let h = create_test_coordinator();
        let mut rx_a = connect(&h.coordinator, "a").await;
        let room1 = RoomId::new("room1".to_string()).unwrap();
        let room2 = RoomId::new("room2".to_string()).unwrap();
        h.coordinator
            .join_call(&conn("a"), room1.to_string())
            .await
            .unwrap();
        drain(&mut rx_a);

        // when (操作):
        let result = h
            .coordinator
            .handle(
                &conn("a"),
                InboundEvent::JoinCall {
                    path: room2.to_string(),
                },
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SessionError::DuplicateMembership {
                connection_id: conn("a"),
                room_id: room1.clone(),
            })
        );
        assert_eq!(h.coordinator.room_of(&conn("a")).await, Some(room1.clone()));
        assert_eq!(h.coordinator.members_of(&room1).await, vec![conn("a")]);
        assert!(h.coordinator.room(&room2).await.is_none());
        assert!(drain(&mut rx_a).is_empty());
    }

    #[tokio::test]
    async fn test_join_with_empty_path_is_rejected() {
        // テスト項目: 空のパスでの参加は InvalidRoomId になる
        // given (前提条件):
        let h = create_test_coordinator();
        let _rx_a = connect(&h.coordinator, "a").await;

        // when (操作):
        let result = h.coordinator.join_call(&conn("a"), String::new()).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::InvalidRoomId));
        assert!(h.coordinator.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_events_from_unknown_connection_are_rejected() {
        // テスト項目: 接続登録されていない ID からのイベントは NotConnected になる
        // given (前提条件):
        let h = create_test_coordinator();

        // when (操作):
        let join = h.coordinator.join_call(&conn("x"), "/r".to_string()).await;
        let chat = h
            .coordinator
            .send_chat(&conn("x"), "hi".to_string(), "x".to_string())
            .await;

        // then (期待する結果):
        assert_eq!(join, Err(SessionError::NotConnected(conn("x"))));
        assert_eq!(chat, Err(SessionError::NotConnected(conn("x"))));
        assert!(h.coordinator.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_connect_twice_is_rejected() {
        // テスト項目: 同じ ID での二重接続登録は AlreadyConnected になる
        // given (前提条件):
        let h = create_test_coordinator();
        let _rx = connect(&h.coordinator, "a").await;

        // when (操作):
        let (tx, _rx2) = mpsc::unbounded_channel();
        let result = h.coordinator.on_connect(conn("a"), tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::AlreadyConnected(conn("a"))));
        assert_eq!(h.coordinator.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_room_snapshot_lists_members_with_join_times() {
        // テスト項目: ルームのスナップショットにメンバーの参加時刻と履歴件数が含まれる
        // given (前提条件):
        let h = create_test_coordinator();
        let _rx_a = connect(&h.coordinator, "a").await;
        let _rx_b = connect(&h.coordinator, "b").await;
        h.coordinator.join_call(&conn("a"), "/r".to_string()).await.unwrap();
        h.clock.advance(1_000);
        h.coordinator.join_call(&conn("b"), "/r".to_string()).await.unwrap();
        h.coordinator
            .send_chat(&conn("b"), "hey".to_string(), "bob".to_string())
            .await
            .unwrap();

        // when (操作):
        let rooms = h.coordinator.rooms().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].message_count, 1);
        assert_eq!(
            rooms[0].members,
            vec![
                PresenceRecord::new(conn("a"), Timestamp::new(1_700_000_000_000)),
                PresenceRecord::new(conn("b"), Timestamp::new(1_700_000_001_000)),
            ]
        );
    }

    #[tokio::test]
    async fn test_rooms_are_independent() {
        // テスト項目: 別ルームのチャットや切断は互いに影響しない
        // given (前提条件):
        let h = create_test_coordinator();
        let mut rx_a = connect(&h.coordinator, "a").await;
        let mut rx_b = connect(&h.coordinator, "b").await;
        h.coordinator.join_call(&conn("a"), "/one".to_string()).await.unwrap();
        h.coordinator.join_call(&conn("b"), "/two".to_string()).await.unwrap();
        drain(&mut rx_a);
        drain(&mut rx_b);

        // when (操作):
        h.coordinator
            .send_chat(&conn("a"), "only room one".to_string(), "alice".to_string())
            .await
            .unwrap();
        h.coordinator.on_disconnect(&conn("a")).await.unwrap();

        // then (期待する結果):
        assert!(drain(&mut rx_b).is_empty());
        assert_eq!(h.coordinator.rooms().await.len(), 1);
    }
}
