#[cfg(test)]
mod tests {
    use crate::channel::{Channel, ChannelEvent};
    use crate::command::{DispatchOutcome, INVALID_SESSION_FILE};
    use crate::error::Result;
    use crate::protocol::OutboundMessage;
    use crate::session::controller::SessionController;
    use crate::session::model::Session;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // Mock channel recording every send and close call
    #[derive(Default)]
    struct MockChannel {
        sent: Mutex<Vec<OutboundMessage>>,
        close_calls: AtomicUsize,
    }

    impl MockChannel {
        fn sent(&self) -> Vec<OutboundMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Channel for MockChannel {
        fn send(&self, message: &OutboundMessage) -> Result<()> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }

        fn close(&self) {
            self.close_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn frame(value: serde_json::Value) -> ChannelEvent {
        ChannelEvent::MessageReceived(value.to_string())
    }

    fn connected_controller() -> (SessionController<Arc<MockChannel>>, Arc<MockChannel>) {
        let channel = Arc::new(MockChannel::default());
        let mut controller = SessionController::new(Session::new("1714557600000"), channel.clone());
        controller.handle_channel_event(ChannelEvent::Opened);
        controller.handle_channel_event(frame(json!({
            "type": "init",
            "content": "Connected to server. Ready to chat!",
            "timestamp": "2024-05-01T10:00:00",
            "rag_enabled": true
        })));
        (controller, channel)
    }

    #[test]
    fn test_message_round_trip() {
        let (mut controller, channel) = connected_controller();

        assert_eq!(controller.send_message("Explain rag_chain.py"), DispatchOutcome::Sent);
        assert!(controller.session().is_in_flight());
        assert_eq!(
            channel.sent(),
            vec![OutboundMessage::Message {
                content: "Explain rag_chain.py".to_string()
            }]
        );

        controller.handle_channel_event(frame(json!({
            "type": "response",
            "content": "<think>\nreading</think>It wires retrieval into the prompt.",
            "timestamp": "2024-05-01T10:00:05"
        })));

        let session = controller.session();
        assert!(!session.is_in_flight());
        assert_eq!(session.messages().len(), 3);
    }

    #[test]
    fn test_second_send_while_in_flight_is_dropped() {
        let (mut controller, channel) = connected_controller();

        controller.send_command("refresh", None);
        let transcript = controller.session().messages().len();

        assert_eq!(controller.send_message("hello?"), DispatchOutcome::Skipped);
        assert_eq!(controller.send_command("debug", None), DispatchOutcome::Skipped);

        assert_eq!(channel.sent().len(), 1);
        assert_eq!(controller.session().messages().len(), transcript);
    }

    #[test]
    fn test_nothing_sent_before_connect() {
        let channel = Arc::new(MockChannel::default());
        let mut controller = SessionController::new(Session::new("1"), channel.clone());

        assert_eq!(controller.send_message("early"), DispatchOutcome::Skipped);
        assert_eq!(controller.send_command("help", None), DispatchOutcome::Skipped);
        assert!(channel.sent().is_empty());
        assert!(controller.session().messages().is_empty());
    }

    #[test]
    fn test_toggle_rag_flow() {
        let (mut controller, channel) = connected_controller();

        controller.send_command("toggle_rag", None);
        controller.handle_channel_event(frame(json!({
            "type": "rag_status",
            "enabled": false,
            "content": "RAG mode disabled",
            "timestamp": "2024-05-01T10:01:00"
        })));

        assert_eq!(
            channel.sent(),
            vec![OutboundMessage::Command {
                command: "toggle_rag".to_string(),
                data: None
            }]
        );
        assert!(!controller.session().rag_enabled());
        assert!(!controller.session().is_in_flight());
    }

    #[test]
    fn test_load_flow_replaces_transcript() {
        let (mut controller, channel) = connected_controller();
        controller.send_message("before load");
        controller.handle_channel_event(frame(json!({
            "type": "response", "content": "ok", "timestamp": "2024-05-01T10:00:02"
        })));

        let file = json!({
            "session_id": "20240430_085959",
            "messages": [
                {"role": "user", "content": "q1", "timestamp": "2024-04-30T09:00:00"},
                {"role": "assistant", "content": "a1", "timestamp": "2024-04-30T09:00:01"}
            ]
        });
        assert!(controller.load_session_contents(&file.to_string()).is_sent());
        assert_eq!(
            channel.sent().last().unwrap(),
            &OutboundMessage::Command {
                command: "load".to_string(),
                data: Some(file.clone())
            }
        );

        // The backend confirms with a system message, then the transcript.
        controller.handle_channel_event(frame(json!({
            "type": "system",
            "content": "Successfully loaded 2 messages from session 20240430_085959",
            "timestamp": "2024-05-01T10:02:00"
        })));
        controller.handle_channel_event(frame(json!({
            "type": "session_loaded",
            "messages": file["messages"],
            "session_info": {"session_id": "20240430_085959", "start_time": null, "model_name": null},
            "timestamp": "2024-05-01T10:02:00"
        })));

        let messages = controller.session().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, "Loaded session 20240430_085959");
        assert_eq!(messages[1].content, "q1");
        assert_eq!(messages[2].content, "a1");
    }

    #[test]
    fn test_invalid_load_never_sends() {
        let (mut controller, channel) = connected_controller();

        assert_eq!(
            controller.load_session_contents("session: yaml?"),
            DispatchOutcome::Rejected
        );
        assert!(channel.sent().is_empty());
        assert_eq!(controller.session().error(), Some(INVALID_SESSION_FILE));
        assert!(!controller.session().is_in_flight());
    }

    #[test]
    fn test_load_session_file_sends_parsed_contents() {
        let (mut controller, channel) = connected_controller();
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, r#"{"messages": [{"role": "user", "content": null}]}"#).unwrap();

        assert_eq!(controller.load_session_file(&path), DispatchOutcome::Sent);
        assert_eq!(
            channel.sent(),
            vec![OutboundMessage::Command {
                command: "load".to_string(),
                data: Some(json!({"messages": [{"role": "user", "content": null}]})),
            }]
        );

        let missing = temp_dir.path().join("absent.json");
        controller.handle_channel_event(frame(json!({"type": "system", "content": "ok"})));
        assert_eq!(controller.load_session_file(&missing), DispatchOutcome::Rejected);
        assert!(
            controller
                .session()
                .error()
                .is_some_and(|error| error.starts_with("Failed to read session file: "))
        );
        assert_eq!(channel.sent().len(), 1);
    }

    #[test]
    fn test_close_mid_request_unblocks_and_disconnects() {
        let (mut controller, _channel) = connected_controller();
        controller.send_message("long question");

        controller.handle_channel_event(ChannelEvent::Errored("io".to_string()));
        controller.handle_channel_event(ChannelEvent::Closed);

        let session = controller.session();
        assert!(!session.is_connected());
        assert!(!session.is_in_flight());
        assert_eq!(session.error(), Some("Connection lost"));
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn test_local_error_does_not_change_flags() {
        let (mut controller, _channel) = connected_controller();
        controller.set_local_error("disk full");
        assert_eq!(controller.session().error(), Some("disk full"));
        assert!(controller.session().is_connected());
        assert!(!controller.session().is_in_flight());
    }

    #[test]
    fn test_drop_closes_channel_once() {
        let (controller, channel) = connected_controller();
        assert_eq!(channel.close_calls.load(Ordering::SeqCst), 0);
        drop(controller);
        assert_eq!(channel.close_calls.load(Ordering::SeqCst), 1);
    }
}
