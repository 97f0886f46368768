//! End-to-end conversations through the chat orchestrator.

use std::sync::Arc;

use aegis_chat::{ChatOrchestrator, ConversationPhase, Route, TaskKind};
use aegis_core::config::{AegisConfig, DialogueConfig};
use aegis_core::{ActivityLog, MemoryActivityLog};
use aegis_nlp::{EntityExtractor, EntityType, Intent, KeywordTables, TopicClassifier};
use uuid::Uuid;

fn config(seed: u64) -> AegisConfig {
    AegisConfig {
        dialogue: DialogueConfig {
            rng_seed: Some(seed),
            ..DialogueConfig::default()
        },
        ..AegisConfig::default()
    }
}

/// Send `messages` in one session, returning the session id and replies.
fn converse(orch: &ChatOrchestrator, messages: &[&str]) -> (Uuid, Vec<String>) {
    let mut sid = None;
    let mut replies = Vec::new();
    for msg in messages {
        let turn = orch.handle_message(msg, sid).unwrap();
        sid = Some(turn.session_id);
        replies.push(turn.reply);
    }
    (sid.unwrap(), replies)
}

#[test]
fn test_last_question_recall_across_turns() {
    let orch = ChatOrchestrator::new(&config(1), Arc::new(MemoryActivityLog::new(10))).unwrap();
    let (_, replies) = converse(
        &orch,
        &["Tell me about passwords", "no", "What was my last question?"],
    );
    assert!(
        replies[2].contains("tell me about passwords"),
        "got: {}",
        replies[2]
    );
}

#[test]
fn test_favorite_topic_convergence() {
    let orch = ChatOrchestrator::new(&config(2), Arc::new(MemoryActivityLog::new(10))).unwrap();
    // Each topic message is followed by a follow-up offer; plain topic
    // messages are not yes/no answers, so they are treated as new questions.
    let (sid, replies) = converse(
        &orch,
        &[
            "tell me about password managers",
            "how often should I change my password",
            "is a passphrase better",
            "what is a vpn",
            "which is my favorite topic?",
        ],
    );
    assert!(replies[4].contains("Password Security"), "got: {}", replies[4]);

    let state = orch.get_dialogue_state(sid).unwrap();
    assert_eq!(state.favorite_topic(), Some("password"));
    assert_eq!(state.topic_count("password"), 3);
    assert_eq!(state.topic_count("vpn"), 1);
}

#[test]
fn test_blank_input_never_mutates_memory() {
    let orch = ChatOrchestrator::new(&config(3), Arc::new(MemoryActivityLog::new(10))).unwrap();
    let (sid, _) = converse(&orch, &["tell me about malware", "no"]);
    let before = orch.get_dialogue_state(sid).unwrap();

    for blank in ["", " ", "\n\t  "] {
        let turn = orch.handle_message(blank, Some(sid)).unwrap();
        assert_eq!(
            turn.reply,
            "I didn't catch that. Could you please type your question?"
        );
    }

    let after = orch.get_dialogue_state(sid).unwrap();
    assert_eq!(after.last_question(), before.last_question());
    assert_eq!(after.last_topic(), before.last_topic());
    assert_eq!(after.topic_interest_counts(), before.topic_interest_counts());
    assert_eq!(after.history(), before.history());
}

#[test]
fn test_blank_input_keeps_pending_offer() {
    let orch = ChatOrchestrator::new(&config(4), Arc::new(MemoryActivityLog::new(10))).unwrap();
    let (sid, _) = converse(&orch, &["tell me about firewalls"]);
    orch.handle_message("   ", Some(sid)).unwrap();
    assert!(orch.get_phase(sid).unwrap().is_awaiting_follow_up());

    let turn = orch.handle_message("sure", Some(sid)).unwrap();
    assert!(turn.reply.starts_with("Tip:"));
    assert_eq!(orch.get_phase(sid).unwrap(), ConversationPhase::AwaitingQuestion);
}

#[test]
fn test_reminder_beats_quiz() {
    let orch = ChatOrchestrator::new(&config(5), Arc::new(MemoryActivityLog::new(10))).unwrap();
    let turn = orch
        .handle_message("remind me to start quiz tomorrow", None)
        .unwrap();
    let analysis = turn.analysis.as_ref().unwrap();
    assert!(analysis.intent.is_task());
    assert_ne!(analysis.intent, Intent::StartQuiz);
    match turn.route {
        Route::CreateTask(draft) => assert_eq!(draft.kind, TaskKind::Reminder),
        other => panic!("expected CreateTask, got {:?}", other),
    }
}

#[test]
fn test_entity_round_trip_through_orchestrator() {
    let orch = ChatOrchestrator::new(&config(6), Arc::new(MemoryActivityLog::new(10))).unwrap();
    let message = "email me at a@b.com or call 10.0.0.1 tomorrow";
    let turn = orch.handle_message(message, None).unwrap();
    let analysis = turn.analysis.unwrap();

    let of = |t: EntityType| -> Vec<String> {
        analysis.entities_of(t).map(|e| e.value.clone()).collect()
    };
    assert_eq!(of(EntityType::Email), vec!["a@b.com"]);
    assert_eq!(of(EntityType::IpAddress), vec!["10.0.0.1"]);
    assert_eq!(of(EntityType::Time), vec!["tomorrow"]);

    for e in &analysis.entities {
        assert!(e.start_index + e.length <= message.len());
        assert_eq!(&message[e.start_index..e.end_index()], e.value);
    }
}

#[test]
fn test_extractor_and_topic_classifier_idempotent() {
    let extractor = EntityExtractor::new();
    let topics = TopicClassifier::new(&KeywordTables::builtin());
    let text = "My VPN password leaked at 10:15 pm, see https://status.example.com or 192.168.0.1";

    assert_eq!(extractor.extract(text), extractor.extract(text));
    assert_eq!(topics.classify(text), topics.classify(text));
    assert_eq!(
        topics.classify(text),
        vec!["password".to_string(), "vpn".to_string()]
    );
}

#[test]
fn test_sentiment_priority_in_reply() {
    let orch = ChatOrchestrator::new(&config(7), Arc::new(MemoryActivityLog::new(10))).unwrap();
    let turn = orch
        .handle_message("I'm worried about phishing but my backups are great", None)
        .unwrap();
    assert!(turn
        .reply
        .starts_with("I understand this can feel worrying."));
    assert_eq!(
        turn.analysis.unwrap().sentiment,
        aegis_nlp::Sentiment::Worried
    );
}

#[test]
fn test_activity_log_readback() {
    let log = Arc::new(MemoryActivityLog::new(50));
    let sink: Arc<dyn ActivityLog> = log.clone();
    let orch = ChatOrchestrator::new(&config(8), sink).unwrap();

    converse(
        &orch,
        &[
            "hello",
            "what is phishing",
            "no",
            "start a quiz",
            "   ",
            "show my activity log",
        ],
    );

    let actions: Vec<String> = log.entries().into_iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            "general_chat",
            "information_request",
            "follow_up_declined",
            "start_quiz",
            "general_chat",
        ]
    );
    assert_eq!(log.by_category("chat").len(), 5);
    assert_eq!(log.search("PHISHING").len(), 1);

    let json = log.to_json().unwrap();
    assert!(json.contains("\"start_quiz\""));
}

#[test]
fn test_same_seed_same_conversation() {
    let script = [
        "tell me about wifi",
        "yes",
        "what's encryption",
        "no",
        "I'm confused about 2fa",
        "ok",
        "hmm",
    ];
    let run = || {
        let orch =
            ChatOrchestrator::new(&config(99), Arc::new(MemoryActivityLog::new(10))).unwrap();
        converse(&orch, &script).1
    };
    assert_eq!(run(), run());
}
