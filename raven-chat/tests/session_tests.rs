//! Session orchestrator scenarios: lazy initialization, idempotence,
//! stream/blocking equivalence, error-to-text policy, and rebuild behavior.

use std::sync::Arc;

use futures::StreamExt;
use raven_chat::{AppConfig, ChatError, ChatSession};
use raven_core::Llm;
use raven_model::MockLlm;
use raven_rag::{HashEmbeddingProvider, RagConfig, RagError};

/// A workspace with a documents directory and an index directory.
struct Fixture {
    _dir: tempfile::TempDir,
    config: AppConfig,
}

impl Fixture {
    fn new(with_documents: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("scripts");
        std::fs::create_dir_all(&docs).unwrap();
        if with_documents {
            std::fs::write(
                docs.join("pilot.txt"),
                "I prefer rainy days. Sunlight is a design flaw.\n\n\
                 My favorite day of the year is the first cold one.",
            )
            .unwrap();
        }

        let mut config = AppConfig::default();
        config.rag = RagConfig::builder()
            .docs_dir(&docs)
            .persist_dir(dir.path().join("index"))
            .collection("scripts")
            .chunk_size(80)
            .chunk_overlap(10)
            .top_k(2)
            .build()
            .unwrap();

        Self { _dir: dir, config }
    }

    fn session_with(&self, llm: Arc<dyn Llm>) -> ChatSession {
        ChatSession::builder(self.config.clone())
            .embedding_provider(Arc::new(HashEmbeddingProvider::new(16)))
            .llm(llm)
            .build()
    }

    fn session(&self, reply: &str) -> ChatSession {
        self.session_with(Arc::new(MockLlm::new(reply).with_fragment_size(5)))
    }
}

#[tokio::test]
async fn first_ask_initializes_lazily() {
    let fixture = Fixture::new(true);
    let session = fixture.session("A fixed reply.");
    assert_eq!(session.state_name(), "uninitialized");

    let answer = session.ask("what days do you like?").await.unwrap();
    assert_eq!(answer, "A fixed reply.");
    assert_eq!(session.state_name(), "ready");
    assert!(session.index_len().await.unwrap() > 0);
}

#[tokio::test]
async fn empty_documents_directory_fails_and_stays_uninitialized() {
    let fixture = Fixture::new(false);
    let session = fixture.session("unused");

    let err = session.initialize(false).await.unwrap_err();
    assert!(matches!(err, ChatError::Rag(RagError::NoDocuments { .. })));
    assert_eq!(session.state_name(), "uninitialized");

    // A later ask retries initialization and hits the same domain error.
    let err = session.ask("anyone there?").await.unwrap_err();
    assert!(matches!(err, ChatError::Rag(RagError::NoDocuments { .. })));
}

#[tokio::test]
async fn initialize_is_idempotent_once_ready() {
    let fixture = Fixture::new(true);
    let session = fixture.session("reply");
    session.initialize(false).await.unwrap();

    let snapshot = fixture.config.rag.persist_dir.join("scripts.json");
    let first_mtime = std::fs::metadata(&snapshot).unwrap().modified().unwrap();

    session.initialize(false).await.unwrap();
    let second_mtime = std::fs::metadata(&snapshot).unwrap().modified().unwrap();
    assert_eq!(first_mtime, second_mtime, "no-op re-init must not rewrite the index");
}

#[tokio::test]
async fn stream_fragments_concatenate_to_blocking_answer() {
    let fixture = Fixture::new(true);
    let session = fixture.session("The first cold day, obviously.");
    session.initialize(false).await.unwrap();

    let blocking = session.ask("favorite day?").await.unwrap();

    let mut streamed = String::new();
    let mut stream = session.ask_stream("favorite day?").await.unwrap();
    while let Some(fragment) = stream.next().await {
        streamed.push_str(&fragment);
    }

    assert_eq!(streamed, blocking);
}

#[tokio::test]
async fn mid_stream_failure_ends_with_error_fragment() {
    let fixture = Fixture::new(true);
    let session =
        fixture.session_with(Arc::new(MockLlm::failing_after("0123456789abcdef", 2)));
    session.initialize(false).await.unwrap();

    let mut fragments = Vec::new();
    let mut stream = session.ask_stream("q").await.unwrap();
    while let Some(fragment) = stream.next().await {
        fragments.push(fragment);
    }

    assert_eq!(&fragments[..2], &["0123".to_string(), "4567".to_string()]);
    assert!(fragments[2].starts_with("generation failed:"));
    assert_eq!(fragments.len(), 3);
}

#[tokio::test]
async fn blocking_failure_is_answer_text_not_error() {
    let fixture = Fixture::new(true);
    let session = fixture.session_with(Arc::new(MockLlm::failing("backend unreachable")));
    session.initialize(false).await.unwrap();

    let answer = session.ask("q").await.unwrap();
    assert!(answer.starts_with("generation failed:"));
    assert!(answer.contains("backend unreachable"));
}

#[tokio::test]
async fn transcript_resolves_once_after_drain() {
    let fixture = Fixture::new(true);
    let session = fixture.session("<think>scheming</think>Crows hold grudges. So do I.");
    session.initialize(false).await.unwrap();

    let (mut stream, transcript) = session.ask_stream_with_transcript("q").await.unwrap();
    let mut streamed = String::new();
    while let Some(fragment) = stream.next().await {
        streamed.push_str(&fragment);
    }

    // Raw fragments carry everything; the transcript is the cleaned reply.
    assert!(streamed.contains("<think>"));
    assert_eq!(transcript.await.unwrap(), "Crows hold grudges. So do I.");
}

#[tokio::test]
async fn abandoned_stream_drops_transcript() {
    let fixture = Fixture::new(true);
    let session = fixture.session("a reasonably long reply in fragments");
    session.initialize(false).await.unwrap();

    let (mut stream, transcript) = session.ask_stream_with_transcript("q").await.unwrap();
    let _first = stream.next().await;
    drop(stream);

    assert!(transcript.await.is_err());
}

#[tokio::test]
async fn force_rebuild_reembeds_documents() {
    let fixture = Fixture::new(true);
    let session = fixture.session("reply");
    session.initialize(false).await.unwrap();
    let entries = session.index_len().await.unwrap();

    session.initialize(true).await.unwrap();
    assert_eq!(session.state_name(), "ready");
    assert_eq!(session.index_len().await.unwrap(), entries);
}

#[tokio::test]
async fn failed_rebuild_keeps_previous_engine() {
    let fixture = Fixture::new(true);
    let session = fixture.session("still alive");
    session.initialize(false).await.unwrap();

    // Empty the documents directory, then force a rebuild: it must fail
    // while the session keeps answering from the previous index.
    std::fs::remove_file(fixture.config.rag.docs_dir.join("pilot.txt")).unwrap();
    let err = session.initialize(true).await.unwrap_err();
    assert!(matches!(err, ChatError::Rag(RagError::NoDocuments { .. })));

    assert_eq!(session.state_name(), "ready");
    assert_eq!(session.ask("q").await.unwrap(), "still alive");
}

#[tokio::test]
async fn second_session_loads_persisted_index_without_documents() {
    let fixture = Fixture::new(true);
    let session = fixture.session("reply");
    session.initialize(false).await.unwrap();
    drop(session);

    // Remove the sources: the persisted snapshot alone must be enough.
    std::fs::remove_file(fixture.config.rag.docs_dir.join("pilot.txt")).unwrap();
    let session = fixture.session("from disk");
    assert_eq!(session.ask("q").await.unwrap(), "from disk");
}
